// Copyright (C) 2017 Hove and/or its affiliates.
//
// This program is free software: you can redistribute it and/or modify it
// under the terms of the GNU Affero General Public License as published by the
// Free Software Foundation, version 3.

// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more
// details.

// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>

//! Trip ← ServiceJourney (spec §4.F). Cross-reference resolution (route id,
//! headsign, direction, shape id) is the orchestrator's job (spec §4.J);
//! this producer only applies the cancellation rule and assembles the row.

use crate::gtfs_model::objects::Trip;
use crate::netex::objects::{ServiceAlteration, ServiceJourney};

/// Projects a ServiceJourney into a GTFS Trip, given its already-resolved
/// cross references. Returns `None` when the journey is cancelled (spec
/// §4.F, scenario S4): a cancelled journey produces no Trip and,
/// transitively, no StopTime rows.
pub fn build_trip(
    journey: &ServiceJourney,
    route_id: impl Into<String>,
    service_id: impl Into<String>,
    trip_headsign: Option<String>,
    direction_id: Option<u8>,
    shape_id: Option<String>,
) -> Option<Trip> {
    if journey.service_alteration == ServiceAlteration::Cancelled {
        return None;
    }
    Some(Trip {
        route_id: route_id.into(),
        service_id: service_id.into(),
        trip_id: journey.id.clone(),
        trip_headsign,
        trip_short_name: None,
        direction_id,
        block_id: None,
        shape_id,
        wheelchair_accessible: None,
        bikes_allowed: None,
    })
}
