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

//! Producers (spec §4.F): pure functions from a NeTEx entity (and
//! read-only access to the repositories) to zero or one GTFS record. Split
//! one file per GTFS table, the way [`crate::netex`]'s reader splits one
//! file per frame concern. Calendar production lives in
//! [`crate::calendar_builder`] rather than here, since it walks a
//! collection of DayTypes rather than a single source entity.

mod agency;
mod feed_info;
mod routes;
mod stop_times;
mod stops;
mod transfers;
mod trips;

pub use agency::{build_agency, resolve_timezone};
pub use feed_info::build_feed_info;
pub use routes::build_route;
pub use stop_times::build_stop_time;
pub use stops::{build_stop_from_quay, build_stop_from_stop_place};
pub use transfers::build_transfer;
pub use trips::build_trip;

fn first_non_empty<'a>(candidates: &[&'a str]) -> Option<&'a str> {
    candidates.iter().copied().find(|s| !s.is_empty())
}
