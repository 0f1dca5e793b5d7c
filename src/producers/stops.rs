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

//! Stop ← Quay / Stop ← StopPlace (spec §4.F).

use super::first_non_empty;
use crate::gtfs_model::objects::{LocationType, Stop};
use crate::netex::objects::{Quay, StopPlace};

/// Projects a Quay into a platform-level GTFS Stop (`location_type = 0`).
/// `parent` is the StopPlace resolved via `quay.parent_stop_place_id`, when
/// known — its name is the last fallback in the `stop_name` chain.
pub fn build_stop_from_quay(quay: &Quay, parent: Option<&StopPlace>) -> Stop {
    let parent_name = parent.map(|p| p.name.as_str()).unwrap_or("");
    let parent_short_name = parent.map(|p| p.short_name.as_str()).unwrap_or("");
    let stop_name = first_non_empty(&[&quay.name, &quay.short_name, &quay.public_code, parent_name, parent_short_name])
        .unwrap_or("Unknown Stop")
        .to_string();

    Stop {
        stop_id: quay.id.clone(),
        stop_code: if quay.public_code.is_empty() { None } else { Some(quay.public_code.clone()) },
        stop_name,
        stop_desc: None,
        stop_lat: quay.centroid.map(|c| c.lat).unwrap_or(0.0),
        stop_lon: quay.centroid.map(|c| c.lon).unwrap_or(0.0),
        zone_id: None,
        stop_url: None,
        location_type: LocationType::Platform,
        parent_station: quay.parent_stop_place_id.clone(),
        wheelchair_boarding: if quay.accessibility.wheelchair_accessible { Some(1) } else { None },
        level_id: None,
        platform_code: None,
    }
}

/// Projects a StopPlace into a station-level GTFS Stop (`location_type =
/// 1`).
pub fn build_stop_from_stop_place(stop_place: &StopPlace) -> Stop {
    let stop_name = first_non_empty(&[&stop_place.name, &stop_place.short_name])
        .unwrap_or("Unknown Stop")
        .to_string();

    Stop {
        stop_id: stop_place.id.clone(),
        stop_code: None,
        stop_name,
        stop_desc: None,
        stop_lat: stop_place.centroid.map(|c| c.lat).unwrap_or(0.0),
        stop_lon: stop_place.centroid.map(|c| c.lon).unwrap_or(0.0),
        zone_id: None,
        stop_url: None,
        location_type: LocationType::Station,
        parent_station: None,
        wheelchair_boarding: if stop_place.accessibility.wheelchair_accessible { Some(1) } else { None },
        level_id: None,
        platform_code: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::netex::objects::Centroid;
    use approx::assert_relative_eq;

    #[test]
    fn stop_name_falls_back_through_the_chain() {
        let quay = Quay {
            id: "Q1".to_string(),
            centroid: Some(Centroid { lat: 59.91, lon: 10.75 }),
            ..Quay::default()
        };
        let parent = StopPlace {
            name: "Central Station".to_string(),
            ..StopPlace::default()
        };
        let stop = build_stop_from_quay(&quay, Some(&parent));
        assert_eq!("Central Station", stop.stop_name);
        assert_relative_eq!(59.91, stop.stop_lat);
    }

    #[test]
    fn quay_name_wins_over_parent_fallback() {
        let quay = Quay {
            id: "Q1".to_string(),
            name: "Platform 1".to_string(),
            ..Quay::default()
        };
        let stop = build_stop_from_quay(&quay, None);
        assert_eq!("Platform 1", stop.stop_name);
    }

    #[test]
    fn stop_place_produces_location_type_station() {
        let stop_place = StopPlace {
            id: "SP1".to_string(),
            name: "Central Station".to_string(),
            ..StopPlace::default()
        };
        let stop = build_stop_from_stop_place(&stop_place);
        assert_eq!(LocationType::Station, stop.location_type);
    }
}
