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

//! StopTime ← TimetabledPassingTime (spec §4.F). `stop_id` resolution
//! (`pointInJourneyPattern → scheduledStopPoint → quay/stopPlace`) and
//! `stop_sequence` assignment are the orchestrator's job (spec §4.J); this
//! producer folds day offsets into the hour field and copies arrival across
//! to departure (or vice versa) when only one is given.

use crate::gtfs_model::objects::StopTime;
use crate::netex::objects::TimetabledPassingTime;

/// Adds `day_offset * 24` to `time`'s hour field (spec §4.F, scenario S2).
/// Malformed times (not `HH:MM:SS`) are returned unchanged.
fn add_day_offset(time: &str, day_offset: u32) -> String {
    let parts: Vec<&str> = time.split(':').collect();
    let [hour, minute, second] = parts[..] else {
        return time.to_string();
    };
    let Ok(hour) = hour.parse::<u32>() else {
        return time.to_string();
    };
    format!("{:02}:{}:{}", hour + day_offset * 24, minute, second)
}

/// Projects a TimetabledPassingTime into a GTFS StopTime, given the
/// already-resolved trip id, stop id and 1-based stop sequence.
pub fn build_stop_time(
    passing_time: &TimetabledPassingTime,
    trip_id: impl Into<String>,
    stop_id: impl Into<String>,
    stop_sequence: u32,
) -> StopTime {
    let arrival = passing_time
        .arrival_time
        .as_ref()
        .map(|t| add_day_offset(t, passing_time.arrival_day_offset));
    let departure = passing_time
        .departure_time
        .as_ref()
        .map(|t| add_day_offset(t, passing_time.departure_day_offset));

    let arrival_time = arrival.clone().or_else(|| departure.clone()).unwrap_or_default();
    let departure_time = departure.or(arrival).unwrap_or_default();

    StopTime {
        trip_id: trip_id.into(),
        arrival_time,
        departure_time,
        stop_id: stop_id.into(),
        stop_sequence,
        stop_headsign: None,
        pickup_type: 0,
        drop_off_type: 0,
        continuous_pickup: None,
        continuous_drop_off: None,
        shape_dist_traveled: None,
        timepoint: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copies_departure_into_arrival_when_arrival_missing() {
        let passing_time = TimetabledPassingTime {
            departure_time: Some("08:00:00".to_string()),
            ..TimetabledPassingTime::default()
        };
        let stop_time = build_stop_time(&passing_time, "T1", "S1", 1);
        assert_eq!("08:00:00", stop_time.arrival_time);
        assert_eq!("08:00:00", stop_time.departure_time);
    }

    #[test]
    fn folds_day_offset_past_midnight() {
        let passing_time = TimetabledPassingTime {
            arrival_time: Some("23:55:00".to_string()),
            departure_time: Some("00:05:00".to_string()),
            departure_day_offset: 1,
            ..TimetabledPassingTime::default()
        };
        let stop_time = build_stop_time(&passing_time, "T1", "S1", 2);
        assert_eq!("23:55:00", stop_time.arrival_time);
        assert_eq!("24:05:00", stop_time.departure_time);
    }

    #[test]
    fn pickup_and_drop_off_types_are_always_zero() {
        let stop_time = build_stop_time(&TimetabledPassingTime::default(), "T1", "S1", 1);
        assert_eq!(0, stop_time.pickup_type);
        assert_eq!(0, stop_time.drop_off_type);
    }
}
