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

//! Transfer ← ServiceJourneyInterchange (spec §4.F). `from_point_ref` /
//! `to_point_ref` resolve to stop ids through the same
//! `pointInJourneyPattern → scheduledStopPoint → quay/stopPlace` chain
//! StopTime production uses; the orchestrator resolves them before calling
//! this producer.

use crate::gtfs_model::objects::Transfer;
use crate::netex::objects::ServiceJourneyInterchange;

/// Parses an ISO-8601 minute-only duration (`PT5M`) into seconds.
fn parse_minutes_duration(raw: &str) -> Option<u32> {
    let minutes = raw.strip_prefix("PT")?.strip_suffix('M')?;
    minutes.parse::<u32>().ok().map(|m| m * 60)
}

/// Projects a ServiceJourneyInterchange into a GTFS Transfer, given its
/// already-resolved stop ids.
pub fn build_transfer(interchange: &ServiceJourneyInterchange, from_stop_id: impl Into<String>, to_stop_id: impl Into<String>) -> Transfer {
    let transfer_type = if interchange.stay_seated {
        0
    } else if interchange.guaranteed {
        1
    } else {
        2
    };

    let min_transfer_time = interchange
        .minimum_transfer_time
        .as_deref()
        .and_then(parse_minutes_duration)
        .or(if interchange.guaranteed { Some(120) } else { None });

    Transfer {
        from_stop_id: from_stop_id.into(),
        to_stop_id: to_stop_id.into(),
        transfer_type,
        min_transfer_time,
        from_route_id: None,
        to_route_id: None,
        from_trip_id: Some(interchange.from_journey_ref.clone()),
        to_trip_id: Some(interchange.to_journey_ref.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interchange() -> ServiceJourneyInterchange {
        ServiceJourneyInterchange {
            id: "IC1".to_string(),
            from_journey_ref: "SJ1".to_string(),
            to_journey_ref: "SJ2".to_string(),
            ..ServiceJourneyInterchange::default()
        }
    }

    #[test]
    fn stay_seated_produces_transfer_type_zero() {
        let mut interchange = interchange();
        interchange.stay_seated = true;
        let transfer = build_transfer(&interchange, "S1", "S2");
        assert_eq!(0, transfer.transfer_type);
    }

    #[test]
    fn guaranteed_defaults_min_transfer_time_when_unspecified() {
        let mut interchange = interchange();
        interchange.guaranteed = true;
        let transfer = build_transfer(&interchange, "S1", "S2");
        assert_eq!(1, transfer.transfer_type);
        assert_eq!(Some(120), transfer.min_transfer_time);
    }

    #[test]
    fn parses_minimum_transfer_time_duration() {
        let mut interchange = interchange();
        interchange.minimum_transfer_time = Some("PT5M".to_string());
        let transfer = build_transfer(&interchange, "S1", "S2");
        assert_eq!(Some(300), transfer.min_transfer_time);
    }

    #[test]
    fn neither_flag_produces_transfer_type_two() {
        let transfer = build_transfer(&interchange(), "S1", "S2");
        assert_eq!(2, transfer.transfer_type);
        assert_eq!(None, transfer.min_transfer_time);
    }
}
