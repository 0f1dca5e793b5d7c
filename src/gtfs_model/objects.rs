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

//! Typed GTFS rows (spec §3.2, §6.2), one struct per table. Every struct
//! implements [`Row`] so [`crate::gtfs_model::write`] can derive its CSV
//! header from a declared list of field names (spec §4.E) and format each
//! value with the rules spec §4.E lays out (strings verbatim, integers
//! decimal, floats minimal-precision, booleans `0`/`1`).

use crate::collection::Id;

/// A GTFS table: a declared, ordered field-name list plus a way to render
/// one row as CSV cells in that same order.
pub trait Row {
    /// Logical field names, in the casing the source model would use
    /// (e.g. `"AgencyFareURL"`), in struct declaration order. Transformed
    /// into snake_case headers by
    /// [`crate::gtfs_model::write::camel_to_snake`] (spec §4.E, testable
    /// property 9).
    fn fields() -> &'static [&'static str];
    /// Renders this row as CSV cell values, one per entry of
    /// [`Row::fields`].
    fn to_record(&self) -> Vec<String>;
}

fn opt_str(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

fn opt_f64(value: Option<f64>) -> String {
    value.map(fmt_f64).unwrap_or_default()
}

/// Formats a float with minimal precision (spec §4.E): no trailing zeros,
/// no unnecessary decimal point.
pub fn fmt_f64(value: f64) -> String {
    if value == value.trunc() && value.abs() < 1e15 {
        format!("{}", value.trunc() as i64)
    } else {
        let mut s = format!("{:.6}", value);
        while s.ends_with('0') {
            s.pop();
        }
        if s.ends_with('.') {
            s.pop();
        }
        s
    }
}

fn bool01(value: bool) -> String {
    if value { "1".to_string() } else { "0".to_string() }
}

/// Transit operator (spec §4.F "Agency ← Authority").
#[derive(Debug, Clone, Default)]
pub struct Agency {
    /// `agency_id`.
    pub agency_id: String,
    /// `agency_name`, required.
    pub agency_name: String,
    /// `agency_url`, required.
    pub agency_url: String,
    /// `agency_timezone`, required.
    pub agency_timezone: String,
    /// `agency_lang`.
    pub agency_lang: Option<String>,
    /// `agency_phone`.
    pub agency_phone: Option<String>,
    /// `agency_fare_url`.
    pub agency_fare_url: Option<String>,
    /// `agency_email`.
    pub agency_email: Option<String>,
}

impl Id for Agency {
    fn id(&self) -> &str {
        &self.agency_id
    }
}

impl Row for Agency {
    fn fields() -> &'static [&'static str] {
        &[
            "AgencyId",
            "AgencyName",
            "AgencyURL",
            "AgencyTimezone",
            "AgencyLang",
            "AgencyPhone",
            "AgencyFareURL",
            "AgencyEmail",
        ]
    }

    fn to_record(&self) -> Vec<String> {
        vec![
            self.agency_id.clone(),
            self.agency_name.clone(),
            self.agency_url.clone(),
            self.agency_timezone.clone(),
            opt_str(&self.agency_lang),
            opt_str(&self.agency_phone),
            opt_str(&self.agency_fare_url),
            opt_str(&self.agency_email),
        ]
    }
}

/// `location_type` (spec §3.2: platform `0`, station `1`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LocationType {
    /// A platform/quay (`0`).
    #[default]
    Platform,
    /// A station (`1`).
    Station,
}

impl LocationType {
    fn code(self) -> u8 {
        match self {
            LocationType::Platform => 0,
            LocationType::Station => 1,
        }
    }
}

/// Platform or station (spec §4.F "Stop ← Quay" / "Stop ← StopPlace").
#[derive(Debug, Clone, Default)]
pub struct Stop {
    /// `stop_id`.
    pub stop_id: String,
    /// `stop_code`.
    pub stop_code: Option<String>,
    /// `stop_name`.
    pub stop_name: String,
    /// `stop_desc`.
    pub stop_desc: Option<String>,
    /// `stop_lat`.
    pub stop_lat: f64,
    /// `stop_lon`.
    pub stop_lon: f64,
    /// `zone_id`.
    pub zone_id: Option<String>,
    /// `stop_url`.
    pub stop_url: Option<String>,
    /// `location_type`.
    pub location_type: LocationType,
    /// `parent_station`.
    pub parent_station: Option<String>,
    /// `wheelchair_boarding` (`0` unknown, `1` accessible, `2` not).
    pub wheelchair_boarding: Option<u8>,
    /// `level_id`.
    pub level_id: Option<String>,
    /// `platform_code`.
    pub platform_code: Option<String>,
}

impl Id for Stop {
    fn id(&self) -> &str {
        &self.stop_id
    }
}

impl Row for Stop {
    fn fields() -> &'static [&'static str] {
        &[
            "StopId",
            "StopCode",
            "StopName",
            "StopDesc",
            "StopLat",
            "StopLon",
            "ZoneId",
            "StopURL",
            "LocationType",
            "ParentStation",
            "WheelchairBoarding",
            "LevelId",
            "PlatformCode",
        ]
    }

    fn to_record(&self) -> Vec<String> {
        vec![
            self.stop_id.clone(),
            opt_str(&self.stop_code),
            self.stop_name.clone(),
            opt_str(&self.stop_desc),
            fmt_f64(self.stop_lat),
            fmt_f64(self.stop_lon),
            opt_str(&self.zone_id),
            opt_str(&self.stop_url),
            self.location_type.code().to_string(),
            opt_str(&self.parent_station),
            self.wheelchair_boarding.map(|v| v.to_string()).unwrap_or_default(),
            opt_str(&self.level_id),
            opt_str(&self.platform_code),
        ]
    }
}

/// A GTFS Route (spec §4.F "Route ← Line"). Not to be confused with the
/// NeTEx `Route` (a directed variant of a line).
#[derive(Debug, Clone, Default)]
pub struct Route {
    /// `route_id`.
    pub route_id: String,
    /// `agency_id`.
    pub agency_id: Option<String>,
    /// `route_short_name`.
    pub route_short_name: Option<String>,
    /// `route_long_name`.
    pub route_long_name: Option<String>,
    /// `route_desc`.
    pub route_desc: Option<String>,
    /// `route_type`, from the [`crate::route_type`] mapping.
    pub route_type: u16,
    /// `route_url`.
    pub route_url: Option<String>,
    /// `route_color`.
    pub route_color: Option<String>,
    /// `route_text_color`.
    pub route_text_color: Option<String>,
    /// `route_sort_order`.
    pub route_sort_order: Option<u32>,
    /// `continuous_pickup`.
    pub continuous_pickup: Option<u8>,
    /// `continuous_drop_off`.
    pub continuous_drop_off: Option<u8>,
}

impl Id for Route {
    fn id(&self) -> &str {
        &self.route_id
    }
}

impl Row for Route {
    fn fields() -> &'static [&'static str] {
        &[
            "RouteId",
            "AgencyId",
            "RouteShortName",
            "RouteLongName",
            "RouteDesc",
            "RouteType",
            "RouteURL",
            "RouteColor",
            "RouteTextColor",
            "RouteSortOrder",
            "ContinuousPickup",
            "ContinuousDropOff",
        ]
    }

    fn to_record(&self) -> Vec<String> {
        vec![
            self.route_id.clone(),
            opt_str(&self.agency_id),
            opt_str(&self.route_short_name),
            opt_str(&self.route_long_name),
            opt_str(&self.route_desc),
            self.route_type.to_string(),
            opt_str(&self.route_url),
            opt_str(&self.route_color),
            opt_str(&self.route_text_color),
            self.route_sort_order.map(|v| v.to_string()).unwrap_or_default(),
            self.continuous_pickup.map(|v| v.to_string()).unwrap_or_default(),
            self.continuous_drop_off.map(|v| v.to_string()).unwrap_or_default(),
        ]
    }
}

/// A scheduled run (spec §4.F "Trip ← ServiceJourney").
#[derive(Debug, Clone, Default)]
pub struct Trip {
    /// `route_id`.
    pub route_id: String,
    /// `service_id`.
    pub service_id: String,
    /// `trip_id`.
    pub trip_id: String,
    /// `trip_headsign`.
    pub trip_headsign: Option<String>,
    /// `trip_short_name`.
    pub trip_short_name: Option<String>,
    /// `direction_id` (`0`/`1`), empty when undeclared (scenario S3).
    pub direction_id: Option<u8>,
    /// `block_id`.
    pub block_id: Option<String>,
    /// `shape_id`.
    pub shape_id: Option<String>,
    /// `wheelchair_accessible`.
    pub wheelchair_accessible: Option<u8>,
    /// `bikes_allowed`.
    pub bikes_allowed: Option<u8>,
}

impl Id for Trip {
    fn id(&self) -> &str {
        &self.trip_id
    }
}

impl Row for Trip {
    fn fields() -> &'static [&'static str] {
        &[
            "RouteId",
            "ServiceId",
            "TripId",
            "TripHeadsign",
            "TripShortName",
            "DirectionId",
            "BlockId",
            "ShapeId",
            "WheelchairAccessible",
            "BikesAllowed",
        ]
    }

    fn to_record(&self) -> Vec<String> {
        vec![
            self.route_id.clone(),
            self.service_id.clone(),
            self.trip_id.clone(),
            opt_str(&self.trip_headsign),
            opt_str(&self.trip_short_name),
            self.direction_id.map(|v| v.to_string()).unwrap_or_default(),
            opt_str(&self.block_id),
            opt_str(&self.shape_id),
            self.wheelchair_accessible.map(|v| v.to_string()).unwrap_or_default(),
            self.bikes_allowed.map(|v| v.to_string()).unwrap_or_default(),
        ]
    }
}

/// A stop within a trip (spec §4.F "StopTime ← TimetabledPassingTime").
#[derive(Debug, Clone, Default)]
pub struct StopTime {
    /// `trip_id`.
    pub trip_id: String,
    /// `arrival_time`, `HH:MM:SS` with day-offset folded into the hour.
    pub arrival_time: String,
    /// `departure_time`, same format.
    pub departure_time: String,
    /// `stop_id`.
    pub stop_id: String,
    /// `stop_sequence`, 1-based, strictly increasing per trip.
    pub stop_sequence: u32,
    /// `stop_headsign`.
    pub stop_headsign: Option<String>,
    /// `pickup_type` (spec: always `"0"`).
    pub pickup_type: u8,
    /// `drop_off_type` (spec: always `"0"`).
    pub drop_off_type: u8,
    /// `continuous_pickup`.
    pub continuous_pickup: Option<u8>,
    /// `continuous_drop_off`.
    pub continuous_drop_off: Option<u8>,
    /// `shape_dist_traveled`.
    pub shape_dist_traveled: Option<f64>,
    /// `timepoint`.
    pub timepoint: Option<u8>,
}

impl Row for StopTime {
    fn fields() -> &'static [&'static str] {
        &[
            "TripId",
            "ArrivalTime",
            "DepartureTime",
            "StopId",
            "StopSequence",
            "StopHeadsign",
            "PickupType",
            "DropOffType",
            "ContinuousPickup",
            "ContinuousDropOff",
            "ShapeDistTraveled",
            "Timepoint",
        ]
    }

    fn to_record(&self) -> Vec<String> {
        vec![
            self.trip_id.clone(),
            self.arrival_time.clone(),
            self.departure_time.clone(),
            self.stop_id.clone(),
            self.stop_sequence.to_string(),
            opt_str(&self.stop_headsign),
            self.pickup_type.to_string(),
            self.drop_off_type.to_string(),
            self.continuous_pickup.map(|v| v.to_string()).unwrap_or_default(),
            self.continuous_drop_off.map(|v| v.to_string()).unwrap_or_default(),
            opt_f64(self.shape_dist_traveled),
            self.timepoint.map(|v| v.to_string()).unwrap_or_default(),
        ]
    }
}

/// A named operating-day template's weekday flags and validity window
/// (spec §4.F/§4.H "Calendar ← [DayType]").
#[derive(Debug, Clone, Default)]
pub struct Calendar {
    /// `service_id`.
    pub service_id: String,
    /// `monday`.
    pub monday: bool,
    /// `tuesday`.
    pub tuesday: bool,
    /// `wednesday`.
    pub wednesday: bool,
    /// `thursday`.
    pub thursday: bool,
    /// `friday`.
    pub friday: bool,
    /// `saturday`.
    pub saturday: bool,
    /// `sunday`.
    pub sunday: bool,
    /// `start_date`, `YYYYMMDD`.
    pub start_date: u32,
    /// `end_date`, `YYYYMMDD`.
    pub end_date: u32,
}

impl Id for Calendar {
    fn id(&self) -> &str {
        &self.service_id
    }
}

impl Calendar {
    /// Whether at least one weekday flag is set (testable property 4).
    pub fn has_any_weekday(&self) -> bool {
        self.monday
            || self.tuesday
            || self.wednesday
            || self.thursday
            || self.friday
            || self.saturday
            || self.sunday
    }
}

impl Row for Calendar {
    fn fields() -> &'static [&'static str] {
        &[
            "ServiceId",
            "Monday",
            "Tuesday",
            "Wednesday",
            "Thursday",
            "Friday",
            "Saturday",
            "Sunday",
            "StartDate",
            "EndDate",
        ]
    }

    fn to_record(&self) -> Vec<String> {
        vec![
            self.service_id.clone(),
            bool01(self.monday),
            bool01(self.tuesday),
            bool01(self.wednesday),
            bool01(self.thursday),
            bool01(self.friday),
            bool01(self.saturday),
            bool01(self.sunday),
            self.start_date.to_string(),
            self.end_date.to_string(),
        ]
    }
}

/// An exception to a [`Calendar`] (spec §4.F "CalendarDate ←
/// [DayTypeAssignment]").
#[derive(Debug, Clone, Default)]
pub struct CalendarDate {
    /// `service_id`.
    pub service_id: String,
    /// `date`, `YYYYMMDD`.
    pub date: String,
    /// `exception_type` (`1` added, `2` removed).
    pub exception_type: u8,
}

impl Row for CalendarDate {
    fn fields() -> &'static [&'static str] {
        &["ServiceId", "Date", "ExceptionType"]
    }

    fn to_record(&self) -> Vec<String> {
        vec![
            self.service_id.clone(),
            self.date.clone(),
            self.exception_type.to_string(),
        ]
    }
}

/// A connection between two journeys (spec §4.F "Transfer ←
/// ServiceJourneyInterchange").
#[derive(Debug, Clone, Default)]
pub struct Transfer {
    /// `from_stop_id`.
    pub from_stop_id: String,
    /// `to_stop_id`.
    pub to_stop_id: String,
    /// `transfer_type` (testable property 5: in `{0,1,2,3}`).
    pub transfer_type: u8,
    /// `min_transfer_time`, seconds.
    pub min_transfer_time: Option<u32>,
    /// `from_route_id`.
    pub from_route_id: Option<String>,
    /// `to_route_id`.
    pub to_route_id: Option<String>,
    /// `from_trip_id`.
    pub from_trip_id: Option<String>,
    /// `to_trip_id`.
    pub to_trip_id: Option<String>,
}

impl Row for Transfer {
    fn fields() -> &'static [&'static str] {
        &[
            "FromStopId",
            "ToStopId",
            "TransferType",
            "MinTransferTime",
            "FromRouteId",
            "ToRouteId",
            "FromTripId",
            "ToTripId",
        ]
    }

    fn to_record(&self) -> Vec<String> {
        vec![
            self.from_stop_id.clone(),
            self.to_stop_id.clone(),
            self.transfer_type.to_string(),
            self.min_transfer_time.map(|v| v.to_string()).unwrap_or_default(),
            opt_str(&self.from_route_id),
            opt_str(&self.to_route_id),
            opt_str(&self.from_trip_id),
            opt_str(&self.to_trip_id),
        ]
    }
}

/// One point of a trip's polyline geometry (spec §4.G).
#[derive(Debug, Clone, Default)]
pub struct ShapePoint {
    /// `shape_id`.
    pub shape_id: String,
    /// `shape_pt_lat`.
    pub shape_pt_lat: f64,
    /// `shape_pt_lon`.
    pub shape_pt_lon: f64,
    /// `shape_pt_sequence`, a contiguous `1..N` permutation per `shape_id`
    /// (testable property 3).
    pub shape_pt_sequence: u32,
    /// `shape_dist_traveled`, non-decreasing per `shape_id`.
    pub shape_dist_traveled: f64,
}

impl Row for ShapePoint {
    fn fields() -> &'static [&'static str] {
        &["ShapeId", "ShapePtLat", "ShapePtLon", "ShapePtSequence", "ShapeDistTraveled"]
    }

    fn to_record(&self) -> Vec<String> {
        vec![
            self.shape_id.clone(),
            fmt_f64(self.shape_pt_lat),
            fmt_f64(self.shape_pt_lon),
            self.shape_pt_sequence.to_string(),
            fmt_f64(self.shape_dist_traveled),
        ]
    }
}

/// Feed-level metadata, statically defaulted (spec §4.F "FeedInfo").
#[derive(Debug, Clone, Default)]
pub struct FeedInfo {
    /// `feed_publisher_name`.
    pub feed_publisher_name: String,
    /// `feed_publisher_url`.
    pub feed_publisher_url: String,
    /// `feed_lang` (spec default `"en"`).
    pub feed_lang: String,
    /// `feed_start_date`, `YYYYMMDD`.
    pub feed_start_date: Option<u32>,
    /// `feed_end_date`, `YYYYMMDD`.
    pub feed_end_date: Option<u32>,
    /// `feed_version` (spec default `"1.0.0"`).
    pub feed_version: String,
    /// `feed_contact_email`.
    pub feed_contact_email: Option<String>,
    /// `feed_contact_url`.
    pub feed_contact_url: Option<String>,
}

impl Row for FeedInfo {
    fn fields() -> &'static [&'static str] {
        &[
            "FeedPublisherName",
            "FeedPublisherURL",
            "FeedLang",
            "FeedStartDate",
            "FeedEndDate",
            "FeedVersion",
            "FeedContactEmail",
            "FeedContactURL",
        ]
    }

    fn to_record(&self) -> Vec<String> {
        vec![
            self.feed_publisher_name.clone(),
            self.feed_publisher_url.clone(),
            self.feed_lang.clone(),
            self.feed_start_date.map(|v| v.to_string()).unwrap_or_default(),
            self.feed_end_date.map(|v| v.to_string()).unwrap_or_default(),
            self.feed_version.clone(),
            opt_str(&self.feed_contact_email),
            opt_str(&self.feed_contact_url),
        ]
    }
}

/// A repeating trip, passed through from a NeTEx frequency group (spec
/// §3.2 "Frequency (passthrough when NeTEx frequency groups exist)").
#[derive(Debug, Clone, Default)]
pub struct Frequency {
    /// `trip_id`.
    pub trip_id: String,
    /// `start_time`.
    pub start_time: String,
    /// `end_time`.
    pub end_time: String,
    /// `headway_secs`.
    pub headway_secs: u32,
    /// `exact_times`.
    pub exact_times: Option<u8>,
}

impl Row for Frequency {
    fn fields() -> &'static [&'static str] {
        &["TripId", "StartTime", "EndTime", "HeadwaySecs", "ExactTimes"]
    }

    fn to_record(&self) -> Vec<String> {
        vec![
            self.trip_id.clone(),
            self.start_time.clone(),
            self.end_time.clone(),
            self.headway_secs.to_string(),
            self.exact_times.map(|v| v.to_string()).unwrap_or_default(),
        ]
    }
}

/// A pathway between two stops, passed through (spec §3.2 "Pathway
/// (passthrough)").
#[derive(Debug, Clone, Default)]
pub struct Pathway {
    /// `pathway_id`.
    pub pathway_id: String,
    /// `from_stop_id`.
    pub from_stop_id: String,
    /// `to_stop_id`.
    pub to_stop_id: String,
    /// `pathway_mode`.
    pub pathway_mode: u8,
    /// `is_bidirectional`.
    pub is_bidirectional: bool,
}

impl Id for Pathway {
    fn id(&self) -> &str {
        &self.pathway_id
    }
}

impl Row for Pathway {
    fn fields() -> &'static [&'static str] {
        &["PathwayId", "FromStopId", "ToStopId", "PathwayMode", "IsBidirectional"]
    }

    fn to_record(&self) -> Vec<String> {
        vec![
            self.pathway_id.clone(),
            self.from_stop_id.clone(),
            self.to_stop_id.clone(),
            self.pathway_mode.to_string(),
            bool01(self.is_bidirectional),
        ]
    }
}

/// A station level, passed through (spec §3.2 "Level (passthrough)").
#[derive(Debug, Clone, Default)]
pub struct Level {
    /// `level_id`.
    pub level_id: String,
    /// `level_index`.
    pub level_index: f64,
    /// `level_name`.
    pub level_name: Option<String>,
}

impl Id for Level {
    fn id(&self) -> &str {
        &self.level_id
    }
}

impl Row for Level {
    fn fields() -> &'static [&'static str] {
        &["LevelId", "LevelIndex", "LevelName"]
    }

    fn to_record(&self) -> Vec<String> {
        vec![self.level_id.clone(), fmt_f64(self.level_index), opt_str(&self.level_name)]
    }
}
