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

//! Typed entities held by the [`crate::netex::Repository`] (spec §3.1).
//! Every entity carries its own opaque string id and is indexed by it, in
//! the same style as this crate's GTFS objects.

use crate::collection::Id;

/// A lat/lon centroid, kept distinct from [`crate::geometry::LatLon`] so the
/// NeTEx object model doesn't depend on the geometry kernel's internals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Centroid {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lon: f64,
}

impl From<Centroid> for crate::geometry::LatLon {
    fn from(c: Centroid) -> Self {
        crate::geometry::LatLon::new(c.lat, c.lon)
    }
}

/// Accessibility flag, as NeTEx's `AccessibilityLimitation` boils down to
/// for this crate's purposes. Unused fields of the richer NeTEx vocabulary
/// (visual/audible limitations) are out of scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Accessibility {
    /// Whether the stop/quay is wheelchair accessible.
    pub wheelchair_accessible: bool,
}

/// Transit operator (spec §3.1). Projects to GTFS Agency.
#[derive(Debug, Clone, Default)]
pub struct Authority {
    /// Opaque id.
    pub id: String,
    /// Name.
    pub name: String,
    /// Short name.
    pub short_name: String,
    /// Public URL.
    pub url: String,
    /// Contact phone.
    pub phone: String,
    /// Contact email.
    pub email: String,
    /// Contact URL (may differ from `url`).
    pub contact_url: String,
}

impl Id for Authority {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Groups lines under an authority (spec §3.1).
#[derive(Debug, Clone, Default)]
pub struct Network {
    /// Opaque id.
    pub id: String,
    /// Authority operating this network, if declared directly on it.
    pub authority_ref: Option<String>,
    /// Ordered member line ids (`RepresentedByGroupRef` inverse).
    pub members: Vec<String>,
}

impl Id for Network {
    fn id(&self) -> &str {
        &self.id
    }
}

/// A public service (spec §3.1). Projects to GTFS Route.
#[derive(Debug, Clone, Default)]
pub struct Line {
    /// Opaque id.
    pub id: String,
    /// Name.
    pub name: String,
    /// Short name.
    pub short_name: String,
    /// `PublicCode`, preferred over `short_name` by the Route producer.
    pub public_code: String,
    /// Description.
    pub description: String,
    /// URL.
    pub url: String,
    /// NeTEx `TransportMode`.
    pub transport_mode: String,
    /// NeTEx `TransportSubmode`.
    pub transport_submode: String,
    /// Authority, when set directly on the line.
    pub authority_ref: Option<String>,
    /// Network this line belongs to.
    pub network_ref: Option<String>,
    /// `Presentation/Colour`, a 6-hex-digit string without `#`.
    pub color: Option<String>,
    /// `Presentation/TextColour`.
    pub text_color: Option<String>,
}

impl Id for Line {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Direction of travel along a [`Route`] or [`JourneyPattern`] (spec §3.1,
/// testable property / scenario S3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Away from the authority's reference point.
    Outbound,
    /// Towards the authority's reference point.
    Inbound,
    /// Synonym for inbound used by some producers.
    Return,
    /// Synonym for outbound used by some producers.
    Outward,
}

impl Direction {
    /// Parses a NeTEx direction token, case-insensitively. Unknown tokens
    /// yield `None` (direction stays unspecified, per spec §4.F/S3).
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_lowercase().as_str() {
            "outbound" => Some(Direction::Outbound),
            "inbound" => Some(Direction::Inbound),
            "return" => Some(Direction::Return),
            "outward" => Some(Direction::Outward),
            _ => None,
        }
    }

    /// GTFS `direction_id` per spec §4.F/S3: 0 for outbound/outward, 1 for
    /// inbound/return.
    pub fn gtfs_direction_id(self) -> u8 {
        match self {
            Direction::Outbound | Direction::Outward => 0,
            Direction::Inbound | Direction::Return => 1,
        }
    }
}

/// Directed variant of a [`Line`] (spec §3.1). Not the GTFS Route.
#[derive(Debug, Clone, Default)]
pub struct Route {
    /// Opaque id.
    pub id: String,
    /// Line this route belongs to.
    pub line_ref: String,
    /// Direction of travel, if declared.
    pub direction: Option<Direction>,
    /// Ordered point ids along the route (`PointOnRoute` refs).
    pub points: Vec<String>,
}

impl Id for Route {
    fn id(&self) -> &str {
        &self.id
    }
}

/// A stop visited by a [`JourneyPattern`] (spec §3.1, §9's tagged-variant
/// note on `PointsInSequence`).
#[derive(Debug, Clone, Default)]
pub struct StopPointInJourneyPattern {
    /// Opaque id.
    pub id: String,
    /// 1-based declared order.
    pub order: u32,
    /// The abstract stop this point resolves to.
    pub scheduled_stop_point_ref: String,
    /// Headsign display for this point, if overridden locally.
    pub destination_display_ref: Option<String>,
    /// Whether passengers may alight here.
    pub for_alighting: bool,
    /// Whether passengers may board here.
    pub for_boarding: bool,
}

/// A non-stop timing point along a [`JourneyPattern`] (spec §9).
#[derive(Debug, Clone, Default)]
pub struct TimingPointInJourneyPattern {
    /// Opaque id.
    pub id: String,
    /// 1-based declared order.
    pub order: u32,
}

/// One entry of a journey pattern's ordered `PointsInSequence`, preserving
/// document order as the stop sequence (spec §9).
#[derive(Debug, Clone)]
pub enum JourneyPatternPoint {
    /// A point where the vehicle stops.
    Stop(StopPointInJourneyPattern),
    /// A pure timing point, not a stop.
    Timing(TimingPointInJourneyPattern),
}

impl JourneyPatternPoint {
    /// The point's own id, whichever variant it is.
    pub fn id(&self) -> &str {
        match self {
            JourneyPatternPoint::Stop(p) => &p.id,
            JourneyPatternPoint::Timing(p) => &p.id,
        }
    }

    /// Borrows the stop variant, if this is one.
    pub fn as_stop(&self) -> Option<&StopPointInJourneyPattern> {
        match self {
            JourneyPatternPoint::Stop(p) => Some(p),
            JourneyPatternPoint::Timing(_) => None,
        }
    }
}

/// Ordered sequence of points along a route (spec §3.1).
#[derive(Debug, Clone, Default)]
pub struct JourneyPattern {
    /// Opaque id.
    pub id: String,
    /// Route this pattern walks.
    pub route_ref: String,
    /// Direction, if declared directly (falls back to the route's).
    pub direction: Option<Direction>,
    /// Default headsign display for journeys using this pattern.
    pub destination_display_ref: Option<String>,
    /// Ordered points, preserving document order.
    pub points: Vec<JourneyPatternPoint>,
}

impl Id for JourneyPattern {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Abstract stop reference bound to a physical Quay and/or StopPlace (spec
/// §3.1). Exactly one of `quay_ref`/`stop_place_ref` is expected to be set;
/// both absent means unresolved (invariant, not enforced at parse time so a
/// malformed document degrades to "unresolved" rather than aborting).
#[derive(Debug, Clone, Default)]
pub struct ScheduledStopPoint {
    /// Opaque id.
    pub id: String,
    /// Bound platform, when known.
    pub quay_ref: Option<String>,
    /// Bound station, when known (and no quay is more specific).
    pub stop_place_ref: Option<String>,
}

impl Id for ScheduledStopPoint {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Physical station (spec §3.1). Projects to GTFS Stop with
/// `location_type = 1`.
#[derive(Debug, Clone, Default)]
pub struct StopPlace {
    /// Opaque id.
    pub id: String,
    /// Name.
    pub name: String,
    /// Short name.
    pub short_name: String,
    /// Centroid, when resolvable.
    pub centroid: Option<Centroid>,
    /// NeTEx `TransportMode`.
    pub transport_mode: String,
    /// Accessibility.
    pub accessibility: Accessibility,
    /// Ids of the quays this station contains.
    pub quays: Vec<String>,
}

impl Id for StopPlace {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Platform (spec §3.1). Projects to GTFS Stop with `location_type = 0`.
#[derive(Debug, Clone, Default)]
pub struct Quay {
    /// Opaque id.
    pub id: String,
    /// Name.
    pub name: String,
    /// Short name.
    pub short_name: String,
    /// Public code (printed on signage).
    pub public_code: String,
    /// Centroid, when resolvable.
    pub centroid: Option<Centroid>,
    /// Accessibility.
    pub accessibility: Accessibility,
    /// Parent station id, discovered by scanning [`StopPlace::quays`]
    /// (spec §3.1: "parent StopPlace discovered by scanning").
    pub parent_stop_place_id: Option<String>,
}

impl Id for Quay {
    fn id(&self) -> &str {
        &self.id
    }
}

/// How a scheduled run deviates from its plan (spec §3.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ServiceAlteration {
    /// Runs as planned.
    #[default]
    Planned,
    /// Does not run; produces no Trip (scenario S4).
    Cancelled,
    /// Runs with a replacement vehicle/route, treated as planned for this
    /// crate's purposes.
    Replaced,
    /// Newly added, not originally planned.
    Extra,
}

impl ServiceAlteration {
    /// Parses a NeTEx `ServiceAlteration` token, case-insensitively.
    /// Unrecognised tokens default to [`ServiceAlteration::Planned`].
    pub fn parse(raw: &str) -> Self {
        match raw.to_lowercase().as_str() {
            "cancelled" | "canceled" => ServiceAlteration::Cancelled,
            "replaced" => ServiceAlteration::Replaced,
            "extra" | "added" => ServiceAlteration::Extra,
            _ => ServiceAlteration::Planned,
        }
    }
}

/// Per-stop arrival/departure in a [`ServiceJourney`] (spec §3.1).
#[derive(Debug, Clone, Default)]
pub struct TimetabledPassingTime {
    /// Opaque id.
    pub id: String,
    /// The `StopPointInJourneyPattern` this passing time is aligned to.
    pub point_in_journey_pattern_ref: String,
    /// `HH:MM:SS`, absent when only departure is given.
    pub arrival_time: Option<String>,
    /// Days past midnight added to `arrival_time`'s hour field.
    pub arrival_day_offset: u32,
    /// `HH:MM:SS`, absent when only arrival is given.
    pub departure_time: Option<String>,
    /// Days past midnight added to `departure_time`'s hour field.
    pub departure_day_offset: u32,
}

/// A single scheduled run (spec §3.1). Projects to GTFS Trip.
#[derive(Debug, Clone, Default)]
pub struct ServiceJourney {
    /// Opaque id.
    pub id: String,
    /// Pattern this journey follows.
    pub journey_pattern_ref: String,
    /// Line, when given directly (else resolved via pattern → route).
    pub line_ref: Option<String>,
    /// Day types this journey operates under.
    pub day_type_refs: Vec<String>,
    /// Deviation from plan.
    pub service_alteration: ServiceAlteration,
    /// Ordered passing times, one per pattern stop.
    pub passing_times: Vec<TimetabledPassingTime>,
}

impl Id for ServiceJourney {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Named operating-day template (spec §3.1).
#[derive(Debug, Clone, Default)]
pub struct DayType {
    /// Opaque id.
    pub id: String,
    /// Raw `DaysOfWeek` tokens as found in `PropertyOfDay` (e.g.
    /// `["Monday", "Wednesday"]` or `["Weekdays"]`), kept raw so the
    /// calendar builder owns the OR-merge logic (spec §4.H).
    pub days_of_week: Vec<String>,
}

impl Id for DayType {
    fn id(&self) -> &str {
        &self.id
    }
}

/// A specific calendar date (spec §3.1).
#[derive(Debug, Clone, Default)]
pub struct OperatingDay {
    /// Opaque id.
    pub id: String,
    /// Calendar date, `YYYY-MM-DD` or `YYYY/MM/DD` as found in the source.
    pub calendar_date: String,
}

impl Id for OperatingDay {
    fn id(&self) -> &str {
        &self.id
    }
}

/// A date range (spec §3.1). Expansion into individual dates is a
/// documented non-goal (spec §9); the repository retains the period so a
/// future expansion pass could use it, and the loader logs one INFO record
/// per unexpanded assignment that references one.
#[derive(Debug, Clone, Default)]
pub struct OperatingPeriod {
    /// Opaque id.
    pub id: String,
    /// Inclusive start date.
    pub from_date: String,
    /// Inclusive end date.
    pub to_date: String,
}

impl Id for OperatingPeriod {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Binds a [`DayType`] to an [`OperatingDay`] or [`OperatingPeriod`] (spec
/// §3.1).
#[derive(Debug, Clone, Default)]
pub struct DayTypeAssignment {
    /// Opaque id.
    pub id: String,
    /// Day type this assignment refines.
    pub day_type_ref: String,
    /// Specific date, when bound to one.
    pub operating_day_ref: Option<String>,
    /// Date range, when bound to one (not expanded; spec §9).
    pub operating_period_ref: Option<String>,
    /// Whether the day type is available (`true`) or explicitly excluded
    /// (`false`) on this date/period.
    pub is_available: bool,
}

impl Id for DayTypeAssignment {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Transfer between two journeys at two points (spec §3.1). Projects to
/// GTFS Transfer.
#[derive(Debug, Clone, Default)]
pub struct ServiceJourneyInterchange {
    /// Opaque id.
    pub id: String,
    /// Origin journey.
    pub from_journey_ref: String,
    /// Destination journey.
    pub to_journey_ref: String,
    /// Origin point (resolves to a stop id).
    pub from_point_ref: String,
    /// Destination point (resolves to a stop id).
    pub to_point_ref: String,
    /// Whether passengers stay seated through the transfer.
    pub stay_seated: bool,
    /// Whether the connection is guaranteed to be held.
    pub guaranteed: bool,
    /// Minimum transfer time, as an ISO-8601 duration (e.g. `PT5M`).
    pub minimum_transfer_time: Option<String>,
    /// Relative priority among competing interchanges.
    pub priority: Option<i32>,
}

impl Id for ServiceJourneyInterchange {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Front/side headsign text, optionally with via stops (spec §3.1).
#[derive(Debug, Clone, Default)]
pub struct DestinationDisplay {
    /// Opaque id.
    pub id: String,
    /// Text shown on the vehicle's front display.
    pub front_text: String,
    /// Text shown on the vehicle's side display.
    pub side_text: String,
    /// Named via stops.
    pub vias: Vec<String>,
}

impl Id for DestinationDisplay {
    fn id(&self) -> &str {
        &self.id
    }
}
