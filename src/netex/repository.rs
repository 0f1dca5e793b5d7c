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

//! The NeTEx repository (spec §4.D): primary id-keyed maps for every entity
//! kind, plus derived lookup indexes maintained on every save. Reads and
//! writes go through a single `RwLock`, giving single-writer/many-readers
//! semantics (spec §4.D "Concurrency") without needing a crate beyond the
//! standard library — there is no rayon/crossbeam-style dependency anywhere
//! in this crate's stack for this concern, so `std::sync::RwLock` is the
//! idiomatic choice here (see DESIGN.md).

use crate::collection::{CollectionWithId, Index};
use crate::netex::objects::*;
use std::sync::RwLock;

#[derive(Default)]
struct Inner {
    authorities: CollectionWithId<Authority>,
    networks: CollectionWithId<Network>,
    lines: CollectionWithId<Line>,
    routes: CollectionWithId<Route>,
    journey_patterns: CollectionWithId<JourneyPattern>,
    scheduled_stop_points: CollectionWithId<ScheduledStopPoint>,
    stop_places: CollectionWithId<StopPlace>,
    quays: CollectionWithId<Quay>,
    service_journeys: CollectionWithId<ServiceJourney>,
    day_types: CollectionWithId<DayType>,
    operating_days: CollectionWithId<OperatingDay>,
    operating_periods: CollectionWithId<OperatingPeriod>,
    day_type_assignments: CollectionWithId<DayTypeAssignment>,
    interchanges: CollectionWithId<ServiceJourneyInterchange>,
    destination_displays: CollectionWithId<DestinationDisplay>,

    routes_by_line: Index,
    service_journeys_by_pattern: Index,
    dated_service_journeys_by_service_journey: Index,
    day_type_assignments_by_day_type: Index,
    stop_place_by_quay: Index,
    point_in_journey_pattern_to_scheduled_stop_point: Index,
    line_id_to_network_id: Index,

    time_zone: Option<String>,
}

/// Indexed in-memory store of NeTEx entities (spec §3.1, §4.D).
#[derive(Default)]
pub struct Repository {
    inner: RwLock<Inner>,
}

macro_rules! save_into {
    ($fn_name:ident, $field:ident, $ty:ty) => {
        /// Saves an entity into its primary map. Idempotent by id: a later
        /// save with the same id replaces the earlier one (spec §4.D
        /// "saveEntity is idempotent on primary maps").
        pub fn $fn_name(&self, entity: $ty) {
            self.inner.write().unwrap().$field.replace(entity);
        }
    };
}

macro_rules! get_from {
    ($fn_name:ident, $field:ident, $ty:ty) => {
        /// Looks up an entity by id.
        pub fn $fn_name(&self, id: &str) -> Option<$ty> {
            self.inner.read().unwrap().$field.get(id).cloned()
        }
    };
}

macro_rules! len_of {
    ($fn_name:ident, $field:ident) => {
        /// Number of entities of this kind currently saved.
        pub fn $fn_name(&self) -> usize {
            self.inner.read().unwrap().$field.len()
        }
    };
}

impl Repository {
    /// Builds an empty repository.
    pub fn new() -> Self {
        Repository::default()
    }

    save_into!(save_authority, authorities, Authority);
    save_into!(save_line, lines, Line);
    save_into!(save_scheduled_stop_point, scheduled_stop_points, ScheduledStopPoint);
    save_into!(save_day_type, day_types, DayType);
    save_into!(save_operating_day, operating_days, OperatingDay);
    save_into!(save_operating_period, operating_periods, OperatingPeriod);
    save_into!(save_interchange, interchanges, ServiceJourneyInterchange);
    save_into!(save_destination_display, destination_displays, DestinationDisplay);

    get_from!(authority, authorities, Authority);
    get_from!(network, networks, Network);
    get_from!(line, lines, Line);
    get_from!(route, routes, Route);
    get_from!(journey_pattern, journey_patterns, JourneyPattern);
    get_from!(scheduled_stop_point, scheduled_stop_points, ScheduledStopPoint);
    get_from!(stop_place, stop_places, StopPlace);
    get_from!(quay, quays, Quay);
    get_from!(service_journey, service_journeys, ServiceJourney);
    get_from!(day_type, day_types, DayType);
    get_from!(operating_day, operating_days, OperatingDay);
    get_from!(operating_period, operating_periods, OperatingPeriod);
    get_from!(destination_display, destination_displays, DestinationDisplay);

    len_of!(authority_count, authorities);
    len_of!(line_count, lines);
    len_of!(service_journey_count, service_journeys);
    len_of!(quay_count, quays);
    len_of!(stop_place_count, stop_places);

    /// Whether the repository holds no entities of any kind (used to
    /// detect `NoDataFound`, spec §7).
    pub fn is_empty(&self) -> bool {
        let inner = self.inner.read().unwrap();
        inner.authorities.is_empty()
            && inner.networks.is_empty()
            && inner.lines.is_empty()
            && inner.routes.is_empty()
            && inner.journey_patterns.is_empty()
            && inner.scheduled_stop_points.is_empty()
            && inner.stop_places.is_empty()
            && inner.quays.is_empty()
            && inner.service_journeys.is_empty()
            && inner.day_types.is_empty()
            && inner.day_type_assignments.is_empty()
    }

    /// Saves a route, indexing it under `routesByLineId` (spec §4.D).
    pub fn save_route(&self, route: Route) {
        let mut inner = self.inner.write().unwrap();
        inner.routes_by_line.insert(&route.line_ref, route.id.clone());
        inner.routes.replace(route);
    }

    /// Returns the routes belonging to a line, via `routesByLineId`.
    pub fn routes_by_line(&self, line_id: &str) -> Vec<Route> {
        let inner = self.inner.read().unwrap();
        inner
            .routes_by_line
            .get(line_id)
            .iter()
            .filter_map(|id| inner.routes.get(id).cloned())
            .collect()
    }

    /// Saves a day-type assignment, indexing it under
    /// `dayTypeAssignmentsByDayTypeId` (spec §4.D).
    pub fn save_day_type_assignment(&self, assignment: DayTypeAssignment) {
        let mut inner = self.inner.write().unwrap();
        inner
            .day_type_assignments_by_day_type
            .insert(&assignment.day_type_ref, assignment.id.clone());
        inner.day_type_assignments.replace(assignment);
    }

    /// Returns the assignments that refine a given day type.
    pub fn day_type_assignments_by_day_type(&self, day_type_id: &str) -> Vec<DayTypeAssignment> {
        let inner = self.inner.read().unwrap();
        inner
            .day_type_assignments_by_day_type
            .get(day_type_id)
            .iter()
            .filter_map(|id| inner.day_type_assignments.get(id).cloned())
            .collect()
    }

    /// Saves a stop place, indexing each of its quays under
    /// `stopPlaceByQuayId` (spec §4.D).
    pub fn save_stop_place(&self, stop_place: StopPlace) {
        let mut inner = self.inner.write().unwrap();
        for quay_id in &stop_place.quays {
            inner.stop_place_by_quay.insert(quay_id, stop_place.id.clone());
        }
        inner.stop_places.replace(stop_place);
    }

    /// Saves a quay, back-filling `parent_stop_place_id` from
    /// `stopPlaceByQuayId` when a StopPlace referencing it has already been
    /// (or is later) seen. Safe regardless of load order since both saves
    /// consult the same index.
    pub fn save_quay(&self, mut quay: Quay) {
        let mut inner = self.inner.write().unwrap();
        if quay.parent_stop_place_id.is_none() {
            quay.parent_stop_place_id = inner
                .stop_place_by_quay
                .get(&quay.id)
                .first()
                .cloned();
        }
        inner.quays.replace(quay);
    }

    /// Returns the id of the stop place that contains `quay_id`, if known.
    pub fn stop_place_for_quay(&self, quay_id: &str) -> Option<String> {
        let inner = self.inner.read().unwrap();
        inner
            .stop_place_by_quay
            .get(quay_id)
            .first()
            .cloned()
            .or_else(|| inner.quays.get(quay_id).and_then(|q| q.parent_stop_place_id.clone()))
    }

    /// Saves a network, indexing its members under `lineIdToNetworkId`
    /// (spec §4.D).
    pub fn save_network(&self, network: Network) {
        let mut inner = self.inner.write().unwrap();
        for line_id in &network.members {
            inner.line_id_to_network_id.insert(line_id, network.id.clone());
        }
        inner.networks.replace(network);
    }

    /// Returns the network id a line belongs to, if indexed.
    pub fn network_for_line(&self, line_id: &str) -> Option<String> {
        self.inner
            .read()
            .unwrap()
            .line_id_to_network_id
            .get(line_id)
            .first()
            .cloned()
    }

    /// Saves a journey pattern's `StopPointInJourneyPattern` entries into
    /// `pointInJourneyPatternToScheduledStopPoint` (spec §4.D), alongside
    /// the pattern itself.
    pub fn save_journey_pattern_with_index(&self, pattern: JourneyPattern) {
        let mut inner = self.inner.write().unwrap();
        for point in &pattern.points {
            if let Some(stop_point) = point.as_stop() {
                inner
                    .point_in_journey_pattern_to_scheduled_stop_point
                    .insert(&stop_point.id, stop_point.scheduled_stop_point_ref.clone());
            }
        }
        inner.journey_patterns.replace(pattern);
    }

    /// Resolves a `StopPointInJourneyPattern` id to its
    /// `scheduledStopPointRef`.
    pub fn scheduled_stop_point_for_pattern_point(&self, point_id: &str) -> Option<String> {
        self.inner
            .read()
            .unwrap()
            .point_in_journey_pattern_to_scheduled_stop_point
            .get(point_id)
            .first()
            .cloned()
    }

    /// Saves a service journey, indexing it under
    /// `serviceJourneysByPatternId` (spec §4.D).
    pub fn save_service_journey_with_index(&self, journey: ServiceJourney) {
        let mut inner = self.inner.write().unwrap();
        inner
            .service_journeys_by_pattern
            .insert(&journey.journey_pattern_ref, journey.id.clone());
        inner.service_journeys.replace(journey);
    }

    /// Returns the journeys following a given pattern.
    pub fn service_journeys_by_pattern(&self, pattern_id: &str) -> Vec<ServiceJourney> {
        let inner = self.inner.read().unwrap();
        inner
            .service_journeys_by_pattern
            .get(pattern_id)
            .iter()
            .filter_map(|id| inner.service_journeys.get(id).cloned())
            .collect()
    }

    /// Iterates every saved service journey, in insertion order.
    pub fn all_service_journeys(&self) -> Vec<ServiceJourney> {
        self.inner.read().unwrap().service_journeys.values().cloned().collect()
    }

    /// Records a `DatedServiceJourney` under
    /// `datedServiceJourneysByServiceJourneyId` (spec §4.D). This crate
    /// doesn't model dated service journeys as their own entity — a dated
    /// journey only ever renames/dates an existing `ServiceJourney` — so
    /// only the index entry is kept.
    pub fn save_dated_service_journey(&self, dated_id: &str, service_journey_ref: &str) {
        self.inner
            .write()
            .unwrap()
            .dated_service_journeys_by_service_journey
            .insert(service_journey_ref, dated_id.to_string());
    }

    /// Returns the dated-service-journey ids recorded against a service
    /// journey.
    pub fn dated_service_journeys_for(&self, service_journey_id: &str) -> Vec<String> {
        self.inner
            .read()
            .unwrap()
            .dated_service_journeys_by_service_journey
            .get(service_journey_id)
            .to_vec()
    }

    /// Updates a (possibly not-yet-seen) `ScheduledStopPoint`'s quay/stop
    /// place bindings, e.g. from a `PassengerStopAssignment` parsed
    /// separately from the `ScheduledStopPoint` itself. Only overwrites a
    /// field when the new value is `Some`, so assignments seen in any order
    /// compose rather than clobber each other.
    pub fn bind_scheduled_stop_point(
        &self,
        id: &str,
        quay_ref: Option<String>,
        stop_place_ref: Option<String>,
    ) {
        let mut inner = self.inner.write().unwrap();
        let mut point = inner
            .scheduled_stop_points
            .get(id)
            .cloned()
            .unwrap_or_else(|| ScheduledStopPoint {
                id: id.to_string(),
                ..ScheduledStopPoint::default()
            });
        if quay_ref.is_some() {
            point.quay_ref = quay_ref;
        }
        if stop_place_ref.is_some() {
            point.stop_place_ref = stop_place_ref;
        }
        inner.scheduled_stop_points.replace(point);
    }

    /// Iterates every saved quay.
    pub fn all_quays(&self) -> Vec<Quay> {
        self.inner.read().unwrap().quays.values().cloned().collect()
    }

    /// Iterates every saved stop place.
    pub fn all_stop_places(&self) -> Vec<StopPlace> {
        self.inner.read().unwrap().stop_places.values().cloned().collect()
    }

    /// Iterates every saved authority.
    pub fn all_authorities(&self) -> Vec<Authority> {
        self.inner.read().unwrap().authorities.values().cloned().collect()
    }

    /// Iterates every saved line.
    pub fn all_lines(&self) -> Vec<Line> {
        self.inner.read().unwrap().lines.values().cloned().collect()
    }

    /// Iterates every saved interchange.
    pub fn all_interchanges(&self) -> Vec<ServiceJourneyInterchange> {
        self.inner.read().unwrap().interchanges.values().cloned().collect()
    }

    /// Resolves the authority operating `line` (spec §4.D's
    /// `authorityIdForLine` contract): `line.authorityRef` if set, else the
    /// owning network's `authorityRef` via `lineIdToNetworkId`, else the
    /// network found via `line.networkRef`, else an empty string.
    pub fn authority_id_for_line(&self, line: &Line) -> String {
        if let Some(ref authority_ref) = line.authority_ref {
            return authority_ref.clone();
        }
        let inner = self.inner.read().unwrap();
        if let Some(network_id) = inner.line_id_to_network_id.get(&line.id).first() {
            if let Some(network) = inner.networks.get(network_id) {
                if let Some(ref authority_ref) = network.authority_ref {
                    return authority_ref.clone();
                }
            }
        }
        if let Some(ref network_ref) = line.network_ref {
            if let Some(network) = inner.networks.get(network_ref) {
                if let Some(ref authority_ref) = network.authority_ref {
                    return authority_ref.clone();
                }
            }
        }
        String::new()
    }

    /// The repository-wide default timezone (spec §4.D
    /// `timeZone()`), `Europe/Oslo` unless overridden by
    /// [`Repository::set_time_zone`].
    pub fn time_zone(&self) -> String {
        self.inner
            .read()
            .unwrap()
            .time_zone
            .clone()
            .unwrap_or_else(|| "Europe/Oslo".to_string())
    }

    /// Overrides the default timezone (from [`crate::Configuration`]).
    pub fn set_time_zone(&self, time_zone: impl Into<String>) {
        self.inner.write().unwrap().time_zone = Some(time_zone.into());
    }
}
