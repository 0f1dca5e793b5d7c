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

//! Conversion orchestrator (spec §4.J): the single entry point driving the
//! whole pipeline in a fixed stage order, resolving the cross-references
//! the producers leave to it, and assembling the final GTFS ZIP.

use crate::calendar_builder::{build_calendar, build_calendar_dates};
use crate::configuration::Configuration;
use crate::error::ConversionErrorKind;
use crate::gtfs_model::objects::Agency as GtfsAgency;
use crate::gtfs_model::repository::Repository as GtfsRepository;
use crate::gtfs_model::write::write_gtfs;
use crate::netex::objects::{JourneyPattern, ServiceJourney};
use crate::netex::read::load;
use crate::netex::repository::Repository as NetexRepository;
use crate::producers;
use crate::recovery;
use crate::report::{ConversionResult, Report, Stage};
use crate::shape_generator::generate_shape;
use crate::Result;
use std::collections::{HashMap, HashSet};
use std::time::Instant;

/// Converts a NeTEx bundle into a zipped GTFS archive (spec §4.J, the
/// crate's single external entry point). Equivalent to
/// [`convert_with_stops_preload`] with no preload input.
pub fn convert(input: &[u8], config: &Configuration) -> Result<(Vec<u8>, ConversionResult)> {
    convert_with_stops_preload(input, None, config)
}

/// Converts a NeTEx bundle into a zipped GTFS archive, optionally preloading
/// stop-area data from a second, stops-only ZIP (spec §6.1) before the main
/// input is read. Both inputs share the same [`NetexRepository`], so a
/// `Quay`/`StopPlace` declared only in the preload is still resolvable when
/// walking the main timetable.
pub fn convert_with_stops_preload(input: &[u8], stops_preload: Option<&[u8]>, config: &Configuration) -> Result<(Vec<u8>, ConversionResult)> {
    let start = Instant::now();
    let mut report = Report::new();

    if let Err(kind) = config.validate() {
        report.fatal(Stage::Load, "Configuration", kind, kind.to_string());
        return Err(anyhow::anyhow!(kind));
    }

    let netex_repository = NetexRepository::new();
    netex_repository.set_time_zone(config.timezone_default.clone());

    if let Some(preload) = stops_preload {
        load(preload, &netex_repository, config, &mut report)?;
    }
    load(input, &netex_repository, config, &mut report)?;

    if netex_repository.is_empty() {
        report.error(Stage::Load, "Repository", "no NeTEx entities found in input");
    }

    let gtfs_repository = GtfsRepository::new();

    if config.stop_only {
        run_stops_stage(&netex_repository, &gtfs_repository, &mut report);
    } else {
        run_agencies_stage(&netex_repository, &gtfs_repository, &mut report);
        run_stops_stage(&netex_repository, &gtfs_repository, &mut report);
        run_routes_stage(&netex_repository, &gtfs_repository, config, &mut report);
        run_services_stage(&netex_repository, &gtfs_repository, config, &mut report);
        run_transfers_stage(&netex_repository, &gtfs_repository, &mut report);
    }

    run_default_agency_stage(&netex_repository, &gtfs_repository, &mut report);
    run_feed_info_stage(&gtfs_repository, config, &mut report);

    let bytes = write_gtfs(&gtfs_repository).map_err(|error| {
        report.fatal(Stage::Serialize, "Gtfs", ConversionErrorKind::SerializationFailure, error.to_string());
        error
    })?;

    Ok((bytes, report.finish(start.elapsed())))
}

fn run_agencies_stage(netex_repository: &NetexRepository, gtfs_repository: &GtfsRepository, report: &mut Report) {
    let time_zone = netex_repository.time_zone();
    for authority in netex_repository.all_authorities() {
        gtfs_repository.save_agency(producers::build_agency(&authority, &time_zone));
        report.mark_processed("Authority");
    }
}

fn run_stops_stage(netex_repository: &NetexRepository, gtfs_repository: &GtfsRepository, report: &mut Report) {
    for quay in netex_repository.all_quays() {
        let parent = quay.parent_stop_place_id.as_ref().and_then(|id| netex_repository.stop_place(id));
        gtfs_repository.save_stop(producers::build_stop_from_quay(&quay, parent.as_ref()));
        report.mark_processed("Quay");
    }
    for stop_place in netex_repository.all_stop_places() {
        gtfs_repository.save_stop(producers::build_stop_from_stop_place(&stop_place));
        report.mark_processed("StopPlace");
    }
}

fn run_routes_stage(netex_repository: &NetexRepository, gtfs_repository: &GtfsRepository, config: &Configuration, report: &mut Report) {
    for line in netex_repository.all_lines() {
        let authority_id = netex_repository.authority_id_for_line(&line);
        let agency_id = if authority_id.is_empty() { None } else { Some(authority_id) };

        match producers::build_route(&line, agency_id, config.route_type_basic) {
            Some(route) => {
                gtfs_repository.save_route(route);
                report.mark_processed("Line");
            }
            None if config.recovery.continue_on_error => {
                report.warn(Stage::Routes, "Line", format!("{}: no usable name, dropping Route (scenario S6)", line.id));
                report.mark_skipped("Line");
            }
            None => {
                report.error(Stage::Routes, "Line", format!("{}: no usable name, dropping Route (scenario S6)", line.id));
                report.mark_skipped("Line");
            }
        }
    }
}

/// Resolves a `StopPointInJourneyPattern`/`PointOnRoute` id to the GTFS
/// `stop_id` it ultimately binds to, through
/// `pointInJourneyPattern → scheduledStopPoint → (quayRef | stopPlaceRef)`
/// (spec §4.F, §4.J).
fn resolve_stop_id(netex_repository: &NetexRepository, pattern_point_id: &str) -> Option<String> {
    let scheduled_stop_point_ref = netex_repository.scheduled_stop_point_for_pattern_point(pattern_point_id)?;
    let scheduled_stop_point = netex_repository.scheduled_stop_point(&scheduled_stop_point_ref)?;
    scheduled_stop_point.quay_ref.or(scheduled_stop_point.stop_place_ref)
}

/// Resolves the headsign text for a journey (spec §9): the first stop
/// point's `destinationDisplayRef` override if set, else the pattern's own.
/// `frontText` wins over `sideText`; absent resolves to no headsign.
fn resolve_trip_headsign(netex_repository: &NetexRepository, pattern: &JourneyPattern) -> Option<String> {
    let display_ref = pattern
        .points
        .iter()
        .find_map(|point| point.as_stop().and_then(|stop| stop.destination_display_ref.clone()))
        .or_else(|| pattern.destination_display_ref.clone())?;
    let display = netex_repository.destination_display(&display_ref)?;
    if display.front_text.is_empty() {
        None
    } else {
        Some(display.front_text)
    }
}

/// Resolves the Line id a ServiceJourney runs under: its own `lineRef`
/// first, else `pattern.routeRef → route.lineRef` (spec §4.J step 2).
fn resolve_line_id(netex_repository: &NetexRepository, journey: &ServiceJourney, pattern: &JourneyPattern) -> Option<String> {
    journey
        .line_ref
        .clone()
        .or_else(|| netex_repository.route(&pattern.route_ref).map(|route| route.line_ref))
}

/// Builds (or returns the cached) `service_id` for a set of `dayTypeRefs`
/// (grouping journeys that share the same day types under one Calendar,
/// rather than emitting a duplicate row per trip). Empty refs collapse to
/// the literal `"default_service"` (scenario S1).
fn service_id_for(day_type_refs: &[String]) -> String {
    if day_type_refs.is_empty() {
        "default_service".to_string()
    } else {
        day_type_refs.join("_")
    }
}

#[allow(clippy::too_many_arguments)]
fn run_services_stage(netex_repository: &NetexRepository, gtfs_repository: &GtfsRepository, config: &Configuration, report: &mut Report) {
    let mut built_service_ids: HashSet<String> = HashSet::new();
    let mut shaped_patterns: HashMap<String, Option<String>> = HashMap::new();

    for journey in netex_repository.all_service_journeys() {
        if !recovery::should_continue_for_kind(report, "ServiceJourney", config.recovery.continue_on_error, config.recovery.max_errors_per_kind) {
            report.mark_skipped("ServiceJourney");
            continue;
        }

        let Some(pattern) = netex_repository.journey_pattern(&journey.journey_pattern_ref) else {
            report.warn(Stage::Services, "ServiceJourney", format!("{}: JourneyPattern {} not found", journey.id, journey.journey_pattern_ref));
            report.mark_skipped("ServiceJourney");
            continue;
        };

        let Some(line_id) = resolve_line_id(netex_repository, &journey, &pattern) else {
            report.warn(Stage::Services, "ServiceJourney", format!("{}: could not resolve a Line", journey.id));
            report.mark_skipped("ServiceJourney");
            continue;
        };

        let Some(route) = gtfs_repository.route(&line_id) else {
            report.error(Stage::Services, "ServiceJourney", format!("{}: Route {} was not produced", journey.id, line_id));
            report.mark_skipped("ServiceJourney");
            continue;
        };

        let shape_id = if config.generate_shapes {
            shaped_patterns
                .entry(pattern.id.clone())
                .or_insert_with(|| {
                    let shape_id = format!("{}_shape", pattern.id);
                    let points = generate_shape(netex_repository, &pattern, shape_id.clone(), &config.shape);
                    if points.is_empty() {
                        None
                    } else {
                        for point in points {
                            gtfs_repository.save_shape_point(point);
                        }
                        Some(shape_id)
                    }
                })
                .clone()
        } else {
            None
        };

        let trip_headsign = resolve_trip_headsign(netex_repository, &pattern);
        let direction = pattern.direction.or_else(|| netex_repository.route(&pattern.route_ref).and_then(|r| r.direction));
        let direction_id = direction.map(|d| d.gtfs_direction_id());
        let service_id = service_id_for(&journey.day_type_refs);

        let Some(trip) = producers::build_trip(&journey, route.route_id.clone(), service_id.clone(), trip_headsign, direction_id, shape_id) else {
            report.mark_skipped("ServiceJourney");
            continue;
        };
        let trip_id = trip.trip_id.clone();
        gtfs_repository.save_trip(trip);
        report.mark_processed("ServiceJourney");

        for (index, passing_time) in journey.passing_times.iter().enumerate() {
            match resolve_stop_id(netex_repository, &passing_time.point_in_journey_pattern_ref) {
                Some(stop_id) => {
                    gtfs_repository.save_stop_time(producers::build_stop_time(passing_time, trip_id.clone(), stop_id, (index + 1) as u32));
                    report.mark_processed("TimetabledPassingTime");
                }
                None => {
                    report.warn(Stage::Services, "TimetabledPassingTime", format!("{}: could not resolve a stop", passing_time.id));
                    report.mark_skipped("TimetabledPassingTime");
                }
            }
        }

        if built_service_ids.insert(service_id.clone()) {
            gtfs_repository.save_calendar(build_calendar(netex_repository, &journey.day_type_refs, service_id.clone(), &config.calendar));
            for calendar_date in build_calendar_dates(netex_repository, &journey.day_type_refs, service_id.clone()) {
                gtfs_repository.save_calendar_date(calendar_date);
            }
        }
    }
}

fn run_transfers_stage(netex_repository: &NetexRepository, gtfs_repository: &GtfsRepository, report: &mut Report) {
    for interchange in netex_repository.all_interchanges() {
        let from_stop_id = resolve_stop_id(netex_repository, &interchange.from_point_ref);
        let to_stop_id = resolve_stop_id(netex_repository, &interchange.to_point_ref);
        match (from_stop_id, to_stop_id) {
            (Some(from_stop_id), Some(to_stop_id)) => {
                gtfs_repository.save_transfer(producers::build_transfer(&interchange, from_stop_id, to_stop_id));
                report.mark_processed("ServiceJourneyInterchange");
            }
            _ => {
                // ServiceJourneyInterchange is in the skip whitelist (spec
                // §4.I): an unresolved interchange is dropped silently.
                debug_assert!(recovery::is_skippable("ServiceJourneyInterchange"));
                report.mark_skipped("ServiceJourneyInterchange");
            }
        }
    }
}

fn run_default_agency_stage(netex_repository: &NetexRepository, gtfs_repository: &GtfsRepository, report: &mut Report) {
    if gtfs_repository.has_agency() {
        return;
    }
    report.info(Stage::DefaultAgency, "Agency", "no agency produced, synthesizing a default one");
    gtfs_repository.save_agency(GtfsAgency {
        agency_id: "default".to_string(),
        agency_name: "Default Agency".to_string(),
        agency_url: "https://example.com".to_string(),
        agency_timezone: producers::resolve_timezone(&netex_repository.time_zone()),
        ..GtfsAgency::default()
    });
}

fn run_feed_info_stage(gtfs_repository: &GtfsRepository, config: &Configuration, report: &mut Report) {
    gtfs_repository.save_feed_info(producers::build_feed_info(&config.calendar));
    report.mark_processed("FeedInfo");
}
