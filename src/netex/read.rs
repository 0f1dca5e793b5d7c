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

//! Streaming NeTEx loader (spec §4.C). Detects a ZIP (magic `PK\x03\x04`)
//! versus a raw XML document, fans out across `.xml` ZIP entries with
//! bounded concurrency (spec §5), and for each document locates its frames
//! and decodes the leaf entities named in spec §4.C's table straight into
//! the [`Repository`].
//!
//! Decoding one entity never aborts its file: a malformed `Line` is
//! reported and skipped, the rest of the document keeps loading. A file
//! that isn't well-formed XML at all aborts just that file, the same way
//! one corrupt member of a ZIP doesn't sink its siblings.

use crate::configuration::Configuration;
use crate::netex::frames::{locate_frames, parse_frames_by_type, FrameType};
use crate::netex::objects::*;
use crate::netex::repository::Repository;
use crate::netex::xml_utils::{centroid_of, child_ref, child_text, descendants_named, descendants_named_any, TryAttribute};
use crate::report::{Report, Stage};
use anyhow::{Context, Result};
use minidom::Element;
use std::io::{Cursor, Read as IoRead};
use std::sync::Mutex;

const ZIP_MAGIC: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];

/// Advisory heap tracker (spec §4.C's "memory governor"). It never affects
/// correctness, only how chatty the loader is about pressure between
/// documents.
struct MemoryGovernor {
    ceiling_bytes: usize,
    used_bytes: usize,
}

impl MemoryGovernor {
    fn new(ceiling_mb: usize) -> Self {
        MemoryGovernor {
            ceiling_bytes: ceiling_mb.saturating_mul(1024 * 1024),
            used_bytes: 0,
        }
    }

    /// Records `bytes` of newly-read input, returning whether the ceiling
    /// was just crossed (and resetting the counter).
    fn record(&mut self, bytes: usize) -> bool {
        self.used_bytes += bytes;
        let over_ceiling = self.used_bytes > self.ceiling_bytes;
        if over_ceiling {
            self.used_bytes = 0;
        }
        over_ceiling
    }
}

/// Loads every NeTEx document found in `input` into `repository`, recording
/// decode failures and progress into `report`. `input` is either a ZIP
/// archive or a single raw XML document (spec §6.1).
pub fn load(input: &[u8], repository: &Repository, config: &Configuration, report: &mut Report) -> Result<()> {
    if input.starts_with(&ZIP_MAGIC) {
        load_zip(input, repository, config, report)
    } else {
        let mut file_report = Report::new();
        load_document("input.xml", input, repository, &mut file_report);
        report.merge(file_report);
        Ok(())
    }
}

fn load_zip(input: &[u8], repository: &Repository, config: &Configuration, report: &mut Report) -> Result<()> {
    let cursor = Cursor::new(input);
    let mut archive = zip::ZipArchive::new(cursor).context("not a valid zip archive")?;

    let mut documents = Vec::new();
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        let name = entry.name().to_string();
        if !name.to_lowercase().ends_with(".xml") {
            continue;
        }
        let mut bytes = Vec::with_capacity(entry.size() as usize);
        entry.read_to_end(&mut bytes)?;
        documents.push((name, bytes));
    }

    if documents.is_empty() {
        report.warn(Stage::Load, "Zip", "no .xml entries found in archive");
        return Ok(());
    }

    let concurrency = config.resolved_concurrent_files().min(documents.len()).max(1);
    let governor = Mutex::new(MemoryGovernor::new(config.max_memory_mb));
    let reports: Vec<Report> = std::thread::scope(|scope| {
        let chunks = split_into_chunks(&documents, concurrency);
        let handles: Vec<_> = chunks
            .into_iter()
            .map(|chunk| {
                let governor = &governor;
                let repository = &*repository;
                scope.spawn(move || {
                    let mut local_report = Report::new();
                    for (name, bytes) in chunk {
                        load_document(name, bytes, repository, &mut local_report);
                        if governor.lock().unwrap().record(bytes.len()) {
                            local_report.info(Stage::Load, "MemoryGovernor", "advisory ceiling exceeded");
                        }
                    }
                    local_report
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for file_report in reports {
        report.merge(file_report);
    }
    Ok(())
}

fn split_into_chunks<T>(items: &[T], concurrency: usize) -> Vec<&[T]> {
    let chunk_size = items.len().div_ceil(concurrency).max(1);
    items.chunks(chunk_size).collect()
}

fn load_document(name: &str, bytes: &[u8], repository: &Repository, report: &mut Report) {
    let text = match std::str::from_utf8(bytes) {
        Ok(text) => text,
        Err(error) => {
            report.error(Stage::Load, "XmlFile", format!("{}: not valid UTF-8: {}", name, error));
            return;
        }
    };
    let root: Element = match text.parse() {
        Ok(root) => root,
        Err(error) => {
            report.error(Stage::Load, "XmlFile", format!("{}: invalid XML: {}", name, error));
            return;
        }
    };
    let frames_element = match locate_frames(&root) {
        Ok(frames_element) => frames_element,
        Err(error) => {
            report.error(Stage::Load, "XmlFile", format!("{}: {}", name, error));
            return;
        }
    };

    let frames = parse_frames_by_type(frames_element);
    for (frame_type, elements) in &frames {
        for element in elements {
            match frame_type {
                FrameType::Resource => parse_resource_frame(element, repository, report),
                FrameType::Service => parse_service_frame(element, repository, report),
                FrameType::ServiceCalendar => parse_service_calendar_frame(element, repository, report),
                FrameType::Timetable => parse_timetable_frame(element, repository, report),
                FrameType::Site => parse_site_frame(element, repository, report),
                FrameType::General | FrameType::Fare | FrameType::Composite => {
                    // Notices/comments and fare products aren't projected
                    // (non-goals); nested composite frames aren't expanded
                    // further since no fixture nests them.
                }
            }
        }
    }
}

fn parse_resource_frame(frame: &Element, repository: &Repository, report: &mut Report) {
    for element in descendants_named(frame, "Authority") {
        match build_authority(element) {
            Ok(authority) => {
                repository.save_authority(authority);
                report.mark_processed("Authority");
            }
            Err(error) => {
                report.warn(Stage::Load, "Authority", error.to_string());
                report.mark_skipped("Authority");
            }
        }
    }
}

fn build_authority(element: &Element) -> Result<Authority> {
    let id: String = element.try_attribute("id")?;
    let contact = element.get_child("ContactDetails", element.ns());
    Ok(Authority {
        id,
        name: child_text(element, "Name").unwrap_or_default(),
        short_name: child_text(element, "ShortName").unwrap_or_default(),
        url: child_text(element, "Url").unwrap_or_default(),
        phone: contact.and_then(|c| child_text(c, "Phone")).unwrap_or_default(),
        email: contact.and_then(|c| child_text(c, "Email")).unwrap_or_default(),
        contact_url: contact.and_then(|c| child_text(c, "Url")).unwrap_or_default(),
    })
}

fn parse_service_frame(frame: &Element, repository: &Repository, report: &mut Report) {
    for element in descendants_named(frame, "Network") {
        match build_network(element) {
            Ok(network) => {
                repository.save_network(network);
                report.mark_processed("Network");
            }
            Err(error) => {
                report.warn(Stage::Load, "Network", error.to_string());
                report.mark_skipped("Network");
            }
        }
    }

    for element in descendants_named(frame, "Line") {
        match build_line(element) {
            Ok(line) => {
                repository.save_line(line);
                report.mark_processed("Line");
            }
            Err(error) => {
                report.warn(Stage::Load, "Line", error.to_string());
                report.mark_skipped("Line");
            }
        }
    }

    for element in descendants_named(frame, "Route") {
        match build_route(element) {
            Ok(route) => {
                repository.save_route(route);
                report.mark_processed("Route");
            }
            Err(error) => {
                report.warn(Stage::Load, "Route", error.to_string());
                report.mark_skipped("Route");
            }
        }
    }

    for element in descendants_named_any(frame, &["JourneyPattern", "ServiceJourneyPattern"]) {
        match build_journey_pattern(element) {
            Ok(pattern) => {
                repository.save_journey_pattern_with_index(pattern);
                report.mark_processed("JourneyPattern");
            }
            Err(error) => {
                report.warn(Stage::Load, "JourneyPattern", error.to_string());
                report.mark_skipped("JourneyPattern");
            }
        }
    }

    for element in descendants_named(frame, "ScheduledStopPoint") {
        match build_scheduled_stop_point(element) {
            Ok(point) => {
                repository.bind_scheduled_stop_point(&point.id, point.quay_ref, point.stop_place_ref);
                report.mark_processed("ScheduledStopPoint");
            }
            Err(error) => {
                report.warn(Stage::Load, "ScheduledStopPoint", error.to_string());
                report.mark_skipped("ScheduledStopPoint");
            }
        }
    }

    for element in descendants_named(frame, "PassengerStopAssignment") {
        let scheduled_stop_point_ref = element
            .get_child("ScheduledStopPointRef", element.ns())
            .and_then(|c| c.attr("ref"))
            .map(|s| s.to_string());
        if let Some(scheduled_stop_point_ref) = scheduled_stop_point_ref {
            let quay_ref = child_ref(element, "QuayRef");
            let stop_place_ref = child_ref(element, "StopPlaceRef");
            repository.bind_scheduled_stop_point(&scheduled_stop_point_ref, quay_ref, stop_place_ref);
            report.mark_processed("PassengerStopAssignment");
        } else {
            report.mark_skipped("PassengerStopAssignment");
        }
    }

    for element in descendants_named(frame, "DestinationDisplay") {
        match build_destination_display(element) {
            Ok(display) => {
                repository.save_destination_display(display);
                report.mark_processed("DestinationDisplay");
            }
            Err(error) => {
                report.warn(Stage::Load, "DestinationDisplay", error.to_string());
                report.mark_skipped("DestinationDisplay");
            }
        }
    }
}

fn build_network(element: &Element) -> Result<Network> {
    let id: String = element.try_attribute("id")?;
    let authority_ref = child_ref(element, "AuthorityRef");
    let members_container = element
        .get_child("members", element.ns())
        .or_else(|| element.get_child("Members", element.ns()));
    let members = members_container
        .map(|container| {
            descendants_named(container, "LineRef")
                .into_iter()
                .filter_map(|e| e.attr("ref").map(|s| s.to_string()))
                .collect()
        })
        .unwrap_or_default();
    Ok(Network { id, authority_ref, members })
}

fn build_line(element: &Element) -> Result<Line> {
    let id: String = element.try_attribute("id")?;
    let submode = element
        .get_child("TransportSubmode", element.ns())
        .map(|e| e.text().trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_default();
    let presentation = element.get_child("Presentation", element.ns());
    Ok(Line {
        id,
        name: child_text(element, "Name").unwrap_or_default(),
        short_name: child_text(element, "ShortName").unwrap_or_default(),
        public_code: child_text(element, "PublicCode").unwrap_or_default(),
        description: child_text(element, "Description").unwrap_or_default(),
        url: child_text(element, "Url").unwrap_or_default(),
        transport_mode: child_text(element, "TransportMode").unwrap_or_default(),
        transport_submode: submode,
        authority_ref: child_ref(element, "AuthorityRef"),
        network_ref: child_ref(element, "RepresentedByGroupRef").or_else(|| child_ref(element, "NetworkRef")),
        color: presentation.and_then(|p| child_text(p, "Colour")),
        text_color: presentation.and_then(|p| child_text(p, "TextColour")),
    })
}

fn build_route(element: &Element) -> Result<Route> {
    let id: String = element.try_attribute("id")?;
    let line_ref = child_ref(element, "LineRef").ok_or_else(|| anyhow::anyhow!("Route {} missing LineRef", id))?;
    let direction = child_text(element, "DirectionType")
        .or_else(|| child_text(element, "Direction"))
        .and_then(|raw| Direction::parse(&raw));
    let points = descendants_named(element, "PointOnRoute")
        .into_iter()
        .filter_map(|e| e.attr("id").map(|s| s.to_string()))
        .collect();
    Ok(Route { id, line_ref, direction, points })
}

fn build_journey_pattern(element: &Element) -> Result<JourneyPattern> {
    let id: String = element.try_attribute("id")?;
    let route_ref = child_ref(element, "RouteRef").ok_or_else(|| anyhow::anyhow!("JourneyPattern {} missing RouteRef", id))?;
    let direction = child_text(element, "DirectionType").and_then(|raw| Direction::parse(&raw));
    let destination_display_ref = child_ref(element, "DestinationDisplayRef");

    let points = descendants_named_any(element, &["StopPointInJourneyPattern", "TimingPointInJourneyPattern"])
        .into_iter()
        .map(|point_element| {
            if point_element.name() == "StopPointInJourneyPattern" {
                JourneyPatternPoint::Stop(StopPointInJourneyPattern {
                    id: point_element.attr("id").unwrap_or_default().to_string(),
                    order: point_element.attr("order").and_then(|s| s.parse().ok()).unwrap_or(0),
                    scheduled_stop_point_ref: child_ref(point_element, "ScheduledStopPointRef").unwrap_or_default(),
                    destination_display_ref: child_ref(point_element, "DestinationDisplayRef"),
                    for_alighting: child_text(point_element, "ForAlighting").map(|s| s != "false").unwrap_or(true),
                    for_boarding: child_text(point_element, "ForBoarding").map(|s| s != "false").unwrap_or(true),
                })
            } else {
                JourneyPatternPoint::Timing(TimingPointInJourneyPattern {
                    id: point_element.attr("id").unwrap_or_default().to_string(),
                    order: point_element.attr("order").and_then(|s| s.parse().ok()).unwrap_or(0),
                })
            }
        })
        .collect();

    Ok(JourneyPattern { id, route_ref, direction, destination_display_ref, points })
}

fn build_scheduled_stop_point(element: &Element) -> Result<ScheduledStopPoint> {
    let id: String = element.try_attribute("id")?;
    Ok(ScheduledStopPoint {
        id,
        quay_ref: child_ref(element, "QuayRef"),
        stop_place_ref: child_ref(element, "StopPlaceRef"),
    })
}

fn build_destination_display(element: &Element) -> Result<DestinationDisplay> {
    let id: String = element.try_attribute("id")?;
    let vias = descendants_named(element, "Via")
        .into_iter()
        .filter_map(|e| e.attr("ref").map(|s| s.to_string()))
        .collect();
    Ok(DestinationDisplay {
        id,
        front_text: child_text(element, "FrontText").unwrap_or_default(),
        side_text: child_text(element, "SideText").unwrap_or_default(),
        vias,
    })
}

fn parse_service_calendar_frame(frame: &Element, repository: &Repository, report: &mut Report) {
    for element in descendants_named(frame, "DayType") {
        match build_day_type(element) {
            Ok(day_type) => {
                repository.save_day_type(day_type);
                report.mark_processed("DayType");
            }
            Err(error) => {
                report.warn(Stage::Load, "DayType", error.to_string());
                report.mark_skipped("DayType");
            }
        }
    }

    for element in descendants_named(frame, "OperatingDay") {
        match build_operating_day(element) {
            Ok(day) => {
                repository.save_operating_day(day);
                report.mark_processed("OperatingDay");
            }
            Err(error) => {
                report.warn(Stage::Load, "OperatingDay", error.to_string());
                report.mark_skipped("OperatingDay");
            }
        }
    }

    for element in descendants_named(frame, "OperatingPeriod") {
        match build_operating_period(element) {
            Ok(period) => {
                repository.save_operating_period(period);
                report.mark_processed("OperatingPeriod");
            }
            Err(error) => {
                report.warn(Stage::Load, "OperatingPeriod", error.to_string());
                report.mark_skipped("OperatingPeriod");
            }
        }
    }

    for element in descendants_named(frame, "DayTypeAssignment") {
        match build_day_type_assignment(element) {
            Ok(assignment) => {
                if assignment.operating_period_ref.is_some() && assignment.operating_day_ref.is_none() {
                    report.info(
                        Stage::Load,
                        "DayTypeAssignment",
                        format!("{}: OperatingPeriod expansion not materialized into individual dates", assignment.id),
                    );
                }
                repository.save_day_type_assignment(assignment);
                report.mark_processed("DayTypeAssignment");
            }
            Err(error) => {
                report.warn(Stage::Load, "DayTypeAssignment", error.to_string());
                report.mark_skipped("DayTypeAssignment");
            }
        }
    }
}

fn build_day_type(element: &Element) -> Result<DayType> {
    let id: String = element.try_attribute("id")?;
    let days_of_week = element
        .get_child("properties", element.ns())
        .or_else(|| element.get_child("Properties", element.ns()))
        .map(|properties| {
            descendants_named(properties, "DaysOfWeek")
                .into_iter()
                .flat_map(|e| e.text().split_whitespace().map(|s| s.to_string()).collect::<Vec<_>>())
                .collect()
        })
        .unwrap_or_default();
    Ok(DayType { id, days_of_week })
}

fn build_operating_day(element: &Element) -> Result<OperatingDay> {
    let id: String = element.try_attribute("id")?;
    let calendar_date = child_text(element, "CalendarDate").ok_or_else(|| anyhow::anyhow!("OperatingDay {} missing CalendarDate", id))?;
    Ok(OperatingDay { id, calendar_date })
}

fn build_operating_period(element: &Element) -> Result<OperatingPeriod> {
    let id: String = element.try_attribute("id")?;
    let from_date = child_text(element, "FromDate").unwrap_or_default();
    let to_date = child_text(element, "ToDate").unwrap_or_default();
    Ok(OperatingPeriod { id, from_date, to_date })
}

fn build_day_type_assignment(element: &Element) -> Result<DayTypeAssignment> {
    let id: String = element.try_attribute("id")?;
    let day_type_ref = child_ref(element, "DayTypeRef").ok_or_else(|| anyhow::anyhow!("DayTypeAssignment {} missing DayTypeRef", id))?;
    let is_available = child_text(element, "isAvailable")
        .or_else(|| child_text(element, "IsAvailable"))
        .map(|s| s.eq_ignore_ascii_case("true"))
        .unwrap_or(true);
    Ok(DayTypeAssignment {
        id,
        day_type_ref,
        operating_day_ref: child_ref(element, "OperatingDayRef"),
        operating_period_ref: child_ref(element, "OperatingPeriodRef"),
        is_available,
    })
}

fn parse_timetable_frame(frame: &Element, repository: &Repository, report: &mut Report) {
    for element in descendants_named(frame, "ServiceJourney") {
        match build_service_journey(element) {
            Ok(journey) => {
                repository.save_service_journey_with_index(journey);
                report.mark_processed("ServiceJourney");
            }
            Err(error) => {
                report.warn(Stage::Load, "ServiceJourney", error.to_string());
                report.mark_skipped("ServiceJourney");
            }
        }
    }

    for element in descendants_named(frame, "DatedServiceJourney") {
        let id: Option<String> = element.try_attribute("id").ok();
        let service_journey_ref = child_ref(element, "ServiceJourneyRef");
        match (id, service_journey_ref) {
            (Some(id), Some(service_journey_ref)) => {
                repository.save_dated_service_journey(&id, &service_journey_ref);
                report.mark_processed("DatedServiceJourney");
            }
            _ => report.mark_skipped("DatedServiceJourney"),
        }
    }

    for element in descendants_named(frame, "ServiceJourneyInterchange") {
        match build_interchange(element) {
            Ok(interchange) => {
                repository.save_interchange(interchange);
                report.mark_processed("ServiceJourneyInterchange");
            }
            Err(error) => {
                report.warn(Stage::Load, "ServiceJourneyInterchange", error.to_string());
                report.mark_skipped("ServiceJourneyInterchange");
            }
        }
    }
}

fn build_service_journey(element: &Element) -> Result<ServiceJourney> {
    let id: String = element.try_attribute("id")?;
    let journey_pattern_ref = child_ref(element, "JourneyPatternRef")
        .or_else(|| child_ref(element, "ServiceJourneyPatternRef"))
        .ok_or_else(|| anyhow::anyhow!("ServiceJourney {} missing JourneyPatternRef", id))?;
    let line_ref = child_ref(element, "LineRef");
    let day_type_refs = element
        .get_child("dayTypes", element.ns())
        .or_else(|| element.get_child("DayTypes", element.ns()))
        .map(|container| {
            descendants_named(container, "DayTypeRef")
                .into_iter()
                .filter_map(|e| e.attr("ref").map(|s| s.to_string()))
                .collect()
        })
        .unwrap_or_default();
    let service_alteration = child_text(element, "ServiceAlteration")
        .map(|raw| ServiceAlteration::parse(&raw))
        .unwrap_or_default();

    let passing_times_container = element
        .get_child("passingTimes", element.ns())
        .or_else(|| element.get_child("PassingTimes", element.ns()));
    let passing_times = passing_times_container
        .map(|container| {
            descendants_named(container, "TimetabledPassingTime")
                .into_iter()
                .map(build_passing_time)
                .collect()
        })
        .unwrap_or_default();

    Ok(ServiceJourney {
        id,
        journey_pattern_ref,
        line_ref,
        day_type_refs,
        service_alteration,
        passing_times,
    })
}

fn build_passing_time(element: &Element) -> TimetabledPassingTime {
    TimetabledPassingTime {
        id: element.attr("id").unwrap_or_default().to_string(),
        point_in_journey_pattern_ref: child_ref(element, "StopPointInJourneyPatternRef")
            .or_else(|| child_ref(element, "PointInJourneyPatternRef"))
            .unwrap_or_default(),
        arrival_time: child_text(element, "ArrivalTime"),
        arrival_day_offset: child_text(element, "ArrivalDayOffset").and_then(|s| s.parse().ok()).unwrap_or(0),
        departure_time: child_text(element, "DepartureTime"),
        departure_day_offset: child_text(element, "DepartureDayOffset").and_then(|s| s.parse().ok()).unwrap_or(0),
    }
}

fn build_interchange(element: &Element) -> Result<ServiceJourneyInterchange> {
    let id: String = element.try_attribute("id")?;
    Ok(ServiceJourneyInterchange {
        id: id.clone(),
        from_journey_ref: child_ref(element, "FromJourneyRef").ok_or_else(|| anyhow::anyhow!("{} missing FromJourneyRef", id))?,
        to_journey_ref: child_ref(element, "ToJourneyRef").ok_or_else(|| anyhow::anyhow!("{} missing ToJourneyRef", id))?,
        from_point_ref: child_ref(element, "FromPointRef").unwrap_or_default(),
        to_point_ref: child_ref(element, "ToPointRef").unwrap_or_default(),
        stay_seated: child_text(element, "StaySeated").map(|s| s.eq_ignore_ascii_case("true")).unwrap_or(false),
        guaranteed: child_text(element, "Guaranteed").map(|s| s.eq_ignore_ascii_case("true")).unwrap_or(false),
        minimum_transfer_time: child_text(element, "MinimumTransferTime"),
        priority: child_text(element, "Priority").and_then(|s| s.parse().ok()),
    })
}

fn parse_site_frame(frame: &Element, repository: &Repository, report: &mut Report) {
    for element in descendants_named(frame, "StopPlace") {
        let quays_container = element
            .get_child("quays", element.ns())
            .or_else(|| element.get_child("Quays", element.ns()));
        let quay_elements: Vec<&Element> = quays_container
            .map(|c| c.children().filter(|e| e.name() == "Quay").collect())
            .unwrap_or_default();
        let quay_ids: Vec<String> = quay_elements.iter().filter_map(|e| e.attr("id").map(|s| s.to_string())).collect();

        match build_stop_place(element, quay_ids) {
            Ok(stop_place) => {
                repository.save_stop_place(stop_place);
                report.mark_processed("StopPlace");
            }
            Err(error) => {
                report.warn(Stage::Load, "StopPlace", error.to_string());
                report.mark_skipped("StopPlace");
            }
        }

        for quay_element in quay_elements {
            match build_quay(quay_element) {
                Ok(quay) => {
                    repository.save_quay(quay);
                    report.mark_processed("Quay");
                }
                Err(error) => {
                    report.warn(Stage::Load, "Quay", error.to_string());
                    report.mark_skipped("Quay");
                }
            }
        }
    }

    // Quays declared at the top level of a SiteFrame, outside any StopPlace.
    for element in frame.children().filter(|e| e.name() == "Quay") {
        match build_quay(element) {
            Ok(quay) => {
                repository.save_quay(quay);
                report.mark_processed("Quay");
            }
            Err(error) => {
                report.warn(Stage::Load, "Quay", error.to_string());
                report.mark_skipped("Quay");
            }
        }
    }
}

fn build_stop_place(element: &Element, quays: Vec<String>) -> Result<StopPlace> {
    let id: String = element.try_attribute("id")?;
    Ok(StopPlace {
        id,
        name: child_text(element, "Name").unwrap_or_default(),
        short_name: child_text(element, "ShortName").unwrap_or_default(),
        centroid: centroid_of(element),
        transport_mode: child_text(element, "TransportMode").unwrap_or_default(),
        accessibility: build_accessibility(element),
        quays,
    })
}

fn build_quay(element: &Element) -> Result<Quay> {
    let id: String = element.try_attribute("id")?;
    Ok(Quay {
        id,
        name: child_text(element, "Name").unwrap_or_default(),
        short_name: child_text(element, "ShortName").unwrap_or_default(),
        public_code: child_text(element, "PublicCode").unwrap_or_default(),
        centroid: centroid_of(element),
        accessibility: build_accessibility(element),
        parent_stop_place_id: None,
    })
}

fn build_accessibility(element: &Element) -> Accessibility {
    let wheelchair_accessible = element
        .get_child("AccessibilityAssessment", element.ns())
        .and_then(|a| a.get_child("limitations", a.ns()).or_else(|| a.get_child("Limitations", a.ns())))
        .and_then(|limitations| limitations.get_child("AccessibilityLimitation", limitations.ns()))
        .and_then(|limitation| child_text(limitation, "WheelchairAccess"))
        .map(|s| s.eq_ignore_ascii_case("true"))
        .unwrap_or(false);
    Accessibility { wheelchair_accessible }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::configuration::Configuration;

    fn sample_xml() -> &'static str {
        r#"<PublicationDelivery>
          <DataObjects>
            <CompositeFrame>
              <frames>
                <ResourceFrame>
                  <organisations>
                    <Authority id="A1">
                      <Name>Acme</Name>
                    </Authority>
                  </organisations>
                </ResourceFrame>
                <ServiceFrame>
                  <lines>
                    <Line id="L1">
                      <Name>Line One</Name>
                      <TransportMode>bus</TransportMode>
                      <AuthorityRef ref="A1"/>
                    </Line>
                  </lines>
                  <routes>
                    <Route id="R1">
                      <LineRef ref="L1"/>
                      <DirectionType>outbound</DirectionType>
                    </Route>
                  </routes>
                  <journeyPatterns>
                    <JourneyPattern id="JP1">
                      <RouteRef ref="R1"/>
                      <pointsInSequence>
                        <StopPointInJourneyPattern id="JP1-1" order="1">
                          <ScheduledStopPointRef ref="SSP1"/>
                        </StopPointInJourneyPattern>
                        <StopPointInJourneyPattern id="JP1-2" order="2">
                          <ScheduledStopPointRef ref="SSP2"/>
                        </StopPointInJourneyPattern>
                      </pointsInSequence>
                    </JourneyPattern>
                  </journeyPatterns>
                  <scheduledStopPoints>
                    <ScheduledStopPoint id="SSP1"><QuayRef ref="Q1"/></ScheduledStopPoint>
                    <ScheduledStopPoint id="SSP2"><QuayRef ref="Q2"/></ScheduledStopPoint>
                  </scheduledStopPoints>
                </ServiceFrame>
                <SiteFrame>
                  <stopPlaces>
                    <StopPlace id="SP1">
                      <Name>Central Station</Name>
                      <quays>
                        <Quay id="Q1">
                          <Centroid><Location><Longitude>10.75</Longitude><Latitude>59.91</Latitude></Location></Centroid>
                        </Quay>
                        <Quay id="Q2">
                          <Centroid><Location><Longitude>10.76</Longitude><Latitude>59.92</Latitude></Location></Centroid>
                        </Quay>
                      </quays>
                    </StopPlace>
                  </stopPlaces>
                </SiteFrame>
                <TimetableFrame>
                  <vehicleJourneys>
                    <ServiceJourney id="SJ1">
                      <JourneyPatternRef ref="JP1"/>
                      <passingTimes>
                        <TimetabledPassingTime id="SJ1-1">
                          <StopPointInJourneyPatternRef ref="JP1-1"/>
                          <DepartureTime>08:00:00</DepartureTime>
                        </TimetabledPassingTime>
                        <TimetabledPassingTime id="SJ1-2">
                          <StopPointInJourneyPatternRef ref="JP1-2"/>
                          <ArrivalTime>08:10:00</ArrivalTime>
                        </TimetabledPassingTime>
                      </passingTimes>
                    </ServiceJourney>
                  </vehicleJourneys>
                </TimetableFrame>
              </frames>
            </CompositeFrame>
          </DataObjects>
        </PublicationDelivery>"#
    }

    #[test]
    fn load_raw_xml_populates_repository() {
        let repository = Repository::new();
        let config = Configuration::new("N");
        let mut report = Report::new();
        load(sample_xml().as_bytes(), &repository, &config, &mut report).unwrap();

        assert_eq!(1, repository.authority_count());
        assert_eq!(1, repository.line_count());
        assert_eq!(1, repository.service_journey_count());
        assert_eq!(2, repository.quay_count());
        assert_eq!(1, repository.stop_place_count());

        let line = repository.line("L1").unwrap();
        assert_eq!("A1", repository.authority_id_for_line(&line));

        let journey = repository.service_journey("SJ1").unwrap();
        assert_eq!(2, journey.passing_times.len());

        let ssp1 = repository.scheduled_stop_point("SSP1").unwrap();
        assert_eq!(Some("Q1".to_string()), ssp1.quay_ref);

        let q1 = repository.quay("Q1").unwrap();
        assert_eq!(Some("SP1".to_string()), q1.parent_stop_place_id);
        assert_eq!(Some(59.91), q1.centroid.map(|c| c.lat));
    }

    #[test]
    fn load_zip_reads_xml_entries_and_skips_others() {
        let mut zip_bytes = Vec::new();
        {
            let cursor = Cursor::new(&mut zip_bytes);
            let mut writer = zip::ZipWriter::new(cursor);
            let options = zip::write::SimpleFileOptions::default();
            writer.start_file("data.xml", options).unwrap();
            use std::io::Write;
            writer.write_all(sample_xml().as_bytes()).unwrap();
            writer.start_file("readme.txt", options).unwrap();
            writer.write_all(b"not xml").unwrap();
            writer.finish().unwrap();
        }

        let repository = Repository::new();
        let config = Configuration::new("N");
        let mut report = Report::new();
        load(&zip_bytes, &repository, &config, &mut report).unwrap();
        assert_eq!(1, repository.authority_count());
    }

    #[test]
    fn malformed_xml_file_is_reported_not_fatal() {
        let repository = Repository::new();
        let config = Configuration::new("N");
        let mut report = Report::new();
        load(b"<notclosed>", &repository, &config, &mut report).unwrap();
        assert!(repository.is_empty());
        assert!(!report.finish(std::time::Duration::default()).errors.is_empty());
    }

    #[test]
    fn memory_governor_resets_after_tripping() {
        let mut governor = MemoryGovernor::new(0);
        assert!(governor.record(1));
        assert_eq!(0, governor.used_bytes);
    }
}
