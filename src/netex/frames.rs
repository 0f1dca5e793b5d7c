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

//! Frame classification (spec §4.C): `Frames` children are grouped by their
//! element name into one bucket per [`FrameType`], the same way this
//! crate's earlier NeTEx reader grouped `ResourceFrame`/`ServiceFrame`/etc.
//! before dispatching each to its own parser.

use anyhow::{bail, Result};
use minidom::Element;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// The kind of a NeTEx frame (spec §4.C's table of frame opens).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameType {
    /// `CompositeFrame`, a container of other frames.
    Composite,
    /// `ResourceFrame`: authorities, operators, networks.
    Resource,
    /// `ServiceFrame`: lines, routes, journey patterns, scheduled stop
    /// points, destination displays.
    Service,
    /// `ServiceCalendarFrame`: day types, operating days/periods, day-type
    /// assignments.
    ServiceCalendar,
    /// `TimetableFrame`: service journeys and their passing times.
    Timetable,
    /// `SiteFrame`: stop places and quays.
    Site,
    /// `GeneralFrame`: catch-all, used for e.g. comments/notices.
    General,
    /// `FareFrame`: fare products. Not projected (spec's Non-goals), but
    /// recognised so its presence doesn't surface as an unknown-frame
    /// warning.
    Fare,
}

impl fmt::Display for FrameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FrameType::Composite => "CompositeFrame",
            FrameType::Resource => "ResourceFrame",
            FrameType::Service => "ServiceFrame",
            FrameType::ServiceCalendar => "ServiceCalendarFrame",
            FrameType::Timetable => "TimetableFrame",
            FrameType::Site => "SiteFrame",
            FrameType::General => "GeneralFrame",
            FrameType::Fare => "FareFrame",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for FrameType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "CompositeFrame" => Ok(FrameType::Composite),
            "ResourceFrame" => Ok(FrameType::Resource),
            "ServiceFrame" => Ok(FrameType::Service),
            "ServiceCalendarFrame" => Ok(FrameType::ServiceCalendar),
            "TimetableFrame" => Ok(FrameType::Timetable),
            "SiteFrame" => Ok(FrameType::Site),
            "GeneralFrame" => Ok(FrameType::General),
            "FareFrame" => Ok(FrameType::Fare),
            _ => bail!("unknown frame type '{}'", s),
        }
    }
}

/// Frames grouped by type, preserving declaration order within each group.
pub type Frames<'a> = HashMap<FrameType, Vec<&'a Element>>;

/// Groups `frames`' children by [`FrameType`]. Unrecognised children (e.g.
/// a future frame kind) are skipped rather than rejected, matching spec
/// §4.C's tolerance for unknown elements at the loader boundary.
pub fn parse_frames_by_type(frames: &Element) -> Frames<'_> {
    let mut result: Frames<'_> = HashMap::new();
    for child in frames.children() {
        if let Ok(frame_type) = FrameType::from_str(child.name()) {
            result.entry(frame_type).or_default().push(child);
        }
    }
    result
}

/// Locates the `Frames` element under either accepted top-level shape
/// (spec §4.C): `PublicationDelivery > CompositeFrame > Frames` or
/// `PublicationDelivery > DataObjects > CompositeFrame > Frames`. Also
/// tolerates a root that already points at a bare `Frames`/`CompositeFrame`
/// element, which simplifies testing with small fixtures.
pub fn locate_frames(root: &Element) -> Result<&Element> {
    if root.name() == "Frames" {
        return Ok(root);
    }
    if root.name() == "CompositeFrame" {
        return locate_frames_in_composite(root);
    }
    if root.name() != "PublicationDelivery" {
        bail!("expected PublicationDelivery root, found '{}'", root.name());
    }

    let composite = root
        .get_child("CompositeFrame", root.ns())
        .or_else(|| {
            root.get_child("DataObjects", root.ns())
                .and_then(|data_objects| data_objects.get_child("CompositeFrame", data_objects.ns()))
        })
        .ok_or_else(|| anyhow::anyhow!("no CompositeFrame found under PublicationDelivery"))?;
    locate_frames_in_composite(composite)
}

fn locate_frames_in_composite(composite: &Element) -> Result<&Element> {
    composite
        .get_child("frames", composite.ns())
        .or_else(|| composite.get_child("Frames", composite.ns()))
        .ok_or_else(|| anyhow::anyhow!("no Frames found under CompositeFrame"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_type_round_trips_through_display_and_from_str() {
        for frame_type in [
            FrameType::Composite,
            FrameType::Resource,
            FrameType::Service,
            FrameType::ServiceCalendar,
            FrameType::Timetable,
            FrameType::Site,
            FrameType::General,
            FrameType::Fare,
        ] {
            assert_eq!(frame_type, FrameType::from_str(&frame_type.to_string()).unwrap());
        }
    }

    #[test]
    fn unknown_frame_type_is_an_error() {
        assert!(FrameType::from_str("BogusFrame").is_err());
    }

    #[test]
    fn parse_frames_by_type_groups_and_skips_unknown() {
        let xml = r#"<Frames>
            <ResourceFrame id="rf1"/>
            <ServiceFrame id="sf1"/>
            <ServiceFrame id="sf2"/>
            <WeirdFrame id="w1"/>
        </Frames>"#;
        let element: Element = xml.parse().unwrap();
        let frames = parse_frames_by_type(&element);
        assert_eq!(1, frames.get(&FrameType::Resource).unwrap().len());
        assert_eq!(2, frames.get(&FrameType::Service).unwrap().len());
        assert!(!frames.contains_key(&FrameType::Site));
    }

    #[test]
    fn locate_frames_accepts_data_objects_shape() {
        let xml = r#"<PublicationDelivery>
            <DataObjects>
                <CompositeFrame>
                    <frames>
                        <ResourceFrame id="rf1"/>
                    </frames>
                </CompositeFrame>
            </DataObjects>
        </PublicationDelivery>"#;
        let element: Element = xml.parse().unwrap();
        let frames = locate_frames(&element).unwrap();
        assert_eq!("frames", frames.name());
    }

    #[test]
    fn locate_frames_accepts_direct_composite_frame_shape() {
        let xml = r#"<PublicationDelivery>
            <CompositeFrame>
                <frames>
                    <ResourceFrame id="rf1"/>
                </frames>
            </CompositeFrame>
        </PublicationDelivery>"#;
        let element: Element = xml.parse().unwrap();
        assert!(locate_frames(&element).is_ok());
    }
}
