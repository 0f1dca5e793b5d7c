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

//! Route ← Line (spec §4.F). Unlike the other producers this one can
//! legitimately produce nothing: a Line with every name field empty has no
//! unambiguous short/long name to default to, so the caller must drop the
//! Route (and, transitively, any ServiceJourney referencing its Line —
//! scenario S6).

use super::first_non_empty;
use crate::netex::objects::Line;
use crate::gtfs_model::objects::Route;
use crate::route_type::route_type;

fn first_numeric_token(text: &str) -> Option<String> {
    text.split_whitespace()
        .find(|token| !token.is_empty() && token.chars().all(|c| c.is_ascii_digit()))
        .map(|token| token.to_string())
}

/// Projects a Line into a GTFS Route. `agency_id` is the authority id
/// already resolved by the caller via `repo.authorityIdForLine` (spec
/// §4.D). Returns `None` when the Line has no usable name at all.
pub fn build_route(line: &Line, agency_id: Option<String>, basic_types: bool) -> Option<Route> {
    let long_name = line.name.clone();
    let mut short_name = first_non_empty(&[&line.public_code, &line.short_name]).map(|s| s.to_string());

    if short_name.as_deref() == Some(long_name.as_str()) {
        short_name = first_numeric_token(&long_name);
    }
    if short_name.as_deref() == Some(long_name.as_str()) {
        short_name = None;
    }

    if short_name.is_none() && long_name.is_empty() {
        return None;
    }

    let route_type = route_type(&line.transport_mode, &line.transport_submode, basic_types);

    Some(Route {
        route_id: line.id.clone(),
        agency_id,
        route_short_name: short_name,
        route_long_name: if long_name.is_empty() { None } else { Some(long_name) },
        route_desc: if line.description.is_empty() { None } else { Some(line.description.clone()) },
        route_type,
        route_url: if line.url.is_empty() { None } else { Some(line.url.clone()) },
        route_color: line.color.clone(),
        route_text_color: line.text_color.clone(),
        route_sort_order: None,
        continuous_pickup: None,
        continuous_drop_off: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line() -> Line {
        Line {
            id: "L1".to_string(),
            name: "Line One".to_string(),
            short_name: String::new(),
            public_code: String::new(),
            description: String::new(),
            url: String::new(),
            transport_mode: "bus".to_string(),
            transport_submode: String::new(),
            authority_ref: None,
            network_ref: None,
            color: None,
            text_color: None,
        }
    }

    #[test]
    fn prefers_public_code_over_short_name() {
        let mut line = line();
        line.public_code = "1".to_string();
        line.short_name = "One".to_string();
        let route = build_route(&line, Some("A1".to_string()), false).unwrap();
        assert_eq!(Some("1".to_string()), route.route_short_name);
        assert_eq!(Some("Line One".to_string()), route.route_long_name);
        assert_eq!(3, route.route_type);
    }

    #[test]
    fn extracts_numeric_token_when_short_equals_long() {
        let mut line = line();
        line.name = "Ligne 1 Centre".to_string();
        line.public_code = "Ligne 1 Centre".to_string();
        let route = build_route(&line, None, false).unwrap();
        assert_eq!(Some("1".to_string()), route.route_short_name);
    }

    #[test]
    fn clears_short_name_when_it_duplicates_long_name_and_no_numeric_token() {
        let mut line = line();
        line.name = "Acme Line".to_string();
        line.public_code = "Acme Line".to_string();
        let route = build_route(&line, None, false).unwrap();
        assert_eq!(None, route.route_short_name);
    }

    #[test]
    fn returns_none_when_every_name_field_is_empty() {
        let mut line = line();
        line.name = String::new();
        line.short_name = String::new();
        line.public_code = String::new();
        assert!(build_route(&line, None, false).is_none());
    }

    #[test]
    fn basic_types_flag_forces_basic_route_type() {
        let line = line();
        let route = build_route(&line, None, true).unwrap();
        assert_eq!(3, route.route_type);
    }
}
