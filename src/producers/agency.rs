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

//! Agency ← Authority (spec §4.F).

use super::first_non_empty;
use crate::gtfs_model::objects::Agency;
use crate::netex::objects::Authority;
use std::str::FromStr;

/// Validates `raw` as an IANA timezone name via `chrono_tz::Tz`, falling
/// back to the field-default `"UTC"` (spec §4.I's fixed `agency_timezone`
/// default) when it's empty or not a recognised zone.
pub(crate) fn resolve_timezone(raw: &str) -> String {
    if raw.is_empty() {
        return "UTC".to_string();
    }
    match chrono_tz::Tz::from_str(raw) {
        Ok(zone) => zone.name().to_string(),
        Err(_) => "UTC".to_string(),
    }
}

/// Projects an Authority into a GTFS Agency. `time_zone` is the repository's
/// resolved default (spec §4.D `timeZone()`).
pub fn build_agency(authority: &Authority, time_zone: &str) -> Agency {
    let agency_name = first_non_empty(&[&authority.name, &authority.short_name])
        .unwrap_or("Unknown Agency")
        .to_string();
    let agency_url = first_non_empty(&[&authority.contact_url, &authority.url])
        .unwrap_or("https://example.com")
        .to_string();
    let agency_timezone = resolve_timezone(time_zone);

    Agency {
        agency_id: authority.id.clone(),
        agency_name,
        agency_url,
        agency_timezone,
        agency_lang: None,
        agency_phone: if authority.phone.is_empty() { None } else { Some(authority.phone.clone()) },
        agency_fare_url: None,
        agency_email: if authority.email.is_empty() { None } else { Some(authority.email.clone()) },
    }
}
