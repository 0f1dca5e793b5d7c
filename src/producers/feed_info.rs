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

//! FeedInfo, statically defaulted (spec §4.F).

use crate::configuration::CalendarConfiguration;
use crate::gtfs_model::objects::FeedInfo;

/// Builds the singleton FeedInfo row, using the configured calendar window
/// as the feed's date range (spec §4.F "Static defaults").
pub fn build_feed_info(calendar: &CalendarConfiguration) -> FeedInfo {
    FeedInfo {
        feed_publisher_name: "NeTEx GTFS Converter".to_string(),
        feed_publisher_url: "https://example.com".to_string(),
        feed_lang: "en".to_string(),
        feed_start_date: Some(calendar.default_start),
        feed_end_date: Some(calendar.default_end),
        feed_version: "1.0.0".to_string(),
        feed_contact_email: None,
        feed_contact_url: None,
    }
}
