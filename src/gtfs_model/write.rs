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

//! GTFS ZIP serialization (spec §4.E, §6.2). One CSV per non-empty table,
//! written into the archive in the fixed order spec §5's "Ordering
//! guarantees" mandates, each with `\r\n` line terminators and headers
//! derived from a declared logical field-name list via
//! [`camel_to_snake`] (testable property 9).

use crate::gtfs_model::objects::Row;
use crate::gtfs_model::repository::Repository;
use crate::Result;
use anyhow::Context;
use std::io::Write;

/// Transforms a logical field name (e.g. `"FeedPublisherURL"`) into its
/// GTFS CSV header (`"feed_publisher_url"`), spec §4.E: an underscore is
/// inserted before an uppercase letter only when the preceding letter is
/// lowercase (a run of uppercase letters, e.g. an acronym, stays joined).
pub fn camel_to_snake(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() {
            if i > 0 && chars[i - 1].is_lowercase() {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

fn write_table<T: Row>(zip: &mut zip::ZipWriter<std::io::Cursor<Vec<u8>>>, file_name: &str, rows: &[T]) -> Result<()> {
    if rows.is_empty() {
        return Ok(());
    }
    tracing::info!(file_name, rows = rows.len(), "writing GTFS table");
    let options = zip::write::SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
    zip.start_file(file_name, options)
        .with_context(|| format!("could not start {file_name} in zip"))?;

    let mut writer = csv::WriterBuilder::new().terminator(csv::Terminator::CRLF).from_writer(Vec::new());
    let headers: Vec<String> = T::fields().iter().map(|f| camel_to_snake(f)).collect();
    writer.write_record(&headers)?;
    for row in rows {
        writer.write_record(row.to_record())?;
    }
    let bytes = writer.into_inner().context("could not flush csv writer")?;
    zip.write_all(&bytes).with_context(|| format!("could not write {file_name} into zip"))?;
    Ok(())
}

/// Serializes `repository` into a zipped GTFS archive (spec §4.E
/// `writeGtfs()`). File order inside the archive is fixed regardless of
/// the order entities were saved in (spec §5).
pub fn write_gtfs(repository: &Repository) -> Result<Vec<u8>> {
    let cursor = std::io::Cursor::new(Vec::new());
    let mut zip = zip::ZipWriter::new(cursor);

    write_table(&mut zip, "agency.txt", &repository.agencies())?;
    write_table(&mut zip, "stops.txt", &repository.stops())?;
    write_table(&mut zip, "routes.txt", &repository.routes())?;
    write_table(&mut zip, "trips.txt", &repository.trips())?;
    write_table(&mut zip, "stop_times.txt", &repository.stop_times())?;
    write_table(&mut zip, "calendar.txt", &repository.calendars())?;
    write_table(&mut zip, "calendar_dates.txt", &repository.calendar_dates())?;
    write_table(&mut zip, "transfers.txt", &repository.transfers())?;
    write_table(&mut zip, "shapes.txt", &repository.shape_points())?;
    write_table(&mut zip, "frequencies.txt", &repository.frequencies())?;
    write_table(&mut zip, "pathways.txt", &repository.pathways())?;
    write_table(&mut zip, "levels.txt", &repository.levels())?;
    write_table(&mut zip, "feed_info.txt", &repository.feed_infos())?;

    let cursor = zip.finish().context("could not finalize GTFS zip")?;
    Ok(cursor.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camel_to_snake_matches_spec_examples() {
        assert_eq!("feed_publisher_url", camel_to_snake("FeedPublisherURL"));
        assert_eq!("route_id", camel_to_snake("RouteID"));
        assert_eq!("agency_fare_url", camel_to_snake("AgencyFareURL"));
    }

    #[test]
    fn camel_to_snake_leaves_single_word_lowercase() {
        assert_eq!("name", camel_to_snake("Name"));
    }

    #[test]
    fn write_gtfs_produces_a_readable_zip_with_expected_tables() {
        use crate::gtfs_model::objects::Agency;

        let repository = Repository::new();
        repository.save_agency(Agency {
            agency_id: "A1".to_string(),
            agency_name: "Acme".to_string(),
            agency_url: "https://example.com".to_string(),
            agency_timezone: "UTC".to_string(),
            ..Agency::default()
        });
        let bytes = write_gtfs(&repository).unwrap();
        let mut archive = zip::ZipArchive::new(std::io::Cursor::new(bytes)).unwrap();
        let names: Vec<String> = (0..archive.len()).map(|i| archive.by_index(i).unwrap().name().to_string()).collect();
        assert_eq!(vec!["agency.txt".to_string()], names);

        let mut file = archive.by_name("agency.txt").unwrap();
        let mut content = String::new();
        std::io::Read::read_to_string(&mut file, &mut content).unwrap();
        assert!(content.starts_with("agency_id,agency_name,agency_url,agency_timezone"));
        assert!(content.contains("A1,Acme,https://example.com,UTC"));
        assert!(content.contains("\r\n"));
    }
}
