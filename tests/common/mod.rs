//! Shared helpers for the integration tests under `tests/`: reading a named
//! entry out of the ZIP `convert()` returns, as plain UTF-8 text.

use std::io::{Cursor, Read};

/// Reads `file_name` out of a GTFS ZIP produced by
/// [`netex_gtfs_converter::convert`], panicking if it isn't present.
pub fn zip_entry_text(zip_bytes: &[u8], file_name: &str) -> String {
    let mut archive = zip::ZipArchive::new(Cursor::new(zip_bytes)).expect("valid zip archive");
    let mut entry = archive.by_name(file_name).unwrap_or_else(|_| panic!("{file_name} missing from output zip"));
    let mut contents = String::new();
    entry.read_to_string(&mut contents).expect("utf8 csv contents");
    contents
}

/// The names of every entry in the ZIP, in archive order.
pub fn zip_entry_names(zip_bytes: &[u8]) -> Vec<String> {
    let mut archive = zip::ZipArchive::new(Cursor::new(zip_bytes)).expect("valid zip archive");
    (0..archive.len()).map(|i| archive.by_index(i).unwrap().name().to_string()).collect()
}

/// Parses a GTFS CSV table's text into header-keyed rows, the way a test
/// asserting on a handful of columns wants it (full `csv::Reader` headers
/// access would otherwise force every assertion to track column indices).
pub fn csv_rows(csv_text: &str) -> Vec<std::collections::HashMap<String, String>> {
    let mut reader = csv::ReaderBuilder::new().from_reader(csv_text.as_bytes());
    let headers: Vec<String> = reader.headers().expect("csv headers").iter().map(|h| h.to_string()).collect();
    reader
        .records()
        .map(|record| {
            let record = record.expect("valid csv record");
            headers.iter().cloned().zip(record.iter().map(|s| s.to_string())).collect()
        })
        .collect()
}
