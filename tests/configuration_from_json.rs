//! spec §6.3: `Configuration` loads from a JSON file, with every field not
//! present in the file falling back to its documented default.

use netex_gtfs_converter::Configuration;
use std::io::Write;

#[test]
fn partial_json_merges_with_documented_defaults() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    write!(
        file,
        r#"{{
            "codespace": "ACME",
            "timezone_default": "America/New_York",
            "shape": {{ "interpolation_m": 25.0 }}
        }}"#
    )
    .unwrap();

    let config = Configuration::from_path(file.path()).expect("valid configuration json");
    assert_eq!("ACME", config.codespace);
    assert_eq!("America/New_York", config.timezone_default);
    assert_eq!(25.0, config.shape.interpolation_m);
    // Untouched by the file, still the documented defaults.
    assert_eq!(1000, config.shape.max_points);
    assert_eq!(10, config.recovery.max_errors_per_kind);
    assert!(config.recovery.continue_on_error);
    assert_eq!(20_240_101, config.calendar.default_start);

    assert!(config.validate().is_ok());
}

#[test]
fn missing_file_is_an_error_not_a_panic() {
    let result = Configuration::from_path("/no/such/path/conversion.json");
    assert!(result.is_err());
}
