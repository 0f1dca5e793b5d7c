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

//! Recovery layer (spec §4.I): a fixed field-default table, a skip-entity
//! whitelist, and a validate-and-recover helper the producers and
//! orchestrator call on entity-level failures.

use crate::report::{Report, ReportRecord, Severity, Stage};
use lazy_static::lazy_static;
use std::collections::{HashMap, HashSet};

lazy_static! {
    static ref FIELD_DEFAULTS: HashMap<&'static str, &'static str> = {
        let mut defaults = HashMap::new();
        defaults.insert("agency_name", "Unknown Agency");
        defaults.insert("agency_timezone", "UTC");
        defaults.insert("route_type", "3");
        defaults.insert("trip_id", "unknown");
        defaults.insert("stop_name", "Unknown Stop");
        defaults
    };
    static ref SKIP_WHITELIST: HashSet<&'static str> = {
        let mut whitelist = HashSet::new();
        whitelist.insert("ServiceJourneyInterchange");
        whitelist.insert("DestinationDisplay");
        whitelist.insert("DayTypeAssignment");
        whitelist
    };
}

/// Looks up the fixed default for a field name (spec §4.I). Returns `None`
/// for any field not in the table — such fields have no unambiguous
/// default and must be handled by dropping the record (scenario S6).
pub fn default_for_field(field: &str) -> Option<&'static str> {
    FIELD_DEFAULTS.get(field).copied()
}

/// Whether entities of this kind may be silently dropped rather than
/// recorded as an error (spec §4.I).
pub fn is_skippable(entity_kind: &str) -> bool {
    SKIP_WHITELIST.contains(entity_kind)
}

/// Runs `validate`; if it fails, runs `recover` and re-validates once more,
/// reporting success as a WARNING or final failure as an ERROR (spec §4.I
/// "validate-and-recover helper"). Returns whether `entity` ended up valid.
pub fn validate_and_recover<T>(
    report: &mut Report,
    stage: Stage,
    entity_kind: &str,
    entity_id: &str,
    entity: &mut T,
    validate: impl Fn(&T) -> bool,
    recover: impl FnOnce(&mut T),
) -> bool {
    if validate(entity) {
        return true;
    }
    recover(entity);
    if validate(entity) {
        report.add(
            ReportRecord::new(
                Severity::Warning,
                stage,
                entity_kind,
                format!("{entity_id}: recovered using a field default"),
            )
            .with_entity_id(entity_id),
        );
        true
    } else {
        report.add(
            ReportRecord::new(
                Severity::Error,
                stage,
                entity_kind,
                format!("{entity_id}: could not be recovered"),
            )
            .with_entity_id(entity_id),
        );
        false
    }
}

/// Whether the orchestrator should keep processing entities of this kind,
/// given `continueOnError`/`maxErrorsPerEntityKind` (spec §4.I). Once the
/// per-kind cap is hit, further entities of that kind are skipped but the
/// pipeline stays alive.
pub fn should_continue_for_kind(report: &Report, entity_kind: &str, continue_on_error: bool, max_errors_per_kind: usize) -> bool {
    continue_on_error && report.error_count_for_kind(entity_kind) < max_errors_per_kind
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_for_field_covers_the_fixed_table() {
        assert_eq!(Some("Unknown Agency"), default_for_field("agency_name"));
        assert_eq!(Some("UTC"), default_for_field("agency_timezone"));
        assert_eq!(Some("3"), default_for_field("route_type"));
        assert_eq!(Some("unknown"), default_for_field("trip_id"));
        assert_eq!(Some("Unknown Stop"), default_for_field("stop_name"));
    }

    #[test]
    fn default_for_field_is_none_for_unlisted_fields() {
        assert_eq!(None, default_for_field("route_short_name"));
    }

    #[test]
    fn is_skippable_covers_the_whitelist() {
        assert!(is_skippable("ServiceJourneyInterchange"));
        assert!(is_skippable("DestinationDisplay"));
        assert!(is_skippable("DayTypeAssignment"));
        assert!(!is_skippable("Line"));
    }

    #[test]
    fn validate_and_recover_reports_warning_on_successful_recovery() {
        let mut report = Report::new();
        let mut name = String::new();
        let recovered = validate_and_recover(
            &mut report,
            Stage::Agencies,
            "Authority",
            "A1",
            &mut name,
            |n: &String| !n.is_empty(),
            |n: &mut String| *n = "Unknown Agency".to_string(),
        );
        assert!(recovered);
        assert_eq!("Unknown Agency", name);
        let result = report.finish(std::time::Duration::from_secs(0));
        assert_eq!(1, result.warnings.len());
        assert!(result.errors.is_empty());
    }

    #[test]
    fn validate_and_recover_reports_error_when_recovery_fails() {
        let mut report = Report::new();
        let mut name = String::new();
        let recovered = validate_and_recover(
            &mut report,
            Stage::Routes,
            "Line",
            "L1",
            &mut name,
            |n: &String| !n.is_empty(),
            |_n: &mut String| {},
        );
        assert!(!recovered);
        let result = report.finish(std::time::Duration::from_secs(0));
        assert_eq!(1, result.errors.len());
    }

    #[test]
    fn should_continue_for_kind_respects_cap_and_flag() {
        let mut report = Report::new();
        report.error(Stage::Services, "ServiceJourney", "one");
        assert!(should_continue_for_kind(&report, "ServiceJourney", true, 10));
        assert!(!should_continue_for_kind(&report, "ServiceJourney", true, 1));
        assert!(!should_continue_for_kind(&report, "ServiceJourney", false, 10));
    }
}
