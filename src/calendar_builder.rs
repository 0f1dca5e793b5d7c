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

//! Calendar builder (spec §4.H): projects a ServiceJourney's `dayTypeRefs`
//! into a GTFS [`Calendar`] (weekday OR-merge) and its [`CalendarDate`]
//! exceptions (from `dayTypeAssignmentsByDayType`).

use crate::configuration::CalendarConfiguration;
use crate::gtfs_model::objects::{Calendar, CalendarDate};
use crate::netex::Repository as NetexRepository;

/// Weekday flags, in `Calendar` field order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Weekdays {
    monday: bool,
    tuesday: bool,
    wednesday: bool,
    thursday: bool,
    friday: bool,
    saturday: bool,
    sunday: bool,
}

impl Weekdays {
    fn all() -> Self {
        Weekdays {
            monday: true,
            tuesday: true,
            wednesday: true,
            thursday: true,
            friday: true,
            saturday: true,
            sunday: true,
        }
    }

    fn or_merge(&mut self, other: Weekdays) {
        self.monday |= other.monday;
        self.tuesday |= other.tuesday;
        self.wednesday |= other.wednesday;
        self.thursday |= other.thursday;
        self.friday |= other.friday;
        self.saturday |= other.saturday;
        self.sunday |= other.sunday;
    }

    fn any(&self) -> bool {
        self.monday || self.tuesday || self.wednesday || self.thursday || self.friday || self.saturday || self.sunday
    }

    fn set_token(&mut self, token: &str) {
        match token.to_lowercase().as_str() {
            "monday" | "1" => self.monday = true,
            "tuesday" | "2" => self.tuesday = true,
            "wednesday" | "3" => self.wednesday = true,
            "thursday" | "4" => self.thursday = true,
            "friday" | "5" => self.friday = true,
            "saturday" | "6" => self.saturday = true,
            "sunday" | "7" => self.sunday = true,
            "weekdays" => {
                self.monday = true;
                self.tuesday = true;
                self.wednesday = true;
                self.thursday = true;
                self.friday = true;
            }
            "weekend" => {
                self.saturday = true;
                self.sunday = true;
            }
            "daily" | "everyday" => *self = Weekdays::all(),
            _ => {}
        }
    }
}

/// OR-merges the raw `DaysOfWeek` tokens of a single DayType (spec §4.H).
fn weekdays_for_tokens(tokens: &[String]) -> Weekdays {
    let mut weekdays = Weekdays::default();
    for token in tokens {
        weekdays.set_token(token);
    }
    weekdays
}

/// Normalizes an OperatingDay's `calendar_date` (`YYYY-MM-DD` or
/// `YYYY/MM/DD`) into GTFS's `YYYYMMDD`.
fn normalize_date(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Builds a [`Calendar`] row by OR-merging the weekday flags of every
/// DayType referenced by `day_type_refs` (spec §4.H). Unresolvable DayType
/// refs contribute no flags. If the merge leaves every flag false, the
/// result is promoted to all-days-true (the documented compatibility
/// default).
pub fn build_calendar(
    repo: &NetexRepository,
    day_type_refs: &[String],
    service_id: impl Into<String>,
    config: &CalendarConfiguration,
) -> Calendar {
    let mut weekdays = Weekdays::default();
    for day_type_ref in day_type_refs {
        if let Some(day_type) = repo.day_type(day_type_ref) {
            weekdays.or_merge(weekdays_for_tokens(&day_type.days_of_week));
        }
    }
    if !weekdays.any() {
        weekdays = Weekdays::all();
    }
    Calendar {
        service_id: service_id.into(),
        monday: weekdays.monday,
        tuesday: weekdays.tuesday,
        wednesday: weekdays.wednesday,
        thursday: weekdays.thursday,
        friday: weekdays.friday,
        saturday: weekdays.saturday,
        sunday: weekdays.sunday,
        start_date: config.default_start,
        end_date: config.default_end,
    }
}

/// Builds the [`CalendarDate`] exceptions for `day_type_refs` (spec §4.F/H):
/// one row per DayTypeAssignment that carries an `operating_day_ref`.
/// Assignments with only an `operating_period_ref` are not expanded (spec
/// §9; the loader already logs an INFO record for each one).
pub fn build_calendar_dates(repo: &NetexRepository, day_type_refs: &[String], service_id: impl Into<String>) -> Vec<CalendarDate> {
    let service_id = service_id.into();
    let mut dates = Vec::new();
    for day_type_ref in day_type_refs {
        for assignment in repo.day_type_assignments_by_day_type(day_type_ref) {
            let Some(operating_day_ref) = assignment.operating_day_ref.as_ref() else {
                continue;
            };
            let Some(operating_day) = repo.operating_day(operating_day_ref) else {
                continue;
            };
            dates.push(CalendarDate {
                service_id: service_id.clone(),
                date: normalize_date(&operating_day.calendar_date),
                exception_type: if assignment.is_available { 1 } else { 2 },
            });
        }
    }
    dates
}
