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

//! NeTEx `(TransportMode, TransportSubmode)` → GTFS route-type mapping
//! (spec §4.A). Table-driven, the same way the teacher's `netex_idf::modes`
//! maps NeTEx `TransportMode`/`TransportSubmode` to physical/commercial
//! mode pairs: a `lazy_static` lookup table plus a small hierarchical match.

use lazy_static::lazy_static;
use std::collections::HashMap;

/// Fallback GTFS basic route type (`3` = Bus) used when a mode is entirely
/// unknown, and whenever `basic_types` forces the basic 0-7 codes.
pub const DEFAULT_ROUTE_TYPE: u16 = 3;

lazy_static! {
    /// `(mode, submode) -> extended route type`. A submode of `""` acts as
    /// the `(mode, *)` default for that mode.
    static ref EXTENDED_ROUTE_TYPES: HashMap<(&'static str, &'static str), u16> = {
        let mut m = HashMap::new();
        // Rail - 100-117
        m.insert(("rail", ""), 100);
        m.insert(("rail", "suburbanRailway"), 300);
        m.insert(("rail", "regionalRail"), 103);
        m.insert(("rail", "interregionalRail"), 103);
        m.insert(("rail", "longDistance"), 102);
        m.insert(("rail", "international"), 102);
        m.insert(("rail", "sleeperRailService"), 105);
        m.insert(("rail", "railShuttle"), 100);
        m.insert(("rail", "local"), 106);
        m.insert(("rail", "highSpeedRail"), 101);
        m.insert(("rail", "replacementRailService"), 117);
        // Coach - 200-209
        m.insert(("coach", ""), 200);
        m.insert(("coach", "internationalCoach"), 201);
        m.insert(("coach", "nationalCoach"), 202);
        m.insert(("coach", "regionalCoach"), 204);
        m.insert(("coach", "touristCoach"), 207);
        m.insert(("coach", "commuterCoach"), 208);
        // Metro / Urban rail - 400-405
        m.insert(("metro", ""), 401);
        m.insert(("underground", ""), 402);
        m.insert(("urbanRail", ""), 400);
        // Bus - 700-716
        m.insert(("bus", ""), 700);
        m.insert(("bus", "localBus"), 704);
        m.insert(("bus", "regionalBus"), 701);
        m.insert(("bus", "expressBus"), 702);
        m.insert(("bus", "nightBus"), 705);
        m.insert(("bus", "schoolBus"), 712);
        m.insert(("bus", "shuttleBus"), 711);
        m.insert(("bus", "sightseeingBus"), 710);
        m.insert(("bus", "railReplacementBus"), 714);
        m.insert(("bus", "demandAndResponseBus"), 715);
        // Trolleybus - 800
        m.insert(("trolleyBus", ""), 800);
        // Tram - 900-906
        m.insert(("tram", ""), 900);
        m.insert(("tram", "cityTram"), 901);
        m.insert(("tram", "localTram"), 902);
        m.insert(("tram", "regionalTram"), 903);
        m.insert(("tram", "sightseeingTram"), 904);
        // Water - 1000-1021
        m.insert(("water", ""), 1000);
        m.insert(("water", "internationalCarFerry"), 1001);
        m.insert(("water", "nationalCarFerry"), 1002);
        m.insert(("water", "localCarFerry"), 1004);
        m.insert(("water", "internationalPassengerFerry"), 1005);
        m.insert(("water", "nationalPassengerFerry"), 1006);
        m.insert(("water", "postBoat"), 1009);
        m.insert(("water", "sightseeingBoat"), 1015);
        m.insert(("water", "localPassengerFerry"), 1008);
        // Air - 1100-1114
        m.insert(("air", ""), 1100);
        m.insert(("air", "domesticFlight"), 1102);
        m.insert(("air", "internationalFlight"), 1101);
        m.insert(("air", "helicopterService"), 1110);
        // Ferry (top-level mode alias some producers use directly) - 1200
        m.insert(("ferry", ""), 1200);
        // Telecabin - 1300-1307
        m.insert(("telecabin", ""), 1300);
        m.insert(("cableway", ""), 1300);
        m.insert(("telecabin", "telecabin"), 1301);
        m.insert(("telecabin", "cableCar"), 1302);
        m.insert(("telecabin", "chairLift"), 1303);
        // Funicular - 1400-1402
        m.insert(("funicular", ""), 1400);
        m.insert(("funicular", "classicFunicular"), 1401);
        // Taxi - 1500-1507
        m.insert(("taxi", ""), 1500);
        m.insert(("taxi", "communalTaxi"), 1501);
        m.insert(("taxi", "waterTaxi"), 1502);
        // Self-drive - 1600-1604
        m.insert(("selfDrive", ""), 1600);
        m.insert(("selfDrive", "hireCar"), 1601);
        m.insert(("selfDrive", "hireCycle"), 1602);
        // Miscellaneous - 1700-1702
        m.insert(("unknown", ""), 1700);
        m.insert(("other", ""), 1700);
        m.insert(("lift", ""), 1700);
        m
    };

    /// `(mode, submode) -> basic route type` (`0`-`7`), used when
    /// `basic_types` is set.
    static ref BASIC_ROUTE_TYPES: HashMap<&'static str, u16> = {
        let mut m = HashMap::new();
        m.insert("tram", 0);
        m.insert("metro", 1);
        m.insert("underground", 1);
        m.insert("urbanRail", 1);
        m.insert("rail", 2);
        m.insert("bus", 3);
        m.insert("trolleyBus", 11);
        m.insert("water", 4);
        m.insert("ferry", 4);
        m.insert("cableway", 6);
        m.insert("telecabin", 6);
        m.insert("funicular", 7);
        m.insert("coach", 3);
        m.insert("taxi", 3);
        m.insert("selfDrive", 3);
        m
    };
}

/// Maps a NeTEx `(TransportMode, TransportSubmode)` pair to a GTFS route
/// type. Total: exact `(mode, submode)` match, then `(mode, "")` default,
/// then the global `Bus = 3` fallback (spec §4.A, testable property 6).
///
/// When `basic_types` is `true`, the result is always in the basic `0`-`7`
/// space; the basic table is keyed on `mode` alone since GTFS's basic codes
/// don't distinguish submodes.
pub fn route_type(mode: &str, submode: &str, basic_types: bool) -> u16 {
    if basic_types {
        return *BASIC_ROUTE_TYPES
            .get(mode)
            .unwrap_or(&DEFAULT_ROUTE_TYPE);
    }
    if let Some(rt) = EXTENDED_ROUTE_TYPES.get(&(mode, submode)) {
        return *rt;
    }
    if let Some(rt) = EXTENDED_ROUTE_TYPES.get(&(mode, "")) {
        return *rt;
    }
    DEFAULT_ROUTE_TYPE
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn exact_match_wins() {
        assert_eq!(300, route_type("rail", "suburbanRailway", false));
    }

    #[test]
    fn mode_default_is_used_when_submode_unknown() {
        assert_eq!(100, route_type("rail", "somethingElse", false));
    }

    #[test]
    fn unknown_mode_falls_back_to_bus() {
        assert_eq!(DEFAULT_ROUTE_TYPE, route_type("spaceship", "", false));
    }

    #[test]
    fn basic_types_forces_0_to_7_space() {
        assert_eq!(3, route_type("bus", "localBus", true));
        assert_eq!(0, route_type("tram", "cityTram", true));
        assert_eq!(2, route_type("rail", "highSpeedRail", true));
    }

    #[test]
    fn total_function_never_panics_on_arbitrary_input() {
        for rt in [
            route_type("", "", false),
            route_type("unicorn", "sparkle", false),
            route_type("bus", "", true),
        ] {
            assert!(rt < 10_000);
        }
    }
}
