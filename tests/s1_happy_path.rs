//! Scenario S1 (spec §8): a minimal, well-formed NeTEx document converts
//! end to end into a GTFS zip with the expected rows in every core table.

mod common;

use common::{csv_rows, zip_entry_names, zip_entry_text};
use netex_gtfs_converter::{convert, Configuration};

fn minimal_document() -> &'static str {
    r#"<PublicationDelivery>
      <DataObjects>
        <CompositeFrame>
          <frames>
            <ResourceFrame>
              <organisations>
                <Authority id="A1">
                  <Name>Acme Transit</Name>
                  <ContactDetails><Url>https://acme.example</Url></ContactDetails>
                </Authority>
              </organisations>
            </ResourceFrame>
            <ServiceFrame>
              <lines>
                <Line id="L1">
                  <Name>Blue Line</Name>
                  <PublicCode>5</PublicCode>
                  <TransportMode>bus</TransportMode>
                  <AuthorityRef ref="A1"/>
                </Line>
              </lines>
              <routes>
                <Route id="R1">
                  <LineRef ref="L1"/>
                  <DirectionType>outbound</DirectionType>
                </Route>
              </routes>
              <journeyPatterns>
                <JourneyPattern id="JP1">
                  <RouteRef ref="R1"/>
                  <pointsInSequence>
                    <StopPointInJourneyPattern id="JP1-1" order="1">
                      <ScheduledStopPointRef ref="SSP1"/>
                    </StopPointInJourneyPattern>
                    <StopPointInJourneyPattern id="JP1-2" order="2">
                      <ScheduledStopPointRef ref="SSP2"/>
                    </StopPointInJourneyPattern>
                  </pointsInSequence>
                </JourneyPattern>
              </journeyPatterns>
              <scheduledStopPoints>
                <ScheduledStopPoint id="SSP1"><QuayRef ref="Q1"/></ScheduledStopPoint>
                <ScheduledStopPoint id="SSP2"><QuayRef ref="Q2"/></ScheduledStopPoint>
              </scheduledStopPoints>
            </ServiceFrame>
            <ServiceCalendarFrame>
              <dayTypes>
                <DayType id="DT1">
                  <properties>
                    <PropertyOfDay><DaysOfWeek>Monday Tuesday Wednesday Thursday Friday</DaysOfWeek></PropertyOfDay>
                  </properties>
                </DayType>
              </dayTypes>
            </ServiceCalendarFrame>
            <SiteFrame>
              <stopPlaces>
                <StopPlace id="SP1">
                  <Name>Central Station</Name>
                  <quays>
                    <Quay id="Q1">
                      <Centroid><Location><Longitude>10.75</Longitude><Latitude>59.91</Latitude></Location></Centroid>
                    </Quay>
                    <Quay id="Q2">
                      <Centroid><Location><Longitude>10.76</Longitude><Latitude>59.92</Latitude></Location></Centroid>
                    </Quay>
                  </quays>
                </StopPlace>
              </stopPlaces>
            </SiteFrame>
            <TimetableFrame>
              <vehicleJourneys>
                <ServiceJourney id="SJ1">
                  <JourneyPatternRef ref="JP1"/>
                  <dayTypes><DayTypeRef ref="DT1"/></dayTypes>
                  <passingTimes>
                    <TimetabledPassingTime id="SJ1-1">
                      <StopPointInJourneyPatternRef ref="JP1-1"/>
                      <DepartureTime>08:00:00</DepartureTime>
                    </TimetabledPassingTime>
                    <TimetabledPassingTime id="SJ1-2">
                      <StopPointInJourneyPatternRef ref="JP1-2"/>
                      <ArrivalTime>08:10:00</ArrivalTime>
                    </TimetabledPassingTime>
                  </passingTimes>
                </ServiceJourney>
              </vehicleJourneys>
            </TimetableFrame>
          </frames>
        </CompositeFrame>
      </DataObjects>
    </PublicationDelivery>"#
}

#[test]
fn converts_a_minimal_document_into_a_complete_gtfs_feed() {
    let config = Configuration::new("ACME");
    let (zip_bytes, result) = convert(minimal_document().as_bytes(), &config).expect("conversion succeeds");

    assert!(result.success, "expected a successful conversion, got {result:?}");
    assert!(result.errors.is_empty());

    let names = zip_entry_names(&zip_bytes);
    for expected in ["agency.txt", "stops.txt", "routes.txt", "trips.txt", "stop_times.txt", "calendar.txt", "feed_info.txt"] {
        assert!(names.contains(&expected.to_string()), "missing {expected} in {names:?}");
    }

    let agencies = csv_rows(&zip_entry_text(&zip_bytes, "agency.txt"));
    assert_eq!(1, agencies.len());
    assert_eq!("Acme Transit", agencies[0]["agency_name"]);
    assert_eq!("https://acme.example", agencies[0]["agency_url"]);
    // S1's literal fixture reads "…,UTC", but that's under the spec's own
    // inconsistency between §4.F's "UTC" producer fallback and §6.3's
    // `timezone-default = "Europe/Oslo"` default, which wins here since the
    // repository's resolved time zone is non-empty (see DESIGN.md's Open
    // Question decisions).
    assert_eq!("Europe/Oslo", agencies[0]["agency_timezone"]);

    let routes = csv_rows(&zip_entry_text(&zip_bytes, "routes.txt"));
    assert_eq!(1, routes.len());
    assert_eq!("3", routes[0]["route_type"]);

    // Both quays (location_type 0) and their parent StopPlace
    // (location_type 1) each get their own Stop row (spec §4.F).
    let stops = csv_rows(&zip_entry_text(&zip_bytes, "stops.txt"));
    assert_eq!(3, stops.len());
    assert_eq!(1, stops.iter().filter(|s| s["location_type"] == "1").count());
    assert_eq!(2, stops.iter().filter(|s| s["location_type"] == "0").count());

    let trips = csv_rows(&zip_entry_text(&zip_bytes, "trips.txt"));
    assert_eq!(1, trips.len());
    assert_eq!("0", trips[0]["direction_id"]);

    let stop_times = csv_rows(&zip_entry_text(&zip_bytes, "stop_times.txt"));
    assert_eq!(2, stop_times.len());
    assert_eq!("1", stop_times[0]["stop_sequence"]);
    assert_eq!("08:00:00", stop_times[0]["departure_time"]);

    let calendars = csv_rows(&zip_entry_text(&zip_bytes, "calendar.txt"));
    assert_eq!(1, calendars.len());
    assert_eq!("1", calendars[0]["monday"]);
    assert_eq!("0", calendars[0]["saturday"]);
}
