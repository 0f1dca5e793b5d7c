//! Scenario S6 (spec §8): a Line with no usable name at all produces no
//! Route, and every ServiceJourney on that Line's patterns is dropped with
//! it rather than emitted with a dangling route reference.

mod common;

use common::{csv_rows, zip_entry_names, zip_entry_text};
use netex_gtfs_converter::{convert, Configuration};

fn document_with_unnamed_line() -> &'static str {
    r#"<PublicationDelivery>
      <DataObjects>
        <CompositeFrame>
          <frames>
            <ServiceFrame>
              <lines>
                <Line id="L1"><TransportMode>bus</TransportMode></Line>
                <Line id="L2"><Name>Named Line</Name><TransportMode>bus</TransportMode></Line>
              </lines>
              <routes>
                <Route id="R1"><LineRef ref="L1"/></Route>
                <Route id="R2"><LineRef ref="L2"/></Route>
              </routes>
              <journeyPatterns>
                <JourneyPattern id="JP1">
                  <RouteRef ref="R1"/>
                  <pointsInSequence>
                    <StopPointInJourneyPattern id="JP1-1" order="1"><ScheduledStopPointRef ref="SSP1"/></StopPointInJourneyPattern>
                  </pointsInSequence>
                </JourneyPattern>
                <JourneyPattern id="JP2">
                  <RouteRef ref="R2"/>
                  <pointsInSequence>
                    <StopPointInJourneyPattern id="JP2-1" order="1"><ScheduledStopPointRef ref="SSP2"/></StopPointInJourneyPattern>
                  </pointsInSequence>
                </JourneyPattern>
              </journeyPatterns>
              <scheduledStopPoints>
                <ScheduledStopPoint id="SSP1"><QuayRef ref="Q1"/></ScheduledStopPoint>
                <ScheduledStopPoint id="SSP2"><QuayRef ref="Q2"/></ScheduledStopPoint>
              </scheduledStopPoints>
            </ServiceFrame>
            <SiteFrame>
              <stopPlaces>
                <StopPlace id="SP1">
                  <Name>Stop One</Name>
                  <quays><Quay id="Q1"/></quays>
                </StopPlace>
                <StopPlace id="SP2">
                  <Name>Stop Two</Name>
                  <quays><Quay id="Q2"/></quays>
                </StopPlace>
              </stopPlaces>
            </SiteFrame>
            <TimetableFrame>
              <vehicleJourneys>
                <ServiceJourney id="SJ1">
                  <JourneyPatternRef ref="JP1"/>
                  <passingTimes>
                    <TimetabledPassingTime id="SJ1-1"><StopPointInJourneyPatternRef ref="JP1-1"/><DepartureTime>08:00:00</DepartureTime></TimetabledPassingTime>
                  </passingTimes>
                </ServiceJourney>
                <ServiceJourney id="SJ2">
                  <JourneyPatternRef ref="JP2"/>
                  <passingTimes>
                    <TimetabledPassingTime id="SJ2-1"><StopPointInJourneyPatternRef ref="JP2-1"/><DepartureTime>08:15:00</DepartureTime></TimetabledPassingTime>
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
fn unnamed_line_produces_no_route_and_drops_its_trips() {
    let config = Configuration::new("ACME");
    let (zip_bytes, result) = convert(document_with_unnamed_line().as_bytes(), &config).unwrap();

    let routes = csv_rows(&zip_entry_text(&zip_bytes, "routes.txt"));
    assert_eq!(1, routes.len(), "only the named line should produce a route");
    assert_eq!("L2", routes[0]["route_id"]);

    let trips = csv_rows(&zip_entry_text(&zip_bytes, "trips.txt"));
    assert_eq!(1, trips.len(), "the trip on the unnamed line's pattern should be dropped");
    assert_eq!("R2", trips[0]["route_id"]);

    // Stops are unaffected since they don't depend on the route at all.
    let names = zip_entry_names(&zip_bytes);
    assert!(names.contains(&"stops.txt".to_string()));
    let stops = csv_rows(&zip_entry_text(&zip_bytes, "stops.txt"));
    assert_eq!(4, stops.len());

    assert!(!result.errors.is_empty() || !result.warnings.is_empty(), "dropping a route should be reported");
}
