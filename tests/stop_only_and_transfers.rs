//! spec §4.J's stop-only mode, and interchange → Transfer production
//! (spec §4.F "Transfer ← ServiceJourneyInterchange").

mod common;

use common::{csv_rows, zip_entry_names, zip_entry_text};
use netex_gtfs_converter::{convert, Configuration};

fn document_with_interchange() -> &'static str {
    r#"<PublicationDelivery>
      <DataObjects>
        <CompositeFrame>
          <frames>
            <ServiceFrame>
              <lines>
                <Line id="L1"><Name>Line One</Name><TransportMode>bus</TransportMode></Line>
                <Line id="L2"><Name>Line Two</Name><TransportMode>bus</TransportMode></Line>
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
              <interchanges>
                <ServiceJourneyInterchange id="IC1">
                  <FromJourneyRef ref="SJ1"/>
                  <ToJourneyRef ref="SJ2"/>
                  <FromPointRef ref="JP1-1"/>
                  <ToPointRef ref="JP2-1"/>
                  <Guaranteed>true</Guaranteed>
                </ServiceJourneyInterchange>
              </interchanges>
            </TimetableFrame>
          </frames>
        </CompositeFrame>
      </DataObjects>
    </PublicationDelivery>"#
}

#[test]
fn interchange_produces_a_guaranteed_transfer_with_the_default_minimum_time() {
    let config = Configuration::new("ACME");
    let (zip_bytes, result) = convert(document_with_interchange().as_bytes(), &config).unwrap();
    assert!(result.success);

    let transfers = csv_rows(&zip_entry_text(&zip_bytes, "transfers.txt"));
    assert_eq!(1, transfers.len());
    assert_eq!("1", transfers[0]["transfer_type"]);
    assert_eq!("120", transfers[0]["min_transfer_time"]);
}

#[test]
fn stop_only_mode_emits_only_stops_and_a_default_agency() {
    let mut config = Configuration::new("ACME");
    config.stop_only = true;
    let (zip_bytes, result) = convert(document_with_interchange().as_bytes(), &config).unwrap();
    assert!(result.success);

    let names = zip_entry_names(&zip_bytes);
    assert!(names.contains(&"stops.txt".to_string()));
    assert!(names.contains(&"agency.txt".to_string()));
    assert!(!names.contains(&"routes.txt".to_string()));
    assert!(!names.contains(&"trips.txt".to_string()));
    assert!(!names.contains(&"transfers.txt".to_string()));

    let agencies = csv_rows(&zip_entry_text(&zip_bytes, "agency.txt"));
    assert_eq!("Default Agency", agencies[0]["agency_name"]);
}
