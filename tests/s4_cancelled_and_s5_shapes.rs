//! Scenario S4 (a cancelled ServiceJourney produces no Trip/StopTime) and
//! scenario S5 (shape generation interpolates long segments then simplifies
//! oversized shapes), exercised through the full [`convert`] entry point
//! rather than the orchestrator's internal stage functions.

mod common;

use common::{csv_rows, zip_entry_names, zip_entry_text};
use netex_gtfs_converter::{convert, Configuration};

fn document_with_alteration(service_alteration: &str) -> String {
    format!(
        r#"<PublicationDelivery>
      <DataObjects>
        <CompositeFrame>
          <frames>
            <ServiceFrame>
              <lines>
                <Line id="L1"><Name>Line One</Name><TransportMode>bus</TransportMode></Line>
              </lines>
              <routes>
                <Route id="R1"><LineRef ref="L1"/></Route>
              </routes>
              <journeyPatterns>
                <JourneyPattern id="JP1">
                  <RouteRef ref="R1"/>
                  <pointsInSequence>
                    <StopPointInJourneyPattern id="JP1-1" order="1"><ScheduledStopPointRef ref="SSP1"/></StopPointInJourneyPattern>
                    <StopPointInJourneyPattern id="JP1-2" order="2"><ScheduledStopPointRef ref="SSP2"/></StopPointInJourneyPattern>
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
                  <Name>Terminus A</Name>
                  <quays>
                    <Quay id="Q1"><Centroid><Location><Longitude>0.0</Longitude><Latitude>0.0</Latitude></Location></Centroid></Quay>
                  </quays>
                </StopPlace>
                <StopPlace id="SP2">
                  <Name>Terminus B</Name>
                  <quays>
                    <Quay id="Q2"><Centroid><Location><Longitude>0.0</Longitude><Latitude>0.009</Latitude></Location></Centroid></Quay>
                  </quays>
                </StopPlace>
              </stopPlaces>
            </SiteFrame>
            <TimetableFrame>
              <vehicleJourneys>
                <ServiceJourney id="SJ1">
                  <JourneyPatternRef ref="JP1"/>
                  <ServiceAlteration>{service_alteration}</ServiceAlteration>
                  <passingTimes>
                    <TimetabledPassingTime id="SJ1-1"><StopPointInJourneyPatternRef ref="JP1-1"/><DepartureTime>08:00:00</DepartureTime></TimetabledPassingTime>
                    <TimetabledPassingTime id="SJ1-2"><StopPointInJourneyPatternRef ref="JP1-2"/><ArrivalTime>08:05:00</ArrivalTime></TimetabledPassingTime>
                  </passingTimes>
                </ServiceJourney>
              </vehicleJourneys>
            </TimetableFrame>
          </frames>
        </CompositeFrame>
      </DataObjects>
    </PublicationDelivery>"#
    )
}

#[test]
fn s4_cancelled_service_journey_produces_no_trip_or_stop_times() {
    let config = Configuration::new("ACME");
    let (zip_bytes, result) = convert(document_with_alteration("cancelled").as_bytes(), &config).unwrap();
    assert!(result.success);

    let names = zip_entry_names(&zip_bytes);
    // A cancelled journey leaves the route/stops alone, just no trip/stop_time rows.
    assert!(names.contains(&"routes.txt".to_string()));
    assert!(!names.contains(&"trips.txt".to_string()), "cancelled journey should emit no trips.txt");
    assert!(!names.contains(&"stop_times.txt".to_string()));
}

#[test]
fn s1_planned_service_journey_produces_a_trip() {
    let config = Configuration::new("ACME");
    let (zip_bytes, _result) = convert(document_with_alteration("planned").as_bytes(), &config).unwrap();
    let trips = csv_rows(&zip_entry_text(&zip_bytes, "trips.txt"));
    assert_eq!(1, trips.len());
}

#[test]
fn s5_shape_generation_interpolates_and_simplifies_a_long_straight_segment() {
    // ~1000m apart on a meridian (0.009 degrees latitude), well past the
    // default 50m interpolation threshold, and perfectly collinear so
    // Douglas-Peucker collapses every interpolated point back to the two
    // endpoints once the shape is forced over its point cap.
    let mut config = Configuration::new("ACME");
    config.generate_shapes = true;
    config.shape.max_points = 1;

    let (zip_bytes, result) = convert(document_with_alteration("planned").as_bytes(), &config).unwrap();
    assert!(result.success);

    let shapes = csv_rows(&zip_entry_text(&zip_bytes, "shapes.txt"));
    assert_eq!(2, shapes.len(), "collinear long segment should simplify back to its two endpoints");
    assert_eq!("1", shapes[0]["shape_pt_sequence"]);
    assert_eq!("2", shapes[1]["shape_pt_sequence"]);

    let trips = csv_rows(&zip_entry_text(&zip_bytes, "trips.txt"));
    assert!(!trips[0]["shape_id"].is_empty());
}

#[test]
fn shapes_are_absent_when_generation_is_disabled() {
    let config = Configuration::new("ACME");
    let (zip_bytes, _result) = convert(document_with_alteration("planned").as_bytes(), &config).unwrap();
    let names = zip_entry_names(&zip_bytes);
    assert!(!names.contains(&"shapes.txt".to_string()));
}
