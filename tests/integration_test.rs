use std::fs::File;
use std::io::BufReader;

use gpx_trackpoints_wasm::parser::{collect_track_points, extract_from_reader, extract_from_str};
use gpx_trackpoints_wasm::{ExtractOptions, Point, TrkPtError, TrkPtHandler};

fn load_fixture(path: &str) -> String {
    std::fs::read_to_string(format!("tests/fixtures/{path}")).unwrap()
}

fn extract(gpx: &str) -> Vec<Point> {
    collect_track_points(gpx, &ExtractOptions::default()).unwrap()
}

// Expected values from trkpts.gpx.
const TRKPTS_FILE_DATA: &[(usize, f64, f64, f64, &str)] = &[
    (0, 39.235658487, -106.315917922, 3012.428223, "2007-09-16T19:22:00Z"),
    (1, 39.235505015, -106.316187400, 3011.467285, "2007-09-16T19:22:03Z"),
    (141, 39.251128044, -106.287899902, 3125.864258, "2007-09-16T19:50:18Z"),
    (142, 39.251178671, -106.287928736, 3125.864258, "2007-09-16T19:50:35Z"),
];

// ---- trkpts.gpx ----

#[test]
fn test_trkpts_file() {
    let points = extract(&load_fixture("trkpts.gpx"));
    assert_eq!(points.len(), 143);

    for &(index, latitude, longitude, altitude, time) in TRKPTS_FILE_DATA {
        let pt = &points[index];
        assert_eq!(pt.latitude(), latitude, "latitude of point {index}");
        assert_eq!(pt.longitude(), longitude, "longitude of point {index}");
        assert_eq!(pt.altitude(), altitude, "altitude of point {index}");
        assert_eq!(pt.timestamp(), time, "time of point {index}");
    }
}

#[test]
fn test_trkpts_file_streamed() {
    let file = File::open("tests/fixtures/trkpts.gpx").unwrap();
    let mut points = Vec::new();
    let count = extract_from_reader(BufReader::new(file), &ExtractOptions::default(), |pt| {
        points.push(pt)
    })
    .unwrap();
    assert_eq!(count, 143);
    assert_eq!(points, extract(&load_fixture("trkpts.gpx")));
}

#[test]
fn test_trkpts_file_in_document_order() {
    let points = extract(&load_fixture("trkpts.gpx"));
    let times: Vec<&str> = points.iter().map(Point::timestamp).collect();
    let mut sorted = times.clone();
    sorted.sort();
    assert_eq!(times, sorted);
    assert!(points.iter().all(Point::has_altitude));
}

#[test]
fn test_trkpts_file_default_handler() {
    let count = extract_from_str(&load_fixture("trkpts.gpx"), &ExtractOptions::default(), |_| {})
        .unwrap();
    assert_eq!(count, 143);
}

// ---- basic/ ----

#[test]
fn test_01_minimal_trkpt() {
    let points = extract(&load_fixture("basic/01_minimal_trkpt.gpx"));
    assert_eq!(points.len(), 1);
    assert_eq!(points[0].latitude(), 35.6762);
    assert_eq!(points[0].longitude(), 139.6503);
    assert_eq!(points[0].altitude(), Point::ALTITUDE_UNSET);
    assert!(!points[0].has_altitude());
    assert_eq!(points[0].timestamp(), "");
}

#[test]
fn test_02_simple_track() {
    let points = extract(&load_fixture("basic/02_simple_track.gpx"));
    assert_eq!(points.len(), 4);

    assert_eq!(points[0].altitude(), 10.0);
    assert_eq!(points[0].timestamp(), "2025-01-01T06:00:00Z");

    // <time> without <ele>
    assert!(!points[2].has_altitude());
    assert_eq!(points[2].timestamp(), "2025-01-01T06:02:00Z");

    // <ele> without <time>
    assert_eq!(points[3].altitude(), -2.25);
    assert!(points[3].timestamp().is_empty());
}

#[test]
fn test_03_multi_segment() {
    let points = extract(&load_fixture("basic/03_multi_segment.gpx"));
    let altitudes: Vec<f64> = points.iter().map(Point::altitude).collect();
    assert_eq!(altitudes, vec![1.0, 2.0, 3.0, 4.0]);
}

// ---- edge_cases/ ----

#[test]
fn test_04_waypoints_and_routes_only() {
    let points = extract(&load_fixture("edge_cases/04_waypoints_and_routes_only.gpx"));
    assert!(points.is_empty());
}

#[test]
fn test_05_cdata_and_entities() {
    let points = extract(&load_fixture("edge_cases/05_cdata_and_entities.gpx"));
    assert_eq!(points.len(), 2);
    assert_eq!(points[0].altitude(), 12.5);
    assert_eq!(points[0].timestamp(), "2025-01-01T00:00:00Z");
    assert_eq!(points[1].timestamp(), "2025-01-01T00:01:00Z");
}

#[test]
fn test_06_gpx10() {
    let points = extract(&load_fixture("edge_cases/06_gpx10.gpx"));
    assert_eq!(points.len(), 2);
    assert_eq!(points[0].altitude(), 5.0);
    assert_eq!(points[0].timestamp(), "2004-05-06T07:08:09Z");
    assert!(!points[1].has_altitude());
}

#[test]
fn test_08_bad_elevation() {
    let gpx = load_fixture("edge_cases/08_bad_elevation.gpx");
    let mut delivered = Vec::new();
    let err = extract_from_str(&gpx, &ExtractOptions::default(), |pt| delivered.push(pt))
        .unwrap_err();
    match err {
        TrkPtError::InvalidElevation { text, .. } => assert_eq!(text, "n/a"),
        other => panic!("Expected InvalidElevation, got {other:?}"),
    }
    // Points before the bad one were already delivered.
    assert_eq!(delivered.len(), 1);
}

#[test]
fn test_09_missing_lat() {
    let err = collect_track_points(
        &load_fixture("edge_cases/09_missing_lat.gpx"),
        &ExtractOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        TrkPtError::MissingAttribute {
            element: "trkpt",
            attribute: "lat"
        }
    ));
}

// ---- vendor/ ----

#[test]
fn test_07_garmin_extensions() {
    let points = extract(&load_fixture("vendor/07_garmin_extensions.gpx"));
    assert_eq!(points.len(), 3);
    // Extensions before <ele> must not disturb it
    assert_eq!(points[2].altitude(), 10.8);
    assert_eq!(points[2].timestamp(), "2025-01-01T06:00:02.000Z");
}

// ---- handler driven by hand ----

#[test]
fn test_handler_with_collecting_callback() {
    let mut points = Vec::new();
    {
        let mut handler = TrkPtHandler::with_callback(|pt| points.push(pt));
        handler
            .start_element("trkpt", &[("lat", "-123.456"), ("lon", "37.37")])
            .unwrap();
        handler.start_element("ele", gpx_trackpoints_wasm::NO_ATTRIBUTES).unwrap();
        handler.char_data("12356.789");
        handler.end_element("ele").unwrap();
        handler.start_element("time", gpx_trackpoints_wasm::NO_ATTRIBUTES).unwrap();
        handler.char_data("2008-10-03T11:10:01Z");
        handler.end_element("time").unwrap();
        handler.end_element("trkpt").unwrap();
    }
    assert_eq!(
        points,
        vec![
            Point::new(-123.456, 37.37)
                .with_altitude(12356.789)
                .with_timestamp("2008-10-03T11:10:01Z")
        ]
    );
}
