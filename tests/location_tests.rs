use stk_connect::mock::MockStream;
use stk_connect::*;

fn connected(stream: &MockStream) -> Session<MockStream> {
    Session::from_stream(stream.clone(), SessionConfig::default())
}

#[test]
fn test_set_position_cartesian() {
    let stream = MockStream::new();
    stream.push_ack();
    let session = connected(&stream);

    Location::facility(&session, "*/Facility/AGIHQ")
        .set_position_cartesian(1.0, 2.0, 3.0)
        .unwrap();
    assert_eq!(
        stream.last_line().as_deref(),
        Some("SetPosition */Facility/AGIHQ Cartesian 1 2 3")
    );
}

#[test]
fn test_set_position_geodetic_with_msl() {
    let stream = MockStream::new();
    stream.push_ack();
    stream.push_ack();
    let session = connected(&stream);
    let wallops = Location::facility(&session, "*/Facility/Wallops");

    wallops.set_position_geodetic(37.9, -75.5, 0.0, true).unwrap();
    wallops.set_position_geodetic(37.9, -75.5, 12.5, false).unwrap();

    assert_eq!(
        stream.sent_lines(),
        vec![
            "SetPosition */Facility/Wallops Geodetic 37.9 -75.5 0 MSL",
            "SetPosition */Facility/Wallops Geodetic 37.9 -75.5 12.5",
        ]
    );
}

#[test]
fn test_set_position_geocentric() {
    let stream = MockStream::new();
    stream.push_ack();
    let session = connected(&stream);

    Location::target(&session, "*/Target/Boat")
        .set_position_geocentric(-10.25, 190.0, 0.0, true)
        .unwrap();
    assert_eq!(
        stream.last_line().as_deref(),
        Some("SetPosition */Target/Boat Geocentric -10.25 190 0 MSL")
    );
}

#[test]
fn test_latitude_out_of_range_is_not_sent() {
    let stream = MockStream::new();
    let session = connected(&stream);
    let place = Location::place(&session, "*/Place/Home");

    assert!(matches!(
        place.set_position_geodetic(91.0, 0.0, 0.0, false),
        Err(ConnectError::OutOfRange { .. })
    ));
    assert!(matches!(
        place.set_position_geocentric(0.0, -361.0, 0.0, false),
        Err(ConnectError::OutOfRange { .. })
    ));
    assert!(stream.written().is_empty());
}

#[test]
fn test_non_finite_coordinates_are_not_sent() {
    let stream = MockStream::new();
    let session = connected(&stream);
    let facility = Location::facility(&session, "*/Facility/AGIHQ");

    assert!(matches!(
        facility.set_position_cartesian(1.0, f64::NAN, 3.0),
        Err(ConnectError::OutOfRange { .. })
    ));
    assert!(matches!(
        facility.set_position_geodetic(37.9, -75.5, f64::INFINITY, true),
        Err(ConnectError::OutOfRange { .. })
    ));
    assert!(matches!(
        facility.set_height_above_ground(f64::NEG_INFINITY),
        Err(ConnectError::OutOfRange { .. })
    ));
    assert!(stream.written().is_empty());
}

#[test]
fn test_set_height_above_ground() {
    let stream = MockStream::new();
    stream.push_ack();
    let session = connected(&stream);

    Location::facility(&session, "*/Facility/aero1")
        .set_height_above_ground(17.0)
        .unwrap();
    assert_eq!(
        stream.last_line().as_deref(),
        Some("SetHeightAboveGround */Facility/aero1 17")
    );
}

#[test]
fn test_position_rejected_by_remote() {
    let stream = MockStream::new();
    stream.push_nack();
    let session = connected(&stream);

    let err = Location::facility(&session, "*/Facility/Ghost")
        .set_position_cartesian(0.0, 0.0, 0.0)
        .unwrap_err();
    assert!(matches!(err, ConnectError::CommandRejected { .. }));
    assert!(!err.is_fatal());
}
