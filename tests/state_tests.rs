use chrono::{NaiveDate, NaiveDateTime};
use stk_connect::mock::MockStream;
use stk_connect::objects::vehicles::SATELLITE;
use stk_connect::*;

fn connected(stream: &MockStream) -> Session<MockStream> {
    Session::from_stream(stream.clone(), SessionConfig::default())
}

fn at(year: i32, month: u32, day: u32, hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
}

const ERS1_STATE: [f64; 6] = [
    -5465000.513055,
    4630000.194365,
    0.0,
    712.713627,
    841.292034,
    7377.687805,
];

static TWO_BODY_ONLY: Capabilities = Capabilities {
    states: &[StateKind::Cartesian, StateKind::Classical],
    propagators: &["TwoBody", "J2Perturbation"],
    coordinate_systems: &["J2000"],
};

#[test]
fn test_set_state_cartesian_with_interval() {
    let stream = MockStream::new();
    stream.push_ack();
    let session = connected(&stream);
    let satellite = Vehicle::satellite(&session, "*/Satellite/ERS1");

    let propagation = Propagation::new("J4Perturbation", "J2000")
        .with_interval(at(2000, 11, 1, 0), at(2000, 11, 1, 8))
        .with_step_size(60.0);
    satellite
        .set_state_cartesian(at(2000, 11, 1, 0), ERS1_STATE, &propagation)
        .unwrap();

    assert_eq!(
        stream.last_line().as_deref(),
        Some(
            "SetState */Satellite/ERS1 Cartesian J4Perturbation \"01 Nov 2000 00:00:00.000\" \
             \"01 Nov 2000 08:00:00.000\" 60 J2000 \"01 Nov 2000 00:00:00.000\" \
             -5465000.513055 4630000.194365 0 712.713627 841.292034 7377.687805"
        )
    );
}

#[test]
fn test_set_state_classical_uses_scenario_interval() {
    let stream = MockStream::new();
    stream.push_ack();
    let session = connected(&stream);
    let satellite = Vehicle::satellite(&session, "*/Satellite/ERS1");

    let propagation = Propagation::new("lop", "j2000").with_step_size(86400.0);
    satellite
        .set_state_classical(
            at(1999, 10, 1, 0),
            [42164000.0, 0.0, 0.0, 0.0, 269.3, 0.0],
            &propagation,
        )
        .unwrap();

    assert_eq!(
        stream.last_line().as_deref(),
        Some(
            "SetState */Satellite/ERS1 Classical LOP UseScenarioInterval 86400 J2000 \
             \"01 Oct 1999 00:00:00.000\" 42164000 0 0 0 269.3 0"
        )
    );
}

#[test]
fn test_set_state_equinoctial_appends_direction() {
    let stream = MockStream::new();
    stream.push_ack();
    let session = connected(&stream);
    let satellite = Vehicle::satellite(&session, "*/Satellite/ERS1");

    let propagation = Propagation::new("J4Perturbation", "MeanOfDate")
        .with_interval(at(2000, 11, 1, 0), at(2000, 11, 1, 8));
    satellite
        .set_state_equinoctial(
            at(2000, 11, 1, 0),
            [7163000.137079, 0.0, 0.0, 0.55697636, -0.65743965, 220.270122],
            "retrograde",
            &propagation,
        )
        .unwrap();

    assert_eq!(
        stream.last_line().as_deref(),
        Some(
            "SetState */Satellite/ERS1 Equi J4Perturbation \"01 Nov 2000 00:00:00.000\" \
             \"01 Nov 2000 08:00:00.000\" 60 MeanOfDate \"01 Nov 2000 00:00:00.000\" \
             7163000.137079 0 0 0.55697636 -0.65743965 220.270122 Retrograde"
        )
    );
}

#[test]
fn test_set_state_equinoctial_rejects_unknown_direction() {
    let stream = MockStream::new();
    let session = connected(&stream);
    let satellite = Vehicle::satellite(&session, "*/Satellite/ERS1");

    let err = satellite
        .set_state_equinoctial(
            at(2000, 11, 1, 0),
            [7163000.0, 0.0, 0.0, 0.5, -0.6, 220.0],
            "Sideways",
            &Propagation::new("TwoBody", "J2000"),
        )
        .unwrap_err();
    assert!(matches!(err, ConnectError::InvalidChoice { label: "orbit direction", .. }));
    assert!(stream.written().is_empty());
}

#[test]
fn test_set_state_sgp4_quotes_tle_file() {
    let stream = MockStream::new();
    stream.push_ack();
    let session = connected(&stream);
    let satellite = Vehicle::satellite(&session, "*/Satellite/SGP4Sat");

    satellite
        .set_state_sgp4(11417, r"c:\MyTemp\B44150.tle", None, 60.0)
        .unwrap();

    assert_eq!(
        stream.last_line().as_deref(),
        Some(
            r#"SetState */Satellite/SGP4Sat SGP4 UseScenarioInterval 60 11417 TLESource Automatic Source File "c:\MyTemp\B44150.tle" UseTLE All SwitchMethod TCA"#
        )
    );
}

#[test]
fn test_set_state_from_file() {
    let stream = MockStream::new();
    stream.push_ack();
    stream.push_ack();
    let session = connected(&stream);
    let satellite = Vehicle::satellite(&session, "*/Satellite/Shuttle");

    satellite
        .set_state_from_file(r"C:\stk\User\Data\EphemFile.e", None)
        .unwrap();
    satellite
        .set_state_from_file(r"C:\stk\User\Data\EphemFile.e", Some(at(2003, 6, 1, 14)))
        .unwrap();

    assert_eq!(
        stream.sent_lines(),
        vec![
            r#"SetState */Satellite/Shuttle FromFile "C:\stk\User\Data\EphemFile.e""#,
            r#"SetState */Satellite/Shuttle FromFile "C:\stk\User\Data\EphemFile.e" StartTime "01 Jun 2003 14:00:00.000""#,
        ]
    );
}

#[test]
fn test_undeclared_propagator_is_rejected_before_writing() {
    let stream = MockStream::new();
    let session = connected(&stream);
    let vehicle =
        Vehicle::with_capabilities(&session, VehicleKind::Satellite, "*/Satellite/Simple", &TWO_BODY_ONLY);

    let err = vehicle
        .set_state_cartesian(at(2000, 11, 1, 0), ERS1_STATE, &Propagation::new("HPOP", "J2000"))
        .unwrap_err();
    assert!(matches!(err, ConnectError::InvalidChoice { label: "propagator", .. }));
    assert!(stream.written().is_empty());
}

#[test]
fn test_undeclared_coordinate_system_is_rejected() {
    let stream = MockStream::new();
    let session = connected(&stream);
    let satellite = Vehicle::satellite(&session, "*/Satellite/ERS1");

    let err = satellite
        .set_state_cartesian(at(2000, 11, 1, 0), ERS1_STATE, &Propagation::new("TwoBody", "Fixed"))
        .unwrap_err();
    assert!(matches!(err, ConnectError::InvalidChoice { label: "coordinate system", .. }));
    assert!(stream.written().is_empty());
}

#[test]
fn test_state_kind_outside_table_is_not_supported() {
    let stream = MockStream::new();
    let session = connected(&stream);

    let rocket = Vehicle::launch_vehicle(&session, "*/LaunchVehicle/LV1");
    let err = rocket
        .set_state_classical(at(2000, 11, 1, 0), ERS1_STATE, &Propagation::new("TwoBody", "J2000"))
        .unwrap_err();
    assert!(matches!(
        err,
        ConnectError::NotSupported {
            operation: "Classical",
            class: "LaunchVehicle"
        }
    ));

    let missile = Vehicle::missile(&session, "*/Missile/M1");
    assert!(matches!(
        missile.set_state_sgp4(11417, "m.tle", None, 60.0),
        Err(ConnectError::NotSupported { .. })
    ));
    assert!(stream.written().is_empty());
}

#[test]
fn test_recognized_but_unbuilt_kinds_are_not_supported() {
    let stream = MockStream::new();
    let session = connected(&stream);
    let satellite = Vehicle::satellite(&session, "*/Satellite/ERS1");

    assert!(SATELLITE.states.contains(&StateKind::Spherical));
    assert!(satellite.check_state(StateKind::Cartesian).is_ok());
    for kind in [StateKind::Spherical, StateKind::Gps, StateKind::Sp3, StateKind::Spice] {
        assert!(matches!(
            satellite.check_state(kind),
            Err(ConnectError::NotSupported { .. })
        ));
    }
}

#[test]
fn test_inverted_interval_is_invalid() {
    let stream = MockStream::new();
    let session = connected(&stream);
    let satellite = Vehicle::satellite(&session, "*/Satellite/ERS1");

    let propagation = Propagation::new("TwoBody", "J2000")
        .with_interval(at(2000, 11, 1, 8), at(2000, 11, 1, 0));
    assert!(matches!(
        satellite.set_state_cartesian(at(2000, 11, 1, 0), ERS1_STATE, &propagation),
        Err(ConnectError::InvalidArgument(_))
    ));
    assert!(matches!(
        satellite.set_state_sgp4(1, "a.tle", None, -1.0),
        Err(ConnectError::OutOfRange { .. })
    ));
    assert!(stream.written().is_empty());
}

#[test]
fn test_non_finite_state_vector_is_not_sent() {
    let stream = MockStream::new();
    let session = connected(&stream);
    let satellite = Vehicle::satellite(&session, "*/Satellite/ERS1");

    let mut state = ERS1_STATE;
    state[4] = f64::INFINITY;
    assert!(matches!(
        satellite.set_state_cartesian(at(2000, 11, 1, 0), state, &Propagation::new("TwoBody", "J2000")),
        Err(ConnectError::OutOfRange { .. })
    ));
    state[4] = f64::NAN;
    assert!(matches!(
        satellite.set_state_classical(at(2000, 11, 1, 0), state, &Propagation::new("TwoBody", "J2000")),
        Err(ConnectError::OutOfRange { .. })
    ));
    assert!(stream.written().is_empty());
}

#[test]
fn test_rejected_state_surfaces_command() {
    let stream = MockStream::new();
    stream.push_nack();
    let session = connected(&stream);
    let satellite = Vehicle::satellite(&session, "*/Satellite/ERS1");

    let err = satellite
        .set_state_from_file("missing.e", None)
        .unwrap_err();
    assert!(matches!(
        err,
        ConnectError::CommandRejected { ref command, .. } if command == "SetState */Satellite/ERS1 FromFile \"missing.e\""
    ));
}
