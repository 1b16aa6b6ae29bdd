use stk_connect::validators::*;
use stk_connect::ConnectError;

#[test]
fn test_valid_names_are_accepted() {
    let longest = "x".repeat(MAX_NAME_LENGTH);
    for name in ["ERS1", "Sat-1_a", "a", "_private", "END2", longest.as_str()] {
        assert!(validate_name(name).is_ok(), "{name} should be valid");
    }
}

#[test]
fn test_name_length_limit() {
    let too_long = "x".repeat(MAX_NAME_LENGTH + 1);
    assert!(matches!(
        validate_name(&too_long),
        Err(ConnectError::InvalidIdentifier { .. })
    ));
}

#[test]
fn test_empty_name_is_rejected() {
    assert!(matches!(
        validate_name(""),
        Err(ConnectError::InvalidIdentifier { .. })
    ));
}

#[test]
fn test_names_with_invalid_characters_are_rejected() {
    for name in ["my sat", "sat/1", "sat.1", "sat*", "\"quoted\"", "satélite"] {
        assert!(
            matches!(validate_name(name), Err(ConnectError::InvalidIdentifier { .. })),
            "{name} should be invalid"
        );
    }
}

#[test]
fn test_reserved_names_ignore_case() {
    for name in ["end", "End", "END", "_default", "_Default"] {
        assert!(validate_name(name).is_err(), "{name} is reserved");
    }
}

#[test]
fn test_range_bounds_are_inclusive_and_optional() {
    assert!(validate_range(Some(0.0), Some(0.0), Some(90.0)).is_ok());
    assert!(validate_range(Some(90.0), Some(0.0), Some(90.0)).is_ok());
    assert!(validate_range(Some(1e9), Some(0.0), None).is_ok());
    assert!(validate_range(Some(-1e9), None, Some(0.0)).is_ok());
    assert!(validate_range(Some(-3.5), None, None).is_ok());
}

#[test]
fn test_range_rejects_values_outside_bounds() {
    let err = validate_range(Some(-0.5), Some(0.0), Some(90.0)).unwrap_err();
    assert!(matches!(
        err,
        ConnectError::OutOfRange { value, min: Some(_), max: Some(_) } if value == -0.5
    ));
    assert!(validate_range(Some(90.01), Some(0.0), Some(90.0)).is_err());
}

#[test]
fn test_disabled_value_always_passes() {
    assert!(validate_range(None, Some(0.0), Some(1.0)).is_ok());
}

#[test]
fn test_choice_is_case_insensitive() {
    let choices = ["Posigrade", "Retrograde"];
    assert_eq!(validate_choice("retrograde", &choices, "direction").unwrap(), "Retrograde");
    assert_eq!(validate_choice("POSIGRADE", &choices, "direction").unwrap(), "Posigrade");
}

#[test]
fn test_unknown_choice_lists_alternatives() {
    let err = validate_choice("Sideways", &["Posigrade", "Retrograde"], "direction").unwrap_err();
    match err {
        ConnectError::InvalidChoice { label, value, choices } => {
            assert_eq!(label, "direction");
            assert_eq!(value, "Sideways");
            assert_eq!(choices, vec!["Posigrade", "Retrograde"]);
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn test_validation_errors_are_classified() {
    assert!(validate_name("").unwrap_err().is_validation());
    assert!(!validate_name("").unwrap_err().is_fatal());
}
