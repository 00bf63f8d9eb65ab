use scancal_core::calibrator::Calibrator;
use scancal_core::framing;
use scancal_core::token::CalibrationToken;
use scancal_core::{InformationType, Size};

fn codes(text: &str) -> Vec<u32> {
    text.chars().map(|c| c as u32).collect()
}

fn initial_token(cal: &Calibrator) -> CalibrationToken {
    cal.calibration_tokens(Size::Automatic)
        .expect("token sequence")
        .next()
        .expect("at least one token")
}

#[test]
fn test_configured_prefix_stripped() {
    let cal = Calibrator::builder().prefix("PRE ").build();
    let token = initial_token(&cal);
    let payload = token.next_barcode().unwrap().payload.clone();

    let token = cal
        .calibrate(&codes(&format!("PRE {}", payload)), token)
        .unwrap();
    assert!(token.is_terminal());

    let data = token.calibration_data.expect("calibration data");
    assert!(data.is_identity());
    assert_eq!(data.prefix.as_deref(), Some("PRE "));
}

#[test]
fn test_space_run_tolerant_prefix() {
    // The configured literal carries two spaces; the host collapsed them
    // into one.
    let cal = Calibrator::builder().prefix("pre  fix ").build();
    let token = initial_token(&cal);
    let payload = token.next_barcode().unwrap().payload.clone();

    let token = cal
        .calibrate(&codes(&format!("pre fix {}", payload)), token)
        .unwrap();
    assert!(token.is_terminal());
    assert!(token.calibration_data.expect("data").is_identity());
}

#[test]
fn test_reported_prefix_takes_precedence() {
    let mut cal = Calibrator::builder().prefix("PRE ").build();
    cal.set_reported_prefix("QSO ");

    let token = initial_token(&cal);
    let payload = token.next_barcode().unwrap().payload.clone();

    let token = cal
        .calibrate(&codes(&format!("QSO {}", payload)), token)
        .unwrap();
    assert!(token.is_terminal());
    assert!(token.calibration_data.is_some());
}

#[test]
fn test_configured_suffix_stripped() {
    let cal = Calibrator::builder().suffix(" END").build();
    let token = initial_token(&cal);
    let payload = token.next_barcode().unwrap().payload.clone();

    let token = cal
        .calibrate(&codes(&format!("{} END", payload)), token)
        .unwrap();
    assert!(token.is_terminal());

    let data = token.calibration_data.expect("calibration data");
    assert!(data.is_identity());
    assert_eq!(data.suffix.as_deref(), Some(" END"));
}

#[test]
fn test_unconfigured_prefix_discovered() {
    let cal = Calibrator::new();
    let token = initial_token(&cal);
    let payload = token.next_barcode().unwrap().payload.clone();

    let token = cal
        .calibrate(&codes(&format!("XYZ {}", payload)), token)
        .unwrap();
    assert!(token.is_terminal());

    let data = token.calibration_data.expect("calibration data");
    assert!(data.is_identity());
    assert_eq!(data.prefix.as_deref(), Some("XYZ"));
    assert!(data.suffix.is_none());
}

#[test]
fn test_unconfigured_suffix_discovered() {
    let cal = Calibrator::new();
    let token = initial_token(&cal);
    let payload = token.next_barcode().unwrap().payload.clone();

    let token = cal
        .calibrate(&codes(&format!("{} TAIL", payload)), token)
        .unwrap();
    assert!(token.is_terminal());

    let data = token.calibration_data.expect("calibration data");
    assert_eq!(data.suffix.as_deref(), Some("TAIL"));
}

#[test]
fn test_code_literal_carried_through() {
    let cal = Calibrator::builder().code("A1").build();
    let token = initial_token(&cal);
    let payload = token.next_barcode().unwrap().payload.clone();

    let token = cal.calibrate(&codes(&payload), token).unwrap();
    let data = token.calibration_data.expect("calibration data");
    assert_eq!(data.code.as_deref(), Some("A1"));
}

// The framing matcher itself is the contract the downstream parser applies
// (error 1003); pin its documented behavior here too.
#[test]
fn test_framing_contract_for_parser() {
    assert!(framing::matches_with_space_runs("pre  fix", "pre fix"));
    assert!(framing::matches_with_space_runs("pre  fix", "pre   fix"));
    assert!(!framing::matches_with_space_runs("prefix", "pre fix"));
    assert_eq!(framing::FRAMING_MISMATCH_CODE, 1003);
}

#[test]
fn test_prefix_glued_to_payload_fails_alignment() {
    // A prefix with no trailing delimiter fuses with the first probe slot;
    // the slot is no longer a permitted substitution shape.
    let cal = Calibrator::new();
    let token = initial_token(&cal);
    let payload = token.next_barcode().unwrap().payload.clone();

    let token = cal
        .calibrate(&codes(&format!("@@@{}", payload)), token)
        .unwrap();
    assert!(token.is_terminal());
    assert!(token.calibration_data.is_none());
    assert_eq!(
        token.errors[0].information_type,
        InformationType::IncorrectCalibrationDataReported
    );
}
