use scancal_core::calibrator::Calibrator;
use scancal_core::consts::compose;
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

/// Runs the baseline round for a layout where `^` is a host-side dead key
/// (reported as NUL + echo) and everything else is identity.
fn after_baseline_with_dead_circumflex(cal: &Calibrator) -> CalibrationToken {
    let token = initial_token(cal);
    let payload = token.next_barcode().unwrap().payload.clone();
    let response = payload.replace(" ^ ", " \u{0}^ ");

    let token = cal.calibrate(&codes(&response), token).unwrap();
    assert!(!token.is_terminal(), "a dead-key round should be pending");
    token
}

/// Builds a dead-key round response slot by slot.
fn respond_dead_round(round_payload: &str, respond: impl Fn(char) -> String) -> Vec<u32> {
    let slots: Vec<String> = round_payload
        .split(' ')
        .map(|pair| {
            let base = pair.chars().nth(1).expect("dead-key pair");
            respond(base)
        })
        .collect();
    codes(&slots.join(" "))
}

#[test]
fn test_baseline_discovers_dead_key() {
    let cal = Calibrator::new();
    let token = after_baseline_with_dead_circumflex(&cal);

    let supplemental = cal
        .supplemental_barcodes(&token, Size::Automatic)
        .unwrap();
    assert_eq!(supplemental.len(), 1);
    assert_eq!(supplemental[0].0, '^');
    assert!(supplemental[0].1[0].starts_with("^a ^b"));

    let pending = token.next_barcode().unwrap();
    assert_eq!(pending.round_index, 1);
}

#[test]
fn test_combined_and_standalone_echo_never_conflated() {
    let cal = Calibrator::new();
    let token = after_baseline_with_dead_circumflex(&cal);
    let round_payload = token.next_barcode().unwrap().payload.clone();

    // '^' combines with vowels into a single accented character; with
    // every other base it echoes standalone before the base.
    let response = respond_dead_round(&round_payload, |base| match compose('^', base) {
        Some(accented) => format!("\u{0}{}", accented),
        None => format!("\u{0}^{}", base),
    });

    let token = cal.calibrate(&response, token).unwrap();
    assert!(token.is_terminal());
    let data = token.calibration_data.expect("calibration data");

    assert_eq!(
        data.dead_key_character_map.get("\u{0}\u{ea}"),
        Some(&"^e".to_string())
    );
    assert_eq!(
        data.dead_key_character_map.get("\u{0}\u{e2}"),
        Some(&"^a".to_string())
    );
    assert_eq!(data.dead_keys_map.get("\u{0}^"), Some(&"^".to_string()));

    // The standalone echo is never recorded as a combined entry.
    assert!(!data.dead_key_character_map.contains_key("\u{0}^"));
}

#[test]
fn test_combined_without_nul_marker_disambiguated() {
    let cal = Calibrator::new();
    let token = after_baseline_with_dead_circumflex(&cal);
    let round_payload = token.next_barcode().unwrap().payload.clone();

    // The host reports composed characters directly, without the NUL
    // marker: the entry collides with ordinary character-map keys and
    // lands in the disambiguation map.
    let response = respond_dead_round(&round_payload, |base| match compose('^', base) {
        Some(accented) => accented.to_string(),
        None => format!("\u{0}^{}", base),
    });

    let token = cal.calibrate(&response, token).unwrap();
    let data = token.calibration_data.expect("calibration data");
    assert_eq!(
        data.dead_key_character_map.get("\u{ea}"),
        Some(&"^e".to_string())
    );
}

#[test]
fn test_ligature_recorded_for_uncomposed_pair() {
    let cal = Calibrator::new();
    let token = after_baseline_with_dead_circumflex(&cal);
    let round_payload = token.next_barcode().unwrap().payload.clone();

    // The 'o' pair comes back as two plain characters unrelated to the
    // images of either key: a ligature of the pair.
    let response = respond_dead_round(&round_payload, |base| {
        if base == 'o' {
            "xy".to_string()
        } else {
            match compose('^', base) {
                Some(accented) => format!("\u{0}{}", accented),
                None => format!("\u{0}^{}", base),
            }
        }
    });

    let token = cal.calibrate(&response, token).unwrap();
    let data = token.calibration_data.expect("calibration data");
    assert_eq!(data.ligature_map.get("xy"), Some(&'\u{f4}'));
}

#[test]
fn test_ambiguous_slot_prefers_character_map_reading() {
    let cal = Calibrator::new();
    let token = after_baseline_with_dead_circumflex(&cal);
    let round_payload = token.next_barcode().unwrap().payload.clone();

    // The 'u' pair comes back as the plain images "^u": both the pass
    // through and the standalone-echo reading fit.
    let response = respond_dead_round(&round_payload, |base| {
        if base == 'u' {
            "^u".to_string()
        } else {
            match compose('^', base) {
                Some(accented) => format!("\u{0}{}", accented),
                None => format!("\u{0}^{}", base),
            }
        }
    });

    let token = cal.calibrate(&response, token).unwrap();
    assert!(token
        .errors
        .iter()
        .any(|e| e.information_type == InformationType::AmbiguousDeadKeyInterpretation));

    let data = token.calibration_data.expect("calibration data");
    assert!(!data.ligature_map.contains_key("^u"));
    assert!(!data.dead_key_character_map.contains_key("^u"));
}

#[test]
fn test_garbled_dead_key_round_discards_session() {
    let cal = Calibrator::new();
    let token = after_baseline_with_dead_circumflex(&cal);
    let round_payload = token.next_barcode().unwrap().payload.clone();

    // Every pair collapses to the bare echo: one half of the pair is
    // missing, which is unrecoverable.
    let response = respond_dead_round(&round_payload, |_| "^".to_string());

    let token = cal.calibrate(&response, token).unwrap();
    assert!(token.is_terminal());
    assert!(token.calibration_data.is_none());
    assert_eq!(
        token.errors.last().unwrap().information_type,
        InformationType::IncorrectCalibrationDataReported
    );
}

#[test]
fn test_empty_dead_key_round_discards_session() {
    let cal = Calibrator::new();
    let token = after_baseline_with_dead_circumflex(&cal);

    let token = cal.calibrate(&[], token).unwrap();
    assert!(token.is_terminal());
    assert!(token.calibration_data.is_none());
    assert_eq!(
        token.errors.last().unwrap().information_type,
        InformationType::NoCalibrationDataReported
    );
}

#[test]
fn test_multiple_dead_keys_run_sequentially() {
    let cal = Calibrator::new();
    let token = initial_token(&cal);
    let payload = token.next_barcode().unwrap().payload.clone();

    // Both '^' and '~' are host-side dead keys.
    let response = payload
        .replace(" ^ ", " \u{0}^ ")
        .replace(" ~ ", " \u{0}~ ");
    let mut token = cal.calibrate(&codes(&response), token).unwrap();
    assert_eq!(token.remaining_barcodes.len(), 2);

    // Answer each pending dead-key round in order.
    while !token.is_terminal() {
        let pending = token.next_barcode().unwrap().payload.clone();
        let dead = pending.chars().next().unwrap();
        let response = respond_dead_round(&pending, |base| match compose(dead, base) {
            Some(accented) => format!("\u{0}{}", accented),
            None => format!("\u{0}{}{}", dead, base),
        });
        token = cal.calibrate(&response, token).unwrap();
    }

    let data = token.calibration_data.expect("calibration data");
    assert_eq!(data.dead_keys_map.get("\u{0}^"), Some(&"^".to_string()));
    assert_eq!(data.dead_keys_map.get("\u{0}~"), Some(&"~".to_string()));
    assert_eq!(
        data.dead_key_character_map.get("\u{0}\u{f1}"),
        Some(&"~n".to_string())
    );
}
