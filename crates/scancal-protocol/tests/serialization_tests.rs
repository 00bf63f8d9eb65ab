use scancal_protocol::{
    CalibrationData, Information, InformationType, KeyboardScript, ScannerKeyboardPerformance,
    Severity,
};
use std::fs;

fn populated() -> CalibrationData {
    let mut data = CalibrationData {
        reported_characters: "qwerty\u{1d}".to_string(),
        aim_flag_character_sequence: "\u{0}".to_string(),
        keyboard_script: KeyboardScript::Latin,
        prefix: Some("pre ".to_string()),
        line_feed_character: Some('\u{b6}'),
        scanner_keyboard_performance: ScannerKeyboardPerformance::Medium,
        ..Default::default()
    };
    data.character_map.insert('q', 'a');
    data.character_map.insert('\u{e9}', '2');
    data.dead_keys_map
        .insert("\u{0}^".to_string(), "^".to_string());
    data.dead_key_character_map
        .insert("\u{0}\u{ea}".to_string(), "^e".to_string());
    data.ligature_map.insert("ae".to_string(), '\u{e6}');
    data.scanner_dead_keys_map
        .insert('@', "\u{0}".to_string());
    data.scanner_unassigned_keys.push('#');
    data
}

#[test]
fn test_field_names_are_camel_case() {
    let text = populated().to_json();
    for field in [
        "characterMap",
        "deadKeysMap",
        "deadKeyCharacterMap",
        "ligatureMap",
        "scannerDeadKeysMap",
        "scannerUnassignedKeys",
        "reportedCharacters",
        "aimFlagCharacterSequence",
        "keyboardScript",
        "prefix",
        "lineFeedCharacter",
        "scannerKeyboardPerformance",
    ] {
        assert!(text.contains(&format!("\"{}\"", field)), "missing {}", field);
    }
}

#[test]
fn test_round_trip_through_disk() {
    let data = populated();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("calibration.json");
    fs::write(&path, data.to_json()).unwrap();

    let loaded = CalibrationData::from_json(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(loaded, data);
    assert_eq!(loaded.fingerprint(), data.fingerprint());
}

#[test]
fn test_serialization_is_deterministic() {
    assert_eq!(populated().to_json(), populated().to_json());
}

#[test]
fn test_identity_data_flags() {
    let data = CalibrationData::default();
    assert!(data.is_identity());
    assert!(!populated().is_identity());
}

#[test]
fn test_information_severity_serialized() {
    let info = Information::new(InformationType::PartialCalibrationDataReported);
    let text = serde_json::to_string(&info).unwrap();
    assert!(text.contains("\"informationType\":\"PartialCalibrationDataReported\""));
    assert!(text.contains("\"severity\":\"Error\""));

    let back: Information = serde_json::from_str(&text).unwrap();
    assert_eq!(back.severity, Severity::Error);
}
