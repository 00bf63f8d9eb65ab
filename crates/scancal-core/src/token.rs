use crate::infer::{BaselineInference, DeadKeyInference};
use crate::rounds::CalibrationRound;
use scancal_protocol::{
    BarcodeRequest, CalibrationData, Information, KeyboardScript, ScannerKeyboardPerformance,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Snapshot of calibration progress. Replaced, never mutated, on every
/// `calibrate` call. Terminal once `remaining_barcodes` is empty: at that
/// point `calibration_data` is populated (success) or absent (failure,
/// with explanatory `errors`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalibrationToken {
    pub remaining_barcodes: Vec<BarcodeRequest>,
    pub errors: Vec<Information>,
    pub calibration_data: Option<CalibrationData>,
    #[serde(skip)]
    pub(crate) session: SessionState,
}

impl CalibrationToken {
    /// The barcode the caller should scan next, if any.
    pub fn next_barcode(&self) -> Option<&BarcodeRequest> {
        self.remaining_barcodes.first()
    }

    pub fn is_terminal(&self) -> bool {
        self.remaining_barcodes.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        self.errors.iter().any(Information::is_error)
    }
}

/// Session state threaded through the token chain. Internal: the public
/// face of a token is the request list, the anomalies, and the data.
#[derive(Debug, Clone, Default)]
pub(crate) struct SessionState {
    pub rounds: Vec<CalibrationRound>,
    pub fragments: Vec<String>,
    pub draft: Draft,
}

/// The progressively built calibration model. Explicit immutable draft
/// value, not hidden engine state, so `calibrate` stays a pure step.
#[derive(Debug, Clone, Default)]
pub(crate) struct Draft {
    pub character_map: BTreeMap<char, char>,
    pub dead_keys_map: BTreeMap<String, String>,
    pub dead_key_character_map: BTreeMap<String, String>,
    pub ligature_map: BTreeMap<String, char>,
    pub scanner_dead_keys_map: BTreeMap<char, String>,
    pub scanner_unassigned_keys: Vec<char>,
    pub reported_characters: String,
    pub aim_flag_character_sequence: String,
    pub keyboard_script: KeyboardScript,
    pub line_feed_character: Option<char>,
    pub performance: ScannerKeyboardPerformance,
    pub discovered_prefix: Option<String>,
    pub discovered_suffix: Option<String>,
    pub images: BTreeMap<char, char>,
    pub dead_key_echoes: BTreeMap<char, char>,
}

impl Draft {
    pub fn absorb_baseline(&mut self, inference: BaselineInference) {
        self.character_map = inference.character_map;
        self.dead_keys_map = inference.dead_keys_map;
        self.scanner_dead_keys_map = inference.scanner_dead_keys_map;
        self.scanner_unassigned_keys = inference.scanner_unassigned_keys;
        self.reported_characters = inference.reported_characters;
        self.aim_flag_character_sequence = inference.aim_flag_character_sequence;
        self.keyboard_script = inference.keyboard_script;
        self.line_feed_character = inference.line_feed_character;
        self.performance = inference.performance;
        self.discovered_prefix = inference.discovered_prefix;
        self.discovered_suffix = inference.discovered_suffix;
        self.images = inference.images;
        self.dead_key_echoes = inference.dead_key_echoes;
    }

    pub fn absorb_dead_key_round(&mut self, inference: DeadKeyInference) {
        self.dead_key_character_map
            .extend(inference.dead_key_character_map);
        self.dead_keys_map.extend(inference.dead_keys_map);
        self.ligature_map.extend(inference.ligature_map);
    }

    pub fn into_calibration_data(
        self,
        prefix: Option<String>,
        suffix: Option<String>,
        code: Option<String>,
    ) -> CalibrationData {
        CalibrationData {
            character_map: self.character_map,
            dead_keys_map: self.dead_keys_map,
            dead_key_character_map: self.dead_key_character_map,
            ligature_map: self.ligature_map,
            scanner_dead_keys_map: self.scanner_dead_keys_map,
            scanner_unassigned_keys: self.scanner_unassigned_keys,
            reported_characters: self.reported_characters,
            aim_flag_character_sequence: self.aim_flag_character_sequence,
            keyboard_script: self.keyboard_script,
            prefix: prefix.or(self.discovered_prefix),
            suffix: suffix.or(self.discovered_suffix),
            code,
            line_feed_character: self.line_feed_character,
            scanner_keyboard_performance: self.performance,
        }
    }
}
