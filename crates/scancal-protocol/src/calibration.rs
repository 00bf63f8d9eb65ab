use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use strum_macros::{Display, EnumIter, EnumString};

/// Script family of the host keyboard layout, inferred from the characters
/// it reported during the baseline round. Used to select safe fallback
/// heuristics downstream.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
)]
pub enum KeyboardScript {
    #[default]
    Latin,
    Greek,
    Cyrillic,
    Unknown,
}

/// Coarse classification of how reliably the scanner reproduced the probe
/// keystrokes. Passive output, never an enforced deadline.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
)]
pub enum ScannerKeyboardPerformance {
    #[default]
    High,
    Medium,
    Low,
}

/// The inferred character-substitution model. Immutable once constructed;
/// the downstream identifier parser applies the maps to every raw scan
/// before field extraction.
///
/// Map directions:
/// - `character_map`: received character -> expected character (identity
///   entries omitted).
/// - `dead_keys_map`: received dead-key echo sequence (NUL + echo) -> the
///   canonical dead-key character.
/// - `dead_key_character_map`: received combined sequence -> the expected
///   two-character pair it stands for. Keys without a NUL marker are the
///   collision case this map exists to disambiguate from `character_map`.
/// - `ligature_map`: received two-character sequence -> the single logical
///   character it represents.
/// - `scanner_dead_keys_map` / `scanner_unassigned_keys`: keys the
///   scanner-side layout swallows or cannot transmit, needed to
///   reconstruct multi-key sequences in the reverse direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalibrationData {
    pub character_map: BTreeMap<char, char>,
    pub dead_keys_map: BTreeMap<String, String>,
    pub dead_key_character_map: BTreeMap<String, String>,
    pub ligature_map: BTreeMap<String, char>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub scanner_dead_keys_map: BTreeMap<char, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub scanner_unassigned_keys: Vec<char>,
    pub reported_characters: String,
    pub aim_flag_character_sequence: String,
    pub keyboard_script: KeyboardScript,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_feed_character: Option<char>,
    pub scanner_keyboard_performance: ScannerKeyboardPerformance,
}

impl CalibrationData {
    /// True when no substitution of any kind was inferred: scanner and host
    /// agree on the layout and raw scans can be consumed as-is.
    pub fn is_identity(&self) -> bool {
        self.character_map.is_empty()
            && self.dead_keys_map.is_empty()
            && self.dead_key_character_map.is_empty()
            && self.ligature_map.is_empty()
    }

    /// Canonical textual form. All maps are ordered, so the output is
    /// deterministic and replays serialize byte-identically.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).expect("calibration data serializes")
    }

    /// Parses the canonical textual form. A document missing any required
    /// map fails here, which keeps incomplete data away from the parser.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Hex SHA-256 digest of the canonical form, used to validate that a
    /// replayed calibration matches the one the parser was built with.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.to_json().as_bytes());
        hex::encode(hasher.finalize())
    }
}

impl Default for CalibrationData {
    fn default() -> Self {
        Self {
            character_map: BTreeMap::new(),
            dead_keys_map: BTreeMap::new(),
            dead_key_character_map: BTreeMap::new(),
            ligature_map: BTreeMap::new(),
            scanner_dead_keys_map: BTreeMap::new(),
            scanner_unassigned_keys: Vec::new(),
            reported_characters: String::new(),
            aim_flag_character_sequence: String::new(),
            keyboard_script: KeyboardScript::Latin,
            prefix: None,
            suffix: None,
            code: None,
            line_feed_character: None,
            scanner_keyboard_performance: ScannerKeyboardPerformance::High,
        }
    }
}
