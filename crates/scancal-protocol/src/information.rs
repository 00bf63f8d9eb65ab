use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// Severity of a calibration anomaly. Errors are terminal for the session;
/// warnings are informative and leave the session usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
pub enum Severity {
    Error,
    Warning,
}

/// Classified calibration anomalies.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
pub enum InformationType {
    /// The reported data has no recognizable overlap with the probe payload.
    UnrecognisedData,
    /// Nothing was reported for the scanned probe.
    NoCalibrationDataReported,
    /// The reported data is a strict prefix of the expected probe payload.
    PartialCalibrationDataReported,
    /// The reported data does not align slot-for-slot with the probe payload.
    IncorrectCalibrationDataReported,
    /// The AIM flag character produced no recognizable output.
    AimFlagNotReported,
    /// The group separator control character was swallowed by the host.
    GroupSeparatorNotReliablyReported,
    /// Scanner and host keyboard layouts disagree on at least one character.
    NonCorrespondingKeyboardLayouts,
    /// A dead-key slot admits more than one plausible interpretation.
    AmbiguousDeadKeyInterpretation,
}

impl InformationType {
    pub fn severity(&self) -> Severity {
        match self {
            InformationType::UnrecognisedData
            | InformationType::NoCalibrationDataReported
            | InformationType::PartialCalibrationDataReported
            | InformationType::IncorrectCalibrationDataReported => Severity::Error,
            InformationType::AimFlagNotReported
            | InformationType::GroupSeparatorNotReliablyReported
            | InformationType::NonCorrespondingKeyboardLayouts
            | InformationType::AmbiguousDeadKeyInterpretation => Severity::Warning,
        }
    }

    pub fn default_description(&self) -> &'static str {
        match self {
            InformationType::UnrecognisedData => {
                "The reported data does not resemble any calibration probe."
            }
            InformationType::NoCalibrationDataReported => {
                "No data was reported for the calibration probe."
            }
            InformationType::PartialCalibrationDataReported => {
                "Only part of the calibration probe was reported."
            }
            InformationType::IncorrectCalibrationDataReported => {
                "The reported data does not align with the calibration probe."
            }
            InformationType::AimFlagNotReported => {
                "The AIM flag character was not reported; symbology identifiers may not be recognized."
            }
            InformationType::GroupSeparatorNotReliablyReported => {
                "The group separator was not reliably reported; GS1 separators may be lost."
            }
            InformationType::NonCorrespondingKeyboardLayouts => {
                "The scanner and host keyboard layouts do not correspond."
            }
            InformationType::AmbiguousDeadKeyInterpretation => {
                "A dead-key response admits more than one interpretation; the character map reading was preferred."
            }
        }
    }
}

/// A single classified anomaly attached to a calibration token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Information {
    pub information_type: InformationType,
    pub description: String,
    pub severity: Severity,
}

impl Information {
    pub fn new(information_type: InformationType) -> Self {
        Self {
            information_type,
            description: information_type.default_description().to_string(),
            severity: information_type.severity(),
        }
    }

    pub fn with_description(information_type: InformationType, description: impl Into<String>) -> Self {
        Self {
            information_type,
            description: description.into(),
            severity: information_type.severity(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_every_type_has_description() {
        for t in InformationType::iter() {
            assert!(!t.default_description().is_empty());
        }
    }

    #[test]
    fn test_terminal_types_are_errors() {
        assert_eq!(
            InformationType::NoCalibrationDataReported.severity(),
            Severity::Error
        );
        assert_eq!(
            InformationType::AimFlagNotReported.severity(),
            Severity::Warning
        );
    }
}
