use crate::consts::{
    dead_key_bases, printable_repertoire, AIM_FLAG, AIM_SYMBOLOGY_CODE, CONTROL_PLACEHOLDERS,
    PROBE_DELIMITER,
};
use itertools::Itertools;

/// One probe slot of a calibration round. Slots are separated by
/// `PROBE_DELIMITER` in the payload; a `SectionBreak` contributes an empty
/// slot, which renders as a double delimiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpectedSlot {
    Printable(char),
    Control(char),
    SectionBreak,
    AimProbe,
    DeadKeyPair { dead: char, base: char },
}

impl ExpectedSlot {
    /// The literal characters this slot contributes to the payload.
    pub fn literal(&self) -> String {
        match self {
            ExpectedSlot::Printable(c) | ExpectedSlot::Control(c) => c.to_string(),
            ExpectedSlot::SectionBreak => String::new(),
            ExpectedSlot::AimProbe => format!("{}{}", AIM_FLAG, AIM_SYMBOLOGY_CODE),
            ExpectedSlot::DeadKeyPair { dead, base } => format!("{}{}", dead, base),
        }
    }
}

/// A calibration round: one request/response cycle for one class of probe.
/// Closed variant set; each variant carries its own payload generator and
/// is dispatched through the calibrator's round-sequencing loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalibrationRound {
    Baseline { assess_aim: bool },
    DeadKey { dead_key: char },
}

impl CalibrationRound {
    pub fn expected_slots(&self) -> Vec<ExpectedSlot> {
        match self {
            CalibrationRound::Baseline { assess_aim } => {
                let mut slots: Vec<ExpectedSlot> =
                    printable_repertoire().map(ExpectedSlot::Printable).collect();
                slots.push(ExpectedSlot::SectionBreak);
                slots.extend(CONTROL_PLACEHOLDERS.iter().copied().map(ExpectedSlot::Control));
                if *assess_aim {
                    slots.push(ExpectedSlot::SectionBreak);
                    slots.push(ExpectedSlot::AimProbe);
                }
                slots
            }
            CalibrationRound::DeadKey { dead_key } => dead_key_bases()
                .map(|base| ExpectedSlot::DeadKeyPair {
                    dead: *dead_key,
                    base,
                })
                .collect(),
        }
    }

    pub fn payload(&self) -> String {
        self.expected_slots()
            .iter()
            .map(ExpectedSlot::literal)
            .join(&PROBE_DELIMITER.to_string())
    }

    pub fn label(&self) -> String {
        match self {
            CalibrationRound::Baseline { .. } => "baseline".to_string(),
            CalibrationRound::DeadKey { dead_key } => format!("dead-key '{}'", dead_key),
        }
    }
}
