use crate::size::Size;
use serde::{Deserialize, Serialize};

/// One physical barcode the caller must scan: a fragment of a calibration
/// round's payload plus the symbol size the renderer should use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BarcodeRequest {
    pub payload: String,
    pub size: Size,
    /// Index of the calibration round this fragment belongs to. Round 0 is
    /// always the baseline round.
    pub round_index: usize,
    pub segment_index: usize,
    pub segment_count: usize,
}

impl BarcodeRequest {
    pub fn new(payload: impl Into<String>, size: Size, round_index: usize) -> Self {
        Self {
            payload: payload.into(),
            size,
            round_index,
            segment_index: 0,
            segment_count: 1,
        }
    }

    pub fn is_split(&self) -> bool {
        self.segment_count > 1
    }

    pub fn is_final_segment(&self) -> bool {
        self.segment_index + 1 == self.segment_count
    }
}
