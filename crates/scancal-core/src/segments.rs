use crate::consts::MIN_FRAGMENT_CAPACITY;
use crate::error::{ScResult, ScanCalError};
use crate::rounds::CalibrationRound;
use scancal_protocol::{BarcodeRequest, Size};
use tracing::debug;

/// Splits a round's payload into the barcode requests the caller must scan.
///
/// Fragment boundaries are plain character offsets fixed at generation
/// time; no escaping is applied, and the engine reassembles received
/// fragments by straight in-order concatenation.
pub fn requests_for_round(
    round: &CalibrationRound,
    round_index: usize,
    size: Size,
) -> ScResult<Vec<BarcodeRequest>> {
    let payload = round.payload();

    let capacity = match size.capacity() {
        None => {
            return Ok(vec![BarcodeRequest::new(payload, size, round_index)]);
        }
        Some(cap) => cap,
    };

    if capacity < MIN_FRAGMENT_CAPACITY {
        return Err(ScanCalError::Capacity(format!(
            "symbol size {} holds {} characters, below the {}-character fragment minimum",
            size, capacity, MIN_FRAGMENT_CAPACITY
        )));
    }

    let chars: Vec<char> = payload.chars().collect();
    let segment_count = chars.len().div_ceil(capacity);
    let requests: Vec<BarcodeRequest> = chars
        .chunks(capacity)
        .enumerate()
        .map(|(segment_index, chunk)| BarcodeRequest {
            payload: chunk.iter().collect(),
            size,
            round_index,
            segment_index,
            segment_count,
        })
        .collect();

    debug!(
        round = %round.label(),
        segments = requests.len(),
        capacity,
        "generated barcode requests"
    );
    Ok(requests)
}
