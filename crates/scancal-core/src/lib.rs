// Re-export types from the protocol crate so they are accessible via scancal_core::*
pub use scancal_protocol::{
    BarcodeRequest, CalibrationData, Information, InformationType, KeyboardScript,
    ScannerKeyboardPerformance, Severity, Size,
};

// Internal Modules
pub mod aim;
pub mod calibrator;
pub mod consts;
pub mod error;
pub mod framing;
pub mod infer;
pub mod rounds;
pub mod segments;
pub mod token;

pub use calibrator::{Calibrator, SymbolRenderer, TokenSequence};
pub use error::{ScResult, ScanCalError};
pub use token::CalibrationToken;
