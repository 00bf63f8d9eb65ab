use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanCalError {
    #[error("Barcode Capacity Error: {0}")]
    Capacity(String),

    #[error("Invalid Character Code: {0:#x} is not a Unicode scalar value")]
    InvalidCharacterCode(u32),

    #[error("Session Error: {0}")]
    Session(String),
}

pub type ScResult<T> = Result<T, ScanCalError>;
