use blsttc::error::FromBytesError;
use std::array::TryFromSliceError;
use thiserror::Error;

/// Specialisation of `std::Result`.
pub type Result<T, E = CashError> = std::result::Result<T, E>;
pub type Error = CashError;

#[derive(Error, Debug)]
/// error variants.
pub enum CashError {
    #[error("An error occured when signing {0}")]
    Signing(String),

    #[error("key generation failed: {0}")]
    KeyGeneration(String),

    #[error("blinding failed: {0}")]
    Blinding(String),

    #[error("invalid curve point: {0}")]
    InvalidPoint(String),

    #[error("invalid coin signature")]
    InvalidSignature,

    #[error("malformed coin string: {0}")]
    MalformedCoinString(String),

    #[error("unrecognized RIS opening: {0}")]
    UnrecognizedOpening(String),

    #[error("coin {0} is already signed")]
    AlreadySigned(String),

    #[error("invalid identity: {0}")]
    InvalidIdentity(String),

    #[error("one-time pad length mismatch: key is {key} bytes, input is {input} bytes")]
    OtpLength { key: usize, input: usize },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("deserialization from bytes failed")]
    BlsttcFromBytes(#[from] FromBytesError),

    #[error("deserialization from bytes failed")]
    InvalidBytes(#[from] TryFromSliceError),
}
