//! Anonymous electronic cash on blind signatures.
//!
//! A coin hides its owner's identity in k secret-shared commitment pairs.
//! Spending it once reveals one half of every pair, which says nothing;
//! spending it twice lets the Authority XOR two different halves back
//! together and recover who cheated.

mod authority;
mod blind_sigs;
mod coin;
mod config;
mod detect;
mod error;
mod identity;
pub mod issuance;
mod merchant;
pub mod otp;
mod utils;

#[cfg(test)]
mod test_utils;

pub use crate::authority::Authority;
pub use crate::blind_sigs::{
    BlindScheme, BlsBlind, BlsBlindedMessage, BlsBlindingFactor, RsaBlind, RsaBlindingFactor,
    RsaPublicKey, RsaSecretKey, RsaValue,
};
pub use crate::coin::{Coin, CoinString, Guid};
pub use crate::config::{
    Params, BANK_TAG, COIN_RIS_LENGTH, COMMITMENT_LENGTH, IDENT_MARKER, RSA_MODULUS_BITS,
};
pub use crate::detect::{DoubleSpendDetector, Outcome};
pub use crate::error::{CashError, Error, Result};
pub use crate::identity::{
    decode_identity, encode_identity, CommitmentPair, IdentityCommitmentSet, RevealedIdentity,
    Side,
};
pub use crate::merchant::{Merchant, RisOpening};
pub use crate::utils::Digest;

/// Re-exported logging macros from tracing
pub mod log {
    pub use tracing::{debug, error, info, trace, warn};
}
