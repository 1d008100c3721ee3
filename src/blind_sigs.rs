//! Blind signatures.
//!
//! The spender places a message in an envelope (blinding), the signer
//! signs the envelope without ever seeing the message, and the spender
//! removes the envelope to obtain a signature that verifies against the
//! original message.

mod bls;
mod rsa;

pub use self::bls::{BlsBlind, BlsBlindedMessage, BlsBlindingFactor};
pub use self::rsa::{RsaBlind, RsaBlindingFactor, RsaPublicKey, RsaSecretKey, RsaValue};

use crate::config::Params;
use crate::error::Result;
use rand::{CryptoRng, RngCore};
use std::fmt::Debug;

/// A blind-signature scheme usable by the coin protocol.
///
/// Implementors are marker types; all state lives in the associated
/// key, envelope and signature types.
pub trait BlindScheme {
    type PublicKey: Clone + Debug + PartialEq + Send + Sync;
    type SecretKey: Send + Sync;
    /// Blinded message sent to the signer.
    type Blinded: Clone + Debug;
    /// The signer's answer, still blinded.
    type BlindSignature: Clone + Debug;
    /// Kept secret by the spender until unblinding.
    type BlindingFactor: Debug;
    type Signature: Clone + Debug + PartialEq;

    fn generate_keypair<R: RngCore + CryptoRng>(
        params: &Params,
        rng: &mut R,
    ) -> Result<(Self::SecretKey, Self::PublicKey)>;

    fn blind<R: RngCore + CryptoRng>(
        message: &[u8],
        pk: &Self::PublicKey,
        rng: &mut R,
    ) -> Result<(Self::Blinded, Self::BlindingFactor)>;

    fn sign(blinded: &Self::Blinded, sk: &Self::SecretKey) -> Result<Self::BlindSignature>;

    fn unblind(
        signed: &Self::BlindSignature,
        factor: &Self::BlindingFactor,
        pk: &Self::PublicKey,
    ) -> Result<Self::Signature>;

    fn verify(signature: &Self::Signature, pk: &Self::PublicKey, message: &[u8]) -> bool;
}
