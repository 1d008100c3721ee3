//! Chaum blind signatures over textbook RSA.
//!
//! The message representative is `SHA-256(message) mod N`. The spender
//! sends `m * r^E mod N`, the signer returns its `D`-th power, and the
//! spender multiplies by `r^-1` to get `m^D mod N`.

use super::BlindScheme;
use crate::config::Params;
use crate::error::{Error, Result};
use crate::log::debug;
use crate::utils::sha256;
use ::rsa::traits::{PrivateKeyParts, PublicKeyParts};
use ::rsa::RsaPrivateKey;
use num_bigint::BigUint;
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Marker type selecting RSA blind signatures.
#[derive(Clone, Copy, Debug, Default)]
pub struct RsaBlind;

/// The Authority's public key `(N, E)`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RsaPublicKey {
    n: BigUint,
    e: BigUint,
}

impl RsaPublicKey {
    pub fn new(n: BigUint, e: BigUint) -> Self {
        Self { n, e }
    }

    pub fn n(&self) -> &BigUint {
        &self.n
    }

    pub fn e(&self) -> &BigUint {
        &self.e
    }

    fn byte_len(&self) -> usize {
        ((self.n.bits() + 7) / 8) as usize
    }
}

/// The Authority's private exponent together with its modulus.
#[derive(Clone)]
pub struct RsaSecretKey {
    n: BigUint,
    d: BigUint,
}

impl fmt::Debug for RsaSecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RsaSecretKey")
            .field("n", &self.n)
            .field("d", &"<redacted>")
            .finish()
    }
}

/// An integer modulo N: a blinded message, a blinded signature or a
/// final signature depending on where it is in the exchange.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RsaValue(BigUint);

impl RsaValue {
    pub fn to_bytes_be(&self) -> Vec<u8> {
        self.0.to_bytes_be()
    }

    pub fn from_bytes_be(bytes: &[u8]) -> Self {
        Self(BigUint::from_bytes_be(bytes))
    }
}

/// The spender's secret `r`.
pub struct RsaBlindingFactor(BigUint);

impl fmt::Debug for RsaBlindingFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RsaBlindingFactor(<redacted>)")
    }
}

fn message_representative(message: &[u8], n: &BigUint) -> BigUint {
    BigUint::from_bytes_be(&sha256(message)) % n
}

fn random_below<R: RngCore + CryptoRng>(pk: &RsaPublicKey, rng: &mut R) -> BigUint {
    let mut bytes = vec![0u8; pk.byte_len()];
    rng.fill_bytes(&mut bytes);
    BigUint::from_bytes_be(&bytes) % &pk.n
}

impl BlindScheme for RsaBlind {
    type PublicKey = RsaPublicKey;
    type SecretKey = RsaSecretKey;
    type Blinded = RsaValue;
    type BlindSignature = RsaValue;
    type BlindingFactor = RsaBlindingFactor;
    type Signature = RsaValue;

    fn generate_keypair<R: RngCore + CryptoRng>(
        params: &Params,
        rng: &mut R,
    ) -> Result<(RsaSecretKey, RsaPublicKey)> {
        let private_key = RsaPrivateKey::new(rng, params.rsa_modulus_bits)
            .map_err(|e| Error::KeyGeneration(e.to_string()))?;

        let n = BigUint::from_bytes_be(&private_key.n().to_bytes_be());
        let e = BigUint::from_bytes_be(&private_key.e().to_bytes_be());
        let d = BigUint::from_bytes_be(&private_key.d().to_bytes_be());
        debug!(bits = params.rsa_modulus_bits, "generated RSA signing key");

        Ok((RsaSecretKey { n: n.clone(), d }, RsaPublicKey { n, e }))
    }

    fn blind<R: RngCore + CryptoRng>(
        message: &[u8],
        pk: &RsaPublicKey,
        rng: &mut R,
    ) -> Result<(RsaValue, RsaBlindingFactor)> {
        let one = BigUint::from(1u32);
        if pk.n <= one {
            return Err(Error::Blinding("modulus is too small".into()));
        }
        let m = message_representative(message, &pk.n);

        // r must be invertible mod N; a non-invertible draw would factor N,
        // so in practice the loop runs once.
        let r = loop {
            let r = random_below(pk, rng);
            if r > one && r.modinv(&pk.n).is_some() {
                break r;
            }
        };

        let blinded = (m * r.modpow(&pk.e, &pk.n)) % &pk.n;
        Ok((RsaValue(blinded), RsaBlindingFactor(r)))
    }

    fn sign(blinded: &RsaValue, sk: &RsaSecretKey) -> Result<RsaValue> {
        if blinded.0 >= sk.n {
            return Err(Error::Signing("blinded value out of range".into()));
        }
        Ok(RsaValue(blinded.0.modpow(&sk.d, &sk.n)))
    }

    fn unblind(
        signed: &RsaValue,
        factor: &RsaBlindingFactor,
        pk: &RsaPublicKey,
    ) -> Result<RsaValue> {
        let r_inv = factor
            .0
            .modinv(&pk.n)
            .ok_or_else(|| Error::Blinding("blinding factor has no inverse".into()))?;
        Ok(RsaValue((&signed.0 * r_inv) % &pk.n))
    }

    fn verify(signature: &RsaValue, pk: &RsaPublicKey, message: &[u8]) -> bool {
        if signature.0 >= pk.n {
            return false;
        }
        signature.0.modpow(&pk.e, &pk.n) == message_representative(message, &pk.n)
    }
}
