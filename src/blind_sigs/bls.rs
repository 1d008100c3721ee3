use super::BlindScheme;
use crate::config::Params;
use crate::error::{Error, Result};
use crate::log::debug;
use crate::utils::*;
use blsttc::pairing::bls12_381::{Fr, G2};
use blsttc::{PublicKey, SecretKey, Signature};
use rand::{CryptoRng, RngCore};
use std::convert::{TryFrom, TryInto};
use std::fmt;

/// Marker type selecting BLS12-381 blind signatures.
#[derive(Clone, Copy, Debug, Default)]
pub struct BlsBlind;

/// A message hashed to G2 and multiplied by the blinding factor.
///
/// Signing the envelope also signs the message inside, even though
/// the signer never sees it.
#[derive(Clone, Copy, Debug)]
pub struct BlsBlindedMessage {
    blinded_msg: G2,
}

impl BlsBlindedMessage {
    pub fn blinded_msg(&self) -> G2 {
        self.blinded_msg
    }

    pub fn to_bytes(&self) -> [u8; 96] {
        g2_to_be_bytes(self.blinded_msg)
    }
}

impl From<G2> for BlsBlindedMessage {
    fn from(blinded_msg: G2) -> Self {
        Self { blinded_msg }
    }
}

impl TryFrom<[u8; 96]> for BlsBlindedMessage {
    type Error = Error;

    fn try_from(b: [u8; 96]) -> Result<Self> {
        Ok(Self::from(be_bytes_to_g2(b)?))
    }
}

impl TryFrom<&[u8]> for BlsBlindedMessage {
    type Error = Error;

    fn try_from(b: &[u8]) -> Result<Self> {
        let bytes: [u8; 96] = b.try_into()?;
        Self::try_from(bytes)
    }
}

/// The spender's secret scalar `r`.
pub struct BlsBlindingFactor(Fr);

impl fmt::Debug for BlsBlindingFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BlsBlindingFactor(<redacted>)")
    }
}

fn sk_bendian(sk: &SecretKey) -> Result<Fr> {
    fr_from_be_bytes(sk.to_bytes())
}

impl BlindScheme for BlsBlind {
    type PublicKey = PublicKey;
    type SecretKey = SecretKey;
    type Blinded = BlsBlindedMessage;
    type BlindSignature = Signature;
    type BlindingFactor = BlsBlindingFactor;
    type Signature = Signature;

    fn generate_keypair<R: RngCore + CryptoRng>(
        _params: &Params,
        rng: &mut R,
    ) -> Result<(SecretKey, PublicKey)> {
        let mut bytes = [0u8; 32];
        rng.fill_bytes(&mut bytes);
        bytes[0] &= 0x3f;
        let sk = SecretKey::from_bytes(bytes)?;
        let pk = sk.public_key();
        debug!("generated BLS signing key");
        Ok((sk, pk))
    }

    fn blind<R: RngCore + CryptoRng>(
        message: &[u8],
        _pk: &PublicKey,
        rng: &mut R,
    ) -> Result<(BlsBlindedMessage, BlsBlindingFactor)> {
        let msg_g2 = hash_g2_with_dst(message)?;
        let r = random_fr(rng)?;
        let blinded_msg = blind(msg_g2, r);
        Ok((BlsBlindedMessage::from(blinded_msg), BlsBlindingFactor(r)))
    }

    fn sign(blinded: &BlsBlindedMessage, sk: &SecretKey) -> Result<Signature> {
        // We are signing a G2, not message bytes, so we can't
        // use blsttc:SecretKey.sign(msg);
        let bs_sig_g2 = sign_g2(blinded.blinded_msg(), sk_bendian(sk)?);
        let sig = Signature::from_bytes(g2_to_be_bytes(bs_sig_g2))
            .map_err(|e| Error::Signing(e.to_string()))?;
        Ok(sig)
    }

    fn unblind(
        signed: &Signature,
        factor: &BlsBlindingFactor,
        _pk: &PublicKey,
    ) -> Result<Signature> {
        let blinded_sig_g2 = be_bytes_to_g2(signed.to_bytes())?;
        let unblinded_sig_g2 = unblind(blinded_sig_g2, factor.0)?;
        Ok(Signature::from_bytes(g2_to_be_bytes(unblinded_sig_g2))?)
    }

    fn verify(signature: &Signature, pk: &PublicKey, message: &[u8]) -> bool {
        // pair(pk_as_g1, data_as_g2) == pair(1_as_g1, sig_as_g2)
        match hash_g2_with_dst(message) {
            Ok(data_g2) => pk.verify_g2(signature, data_g2),
            Err(_) => false,
        }
    }
}
