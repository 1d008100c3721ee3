use crate::error::{Error, Result};
use blst::{blst_hash_to_g2, blst_p2, blst_p2_compress};
use blsttc::ff::{Field, PrimeField}; // for Fr trait
use blsttc::group::{CurveAffine, CurveProjective, EncodedPoint};
use blsttc::pairing::bls12_381::{Fr, FrRepr, G2Affine, G2};
use rand::{CryptoRng, RngCore};
use sha2::{Digest as _, Sha256};
use std::borrow::Borrow;

/// SHA-256 output.
pub type Digest = [u8; 32];

pub(crate) fn sha256(data: &[u8]) -> Digest {
    Sha256::digest(data).into()
}

// blst equivalent of threshold_crypto hash_g2, with the standard
// BLS signature DST so any BLS verifier agrees on the point.
pub(crate) fn hash_g2_with_dst(msg: &[u8]) -> Result<G2> {
    let mut msg_hash: blst_p2 = Default::default();
    let dst = b"BLS_SIG_BLS12381G2_XMD:SHA-256_SSWU_RO_NUL_";
    let aug = b"";
    unsafe {
        blst_hash_to_g2(
            &mut msg_hash,
            msg.as_ptr(),
            msg.len(),
            dst.as_ptr(),
            dst.len(),
            aug.as_ptr(),
            aug.len(),
        )
    };
    let mut msg_g2_bytes = [0u8; 96];
    unsafe { blst_p2_compress(&mut msg_g2_bytes[0], &msg_hash) }
    be_bytes_to_g2(msg_g2_bytes)
}

// see blsttc util.rs
pub(crate) fn fr_from_be_bytes(bytes: [u8; 32]) -> Result<Fr> {
    let mut le_bytes = bytes;
    le_bytes.reverse();
    let mut fr_u64s = [0u64; 4];
    for (i, limb) in fr_u64s.iter_mut().enumerate() {
        let mut next_u64_bytes = [0u8; 8];
        next_u64_bytes.copy_from_slice(&le_bytes[i * 8..(i + 1) * 8]);
        *limb = u64::from_le_bytes(next_u64_bytes);
    }
    Fr::from_repr(FrRepr(fr_u64s)).map_err(|e| Error::Blinding(e.to_string()))
}

/// Draws a scalar from `rng`. The top two bits are cleared so the
/// value is always below the field modulus.
pub(crate) fn random_fr<R: RngCore + CryptoRng>(rng: &mut R) -> Result<Fr> {
    let mut bytes = [0u8; 32];
    rng.fill_bytes(&mut bytes);
    bytes[0] &= 0x3f;
    fr_from_be_bytes(bytes)
}

// y = x * r
pub(crate) fn blind(g2: G2, r: Fr) -> G2 {
    g2.into_affine().mul(r)
}

// x = y * 1/r
pub(crate) fn unblind(g2: G2, r: Fr) -> Result<G2> {
    let r_inv = r
        .inverse()
        .ok_or_else(|| Error::Blinding("blinding factor has no inverse".into()))?;
    Ok(g2.into_affine().mul(r_inv))
}

// see blsttc Signature from_bytes
pub(crate) fn be_bytes_to_g2(bytes: [u8; 96]) -> Result<G2> {
    let mut compressed: <G2Affine as CurveAffine>::Compressed = EncodedPoint::empty();
    compressed.as_mut().copy_from_slice(bytes.borrow());
    let affine = compressed
        .into_affine()
        .map_err(|e| Error::InvalidPoint(e.to_string()))?;
    Ok(affine.into_projective())
}

// see blsttc Signature to_bytes
pub(crate) fn g2_to_be_bytes(g2: G2) -> [u8; 96] {
    let mut bytes = [0u8; 96];
    bytes.copy_from_slice(g2.into_affine().into_compressed().as_ref());
    bytes
}

// Equivalent to blsttc SecretKey::sign_g2, kept separate so the blinding
// factor and the signing key stay at the same level of abstraction.
pub(crate) fn sign_g2(g2: G2, fr: Fr) -> G2 {
    g2.into_affine().mul(fr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn blind_then_unblind_is_identity() -> Result<()> {
        let mut rng = StdRng::seed_from_u64(7);
        let msg = hash_g2_with_dst(b"coin")?;
        let r = random_fr(&mut rng)?;

        let blinded = blind(msg, r);
        assert_ne!(g2_to_be_bytes(blinded), g2_to_be_bytes(msg));
        assert_eq!(g2_to_be_bytes(unblind(blinded, r)?), g2_to_be_bytes(msg));
        Ok(())
    }

    #[test]
    fn g2_bytes_round_trip() -> Result<()> {
        let g2 = hash_g2_with_dst(b"round trip")?;
        let bytes = g2_to_be_bytes(g2);
        assert_eq!(g2_to_be_bytes(be_bytes_to_g2(bytes)?), bytes);
        Ok(())
    }

    #[test]
    fn sha256_known_vector() {
        assert_eq!(
            hex::encode(sha256(b"abc")),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
