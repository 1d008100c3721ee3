//! Secret-shared identity commitments.
//!
//! Each coin carries k pairs `(Left_i, Right_i)` with
//! `Left_i XOR Right_i == "<marker>:<guid>:<identity>"` zero-padded to the
//! commitment length. `Left_i` is uniformly random, so either half on
//! its own is indistinguishable from noise.

use crate::coin::Guid;
use crate::config::Params;
use crate::error::{Error, Result};
use crate::otp::make_otp;
use crate::utils::{sha256, Digest};
use rand::distributions::{Distribution, Standard};
use rand::{CryptoRng, Rng, RngCore};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which half of every commitment pair a merchant asks for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

impl Distribution<Side> for Standard {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Side {
        if rng.gen::<bool>() {
            Side::Left
        } else {
            Side::Right
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Left => f.write_str("left"),
            Side::Right => f.write_str("right"),
        }
    }
}

/// One `(Left, Right)` pair.
#[derive(Clone, PartialEq, Eq)]
pub struct CommitmentPair {
    left: Vec<u8>,
    right: Vec<u8>,
}

impl CommitmentPair {
    fn new<R: RngCore + CryptoRng>(plaintext: &[u8], rng: &mut R) -> Self {
        let (left, right) = make_otp(plaintext, rng);
        Self { left, right }
    }

    pub fn half(&self, side: Side) -> &[u8] {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    pub fn digest(&self, side: Side) -> Digest {
        sha256(self.half(side))
    }
}

/// The k commitment pairs of one coin. This is the only place the
/// owner's identity is stored.
#[derive(Clone, PartialEq, Eq)]
pub struct IdentityCommitmentSet {
    pairs: Vec<CommitmentPair>,
}

impl IdentityCommitmentSet {
    pub fn new<R: RngCore + CryptoRng>(
        identity: &str,
        guid: &Guid,
        params: &Params,
        rng: &mut R,
    ) -> Result<Self> {
        let plaintext = encode_identity(
            &params.ident_marker,
            guid,
            identity,
            params.commitment_length,
        )?;
        let pairs = (0..params.ris_length)
            .map(|_| CommitmentPair::new(&plaintext, rng))
            .collect();
        Ok(Self { pairs })
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn pairs(&self) -> &[CommitmentPair] {
        &self.pairs
    }

    /// The `side` half of every pair, in index order.
    pub fn reveal(&self, side: Side) -> Vec<Vec<u8>> {
        self.pairs.iter().map(|p| p.half(side).to_vec()).collect()
    }

    pub fn digests(&self, side: Side) -> Vec<Digest> {
        self.pairs.iter().map(|p| p.digest(side)).collect()
    }
}

impl fmt::Debug for IdentityCommitmentSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentityCommitmentSet")
            .field("pairs", &self.pairs.len())
            .finish()
    }
}

/// Identity recovered from a pair of opposite halves.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RevealedIdentity {
    pub guid: String,
    pub identity: String,
}

/// Builds the zero-padded plaintext hidden in every commitment pair.
pub fn encode_identity(
    marker: &str,
    guid: &Guid,
    identity: &str,
    length: usize,
) -> Result<Vec<u8>> {
    if identity.is_empty() {
        return Err(Error::InvalidIdentity("identity is empty".into()));
    }
    if identity.contains('\0') {
        return Err(Error::InvalidIdentity("identity contains a NUL byte".into()));
    }

    let mut plaintext = format!("{}:{}:{}", marker, guid, identity).into_bytes();
    if plaintext.len() > length {
        return Err(Error::InvalidIdentity(format!(
            "encoded identity is {} bytes, commitments hold {}",
            plaintext.len(),
            length
        )));
    }
    plaintext.resize(length, 0);
    Ok(plaintext)
}

/// Parses a candidate plaintext. Returns `None` for anything that does
/// not carry the marker, which is what XOR noise looks like.
pub fn decode_identity(marker: &str, candidate: &[u8]) -> Option<RevealedIdentity> {
    let end = candidate.iter().rposition(|b| *b != 0)? + 1;
    let text = std::str::from_utf8(&candidate[..end]).ok()?;
    let rest = text.strip_prefix(marker)?.strip_prefix(':')?;
    let (guid, identity) = rest.split_once(':')?;
    if identity.is_empty() {
        return None;
    }
    Some(RevealedIdentity {
        guid: guid.to_string(),
        identity: identity.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IDENT_MARKER;
    use crate::otp::decrypt_otp;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn commitments(identity: &str) -> Result<(Guid, IdentityCommitmentSet)> {
        let mut rng = StdRng::seed_from_u64(11);
        let guid = Guid::random(&mut rng);
        let set = IdentityCommitmentSet::new(identity, &guid, &Params::default(), &mut rng)?;
        Ok((guid, set))
    }

    #[test]
    fn every_pair_xors_to_the_identity() -> Result<()> {
        let (guid, set) = commitments("Ahmed Ashraf")?;
        assert_eq!(set.len(), Params::default().ris_length);

        for pair in set.pairs() {
            let plain = decrypt_otp(pair.half(Side::Left), pair.half(Side::Right))?;
            let revealed = decode_identity(IDENT_MARKER, &plain).expect("marker");
            assert_eq!(revealed.identity, "Ahmed Ashraf");
            assert_eq!(revealed.guid, guid.as_str());
        }
        Ok(())
    }

    #[test]
    fn a_single_half_reveals_nothing() -> Result<()> {
        let (_, set) = commitments("Ahmed Ashraf")?;
        for side in [Side::Left, Side::Right] {
            for half in set.reveal(side) {
                assert!(decode_identity(IDENT_MARKER, &half).is_none());
                let zeros = decrypt_otp(&half, &half)?;
                assert!(decode_identity(IDENT_MARKER, &zeros).is_none());
            }
        }
        Ok(())
    }

    #[test]
    fn left_halves_are_fresh_per_pair() -> Result<()> {
        let (_, set) = commitments("Ahmed Ashraf")?;
        let lefts = set.reveal(Side::Left);
        assert_ne!(lefts[0], lefts[1]);
        Ok(())
    }

    #[test]
    fn identity_may_contain_separators() -> Result<()> {
        let mut rng = StdRng::seed_from_u64(5);
        let guid = Guid::random(&mut rng);
        let plain = encode_identity(IDENT_MARKER, &guid, "a:b-c", 128)?;
        let revealed = decode_identity(IDENT_MARKER, &plain).expect("marker");
        assert_eq!(revealed.identity, "a:b-c");
        Ok(())
    }

    #[test]
    fn rejects_unencodable_identities() {
        let mut rng = StdRng::seed_from_u64(5);
        let guid = Guid::random(&mut rng);
        let long = "x".repeat(200);
        for identity in ["", "nul\0byte", long.as_str()] {
            assert!(matches!(
                encode_identity(IDENT_MARKER, &guid, identity, 128),
                Err(Error::InvalidIdentity(_))
            ));
        }
    }

    #[test]
    fn debug_hides_halves() -> Result<()> {
        let (_, set) = commitments("Ahmed Ashraf")?;
        assert_eq!(format!("{:?}", set), "IdentityCommitmentSet { pairs: 20 }");
        Ok(())
    }

    #[test]
    fn side_sampling_hits_both_sides() {
        let mut rng = StdRng::seed_from_u64(9);
        let sides: Vec<Side> = (0..64).map(|_| rng.gen()).collect();
        assert!(sides.contains(&Side::Left));
        assert!(sides.contains(&Side::Right));
        assert_eq!(Side::Left.opposite(), Side::Right);
    }
}
