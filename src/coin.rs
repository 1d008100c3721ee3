use crate::blind_sigs::{BlindScheme, RsaBlind};
use crate::config::Params;
use crate::error::{Error, Result};
use crate::identity::{IdentityCommitmentSet, Side};
use crate::log::{debug, warn};
use crate::merchant::RisOpening;
use crate::utils::{sha256, Digest};
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const GUID_LEN: usize = 32;
const FIELD_SEP: char = '-';
const LIST_SEP: &str = ",";

/// Globally unique coin id: 128 random bits as lowercase hex.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Guid(String);

impl Guid {
    pub fn random<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        let mut bytes = [0u8; GUID_LEN / 2];
        rng.fill_bytes(&mut bytes);
        Self(hex::encode(bytes))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Guid {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let well_formed = s.len() == GUID_LEN
            && s.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
        if !well_formed {
            return Err(Error::MalformedCoinString(format!("invalid guid {:?}", s)));
        }
        Ok(Self(s.to_string()))
    }
}

impl std::convert::TryFrom<String> for Guid {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<Guid> for String {
    fn from(guid: Guid) -> Self {
        guid.0
    }
}

impl fmt::Display for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The public, signed description of a coin:
/// `<tag>-<amount>-<guid>-<H(L_0)>,..-<H(R_0)>,..`.
///
/// `Display` is the only serializer and [`CoinString::parse`] the only
/// parser of this format.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CoinString {
    pub tag: String,
    pub amount: u64,
    pub guid: Guid,
    pub left: Vec<Digest>,
    pub right: Vec<Digest>,
}

impl CoinString {
    pub fn parse(s: &str, params: &Params) -> Result<Self> {
        let fields: Vec<&str> = s.split(FIELD_SEP).collect();
        if fields.len() != 5 {
            return Err(Error::MalformedCoinString(format!(
                "expected 5 fields, found {}",
                fields.len()
            )));
        }
        let (tag, amount, guid, left, right) =
            (fields[0], fields[1], fields[2], fields[3], fields[4]);

        if tag != params.bank_tag {
            return Err(Error::MalformedCoinString(format!(
                "invalid bank tag: {} received, but {} expected",
                tag, params.bank_tag
            )));
        }
        let amount = amount.parse::<u64>().map_err(|e| {
            Error::MalformedCoinString(format!("invalid amount {:?}: {}", amount, e))
        })?;

        Ok(Self {
            tag: tag.to_string(),
            amount,
            guid: guid.parse()?,
            left: parse_digests(left, params.ris_length)?,
            right: parse_digests(right, params.ris_length)?,
        })
    }

    pub fn ris_length(&self) -> usize {
        self.left.len()
    }

    pub fn digests(&self, side: Side) -> &[Digest] {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    /// Checks an opening against the published digests and returns the
    /// side it opened. Every value must open the same side.
    pub fn opened_side(&self, opening: &RisOpening) -> Result<Side> {
        if opening.guid != self.guid {
            return Err(Error::UnrecognizedOpening(format!(
                "opening is for coin {}, not {}",
                opening.guid, self.guid
            )));
        }
        if opening.values.len() != self.ris_length() {
            return Err(Error::UnrecognizedOpening(format!(
                "expected {} values, found {}",
                self.ris_length(),
                opening.values.len()
            )));
        }

        let first = opening.values.first().map(|v| sha256(v));
        let side = if first.as_ref() == self.left.first() {
            Side::Left
        } else if first.as_ref() == self.right.first() {
            Side::Right
        } else {
            return Err(Error::UnrecognizedOpening("value 0 matches no commitment".into()));
        };
        let expected = self.digests(side);
        for (i, value) in opening.values.iter().enumerate() {
            if expected.get(i) != Some(&sha256(value)) {
                return Err(Error::UnrecognizedOpening(format!(
                    "value {} does not match the {} commitment",
                    i, side
                )));
            }
        }
        Ok(side)
    }
}

fn parse_digests(field: &str, expected: usize) -> Result<Vec<Digest>> {
    let digests = field
        .split(LIST_SEP)
        .map(|h| {
            let mut digest = [0u8; 32];
            hex::decode_to_slice(h, &mut digest).map_err(|e| {
                Error::MalformedCoinString(format!("invalid commitment digest {:?}: {}", h, e))
            })?;
            Ok(digest)
        })
        .collect::<Result<Vec<_>>>()?;

    if digests.len() != expected {
        return Err(Error::MalformedCoinString(format!(
            "expected {} commitment digests, found {}",
            expected,
            digests.len()
        )));
    }
    Ok(digests)
}

fn join_digests(digests: &[Digest]) -> String {
    digests
        .iter()
        .map(hex::encode)
        .collect::<Vec<_>>()
        .join(LIST_SEP)
}

impl fmt::Display for CoinString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{tag}{sep}{amount}{sep}{guid}{sep}{left}{sep}{right}",
            tag = self.tag,
            amount = self.amount,
            guid = self.guid,
            left = join_digests(&self.left),
            right = join_digests(&self.right),
            sep = FIELD_SEP,
        )
    }
}

/// An anonymous cash token, as held by its owner.
///
/// The blinded message is computed once at construction. The coin
/// becomes spendable after [`Coin::unblind`] stores the Authority's
/// signature, which can only happen once.
pub struct Coin<S: BlindScheme = RsaBlind> {
    identity: String,
    amount: u64,
    guid: Guid,
    public_key: S::PublicKey,
    commitments: IdentityCommitmentSet,
    coin_string: String,
    blinded: S::Blinded,
    blinding_factor: S::BlindingFactor,
    signature: Option<S::Signature>,
}

impl<S: BlindScheme> Coin<S> {
    pub fn new<R: RngCore + CryptoRng>(
        identity: &str,
        amount: u64,
        public_key: &S::PublicKey,
        params: &Params,
        rng: &mut R,
    ) -> Result<Self> {
        params.validate()?;

        let guid = Guid::random(rng);
        let commitments = IdentityCommitmentSet::new(identity, &guid, params, rng)?;
        let coin_string = CoinString {
            tag: params.bank_tag.clone(),
            amount,
            guid: guid.clone(),
            left: commitments.digests(Side::Left),
            right: commitments.digests(Side::Right),
        }
        .to_string();

        let (blinded, blinding_factor) = S::blind(coin_string.as_bytes(), public_key, rng)?;
        debug!(guid = %guid, amount, "created coin");

        Ok(Self {
            identity: identity.to_string(),
            amount,
            guid,
            public_key: public_key.clone(),
            commitments,
            coin_string,
            blinded,
            blinding_factor,
            signature: None,
        })
    }

    /// Owner identity. Only the owner ever holds this field; it is not
    /// part of anything sent to the Authority or a merchant.
    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn amount(&self) -> u64 {
        self.amount
    }

    pub fn guid(&self) -> &Guid {
        &self.guid
    }

    pub fn public_key(&self) -> &S::PublicKey {
        &self.public_key
    }

    pub fn commitments(&self) -> &IdentityCommitmentSet {
        &self.commitments
    }

    pub fn blinded(&self) -> &S::Blinded {
        &self.blinded
    }

    pub fn signature(&self) -> Option<&S::Signature> {
        self.signature.as_ref()
    }

    pub fn is_signed(&self) -> bool {
        self.signature.is_some()
    }

    /// The exact message the Authority's signature covers.
    pub fn canonical_string(&self) -> &str {
        &self.coin_string
    }

    /// Answers a merchant's challenge with the `side` half of every pair.
    pub fn ris(&self, side: Side) -> Vec<Vec<u8>> {
        self.commitments.reveal(side)
    }

    /// Removes the blinding from the Authority's response and stores the
    /// resulting signature. A response that does not unblind to a valid
    /// signature on this coin is rejected and leaves the coin unsigned.
    pub fn unblind(&mut self, signed: &S::BlindSignature) -> Result<&S::Signature> {
        if self.signature.is_some() {
            return Err(Error::AlreadySigned(self.guid.to_string()));
        }
        let signature = S::unblind(signed, &self.blinding_factor, &self.public_key)?;
        if !S::verify(&signature, &self.public_key, self.coin_string.as_bytes()) {
            warn!(guid = %self.guid, "authority response does not unblind to a valid signature");
            return Err(Error::InvalidSignature);
        }
        debug!(guid = %self.guid, "unblinded coin signature");
        Ok(self.signature.get_or_insert(signature))
    }
}

impl<S: BlindScheme> fmt::Debug for Coin<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Coin")
            .field("amount", &self.amount)
            .field("guid", &self.guid)
            .field("commitments", &self.commitments)
            .field("signed", &self.signature.is_some())
            .finish()
    }
}
