//! Protocol parameters shared by every party.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Number of commitment pairs per coin (k).
///
/// Two honest, independent acceptance events pick the same side with
/// probability 2^-k, which bounds the chance a double-spender escapes.
pub const COIN_RIS_LENGTH: usize = 20;

/// Tag every canonical coin string starts with.
pub const BANK_TAG: &str = "ELECTRONIC_PIGGYBANK";

/// Prefix of the identity plaintext hidden in each commitment pair.
pub const IDENT_MARKER: &str = "IdentityStr";

/// Length in bytes of each commitment half.
pub const COMMITMENT_LENGTH: usize = 128;

/// Modulus size used when the Authority generates an RSA key pair.
pub const RSA_MODULUS_BITS: usize = 2048;

// marker ':' guid(32) ':' and at least one identity byte
const ENCODING_OVERHEAD: usize = 1 + 32 + 1 + 1;

/// Parameters of one deployment of the protocol.
///
/// All parties must agree on these; a coin built under one set of
/// parameters will not parse under another.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Params {
    pub ris_length: usize,
    pub bank_tag: String,
    pub ident_marker: String,
    pub commitment_length: usize,
    pub rsa_modulus_bits: usize,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            ris_length: COIN_RIS_LENGTH,
            bank_tag: BANK_TAG.to_string(),
            ident_marker: IDENT_MARKER.to_string(),
            commitment_length: COMMITMENT_LENGTH,
            rsa_modulus_bits: RSA_MODULUS_BITS,
        }
    }
}

impl Params {
    pub fn with_ris_length(mut self, ris_length: usize) -> Self {
        self.ris_length = ris_length;
        self
    }

    pub fn with_rsa_modulus_bits(mut self, bits: usize) -> Self {
        self.rsa_modulus_bits = bits;
        self
    }

    /// Loads parameters from a JSON document. Missing fields take their
    /// default values.
    pub fn from_json(json: &str) -> Result<Self> {
        let params: Params =
            serde_json::from_str(json).map_err(|e| Error::Config(e.to_string()))?;
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<()> {
        if self.ris_length == 0 {
            return Err(Error::Config("ris_length must be at least 1".into()));
        }
        if self.bank_tag.is_empty() || self.bank_tag.contains('-') {
            return Err(Error::Config(format!(
                "bank tag {:?} must be non-empty and must not contain '-'",
                self.bank_tag
            )));
        }
        if self.ident_marker.is_empty() || self.ident_marker.contains(':') {
            return Err(Error::Config(format!(
                "identity marker {:?} must be non-empty and must not contain ':'",
                self.ident_marker
            )));
        }
        let min_len = self.ident_marker.len() + ENCODING_OVERHEAD;
        if self.commitment_length < min_len {
            return Err(Error::Config(format!(
                "commitment_length {} is below the minimum of {}",
                self.commitment_length, min_len
            )));
        }
        if self.rsa_modulus_bits < 512 {
            return Err(Error::Config(format!(
                "rsa_modulus_bits {} is below 512",
                self.rsa_modulus_bits
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() -> Result<()> {
        let params = Params::default();
        params.validate()?;
        assert_eq!(params.ris_length, COIN_RIS_LENGTH);
        assert_eq!(params.bank_tag, BANK_TAG);
        Ok(())
    }

    #[test]
    fn partial_json_keeps_defaults() -> Result<()> {
        let params = Params::from_json(r#"{ "ris_length": 4 }"#)?;
        assert_eq!(params.ris_length, 4);
        assert_eq!(params.ident_marker, IDENT_MARKER);
        assert_eq!(params.commitment_length, COMMITMENT_LENGTH);
        Ok(())
    }

    #[test]
    fn rejects_bad_params() {
        assert!(Params::default().with_ris_length(0).validate().is_err());
        assert!(Params::from_json(r#"{ "bank_tag": "A-B" }"#).is_err());
        assert!(Params::from_json(r#"{ "ident_marker": "id:x" }"#).is_err());
        assert!(Params::from_json(r#"{ "commitment_length": 8 }"#).is_err());
        assert!(Params::from_json(r#"{ "rsa_modulus_bits": 256 }"#).is_err());
        assert!(matches!(Params::from_json("not json"), Err(Error::Config(_))));
    }
}
