//! Double-spend detection over pairs of deposited openings.
//!
//! Two openings of the same coin that chose opposite sides for some
//! round XOR back to the identity plaintext. Identical openings mean a
//! merchant deposited one acceptance record twice.

use crate::coin::{CoinString, Guid};
use crate::config::Params;
use crate::error::{Error, Result};
use crate::identity::decode_identity;
use crate::log::{info, warn};
use crate::merchant::RisOpening;
use crate::otp::decrypt_otp;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// No round revealed an identity. Both openings chose the same side
    /// every round; detection is probabilistic.
    NoCheatDetected,
    /// The same opening was deposited twice.
    MerchantReplay,
    /// The coin was spent twice by its owner.
    SpenderIdentityRevealed(String),
}

#[derive(Clone, Debug)]
pub struct DoubleSpendDetector {
    params: Params,
}

impl DoubleSpendDetector {
    pub fn new(params: Params) -> Self {
        Self { params }
    }

    pub fn detect(&self, guid: &Guid, first: &RisOpening, second: &RisOpening) -> Result<Outcome> {
        self.check_shape(guid, first)?;
        self.check_shape(guid, second)?;

        if first.values == second.values {
            warn!(guid = %guid, "merchant replay: identical openings deposited");
            return Ok(Outcome::MerchantReplay);
        }

        for (round, (a, b)) in first.values.iter().zip(&second.values).enumerate() {
            let candidate = decrypt_otp(a, b)?;
            let revealed = match decode_identity(&self.params.ident_marker, &candidate) {
                Some(revealed) => revealed,
                None => continue,
            };
            if revealed.guid != guid.as_str() {
                warn!(guid = %guid, round, "identity marker belongs to another coin");
                return Err(Error::UnrecognizedOpening(format!(
                    "round {} reveals coin {}",
                    round, revealed.guid
                )));
            }
            info!(guid = %guid, round, "double spend detected");
            return Ok(Outcome::SpenderIdentityRevealed(revealed.identity));
        }

        warn!(guid = %guid, "unable to determine cheater");
        Ok(Outcome::NoCheatDetected)
    }

    /// Checks both openings against the coin's published commitments
    /// before running [`DoubleSpendDetector::detect`].
    pub fn detect_verified(
        &self,
        coin: &CoinString,
        first: &RisOpening,
        second: &RisOpening,
    ) -> Result<Outcome> {
        coin.opened_side(first)?;
        coin.opened_side(second)?;
        self.detect(&coin.guid, first, second)
    }

    fn check_shape(&self, guid: &Guid, opening: &RisOpening) -> Result<()> {
        if &opening.guid != guid {
            return Err(Error::UnrecognizedOpening(format!(
                "opening is for coin {}, not {}",
                opening.guid, guid
            )));
        }
        if opening.len() != self.params.ris_length {
            return Err(Error::UnrecognizedOpening(format!(
                "expected {} values, found {}",
                self.params.ris_length,
                opening.len()
            )));
        }
        if let Some(v) = opening
            .values
            .iter()
            .find(|v| v.len() != self.params.commitment_length)
        {
            return Err(Error::UnrecognizedOpening(format!(
                "value of {} bytes, commitments are {} bytes",
                v.len(),
                self.params.commitment_length
            )));
        }
        Ok(())
    }
}
