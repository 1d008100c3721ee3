use crate::blind_sigs::{BlindScheme, RsaBlind};
use crate::coin::{Coin, CoinString, Guid};
use crate::config::Params;
use crate::error::{Error, Result};
use crate::identity::Side;
use crate::log::{info, warn};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// The halves one merchant received for one coin: the whole Left side
/// or the whole Right side, never a mix.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RisOpening {
    pub guid: Guid,
    pub values: Vec<Vec<u8>>,
}

impl RisOpening {
    pub fn new(guid: Guid, values: Vec<Vec<u8>>) -> Self {
        Self { guid, values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Accepts coins signed by one trusted Authority key.
#[derive(Clone, Debug)]
pub struct Merchant<S: BlindScheme = RsaBlind> {
    authority_key: S::PublicKey,
    params: Params,
}

impl<S: BlindScheme> Merchant<S> {
    pub fn new(authority_key: S::PublicKey, params: Params) -> Self {
        Self {
            authority_key,
            params,
        }
    }

    /// Verifies the coin and asks the spender for the `side` half of
    /// every commitment pair.
    ///
    /// Each call is an independent spend; calling it twice on the same
    /// coin models a double spend.
    pub fn accept(&self, coin: &Coin<S>, side: Side) -> Result<RisOpening> {
        let coin_string = coin.canonical_string();
        let published = CoinString::parse(coin_string, &self.params)?;

        let signature = coin.signature().ok_or_else(|| {
            warn!(guid = %published.guid, "rejected unsigned coin");
            Error::InvalidSignature
        })?;
        if !S::verify(signature, &self.authority_key, coin_string.as_bytes()) {
            warn!(guid = %published.guid, "rejected coin with invalid signature");
            return Err(Error::InvalidSignature);
        }

        let opening = RisOpening::new(published.guid.clone(), coin.ris(side));
        published.opened_side(&opening)?;

        info!(guid = %opening.guid, amount = published.amount, %side, "accepted coin");
        Ok(opening)
    }

    /// [`Merchant::accept`] with the side drawn from `rng`.
    pub fn accept_random<R: Rng>(&self, coin: &Coin<S>, rng: &mut R) -> Result<RisOpening> {
        let side: Side = rng.gen();
        self.accept(coin, side)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issuance::issue;
    use crate::test_utils::{rsa_authority, rsa_keys};
    use crate::Authority;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn issued_coin(authority: &Authority) -> Result<Coin> {
        let mut coin = Coin::new(
            "Ahmed Ashraf",
            20,
            authority.public_key(),
            authority.params(),
            &mut rand::thread_rng(),
        )?;
        issue(authority, &mut coin)?;
        Ok(coin)
    }

    #[test]
    fn opening_is_one_full_side() -> Result<()> {
        let authority = rsa_authority(4);
        let coin = issued_coin(authority)?;
        let merchant = authority.merchant();

        let left = merchant.accept(&coin, Side::Left)?;
        assert_eq!(&left.guid, coin.guid());
        assert_eq!(left.values, coin.commitments().reveal(Side::Left));

        let right = merchant.accept(&coin, Side::Right)?;
        assert_eq!(right.values, coin.commitments().reveal(Side::Right));
        Ok(())
    }

    #[test]
    fn unsigned_coin_is_rejected() -> Result<()> {
        let authority = rsa_authority(4);
        let coin: Coin = Coin::new(
            "Ahmed Ashraf",
            20,
            authority.public_key(),
            authority.params(),
            &mut rand::thread_rng(),
        )?;
        let result = authority.merchant().accept(&coin, Side::Left);
        assert!(matches!(result, Err(Error::InvalidSignature)));
        Ok(())
    }

    #[test]
    fn coin_from_another_authority_is_rejected() -> Result<()> {
        let authority = rsa_authority(4);
        let coin = issued_coin(authority)?;

        let mut rng = rand::thread_rng();
        let other: Authority = Authority::generate(authority.params().clone(), &mut rng)?;
        let result = other.merchant().accept(&coin, Side::Right);
        assert!(matches!(result, Err(Error::InvalidSignature)));
        Ok(())
    }

    #[test]
    fn coin_for_other_params_is_malformed() -> Result<()> {
        let authority = rsa_authority(4);
        let coin = issued_coin(authority)?;
        let (_, pk) = rsa_keys();

        let merchant = Merchant::<RsaBlind>::new(pk.clone(), Params::default());
        let result = merchant.accept(&coin, Side::Left);
        assert!(matches!(result, Err(Error::MalformedCoinString(_))));
        Ok(())
    }

    #[test]
    fn random_side_follows_the_injected_rng() -> Result<()> {
        let authority = rsa_authority(4);
        let coin = issued_coin(authority)?;
        let merchant = authority.merchant();

        let mut rng = StdRng::seed_from_u64(99);
        let expected: Side = StdRng::seed_from_u64(99).gen();
        let opening = merchant.accept_random(&coin, &mut rng)?;
        assert_eq!(opening.values, coin.ris(expected));
        Ok(())
    }
}
