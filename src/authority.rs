use crate::blind_sigs::{BlindScheme, RsaBlind};
use crate::config::Params;
use crate::detect::DoubleSpendDetector;
use crate::error::Result;
use crate::log::debug;
use crate::merchant::Merchant;
use rand::{CryptoRng, RngCore};

/// The issuing bank. Owns the signing key pair; the public half is
/// embedded in every coin it issues.
///
/// Signing is a pure function of the blinded value and the secret key,
/// so one `Authority` can be shared by reference between threads.
pub struct Authority<S: BlindScheme = RsaBlind> {
    sk: S::SecretKey,
    pk: S::PublicKey,
    params: Params,
}

impl<S: BlindScheme> Authority<S> {
    pub fn generate<R: RngCore + CryptoRng>(params: Params, rng: &mut R) -> Result<Self> {
        params.validate()?;
        let (sk, pk) = S::generate_keypair(&params, rng)?;
        Ok(Self { sk, pk, params })
    }

    pub fn from_keys(sk: S::SecretKey, pk: S::PublicKey, params: Params) -> Result<Self> {
        params.validate()?;
        Ok(Self { sk, pk, params })
    }

    pub fn public_key(&self) -> &S::PublicKey {
        &self.pk
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Signs an opaque blinded value. The Authority learns nothing about
    /// the coin inside.
    pub fn sign_blinded(&self, blinded: &S::Blinded) -> Result<S::BlindSignature> {
        let signed = S::sign(blinded, &self.sk)?;
        debug!("signed blinded coin");
        Ok(signed)
    }

    pub fn verify(&self, signature: &S::Signature, message: &str) -> bool {
        S::verify(signature, &self.pk, message.as_bytes())
    }

    /// A merchant that trusts this Authority's key.
    pub fn merchant(&self) -> Merchant<S> {
        Merchant::new(self.pk.clone(), self.params.clone())
    }

    /// The detector the Authority runs over deposited openings.
    pub fn detector(&self) -> DoubleSpendDetector {
        DoubleSpendDetector::new(self.params.clone())
    }
}
