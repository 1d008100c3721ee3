//! Spender side of the blind issuance exchange.
//!
//! ```text
//! spender                          authority
//!   request_blinding(coin) --blinded-->
//!                          <--signed--  sign_blinded(blinded)
//!   unblind(coin, signed)
//! ```

use crate::authority::Authority;
use crate::blind_sigs::BlindScheme;
use crate::coin::Coin;
use crate::error::Result;
use crate::log::info;

/// The blinded coin to send to the Authority. The blinding factor never
/// leaves the coin.
pub fn request_blinding<S: BlindScheme>(coin: &Coin<S>) -> &S::Blinded {
    coin.blinded()
}

/// Removes the blinding from the Authority's response, storing the
/// signature on the coin.
pub fn unblind<'a, S: BlindScheme>(
    coin: &'a mut Coin<S>,
    signed: &S::BlindSignature,
) -> Result<&'a S::Signature> {
    coin.unblind(signed)
}

/// Checks a signature against a canonical coin string.
pub fn verify<S: BlindScheme>(
    signature: &S::Signature,
    pk: &S::PublicKey,
    coin_string: &str,
) -> bool {
    S::verify(signature, pk, coin_string.as_bytes())
}

/// Runs the whole exchange in-process.
pub fn issue<S: BlindScheme>(authority: &Authority<S>, coin: &mut Coin<S>) -> Result<()> {
    let signed = authority.sign_blinded(request_blinding(coin))?;
    unblind(coin, &signed)?;
    info!(guid = %coin.guid(), amount = coin.amount(), "coin issued");
    Ok(())
}
