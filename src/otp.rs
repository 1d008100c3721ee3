//! XOR one-time pad.
//!
//! The ciphertext is as long as the key and applying the pad twice
//! returns the input, so encryption and decryption are the same XOR.

use crate::error::{Error, Result};
use rand::{CryptoRng, RngCore};

pub fn encrypt_otp(key: &[u8], plaintext: &[u8]) -> Result<Vec<u8>> {
    xor(key, plaintext)
}

pub fn decrypt_otp(key: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>> {
    xor(key, ciphertext)
}

/// Draws a fresh key as long as `plaintext` and returns `(key, ciphertext)`.
pub fn make_otp<R: RngCore + CryptoRng>(plaintext: &[u8], rng: &mut R) -> (Vec<u8>, Vec<u8>) {
    let mut key = vec![0u8; plaintext.len()];
    rng.fill_bytes(&mut key);
    let ciphertext = key.iter().zip(plaintext).map(|(k, p)| k ^ p).collect();
    (key, ciphertext)
}

fn xor(key: &[u8], input: &[u8]) -> Result<Vec<u8>> {
    if key.len() != input.len() {
        return Err(Error::OtpLength {
            key: key.len(),
            input: input.len(),
        });
    }
    Ok(key.iter().zip(input).map(|(k, b)| k ^ b).collect())
}
