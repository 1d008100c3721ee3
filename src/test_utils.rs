use crate::authority::Authority;
use crate::blind_sigs::{BlindScheme, RsaBlind, RsaPublicKey, RsaSecretKey};
use crate::config::Params;
use std::sync::{Once, OnceLock};

static INIT_ONCE: Once = Once::new();
static RSA_KEYS: OnceLock<(RsaSecretKey, RsaPublicKey)> = OnceLock::new();
static RSA_AUTHORITIES: OnceLock<Vec<Authority>> = OnceLock::new();

// k values test authorities are pre-built for
const TEST_RIS_LENGTHS: [usize; 2] = [4, 20];

pub(crate) fn init_logger() {
    INIT_ONCE.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::DEBUG)
            .try_init();
    });
}

/// A 1024-bit RSA key pair shared by every test in the binary; key
/// generation dominates test time otherwise.
pub(crate) fn rsa_keys() -> (&'static RsaSecretKey, &'static RsaPublicKey) {
    init_logger();
    let (sk, pk) = RSA_KEYS.get_or_init(|| {
        let params = Params::default().with_rsa_modulus_bits(1024);
        RsaBlind::generate_keypair(&params, &mut rand::thread_rng())
            .expect("RSA key generation")
    });
    (sk, pk)
}

/// An Authority over the shared test key for `ris_length` of 4 or 20.
pub(crate) fn rsa_authority(ris_length: usize) -> &'static Authority {
    let (sk, pk) = rsa_keys();
    let authorities = RSA_AUTHORITIES.get_or_init(|| {
        TEST_RIS_LENGTHS
            .iter()
            .map(|k| {
                let params = Params::default()
                    .with_ris_length(*k)
                    .with_rsa_modulus_bits(1024);
                Authority::from_keys(sk.clone(), pk.clone(), params).expect("valid params")
            })
            .collect()
    });
    authorities
        .iter()
        .find(|a| a.params().ris_length == ris_length)
        .expect("no test authority for this k")
}
