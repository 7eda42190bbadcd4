#![no_main]

use arbitrary::Arbitrary;
use caseguard_core::crypto::{CryptoProvider, EncryptedPayload, MasterKey};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct FuzzPayload {
    ciphertext: Vec<u8>,
    nonce: Vec<u8>,
    key_version: u32,
    aad: Option<Vec<u8>>,
}

fuzz_target!(|input: FuzzPayload| {
    let provider = CryptoProvider::new(MasterKey::from_bytes([7u8; 32]));

    let payload = EncryptedPayload {
        ciphertext: input.ciphertext,
        nonce: input.nonce,
        key_version: input.key_version,
        aad: input.aad,
    };

    // Decrypt must reject garbage with an error, never panic and never
    // hand back fabricated plaintext.
    let _ = provider.decrypt(&payload);
    let _ = provider.decrypt_str(&payload);
});
