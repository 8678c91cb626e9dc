#![no_main]

use libfuzzer_sys::fuzz_target;
use oracle_crypto::{open_sealed, DecryptionKey, SealedEncoder};
use oracle_types::Ciphertext;

// Opening arbitrary bytes must fail cleanly, and a sealed value derived from
// the input must open back to itself.
fuzz_target!(|data: &[u8]| {
    let key = DecryptionKey::from_bytes([7; 32]);
    let _ = open_sealed(&Ciphertext::new(data.to_vec()), &key);

    if data.len() >= 40 {
        let mut ephemeral = [0u8; 32];
        ephemeral.copy_from_slice(&data[..32]);
        let mut value = [0u8; 8];
        value.copy_from_slice(&data[32..40]);
        let value = i64::from_le_bytes(value);

        if let Ok(sealed) = SealedEncoder::seal_with_ephemeral(value, &key.public_key(), ephemeral) {
            assert_eq!(open_sealed(&sealed, &key).ok(), Some(value));
        }
    }
});
