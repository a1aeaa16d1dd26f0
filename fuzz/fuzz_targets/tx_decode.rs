//! Fuzz target for transaction decoding.
//!
//! Arbitrary bytes must decode to an error or to a transaction whose
//! canonical re-encoding decodes back to the same value.
//!
//! # Running
//!
//! ```bash
//! cargo +nightly fuzz run tx_decode
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;
use scribe_chain::Transaction;

fuzz_target!(|data: &[u8]| {
    let Ok(tx) = Transaction::decode(data) else {
        return;
    };

    let encoded = tx.encode();
    let again = Transaction::decode(&encoded).expect("canonical encoding must decode");
    assert_eq!(again, tx);

    let _ = tx.signing_hash();
    let _ = tx.tx_hash();
    let _ = tx.recover_signer();
});
