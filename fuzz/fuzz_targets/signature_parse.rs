//! Fuzz target for signature parsing and verification.
//!
//! # Running
//!
//! ```bash
//! cargo +nightly fuzz run signature_parse
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;
use scribe_crypto::{verify_hash, Erc6492Signature, Signature};

fuzz_target!(|data: &[u8]| {
    let _ = Signature::from_slice(data);
    let _ = Erc6492Signature::parse(data);
    let _ = verify_hash(&Default::default(), &Default::default(), data);
});
