//! Cryptographic identity key pairs for a blockchain client
//!
//! Currently only Ed25519 elliptic curve cryptography is supported, but keys
//! are tagged with their curve in both the type system and the encoded string
//! form so that further curves can be added later. [`PublicKey`] and
//! [`KeyPair`] are closed enums with one variant per curve; adding a curve is
//! a compile error until every dispatch site handles it.
//!
//! # Encoding
//!
//! Keys travel as `<curve>:<base58-bytes>`, e.g.
//! `ed25519:AYWv9RAN1hpSQA4p1DLhCNnpnNXwxhfH9qeHN8B4nJ59`. Bare unprefixed
//! strings are still accepted on input for compatibility with keys encoded by
//! older clients, but everything this crate emits is in the prefixed form.
//!
//! # Signing and encryption
//!
//! Signing is detached and deterministic (Ed25519); [`Signer::sign`] returns
//! the raw signature paired with the public key that produced it. Message
//! encryption reuses the signing identity by converting the Ed25519 keys to
//! their Curve25519 counterparts and running a NaCl box under an ephemeral
//! sender key, so a ciphertext never binds to the sender's long-term
//! identity.
//!
//! All values are immutable after construction and safe to share across
//! threads; the only non-determinism is OS randomness for key generation and
//! encryption nonces.

mod dh;
mod error;
mod key_type;
mod pair;
mod public;
mod signature;

pub use error::Error;
pub use key_type::KeyType;
pub use pair::{KeyPair, KeyPairEd25519, Signer, ENVELOPE_KEY_LENGTH, ENVELOPE_NONCE_LENGTH};
pub use public::PublicKey;
pub use signature::Signature;
