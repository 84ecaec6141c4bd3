use crate::public::PublicKey;

/// A detached signature together with the public key that produced it.
///
/// Returned from signing and meant to be consumed right away, e.g. attached
/// to a transaction; nothing in this crate holds on to one.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Signature {
    pub signature: [u8; ed25519_dalek::SIGNATURE_LENGTH],
    pub public_key: PublicKey,
}

impl AsRef<[u8]> for Signature {
    fn as_ref(&self) -> &[u8] {
        &self.signature
    }
}
