use thiserror::Error;

/// Errors raised when constructing or parsing key material.
///
/// Decryption failure is deliberately absent: a mismatched key or corrupted
/// ciphertext is routine input, reported as `None` by
/// [`crate::KeyPairEd25519::decrypt_message`] instead of an error.
#[derive(Debug, Error)]
pub enum Error {
    /// The base58 segment of an encoded key did not decode.
    #[error("invalid key encoding: {0}")]
    InvalidEncoding(#[from] bs58::decode::Error),

    /// An encoded key had more than one `:` separator.
    #[error("invalid key format: `{0}`")]
    InvalidKeyFormat(String),

    /// A key-type tag or numeric identifier outside the supported set.
    #[error("unknown key type: `{0}`")]
    UnknownKeyType(String),

    /// A curve name outside the supported set.
    #[error("unknown curve: `{0}`")]
    UnknownCurve(String),

    /// Decoded key material had the wrong length for its curve.
    #[error("invalid key length: expected {expected} bytes, received {actual}")]
    InvalidKeyLength { expected: usize, actual: usize },

    /// Key bytes that do not form a valid point on the curve.
    #[error("key data is not a valid curve point")]
    InvalidKeyData,
}
