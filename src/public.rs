use crate::{
    error::Error,
    key_type::{split_key_type_data, KeyType},
};
use serde::{de::Visitor, Deserialize, Deserializer, Serialize, Serializer};
use std::{
    fmt::{self, Debug, Display},
    str::FromStr,
};

/// A public key, tagged with the curve it belongs to.
///
/// For Ed25519 this is 32 octets, the same bytes as the underlying
/// `ed25519_dalek::VerifyingKey`. The bytes are copied in at construction and
/// never mutated afterwards, so values can be freely shared across threads.
///
/// The string representation is the base58-encoded bytes prefixed with the
/// curve tag, e.g. `ed25519:AYWv9RAN1hpSQA4p1DLhCNnpnNXwxhfH9qeHN8B4nJ59`.
/// A bare unprefixed string is accepted on input (older clients encoded
/// ed25519 keys this way) but output is always the canonical prefixed form.
#[derive(Clone, Copy, Ord, PartialOrd, Eq, PartialEq, Hash)]
pub enum PublicKey {
    Ed25519([u8; 32]),
}

impl Display for PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}",
            self.key_type(),
            bs58::encode(self.key_data()).into_string()
        )
    }
}

impl Debug for PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)
    }
}

impl FromStr for PublicKey {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (tag, data) = split_key_type_data(s)?;
        let key_type = match tag {
            Some(tag) => tag.parse()?,
            None => KeyType::Ed25519,
        };
        let bytes = bs58::decode(data).into_vec()?;
        Self::from_parts(key_type, &bytes)
    }
}

impl PublicKey {
    /// Builds a key from its curve and raw bytes, copying the slice into
    /// owned storage.
    pub fn from_parts(key_type: KeyType, data: &[u8]) -> Result<Self, Error> {
        match key_type {
            KeyType::Ed25519 => {
                if data.len() != ed25519_dalek::PUBLIC_KEY_LENGTH {
                    return Err(Error::InvalidKeyLength {
                        expected: ed25519_dalek::PUBLIC_KEY_LENGTH,
                        actual: data.len(),
                    });
                }
                let mut bytes = [0u8; ed25519_dalek::PUBLIC_KEY_LENGTH];
                bytes.copy_from_slice(data);
                Ok(PublicKey::Ed25519(bytes))
            }
        }
    }

    pub fn key_type(&self) -> KeyType {
        match self {
            PublicKey::Ed25519(_) => KeyType::Ed25519,
        }
    }

    pub fn key_data(&self) -> &[u8] {
        match self {
            PublicKey::Ed25519(bytes) => bytes,
        }
    }

    /// Checks a detached signature over `message`.
    ///
    /// Returns `false` for anything that does not verify, including
    /// signatures of the wrong length and key bytes that are not a valid
    /// curve point.
    pub fn verify(&self, message: &[u8], signature: &[u8]) -> bool {
        match self {
            PublicKey::Ed25519(bytes) => {
                let key = if let Ok(key) = ed25519_dalek::VerifyingKey::from_bytes(bytes) {
                    key
                } else {
                    return false;
                };
                let signature = if let Ok(sig) = ed25519_dalek::Signature::from_slice(signature) {
                    sig
                } else {
                    return false;
                };
                use ed25519_dalek::Verifier;
                key.verify(message, &signature).is_ok()
            }
        }
    }
}

impl AsRef<[u8]> for PublicKey {
    fn as_ref(&self) -> &[u8] {
        self.key_data()
    }
}

impl From<ed25519_dalek::VerifyingKey> for PublicKey {
    fn from(key: ed25519_dalek::VerifyingKey) -> Self {
        PublicKey::Ed25519(key.to_bytes())
    }
}

impl Serialize for PublicKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct V;
        impl<'de> Visitor<'de> for V {
            type Value = PublicKey;
            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("PublicKey")
            }
            fn visit_str<E: serde::de::Error>(self, string: &str) -> Result<Self::Value, E> {
                PublicKey::from_str(string).map_err(serde::de::Error::custom)
            }
        }
        deserializer.deserialize_str(V)
    }
}
