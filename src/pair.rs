use crate::{
    dh,
    error::Error,
    key_type::{split_key_type_data, KeyType},
    public::PublicKey,
    signature::Signature,
};
use crypto_box::{
    aead::{Aead, AeadCore},
    SalsaBox,
};
use ed25519_dalek::Signer as _;
use rand::rngs::OsRng;
use serde::{de::Visitor, Deserialize, Deserializer, Serialize, Serializer};
use std::{
    fmt::{self, Debug, Display},
    str::FromStr,
};
use zeroize::Zeroize;

/// Length of the ephemeral Curve25519 public key prefixed to every
/// encrypted message.
pub const ENVELOPE_KEY_LENGTH: usize = crypto_box::KEY_SIZE;
/// Length of the nonce following the ephemeral key.
pub const ENVELOPE_NONCE_LENGTH: usize = 24;

/// The capability every concrete key pair provides: detached signing,
/// verification and access to the derived public key. `Display` doubles as
/// the canonical export, so any `Signer` can be persisted and restored.
pub trait Signer: Display {
    fn public_key(&self) -> PublicKey;
    fn sign(&self, message: &[u8]) -> Signature;
    fn verify(&self, message: &[u8], signature: &[u8]) -> bool;
}

/// A key pair of any supported curve.
///
/// One variant per curve, matched exhaustively wherever behavior differs, so
/// a new curve cannot be wired up halfway.
#[derive(Clone)]
pub enum KeyPair {
    Ed25519(KeyPairEd25519),
}

impl KeyPair {
    /// Generates a fresh key pair on the named curve. The name is matched
    /// case-insensitively; anything outside the supported set is refused.
    pub fn from_random(curve: &str) -> Result<Self, Error> {
        match curve.parse() {
            Ok(KeyType::Ed25519) => Ok(KeyPair::Ed25519(KeyPairEd25519::from_random())),
            Err(_) => Err(Error::UnknownCurve(curve.to_string())),
        }
    }

    pub fn key_type(&self) -> KeyType {
        match self {
            KeyPair::Ed25519(_) => KeyType::Ed25519,
        }
    }

    /// The encoded secret key, exactly as it was supplied at construction.
    pub fn secret_key(&self) -> &str {
        match self {
            KeyPair::Ed25519(pair) => pair.secret_key(),
        }
    }
}

impl Signer for KeyPair {
    fn public_key(&self) -> PublicKey {
        match self {
            KeyPair::Ed25519(pair) => pair.public_key(),
        }
    }
    fn sign(&self, message: &[u8]) -> Signature {
        match self {
            KeyPair::Ed25519(pair) => pair.sign(message),
        }
    }
    fn verify(&self, message: &[u8], signature: &[u8]) -> bool {
        match self {
            KeyPair::Ed25519(pair) => pair.verify(message, signature),
        }
    }
}

impl Display for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyPair::Ed25519(pair) => Display::fmt(pair, f),
        }
    }
}

impl Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyPair::Ed25519(pair) => Debug::fmt(pair, f),
        }
    }
}

impl FromStr for KeyPair {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (tag, secret) = split_key_type_data(s)?;
        let key_type = match tag {
            Some(tag) => tag
                .parse()
                .map_err(|_| Error::UnknownCurve(tag.to_string()))?,
            None => KeyType::Ed25519,
        };
        match key_type {
            KeyType::Ed25519 => Ok(KeyPair::Ed25519(KeyPairEd25519::from_secret_key(secret)?)),
        }
    }
}

impl Serialize for KeyPair {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for KeyPair {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct V;
        impl<'de> Visitor<'de> for V {
            type Value = KeyPair;
            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("KeyPair")
            }
            fn visit_str<E: serde::de::Error>(self, string: &str) -> Result<Self::Value, E> {
                KeyPair::from_str(string).map_err(serde::de::Error::custom)
            }
        }
        deserializer.deserialize_str(V)
    }
}

/// An Ed25519 key pair.
///
/// The secret is kept in its original encoded form so export never has to
/// re-encode; the public key is derived from the secret's seed half at
/// construction and the two can never disagree afterwards.
#[derive(Clone)]
pub struct KeyPairEd25519 {
    public_key: PublicKey,
    secret_key: String,
    signing_key: ed25519_dalek::SigningKey,
}

impl PartialEq for KeyPairEd25519 {
    fn eq(&self, other: &Self) -> bool {
        self.public_key == other.public_key
    }
}
impl Eq for KeyPairEd25519 {}

impl Debug for KeyPairEd25519 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPairEd25519")
            .field("public_key", &self.public_key)
            .finish()
    }
}

impl Display for KeyPairEd25519 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", KeyType::Ed25519, self.secret_key)
    }
}

impl FromStr for KeyPairEd25519 {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match KeyPair::from_str(s)? {
            KeyPair::Ed25519(pair) => Ok(pair),
        }
    }
}

impl KeyPairEd25519 {
    /// Restores a key pair from a base58-encoded 64-byte raw secret
    /// (seed followed by public key, the layout produced by
    /// [`to_keypair_bytes`](ed25519_dalek::SigningKey::to_keypair_bytes)).
    ///
    /// The public key is re-derived from the seed rather than read from the
    /// trailing 32 bytes, so an inconsistent embedded public half cannot
    /// produce a pair that fails to verify its own signatures.
    pub fn from_secret_key(secret_key: &str) -> Result<Self, Error> {
        let mut bytes = bs58::decode(secret_key).into_vec()?;
        if bytes.len() != ed25519_dalek::KEYPAIR_LENGTH {
            bytes.zeroize();
            return Err(Error::InvalidKeyLength {
                expected: ed25519_dalek::KEYPAIR_LENGTH,
                actual: bytes.len(),
            });
        }
        let mut seed = [0u8; ed25519_dalek::SECRET_KEY_LENGTH];
        seed.copy_from_slice(&bytes[..ed25519_dalek::SECRET_KEY_LENGTH]);
        bytes.zeroize();
        let signing_key = ed25519_dalek::SigningKey::from_bytes(&seed);
        seed.zeroize();
        Ok(Self {
            public_key: signing_key.verifying_key().into(),
            secret_key: secret_key.to_string(),
            signing_key,
        })
    }

    /// Generates a fresh key pair from OS randomness.
    ///
    /// The raw secret is encoded and fed back through
    /// [`from_secret_key`](Self::from_secret_key) so generated and restored
    /// pairs share the exact same invariants.
    pub fn from_random() -> Self {
        let signing_key = ed25519_dalek::SigningKey::generate(&mut OsRng);
        let secret_key = bs58::encode(signing_key.to_keypair_bytes()).into_string();
        Self::from_secret_key(&secret_key).expect("freshly encoded secret key must parse")
    }

    /// The encoded secret key, exactly as supplied at construction.
    pub fn secret_key(&self) -> &str {
        &self.secret_key
    }

    pub(crate) fn seed(&self) -> [u8; ed25519_dalek::SECRET_KEY_LENGTH] {
        self.signing_key.to_bytes()
    }

    /// Encrypts `message` so that only the holder of `receiver`'s secret key
    /// can read it.
    ///
    /// The receiver's Ed25519 key is converted to its Curve25519 form and
    /// boxed against a fresh ephemeral key, which is prepended to the output
    /// together with the nonce:
    ///
    /// ```text
    /// ephemeral public key (32) || nonce (24) || ciphertext (len + 16)
    /// ```
    ///
    /// The sender's own identity never enters the computation, so the
    /// output does not authenticate who produced it; any party can encrypt
    /// to a known receiver. Callers that need sender authentication must
    /// sign the message as well.
    pub fn encrypt_message(&self, message: &[u8], receiver: &PublicKey) -> Result<Vec<u8>, Error> {
        let receiver_key = match receiver {
            PublicKey::Ed25519(bytes) => dh::ed25519_to_x25519_pk(bytes)?,
        };
        let ephemeral = crypto_box::SecretKey::generate(&mut OsRng);
        let nonce = SalsaBox::generate_nonce(&mut OsRng);
        let cipher = SalsaBox::new(&receiver_key, &ephemeral)
            .encrypt(&nonce, message)
            .expect("box encryption of an in-memory buffer cannot fail");
        let mut out = Vec::with_capacity(ENVELOPE_KEY_LENGTH + ENVELOPE_NONCE_LENGTH + cipher.len());
        out.extend_from_slice(ephemeral.public_key().as_bytes());
        out.extend_from_slice(nonce.as_slice());
        out.extend_from_slice(&cipher);
        Ok(out)
    }

    /// Opens an envelope produced by [`encrypt_message`](Self::encrypt_message).
    ///
    /// Returns `None` when the message was not encrypted to this key or the
    /// buffer is truncated or corrupted. That is an expected outcome for
    /// adversarial input, not a fault, hence no error channel.
    pub fn decrypt_message(&self, cipher: &[u8]) -> Option<Vec<u8>> {
        if cipher.len() < ENVELOPE_KEY_LENGTH + ENVELOPE_NONCE_LENGTH {
            return None;
        }
        let mut ephemeral = [0u8; ENVELOPE_KEY_LENGTH];
        ephemeral.copy_from_slice(&cipher[..ENVELOPE_KEY_LENGTH]);
        let nonce_end = ENVELOPE_KEY_LENGTH + ENVELOPE_NONCE_LENGTH;
        let nonce = crypto_box::Nonce::clone_from_slice(&cipher[ENVELOPE_KEY_LENGTH..nonce_end]);
        let secret = dh::ed25519_to_x25519_sk(&self.seed());
        SalsaBox::new(&crypto_box::PublicKey::from(ephemeral), &secret)
            .decrypt(&nonce, &cipher[nonce_end..])
            .ok()
    }
}

impl Signer for KeyPairEd25519 {
    fn public_key(&self) -> PublicKey {
        self.public_key
    }

    /// Produces a detached, deterministic signature over the exact bytes of
    /// `message`; no hashing or framing is added at this layer.
    fn sign(&self, message: &[u8]) -> Signature {
        Signature {
            signature: self.signing_key.sign(message).to_bytes(),
            public_key: self.public_key,
        }
    }

    fn verify(&self, message: &[u8], signature: &[u8]) -> bool {
        self.public_key.verify(message, signature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sha2::{Digest, Sha256};

    // Vectors shared with the other client implementations; changing any of
    // the encodings below breaks interoperability.
    const SIGN_SECRET: &str =
        "26x56YPzPDro5t2smQfGcYAPy3j7R2jB2NUb7xKbAGK23B6x4WNQPh3twb6oDksFov5X8ts5CtntUNbpQpAKFdbR";
    const SIGN_SIGNATURE: &str =
        "26gFr4xth7W9K7HPWAxq3BLsua8oTy378mC1MYFiEXHBBpeBjP8WmJEJo8XTBowetvqbRshcQEtBUdwQcAqDyP8T";
    const SIGN_PUBLIC: &str = "ed25519:AYWv9RAN1hpSQA4p1DLhCNnpnNXwxhfH9qeHN8B4nJ59";

    const DERIVE_SECRET: &str =
        "5JueXZhEEVqGVT5powZ5twyPP8wrap2K7RdAYGGdjBwiBdd7Hh6aQxMP1u3Ma9Yanq1nEv32EW7u8kUJsZ6f315C";
    const DERIVE_PUBLIC: &str = "ed25519:EWrekY1deMND7N3Q7Dixxj12wD7AVjFRt2H9q21QHUSW";

    const CANONICAL: &str =
        "ed25519:2wyRcSwSuHtRVmkMCGjPwnzZmQLeXLzLLyED1NDMt4BjnKgQL6tF85yBx6Jr26D2dUNeC716RBoTxntVHsegogYw";

    #[test]
    fn deterministic_signing_vector() {
        let pair = KeyPairEd25519::from_secret_key(SIGN_SECRET).unwrap();
        let message = Sha256::digest(b"message");
        let first = pair.sign(message.as_slice());
        let second = pair.sign(message.as_slice());
        assert_eq!(first, second);
        assert_eq!(bs58::encode(first.signature).into_string(), SIGN_SIGNATURE);
        assert_eq!(first.public_key.to_string(), SIGN_PUBLIC);
        assert!(pair.verify(message.as_slice(), &first.signature));
    }

    #[test]
    fn public_key_derivation_vector() {
        let pair = KeyPairEd25519::from_secret_key(DERIVE_SECRET).unwrap();
        assert_eq!(pair.public_key().to_string(), DERIVE_PUBLIC);

        // A signature made with the secret verifies under the public key
        // parsed independently from its string form.
        let public: PublicKey = DERIVE_PUBLIC.parse().unwrap();
        let signature = pair.sign(b"some message here");
        assert!(public.verify(b"some message here", &signature.signature));
    }

    #[test]
    fn sign_verify_roundtrip() {
        let pair = KeyPairEd25519::from_random();
        let signature = pair.sign(b"hello");
        assert!(pair.verify(b"hello", &signature.signature));
        assert!(!pair.verify(b"hello!", &signature.signature));
        assert!(!pair.verify(b"hello", &signature.signature[..63]));
        assert_eq!(signature.public_key, pair.public_key());
    }

    #[test]
    fn signature_does_not_verify_under_other_key() {
        let pair = KeyPairEd25519::from_random();
        let other = KeyPairEd25519::from_random();
        let signature = pair.sign(b"hello");
        assert!(!other.verify(b"hello", &signature.signature));
    }

    #[test]
    fn str_roundtrip() {
        let pair = KeyPair::from_random("ed25519").unwrap();
        let restored: KeyPair = pair.to_string().parse().unwrap();
        assert_eq!(restored.secret_key(), pair.secret_key());
        assert_eq!(restored.public_key(), pair.public_key());

        // A canonical string survives exactly.
        let pair: KeyPair = CANONICAL.parse().unwrap();
        assert_eq!(pair.to_string(), CANONICAL);
    }

    #[test]
    fn legacy_secret_is_accepted_but_not_emitted() {
        let canonical: KeyPair = format!("ed25519:{}", SIGN_SECRET).parse().unwrap();
        let legacy: KeyPair = SIGN_SECRET.parse().unwrap();
        assert_eq!(legacy.secret_key(), SIGN_SECRET);
        assert_eq!(legacy.public_key(), canonical.public_key());
        assert_eq!(legacy.to_string(), format!("ed25519:{}", SIGN_SECRET));
    }

    #[test]
    fn curve_dispatch() {
        assert!(KeyPair::from_random("ED25519").is_ok());
        assert!(matches!(
            KeyPair::from_random("rsa2048"),
            Err(Error::UnknownCurve(_))
        ));
        assert!(matches!(
            KeyPair::from_str("a:b:c"),
            Err(Error::InvalidKeyFormat(_))
        ));
        assert!(matches!(
            KeyPair::from_str("secp256k1:3mJr7AoUXx2Wqd"),
            Err(Error::UnknownCurve(_))
        ));
        assert!(matches!(
            KeyPairEd25519::from_secret_key("3mJr7AoUXx2Wqd"),
            Err(Error::InvalidKeyLength { expected: 64, .. })
        ));
    }

    #[test]
    fn encrypt_decrypt_roundtrip() {
        let sender = KeyPairEd25519::from_random();
        let receiver = KeyPairEd25519::from_random();
        let envelope = sender
            .encrypt_message(b"hello world", &receiver.public_key())
            .unwrap();
        assert_eq!(
            envelope.len(),
            ENVELOPE_KEY_LENGTH + ENVELOPE_NONCE_LENGTH + b"hello world".len() + 16
        );
        assert_eq!(receiver.decrypt_message(&envelope).unwrap(), b"hello world");
    }

    #[test]
    fn encrypt_to_self() {
        let pair = KeyPairEd25519::from_random();
        let envelope = pair.encrypt_message(b"note to self", &pair.public_key()).unwrap();
        assert_eq!(pair.decrypt_message(&envelope).unwrap(), b"note to self");
    }

    #[test]
    fn fresh_randomness_per_message() {
        let sender = KeyPairEd25519::from_random();
        let receiver = KeyPairEd25519::from_random();
        let a = sender.encrypt_message(b"same plaintext", &receiver.public_key()).unwrap();
        let b = sender.encrypt_message(b"same plaintext", &receiver.public_key()).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn decryption_with_wrong_key_yields_none() {
        let sender = KeyPairEd25519::from_random();
        let receiver = KeyPairEd25519::from_random();
        let eavesdropper = KeyPairEd25519::from_random();
        let envelope = sender.encrypt_message(b"secret", &receiver.public_key()).unwrap();
        assert_eq!(eavesdropper.decrypt_message(&envelope), None);
        assert_eq!(sender.decrypt_message(&envelope), None);
    }

    #[test]
    fn corrupted_envelope_yields_none() {
        let sender = KeyPairEd25519::from_random();
        let receiver = KeyPairEd25519::from_random();
        let envelope = sender.encrypt_message(b"secret", &receiver.public_key()).unwrap();

        let mut corrupted = envelope.clone();
        *corrupted.last_mut().unwrap() ^= 1;
        assert_eq!(receiver.decrypt_message(&corrupted), None);

        assert_eq!(receiver.decrypt_message(&envelope[..40]), None);
        assert_eq!(receiver.decrypt_message(&[]), None);
    }

    #[test]
    fn serde_via_canonical_string() {
        let pair: KeyPair = CANONICAL.parse().unwrap();
        let json = serde_json::to_string(&pair).unwrap();
        assert_eq!(json, format!("\"{}\"", CANONICAL));
        let back: KeyPair = serde_json::from_str(&json).unwrap();
        assert_eq!(back.secret_key(), pair.secret_key());
    }

    #[test]
    fn debug_does_not_leak_the_secret() {
        let pair = KeyPairEd25519::from_secret_key(SIGN_SECRET).unwrap();
        let debug = format!("{:?}", pair);
        assert!(!debug.contains(SIGN_SECRET));
        assert!(debug.contains("public_key"));
    }
}
