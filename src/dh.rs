use crate::error::Error;
use curve25519_dalek::edwards::CompressedEdwardsY;
use sha2::{Digest, Sha512};
use zeroize::Zeroize;

/// Construct a X25519 secret key from an Ed25519 secret key seed.
pub(crate) fn ed25519_to_x25519_sk(seed: &[u8; 32]) -> crypto_box::SecretKey {
    // An Ed25519 public key is derived off the left half of the SHA512 of the
    // secret scalar, hence a matching conversion of the secret key must do
    // the same to yield a Curve25519 keypair with the same public key.
    let mut curve25519_sk: [u8; 32] = [0; 32];
    let hash = Sha512::digest(seed);
    curve25519_sk.copy_from_slice(&hash.as_slice()[..32]);
    curve25519_sk[0] &= 248;
    curve25519_sk[31] &= 127;
    curve25519_sk[31] |= 64;
    let sk = crypto_box::SecretKey::from(curve25519_sk);
    curve25519_sk.zeroize();
    sk
}

/// Construct a Curve25519 public key from an Ed25519 public key.
///
/// The birational map from the Edwards curve to the Montgomery curve only
/// exists for byte strings that decompress to a valid point, which is not
/// guaranteed for arbitrary key bytes received from a peer.
pub(crate) fn ed25519_to_x25519_pk(pk: &[u8; 32]) -> Result<crypto_box::PublicKey, Error> {
    let point = CompressedEdwardsY(*pk).decompress().ok_or(Error::InvalidKeyData)?;
    Ok(crypto_box::PublicKey::from(point.to_montgomery().0))
}
