use crate::error::Error;
use std::{
    convert::TryFrom,
    fmt::{self, Display},
    str::FromStr,
};

/// The set of supported signature curves.
///
/// Closed on purpose: every dispatch site matches exhaustively, so wiring up
/// a new curve is a compile error until each site handles it.
#[derive(Clone, Copy, Debug, Ord, PartialOrd, Eq, PartialEq, Hash)]
#[repr(u8)]
pub enum KeyType {
    Ed25519 = 0,
}

impl Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyType::Ed25519 => f.write_str("ed25519"),
        }
    }
}

impl FromStr for KeyType {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Tags are emitted lowercase but matched case-insensitively, for
        // compatibility with keys encoded by older clients.
        if s.eq_ignore_ascii_case("ed25519") {
            Ok(KeyType::Ed25519)
        } else {
            Err(Error::UnknownKeyType(s.to_string()))
        }
    }
}

impl TryFrom<u8> for KeyType {
    type Error = Error;
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(KeyType::Ed25519),
            _ => Err(Error::UnknownKeyType(value.to_string())),
        }
    }
}

/// Splits an encoded key into its optional key-type tag and data segment.
///
/// No colon means the legacy unprefixed form, one colon the canonical
/// `<tag>:<data>` form; anything beyond that is malformed.
pub(crate) fn split_key_type_data(value: &str) -> Result<(Option<&str>, &str), Error> {
    let mut parts = value.splitn(3, ':');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(data), None, None) => Ok((None, data)),
        (Some(tag), Some(data), None) => Ok((Some(tag), data)),
        _ => Err(Error::InvalidKeyFormat(value.to_string())),
    }
}
