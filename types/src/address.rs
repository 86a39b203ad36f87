//! Account / contract address type.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::TypesError;

/// An opaque account or contract address.
///
/// The engine never interprets addresses; it only compares them. Owners,
/// pool creators, NFT collections, reward assets and the engine's own
/// custody account are all addresses.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Address(String);

impl Address {
    /// Longest accepted address, in bytes.
    pub const MAX_LEN: usize = 128;

    /// Create a new address from a raw string.
    ///
    /// # Panics
    /// Panics if the string is not a well-formed address. Use
    /// [`Address::parse`] for untrusted input.
    pub fn new(raw: impl Into<String>) -> Self {
        let s = raw.into();
        assert!(Self::is_well_formed(&s), "malformed address: {s:?}");
        Self(s)
    }

    /// Parse an address from untrusted input.
    pub fn parse(raw: &str) -> Result<Self, TypesError> {
        if Self::is_well_formed(raw) {
            Ok(Self(raw.to_string()))
        } else {
            Err(TypesError::InvalidAddress(raw.to_string()))
        }
    }

    /// Return the raw address string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn is_well_formed(s: &str) -> bool {
        !s.is_empty() && s.len() <= Self::MAX_LEN && !s.chars().any(char::is_whitespace)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Address {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
