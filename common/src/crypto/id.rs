use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const ID_SIZE: usize = 16;

/// Opaque identifier used for accounts, plans, investments, withdrawal and
/// deposit requests and transaction records. Random 16 bytes, displayed and
/// serialized as hexadecimal.
#[derive(Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id(#[serde(with = "hex::serde")] [u8; ID_SIZE]);

impl Id {
    pub const fn new(bytes: [u8; ID_SIZE]) -> Self {
        Self(bytes)
    }

    pub const fn zero() -> Self {
        Self([0u8; ID_SIZE])
    }

    /// Generate a fresh random identifier
    pub fn random() -> Self {
        Self(rand::thread_rng().gen())
    }

    pub fn as_bytes(&self) -> &[u8; ID_SIZE] {
        &self.0
    }

    pub fn to_bytes(self) -> [u8; ID_SIZE] {
        self.0
    }

    pub fn from_hex(hex: &str) -> Result<Self, hex::FromHexError> {
        let mut bytes = [0u8; ID_SIZE];
        hex::decode_to_slice(hex, &mut bytes)?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

// Debug prints the same hexadecimal form as Display
impl fmt::Debug for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl AsRef<[u8]> for Id {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}
