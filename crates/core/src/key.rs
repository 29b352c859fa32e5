//! Primary key codec
//!
//! A `RecordId` is an opaque 12-byte identifier rendered as 24 lowercase hex
//! digits. Well-formedness is independent of existence: a string that is not
//! exactly 24 hex digits is malformed and rejected before any storage call,
//! while a well-formed id that matches no stored record is a normal empty
//! result.
//!
//! Generated ids lead with the creation time in whole seconds (big-endian)
//! followed by eight random bytes, so freshly created records sort roughly
//! by insertion time.

use std::fmt;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

use thiserror::Error;

/// Reserved storage field name for the primary key
///
/// Declared queries refer to the key as `id`; the translator rewrites that
/// to this name so backends can recognize it in sort keys and distinct
/// targets. It never appears inside a stored [`Document`](crate::Document).
pub const ID_FIELD: &str = "_id";

/// Number of raw bytes in a record id
pub const ID_LEN: usize = 12;

/// An opaque primary key for one stored record
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RecordId([u8; ID_LEN]);

impl RecordId {
    /// Construct an id from raw bytes
    pub const fn from_bytes(bytes: [u8; ID_LEN]) -> Self {
        Self(bytes)
    }

    /// Generate a fresh id: 4 bytes of unix seconds, 8 random bytes
    pub fn generate() -> Self {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0) as u32;
        let tail: [u8; 8] = rand::random();

        let mut bytes = [0u8; ID_LEN];
        bytes[..4].copy_from_slice(&secs.to_be_bytes());
        bytes[4..].copy_from_slice(&tail);
        Self(bytes)
    }

    /// Parse a raw key string
    ///
    /// Accepts exactly 24 hex digits, case-insensitive. Anything else is
    /// malformed.
    ///
    /// # Errors
    ///
    /// Returns `ParseIdError` describing why the input is malformed.
    pub fn parse(raw: &str) -> Result<Self, ParseIdError> {
        if raw.len() != ID_LEN * 2 {
            return Err(ParseIdError::WrongLength { actual: raw.len() });
        }

        let mut bytes = [0u8; ID_LEN];
        let raw = raw.as_bytes();
        for (i, byte) in bytes.iter_mut().enumerate() {
            let hi = hex_digit(raw[i * 2])?;
            let lo = hex_digit(raw[i * 2 + 1])?;
            *byte = (hi << 4) | lo;
        }
        Ok(Self(bytes))
    }

    /// Raw byte view of the id
    pub const fn as_bytes(&self) -> &[u8; ID_LEN] {
        &self.0
    }
}

fn hex_digit(byte: u8) -> Result<u8, ParseIdError> {
    match byte {
        b'0'..=b'9' => Ok(byte - b'0'),
        b'a'..=b'f' => Ok(byte - b'a' + 10),
        b'A'..=b'F' => Ok(byte - b'A' + 10),
        other => Err(ParseIdError::InvalidDigit {
            byte: other as char,
        }),
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl FromStr for RecordId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Why a raw key string failed to parse
///
/// These map to the `InvalidKey` error kind once an operation label is known.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseIdError {
    /// Key is not exactly 24 characters
    #[error("key must be {} hex digits, got {actual}", ID_LEN * 2)]
    WrongLength {
        /// Observed character count
        actual: usize,
    },

    /// Key contains a non-hex character
    #[error("key contains non-hex character '{byte}'")]
    InvalidDigit {
        /// Offending character
        byte: char,
    },
}
