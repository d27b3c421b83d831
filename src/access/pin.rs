use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::PIN_LENGTH;
use crate::utils::ValidationError;

// ASCII digits only, unlike Unicode `\d`
static DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]+$").expect("valid regex"));

/// Six-digit owner-access PIN, valid by construction
#[derive(Clone, PartialEq, Eq)]
pub struct Pin(String);

impl Pin {
    /// Rules apply in order: present, exactly 6 UTF-16 units, digits only
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        if input.is_empty() {
            return Err(ValidationError::PinRequired);
        }
        if input.encode_utf16().count() != PIN_LENGTH {
            return Err(ValidationError::PinLength);
        }
        if !DIGITS.is_match(input) {
            return Err(ValidationError::PinNotNumeric);
        }
        Ok(Self(input.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Pin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Pin(******)")
    }
}

/// Unlock token issued after PIN verification; `0` means locked
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerAccessToken(i64);

impl OwnerAccessToken {
    pub const LOCKED: Self = Self(0);

    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(self) -> i64 {
        self.0
    }

    pub fn is_unlocked(self) -> bool {
        self.0 != 0
    }
}

impl fmt::Display for OwnerAccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
