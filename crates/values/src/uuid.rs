//! UUID value object: parsing, the two-integer form, and generation
//! (versions 3, 4, 5 and timestamp-first ordered v4).

use core::fmt;
use core::str::FromStr;

use chrono::Utc;
use once_cell::sync::Lazy;
use propfill_core::{FieldType, PropertyValue, Value};
use rand::RngCore;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};
use uuid::Uuid;

use crate::error::{ValueError, ValueResult};
use crate::value_object::ValueObject;

/// Optional braces, optional hyphens, version nibble 0 to 5.
static GRAMMAR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(\{)?([0-9a-f]{8})-?([0-9a-f]{4})-?([0-5][0-9a-f]{3})-?([0-9a-f]{4})-?([0-9a-f]{12})(\})?$",
    )
    .expect("uuid grammar is a valid regex")
});

/// Stamp the version nibble (byte 6, high) and the RFC 4122 variant
/// (byte 8, top bits `10`).
fn with_version(bytes: [u8; 16], version: u8) -> [u8; 16] {
    let mut stamped = bytes;
    stamped[6] = (stamped[6] & 0x0f) | (version << 4);
    stamped[8] = (stamped[8] & 0x3f) | 0x80;
    stamped
}

fn random_bytes<const N: usize>() -> [u8; N] {
    let mut bytes = [0u8; N];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes
}

fn name_input(namespace: &UuidValue, name: &str) -> Vec<u8> {
    let mut input = Vec::with_capacity(16 + name.len());
    input.extend_from_slice(namespace.as_bytes());
    input.extend_from_slice(name.as_bytes());
    input
}

/// An RFC 4122 UUID whose version nibble is 0 to 5.
///
/// Always rendered in canonical form: lowercase, hyphenated, no braces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UuidValue(Uuid);

impl UuidValue {
    pub const NAMESPACE_DNS: UuidValue =
        UuidValue(Uuid::from_u128(0x6ba7b810_9dad_11d1_80b4_00c04fd430c8));
    pub const NAMESPACE_URL: UuidValue =
        UuidValue(Uuid::from_u128(0x6ba7b811_9dad_11d1_80b4_00c04fd430c8));
    pub const NAMESPACE_OID: UuidValue =
        UuidValue(Uuid::from_u128(0x6ba7b812_9dad_11d1_80b4_00c04fd430c8));
    pub const NAMESPACE_X500: UuidValue =
        UuidValue(Uuid::from_u128(0x6ba7b814_9dad_11d1_80b4_00c04fd430c8));

    /// Accepts upper or lower case, with or without hyphens, and optionally
    /// wrapped in a matching pair of braces.
    pub fn parse(text: &str) -> ValueResult<Self> {
        let caps = GRAMMAR
            .captures(text)
            .ok_or_else(|| ValueError::invalid_uuid(format!("'{text}' is not a valid uuid")))?;
        if caps.get(1).is_some() != caps.get(7).is_some() {
            return Err(ValueError::invalid_uuid(format!("'{text}' has unbalanced braces")));
        }

        let digits: String = (2..=6).filter_map(|i| caps.get(i)).map(|m| m.as_str()).collect();
        let mut bytes = [0u8; 16];
        hex::decode_to_slice(&digits, &mut bytes)
            .map_err(|e| ValueError::invalid_uuid(e.to_string()))?;
        Ok(Self(Uuid::from_bytes(bytes)))
    }

    /// Build from `[high, low]`, each half rendered as 16 hex digits.
    pub fn from_int_pair(pair: &[i64]) -> ValueResult<Self> {
        let [hi, lo] = pair else {
            return Err(ValueError::invalid_uuid(format!(
                "expected exactly 2 integers, got {}",
                pair.len()
            )));
        };
        Self::parse(&format!("{:016x}{:016x}", *hi as u64, *lo as u64))
    }

    /// The 16 bytes split at the midpoint, each half read big-endian.
    pub fn to_int_pair(&self) -> [i64; 2] {
        let bytes = self.0.as_bytes();
        let mut hi = [0u8; 8];
        let mut lo = [0u8; 8];
        hi.copy_from_slice(&bytes[..8]);
        lo.copy_from_slice(&bytes[8..]);
        [i64::from_be_bytes(hi), i64::from_be_bytes(lo)]
    }

    /// Random version 4.
    pub fn generate_v4() -> Self {
        Self::from_v4_seed(random_bytes())
    }

    /// Version 4 from explicit seed bytes instead of random ones.
    pub fn generate_v4_from(seed: &[u8]) -> ValueResult<Self> {
        let seed: [u8; 16] = seed
            .try_into()
            .map_err(|_| ValueError::InvalidSeedLength(seed.len()))?;
        Ok(Self::from_v4_seed(seed))
    }

    /// Name-based version 3 (MD5).
    pub fn generate_v3(namespace: &UuidValue, name: &str) -> Self {
        let digest = md5::compute(name_input(namespace, name));
        Self(Uuid::from_bytes(with_version(digest.0, 3)))
    }

    /// Name-based version 5 (SHA-1 truncated to 16 bytes).
    pub fn generate_v5(namespace: &UuidValue, name: &str) -> Self {
        let digest = Sha1::digest(name_input(namespace, name));
        let mut bytes = [0u8; 16];
        bytes.copy_from_slice(&digest[..16]);
        Self(Uuid::from_bytes(with_version(bytes, 5)))
    }

    /// Version 4 whose first four bytes are the current Unix time, so values
    /// sort by creation second.
    pub fn generate_timestamp_ordered() -> Self {
        let now = Utc::now().timestamp().clamp(0, i64::from(u32::MAX)) as u32;
        Self::timestamp_ordered_at(now, random_bytes())
    }

    fn timestamp_ordered_at(unix_seconds: u32, entropy: [u8; 12]) -> Self {
        let mut seed = [0u8; 16];
        seed[..4].copy_from_slice(&unix_seconds.to_be_bytes());
        seed[4..].copy_from_slice(&entropy);
        Self::from_v4_seed(seed)
    }

    fn from_v4_seed(seed: [u8; 16]) -> Self {
        Self(Uuid::from_bytes(with_version(seed, 4)))
    }

    pub fn as_bytes(&self) -> &[u8; 16] {
        self.0.as_bytes()
    }

    /// The version nibble.
    pub fn version(&self) -> u8 {
        self.0.as_bytes()[6] >> 4
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl ValueObject for UuidValue {}

impl fmt::Display for UuidValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0.hyphenated(), f)
    }
}

impl FromStr for UuidValue {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for UuidValue {
    type Error = ValueError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<UuidValue> for String {
    fn from(value: UuidValue) -> Self {
        value.to_string()
    }
}

impl From<UuidValue> for Uuid {
    fn from(value: UuidValue) -> Self {
        value.0
    }
}

impl TryFrom<Uuid> for UuidValue {
    type Error = ValueError;

    /// Rejects UUIDs whose version nibble is above 5.
    fn try_from(value: Uuid) -> Result<Self, Self::Error> {
        Self::parse(&value.simple().to_string())
    }
}

impl PropertyValue for UuidValue {
    const TYPES: &'static [FieldType] = &[FieldType::String];

    fn from_value(value: Value) -> Result<Self, String> {
        let text = String::from_value(value)?;
        Self::parse(&text).map_err(|e| e.to_string())
    }

    fn to_value(&self) -> Value {
        Value::String(self.to_string())
    }
}
