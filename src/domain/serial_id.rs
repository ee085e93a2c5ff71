use std::fmt;
use std::str::FromStr;

/// Inclusive range of the numeric form number. Both bounds are 8 digits
/// wide, so a generated value can never carry a leading zero.
const SERIAL_MIN: u32 = 10_000_000;
const SERIAL_MAX: u32 = 99_999_999;

/// Externally visible registration identifier: exactly 8 decimal digits.
/// Assigned once at submission and immutable afterwards. Uniqueness is
/// enforced by the store's unique constraint, not here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerialId(String);

impl SerialId {
    /// Draw a fresh identifier uniformly from [10000000, 99999999].
    pub fn generate() -> Self {
        use rand::Rng;

        let value: u32 = rand::thread_rng().gen_range(SERIAL_MIN..=SERIAL_MAX);
        Self(value.to_string())
    }
}

impl FromStr for SerialId {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        if value.len() != 8 || !value.bytes().all(|b| b.is_ascii_digit()) {
            return Err("Serial ID must be exactly 8 digits".into());
        }
        if value.starts_with('0') {
            return Err("Serial ID out of range".into());
        }
        Ok(Self(value.to_string()))
    }
}

impl AsRef<str> for SerialId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SerialId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
