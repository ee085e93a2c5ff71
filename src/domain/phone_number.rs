use std::fmt;
use std::str::FromStr;

const MIN_LEN: usize = 10;
const MAX_LEN: usize = 32;

/// A contact phone number. Optional on the form, but once supplied it must
/// be at least ten characters long.
#[derive(Debug, Clone, PartialEq)]
pub struct PhoneNumber(String);

impl FromStr for PhoneNumber {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        if value.chars().count() < MIN_LEN {
            return Err("Mobile number must be at least 10 characters".into());
        }
        if value.chars().count() > MAX_LEN {
            return Err("Mobile number too long".into());
        }
        Ok(Self(value.to_string()))
    }
}

impl AsRef<str> for PhoneNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
