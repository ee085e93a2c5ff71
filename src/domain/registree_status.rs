use std::str::FromStr;

/// Whether the registrant is a former or current student of the department.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistreeStatus {
    FormerStudent,
    CurrentStudent,
}

impl FromStr for RegistreeStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Former Student" => Ok(Self::FormerStudent),
            "Current Student" => Ok(Self::CurrentStudent),
            other => Err(format!("\"{}\" is not a recognized registree status", other)),
        }
    }
}

impl AsRef<str> for RegistreeStatus {
    fn as_ref(&self) -> &str {
        match self {
            Self::FormerStudent => "Former Student",
            Self::CurrentStudent => "Current Student",
        }
    }
}
