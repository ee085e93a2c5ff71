use std::str::FromStr;

/// Gender as captured by the paper form's two checkboxes.
/// Stored values outside this set are treated as unrecognized and render
/// with neither box checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Male" => Ok(Self::Male),
            "Female" => Ok(Self::Female),
            other => Err(format!("\"{}\" is not a recognized gender option", other)),
        }
    }
}

impl AsRef<str> for Gender {
    fn as_ref(&self) -> &str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
        }
    }
}
