use std::str::FromStr;

const MAX_LEN: usize = 128;

/// Completed program or degree. The paper form offers B.Sc. and M.Sc.
/// checkboxes plus an "Other (please specify)" blank, so anything outside
/// the two fixed labels is carried as free text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgramDegree {
    BSc,
    MSc,
    Other(String),
}

impl FromStr for ProgramDegree {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        match value {
            "" => Err("Program/degree cannot be empty".into()),
            "B.Sc." => Ok(Self::BSc),
            "M.Sc." => Ok(Self::MSc),
            other if other.chars().count() > MAX_LEN => Err("Program/degree too long".into()),
            other => Ok(Self::Other(other.to_string())),
        }
    }
}

impl AsRef<str> for ProgramDegree {
    fn as_ref(&self) -> &str {
        match self {
            Self::BSc => "B.Sc.",
            Self::MSc => "M.Sc.",
            Self::Other(value) => value.as_ref(),
        }
    }
}
