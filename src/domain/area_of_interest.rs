use std::str::FromStr;

/// Association activities a registrant can volunteer for. Fixed option
/// list; selection order is preserved by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AreaOfInterest {
    MentorshipPrograms,
    EventPlanning,
    CareerDevelopment,
    ResearchCollaboration,
    FundraisingInitiatives,
    Other,
}

impl AreaOfInterest {
    /// All options, in the order they appear on the form.
    pub const ALL: [AreaOfInterest; 6] = [
        Self::MentorshipPrograms,
        Self::EventPlanning,
        Self::CareerDevelopment,
        Self::ResearchCollaboration,
        Self::FundraisingInitiatives,
        Self::Other,
    ];
}

impl FromStr for AreaOfInterest {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Mentorship Programs" => Ok(Self::MentorshipPrograms),
            "Event Planning and Coordination" => Ok(Self::EventPlanning),
            "Career Development Support" => Ok(Self::CareerDevelopment),
            "Research Collaboration" => Ok(Self::ResearchCollaboration),
            "Fundraising Initiatives" => Ok(Self::FundraisingInitiatives),
            "Other" => Ok(Self::Other),
            other => Err(format!("\"{}\" is not a recognized area of interest", other)),
        }
    }
}

impl AsRef<str> for AreaOfInterest {
    fn as_ref(&self) -> &str {
        match self {
            Self::MentorshipPrograms => "Mentorship Programs",
            Self::EventPlanning => "Event Planning and Coordination",
            Self::CareerDevelopment => "Career Development Support",
            Self::ResearchCollaboration => "Research Collaboration",
            Self::FundraisingInitiatives => "Fundraising Initiatives",
            Self::Other => "Other",
        }
    }
}
