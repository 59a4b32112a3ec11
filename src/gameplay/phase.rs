use crate::cards::Street;

/// Where a hand stands: a betting street, awaiting showdown, or paid out.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Phase {
    Betting(Street),
    Showdown,
    Complete,
}

impl Phase {
    pub fn street(&self) -> Option<Street> {
        match self {
            Self::Betting(street) => Some(*street),
            _ => None,
        }
    }
    pub fn is_betting(&self) -> bool {
        matches!(self, Self::Betting(_))
    }
    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Complete)
    }
}

impl TryFrom<&str> for Phase {
    type Error = String;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "showdown" => Ok(Self::Showdown),
            "complete" => Ok(Self::Complete),
            other => Street::try_from(other).map(Self::Betting),
        }
    }
}
impl TryFrom<String> for Phase {
    type Error = String;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::try_from(s.as_str())
    }
}
impl From<Phase> for String {
    fn from(p: Phase) -> String {
        p.to_string()
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Betting(street) => write!(f, "{}", street),
            Self::Showdown => write!(f, "showdown"),
            Self::Complete => write!(f, "complete"),
        }
    }
}
