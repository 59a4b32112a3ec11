use crate::Chips;

/// A betting decision.
///
/// Amounts live outside the enum: `Bet` carries its size, `Raise` its
/// raise-to total of street investment, `Allin` commits the whole stack.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Fold,
    Check,
    Call,
    Bet,
    Raise,
    Allin,
}

impl Action {
    pub const fn all() -> [Self; 6] {
        [
            Self::Fold,
            Self::Check,
            Self::Call,
            Self::Bet,
            Self::Raise,
            Self::Allin,
        ]
    }
    /// puts chips in beyond a call
    pub fn is_aggressive(&self) -> bool {
        matches!(self, Self::Bet | Self::Raise | Self::Allin)
    }
    /// takes an amount that can be chosen
    pub fn is_sized(&self) -> bool {
        matches!(self, Self::Bet | Self::Raise)
    }
    pub fn name(&self) -> &'static str {
        match self {
            Self::Fold => "fold",
            Self::Check => "check",
            Self::Call => "call",
            Self::Bet => "bet",
            Self::Raise => "raise",
            Self::Allin => "allin",
        }
    }
}

impl TryFrom<&str> for Action {
    type Error = String;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s.trim().to_lowercase().as_str() {
            "fold" | "f" => Ok(Self::Fold),
            "check" | "x" => Ok(Self::Check),
            "call" | "c" => Ok(Self::Call),
            "bet" | "b" => Ok(Self::Bet),
            "raise" | "r" => Ok(Self::Raise),
            "allin" | "all-in" | "shove" | "a" => Ok(Self::Allin),
            _ => Err(format!("unknown action: {}", s)),
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// An action the actor may take right now, with its bounds.
///
/// `bet`/`raise` carry `[min, max]`, `call` carries `to_call`,
/// `allin` carries `min == max ==` the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LegalAction {
    pub action: Action,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<Chips>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<Chips>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_call: Option<Chips>,
}

impl LegalAction {
    pub fn fold() -> Self {
        Self::from(Action::Fold)
    }
    pub fn check() -> Self {
        Self::from(Action::Check)
    }
    pub fn call(to_call: Chips) -> Self {
        Self {
            to_call: Some(to_call),
            ..Self::from(Action::Call)
        }
    }
    pub fn bet(min: Chips, max: Chips) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
            ..Self::from(Action::Bet)
        }
    }
    pub fn raise(min: Chips, max: Chips) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
            ..Self::from(Action::Raise)
        }
    }
    pub fn allin(stack: Chips) -> Self {
        Self {
            min: Some(stack),
            max: Some(stack),
            ..Self::from(Action::Allin)
        }
    }
}

impl From<Action> for LegalAction {
    fn from(action: Action) -> Self {
        Self {
            action,
            min: None,
            max: None,
            to_call: None,
        }
    }
}

impl std::fmt::Display for LegalAction {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match (self.min, self.max, self.to_call) {
            (_, _, Some(c)) => write!(f, "{}({})", self.action, c),
            (Some(lo), Some(hi), _) if lo == hi => write!(f, "{}({})", self.action, lo),
            (Some(lo), Some(hi), _) => write!(f, "{}({}..{})", self.action, lo, hi),
            _ => write!(f, "{}", self.action),
        }
    }
}

/// lookup helper over a legal action set
pub trait Legal {
    fn find(&self, action: Action) -> Option<&LegalAction>;
    fn allows(&self, action: Action) -> bool {
        self.find(action).is_some()
    }
    fn to_call(&self) -> Chips;
}

impl Legal for [LegalAction] {
    fn find(&self, action: Action) -> Option<&LegalAction> {
        self.iter().find(|a| a.action == action)
    }
    fn to_call(&self) -> Chips {
        self.find(Action::Call).and_then(|a| a.to_call).unwrap_or(0)
    }
}
