use crate::Chips;
use crate::Probability;

/// Canonical bet sizes expressed as a share of the pot.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeTag {
    Third,
    Half,
    TwoThird,
    Pot,
    AllIn,
}

impl SizeTag {
    pub const fn all() -> [Self; 5] {
        [
            Self::Third,
            Self::Half,
            Self::TwoThird,
            Self::Pot,
            Self::AllIn,
        ]
    }
    /// default pot fraction; all-in is oversized and left to the clamp
    pub fn fraction(&self) -> f64 {
        match self {
            Self::Third => 1. / 3.,
            Self::Half => 0.5,
            Self::TwoThird => 2. / 3.,
            Self::Pot => 1.,
            Self::AllIn => 10.,
        }
    }
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Third => "third",
            Self::Half => "half",
            Self::TwoThird => "two_third",
            Self::Pot => "pot",
            Self::AllIn => "all_in",
        }
    }
}

impl TryFrom<&str> for SizeTag {
    type Error = String;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s.trim().to_lowercase().as_str() {
            "third" => Ok(Self::Third),
            "half" => Ok(Self::Half),
            "two_third" => Ok(Self::TwoThird),
            "pot" => Ok(Self::Pot),
            "all_in" | "allin" => Ok(Self::AllIn),
            _ => Err(format!("unsupported size tag: {}", s)),
        }
    }
}

impl std::fmt::Display for SizeTag {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Size of the bet being faced, relative to the pot before calling.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Default)]
#[derive(serde::Serialize, serde::Deserialize)]
pub enum Facing {
    #[default]
    #[serde(rename = "na")]
    Na,
    #[serde(rename = "third")]
    Third,
    #[serde(rename = "half")]
    Half,
    #[serde(rename = "two_third+")]
    TwoThirdPlus,
}

impl Facing {
    /// Buckets `to_call / pot_now` against the two thresholds.
    pub fn classify(to_call: Chips, pot_now: Chips, third_le: f64, half_le: f64) -> Self {
        if to_call <= 0 || pot_now <= 0 {
            return Self::Na;
        }
        let r = to_call as f64 / pot_now as f64;
        match r {
            r if r <= third_le => Self::Third,
            r if r <= half_le => Self::Half,
            _ => Self::TwoThirdPlus,
        }
    }
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Na => "na",
            Self::Third => "third",
            Self::Half => "half",
            Self::TwoThirdPlus => "two_third+",
        }
    }
    /// the spelling used by some table artifacts and rule files
    pub fn alias(&self) -> Option<&'static str> {
        match self {
            Self::TwoThirdPlus => Some("two_third_plus"),
            _ => None,
        }
    }
    pub fn is_small(&self) -> bool {
        matches!(self, Self::Third | Self::Half)
    }
}

impl TryFrom<&str> for Facing {
    type Error = String;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s.trim().to_lowercase().as_str() {
            "na" | "" => Ok(Self::Na),
            "third" | "small" => Ok(Self::Third),
            "half" | "mid" => Ok(Self::Half),
            "two_third+" | "two_third_plus" | "large" => Ok(Self::TwoThirdPlus),
            _ => Err(format!("unknown facing size: {}", s)),
        }
    }
}

impl std::fmt::Display for Facing {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Finer facing tiers used by defense thresholds.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum FineFacing {
    Third,
    Half,
    TwoThird,
    Pot,
    Overbet,
}

impl FineFacing {
    pub fn classify(to_call: Chips, pot_now: Chips) -> Option<Self> {
        if to_call <= 0 || pot_now <= 0 {
            return None;
        }
        let r = to_call as f64 / pot_now as f64;
        Some(match r {
            r if r <= 0.4 => Self::Third,
            r if r <= 0.6 => Self::Half,
            r if r <= 0.8 => Self::TwoThird,
            r if r <= 1.1 => Self::Pot,
            _ => Self::Overbet,
        })
    }
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Third => "third",
            Self::Half => "half",
            Self::TwoThird => "two_third",
            Self::Pot => "pot",
            Self::Overbet => "overbet",
        }
    }
}

impl std::fmt::Display for FineFacing {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Share of the final pot the caller contributes.
///
/// `pot_now` must exclude the hero's pending call.
pub fn pot_odds(to_call: Chips, pot_now: Chips) -> Probability {
    let tc = to_call.max(0);
    let pn = pot_now.max(0);
    match pn + tc {
        0 => 0.,
        denom if denom < 0 => 0.,
        _ if pn == 0 => 1.,
        denom => tc as Probability / denom as Probability,
    }
}

/// Minimum defence frequency.
pub fn mdf(to_call: Chips, pot_now: Chips) -> Probability {
    (1. - pot_odds(to_call, pot_now)).clamp(0., 1.)
}

/// Blind multiple to chips, never below one chip.
pub fn size_from_bb(mult: f64, bb: Chips) -> Chips {
    ((mult * bb.max(1) as f64).round() as Chips).max(1)
}

/// Raw pot-share amount, never below one chip.
pub fn size_to_amount(pot: Chips, fraction: f64) -> Chips {
    ((pot.max(0) as f64 * fraction).round() as Chips).max(1)
}

/// Bet-semantics amount for a tag, never below the big blind.
/// Bets open the action, so the last bet does not move the size.
pub fn size_from_tag(tag: SizeTag, pot_now: Chips, _last_bet: Chips, bb: Chips) -> Chips {
    size_to_amount(pot_now, tag.fraction()).max(bb)
}

/// Raise-to total for a tag: pot plus the tag's share of it.
///
/// An optional cap limits the target to `eff_stack * cap_ratio`. The result
/// never drops below `max(bb, last_bet + bb)`. All-in has no raise-to share.
pub fn raise_to_amount(
    pot_now: Chips,
    last_bet: Chips,
    tag: SizeTag,
    bb: Chips,
    eff_stack: Option<Chips>,
    cap_ratio: Option<f64>,
) -> Option<Chips> {
    if tag == SizeTag::AllIn {
        return None;
    }
    let mut target = (pot_now as f64 * (1. + tag.fraction())).round() as Chips;
    if let (Some(eff), Some(cap)) = (eff_stack, cap_ratio) {
        if cap > 0. {
            target = target.min((eff as f64 * cap).round() as Chips);
        }
    }
    Some(target.max(bb.max(last_bet + bb)))
}
