use serde_json::Value;

/// How loudly a rationale item should be surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warn,
}

/// Every rationale code the advisor can emit.
///
/// The serialized form is the wire code (`PF_OPEN_RANGE_HIT`), which is also
/// the key into explanation templates.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Code {
    // preflop v0
    PfOpenBet,
    PfOpenRaise,
    PfCheck,
    PfFold,
    PfCall,
    PfFoldExpensive,
    // postflop v0.3
    PlHeader,
    PlProbeBet,
    PlCheck,
    PlCall,
    PlFold,
    PlAllinOnly,
    PlFoldPotodds,
    // safety
    SafeCheck,
    WClamped,
    WAnalysis,
    CfgFallbackUsed,
    // preflop v1
    PfOpenRangeHit,
    PfDefendPriceOk,
    PfDefendPriceBad,
    #[serde(rename = "PF_DEFEND_3BET")]
    PfDefend3bet,
    #[serde(rename = "PF_DEFEND_3BET_MIN_RAISE_ADJUSTED")]
    PfDefend3betMinRaiseAdjusted,
    PfNoLegalRaise,
    PfLimpCompleteBlind,
    #[serde(rename = "PF_ATTACK_4BET")]
    PfAttack4bet,
    #[serde(rename = "PF_ATTACK_4BET_MIN_RAISE_ADJUSTED")]
    PfAttack4betMinRaiseAdjusted,
    PfVsShoveCall,
    PfVsShoveFold,
    // flop / turn / river v1
    FlDryCbetThird,
    FlLowSprValueUp,
    FlRangeAdvSmallBet,
    FlNutAdvPolar,
    FlMdfDefend,
    FlDelayedCbetPlan,
    FlMinReopenAdjusted,
    FlRaiseSemiBluff,
    FlRaiseValue,
    FlCheckRange,
    // explanation helpers
    MixFrequencyHint,
    RiverValueTierSummary,
    RiverBlockerAdjust,
    RiverFacingDecision,
}

impl Code {
    pub const fn all() -> [Self; 42] {
        [
            Self::PfOpenBet,
            Self::PfOpenRaise,
            Self::PfCheck,
            Self::PfFold,
            Self::PfCall,
            Self::PfFoldExpensive,
            Self::PlHeader,
            Self::PlProbeBet,
            Self::PlCheck,
            Self::PlCall,
            Self::PlFold,
            Self::PlAllinOnly,
            Self::PlFoldPotodds,
            Self::SafeCheck,
            Self::WClamped,
            Self::WAnalysis,
            Self::CfgFallbackUsed,
            Self::PfOpenRangeHit,
            Self::PfDefendPriceOk,
            Self::PfDefendPriceBad,
            Self::PfDefend3bet,
            Self::PfDefend3betMinRaiseAdjusted,
            Self::PfNoLegalRaise,
            Self::PfLimpCompleteBlind,
            Self::PfAttack4bet,
            Self::PfAttack4betMinRaiseAdjusted,
            Self::PfVsShoveCall,
            Self::PfVsShoveFold,
            Self::FlDryCbetThird,
            Self::FlLowSprValueUp,
            Self::FlRangeAdvSmallBet,
            Self::FlNutAdvPolar,
            Self::FlMdfDefend,
            Self::FlDelayedCbetPlan,
            Self::FlMinReopenAdjusted,
            Self::FlRaiseSemiBluff,
            Self::FlRaiseValue,
            Self::FlCheckRange,
            Self::MixFrequencyHint,
            Self::RiverValueTierSummary,
            Self::RiverBlockerAdjust,
            Self::RiverFacingDecision,
        ]
    }
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PfOpenBet => "PF_OPEN_BET",
            Self::PfOpenRaise => "PF_OPEN_RAISE",
            Self::PfCheck => "PF_CHECK",
            Self::PfFold => "PF_FOLD",
            Self::PfCall => "PF_CALL",
            Self::PfFoldExpensive => "PF_FOLD_EXPENSIVE",
            Self::PlHeader => "PL_HEADER",
            Self::PlProbeBet => "PL_PROBE_BET",
            Self::PlCheck => "PL_CHECK",
            Self::PlCall => "PL_CALL",
            Self::PlFold => "PL_FOLD",
            Self::PlAllinOnly => "PL_ALLIN_ONLY",
            Self::PlFoldPotodds => "PL_FOLD_POTODDS",
            Self::SafeCheck => "SAFE_CHECK",
            Self::WClamped => "W_CLAMPED",
            Self::WAnalysis => "W_ANALYSIS",
            Self::CfgFallbackUsed => "CFG_FALLBACK_USED",
            Self::PfOpenRangeHit => "PF_OPEN_RANGE_HIT",
            Self::PfDefendPriceOk => "PF_DEFEND_PRICE_OK",
            Self::PfDefendPriceBad => "PF_DEFEND_PRICE_BAD",
            Self::PfDefend3bet => "PF_DEFEND_3BET",
            Self::PfDefend3betMinRaiseAdjusted => "PF_DEFEND_3BET_MIN_RAISE_ADJUSTED",
            Self::PfNoLegalRaise => "PF_NO_LEGAL_RAISE",
            Self::PfLimpCompleteBlind => "PF_LIMP_COMPLETE_BLIND",
            Self::PfAttack4bet => "PF_ATTACK_4BET",
            Self::PfAttack4betMinRaiseAdjusted => "PF_ATTACK_4BET_MIN_RAISE_ADJUSTED",
            Self::PfVsShoveCall => "PF_VS_SHOVE_CALL",
            Self::PfVsShoveFold => "PF_VS_SHOVE_FOLD",
            Self::FlDryCbetThird => "FL_DRY_CBET_THIRD",
            Self::FlLowSprValueUp => "FL_LOW_SPR_VALUE_UP",
            Self::FlRangeAdvSmallBet => "FL_RANGE_ADV_SMALL_BET",
            Self::FlNutAdvPolar => "FL_NUT_ADV_POLAR",
            Self::FlMdfDefend => "FL_MDF_DEFEND",
            Self::FlDelayedCbetPlan => "FL_DELAYED_CBET_PLAN",
            Self::FlMinReopenAdjusted => "FL_MIN_REOPEN_ADJUSTED",
            Self::FlRaiseSemiBluff => "FL_RAISE_SEMI_BLUFF",
            Self::FlRaiseValue => "FL_RAISE_VALUE",
            Self::FlCheckRange => "FL_CHECK_RANGE",
            Self::MixFrequencyHint => "MIX_FREQUENCY_HINT",
            Self::RiverValueTierSummary => "RIVER_VALUE_TIER_SUMMARY",
            Self::RiverBlockerAdjust => "RIVER_BLOCKER_ADJUST",
            Self::RiverFacingDecision => "RIVER_FACING_DECISION",
        }
    }
    pub fn severity(&self) -> Severity {
        match self {
            Self::WClamped | Self::WAnalysis | Self::CfgFallbackUsed => Severity::Warn,
            _ => Severity::Info,
        }
    }
    /// English fallback text when no template is configured.
    pub fn default_msg(&self) -> &'static str {
        match self {
            Self::PfOpenBet => "Unopened pot: open to {bb_mult}bb (bet).",
            Self::PfOpenRaise => "Unopened pot: open to {bb_mult}bb (raise).",
            Self::PfCheck => "Not in the opening range: check.",
            Self::PfFold => "No better option: fold.",
            Self::PfCall => "Facing a bet in range at an acceptable price: call.",
            Self::PfFoldExpensive => "Facing a bet out of range or too expensive: fold.",
            Self::PlHeader => "Postflop v0.3: hand tags, pot odds thresholds and minimum bets.",
            Self::PlProbeBet => "{street} checked to us: probe with the minimum bet.",
            Self::PlCheck => "Betting is unavailable or unwise: check.",
            Self::PlCall => "The price is acceptable: call.",
            Self::PlFold => "The price is too high: fold.",
            Self::PlAllinOnly => "Only all-in remains.",
            Self::PlFoldPotodds => "Facing {facing} at pot odds {pot_odds} with {hand_class}: fold.",
            Self::SafeCheck => "Unusual spot: fall back to a check.",
            Self::WClamped => "Suggested amount was outside the legal range and has been clamped.",
            Self::WAnalysis => "Hand analysis unavailable: playing conservatively.",
            Self::CfgFallbackUsed => "Configuration unavailable: built-in fallback used.",
            Self::PfOpenRangeHit => "In the opening range: open.",
            Self::PfDefendPriceOk => "The price is good enough to defend.",
            Self::PfDefendPriceBad => "The price is poor: tighten the defence.",
            Self::PfDefend3bet => "Facing a raise in range: 3-bet.",
            Self::PfDefend3betMinRaiseAdjusted => "Raised to the minimum legal re-raise.",
            Self::PfNoLegalRaise => "No legal raise: fall back to the next best action.",
            Self::PfLimpCompleteBlind => "Not an open: complete the blind cheaply.",
            Self::PfAttack4bet => "Facing a 3-bet in range: 4-bet.",
            Self::PfAttack4betMinRaiseAdjusted => "Raised to the minimum legal 4-bet.",
            Self::PfVsShoveCall => "Facing a shove with a calling hand: call.",
            Self::PfVsShoveFold => "Facing a shove without a calling hand: fold.",
            Self::FlDryCbetThird => "Dry board: continuation bet a third of the pot.",
            Self::FlLowSprValueUp => "Low SPR: size up with strong hands.",
            Self::FlRangeAdvSmallBet => "Range advantage: bet small with the range.",
            Self::FlNutAdvPolar => "Nut advantage: polarize with a larger size.",
            Self::FlMdfDefend => "Facing a bet: defend at least the minimum defence frequency.",
            Self::FlDelayedCbetPlan => "Plan: check now and bet the turn (delayed c-bet).",
            Self::FlMinReopenAdjusted => "Raised to the minimum legal re-open amount.",
            Self::FlRaiseSemiBluff => "Strong draw: semi-bluff raise.",
            Self::FlRaiseValue => "Value raise against a small bet.",
            Self::FlCheckRange => "Not in the betting range: check.",
            Self::MixFrequencyHint => "Mixed strategy sample ({frequency_pct}).",
            Self::RiverValueTierSummary => "River {river_value_tier_label}: {river_plan_text}.",
            Self::RiverBlockerAdjust => "Holding a {river_blocker_label}: {river_blocker_action}.",
            Self::RiverFacingDecision => {
                "Facing {facing_size_text} with {river_value_tier_label}: {river_facing_decision}."
            }
        }
    }
}

impl TryFrom<&str> for Code {
    type Error = String;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::all()
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("unknown code: {}", s))
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One explanation item attached to a suggestion.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Rationale {
    pub code: Code,
    pub msg: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl Rationale {
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }
}

impl From<Code> for Rationale {
    fn from(code: Code) -> Self {
        Self {
            code,
            msg: code.default_msg().to_string(),
            data: None,
        }
    }
}
impl From<(Code, Value)> for Rationale {
    fn from((code, data): (Code, Value)) -> Self {
        Self {
            data: Some(data),
            ..Self::from(code)
        }
    }
}

/// Ordered rationale list, de-duplicated on `(code, data)`.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Rationales(Vec<Rationale>);

impl Rationales {
    pub fn push(&mut self, item: impl Into<Rationale>) {
        let item = item.into();
        if !self.0.iter().any(|r| r.code == item.code && r.data == item.data) {
            self.0.push(item);
        }
    }
    pub fn extend(&mut self, items: impl IntoIterator<Item = Rationale>) {
        items.into_iter().for_each(|r| self.push(r));
    }
    /// Inserts ahead of everything already recorded.
    pub fn prepend(&mut self, items: impl IntoIterator<Item = Rationale>) {
        let mut head = Self::default();
        head.extend(items);
        head.extend(std::mem::take(&mut self.0));
        *self = head;
    }
    pub fn contains(&self, code: Code) -> bool {
        self.0.iter().any(|r| r.code == code)
    }
    pub fn count(&self, code: Code) -> usize {
        self.0.iter().filter(|r| r.code == code).count()
    }
    pub fn codes(&self) -> Vec<Code> {
        self.0.iter().map(|r| r.code).collect()
    }
    pub fn items(&self) -> &[Rationale] {
        &self.0
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl From<Vec<Rationale>> for Rationales {
    fn from(items: Vec<Rationale>) -> Self {
        let mut list = Self::default();
        list.extend(items);
        list
    }
}
impl IntoIterator for Rationales {
    type Item = Rationale;
    type IntoIter = std::vec::IntoIter<Rationale>;
    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
