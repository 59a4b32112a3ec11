use super::calculators::SizeTag;
use super::calculators::raise_to_amount;
use super::calculators::size_from_bb;
use super::calculators::size_to_amount;
use super::codes::Code;
use super::codes::Rationale;
use super::codes::Rationales;
use super::observation::Observation;
use crate::Chips;
use crate::gameplay::Action;
use crate::gameplay::Legal;
use crate::gameplay::LegalAction;
use serde_json::Map;
use serde_json::Value;
use serde_json::json;

/// How a policy expresses the size of a bet or raise before it is resolved
/// against the live pot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SizeSpec {
    /// multiple of the big blind
    Bb(f64),
    /// share of the pot
    Tag(SizeTag),
    /// exact chips
    Amount(Chips),
}

/// The concrete action handed back to the caller.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Suggested {
    pub action: Action,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Chips>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_tag: Option<SizeTag>,
}

impl From<Action> for Suggested {
    fn from(action: Action) -> Self {
        Self {
            action,
            amount: None,
            size_tag: None,
        }
    }
}

impl std::fmt::Display for Suggested {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self.amount {
            Some(amount) => write!(f, "{} {}", self.action, amount),
            None => write!(f, "{}", self.action),
        }
    }
}

/// An abstract decision from a street policy.
///
/// Sizes stay symbolic until [`Decision::resolve`] prices them against an
/// observation.
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub action: Action,
    pub size: Option<SizeSpec>,
    pub meta: Map<String, Value>,
    pub rationale: Rationales,
    /// code appended when a raise is lifted to the legal minimum
    pub min_reopen_code: Option<Code>,
}

/// Construction.
impl Decision {
    pub fn new(action: Action) -> Self {
        Self {
            action,
            size: None,
            meta: Map::new(),
            rationale: Rationales::default(),
            min_reopen_code: None,
        }
    }
    pub fn fold() -> Self {
        Self::new(Action::Fold)
    }
    pub fn check() -> Self {
        Self::new(Action::Check)
    }
    pub fn call() -> Self {
        Self::new(Action::Call)
    }
    pub fn allin() -> Self {
        Self::new(Action::Allin)
    }
    pub fn bet(tag: SizeTag) -> Self {
        Self::new(Action::Bet).sized(SizeSpec::Tag(tag))
    }
    pub fn raise(tag: SizeTag) -> Self {
        Self::new(Action::Raise).sized(SizeSpec::Tag(tag))
    }
    pub fn sized(mut self, size: SizeSpec) -> Self {
        if let SizeSpec::Tag(tag) = size {
            self.meta.insert("size_tag".into(), json!(tag.as_str()));
        }
        self.size = Some(size);
        self
    }
    pub fn because(mut self, item: impl Into<Rationale>) -> Self {
        self.rationale.push(item);
        self
    }
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.meta.insert(key.to_string(), value.into());
        self
    }
    pub fn plan(self, plan: &str) -> Self {
        self.with("plan", plan)
    }
    pub fn reopen(mut self, code: Code) -> Self {
        self.min_reopen_code = Some(code);
        self
    }
    pub fn size_tag(&self) -> Option<SizeTag> {
        match self.size {
            Some(SizeSpec::Tag(tag)) => Some(tag),
            _ => None,
        }
    }
}

/// Resolution.
impl Decision {
    /// Prices the decision against the observation's pot and legal set.
    ///
    /// Raises that fall short of the legal minimum are lifted to it and
    /// tagged with the reopen code. All-ins take the stack.
    pub fn resolve(&self, obs: &Observation, acts: &[LegalAction]) -> (Suggested, Map<String, Value>, Rationales) {
        let mut rationale = self.rationale.clone();
        let meta = self.meta.clone();
        let legal = acts.find(self.action);
        let amount = match (self.action, self.size) {
            (Action::Allin, _) => legal.and_then(|a| a.max),
            (Action::Bet | Action::Raise, Some(SizeSpec::Bb(mult))) => Some(size_from_bb(mult, obs.bb)),
            (Action::Bet | Action::Raise, Some(SizeSpec::Amount(chips))) => Some(chips),
            (Action::Raise, Some(SizeSpec::Tag(tag))) => raise_to_amount(
                obs.pot_now,
                obs.last_bet,
                tag,
                obs.bb,
                None,
                Some(obs.context.modes.postflop_cap_ratio),
            )
            .or_else(|| legal.and_then(|a| a.max)),
            (Action::Bet, Some(SizeSpec::Tag(tag))) => {
                Some(size_to_amount(obs.pot_now, obs.context.fraction(tag)).max(obs.bb))
            }
            (Action::Bet | Action::Raise, None) => legal.and_then(|a| a.min),
            _ => None,
        };
        let amount = match (self.action, amount, legal.and_then(|a| a.min)) {
            (Action::Raise, Some(chips), Some(min)) if chips < min => {
                rationale.push((
                    self.min_reopen_code.unwrap_or(Code::FlMinReopenAdjusted),
                    json!({ "given": chips, "min": min }),
                ));
                Some(min)
            }
            _ => amount,
        };
        let suggested = Suggested {
            action: self.action,
            amount,
            size_tag: self.size_tag(),
        };
        (suggested, meta, rationale)
    }
}

/// Fits a sized suggestion into its legal `[min, max]`.
///
/// Returns the adjusted suggestion, whether it moved, and the
/// `{min, max, given, chosen}` record when it did. When `min > max` the
/// maximum wins.
pub fn clamp_amount(suggested: Suggested, acts: &[LegalAction]) -> (Suggested, bool, Option<Value>) {
    let bounds = acts.find(suggested.action).and_then(|a| a.min.zip(a.max));
    match (suggested.amount, bounds) {
        (Some(given), Some((min, max))) => {
            let chosen = match min > max {
                true => max,
                false => given.clamp(min, max),
            };
            match chosen != given || min > max {
                false => (suggested, false, None),
                true => (
                    Suggested {
                        amount: Some(chosen),
                        ..suggested
                    },
                    true,
                    Some(json!({ "min": min, "max": max, "given": given, "chosen": chosen })),
                ),
            }
        }
        _ => (suggested, false, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advisor::config::Strategy;
    use crate::advisor::profile::Bundle;
    use crate::cards::Bitwise;
    use crate::cards::Card;
    use crate::gameplay::HandState;
    use crate::gameplay::SessionConfig;
    use std::sync::Arc;

    fn flop_after_raise() -> (Observation, Vec<LegalAction>) {
        let state = HandState::start(&SessionConfig::default(), "s", "h", 0, Some(5))
            .unwrap()
            .with_cards(
                [Card::parse("AhKd").unwrap(), Card::parse("QcJc").unwrap()],
                Card::parse("Ks8d3c5h9s").unwrap(),
            )
            .try_apply(Action::Raise, Some(6))
            .unwrap()
            .try_apply(Action::Call, None)
            .unwrap();
        let acts = state.legal();
        let bundle = Arc::new(Bundle::builtin(Strategy::Medium));
        let (obs, _) = Observation::build(&state, state.to_act(), &acts, bundle, &Bitwise);
        (obs, acts)
    }

    /// bet tags price against pot_now and never drop below the blind
    #[test]
    fn bet_by_tag() {
        let (obs, acts) = flop_after_raise();
        let (s, meta, _) = Decision::bet(SizeTag::Half).resolve(&obs, &acts);
        assert_eq!(s.action, Action::Bet);
        assert_eq!(s.amount, Some(6));
        assert_eq!(s.size_tag, Some(SizeTag::Half));
        assert_eq!(meta["size_tag"], "half");
        let (s, _, _) = Decision::bet(SizeTag::Third).resolve(&obs, &acts);
        assert_eq!(s.amount, Some(4));
    }

    /// blind multiples and exact amounts pass through
    #[test]
    fn bet_by_bb_and_amount() {
        let (obs, acts) = flop_after_raise();
        let (s, _, _) = Decision::new(Action::Bet).sized(SizeSpec::Bb(2.5)).resolve(&obs, &acts);
        assert_eq!(s.amount, Some(5));
        let (s, _, _) = Decision::new(Action::Bet).sized(SizeSpec::Amount(33)).resolve(&obs, &acts);
        assert_eq!(s.amount, Some(33));
        assert_eq!(s.size_tag, None);
    }

    /// a short raise is lifted once and tagged with its code
    #[test]
    fn raise_lifted_to_min() {
        let (obs, _) = flop_after_raise();
        let acts = vec![LegalAction::fold(), LegalAction::call(10), LegalAction::raise(40, 194)];
        let (s, _, r) = Decision::raise(SizeTag::Third)
            .reopen(Code::PfDefend3betMinRaiseAdjusted)
            .resolve(&obs, &acts);
        assert_eq!(s.amount, Some(40));
        assert_eq!(r.count(Code::PfDefend3betMinRaiseAdjusted), 1);
        assert!(!r.contains(Code::FlMinReopenAdjusted));
        let (_, _, r) = Decision::raise(SizeTag::Third).resolve(&obs, &acts);
        assert!(r.contains(Code::FlMinReopenAdjusted));
    }

    /// all-in takes the stack and passive actions carry no amount
    #[test]
    fn allin_and_passive() {
        let (obs, acts) = flop_after_raise();
        let (s, _, _) = Decision::allin().resolve(&obs, &acts);
        assert_eq!(s.amount, Some(194));
        let (s, _, r) = Decision::check().because(Code::FlCheckRange).resolve(&obs, &acts);
        assert_eq!(s, Suggested::from(Action::Check));
        assert_eq!(r.codes(), vec![Code::FlCheckRange]);
    }

    /// clamping moves out-of-range amounts once and is idempotent
    #[test]
    fn clamp_idempotent() {
        let acts = vec![LegalAction::check(), LegalAction::bet(2, 100)];
        let big = Suggested {
            action: Action::Bet,
            amount: Some(150),
            size_tag: None,
        };
        let (once, clamped, data) = clamp_amount(big, &acts);
        assert!(clamped);
        assert_eq!(once.amount, Some(100));
        assert_eq!(data.unwrap()["given"], 150);
        let (twice, clamped, data) = clamp_amount(once, &acts);
        assert!(!clamped && data.is_none());
        assert_eq!(twice, once);
        let inside = Suggested { amount: Some(50), ..big };
        assert!(!clamp_amount(inside, &acts).1);
    }

    /// inverted bounds pick the maximum
    #[test]
    fn clamp_inverted() {
        let acts = vec![LegalAction::raise(60, 40)];
        let s = Suggested {
            action: Action::Raise,
            amount: Some(50),
            size_tag: None,
        };
        let (s, clamped, _) = clamp_amount(s, &acts);
        assert!(clamped);
        assert_eq!(s.amount, Some(40));
    }
}
