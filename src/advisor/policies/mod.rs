//! Street policies.
//!
//! Each v1 policy is an ordered table of [`Rule`]s over a [`Spot`]. The first
//! rule whose guard holds and whose body yields a [`Decision`] wins, and its
//! name is recorded under `rule`. Legacy v0 policies and the conservative
//! fallback price their own actions and return a [`PolicyOutput`].

pub mod defense;
pub use defense::*;

pub mod fallback;
pub use fallback::*;

pub mod flop;
pub use flop::*;

pub mod legacy;
pub use legacy::*;

pub mod postflop;
pub use postflop::*;

pub mod preflop;
pub use preflop::*;

use super::calculators::mdf;
use super::classify::HandClass;
use super::classify::PotType;
use super::codes::Code;
use super::codes::Rationale;
use super::codes::Rationales;
use super::config::PolicyConfig;
use super::decision::Decision;
use super::decision::Suggested;
use super::observation::Observation;
use super::profile::Bundle;
use super::rules::Match;
use super::rules::RuleNode;
use super::rules::lookup;
use crate::gameplay::Action;
use crate::gameplay::Legal;
use serde_json::Map;
use serde_json::Value;
use serde_json::json;

/// A policy that has already priced its action.
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyOutput {
    pub suggested: Suggested,
    pub rationale: Rationales,
    pub policy: String,
    pub meta: Map<String, Value>,
}

/// What a policy hands back to the orchestrator.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Output(PolicyOutput),
    Decided { decision: Decision, policy: &'static str },
}

impl Outcome {
    pub fn policy(&self) -> &str {
        match self {
            Self::Output(output) => output.policy.as_str(),
            Self::Decided { policy, .. } => policy,
        }
    }
}

/// Signature shared by every street policy.
pub type Policy = fn(&Observation, &PolicyConfig) -> anyhow::Result<Outcome>;

/// The decision point a rule reads.
#[derive(Debug, Clone, Copy)]
pub struct Spot<'a> {
    pub obs: &'a Observation,
    pub cfg: &'a PolicyConfig,
}

impl<'a> Spot<'a> {
    pub fn new(obs: &'a Observation, cfg: &'a PolicyConfig) -> Self {
        Self { obs, cfg }
    }
    pub fn bundle(&self) -> &'a Bundle {
        &self.obs.context
    }
    pub fn allows(&self, action: Action) -> bool {
        self.obs.acts.allows(action)
    }
    /// `bet` when open, `raise` otherwise.
    pub fn betlike(&self) -> Option<Action> {
        [Action::Bet, Action::Raise].into_iter().find(|a| self.allows(*a))
    }
    pub fn facing(&self) -> bool {
        self.obs.is_facing()
    }
    pub fn price(&self) -> f64 {
        self.obs.pot_odds()
    }
    pub fn combo(&self) -> Option<&'a str> {
        self.obs.combo.as_deref()
    }
}

/// Rule-tree keys for a postflop spot:
/// `pot_type / "role" / role / ip|oop / texture / spr / hand_class`.
/// Limped pots have no raiser and read the `na` role.
pub fn rule_keys(obs: &Observation) -> [&'static str; 7] {
    let role = match obs.pot_type {
        PotType::Limped => "na",
        _ => obs.role.as_str(),
    };
    [
        obs.pot_type.as_str(),
        "role",
        role,
        if obs.ip { "ip" } else { "oop" },
        obs.board_texture.as_str(),
        obs.spr_bucket.rule_key(),
        obs.hand_class.as_str(),
    ]
}

/// A postflop spot together with its rule-tree match.
#[derive(Debug, Clone)]
pub struct Line<'a> {
    pub spot: Spot<'a>,
    pub hit: Option<Match>,
}

impl<'a> Line<'a> {
    pub fn new(obs: &'a Observation, cfg: &'a PolicyConfig, early_stop: bool) -> Self {
        let hit = lookup(obs.context.rules(obs.street), &rule_keys(obs), early_stop);
        Self {
            spot: Spot::new(obs, cfg),
            hit,
        }
    }
    pub fn obs(&self) -> &'a Observation {
        self.spot.obs
    }
    pub fn class(&self) -> HandClass {
        self.spot.obs.hand_class
    }
    pub fn node(&self) -> Option<&RuleNode> {
        self.hit.as_ref().map(|m| &m.node)
    }
    /// Stamps the matched node's plan and path onto a decision.
    pub fn traced(&self, decision: Decision) -> Decision {
        match &self.hit {
            Some(hit) => {
                let decision = decision.with("rule_path", hit.path());
                match (&hit.node.plan, decision.meta.contains_key("plan")) {
                    (Some(plan), false) => decision.plan(plan),
                    _ => decision,
                }
            }
            None => decision,
        }
    }
}

/// One step of a decision ladder.
pub struct Rule<C> {
    pub name: &'static str,
    pub when: fn(&C) -> bool,
    pub then: fn(&C) -> Option<Decision>,
}

/// First rule that fires, with its name recorded in the meta.
pub fn first_hit<C>(rules: &[Rule<C>], ctx: &C) -> Option<Decision> {
    rules
        .iter()
        .filter(|rule| (rule.when)(ctx))
        .find_map(|rule| (rule.then)(ctx).map(|d| (rule.name, d)))
        .map(|(name, mut decision)| {
            log::trace!("rule {} -> {}", name, decision.action);
            decision.meta.insert("rule".into(), json!(name));
            decision.meta.entry("rule_path").or_insert_with(|| json!(name));
            decision
        })
}

/// Passive tail shared by every ladder.
pub fn passive(spot: &Spot) -> Option<Decision> {
    [Action::Call, Action::Fold, Action::Check]
        .into_iter()
        .find(|a| spot.allows(*a))
        .map(Decision::new)
}

/// Teaching fields every postflop decision carries unless a rule set them.
pub(crate) fn postflop_meta(obs: &Observation) -> Map<String, Value> {
    let mut meta = Map::new();
    meta.insert("role".into(), json!(obs.role.as_str()));
    meta.insert("texture".into(), json!(obs.board_texture.as_str()));
    meta.insert("spr_bucket".into(), json!(obs.spr_bucket.rule_key()));
    meta.insert("mdf".into(), json!(round4(mdf(obs.to_call, obs.pot_now))));
    meta.insert("pot_odds".into(), json!(round4(obs.pot_odds())));
    meta.insert("facing_size_tag".into(), json!(obs.facing_size_tag.as_str()));
    meta.insert("range_adv".into(), json!(obs.range_adv));
    meta.insert("nut_adv".into(), json!(obs.nut_adv));
    meta
}

/// Finishes a postflop ladder: teaching meta and the MDF item when facing.
pub(crate) fn finish_postflop(obs: &Observation, mut decision: Decision) -> Decision {
    for (key, value) in postflop_meta(obs) {
        decision.meta.entry(key).or_insert(value);
    }
    if obs.is_facing() {
        decision.rationale.prepend([Rationale::from((
            Code::FlMdfDefend,
            json!({
                "mdf": round4(mdf(obs.to_call, obs.pot_now)),
                "pot_odds": round4(obs.pot_odds()),
                "facing": obs.facing_size_tag.as_str(),
            }),
        ))]);
    }
    decision
}

pub(crate) fn round4(x: f64) -> f64 {
    (x * 1e4).round() / 1e4
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advisor::config::Strategy;
    use crate::cards::Bitwise;
    use crate::gameplay::HandState;
    use crate::gameplay::SessionConfig;
    use std::sync::Arc;

    fn spot_obs() -> Observation {
        let state = HandState::start(&SessionConfig::default(), "s", "h", 0, Some(2)).unwrap();
        let bundle = Arc::new(Bundle::builtin(Strategy::Medium));
        Observation::build(&state, 0, &state.legal(), bundle, &Bitwise).0
    }

    /// the first firing rule wins and names itself
    #[test]
    fn ladder_order() {
        let rules: [Rule<u8>; 3] = [
            Rule {
                name: "guarded",
                when: |n| *n > 10,
                then: |_| Some(Decision::fold()),
            },
            Rule {
                name: "declines",
                when: |_| true,
                then: |_| None,
            },
            Rule {
                name: "fires",
                when: |_| true,
                then: |_| Some(Decision::check()),
            },
        ];
        let hit = first_hit(&rules, &3).unwrap();
        assert_eq!(hit.action, Action::Check);
        assert_eq!(hit.meta["rule"], "fires");
        assert_eq!(hit.meta["rule_path"], "fires");
        assert_eq!(first_hit(&rules, &11).unwrap().action, Action::Fold);
        assert!(first_hit(&rules[..2], &3).is_none());
    }

    /// spots expose the legal set and price
    #[test]
    fn spot_helpers() {
        let obs = spot_obs();
        let cfg = PolicyConfig::default();
        let spot = Spot::new(&obs, &cfg);
        assert_eq!(spot.betlike(), Some(Action::Raise));
        assert!(spot.facing());
        assert!((spot.price() - 0.25).abs() < 1e-9);
        assert_eq!(passive(&spot).unwrap().action, Action::Call);
    }
}
