use super::Line;
use super::Outcome;
use super::Rule;
use super::decide_defense;
use super::finish_postflop;
use super::first_hit;
use super::passive;
use super::super::calculators::SizeTag;
use super::super::classify::HandClass;
use super::super::codes::Code;
use super::super::codes::Rationale;
use super::super::config::PolicyConfig;
use super::super::decision::Decision;
use super::super::decision::SizeSpec;
use super::super::observation::Observation;
use super::super::river::RiverTier;
use super::super::river::apply_river_facing_adjustment;
use super::super::river::apply_river_no_bet_adjustment;
use super::super::rules::RuleNode;
use crate::cards::Street;
use crate::gameplay::Action;

fn open(line: &Line) -> bool {
    !line.spot.facing()
}

/// Value class, or strong value on the river.
fn strong(line: &Line) -> bool {
    match line.obs().river {
        Some(ref read) => read.tier == RiverTier::StrongValue || line.class().is_strong(),
        None => line.class().is_strong(),
    }
}

/// A rule node turned into a legal decision when checked to.
fn unopened(line: &Line, node: &RuleNode) -> Option<Decision> {
    match node.action {
        Some(Action::Bet | Action::Raise) => {
            let action = line.spot.betlike()?;
            Some(Decision::new(action).sized(SizeSpec::Tag(node.size_tag.unwrap_or(SizeTag::Third))))
        }
        Some(Action::Check) if line.spot.allows(Action::Check) => Some(Decision::check()),
        _ => None,
    }
}

fn river_tier(line: &Line) -> Option<Decision> {
    let read = line.obs().river.as_ref()?;
    let (node, blocker) = apply_river_no_bet_adjustment(read, &line.spot.bundle().river)?;
    let plan = node.plan.clone().unwrap_or_else(|| read.tier.default_plan().to_string());
    let path = match blocker {
        Some(b) => format!("river/tiers/{}/blockers/{}", read.tier.as_str(), b.as_str()),
        None => format!("river/tiers/{}/default", read.tier.as_str()),
    };
    let decision = unopened(line, &node)?
        .with("river_tier", read.tier.as_str())
        .with("rule_path", path)
        .plan(&plan);
    Some(match blocker {
        Some(b) => decision.with("river_blocker", b.as_str()),
        None => decision,
    })
}

fn tree(line: &Line) -> Option<Decision> {
    let node = line.node()?;
    unopened(line, node).map(|d| line.traced(d))
}

fn bet_third(line: &Line) -> Option<Decision> {
    let action = line.spot.betlike()?;
    Some(Decision::new(action).sized(SizeSpec::Tag(SizeTag::Third)))
}

fn check(line: &Line) -> Option<Decision> {
    match line.spot.allows(Action::Check) {
        true => Some(Decision::check()),
        false => None,
    }
}

fn value_raise(_: &Line) -> Option<Decision> {
    Some(Decision::raise(SizeTag::TwoThird).because(Code::FlRaiseValue))
}

fn defense(line: &Line) -> Option<Decision> {
    decide_defense(line.obs(), line.spot.cfg.mixing).filter(|d| !(d.action == Action::Fold && strong(line)))
}

fn river_facing(line: &Line) -> Option<Decision> {
    let obs = line.obs();
    let read = obs.river.as_ref()?;
    let node = apply_river_facing_adjustment(read, obs.facing_size_tag.as_str(), &line.spot.bundle().river)?;
    let decision = match node.action? {
        Action::Raise if line.spot.allows(Action::Raise) => {
            Decision::raise(node.size_tag.unwrap_or(SizeTag::TwoThird)).because(Code::FlRaiseValue)
        }
        Action::Call if line.spot.allows(Action::Call) => Decision::call(),
        Action::Fold if line.spot.allows(Action::Fold) && !strong(line) => Decision::fold(),
        _ => return None,
    };
    let plan = node.plan.clone().unwrap_or_else(|| read.tier.default_plan().to_string());
    Some(
        decision
            .with("river_tier", read.tier.as_str())
            .with("river_facing_decision", decision_name(&node))
            .plan(&plan),
    )
}

fn decision_name(node: &RuleNode) -> &'static str {
    match node.action {
        Some(action) => action.name(),
        None => "call",
    }
}

fn small_call(line: &Line) -> Option<Decision> {
    match line.obs().facing_size_tag.is_small() && line.spot.allows(Action::Call) {
        true => Some(Decision::call()),
        false => None,
    }
}

fn rules<'a>() -> [Rule<Line<'a>>; 10] {
    [
        Rule {
            name: "river_tier",
            when: |l| open(l) && l.obs().street == Street::Rive,
            then: river_tier,
        },
        Rule {
            name: "tree",
            when: open,
            then: tree,
        },
        Rule {
            name: "bet_third",
            when: open,
            then: bet_third,
        },
        Rule {
            name: "check",
            when: open,
            then: check,
        },
        Rule {
            name: "value_raise",
            when: |l| {
                let valuable = l.class() == HandClass::Value || l.obs().river_tier() == RiverTier::StrongValue;
                l.spot.cfg.flags.value_raise
                    && valuable
                    && l.obs().facing_size_tag.is_small()
                    && l.spot.allows(Action::Raise)
            },
            then: value_raise,
        },
        Rule {
            name: "defense",
            when: |l| l.spot.facing(),
            then: defense,
        },
        Rule {
            name: "river_facing",
            when: |l| l.spot.facing() && l.obs().street == Street::Rive,
            then: river_facing,
        },
        Rule {
            name: "small_call",
            when: |l| l.spot.facing(),
            then: small_call,
        },
        Rule {
            name: "passive",
            when: |_| true,
            then: |l| passive(&l.spot),
        },
        Rule {
            name: "allin",
            when: |l| l.spot.allows(Action::Allin),
            then: |_| Some(Decision::allin()),
        },
    ]
}

fn run(obs: &Observation, cfg: &PolicyConfig, policy: &'static str) -> anyhow::Result<Outcome> {
    if obs.acts.is_empty() {
        return Err(anyhow::anyhow!("no legal actions"));
    }
    let ref line = Line::new(obs, cfg, true);
    let decision = first_hit(&rules(), line)
        .ok_or_else(|| anyhow::anyhow!("no safe {} suggestion for {}", obs.street, obs.hand_id))?;
    let mut decision = finish_postflop(obs, decision);
    let tree = obs.context.rules(obs.street);
    if let Some(version) = tree.get("version") {
        decision.meta.insert("rules_ver".into(), version.clone());
    }
    if tree.get(obs.pot_type.as_str()).is_none() {
        decision.rationale.prepend([Rationale::from(Code::CfgFallbackUsed)]);
    }
    Ok(Outcome::Decided { decision, policy })
}

/// Turn policy: the turn rule tree when checked to, value raises and the
/// defence table when facing a bet.
pub fn policy_turn_v1(obs: &Observation, cfg: &PolicyConfig) -> anyhow::Result<Outcome> {
    run(obs, cfg, "turn_v1")
}

/// River policy.
///
/// Checked to, the value tier picks the line and a held blocker may
/// override it. Facing a bet the defence table reads the tier, and the
/// tier's facing map answers what the table leaves open.
pub fn policy_river_v1(obs: &Observation, cfg: &PolicyConfig) -> anyhow::Result<Outcome> {
    run(obs, cfg, "river_v1")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advisor::calculators::Facing;
    use crate::advisor::config::Strategy;
    use crate::advisor::profile::Bundle;
    use crate::advisor::river::RiverRead;
    use crate::cards::Bitwise;
    use crate::cards::Card;
    use crate::gameplay::HandState;
    use crate::gameplay::LegalAction;
    use crate::gameplay::SessionConfig;
    use serde_json::Value;
    use serde_json::json;
    use std::sync::Arc;

    /// limped and checked down to `street`; the big blind holds `hero`
    fn checked_to(hero: &str, board: &str, street: Street) -> HandState {
        let mut state = HandState::start(&SessionConfig::default(), "s", "hpl", 0, Some(5))
            .unwrap()
            .with_cards([Card::parse("7c6d").unwrap(), Card::parse(hero).unwrap()], Card::parse(board).unwrap())
            .try_apply(Action::Call, None)
            .and_then(|s| s.try_apply(Action::Check, None))
            .unwrap();
        while state.street() != Some(street) {
            state = state
                .try_apply(Action::Check, None)
                .and_then(|s| s.try_apply(Action::Check, None))
                .unwrap();
        }
        state
    }

    fn observe(state: &HandState, bundle: Bundle) -> Observation {
        Observation::build(state, state.to_act(), &state.legal(), Arc::new(bundle), &Bitwise).0
    }

    fn decide(obs: &Observation) -> Decision {
        let policy = match obs.street {
            Street::Rive => policy_river_v1,
            _ => policy_turn_v1,
        };
        match policy(obs, &PolicyConfig::default()).unwrap() {
            Outcome::Decided { decision, .. } => decision,
            Outcome::Output(_) => panic!("turn and river v1 return decisions"),
        }
    }

    fn builtin() -> Bundle {
        Bundle::builtin(Strategy::Medium)
    }

    /// facing `to_call` into `pot_now` on `street`
    fn facing(street: Street, to_call: i32, pot_now: i32, bundle: Bundle) -> Observation {
        let state = checked_to("As8d", "Ks8s5s3h2c", street);
        let mut obs = observe(&state, bundle);
        obs.pot_now = pot_now;
        obs.facing_size_tag = Facing::classify(to_call, pot_now, 0.45, 0.75);
        obs.with_acts(vec![
            LegalAction::fold(),
            LegalAction::call(to_call),
            LegalAction::raise(to_call * 2, 196),
            LegalAction::allin(196),
        ])
    }

    /// the tree stops at the first leaf on its path
    #[test]
    fn turn_tree_early_stop() {
        let mut bundle = builtin();
        bundle.turn = json!({"version": 7, "limped": {"action": "bet", "size_tag": "half", "plan": "stab"}});
        let state = checked_to("As8d", "Ks8s5s3h2c", Street::Turn);
        let d = decide(&observe(&state, bundle));
        assert_eq!(d.action, Action::Bet);
        assert_eq!(d.size_tag(), Some(SizeTag::Half));
        assert_eq!(d.meta["rule_path"], "limped");
        assert_eq!(d.meta["plan"], "stab");
        assert_eq!(d.meta["rules_ver"], 7);
    }

    /// without a tree the turn bets a third and flags the fallback
    #[test]
    fn turn_without_tree() {
        let mut bundle = builtin();
        bundle.turn = Value::Null;
        let state = checked_to("As8d", "Ks8s5s3h2c", Street::Turn);
        let d = decide(&observe(&state, bundle));
        assert_eq!(d.meta["rule"], "bet_third");
        assert_eq!(d.size_tag(), Some(SizeTag::Third));
        assert!(d.rationale.contains(Code::CfgFallbackUsed));
    }

    /// a held nut flush blocker turns a medium hand into thin value
    #[test]
    fn river_blocker_override() {
        let state = checked_to("As8d", "Ks8s5s3h2c", Street::Rive);
        let d = decide(&observe(&state, builtin()));
        assert_eq!(d.action, Action::Bet);
        assert_eq!(d.size_tag(), Some(SizeTag::Third));
        assert_eq!(d.meta["river_tier"], "medium_value");
        assert_eq!(d.meta["river_blocker"], "nut_flush_blocker");
        assert_eq!(d.meta["rule"], "river_tier");
    }

    /// without a blocker the tier default checks
    #[test]
    fn river_tier_default() {
        let state = checked_to("Qh8d", "Ks8s5s3h2c", Street::Rive);
        let d = decide(&observe(&state, builtin()));
        assert_eq!(d.action, Action::Check);
        assert_eq!(d.meta["plan"], "Control the pot and keep showdown value.");
    }

    /// value raises small turn bets
    #[test]
    fn turn_value_raise() {
        let mut obs = facing(Street::Turn, 3, 10, builtin());
        obs.hand_class = HandClass::Value;
        let d = decide(&obs);
        assert_eq!(d.action, Action::Raise);
        assert!(d.rationale.contains(Code::FlRaiseValue));
        assert_eq!(d.rationale.codes()[0], Code::FlMdfDefend);
    }

    /// river defence reads the tier
    #[test]
    fn river_defense_by_tier() {
        let mut obs = facing(Street::Rive, 8, 10, builtin());
        obs.river = Some(RiverRead {
            tier: RiverTier::Air,
            blockers: vec![],
        });
        let d = decide(&obs);
        assert_eq!(d.action, Action::Fold);
        assert_eq!(d.meta["source"], "defense");
        obs.river = Some(RiverRead {
            tier: RiverTier::StrongValue,
            blockers: vec![],
        });
        assert_eq!(decide(&obs).action, Action::Call);
    }

    /// the tier's facing map answers when the table is silent
    #[test]
    fn river_facing_map() {
        let mut bundle = builtin();
        bundle.defense = Value::Null;
        let d = decide(&facing(Street::Rive, 5, 10, bundle));
        assert_eq!(d.action, Action::Call);
        assert_eq!(d.meta["rule"], "river_facing");
        assert_eq!(d.meta["river_facing_decision"], "call");
    }
}
