use super::Line;
use super::Outcome;
use super::Rule;
use super::decide_defense;
use super::finish_postflop;
use super::first_hit;
use super::passive;
use super::super::calculators::Facing;
use super::super::calculators::SizeTag;
use super::super::classify::HandClass;
use super::super::classify::PotType;
use super::super::classify::Role;
use super::super::classify::SprBucket;
use super::super::classify::Texture;
use super::super::codes::Code;
use super::super::codes::Rationale;
use super::super::config::PolicyConfig;
use super::super::decision::Decision;
use super::super::decision::SizeSpec;
use super::super::observation::Observation;
use crate::gameplay::Action;
use serde_json::json;

fn open(line: &Line) -> bool {
    !line.spot.facing()
}

fn small(line: &Line) -> bool {
    line.obs().facing_size_tag.is_small() && line.spot.allows(Action::Raise)
}

/// Code for a c-bet of this size from this spot.
fn cbet_code(obs: &Observation, tag: SizeTag) -> Code {
    match tag {
        SizeTag::Third if obs.range_adv => Code::FlRangeAdvSmallBet,
        SizeTag::TwoThird | SizeTag::Pot if obs.nut_adv => Code::FlNutAdvPolar,
        _ => Code::FlDryCbetThird,
    }
}

fn tree_bet(line: &Line) -> Option<Decision> {
    let node = line.node().filter(|n| n.is_betlike())?;
    let action = line.spot.betlike()?;
    let obs = line.obs();
    let tag = node.size_tag.unwrap_or(SizeTag::Third);
    let mut decision = Decision::new(action)
        .sized(SizeSpec::Tag(tag))
        .because(cbet_code(obs, tag));
    let big = matches!(tag, SizeTag::TwoThird | SizeTag::Pot);
    let valuable = matches!(obs.hand_class, HandClass::Value | HandClass::OverpairOrTopPairStrong);
    if obs.spr_bucket == SprBucket::Low && big && valuable {
        decision = decision.because(Code::FlLowSprValueUp);
    }
    Some(line.traced(decision))
}

fn tree_check(line: &Line) -> Option<Decision> {
    line.node().filter(|n| n.action == Some(Action::Check))?;
    match line.spot.allows(Action::Check) {
        true => Some(line.traced(Decision::check().because(Code::FlDelayedCbetPlan))),
        false => None,
    }
}

fn dry_third(line: &Line) -> Option<Decision> {
    let action = line.spot.betlike()?;
    Some(
        Decision::new(action)
            .sized(SizeSpec::Tag(SizeTag::Third))
            .because(Code::FlRangeAdvSmallBet),
    )
}

fn check_range(line: &Line) -> Option<Decision> {
    match line.spot.allows(Action::Check) {
        true => Some(Decision::check().because(Code::FlCheckRange)),
        false => None,
    }
}

/// The value node's own answer to this bet size.
fn facing_map(line: &Line) -> Option<Decision> {
    let hit = line.hit.as_ref()?;
    let fst = line.obs().facing_size_tag;
    let keys = [Some(fst.as_str()), fst.alias()].into_iter().flatten().collect::<Vec<_>>();
    let (key, node) = keys
        .iter()
        .find_map(|k| hit.node.facing(&[*k]).map(|n| (*k, n)))?;
    let decision = match node.action? {
        Action::Raise if line.spot.allows(Action::Raise) => {
            Decision::raise(node.size_tag.unwrap_or(SizeTag::Half)).because(Code::FlRaiseValue)
        }
        Action::Call if line.spot.allows(Action::Call) => Decision::call(),
        Action::Fold if line.spot.allows(Action::Fold) => Decision::fold(),
        _ => return None,
    };
    let decision = decision.with("rule_path", format!("{}/facing.{}", hit.path(), key));
    Some(match node.plan {
        Some(ref plan) => decision.plan(plan),
        None => decision,
    })
}

fn value_raise(_: &Line) -> Option<Decision> {
    Some(Decision::raise(SizeTag::TwoThird).because(Code::FlRaiseValue))
}

fn semi_bluff(_: &Line) -> Option<Decision> {
    Some(Decision::raise(SizeTag::Half).because(Code::FlRaiseSemiBluff))
}

fn low_spr_value(_: &Line) -> Option<Decision> {
    Some(
        Decision::raise(SizeTag::TwoThird)
            .because(Code::FlRaiseValue)
            .plan("Low SPR: raise strong top pair against a small bet."),
    )
}

fn nut_raise(line: &Line) -> Option<Decision> {
    let code = match line.class() {
        HandClass::Value => Code::FlRaiseValue,
        _ => Code::FlRaiseSemiBluff,
    };
    Some(
        Decision::raise(SizeTag::TwoThird)
            .because(code)
            .plan("Small and half bets get called, two thirds and more get raised."),
    )
}

/// Table-driven defence, except that strong classes are never folded.
fn defense(line: &Line) -> Option<Decision> {
    decide_defense(line.obs(), line.spot.cfg.mixing).filter(|d| !(d.action == Action::Fold && line.class().is_strong()))
}

fn fold_potodds(line: &Line) -> Option<Decision> {
    let obs = line.obs();
    let price = line.spot.price();
    match price > 0.40 {
        true => Some(Decision::fold().because((
            Code::PlFoldPotodds,
            json!({
                "facing": obs.facing_size_tag.as_str(),
                "pot_odds": (price * 1e3).round() / 1e3,
                "hand_class": obs.hand_class.as_str(),
            }),
        ))),
        false => None,
    }
}

fn rules<'a>() -> [Rule<Line<'a>>; 12] {
    [
        Rule {
            name: "tree_bet",
            when: open,
            then: tree_bet,
        },
        Rule {
            name: "tree_check",
            when: open,
            then: tree_check,
        },
        Rule {
            name: "pfr_dry_third",
            when: |l| open(l) && l.obs().role == Role::Pfr && l.obs().board_texture == Texture::Dry,
            then: dry_third,
        },
        Rule {
            name: "check_range",
            when: open,
            then: check_range,
        },
        Rule {
            name: "facing_map",
            when: |l| {
                l.spot.facing()
                    && l.spot.cfg.flags.flop_value_raise
                    && l.class() == HandClass::Value
                    && l.obs().facing_size_tag != Facing::Na
            },
            then: facing_map,
        },
        Rule {
            name: "value_raise",
            when: |l| l.spot.cfg.flags.value_raise && l.class() == HandClass::Value && small(l),
            then: value_raise,
        },
        Rule {
            name: "semi_bluff",
            when: |l| l.obs().pot_type == PotType::Threebet && l.class() == HandClass::StrongDraw && small(l),
            then: semi_bluff,
        },
        Rule {
            name: "low_spr_value",
            when: |l| {
                l.spot.cfg.flags.flop_value_raise_le3
                    && l.obs().spr_bucket == SprBucket::Low
                    && l.class() == HandClass::OverpairOrTopPairStrong
                    && small(l)
            },
            then: low_spr_value,
        },
        Rule {
            name: "nut_adv_raise",
            when: |l| {
                l.obs().facing_size_tag == Facing::TwoThirdPlus
                    && l.obs().nut_adv
                    && matches!(l.class(), HandClass::Value | HandClass::StrongDraw)
                    && l.spot.allows(Action::Raise)
            },
            then: nut_raise,
        },
        Rule {
            name: "defense",
            when: |l| l.spot.facing(),
            then: defense,
        },
        Rule {
            name: "fold_potodds",
            when: |l| {
                l.obs().facing_size_tag == Facing::TwoThirdPlus
                    && !l.class().is_strong()
                    && !l.obs().nut_adv
                    && l.spot.allows(Action::Fold)
            },
            then: fold_potodds,
        },
        Rule {
            name: "passive",
            when: |_| true,
            then: |l| passive(&l.spot),
        },
    ]
}

/// Flop policy driven by the flop rule tree.
///
/// Checked to, the tree decides between a sized c-bet and a check; with no
/// matching node the raiser bets a third on dry boards and everyone else
/// checks. Facing a bet the ladder tries value and semi-bluff raises, then
/// the defence table, then a pot-odds fold for weak hands.
pub fn policy_flop_v1(obs: &Observation, cfg: &PolicyConfig) -> anyhow::Result<Outcome> {
    if obs.acts.is_empty() {
        return Err(anyhow::anyhow!("no legal actions"));
    }
    let ref line = Line::new(obs, cfg, false);
    let decision = first_hit(&rules(), line)
        .ok_or_else(|| anyhow::anyhow!("no safe flop suggestion for {}", obs.hand_id))?;
    let mut decision = finish_postflop(obs, decision);
    if let Some(version) = obs.context.flop.get("version") {
        decision.meta.insert("rules_ver".into(), version.clone());
    }
    if obs.context.flop.get(obs.pot_type.as_str()).is_none() {
        decision.rationale.prepend([Rationale::from(Code::CfgFallbackUsed)]);
    }
    Ok(Outcome::Decided {
        decision,
        policy: "flop_v1",
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advisor::config::Strategy;
    use crate::advisor::profile::Bundle;
    use crate::cards::Bitwise;
    use crate::cards::Card;
    use crate::gameplay::HandState;
    use crate::gameplay::LegalAction;
    use crate::gameplay::SessionConfig;
    use serde_json::Value;
    use std::sync::Arc;

    /// button raised preflop and the big blind called; big blind to act on Ks8d3c
    fn flop(hero: &str, villain: &str) -> HandState {
        HandState::start(&SessionConfig::default(), "s", "hfl", 0, Some(3))
            .unwrap()
            .with_cards([Card::parse(hero).unwrap(), Card::parse(villain).unwrap()], Card::parse("Ks8d3c5h9s").unwrap())
            .try_apply(Action::Raise, Some(5))
            .and_then(|s| s.try_apply(Action::Call, None))
            .unwrap()
    }

    fn observe(state: &HandState, bundle: Bundle) -> Observation {
        Observation::build(state, state.to_act(), &state.legal(), Arc::new(bundle), &Bitwise).0
    }

    fn decide(obs: &Observation) -> Decision {
        match policy_flop_v1(obs, &PolicyConfig::default()).unwrap() {
            Outcome::Decided { decision, .. } => decision,
            Outcome::Output(_) => panic!("flop v1 returns decisions"),
        }
    }

    fn builtin() -> Bundle {
        Bundle::builtin(Strategy::Medium)
    }

    /// single-raised tree where every key falls through to `leaf`
    fn deep(leaf: Value) -> Value {
        let tree = (0..6).fold(leaf, |node, _| json!({ "defaults": node }));
        json!({ "single_raised": tree })
    }

    /// big blind facing `to_call` into `pot_now` as `class`
    fn facing(class: HandClass, to_call: i32, pot_now: i32, bundle: Bundle) -> Observation {
        let state = flop("AhKd", "QcJc");
        let mut obs = observe(&state, bundle);
        obs.hand_class = class;
        obs.pot_now = pot_now;
        obs.facing_size_tag = Facing::classify(to_call, pot_now, 0.45, 0.75);
        obs.with_acts(vec![
            LegalAction::fold(),
            LegalAction::call(to_call),
            LegalAction::raise(to_call * 2, 195),
            LegalAction::allin(195),
        ])
    }

    /// the raiser c-bets a third on a dry board with range advantage
    #[test]
    fn pfr_cbets_dry() {
        let state = flop("AhKd", "7c2d").try_apply(Action::Check, None).unwrap();
        let d = decide(&observe(&state, builtin()));
        assert_eq!(d.action, Action::Bet);
        assert_eq!(d.size_tag(), Some(SizeTag::Third));
        assert!(d.rationale.contains(Code::FlRangeAdvSmallBet));
        assert_eq!(d.meta["rule"], "tree_bet");
        assert_eq!(d.meta["role"], "pfr");
        assert_eq!(d.meta["texture"], "dry");
        assert!(d.meta["rule_path"].as_str().unwrap().starts_with("single_raised/role/pfr/ip/dry"));
    }

    /// a check node carries the delayed c-bet plan
    #[test]
    fn tree_check_plans() {
        let mut bundle = builtin();
        bundle.flop = deep(json!({"action": "check", "plan": "check and barrel later"}));
        let state = flop("AhKd", "7c2d").try_apply(Action::Check, None).unwrap();
        let d = decide(&observe(&state, bundle));
        assert_eq!(d.action, Action::Check);
        assert!(d.rationale.contains(Code::FlDelayedCbetPlan));
        assert_eq!(d.meta["plan"], "check and barrel later");
    }

    /// without a tree the raiser bets dry boards and the caller checks
    #[test]
    fn treeless_defaults() {
        let mut bundle = builtin();
        bundle.flop = Value::Null;
        let ip = flop("AhKd", "7c2d").try_apply(Action::Check, None).unwrap();
        let d = decide(&observe(&ip, bundle.clone()));
        assert_eq!(d.meta["rule"], "pfr_dry_third");
        assert_eq!(d.rationale.codes()[0], Code::CfgFallbackUsed);
        let d = decide(&observe(&flop("AhKd", "7c2d"), bundle));
        assert_eq!(d.action, Action::Check);
        assert!(d.rationale.contains(Code::FlCheckRange));
    }

    /// the value node's facing map raises and records its path
    #[test]
    fn facing_map_raises() {
        let mut bundle = builtin();
        bundle.flop = deep(json!({"action": "check",
            "facing": {"third": {"action": "raise", "size_tag": "pot", "plan": "raise big"}}}));
        let d = decide(&facing(HandClass::Value, 3, 10, bundle));
        assert_eq!(d.action, Action::Raise);
        assert_eq!(d.size_tag(), Some(SizeTag::Pot));
        assert_eq!(d.meta["rule"], "facing_map");
        assert!(d.meta["rule_path"].as_str().unwrap().ends_with("facing.third"));
        assert_eq!(d.rationale.codes()[0], Code::FlMdfDefend);
        assert!(d.rationale.contains(Code::FlRaiseValue));
    }

    /// value raises small bets even without a facing map
    #[test]
    fn value_raises_small() {
        let d = decide(&facing(HandClass::Value, 3, 10, builtin()));
        assert_eq!(d.action, Action::Raise);
        assert_eq!(d.size_tag(), Some(SizeTag::TwoThird));
        assert!(d.rationale.contains(Code::FlRaiseValue));
    }

    /// weak hands fold big bets by price, strong ones continue
    #[test]
    fn big_bets() {
        let mut bundle = builtin();
        bundle.defense = Value::Null;
        let d = decide(&facing(HandClass::MiddlePairOrThirdPairMinus, 10, 10, bundle.clone()));
        assert_eq!(d.action, Action::Fold);
        assert!(d.rationale.contains(Code::PlFoldPotodds));
        assert_eq!(d.meta["rule"], "fold_potodds");
        let d = decide(&facing(HandClass::OverpairOrTopPairStrong, 10, 10, bundle));
        assert_eq!(d.action, Action::Call);
    }

    /// the defence table answers middling spots
    #[test]
    fn defense_table() {
        let d = decide(&facing(HandClass::WeakDrawOrAir, 8, 10, builtin()));
        assert_eq!(d.action, Action::Fold);
        assert_eq!(d.meta["rule"], "defense");
        assert_eq!(d.meta["source"], "defense");
    }
}
