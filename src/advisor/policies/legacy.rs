use super::Outcome;
use super::PolicyOutput;
use super::round4;
use super::super::calculators::pot_odds;
use super::super::classify::HandClass;
use super::super::classify::Tag;
use super::super::codes::Code;
use super::super::codes::Rationales;
use super::super::config::PolicyConfig;
use super::super::decision::Suggested;
use super::super::observation::Observation;
use crate::cards::Street;
use crate::gameplay::Action;
use crate::gameplay::Legal;
use crate::gameplay::LegalAction;
use serde_json::Map;
use serde_json::json;

/// Tags that put a hand in the v0 opening and calling range.
const RANGE_TAGS: [Tag; 4] = [Tag::Pair, Tag::SuitedBroadway, Tag::AxSuited, Tag::BroadwayOffsuit];

fn in_range(obs: &Observation) -> bool {
    obs.tags.iter().any(|t| RANGE_TAGS.contains(t))
        || matches!(
            obs.hand_class,
            HandClass::Pair | HandClass::AxSuited | HandClass::SuitedBroadway | HandClass::BroadwayOffsuit
        )
}

fn sized(acts: &[LegalAction]) -> Option<&LegalAction> {
    [Action::Bet, Action::Raise]
        .into_iter()
        .filter_map(|a| acts.find(a))
        .find(|a| matches!((a.min, a.max), (Some(lo), Some(hi)) if lo <= hi))
}

fn output(action: Action, amount: Option<i32>, rationale: Rationales, policy: &str) -> anyhow::Result<Outcome> {
    Ok(Outcome::Output(PolicyOutput {
        suggested: Suggested {
            action,
            amount,
            size_tag: None,
        },
        rationale,
        policy: policy.to_string(),
        meta: Map::new(),
    }))
}

/// Tag-range preflop policy.
///
/// Unopened, range hands open to `open_size_bb` and the rest check or
/// fold. Facing a bet, range hands call up to `call_threshold_bb` blinds.
pub fn policy_preflop_v0(obs: &Observation, cfg: &PolicyConfig) -> anyhow::Result<Outcome> {
    const NAME: &str = "preflop_v0";
    let ref acts = obs.acts;
    if acts.is_empty() {
        return Err(anyhow::anyhow!("no legal actions"));
    }
    let mut rationale = Rationales::default();
    let bb = obs.bb;
    if obs.to_call == 0 {
        if in_range(obs) {
            if let Some(open) = sized(acts) {
                let target = (cfg.open_size_bb * bb as f64).round() as i32;
                let chosen = target.clamp(open.min.unwrap_or(target), open.max.unwrap_or(target));
                let code = match open.action {
                    Action::Bet => Code::PfOpenBet,
                    _ => Code::PfOpenRaise,
                };
                rationale.push((code, json!({ "bb": bb, "chosen": chosen, "bb_mult": cfg.open_size_bb })));
                return output(open.action, Some(chosen), rationale, NAME);
            }
        }
        if acts.allows(Action::Check) {
            rationale.push(Code::PfCheck);
            return output(Action::Check, None, rationale, NAME);
        }
        if acts.allows(Action::Fold) {
            rationale.push(Code::PfFold);
            return output(Action::Fold, None, rationale, NAME);
        }
    }
    let threshold = (cfg.call_threshold_bb * bb as f64) as i32;
    let data = json!({ "to_call": obs.to_call, "threshold": threshold });
    if in_range(obs) && acts.allows(Action::Call) && obs.to_call <= threshold {
        rationale.push((Code::PfCall, data));
        return output(Action::Call, None, rationale, NAME);
    }
    if acts.allows(Action::Fold) {
        rationale.push((Code::PfFoldExpensive, data));
        return output(Action::Fold, None, rationale, NAME);
    }
    if acts.allows(Action::Check) {
        rationale.push(Code::SafeCheck);
        return output(Action::Check, None, rationale, NAME);
    }
    Err(anyhow::anyhow!("no safe preflop v0 suggestion for {}", obs.hand_id))
}

/// Pot-odds postflop policy.
///
/// Checked to, the flop probes with the minimum bet and later streets only
/// probe with a pair or suited ace. Facing a bet it calls within the pot
/// odds threshold, which is looser for range hands.
pub fn policy_postflop_v0_3(obs: &Observation, cfg: &PolicyConfig) -> anyhow::Result<Outcome> {
    const NAME: &str = "postflop_v0_3";
    let ref acts = obs.acts;
    if acts.is_empty() {
        return Err(anyhow::anyhow!("no legal actions"));
    }
    let mut rationale = Rationales::default();
    let tags = obs.tags.iter().map(|t| t.as_str()).collect::<Vec<_>>();
    rationale.push((Code::PlHeader, json!({ "street": obs.street.to_string(), "tags": tags })));
    if obs.to_call == 0 {
        if let Some(probe) = sized(acts) {
            let showdown = obs.tags.contains(&Tag::Pair) || obs.hand_class == HandClass::AxSuited;
            let allowed = match obs.street {
                Street::Flop => true,
                Street::Turn | Street::Rive => showdown,
                Street::Pref => false,
            };
            if allowed {
                let chosen = probe.min.unwrap_or(obs.bb);
                rationale.push((Code::PlProbeBet, json!({ "chosen": chosen, "street": obs.street.to_string() })));
                return output(probe.action, Some(chosen), rationale, NAME);
            }
        }
        if acts.allows(Action::Check) {
            rationale.push(Code::PlCheck);
            return output(Action::Check, None, rationale, NAME);
        }
    }
    let price = pot_odds(obs.to_call, obs.pot);
    let threshold = match in_range(obs) {
        true => cfg.pot_odds_threshold_callrange,
        false => cfg.pot_odds_threshold,
    };
    let data = json!({
        "to_call": obs.to_call,
        "pot": obs.pot,
        "pot_odds": round4(price),
        "threshold": threshold,
    });
    if acts.allows(Action::Call) && price <= threshold {
        rationale.push((Code::PlCall, data));
        return output(Action::Call, None, rationale, NAME);
    }
    if acts.allows(Action::Fold) {
        rationale.push((Code::PlFold, data));
        return output(Action::Fold, None, rationale, NAME);
    }
    if let Some(allin) = acts.find(Action::Allin) {
        rationale.push(Code::PlAllinOnly);
        return output(Action::Allin, allin.max.or(allin.min), rationale, NAME);
    }
    if acts.allows(Action::Check) {
        rationale.push(Code::SafeCheck);
        return output(Action::Check, None, rationale, NAME);
    }
    Err(anyhow::anyhow!("no safe postflop suggestion for {}", obs.hand_id))
}
