use super::super::calculators::Facing;
use super::super::calculators::FineFacing;
use super::super::calculators::SizeTag;
use super::super::decision::Decision;
use super::super::mixing::stable_weighted_choice;
use super::super::nodekey::node_key_from_observation;
use super::super::observation::Observation;
use crate::cards::Street;
use crate::gameplay::Action;
use crate::gameplay::Legal;
use serde_json::Value;

/// Pot-odds windows for one hand category against one bet size.
#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct DefenseNode {
    pub raise_to: Option<String>,
    pub raise_call_le: Option<f64>,
    pub call_le: Option<f64>,
    pub mix_to: Option<f64>,
    pub mix_freq: Option<f64>,
    pub fold_gt: Option<f64>,
    pub plan: Option<String>,
}

const MIX_FREQ: f64 = 0.35;

/// Threshold node for the spot: fine facing tag, then the coarse tag, then
/// `two_third+`, then `any`. Nodes may also sit under a `facing` object.
fn node(table: &Value, street: Street, category: &str, fine: FineFacing, base: Facing) -> Option<DefenseNode> {
    let cat = table.get(street.to_string())?.get(category)?;
    let keys = [fine.as_str(), base.as_str(), "two_third+", "any"];
    [Some(cat), cat.get("facing")]
        .into_iter()
        .flatten()
        .find_map(|scope| keys.iter().find_map(|k| scope.get(*k).filter(|v| v.is_object())))
        .and_then(|v| serde_json::from_value(v.clone()).map_err(|e| log::warn!("defense node: {}", e)).ok())
}

/// Threshold-driven answer to a bet.
///
/// The category is the river tier on the river and the hand class
/// elsewhere. In order: a configured raise, a call within `call_le`, a
/// seeded mix inside `(call_le, mix_to]`, a fold past `fold_gt`, a call
/// against a third-pot bet, and finally a fold. Returns `None` when no
/// bet is faced or the table has no node for the spot.
pub fn decide_defense(obs: &Observation, mixing: bool) -> Option<Decision> {
    if obs.to_call <= 0 || obs.pot_now <= 0 {
        return None;
    }
    let fine = FineFacing::classify(obs.to_call, obs.pot_now)?;
    let base = obs.facing_size_tag;
    let category = match obs.street {
        Street::Rive => obs.river_tier().as_str(),
        _ => obs.hand_class.as_str(),
    };
    let node = node(&obs.context.defense, obs.street, category, fine, base)?;
    let ref acts = obs.acts;
    let po = obs.pot_odds();
    let plan = |d: Decision, fallback: &str| {
        let text = node.plan.clone().unwrap_or_else(|| fallback.to_string());
        d.plan(&text).with("source", "defense").with("defense_category", category)
    };

    if let Some(tag) = node.raise_to.as_deref().and_then(|t| SizeTag::try_from(t).ok()) {
        let ceiling = node.raise_call_le.or(node.call_le);
        if acts.allows(Action::Raise) && ceiling.is_none_or(|c| po <= c) {
            return Some(plan(Decision::raise(tag), "Raise for value against this size."));
        }
    }
    if let Some(call_le) = node.call_le {
        if acts.allows(Action::Call) && po <= call_le {
            return Some(plan(Decision::call(), "The price is inside the calling window."));
        }
        if let Some(mix_to) = node.mix_to {
            if mixing && acts.allows(Action::Call) && po > call_le && po <= mix_to {
                let freq = node.mix_freq.unwrap_or(MIX_FREQ);
                let ref seed = format!(
                    "defense:{}:{}:{}:{:.3}:{}",
                    obs.hand_id,
                    obs.street,
                    fine,
                    po,
                    node_key_from_observation(obs)
                );
                if stable_weighted_choice(seed, &[1. - freq, freq]) == 1 {
                    return Some(plan(Decision::call(), "Grey zone: mixed defence.").with("frequency", freq));
                }
            }
        }
    }
    if let Some(fold_gt) = node.fold_gt {
        if acts.allows(Action::Fold) && po > fold_gt {
            return Some(plan(Decision::fold(), "The price is too high."));
        }
    }
    if base == Facing::Third && acts.allows(Action::Call) {
        return Some(plan(Decision::call(), "Small size: a conservative call."));
    }
    if acts.allows(Action::Fold) {
        return Some(plan(Decision::fold(), "The price is too high."));
    }
    None
}
