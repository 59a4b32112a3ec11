use super::PolicyOutput;
use super::round4;
use super::super::calculators::pot_odds;
use super::super::codes::Code;
use super::super::codes::Rationales;
use super::super::decision::Suggested;
use super::super::observation::Observation;
use crate::gameplay::Action;
use crate::gameplay::Legal;
use crate::gameplay::LegalAction;
use serde_json::Map;
use serde_json::json;

/// Passive line used when no policy can answer.
///
/// Not facing a bet it prefers check, then call, then fold. Facing one it
/// calls when the call is at most a big blind or the price is within
/// [`crate::FALLBACK_POT_ODDS`], and folds otherwise. Aggression is only
/// chosen when nothing else is legal.
pub fn choose_conservative_line(obs: &Observation, acts: &[LegalAction]) -> anyhow::Result<PolicyOutput> {
    let first = acts.first().ok_or_else(|| anyhow::anyhow!("no legal actions for fallback"))?;
    let mut rationale = Rationales::default();
    rationale.push(Code::CfgFallbackUsed);
    let mut meta = Map::new();
    meta.insert("policy_source".into(), json!("fallback"));
    meta.insert("fallback_used".into(), json!(true));

    let to_call = acts.to_call().max(obs.to_call).max(0);
    let calm = acts.iter().find(|a| !a.action.is_aggressive()).map(|a| a.action);
    let action = match to_call {
        0 => [Action::Check, Action::Call, Action::Fold]
            .into_iter()
            .find(|a| acts.allows(*a))
            .or(calm)
            .unwrap_or(first.action),
        _ => {
            let price = pot_odds(to_call, obs.pot_now);
            meta.insert("fallback_to_call".into(), json!(to_call));
            meta.insert("fallback_pot_odds".into(), json!(round4(price)));
            let cheap = to_call <= obs.bb.max(1) || price <= crate::FALLBACK_POT_ODDS;
            match () {
                _ if cheap && acts.allows(Action::Call) => Action::Call,
                _ if acts.allows(Action::Fold) => Action::Fold,
                _ if acts.allows(Action::Call) => Action::Call,
                _ => calm.unwrap_or(first.action),
            }
        }
    };
    let amount = match action {
        Action::Bet | Action::Raise | Action::Allin => acts.find(action).and_then(|a| a.min),
        _ => None,
    };
    log::debug!("fallback {} for {}", action, obs.hand_id);
    Ok(PolicyOutput {
        suggested: Suggested {
            action,
            amount,
            size_tag: None,
        },
        rationale,
        policy: String::from("fallback"),
        meta,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advisor::config::Strategy;
    use crate::advisor::profile::Bundle;
    use crate::cards::Bitwise;
    use crate::gameplay::HandState;
    use crate::gameplay::SessionConfig;
    use std::sync::Arc;

    fn obs(pot_now: i32) -> Observation {
        let state = HandState::start(&SessionConfig::default(), "s", "hf", 0, Some(4)).unwrap();
        let bundle = Arc::new(Bundle::builtin(Strategy::Medium));
        let (mut obs, _) = Observation::build(&state, 0, &state.legal(), bundle, &Bitwise);
        obs.pot_now = pot_now;
        obs
    }

    /// checks when free, and never raises when passive options exist
    #[test]
    fn unopened_prefers_check() {
        let acts = vec![LegalAction::check(), LegalAction::bet(2, 100), LegalAction::allin(100)];
        let out = choose_conservative_line(&obs(10).with_acts(acts.clone()), &acts).unwrap();
        assert_eq!(out.suggested.action, Action::Check);
        assert!(out.rationale.contains(Code::CfgFallbackUsed));
        assert_eq!(out.meta["policy_source"], "fallback");
    }

    /// cheap calls continue and expensive ones fold
    #[test]
    fn facing_prices() {
        let cheap = vec![LegalAction::fold(), LegalAction::call(2), LegalAction::raise(6, 100)];
        let out = choose_conservative_line(&obs(100).with_acts(cheap.clone()), &cheap).unwrap();
        assert_eq!(out.suggested.action, Action::Call);
        let pricey = vec![LegalAction::fold(), LegalAction::call(60), LegalAction::allin(100)];
        let out = choose_conservative_line(&obs(100).with_acts(pricey.clone()), &pricey).unwrap();
        assert_eq!(out.suggested.action, Action::Fold);
        assert_eq!(out.meta["fallback_to_call"], 60);
    }

    /// only aggression left still answers, and nothing legal errors
    #[test]
    fn edges() {
        let only = vec![LegalAction::allin(40)];
        let out = choose_conservative_line(&obs(10).with_acts(only.clone()), &only).unwrap();
        assert_eq!(out.suggested.action, Action::Allin);
        assert_eq!(out.suggested.amount, Some(40));
        assert!(choose_conservative_line(&obs(10), &[]).is_err());
    }
}
