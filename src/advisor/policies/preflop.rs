use super::Outcome;
use super::Rule;
use super::Spot;
use super::first_hit;
use super::round4;
use super::super::classify::PotType;
use super::super::codes::Code;
use super::super::codes::Rationale;
use super::super::config::PolicyConfig;
use super::super::decision::Decision;
use super::super::decision::SizeSpec;
use super::super::mixing::stable_roll;
use super::super::observation::Observation;
use super::super::profile::Lines;
use crate::cards::Street;
use crate::gameplay::Action;
use serde_json::json;

/// Open size bucket from the raise-to in blinds: `small` up to 2.5,
/// `mid` up to 4, `large` beyond.
pub fn bucket_open_size(to_call_bb: f64) -> &'static str {
    match to_call_bb + 1. {
        x if x <= 2.5 => "small",
        x if x <= 4. => "mid",
        _ => "large",
    }
}

/// Shove size band: `le12`, `13to20`, `gt20`.
pub fn bucket_shove(to_call_bb: f64) -> &'static str {
    match to_call_bb {
        x if x <= 12. => "le12",
        x if x <= 20. => "13to20",
        _ => "gt20",
    }
}

/// Raise cap in blinds from the effective stack; non-positive ratios
/// leave raises uncapped.
fn cap_bb(spot: &Spot, ratio: f64) -> f64 {
    match ratio {
        r if r <= 0. => 999.,
        r => (spot.obs.eff_stack as f64 / spot.obs.bb.max(1) as f64 * r).floor(),
    }
}

/// Size the 3-bettor has put in, in blinds.
fn threebet_to_bb(spot: &Spot) -> f64 {
    let tc = spot.obs.to_call.max(0) as f64;
    let pn = spot.obs.pot_now.max(0) as f64;
    match pn < tc {
        true => 0.,
        false => (pn + tc) / 2. / spot.obs.bb.max(1) as f64,
    }
}

fn bucket_threebet(spot: &Spot, threebet_to: f64) -> &'static str {
    let modes = spot.bundle().modes;
    match threebet_to {
        x if x <= modes.threebet_bucket_small_le => "small",
        x if x <= modes.threebet_bucket_mid_le => "mid",
        _ => "large",
    }
}

/// Continue sets for the big blind against an open of this bucket.
fn bb_lines<'a>(spot: &Spot<'a>, bucket: &str) -> Option<&'a Lines> {
    spot.bundle().vs.as_ref().and_then(|vs| vs.bb_vs_sb.get(bucket))
}

fn holds(lines: Option<&Lines>, combo: Option<&str>, pick: fn(&Lines) -> &std::collections::BTreeSet<String>) -> bool {
    match (lines, combo) {
        (Some(lines), Some(combo)) => pick(lines).contains(combo),
        _ => false,
    }
}

/// Defend price threshold. The big blind closes preflop action and
/// reads the in-position threshold.
fn defend_threshold(spot: &Spot) -> f64 {
    let modes = spot.bundle().modes;
    match spot.obs.last_to_act {
        true => modes.defend_threshold_ip,
        false => modes.defend_threshold_oop,
    }
}

fn preflop(spot: &Spot) -> bool {
    spot.obs.street == Street::Pref
}

/// What the small blind does if the big blind 3-bets this combo.
fn sb_plan(spot: &Spot, combo: &str) -> String {
    let modes = spot.bundle().modes;
    let (small, mid) = (modes.threebet_bucket_small_le, modes.threebet_bucket_mid_le);
    let lines = spot.bundle().vs.as_ref().map(|vs| vs.sb_vs_3bet.values().collect::<Vec<_>>()).unwrap_or_default();
    match () {
        _ if lines.iter().any(|l| l.raise.contains(combo)) => {
            format!("If 3-bet: 4-bet up to {}bb, 4-bet or call up to {}bb, play carefully above.", small, mid)
        }
        _ if lines.iter().any(|l| l.call.contains(combo)) => {
            format!("If 3-bet: call up to {}bb and {}bb, fold to larger sizes.", small, mid)
        }
        _ => String::from("If 3-bet: consider calling small and mid sizes, fold larger ones."),
    }
}

fn vs_shove(spot: &Spot) -> Option<Decision> {
    let ref shove = spot.bundle().shove;
    let combo = spot.combo()?;
    let to_call_bb = spot.obs.to_call_bb();
    let bucket = bucket_shove(to_call_bb);
    let band = shove.bands.get(bucket)?;
    let data = json!({ "bucket": bucket, "combo": combo, "shove_bb": round4(to_call_bb) });
    if band.call.contains(combo) {
        return Some(Decision::call().because((Code::PfVsShoveCall, data)).with("bucket", bucket));
    }
    if band.mix.contains(combo) {
        let freq = band.mix_map.get(combo).copied().unwrap_or(shove.mix_freq);
        let call = match spot.cfg.mixing {
            true => stable_roll(
                &format!("vs_shove:{}:{}:{}", spot.obs.hand_id, bucket, combo),
                (freq * 100.).round() as i64,
            ),
            false => freq >= 0.5,
        };
        if call {
            return Some(
                Decision::call()
                    .because((Code::PfVsShoveCall, data))
                    .with("bucket", bucket)
                    .with("frequency", freq),
            );
        }
    }
    match spot.allows(Action::Fold) {
        true => Some(Decision::fold().because((Code::PfVsShoveFold, data)).with("bucket", bucket)),
        false => None,
    }
}

fn sb_vs_threebet(spot: &Spot) -> Option<Decision> {
    let combo = spot.combo();
    let threebet_to = threebet_to_bb(spot);
    let bucket = bucket_threebet(spot, threebet_to);
    let lines = spot.bundle().vs.as_ref().and_then(|vs| vs.sb_vs_3bet.get(bucket));
    let modes = spot.bundle().modes;
    let (small, mid) = (modes.threebet_bucket_small_le, modes.threebet_bucket_mid_le);
    if holds(lines, combo, |l| &l.raise) && spot.allows(Action::Raise) {
        let cap = cap_bb(spot, modes.cap_ratio_4b.unwrap_or(modes.cap_ratio));
        let to_bb = (threebet_to.max(0.) * modes.fourbet_ip_mult).round().min(cap).max(0.);
        return Some(
            Decision::new(Action::Raise)
                .sized(SizeSpec::Bb(to_bb))
                .because((
                    Code::PfAttack4bet,
                    json!({ "bucket": bucket, "threebet_to_bb": round4(threebet_to) }),
                ))
                .reopen(Code::PfAttack4betMinRaiseAdjusted)
                .with("fourbet_to_bb", to_bb)
                .with("threebet_to_bb", round4(threebet_to))
                .with("cap_bb", cap)
                .with("bucket", bucket)
                .plan(&format!(
                    "Facing a 3-bet: 4-bet to {}bb up to {}bb, continue up to {}bb, fold larger.",
                    to_bb, small, mid
                )),
        );
    }
    if holds(lines, combo, |l| &l.call) && spot.allows(Action::Call) {
        return Some(
            Decision::call()
                .because((Code::PfDefendPriceOk, json!({ "bucket": bucket })))
                .with("bucket", bucket)
                .plan(&format!("Facing a 3-bet: call up to {}bb and {}bb, fold larger.", small, mid)),
        );
    }
    let price = spot.price();
    let thr = modes.defend_threshold_ip;
    if spot.allows(Action::Call) && (price <= thr || threebet_to < 2.2) {
        return Some(
            Decision::call()
                .because((
                    Code::PfDefendPriceOk,
                    json!({ "pot_odds": round4(price), "bucket": bucket, "thr": thr }),
                ))
                .with("bucket", bucket)
                .with("pot_odds", round4(price)),
        );
    }
    match spot.allows(Action::Fold) {
        true => Some(Decision::fold().because((Code::PfFoldExpensive, json!({ "bucket": bucket }))).with("bucket", bucket)),
        false => None,
    }
}

fn sb_open(spot: &Spot) -> Option<Decision> {
    let combo = spot.combo()?;
    let betlike = spot.betlike()?;
    let open = spot.bundle().open.as_ref()?;
    if !open.sb.contains(combo) {
        return None;
    }
    let open_bb = spot.bundle().modes.open_bb;
    Some(
        Decision::new(betlike)
            .sized(SizeSpec::Bb(open_bb))
            .because((Code::PfOpenRangeHit, json!({ "open_bb": open_bb })))
            .with("open_bb", open_bb)
            .plan(&sb_plan(spot, combo)),
    )
}

fn bb_isolate(spot: &Spot) -> Option<Decision> {
    let combo = spot.combo()?;
    let open = spot.bundle().open.as_ref()?;
    if !open.bb.contains(combo) {
        return None;
    }
    let open_bb = spot.bundle().modes.open_bb + 1.;
    Some(
        Decision::new(Action::Raise)
            .sized(SizeSpec::Bb(open_bb))
            .because((Code::PfOpenRangeHit, json!({ "open_bb": open_bb })))
            .with("open_bb", open_bb)
            .plan("Raise the limp and play the flop as the aggressor."),
    )
}

fn bb_defend(spot: &Spot) -> Option<Decision> {
    let modes = spot.bundle().modes;
    let to_call_bb = spot.obs.to_call_bb();
    let bucket = bucket_open_size(to_call_bb);
    let lines = bb_lines(spot, bucket);
    let combo = spot.combo();
    let price = spot.price();
    let thr = defend_threshold(spot);
    if holds(lines, combo, |l| &l.raise) && spot.allows(Action::Raise) {
        let ip = spot.obs.last_to_act;
        let mult = if ip { modes.reraise_ip_mult } else { modes.reraise_oop_mult };
        let offset = if ip { 0. } else { modes.reraise_oop_offset };
        let cap = cap_bb(spot, modes.cap_ratio);
        let to_bb = ((to_call_bb + 1.) * mult + offset).round().min(cap);
        return Some(
            Decision::new(Action::Raise)
                .sized(SizeSpec::Bb(to_bb))
                .because((Code::PfDefend3bet, json!({ "bucket": bucket })))
                .reopen(Code::PfDefend3betMinRaiseAdjusted)
                .with("bucket", bucket)
                .with("reraise_to_bb", to_bb)
                .with("cap_bb", cap)
                .with("pot_odds", round4(price))
                .plan("Fold to a 4-bet unless holding QQ+ or AK."),
        );
    }
    if holds(lines, combo, |l| &l.call) && spot.allows(Action::Call) {
        let data = json!({ "pot_odds": round4(price), "thr": thr, "bucket": bucket });
        if price <= thr {
            return Some(
                Decision::call()
                    .because((Code::PfDefendPriceOk, data))
                    .with("bucket", bucket)
                    .with("pot_odds", round4(price))
                    .plan("See the flop and continue by texture and MDF."),
            );
        }
        if spot.allows(Action::Fold) {
            return Some(
                Decision::fold()
                    .because((Code::PfDefendPriceBad, data))
                    .with("bucket", bucket)
                    .with("pot_odds", round4(price)),
            );
        }
    }
    None
}

fn sb_first_in(spot: &Spot) -> Option<Decision> {
    let tc = spot.obs.to_call;
    let open = spot.bundle().open.as_ref();
    let in_open = matches!((open, spot.combo()), (Some(o), Some(c)) if o.sb.contains(c));
    let mut decision = match () {
        _ if spot.allows(Action::Call) && tc > 0 && tc <= spot.obs.bb => {
            Decision::call().because(Code::PfLimpCompleteBlind)
        }
        _ if tc == 0 && spot.allows(Action::Check) => Decision::check(),
        _ => return None,
    };
    if in_open && spot.betlike().is_none() {
        decision.rationale.prepend([Rationale::from(Code::PfNoLegalRaise)]);
    }
    Some(decision)
}

fn out_of_range(spot: &Spot) -> Option<Decision> {
    let bucket = bucket_open_size(spot.obs.to_call_bb().max(0.));
    let lines = bb_lines(spot, bucket);
    let combo = spot.combo();
    let price = spot.price();
    let thr = defend_threshold(spot);
    let listed = holds(lines, combo, |l| &l.call) || holds(lines, combo, |l| &l.raise);
    let empty = lines.is_none_or(|l| l.call.is_empty() && l.raise.is_empty());
    let outside = combo.is_some() && !listed;
    let mut decision = match () {
        _ if spot.allows(Action::Call) && price <= thr && !(empty && outside) => Decision::call()
            .because((
                Code::PfDefendPriceOk,
                json!({ "pot_odds": round4(price), "thr": thr, "bucket": bucket }),
            ))
            .with("pot_odds", round4(price)),
        _ if spot.allows(Action::Fold) => Decision::fold().because((
            Code::PfDefendPriceBad,
            json!({ "pot_odds": round4(price), "thr": thr, "bucket": bucket }),
        )),
        _ => return None,
    };
    if outside {
        decision.rationale.prepend([Rationale::from((
            Code::PfDefendPriceBad,
            json!({ "pot_odds": round4(price), "thr": thr, "bucket": bucket, "reason": "out_of_range" }),
        ))]);
    }
    Some(decision.with("bucket", bucket))
}

fn by_price(spot: &Spot) -> Option<Decision> {
    let price = spot.price();
    match () {
        _ if spot.allows(Action::Call) && price <= 0.5 => Some(
            Decision::call()
                .because((Code::PfDefendPriceOk, json!({ "pot_odds": round4(price) })))
                .with("pot_odds", round4(price)),
        ),
        _ if spot.allows(Action::Fold) => Some(Decision::fold()),
        _ if spot.allows(Action::Check) => Some(Decision::check()),
        _ => None,
    }
}

fn rules<'a>() -> [Rule<Spot<'a>>; 8] {
    [
        Rule {
            name: "vs_shove",
            when: |s| preflop(s) && s.allows(Action::Call) && s.obs.to_call_bb() >= s.bundle().shove.min_bb,
            then: vs_shove,
        },
        Rule {
            name: "sb_vs_3bet",
            when: |s| preflop(s) && s.facing() && !s.obs.first_to_act && !s.obs.last_to_act,
            then: sb_vs_threebet,
        },
        Rule {
            name: "sb_open",
            when: |s| {
                preflop(s) && s.obs.pot_type == PotType::Limped && s.obs.first_to_act && s.obs.to_call <= s.obs.bb
            },
            then: sb_open,
        },
        Rule {
            name: "bb_defend",
            when: |s| preflop(s) && s.facing() && s.obs.last_to_act,
            then: bb_defend,
        },
        Rule {
            name: "bb_isolate",
            when: |s| {
                preflop(s)
                    && !s.facing()
                    && s.obs.pot_type == PotType::Limped
                    && s.obs.actor != s.obs.button
                    && s.allows(Action::Raise)
            },
            then: bb_isolate,
        },
        Rule {
            name: "sb_first_in",
            when: |s| preflop(s) && s.obs.first_to_act,
            then: sb_first_in,
        },
        Rule {
            name: "out_of_range",
            when: |s| preflop(s) && s.facing(),
            then: out_of_range,
        },
        Rule {
            name: "by_price",
            when: |_| true,
            then: by_price,
        },
    ]
}

/// Range-table preflop policy for heads-up.
///
/// Shoves are answered from the calling bands first, then the small blind
/// facing a 3-bet, the small blind open, the big blind defence and the big
/// blind raise over a limp. Price-based fallbacks close the ladder.
/// A missing combo or empty raise table marks the decision as degraded.
pub fn policy_preflop_v1(obs: &Observation, cfg: &PolicyConfig) -> anyhow::Result<Outcome> {
    if obs.acts.is_empty() {
        return Err(anyhow::anyhow!("no legal actions"));
    }
    let ref spot = Spot::new(obs, cfg);
    let mut decision = first_hit(&rules(), spot)
        .ok_or_else(|| anyhow::anyhow!("no safe preflop suggestion for {}", obs.hand_id))?;
    let degraded_table = obs
        .context
        .vs
        .as_ref()
        .is_none_or(|vs| vs.bb_vs_sb.is_empty() && vs.sb_vs_3bet.is_empty());
    if obs.combo.is_none() || degraded_table {
        decision.rationale.prepend([Rationale::from(Code::CfgFallbackUsed)]);
    }
    Ok(Outcome::Decided {
        decision,
        policy: "preflop_v1",
    })
}
