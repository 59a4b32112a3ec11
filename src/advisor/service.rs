use super::calculators::Facing;
use super::calculators::SizeTag;
use super::calculators::pot_odds;
use super::calculators::raise_to_amount;
use super::calculators::size_to_amount;
use super::codes::Code;
use super::codes::Rationale;
use super::codes::Rationales;
use super::config::AdvisorConfig;
use super::config::Locale;
use super::config::PolicyConfig;
use super::config::PolicyVersion;
use super::decision::Suggested;
use super::decision::clamp_amount;
use super::explain::render_explanations;
use super::metrics::LogMetrics;
use super::metrics::Metrics;
use super::mixing::stable_roll;
use super::nodekey::candidate_keys;
use super::nodekey::node_key_from_observation;
use super::observation::Observation;
use super::policies::*;
use super::profile::Bundle;
use super::profile::ConfigStore;
use super::river::Blocker;
use super::river::RiverTier;
use super::table::PolicyEntry;
use super::table::PolicyLoader;
use super::table::PolicyLoaderFactory;
use crate::Chips;
use crate::Position;
use crate::Probability;
use crate::cards::EvaluatorFactory;
use crate::cards::Street;
use crate::gameplay::Action;
use crate::gameplay::HandState;
use crate::gameplay::Legal;
use crate::gameplay::LegalAction;
use serde_json::Map;
use serde_json::Value;
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

/// Why no suggestion could be made for a request.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SuggestError {
    #[error("seat {actor} asked for a suggestion but seat {to_act} is to act")]
    NotYourTurn { actor: Position, to_act: Position },

    #[error("hand is complete")]
    HandComplete,

    #[error("no legal actions")]
    NoLegalActions,

    #[error("policy produced illegal action {0}")]
    Illegal(Action),
}

/// A recommended action for the seat to act, with its reasoning.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Suggestion {
    pub hand_id: String,
    pub actor: Position,
    pub suggested: Suggested,
    pub rationale: Rationales,
    pub policy: String,
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub meta: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub explanations: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug: Option<Value>,
}

/// Everything a suggestion request reads besides the hand itself.
///
/// Holds the immutable config and the process-wide caches: profile blobs,
/// policy tables and the hand evaluator. Share one per process.
pub struct AdvisorContext {
    pub config: AdvisorConfig,
    pub store: ConfigStore,
    pub loaders: PolicyLoaderFactory,
    pub evaluators: EvaluatorFactory,
    pub metrics: Arc<dyn Metrics>,
}

impl AdvisorContext {
    pub fn new(config: AdvisorConfig) -> Self {
        Self::with_metrics(config, Arc::new(LogMetrics))
    }
    pub fn with_metrics(config: AdvisorConfig, metrics: Arc<dyn Metrics>) -> Self {
        Self {
            store: ConfigStore::new(config.config_dir.clone(), config.cache_ttl),
            loaders: PolicyLoaderFactory::new(metrics.clone()),
            evaluators: EvaluatorFactory::new(config.evaluator),
            metrics,
            config,
        }
    }
    pub fn from_env() -> Self {
        Self::new(AdvisorConfig::from_env())
    }
    /// Profile tables for the configured strategy and table mode.
    pub fn bundle(&self) -> Arc<Bundle> {
        Arc::new(Bundle::load(&self.store, self.config.profile, &self.config.table_mode))
    }
    pub fn policy_config(&self) -> PolicyConfig {
        PolicyConfig::from(&self.config)
    }
    fn loader(&self) -> Option<Arc<PolicyLoader>> {
        self.config.policy_path.as_deref().map(|path| self.loaders.get(path))
    }
}

impl Default for AdvisorContext {
    fn default() -> Self {
        Self::new(AdvisorConfig::default())
    }
}

// ============================================================================
// POLICY SELECTION
// ============================================================================

/// Whether this hand is served by the v1 policies.
fn rolled_to_v1(config: &AdvisorConfig, hand_id: &str) -> bool {
    match config.version {
        PolicyVersion::V0 => false,
        PolicyVersion::V1 => true,
        PolicyVersion::Auto => stable_roll(hand_id, config.rollout_pct),
    }
}

fn policy_for(v1: bool, street: Street) -> (Policy, &'static str) {
    match (v1, street) {
        (true, Street::Pref) => (policy_preflop_v1 as Policy, "preflop_v1"),
        (true, Street::Flop) => (policy_flop_v1 as Policy, "flop_v1"),
        (true, Street::Turn) => (policy_turn_v1 as Policy, "turn_v1"),
        (true, Street::Rive) => (policy_river_v1 as Policy, "river_v1"),
        (false, Street::Pref) => (policy_preflop_v0 as Policy, "preflop_v0"),
        (false, _) => (policy_postflop_v0_3 as Policy, "postflop_v0_3"),
    }
}

// ============================================================================
// POLICY TABLE
// ============================================================================

/// Outcome of consulting the precomputed policy table.
#[derive(Debug, Default)]
struct TableRead {
    output: Option<PolicyOutput>,
    /// meta that overrides the rule policy's when the table did not answer
    hint: Map<String, Value>,
    attempted: Vec<String>,
    alias: bool,
    facing_fallback: bool,
    policy_fallback: Option<bool>,
}

fn facing_of(key: &str) -> &str {
    key.split('|')
        .find_map(|part| part.strip_prefix("facing="))
        .filter(|f| !f.is_empty())
        .unwrap_or("na")
}

fn rule_hint(node_key: &str, facing_fallback: bool) -> Map<String, Value> {
    let mut hint = Map::new();
    hint.insert("policy_source".into(), json!("rule"));
    hint.insert("policy_fallback".into(), json!(true));
    hint.insert("node_key".into(), json!(node_key));
    hint.insert("facing_fallback".into(), json!(facing_fallback));
    hint
}

/// Tries the exact node key, its facing alias, then `facing=na`.
fn consult(obs: &Observation, acts: &[LegalAction], ctx: &AdvisorContext, name: &str) -> TableRead {
    let mut read = TableRead::default();
    let street = obs.street.to_string();
    let facing = obs.facing_size_tag.as_str();
    let ref key = node_key_from_observation(obs);
    let fallback = |kind: &str| {
        ctx.metrics
            .increment("policy_fallback", &[("kind", kind), ("street", street.as_str()), ("facing", facing)])
    };
    if obs.street.is_postflop() && obs.to_call > 0 && obs.facing_size_tag == Facing::Na {
        read.attempted.push(key.clone());
        read.hint = rule_hint(key, true);
        read.facing_fallback = true;
        read.policy_fallback = Some(true);
        fallback("facing_na");
        return read;
    }
    let Some(loader) = ctx.loader() else {
        return read;
    };
    for candidate in candidate_keys(key) {
        read.attempted.push(candidate.clone());
        let Some(entry) = loader.lookup(&candidate) else {
            log::debug!("no table row for {} (facing {})", candidate, facing_of(&candidate));
            continue;
        };
        let exact = candidate == *key;
        read.alias = !exact && facing_of(&candidate) != "na";
        read.facing_fallback = !exact && !read.alias;
        match table_policy(&entry, acts, name) {
            Some(output) => {
                read.output = Some(output);
                read.hint.clear();
                read.policy_fallback = Some(false);
            }
            None => {
                read.hint = rule_hint(&entry.node_key, !exact);
                read.hint.insert("policy_version".into(), json!(entry.table_meta.version));
                read.hint.insert("policy_hash".into(), json!(entry.table_meta.policy_hash));
                read.hint.insert("policy_distribution".into(), distribution(&entry));
                read.policy_fallback = Some(true);
                fallback("rule");
            }
        }
        break;
    }
    if read.output.is_none() && read.hint.is_empty() {
        read.hint = rule_hint(key, true);
        read.facing_fallback = true;
        read.policy_fallback = Some(true);
        fallback("rule");
    }
    read
}

fn distribution(entry: &PolicyEntry) -> Value {
    Value::Object(
        entry
            .actions
            .iter()
            .zip(entry.weights.iter())
            .map(|(a, w)| (a.name().to_string(), json!(w)))
            .collect(),
    )
}

/// Heaviest legal action of a table row.
///
/// `None` when the row carries no weight or none of its weighted actions
/// is legal here. Ties go to the earlier action.
fn table_policy(entry: &PolicyEntry, acts: &[LegalAction], name: &str) -> Option<PolicyOutput> {
    if entry.raw_weights.iter().sum::<Probability>() <= crate::POLICY_EPSILON {
        return None;
    }
    let (index, action, weight) = entry
        .actions
        .iter()
        .zip(entry.weights.iter())
        .enumerate()
        .filter(|(_, (a, _))| acts.allows(**a))
        .fold(None, |best: Option<(usize, Action, Probability)>, (i, (a, w))| match best {
            Some((_, _, top)) if top >= *w => best,
            _ => Some((i, *a, *w)),
        })?;
    if weight <= crate::POLICY_EPSILON {
        return None;
    }
    let size_tag = entry.size_tags.get(index).copied().flatten().or_else(|| {
        entry
            .meta
            .get("size_tag")
            .and_then(Value::as_str)
            .and_then(|t| SizeTag::try_from(t.trim()).ok())
    });
    let version = entry.table_meta.version.clone().unwrap_or_else(|| String::from("runtime"));
    let mut meta = entry.meta.as_object().cloned().unwrap_or_default();
    meta.insert("policy_source".into(), json!("policy"));
    meta.insert("policy_version".into(), json!(version));
    meta.insert("policy_hash".into(), json!(entry.table_meta.policy_hash));
    meta.insert("policy_weight".into(), json!(weight));
    meta.insert("policy_distribution".into(), distribution(entry));
    meta.insert("node_key".into(), json!(entry.node_key));
    meta.insert("policy_fallback".into(), json!(false));
    if let Some(tag) = size_tag {
        meta.entry("size_tag").or_insert_with(|| json!(tag.as_str()));
    }
    Some(PolicyOutput {
        suggested: Suggested {
            action,
            amount: None,
            size_tag,
        },
        rationale: Rationales::default(),
        policy: format!("{}_table", name),
        meta,
    })
}

// ============================================================================
// AMOUNTS
// ============================================================================

/// Chips for an unsized action, read off the legal set.
fn infer_amount(action: Action, acts: &[LegalAction]) -> Option<Chips> {
    let legal = acts.find(action)?;
    match action {
        Action::Bet | Action::Raise | Action::Allin => legal.min.or(legal.max),
        Action::Call => legal.to_call,
        _ => None,
    }
}

/// Sizes a bet or raise from the meta size tag.
fn size_from_meta(suggested: &Suggested, meta: &Map<String, Value>, obs: &Observation) -> Option<Chips> {
    let tag = meta
        .get("size_tag")
        .and_then(Value::as_str)
        .and_then(|t| SizeTag::try_from(t.trim()).ok())
        .or(suggested.size_tag)?;
    match suggested.action {
        Action::Raise => raise_to_amount(
            obs.pot_now,
            obs.last_bet,
            tag,
            obs.bb,
            None,
            Some(obs.context.modes.postflop_cap_ratio),
        ),
        Action::Bet => Some(size_to_amount(obs.pot_now, obs.context.fraction(tag)).max(obs.bb)),
        _ => None,
    }
}

fn conservative(obs: &Observation, acts: &[LegalAction], reason: &str) -> Result<PolicyOutput, SuggestError> {
    let mut output = choose_conservative_line(obs, acts).map_err(|_| SuggestError::NoLegalActions)?;
    output.meta.entry("fallback_reason").or_insert_with(|| json!(reason));
    Ok(output)
}

// ============================================================================
// CONFIDENCE
// ============================================================================

/// Confidence from the rationale codes and meta hints, within
/// `[CONFIDENCE_BASE, CONFIDENCE_MAX]`.
fn confidence(rationale: &Rationales, meta: &Map<String, Value>, policy: &str, to_call: Chips, clamped: bool) -> f64 {
    let any = |codes: &[Code]| codes.iter().any(|c| rationale.contains(*c));
    let hit = any(&[Code::PfOpenRangeHit, Code::PfDefend3bet, Code::PfDefendPriceOk]);
    let fallback = any(&[Code::CfgFallbackUsed, Code::PfNoLegalRaise, Code::PfLimpCompleteBlind]);
    let mainline = policy == "flop_v1"
        && to_call == 0
        && meta
            .get("size_tag")
            .and_then(Value::as_str)
            .is_some_and(|s| !matches!(s.trim().to_lowercase().as_str(), "" | "na" | "n/a"));
    let planned = meta.get("plan").and_then(Value::as_str).is_some_and(|p| !p.is_empty());
    let mut score = crate::CONFIDENCE_BASE;
    if hit {
        score += 0.3 + 0.2;
    }
    if mainline {
        score += 0.05;
    }
    if planned {
        score += 0.05;
    }
    if clamped {
        score -= 0.1;
    }
    if fallback {
        score -= 0.1;
    }
    score.clamp(crate::CONFIDENCE_BASE, crate::CONFIDENCE_MAX)
}

// ============================================================================
// TEACHING TEXT
// ============================================================================

/// A mixing frequency and the words used to describe it.
#[derive(Debug, Clone, PartialEq)]
struct Frequency {
    value: f64,
    pct: String,
    label: &'static str,
    phrase: String,
}

/// Reads `0.35`, `35`, `"35%"` or `"1/3"` as a share in `[0, 1]`.
fn parse_frequency(raw: &Value) -> Option<f64> {
    let value = match raw {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => {
            let text = s.trim();
            match text.split_once('/') {
                Some((num, den)) if !text.contains('%') => {
                    let den = den.trim().parse::<f64>().ok().filter(|d| *d != 0.)?;
                    num.trim().parse::<f64>().ok()? / den
                }
                _ => {
                    let x = text.trim_end_matches('%').trim().parse::<f64>().ok()?;
                    match text.ends_with('%') || x > 1. {
                        true => x / 100.,
                        false => x,
                    }
                }
            }
        }
        _ => return None,
    };
    match value.is_finite() {
        true => Some(value.clamp(0., 1.)),
        false => None,
    }
}

fn frequency(raw: &Value, locale: Locale) -> Option<Frequency> {
    let value = parse_frequency(raw)?;
    let pct = ((value * 100.).round() as i64).clamp(0, 100);
    let pct = match (pct, value > 0.) {
        (0, true) => String::from("<1%"),
        (p, _) => format!("{}%", p),
    };
    let band = ((value * 100.).round() as i64).clamp(0, 100);
    let label = match (locale, band) {
        (Locale::En, 95..) => "almost always",
        (Locale::En, 70..) => "most of the time",
        (Locale::En, 45..) => "about half the time",
        (Locale::En, 20..) => "occasionally",
        (Locale::En, 5..) => "now and then",
        (Locale::En, _) if value > 0. => "rarely",
        (Locale::En, _) => "almost never",
        (Locale::Zh, 95..) => "几乎总是",
        (Locale::Zh, 70..) => "大多数时候",
        (Locale::Zh, 45..) => "约一半时间",
        (Locale::Zh, 20..) => "偶尔出现",
        (Locale::Zh, 5..) => "偶发出现",
        (Locale::Zh, _) if value > 0. => "极少出现",
        (Locale::Zh, _) => "几乎不出现",
    };
    let phrase = match locale {
        Locale::En => format!("mixed strategy sample (~{})", pct),
        Locale::Zh => format!("混合策略抽样（~{}）", pct),
    };
    Some(Frequency {
        value,
        pct,
        label,
        phrase,
    })
}

fn tier_label(tier: RiverTier, locale: Locale) -> &'static str {
    match (locale, tier) {
        (Locale::En, tier) => tier.label(),
        (Locale::Zh, RiverTier::StrongValue) => "强成手",
        (Locale::Zh, RiverTier::MediumValue) => "中等成手",
        (Locale::Zh, RiverTier::WeakShowdown) => "弱摊牌",
        (Locale::Zh, RiverTier::Air) => "空气牌",
        (Locale::Zh, RiverTier::Unknown) => "河牌",
    }
}

fn blocker_text(blocker: Blocker, locale: Locale) -> (&'static str, &'static str) {
    match (locale, blocker) {
        (Locale::En, Blocker::NutFlushBlocker) => (blocker.label(), "check to induce rather than bet into fewer flushes"),
        (Locale::En, Blocker::StraightBlocker) => (blocker.label(), "check and control the betting rhythm"),
        (Locale::En, Blocker::FullHouseBlocker) => (blocker.label(), "keep the pot small and beware of being outdrawn"),
        (Locale::Zh, Blocker::NutFlushBlocker) => ("坚果同花阻断", "转为过牌诱导，避免阻断价值"),
        (Locale::Zh, Blocker::StraightBlocker) => ("关键顺子阻断", "过牌控制下注节奏"),
        (Locale::Zh, Blocker::FullHouseBlocker) => ("满堂红阻断", "控制底池，警惕被反超"),
    }
}

fn facing_text(tag: &str, locale: Locale) -> String {
    let text = match (locale, tag) {
        (Locale::En, "third") => "a small bet (about 1/3 pot)",
        (Locale::En, "half") => "a medium bet (about 1/2 pot)",
        (Locale::En, "two_third+" | "two_third_plus") => "a large bet (2/3 pot or more)",
        (Locale::En, "pot") => "a pot-sized bet",
        (Locale::En, "all_in") => "an all-in",
        (Locale::Zh, "third") => "小注（约 1/3 彩池）",
        (Locale::Zh, "half") => "中注（约 1/2 彩池）",
        (Locale::Zh, "two_third+" | "two_third_plus") => "大注（≥ 2/3 彩池）",
        (Locale::Zh, "pot") => "满池下注",
        (Locale::Zh, "all_in") => "全下",
        _ => return tag.to_string(),
    };
    text.to_string()
}

fn action_text(action: Action, locale: Locale) -> &'static str {
    match (locale, action) {
        (Locale::En, Action::Bet) => "bet for value",
        (Locale::En, Action::Raise) => "raise to apply pressure",
        (Locale::En, Action::Call) => "call to defend",
        (Locale::En, Action::Check) => "check to control the pot",
        (Locale::En, Action::Fold) => "fold",
        (Locale::En, Action::Allin) => "move all in",
        (Locale::Zh, Action::Bet) => "主动下注争取价值",
        (Locale::Zh, Action::Raise) => "加注施压",
        (Locale::Zh, Action::Call) => "跟注防守",
        (Locale::Zh, Action::Check) => "过牌控制",
        (Locale::Zh, Action::Fold) => "弃牌保守",
        (Locale::Zh, Action::Allin) => "全下对抗",
    }
}

/// Tier summary, blocker note and facing note for river decisions.
fn river_items(obs: &Observation, meta: &Map<String, Value>, suggested: &Suggested, locale: Locale) -> Vec<Rationale> {
    if obs.street != Street::Rive {
        return vec![];
    }
    let mut items = Vec::new();
    let tier = meta
        .get("river_tier")
        .and_then(Value::as_str)
        .and_then(|t| serde_json::from_value::<RiverTier>(json!(t)).ok())
        .or_else(|| obs.river.as_ref().map(|r| r.tier))
        .filter(|t| *t != RiverTier::Unknown);
    let plan = meta
        .get("plan")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(String::from)
        .or_else(|| tier.map(|t| t.default_plan().to_string()));
    if let (Some(tier), Some(plan)) = (tier, plan.as_ref()) {
        items.push(Rationale::from((
            Code::RiverValueTierSummary,
            json!({ "river_value_tier_label": tier_label(tier, locale), "river_plan_text": plan }),
        )));
    }
    let blocker = meta
        .get("river_blocker")
        .and_then(Value::as_str)
        .and_then(|b| Blocker::try_from(b).ok())
        .or_else(|| obs.river.as_ref().and_then(|r| r.blockers.first().copied()));
    if let Some(blocker) = blocker {
        let (label, adjust) = blocker_text(blocker, locale);
        items.push(Rationale::from((
            Code::RiverBlockerAdjust,
            json!({ "river_blocker_label": label, "river_blocker_action": adjust }),
        )));
    }
    let facing = meta
        .get("facing_size_tag")
        .and_then(Value::as_str)
        .map(|f| f.trim().to_lowercase())
        .filter(|f| !f.is_empty() && f != "na");
    if let Some(facing) = facing {
        items.push(Rationale::from((
            Code::RiverFacingDecision,
            json!({
                "facing_size_text": facing_text(&facing, locale),
                "river_value_tier_label": tier_label(tier.unwrap_or_default(), locale),
                "river_facing_decision": action_text(suggested.action, locale),
            }),
        )));
    }
    items
}

// ============================================================================
// ORCHESTRATION
// ============================================================================

/// Suggests an action for `actor` in `state`.
///
/// Fails only when it is not `actor`'s turn or the hand has no decision
/// left. A precomputed table row wins over the rule policies when one
/// matches. Policy errors and illegal outputs fall back to the
/// conservative line. Amounts are always fitted to the legal bounds, with
/// `W_CLAMPED` recording any adjustment.
pub fn build_suggestion(state: &HandState, actor: Position, ctx: &AdvisorContext) -> Result<Suggestion, SuggestError> {
    if state.street().is_none() {
        return Err(SuggestError::HandComplete);
    }
    if state.to_act() != actor {
        return Err(SuggestError::NotYourTurn {
            actor,
            to_act: state.to_act(),
        });
    }
    let ref acts = state.legal();
    if acts.is_empty() {
        return Err(SuggestError::NoLegalActions);
    }
    let bundle = ctx.bundle();
    let evaluator = ctx.evaluators.get();
    let (obs, warnings) = Observation::build(state, actor, acts, bundle.clone(), evaluator.as_ref());
    let ref obs = obs;
    let locale = ctx.config.locale;
    let v1 = rolled_to_v1(&ctx.config, state.hand_id());
    let (policy, name) = policy_for(v1, obs.street);
    let ref cfg = ctx.policy_config();
    let table = match v1 {
        true => consult(obs, acts, ctx, name),
        false => TableRead::default(),
    };

    let mut fallback: Option<PolicyOutput> = None;
    let mut decided = false;
    let (mut suggested, mut rationale, policy_name, mut meta) = match table.output.clone() {
        Some(output) => (output.suggested, output.rationale, output.policy, output.meta),
        None => match policy(obs, cfg) {
            Ok(Outcome::Decided { decision, policy }) => {
                decided = true;
                let (suggested, meta, rationale) = decision.resolve(obs, acts);
                (suggested, rationale, policy.to_string(), meta)
            }
            Ok(Outcome::Output(output)) => (output.suggested, output.rationale, output.policy, output.meta),
            Err(e) => {
                log::warn!("policy {} failed for {}: {}", name, obs.hand_id, e);
                let output = conservative(obs, acts, "policy_exception")?;
                fallback = Some(output.clone());
                (output.suggested, Rationales::default(), name.to_string(), output.meta)
            }
        },
    };

    if suggested.action.is_sized() && suggested.amount.is_none() {
        suggested.amount = size_from_meta(&suggested, &meta, obs);
    }
    if suggested.amount.is_none() {
        suggested.amount = infer_amount(suggested.action, acts);
    }
    if suggested.action == Action::Raise {
        let min = acts.find(Action::Raise).and_then(|a| a.min);
        if let (Some(given), Some(min)) = (suggested.amount, min) {
            if given < min {
                suggested.amount = Some(min);
                if !decided {
                    rationale.push((Code::FlMinReopenAdjusted, json!({ "given": given, "min": min })));
                }
            }
        }
    }
    rationale.prepend(warnings);

    if !acts.allows(suggested.action) {
        log::warn!("policy {} suggested illegal {} for {}", policy_name, suggested.action, obs.hand_id);
        let output = conservative(obs, acts, "illegal_action")?;
        suggested = output.suggested;
        meta = output.meta.clone();
        fallback = Some(output);
        if !acts.allows(suggested.action) {
            return Err(SuggestError::Illegal(suggested.action));
        }
    }
    for (key, value) in table.hint.iter() {
        meta.insert(key.clone(), value.clone());
    }
    if let Some(ref output) = fallback {
        for (key, value) in output.meta.iter() {
            meta.insert(key.clone(), value.clone());
        }
        rationale.extend(output.rationale.clone());
    }

    let limp = obs.street == Street::Pref
        && suggested.action == Action::Call
        && actor == obs.button
        && obs.to_call <= obs.bb;
    if limp {
        rationale.push(Code::PfLimpCompleteBlind);
    }

    let (suggested, clamped, bounds) = clamp_amount(suggested, acts);
    if let Some(bounds) = bounds {
        rationale.push((Code::WClamped, bounds));
    }

    meta.entry("policy_source").or_insert_with(|| json!("rule"));
    meta.entry("baseline").or_insert_with(|| json!("GTO"));
    meta.entry("mode").or_insert_with(|| json!("GTO"));
    meta.entry("facing_size_tag").or_insert_with(|| json!(obs.facing_size_tag.as_str()));
    if table.facing_fallback {
        meta.insert("facing_fallback".into(), json!(true));
    } else if meta.get("facing_fallback") == Some(&json!(false)) {
        meta.remove("facing_fallback");
    }
    if table.alias {
        meta.insert("facing_alias_applied".into(), json!(true));
    }
    let size = meta
        .get("size_tag")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from);
    match (obs.street, size) {
        (Street::Pref, None) => {
            meta.remove("size_tag");
        }
        (Street::Pref, Some(_)) => {}
        (_, size) => {
            let size = size
                .or_else(|| suggested.size_tag.filter(|_| suggested.action.is_sized()).map(|t| t.as_str().to_string()))
                .unwrap_or_else(|| String::from("na"));
            meta.insert("size_tag".into(), json!(size));
        }
    }
    meta.entry("node_key").or_insert_with(|| json!(node_key_from_observation(obs)));
    if fallback.is_some() {
        meta.insert("policy_source".into(), json!("fallback"));
        meta.insert("fallback_used".into(), json!(true));
    }
    meta.retain(|_, v| !v.is_null());

    let confidence = confidence(&rationale, &meta, &policy_name, obs.to_call, clamped);

    let mut debug = match ctx.config.debug {
        true => Some(debug_meta(obs, &bundle, &meta, &suggested, &table, v1, ctx)),
        false => None,
    };
    let policy_fallback = meta
        .get("policy_fallback")
        .and_then(Value::as_bool)
        .or(table.policy_fallback);
    if let Some(flag) = policy_fallback {
        let entry = debug.get_or_insert_with(Map::new);
        entry.insert("policy_fallback".into(), json!(flag));
        if let Some(facing) = meta.get("facing_fallback").and_then(Value::as_bool) {
            entry.insert("facing_fallback".into(), json!(facing));
        }
    }

    if v1 || ctx.config.debug {
        log::info!(
            "suggest_v1 hand={} policy={} street={} action={} amount={:?} size_tag={} class={} pot_type={} to_call_bb={:.2} pot_odds={:.3} source={} rule_path={} fallback={} confidence={:.2}",
            obs.hand_id,
            policy_name,
            obs.street,
            suggested.action,
            suggested.amount,
            meta.get("size_tag").and_then(Value::as_str).unwrap_or("-"),
            obs.hand_class,
            obs.pot_type,
            obs.to_call_bb(),
            pot_odds(obs.to_call, obs.pot_now),
            meta.get("policy_source").and_then(Value::as_str).unwrap_or("-"),
            meta.get("rule_path").and_then(Value::as_str).unwrap_or("-"),
            fallback.is_some(),
            confidence,
        );
    }

    let mut extras = Map::new();
    extras.insert("action".into(), json!(suggested.action.name()));
    if let Some(amount) = suggested.amount {
        extras.insert("amount".into(), json!(amount));
    }
    let mut taught = rationale.clone();
    if let Some(freq) = meta.get("frequency").and_then(|f| frequency(f, locale)) {
        meta.insert("frequency_value".into(), json!(freq.value));
        meta.insert("frequency_pct_text".into(), json!(freq.pct));
        meta.insert("frequency_label".into(), json!(freq.label));
        meta.insert("frequency_phrase".into(), json!(freq.phrase));
        taught.push((
            Code::MixFrequencyHint,
            json!({ "frequency_pct": freq.pct, "frequency_label": freq.label }),
        ));
    }
    taught.extend(river_items(obs, &meta, &suggested, locale));
    let explanations = render_explanations(taught.items(), &meta, &extras, locale, &bundle);

    Ok(Suggestion {
        hand_id: state.hand_id().to_string(),
        actor,
        suggested,
        rationale,
        policy: policy_name,
        confidence,
        meta,
        explanations,
        debug: debug.map(|meta| json!({ "meta": meta })),
    })
}

/// Diagnostics attached when the debug flag is on.
fn debug_meta(
    obs: &Observation,
    bundle: &Bundle,
    meta: &Map<String, Value>,
    suggested: &Suggested,
    table: &TableRead,
    v1: bool,
    ctx: &AdvisorContext,
) -> Map<String, Value> {
    let version = |label: &str| bundle.versions.get(label).copied().unwrap_or(0);
    let to_call_bb = obs.to_call_bb();
    let open_to_bb = match obs.street == Street::Pref && obs.to_call > 0 {
        true => Some(to_call_bb + 1.),
        false => None,
    };
    let reraise_to = suggested
        .amount
        .filter(|_| obs.street == Street::Pref && suggested.action == Action::Raise);
    let mut debug = Map::new();
    debug.insert("policy_version".into(), json!(if v1 { "v1" } else { "v0" }));
    debug.insert("table_mode".into(), json!(obs.table_mode));
    debug.insert("spr_bucket".into(), json!(obs.spr_bucket.as_str()));
    debug.insert("board_texture".into(), json!(obs.board_texture.as_str()));
    debug.insert("pot_type".into(), json!(obs.pot_type.as_str()));
    debug.insert("rollout_pct".into(), json!(ctx.config.rollout_pct));
    debug.insert("rolled_to_v1".into(), json!(v1));
    debug.insert(
        "config_versions".into(),
        json!({ "open": version("open"), "vs": version("vs"), "modes": version("modes") }),
    );
    debug.insert("config_profile".into(), json!(bundle.source));
    debug.insert("strategy".into(), json!(bundle.profile.as_str()));
    debug.insert("to_call_bb".into(), json!(to_call_bb));
    debug.insert("open_to_bb".into(), json!(open_to_bb));
    debug.insert("pot_odds".into(), json!((pot_odds(obs.to_call, obs.pot_now) * 1e6).round() / 1e6));
    debug.insert("reraise_to_amount".into(), json!(reraise_to));
    for key in ["reraise_to_bb", "fourbet_to_bb", "cap_bb", "bucket", "rule_path", "node_key", "mix"] {
        if let Some(value) = meta.get(key) {
            debug.insert(key.into(), value.clone());
        }
    }
    debug.insert("role".into(), json!(obs.role.as_str()));
    debug.insert("range_adv".into(), json!(obs.range_adv));
    debug.insert("nut_adv".into(), json!(obs.nut_adv));
    debug.insert("facing_size_tag".into(), json!(obs.facing_size_tag.as_str()));
    if meta.get("facing_fallback").and_then(Value::as_bool) == Some(true) {
        debug.insert("facing_fallback".into(), json!(true));
    }
    if !table.attempted.is_empty() {
        debug.insert("attempted_keys".into(), json!(table.attempted));
    }
    if table.alias {
        debug.insert("facing_alias_applied".into(), json!(true));
    }
    debug.retain(|_, v| !v.is_null());
    debug
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advisor::metrics::Counters;
    use crate::cards::Bitwise;
    use crate::cards::Card;
    use crate::gameplay::SessionConfig;
    use std::path::PathBuf;

    fn hand(id: &str, hero: &str, villain: &str) -> HandState {
        HandState::start(&SessionConfig::default(), "s", id, 0, Some(3))
            .unwrap()
            .with_cards([Card::parse(hero).unwrap(), Card::parse(villain).unwrap()], Card::parse("Ks8d3c5h9s").unwrap())
    }

    fn node_key(state: &HandState, ctx: &AdvisorContext) -> String {
        let (obs, _) = Observation::build(state, state.to_act(), &state.legal(), ctx.bundle(), &Bitwise);
        node_key_from_observation(&obs)
    }

    fn artifact(name: &str, body: Value) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("headsup-{}-{}", name, std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("policy.json");
        std::fs::write(&path, body.to_string()).unwrap();
        path
    }

    /// turn and terminal violations are refused
    #[test]
    fn refuses_out_of_turn() {
        let ctx = AdvisorContext::default();
        let state = hand("h1", "AsAd", "7c2d");
        assert_eq!(
            build_suggestion(&state, 1, &ctx),
            Err(SuggestError::NotYourTurn { actor: 1, to_act: 0 })
        );
        let folded = state.try_apply(Action::Fold, None).unwrap();
        assert_eq!(build_suggestion(&folded, 0, &ctx), Err(SuggestError::HandComplete));
    }

    /// the button opens its range with a blind-multiple raise
    #[test]
    fn preflop_open() {
        let ctx = AdvisorContext::default();
        let state = hand("h2", "AsAd", "7c2d");
        let s = build_suggestion(&state, 0, &ctx).unwrap();
        assert_eq!(s.policy, "preflop_v1");
        assert_eq!(s.suggested.action, Action::Raise);
        assert_eq!(s.suggested.amount, Some(5));
        assert!(s.rationale.contains(Code::PfOpenRangeHit));
        assert_eq!(s.meta["baseline"], "GTO");
        assert_eq!(s.meta["policy_source"], "rule");
        assert!(s.meta.get("size_tag").is_none());
        assert!(s.meta.contains_key("node_key"));
        assert!((s.confidence - crate::CONFIDENCE_MAX).abs() < 1e-9);
        assert!(!s.explanations.is_empty());
        assert!(s.debug.is_none());
    }

    /// version selection follows the configured generation and rollout
    #[test]
    fn version_selection() {
        let v0 = AdvisorContext::new(AdvisorConfig {
            version: PolicyVersion::V0,
            ..AdvisorConfig::default()
        });
        let state = hand("h3", "AsAd", "7c2d");
        assert_eq!(build_suggestion(&state, 0, &v0).unwrap().policy, "preflop_v0");
        let none = AdvisorContext::new(AdvisorConfig {
            version: PolicyVersion::Auto,
            rollout_pct: 0,
            ..AdvisorConfig::default()
        });
        assert_eq!(build_suggestion(&state, 0, &none).unwrap().policy, "preflop_v0");
        let all = AdvisorContext::new(AdvisorConfig {
            version: PolicyVersion::Auto,
            rollout_pct: 100,
            ..AdvisorConfig::default()
        });
        assert_eq!(build_suggestion(&state, 0, &all).unwrap().policy, "preflop_v1");
    }

    /// a matching table row answers with its heaviest legal action
    #[test]
    fn table_hit() {
        let state = hand("h4", "7h2c", "AsAd");
        let probe = AdvisorContext::default();
        let ref key = node_key(&state, &probe);
        let path = artifact(
            "hit",
            json!({
                "node_keys": [key],
                "actions": [["fold", "call", "raise"]],
                "weights": [[1, 2, 7]],
                "table_meta": {"version": "t1", "policy_hash": "h"}
            }),
        );
        let ctx = AdvisorContext::new(AdvisorConfig {
            policy_path: Some(path),
            ..AdvisorConfig::default()
        });
        let s = build_suggestion(&state, 0, &ctx).unwrap();
        assert_eq!(s.policy, "preflop_v1_table");
        assert_eq!(s.suggested.action, Action::Raise);
        assert_eq!(s.suggested.amount, Some(4));
        assert_eq!(s.meta["policy_source"], "policy");
        assert_eq!(s.meta["policy_version"], "t1");
        assert!((s.meta["policy_weight"].as_f64().unwrap() - 0.7).abs() < 1e-9);
        assert_eq!(s.meta["node_key"], json!(key));
        assert_eq!(s.debug.unwrap()["meta"]["policy_fallback"], false);
    }

    /// an unusable row falls back to the rules and says so
    #[test]
    fn table_unusable() {
        let state = hand("h5", "AsAd", "7c2d");
        let probe = AdvisorContext::default();
        let ref key = node_key(&state, &probe);
        let path = artifact(
            "unusable",
            json!({
                "node_keys": [key],
                "actions": [["check", "bet"]],
                "weights": [[1, 1]],
                "table_meta": {"version": "t2"}
            }),
        );
        let ctx = AdvisorContext::new(AdvisorConfig {
            policy_path: Some(path),
            ..AdvisorConfig::default()
        });
        let s = build_suggestion(&state, 0, &ctx).unwrap();
        assert_eq!(s.policy, "preflop_v1");
        assert_eq!(s.meta["policy_source"], "rule");
        assert_eq!(s.meta["policy_fallback"], true);
        assert_eq!(s.meta["policy_version"], "t2");
        assert!(s.meta.get("facing_fallback").is_none());
    }

    /// a missing table counts a miss and serves the rules
    #[test]
    fn table_miss() {
        let _ = env_logger::builder().is_test(true).try_init();
        let counters = Arc::new(Counters::default());
        let ctx = AdvisorContext::with_metrics(
            AdvisorConfig {
                policy_path: Some(std::env::temp_dir().join("headsup-no-such-table.json")),
                debug: true,
                ..AdvisorConfig::default()
            },
            counters.clone(),
        );
        let state = hand("h6", "AsAd", "7c2d");
        let s = build_suggestion(&state, 0, &ctx).unwrap();
        assert_eq!(s.policy, "preflop_v1");
        assert_eq!(s.meta["policy_fallback"], true);
        assert_eq!(s.meta["facing_fallback"], true);
        assert!(counters.get("policy_lookup_miss") >= 1);
        assert_eq!(counters.get("policy_fallback"), 1);
        let debug = s.debug.unwrap();
        assert_eq!(debug["meta"]["policy_version"], "v1");
        assert_eq!(debug["meta"]["policy_fallback"], true);
        assert!(!debug["meta"]["attempted_keys"].as_array().unwrap().is_empty());
    }

    /// postflop checks carry the size placeholder
    #[test]
    fn postflop_meta() {
        let ctx = AdvisorContext::default();
        let state = hand("h7", "7h2c", "9d4c")
            .try_apply(Action::Call, None)
            .and_then(|s| s.try_apply(Action::Check, None))
            .unwrap();
        let s = build_suggestion(&state, state.to_act(), &ctx).unwrap();
        assert_eq!(s.policy, "flop_v1");
        assert!(s.meta["size_tag"].is_string());
        if !s.suggested.action.is_sized() {
            assert_eq!(s.meta["size_tag"], "na");
        }
        assert_eq!(s.meta["mode"], "GTO");
    }

    /// river answers carry the tier summary
    #[test]
    fn river_teaching() {
        let ctx = AdvisorContext::default();
        let mut state = hand("h8", "Kh8c", "7d2c");
        for action in [Action::Call, Action::Check, Action::Check, Action::Check, Action::Check, Action::Check] {
            state = state.try_apply(action, None).unwrap();
        }
        assert_eq!(state.street(), Some(Street::Rive));
        let s = build_suggestion(&state, state.to_act(), &ctx).unwrap();
        assert_eq!(s.policy, "river_v1");
        let obs = Observation::build(&state, state.to_act(), &state.legal(), ctx.bundle(), &Bitwise).0;
        let items = river_items(&obs, &s.meta, &s.suggested, Locale::En);
        assert_eq!(items[0].code, Code::RiverValueTierSummary);
        assert!(s.explanations.len() > s.rationale.len());
    }

    /// frequencies parse from numbers, percents and fractions
    #[test]
    fn frequency_forms() {
        assert_eq!(parse_frequency(&json!(0.35)), Some(0.35));
        assert_eq!(parse_frequency(&json!("35%")), Some(0.35));
        assert_eq!(parse_frequency(&json!(" 1/4 ")), Some(0.25));
        assert_eq!(parse_frequency(&json!("70")), Some(0.7));
        assert_eq!(parse_frequency(&json!(3)), Some(1.));
        assert_eq!(parse_frequency(&json!("1/0")), None);
        assert_eq!(parse_frequency(&json!(true)), None);
        let tiny = frequency(&json!(0.004), Locale::En).unwrap();
        assert_eq!(tiny.pct, "<1%");
        assert_eq!(tiny.label, "rarely");
        let half = frequency(&json!(0.5), Locale::En).unwrap();
        assert_eq!(half.label, "about half the time");
        assert_eq!(half.phrase, "mixed strategy sample (~50%)");
    }

    /// confidence rewards range hits and is bounded
    #[test]
    fn confidence_bounds() {
        let ref empty = Map::new();
        let mut hits = Rationales::default();
        hits.push(Code::PfOpenRangeHit);
        assert_eq!(confidence(&hits, empty, "preflop_v1", 0, false), crate::CONFIDENCE_MAX);
        assert_eq!(confidence(&Rationales::default(), empty, "x", 0, true), crate::CONFIDENCE_BASE);
        let mut meta = Map::new();
        meta.insert("size_tag".into(), json!("third"));
        meta.insert("plan".into(), json!("bet small"));
        assert!((confidence(&Rationales::default(), &meta, "flop_v1", 0, false) - 0.6).abs() < 1e-9);
        hits.push(Code::CfgFallbackUsed);
        assert!((confidence(&hits, empty, "preflop_v1", 0, true) - 0.8).abs() < 1e-9);
    }

    /// unsized actions read their chips off the legal set
    #[test]
    fn inferred_amounts() {
        let acts = vec![LegalAction::fold(), LegalAction::call(4), LegalAction::raise(8, 200), LegalAction::allin(200)];
        assert_eq!(infer_amount(Action::Call, &acts), Some(4));
        assert_eq!(infer_amount(Action::Raise, &acts), Some(8));
        assert_eq!(infer_amount(Action::Allin, &acts), Some(200));
        assert_eq!(infer_amount(Action::Fold, &acts), None);
        assert_eq!(infer_amount(Action::Bet, &acts), None);
    }
}
