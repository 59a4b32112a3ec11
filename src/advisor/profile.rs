use super::config::Strategy;
use crate::cards::Rank;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::path::Path;
use std::path::PathBuf;
use std::sync::RwLock;
use std::time::Duration;
use std::time::Instant;
use std::time::SystemTime;

/// Shortest TTL the store will honour.
const MIN_TTL_SECS: u64 = 5;

/// Profile blobs compiled into the binary, keyed by store name.
fn builtin(name: &str) -> Option<&'static str> {
    match name {
        "table_modes_loose" => Some(include_str!("../../profiles/table_modes_loose.json")),
        "table_modes_medium" => Some(include_str!("../../profiles/table_modes_medium.json")),
        "table_modes_tight" => Some(include_str!("../../profiles/table_modes_tight.json")),
        "ranges/preflop_open_HU_loose" => Some(include_str!("../../profiles/ranges/preflop_open_HU_loose.json")),
        "ranges/preflop_open_HU_medium" => Some(include_str!("../../profiles/ranges/preflop_open_HU_medium.json")),
        "ranges/preflop_open_HU_tight" => Some(include_str!("../../profiles/ranges/preflop_open_HU_tight.json")),
        "ranges/preflop_vs_raise_HU_loose" => Some(include_str!("../../profiles/ranges/preflop_vs_raise_HU_loose.json")),
        "ranges/preflop_vs_raise_HU_medium" => Some(include_str!("../../profiles/ranges/preflop_vs_raise_HU_medium.json")),
        "ranges/preflop_vs_raise_HU_tight" => Some(include_str!("../../profiles/ranges/preflop_vs_raise_HU_tight.json")),
        "postflop/flop_rules_HU_medium" => Some(include_str!("../../profiles/postflop/flop_rules_HU_medium.json")),
        "postflop/turn_rules_HU_medium" => Some(include_str!("../../profiles/postflop/turn_rules_HU_medium.json")),
        "postflop/river_rules_HU_medium" => Some(include_str!("../../profiles/postflop/river_rules_HU_medium.json")),
        "preflop_vs_shove_HU" => Some(include_str!("../../profiles/preflop_vs_shove_HU.json")),
        "defense_thresholds" => Some(include_str!("../../profiles/defense_thresholds.json")),
        "river_defense" => Some(include_str!("../../profiles/river_defense.json")),
        "size_map" => Some(include_str!("../../profiles/size_map.json")),
        "explanations_en" => Some(include_str!("../../profiles/explanations_en.json")),
        "explanations_zh" => Some(include_str!("../../profiles/explanations_zh.json")),
        _ => None,
    }
}

#[derive(Debug, Clone)]
struct Cached {
    value: Option<Value>,
    version: u64,
    expires: Instant,
    mtime: Option<SystemTime>,
}

/// Named JSON blobs read from a profile directory with a TTL cache.
///
/// `load(name)` reads `<root>/<name>.json`. The version of a disk blob is
/// its mtime in seconds. When the directory lacks a file, or no directory
/// is configured, the compiled-in copy is served with version 0. A file
/// that turns unreadable or malformed keeps serving its last good value
/// until the TTL runs out.
#[derive(Debug)]
pub struct ConfigStore {
    root: Option<PathBuf>,
    ttl: Duration,
    cache: RwLock<BTreeMap<String, Cached>>,
}

impl ConfigStore {
    pub fn new(root: Option<PathBuf>, ttl_secs: u64) -> Self {
        Self {
            root,
            ttl: Duration::from_secs(ttl_secs.max(MIN_TTL_SECS)),
            cache: RwLock::new(BTreeMap::new()),
        }
    }
    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }
    /// Disk first, then the compiled-in copy.
    pub fn load(&self, name: &str) -> Option<(Value, u64)> {
        self.disk(name).or_else(|| {
            builtin(name)
                .and_then(|text| serde_json::from_str::<Value>(text).ok())
                .map(|value| (value, 0))
        })
    }
    /// Drops every cached blob.
    pub fn invalidate(&self) {
        if let Ok(mut cache) = self.cache.write() {
            cache.clear();
        }
    }
    fn disk(&self, name: &str) -> Option<(Value, u64)> {
        let ref path = self.root.as_ref()?.join(format!("{}.json", name));
        let now = Instant::now();
        let mtime = std::fs::metadata(path).and_then(|m| m.modified()).ok();
        let prior = self.cache.read().ok().and_then(|c| c.get(name).cloned());
        let fresh = prior.as_ref().filter(|c| now < c.expires);
        if let Some(hit) = fresh.filter(|c| mtime.is_none() || c.mtime == mtime) {
            return hit.value.clone().map(|v| (v, hit.version));
        }
        let parsed = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("read {}: {}", path.display(), e))
            .and_then(|text| {
                serde_json::from_str::<Value>(&text).map_err(|e| anyhow::anyhow!("parse {}: {}", path.display(), e))
            });
        match parsed {
            Ok(value) => {
                let version = mtime
                    .and_then(|t| t.duration_since(std::time::UNIX_EPOCH).ok())
                    .map(|d| d.as_secs())
                    .unwrap_or(0);
                log::debug!("loaded profile blob {} version {}", name, version);
                self.remember(name, Some(value.clone()), version, mtime);
                Some((value, version))
            }
            Err(e) if mtime.is_none() => {
                log::trace!("{}", e);
                let keep = fresh.and_then(|c| c.value.clone().map(|v| (v, c.version)));
                if keep.is_none() {
                    self.remember(name, None, 0, None);
                }
                keep
            }
            Err(e) => {
                log::warn!("{}", e);
                fresh.and_then(|c| c.value.clone().map(|v| (v, c.version)))
            }
        }
    }
    fn remember(&self, name: &str, value: Option<Value>, version: u64, mtime: Option<SystemTime>) {
        if let Ok(mut cache) = self.cache.write() {
            cache.insert(
                name.to_string(),
                Cached {
                    value,
                    version,
                    expires: Instant::now() + self.ttl,
                    mtime,
                },
            );
        }
    }
}

/// Per-table-mode numeric knobs.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Modes {
    pub open_bb: f64,
    pub defend_threshold_ip: f64,
    pub defend_threshold_oop: f64,
    pub reraise_ip_mult: f64,
    pub reraise_oop_mult: f64,
    pub reraise_oop_offset: f64,
    pub cap_ratio: f64,
    pub fourbet_ip_mult: f64,
    pub cap_ratio_4b: Option<f64>,
    pub threebet_bucket_small_le: f64,
    pub threebet_bucket_mid_le: f64,
    pub flop_facing_small_le: f64,
    pub flop_facing_mid_le: f64,
    pub postflop_cap_ratio: f64,
}

impl Default for Modes {
    fn default() -> Self {
        Self {
            open_bb: 2.5,
            defend_threshold_ip: 0.42,
            defend_threshold_oop: 0.38,
            reraise_ip_mult: 3.0,
            reraise_oop_mult: 3.5,
            reraise_oop_offset: 0.5,
            cap_ratio: 0.9,
            fourbet_ip_mult: 2.2,
            cap_ratio_4b: None,
            threebet_bucket_small_le: 9.,
            threebet_bucket_mid_le: 11.,
            flop_facing_small_le: crate::FACING_THIRD,
            flop_facing_mid_le: crate::FACING_HALF,
            postflop_cap_ratio: crate::POSTFLOP_CAP_RATIO,
        }
    }
}

fn combos<'de, D>(de: D) -> Result<BTreeSet<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Vec::<String>::deserialize(de).map(|items| expand_range(&items))
}

/// Opening sets by seat.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct OpenRanges {
    #[serde(rename = "SB", default, deserialize_with = "combos")]
    pub sb: BTreeSet<String>,
    #[serde(rename = "BB", default, deserialize_with = "combos")]
    pub bb: BTreeSet<String>,
}

/// Continue sets for one price bucket. `raise` reads `reraise` or `fourbet`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Lines {
    #[serde(default, deserialize_with = "combos")]
    pub call: BTreeSet<String>,
    #[serde(default, alias = "reraise", alias = "fourbet", deserialize_with = "combos")]
    pub raise: BTreeSet<String>,
}

/// Responses to a raise, keyed by bucket (`small`, `mid`, `large`).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct VsRaise {
    #[serde(rename = "BB_vs_SB", default)]
    pub bb_vs_sb: BTreeMap<String, Lines>,
    #[serde(rename = "SB_vs_BB_3bet", default)]
    pub sb_vs_3bet: BTreeMap<String, Lines>,
}

/// One stack-depth band of the shove-calling table.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ShoveBand {
    #[serde(default, deserialize_with = "combos")]
    pub call: BTreeSet<String>,
    #[serde(default, deserialize_with = "combos")]
    pub mix: BTreeSet<String>,
    #[serde(default)]
    pub mix_map: BTreeMap<String, f64>,
}

/// Calling ranges against a preflop shove, banded `le12`, `13to20`, `gt20`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ShoveTable {
    #[serde(default = "ShoveTable::default_min_bb")]
    pub min_bb: f64,
    #[serde(default = "ShoveTable::default_mix_freq")]
    pub mix_freq: f64,
    #[serde(flatten)]
    pub bands: BTreeMap<String, ShoveBand>,
}

impl ShoveTable {
    fn default_min_bb() -> f64 {
        crate::VS_SHOVE_MIN_BB
    }
    fn default_mix_freq() -> f64 {
        0.5
    }
}

impl Default for ShoveTable {
    fn default() -> Self {
        Self {
            min_bb: Self::default_min_bb(),
            mix_freq: Self::default_mix_freq(),
            bands: BTreeMap::new(),
        }
    }
}

/// Everything a decision reads from the profile, loaded together.
///
/// Built once per request from the [`ConfigStore`]. Blobs missing from
/// both the directory and the compiled-in set are recorded in `missing`
/// and fall back to empty tables.
#[derive(Debug, Clone, Default)]
pub struct Bundle {
    pub profile: Strategy,
    pub table_mode: String,
    pub source: String,
    pub modes: Modes,
    pub open: Option<OpenRanges>,
    pub vs: Option<VsRaise>,
    pub shove: ShoveTable,
    pub flop: Value,
    pub turn: Value,
    pub river: Value,
    pub defense: Value,
    pub sizes: BTreeMap<String, f64>,
    pub explanations: BTreeMap<String, BTreeMap<String, String>>,
    pub versions: BTreeMap<String, u64>,
    pub missing: BTreeSet<String>,
}

impl Bundle {
    /// Compiled-in profile with no directory.
    pub fn builtin(profile: Strategy) -> Self {
        Self::load(&ConfigStore::new(None, crate::CONFIG_TTL_SECS), profile, "HU")
    }
    pub fn load(store: &ConfigStore, profile: Strategy, table_mode: &str) -> Self {
        let p = profile.as_str();
        let mut bundle = Self {
            profile,
            table_mode: table_mode.to_string(),
            source: store
                .root()
                .map(|r| r.display().to_string())
                .unwrap_or_else(|| "builtin".to_string()),
            ..Self::default()
        };
        let modes = bundle.fetch(store, &format!("table_modes_{}", p), "modes");
        bundle.modes = modes
            .as_ref()
            .and_then(|v| v.get(table_mode))
            .and_then(|v| Modes::deserialize(v).map_err(|e| log::warn!("table modes {}: {}", table_mode, e)).ok())
            .unwrap_or_default();
        bundle.open = bundle
            .fetch(store, &format!("ranges/preflop_open_{}_{}", table_mode, p), "open")
            .and_then(|v| OpenRanges::deserialize(&v).map_err(|e| log::warn!("open ranges: {}", e)).ok());
        bundle.vs = bundle
            .fetch(store, &format!("ranges/preflop_vs_raise_{}_{}", table_mode, p), "vs")
            .and_then(|v| VsRaise::deserialize(&v).map_err(|e| log::warn!("vs raise: {}", e)).ok());
        bundle.shove = bundle
            .fetch(store, &format!("preflop_vs_shove_{}", table_mode), "vs_shove")
            .and_then(|v| ShoveTable::deserialize(&v).map_err(|e| log::warn!("vs shove: {}", e)).ok())
            .unwrap_or_default();
        for street in ["flop", "turn", "river"] {
            let tree = bundle
                .fetch_profiled(store, &format!("postflop/{}_rules_{}", street, table_mode), p, street)
                .unwrap_or(Value::Null);
            match street {
                "flop" => bundle.flop = tree,
                "turn" => bundle.turn = tree,
                _ => bundle.river = tree,
            }
        }
        let mut defense = bundle.fetch(store, "defense_thresholds", "defense").unwrap_or(Value::Null);
        if let Some(river) = bundle.fetch(store, "river_defense", "river_defense") {
            if !defense.is_object() {
                defense = Value::Object(Default::default());
            }
            if let Some(map) = defense.as_object_mut() {
                map.insert("river".to_string(), river);
            }
        }
        bundle.defense = defense;
        bundle.sizes = bundle
            .fetch(store, "size_map", "size_map")
            .and_then(|v| serde_json::from_value(v).ok())
            .unwrap_or_default();
        for locale in ["en", "zh"] {
            if let Some(table) = bundle
                .fetch(store, &format!("explanations_{}", locale), &format!("explanations_{}", locale))
                .and_then(|v| serde_json::from_value::<BTreeMap<String, String>>(v).ok())
            {
                bundle.explanations.insert(locale.to_string(), table);
            }
        }
        bundle
    }
    fn fetch(&mut self, store: &ConfigStore, name: &str, label: &str) -> Option<Value> {
        match store.load(name) {
            Some((value, version)) => {
                self.versions.insert(label.to_string(), version);
                Some(value)
            }
            None => {
                log::warn!("profile blob {} unavailable", name);
                self.missing.insert(label.to_string());
                None
            }
        }
    }
    /// The profile's own blob, else the medium one.
    fn fetch_profiled(&mut self, store: &ConfigStore, stem: &str, profile: &str, label: &str) -> Option<Value> {
        store
            .load(&format!("{}_{}", stem, profile))
            .or_else(|| store.load(&format!("{}_medium", stem)))
            .map(|(value, version)| {
                self.versions.insert(label.to_string(), version);
                value
            })
            .or_else(|| {
                log::warn!("rule tree {} unavailable", stem);
                self.missing.insert(label.to_string());
                None
            })
    }
}

/// Read-side helpers.
impl Bundle {
    /// Pot fraction for a size tag, preferring the profile's size map.
    pub fn fraction(&self, tag: super::calculators::SizeTag) -> f64 {
        self.sizes.get(tag.as_str()).copied().unwrap_or_else(|| tag.fraction())
    }
    /// Explanation template for a code, falling back to English.
    pub fn template(&self, locale: &str, code: &str) -> Option<&str> {
        self.explanations
            .get(locale)
            .and_then(|t| t.get(code))
            .or_else(|| self.explanations.get("en").and_then(|t| t.get(code)))
            .map(String::as_str)
    }
    pub fn rules(&self, street: crate::cards::Street) -> &Value {
        match street {
            crate::cards::Street::Flop => &self.flop,
            crate::cards::Street::Turn => &self.turn,
            _ => &self.river,
        }
    }
    pub fn is_degraded(&self) -> bool {
        !self.missing.is_empty()
    }
}

/// Expands range shorthand into individual grid combos.
///
/// Accepts pairs (`77`, `22+`), suited and offsuit hands (`AKs`, `A2s+`,
/// `KTo+`) and bare two-rank hands (`AK`, both suited and offsuit).
/// A `+` walks the lower rank up to just below the higher one.
pub fn expand_range(items: &[String]) -> BTreeSet<String> {
    items
        .iter()
        .flat_map(|s| s.split(','))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .flat_map(|token| {
            expand(token).unwrap_or_else(|| {
                log::warn!("bad range token {}", token);
                Vec::new()
            })
        })
        .collect()
}

fn expand(token: &str) -> Option<Vec<String>> {
    let plus = token.ends_with('+');
    let body = token.trim_end_matches('+');
    let rank = |c: &char| Rank::try_from(c.to_string().as_str()).ok();
    let chars = body.chars().collect::<Vec<_>>();
    match chars.as_slice() {
        [a, b] if a.eq_ignore_ascii_case(b) => {
            let r = rank(a)?;
            let pairs = Rank::all()
                .into_iter()
                .filter(|x| if plus { *x >= r } else { *x == r })
                .map(|x| format!("{}{}", x, x))
                .collect();
            Some(pairs)
        }
        [a, b] => {
            let suited = expand(&format!("{}{}s{}", a, b, if plus { "+" } else { "" }))?;
            let offsuit = expand(&format!("{}{}o{}", a, b, if plus { "+" } else { "" }))?;
            Some(suited.into_iter().chain(offsuit).collect())
        }
        [a, b, kind] if matches!(kind.to_ascii_lowercase(), 's' | 'o') => {
            let (x, y) = (rank(a)?, rank(b)?);
            let (hi, lo) = if x > y { (x, y) } else { (y, x) };
            if hi == lo {
                return None;
            }
            let kind = kind.to_ascii_lowercase();
            let combos = Rank::all()
                .into_iter()
                .filter(|r| if plus { *r >= lo && *r < hi } else { *r == lo })
                .map(|r| format!("{}{}{}", hi, r, kind))
                .collect();
            Some(combos)
        }
        _ => None,
    }
}

/// Outcome of checking a profile directory.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct ValidationReport {
    pub root: String,
    pub ok: bool,
    pub status: BTreeMap<String, String>,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub versions: BTreeMap<String, u64>,
    pub counts: BTreeMap<String, usize>,
}

impl ValidationReport {
    fn read(&mut self, root: &Path, name: &str) -> Option<Value> {
        let ref path = root.join(format!("{}.json", name));
        if !path.exists() {
            self.status.insert(name.to_string(), "missing".to_string());
            self.warnings.push(format!("{}: missing, built-in copy applies", name));
            return None;
        }
        let version = std::fs::metadata(path)
            .and_then(|m| m.modified())
            .ok()
            .and_then(|t| t.duration_since(std::time::UNIX_EPOCH).ok())
            .map(|d| d.as_secs())
            .unwrap_or(0);
        let parsed = std::fs::read_to_string(path)
            .map_err(|e| e.to_string())
            .and_then(|text| serde_json::from_str::<Value>(&text).map_err(|e| e.to_string()));
        match parsed {
            Ok(value) => {
                self.status.insert(name.to_string(), "ok".to_string());
                self.versions.insert(name.to_string(), version);
                Some(value)
            }
            Err(e) => {
                self.status.insert(name.to_string(), format!("error: {}", e));
                self.errors.push(format!("{}: {}", name, e));
                None
            }
        }
    }
    fn require(&mut self, name: &str, path: &str, found: bool) {
        if !found {
            self.errors.push(format!("{}: {} missing or wrong type", name, path));
        }
    }
}

/// Checks that every profile in `root` carries the keys decisions rely on.
///
/// Missing files are warnings, since built-in copies stand in for them.
/// Unparseable files and missing keys are errors.
pub fn validate_profile_dir(root: &Path) -> ValidationReport {
    let mut report = ValidationReport {
        root: root.display().to_string(),
        ..ValidationReport::default()
    };
    if !root.is_dir() {
        report.errors.push(format!("{} is not a directory", root.display()));
        return report;
    }
    for profile in Strategy::all() {
        let p = profile.as_str();
        let ref name = format!("table_modes_{}", p);
        if let Some(modes) = report.read(root, name) {
            for key in ["open_bb", "defend_threshold_ip", "defend_threshold_oop"] {
                let found = modes.pointer(&format!("/HU/{}", key)).is_some_and(Value::is_number);
                report.require(name, &format!("HU.{}", key), found);
            }
        }
        let ref name = format!("ranges/preflop_open_HU_{}", p);
        if let Some(open) = report.read(root, name) {
            let sb = open.get("SB").and_then(Value::as_array);
            report.require(name, "SB", sb.is_some());
            if let Some(list) = sb {
                let items = list.iter().filter_map(Value::as_str).map(String::from).collect::<Vec<_>>();
                report.counts.insert(format!("{}.SB", name), expand_range(&items).len());
            }
        }
        let ref name = format!("ranges/preflop_vs_raise_HU_{}", p);
        if let Some(vs) = report.read(root, name) {
            for bucket in ["small", "mid", "large"] {
                for line in ["call", "reraise"] {
                    let ref path = format!("/BB_vs_SB/{}/{}", bucket, line);
                    let found = vs.pointer(path).is_some_and(Value::is_array);
                    report.require(name, &format!("BB_vs_SB.{}.{}", bucket, line), found);
                }
            }
        }
    }
    for name in ["preflop_vs_shove_HU", "defense_thresholds", "river_defense", "size_map"] {
        report.read(root, name);
    }
    report.ok = report.errors.is_empty();
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn scratch(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("headsup-profile-{}-{}", tag, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(dir.join("ranges")).unwrap();
        dir
    }

    /// shorthand expands to the expected grid entries
    #[test]
    fn range_shorthand() {
        let set = expand_range(&strings(&["TT+", "A9s+", "KQo", "T8o+"]));
        for combo in ["TT", "AA", "A9s", "AKs", "KQo", "T8o", "T9o"] {
            assert!(set.contains(combo), "{}", combo);
        }
        assert!(!set.contains("99"));
        assert!(!set.contains("A8s"));
        assert!(!set.contains("TTo"));
        assert_eq!(expand_range(&strings(&["22+"])).len(), 13);
        assert_eq!(expand_range(&strings(&["AK"])).len(), 2);
        assert!(expand_range(&strings(&["zz"])).is_empty());
    }

    /// the compiled-in profile loads completely
    #[test]
    fn builtin_bundle() {
        let bundle = Bundle::builtin(Strategy::Medium);
        assert!(!bundle.is_degraded(), "{:?}", bundle.missing);
        assert_eq!(bundle.source, "builtin");
        assert_eq!(bundle.modes.open_bb, 2.5);
        assert!(bundle.open.as_ref().unwrap().sb.contains("AKo"));
        let vs = bundle.vs.as_ref().unwrap();
        assert!(vs.bb_vs_sb["large"].raise.contains("AKo"));
        assert!(vs.sb_vs_3bet["small"].raise.contains("QQ"));
        assert!(bundle.shove.bands["gt20"].call.contains("AKo"));
        assert!(bundle.flop.get("single_raised").is_some());
        assert!(bundle.defense.get("river").is_some());
        assert!(bundle.template("zh", "PF_FOLD").is_some());
        assert_eq!(bundle.versions["modes"], 0);
    }

    /// loose and tight profiles borrow the medium rule trees
    #[test]
    fn rule_trees_fall_back_to_medium() {
        let bundle = Bundle::builtin(Strategy::Tight);
        assert!(bundle.turn.get("single_raised").is_some());
        assert_eq!(bundle.modes.open_bb, 3.0);
    }

    /// directory files shadow built-ins and carry their mtime version
    #[test]
    fn disk_overrides_builtin() {
        let dir = scratch("disk");
        std::fs::write(dir.join("size_map.json"), r#"{"third":0.25}"#).unwrap();
        let store = ConfigStore::new(Some(dir.clone()), 60);
        let (value, version) = store.load("size_map").unwrap();
        assert_eq!(value["third"], 0.25);
        assert!(version > 0);
        let (_, version) = store.load("river_defense").unwrap();
        assert_eq!(version, 0);
        std::fs::remove_dir_all(dir).unwrap();
    }

    /// a file that turns malformed keeps its last good value
    #[test]
    fn malformed_keeps_last_good() {
        let dir = scratch("bad");
        let ref path = dir.join("size_map.json");
        std::fs::write(path, r#"{"half":0.4}"#).unwrap();
        let store = ConfigStore::new(Some(dir.clone()), 60);
        assert_eq!(store.load("size_map").unwrap().0["half"], 0.4);
        std::thread::sleep(Duration::from_millis(1100));
        std::fs::write(path, "{not json").unwrap();
        assert_eq!(store.load("size_map").unwrap().0["half"], 0.4);
        std::fs::remove_dir_all(dir).unwrap();
    }

    /// validation flags missing keys and tolerates missing files
    #[test]
    fn validation_report() {
        let dir = scratch("validate");
        std::fs::write(dir.join("table_modes_medium.json"), r#"{"HU":{"open_bb":2.5,"defend_threshold_ip":0.4}}"#).unwrap();
        std::fs::write(dir.join("ranges/preflop_open_HU_medium.json"), r#"{"SB":["22+"]}"#).unwrap();
        let report = validate_profile_dir(&dir);
        assert!(!report.ok);
        assert!(report.errors.iter().any(|e| e.contains("defend_threshold_oop")));
        assert_eq!(report.status["table_modes_medium"], "ok");
        assert_eq!(report.status["table_modes_loose"], "missing");
        assert_eq!(report.counts["ranges/preflop_open_HU_medium.SB"], 13);
        std::fs::remove_dir_all(dir).unwrap();
    }

    /// the shipped profiles validate cleanly
    #[test]
    fn shipped_profiles_validate() {
        let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("profiles");
        let report = validate_profile_dir(&root);
        assert!(report.ok, "{:?}", report.errors);
        assert!(report.warnings.is_empty(), "{:?}", report.warnings);
    }
}
