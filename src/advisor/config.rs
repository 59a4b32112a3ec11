use crate::cards::EvaluatorKind;
use crate::ENV_PREFIX;
use const_format::concatcp;
use std::path::PathBuf;

const ENV_STRATEGY: &str = concatcp!(ENV_PREFIX, "STRATEGY");
const ENV_VERSION: &str = concatcp!(ENV_PREFIX, "POLICY_VERSION");
const ENV_ROLLOUT: &str = concatcp!(ENV_PREFIX, "V1_ROLLOUT_PCT");
const ENV_MIXING: &str = concatcp!(ENV_PREFIX, "MIXING");
const ENV_DEBUG: &str = concatcp!(ENV_PREFIX, "DEBUG");
const ENV_LOCALE: &str = concatcp!(ENV_PREFIX, "LOCALE");
const ENV_EVALUATOR: &str = concatcp!(ENV_PREFIX, "EVALUATOR");
const ENV_CONFIG_DIR: &str = concatcp!(ENV_PREFIX, "CONFIG_DIR");
const ENV_POLICY_PATH: &str = concatcp!(ENV_PREFIX, "POLICY_PATH");
const ENV_TABLE_MODE: &str = concatcp!(ENV_PREFIX, "TABLE_MODE");
const ENV_CACHE_TTL: &str = concatcp!(ENV_PREFIX, "CONFIG_TTL");
const ENV_FLOP_VALUE_RAISE: &str = concatcp!(ENV_PREFIX, "FLOP_VALUE_RAISE");
const ENV_FLOP_VALUE_RAISE_LE3: &str = concatcp!(ENV_PREFIX, "FLOP_VALUE_RAISE_LE3");
const ENV_VALUE_RAISE: &str = concatcp!(ENV_PREFIX, "VALUE_RAISE");

/// Range and threshold profile.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Default)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    Loose,
    #[default]
    Medium,
    Tight,
}

impl Strategy {
    pub const fn all() -> [Self; 3] {
        [Self::Loose, Self::Medium, Self::Tight]
    }
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Loose => "loose",
            Self::Medium => "medium",
            Self::Tight => "tight",
        }
    }
}

impl TryFrom<&str> for Strategy {
    type Error = String;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s.trim().to_lowercase().as_str() {
            "loose" => Ok(Self::Loose),
            "medium" => Ok(Self::Medium),
            "tight" => Ok(Self::Tight),
            _ => Err(format!("unknown strategy: {}", s)),
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which policy generation answers a request.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Default)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyVersion {
    V0,
    #[default]
    V1,
    /// v1 for a stable share of hands, v0 for the rest
    Auto,
}

impl TryFrom<&str> for PolicyVersion {
    type Error = String;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s.trim().to_lowercase().as_str() {
            "v0" => Ok(Self::V0),
            "v1" => Ok(Self::V1),
            "auto" => Ok(Self::Auto),
            _ => Err(format!("unknown policy version: {}", s)),
        }
    }
}

impl std::fmt::Display for PolicyVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::V0 => write!(f, "v0"),
            Self::V1 => write!(f, "v1"),
            Self::Auto => write!(f, "auto"),
        }
    }
}

/// Explanation language.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Default)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    Zh,
    #[default]
    En,
}

impl Locale {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Zh => "zh",
            Self::En => "en",
        }
    }
}

impl TryFrom<&str> for Locale {
    type Error = String;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s.trim().to_lowercase().as_str() {
            "zh" | "zh-cn" | "cn" => Ok(Self::Zh),
            "en" | "en-us" => Ok(Self::En),
            _ => Err(format!("unsupported locale: {}", s)),
        }
    }
}

/// Feature switches for optional raise branches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Flags {
    /// flop value raises read the rule tree's facing map
    pub flop_value_raise: bool,
    /// low-SPR top pair raises on the flop
    pub flop_value_raise_le3: bool,
    /// turn and river value raises
    pub value_raise: bool,
}

impl Default for Flags {
    fn default() -> Self {
        Self {
            flop_value_raise: true,
            flop_value_raise_le3: true,
            value_raise: true,
        }
    }
}

/// Immutable process configuration for the advisor.
///
/// Built once from [`Default`], the environment, or a JSON file, then
/// shared through the advisor context.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AdvisorConfig {
    pub profile: Strategy,
    pub version: PolicyVersion,
    pub rollout_pct: i64,
    pub mixing: bool,
    pub debug: bool,
    pub locale: Locale,
    pub evaluator: EvaluatorKind,
    pub config_dir: Option<PathBuf>,
    pub policy_path: Option<PathBuf>,
    pub table_mode: String,
    pub cache_ttl: u64,
    pub flags: Flags,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            profile: Strategy::default(),
            version: PolicyVersion::default(),
            rollout_pct: 0,
            mixing: true,
            debug: false,
            locale: Locale::default(),
            evaluator: EvaluatorKind::default(),
            config_dir: None,
            policy_path: None,
            table_mode: String::from("HU"),
            cache_ttl: crate::CONFIG_TTL_SECS,
            flags: Flags::default(),
        }
    }
}

impl AdvisorConfig {
    /// Reads `SUGGEST_*` overrides on top of the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }
    /// Reads a JSON config file; absent fields keep their defaults.
    pub fn from_file(path: &std::path::Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("read config {}: {}", path.display(), e))?;
        serde_json::from_str::<Self>(&text)
            .map_err(|e| anyhow::anyhow!("parse config {}: {}", path.display(), e))
            .inspect(|c| log::debug!("loaded config {} profile {}", path.display(), c.profile))
    }
    /// Applies overrides from any key lookup. Unparseable values keep the
    /// default and log a warning.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        if let Some(v) = get(ENV_STRATEGY) {
            match Strategy::try_from(v.as_str()) {
                Ok(s) => config.profile = s,
                Err(e) => log::warn!("{}: {}", ENV_STRATEGY, e),
            }
        }
        if let Some(v) = get(ENV_VERSION) {
            match PolicyVersion::try_from(v.as_str()) {
                Ok(s) => config.version = s,
                Err(e) => log::warn!("{}: {}", ENV_VERSION, e),
            }
        }
        if let Some(v) = get(ENV_ROLLOUT) {
            match v.parse::<i64>() {
                Ok(pct) => config.rollout_pct = pct.clamp(0, 100),
                Err(e) => log::warn!("{}: {}", ENV_ROLLOUT, e),
            }
        }
        if let Some(v) = get(ENV_LOCALE) {
            match Locale::try_from(v.as_str()) {
                Ok(l) => config.locale = l,
                Err(e) => log::warn!("{}: {}", ENV_LOCALE, e),
            }
        }
        if let Some(v) = get(ENV_EVALUATOR) {
            match EvaluatorKind::try_from(v.as_str()) {
                Ok(k) => config.evaluator = k,
                Err(e) => log::warn!("{}: {}", ENV_EVALUATOR, e),
            }
        }
        if let Some(v) = get(ENV_CACHE_TTL) {
            match v.parse::<u64>() {
                Ok(ttl) => config.cache_ttl = ttl,
                Err(e) => log::warn!("{}: {}", ENV_CACHE_TTL, e),
            }
        }
        config.mixing = get(ENV_MIXING).map_or(config.mixing, |v| v.to_lowercase() == "on");
        config.debug = get(ENV_DEBUG).map_or(config.debug, |v| v == "1");
        config.config_dir = get(ENV_CONFIG_DIR).map(PathBuf::from);
        config.policy_path = get(ENV_POLICY_PATH).map(PathBuf::from);
        config.table_mode = get(ENV_TABLE_MODE).map_or(config.table_mode, |v| v.to_uppercase());
        config.flags.flop_value_raise = get(ENV_FLOP_VALUE_RAISE).map_or(true, |v| v != "0");
        config.flags.flop_value_raise_le3 = get(ENV_FLOP_VALUE_RAISE_LE3).map_or(true, |v| v != "0");
        config.flags.value_raise = get(ENV_VALUE_RAISE).map_or(true, |v| v != "0");
        config
    }
}

/// Knobs read by the street policies.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct PolicyConfig {
    pub open_size_bb: f64,
    pub call_threshold_bb: f64,
    pub pot_odds_threshold: f64,
    pub pot_odds_threshold_callrange: f64,
    pub mixing: bool,
    pub flags: Flags,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self::from(&AdvisorConfig::default())
    }
}

impl From<&AdvisorConfig> for PolicyConfig {
    fn from(config: &AdvisorConfig) -> Self {
        Self {
            open_size_bb: 2.5,
            call_threshold_bb: 3.,
            pot_odds_threshold: 0.33,
            pot_odds_threshold_callrange: 0.40,
            mixing: config.mixing,
            flags: config.flags,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<BTreeMap<_, _>>();
        move |k| map.get(k).cloned()
    }

    /// variable names carry the shared prefix
    #[test]
    fn env_names() {
        assert_eq!(ENV_STRATEGY, "SUGGEST_STRATEGY");
        assert_eq!(ENV_ROLLOUT, "SUGGEST_V1_ROLLOUT_PCT");
    }

    /// overrides apply and bad values keep defaults
    #[test]
    fn overrides() {
        let config = AdvisorConfig::from_lookup(lookup(&[
            ("SUGGEST_STRATEGY", "tight"),
            ("SUGGEST_POLICY_VERSION", "auto"),
            ("SUGGEST_V1_ROLLOUT_PCT", "250"),
            ("SUGGEST_MIXING", "off"),
            ("SUGGEST_DEBUG", "1"),
            ("SUGGEST_EVALUATOR", "exhaustive"),
            ("SUGGEST_LOCALE", "klingon"),
            ("SUGGEST_FLOP_VALUE_RAISE", "0"),
        ]));
        assert_eq!(config.profile, Strategy::Tight);
        assert_eq!(config.version, PolicyVersion::Auto);
        assert_eq!(config.rollout_pct, 100);
        assert!(!config.mixing);
        assert!(config.debug);
        assert_eq!(config.evaluator, EvaluatorKind::Exhaustive);
        assert_eq!(config.locale, Locale::En);
        assert!(!config.flags.flop_value_raise);
        assert!(config.flags.value_raise);
    }

    /// partial JSON fills in defaults
    #[test]
    fn partial_json() {
        let config = serde_json::from_str::<AdvisorConfig>(r#"{"profile":"loose","flags":{"value_raise":false}}"#).unwrap();
        assert_eq!(config.profile, Strategy::Loose);
        assert!(config.mixing);
        assert!(!config.flags.value_raise);
        assert!(config.flags.flop_value_raise);
        assert_eq!(config.cache_ttl, 60);
    }
}
