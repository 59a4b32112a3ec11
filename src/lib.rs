//! Heads-up No-Limit Hold'em betting engine and strategy advisor.
//!
//! ## Core Types
//!
//! - [`gameplay::HandState`]: Immutable snapshot of one hand, advanced by pure transitions
//! - [`gameplay::LegalAction`]: An action the actor may take, with its amount bounds
//! - [`advisor::Observation`]: Decision-point features derived from a hand state
//! - [`advisor::Suggestion`]: A recommended action with rationale and confidence
//!
//! ## Layers
//!
//! [`cards`] encodes cards and evaluates hands. [`gameplay`] enforces betting
//! legality and chip conservation. [`advisor`] turns a live hand into a
//! suggestion, from a precomputed policy table or a rule ladder.

pub mod advisor;
pub mod cards;
pub mod gameplay;

// ============================================================================
// TYPE ALIASES
// ============================================================================
/// Stack sizes and bet amounts in chips.
pub type Chips = i32;
/// Seat index (0 or 1 in heads-up).
pub type Position = usize;
/// Mixing frequencies, pot odds, and policy weights.
pub type Probability = f64;

// ============================================================================
// TABLE PARAMETERS
// ============================================================================
/// Number of players at the table.
pub const N: usize = 2;
/// Default starting stack in chips.
pub const STACK: Chips = 200;
/// Default big blind amount.
pub const B_BLIND: Chips = 2;
/// Default small blind amount.
pub const S_BLIND: Chips = 1;

// ============================================================================
// OBSERVATION THRESHOLDS
// ============================================================================
/// Coarse SPR bucket upper bound for "low".
pub const SPR_LOW: f64 = 3.0;
/// Coarse SPR bucket upper bound for "mid".
pub const SPR_MID: f64 = 6.0;
/// Facing bet fraction of pot considered "third".
pub const FACING_THIRD: f64 = 0.45;
/// Facing bet fraction of pot considered "half".
pub const FACING_HALF: f64 = 0.75;
/// Preflop pot (in big blinds) above which the opener is no longer first in.
pub const FIRST_IN_LIMIT_BB: f64 = 0.5 + 1.0 + 4.0;

// ============================================================================
// DECISION PARAMETERS
// ============================================================================
/// Postflop raise cap as a fraction of effective stack.
pub const POSTFLOP_CAP_RATIO: f64 = 0.85;
/// Calls this cheap (in pot odds) survive the conservative fallback.
pub const FALLBACK_POT_ODDS: Probability = 0.25;
/// Minimum weight for a table row to be considered usable.
pub const POLICY_EPSILON: Probability = 1e-6;
/// Base confidence before adjustments.
pub const CONFIDENCE_BASE: f64 = 0.5;
/// Confidence ceiling after adjustments.
pub const CONFIDENCE_MAX: f64 = 0.9;
/// Price (to_call in big blinds) at which a preflop bet is treated as a shove.
pub const VS_SHOVE_MIN_BB: f64 = 10.0;

// ============================================================================
// CONFIGURATION KEYS
// ============================================================================
/// Prefix shared by every environment override.
pub const ENV_PREFIX: &str = "SUGGEST_";
/// Config cache time-to-live in seconds.
pub const CONFIG_TTL_SECS: u64 = 60;

// ============================================================================
// RUNTIME UTILITIES
// ============================================================================
/// Initialize dual logging (terminal + file) with timestamped log files.
/// Creates `logs/` directory and writes DEBUG level to file, INFO to terminal.
#[cfg(feature = "cli")]
pub fn log() {
    std::fs::create_dir_all("logs").expect("create logs directory");
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    let time = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("time moves slow")
        .as_secs();
    let file = simplelog::WriteLogger::new(
        log::LevelFilter::Debug,
        config.clone(),
        std::fs::File::create(format!("logs/{}.log", time)).expect("create log file"),
    );
    let term = simplelog::TermLogger::new(
        log::LevelFilter::Info,
        config.clone(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );
    simplelog::CombinedLogger::init(vec![term, file]).expect("initialize logger");
}
