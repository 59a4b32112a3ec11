//! Suggestion engine.
//!
//! [`build_suggestion`] reads a live [`crate::gameplay::HandState`], derives
//! an [`Observation`], and answers from a precomputed policy table or the
//! street rule ladders in [`policies`].

pub mod calculators;
pub use calculators::*;

pub mod classify;
pub use classify::*;

pub mod codes;
pub use codes::*;

pub mod config;
pub use config::*;

pub mod decision;
pub use decision::*;

pub mod explain;
pub use explain::*;

pub mod metrics;
pub use metrics::*;

pub mod mixing;
pub use mixing::*;

pub mod nodekey;
pub use nodekey::*;

pub mod observation;
pub use observation::*;

pub mod policies;
pub use policies::*;

pub mod profile;
pub use profile::*;

pub mod river;
pub use river::*;

pub mod rules;
pub use rules::*;

pub mod service;
pub use service::*;

pub mod table;
pub use table::*;
