pub mod action;
pub use action::*;

pub mod error;
pub use error::*;

pub mod event;
pub use event::*;

pub mod phase;
pub use phase::*;

pub mod player;
pub use player::*;

pub mod session;
pub use session::*;

pub mod state;
pub use state::*;
