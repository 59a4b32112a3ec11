use super::action::Action;
use crate::Chips;
use crate::Position;
use thiserror::Error;

/// Ways a state transition can be refused.
///
/// A refused transition never touches the input state.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("hand is over, no actions are accepted")]
    HandOver,

    #[error("illegal action {action} in {phase}")]
    Illegal { action: Action, phase: String },

    #[error("{action} amount {amount} outside [{min}, {max}]")]
    OutOfRange {
        action: Action,
        amount: Chips,
        min: Chips,
        max: Chips,
    },

    #[error("seat {seat} holds {stack} chips but must post {blind}")]
    ShortStack {
        seat: Position,
        stack: Chips,
        blind: Chips,
    },

    #[error("invalid blinds: sb {sb}, bb {bb}")]
    Blinds { sb: Chips, bb: Chips },

    #[error("next hand requires a complete hand, found {0}")]
    Incomplete(String),

    #[error("seat {0} is busted")]
    Busted(Position),
}
