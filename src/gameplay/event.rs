use crate::Chips;
use crate::Position;
use crate::cards::Card;
use crate::cards::Street;

/// How an all-in was interpreted when applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllinAs {
    Bet,
    Raise,
    Call,
    CallShort,
}

/// One entry of the append-only hand log.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "t", rename_all = "snake_case")]
pub enum Event {
    Blind {
        who: Position,
        amt: Chips,
    },
    DealHole,
    Check {
        who: Position,
    },
    Fold {
        who: Position,
    },
    Call {
        who: Position,
        amt: Chips,
    },
    CallShort {
        who: Position,
        amt: Chips,
        refund: Chips,
    },
    Bet {
        who: Position,
        amt: Chips,
    },
    Raise {
        who: Position,
        to: Chips,
    },
    Allin {
        who: Position,
        amt: Chips,
        #[serde(rename = "as")]
        as_: AllinAs,
    },
    Board {
        street: Street,
        cards: Vec<Card>,
    },
    Showdown {
        winner: Option<Position>,
        best5: [Vec<Card>; 2],
    },
    WinFold {
        who: Position,
        amt: Chips,
    },
    WinShowdown {
        who: Position,
        amt: Chips,
    },
    Split {
        amts: [Chips; 2],
    },
}

impl Event {
    /// the seat that made a voluntary decision, if any
    pub fn who(&self) -> Option<Position> {
        match self {
            Event::Check { who }
            | Event::Fold { who }
            | Event::Call { who, .. }
            | Event::CallShort { who, .. }
            | Event::Bet { who, .. }
            | Event::Raise { who, .. }
            | Event::Allin { who, .. } => Some(*who),
            _ => None,
        }
    }
    /// a bet, raise, or all-in that raised the price
    pub fn is_aggressive(&self) -> bool {
        match self {
            Event::Bet { .. } | Event::Raise { .. } => true,
            Event::Allin { as_, .. } => matches!(as_, AllinAs::Bet | AllinAs::Raise),
            _ => false,
        }
    }
    /// a raise over an existing wager, counted toward pot type
    pub fn is_raise(&self) -> bool {
        match self {
            Event::Raise { .. } => true,
            Event::Allin { as_, .. } => *as_ == AllinAs::Raise,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tagged_json() {
        let event = Event::Allin {
            who: 1,
            amt: 150,
            as_: AllinAs::CallShort,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["t"], "allin");
        assert_eq!(json["as"], "call_short");
        assert_eq!(serde_json::from_value::<Event>(json).unwrap(), event);
    }

    #[test]
    fn aggression() {
        assert!(Event::Bet { who: 0, amt: 4 }.is_aggressive());
        assert!(Event::Raise { who: 0, to: 8 }.is_aggressive());
        assert!(!Event::Call { who: 1, amt: 4 }.is_aggressive());
        assert!(!Event::Bet { who: 0, amt: 4 }.is_raise());
    }
}
