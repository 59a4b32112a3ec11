use crate::Chips;
use crate::cards::Card;

/// A player's state within one hand.
///
/// # Fields
///
/// - `stack`: Chips behind (not yet committed)
/// - `invested_street`: Chips committed on the current street, blinds included
/// - `hole`: Private hole cards
/// - `all_in`: No chips left behind
/// - `folded`: Out of the hand
/// - `acted`: Made a voluntary decision this street
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PlayerState {
    pub stack: Chips,
    pub invested_street: Chips,
    pub hole: Vec<Card>,
    pub all_in: bool,
    pub folded: bool,
    #[serde(default)]
    pub acted: bool,
}

impl From<(Vec<Card>, Chips)> for PlayerState {
    fn from((hole, stack): (Vec<Card>, Chips)) -> Self {
        Self {
            stack,
            hole,
            invested_street: 0,
            all_in: false,
            folded: false,
            acted: false,
        }
    }
}

impl PlayerState {
    /// Moves chips from stack to the street investment.
    pub fn commit(&mut self, chips: Chips) {
        debug_assert!(chips >= 0 && chips <= self.stack);
        self.stack -= chips;
        self.invested_street += chips;
        if self.stack == 0 {
            self.all_in = true;
        }
    }
    /// Returns uncalled chips from the street investment to the stack.
    pub fn refund(&mut self, chips: Chips) {
        debug_assert!(chips >= 0 && chips <= self.invested_street);
        self.invested_street -= chips;
        self.stack += chips;
        if self.stack > 0 {
            self.all_in = false;
        }
    }
    /// Adds winnings to stack.
    pub fn win(&mut self, chips: Chips) {
        self.stack += chips;
    }
    /// Total chips still owned or in front of the player this street.
    pub fn total(&self) -> Chips {
        self.stack + self.invested_street
    }
    /// Moves the street investment out, as when a street closes.
    pub fn sweep(&mut self) -> Chips {
        let chips = self.invested_street;
        self.invested_street = 0;
        self.acted = false;
        chips
    }
}

impl std::fmt::Display for PlayerState {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let hole = self.hole.iter().map(|c| c.to_string()).collect::<String>();
        let flag = match (self.folded, self.all_in) {
            (true, _) => "F",
            (_, true) => "A",
            _ => "B",
        };
        write!(f, "{} {:<4} ${:>5} +{:<5}", flag, hole, self.stack, self.invested_street)
    }
}
