use super::card::Card;
use super::hand::Hand;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

/// An ordered deck for dealing.
///
/// Unlike a Hand, order matters here: the same seed always yields
/// the same sequence, which makes whole hands reproducible.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Deck(Vec<Card>);

impl Deck {
    /// all 52 cards in sorted order
    pub fn new() -> Self {
        Self((0..52u8).map(Card::from).collect())
    }
    /// a full deck shuffled by a seeded StdRng
    pub fn shuffled(seed: u64) -> Self {
        let mut deck = Self::new();
        let ref mut rng = StdRng::seed_from_u64(seed);
        deck.0.shuffle(rng);
        deck
    }
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    /// the card at a position without removing it
    pub fn peek(&self, i: usize) -> Option<Card> {
        self.0.get(i).copied()
    }
    /// remove the next n cards from the top
    pub fn deal(&mut self, n: usize) -> Vec<Card> {
        let n = n.min(self.0.len());
        self.0.drain(..n).collect()
    }
}

impl Default for Deck {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Vec<Card>> for Deck {
    fn from(cards: Vec<Card>) -> Self {
        Self(cards)
    }
}
impl From<&Deck> for Hand {
    fn from(deck: &Deck) -> Self {
        Hand::from(deck.0.as_slice())
    }
}

impl Iterator for Deck {
    type Item = Card;
    fn next(&mut self) -> Option<Self::Item> {
        if self.0.is_empty() {
            None
        } else {
            Some(self.0.remove(0))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_shuffle_is_stable() {
        assert_eq!(Deck::shuffled(42), Deck::shuffled(42));
        assert_ne!(Deck::shuffled(42), Deck::shuffled(43));
    }

    #[test]
    fn shuffle_is_permutation() {
        let deck = Deck::shuffled(7);
        assert_eq!(deck.len(), 52);
        assert_eq!(Hand::from(&deck).size(), 52);
    }

    #[test]
    fn deal_from_top() {
        let mut deck = Deck::shuffled(1);
        let top = deck.peek(0);
        let dealt = deck.deal(3);
        assert_eq!(dealt.first().copied(), top);
        assert_eq!(deck.len(), 49);
    }
}
