use super::rank::Rank;
use super::suit::Suit;

/// A single playing card packed into one byte.
///
/// Encoded as `rank * 4 + suit`, so cards sort by rank first.
/// Serializes as the two-character string form, e.g. `"Ts"`.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Card(u8);

impl Card {
    pub fn rank(&self) -> Rank {
        Rank::from(self.0 / 4)
    }
    pub fn suit(&self) -> Suit {
        Suit::from(self.0 % 4)
    }
    /// parse a run of cards, with or without whitespace: "AsKd" or "As Kd"
    pub fn parse(s: &str) -> Result<Vec<Self>, String> {
        let s = s.split_whitespace().collect::<String>();
        if s.len() % 2 != 0 {
            return Err(format!("odd card string length: {}", s));
        }
        s.as_bytes()
            .chunks(2)
            .map(|pair| std::str::from_utf8(pair).map_err(|e| e.to_string()))
            .map(|pair| pair.and_then(Card::try_from))
            .collect()
    }
}

impl From<(Rank, Suit)> for Card {
    fn from((r, s): (Rank, Suit)) -> Self {
        Self(u8::from(r) * 4 + u8::from(s))
    }
}

/// u8 isomorphism
/// each card is mapped to its location in a sorted deck 0-51
/// Ts
/// 35
/// 0b00100011
impl From<Card> for u8 {
    fn from(c: Card) -> u8 {
        c.0
    }
}
impl From<u8> for Card {
    fn from(n: u8) -> Self {
        Self(n % 52)
    }
}

/// u32 isomorphism
/// a Card is bitwise OR. Suit and Rank are bitmasks of the 17 LSBs
/// Ts
/// xxxxxxxxxxxxxxx cdhs AKQJT98765432
/// 000000000000000 0001 0000100000000
impl From<Card> for u32 {
    fn from(c: Card) -> u32 {
        let suit = 1u32 << (13 + 3 - u8::from(c.suit()));
        let rank = u32::from(c.rank());
        suit | rank
    }
}
impl From<u32> for Card {
    fn from(n: u32) -> Self {
        let rank = Rank::from((n & Rank::mask() as u32) as u16);
        let suit = Suit::from((3 - ((n >> 13) & 0xF).trailing_zeros()) as u8);
        Self::from((rank, suit))
    }
}

/// u64 isomorphism
/// each card is just one bit turned on
/// Ts
/// xxxxxxxxxxxx 0000000000000000100000000000000000000000000000000000
impl From<Card> for u64 {
    fn from(c: Card) -> u64 {
        1 << u8::from(c)
    }
}
impl From<u64> for Card {
    fn from(n: u64) -> Self {
        Self(n.trailing_zeros() as u8)
    }
}

/// str isomorphism
impl TryFrom<&str> for Card {
    type Error = String;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        let s = s.trim();
        match s.chars().count() {
            2 => {
                let mut chars = s.chars();
                let r = chars.next().map(String::from).unwrap_or_default();
                let s = chars.next().map(String::from).unwrap_or_default();
                let rank = Rank::try_from(r.as_str())?;
                let suit = Suit::try_from(s.as_str())?;
                Ok(Card::from((rank, suit)))
            }
            _ => Err(format!("card needs 2 characters: {:?}", s)),
        }
    }
}
impl TryFrom<String> for Card {
    type Error = String;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        Card::try_from(s.as_str())
    }
}
impl From<Card> for String {
    fn from(c: Card) -> String {
        c.to_string()
    }
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}{}", self.rank(), self.suit())
    }
}
