use crate::cards::Card;
use crate::cards::Rank;
use crate::cards::Street;
use crate::cards::Suit;

/// Flop texture from the first three board cards.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Default)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Texture {
    Dry,
    Semi,
    Wet,
    #[default]
    Na,
}

impl Texture {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dry => "dry",
            Self::Semi => "semi",
            Self::Wet => "wet",
            Self::Na => "na",
        }
    }
}

/// Wet when paired, monotone, or connected and two-tone.
/// Semi when two-tone or connected. Dry otherwise.
pub fn classify_board_texture(board: &[Card]) -> Texture {
    if board.len() < 3 {
        return Texture::Na;
    }
    let flop = &board[..3];
    let mut ranks = flop.iter().map(|c| u8::from(c.rank())).collect::<Vec<_>>();
    ranks.sort_unstable();
    let paired = ranks[0] == ranks[1] || ranks[1] == ranks[2];
    let suited = Suit::all()
        .iter()
        .map(|s| flop.iter().filter(|c| c.suit() == *s).count())
        .max()
        .unwrap_or(0);
    let three_suited = suited == 3;
    let two_suited = suited == 2;
    let gaps = [ranks[1] - ranks[0], ranks[2] - ranks[1]];
    let connected = (gaps[0] <= 1 && gaps[1] <= 1) || gaps.contains(&2);
    match () {
        _ if paired || three_suited || (connected && two_suited) => Texture::Wet,
        _ if two_suited || connected => Texture::Semi,
        _ => Texture::Dry,
    }
}

impl TryFrom<&str> for Texture {
    type Error = String;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s.trim().to_lowercase().as_str() {
            "dry" => Ok(Self::Dry),
            "semi" | "semi_wet" => Ok(Self::Semi),
            "wet" => Ok(Self::Wet),
            "na" | "" => Ok(Self::Na),
            _ => Err(format!("unknown texture: {}", s)),
        }
    }
}

impl std::fmt::Display for Texture {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Stack-to-pot ratio at the decision point, infinite for an empty pot.
pub fn spr(eff_stack: crate::Chips, pot_now: crate::Chips) -> f64 {
    match pot_now {
        p if p <= 0 => f64::INFINITY,
        p => eff_stack as f64 / p as f64,
    }
}

/// Coarse SPR bucket used by the rule trees.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Default)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SprBucket {
    Low,
    Mid,
    High,
    #[default]
    Na,
}

impl SprBucket {
    pub fn from_spr(spr: f64) -> Self {
        match spr {
            s if !s.is_finite() => Self::Na,
            s if s <= crate::SPR_LOW => Self::Low,
            s if s <= crate::SPR_MID => Self::Mid,
            _ => Self::High,
        }
    }
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Mid => "mid",
            Self::High => "high",
            Self::Na => "na",
        }
    }
    /// key spelling inside postflop rule trees
    pub fn rule_key(&self) -> &'static str {
        match self {
            Self::Low => "le3",
            Self::Mid => "3to6",
            Self::High => "ge6",
            Self::Na => "na",
        }
    }
}

impl std::fmt::Display for SprBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Canonical SPR bin written into node keys.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum SprBin {
    Spr2,
    Spr4,
    Spr6,
    Spr8,
    Spr10,
    Na,
}

impl SprBin {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Spr2 => "spr2",
            Self::Spr4 => "spr4",
            Self::Spr6 => "spr6",
            Self::Spr8 => "spr8",
            Self::Spr10 => "spr10",
            Self::Na => "na",
        }
    }
    fn alias(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "le3" | "low" | "spr2" => Some(Self::Spr2),
            "3to6" | "mid" | "spr4" => Some(Self::Spr4),
            "ge6" | "high" | "spr6" => Some(Self::Spr6),
            "spr8" => Some(Self::Spr8),
            "spr10" => Some(Self::Spr10),
            _ => None,
        }
    }
}

impl std::fmt::Display for SprBin {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A recognised alias wins over the numeric value.
/// Boundary values fall into the higher bin.
pub fn classify_spr_bin(value: Option<f64>, alias: Option<&str>) -> SprBin {
    if let Some(bin) = alias.and_then(SprBin::alias) {
        return bin;
    }
    match value {
        None => SprBin::Na,
        Some(v) if !v.is_finite() => SprBin::Na,
        Some(v) if v < 3. => SprBin::Spr2,
        Some(v) if v < 5. => SprBin::Spr4,
        Some(v) if v < 7. => SprBin::Spr6,
        Some(v) if v < 9. => SprBin::Spr8,
        Some(_) => SprBin::Spr10,
    }
}

/// How many times the pot was raised preflop.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Default)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PotType {
    Limped,
    #[default]
    SingleRaised,
    Threebet,
}

impl PotType {
    pub fn from_raises(n: usize) -> Self {
        match n {
            0 => Self::Limped,
            1 => Self::SingleRaised,
            _ => Self::Threebet,
        }
    }
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Limped => "limped",
            Self::SingleRaised => "single_raised",
            Self::Threebet => "threebet",
        }
    }
}

impl std::fmt::Display for PotType {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Whether the actor was the preflop aggressor.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Default)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Pfr,
    Caller,
    #[default]
    Na,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pfr => "pfr",
            Self::Caller => "caller",
            Self::Na => "na",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// dry and semi boards favour the raiser's range, wet boards the caller's
pub fn range_advantage(texture: Texture, role: Role) -> bool {
    match texture {
        Texture::Dry | Texture::Semi => role == Role::Pfr,
        Texture::Wet => role == Role::Caller,
        Texture::Na => false,
    }
}

/// wet boards give the caller more nutted combos, dry boards the raiser
pub fn nut_advantage(texture: Texture, role: Role) -> bool {
    match texture {
        Texture::Dry => role == Role::Pfr,
        Texture::Wet => role == Role::Caller,
        _ => false,
    }
}

/// Starting-hand features.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[derive(serde::Serialize, serde::Deserialize)]
pub enum Tag {
    #[serde(rename = "pair")]
    Pair,
    #[serde(rename = "suited")]
    Suited,
    #[serde(rename = "broadway")]
    Broadway,
    #[serde(rename = "suited_broadway")]
    SuitedBroadway,
    #[serde(rename = "broadway_offsuit")]
    BroadwayOffsuit,
    #[serde(rename = "Ax_suited")]
    AxSuited,
    #[serde(rename = "weak")]
    Weak,
    #[serde(rename = "unknown")]
    Unknown,
}

impl Tag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pair => "pair",
            Self::Suited => "suited",
            Self::Broadway => "broadway",
            Self::SuitedBroadway => "suited_broadway",
            Self::BroadwayOffsuit => "broadway_offsuit",
            Self::AxSuited => "Ax_suited",
            Self::Weak => "weak",
            Self::Unknown => "unknown",
        }
    }
}

/// Strategic bucket of the actor's holding.
///
/// Preflop classes come from the starting-hand tags. Postflop classes
/// describe made hands and draws over hole plus board.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Default)]
#[derive(serde::Serialize, serde::Deserialize)]
pub enum HandClass {
    #[serde(rename = "pair")]
    Pair,
    #[serde(rename = "Ax_suited")]
    AxSuited,
    #[serde(rename = "suited_broadway")]
    SuitedBroadway,
    #[serde(rename = "broadway_offsuit")]
    BroadwayOffsuit,
    #[serde(rename = "weak")]
    Weak,
    #[serde(rename = "value_two_pair_plus")]
    Value,
    #[serde(rename = "overpair_or_top_pair_strong")]
    OverpairOrTopPairStrong,
    #[serde(rename = "top_pair_weak_or_second_pair")]
    TopPairWeakOrSecondPair,
    #[serde(rename = "middle_pair_or_third_pair_minus")]
    MiddlePairOrThirdPairMinus,
    #[serde(rename = "strong_draw")]
    StrongDraw,
    #[serde(rename = "weak_draw_or_air")]
    WeakDrawOrAir,
    #[default]
    #[serde(rename = "unknown")]
    Unknown,
}

impl HandClass {
    pub const fn postflop() -> [Self; 6] {
        [
            Self::Value,
            Self::OverpairOrTopPairStrong,
            Self::TopPairWeakOrSecondPair,
            Self::MiddlePairOrThirdPairMinus,
            Self::StrongDraw,
            Self::WeakDrawOrAir,
        ]
    }
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pair => "pair",
            Self::AxSuited => "Ax_suited",
            Self::SuitedBroadway => "suited_broadway",
            Self::BroadwayOffsuit => "broadway_offsuit",
            Self::Weak => "weak",
            Self::Value => "value_two_pair_plus",
            Self::OverpairOrTopPairStrong => "overpair_or_top_pair_strong",
            Self::TopPairWeakOrSecondPair => "top_pair_weak_or_second_pair",
            Self::MiddlePairOrThirdPairMinus => "middle_pair_or_third_pair_minus",
            Self::StrongDraw => "strong_draw",
            Self::WeakDrawOrAir => "weak_draw_or_air",
            Self::Unknown => "unknown",
        }
    }
    /// value, top pair or better, and strong draws
    pub fn is_strong(&self) -> bool {
        matches!(self, Self::Value | Self::OverpairOrTopPairStrong | Self::StrongDraw)
    }
}

impl TryFrom<&str> for HandClass {
    type Error = String;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        [
            Self::Pair,
            Self::AxSuited,
            Self::SuitedBroadway,
            Self::BroadwayOffsuit,
            Self::Weak,
            Self::Unknown,
        ]
        .into_iter()
        .chain(Self::postflop())
        .find(|c| c.as_str() == s.trim())
        .ok_or_else(|| format!("unknown hand class: {}", s))
    }
}

impl std::fmt::Display for HandClass {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Tags and class for two hole cards.
pub fn classify_starting_hand(hole: &[Card]) -> Result<(Vec<Tag>, HandClass), String> {
    let [a, b] = hole else {
        return Err(format!("need exactly 2 hole cards, got {}", hole.len()));
    };
    let pair = a.rank() == b.rank();
    let suited = a.suit() == b.suit();
    let broadway = a.rank().is_broadway() && b.rank().is_broadway();
    let ace = a.rank() == Rank::Ace || b.rank() == Rank::Ace;
    let mut tags = Vec::new();
    if pair {
        tags.push(Tag::Pair);
    }
    if suited {
        tags.push(Tag::Suited);
    }
    if broadway {
        tags.push(Tag::Broadway);
        tags.push(if suited { Tag::SuitedBroadway } else { Tag::BroadwayOffsuit });
    }
    if ace && suited {
        tags.push(Tag::AxSuited);
    }
    let class = match () {
        _ if tags.contains(&Tag::Pair) => HandClass::Pair,
        _ if tags.contains(&Tag::AxSuited) => HandClass::AxSuited,
        _ if tags.contains(&Tag::SuitedBroadway) => HandClass::SuitedBroadway,
        _ if tags.contains(&Tag::BroadwayOffsuit) => HandClass::BroadwayOffsuit,
        _ => HandClass::Weak,
    };
    if class == HandClass::Weak {
        tags.push(Tag::Weak);
    }
    tags.sort();
    Ok((tags, class))
}

/// Grid label: `AKs`, `KQo`, `TT`. Higher rank first.
pub fn combo(hole: &[Card]) -> Option<String> {
    let [a, b] = hole else {
        return None;
    };
    let (hi, lo) = if a.rank() >= b.rank() { (a, b) } else { (b, a) };
    match () {
        _ if hi.rank() == lo.rank() => Some(format!("{}{}", hi.rank(), lo.rank())),
        _ if hi.suit() == lo.suit() => Some(format!("{}{}s", hi.rank(), lo.rank())),
        _ => Some(format!("{}{}o", hi.rank(), lo.rank())),
    }
}

/// Made-hand and draw class of two hole cards against a flop, turn, or river.
///
/// Precedence: made two pair or better, overpair or top pair with a queen+
/// kicker, weak top or second pair, lower pairs, then draws. Draws only
/// count while cards are still to come.
pub fn classify_postflop_hand(hole: &[Card], board: &[Card]) -> Result<HandClass, String> {
    let [a, b] = hole else {
        return Err(format!("need exactly 2 hole cards, got {}", hole.len()));
    };
    if board.len() < 3 {
        return Err(format!("need a flop, got {} board cards", board.len()));
    }
    let count = |r: Rank| board.iter().filter(|c| c.rank() == r).count() + hole.iter().filter(|c| c.rank() == r).count();
    let pocket = a.rank() == b.rank();
    let hero_ranks = if pocket { vec![a.rank()] } else { vec![a.rank(), b.rank()] };
    let hero_pairs = hero_ranks.iter().filter(|r| count(**r) >= 2).count();
    let hero_trips = hero_ranks.iter().any(|r| count(*r) >= 3);
    let board_pairs = Rank::all()
        .into_iter()
        .filter(|r| !hero_ranks.contains(r))
        .filter(|r| board.iter().filter(|c| c.rank() == *r).count() >= 2)
        .count();
    if hero_trips || hero_pairs >= 2 || (hero_pairs >= 1 && board_pairs >= 1) {
        return Ok(HandClass::Value);
    }
    if made_straight(hole, board) || made_flush(hole, board) {
        return Ok(HandClass::Value);
    }
    let mut distinct = board.iter().map(|c| c.rank()).collect::<Vec<_>>();
    distinct.sort_unstable_by(|x, y| y.cmp(x));
    distinct.dedup();
    let top = distinct[0];
    let second = distinct.get(1).copied();
    if pocket {
        return Ok(match a.rank() {
            r if r > top => HandClass::OverpairOrTopPairStrong,
            r if second.is_some_and(|s| r > s) => HandClass::TopPairWeakOrSecondPair,
            _ => HandClass::MiddlePairOrThirdPairMinus,
        });
    }
    if hero_ranks.contains(&top) {
        let kicker = hero_ranks.iter().find(|r| !distinct.contains(r)).copied();
        return Ok(match kicker {
            Some(k) if k >= Rank::Queen => HandClass::OverpairOrTopPairStrong,
            _ => HandClass::TopPairWeakOrSecondPair,
        });
    }
    if second.is_some_and(|s| hero_ranks.contains(&s)) {
        return Ok(HandClass::TopPairWeakOrSecondPair);
    }
    if hero_pairs >= 1 {
        return Ok(HandClass::MiddlePairOrThirdPairMinus);
    }
    if board.len() < 5 && (flush_draw(hole, board) || open_ended(hole, board)) {
        return Ok(HandClass::StrongDraw);
    }
    Ok(HandClass::WeakDrawOrAir)
}

fn rank_mask(cards: &[Card]) -> u16 {
    cards.iter().fold(0u16, |m, c| m | u16::from(c.rank()))
}

/// five consecutive ranks (wheel included) that need a hole card
fn made_straight(hole: &[Card], board: &[Card]) -> bool {
    let all = rank_mask(hole) | rank_mask(board);
    let mine = rank_mask(hole);
    let wheel = 0b1_0000_0000_1111u16;
    if all & wheel == wheel && mine & wheel != 0 {
        return true;
    }
    (0..=8).map(|lo| 0b11111u16 << lo).any(|w| all & w == w && mine & w != 0)
}

/// five of one suit with at least one from the hole
fn made_flush(hole: &[Card], board: &[Card]) -> bool {
    Suit::all().iter().any(|s| {
        let h = hole.iter().filter(|c| c.suit() == *s).count();
        let b = board.iter().filter(|c| c.suit() == *s).count();
        h >= 1 && h + b >= 5
    })
}

/// four to a flush using the hole cards
fn flush_draw(hole: &[Card], board: &[Card]) -> bool {
    Suit::all().iter().any(|s| {
        let h = hole.iter().filter(|c| c.suit() == *s).count();
        let b = board.iter().filter(|c| c.suit() == *s).count();
        b >= 2 && h >= 1 && h + b == 4
    })
}

/// four consecutive ranks that include a hole rank
fn open_ended(hole: &[Card], board: &[Card]) -> bool {
    let all = rank_mask(hole) | rank_mask(board);
    let mine = rank_mask(hole);
    (0..=9).map(|lo| 0b1111u16 << lo).any(|w| all & w == w && mine & w != 0)
}

/// Street-prefixed teaching label for the holding.
pub fn hand_strength(street: Street, tags: &[Tag], class: HandClass) -> String {
    match street {
        Street::Pref => [
            (Tag::Pair, "preflop_pair"),
            (Tag::SuitedBroadway, "preflop_suited_broadway"),
            (Tag::BroadwayOffsuit, "preflop_broadway_offsuit"),
            (Tag::AxSuited, "preflop_ax_suited"),
        ]
        .into_iter()
        .find(|(tag, _)| tags.contains(tag))
        .map(|(_, label)| label.to_string())
        .unwrap_or_else(|| "preflop_unknown".to_string()),
        street => {
            let suffix = match class {
                HandClass::Value => "value",
                HandClass::OverpairOrTopPairStrong => "top_pair_or_overpair",
                HandClass::StrongDraw => "strong_draw",
                HandClass::TopPairWeakOrSecondPair | HandClass::MiddlePairOrThirdPairMinus => "mid_or_weak",
                HandClass::WeakDrawOrAir => "air",
                _ => "unknown",
            };
            format!("{}_{}", street, suffix)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cards(s: &str) -> Vec<Card> {
        Card::parse(s).unwrap()
    }

    /// texture table over representative flops
    #[test]
    fn textures() {
        assert_eq!(classify_board_texture(&cards("Ks7d2c")), Texture::Dry);
        assert_eq!(classify_board_texture(&cards("KsKd2c")), Texture::Wet);
        assert_eq!(classify_board_texture(&cards("9h8h2h")), Texture::Wet);
        assert_eq!(classify_board_texture(&cards("9h8s7d")), Texture::Semi);
        assert_eq!(classify_board_texture(&cards("9h6h2d")), Texture::Semi);
        assert_eq!(classify_board_texture(&cards("Jh9h8d")), Texture::Wet);
        assert_eq!(classify_board_texture(&cards("Kh2d")), Texture::Na);
    }

    /// spr bins move up at their boundaries and honour aliases
    #[test]
    fn spr_bins() {
        assert_eq!(classify_spr_bin(Some(2.9), None), SprBin::Spr2);
        assert_eq!(classify_spr_bin(Some(3.0), None), SprBin::Spr4);
        assert_eq!(classify_spr_bin(Some(5.0), None), SprBin::Spr6);
        assert_eq!(classify_spr_bin(Some(7.0), None), SprBin::Spr8);
        assert_eq!(classify_spr_bin(Some(9.0), None), SprBin::Spr10);
        assert_eq!(classify_spr_bin(Some(f64::INFINITY), None), SprBin::Na);
        assert_eq!(classify_spr_bin(None, Some("le3")), SprBin::Spr2);
        assert_eq!(classify_spr_bin(Some(8.), Some("mid")), SprBin::Spr4);
        assert_eq!(classify_spr_bin(None, Some("na")), SprBin::Na);
        assert_eq!(SprBucket::from_spr(3.0), SprBucket::Low);
        assert_eq!(SprBucket::from_spr(6.0), SprBucket::Mid);
        assert_eq!(SprBucket::from_spr(spr(100, 0)), SprBucket::Na);
    }

    /// starting hand tags and class priority
    #[test]
    fn starting_hands() {
        let (tags, class) = classify_starting_hand(&cards("AhKh")).unwrap();
        assert_eq!(class, HandClass::AxSuited);
        assert!(tags.contains(&Tag::SuitedBroadway));
        assert_eq!(classify_starting_hand(&cards("TdTc")).unwrap().1, HandClass::Pair);
        assert_eq!(classify_starting_hand(&cards("KdQc")).unwrap().1, HandClass::BroadwayOffsuit);
        let (tags, class) = classify_starting_hand(&cards("7d2c")).unwrap();
        assert_eq!(class, HandClass::Weak);
        assert_eq!(tags, vec![Tag::Weak]);
        assert!(classify_starting_hand(&cards("Ah")).is_err());
    }

    /// combo labels put the higher rank first
    #[test]
    fn combos() {
        assert_eq!(combo(&cards("KhAh")).as_deref(), Some("AKs"));
        assert_eq!(combo(&cards("QdKc")).as_deref(), Some("KQo"));
        assert_eq!(combo(&cards("TdTc")).as_deref(), Some("TT"));
        assert_eq!(combo(&[]), None);
    }

    /// postflop classes follow made-hand precedence
    #[test]
    fn postflop_classes() {
        let class = |h: &str, b: &str| classify_postflop_hand(&cards(h), &cards(b)).unwrap();
        assert_eq!(class("Ks7d", "Kh7c2s"), HandClass::Value);
        assert_eq!(class("2d2h", "Kh7c2s"), HandClass::Value);
        assert_eq!(class("AsAd", "Kh7c2s"), HandClass::OverpairOrTopPairStrong);
        assert_eq!(class("KsQd", "Kh7c2s"), HandClass::OverpairOrTopPairStrong);
        assert_eq!(class("Ks9d", "Kh7c2s"), HandClass::TopPairWeakOrSecondPair);
        assert_eq!(class("8s7d", "Kh7c2s"), HandClass::TopPairWeakOrSecondPair);
        assert_eq!(class("As2d", "Kh7c3s"), HandClass::WeakDrawOrAir);
        assert_eq!(class("As2d", "Kh7c2s"), HandClass::MiddlePairOrThirdPairMinus);
        assert_eq!(class("AhTh", "Kh7h2s"), HandClass::StrongDraw);
        assert_eq!(class("9s8d", "Th7c2s"), HandClass::StrongDraw);
        assert_eq!(class("9s8d", "Th7c2sKd3c"), HandClass::WeakDrawOrAir);
        assert_eq!(class("9s8d", "Th7c6s"), HandClass::Value);
    }

    /// strength labels carry the street prefix
    #[test]
    fn strength_labels() {
        assert_eq!(hand_strength(Street::Pref, &[Tag::Pair, Tag::Broadway], HandClass::Pair), "preflop_pair");
        assert_eq!(hand_strength(Street::Pref, &[Tag::Weak], HandClass::Weak), "preflop_unknown");
        assert_eq!(hand_strength(Street::Flop, &[], HandClass::Value), "flop_value");
        assert_eq!(hand_strength(Street::Rive, &[], HandClass::WeakDrawOrAir), "river_air");
    }
}
