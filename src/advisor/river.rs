use super::rules::RuleNode;
use crate::cards::Card;
use crate::cards::Evaluate;
use crate::cards::Rank;
use crate::cards::Ranking;
use crate::cards::Suit;
use serde_json::Value;

/// How much showdown value a river holding carries.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Default)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiverTier {
    StrongValue,
    MediumValue,
    WeakShowdown,
    Air,
    #[default]
    Unknown,
}

impl RiverTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StrongValue => "strong_value",
            Self::MediumValue => "medium_value",
            Self::WeakShowdown => "weak_showdown",
            Self::Air => "air",
            Self::Unknown => "unknown",
        }
    }
    pub fn label(&self) -> &'static str {
        match self {
            Self::StrongValue => "strong value",
            Self::MediumValue => "medium value",
            Self::WeakShowdown => "weak showdown value",
            Self::Air => "air",
            Self::Unknown => "unknown strength",
        }
    }
    /// plan text when the rule file gives none
    pub fn default_plan(&self) -> &'static str {
        match self {
            Self::StrongValue => "bet for value",
            Self::MediumValue => "check and call small bets",
            Self::WeakShowdown => "check and reach showdown cheaply",
            Self::Air => "give up or bluff with blockers",
            Self::Unknown => "play cautiously",
        }
    }
}

/// Cards in hand that remove the opponent's strongest river holdings.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Blocker {
    NutFlushBlocker,
    StraightBlocker,
    FullHouseBlocker,
}

impl Blocker {
    pub const fn all() -> [Self; 3] {
        [Self::NutFlushBlocker, Self::StraightBlocker, Self::FullHouseBlocker]
    }
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NutFlushBlocker => "nut_flush_blocker",
            Self::StraightBlocker => "straight_blocker",
            Self::FullHouseBlocker => "full_house_blocker",
        }
    }
    pub fn label(&self) -> &'static str {
        match self {
            Self::NutFlushBlocker => "nut flush blocker",
            Self::StraightBlocker => "straight blocker",
            Self::FullHouseBlocker => "full house blocker",
        }
    }
}

impl TryFrom<&str> for Blocker {
    type Error = String;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::all()
            .into_iter()
            .find(|b| b.as_str() == s.trim())
            .ok_or_else(|| format!("unknown blocker: {}", s))
    }
}

/// Value tier and blockers of a complete river holding.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct RiverRead {
    pub tier: RiverTier,
    pub blockers: Vec<Blocker>,
}

/// Reads tier and blockers from hole cards and a five-card board.
///
/// Hands of two pair or better are strong value when a hole card plays.
/// A board that plays is only strong when it is the nuts. One pair is
/// graded against the board's top two ranks.
pub fn analyze_river(hole: &[Card], board: &[Card], evaluator: &dyn Evaluate) -> RiverRead {
    if hole.len() < 2 || board.len() < 5 {
        return RiverRead::default();
    }
    let hero = evaluator.evaluate(hole, board).strength;
    let alone = evaluator.evaluate(&[], board).strength;
    let plays = hero > alone;
    let mut tops = board.iter().map(|c| c.rank()).collect::<Vec<_>>();
    tops.sort_unstable_by(|a, b| b.cmp(a));
    tops.dedup();
    let top = tops[0];
    let second = tops.get(1).copied().unwrap_or(top);
    let ace = hole.iter().any(|c| c.rank() == Rank::Ace);
    let tier = match hero.ranking() {
        Ranking::HighCard(_) | Ranking::OnePair(_) if !plays => match ace {
            true => RiverTier::WeakShowdown,
            false => RiverTier::Air,
        },
        Ranking::OnePair(r) => {
            let pocket = hole[0].rank() == hole[1].rank();
            match () {
                _ if pocket && r > top => RiverTier::StrongValue,
                _ if !pocket && r >= top => RiverTier::StrongValue,
                _ if r >= second => RiverTier::MediumValue,
                _ => RiverTier::WeakShowdown,
            }
        }
        Ranking::HighCard(_) => match ace {
            true => RiverTier::WeakShowdown,
            false => RiverTier::Air,
        },
        _ if plays => RiverTier::StrongValue,
        _ if is_nut_board(&alone.ranking(), &Vec::<Rank>::from(alone.kickers())) => RiverTier::StrongValue,
        _ => RiverTier::WeakShowdown,
    };
    RiverRead {
        tier,
        blockers: blockers(hole, board),
    }
}

/// Royal flush, or quads with an ace kicker.
fn is_nut_board(ranking: &Ranking, kickers: &[Rank]) -> bool {
    match ranking {
        Ranking::StraightFlush(Rank::Ace) => true,
        Ranking::FourOAK(Rank::Ace) => kickers.first() == Some(&Rank::King),
        Ranking::FourOAK(_) => kickers.first() == Some(&Rank::Ace),
        _ => false,
    }
}

fn blockers(hole: &[Card], board: &[Card]) -> Vec<Blocker> {
    let mut found = Vec::new();
    let flush_suit = Suit::all()
        .into_iter()
        .find(|s| board.iter().filter(|c| c.suit() == *s).count() >= 3);
    if let Some(suit) = flush_suit {
        if hole.iter().any(|c| c.rank() == Rank::Ace && c.suit() == suit) {
            found.push(Blocker::NutFlushBlocker);
        }
    }
    if blocks_straight(hole, board) {
        found.push(Blocker::StraightBlocker);
    }
    if blocks_full_house(hole, board) {
        found.push(Blocker::FullHouseBlocker);
    }
    found
}

/// Four board ranks in a row, and hero holds a rank that completes either end.
/// Index -1 stands for a low ace.
fn blocks_straight(hole: &[Card], board: &[Card]) -> bool {
    let rank_at = |i: i8| match i {
        -1 => Some(Rank::Ace),
        i if (0..=12).contains(&i) => Some(Rank::from(i as u8)),
        _ => None,
    };
    let on_board = |r: Rank| board.iter().any(|c| c.rank() == r);
    let in_hand = |r: Option<Rank>| r.is_some_and(|r| hole.iter().any(|c| c.rank() == r));
    (-1i8..=9)
        .filter(|lo| (*lo..*lo + 4).all(|i| rank_at(i).is_some_and(on_board)))
        .any(|lo| in_hand(rank_at(lo - 1)) || in_hand(rank_at(lo + 4)))
}

/// Trips on board and hero holds a board singleton, or two pair on board
/// and hero holds one of the paired ranks.
fn blocks_full_house(hole: &[Card], board: &[Card]) -> bool {
    let count = |r: Rank| board.iter().filter(|c| c.rank() == r).count();
    let holds = |r: Rank| hole.iter().any(|c| c.rank() == r);
    let ranks = Rank::all();
    let trips = ranks.iter().any(|r| count(*r) >= 3);
    let pairs = ranks.iter().filter(|r| count(**r) == 2).collect::<Vec<_>>();
    match () {
        _ if trips => ranks.iter().any(|r| count(*r) == 1 && holds(*r)),
        _ if pairs.len() >= 2 => pairs.iter().any(|r| holds(**r)),
        _ => false,
    }
}

/// The tier's line when checked to on the river.
///
/// Blockers are tried in the file's `blocker_priority` order and the first
/// one held with an override wins. Otherwise the tier default applies.
pub fn apply_river_no_bet_adjustment(read: &RiverRead, rules: &Value) -> Option<(RuleNode, Option<Blocker>)> {
    let tier = rules.get("tiers")?.get(read.tier.as_str())?;
    let priority = rules
        .get("blocker_priority")
        .and_then(Value::as_array)
        .map(|list| list.iter().filter_map(Value::as_str).filter_map(|s| Blocker::try_from(s).ok()).collect())
        .unwrap_or_else(|| Blocker::all().to_vec());
    priority
        .into_iter()
        .filter(|b| read.blockers.contains(b))
        .find_map(|b| {
            tier.get("blockers")
                .and_then(|m| m.get(b.as_str()))
                .and_then(RuleNode::from_value)
                .map(|node| (node, Some(b)))
        })
        .or_else(|| tier.get("default").and_then(RuleNode::from_value).map(|node| (node, None)))
}

/// The tier's response to a river bet of the given facing size.
///
/// `facing_size_map` groups facing tags under shared keys. The group key,
/// then the raw tag, then `default` are tried in turn.
pub fn apply_river_facing_adjustment(read: &RiverRead, facing: &str, rules: &Value) -> Option<RuleNode> {
    let table = rules.get("tiers")?.get(read.tier.as_str())?.get("facing")?;
    let group = rules
        .get("facing_size_map")
        .and_then(Value::as_object)
        .and_then(|map| {
            map.iter()
                .find(|(_, tags)| tags.as_array().is_some_and(|t| t.iter().any(|x| x.as_str() == Some(facing))))
                .map(|(key, _)| key.as_str())
        });
    group
        .and_then(|g| table.get(g))
        .or_else(|| table.get(facing))
        .or_else(|| table.get("default"))
        .and_then(RuleNode::from_value)
}
