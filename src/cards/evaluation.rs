use super::card::Card;
use super::evaluator::Evaluator;
use super::hand::Hand;
use super::strength::Strength;
use std::sync::Arc;
use std::sync::RwLock;

/// The outcome of evaluating a player's hole cards against a board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    pub strength: Strength,
    pub best5: Vec<Card>,
}

/// Hand evaluation capability used at showdown and for hand classification.
pub trait Evaluate: Send + Sync {
    fn evaluate(&self, hole: &[Card], board: &[Card]) -> Evaluation;
}

/// Direct bitwise search over the combined seven cards.
#[derive(Debug, Default, Clone, Copy)]
pub struct Bitwise;

impl Evaluate for Bitwise {
    fn evaluate(&self, hole: &[Card], board: &[Card]) -> Evaluation {
        let hand = Hand::from([hole, board].concat());
        let eval = Evaluator::from(hand);
        let ranking = eval.find_ranking();
        let kickers = eval.find_kickers(ranking);
        Evaluation {
            strength: Strength::from((ranking, kickers)),
            best5: eval.find_best5(ranking, kickers),
        }
    }
}

/// Scores every five-card subset and keeps the strongest.
///
/// Slower than [`Bitwise`] but trivially correct, which makes it the
/// reference the fast path is checked against.
#[derive(Debug, Default, Clone, Copy)]
pub struct Exhaustive;

impl Evaluate for Exhaustive {
    fn evaluate(&self, hole: &[Card], board: &[Card]) -> Evaluation {
        let cards = [hole, board].concat();
        if cards.len() <= 5 {
            return Bitwise.evaluate(&cards, &[]);
        }
        Self::subsets(&cards)
            .into_iter()
            .map(|five| Bitwise.evaluate(&five, &[]))
            .max_by(|a, b| a.strength.cmp(&b.strength))
            .unwrap_or_else(|| Bitwise.evaluate(&cards, &[]))
    }
}

impl Exhaustive {
    fn subsets(cards: &[Card]) -> Vec<Vec<Card>> {
        let n = cards.len();
        (0u32..(1 << n))
            .filter(|mask| mask.count_ones() == 5)
            .map(|mask| {
                (0..n)
                    .filter(|i| mask & (1 << i) != 0)
                    .map(|i| cards[i])
                    .collect()
            })
            .collect()
    }
}

/// Which evaluator implementation to use.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvaluatorKind {
    #[default]
    Bitwise,
    Exhaustive,
}

impl TryFrom<&str> for EvaluatorKind {
    type Error = String;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s.trim().to_lowercase().as_str() {
            "bitwise" | "fast" => Ok(Self::Bitwise),
            "exhaustive" | "naive" => Ok(Self::Exhaustive),
            _ => Err(format!("unknown evaluator: {}", s)),
        }
    }
}

/// Builds and caches the configured evaluator.
pub struct EvaluatorFactory {
    kind: EvaluatorKind,
    cache: RwLock<Option<Arc<dyn Evaluate>>>,
}

impl EvaluatorFactory {
    pub fn new(kind: EvaluatorKind) -> Self {
        Self {
            kind,
            cache: RwLock::new(None),
        }
    }
    pub fn kind(&self) -> EvaluatorKind {
        self.kind
    }
    pub fn get(&self) -> Arc<dyn Evaluate> {
        if let Some(eval) = self.cache.read().ok().and_then(|c| c.clone()) {
            return eval;
        }
        let eval: Arc<dyn Evaluate> = match self.kind {
            EvaluatorKind::Bitwise => Arc::new(Bitwise),
            EvaluatorKind::Exhaustive => Arc::new(Exhaustive),
        };
        log::debug!("built {:?} evaluator", self.kind);
        if let Ok(mut cache) = self.cache.write() {
            *cache = Some(eval.clone());
        }
        eval
    }
    /// drop the cached instance so the next get() rebuilds it
    pub fn invalidate(&self) {
        if let Ok(mut cache) = self.cache.write() {
            *cache = None;
        }
    }
}
