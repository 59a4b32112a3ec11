use super::card::Card;
use super::hand::Hand;
use super::kicks::Kickers;
use super::rank::Rank;
use super::ranking::Ranking;
use super::suit::Suit;

const WHEEL: u16 = 0b_1000000001111;
const LOWEST_STRAIGHT_RANK: Rank = Rank::Five;

/// A lazy evaluator for a hand's strength.
///
/// Using a compact representation of the Hand, we search for
/// the highest Ranking using bitwise operations, from the strongest
/// category down, and stop at the first hit.
pub struct Evaluator(Hand);
impl From<Hand> for Evaluator {
    fn from(h: Hand) -> Self {
        Self(h)
    }
}

impl Evaluator {
    pub fn find_ranking(&self) -> Ranking {
        None.or_else(|| self.find_straight_flush())
            .or_else(|| self.find_4_oak())
            .or_else(|| self.find_3_oak_2_oak())
            .or_else(|| self.find_flush())
            .or_else(|| self.find_straight())
            .or_else(|| self.find_3_oak())
            .or_else(|| self.find_2_oak_2_oak())
            .or_else(|| self.find_1_oak())
            .unwrap_or(Ranking::HighCard(Rank::Two))
    }
    pub fn find_kickers(&self, value: Ranking) -> Kickers {
        match value.n_kickers() {
            0 => Kickers::from(0u32),
            n => {
                let hand = match value {
                    Ranking::Flush(_) => self
                        .find_suit_of_flush()
                        .map(|suit| u16::from(self.0.of(&suit)))
                        .unwrap_or_default(),
                    _ => u16::from(self.0),
                };
                let mut rank = hand & value.mask();
                while n < rank.count_ones() as usize {
                    let last = rank.trailing_zeros();
                    rank &= !(1 << last);
                }
                Kickers::from(rank)
            }
        }
    }
    /// the five cards that realize the ranking, defining cards first
    pub fn find_best5(&self, value: Ranking, kicks: Kickers) -> Vec<Card> {
        let flush = self.find_suit_of_flush();
        let mut cards = match value {
            Ranking::StraightFlush(hi) => self.straight_cards(hi, flush),
            Ranking::Straight(hi) => self.straight_cards(hi, None),
            Ranking::Flush(hi) => self.rank_cards(hi, 1, flush),
            Ranking::FourOAK(hi) => self.rank_cards(hi, 4, None),
            Ranking::ThreeOAK(hi) => self.rank_cards(hi, 3, None),
            Ranking::OnePair(hi) => self.rank_cards(hi, 2, None),
            Ranking::HighCard(hi) => self.rank_cards(hi, 1, None),
            Ranking::FullHouse(hi, lo) => [self.rank_cards(hi, 3, None), self.rank_cards(lo, 2, None)].concat(),
            Ranking::TwoPair(hi, lo) => [self.rank_cards(hi, 2, None), self.rank_cards(lo, 2, None)].concat(),
        };
        let suit = match value {
            Ranking::Flush(_) => flush,
            _ => None,
        };
        for rank in Vec::<Rank>::from(kicks) {
            cards.extend(self.rank_cards(rank, 1, suit));
        }
        cards.truncate(5);
        cards
    }

    fn find_1_oak(&self) -> Option<Ranking> {
        self.find_rank_of_n_oak(1).map(Ranking::HighCard)
    }
    fn find_3_oak(&self) -> Option<Ranking> {
        self.find_rank_of_n_oak(3).map(Ranking::ThreeOAK)
    }
    fn find_4_oak(&self) -> Option<Ranking> {
        self.find_rank_of_n_oak(4).map(Ranking::FourOAK)
    }
    fn find_2_oak_2_oak(&self) -> Option<Ranking> {
        self.find_rank_of_n_oak(2).and_then(|hi| {
            self.find_rank_of_n_oak_skip(2, Some(hi))
                .map(|lo| Ranking::TwoPair(hi, lo))
                .or_else(|| Some(Ranking::OnePair(hi)))
        })
    }
    fn find_3_oak_2_oak(&self) -> Option<Ranking> {
        self.find_rank_of_n_oak(3).and_then(|triple| {
            self.find_rank_of_n_oak_skip(2, Some(triple))
                .map(|paired| Ranking::FullHouse(triple, paired))
        })
    }
    fn find_straight(&self) -> Option<Ranking> {
        self.find_rank_of_straight(self.0).map(Ranking::Straight)
    }
    fn find_flush(&self) -> Option<Ranking> {
        self.find_suit_of_flush().map(|suit| {
            let bits = u16::from(self.0.of(&suit));
            let rank = Rank::from(bits);
            Ranking::Flush(rank)
        })
    }
    fn find_straight_flush(&self) -> Option<Ranking> {
        self.find_suit_of_flush().and_then(|suit| {
            self.find_rank_of_straight_flush(suit)
                .map(Ranking::StraightFlush)
        })
    }

    fn find_rank_of_straight(&self, hand: Hand) -> Option<Rank> {
        let wheel = WHEEL;
        let ranks = u16::from(hand);
        let mut bits = ranks;
        bits &= bits << 1;
        bits &= bits << 1;
        bits &= bits << 1;
        bits &= bits << 1;
        if bits > 0 {
            Some(Rank::from(bits))
        } else if wheel == (wheel & ranks) {
            Some(LOWEST_STRAIGHT_RANK)
        } else {
            None
        }
    }
    fn find_rank_of_straight_flush(&self, suit: Suit) -> Option<Rank> {
        let hand = self.0.of(&suit);
        self.find_rank_of_straight(hand)
    }
    fn find_suit_of_flush(&self) -> Option<Suit> {
        Suit::all()
            .into_iter()
            .find(|s| (u64::from(*s) & u64::from(self.0)).count_ones() >= 5)
    }
    fn find_rank_of_n_oak(&self, n: usize) -> Option<Rank> {
        self.find_rank_of_n_oak_skip(n, None)
    }
    fn find_rank_of_n_oak_skip(&self, n: usize, skip: Option<Rank>) -> Option<Rank> {
        let mut high = u64::from(Rank::Ace) << 4;
        while high > 0 {
            high >>= 4;
            if let Some(skip) = skip {
                let skip = u64::from(skip);
                let skip = high & skip;
                let skip = skip != 0;
                if skip {
                    continue;
                }
            }
            let mine = u64::from(self.0);
            let mine = high & mine;
            let mine = mine.count_ones() >= n as u32;
            if high > 0 && mine {
                return Some(Rank::lo(high));
            }
        }
        None
    }

    /// up to n cards of this rank, highest suit first, optionally in one suit
    fn rank_cards(&self, rank: Rank, n: usize, suit: Option<Suit>) -> Vec<Card> {
        Suit::all()
            .into_iter()
            .rev()
            .filter(|s| suit.map_or(true, |only| only == *s))
            .map(|s| Card::from((rank, s)))
            .filter(|c| self.0.contains(c))
            .take(n)
            .collect()
    }
    /// five descending cards ending the straight at hi
    fn straight_cards(&self, hi: Rank, suit: Option<Suit>) -> Vec<Card> {
        (0..5u8)
            .map(|i| (u8::from(hi) + 13 - i) % 13)
            .map(|i| if i == 12 && hi == LOWEST_STRAIGHT_RANK { Rank::Ace } else { Rank::from(i) })
            .flat_map(|r| self.rank_cards(r, 1, suit))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::hand::Hand;

    fn eval(s: &str) -> (Ranking, Kickers) {
        let eval = Evaluator::from(Hand::try_from(s).unwrap());
        let ranking = eval.find_ranking();
        let kickers = eval.find_kickers(ranking);
        (ranking, kickers)
    }

    #[test]
    fn high_card() {
        let (ranking, kickers) = eval("As Kh Qd Jc 9s");
        assert_eq!(ranking, Ranking::HighCard(Rank::Ace));
        assert_eq!(kickers, Kickers::from(vec![Rank::King, Rank::Queen, Rank::Jack, Rank::Nine]));
    }

    #[test]
    fn one_pair() {
        let (ranking, kickers) = eval("As Ah Kd Qc Js");
        assert_eq!(ranking, Ranking::OnePair(Rank::Ace));
        assert_eq!(kickers, Kickers::from(vec![Rank::King, Rank::Queen, Rank::Jack]));
    }

    #[test]
    fn two_pair() {
        let (ranking, kickers) = eval("As Ah Kd Kc Qs");
        assert_eq!(ranking, Ranking::TwoPair(Rank::Ace, Rank::King));
        assert_eq!(kickers, Kickers::from(vec![Rank::Queen]));
    }

    #[test]
    fn straight() {
        let (ranking, kickers) = eval("Ts Jh Qd Kc As");
        assert_eq!(ranking, Ranking::Straight(Rank::Ace));
        assert_eq!(kickers, Kickers::from(vec![]));
    }

    #[test]
    fn flush_compares_all_five() {
        let (ranking, kickers) = eval("As Ks Qs Js 9s");
        assert_eq!(ranking, Ranking::Flush(Rank::Ace));
        assert_eq!(kickers, Kickers::from(vec![Rank::King, Rank::Queen, Rank::Jack, Rank::Nine]));
        let (_, weaker) = eval("As Ks Qs Js 8s");
        assert!(kickers > weaker);
    }

    #[test]
    fn full_house() {
        let (ranking, kickers) = eval("2s 2h 2d 3c 3s");
        assert_eq!(ranking, Ranking::FullHouse(Rank::Two, Rank::Three));
        assert_eq!(kickers, Kickers::from(vec![]));
    }

    #[test]
    fn full_house_beats_flush() {
        assert!(Ranking::FullHouse(Rank::Two, Rank::Three) > Ranking::Flush(Rank::Ace));
        assert!(Ranking::Flush(Rank::Seven) > Ranking::Straight(Rank::Ace));
    }

    #[test]
    fn four_oak() {
        let (ranking, kickers) = eval("As Ah Ad Ac Ks");
        assert_eq!(ranking, Ranking::FourOAK(Rank::Ace));
        assert_eq!(kickers, Kickers::from(vec![Rank::King]));
    }

    #[test]
    fn wheel_straight() {
        let (ranking, _) = eval("As 2h 3d 4c 5s");
        assert_eq!(ranking, Ranking::Straight(Rank::Five));
    }

    #[test]
    fn wheel_straight_flush() {
        let (ranking, _) = eval("As 2s 3s 4s 5s");
        assert_eq!(ranking, Ranking::StraightFlush(Rank::Five));
    }

    #[test]
    fn seven_card_hand() {
        let (ranking, kickers) = eval("As Ah Kd Kc Qs Jh 9d");
        assert_eq!(ranking, Ranking::TwoPair(Rank::Ace, Rank::King));
        assert_eq!(kickers, Kickers::from(vec![Rank::Queen]));
    }

    #[test]
    fn flush_over_straight() {
        let (ranking, kickers) = eval("4h 6h 7h 8h 9h Ts");
        assert_eq!(ranking, Ranking::Flush(Rank::Nine));
        assert_eq!(kickers, Kickers::from(vec![Rank::Eight, Rank::Seven, Rank::Six, Rank::Four]));
    }

    #[test]
    fn full_house_over_flush() {
        let (ranking, _) = eval("Kh Ah Ad As Ks Qs Js 9s");
        assert_eq!(ranking, Ranking::FullHouse(Rank::Ace, Rank::King));
    }

    #[test]
    fn three_pair() {
        let (ranking, kickers) = eval("As Ah Kd Kc Qs Qh Jd");
        assert_eq!(ranking, Ranking::TwoPair(Rank::Ace, Rank::King));
        assert_eq!(kickers, Kickers::from(vec![Rank::Queen]));
    }

    #[test]
    fn two_three_oak() {
        let (ranking, _) = eval("As Ah Ad Kc Ks Kh Qd");
        assert_eq!(ranking, Ranking::FullHouse(Rank::Ace, Rank::King));
    }

    #[test]
    fn best_five_of_seven() {
        let eval = Evaluator::from(Hand::try_from("As Ah Kd Kc Qs Jh 9d").unwrap());
        let ranking = eval.find_ranking();
        let kickers = eval.find_kickers(ranking);
        let best = eval.find_best5(ranking, kickers);
        let text = best.iter().map(|c| c.to_string()).collect::<Vec<_>>().join(" ");
        assert_eq!(text, "As Ah Kd Kc Qs");
    }

    #[test]
    fn best_five_wheel() {
        let eval = Evaluator::from(Hand::try_from("As 2h 3d 4c 5s Kd").unwrap());
        let ranking = eval.find_ranking();
        let best = eval.find_best5(ranking, eval.find_kickers(ranking));
        let text = best.iter().map(|c| c.to_string()).collect::<Vec<_>>().join(" ");
        assert_eq!(text, "5s 4c 3d 2h As");
    }
}
