use super::*;
use crate::Chips;
use crate::N;
use crate::Position;
use crate::cards::*;

/// An immutable snapshot of one heads-up hand.
///
/// `HandState` is the betting state machine. It holds everything needed to
/// determine legal actions and pay out: stacks, street investments, the pot,
/// community cards, the remaining deck order, and an append-only event log.
///
/// Transitions are functional. [`try_apply`](Self::try_apply) returns a new
/// state and leaves the receiver untouched, so a refused action has no effect.
///
/// # Invariants
///
/// - `stack0 + stack1 + pot + invested0 + invested1` is constant until payout
/// - after payout `pot == 0` and the sum holds over stacks alone
/// - the button posts the small blind and acts first preflop
/// - the non-button acts first on every later street
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct HandState {
    session_id: String,
    hand_id: String,
    street: Phase,
    button: Position,
    to_act: Position,
    pot: Chips,
    last_bet: Chips,
    last_raise_size: Chips,
    sb: Chips,
    bb: Chips,
    players: [PlayerState; N],
    board: Vec<Card>,
    deck: Deck,
    events: Vec<Event>,
}

/// Hand entry points.
impl HandState {
    /// Deals a fresh hand with both players at the configured stack.
    pub fn start(
        cfg: &SessionConfig,
        session_id: &str,
        hand_id: &str,
        button: Position,
        seed: Option<u64>,
    ) -> Result<Self, GameError> {
        Self::start_with_carry(cfg, session_id, hand_id, button, [cfg.init_stack; N], seed)
    }
    /// Deals a hand with stacks carried over from a previous hand.
    ///
    /// The shuffled deck gives seat 0 cards 0 and 2, seat 1 cards 1 and 3.
    /// The board is drawn from the rest in order. Each stack must exceed
    /// the blind it posts.
    pub fn start_with_carry(
        cfg: &SessionConfig,
        session_id: &str,
        hand_id: &str,
        button: Position,
        stacks: [Chips; N],
        seed: Option<u64>,
    ) -> Result<Self, GameError> {
        cfg.validate()?;
        let button = button % N;
        let bigblind = 1 - button;
        for (seat, blind) in [(button, cfg.sb), (bigblind, cfg.bb)] {
            if stacks[seat] <= blind {
                return Err(GameError::ShortStack {
                    seat,
                    stack: stacks[seat],
                    blind,
                });
            }
        }
        let seed = seed.unwrap_or_else(rand::random::<u64>);
        let mut deck = Deck::shuffled(seed);
        let top = deck.deal(4);
        let mut state = Self {
            session_id: session_id.to_string(),
            hand_id: hand_id.to_string(),
            street: Phase::Betting(Street::Pref),
            button,
            to_act: button,
            pot: 0,
            last_bet: cfg.bb,
            last_raise_size: cfg.bb,
            sb: cfg.sb,
            bb: cfg.bb,
            players: [
                PlayerState::from((vec![top[0], top[2]], stacks[0])),
                PlayerState::from((vec![top[1], top[3]], stacks[1])),
            ],
            board: Vec::new(),
            deck,
            events: Vec::new(),
        };
        state.players[button].commit(cfg.sb);
        state.events.push(Event::Blind { who: button, amt: cfg.sb });
        state.players[bigblind].commit(cfg.bb);
        state.events.push(Event::Blind { who: bigblind, amt: cfg.bb });
        state.events.push(Event::DealHole);
        log::trace!("start {} seed {} button {}", hand_id, seed, button);
        Ok(state)
    }
    /// Replaces both players' hole cards and stacks the upcoming board.
    ///
    /// The deck is rebuilt as `runout` followed by every unseen card in order.
    /// Used to set up specific spots for analysis and replay.
    pub fn with_cards(mut self, holes: [Vec<Card>; N], runout: Vec<Card>) -> Self {
        let seen = [holes[0].as_slice(), holes[1].as_slice(), self.board.as_slice(), runout.as_slice()].concat();
        let seen = Hand::from(seen);
        let rest = Deck::new().filter(|c| !seen.contains(c));
        self.deck = Deck::from(runout.into_iter().chain(rest).collect::<Vec<_>>());
        for (player, hole) in self.players.iter_mut().zip(holes) {
            player.hole = hole;
        }
        self
    }
}

/// Public state accessors.
impl HandState {
    pub fn session_id(&self) -> &str {
        &self.session_id
    }
    pub fn hand_id(&self) -> &str {
        &self.hand_id
    }
    /// Betting street, showdown, or complete.
    pub fn phase(&self) -> Phase {
        self.street
    }
    /// The betting street, if betting is still open.
    pub fn street(&self) -> Option<Street> {
        self.street.street()
    }
    pub fn button(&self) -> Position {
        self.button
    }
    pub fn to_act(&self) -> Position {
        self.to_act
    }
    /// Chips swept into the middle from closed streets.
    pub fn pot(&self) -> Chips {
        self.pot
    }
    /// Pot plus both street investments.
    pub fn pot_now(&self) -> Chips {
        self.pot + self.players.iter().map(|p| p.invested_street).sum::<Chips>()
    }
    /// Street investment level a raise must exceed.
    pub fn last_bet(&self) -> Chips {
        self.last_bet
    }
    pub fn last_raise_size(&self) -> Chips {
        self.last_raise_size
    }
    pub fn sb(&self) -> Chips {
        self.sb
    }
    pub fn bb(&self) -> Chips {
        self.bb
    }
    pub fn players(&self) -> &[PlayerState; N] {
        &self.players
    }
    pub fn player(&self, seat: Position) -> &PlayerState {
        &self.players[seat % N]
    }
    pub fn stacks(&self) -> [Chips; N] {
        [self.players[0].stack, self.players[1].stack]
    }
    pub fn board(&self) -> &[Card] {
        &self.board
    }
    pub fn events(&self) -> &[Event] {
        &self.events
    }
    /// Every chip at the table: stacks, investments, pot.
    pub fn total(&self) -> Chips {
        self.pot + self.players.iter().map(|p| p.total()).sum::<Chips>()
    }
    pub fn is_complete(&self) -> bool {
        self.street.is_complete()
    }
    /// Chips the actor owes to continue.
    pub fn to_call(&self) -> Chips {
        let me = &self.players[self.to_act];
        let op = &self.players[1 - self.to_act];
        (op.invested_street - me.invested_street).max(0)
    }
    /// Smallest legal raise-to total, capped by the actor's chips.
    pub fn to_raise(&self) -> Chips {
        let me = &self.players[self.to_act];
        let step = self.last_raise_size.max(self.bb);
        (self.last_bet + step).min(me.total())
    }
    /// Smaller of the two stacks behind.
    pub fn effective(&self) -> Chips {
        self.players.iter().map(|p| p.stack).min().unwrap_or(0)
    }
}

/// Action validation and application.
impl HandState {
    /// Returns all legal actions for the player to act.
    ///
    /// Empty outside a betting street.
    pub fn legal(&self) -> Vec<LegalAction> {
        let Phase::Betting(street) = self.street else {
            return vec![];
        };
        let me = &self.players[self.to_act];
        let op = &self.players[1 - self.to_act];
        if me.folded || me.all_in || me.stack == 0 {
            return vec![];
        }
        let to_call = self.to_call();
        if op.all_in {
            return match to_call {
                0 => vec![],
                _ => vec![LegalAction::fold(), LegalAction::call(to_call)],
            };
        }
        let mut options = Vec::new();
        if to_call == 0 {
            options.push(LegalAction::check());
            if street == Street::Pref {
                options.push(LegalAction::raise(self.to_raise(), me.total()));
            } else if self.last_bet == 0 {
                options.push(LegalAction::bet(self.bb.min(me.stack), me.stack));
            }
        } else {
            options.push(LegalAction::fold());
            options.push(LegalAction::call(to_call));
            if me.stack > to_call {
                options.push(LegalAction::raise(self.to_raise(), me.total()));
            }
        }
        options.push(LegalAction::allin(me.stack));
        options
    }
    /// Returns a new state with the action applied.
    ///
    /// `amount` is the bet size for `bet` and the raise-to total for `raise`;
    /// when absent the minimum is used. Other actions ignore it, except that
    /// an `allin` amount must equal the stack.
    pub fn try_apply(&self, action: Action, amount: Option<Chips>) -> Result<Self, GameError> {
        if !self.street.is_betting() {
            return Err(GameError::HandOver);
        }
        let legal = self.legal();
        let Some(bounds) = legal.find(action).copied() else {
            return Err(GameError::Illegal {
                action,
                phase: self.street.to_string(),
            });
        };
        let chosen = match (bounds.min, bounds.max) {
            (Some(min), Some(max)) => {
                let chips = amount.unwrap_or(min);
                if action.is_sized() || action == Action::Allin {
                    if chips < min || chips > max {
                        return Err(GameError::OutOfRange {
                            action,
                            amount: chips,
                            min,
                            max,
                        });
                    }
                }
                chips
            }
            _ => 0,
        };
        let who = self.to_act;
        let mut child = self.clone();
        match action {
            Action::Fold => {
                child.fold(who);
                return Ok(child);
            }
            Action::Check => child.check(who),
            Action::Call => child.call(who),
            Action::Bet => child.bet(who, chosen),
            Action::Raise => child.raise(who, chosen),
            Action::Allin => child.shove(who),
        }
        child.players[who].acted = true;
        child.advance(who);
        debug_assert!(child.total() == self.total());
        Ok(child)
    }
    /// Pays out a hand that reached showdown. No-op in any other phase.
    ///
    /// Ties split the pot with the odd chip to seat 1.
    pub fn settle(&self, evaluator: &dyn Evaluate) -> Self {
        if self.street != Phase::Showdown {
            return self.clone();
        }
        let mut child = self.clone();
        child.pot += child.players.iter_mut().map(|p| p.sweep()).sum::<Chips>();
        let pot = child.pot;
        let [e0, e1] = [0, 1].map(|i| evaluator.evaluate(&child.players[i].hole, &child.board));
        let winner = match e0.strength.cmp(&e1.strength) {
            std::cmp::Ordering::Greater => Some(0),
            std::cmp::Ordering::Less => Some(1),
            std::cmp::Ordering::Equal => None,
        };
        log::trace!("showdown {} | {} vs {}", child.hand_id, e0.strength, e1.strength);
        child.events.push(Event::Showdown {
            winner,
            best5: [e0.best5, e1.best5],
        });
        match winner {
            Some(who) => {
                child.players[who].win(pot);
                child.events.push(Event::WinShowdown { who, amt: pot });
            }
            None => {
                let half = pot / 2;
                let amts = [half, pot - half];
                for (player, amt) in child.players.iter_mut().zip(amts) {
                    player.win(amt);
                }
                child.events.push(Event::Split { amts });
            }
        }
        child.pot = 0;
        child.street = Phase::Complete;
        child
    }
}

/// Private mutation methods.
impl HandState {
    fn fold(&mut self, who: Position) {
        self.players[who].folded = true;
        self.events.push(Event::Fold { who });
        let winner = 1 - who;
        let amt = self.pot + self.players.iter_mut().map(|p| p.sweep()).sum::<Chips>();
        self.players[winner].win(amt);
        self.events.push(Event::WinFold { who: winner, amt });
        self.pot = 0;
        self.street = Phase::Complete;
        log::trace!("{} folds, {} wins {}", who, winner, amt);
    }
    fn check(&mut self, who: Position) {
        self.events.push(Event::Check { who });
    }
    fn call(&mut self, who: Position) {
        let owed = self.to_call();
        let paid = owed.min(self.players[who].stack);
        self.players[who].commit(paid);
        if paid < owed {
            let refund = owed - paid;
            self.players[1 - who].refund(refund);
            self.events.push(Event::CallShort { who, amt: paid, refund });
        } else {
            self.events.push(Event::Call { who, amt: paid });
        }
    }
    fn bet(&mut self, who: Position, amt: Chips) {
        self.players[who].commit(amt);
        self.last_bet = self.players[who].invested_street;
        self.last_raise_size = amt;
        self.events.push(Event::Bet { who, amt });
    }
    fn raise(&mut self, who: Position, to: Chips) {
        let delta = to - self.players[who].invested_street;
        self.players[who].commit(delta);
        self.reopen(to);
        self.events.push(Event::Raise { who, to });
    }
    fn shove(&mut self, who: Position) {
        let owed = self.to_call();
        let amt = self.players[who].stack;
        let to = self.players[who].invested_street + amt;
        let as_ = if owed == 0 && self.last_bet == 0 {
            AllinAs::Bet
        } else if amt > owed {
            AllinAs::Raise
        } else if amt == owed {
            AllinAs::Call
        } else {
            AllinAs::CallShort
        };
        self.players[who].commit(amt);
        match as_ {
            AllinAs::Bet => {
                self.last_bet = to;
                self.last_raise_size = amt;
            }
            AllinAs::Raise => self.reopen(to),
            AllinAs::Call => {}
            AllinAs::CallShort => self.players[1 - who].refund(owed - amt),
        }
        self.events.push(Event::Allin { who, amt, as_ });
    }
    /// A raise to `to` reopens action only if its increment is a full raise.
    fn reopen(&mut self, to: Chips) {
        let increment = to - self.last_bet;
        if increment >= self.last_raise_size {
            self.last_raise_size = increment;
            self.last_bet = to;
        }
    }
}

/// Street advancement.
impl HandState {
    /// Closes streets and runs out the board until someone must decide.
    fn advance(&mut self, who: Position) {
        let mut closed = false;
        while let Phase::Betting(street) = self.street {
            let [a, b] = &self.players;
            let level = a.invested_street == b.invested_street;
            let acted = a.acted && b.acted;
            let shoved = a.all_in || b.all_in;
            let everyone_shoved = a.all_in && b.all_in;
            if everyone_shoved || (shoved && level) || (acted && level) {
                self.close(street);
                closed = true;
            } else {
                if !closed {
                    self.to_act = 1 - who;
                }
                return;
            }
        }
    }
    /// Sweeps investments into the pot and deals the next street.
    fn close(&mut self, street: Street) {
        self.pot += self.players.iter_mut().map(|p| p.sweep()).sum::<Chips>();
        self.last_bet = 0;
        self.last_raise_size = 0;
        match street.next() {
            Some(next) => {
                let cards = self.deck.deal(next.n_revealed());
                self.board.extend(cards.iter().copied());
                self.events.push(Event::Board { street: next, cards });
                self.street = Phase::Betting(next);
                self.to_act = 1 - self.button;
                log::trace!("{} {} pot {}", self.hand_id, next, self.pot);
            }
            None => {
                self.street = Phase::Showdown;
            }
        }
    }
}

impl std::fmt::Display for HandState {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for (i, player) in self.players.iter().enumerate() {
            let mark = if i == self.button { "D" } else { " " };
            let turn = if i == self.to_act && self.street.is_betting() { "*" } else { " " };
            writeln!(f, "{}{} {}", mark, turn, player)?;
        }
        let board = self.board.iter().map(|c| c.to_string()).collect::<Vec<_>>().join(" ");
        writeln!(f, "Pot   {}", self.pot)?;
        writeln!(f, "Board {}", board)?;
        write!(f, "Phase {}", self.street)
    }
}

/// Deals a fresh hand. See [`HandState::start`].
pub fn start_hand(
    cfg: &SessionConfig,
    session_id: &str,
    hand_id: &str,
    button: Position,
    seed: Option<u64>,
) -> Result<HandState, GameError> {
    HandState::start(cfg, session_id, hand_id, button, seed)
}
/// Deals a hand with carried stacks. See [`HandState::start_with_carry`].
pub fn start_hand_with_carry(
    cfg: &SessionConfig,
    session_id: &str,
    hand_id: &str,
    button: Position,
    stacks: [Chips; N],
    seed: Option<u64>,
) -> Result<HandState, GameError> {
    HandState::start_with_carry(cfg, session_id, hand_id, button, stacks, seed)
}
/// Legal actions for the player to act.
pub fn legal_actions(state: &HandState) -> Vec<LegalAction> {
    state.legal()
}
/// Applies an action, returning the successor state.
pub fn apply_action(state: &HandState, action: Action, amount: Option<Chips>) -> Result<HandState, GameError> {
    state.try_apply(action, amount)
}
/// Pays out at showdown, otherwise returns the state unchanged.
pub fn settle_if_needed(state: &HandState, evaluator: &dyn Evaluate) -> HandState {
    state.settle(evaluator)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> SessionConfig {
        SessionConfig::new(200, 1, 2)
    }
    fn root() -> HandState {
        HandState::start(&cfg(), "s", "h1", 0, Some(7)).unwrap()
    }
    fn cards(s: &str) -> Vec<Card> {
        Card::parse(s).unwrap()
    }
    fn actions(state: &HandState) -> Vec<Action> {
        state.legal().iter().map(|a| a.action).collect()
    }

    /// same seed deals the same hand
    #[test]
    fn seeded_deal() {
        let a = root();
        let b = root();
        assert_eq!(a, b);
        let deck = Deck::shuffled(7);
        assert_eq!(a.player(0).hole, vec![deck.peek(0).unwrap(), deck.peek(2).unwrap()]);
        assert_eq!(a.player(1).hole, vec![deck.peek(1).unwrap(), deck.peek(3).unwrap()]);
    }

    /// button posts small blind and acts first
    #[test]
    fn blinds_posted() {
        let game = root();
        assert_eq!(game.player(0).invested_street, 1);
        assert_eq!(game.player(1).invested_street, 2);
        assert_eq!(game.pot(), 0);
        assert_eq!(game.pot_now(), 3);
        assert_eq!(game.to_act(), 0);
        assert_eq!(game.total(), 400);
        assert_eq!(game.events()[0], Event::Blind { who: 0, amt: 1 });
        assert_eq!(game.events()[2], Event::DealHole);
    }

    /// legal() preflop after blinds
    #[test]
    fn legal_preflop_options() {
        let legal = root().legal();
        assert_eq!(
            legal,
            vec![
                LegalAction::fold(),
                LegalAction::call(1),
                LegalAction::raise(4, 200),
                LegalAction::allin(199),
            ]
        );
    }

    /// big blind keeps the option to raise after a limp
    #[test]
    fn bb_option_after_limp() {
        let game = root().try_apply(Action::Call, None).unwrap();
        assert_eq!(game.to_act(), 1);
        assert_eq!(actions(&game), vec![Action::Check, Action::Raise, Action::Allin]);
        assert_eq!(game.legal().find(Action::Raise).unwrap().min, Some(4));
    }

    /// limp and check closes preflop and deals the flop
    #[test]
    fn limp_check_deals_flop() {
        let game = root()
            .try_apply(Action::Call, None)
            .unwrap()
            .try_apply(Action::Check, None)
            .unwrap();
        assert_eq!(game.street(), Some(Street::Flop));
        assert_eq!(game.board().len(), 3);
        assert_eq!(game.pot(), 4);
        assert_eq!(game.to_act(), 1);
        assert_eq!(game.last_bet(), 0);
        assert!(matches!(game.events().last(), Some(Event::Board { street: Street::Flop, .. })));
        assert_eq!(actions(&game), vec![Action::Check, Action::Bet, Action::Allin]);
    }

    /// the player out of position opens every postflop street
    #[test]
    fn postflop_first_actor() {
        let lines: [&[(Action, Option<Chips>)]; 3] = [
            &[(Action::Call, None), (Action::Check, None)],
            &[(Action::Raise, Some(6)), (Action::Call, None)],
            &[(Action::Raise, Some(6)), (Action::Raise, Some(18)), (Action::Call, None)],
        ];
        for button in 0..N {
            for line in lines.iter() {
                let mut game = HandState::start(&cfg(), "s", "h", button, Some(9)).unwrap();
                assert_eq!(game.to_act(), button);
                for &(action, amount) in line.iter() {
                    game = game.try_apply(action, amount).unwrap();
                }
                assert_eq!(game.street(), Some(Street::Flop), "button {} line {:?}", button, line);
                assert_eq!(game.to_act(), 1 - button, "button {} line {:?}", button, line);
                let game = game
                    .try_apply(Action::Check, None)
                    .unwrap()
                    .try_apply(Action::Check, None)
                    .unwrap();
                assert_eq!(game.street(), Some(Street::Turn));
                assert_eq!(game.to_act(), 1 - button);
            }
        }
    }

    /// out-of-range amounts are refused and the state is untouched
    #[test]
    fn out_of_range_refused() {
        let game = root();
        let before = game.clone();
        let err = game.try_apply(Action::Raise, Some(3)).unwrap_err();
        assert_eq!(err, GameError::OutOfRange { action: Action::Raise, amount: 3, min: 4, max: 200 });
        assert!(game.try_apply(Action::Raise, Some(201)).is_err());
        assert!(matches!(game.try_apply(Action::Check, None), Err(GameError::Illegal { .. })));
        assert_eq!(game, before);
    }

    /// a call short of the price refunds the uncalled excess
    #[test]
    fn short_call_refunds() {
        let game = HandState::start_with_carry(&cfg(), "s", "h", 0, [300, 100], Some(3)).unwrap();
        let game = game.try_apply(Action::Raise, Some(150)).unwrap();
        assert_eq!(game.to_call(), 148);
        let game = game.try_apply(Action::Call, None).unwrap();
        assert!(game.events().contains(&Event::CallShort { who: 1, amt: 98, refund: 50 }));
        assert!(game.player(1).all_in);
        assert_eq!(game.player(1).stack, 0);
        assert_eq!(game.player(0).stack, 200);
        assert_eq!(game.phase(), Phase::Showdown);
        assert_eq!(game.board().len(), 5);
        assert_eq!(game.pot(), 200);
        assert_eq!(game.total(), 400);
    }

    /// both all-in on the flop runs out the board to showdown
    #[test]
    fn flop_allin_runs_out() {
        let game = root()
            .try_apply(Action::Call, None)
            .unwrap()
            .try_apply(Action::Check, None)
            .unwrap();
        let game = game.try_apply(Action::Allin, None).unwrap();
        assert!(matches!(game.events().last(), Some(Event::Allin { as_: AllinAs::Bet, .. })));
        assert_eq!(actions(&game), vec![Action::Fold, Action::Call]);
        let game = game.try_apply(Action::Allin, None);
        assert!(game.is_err());
        let game = root()
            .try_apply(Action::Call, None)
            .unwrap()
            .try_apply(Action::Check, None)
            .unwrap()
            .try_apply(Action::Allin, None)
            .unwrap()
            .try_apply(Action::Call, None)
            .unwrap();
        assert_eq!(game.phase(), Phase::Showdown);
        assert_eq!(game.board().len(), 5);
        let done = game.settle(&Bitwise);
        assert!(done.is_complete());
        assert_eq!(done.pot(), 0);
        assert_eq!(done.stacks().iter().sum::<Chips>(), 400);
    }

    /// a short all-in raise does not reopen the betting
    #[test]
    fn short_allin_does_not_reopen() {
        let game = HandState::start_with_carry(&cfg(), "s", "h", 0, [200, 60], Some(5)).unwrap();
        let game = game.try_apply(Action::Raise, Some(40)).unwrap();
        assert_eq!(game.last_bet(), 40);
        assert_eq!(game.last_raise_size(), 38);
        let game = game.try_apply(Action::Allin, None).unwrap();
        assert!(matches!(game.events().last(), Some(Event::Allin { amt: 58, as_: AllinAs::Raise, .. })));
        assert_eq!(game.last_bet(), 40);
        assert_eq!(game.last_raise_size(), 38);
        assert_eq!(game.legal(), vec![LegalAction::fold(), LegalAction::call(20)]);
    }

    /// a full raise updates the reopen bookkeeping
    #[test]
    fn min_raise_size() {
        let game = root();
        assert_eq!(game.to_raise(), 4);
        let game = game.try_apply(Action::Raise, Some(6)).unwrap();
        assert_eq!(game.last_raise_size(), 4);
        assert_eq!(game.to_raise(), 10);
    }

    /// folding awards everything in the middle to the opponent
    #[test]
    fn fold_awards_pot() {
        let game = root().try_apply(Action::Fold, None).unwrap();
        assert!(game.is_complete());
        assert_eq!(game.stacks(), [199, 201]);
        assert_eq!(game.pot(), 0);
        assert!(game.events().contains(&Event::WinFold { who: 1, amt: 3 }));
        assert_eq!(game.try_apply(Action::Check, None), Err(GameError::HandOver));
        assert!(game.legal().is_empty());
    }

    /// settle outside showdown is a no-op
    #[test]
    fn settle_noop_before_showdown() {
        let game = root();
        assert_eq!(game.settle(&Bitwise), game);
    }

    /// rigged cards decide the showdown
    #[test]
    fn rigged_showdown() {
        let game = root().with_cards([cards("AhAd"), cards("KhKd")], cards("2c7d9h3s4c"));
        let mut game = game.try_apply(Action::Call, None).unwrap();
        while game.phase().is_betting() {
            game = game.try_apply(Action::Check, None).unwrap();
        }
        assert_eq!(game.board(), cards("2c7d9h3s4c").as_slice());
        let done = game.settle(&Exhaustive);
        assert_eq!(done.stacks(), [202, 198]);
        assert!(done.events().contains(&Event::WinShowdown { who: 0, amt: 4 }));
    }

    /// board plays for both players splits the pot
    #[test]
    fn split_pot() {
        let game = root().with_cards([cards("2h3d"), cards("2d3h")], cards("AsKsQsJsTs"));
        let mut game = game.try_apply(Action::Call, None).unwrap();
        while game.phase().is_betting() {
            game = game.try_apply(Action::Check, None).unwrap();
        }
        let done = game.settle(&Bitwise);
        assert_eq!(done.stacks(), [200, 200]);
        assert!(done.events().contains(&Event::Split { amts: [2, 2] }));
    }

    /// chips are conserved along arbitrary legal sequences
    #[test]
    fn chip_conservation() {
        for seed in 0..60u64 {
            let mut game = HandState::start(&cfg(), "s", "h", (seed % 2) as usize, Some(seed)).unwrap();
            let mut step = seed as usize;
            while game.phase().is_betting() {
                let legal = game.legal();
                let pick = legal[step % legal.len()];
                let amount = match (pick.min, pick.max) {
                    (Some(lo), Some(hi)) => Some(lo + (hi - lo) / 3),
                    _ => None,
                };
                game = game.try_apply(pick.action, amount).unwrap();
                assert_eq!(game.total(), 400, "seed {}", seed);
                step += 7;
            }
            let done = game.settle(&Bitwise);
            assert!(done.is_complete());
            assert_eq!(done.stacks().iter().sum::<Chips>(), 400);
        }
    }

    /// the free functions drive the same transitions as the methods
    #[test]
    fn free_functions() {
        let game = start_hand_with_carry(&cfg(), "s", "h", 1, [150, 250], Some(4)).unwrap();
        assert_eq!(legal_actions(&game), game.legal());
        assert_eq!(game.to_act(), 1);
        let game = apply_action(&game, Action::Call, None).unwrap();
        let game = apply_action(&game, Action::Check, None).unwrap();
        assert_eq!(game.to_act(), 0);
        assert_eq!(legal_actions(&game).iter().map(|a| a.action).collect::<Vec<_>>(), vec![Action::Check, Action::Bet, Action::Allin]);
        assert_eq!(settle_if_needed(&game, &Bitwise), game);
        assert_eq!(game.total(), 400);
    }

    /// stacks must exceed the blind they post
    #[test]
    fn carry_requires_blind_cover() {
        let err = HandState::start_with_carry(&cfg(), "s", "h", 1, [2, 100], None).unwrap_err();
        assert_eq!(err, GameError::ShortStack { seat: 0, stack: 2, blind: 2 });
    }
}
