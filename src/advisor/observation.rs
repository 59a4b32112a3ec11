use super::calculators::Facing;
use super::classify::*;
use super::codes::Code;
use super::codes::Rationales;
use super::profile::Bundle;
use super::river::RiverRead;
use super::river::analyze_river;
use crate::Chips;
use crate::Position;
use crate::cards::Card;
use crate::cards::Evaluate;
use crate::cards::Street;
use crate::gameplay::Event;
use crate::gameplay::HandState;
use crate::gameplay::Legal;
use crate::gameplay::LegalAction;
use std::sync::Arc;

/// Read-only features of one decision point.
///
/// Built fresh from a [`HandState`] for each request and never mutated.
/// Everything a street policy reads lives here, including the profile
/// bundle the request was served with.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Observation {
    pub hand_id: String,
    pub actor: Position,
    pub street: Street,
    pub bb: Chips,
    pub pot: Chips,
    pub pot_now: Chips,
    pub to_call: Chips,
    pub last_bet: Chips,
    pub eff_stack: Chips,
    pub acts: Vec<LegalAction>,
    pub tags: Vec<Tag>,
    pub hand_class: HandClass,
    pub table_mode: String,
    pub button: Position,
    pub spr: Option<f64>,
    pub spr_bucket: SprBucket,
    pub board_texture: Texture,
    pub ip: bool,
    pub first_to_act: bool,
    pub last_to_act: bool,
    pub combo: Option<String>,
    pub hand_strength: String,
    pub role: Role,
    pub range_adv: bool,
    pub nut_adv: bool,
    pub facing_size_tag: Facing,
    pub pot_type: PotType,
    pub last_aggressor: Option<Position>,
    pub hole: Option<Vec<Card>>,
    pub board: Vec<Card>,
    pub river: Option<RiverRead>,
    #[serde(skip)]
    pub context: Arc<Bundle>,
}

impl Observation {
    /// Derives the decision features for `actor`.
    ///
    /// Never fails: missing hole cards or a classifier error leave the
    /// classes `unknown` and return a `W_ANALYSIS` rationale alongside.
    pub fn build(
        state: &HandState,
        actor: Position,
        acts: &[LegalAction],
        context: Arc<Bundle>,
        evaluator: &dyn Evaluate,
    ) -> (Self, Rationales) {
        let mut warnings = Rationales::default();
        let street = state.street().unwrap_or(Street::Rive);
        let bb = state.bb();
        let pot_now = state.pot_now();
        let to_call = acts.to_call();
        let eff_stack = state.effective();
        let button = state.button();
        let board = state.board().to_vec();
        let hole = Some(state.player(actor).hole.clone()).filter(|h| h.len() == 2);
        let ref events = state.events();

        let preflop = preflop_events(events);
        let pot_type = PotType::from_raises(preflop.iter().filter(|e| e.is_raise()).count());
        let pfr = preflop.iter().rev().find(|e| e.is_aggressive()).and_then(|e| e.who());
        let role = match pfr {
            Some(p) if p == actor => Role::Pfr,
            Some(_) => Role::Caller,
            None => Role::Na,
        };
        let last_aggressor = previous_street(events)
            .iter()
            .rev()
            .find(|e| e.is_aggressive())
            .and_then(|e| e.who());

        let postflop = street.is_postflop();
        let ip = postflop && actor == button;
        let (first_to_act, last_to_act) = match postflop {
            true => (actor != button, actor == button),
            false => {
                let first_in = (pot_now as f64) <= bb as f64 * crate::FIRST_IN_LIMIT_BB;
                (actor == button && first_in, actor != button)
            }
        };

        let spr_value = spr(eff_stack, pot_now);
        let spr_bucket = match postflop {
            true => SprBucket::from_spr(spr_value),
            false => SprBucket::Na,
        };
        let board_texture = classify_board_texture(&board);
        let modes = context.modes;
        let facing_size_tag = Facing::classify(to_call, pot_now, modes.flop_facing_small_le, modes.flop_facing_mid_le);
        let (range_adv, nut_adv) = match street {
            Street::Flop => (range_advantage(board_texture, role), nut_advantage(board_texture, role)),
            _ => (false, false),
        };

        let hole_cards = hole.clone().unwrap_or_default();
        let (tags, hand_class) = match (classify_starting_hand(&hole_cards), postflop) {
            (Ok((tags, class)), false) => (tags, class),
            (Ok((tags, _)), true) => match classify_postflop_hand(&hole_cards, &board) {
                Ok(class) => (tags, class),
                Err(e) => {
                    log::warn!("postflop classification failed for {}: {}", state.hand_id(), e);
                    warnings.push(Code::WAnalysis);
                    (tags, HandClass::Unknown)
                }
            },
            (Err(e), _) => {
                log::warn!("starting hand classification failed for {}: {}", state.hand_id(), e);
                warnings.push(Code::WAnalysis);
                (vec![Tag::Unknown], HandClass::Unknown)
            }
        };
        let river = match street {
            Street::Rive => Some(analyze_river(&hole_cards, &board, evaluator)),
            _ => None,
        };

        let observation = Self {
            hand_id: state.hand_id().to_string(),
            actor,
            street,
            bb,
            pot: state.pot(),
            pot_now,
            to_call,
            last_bet: state.last_bet(),
            eff_stack,
            acts: acts.to_vec(),
            hand_strength: hand_strength(street, &tags, hand_class),
            combo: combo(&hole_cards),
            tags,
            hand_class,
            table_mode: context.table_mode.clone(),
            button,
            spr: Some(spr_value).filter(|s| s.is_finite()),
            spr_bucket,
            board_texture,
            ip,
            first_to_act,
            last_to_act,
            role,
            range_adv,
            nut_adv,
            facing_size_tag,
            pot_type,
            last_aggressor,
            hole,
            board,
            river,
            context,
        };
        log::trace!(
            "observed {} seat {} {} pot_now {} to_call {}",
            observation.hand_id,
            actor,
            street,
            pot_now,
            to_call
        );
        (observation, warnings)
    }
    /// Copy with a different legal action set.
    pub fn with_acts(&self, acts: Vec<LegalAction>) -> Self {
        let to_call = acts.to_call();
        Self {
            acts,
            to_call,
            ..self.clone()
        }
    }
    pub fn pot_odds(&self) -> f64 {
        super::calculators::pot_odds(self.to_call, self.pot_now)
    }
    pub fn to_call_bb(&self) -> f64 {
        self.to_call as f64 / self.bb.max(1) as f64
    }
    pub fn is_facing(&self) -> bool {
        self.to_call > 0
    }
    pub fn river_tier(&self) -> super::river::RiverTier {
        self.river.as_ref().map(|r| r.tier).unwrap_or_default()
    }
}

/// Events up to the flop.
fn preflop_events(events: &[Event]) -> &[Event] {
    let end = events
        .iter()
        .position(|e| matches!(e, Event::Board { .. }))
        .unwrap_or(events.len());
    &events[..end]
}

/// Events of the street before the current one, empty preflop.
fn previous_street(events: &[Event]) -> &[Event] {
    let boards = events
        .iter()
        .enumerate()
        .filter(|(_, e)| matches!(e, Event::Board { .. }))
        .map(|(i, _)| i)
        .collect::<Vec<_>>();
    match boards.as_slice() {
        [] => &[],
        [only] => &events[..*only],
        [.., prev, last] => &events[*prev + 1..*last],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advisor::config::Strategy;
    use crate::cards::Bitwise;
    use crate::gameplay::Action;
    use crate::gameplay::SessionConfig;

    fn bundle() -> Arc<Bundle> {
        Arc::new(Bundle::builtin(Strategy::Medium))
    }

    fn hand(hero: &str, villain: &str, runout: &str) -> HandState {
        HandState::start(&SessionConfig::default(), "s", "h1", 0, Some(7))
            .unwrap()
            .with_cards(
                [Card::parse(hero).unwrap(), Card::parse(villain).unwrap()],
                Card::parse(runout).unwrap(),
            )
    }

    fn observe(state: &HandState) -> (Observation, Rationales) {
        let seat = state.to_act();
        Observation::build(state, seat, &state.legal(), bundle(), &Bitwise)
    }

    /// the small blind opens first in, blinds only
    #[test]
    fn preflop_first_in() {
        let state = hand("AhKh", "7c2d", "Ks8d3c5h9s");
        let (obs, warnings) = observe(&state);
        assert!(warnings.is_empty());
        assert_eq!(obs.street, Street::Pref);
        assert_eq!((obs.pot_now, obs.to_call), (3, 1));
        assert!(obs.first_to_act && !obs.last_to_act && !obs.ip);
        assert_eq!(obs.pot_type, PotType::Limped);
        assert_eq!(obs.role, Role::Na);
        assert_eq!(obs.spr_bucket, SprBucket::Na);
        assert_eq!(obs.combo.as_deref(), Some("AKs"));
        assert_eq!(obs.hand_class, HandClass::AxSuited);
        assert_eq!(obs.hand_strength, "preflop_suited_broadway");
    }

    /// a raised flop carries role, position, texture and facing
    #[test]
    fn flop_after_raise() {
        let state = hand("AhKd", "QcJc", "Ks8d3c5h9s")
            .try_apply(Action::Raise, Some(6))
            .unwrap()
            .try_apply(Action::Call, None)
            .unwrap();
        let (obs, _) = observe(&state);
        assert_eq!(obs.street, Street::Flop);
        assert_eq!(obs.actor, 1);
        assert_eq!(obs.pot_type, PotType::SingleRaised);
        assert_eq!(obs.role, Role::Caller);
        assert!(!obs.ip && obs.first_to_act);
        assert_eq!(obs.board_texture, Texture::Dry);
        assert_eq!(obs.facing_size_tag, Facing::Na);
        assert!(!obs.range_adv && !obs.nut_adv);
        let state = state.try_apply(Action::Bet, Some(8)).unwrap();
        let (obs, _) = observe(&state);
        assert_eq!(obs.role, Role::Pfr);
        assert!(obs.ip && obs.last_to_act);
        assert_eq!(obs.facing_size_tag, Facing::Third);
        assert_eq!(obs.hand_class, HandClass::OverpairOrTopPairStrong);
        assert!(obs.range_adv && obs.nut_adv);
        assert_eq!(obs.spr_bucket, SprBucket::High);
        assert_eq!(obs.last_aggressor, Some(0));
    }

    /// a 3-bet clears first-in and marks the pot
    #[test]
    fn threebet_pot() {
        let state = hand("AhKd", "QcQd", "Ks8d3c5h9s")
            .try_apply(Action::Raise, Some(5))
            .unwrap()
            .try_apply(Action::Raise, Some(15))
            .unwrap();
        let (obs, _) = observe(&state);
        assert_eq!(obs.pot_type, PotType::Threebet);
        assert!(!obs.first_to_act && !obs.last_to_act);
        assert_eq!(obs.role, Role::Caller);
        assert_eq!(obs.to_call, 10);
    }

    /// missing hole cards degrade rather than fail
    #[test]
    fn analysis_warning() {
        let state = HandState::start(&SessionConfig::default(), "s", "h2", 0, Some(1))
            .unwrap()
            .with_cards([vec![], Card::parse("QcQd").unwrap()], vec![]);
        let (obs, warnings) = observe(&state);
        assert!(warnings.contains(Code::WAnalysis));
        assert_eq!(obs.hand_class, HandClass::Unknown);
        assert!(obs.hole.is_none());
        assert!(obs.combo.is_none());
    }

    /// with_acts swaps the action set and its price
    #[test]
    fn with_acts() {
        let (obs, _) = observe(&hand("AhKh", "7c2d", "Ks8d3c5h9s"));
        let swapped = obs.with_acts(vec![LegalAction::check()]);
        assert_eq!(swapped.to_call, 0);
        assert_eq!(swapped.hand_id, obs.hand_id);
    }
}
