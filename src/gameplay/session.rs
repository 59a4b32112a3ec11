use super::*;
use crate::Chips;
use crate::N;
use crate::Position;

/// Blind structure and starting stack for a heads-up session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SessionConfig {
    pub init_stack: Chips,
    pub sb: Chips,
    pub bb: Chips,
}

impl SessionConfig {
    pub fn new(init_stack: Chips, sb: Chips, bb: Chips) -> Self {
        Self { init_stack, sb, bb }
    }
    pub fn validate(&self) -> Result<(), GameError> {
        if self.sb <= 0 || self.bb < self.sb {
            return Err(GameError::Blinds {
                sb: self.sb,
                bb: self.bb,
            });
        }
        Ok(())
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new(crate::STACK, crate::S_BLIND, crate::B_BLIND)
    }
}

/// What a caller persists between hands.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SessionView {
    pub session_id: String,
    pub button: Position,
    pub stacks: [Chips; N],
    pub hand_no: usize,
    pub current_hand_id: Option<String>,
}

impl SessionView {
    /// Rebuilds a view from persisted fields.
    pub fn fold(session_id: &str, button: Position, stacks: [Chips; N], hand_counter: usize) -> Self {
        Self {
            session_id: session_id.to_string(),
            button: button % N,
            stacks,
            hand_no: hand_counter,
            current_hand_id: None,
        }
    }
    /// Conventional hand id for the current counter.
    pub fn hand_id(&self) -> String {
        format!("{}-{}", self.session_id, self.hand_no)
    }
}

/// Parameters for dealing the next hand of a session.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct NextHandPlan {
    pub session_id: String,
    pub next_button: Position,
    pub stacks: [Chips; N],
    pub next_hand_no: usize,
    pub seed: Option<u64>,
}

impl NextHandPlan {
    /// Deals the planned hand with carried stacks.
    pub fn deal(&self, cfg: &SessionConfig) -> Result<HandState, GameError> {
        let hand_id = format!("{}-{}", self.session_id, self.next_hand_no);
        HandState::start_with_carry(cfg, &self.session_id, &hand_id, self.next_button, self.stacks, self.seed)
    }
}

/// Validates blinds and returns the session configuration.
pub fn start_session(init_stack: Chips, sb: Chips, bb: Chips) -> Result<SessionConfig, GameError> {
    let cfg = SessionConfig::new(init_stack, sb, bb);
    cfg.validate()?;
    if init_stack <= bb {
        return Err(GameError::ShortStack {
            seat: 0,
            stack: init_stack,
            blind: bb,
        });
    }
    log::info!("session stack {} blinds {}/{}", init_stack, sb, bb);
    Ok(cfg)
}

/// Plans the hand after a completed one: rotate the button, carry stacks.
pub fn next_hand(view: &SessionView, last: &HandState, seed: Option<u64>) -> Result<NextHandPlan, GameError> {
    if !last.is_complete() {
        return Err(GameError::Incomplete(last.phase().to_string()));
    }
    let stacks = last.stacks();
    if let Some(seat) = stacks.iter().position(|s| *s <= 0) {
        return Err(GameError::Busted(seat));
    }
    Ok(NextHandPlan {
        session_id: view.session_id.clone(),
        next_button: 1 - view.button % N,
        stacks,
        next_hand_no: view.hand_no + 1,
        seed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view() -> SessionView {
        SessionView::fold("sess", 0, [200, 200], 1)
    }

    /// next hand rotates the button and carries stacks
    #[test]
    fn rotation_and_carry() {
        let cfg = start_session(200, 1, 2).unwrap();
        let hand = HandState::start(&cfg, "sess", "sess-1", 0, Some(11)).unwrap();
        let done = hand.try_apply(Action::Fold, None).unwrap();
        let plan = next_hand(&view(), &done, Some(12)).unwrap();
        assert_eq!(plan.next_button, 1);
        assert_eq!(plan.stacks, [199, 201]);
        assert_eq!(plan.next_hand_no, 2);
        assert_eq!(plan.seed, Some(12));
        let next = plan.deal(&cfg).unwrap();
        assert_eq!(next.button(), 1);
        assert_eq!(next.to_act(), 1);
        assert_eq!(next.hand_id(), "sess-2");
        assert_eq!(next.total(), 400);
    }

    /// next hand refuses an unfinished hand
    #[test]
    fn requires_complete() {
        let cfg = SessionConfig::default();
        let hand = HandState::start(&cfg, "sess", "sess-1", 0, Some(1)).unwrap();
        let err = next_hand(&view(), &hand, None).unwrap_err();
        assert_eq!(err, GameError::Incomplete("preflop".into()));
    }

    /// blinds are validated up front
    #[test]
    fn invalid_blinds() {
        assert_eq!(start_session(100, 2, 1), Err(GameError::Blinds { sb: 2, bb: 1 }));
        assert!(start_session(2, 1, 2).is_err());
    }

    /// five folded hands alternate the button
    #[test]
    fn alternating_buttons() {
        let cfg = SessionConfig::default();
        let mut view = view();
        let mut hand = HandState::start(&cfg, "sess", &view.hand_id(), view.button, Some(0)).unwrap();
        for i in 0..5 {
            assert_eq!(hand.button(), i % 2);
            let done = hand.try_apply(Action::Fold, None).unwrap();
            let plan = next_hand(&view, &done, Some(i as u64)).unwrap();
            view = SessionView::fold(&plan.session_id, plan.next_button, plan.stacks, plan.next_hand_no);
            hand = plan.deal(&cfg).unwrap();
        }
    }
}
