// Engine API boundary. Front ends (the TUI, tests, scripted drivers) go through
// this trait to run rounds and read table state without touching rule internals.

use crate::cards::Card;
use crate::round::{Outcome, RoundError, RoundEngine, RoundSnapshot, RoundState, Statistics};

pub trait BlackjackEngine {
    // Round lifecycle
    fn start_round(&mut self) -> Result<RoundSnapshot, RoundError>;

    // Player actions
    fn hit(&mut self) -> Result<RoundSnapshot, RoundError>;
    fn stand(&mut self) -> Result<RoundSnapshot, RoundError>;

    // Queries
    fn player_cards(&self) -> &[Card];
    fn dealer_cards(&self) -> &[Card];
    fn player_total(&self) -> u32;
    fn dealer_total(&self) -> u32;
    fn round_state(&self) -> RoundState;
    fn outcome(&self) -> Option<Outcome>;
    fn statistics(&self) -> Statistics;
    fn snapshot(&self) -> RoundSnapshot;

    fn outcome_message(&self) -> Option<&'static str> {
        self.outcome().map(Outcome::message)
    }

    /// Hit and stand are only legal on the player's turn.
    fn can_act(&self) -> bool {
        self.round_state() == RoundState::PlayerTurn
    }

    fn can_start(&self) -> bool {
        matches!(self.round_state(), RoundState::NotStarted | RoundState::Settled)
    }
}

impl BlackjackEngine for RoundEngine {
    fn start_round(&mut self) -> Result<RoundSnapshot, RoundError> {
        self.start_round()
    }

    fn hit(&mut self) -> Result<RoundSnapshot, RoundError> {
        self.hit()
    }
    fn stand(&mut self) -> Result<RoundSnapshot, RoundError> {
        self.stand()
    }

    fn player_cards(&self) -> &[Card] {
        self.player_hand().cards()
    }
    fn dealer_cards(&self) -> &[Card] {
        self.dealer_hand().cards()
    }
    fn player_total(&self) -> u32 {
        self.player_total()
    }
    fn dealer_total(&self) -> u32 {
        self.dealer_total()
    }
    fn round_state(&self) -> RoundState {
        self.state()
    }
    fn outcome(&self) -> Option<Outcome> {
        self.outcome()
    }
    fn statistics(&self) -> Statistics {
        self.statistics()
    }
    fn snapshot(&self) -> RoundSnapshot {
        self.snapshot()
    }
}
