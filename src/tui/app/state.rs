use crate::engine::BlackjackEngine;
use crate::render::CardStyle;
use crate::round::{RoundEngine, RoundState};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Scene {
    Menu,
    Table,
}

/// High-level input actions for the TUI controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum InputAction {
    MenuNext,
    MenuPrev,
    MenuInc,
    MenuDec,
    MenuApply,
    MenuCancel,
    ToggleMenu,
    ToggleHelp,
    ToggleLog,
    LogUp,
    LogDown,
    Deal,
    Hit,
    Stand,
}

#[derive(Debug)]
#[non_exhaustive]
pub struct AppState {
    pub scene: Scene,
    // Rules engine; the UI only reads it through `BlackjackEngine`
    pub engine: RoundEngine,
    // Menu config being edited
    pub menu_index: usize,
    pub cfg_card_style: CardStyle,
    pub cfg_seed: Option<u64>,
    pub cfg_reveal_delay_ms: u64,
    // Applied config
    pub card_style: CardStyle,
    pub seed: Option<u64>,
    pub reveal_delay_ms: u64,
    // Dealer cards shown so far while a stand is being revealed
    reveal: Option<Reveal>,
    help_open: bool,
    log_open: bool,
    log_offset: usize,
    action_error: Option<String>,
    action_error_at: Option<Instant>,
}

#[derive(Debug, Clone, Copy)]
struct Reveal {
    shown: usize,
    last_step: Instant,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(None)
    }
}

impl AppState {
    pub const LOG_PAGE_SIZE: usize = 20;
    pub const DEFAULT_REVEAL_DELAY_MS: u64 = 400;
    const ACTION_ERROR_TTL: Duration = Duration::from_secs(3);

    /// App with a fixed shuffle seed, or OS entropy when `seed` is `None`.
    pub fn new(seed: Option<u64>) -> Self {
        Self {
            scene: Scene::Menu,
            engine: Self::build_engine(seed),
            menu_index: 0,
            cfg_card_style: CardStyle::default(),
            cfg_seed: seed,
            cfg_reveal_delay_ms: Self::DEFAULT_REVEAL_DELAY_MS,
            card_style: CardStyle::default(),
            seed,
            reveal_delay_ms: Self::DEFAULT_REVEAL_DELAY_MS,
            reveal: None,
            help_open: false,
            log_open: false,
            log_offset: 0,
            action_error: None,
            action_error_at: None,
        }
    }

    pub(crate) fn build_engine(seed: Option<u64>) -> RoundEngine {
        match seed {
            Some(s) => RoundEngine::with_seed(s),
            None => RoundEngine::new(),
        }
    }

    pub fn table(&self) -> &dyn BlackjackEngine {
        &self.engine
    }

    pub fn action_error(&self) -> Option<&str> {
        self.action_error.as_deref()
    }

    fn set_action_error(&mut self, msg: String) {
        self.action_error = Some(msg);
        self.action_error_at = Some(Instant::now());
    }

    fn clear_action_error(&mut self) {
        self.action_error = None;
        self.action_error_at = None;
    }

    pub fn help_open(&self) -> bool {
        self.help_open
    }

    pub fn log_open(&self) -> bool {
        self.log_open
    }

    pub fn log_offset(&self) -> usize {
        self.log_offset
    }

    pub(crate) fn close_help(&mut self) {
        self.help_open = false;
    }

    pub(crate) fn close_log(&mut self) {
        self.log_open = false;
    }

    /// True while dealer cards from the last stand are still being shown one by one.
    pub fn revealing(&self) -> bool {
        self.reveal.is_some()
    }

    /// How many dealer cards the table should show face up.
    pub fn visible_dealer_cards(&self) -> usize {
        let total = self.table().dealer_cards().len();
        match self.reveal {
            Some(r) => r.shown.min(total),
            None => total,
        }
    }

    /// The dealer's second slot is drawn face down until the dealer has played.
    pub fn dealer_hole_hidden(&self) -> bool {
        self.table().round_state() == RoundState::PlayerTurn || self.revealing()
    }

    /// Outcome text, held back until the reveal finishes.
    pub fn visible_outcome(&self) -> Option<&'static str> {
        if self.revealing() {
            None
        } else {
            self.table().outcome_message()
        }
    }

    pub fn can_deal(&self) -> bool {
        self.scene == Scene::Table && self.table().can_start() && !self.revealing()
    }

    pub fn can_act(&self) -> bool {
        self.scene == Scene::Table && self.table().can_act()
    }

    pub fn handle_input(&mut self, action: InputAction) -> bool {
        match action {
            InputAction::ToggleMenu => {
                self.toggle_menu();
                false
            }
            InputAction::ToggleHelp => {
                if self.scene == Scene::Table {
                    self.log_open = false;
                    self.help_open = !self.help_open;
                }
                false
            }
            InputAction::ToggleLog => {
                if self.scene == Scene::Table {
                    self.help_open = false;
                    if !self.log_open {
                        self.log_offset = 0;
                    }
                    self.log_open = !self.log_open;
                }
                false
            }
            InputAction::LogUp => {
                if self.scene == Scene::Table && self.log_open {
                    let max_offset = self.engine.history_len().saturating_sub(Self::LOG_PAGE_SIZE);
                    self.log_offset = (self.log_offset + 1).min(max_offset);
                }
                false
            }
            InputAction::LogDown => {
                if self.scene == Scene::Table && self.log_open && self.log_offset > 0 {
                    self.log_offset -= 1;
                }
                false
            }
            InputAction::MenuNext => {
                if self.scene == Scene::Menu {
                    self.menu_next();
                }
                false
            }
            InputAction::MenuPrev => {
                if self.scene == Scene::Menu {
                    self.menu_prev();
                }
                false
            }
            InputAction::MenuInc => {
                if self.scene == Scene::Menu {
                    self.menu_inc();
                }
                false
            }
            InputAction::MenuDec => {
                if self.scene == Scene::Menu {
                    self.menu_dec();
                }
                false
            }
            InputAction::MenuApply => {
                if self.scene == Scene::Menu {
                    self.apply_menu();
                }
                false
            }
            InputAction::MenuCancel => {
                if self.scene == Scene::Menu {
                    self.cancel_menu();
                }
                false
            }
            InputAction::Deal => self.deal(),
            InputAction::Hit => self.hit(),
            InputAction::Stand => self.stand(),
        }
    }

    /// Start a new round. A pending reveal is finished instead.
    pub fn deal(&mut self) -> bool {
        if self.scene != Scene::Table {
            return false;
        }
        if self.revealing() {
            self.reveal = None;
            return false;
        }
        if !self.table().can_start() {
            return false;
        }
        match self.engine.start_round() {
            Ok(_) => {
                self.clear_action_error();
                self.log_offset = 0;
                true
            }
            Err(err) => {
                self.set_action_error(err.to_string());
                false
            }
        }
    }

    pub fn hit(&mut self) -> bool {
        if !self.can_act() {
            return false;
        }
        match self.engine.hit() {
            Ok(_) => {
                self.clear_action_error();
                true
            }
            Err(err) => {
                self.set_action_error(err.to_string());
                false
            }
        }
    }

    pub fn stand(&mut self) -> bool {
        if !self.can_act() {
            return false;
        }
        match self.engine.stand() {
            Ok(snap) => {
                self.clear_action_error();
                // the up card is already on the table
                if self.reveal_delay_ms > 0 && snap.dealer_cards.len() > 1 {
                    self.reveal = Some(Reveal { shown: 1, last_step: Instant::now() });
                }
                true
            }
            Err(err) => {
                self.set_action_error(err.to_string());
                false
            }
        }
    }

    /// Advance the dealer reveal and expire stale errors.
    pub fn on_tick(&mut self) {
        if let Some(at) = self.action_error_at {
            if at.elapsed() >= Self::ACTION_ERROR_TTL {
                self.clear_action_error();
            }
        }
        let delay = Duration::from_millis(self.reveal_delay_ms);
        let total = self.table().dealer_cards().len();
        if let Some(r) = self.reveal.as_mut() {
            if r.last_step.elapsed() >= delay {
                r.shown += 1;
                r.last_step = Instant::now();
            }
            if r.shown >= total {
                self.reveal = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::parse_cards;
    use crate::deck::Deck;

    fn table_app() -> AppState {
        let mut app = AppState::new(Some(3));
        app.apply_menu();
        app
    }

    #[test]
    fn actions_ignored_outside_player_turn() {
        let mut app = table_app();
        assert!(!app.hit());
        assert!(!app.stand());
        assert_eq!(app.engine.state(), RoundState::NotStarted);
        assert!(app.action_error().is_none());
    }

    #[test]
    fn stand_reveals_dealer_cards_one_tick_at_a_time() {
        let mut app = table_app();
        app.reveal_delay_ms = 1;
        let deck = Deck::stacked(parse_cards("10H 9S 2D 3C 4H 5S").unwrap());
        app.engine.start_round_with_deck(deck).unwrap();
        assert!(app.dealer_hole_hidden());
        assert!(app.stand());
        // dealer climbs to 14 and the deck runs dry
        assert_eq!(app.engine.dealer_hand().len(), 4);
        assert!(app.revealing());
        assert_eq!(app.visible_dealer_cards(), 1);
        assert!(app.visible_outcome().is_none());
        for _ in 0..10 {
            std::thread::sleep(Duration::from_millis(2));
            app.on_tick();
        }
        assert!(!app.revealing());
        assert_eq!(app.visible_dealer_cards(), 4);
        assert_eq!(app.visible_outcome(), Some("You win!"));
    }

    #[test]
    fn deal_skips_pending_reveal_first() {
        let mut app = table_app();
        app.reveal_delay_ms = 60_000;
        let deck = Deck::stacked(parse_cards("10H 9S 2D 3C 4H 5S").unwrap());
        app.engine.start_round_with_deck(deck).unwrap();
        assert!(app.stand());
        assert!(app.revealing());
        assert!(!app.deal());
        assert!(!app.revealing());
        assert!(app.deal());
        assert_eq!(app.engine.round_number(), 2);
    }
}
