use super::{AppState, Scene};

#[derive(Debug, Clone, Copy)]
enum MenuItem {
    CardStyle,
    Seed,
    RevealDelayMs,
}

const MENU_ITEMS: [MenuItem; 3] = [MenuItem::CardStyle, MenuItem::Seed, MenuItem::RevealDelayMs];

impl MenuItem {
    fn display(self, app: &AppState) -> String {
        match self {
            MenuItem::CardStyle => format!("Card Style: {}", app.cfg_card_style.label()),
            MenuItem::Seed => match app.cfg_seed {
                Some(seed) => format!("Shuffle Seed: {seed}"),
                None => String::from("Shuffle Seed: Random"),
            },
            MenuItem::RevealDelayMs => format!("Dealer Reveal (ms): {}", app.cfg_reveal_delay_ms),
        }
    }

    fn inc(self, app: &mut AppState) {
        match self {
            MenuItem::CardStyle => {
                app.cfg_card_style = app.cfg_card_style.next();
            }
            MenuItem::Seed => {
                app.cfg_seed = Some(app.cfg_seed.map_or(1, |s| s.saturating_add(1)));
            }
            MenuItem::RevealDelayMs => {
                app.cfg_reveal_delay_ms = (app.cfg_reveal_delay_ms + 100).min(3000);
            }
        }
    }

    fn dec(self, app: &mut AppState) {
        match self {
            MenuItem::CardStyle => {
                app.cfg_card_style = app.cfg_card_style.prev();
            }
            MenuItem::Seed => {
                // stepping below 1 goes back to random shuffles
                app.cfg_seed = match app.cfg_seed {
                    Some(s) if s > 1 => Some(s - 1),
                    _ => None,
                };
            }
            MenuItem::RevealDelayMs => {
                app.cfg_reveal_delay_ms = app.cfg_reveal_delay_ms.saturating_sub(100);
            }
        }
    }
}

impl AppState {
    pub fn menu_items_display(&self) -> Vec<String> {
        MENU_ITEMS.iter().map(|item| item.display(self)).collect()
    }

    pub fn toggle_menu(&mut self) {
        self.close_help();
        self.close_log();
        match self.scene {
            Scene::Menu => self.scene = Scene::Table,
            _ => self.open_menu(),
        }
    }

    // --- Menu operations ---
    pub fn open_menu(&mut self) {
        self.close_help();
        self.close_log();
        self.menu_index = 0;
        self.cfg_card_style = self.card_style;
        self.cfg_seed = self.seed;
        self.cfg_reveal_delay_ms = self.reveal_delay_ms;
        self.scene = Scene::Menu;
    }

    /// Apply edited settings. A changed seed starts a new session (fresh engine and statistics).
    pub fn apply_menu(&mut self) {
        self.card_style = self.cfg_card_style;
        self.reveal_delay_ms = self.cfg_reveal_delay_ms;
        if self.cfg_seed != self.seed {
            self.seed = self.cfg_seed;
            self.engine = Self::build_engine(self.seed);
            tracing::info!(seed = ?self.seed, "new session");
        }
        self.scene = Scene::Table;
    }

    pub fn cancel_menu(&mut self) {
        self.scene = Scene::Table;
    }

    pub fn menu_next(&mut self) {
        self.menu_index = (self.menu_index + 1) % MENU_ITEMS.len();
    }
    pub fn menu_prev(&mut self) {
        self.menu_index = (self.menu_index + MENU_ITEMS.len() - 1) % MENU_ITEMS.len();
    }
    pub fn menu_inc(&mut self) {
        let item = MENU_ITEMS[self.menu_index % MENU_ITEMS.len()];
        item.inc(self);
    }
    pub fn menu_dec(&mut self) {
        let item = MENU_ITEMS[self.menu_index % MENU_ITEMS.len()];
        item.dec(self);
    }
}
