//! blackjack-rs: single-player Blackjack rules engine
//!
//! Goals:
//! - Deterministic rounds when seeded, for tests and replays
//! - Rules engine fully separated from presentation
//! - No panics for illegal actions; use `Result` for recoverable errors
//!
//! House rules of this table:
//! - the opening deal is two cards to the player and one to the dealer
//! - a two-card 21 wins immediately, without a dealer draw
//! - the dealer draws until reaching the player's total, not a fixed 17
//!
//! ## Quick start: play a round
//! ```
//! use blackjack_rs::round::{RoundEngine, RoundState};
//!
//! let mut engine = RoundEngine::with_seed(42);
//! let snap = engine.start_round().unwrap();
//! if snap.state == RoundState::PlayerTurn {
//!     let snap = engine.stand().unwrap();
//!     assert_eq!(snap.state, RoundState::Settled);
//! }
//! assert_eq!(engine.statistics().rounds(), 1);
//! ```
//!
//! ## TUI
//! Run the interactive TUI with:
//! ```sh
//! cargo run --bin blackjack-rs
//! ```

pub mod cards;
pub mod deck;
pub mod engine;
pub mod hand;
pub mod render;
pub mod round;
pub mod tui;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
