//! Round sequencing, dealer policy and settlement.
//!
//! A round moves `NotStarted -> PlayerTurn -> DealerTurn -> Settled`. The opening
//! deal is two cards to the player and one to the dealer; the dealer only draws
//! more once the player stands.
//!
//! ```
//! use blackjack_rs::cards::parse_cards;
//! use blackjack_rs::deck::Deck;
//! use blackjack_rs::round::{Outcome, RoundEngine, RoundState};
//!
//! let mut engine = RoundEngine::with_seed(1);
//! let deck = Deck::stacked(parse_cards("10H 8S 10D 9C").unwrap());
//! let snap = engine.start_round_with_deck(deck).unwrap();
//! assert_eq!(snap.state, RoundState::PlayerTurn);
//! assert_eq!(snap.player_total(), 18);
//!
//! let snap = engine.stand().unwrap();
//! assert_eq!(snap.state, RoundState::Settled);
//! assert_eq!(snap.dealer_total(), 19);
//! assert_eq!(snap.outcome, Some(Outcome::DealerWins));
//! assert_eq!(engine.statistics().losses(), 1);
//! ```

use crate::cards::Card;
use crate::deck::{Deck, DeckError};
use crate::hand::{Hand, HandValue, BLACKJACK};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum RoundState {
    NotStarted,
    PlayerTurn,
    DealerTurn,
    Settled,
}

impl RoundState {
    pub fn label(self) -> &'static str {
        match self {
            RoundState::NotStarted => "Not started",
            RoundState::PlayerTurn => "Your turn",
            RoundState::DealerTurn => "Dealer's turn",
            RoundState::Settled => "Settled",
        }
    }
}

/// Which statistics counter a settled round feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundResult {
    Win,
    Loss,
    Tie,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Outcome {
    /// Opening two cards total 21. Paid immediately, the dealer never draws.
    PlayerBlackjack,
    PlayerBust,
    DealerBust,
    PlayerWins,
    DealerWins,
    Tie,
}

impl Outcome {
    pub fn message(self) -> &'static str {
        match self {
            Outcome::PlayerBlackjack => "Blackjack! You win!",
            Outcome::PlayerBust => "You bust! Dealer wins.",
            Outcome::DealerBust => "Dealer bust! You win!",
            Outcome::PlayerWins => "You win!",
            Outcome::DealerWins => "Dealer wins.",
            Outcome::Tie => "It's a tie.",
        }
    }

    pub fn result(self) -> RoundResult {
        match self {
            Outcome::PlayerBlackjack | Outcome::DealerBust | Outcome::PlayerWins => {
                RoundResult::Win
            }
            Outcome::PlayerBust | Outcome::DealerWins => RoundResult::Loss,
            Outcome::Tie => RoundResult::Tie,
        }
    }
}

/// Settle two final totals. Precedence: player bust, dealer bust, higher total, tie.
///
/// ```
/// use blackjack_rs::round::{determine_winner, Outcome};
///
/// assert_eq!(determine_winner(22, 25), Outcome::PlayerBust);
/// assert_eq!(determine_winner(12, 22), Outcome::DealerBust);
/// assert_eq!(determine_winner(19, 18), Outcome::PlayerWins);
/// assert_eq!(determine_winner(17, 20), Outcome::DealerWins);
/// assert_eq!(determine_winner(18, 18), Outcome::Tie);
/// ```
pub fn determine_winner(player_total: u32, dealer_total: u32) -> Outcome {
    if player_total > BLACKJACK {
        Outcome::PlayerBust
    } else if dealer_total > BLACKJACK {
        Outcome::DealerBust
    } else if player_total > dealer_total {
        Outcome::PlayerWins
    } else if player_total < dealer_total {
        Outcome::DealerWins
    } else {
        Outcome::Tie
    }
}

/// Session counters. Only ever incremented, one step per settled round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Statistics {
    wins: u64,
    losses: u64,
    ties: u64,
}

impl Statistics {
    pub fn wins(&self) -> u64 {
        self.wins
    }

    pub fn losses(&self) -> u64 {
        self.losses
    }

    pub fn ties(&self) -> u64 {
        self.ties
    }

    /// Number of settled rounds.
    pub fn rounds(&self) -> u64 {
        self.wins + self.losses + self.ties
    }

    pub(crate) fn record(&mut self, result: RoundResult) {
        match result {
            RoundResult::Win => self.wins += 1,
            RoundResult::Loss => self.losses += 1,
            RoundResult::Tie => self.ties += 1,
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RoundError {
    #[error("deck is exhausted")]
    DeckExhausted,
    #[error("cannot {action} while round is {state:?}")]
    InvalidState { action: &'static str, state: RoundState },
}

impl From<DeckError> for RoundError {
    fn from(err: DeckError) -> Self {
        match err {
            DeckError::Exhausted => RoundError::DeckExhausted,
        }
    }
}

/// Owned copy of everything the presentation layer needs after an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct RoundSnapshot {
    pub round: u64,
    pub state: RoundState,
    pub player_cards: Vec<Card>,
    pub dealer_cards: Vec<Card>,
    pub player_value: HandValue,
    pub dealer_value: HandValue,
    pub outcome: Option<Outcome>,
    pub statistics: Statistics,
    pub deck_remaining: usize,
}

impl RoundSnapshot {
    pub fn player_total(&self) -> u32 {
        self.player_value.total
    }

    pub fn dealer_total(&self) -> u32 {
        self.dealer_value.total
    }

    pub fn outcome_message(&self) -> Option<&'static str> {
        self.outcome.map(Outcome::message)
    }
}

/// A settled round kept in the session log.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct RoundRecord {
    pub round: u64,
    pub player_cards: Vec<Card>,
    pub dealer_cards: Vec<Card>,
    pub player_total: u32,
    pub dealer_total: u32,
    pub outcome: Outcome,
}

#[derive(Debug)]
pub struct RoundEngine {
    rng: ChaCha8Rng,
    deck: Deck,
    player: Hand,
    dealer: Hand,
    state: RoundState,
    outcome: Option<Outcome>,
    stats: Statistics,
    round: u64,
    history: Vec<RoundRecord>,
}

impl Default for RoundEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl RoundEngine {
    pub fn new() -> Self {
        let seed: u64 = rand::rng().random();
        Self::with_seed(seed)
    }

    /// Engine whose shuffles are reproducible from `seed`.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            deck: Deck::standard(),
            player: Hand::new(),
            dealer: Hand::new(),
            state: RoundState::NotStarted,
            outcome: None,
            stats: Statistics::default(),
            round: 0,
            history: Vec::new(),
        }
    }

    pub fn player_hand(&self) -> &Hand {
        &self.player
    }

    pub fn dealer_hand(&self) -> &Hand {
        &self.dealer
    }

    pub fn player_total(&self) -> u32 {
        self.player.total()
    }

    pub fn dealer_total(&self) -> u32 {
        self.dealer.total()
    }

    pub fn state(&self) -> RoundState {
        self.state
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn outcome_message(&self) -> Option<&'static str> {
        self.outcome.map(Outcome::message)
    }

    pub fn statistics(&self) -> Statistics {
        self.stats
    }

    /// Number of the current (or last) round; zero before the first deal.
    pub fn round_number(&self) -> u64 {
        self.round
    }

    pub fn deck_remaining(&self) -> usize {
        self.deck.len()
    }

    pub fn snapshot(&self) -> RoundSnapshot {
        RoundSnapshot {
            round: self.round,
            state: self.state,
            player_cards: self.player.cards().to_vec(),
            dealer_cards: self.dealer.cards().to_vec(),
            player_value: self.player.value(),
            dealer_value: self.dealer.value(),
            outcome: self.outcome,
            statistics: self.stats,
            deck_remaining: self.deck.len(),
        }
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn history_recent(&self, n: usize) -> Vec<RoundRecord> {
        self.history_recent_offset(n, 0)
    }

    /// Up to `n` records ending `offset` records before the newest.
    pub fn history_recent_offset(&self, n: usize, offset: usize) -> Vec<RoundRecord> {
        let len = self.history.len();
        if n == 0 || len == 0 {
            return Vec::new();
        }
        let offset = offset.min(len.saturating_sub(n));
        let end = len - offset;
        let start = end.saturating_sub(n);
        self.history[start..end].to_vec()
    }

    /// Shuffle a fresh 52-card deck and deal a new round.
    pub fn start_round(&mut self) -> Result<RoundSnapshot, RoundError> {
        self.ensure_can_start()?;
        self.deck.reset_and_shuffle(&mut self.rng);
        self.open_round()
    }

    /// Deal a new round from `deck` as given, without shuffling.
    pub fn start_round_with_deck(&mut self, deck: Deck) -> Result<RoundSnapshot, RoundError> {
        self.ensure_can_start()?;
        self.deck = deck;
        self.open_round()
    }

    pub fn hit(&mut self) -> Result<RoundSnapshot, RoundError> {
        self.ensure_player_turn("hit")?;
        let card = match self.deck.draw_one() {
            Ok(card) => card,
            Err(err) => {
                warn!(round = self.round, "deck exhausted on hit");
                return Err(err.into());
            }
        };
        self.player.push(card);
        let total = self.player.total();
        debug!(round = self.round, %card, total, "player hits");
        if total > BLACKJACK {
            self.settle(Outcome::PlayerBust);
        }
        Ok(self.snapshot())
    }

    /// End the player's turn, run the dealer to completion and settle.
    pub fn stand(&mut self) -> Result<RoundSnapshot, RoundError> {
        self.ensure_player_turn("stand")?;
        self.state = RoundState::DealerTurn;
        debug!(round = self.round, total = self.player.total(), "player stands");
        self.play_dealer();
        let outcome = determine_winner(self.player.total(), self.dealer.total());
        self.settle(outcome);
        Ok(self.snapshot())
    }

    fn ensure_can_start(&self) -> Result<(), RoundError> {
        match self.state {
            RoundState::NotStarted | RoundState::Settled => Ok(()),
            state => Err(RoundError::InvalidState { action: "start a round", state }),
        }
    }

    fn ensure_player_turn(&self, action: &'static str) -> Result<(), RoundError> {
        if self.state == RoundState::PlayerTurn {
            Ok(())
        } else {
            Err(RoundError::InvalidState { action, state: self.state })
        }
    }

    fn open_round(&mut self) -> Result<RoundSnapshot, RoundError> {
        self.player.clear();
        self.dealer.clear();
        self.outcome = None;
        if let Err(err) = self.deal_opening() {
            self.abort_opening_deal();
            return Err(err.into());
        }
        self.round += 1;
        self.state = RoundState::PlayerTurn;
        debug!(
            round = self.round,
            player = %format_cards(self.player.cards()),
            dealer = %format_cards(self.dealer.cards()),
            "opening deal"
        );
        if self.player.total() == BLACKJACK {
            self.settle(Outcome::PlayerBlackjack);
        }
        Ok(self.snapshot())
    }

    fn deal_opening(&mut self) -> Result<(), DeckError> {
        self.player.push(self.deck.draw_one()?);
        self.player.push(self.deck.draw_one()?);
        self.dealer.push(self.deck.draw_one()?);
        Ok(())
    }

    fn abort_opening_deal(&mut self) {
        warn!(remaining = self.deck.len(), "deck exhausted during opening deal");
        let drawn: Vec<Card> = self.player.drain().chain(self.dealer.drain()).collect();
        for card in drawn.into_iter().rev() {
            self.deck.return_to_top(card);
        }
        self.state = RoundState::NotStarted;
    }

    // The dealer draws until reaching the player's total. A player on 21 gets no draw.
    fn play_dealer(&mut self) {
        let player_total = self.player.total();
        while self.dealer.total() < player_total && player_total < BLACKJACK {
            match self.deck.draw_one() {
                Ok(card) => {
                    self.dealer.push(card);
                    debug!(round = self.round, %card, total = self.dealer.total(), "dealer draws");
                }
                Err(_) => {
                    warn!(round = self.round, "deck exhausted during dealer turn");
                    break;
                }
            }
        }
    }

    fn settle(&mut self, outcome: Outcome) {
        self.state = RoundState::Settled;
        self.outcome = Some(outcome);
        self.stats.record(outcome.result());
        let record = RoundRecord {
            round: self.round,
            player_cards: self.player.cards().to_vec(),
            dealer_cards: self.dealer.cards().to_vec(),
            player_total: self.player.total(),
            dealer_total: self.dealer.total(),
            outcome,
        };
        info!(
            round = record.round,
            player_total = record.player_total,
            dealer_total = record.dealer_total,
            outcome = outcome.message(),
            "round settled"
        );
        self.history.push(record);
    }
}

fn format_cards(cards: &[Card]) -> String {
    cards.iter().map(Card::to_string).collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::parse_cards;
    use crate::deck::DECK_SIZE;

    fn stacked(s: &str) -> Deck {
        Deck::stacked(parse_cards(s).unwrap())
    }

    #[test]
    fn actions_rejected_before_first_round() {
        let mut e = RoundEngine::with_seed(1);
        assert_eq!(e.state(), RoundState::NotStarted);
        assert!(matches!(
            e.hit(),
            Err(RoundError::InvalidState { state: RoundState::NotStarted, .. })
        ));
        assert!(matches!(e.stand(), Err(RoundError::InvalidState { .. })));
        assert_eq!(e.statistics(), Statistics::default());
    }

    #[test]
    fn opening_deal_is_two_to_player_one_to_dealer() {
        let mut e = RoundEngine::with_seed(9);
        let snap = e.start_round_with_deck(stacked("9H 5S KD 2C")).unwrap();
        assert_eq!(snap.player_cards, parse_cards("9H 5S").unwrap());
        assert_eq!(snap.dealer_cards, parse_cards("KD").unwrap());
        assert_eq!(snap.player_total(), 14);
        assert_eq!(snap.dealer_total(), 10);
        assert_eq!(snap.state, RoundState::PlayerTurn);
        assert_eq!(snap.outcome, None);
        assert_eq!(snap.deck_remaining, 1);
    }

    #[test]
    fn fresh_round_keeps_every_card_in_one_place() {
        let mut e = RoundEngine::with_seed(5);
        e.start_round().unwrap();
        let held = e.player_hand().len() + e.dealer_hand().len();
        assert_eq!(held + e.deck_remaining(), DECK_SIZE);
    }

    #[test]
    fn natural_settles_without_dealer_draw() {
        let mut e = RoundEngine::with_seed(1);
        let snap = e.start_round_with_deck(stacked("AH KS 10D AD")).unwrap();
        assert_eq!(snap.state, RoundState::Settled);
        assert_eq!(snap.outcome, Some(Outcome::PlayerBlackjack));
        assert_eq!(snap.outcome_message(), Some("Blackjack! You win!"));
        assert_eq!(snap.dealer_cards.len(), 1);
        assert_eq!(e.statistics().wins(), 1);
        assert_eq!(e.statistics().rounds(), 1);
    }

    #[test]
    fn bust_on_hit_settles_as_loss() {
        let mut e = RoundEngine::with_seed(1);
        e.start_round_with_deck(stacked("10H 6S 9D KC 5H")).unwrap();
        let snap = e.hit().unwrap();
        assert_eq!(snap.player_total(), 26);
        assert_eq!(snap.state, RoundState::Settled);
        assert_eq!(snap.outcome, Some(Outcome::PlayerBust));
        assert_eq!(snap.dealer_cards.len(), 1);
        assert_eq!(e.statistics().losses(), 1);
        assert_eq!(e.statistics().rounds(), 1);
        assert!(matches!(e.hit(), Err(RoundError::InvalidState { .. })));
        assert!(matches!(e.stand(), Err(RoundError::InvalidState { .. })));
        assert_eq!(e.statistics().rounds(), 1);
    }

    #[test]
    fn hit_below_bust_stays_in_player_turn() {
        let mut e = RoundEngine::with_seed(1);
        e.start_round_with_deck(stacked("2H 3S 9D 4C")).unwrap();
        let snap = e.hit().unwrap();
        assert_eq!(snap.player_total(), 9);
        assert_eq!(snap.state, RoundState::PlayerTurn);
    }

    #[test]
    fn start_round_rejected_mid_round() {
        let mut e = RoundEngine::with_seed(1);
        e.start_round_with_deck(stacked("2H 3S 9D")).unwrap();
        assert!(matches!(
            e.start_round(),
            Err(RoundError::InvalidState { state: RoundState::PlayerTurn, .. })
        ));
    }

    #[test]
    fn new_round_discards_prior_hands() {
        let mut e = RoundEngine::with_seed(1);
        e.start_round_with_deck(stacked("AH KS 2D")).unwrap();
        assert_eq!(e.round_number(), 1);
        let snap = e.start_round_with_deck(stacked("5H 6S 7D")).unwrap();
        assert_eq!(snap.round, 2);
        assert_eq!(snap.player_cards, parse_cards("5H 6S").unwrap());
        assert_eq!(snap.dealer_cards, parse_cards("7D").unwrap());
        assert_eq!(snap.outcome, None);
        assert_eq!(snap.statistics.wins(), 1);
    }

    #[test]
    fn exhausted_opening_deal_returns_cards() {
        let mut e = RoundEngine::with_seed(1);
        let err = e.start_round_with_deck(stacked("AH KS")).unwrap_err();
        assert_eq!(err, RoundError::DeckExhausted);
        assert_eq!(e.state(), RoundState::NotStarted);
        assert!(e.player_hand().is_empty());
        assert!(e.dealer_hand().is_empty());
        assert_eq!(e.deck_remaining(), 2);
        assert_eq!(e.round_number(), 0);
        assert_eq!(e.statistics().rounds(), 0);
        // a normal round still works afterwards
        assert!(e.start_round().is_ok());
    }

    #[test]
    fn exhausted_hit_keeps_player_turn() {
        let mut e = RoundEngine::with_seed(1);
        e.start_round_with_deck(stacked("10H 6S 9D")).unwrap();
        assert_eq!(e.hit(), Err(RoundError::DeckExhausted));
        assert_eq!(e.state(), RoundState::PlayerTurn);
        assert_eq!(e.player_hand().len(), 2);
        let snap = e.stand().unwrap();
        assert_eq!(snap.dealer_total(), 9);
        assert_eq!(snap.outcome, Some(Outcome::PlayerWins));
    }

    #[test]
    fn player_on_21_after_hits_gets_no_dealer_draw() {
        let mut e = RoundEngine::with_seed(1);
        e.start_round_with_deck(stacked("5H 6S 9D 10C KD")).unwrap();
        let snap = e.hit().unwrap();
        assert_eq!(snap.player_total(), 21);
        assert_eq!(snap.state, RoundState::PlayerTurn);
        let snap = e.stand().unwrap();
        assert_eq!(snap.dealer_cards.len(), 1);
        assert_eq!(snap.outcome, Some(Outcome::PlayerWins));
    }

    #[test]
    fn history_tracks_settled_rounds() {
        let mut e = RoundEngine::with_seed(1);
        e.start_round_with_deck(stacked("AH KS 2D")).unwrap();
        e.start_round_with_deck(stacked("10H 8S 10D 8C")).unwrap();
        e.stand().unwrap();
        assert_eq!(e.history_len(), 2);
        let recent = e.history_recent(5);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].outcome, Outcome::PlayerBlackjack);
        assert_eq!(recent[1].outcome, Outcome::Tie);
        assert_eq!(recent[1].dealer_total, 18);
        let older = e.history_recent_offset(1, 1);
        assert_eq!(older[0].round, 1);
        assert!(e.history_recent(0).is_empty());
    }

    #[test]
    fn seeded_engines_deal_identically() {
        let mut a = RoundEngine::with_seed(77);
        let mut b = RoundEngine::with_seed(77);
        for _ in 0..5 {
            let sa = a.start_round().unwrap();
            let sb = b.start_round().unwrap();
            assert_eq!(sa, sb);
            if sa.state == RoundState::PlayerTurn {
                assert_eq!(a.stand().unwrap(), b.stand().unwrap());
            }
        }
    }

    #[test]
    fn outcome_results_match_counters() {
        assert_eq!(Outcome::PlayerBlackjack.result(), RoundResult::Win);
        assert_eq!(Outcome::DealerBust.result(), RoundResult::Win);
        assert_eq!(Outcome::PlayerWins.result(), RoundResult::Win);
        assert_eq!(Outcome::PlayerBust.result(), RoundResult::Loss);
        assert_eq!(Outcome::DealerWins.result(), RoundResult::Loss);
        assert_eq!(Outcome::Tie.result(), RoundResult::Tie);
    }

    #[test]
    fn player_bust_takes_precedence_over_dealer_bust() {
        assert_eq!(determine_winner(23, 23), Outcome::PlayerBust);
        assert_eq!(determine_winner(21, 21), Outcome::Tie);
    }
}
