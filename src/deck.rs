use crate::cards::{Card, Rank, Suit};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Number of cards in a full deck.
pub const DECK_SIZE: usize = 52;

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum DeckError {
    #[error("deck is exhausted")]
    Exhausted,
}

/// A single 52-card deck. The top of the deck is the end of the backing vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Default for Deck {
    fn default() -> Self {
        Self::standard()
    }
}

impl Deck {
    /// All 52 cards in a fixed, unshuffled order.
    ///
    /// ```
    /// use blackjack_rs::deck::Deck;
    ///
    /// let deck = Deck::standard();
    /// assert_eq!(deck.len(), 52);
    /// ```
    pub fn standard() -> Self {
        let mut deck = Self { cards: Vec::with_capacity(DECK_SIZE) };
        deck.repopulate();
        deck
    }

    /// A deck with a fixed draw order: `cards[0]` is drawn first.
    ///
    /// ```
    /// use blackjack_rs::cards::parse_cards;
    /// use blackjack_rs::deck::Deck;
    ///
    /// let mut deck = Deck::stacked(parse_cards("AH KS").unwrap());
    /// assert_eq!(deck.draw_one().unwrap().to_string(), "AH");
    /// assert_eq!(deck.draw_one().unwrap().to_string(), "KS");
    /// assert!(deck.draw_one().is_err());
    /// ```
    pub fn stacked(cards: impl IntoIterator<Item = Card>) -> Self {
        let mut cards: Vec<Card> = cards.into_iter().collect();
        cards.reverse();
        Self { cards }
    }

    fn repopulate(&mut self) {
        self.cards.clear();
        for &s in &Suit::ALL {
            for &r in &Rank::ALL {
                self.cards.push(Card::new(r, s));
            }
        }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn contains(&self, card: Card) -> bool {
        self.cards.contains(&card)
    }

    /// Cards from top (next to draw) to bottom.
    pub fn iter_from_top(&self) -> impl Iterator<Item = &Card> + '_ {
        self.cards.iter().rev()
    }

    /// Restore all 52 cards, discarding whatever the deck held, then shuffle once.
    pub fn reset_and_shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.repopulate();
        self.cards.shuffle(rng);
    }

    /// Shuffle the current contents using a seeded RNG for reproducibility.
    pub fn shuffle_seeded(&mut self, seed: u64) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        self.cards.shuffle(&mut rng);
    }

    /// Remove and return the top card.
    pub fn draw_one(&mut self) -> Result<Card, DeckError> {
        self.cards.pop().ok_or(DeckError::Exhausted)
    }

    /// Put a previously drawn card back on top.
    pub(crate) fn return_to_top(&mut self, card: Card) {
        self.cards.push(card);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn standard_deck_has_52_unique_cards() {
        let d = Deck::standard();
        assert_eq!(d.len(), DECK_SIZE);
        let unique: HashSet<Card> = d.cards.iter().copied().collect();
        assert_eq!(unique.len(), DECK_SIZE);
    }

    #[test]
    fn seeded_shuffle_is_reproducible() {
        let mut d1 = Deck::standard();
        let mut d2 = Deck::standard();
        d1.shuffle_seeded(42);
        d2.shuffle_seeded(42);
        assert_eq!(d1.cards, d2.cards);
        assert_ne!(d1.cards, Deck::standard().cards);
    }

    #[test]
    fn reset_restores_dealt_cards() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut d = Deck::standard();
        for _ in 0..10 {
            d.draw_one().unwrap();
        }
        assert_eq!(d.len(), 42);
        d.reset_and_shuffle(&mut rng);
        assert_eq!(d.len(), DECK_SIZE);
        let unique: HashSet<Card> = d.cards.iter().copied().collect();
        assert_eq!(unique.len(), DECK_SIZE);
    }

    #[test]
    fn draw_removes_the_card() {
        let mut d = Deck::standard();
        d.shuffle_seeded(7);
        let c1 = d.draw_one().unwrap();
        let c2 = d.draw_one().unwrap();
        assert_ne!(c1, c2);
        assert!(!d.contains(c1));
        assert!(!d.contains(c2));
        assert_eq!(d.len(), 50);
    }

    #[test]
    fn empty_deck_reports_exhaustion() {
        let mut d = Deck::stacked(Vec::new());
        assert!(d.is_empty());
        assert_eq!(d.draw_one(), Err(DeckError::Exhausted));
        // still usable afterwards
        assert_eq!(d.draw_one(), Err(DeckError::Exhausted));
    }

    #[test]
    fn returned_card_is_drawn_next() {
        let mut d = Deck::standard();
        let top = d.draw_one().unwrap();
        d.return_to_top(top);
        assert_eq!(d.len(), DECK_SIZE);
        assert_eq!(d.iter_from_top().next(), Some(&top));
        assert_eq!(d.draw_one(), Ok(top));
    }
}
