use crate::cards::{parse_cards, Card};
use std::collections::HashSet;
use std::str::FromStr;

/// Highest total that is not a bust.
pub const BLACKJACK: u32 = 21;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum HandError {
    #[error("duplicate card in hand: {0}")]
    DuplicateCard(Card),
    #[error("card parse error: {0}")]
    CardParse(String),
}

/// Total of a hand after soft-ace reduction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HandValue {
    pub total: u32,
    /// At least one ace is still counted as 11.
    pub soft: bool,
}

impl HandValue {
    pub fn is_bust(self) -> bool {
        self.total > BLACKJACK
    }
}

/// Score a set of cards from scratch.
///
/// Aces start at 11 and are softened to 1, one at a time, while the total is over 21.
///
/// ```
/// use blackjack_rs::cards::parse_cards;
/// use blackjack_rs::hand::hand_value;
///
/// let v = hand_value(&parse_cards("AH 6S").unwrap());
/// assert_eq!(v.total, 17);
/// assert!(v.soft);
/// ```
pub fn hand_value(cards: &[Card]) -> HandValue {
    let mut total = 0;
    let mut aces = 0;
    for card in cards {
        total += card.points();
        if card.rank().is_ace() {
            aces += 1;
        }
    }
    while total > BLACKJACK && aces > 0 {
        total -= 10;
        aces -= 1;
    }
    HandValue { total, soft: aces > 0 }
}

/// ```
/// use blackjack_rs::cards::parse_cards;
/// use blackjack_rs::hand::calculate_hand_total;
///
/// assert_eq!(calculate_hand_total(&parse_cards("AH AS").unwrap()), 12);
/// assert_eq!(calculate_hand_total(&parse_cards("AH KS").unwrap()), 21);
/// assert_eq!(calculate_hand_total(&parse_cards("AH 9S 5D").unwrap()), 15);
/// ```
pub fn calculate_hand_total(cards: &[Card]) -> u32 {
    hand_value(cards).total
}

/// Cards held by the player or the dealer, in draw order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hand {
    cards: Vec<Card>,
}

impl Hand {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn try_new(cards: Vec<Card>) -> Result<Self, HandError> {
        let mut seen = HashSet::with_capacity(cards.len());
        for &c in &cards {
            if !seen.insert(c) {
                return Err(HandError::DuplicateCard(c));
            }
        }
        Ok(Self { cards })
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn value(&self) -> HandValue {
        hand_value(&self.cards)
    }

    pub fn total(&self) -> u32 {
        self.value().total
    }

    pub fn is_bust(&self) -> bool {
        self.value().is_bust()
    }

    pub(crate) fn push(&mut self, card: Card) {
        self.cards.push(card);
    }

    pub(crate) fn clear(&mut self) {
        self.cards.clear();
    }

    pub(crate) fn drain(&mut self) -> std::vec::Drain<'_, Card> {
        self.cards.drain(..)
    }
}

impl FromStr for Hand {
    type Err = HandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cards = parse_cards(s).map_err(|e| HandError::CardParse(e.to_string()))?;
        Hand::try_new(cards)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn total(s: &str) -> u32 {
        s.parse::<Hand>().unwrap().total()
    }

    #[test]
    fn pips_and_faces() {
        assert_eq!(total("2H 3D"), 5);
        assert_eq!(total("10H JD QC KS"), 40);
        assert_eq!(total("9C 7H"), 16);
    }

    #[test]
    fn aces_soften_one_at_a_time() {
        assert_eq!(total("AH AS"), 12);
        assert_eq!(total("AH KS"), 21);
        assert_eq!(total("AH 9S 5D"), 15);
        assert_eq!(total("AH AS AD AC"), 14);
        assert_eq!(total("AH AS 9D"), 21);
        assert_eq!(total("AH AS KD QC"), 22);
    }

    #[test]
    fn soft_flag_tracks_unsoftened_ace() {
        let soft: Hand = "AH 6S".parse().unwrap();
        assert!(soft.value().soft);
        let hard: Hand = "AH 6S 10D".parse().unwrap();
        assert_eq!(hard.total(), 17);
        assert!(!hard.value().soft);
        let no_ace: Hand = "10D 7C".parse().unwrap();
        assert!(!no_ace.value().soft);
    }

    #[test]
    fn bust_is_over_21() {
        assert!(!"KH QH AH".parse::<Hand>().unwrap().is_bust());
        assert!("KH QH 2H".parse::<Hand>().unwrap().is_bust());
    }

    #[test]
    fn empty_hand_totals_zero() {
        let h = Hand::new();
        assert!(h.is_empty());
        assert_eq!(h.value(), HandValue { total: 0, soft: false });
    }

    #[test]
    fn duplicate_cards_rejected() {
        assert!(matches!("AH AH".parse::<Hand>(), Err(HandError::DuplicateCard(_))));
        assert!(matches!("AH ZZ".parse::<Hand>(), Err(HandError::CardParse(_))));
    }

    #[test]
    fn push_preserves_draw_order() {
        let mut h = Hand::new();
        let cards = parse_cards("5C KD 2S").unwrap();
        for &c in &cards {
            h.push(c);
        }
        assert_eq!(h.cards(), cards.as_slice());
        h.clear();
        assert!(h.is_empty());
    }
}
