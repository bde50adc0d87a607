//! Card renderer capability used by front ends.
//!
//! The rules engine only knows cards by identifier. A [`CardRenderer`] turns a card
//! into something displayable; when it has nothing for a card, the caller falls back
//! to [`CardFace::placeholder`].

use crate::cards::{Card, Rank, Suit};
use std::collections::HashMap;

/// Displayable representation of a card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardFace {
    pub label: String,
    pub red: bool,
}

impl CardFace {
    pub fn new(label: impl Into<String>, red: bool) -> Self {
        Self { label: label.into(), red }
    }

    /// Face-down card.
    pub fn hidden() -> Self {
        Self::new("??", false)
    }

    /// Plain identifier, used when a renderer has no face for a card.
    pub fn placeholder(card: Card) -> Self {
        Self::new(format!("[{card}]"), card.suit().is_red())
    }
}

pub trait CardRenderer {
    fn render(&self, card: Card) -> Option<CardFace>;
}

/// ```
/// use blackjack_rs::cards::{Card, Rank, Suit};
/// use blackjack_rs::render::{face_or_placeholder, FaceTable};
///
/// let empty = FaceTable::new();
/// let face = face_or_placeholder(&empty, Card::new(Rank::Ace, Suit::Hearts));
/// assert_eq!(face.label, "[AH]");
/// ```
pub fn face_or_placeholder<R: CardRenderer + ?Sized>(renderer: &R, card: Card) -> CardFace {
    renderer.render(card).unwrap_or_else(|| CardFace::placeholder(card))
}

/// Rank plus suit symbol, e.g. `10♠`.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlyphRenderer;

impl CardRenderer for GlyphRenderer {
    fn render(&self, card: Card) -> Option<CardFace> {
        let label = format!("{}{}", card.rank(), suit_glyph(card.suit()));
        Some(CardFace::new(label, card.suit().is_red()))
    }
}

/// Rank plus suit marker letter, e.g. `10S`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LetterRenderer;

impl CardRenderer for LetterRenderer {
    fn render(&self, card: Card) -> Option<CardFace> {
        Some(CardFace::new(card.to_string(), card.suit().is_red()))
    }
}

/// Explicit card-to-face lookup table. Cards without an entry render as placeholders.
#[derive(Debug, Clone, Default)]
pub struct FaceTable {
    faces: HashMap<Card, CardFace>,
}

impl FaceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Table filled from the Unicode "Playing Cards" block.
    pub fn playing_card_glyphs() -> Self {
        let mut table = Self::new();
        for &suit in &Suit::ALL {
            for &rank in &Rank::ALL {
                let card = Card::new(rank, suit);
                if let Some(ch) = playing_card_char(card) {
                    table.insert(card, CardFace::new(ch.to_string(), suit.is_red()));
                }
            }
        }
        table
    }

    pub fn insert(&mut self, card: Card, face: CardFace) {
        self.faces.insert(card, face);
    }

    pub fn len(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }
}

impl CardRenderer for FaceTable {
    fn render(&self, card: Card) -> Option<CardFace> {
        self.faces.get(&card).cloned()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CardStyle {
    #[default]
    Glyphs,
    Letters,
    PlayingCards,
}

impl CardStyle {
    pub const ALL: [CardStyle; 3] =
        [CardStyle::Glyphs, CardStyle::Letters, CardStyle::PlayingCards];

    pub fn label(self) -> &'static str {
        match self {
            CardStyle::Glyphs => "Suit symbols",
            CardStyle::Letters => "Letters",
            CardStyle::PlayingCards => "Unicode cards",
        }
    }

    pub fn next(self) -> Self {
        let i = Self::ALL.iter().position(|&s| s == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let i = Self::ALL.iter().position(|&s| s == self).unwrap_or(0);
        Self::ALL[(i + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    pub fn renderer(self) -> Box<dyn CardRenderer> {
        match self {
            CardStyle::Glyphs => Box::new(GlyphRenderer),
            CardStyle::Letters => Box::new(LetterRenderer),
            CardStyle::PlayingCards => Box::new(FaceTable::playing_card_glyphs()),
        }
    }
}

fn suit_glyph(s: Suit) -> char {
    match s {
        Suit::Hearts => '♥',
        Suit::Diamonds => '♦',
        Suit::Clubs => '♣',
        Suit::Spades => '♠',
    }
}

fn playing_card_char(card: Card) -> Option<char> {
    let base: u32 = match card.suit() {
        Suit::Spades => 0x1F0A0,
        Suit::Hearts => 0x1F0B0,
        Suit::Diamonds => 0x1F0C0,
        Suit::Clubs => 0x1F0D0,
    };
    // 0xC is the knight, which a standard deck skips
    let offset: u32 = match card.rank() {
        Rank::Ace => 0x1,
        Rank::Jack => 0xB,
        Rank::Queen => 0xD,
        Rank::King => 0xE,
        pip => pip as u32,
    };
    char::from_u32(base + offset)
}
