use blackjack_rs::cards::Card;
use blackjack_rs::deck::{Deck, DeckError, DECK_SIZE};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::{HashMap, HashSet};

fn draw_all(deck: &mut Deck) -> Vec<Card> {
    let mut out = Vec::with_capacity(DECK_SIZE);
    while let Ok(card) = deck.draw_one() {
        out.push(card);
    }
    out
}

proptest! {
    #[test]
    fn shuffle_yields_52_unique_cards(seed in any::<u64>()) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut deck = Deck::standard();
        deck.reset_and_shuffle(&mut rng);
        let cards = draw_all(&mut deck);
        prop_assert_eq!(cards.len(), DECK_SIZE);
        let unique: HashSet<Card> = cards.iter().copied().collect();
        prop_assert_eq!(unique.len(), DECK_SIZE);
    }

    #[test]
    fn reshuffle_after_dealing_restores_full_deck(
        seed in any::<u64>(),
        dealt in 0usize..=DECK_SIZE,
    ) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut deck = Deck::standard();
        deck.reset_and_shuffle(&mut rng);
        for _ in 0..dealt {
            deck.draw_one().unwrap();
        }
        prop_assert_eq!(deck.len(), DECK_SIZE - dealt);

        deck.reset_and_shuffle(&mut rng);
        let cards = draw_all(&mut deck);
        let unique: HashSet<Card> = cards.iter().copied().collect();
        prop_assert_eq!(cards.len(), DECK_SIZE);
        prop_assert_eq!(unique.len(), DECK_SIZE);
    }
}

#[test]
fn draw_after_52_cards_reports_exhaustion() {
    let mut deck = Deck::standard();
    deck.shuffle_seeded(11);
    assert_eq!(draw_all(&mut deck).len(), DECK_SIZE);
    assert_eq!(deck.draw_one(), Err(DeckError::Exhausted));
    assert!(deck.is_empty());
}

#[test]
fn every_card_reaches_the_top() {
    let mut rng = ChaCha8Rng::seed_from_u64(2024);
    let mut deck = Deck::standard();
    let mut tops: HashMap<Card, usize> = HashMap::new();
    let shuffles = 5200;
    for _ in 0..shuffles {
        deck.reset_and_shuffle(&mut rng);
        let top = *deck.iter_from_top().next().unwrap();
        *tops.entry(top).or_default() += 1;
    }
    assert_eq!(tops.len(), DECK_SIZE);
    let expected = shuffles / DECK_SIZE;
    let max = tops.values().copied().max().unwrap();
    assert!(max < expected * 2, "top card skewed: max {max}, expected about {expected}");
}

#[test]
fn stacked_deck_draws_in_given_order() {
    let cards = blackjack_rs::cards::parse_cards("2H 3D 4C").unwrap();
    let mut deck = Deck::stacked(cards.clone());
    assert_eq!(draw_all(&mut deck), cards);
}
