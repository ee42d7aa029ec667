use super::card::Card;
use super::rank::Rank;
use super::suit::Suit;
use crate::SHORT_DECK_SEATS;
use rand::seq::SliceRandom;

/// Freshly shuffled draw pile for one game.
///
/// Built once at setup: the rank × suit cross product sized by head count
/// (36 cards from Six up for small tables, the full 52 otherwise), an
/// unbiased in-place Fisher–Yates shuffle, and one non-ace swapped to the
/// back. The back card sits face up for the whole game and its suit is the
/// trump suit.
#[derive(Debug, Clone)]
pub struct Deck(Vec<Card>);

impl Deck {
    pub fn new(seats: usize) -> Self {
        let lowest = if seats > SHORT_DECK_SEATS {
            Rank::Two
        } else {
            Rank::Six
        };
        let mut cards = Vec::new();
        for r in u8::from(lowest)..=u8::from(Rank::Ace) {
            for s in 0..Suit::N as u8 {
                cards.push(Card::from((Rank::from(r), Suit::from(s))));
            }
        }
        let mut deck = Self(cards);
        deck.shuffle();
        deck.bury();
        deck
    }

    /// Uniform random permutation of the whole pile.
    fn shuffle(&mut self) {
        self.0.shuffle(&mut rand::rng());
    }

    /// Swap the first non-ace (scanning from the front) to the back, where it
    /// is revealed as the trump card.
    fn bury(&mut self) {
        let last = self.0.len() - 1;
        if let Some(i) = self.0.iter().position(|c| c.rank() != Rank::Ace) {
            self.0.swap(i, last);
        }
    }

    pub fn trump(&self) -> Suit {
        self.0.last().expect("a deck is never built empty").suit()
    }
    pub fn size(&self) -> usize {
        self.0.len()
    }
    pub fn cards(&self) -> &[Card] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn short_deck_for_small_tables() {
        assert!(Deck::new(2).size() == 36);
        assert!(Deck::new(4).size() == 36);
        assert!(Deck::new(5).size() == 52);
    }

    #[test]
    fn no_duplicates() {
        let deck = Deck::new(5);
        let ids: HashSet<u8> = deck.cards().iter().map(|&c| u8::from(c)).collect();
        assert!(ids.len() == 52);
    }

    #[test]
    fn short_deck_starts_at_six() {
        let deck = Deck::new(3);
        assert!(deck.cards().iter().all(|c| c.rank() >= Rank::Six));
    }

    #[test]
    fn bottom_card_fixes_trump() {
        for _ in 0..32 {
            let deck = Deck::new(2);
            let bottom = deck.cards().last().copied().unwrap();
            assert!(bottom.rank() != Rank::Ace);
            assert!(deck.trump() == bottom.suit());
        }
    }
}
