use super::card::Card;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;

/// The dealer's pile of cards not currently on the board.
///
/// Owns its own [`SmallRng`] so a seeded deck reproduces the same game.
/// Draws come from the top (end) of the pile; cards returned from the board
/// go back on top until the next [`Deck::shuffle`].
#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
    rng: SmallRng,
}

impl Deck {
    /// Creates a deck holding cards `0..size`, unshuffled.
    pub fn new(size: usize, seed: Option<u64>) -> Self {
        Self::with_cards((0..size as u8).map(Card::from).collect(), seed)
    }
    /// Creates a deck from an explicit pile (top of the pile is the last card).
    pub fn with_cards(cards: Vec<Card>, seed: Option<u64>) -> Self {
        Self {
            cards,
            rng: seed
                .map(SmallRng::seed_from_u64)
                .unwrap_or_else(SmallRng::from_os_rng),
        }
    }
    pub fn shuffle(&mut self) {
        self.cards.shuffle(&mut self.rng);
    }
    pub fn draw(&mut self) -> Option<Card> {
        self.cards.pop()
    }
    pub fn put(&mut self, card: Card) {
        debug_assert!(!self.cards.contains(&card));
        self.cards.push(card);
    }
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }
    pub fn len(&self) -> usize {
        self.cards.len()
    }
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draw_then_put_conserves_cards() {
        let mut deck = Deck::new(crate::DECK_SIZE, Some(7));
        deck.shuffle();
        let drawn = (0..12).filter_map(|_| deck.draw()).collect::<Vec<_>>();
        assert_eq!(drawn.len(), 12);
        assert_eq!(deck.len(), crate::DECK_SIZE - 12);
        drawn.into_iter().for_each(|c| deck.put(c));
        let mut all = deck.cards().to_vec();
        all.sort();
        assert_eq!(all, (0..crate::DECK_SIZE as u8).map(Card::from).collect::<Vec<_>>());
    }

    #[test]
    fn seeded_shuffle_is_reproducible() {
        let mut a = Deck::new(crate::DECK_SIZE, Some(42));
        let mut b = Deck::new(crate::DECK_SIZE, Some(42));
        a.shuffle();
        b.shuffle();
        assert_eq!(a.cards(), b.cards());
    }

    #[test]
    fn empty_deck_draws_nothing() {
        let mut deck = Deck::with_cards(vec![], Some(0));
        assert!(deck.is_empty());
        assert_eq!(deck.draw(), None);
    }
}
