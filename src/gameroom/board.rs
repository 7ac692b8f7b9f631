use crate::PlayerId;
use crate::Slot;
use crate::cards::*;
use std::collections::BTreeSet;

/// Slot ↔ card placement and slot → token owners.
///
/// The board is only reachable through [`super::Table`], which owns it behind
/// a mutex; every method here therefore runs under the table lock.
///
/// Invariants:
/// - a card occupies at most one slot, and `slot(card)` mirrors `card(slot)`
/// - a token can only sit on an occupied slot
/// - removing a card clears every token on its slot and reports the owners,
///   so the caller can drop that slot from each owner's own token set
#[derive(Debug, Clone)]
pub struct Board {
    cards: Vec<Option<Card>>,
    slots: Vec<Option<Slot>>,
    tokens: Vec<BTreeSet<PlayerId>>,
}

impl Board {
    pub fn new(size: usize) -> Self {
        Self {
            cards: vec![None; size],
            slots: vec![None; crate::DECK_SIZE],
            tokens: vec![BTreeSet::new(); size],
        }
    }
    pub fn size(&self) -> usize {
        self.cards.len()
    }
    pub fn card(&self, slot: Slot) -> Option<Card> {
        self.cards.get(slot).copied().flatten()
    }
    pub fn slot(&self, card: Card) -> Option<Slot> {
        self.slots.get(u8::from(card) as usize).copied().flatten()
    }
    pub fn is_empty(&self, slot: Slot) -> bool {
        self.card(slot).is_none()
    }
    /// Empty slots in ascending order.
    pub fn empties(&self) -> Vec<Slot> {
        (0..self.size()).filter(|s| self.is_empty(*s)).collect()
    }
    /// Cards on the board in slot order.
    pub fn cards(&self) -> Vec<Card> {
        self.cards.iter().flatten().copied().collect()
    }
    pub fn count(&self) -> usize {
        self.cards.iter().flatten().count()
    }
    /// Owners of the tokens on a slot, ascending. Nothing past the board.
    pub fn tokens(&self, slot: Slot) -> impl Iterator<Item = PlayerId> + '_ {
        self.tokens.get(slot).into_iter().flatten().copied()
    }
    pub fn has_token(&self, player: PlayerId, slot: Slot) -> bool {
        self.tokens.get(slot).is_some_and(|t| t.contains(&player))
    }
}

impl Board {
    /// Puts a card on an empty slot.
    /// Panics if the slot is off the board or occupied, or the card is already placed.
    pub fn place_card(&mut self, card: Card, slot: Slot) {
        assert!(slot < self.size(), "slot {} is off the board", slot);
        assert!(self.is_empty(slot), "slot {} is occupied", slot);
        assert!(self.slot(card).is_none(), "card {} is already placed", card);
        self.cards[slot] = Some(card);
        self.slots[u8::from(card) as usize] = Some(slot);
    }
    /// Takes the card off a slot, clearing its tokens.
    /// Returns the card and the players whose tokens were evicted,
    /// or `None` if the slot was already empty.
    pub fn remove_card(&mut self, slot: Slot) -> Option<(Card, BTreeSet<PlayerId>)> {
        let card = self.cards.get_mut(slot)?.take()?;
        self.slots[u8::from(card) as usize] = None;
        let owners = std::mem::take(&mut self.tokens[slot]);
        Some((card, owners))
    }
    /// Marks a slot for a player. Returns false on an empty slot.
    pub fn place_token(&mut self, player: PlayerId, slot: Slot) -> bool {
        if self.is_empty(slot) {
            return false;
        }
        self.tokens[slot].insert(player);
        true
    }
    /// Unmarks a slot for a player. Returns false if there was no token.
    pub fn remove_token(&mut self, player: PlayerId, slot: Slot) -> bool {
        self.tokens
            .get_mut(slot)
            .is_some_and(|t| t.remove(&player))
    }
}
