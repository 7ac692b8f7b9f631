use super::attribute::Attribute;
use super::card::Card;

/// Grouping rules: which three cards may be claimed together.
///
/// Implementations must be pure; the dealer calls them while holding the
/// board lock and the end-of-game check calls them on the whole card pool.
pub trait Rules: Send + Sync {
    /// Whether the three cards form a legal grouping.
    fn is_set(&self, cards: [Card; 3]) -> bool;
    /// Up to `limit` legal groupings drawn from `pool`, in pool order.
    fn find(&self, pool: &[Card], limit: usize) -> Vec<[Card; 3]> {
        let mut found = Vec::new();
        if limit == 0 {
            return found;
        }
        for i in 0..pool.len() {
            for j in i + 1..pool.len() {
                for k in j + 1..pool.len() {
                    let triple = [pool[i], pool[j], pool[k]];
                    if self.is_set(triple) {
                        found.push(triple);
                        if found.len() >= limit {
                            return found;
                        }
                    }
                }
            }
        }
        found
    }
}

/// The standard rule: on every attribute the three cards are either all
/// equal or all different. With values in `0..3` that is exactly
/// "the sum of the three values is divisible by 3".
#[derive(Debug, Default, Clone, Copy)]
pub struct Classic;

impl Rules for Classic {
    fn is_set(&self, cards: [Card; 3]) -> bool {
        Attribute::ALL.iter().all(|a| {
            cards.iter().map(|c| c.attribute(*a)).sum::<u8>() % crate::VALUES as u8 == 0
        })
    }
}
