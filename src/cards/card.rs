use super::attribute::Attribute;

/// A card encoded as a single byte.
///
/// The 81 cards are bijectively mapped to `0..81`; the four attributes are
/// the base-3 digits of the byte, least significant first:
/// `count + 3 * color + 9 * shade + 27 * shape`.
///
/// # Representations
///
/// - `u8`: Compact index `0..81` for array indexing
/// - `[u8; 4]`: Attribute values in [`Attribute::ALL`] order
///
/// # Display
///
/// Four characters, one per attribute: `2GTV` is two green striped ovals.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Card(u8);

impl Card {
    /// Value `0..3` of one attribute.
    pub fn attribute(&self, attribute: Attribute) -> u8 {
        (self.0 / attribute.weight()) % crate::VALUES as u8
    }
    pub fn attributes(&self) -> [u8; crate::FEATURES] {
        Attribute::ALL.map(|a| self.attribute(a))
    }
}

/// u8 isomorphism
impl From<Card> for u8 {
    fn from(c: Card) -> u8 {
        c.0
    }
}
impl From<u8> for Card {
    fn from(n: u8) -> Self {
        assert!((n as usize) < crate::DECK_SIZE, "card index {} out of range", n);
        Self(n)
    }
}

/// attribute-values isomorphism
impl From<[u8; crate::FEATURES]> for Card {
    fn from(values: [u8; crate::FEATURES]) -> Self {
        Self(
            Attribute::ALL
                .iter()
                .zip(values)
                .map(|(a, v)| a.weight() * (v % crate::VALUES as u8))
                .sum(),
        )
    }
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        Attribute::ALL
            .iter()
            .try_for_each(|a| write!(f, "{}", a.label(self.attribute(*a))))
    }
}
