pub mod attribute;
pub use attribute::*;

pub mod card;
pub use card::*;

pub mod deck;
pub use deck::*;

pub mod rules;
pub use rules::*;
