mod board;
mod claim;
mod dealer;
mod player;
mod players;
mod room;
mod screen;
mod seat;
mod table;
mod timer;

pub use board::*;
pub use claim::*;
pub use dealer::*;
pub use player::*;
pub use players::*;
pub use room::*;
pub use screen::*;
pub use seat::*;
pub use table::*;
pub use timer::*;
