use super::board::Board;
use crate::Slot;
use crate::cards::*;
use parking_lot::Mutex;
use parking_lot::MutexGuard;

/// Sole owner of the shared [`Board`].
///
/// Players and the dealer reach the board only through [`Table::lock`].
/// Lock order is always table first, then a seat.
#[derive(Debug)]
pub struct Table {
    board: Mutex<Board>,
}

impl Table {
    pub fn new(size: usize) -> Self {
        Self {
            board: Mutex::new(Board::new(size)),
        }
    }
    pub fn lock(&self) -> MutexGuard<'_, Board> {
        self.board.lock()
    }
    /// Slot triples whose cards form a legal grouping, in slot order.
    pub fn hints(&self, rules: &dyn Rules) -> Vec<[Slot; 3]> {
        let board = self.lock();
        rules
            .find(&board.cards(), usize::MAX)
            .into_iter()
            .filter_map(|[a, b, c]| Some([board.slot(a)?, board.slot(b)?, board.slot(c)?]))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hints_map_cards_back_to_slots() {
        let table = Table::new(6);
        {
            let mut board = table.lock();
            board.place_card(Card::from([0, 0, 0, 0]), 5);
            board.place_card(Card::from([1, 0, 0, 0]), 1);
            board.place_card(Card::from([1, 1, 0, 0]), 0);
            board.place_card(Card::from([2, 0, 0, 0]), 3);
        }
        assert_eq!(table.hints(&Classic), vec![[1, 3, 5]]);
    }
}
