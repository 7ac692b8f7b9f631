use super::board::Board;
use super::claim::*;
use super::table::Table;
use crate::PlayerId;
use crate::Score;
use crate::Slot;
use crate::TOKENS;
use parking_lot::Condvar;
use parking_lot::Mutex;
use parking_lot::MutexGuard;
use std::collections::VecDeque;
use std::time::Duration;
use std::time::Instant;

/// What a single key press did to the player's tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Press {
    /// Frozen, waiting on a verdict, or shutting down.
    Ignored,
    /// Fourth token, or a slot without a card.
    Rejected,
    Removed,
    Placed,
    /// Third token placed; the claim is already queued.
    Claimed(Claim),
}

/// Per-player state guarded by the seat lock.
///
/// Tokens mirror the board: slot `s` is in `tokens` iff the player is in
/// the board's token set for `s`. Both sides are only changed while the
/// table lock is held.
#[derive(Debug, Default)]
pub struct Ledger {
    tokens: VecDeque<Slot>,
    score: Score,
    frozen_until: Option<Instant>,
    pending: Option<u64>,
    verdict: Option<Verdict>,
    keys: VecDeque<Slot>,
    tickets: u64,
    terminated: bool,
}

impl Ledger {
    pub fn tokens(&self) -> &VecDeque<Slot> {
        &self.tokens
    }
    pub fn score(&self) -> Score {
        self.score
    }
    pub fn is_frozen(&self, now: Instant) -> bool {
        self.frozen_until.is_some_and(|t| now < t)
    }
    pub fn thaws_in(&self, now: Instant) -> Duration {
        self.frozen_until
            .map(|t| t.saturating_duration_since(now))
            .unwrap_or_default()
    }
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
    /// The claim is still the one the player is waiting on, with exactly three tokens.
    pub fn is_live(&self, claim: &Claim) -> bool {
        self.pending == Some(claim.ticket) && self.tokens.len() == TOKENS
    }
    pub fn slots(&self) -> Option<[Slot; TOKENS]> {
        match self.tokens.len() {
            TOKENS => Some([self.tokens[0], self.tokens[1], self.tokens[2]]),
            _ => None,
        }
    }
}

impl Ledger {
    pub(crate) fn award(&mut self, freeze: Duration) {
        self.score += 1;
        self.tokens.clear();
        self.freeze(freeze);
        self.resolve(Verdict::Point);
    }
    pub(crate) fn penalize(&mut self, freeze: Duration) {
        self.freeze(freeze);
        self.resolve(Verdict::Penalty);
    }
    /// Releases a waiting player without any score or freeze effect.
    pub(crate) fn discard(&mut self) {
        if self.pending.is_some() {
            self.resolve(Verdict::Discarded);
        }
    }
    /// Releases the player only if it is still waiting on this very claim.
    pub(crate) fn abandon(&mut self, claim: &Claim) {
        if self.pending == Some(claim.ticket) {
            self.resolve(Verdict::Discarded);
        }
    }
    /// Drops a slot whose card the dealer took off the board.
    pub(crate) fn evict(&mut self, slot: Slot) {
        self.tokens.retain(|s| *s != slot);
        self.discard();
    }
    /// Start-of-round state: no tokens, not frozen, no queued input.
    pub(crate) fn reset(&mut self) {
        self.tokens.clear();
        self.keys.clear();
        self.frozen_until = None;
        self.discard();
    }
    #[cfg(test)]
    pub(crate) fn set_score(&mut self, score: Score) {
        self.score = score;
    }
    fn freeze(&mut self, duration: Duration) {
        self.frozen_until = Some(Instant::now() + duration).filter(|_| !duration.is_zero());
    }
    fn resolve(&mut self, verdict: Verdict) {
        self.pending = None;
        self.keys.clear();
        self.verdict = Some(verdict);
    }
}

/// Dealer-side handle on a ledger. Wakes the player thread when dropped,
/// so every change the dealer makes is observed.
pub struct Hold<'a> {
    bell: &'a Condvar,
    ledger: MutexGuard<'a, Ledger>,
}

impl std::ops::Deref for Hold<'_> {
    type Target = Ledger;
    fn deref(&self) -> &Ledger {
        &self.ledger
    }
}
impl std::ops::DerefMut for Hold<'_> {
    fn deref_mut(&mut self) -> &mut Ledger {
        &mut self.ledger
    }
}
impl Drop for Hold<'_> {
    fn drop(&mut self) {
        self.bell.notify_all();
    }
}

/// Shared half of a player actor: identity, ledger, and the condvar the
/// player thread sleeps on while idle, awaiting a verdict, or frozen.
#[derive(Debug)]
pub struct Seat {
    id: PlayerId,
    ledger: Mutex<Ledger>,
    bell: Condvar,
}

impl Seat {
    pub fn new(id: PlayerId) -> Self {
        Self {
            id,
            ledger: Mutex::new(Ledger::default()),
            bell: Condvar::new(),
        }
    }
    pub fn id(&self) -> PlayerId {
        self.id
    }
    /// Dealer-side access. Only a live table guard can be passed in, so the
    /// seat lock is always taken second.
    pub fn hold<'a>(&'a self, _: &MutexGuard<'_, Board>) -> Hold<'a> {
        Hold {
            bell: &self.bell,
            ledger: self.ledger.lock(),
        }
    }
    pub fn score(&self) -> Score {
        self.ledger.lock().score()
    }
    pub fn tokens(&self) -> Vec<Slot> {
        self.ledger.lock().tokens().iter().copied().collect()
    }
    pub fn thaws_in(&self) -> Duration {
        self.ledger.lock().thaws_in(Instant::now())
    }
    pub fn is_pending(&self) -> bool {
        self.ledger.lock().is_pending()
    }
    /// Stops the player thread at its next check and wakes it if it sleeps.
    pub fn terminate(&self) {
        self.ledger.lock().terminated = true;
        self.bell.notify_all();
    }
}

impl Seat {
    /// Input from the outside world. Presses are dropped while frozen,
    /// while a claim is pending, or when three are already queued.
    pub fn press(&self, slot: Slot) -> bool {
        let mut ledger = self.ledger.lock();
        if ledger.terminated
            || ledger.is_pending()
            || ledger.is_frozen(Instant::now())
            || ledger.keys.len() >= TOKENS
        {
            return false;
        }
        ledger.keys.push_back(slot);
        self.bell.notify_all();
        true
    }
    /// Places or removes this player's token on a slot.
    /// Completing a third token queues a claim inside the same critical
    /// section, so the dealer can never see a half-built token set.
    pub fn toggle(&self, table: &Table, queue: &ClaimQueue, slot: Slot) -> Press {
        let mut board = table.lock();
        let mut ledger = self.ledger.lock();
        if ledger.terminated || ledger.is_pending() || ledger.is_frozen(Instant::now()) {
            return Press::Ignored;
        }
        if let Some(i) = ledger.tokens.iter().position(|s| *s == slot) {
            ledger.tokens.remove(i);
            board.remove_token(self.id, slot);
            return Press::Removed;
        }
        if ledger.tokens.len() >= TOKENS || board.is_empty(slot) {
            return Press::Rejected;
        }
        ledger.tokens.push_back(slot);
        board.place_token(self.id, slot);
        if ledger.tokens.len() < TOKENS {
            return Press::Placed;
        }
        ledger.tickets += 1;
        let claim = Claim {
            player: self.id,
            ticket: ledger.tickets,
        };
        ledger.pending = Some(claim.ticket);
        queue.submit(claim);
        Press::Claimed(claim)
    }
    /// Blocks until a key press arrives. `None` once terminated.
    pub(crate) fn next_key(&self) -> Option<Slot> {
        let mut ledger = self.ledger.lock();
        loop {
            if ledger.terminated {
                return None;
            }
            if let Some(slot) = ledger.keys.pop_front() {
                return Some(slot);
            }
            self.bell.wait(&mut ledger);
        }
    }
    /// Blocks until the dealer answers the pending claim. `None` once terminated.
    pub(crate) fn await_verdict(&self) -> Option<Verdict> {
        let mut ledger = self.ledger.lock();
        loop {
            if ledger.terminated {
                return None;
            }
            if let Some(verdict) = ledger.verdict.take() {
                return Some(verdict);
            }
            self.bell.wait(&mut ledger);
        }
    }
    /// Blocks while frozen. Returns early on reset or terminate.
    pub(crate) fn await_thaw(&self) {
        let mut ledger = self.ledger.lock();
        loop {
            if ledger.terminated {
                return;
            }
            match ledger.frozen_until {
                Some(until) if Instant::now() < until => {
                    self.bell.wait_until(&mut ledger, until);
                }
                _ => return,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::*;

    fn table() -> Table {
        let table = Table::new(crate::TABLE_SIZE);
        {
            let mut board = table.lock();
            (0..crate::TABLE_SIZE).for_each(|s| board.place_card(Card::from(s as u8), s));
        }
        table
    }

    fn consistent(table: &Table, seat: &Seat) -> bool {
        let board = table.lock();
        let tokens = seat.tokens();
        (0..board.size()).all(|s| board.has_token(seat.id(), s) == tokens.contains(&s))
    }

    #[test]
    fn third_token_submits_claim() {
        let table = table();
        let queue = ClaimQueue::default();
        let seat = Seat::new(0);
        assert_eq!(seat.toggle(&table, &queue, 0), Press::Placed);
        assert_eq!(seat.toggle(&table, &queue, 1), Press::Placed);
        assert!(queue.is_empty());
        let Press::Claimed(claim) = seat.toggle(&table, &queue, 2) else {
            panic!("third token should claim");
        };
        assert_eq!(queue.poll(), Some(claim));
        assert!(seat.is_pending());
        assert!(consistent(&table, &seat));
    }

    #[test]
    fn never_more_than_three_tokens() {
        let table = table();
        let queue = ClaimQueue::default();
        let seat = Seat::new(1);
        for slot in 0..3 {
            seat.toggle(&table, &queue, slot);
        }
        {
            let board = table.lock();
            seat.hold(&board).penalize(Duration::ZERO);
        }
        assert_eq!(seat.toggle(&table, &queue, 5), Press::Rejected);
        assert_eq!(seat.tokens().len(), TOKENS);
        assert_eq!(seat.toggle(&table, &queue, 1), Press::Removed);
        assert_eq!(seat.tokens(), vec![0, 2]);
        assert!(consistent(&table, &seat));
    }

    #[test]
    fn pending_and_frozen_seats_ignore_input() {
        let table = table();
        let queue = ClaimQueue::default();
        let seat = Seat::new(0);
        for slot in 0..3 {
            seat.toggle(&table, &queue, slot);
        }
        assert_eq!(seat.toggle(&table, &queue, 0), Press::Ignored);
        assert!(!seat.press(4));
        {
            let board = table.lock();
            seat.hold(&board).penalize(Duration::from_secs(60));
        }
        assert_eq!(seat.toggle(&table, &queue, 0), Press::Ignored);
        assert!(!seat.press(4));
        assert!(seat.thaws_in() > Duration::ZERO);
    }

    #[test]
    fn empty_slot_is_rejected() {
        let table = Table::new(4);
        let queue = ClaimQueue::default();
        let seat = Seat::new(0);
        assert_eq!(seat.toggle(&table, &queue, 2), Press::Rejected);
        assert_eq!(seat.toggle(&table, &queue, 99), Press::Rejected);
        assert!(seat.tokens().is_empty());
    }

    #[test]
    fn press_queue_holds_three_keys() {
        let seat = Seat::new(0);
        assert!(seat.press(0));
        assert!(seat.press(1));
        assert!(seat.press(2));
        assert!(!seat.press(3));
        assert_eq!(seat.next_key(), Some(0));
    }

    #[test]
    fn eviction_releases_waiting_player() {
        let table = std::sync::Arc::new(table());
        let queue = ClaimQueue::default();
        let seat = std::sync::Arc::new(Seat::new(0));
        for slot in 0..3 {
            seat.toggle(&table, &queue, slot);
        }
        let waiter = {
            let seat = seat.clone();
            std::thread::spawn(move || seat.await_verdict())
        };
        {
            let mut board = table.lock();
            let (_, owners) = board.remove_card(1).unwrap();
            assert!(owners.contains(&0));
            seat.hold(&board).evict(1);
        }
        assert_eq!(waiter.join().unwrap(), Some(Verdict::Discarded));
        assert_eq!(seat.tokens(), vec![0, 2]);
        assert!(!seat.is_pending());
        assert!(consistent(&table, &seat));
    }

    #[test]
    fn terminate_wakes_idle_player() {
        let seat = std::sync::Arc::new(Seat::new(0));
        let waiter = {
            let seat = seat.clone();
            std::thread::spawn(move || seat.next_key())
        };
        std::thread::sleep(Duration::from_millis(10));
        seat.terminate();
        assert_eq!(waiter.join().unwrap(), None);
        assert!(!seat.press(0));
    }

    #[test]
    fn hold_wakes_waiter_once_table_guard_is_shown() {
        let table = std::sync::Arc::new(table());
        let queue = ClaimQueue::default();
        let seat = std::sync::Arc::new(Seat::new(2));
        for slot in 0..3 {
            seat.toggle(&table, &queue, slot);
        }
        let waiter = {
            let seat = seat.clone();
            std::thread::spawn(move || seat.await_verdict())
        };
        let claim = queue.poll().unwrap();
        {
            let guard = table.lock();
            let mut ledger = seat.hold(&guard);
            assert!(ledger.is_live(&claim));
            ledger.abandon(&claim);
        }
        assert_eq!(waiter.join().unwrap(), Some(Verdict::Discarded));
        assert_eq!(seat.tokens(), vec![0, 1, 2]);
    }

    #[test]
    fn reset_cuts_freeze_short() {
        let table = table();
        let seat = std::sync::Arc::new(Seat::new(0));
        {
            let board = table.lock();
            seat.hold(&board).penalize(Duration::from_secs(60));
        }
        let waiter = {
            let seat = seat.clone();
            std::thread::spawn(move || seat.await_thaw())
        };
        std::thread::sleep(Duration::from_millis(10));
        {
            let board = table.lock();
            seat.hold(&board).reset();
        }
        waiter.join().unwrap();
        assert_eq!(seat.thaws_in(), Duration::ZERO);
    }
}
