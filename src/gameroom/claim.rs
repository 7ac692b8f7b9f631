use crate::PlayerId;
use crossbeam_channel::Receiver;
use crossbeam_channel::RecvTimeoutError;
use crossbeam_channel::Sender;
use std::time::Duration;

/// A player's request to have its current three tokens verified.
///
/// The claim carries no slots: the dealer reads the player's token set at
/// processing time. The ticket identifies one submission so the dealer can
/// tell a live claim from a superseded queue entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Claim {
    pub player: PlayerId,
    pub ticket: u64,
}

/// Dealer's answer to a claim, delivered to the waiting player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Legal grouping: one point, cards removed, point freeze.
    Point,
    /// Illegal grouping: penalty freeze, tokens stay where they are.
    Penalty,
    /// Claim no longer matched the board (tokens evicted or round reset).
    Discarded,
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Verdict::Point => write!(f, "point"),
            Verdict::Penalty => write!(f, "penalty"),
            Verdict::Discarded => write!(f, "discarded"),
        }
    }
}

/// Why the dealer's bounded wait returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wake {
    Claim(Claim),
    Interrupt,
    Tick,
}

#[derive(Debug)]
enum Notice {
    Claim(Claim),
    Interrupt,
}

/// FIFO of pending claims, fed by players and drained by the dealer.
///
/// Both channel endpoints stay together so the queue can never disconnect.
/// Submitting never blocks; the dealer waits at most one tick.
#[derive(Debug)]
pub struct ClaimQueue {
    tx: Sender<Notice>,
    rx: Receiver<Notice>,
}

impl Default for ClaimQueue {
    fn default() -> Self {
        let (tx, rx) = crossbeam_channel::unbounded();
        Self { tx, rx }
    }
}

impl ClaimQueue {
    pub fn submit(&self, claim: Claim) {
        let _ = self.tx.send(Notice::Claim(claim));
    }
    /// Cuts the dealer's current wait short.
    pub fn interrupt(&self) {
        let _ = self.tx.send(Notice::Interrupt);
    }
    /// Waits up to `timeout` for the next claim or interrupt.
    pub fn wait(&self, timeout: Duration) -> Wake {
        match self.rx.recv_timeout(timeout) {
            Ok(Notice::Claim(claim)) => Wake::Claim(claim),
            Ok(Notice::Interrupt) => Wake::Interrupt,
            Err(RecvTimeoutError::Timeout) => Wake::Tick,
            Err(RecvTimeoutError::Disconnected) => Wake::Interrupt,
        }
    }
    /// Next claim without waiting, skipping interrupts.
    pub fn poll(&self) -> Option<Claim> {
        self.rx.try_iter().find_map(|notice| match notice {
            Notice::Claim(claim) => Some(claim),
            Notice::Interrupt => None,
        })
    }
    /// Drops everything queued. Returns the number of claims discarded.
    pub fn clear(&self) -> usize {
        self.rx
            .try_iter()
            .filter(|notice| matches!(notice, Notice::Claim(_)))
            .count()
    }
    pub fn len(&self) -> usize {
        self.rx.len()
    }
    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}
