use crate::PlayerId;
use crate::Score;
use std::time::Duration;

/// One-way display sink for the dealer.
///
/// Calls are fire-and-forget and made outside the table lock. Nothing the
/// screen does feeds back into the game.
pub trait Screen: Send + Sync {
    fn countdown(&self, remaining: Duration, warning: bool);
    fn elapsed(&self, _elapsed: Duration) {}
    fn freeze(&self, player: PlayerId, remaining: Duration);
    fn score(&self, player: PlayerId, score: Score);
    fn winners(&self, players: &[PlayerId]);
}

/// Screen that writes to the log. Countdown and freeze refreshes fire every
/// dealer tick, so they only show up at trace level.
#[derive(Debug, Default)]
pub struct Console;

impl Screen for Console {
    fn countdown(&self, remaining: Duration, warning: bool) {
        match warning {
            true => log::trace!("[screen] countdown {:.2}s (hurry)", remaining.as_secs_f32()),
            false => log::trace!("[screen] countdown {}s", remaining.as_secs()),
        }
    }
    fn elapsed(&self, elapsed: Duration) {
        log::trace!("[screen] elapsed {}s", elapsed.as_secs());
    }
    fn freeze(&self, player: PlayerId, remaining: Duration) {
        if !remaining.is_zero() {
            log::trace!("[screen] P{} frozen {}ms", player, remaining.as_millis());
        }
    }
    fn score(&self, player: PlayerId, score: Score) {
        log::info!("[screen] P{} score {}", player, score);
    }
    fn winners(&self, players: &[PlayerId]) {
        let names = players
            .iter()
            .map(|p| format!("P{}", p))
            .collect::<Vec<_>>()
            .join(", ");
        match players.len() {
            1 => log::info!("[screen] winner: {}", names),
            _ => log::info!("[screen] it's a draw: {}", names),
        }
    }
}
