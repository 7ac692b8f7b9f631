use super::claim::*;
use super::seat::*;
use super::table::Table;
use std::sync::Arc;
use std::thread::JoinHandle;

/// Player actor: one OS thread per seat.
///
/// - Takes key presses queued on its [`Seat`] and toggles tokens
/// - On the third token the claim is queued and the thread blocks on the seat
///   until the dealer delivers a [`Verdict`]
/// - After a point or a penalty it sleeps out the freeze
/// - Exits at the next check after [`Seat::terminate`]
pub struct Player {
    seat: Arc<Seat>,
    table: Arc<Table>,
    queue: Arc<ClaimQueue>,
}

impl Player {
    pub fn new(seat: Arc<Seat>, table: Arc<Table>, queue: Arc<ClaimQueue>) -> Self {
        Self { seat, table, queue }
    }
    pub fn spawn(self) -> anyhow::Result<JoinHandle<()>> {
        let name = format!("player-{}", self.seat.id());
        Ok(std::thread::Builder::new()
            .name(name)
            .spawn(move || self.run())?)
    }
    fn run(self) {
        log::debug!("[player P{}] starting", self.seat.id());
        while let Some(slot) = self.seat.next_key() {
            match self.seat.toggle(&self.table, &self.queue, slot) {
                Press::Claimed(claim) => self.settle(claim),
                press => log::trace!("[player P{}] slot {} {:?}", self.seat.id(), slot, press),
            }
        }
        log::debug!("[player P{}] terminated", self.seat.id());
    }
    fn settle(&self, claim: Claim) {
        log::debug!("[player P{}] claim #{} queued", claim.player, claim.ticket);
        match self.seat.await_verdict() {
            Some(verdict @ (Verdict::Point | Verdict::Penalty)) => {
                log::debug!("[player P{}] claim #{} {}", claim.player, claim.ticket, verdict);
                self.seat.await_thaw();
            }
            Some(Verdict::Discarded) => {
                log::debug!("[player P{}] claim #{} discarded", claim.player, claim.ticket);
            }
            None => {}
        }
    }
}
