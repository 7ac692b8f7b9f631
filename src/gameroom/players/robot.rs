use crate::Slot;
use crate::gameroom::Seat;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::thread::JoinHandle;
use std::time::Duration;

/// CPU keyboard that presses random slots.
/// Feeds the same press queue a human would, so the player thread behind
/// the seat cannot tell the difference.
pub struct Robot {
    seat: Arc<Seat>,
    halt: Arc<AtomicBool>,
    slots: usize,
    delay: Duration,
    rng: SmallRng,
}

impl Robot {
    pub fn new(
        seat: Arc<Seat>,
        halt: Arc<AtomicBool>,
        slots: usize,
        delay: Duration,
        seed: Option<u64>,
    ) -> Self {
        Self {
            seat,
            halt,
            slots,
            delay,
            rng: seed
                .map(SmallRng::seed_from_u64)
                .unwrap_or_else(SmallRng::from_os_rng),
        }
    }
    pub fn spawn(self) -> anyhow::Result<JoinHandle<()>> {
        let name = format!("robot-{}", self.seat.id());
        Ok(std::thread::Builder::new()
            .name(name)
            .spawn(move || self.run())?)
    }
    fn run(mut self) {
        log::debug!("[robot P{}] starting", self.seat.id());
        while !self.halt.load(Ordering::Acquire) {
            let slot = self.choose();
            if self.seat.press(slot) {
                log::trace!("[robot P{}] pressed {}", self.seat.id(), slot);
            }
            std::thread::sleep(self.delay);
        }
        log::debug!("[robot P{}] stopped", self.seat.id());
    }
    fn choose(&mut self) -> Slot {
        self.rng.random_range(0..self.slots)
    }
}
