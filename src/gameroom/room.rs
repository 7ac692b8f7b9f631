use super::*;
use crate::Config;
use crate::PlayerId;
use crate::Slot;
use crate::cards::*;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

/// Wires up one game: the shared table, a seat per player, the claim queue,
/// and the dealer.
///
/// Seats `0..humans` take key presses through a [`Handle`]; the remaining
/// seats are driven by [`Robot`]s. [`Room::run`] blocks until the game ends,
/// either on its own or after [`Handle::terminate`].
pub struct Room {
    config: Config,
    table: Arc<Table>,
    seats: Vec<Arc<Seat>>,
    queue: Arc<ClaimQueue>,
    halt: Arc<AtomicBool>,
    rules: Arc<dyn Rules>,
    screen: Arc<dyn Screen>,
    deck: Option<Deck>,
}

impl Room {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        config.validate()?;
        Ok(Self {
            table: Arc::new(Table::new(config.table_size)),
            seats: (0..config.players()).map(|p| Arc::new(Seat::new(p))).collect(),
            queue: Arc::new(ClaimQueue::default()),
            halt: Arc::new(AtomicBool::new(false)),
            rules: Arc::new(Classic),
            screen: Arc::new(Console),
            deck: None,
            config,
        })
    }
    pub fn with_rules(mut self, rules: Arc<dyn Rules>) -> Self {
        self.rules = rules;
        self
    }
    pub fn with_screen(mut self, screen: Arc<dyn Screen>) -> Self {
        self.screen = screen;
        self
    }
    pub fn with_deck(mut self, deck: Deck) -> Self {
        self.deck = Some(deck);
        self
    }
    pub fn handle(&self) -> Handle {
        Handle {
            humans: self.config.humans,
            halt: self.halt.clone(),
            queue: self.queue.clone(),
            seats: self.seats.clone(),
        }
    }

    pub fn run(self) -> anyhow::Result<Outcome> {
        log::info!(
            "[room] {} humans, {} robots, {} slots",
            self.config.humans,
            self.config.robots,
            self.config.table_size
        );
        let robots = self
            .seats
            .iter()
            .skip(self.config.humans)
            .map(|seat| {
                Robot::new(
                    seat.clone(),
                    self.halt.clone(),
                    self.config.table_size,
                    self.config.robot_delay(),
                    self.config.seed.map(|s| s.wrapping_add(seat.id() as u64 + 1)),
                )
            })
            .map(Robot::spawn)
            .collect::<anyhow::Result<Vec<_>>>()
            .inspect_err(|_| self.halt.store(true, Ordering::Release))?;
        let players = self
            .seats
            .iter()
            .map(|seat| Player::new(seat.clone(), self.table.clone(), self.queue.clone()))
            .collect::<Vec<_>>();
        let mut dealer = Dealer::new(
            self.config.clone(),
            self.table.clone(),
            self.seats.clone(),
            self.queue.clone(),
            self.halt.clone(),
        )
        .with_rules(self.rules.clone())
        .with_screen(self.screen.clone());
        if let Some(deck) = self.deck {
            dealer = dealer.with_deck(deck);
        }
        let outcome = std::thread::Builder::new()
            .name("dealer".to_string())
            .spawn(move || dealer.run(players))
            .map_err(anyhow::Error::from)
            .and_then(|handle| {
                handle
                    .join()
                    .map_err(|_| anyhow::anyhow!("dealer thread panicked"))
            })
            .and_then(|outcome| outcome);
        self.halt.store(true, Ordering::Release);
        self.seats.iter().for_each(|s| s.terminate());
        for handle in robots {
            if handle.join().is_err() {
                log::error!("[room] robot thread panicked");
            }
        }
        outcome
    }
}

/// Outside control of a running room, cheap to clone across threads.
#[derive(Debug, Clone)]
pub struct Handle {
    humans: usize,
    halt: Arc<AtomicBool>,
    queue: Arc<ClaimQueue>,
    seats: Vec<Arc<Seat>>,
}

impl Handle {
    /// Key press from a human seat. False if the seat is unknown, robot
    /// driven, or not accepting input right now.
    pub fn press(&self, player: PlayerId, slot: Slot) -> bool {
        player < self.humans && self.seats.get(player).is_some_and(|s| s.press(slot))
    }
    pub fn scores(&self) -> Vec<crate::Score> {
        self.seats.iter().map(|s| s.score()).collect()
    }
    /// Asks the dealer to wrap up. Winners are still announced.
    pub fn terminate(&self) {
        log::info!("[room] termination requested");
        self.halt.store(true, Ordering::Release);
        self.queue.interrupt();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn quick(humans: usize, robots: usize) -> Config {
        Config {
            humans,
            robots,
            turn_timeout_millis: 40,
            turn_warning_millis: 10,
            point_freeze_millis: 2,
            penalty_freeze_millis: 2,
            tick_millis: 2,
            grace_millis: 0,
            robot_delay_millis: 1,
            seed: Some(7),
            ..Config::default()
        }
    }

    #[test]
    fn invalid_config_is_refused() {
        assert!(Room::new(quick(0, 0)).is_err());
    }

    #[test]
    fn handle_only_accepts_human_seats() {
        let room = Room::new(quick(1, 1)).unwrap();
        let handle = room.handle();
        assert!(handle.press(0, 3));
        assert!(!handle.press(1, 3));
        assert!(!handle.press(7, 3));
    }

    #[test]
    fn terminate_ends_a_running_game() {
        let room = Room::new(quick(1, 2)).unwrap();
        let handle = room.handle();
        let game = std::thread::spawn(move || room.run());
        std::thread::sleep(Duration::from_millis(200));
        handle.terminate();
        let outcome = game.join().unwrap().unwrap();
        assert_eq!(outcome.scores.len(), 3);
        assert!(!outcome.winners.is_empty());
        assert_eq!(outcome.scores, handle.scores());
        assert!(!handle.press(0, 0));
    }

    #[test]
    fn robot_clears_a_single_grouping() {
        let config = Config {
            table_size: 3,
            turn_timeout_millis: 0,
            ..quick(0, 1)
        };
        let deck = Deck::with_cards(
            vec![
                Card::from([0, 0, 0, 0]),
                Card::from([1, 0, 0, 0]),
                Card::from([2, 0, 0, 0]),
            ],
            Some(3),
        );
        let outcome = Room::new(config).unwrap().with_deck(deck).run().unwrap();
        assert_eq!(outcome.scores, vec![1]);
        assert_eq!(outcome.winners, vec![0]);
    }

    /// Counts how often the countdown jumps back to a full turn.
    #[derive(Debug)]
    struct Rounds {
        turn: Duration,
        shown: parking_lot::Mutex<Vec<Duration>>,
        winners: parking_lot::Mutex<Vec<PlayerId>>,
    }

    impl Rounds {
        fn new(turn: Duration) -> Self {
            Self {
                turn,
                shown: parking_lot::Mutex::new(Vec::new()),
                winners: parking_lot::Mutex::new(Vec::new()),
            }
        }
        fn resets(&self) -> usize {
            let shown = self.shown.lock();
            shown
                .iter()
                .enumerate()
                .filter(|(i, d)| **d == self.turn && (*i == 0 || shown[i - 1] < self.turn))
                .count()
        }
    }

    impl Screen for Rounds {
        fn countdown(&self, remaining: Duration, _: bool) {
            self.shown.lock().push(remaining);
        }
        fn freeze(&self, _: PlayerId, _: Duration) {}
        fn score(&self, _: PlayerId, _: crate::Score) {}
        fn winners(&self, players: &[PlayerId]) {
            self.winners.lock().extend_from_slice(players);
        }
    }

    #[test]
    fn expired_countdown_starts_a_new_round() {
        let config = Config {
            turn_timeout_millis: 10,
            grace_millis: 5,
            ..quick(1, 0)
        };
        let rounds = Arc::new(Rounds::new(Duration::from_millis(10)));
        let room = Room::new(config)
            .unwrap()
            .with_rules(Arc::new(Classic))
            .with_screen(rounds.clone());
        let handle = room.handle();
        let game = std::thread::spawn(move || room.run());
        let start = std::time::Instant::now();
        while rounds.resets() < 3 && start.elapsed() < Duration::from_secs(5) {
            std::thread::sleep(Duration::from_millis(2));
        }
        let resets = rounds.resets();
        handle.terminate();
        let outcome = game.join().unwrap().unwrap();
        assert!(resets >= 3, "countdown restarted only {} times", resets);
        assert!(rounds.shown.lock().iter().any(|d| *d < Duration::from_millis(10)));
        assert_eq!(outcome.scores, vec![0]);
        assert_eq!(*rounds.winners.lock(), vec![0]);
    }
}
