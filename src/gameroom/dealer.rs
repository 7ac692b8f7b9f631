use super::claim::*;
use super::player::Player;
use super::screen::*;
use super::seat::Seat;
use super::table::Table;
use super::timer::*;
use crate::Config;
use crate::PlayerId;
use crate::Score;
use crate::cards::*;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::thread::JoinHandle;

/// Where the dealer is in its game loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Placing,
    Running,
    Removing,
    Announcing,
    Terminated,
}

/// Final standings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub scores: Vec<Score>,
    pub winners: Vec<PlayerId>,
}

/// The single verifier and mutator of the board.
///
/// Runs the game as a loop of rounds:
/// - Placing: fill empty slots from the shuffled deck
/// - Running: every tick refresh the display, serve at most one claim,
///   top up the board, until the round clock says stop
/// - Removing: release every player, clear claims, return all cards, shuffle
///
/// When no legal grouping is left in deck and board together, or a halt is
/// requested, it announces the winners and stops and joins every player.
pub struct Dealer {
    config: Config,
    table: Arc<Table>,
    seats: Vec<Arc<Seat>>,
    queue: Arc<ClaimQueue>,
    rules: Arc<dyn Rules>,
    screen: Arc<dyn Screen>,
    deck: Deck,
    discard: Vec<Card>,
    timer: Timer,
    halt: Arc<AtomicBool>,
    phase: Phase,
}

impl Dealer {
    pub fn new(
        config: Config,
        table: Arc<Table>,
        seats: Vec<Arc<Seat>>,
        queue: Arc<ClaimQueue>,
        halt: Arc<AtomicBool>,
    ) -> Self {
        Self {
            rules: Arc::new(Classic),
            screen: Arc::new(Console),
            deck: Deck::new(config.deck_size, config.seed),
            discard: Vec::new(),
            timer: Timer::new(TimerConfig::from(&config)),
            phase: Phase::Placing,
            config,
            table,
            seats,
            queue,
            halt,
        }
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
        self.deck = deck;
        self
    }

    /// Dealer thread body. Spawns the players, plays until the end
    /// condition or a halt, then stops and joins every player.
    pub fn run(mut self, players: Vec<Player>) -> anyhow::Result<Outcome> {
        log::info!("[dealer] starting with {} players", players.len());
        let handles = match players
            .into_iter()
            .map(Player::spawn)
            .collect::<anyhow::Result<Vec<_>>>()
        {
            Ok(handles) => handles,
            Err(e) => {
                self.seats.iter().for_each(|s| s.terminate());
                return Err(e);
            }
        };
        while !self.should_finish() {
            self.enter(Phase::Placing);
            self.place_cards();
            self.show_hints();
            self.enter(Phase::Running);
            self.timer_loop();
            self.enter(Phase::Removing);
            self.remove_all_cards();
        }
        self.enter(Phase::Announcing);
        let outcome = self.announce_winners();
        self.enter(Phase::Terminated);
        self.terminate(handles);
        Ok(outcome)
    }
}

impl Dealer {
    fn timer_loop(&mut self) {
        self.timer.reset();
        self.refresh();
        while !self.halted() && !self.round_over() {
            let wake = self.queue.wait(self.config.tick());
            self.refresh();
            let scored = match wake {
                Wake::Claim(claim) => self.process(claim) == Some(Verdict::Point),
                Wake::Interrupt | Wake::Tick => false,
            };
            self.place_cards();
            if scored && self.exhausted() {
                log::info!("[dealer] no legal grouping left, ending round early");
                break;
            }
        }
    }

    /// Verifies one claim under the table lock and the claimant's seat lock.
    /// Either all three cards leave the board and a point is awarded, or
    /// nothing on the board changes.
    fn process(&mut self, claim: Claim) -> Option<Verdict> {
        let Some(seat) = self.seats.get(claim.player).cloned() else {
            log::warn!("[dealer] claim from unknown player P{}", claim.player);
            return None;
        };
        let (verdict, score) = {
            let mut board = self.table.lock();
            let mut ledger = seat.hold(&board);
            if !ledger.is_live(&claim) {
                log::debug!("[dealer] P{} claim #{} is stale", claim.player, claim.ticket);
                ledger.abandon(&claim);
                return None;
            }
            let slots = ledger.slots()?;
            let [Some(a), Some(b), Some(c)] = slots.map(|s| board.card(s)) else {
                log::debug!("[dealer] P{} claim #{} points at an empty slot", claim.player, claim.ticket);
                ledger.abandon(&claim);
                return None;
            };
            if self.rules.is_set([a, b, c]) {
                ledger.award(self.config.point_freeze());
                let score = ledger.score();
                drop(ledger);
                for slot in slots {
                    if let Some((card, owners)) = board.remove_card(slot) {
                        self.discard.push(card);
                        owners
                            .into_iter()
                            .filter(|p| *p != claim.player)
                            .filter_map(|p| self.seats.get(p))
                            .for_each(|other| other.hold(&board).evict(slot));
                    }
                }
                self.timer.reset();
                log::info!("[dealer] P{} scores with {} {} {} at {:?}", claim.player, a, b, c, slots);
                (Verdict::Point, score)
            } else {
                ledger.penalize(self.config.penalty_freeze());
                log::info!("[dealer] P{} penalized for {} {} {} at {:?}", claim.player, a, b, c, slots);
                (Verdict::Penalty, ledger.score())
            }
        };
        if verdict == Verdict::Point {
            self.screen.score(claim.player, score);
        }
        self.refresh();
        Some(verdict)
    }

    /// Fills every empty slot it can from a freshly shuffled deck.
    fn place_cards(&mut self) -> usize {
        let mut board = self.table.lock();
        let empties = board.empties();
        if empties.is_empty() || self.deck.is_empty() {
            return 0;
        }
        self.deck.shuffle();
        let mut placed = 0;
        for slot in empties {
            let Some(card) = self.deck.draw() else {
                break;
            };
            board.place_card(card, slot);
            placed += 1;
        }
        log::debug!("[dealer] placed {} cards, {} left in deck", placed, self.deck.len());
        placed
    }

    /// Round reset: wakes and clears every seat, drops queued claims,
    /// returns every board card to the deck and shuffles.
    fn remove_all_cards(&mut self) {
        let mut board = self.table.lock();
        self.seats.iter().for_each(|s| s.hold(&board).reset());
        let dropped = self.queue.clear();
        for slot in 0..board.size() {
            if let Some((card, _)) = board.remove_card(slot) {
                self.deck.put(card);
            }
        }
        self.deck.shuffle();
        log::debug!("[dealer] reshuffled {} cards, dropped {} claims", self.deck.len(), dropped);
    }

    fn announce_winners(&self) -> Outcome {
        let scores = self.seats.iter().map(|s| s.score()).collect::<Vec<_>>();
        let best = scores.iter().copied().max().unwrap_or_default();
        let winners = self
            .seats
            .iter()
            .zip(&scores)
            .filter(|(_, score)| **score == best)
            .map(|(seat, _)| seat.id())
            .collect::<Vec<_>>();
        log::info!("[dealer] final scores {:?}, winners {:?}", scores, winners);
        self.screen.winners(&winners);
        Outcome { scores, winners }
    }

    /// Stops every player (last seat first) and waits for each thread.
    fn terminate(&mut self, handles: Vec<JoinHandle<()>>) {
        self.halt.store(true, Ordering::Release);
        self.seats.iter().rev().for_each(|s| s.terminate());
        for (i, handle) in handles.into_iter().enumerate().rev() {
            if handle.join().is_err() {
                log::error!("[dealer] player thread {} panicked", i);
            }
        }
        log::info!("[dealer] all players stopped");
    }
}

impl Dealer {
    fn enter(&mut self, phase: Phase) {
        log::debug!("[dealer] {:?} -> {:?}", self.phase, phase);
        self.phase = phase;
    }
    fn halted(&self) -> bool {
        self.halt.load(Ordering::Acquire)
    }
    fn should_finish(&self) -> bool {
        self.halted() || self.exhausted()
    }
    /// No legal grouping anywhere in deck and board together.
    fn exhausted(&self) -> bool {
        let board = self.table.lock();
        let pool = self
            .deck
            .cards()
            .iter()
            .copied()
            .chain(board.cards())
            .collect::<Vec<_>>();
        self.rules.find(&pool, 1).is_empty()
    }
    fn round_over(&self) -> bool {
        match self.timer.clock() {
            Clock::Countdown(_) => self.timer.expired(),
            Clock::Elapsed | Clock::Off => self.rules.find(&self.table.lock().cards(), 1).is_empty(),
        }
    }
    fn refresh(&self) {
        match self.timer.clock() {
            Clock::Countdown(_) => self.screen.countdown(
                self.timer.remaining().unwrap_or_default(),
                self.timer.warning(),
            ),
            Clock::Elapsed => self.screen.elapsed(self.timer.elapsed()),
            Clock::Off => {}
        }
        self.seats
            .iter()
            .for_each(|s| self.screen.freeze(s.id(), s.thaws_in()));
    }
    fn show_hints(&self) {
        if self.config.hints {
            self.table
                .hints(self.rules.as_ref())
                .iter()
                .for_each(|h| log::info!("[dealer] hint: slots {:?}", h));
        }
    }
}
