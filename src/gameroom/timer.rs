use crate::Config;
use std::time::Duration;
use std::time::Instant;

/// How a round is timed, from the sign of the configured turn timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clock {
    /// Round ends when the countdown runs out.
    Countdown(Duration),
    /// Display counts up; round ends when the board has no legal grouping.
    Elapsed,
    /// No display; round ends when the board has no legal grouping.
    Off,
}

impl From<i64> for Clock {
    fn from(millis: i64) -> Self {
        match millis {
            m if m > 0 => Clock::Countdown(Duration::from_millis(m as u64)),
            0 => Clock::Elapsed,
            _ => Clock::Off,
        }
    }
}

/// Configuration for round timing.
#[derive(Debug, Clone, Copy)]
pub struct TimerConfig {
    pub clock: Clock,
    pub warning: Duration,
    pub grace: Duration,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for TimerConfig {
    fn from(config: &Config) -> Self {
        Self {
            clock: Clock::from(config.turn_timeout_millis),
            warning: config.turn_warning(),
            grace: config.grace(),
        }
    }
}

/// Tracks the reshuffle deadline of the current round.
#[derive(Debug)]
pub struct Timer {
    config: TimerConfig,
    started: Instant,
    deadline: Option<Instant>,
}

impl Timer {
    pub fn new(config: TimerConfig) -> Self {
        Self {
            config,
            started: Instant::now(),
            deadline: None,
        }
    }
    pub fn with_defaults() -> Self {
        Self::new(TimerConfig::default())
    }
    /// Restarts the round clock; a scored claim also lands here.
    pub fn reset(&mut self) {
        self.started = Instant::now();
        self.deadline = match self.config.clock {
            Clock::Countdown(turn) => Some(self.started + turn + self.config.grace),
            Clock::Elapsed | Clock::Off => None,
        };
    }
    pub fn clock(&self) -> Clock {
        self.config.clock
    }
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }
    pub fn expired(&self) -> bool {
        self.deadline.map(|d| Instant::now() >= d).unwrap_or(false)
    }
    /// Time left as shown to players, never above the configured turn.
    pub fn remaining(&self) -> Option<Duration> {
        let turn = match self.config.clock {
            Clock::Countdown(turn) => turn,
            Clock::Elapsed | Clock::Off => return None,
        };
        self.deadline
            .map(|d| d.saturating_duration_since(Instant::now()))
            .map(|left| left.min(turn))
    }
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
    pub fn warning(&self) -> bool {
        self.remaining()
            .map(|left| left < self.config.warning)
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn countdown(turn: u64, warning: u64) -> Timer {
        Timer::new(TimerConfig {
            clock: Clock::Countdown(Duration::from_millis(turn)),
            warning: Duration::from_millis(warning),
            grace: Duration::ZERO,
        })
    }

    #[test]
    fn clock_from_timeout_sign() {
        assert_eq!(Clock::from(5), Clock::Countdown(Duration::from_millis(5)));
        assert_eq!(Clock::from(0), Clock::Elapsed);
        assert_eq!(Clock::from(-1), Clock::Off);
    }
    #[test]
    fn timer_starts_cleared() {
        let timer = Timer::with_defaults();
        assert!(timer.deadline().is_none());
        assert!(!timer.expired());
    }
    #[test]
    fn timer_sets_deadline() {
        let mut timer = Timer::with_defaults();
        timer.reset();
        assert!(timer.deadline().is_some());
        assert!(!timer.expired());
    }
    #[test]
    fn remaining_is_capped_at_turn() {
        let mut timer = Timer::new(TimerConfig {
            clock: Clock::Countdown(Duration::from_secs(10)),
            warning: Duration::from_secs(1),
            grace: Duration::from_secs(5),
        });
        timer.reset();
        assert_eq!(timer.remaining(), Some(Duration::from_secs(10)));
        assert!(!timer.warning());
    }
    #[test]
    fn timer_expires_and_warns() {
        let mut timer = countdown(20, 50);
        timer.reset();
        assert!(timer.warning());
        std::thread::sleep(Duration::from_millis(30));
        assert!(timer.expired());
        assert_eq!(timer.remaining(), Some(Duration::ZERO));
    }
    #[test]
    fn elapsed_mode_has_no_deadline() {
        let mut timer = Timer::new(TimerConfig {
            clock: Clock::Elapsed,
            warning: Duration::ZERO,
            grace: Duration::ZERO,
        });
        timer.reset();
        assert!(timer.deadline().is_none());
        assert!(timer.remaining().is_none());
        assert!(!timer.expired());
    }
}
