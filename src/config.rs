use super::*;
use anyhow::Context;
use serde::Deserialize;
use serde::Serialize;
use std::time::Duration;

/// Game parameters consumed by the room, the dealer and the robots.
///
/// Durations are stored as milliseconds so the struct maps one-to-one onto
/// its JSON file form. A negative turn timeout disables the round timer, a
/// zero turn timeout shows elapsed time instead of a countdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub humans: usize,
    pub robots: usize,
    pub table_size: usize,
    pub deck_size: usize,
    pub turn_timeout_millis: i64,
    pub turn_warning_millis: u64,
    pub point_freeze_millis: u64,
    pub penalty_freeze_millis: u64,
    pub tick_millis: u64,
    pub grace_millis: u64,
    pub robot_delay_millis: u64,
    pub hints: bool,
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            humans: 2,
            robots: 2,
            table_size: TABLE_SIZE,
            deck_size: DECK_SIZE,
            turn_timeout_millis: TURN_TIMEOUT_MILLIS,
            turn_warning_millis: TURN_WARNING_MILLIS,
            point_freeze_millis: POINT_FREEZE_MILLIS,
            penalty_freeze_millis: PENALTY_FREEZE_MILLIS,
            tick_millis: DEALER_TICK_MILLIS,
            grace_millis: TURN_GRACE_MILLIS,
            robot_delay_millis: ROBOT_DELAY_MILLIS,
            hints: false,
            seed: None,
        }
    }
}

impl Config {
    /// Reads a JSON config file. Missing fields fall back to defaults.
    pub fn load(path: &std::path::Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        let config = serde_json::from_str::<Self>(&text)
            .with_context(|| format!("parse config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(self.players() > 0, "at least one player is required");
        anyhow::ensure!(
            self.deck_size <= DECK_SIZE,
            "deck size {} exceeds {} distinct cards",
            self.deck_size,
            DECK_SIZE
        );
        anyhow::ensure!(
            self.table_size >= TOKENS,
            "table needs at least {} slots, got {}",
            TOKENS,
            self.table_size
        );
        anyhow::ensure!(self.tick_millis > 0, "dealer tick must be positive");
        Ok(())
    }
    pub fn players(&self) -> usize {
        self.humans + self.robots
    }
    pub fn turn_warning(&self) -> Duration {
        Duration::from_millis(self.turn_warning_millis)
    }
    pub fn point_freeze(&self) -> Duration {
        Duration::from_millis(self.point_freeze_millis)
    }
    pub fn penalty_freeze(&self) -> Duration {
        Duration::from_millis(self.penalty_freeze_millis)
    }
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_millis)
    }
    pub fn grace(&self) -> Duration {
        Duration::from_millis(self.grace_millis)
    }
    pub fn robot_delay(&self) -> Duration {
        Duration::from_millis(self.robot_delay_millis)
    }
}
