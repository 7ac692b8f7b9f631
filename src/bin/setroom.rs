//! Game Room Binary
//!
//! Runs one game in the terminal. Humans type `<player> <slot>` lines,
//! robots fill the remaining seats. `Q` or Ctrl-C ends the game.

use clap::Parser;
use setroom::gameroom::Room;
use setroom::*;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// JSON config file; missing fields use defaults
    #[arg(short, long)]
    config: Option<std::path::PathBuf>,
    /// Number of human seats
    #[arg(long)]
    humans: Option<usize>,
    /// Number of robot seats
    #[arg(long)]
    robots: Option<usize>,
    /// Round length in ms (0 shows elapsed time, negative disables the timer)
    #[arg(long, allow_hyphen_values = true)]
    turn_timeout: Option<i64>,
    /// Log the legal groupings on the board after each deal
    #[arg(long)]
    hints: bool,
    /// Seed for the deck and robots
    #[arg(long)]
    seed: Option<u64>,
}

impl Args {
    fn config(&self) -> anyhow::Result<Config> {
        let mut config = match self.config {
            Some(ref path) => Config::load(path)?,
            None => Config::default(),
        };
        config.humans = self.humans.unwrap_or(config.humans);
        config.robots = self.robots.unwrap_or(config.robots);
        config.turn_timeout_millis = self.turn_timeout.unwrap_or(config.turn_timeout_millis);
        config.hints |= self.hints;
        config.seed = self.seed.or(config.seed);
        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    log()?;
    let config = Args::parse().config()?;
    let room = Room::new(config)?;
    kys(room.handle());
    brb(room.handle());
    let outcome = tokio::task::spawn_blocking(move || room.run()).await??;
    log::info!("scores {:?}", outcome.scores);
    Ok(())
}
