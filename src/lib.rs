//! Real-time card matching game run by one dealer thread and many player threads.
//!
//! Players race to mark three slots of a shared board whose cards form a
//! legal grouping. Each completed marking is a claim; the dealer verifies
//! claims one at a time, mutates the board, and drives a periodic reshuffle.
//!
//! ## Modules
//!
//! - [`cards`]: Card encoding, the deck, and the grouping rules
//! - [`gameroom`]: Board, seats, claim queue, and the dealer/player actors
//! - [`config`]: Game parameters
pub mod cards;
pub mod config;
pub mod gameroom;

pub use config::Config;

// ============================================================================
// TYPE ALIASES
// ============================================================================
/// Position on the board that holds at most one card.
pub type Slot = usize;
/// Seat index of a player (humans first, then robots).
pub type PlayerId = usize;
/// Points accumulated by a player over the whole game.
pub type Score = u32;

// ============================================================================
// GAME PARAMETERS
// ============================================================================
/// Tokens per claim. A claim is submitted exactly when a player holds this many.
pub const TOKENS: usize = 3;
/// Attributes per card (count, color, shade, shape).
pub const FEATURES: usize = 4;
/// Distinct values per attribute.
pub const VALUES: usize = 3;
/// Size of a full deck, one card per attribute combination.
pub const DECK_SIZE: usize = 81;
/// Slots on a standard board.
pub const TABLE_SIZE: usize = 12;

// ============================================================================
// TIMING DEFAULTS (milliseconds)
// ============================================================================
/// Length of a round before the dealer reshuffles.
pub const TURN_TIMEOUT_MILLIS: i64 = 60_000;
/// Remaining time below which the countdown is shown as a warning.
pub const TURN_WARNING_MILLIS: u64 = 5_000;
/// Freeze applied after a scored claim.
pub const POINT_FREEZE_MILLIS: u64 = 1_000;
/// Freeze applied after a rejected claim.
pub const PENALTY_FREEZE_MILLIS: u64 = 3_000;
/// Dealer poll interval between display refreshes.
pub const DEALER_TICK_MILLIS: u64 = 50;
/// Slack added to each round deadline to absorb scheduling jitter.
pub const TURN_GRACE_MILLIS: u64 = 500;
/// Interval between robot key presses.
pub const ROBOT_DELAY_MILLIS: u64 = 100;

// ============================================================================
// RUNTIME UTILITIES
// ============================================================================
/// Initialize dual logging (terminal + file) with timestamped log files.
/// Creates `logs/` directory and writes DEBUG level to file, INFO to terminal.
#[cfg(feature = "cli")]
pub fn log() -> anyhow::Result<()> {
    use anyhow::Context;
    std::fs::create_dir_all("logs").context("create logs directory")?;
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    let time = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .context("time moves slow")?
        .as_secs();
    let file = simplelog::WriteLogger::new(
        log::LevelFilter::Debug,
        config.clone(),
        std::fs::File::create(format!("logs/{}.log", time)).context("create log file")?,
    );
    let term = simplelog::TermLogger::new(
        log::LevelFilter::Info,
        config.clone(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );
    simplelog::CombinedLogger::init(vec![term, file]).context("initialize logger")
}

/// Ctrl-C asks the dealer to finish and announce winners.
/// A second Ctrl-C exits immediately.
#[cfg(feature = "cli")]
pub fn kys(handle: gameroom::Handle) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            println!();
            log::warn!("interrupt received, finishing game");
            handle.terminate();
        }
        if tokio::signal::ctrl_c().await.is_ok() {
            log::warn!("violent interrupt received, exiting immediately");
            std::process::exit(0);
        }
    });
}

/// Reads human key presses from stdin, one `<player> <slot>` pair per line.
/// A line reading `Q` ends the game.
#[cfg(feature = "cli")]
pub fn brb(handle: gameroom::Handle) {
    std::thread::spawn(move || {
        let ref mut buffer = String::new();
        loop {
            buffer.clear();
            match std::io::stdin().read_line(buffer) {
                Ok(0) | Err(_) => break,
                Ok(_) if buffer.trim().eq_ignore_ascii_case("q") => {
                    log::warn!("graceful interrupt requested");
                    handle.terminate();
                    break;
                }
                Ok(_) => match parse_press(buffer) {
                    Some((player, slot)) if handle.press(player, slot) => {}
                    Some((player, slot)) => log::debug!("press P{} {} dropped", player, slot),
                    None => log::warn!("expected `<player> <slot>`, got {:?}", buffer.trim()),
                },
            }
        }
    });
}

/// Parses a `<player> <slot>` line.
#[cfg(feature = "cli")]
fn parse_press(line: &str) -> Option<(PlayerId, Slot)> {
    let mut words = line.split_whitespace();
    let player = words.next()?.parse().ok()?;
    let slot = words.next()?.parse().ok()?;
    words.next().is_none().then_some((player, slot))
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;

    #[test]
    fn parses_press_lines() {
        assert_eq!(parse_press("1 7\n"), Some((1, 7)));
        assert_eq!(parse_press("  0   11 "), Some((0, 11)));
        assert_eq!(parse_press("1"), None);
        assert_eq!(parse_press("1 2 3"), None);
        assert_eq!(parse_press("a b"), None);
    }
}
