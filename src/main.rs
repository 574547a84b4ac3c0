//! Brickfall entry point
//!
//! Headless native driver: plays rounds with a simple autopilot standing in
//! for a presentation layer, then prints the session leaderboard.
//!
//! Usage: `brickfall [settings.json] [rounds]`

use std::path::Path;
use std::process::ExitCode;

use brickfall::consts::*;
use brickfall::sim::{GameEvent, GamePhase};
use brickfall::{Game, Key, Settings};

/// Simulated frame length fed to the session (ms)
const FRAME_MS: u32 = 16;
/// Give up on a round after this much simulated time (ms)
const ROUND_TIME_LIMIT_MS: u32 = 10 * 60 * 1000;

/// Steer the paddle under the ball, keep launching and firing
fn autopilot(game: &mut Game) {
    let snapshot = game.snapshot();
    let target = snapshot
        .ball
        .map(|b| b.center_x())
        .unwrap_or(WINDOW_WIDTH / 2.0);
    game.pointer_moved(target);
    game.key_down(Key::Launch);
    if snapshot.mounts.is_empty() {
        game.key_up(Key::Fire);
    } else {
        game.key_down(Key::Fire);
    }
}

fn play_round(game: &mut Game) {
    let mut elapsed = 0;
    while game.phase() == GamePhase::Running && elapsed < ROUND_TIME_LIMIT_MS {
        autopilot(game);
        game.advance(FRAME_MS);
        elapsed += FRAME_MS;

        for event in game.drain_events() {
            match event {
                GameEvent::PowerUp(kind) => log::info!("Power-up collected: {:?}", kind),
                GameEvent::LifeLost { remaining } => log::info!("Ball lost, {} lives left", remaining),
                GameEvent::RoundOver { outcome, score } => {
                    println!("Round over: {:?}, score {}", outcome, score);
                }
                _ => {}
            }
        }
    }

    if game.phase() == GamePhase::Running {
        log::warn!("Round did not finish within {} ms", ROUND_TIME_LIMIT_MS);
    }
}

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Brickfall (headless) starting...");

    let mut args = std::env::args().skip(1);
    let settings = args
        .next()
        .map(|path| Settings::load(Path::new(&path)))
        .unwrap_or_default();
    let rounds: u32 = args.next().and_then(|s| s.parse().ok()).unwrap_or(2);

    let mut game = match Game::from_settings(settings) {
        Ok(game) => game,
        Err(e) => {
            log::error!("Failed to load levels: {}", e);
            return ExitCode::FAILURE;
        }
    };

    game.start();
    for round in 0..rounds {
        if round > 0 && !game.restart() {
            break;
        }
        play_round(&mut game);

        let name = game.settings().player_name.clone();
        match game.submit_score(&name) {
            Some(pos) => println!("{} placed #{} on the leaderboard", name, pos + 1),
            None => println!("{} did not place", name),
        }
    }

    match game.scores().to_json() {
        Ok(json) => println!("{}", json),
        Err(e) => log::error!("Failed to export leaderboard: {}", e),
    }
    ExitCode::SUCCESS
}
