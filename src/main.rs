//! Headless TetrECS runner (default binary).
//!
//! Plays a single-player game with the greedy autoplayer through the async
//! runtime, the same way a front end would drive it.
//!
//! ```text
//! tetrecs [--turns N] [--seed S] [--json]
//! ```
//!
//! Board size, lives and seed also come from `TETRECS_*` environment
//! variables; flags win over the environment. Set `RUST_LOG=debug` for a
//! per-turn log.

use std::time::Duration;

use anyhow::{bail, Context, Result};

use tetrecs::adapter::GameHandle;
use tetrecs::autoplay::{choose_move, Move};
use tetrecs::engine::{GameConfig, GameSnapshot};
use tetrecs::types::TIMER_TICK_MS;

const DEFAULT_TURNS: u32 = 100;

#[derive(Debug)]
struct Options {
    turns: u32,
    seed: Option<u32>,
    json: bool,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Options> {
    let mut opts = Options {
        turns: DEFAULT_TURNS,
        seed: None,
        json: false,
    };

    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--turns" => {
                let value = args.next().context("--turns needs a value")?;
                opts.turns = value
                    .parse()
                    .with_context(|| format!("invalid turn count {:?}", value))?;
            }
            "--seed" => {
                let value = args.next().context("--seed needs a value")?;
                opts.seed = Some(
                    value
                        .parse()
                        .with_context(|| format!("invalid seed {:?}", value))?,
                );
            }
            "--json" => opts.json = true,
            other => bail!("unknown argument {:?}", other),
        }
    }
    Ok(opts)
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let opts = parse_args(std::env::args().skip(1))?;
    let mut config = GameConfig::from_env();
    if let Some(seed) = opts.seed {
        config = config.with_seed(seed);
    }
    log::info!("config: {:?}", config);

    let mut handle = GameHandle::spawn_single_player(config);

    for turn in 0..opts.turns {
        // The game task ends on its own at game over; a failed request means it is gone.
        let snapshot = match handle.snapshot().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                log::debug!("stopping after {} turns: {:#}", turn, e);
                break;
            }
        };
        drain_events(&mut handle, opts.json)?;
        if !snapshot.playable() {
            break;
        }

        match choose_move(&snapshot) {
            Some(mv) => {
                log::debug!("turn {}: {:?}", turn, mv);
                if let Err(e) = play(&handle, mv).await {
                    log::debug!("stopping after {} turns: {:#}", turn, e);
                    break;
                }
            }
            None => {
                // Nothing fits; let the turn run out.
                let wait = snapshot.time_left_ms + TIMER_TICK_MS;
                log::info!("turn {}: no legal move, waiting {} ms", turn, wait);
                tokio::time::sleep(Duration::from_millis(wait as u64)).await;
            }
        }
    }

    drain_events(&mut handle, opts.json)?;
    let last = handle.shutdown().await?;
    report(&last, opts.json)
}

async fn play(handle: &GameHandle, mv: Move) -> Result<()> {
    if mv.swap {
        handle.swap().await?;
    }
    if mv.turns != 0 {
        handle.rotate(mv.turns).await?;
    }
    handle.place(mv.x, mv.y).await
}

fn drain_events(handle: &mut GameHandle, json: bool) -> Result<()> {
    while let Some(event) = handle.try_event() {
        if json {
            println!("{}", serde_json::to_string(&event)?);
        }
    }
    Ok(())
}

fn report(snapshot: &GameSnapshot, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(snapshot)?);
    } else {
        println!(
            "score {} level {} lives {} ({:?})",
            snapshot.score, snapshot.level, snapshot.lives, snapshot.phase
        );
    }
    Ok(())
}
