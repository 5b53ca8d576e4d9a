//! Throneworks - replay runner
//!
//! Plays a recorded command sequence against the rules engine and prints the
//! final table as every player sees it.
//!
//! ## Usage
//!
//! ```text
//! throneworks [OPTIONS] <replay.json>
//!
//! Options:
//!   --viewer <index>   Only print the view of this seat
//!   --strict           Stop at the first rejected command
//!   --compact          Print single-line JSON
//! ```
//!
//! A replay file looks like:
//!
//! ```json
//! {
//!   "config": { "seed": 7 },
//!   "seats": [
//!     { "name": "Alice", "deck": ["steadfast-squire", "tide-of-war"] },
//!     { "name": "Bob", "deck": ["grey-maester", "a-feast-for-crows"] }
//!   ],
//!   "commands": [
//!     { "player": 0, "command": { "command": "keep" } }
//!   ]
//! }
//! ```
//!
//! Set `RUST_LOG=debug` to see why commands were rejected.

use std::env;
use std::fs;
use std::io::BufReader;
use std::process;

use log::{info, warn};
use serde::Deserialize;
use throneworks::{
    CardRegistry, Command, Game, GameConfig, GameView, PlayerId, Seat, execute, turn, view_for,
};

#[derive(Debug, Deserialize)]
struct ReplayFile {
    #[serde(default = "default_name")]
    name: String,
    #[serde(default)]
    config: GameConfig,
    seats: Vec<Seat>,
    #[serde(default)]
    commands: Vec<ReplayStep>,
}

#[derive(Debug, Deserialize)]
struct ReplayStep {
    player: PlayerId,
    command: Command,
}

fn default_name() -> String {
    "Replay".to_string()
}

struct RunArgs {
    replay_file: Option<String>,
    viewer: Option<u8>,
    strict: bool,
    compact: bool,
}

fn print_usage() {
    println!("Usage: throneworks [OPTIONS] <replay.json>");
    println!();
    println!("Options:");
    println!("  --viewer <index>   Only print the view of this seat");
    println!("  --strict           Stop at the first rejected command");
    println!("  --compact          Print single-line JSON");
    println!("  --help             Show this message");
}

/// Parse command-line arguments.
fn parse_args() -> RunArgs {
    let args: Vec<String> = env::args().collect();
    let mut run = RunArgs {
        replay_file: None,
        viewer: None,
        strict: false,
        compact: false,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--viewer" => {
                match args.get(i + 1).and_then(|v| v.parse().ok()) {
                    Some(index) => run.viewer = Some(index),
                    None => eprintln!("Error: --viewer requires a seat index"),
                }
                i += 2;
            }
            "--strict" => {
                run.strict = true;
                i += 1;
            }
            "--compact" => {
                run.compact = true;
                i += 1;
            }
            "--help" | "-h" => {
                print_usage();
                process::exit(0);
            }
            other if other.starts_with("--") => {
                eprintln!("Unknown option: {}", other);
                i += 1;
            }
            path => {
                run.replay_file = Some(path.to_string());
                i += 1;
            }
        }
    }
    run
}

fn load_replay(path: &str) -> Result<ReplayFile, String> {
    let file = fs::File::open(path).map_err(|e| format!("cannot open {}: {}", path, e))?;
    serde_json::from_reader(BufReader::new(file)).map_err(|e| format!("cannot parse {}: {}", path, e))
}

fn run(args: &RunArgs) -> Result<Vec<GameView>, String> {
    let path = args
        .replay_file
        .as_deref()
        .ok_or_else(|| "no replay file given (see --help)".to_string())?;
    let replay = load_replay(path)?;

    let registry = CardRegistry::with_demo_cards();
    let mut game = Game::new("replay", replay.name, replay.seats, replay.config, &registry)
        .map_err(|e| e.to_string())?;
    turn::initialise(&mut game);

    let mut rejected = 0;
    for (index, step) in replay.commands.into_iter().enumerate() {
        let name = step.command.name();
        if let Err(e) = execute(&mut game, step.player, step.command) {
            if args.strict {
                return Err(format!(
                    "command {} ({}) from {} rejected: {}",
                    index, name, step.player, e
                ));
            }
            warn!("command {} ({}) from {} rejected: {}", index, name, step.player, e);
            rejected += 1;
        }
    }
    info!(
        "replay finished in round {} with {} rejected command(s)",
        game.round, rejected
    );

    let viewers: Vec<PlayerId> = match args.viewer {
        Some(index) => vec![PlayerId::from_index(index)],
        None => game.player_ids(),
    };
    if let Some(missing) = viewers.iter().find(|id| game.player(**id).is_none()) {
        return Err(format!("no seat {}", missing.index()));
    }
    Ok(viewers.into_iter().map(|id| view_for(&game, id)).collect())
}

fn main() {
    env_logger::init();
    let args = parse_args();

    let views = match run(&args) {
        Ok(views) => views,
        Err(err) => {
            eprintln!("{err}");
            process::exit(1);
        }
    };

    let output = if args.compact {
        serde_json::to_string(&views)
    } else {
        serde_json::to_string_pretty(&views)
    };
    match output {
        Ok(json) => println!("{json}"),
        Err(err) => {
            eprintln!("cannot serialize views: {err}");
            process::exit(1);
        }
    }
}
