// FlipTac self-play runner
//
// Usage:
//   cargo run --bin fliptac -- [options]
//
// Options:
//   --players <n>     Number of seats, 2-4 (default: from FlipTac.toml)
//   --size <n>        Board side length (default: from FlipTac.toml)
//   --seed <n>        Seed for the computer players' random openings
//   --config <path>   Path to FlipTac.toml (default: FlipTac.toml)
//   --no-delay        Skip the thinking delay

use log::{error, info};
use std::env;
use std::process;

use fliptac::config::Config;
use fliptac::cpu::CpuPlayer;
use fliptac::game::GameState;
use fliptac::transcript::TranscriptLogger;

struct Options {
    players: Option<usize>,
    size: Option<usize>,
    seed: Option<u64>,
    config_path: String,
    no_delay: bool,
}

fn print_usage() {
    eprintln!("FlipTac Self-Play Runner");
    eprintln!();
    eprintln!("USAGE:");
    eprintln!("  fliptac [OPTIONS]");
    eprintln!();
    eprintln!("OPTIONS:");
    eprintln!("  --players <n>     Number of seats, 2-4");
    eprintln!("  --size <n>        Board side length (>= 3)");
    eprintln!("  --seed <n>        Seed for random openings");
    eprintln!("  --config <path>   Path to FlipTac.toml (default: FlipTac.toml)");
    eprintln!("  --no-delay        Skip the thinking delay");
    eprintln!("  --help            Show this help message");
}

fn parse_value<T: std::str::FromStr>(flag: &str, value: Option<&String>) -> Result<T, String> {
    let raw = value.ok_or_else(|| format!("{} requires a value", flag))?;
    raw.parse::<T>()
        .map_err(|_| format!("Invalid value '{}' for {}", raw, flag))
}

fn parse_args(args: &[String]) -> Result<Options, String> {
    let mut options = Options {
        players: None,
        size: None,
        seed: None,
        config_path: "FlipTac.toml".to_string(),
        no_delay: false,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--players" => {
                options.players = Some(parse_value("--players", args.get(i + 1))?);
                i += 1;
            }
            "--size" => {
                options.size = Some(parse_value("--size", args.get(i + 1))?);
                i += 1;
            }
            "--seed" => {
                options.seed = Some(parse_value("--seed", args.get(i + 1))?);
                i += 1;
            }
            "--config" => {
                options.config_path = parse_value("--config", args.get(i + 1))?;
                i += 1;
            }
            "--no-delay" => options.no_delay = true,
            other => return Err(format!("Unknown option: {}", other)),
        }
        i += 1;
    }

    Ok(options)
}

#[tokio::main]
async fn main() {
    // We default to 'info' level logging. But if the `RUST_LOG` environment variable is set,
    // we keep that value instead.
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.contains(&"--help".to_string()) {
        print_usage();
        process::exit(0);
    }

    let options = match parse_args(&args) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("Error: {}", e);
            print_usage();
            process::exit(1);
        }
    };

    let mut config = Config::from_file(&options.config_path).unwrap_or_else(|e| {
        log::warn!("Could not load {} ({}), using hardcoded defaults", options.config_path, e);
        Config::default_hardcoded()
    });
    if options.no_delay {
        config.timing.thinking_delay_ms = 0;
    }

    // Every seat is computer-controlled here, so a lone participant still gets two seats
    let players = options.players.unwrap_or(config.game.player_count).max(2);
    let size = options.size.unwrap_or(config.game.board_size);

    let mut state = match GameState::new(players, size) {
        Ok(state) => state,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    let cpu = match options.seed.or(config.opponent.seed) {
        Some(seed) => CpuPlayer::with_seed(config.clone(), seed),
        None => CpuPlayer::new(config.clone()),
    };
    let logger = TranscriptLogger::new(config.debug.enabled, &config.debug.log_file_path).await;

    info!("Starting FlipTac: {} players on {}x{}", players, size, size);
    println!("{}", state.board());

    while !state.is_over() {
        let outcome = match cpu.play_turn(&mut state).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("Game aborted: {}", e);
                logger.close().await;
                process::exit(1);
            }
        };
        logger.log_move(&state, &outcome);

        println!("Turn {}: {} plays {}", state.turn(), outcome.player, outcome.coord);
        for eliminated in &outcome.eliminated {
            println!("  {} has no moves left and is out", eliminated);
        }
        println!("{}", state.board());
    }

    logger.close().await;

    if let Some(winner) = state.winner() {
        println!("{} wins!", winner);
    }
}
