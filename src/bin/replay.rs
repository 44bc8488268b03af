// Standalone replay tool for FlipTac transcripts
//
// Usage:
//   cargo run --bin replay -- <transcript_file> [options]
//
// Options:
//   --game <n>             Replay only the n-th game (1-based)
//   --verbose              Show detailed output for each turn
//   --config <path>        Path to FlipTac.toml (default: FlipTac.toml)

use std::env;
use std::process;

use fliptac::config::Config;
use fliptac::replay::ReplayEngine;

fn print_usage() {
    eprintln!("FlipTac Replay Tool");
    eprintln!();
    eprintln!("USAGE:");
    eprintln!("  replay <transcript_file> [OPTIONS]");
    eprintln!();
    eprintln!("OPTIONS:");
    eprintln!("  --game <n>              Replay only the n-th game in the transcript");
    eprintln!("  --verbose               Show detailed output for each turn");
    eprintln!("  --config <path>         Path to FlipTac.toml (default: FlipTac.toml)");
    eprintln!("  --help                  Show this help message");
    eprintln!();
    eprintln!("EXAMPLES:");
    eprintln!("  # Verify every game in a transcript");
    eprintln!("  replay fliptac_transcript.jsonl");
    eprintln!();
    eprintln!("  # Verbose replay of the second game");
    eprintln!("  replay fliptac_transcript.jsonl --game 2 --verbose");
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 || args.contains(&"--help".to_string()) {
        print_usage();
        process::exit(if args.contains(&"--help".to_string()) { 0 } else { 1 });
    }

    let log_file = &args[1];
    let mut game_number: Option<usize> = None;
    let mut verbose = false;
    let mut config_path = "FlipTac.toml".to_string();

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--game" => {
                i += 1;
                game_number = match args.get(i).map(|s| s.parse::<usize>()) {
                    Some(Ok(n)) if n > 0 => Some(n),
                    _ => {
                        eprintln!("Error: --game requires a positive number");
                        process::exit(1);
                    }
                };
            }
            "--verbose" => verbose = true,
            "--config" => {
                i += 1;
                config_path = match args.get(i) {
                    Some(path) => path.clone(),
                    None => {
                        eprintln!("Error: --config requires a path");
                        process::exit(1);
                    }
                };
            }
            other => {
                eprintln!("Error: Unknown option: {}", other);
                print_usage();
                process::exit(1);
            }
        }
        i += 1;
    }

    let config = Config::from_file(&config_path).unwrap_or_else(|e| {
        eprintln!("Warning: Could not load {} ({}), using hardcoded defaults", config_path, e);
        Config::default_hardcoded()
    });

    let engine = ReplayEngine::new(config, verbose);
    let entries = match engine.load_log_file(log_file) {
        Ok(entries) => entries,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    let games = match game_number {
        Some(n) => {
            let split = ReplayEngine::split_games(&entries);
            let game = match split.get(n - 1) {
                Some(game) => *game,
                None => {
                    eprintln!("Error: transcript has only {} games", split.len());
                    process::exit(1);
                }
            };
            match engine.replay_game(game) {
                Ok(result) => vec![result],
                Err(e) => {
                    eprintln!("Error: {}", e);
                    process::exit(1);
                }
            }
        }
        None => engine.replay_all(&entries),
    };

    engine.print_report(&games);

    if games.iter().any(|g| !g.matches()) {
        process::exit(2);
    }
}
