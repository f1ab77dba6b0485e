// Offline replay tool for robosnake debug logs
//
// Usage:
//   cargo run --bin replay -- <log_file> [options]
//
// Options:
//   --all                  Replay all turns
//   --turns <turn1,turn2>  Replay specific turns (comma-separated)
//   --validate             Check logged moves against expected moves
//   --render               Print the board of every logged turn
//   --verbose              Show detailed output for each turn
//   --config <path>        Path to Snake.toml (default: Snake.toml)

use std::env;
use std::process;

use robosnake::config::Config;
use robosnake::replay::{render_board, LogEntry, ReplayEngine};
use robosnake::types::Direction;

enum Mode {
    All,
    Turns(Vec<i32>),
    Validate(Vec<(i32, Vec<Direction>)>),
    Render,
}

fn print_usage() {
    eprintln!("Robosnake Replay Tool");
    eprintln!();
    eprintln!("USAGE:");
    eprintln!("  replay <log_file> [OPTIONS]");
    eprintln!();
    eprintln!("OPTIONS:");
    eprintln!("  --all                   Replay all turns in the log");
    eprintln!("  --turns <T1,T2,...>     Replay specific turns (comma-separated)");
    eprintln!("  --validate <T:M,...>    Validate expected moves (format: turn:move|move,...)");
    eprintln!("  --render                Print each logged board, turn by turn");
    eprintln!("  --verbose               Show detailed output for each turn");
    eprintln!("  --config <path>         Path to Snake.toml (default: Snake.toml)");
    eprintln!("  --help                  Show this help message");
    eprintln!();
    eprintln!("EXAMPLES:");
    eprintln!("  replay robosnake_debug.jsonl --all");
    eprintln!("  replay robosnake_debug.jsonl --turns 5,10,15 --verbose");
    eprintln!("  replay robosnake_debug.jsonl --validate 5:up,10:right|down");
    eprintln!("  replay robosnake_debug.jsonl --render");
}

fn fail(message: String) -> ! {
    eprintln!("Error: {}", message);
    process::exit(1);
}

fn parse_turns(s: &str) -> Result<Vec<i32>, String> {
    s.split(',')
        .map(|t| {
            t.trim()
                .parse::<i32>()
                .map_err(|e| format!("Invalid turn number '{}': {}", t, e))
        })
        .collect()
}

fn parse_expected_moves(s: &str) -> Result<Vec<(i32, Vec<Direction>)>, String> {
    s.split(',')
        .map(|pair| {
            let (turn, moves) = pair
                .trim()
                .split_once(':')
                .ok_or_else(|| format!("Invalid format '{}'. Expected 'turn:move'", pair))?;

            let turn = turn
                .parse::<i32>()
                .map_err(|e| format!("Invalid turn number '{}': {}", turn, e))?;

            // Several acceptable moves may be separated by '|'
            let moves = moves
                .split('|')
                .map(|m| Direction::parse(m.trim()))
                .collect::<Result<Vec<_>, _>>()?;

            Ok((turn, moves))
        })
        .collect()
}

fn next_value<'a>(args: &'a [String], i: usize, flag: &str) -> &'a str {
    match args.get(i + 1) {
        Some(value) => value.as_str(),
        None => fail(format!("{} requires an argument", flag)),
    }
}

fn render_all(entries: &[LogEntry]) {
    println!("This match played {} logged turns.\n", entries.len());
    for entry in entries {
        let you_id = entry
            .our_snake()
            .map(|s| s.id.clone())
            .unwrap_or_default();
        println!("Turn {} (chose {})\n", entry.turn, entry.chosen_move);
        println!("{}", render_board(&entry.board, &you_id));
    }
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let wants_help = args.iter().any(|a| a == "--help");

    if args.len() < 2 || wants_help {
        print_usage();
        process::exit(if wants_help { 0 } else { 1 });
    }

    let log_file = &args[1];
    let mut config_path = "Snake.toml".to_string();
    let mut verbose = false;
    let mut mode = None;

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--all" => mode = Some(Mode::All),
            "--render" => mode = Some(Mode::Render),
            "--turns" => {
                let value = next_value(&args, i, "--turns");
                mode = Some(Mode::Turns(parse_turns(value).unwrap_or_else(|e| fail(e))));
                i += 1;
            }
            "--validate" => {
                let value = next_value(&args, i, "--validate");
                mode = Some(Mode::Validate(
                    parse_expected_moves(value).unwrap_or_else(|e| fail(e)),
                ));
                i += 1;
            }
            "--config" => {
                config_path = next_value(&args, i, "--config").to_string();
                i += 1;
            }
            "--verbose" => verbose = true,
            other => {
                print_usage();
                fail(format!("Unknown option '{}'", other))
            }
        }
        i += 1;
    }

    let mode = match mode {
        Some(mode) => mode,
        None => {
            print_usage();
            fail("Must specify --all, --turns, --validate or --render".to_string())
        }
    };

    let config = Config::from_file(&config_path).unwrap_or_else(|e| {
        eprintln!("Warning: Could not load config from '{}': {}", config_path, e);
        eprintln!("Using default configuration");
        Config::default_hardcoded()
    });

    let engine = ReplayEngine::new(config, verbose);
    let entries = engine
        .load_log_file(log_file)
        .unwrap_or_else(|e| fail(format!("loading log file: {}", e)));

    if entries.is_empty() {
        fail("Log file is empty".to_string());
    }

    match mode {
        Mode::All => {
            println!("Replaying all {} turns...\n", entries.len());
            let results = engine.replay_all(&entries);
            engine.print_report(&results);
        }
        Mode::Turns(turns) => {
            println!("Replaying {} specific turn(s)...\n", turns.len());
            let results = engine
                .replay_turns(&entries, &turns)
                .unwrap_or_else(|e| fail(format!("during replay: {}", e)));
            engine.print_report(&results);
        }
        Mode::Validate(expected) => {
            println!("Validating {} expected move(s)...\n", expected.len());
            match engine.validate_expected_moves(&entries, &expected) {
                Ok(()) => println!("All expected moves validated successfully!"),
                Err(e) => fail(format!("Validation failed: {}", e)),
            }
        }
        Mode::Render => render_all(&entries),
    }
}
