//! One-shot best-move runner.
//!
//! Usage:
//! `cargo run --release --bin bestmove -- --fen "<FEN>"`
//! `cargo run --release --bin bestmove -- --fen "<FEN>" --movetime 2000 --depth 12`
//!
//! Without `--fen` the standard starting position is searched. Defaults for
//! the remaining flags come from `EngineConfig::from_env()`. Log verbosity
//! follows `RUST_LOG` (default `chess_core=info`).

use chess_core::config::EngineConfig;
use chess_core::errors::ChessResult;
use chess_core::game_state::chess_rules::STARTING_POSITION_FEN;
use chess_core::game_state::game_state::GameState;
use chess_core::search::board_scoring::MaterialScorer;
use chess_core::search::iterative_deepening::iterative_deepening_search;
use chess_core::search::search_state::SearchState;
use chess_core::utils::long_algebraic::move_to_long_algebraic;
use chess_core::utils::render_game_state::render_game_state;
use tracing_subscriber::EnvFilter;

fn arg_value(args: &[String], flag: &str) -> Option<String> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

fn parse_arg<T: std::str::FromStr>(args: &[String], flag: &str, default: T) -> T {
    arg_value(args, flag)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn run(args: &[String]) -> ChessResult<()> {
    let engine = EngineConfig::from_env();
    let fen = arg_value(args, "--fen").unwrap_or_else(|| STARTING_POSITION_FEN.to_owned());
    let game = GameState::from_fen(&fen)?;

    let mut config = engine.search_config();
    config.max_depth = parse_arg(args, "--depth", config.max_depth);
    config.movetime_ms = Some(parse_arg(args, "--movetime", engine.move_time_ms));

    let mut state = SearchState::new(engine.tt_size_mb);
    state.record_position(&game);

    println!("{}", render_game_state(&game));
    let result = iterative_deepening_search(&game, &MaterialScorer, &mut state, &config);

    let pv: Vec<String> = result
        .principal_variation
        .iter()
        .map(|&mv| move_to_long_algebraic(mv))
        .collect();
    println!(
        "depth={} score={} nodes={} elapsed_ms={} nps={} pv={}",
        result.reached_depth,
        result.best_score,
        result.stats.nodes,
        result.elapsed_ms,
        result.nps,
        pv.join(" ")
    );
    match result.best_move {
        Some(mv) => println!("bestmove {}", move_to_long_algebraic(mv)),
        None => println!("bestmove (none)"),
    }
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("chess_core=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    if let Err(err) = run(&args) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
