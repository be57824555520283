use chess_core::game_state::chess_rules::{game_result, GameResult};
use chess_core::game_state::chess_types::Color;
use chess_core::game_state::game_state::GameState;
use chess_core::move_generation::legal_move_apply::make_move;
use chess_core::move_generation::legal_move_generator::legal_moves;
use chess_core::moves::move_descriptions::Move;
use chess_core::search::board_scoring::{MaterialScorer, DRAW_SCORE, MATE_SCORE};
use chess_core::search::iterative_deepening::{iterative_deepening_search, SearchConfig, SearchResult};
use chess_core::search::search_state::SearchState;
use chess_core::search::transposition_table::Bound;
use chess_core::utils::long_algebraic::{long_algebraic_to_move, move_to_long_algebraic};

const KIWIPETE_FEN: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";

fn parse(fen: &str) -> GameState {
    GameState::from_fen(fen).expect("FEN should parse")
}

fn depth(max_depth: u8) -> SearchConfig {
    SearchConfig {
        max_depth,
        ..SearchConfig::default()
    }
}

fn search(game: &GameState, config: &SearchConfig) -> SearchResult {
    let mut state = SearchState::new(4);
    iterative_deepening_search(game, &MaterialScorer, &mut state, config)
}

fn play(game: &mut GameState, state: &mut SearchState, lan: &str) -> Move {
    let mv = long_algebraic_to_move(lan, game).expect("move should be legal");
    make_move(game, mv);
    state.record_position(game);
    mv
}

#[test]
fn fresh_searches_are_deterministic() {
    let game = parse(KIWIPETE_FEN);
    let first = search(&game, &depth(4));
    let second = search(&game, &depth(4));

    assert_eq!(first.best_move, second.best_move);
    assert_eq!(first.best_score, second.best_score);
    assert_eq!(first.reached_depth, 4);
    assert_eq!(first.stats.nodes, second.stats.nodes);
    assert_eq!(first.principal_variation, second.principal_variation);
}

#[test]
fn principal_variation_is_a_legal_line() {
    let game = parse(KIWIPETE_FEN);
    let result = search(&game, &depth(4));

    assert!(!result.principal_variation.is_empty());
    assert_eq!(result.principal_variation.first().copied(), result.best_move);

    let mut line = game.clone();
    for &mv in &result.principal_variation {
        assert!(
            legal_moves(&mut line).contains(&mv),
            "{} is not legal in {}",
            move_to_long_algebraic(mv),
            line.get_fen()
        );
        make_move(&mut line, mv);
    }
}

#[test]
fn root_entry_is_exact_at_reached_depth() {
    let game = parse("r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3");
    let mut state = SearchState::new(4);
    let result = iterative_deepening_search(&game, &MaterialScorer, &mut state, &depth(3));

    let entry = state.tt.probe(game.zobrist_key).expect("root should be stored");
    assert_eq!(entry.bound, Bound::Exact);
    assert_eq!(entry.depth, result.reached_depth);
    assert_eq!(entry.score, result.best_score);
    assert_eq!(entry.best_move, result.best_move);

    // Same depth, empty tables, same answer.
    let fresh = search(&game, &depth(3));
    assert_eq!(fresh.best_score, entry.score);
}

#[test]
fn finds_back_rank_mate() {
    let mut game = parse("6k1/5ppp/8/8/8/8/5PPP/R5K1 w - - 0 1");
    let result = search(&game, &depth(4));

    let best = result.best_move.expect("a move should be found");
    assert_eq!(move_to_long_algebraic(best), "a1a8");
    assert_eq!(result.best_score, MATE_SCORE - 1);
    assert_eq!(result.reached_depth, 1);

    make_move(&mut game, best);
    let mut history = chess_core::search::repetition_table::RepetitionTable::new();
    history.push(game.zobrist_key);
    assert_eq!(
        game_result(&mut game, &history),
        GameResult::Checkmate {
            winner: Color::Light
        }
    );
}

#[test]
fn repetition_in_game_history_scores_as_draw() {
    let mut game = parse("7k/8/8/8/8/8/8/KQ6 b - - 1 1");
    let mut state = SearchState::new(4);
    state.record_position(&game);
    for lan in ["h8g8", "b1c1", "g8h8", "c1b1"] {
        play(&mut game, &mut state, lan);
    }
    assert_eq!(state.game_history.count(game.zobrist_key), 2);

    // Down a queen, black's only escape is walking back into the repeat.
    let result = iterative_deepening_search(&game, &MaterialScorer, &mut state, &depth(3));
    assert_eq!(result.best_move.map(move_to_long_algebraic).as_deref(), Some("h8g8"));
    assert_eq!(result.best_score, DRAW_SCORE);
}

#[test]
fn fifty_move_limit_scores_every_reply_as_draw() {
    let game = parse("k7/8/8/8/8/8/8/KQ6 w - - 100 1");
    let result = search(&game, &depth(2));

    assert!(result.best_move.is_some());
    assert_eq!(result.best_score, DRAW_SCORE);
}

#[test]
fn node_cap_stops_early_but_still_reports_a_move() {
    let mut game = GameState::new_game();
    let config = SearchConfig {
        max_depth: 30,
        max_nodes: Some(2_000),
        ..SearchConfig::default()
    };
    let result = search(&game, &config);

    assert!(result.reached_depth >= 1 && result.reached_depth < 30);
    let best = result.best_move.expect("depth one always completes");
    assert!(legal_moves(&mut game).contains(&best));
}

#[test]
fn move_time_bounds_the_search() {
    let game = parse(KIWIPETE_FEN);
    let config = SearchConfig {
        max_depth: 64,
        movetime_ms: Some(100),
        ..SearchConfig::default()
    };
    let result = search(&game, &config);

    assert!(result.best_move.is_some());
    assert!(result.reached_depth < 64);
    assert!(result.elapsed_ms < 5_000, "took {} ms", result.elapsed_ms);
}

#[test]
fn self_play_keeps_every_move_legal() {
    let mut game = parse("4k3/8/3p4/8/4P3/8/8/R3K3 w Q - 0 1");
    let mut state = SearchState::new(4);
    state.record_position(&game);

    let mut result = GameResult::InProgress;
    for _ in 0..40 {
        result = game_result(&mut game, &state.game_history);
        if result != GameResult::InProgress {
            break;
        }
        let search_result = iterative_deepening_search(&game, &MaterialScorer, &mut state, &depth(2));
        let mv = search_result.best_move.expect("non-terminal positions have a move");
        assert!(legal_moves(&mut game).contains(&mv));
        make_move(&mut game, mv);
        state.record_position(&game);
        assert!(game.is_consistent());
    }

    // Rook and pawn up, light should never be the side getting mated.
    assert_ne!(
        result,
        GameResult::Checkmate {
            winner: Color::Dark
        }
    );
}
