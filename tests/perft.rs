use chess_core::game_state::game_state::GameState;
use chess_core::move_generation::perft::{perft, perft_counts, perft_divide};

const STARTPOS_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
const KIWIPETE_FEN: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
const POSITION_3_FEN: &str = "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1";
const POSITION_4_FEN: &str = "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1";
const POSITION_4_MIRRORED_FEN: &str =
    "r2q1rk1/pP1p2pp/Q4n2/bbp1p3/Np6/1B3NBn/pPPP1PPP/R3K2R b KQ - 0 1";
const POSITION_5_FEN: &str = "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8";
const POSITION_6_FEN: &str =
    "r4rk1/1pp1qppp/p1np1n2/2b1p1B1/2B1P1b1/P1NP1N2/1PP1QPPP/R4RK1 w - - 0 10";

fn assert_perft(fen: &str, expected: &[u64]) {
    let mut game = GameState::from_fen(fen).expect("FEN should parse");
    let before = game.clone();
    for (idx, &nodes) in expected.iter().enumerate() {
        let depth = (idx + 1) as u8;
        assert_eq!(perft(&mut game, depth), nodes, "{fen} depth {depth}");
    }
    assert_eq!(game, before, "perft must leave the position untouched");
}

#[test]
fn startpos_perft_to_depth_four() {
    assert_perft(STARTPOS_FEN, &[20, 400, 8_902, 197_281]);
}

#[test]
#[ignore = "slow in debug builds"]
fn startpos_perft_depth_five() {
    let mut game = GameState::new_game();
    assert_eq!(perft(&mut game, 5), 4_865_609);
}

#[test]
fn kiwipete_perft() {
    assert_perft(KIWIPETE_FEN, &[48, 2_039, 97_862]);
}

#[test]
#[ignore = "slow in debug builds"]
fn kiwipete_perft_depth_four() {
    let mut game = GameState::from_fen(KIWIPETE_FEN).expect("FEN should parse");
    assert_eq!(perft(&mut game, 4), 4_085_603);
}

#[test]
fn position_3_perft() {
    assert_perft(POSITION_3_FEN, &[14, 191, 2_812, 43_238]);
}

#[test]
fn position_4_perft_both_orientations() {
    assert_perft(POSITION_4_FEN, &[6, 264, 9_467]);
    assert_perft(POSITION_4_MIRRORED_FEN, &[6, 264, 9_467]);
}

#[test]
fn position_5_perft() {
    assert_perft(POSITION_5_FEN, &[44, 1_486, 62_379]);
}

#[test]
fn position_6_perft() {
    assert_perft(POSITION_6_FEN, &[46, 2_079, 89_890]);
}

#[test]
fn startpos_depth_three_breakdown() {
    let mut game = GameState::new_game();
    let counts = perft_counts(&mut game, 3);
    assert_eq!(counts.nodes, 8_902);
    assert_eq!(counts.captures, 34);
    assert_eq!(counts.en_passant, 0);
    assert_eq!(counts.castles, 0);
    assert_eq!(counts.promotions, 0);
    assert_eq!(counts.checks, 12);
    assert_eq!(counts.checkmates, 0);
}

#[test]
fn position_3_depth_four_breakdown() {
    let mut game = GameState::from_fen(POSITION_3_FEN).expect("FEN should parse");
    let counts = perft_counts(&mut game, 4);
    assert_eq!(counts.nodes, 43_238);
    assert_eq!(counts.captures, 3_348);
    assert_eq!(counts.en_passant, 123);
    assert_eq!(counts.castles, 0);
    assert_eq!(counts.promotions, 0);
    assert_eq!(counts.checks, 1_680);
    assert_eq!(counts.checkmates, 17);
}

#[test]
fn divide_matches_total_for_kiwipete() {
    let mut game = GameState::from_fen(KIWIPETE_FEN).expect("FEN should parse");
    let divide = perft_divide(&mut game, 2);
    assert_eq!(divide.len(), 48);
    assert_eq!(divide.iter().map(|(_, n)| n).sum::<u64>(), 2_039);
}
