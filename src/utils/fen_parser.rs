//! FEN-to-GameState parser.
//!
//! Builds fully-populated incremental state from a Forsyth-Edwards Notation
//! string: piece bitboards and mailbox, rights, en-passant file, clocks and
//! the Zobrist key computed from scratch. Any malformed field is rejected.

use crate::errors::{ChessError, ChessResult};
use crate::game_state::{chess_types::*, game_state::GameState};
use crate::search::zobrist::compute_zobrist_key;
use crate::utils::algebraic::algebraic_to_square;

pub fn parse_fen(fen: &str) -> ChessResult<GameState> {
    let mut parts = fen.split_whitespace();

    let board_part = parts.next().ok_or_else(|| ChessError::fen("missing board layout"))?;
    let side_part = parts.next().ok_or_else(|| ChessError::fen("missing side to move"))?;
    let castling_part = parts.next().ok_or_else(|| ChessError::fen("missing castling rights"))?;
    let en_passant_part = parts.next().ok_or_else(|| ChessError::fen("missing en-passant square"))?;
    let halfmove_part = parts.next().ok_or_else(|| ChessError::fen("missing halfmove clock"))?;
    let fullmove_part = parts.next().ok_or_else(|| ChessError::fen("missing fullmove number"))?;

    if parts.next().is_some() {
        return Err(ChessError::fen("extra trailing fields"));
    }

    let mut game_state = GameState::new_empty();

    parse_board(board_part, &mut game_state)?;
    game_state.side_to_move = parse_side_to_move(side_part)?;
    game_state.castling_rights = parse_castling_rights(castling_part)?;
    game_state.en_passant_file = parse_en_passant(en_passant_part, &game_state)?;
    game_state.halfmove_clock = halfmove_part
        .parse::<u16>()
        .map_err(|_| ChessError::fen(format!("invalid halfmove clock '{halfmove_part}'")))?;
    game_state.fullmove_number = fullmove_part
        .parse::<u16>()
        .map_err(|_| ChessError::fen(format!("invalid fullmove number '{fullmove_part}'")))?;

    game_state.zobrist_key = compute_zobrist_key(&game_state);

    Ok(game_state)
}

fn parse_board(board_part: &str, game_state: &mut GameState) -> ChessResult<()> {
    let ranks: Vec<&str> = board_part.split('/').collect();
    if ranks.len() != 8 {
        return Err(ChessError::fen("board layout must contain 8 ranks"));
    }

    for (fen_rank_idx, rank_str) in ranks.iter().enumerate() {
        let board_rank = 7 - fen_rank_idx as u8;
        let mut file = 0u8;

        for ch in rank_str.chars() {
            if let Some(empty_count) = ch.to_digit(10) {
                if !(1..=8).contains(&empty_count) {
                    return Err(ChessError::fen(format!("invalid empty-square count '{ch}'")));
                }
                file += empty_count as u8;
                if file > 8 {
                    return Err(ChessError::fen(format!("rank {} has too many files", board_rank + 1)));
                }
                continue;
            }

            let piece = Piece::from_fen_char(ch).ok_or(ChessError::InvalidPieceChar(ch))?;
            if file >= 8 {
                return Err(ChessError::fen(format!("rank {} has too many files", board_rank + 1)));
            }
            if piece.kind == PieceKind::Pawn && (board_rank == 0 || board_rank == 7) {
                return Err(ChessError::fen("pawn on a back rank"));
            }

            game_state.put_piece(board_rank * 8 + file, piece);
            file += 1;
        }

        if file != 8 {
            return Err(ChessError::fen(format!("rank {} does not sum to 8 files", board_rank + 1)));
        }
    }

    for color in [Color::Light, Color::Dark] {
        if game_state.pieces_of(color, PieceKind::King).count_ones() > 1 {
            return Err(ChessError::fen(format!("more than one {color:?} king")));
        }
    }

    Ok(())
}

fn parse_side_to_move(side_part: &str) -> ChessResult<Color> {
    match side_part {
        "w" => Ok(Color::Light),
        "b" => Ok(Color::Dark),
        _ => Err(ChessError::fen(format!("invalid side to move '{side_part}'"))),
    }
}

fn parse_castling_rights(castling_part: &str) -> ChessResult<CastlingRights> {
    if castling_part == "-" {
        return Ok(0);
    }

    let mut rights: CastlingRights = 0;
    for ch in castling_part.chars() {
        rights |= match ch {
            'K' => CASTLE_LIGHT_KINGSIDE,
            'Q' => CASTLE_LIGHT_QUEENSIDE,
            'k' => CASTLE_DARK_KINGSIDE,
            'q' => CASTLE_DARK_QUEENSIDE,
            _ => return Err(ChessError::fen(format!("invalid castling character '{ch}'"))),
        };
    }

    Ok(rights)
}

/// The target must sit behind a pawn of the side that just moved, on the
/// rank that side's double push passes over.
fn parse_en_passant(en_passant_part: &str, game_state: &GameState) -> ChessResult<Option<u8>> {
    if en_passant_part == "-" {
        return Ok(None);
    }

    let target = algebraic_to_square(en_passant_part)?;
    let pushed = game_state.side_to_move.opposite();
    let (expected_rank, pawn_square) = match pushed {
        Color::Dark => (5, target.wrapping_sub(8)),
        Color::Light => (2, target + 8),
    };

    if rank_of(target) != expected_rank
        || game_state.piece_at(pawn_square) != Some(Piece::new(pushed, PieceKind::Pawn))
        || game_state.piece_at(target).is_some()
    {
        return Err(ChessError::fen(format!(
            "en-passant square '{en_passant_part}' does not follow a double push"
        )));
    }

    Ok(Some(file_of(target)))
}
