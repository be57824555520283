//! Long algebraic move text (`e2e4`, `e7e8q`).
//!
//! Parsing resolves the text against the legal move list of the position so
//! the returned [`Move`] carries the exact flag the generator would produce.

use crate::errors::{ChessError, ChessResult};
use crate::game_state::chess_types::PieceKind;
use crate::game_state::game_state::GameState;
use crate::move_generation::legal_move_generator::legal_moves;
use crate::moves::move_descriptions::Move;
use crate::utils::algebraic::{algebraic_to_square, square_to_algebraic};

pub fn move_to_long_algebraic(mv: Move) -> String {
    let mut out = square_to_algebraic(mv.from());
    out.push_str(&square_to_algebraic(mv.to()));
    if let Some(piece) = mv.promotion_piece() {
        out.push(promotion_to_char(piece));
    }
    out
}

/// Resolves move text to the matching legal move.
///
/// Text that is not well-formed is `InvalidMove`; well-formed text with no
/// matching legal move is `IllegalMove`.
pub fn long_algebraic_to_move(long_algebraic: &str, game_state: &mut GameState) -> ChessResult<Move> {
    let invalid = || ChessError::InvalidMove(long_algebraic.to_owned());

    if !long_algebraic.is_ascii() || !(4..=5).contains(&long_algebraic.len()) {
        return Err(invalid());
    }

    let from = algebraic_to_square(&long_algebraic[0..2]).map_err(|_| invalid())?;
    let to = algebraic_to_square(&long_algebraic[2..4]).map_err(|_| invalid())?;
    let promotion = match long_algebraic.as_bytes().get(4) {
        Some(&ch) => Some(char_to_promotion(char::from(ch)).ok_or_else(invalid)?),
        None => None,
    };

    legal_moves(game_state)
        .into_iter()
        .find(|mv| mv.from() == from && mv.to() == to && mv.promotion_piece() == promotion)
        .ok_or_else(|| ChessError::IllegalMove(long_algebraic.to_owned()))
}

fn promotion_to_char(piece_kind: PieceKind) -> char {
    match piece_kind {
        PieceKind::Knight => 'n',
        PieceKind::Bishop => 'b',
        PieceKind::Rook => 'r',
        _ => 'q',
    }
}

fn char_to_promotion(ch: char) -> Option<PieceKind> {
    match ch.to_ascii_lowercase() {
        'n' => Some(PieceKind::Knight),
        'b' => Some(PieceKind::Bishop),
        'r' => Some(PieceKind::Rook),
        'q' => Some(PieceKind::Queen),
        _ => None,
    }
}
