//! Reversible, incrementally hashed move application.

use crate::game_state::{chess_types::*, game_state::GameState};
use crate::moves::move_descriptions::{
    Move, FLAG_DOUBLE_PAWN_PUSH, FLAG_EN_PASSANT, FLAG_KING_CASTLE, FLAG_QUEEN_CASTLE,
};
use crate::search::zobrist::{castling_key, en_passant_file_key, side_to_move_key};

/// Rights kept when a piece leaves or lands on each square. Only the rook
/// and king home squares clear anything.
const CASTLING_RIGHTS_MASK: [CastlingRights; 64] = build_castling_rights_mask();

const fn build_castling_rights_mask() -> [CastlingRights; 64] {
    let mut mask = [CASTLE_ALL; 64];
    mask[0] = CASTLE_ALL & !CASTLE_LIGHT_QUEENSIDE;
    mask[4] = CASTLE_ALL & !(CASTLE_LIGHT_KINGSIDE | CASTLE_LIGHT_QUEENSIDE);
    mask[7] = CASTLE_ALL & !CASTLE_LIGHT_KINGSIDE;
    mask[56] = CASTLE_ALL & !CASTLE_DARK_QUEENSIDE;
    mask[60] = CASTLE_ALL & !(CASTLE_DARK_KINGSIDE | CASTLE_DARK_QUEENSIDE);
    mask[63] = CASTLE_ALL & !CASTLE_DARK_KINGSIDE;
    mask
}

/// Rook start and end squares for a castle whose king lands on `king_to`.
#[inline]
fn castle_rook_squares(flag: u8, king_to: Square) -> (Square, Square) {
    if flag == FLAG_KING_CASTLE {
        (king_to + 1, king_to - 1)
    } else {
        (king_to - 2, king_to + 1)
    }
}

/// Square of the pawn removed by an en-passant capture landing on `to`.
#[inline]
fn en_passant_victim_square(mover: Color, to: Square) -> Square {
    match mover {
        Color::Light => to - 8,
        Color::Dark => to + 8,
    }
}

/// Applies `mv` in place, pushes the undo record and returns a copy of it.
///
/// # Panics
///
/// Panics if the start square is empty; that is a generator bug.
pub fn make_move(game_state: &mut GameState, mv: Move) -> UndoState {
    let from = mv.from();
    let to = mv.to();
    let side = game_state.side_to_move;
    let enemy = side.opposite();

    let Some(moving) = game_state.piece_at(from) else {
        panic!("make_move: no piece on start square {from} for {mv:?}");
    };

    let mut undo = UndoState {
        mv,
        captured_piece: None,
        prev_castling_rights: game_state.castling_rights,
        prev_en_passant_file: game_state.en_passant_file,
        prev_halfmove_clock: game_state.halfmove_clock,
        prev_zobrist_key: game_state.zobrist_key,
    };

    if let Some(file) = game_state.en_passant_file.take() {
        if game_state.is_en_passant_capture_legal(file, side) {
            game_state.zobrist_key ^= en_passant_file_key(file);
        }
    }

    match mv.flag() {
        FLAG_EN_PASSANT => {
            undo.captured_piece = game_state.remove_piece(en_passant_victim_square(side, to));
            game_state.move_piece(from, to);
        }
        FLAG_KING_CASTLE | FLAG_QUEEN_CASTLE => {
            let (rook_from, rook_to) = castle_rook_squares(mv.flag(), to);
            game_state.move_piece(from, to);
            game_state.move_piece(rook_from, rook_to);
        }
        _ => {
            if mv.is_capture() {
                undo.captured_piece = game_state.remove_piece(to);
            }
            match mv.promotion_piece() {
                Some(promoted) => {
                    game_state.remove_piece(from);
                    game_state.put_piece(to, Piece::new(side, promoted));
                }
                None => game_state.move_piece(from, to),
            }
            if mv.flag() == FLAG_DOUBLE_PAWN_PUSH {
                game_state.en_passant_file = Some(file_of(from));
            }
        }
    }

    let rights = game_state.castling_rights
        & CASTLING_RIGHTS_MASK[from as usize]
        & CASTLING_RIGHTS_MASK[to as usize];
    if rights != game_state.castling_rights {
        game_state.zobrist_key ^= castling_key(game_state.castling_rights) ^ castling_key(rights);
        game_state.castling_rights = rights;
    }

    if moving.kind == PieceKind::Pawn || undo.captured_piece.is_some() {
        game_state.halfmove_clock = 0;
    } else {
        game_state.halfmove_clock = game_state.halfmove_clock.saturating_add(1);
    }
    if side == Color::Dark {
        game_state.fullmove_number = game_state.fullmove_number.saturating_add(1);
    }

    game_state.side_to_move = enemy;
    game_state.zobrist_key ^= side_to_move_key();

    if let Some(file) = game_state.en_passant_file {
        if game_state.is_en_passant_capture_legal(file, enemy) {
            game_state.zobrist_key ^= en_passant_file_key(file);
        }
    }

    game_state.undo_stack.push(undo);
    undo
}

/// Reverts `mv`, which must be the most recently made move.
///
/// # Panics
///
/// Panics on an empty undo stack or when `mv` does not match the record.
pub fn unmake_move(game_state: &mut GameState, mv: Move) {
    let Some(undo) = game_state.undo_stack.pop() else {
        panic!("unmake_move: empty undo stack while undoing {mv:?}");
    };
    assert_eq!(undo.mv, mv, "unmake_move: move does not match the undo record");

    let mover = game_state.side_to_move.opposite();
    let from = mv.from();
    let to = mv.to();

    match mv.flag() {
        FLAG_EN_PASSANT => {
            game_state.move_piece(to, from);
            if let Some(victim) = undo.captured_piece {
                game_state.put_piece(en_passant_victim_square(mover, to), victim);
            }
        }
        FLAG_KING_CASTLE | FLAG_QUEEN_CASTLE => {
            let (rook_from, rook_to) = castle_rook_squares(mv.flag(), to);
            game_state.move_piece(rook_to, rook_from);
            game_state.move_piece(to, from);
        }
        _ => {
            if mv.is_promotion() {
                game_state.remove_piece(to);
                game_state.put_piece(from, Piece::new(mover, PieceKind::Pawn));
            } else {
                game_state.move_piece(to, from);
            }
            if let Some(captured) = undo.captured_piece {
                game_state.put_piece(to, captured);
            }
        }
    }

    if mover == Color::Dark {
        game_state.fullmove_number = game_state.fullmove_number.saturating_sub(1);
    }
    game_state.side_to_move = mover;
    game_state.castling_rights = undo.prev_castling_rights;
    game_state.en_passant_file = undo.prev_en_passant_file;
    game_state.halfmove_clock = undo.prev_halfmove_clock;
    game_state.zobrist_key = undo.prev_zobrist_key;
}
