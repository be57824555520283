use crate::game_state::chess_types::*;
use crate::moves::move_descriptions::Move;

/// Single undo record for `make_move` / `unmake_move`.
///
/// Irreversible fields are restored verbatim from here; none of them are
/// recomputed from the move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UndoState {
    pub mv: Move,
    pub captured_piece: Option<Piece>,

    pub prev_castling_rights: CastlingRights,
    pub prev_en_passant_file: Option<u8>,
    pub prev_halfmove_clock: u16,

    pub prev_zobrist_key: u64,
}
