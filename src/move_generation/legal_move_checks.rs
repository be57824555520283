//! Attack queries and per-node check / pin masks.

use crate::game_state::{chess_types::*, game_state::GameState};
use crate::moves::attack_tables::{king_attacks, knight_attacks, pawn_attacks};
use crate::moves::ray_tables::{first_blocker, is_orthogonal, ALL_DIRECTIONS, BETWEEN, RAYS};

#[inline]
pub fn king_square(game_state: &GameState, color: Color) -> Option<Square> {
    let kings = game_state.pieces_of(color, PieceKind::King);
    if kings == 0 {
        None
    } else {
        Some(kings.trailing_zeros() as Square)
    }
}

#[inline]
pub fn is_king_in_check(game_state: &GameState, color: Color) -> bool {
    let kings = game_state.pieces_of(color, PieceKind::King);
    is_square_attacked(game_state, kings, color.opposite())
}

/// Whether `attacker_color` attacks the square in the one-hot `target`.
/// An empty target is never attacked.
#[inline]
pub fn is_square_attacked(game_state: &GameState, target: Bitboard, attacker_color: Color) -> bool {
    is_square_attacked_with_occupancy(game_state, target, attacker_color, game_state.occupancy_all)
}

/// Same as [`is_square_attacked`] but with sliders blocked by `occupancy`
/// instead of the board's own, so a king can test squares behind itself.
pub fn is_square_attacked_with_occupancy(
    game_state: &GameState,
    target: Bitboard,
    attacker_color: Color,
    occupancy: Bitboard,
) -> bool {
    if target == 0 {
        return false;
    }
    let square = target.trailing_zeros() as Square;

    let pawns = game_state.pieces_of(attacker_color, PieceKind::Pawn);
    if pawn_attacks(attacker_color.opposite(), square) & pawns != 0 {
        return true;
    }
    if knight_attacks(square) & game_state.pieces_of(attacker_color, PieceKind::Knight) != 0 {
        return true;
    }
    if king_attacks(square) & game_state.pieces_of(attacker_color, PieceKind::King) != 0 {
        return true;
    }

    let (orthogonal, diagonal) = slider_sets(game_state, attacker_color);
    for dir in ALL_DIRECTIONS {
        let blockers = RAYS[dir][square as usize] & occupancy;
        if blockers == 0 {
            continue;
        }
        let sliders = if is_orthogonal(dir) { orthogonal } else { diagonal };
        if sliders & square_bit(first_blocker(dir, blockers)) != 0 {
            return true;
        }
    }

    false
}

/// Rook-or-queen and bishop-or-queen sets of one color.
#[inline]
fn slider_sets(game_state: &GameState, color: Color) -> (Bitboard, Bitboard) {
    let queens = game_state.pieces_of(color, PieceKind::Queen);
    (
        game_state.pieces_of(color, PieceKind::Rook) | queens,
        game_state.pieces_of(color, PieceKind::Bishop) | queens,
    )
}

/// Legality constraints for one node.
#[derive(Debug, Clone)]
pub struct CheckPinMasks {
    /// Allowed destinations for non-king pieces: all squares when not in check,
    /// the checker plus interposition squares under single check, empty under
    /// double check.
    pub check_mask: Bitboard,
    pub checkers: Bitboard,
    pub pinned: Bitboard,
    /// For a pinned piece, the squares on its pin line (including the pinner).
    pub pin_rays: [Bitboard; 64],
}

impl CheckPinMasks {
    #[inline]
    pub fn in_check(&self) -> bool {
        self.checkers != 0
    }

    #[inline]
    pub fn is_double_check(&self) -> bool {
        self.checkers.count_ones() >= 2
    }

    /// Destinations a piece on `square` may reach without exposing its king.
    #[inline]
    pub fn allowed_for(&self, square: Square) -> Bitboard {
        if self.pinned & square_bit(square) != 0 {
            self.check_mask & self.pin_rays[square as usize]
        } else {
            self.check_mask
        }
    }
}

impl Default for CheckPinMasks {
    fn default() -> Self {
        Self {
            check_mask: Bitboard::MAX,
            checkers: 0,
            pinned: 0,
            pin_rays: [Bitboard::MAX; 64],
        }
    }
}

/// Checkers, check mask and pins for `side`'s king. A side without a king gets
/// unconstrained masks.
pub fn compute_check_and_pin_masks(game_state: &GameState, side: Color) -> CheckPinMasks {
    let mut masks = CheckPinMasks::default();
    let Some(king) = king_square(game_state, side) else {
        return masks;
    };
    let enemy = side.opposite();
    let own = game_state.occupancy_by_color[side.index()];
    let occupancy = game_state.occupancy_all;
    let (orthogonal, diagonal) = slider_sets(game_state, enemy);

    let mut checkers = (pawn_attacks(side, king) & game_state.pieces_of(enemy, PieceKind::Pawn))
        | (knight_attacks(king) & game_state.pieces_of(enemy, PieceKind::Knight));

    for dir in ALL_DIRECTIONS {
        let ray = RAYS[dir][king as usize];
        let blockers = ray & occupancy;
        if blockers == 0 {
            continue;
        }
        let sliders = if is_orthogonal(dir) { orthogonal } else { diagonal };
        let nearest = first_blocker(dir, blockers);
        let nearest_bit = square_bit(nearest);

        if sliders & nearest_bit != 0 {
            checkers |= nearest_bit;
            continue;
        }
        if own & nearest_bit == 0 {
            continue;
        }

        let beyond = RAYS[dir][nearest as usize] & occupancy;
        if beyond == 0 {
            continue;
        }
        let pinner = first_blocker(dir, beyond);
        if sliders & square_bit(pinner) != 0 {
            masks.pinned |= nearest_bit;
            masks.pin_rays[nearest as usize] = BETWEEN[king as usize][pinner as usize] | square_bit(pinner);
        }
    }

    masks.checkers = checkers;
    masks.check_mask = match checkers.count_ones() {
        0 => Bitboard::MAX,
        1 => BETWEEN[king as usize][checkers.trailing_zeros() as usize] | checkers,
        _ => 0,
    };
    masks
}
