//! Sliding-piece ray tables.
//!
//! `RAYS[direction][square]` holds every square from `square` to the board edge
//! in `direction` (exclusive of `square`). `BETWEEN[a][b]` holds the squares
//! strictly between two aligned squares and is empty otherwise.

use crate::game_state::chess_types::{Bitboard, Square};
use crate::moves::attack_tables::set_if_valid;

pub const NORTH: usize = 0;
pub const NORTH_EAST: usize = 1;
pub const EAST: usize = 2;
pub const SOUTH_EAST: usize = 3;
pub const SOUTH: usize = 4;
pub const SOUTH_WEST: usize = 5;
pub const WEST: usize = 6;
pub const NORTH_WEST: usize = 7;

/// `(file step, rank step)` per direction index.
const DIRECTION_STEPS: [(i32, i32); 8] = [
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

pub const ORTHOGONAL_DIRECTIONS: [usize; 4] = [NORTH, EAST, SOUTH, WEST];
pub const DIAGONAL_DIRECTIONS: [usize; 4] = [NORTH_EAST, SOUTH_EAST, SOUTH_WEST, NORTH_WEST];
pub const ALL_DIRECTIONS: [usize; 8] = [
    NORTH, NORTH_EAST, EAST, SOUTH_EAST, SOUTH, SOUTH_WEST, WEST, NORTH_WEST,
];

pub static RAYS: [[Bitboard; 64]; 8] = generate_rays();
pub static BETWEEN: [[Bitboard; 64]; 64] = generate_between();

/// Rook-like directions have even indices.
#[inline]
pub const fn is_orthogonal(direction: usize) -> bool {
    direction % 2 == 0
}

/// Directions whose square index grows along the ray.
#[inline]
const fn is_increasing(direction: usize) -> bool {
    matches!(direction, NORTH | NORTH_EAST | EAST | NORTH_WEST)
}

/// Nearest occupied square of `blockers` (a non-empty subset of a ray) to the
/// ray's origin.
#[inline]
pub const fn first_blocker(direction: usize, blockers: Bitboard) -> Square {
    if is_increasing(direction) {
        blockers.trailing_zeros() as Square
    } else {
        (63 - blockers.leading_zeros()) as Square
    }
}

/// Squares reachable along one ray, including the first blocker.
#[inline]
pub fn ray_attacks(direction: usize, square: Square, occupancy: Bitboard) -> Bitboard {
    let ray = RAYS[direction][square as usize];
    let blockers = ray & occupancy;
    if blockers == 0 {
        ray
    } else {
        ray ^ RAYS[direction][first_blocker(direction, blockers) as usize]
    }
}

#[inline]
pub fn bishop_attacks(square: Square, occupancy: Bitboard) -> Bitboard {
    DIAGONAL_DIRECTIONS
        .iter()
        .fold(0, |acc, &dir| acc | ray_attacks(dir, square, occupancy))
}

#[inline]
pub fn rook_attacks(square: Square, occupancy: Bitboard) -> Bitboard {
    ORTHOGONAL_DIRECTIONS
        .iter()
        .fold(0, |acc, &dir| acc | ray_attacks(dir, square, occupancy))
}

#[inline]
pub fn queen_attacks(square: Square, occupancy: Bitboard) -> Bitboard {
    bishop_attacks(square, occupancy) | rook_attacks(square, occupancy)
}

const fn generate_rays() -> [[Bitboard; 64]; 8] {
    let mut table = [[0u64; 64]; 8];
    let mut dir = 0usize;

    while dir < 8 {
        let (df, dr) = DIRECTION_STEPS[dir];
        let mut sq = 0usize;
        while sq < 64 {
            let mut file = (sq % 8) as i32 + df;
            let mut rank = (sq / 8) as i32 + dr;
            let mut ray = 0u64;
            loop {
                let bit = set_if_valid(file, rank);
                if bit == 0 {
                    break;
                }
                ray |= bit;
                file += df;
                rank += dr;
            }
            table[dir][sq] = ray;
            sq += 1;
        }
        dir += 1;
    }

    table
}

const fn generate_between() -> [[Bitboard; 64]; 64] {
    let mut table = [[0u64; 64]; 64];
    let mut from = 0usize;

    while from < 64 {
        let mut dir = 0usize;
        while dir < 8 {
            let (df, dr) = DIRECTION_STEPS[dir];
            let mut file = (from % 8) as i32 + df;
            let mut rank = (from / 8) as i32 + dr;
            let mut passed = 0u64;
            loop {
                let bit = set_if_valid(file, rank);
                if bit == 0 {
                    break;
                }
                table[from][bit.trailing_zeros() as usize] = passed;
                passed |= bit;
                file += df;
                rank += dr;
            }
            dir += 1;
        }
        from += 1;
    }

    table
}
