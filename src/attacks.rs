// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Precomputed attack tables for each piece variant. The fixed-offset
//! pieces (king, knight) and pawn captures are simple per-square lookups;
//! the sliding pieces (rook, bishop, queen) trace rays outward from their
//! square and are cut off at the first occupied square on each ray.
//!
//! The sets returned here are raw movement shapes: they do not know about
//! the colors of the occupying pieces. The move generator intersects them
//! with board occupancy to apply the friendly/enemy tie-break.
use crate::squareset::SquareSet;
use crate::types::{Color, Direction, Square, TableIndex, COLORS, DIRECTIONS, SQUARES};

fn offset_table(offsets: &[(i32, i32)]) -> [SquareSet; 64] {
    let mut table = [SquareSet::none(); 64];
    for &sq in SQUARES.iter() {
        let mut set = SquareSet::none();
        for &(file_delta, rank_delta) in offsets {
            if let Some(target) = sq.offset(file_delta, rank_delta) {
                set.set(target);
            }
        }
        table[sq.as_index()] = set;
    }
    table
}

struct KingTable {
    table: [SquareSet; 64],
}

impl KingTable {
    pub fn new() -> KingTable {
        KingTable {
            table: offset_table(&[
                (0, 1),
                (1, 1),
                (1, 0),
                (1, -1),
                (0, -1),
                (-1, -1),
                (-1, 0),
                (-1, 1),
            ]),
        }
    }

    pub fn attacks(&self, sq: Square) -> SquareSet {
        self.table[sq.as_index()]
    }
}

struct KnightTable {
    table: [SquareSet; 64],
}

impl KnightTable {
    pub fn new() -> KnightTable {
        KnightTable {
            table: offset_table(&[
                (1, 2),
                (2, 1),
                (2, -1),
                (1, -2),
                (-1, -2),
                (-2, -1),
                (-2, 1),
                (-1, 2),
            ]),
        }
    }

    pub fn attacks(&self, sq: Square) -> SquareSet {
        self.table[sq.as_index()]
    }
}

struct PawnTable {
    table: [[SquareSet; 2]; 64],
}

impl PawnTable {
    pub fn new() -> PawnTable {
        let mut pt = PawnTable {
            table: [[SquareSet::none(); 2]; 64],
        };

        for &sq in SQUARES.iter() {
            for &color in COLORS.iter() {
                let mut set = SquareSet::none();
                let (_, rank_delta) = color.forward().vector();
                if let Some(target) = sq.offset(-1, rank_delta) {
                    set.set(target);
                }
                if let Some(target) = sq.offset(1, rank_delta) {
                    set.set(target);
                }

                pt.table[sq.as_index()][color.as_index()] = set;
            }
        }

        pt
    }

    pub fn attacks(&self, sq: Square, color: Color) -> SquareSet {
        self.table[sq.as_index()][color.as_index()]
    }
}

struct RayTable {
    // Index 64 is a sentinel for "no blocker on the ray": its entries are
    // all empty, so the blocker subtraction below becomes a no-op.
    table: [[SquareSet; 8]; 65],
}

impl RayTable {
    pub fn new() -> RayTable {
        let mut rt = RayTable {
            table: [[SquareSet::none(); 8]; 65],
        };

        for &sq in SQUARES.iter() {
            for &dir in DIRECTIONS.iter() {
                let mut entry = SquareSet::none();
                let mut cursor = sq;
                while let Some(next) = cursor.towards(dir) {
                    entry.set(next);
                    cursor = next;
                }
                rt.table[sq.as_index()][dir.as_index()] = entry;
            }
        }
        rt
    }

    pub fn attacks(&self, sq: usize, dir: Direction) -> SquareSet {
        self.table[sq][dir.as_index()]
    }
}

lazy_static! {
    static ref KING_TABLE: KingTable = KingTable::new();
    static ref KNIGHT_TABLE: KnightTable = KnightTable::new();
    static ref PAWN_TABLE: PawnTable = PawnTable::new();
    static ref RAY_TABLE: RayTable = RayTable::new();
}

// Ray scans find the first occupied square along the ray and subtract the
// portion of the ray that lies past it. The first blocker is the lowest set
// bit on positive rays and the highest on negative rays, so the two cases
// scan from opposite ends of the ray mask.

fn positive_ray_attacks(sq: Square, occupancy: SquareSet, dir: Direction) -> SquareSet {
    debug_assert!(dir.index_shift() > 0);
    let attacks = RAY_TABLE.attacks(sq.as_index(), dir);
    let blockers = attacks.and(occupancy).bits();
    let blocking_square = blockers.trailing_zeros() as usize;
    let blocked_ray = RAY_TABLE.attacks(blocking_square, dir);
    attacks.xor(blocked_ray)
}

fn negative_ray_attacks(sq: Square, occupancy: SquareSet, dir: Direction) -> SquareSet {
    debug_assert!(dir.index_shift() < 0);
    let attacks = RAY_TABLE.attacks(sq.as_index(), dir);
    let blockers = attacks.and(occupancy).bits();
    let blocking_square = (64 - blockers.leading_zeros())
        .checked_sub(1)
        .unwrap_or(64) as usize;
    let blocked_ray = RAY_TABLE.attacks(blocking_square, dir);
    attacks.xor(blocked_ray)
}

/// Squares a pawn of the given color attacks from the given square. Note
/// that pawn attacks are captures only; forward pushes are not attacks and
/// are handled by the move generator.
pub fn pawn_attacks(sq: Square, color: Color) -> SquareSet {
    PAWN_TABLE.attacks(sq, color)
}

pub fn knight_attacks(sq: Square) -> SquareSet {
    KNIGHT_TABLE.attacks(sq)
}

pub fn king_attacks(sq: Square) -> SquareSet {
    KING_TABLE.attacks(sq)
}

/// Squares a bishop on `sq` attacks: the four diagonal rays, each cut off
/// at (and including) its first blocker.
pub fn bishop_attacks(sq: Square, occupancy: SquareSet) -> SquareSet {
    positive_ray_attacks(sq, occupancy, Direction::NorthEast)
        | positive_ray_attacks(sq, occupancy, Direction::NorthWest)
        | negative_ray_attacks(sq, occupancy, Direction::SouthEast)
        | negative_ray_attacks(sq, occupancy, Direction::SouthWest)
}

/// Squares a rook on `sq` attacks: the four orthogonal rays, each cut off
/// at (and including) its first blocker.
pub fn rook_attacks(sq: Square, occupancy: SquareSet) -> SquareSet {
    positive_ray_attacks(sq, occupancy, Direction::North)
        | positive_ray_attacks(sq, occupancy, Direction::East)
        | negative_ray_attacks(sq, occupancy, Direction::South)
        | negative_ray_attacks(sq, occupancy, Direction::West)
}

pub fn queen_attacks(sq: Square, occupancy: SquareSet) -> SquareSet {
    bishop_attacks(sq, occupancy) | rook_attacks(sq, occupancy)
}
