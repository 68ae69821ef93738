// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Definitions of the `SquareSet` type, a set of squares on the board.
//! Square sets are the currency of the move generators and the checkmate
//! detector: every "set of squares" surface in the engine (legal moves,
//! allowable destinations, occupancy) is one of these.
//!
//! A square set is a single 64-bit integer and behaves like a set, using
//! bitwise operations for the normal set operations (union, intersection,
//! set complement, etc.).
use num_traits::FromPrimitive;
use std::default::Default;
use std::fmt;
use std::iter::Iterator;
use std::ops;

use crate::types::{self, Rank, Square};

const RANK_MASKS: [u64; 8] = [
    0x0000_0000_0000_00FF,
    0x0000_0000_0000_FF00,
    0x0000_0000_00FF_0000,
    0x0000_0000_FF00_0000,
    0x0000_00FF_0000_0000,
    0x0000_FF00_0000_0000,
    0x00FF_0000_0000_0000,
    0xFF00_0000_0000_0000,
];

/// A set of squares, stored one bit per square with `A1` as the lowest bit.
#[derive(Copy, Clone, PartialEq, Eq)]
pub struct SquareSet {
    bits: u64,
}

impl SquareSet {
    pub const fn from_bits(bits: u64) -> SquareSet {
        SquareSet { bits }
    }

    /// The empty set.
    pub const fn none() -> SquareSet {
        SquareSet::from_bits(0)
    }

    /// The set containing every square on the board.
    pub const fn all() -> SquareSet {
        SquareSet::from_bits(0xFFFF_FFFF_FFFF_FFFF)
    }

    /// The set containing exactly one square.
    pub const fn single(square: Square) -> SquareSet {
        SquareSet::from_bits(1u64 << (square as u8))
    }

    /// Tests whether a square is a member of this set.
    pub const fn test(self, square: Square) -> bool {
        (self.bits & (1u64 << (square as u8))) != 0
    }

    /// Adds a square to this set.
    pub fn set(&mut self, square: Square) {
        self.bits |= 1u64 << (square as u8);
    }

    /// Removes a square from this set.
    pub fn unset(&mut self, square: Square) {
        self.bits &= !(1u64 << square as u8);
    }

    pub const fn and(self, other: SquareSet) -> SquareSet {
        SquareSet::from_bits(self.bits & other.bits)
    }

    pub const fn or(self, other: SquareSet) -> SquareSet {
        SquareSet::from_bits(self.bits | other.bits)
    }

    pub const fn xor(self, other: SquareSet) -> SquareSet {
        SquareSet::from_bits(self.bits ^ other.bits)
    }

    pub const fn not(self) -> SquareSet {
        SquareSet::from_bits(!self.bits)
    }

    /// The members of this set that lie on the given rank.
    pub const fn rank(self, rank: Rank) -> SquareSet {
        self.and(SquareSet::from_bits(RANK_MASKS[rank as usize]))
    }

    pub const fn bits(self) -> u64 {
        self.bits
    }

    /// The number of squares in this set.
    pub const fn count(self) -> u32 {
        self.bits.count_ones()
    }

    pub const fn empty(self) -> bool {
        self.bits == 0
    }

    /// An iterator over the squares in this set, lowest index first.
    pub fn iter(self) -> SquareSetIterator {
        SquareSetIterator { bits: self.bits }
    }

    pub fn first(self) -> Option<Square> {
        self.iter().next()
    }
}

impl Default for SquareSet {
    fn default() -> SquareSet {
        SquareSet::none()
    }
}

impl fmt::Debug for SquareSet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_tuple("SquareSet").field(&self.bits).finish()
    }
}

impl fmt::Display for SquareSet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for &rank in types::RANKS.iter().rev() {
            for &file in &types::FILES {
                let sq = Square::of(file, rank);
                if self.test(sq) {
                    write!(f, " 1 ")?
                } else {
                    write!(f, " . ")?
                }
            }

            writeln!(f, "| {}", rank)?;
        }

        for _ in &types::FILES {
            write!(f, "---")?;
        }

        writeln!(f)?;
        for file in &types::FILES {
            write!(f, " {} ", file)?;
        }

        writeln!(f)?;
        Ok(())
    }
}

// Operator overloads for ease of use
impl ops::BitAnd for SquareSet {
    type Output = SquareSet;

    fn bitand(self, rhs: SquareSet) -> SquareSet {
        self.and(rhs)
    }
}

impl ops::BitAndAssign for SquareSet {
    fn bitand_assign(&mut self, rhs: SquareSet) {
        *self = self.and(rhs);
    }
}

impl ops::BitOr for SquareSet {
    type Output = SquareSet;

    fn bitor(self, rhs: SquareSet) -> SquareSet {
        self.or(rhs)
    }
}

impl ops::BitOrAssign for SquareSet {
    fn bitor_assign(&mut self, rhs: SquareSet) {
        *self = self.or(rhs);
    }
}

impl ops::BitXor for SquareSet {
    type Output = SquareSet;

    fn bitxor(self, rhs: SquareSet) -> SquareSet {
        self.xor(rhs)
    }
}

impl ops::BitXorAssign for SquareSet {
    fn bitxor_assign(&mut self, rhs: SquareSet) {
        *self = self.xor(rhs);
    }
}

impl ops::Not for SquareSet {
    type Output = SquareSet;

    fn not(self) -> SquareSet {
        SquareSet::not(self)
    }
}

/// Iterator over the squares set in a given `SquareSet`.
pub struct SquareSetIterator {
    bits: u64,
}

impl Iterator for SquareSetIterator {
    type Item = Square;

    fn next(&mut self) -> Option<Square> {
        if self.bits == 0 {
            return None;
        }

        let next = self.bits.trailing_zeros();
        self.bits &= self.bits - 1;
        Some(FromPrimitive::from_u32(next).unwrap())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(64))
    }
}

impl IntoIterator for SquareSet {
    type Item = Square;
    type IntoIter = SquareSetIterator;

    fn into_iter(self) -> SquareSetIterator {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smoke_test() {
        let mut set = SquareSet::default();
        assert!(!set.test(Square::A1));

        set.set(Square::A1);
        assert!(set.test(Square::A1));
    }

    #[test]
    fn union() {
        let one = SquareSet::single(Square::A2);
        let two = SquareSet::single(Square::B2);

        assert!(!two.test(Square::A2));
        assert!(!one.test(Square::B2));

        let three = one | two;
        assert!(three.test(Square::A2));
        assert!(three.test(Square::B2));
    }

    #[test]
    fn intersection() {
        let mut one = SquareSet::default();
        let mut two = SquareSet::default();
        one.set(Square::A2);
        one.set(Square::B2);
        two.set(Square::A2);
        two.set(Square::C2);

        let three = one & two;
        assert!(three.test(Square::A2));
        assert!(!three.test(Square::B2));
        assert!(!three.test(Square::C2));
    }

    #[test]
    fn enumerating() {
        let mut one = SquareSet::default();
        one.set(Square::A2);
        one.set(Square::B2);

        let squares: Vec<_> = one.iter().collect();
        assert_eq!(2, squares.len());
        assert_eq!(Square::A2, squares[0]);
        assert_eq!(Square::B2, squares[1]);
    }

    #[test]
    fn empty_iter() {
        let one = SquareSet::default();
        let squares: Vec<_> = one.iter().collect();
        assert_eq!(0, squares.len());
    }

    #[test]
    fn unset() {
        let mut set = SquareSet::none();
        set.set(Square::H2);
        assert!(set.test(Square::H2));
        set.unset(Square::H2);
        assert!(!set.test(Square::H2));
        assert!(set.count() == 0);
    }

    #[test]
    fn count() {
        let mut set = SquareSet::none();
        set.set(Square::A2);
        set.set(Square::B5);
        set.set(Square::H8);
        assert!(set.count() == 3);
    }

    #[test]
    fn rank_mask() {
        let mut set = SquareSet::none();
        set.set(Square::E4);
        set.set(Square::E5);

        let composite = set.rank(Rank::Four);
        assert!(composite.test(Square::E4));
        assert!(!composite.test(Square::E5));
    }
}
