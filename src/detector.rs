// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Check and checkmate detection. The detector answers three questions
//! about a position: is a king attacked, would a candidate move leave the
//! mover's own king attacked, and does the side to move have any move at
//! all that survives that filter.
//!
//! Move simulation is clone-based: `test_move` copies the board, applies
//! the candidate move to the copy, and inspects the result. The live board
//! is never touched, so a rejected candidate is transactional by
//! construction.
use crate::board::{Board, PieceId};
use crate::movegen::legal_moves;
use crate::squareset::SquareSet;
use crate::types::{Color, Square};

bitflags! {
    /// Cached per-color check state, recomputed by `update` after every
    /// committed move.
    pub struct CheckFlags: u8 {
        const NONE = 0;
        const WHITE_IN_CHECK = 0b0000_0001;
        const BLACK_IN_CHECK = 0b0000_0010;
    }
}

impl CheckFlags {
    fn of(color: Color) -> CheckFlags {
        match color {
            Color::White => CheckFlags::WHITE_IN_CHECK,
            Color::Black => CheckFlags::BLACK_IN_CHECK,
        }
    }
}

/// Errors arising at detector construction. Both kings must be on the
/// board before the detector exists; a kingless position is a setup bug,
/// not a gameplay state.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DetectorError {
    MissingKing(Color),
}

pub struct CheckmateDetector {
    white_king: PieceId,
    black_king: PieceId,
    flags: CheckFlags,
}

impl CheckmateDetector {
    /// Constructs a detector for the given board. Fails if either king is
    /// absent; requiring the kings up front removes the degenerate
    /// no-kings-yet state entirely.
    pub fn new(board: &Board) -> Result<CheckmateDetector, DetectorError> {
        let white_king = board
            .king(Color::White)
            .ok_or(DetectorError::MissingKing(Color::White))?;
        let black_king = board
            .king(Color::Black)
            .ok_or(DetectorError::MissingKing(Color::Black))?;

        let mut detector = CheckmateDetector {
            white_king,
            black_king,
            flags: CheckFlags::NONE,
        };
        detector.update(board);
        Ok(detector)
    }

    fn king_square(&self, board: &Board, color: Color) -> Option<Square> {
        let id = match color {
            Color::White => self.white_king,
            Color::Black => self.black_king,
        };
        board.piece(id).map(|state| state.square())
    }

    /// True iff any live piece of `by` has the given square in its legal
    /// move set. Recomputed fresh on every call; the board changes every
    /// ply, so there is nothing worth caching here.
    pub fn is_attacked(&self, board: &Board, square: Square, by: Color) -> bool {
        board
            .pieces_of(by)
            .iter()
            .any(|&id| legal_moves(board, id).test(square))
    }

    /// True iff the given color's king is attacked by any enemy piece.
    pub fn in_check(&self, board: &Board, color: Color) -> bool {
        match self.king_square(board, color) {
            Some(square) => self.is_attacked(board, square, color.toggle()),
            None => false,
        }
    }

    /// The authoritative legality oracle: simulates the candidate move on a
    /// copy of the board and reports whether the mover's own king is safe
    /// afterwards. Returns false for moves the board itself rejects (for
    /// example a same-color destination). The live board is unchanged
    /// regardless of the answer.
    pub fn test_move(&self, board: &Board, id: PieceId, destination: Square) -> bool {
        let color = match board.piece(id) {
            Some(state) => state.color(),
            None => return false,
        };

        let mut sim = board.clone();
        if sim.move_piece(id, destination, None).is_none() {
            return false;
        }

        !self.in_check(&sim, color)
    }

    /// The union, over every piece of the given color, of destinations
    /// whose move survives `test_move`. Callers intersect this with each
    /// piece's raw legal moves to produce the final legal-move set.
    pub fn allowable_squares(&self, board: &Board, color: Color) -> SquareSet {
        let mut allowable = SquareSet::none();
        for &id in board.pieces_of(color) {
            for destination in legal_moves(board, id) {
                if self.test_move(board, id, destination) {
                    allowable.set(destination);
                }
            }
        }

        allowable
    }

    /// True iff the given color is in check and no move of any of its
    /// pieces survives the `test_move` filter. Pure query; no state is
    /// touched.
    pub fn checkmated(&self, board: &Board, color: Color) -> bool {
        if !self.in_check(board, color) {
            return false;
        }

        for &id in board.pieces_of(color) {
            for destination in legal_moves(board, id) {
                if self.test_move(board, id, destination) {
                    return false;
                }
            }
        }

        true
    }

    /// Recomputes the cached per-color check flags. Must be invoked exactly
    /// once per committed move, after the move is applied to the live board
    /// and before the next move is accepted.
    pub fn update(&mut self, board: &Board) {
        let mut flags = CheckFlags::NONE;
        for &color in &[Color::White, Color::Black] {
            if self.in_check(board, color) {
                flags |= CheckFlags::of(color);
            }
        }
        self.flags = flags;
    }

    /// The cached check flag for the given color, as of the last `update`.
    pub fn check_flag(&self, color: Color) -> bool {
        self.flags.contains(CheckFlags::of(color))
    }
}
