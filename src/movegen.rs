// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Per-variant legal-move generation. `legal_moves` computes the set of
//! destination squares a piece may move to under its own movement rules on
//! the current board, with no lookahead: king safety is layered on
//! afterwards by the checkmate detector, not here.
use crate::attacks;
use crate::board::{Board, PieceId};
use crate::squareset::SquareSet;
use crate::types::PieceKind;

/// The legal destination squares for the given piece, computed from the
/// current board only. Never includes a square occupied by a same-color
/// piece.
pub fn legal_moves(board: &Board, id: PieceId) -> SquareSet {
    let state = match board.piece(id) {
        Some(state) => state,
        None => return SquareSet::none(),
    };

    let sq = state.square();
    let own = board.occupancy(state.color());
    match state.kind() {
        PieceKind::Pawn => pawn_moves(board, id),
        PieceKind::Knight => attacks::knight_attacks(sq).and(own.not()),
        PieceKind::King => attacks::king_attacks(sq).and(own.not()),
        PieceKind::Bishop => attacks::bishop_attacks(sq, board.all_occupancy()).and(own.not()),
        PieceKind::Rook => attacks::rook_attacks(sq, board.all_occupancy()).and(own.not()),
        PieceKind::Queen => attacks::queen_attacks(sq, board.all_occupancy()).and(own.not()),
    }
}

// Pawns are the one variant whose capturing moves differ from their quiet
// moves: one square forward if unoccupied (two if the pawn has never moved
// and both squares are clear), and diagonally forward only onto a square
// occupied by an enemy piece. No en passant.
fn pawn_moves(board: &Board, id: PieceId) -> SquareSet {
    let state = match board.piece(id) {
        Some(state) => state,
        None => return SquareSet::none(),
    };

    let color = state.color();
    let forward = color.forward();
    let all = board.all_occupancy();
    let mut moves = SquareSet::none();

    if let Some(one) = state.square().towards(forward) {
        if !all.test(one) {
            moves.set(one);

            if !state.has_moved() {
                if let Some(two) = one.towards(forward) {
                    if !all.test(two) {
                        moves.set(two);
                    }
                }
            }
        }
    }

    let captures = attacks::pawn_attacks(state.square(), color)
        .and(board.occupancy(color.toggle()));
    moves | captures
}
