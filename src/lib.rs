// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! gambit is a two-player chess rules engine: it maintains board state,
//! enumerates legal moves per piece, executes moves (including capture and
//! pawn promotion), and determines check and checkmate. Rendering, input
//! handling, and clocks are external collaborators that consume the `Game`
//! surface.

#[macro_use]
extern crate num_derive;
#[macro_use]
extern crate bitflags;
#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate log;

pub mod attacks;
mod board;
mod detector;
mod game;
mod movegen;
mod squareset;
mod types;

pub use board::{Board, FenParseError, MoveOutcome, PieceId, PieceState};
pub use detector::{CheckFlags, CheckmateDetector, DetectorError};
pub use game::{Game, GameError, GameResult, Player, WinReason};
pub use movegen::legal_moves;
pub use squareset::{SquareSet, SquareSetIterator};
pub use types::{Color, Direction, File, Piece, PieceKind, Rank, Square};
