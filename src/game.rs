// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The game: turn order, move-request validation, terminal outcomes, and
//! the two player records. This is the surface collaborators talk to: a
//! board view submits (square, destination) requests and renders whatever
//! the accessors expose, and a session clock signals timeouts.
use arrayvec::ArrayVec;
use std::fmt;

use crate::board::{Board, FenParseError};
use crate::detector::{CheckmateDetector, DetectorError};
use crate::movegen::legal_moves;
use crate::squareset::SquareSet;
use crate::types::{Color, Piece, PieceKind, Square, TableIndex};

/// Errors arising when assembling a game from parts.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GameError {
    Fen(FenParseError),
    Detector(DetectorError),
}

impl From<FenParseError> for GameError {
    fn from(err: FenParseError) -> GameError {
        GameError::Fen(err)
    }
}

impl From<DetectorError> for GameError {
    fn from(err: DetectorError) -> GameError {
        GameError::Detector(err)
    }
}

/// Why a finished game ended.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum WinReason {
    Checkmate,
    Timeout,
}

/// A terminal result: who won and why.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GameResult {
    pub winner: Color,
    pub reason: WinReason,
}

impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.reason {
            WinReason::Checkmate => write!(f, "{} wins by checkmate", self.winner),
            WinReason::Timeout => write!(f, "{} wins on time", self.winner),
        }
    }
}

/// One player's record. Time budgets belong to the session collaborator,
/// not to the rules engine.
#[derive(Clone, Debug)]
pub struct Player {
    name: String,
    captured: ArrayVec<[Piece; 15]>,
}

impl Player {
    fn new(name: &str) -> Player {
        Player {
            name: name.to_owned(),
            captured: ArrayVec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The enemy pieces this player has captured, in capture order.
    pub fn captured(&self) -> &[Piece] {
        &self.captured
    }
}

/// A game in progress (or finished). The turn flag and the optional result
/// together form the turn state machine: a move request is accepted only
/// when there is no result yet and the moving piece matches the turn.
pub struct Game {
    board: Board,
    detector: CheckmateDetector,
    turn: Color,
    result: Option<GameResult>,
    players: [Player; 2],
}

impl Game {
    /// A game from the standard starting position.
    pub fn new(white_name: &str, black_name: &str) -> Game {
        let board = Board::standard();
        let detector =
            CheckmateDetector::new(&board).expect("standard position has both kings");
        Game {
            board,
            detector,
            turn: Color::White,
            result: None,
            players: [Player::new(white_name), Player::new(black_name)],
        }
    }

    /// A game from an arbitrary position given as a FEN piece-placement
    /// field plus the side to move. Fails if the placement does not parse
    /// or lacks a king.
    pub fn from_fen(placement: &str, turn: Color) -> Result<Game, GameError> {
        let board = Board::from_fen(placement)?;
        let detector = CheckmateDetector::new(&board)?;
        Ok(Game {
            board,
            detector,
            turn,
            result: None,
            players: [Player::new("White"), Player::new("Black")],
        })
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn turn(&self) -> Color {
        self.turn
    }

    /// The terminal result, once the game is over.
    pub fn result(&self) -> Option<GameResult> {
        self.result
    }

    pub fn is_over(&self) -> bool {
        self.result.is_some()
    }

    pub fn in_check(&self, color: Color) -> bool {
        self.detector.check_flag(color)
    }

    pub fn player(&self, color: Color) -> &Player {
        &self.players[color.as_index()]
    }

    /// The destinations the piece on the given square may actually move to
    /// this turn: its raw legal moves filtered through the king-safety
    /// oracle. Empty when the square is empty, the piece is off-turn, or
    /// the game is over.
    pub fn destinations(&self, square: Square) -> SquareSet {
        if self.result.is_some() {
            return SquareSet::none();
        }

        let id = match self.board.piece_at(square) {
            Some(id) => id,
            None => return SquareSet::none(),
        };
        match self.board.piece(id) {
            Some(state) if state.color() == self.turn => {}
            _ => return SquareSet::none(),
        }

        let mut destinations = SquareSet::none();
        for destination in legal_moves(&self.board, id) {
            if self.detector.test_move(&self.board, id, destination) {
                destinations.set(destination);
            }
        }

        destinations
    }

    /// The union of every allowable destination for the side to move; the
    /// highlight set a board view intersects with a piece's raw legal
    /// moves.
    pub fn allowable_squares(&self) -> SquareSet {
        if self.result.is_some() {
            return SquareSet::none();
        }

        self.detector.allowable_squares(&self.board, self.turn)
    }

    /// Submits a move request for the piece on `source`. Promotions, if
    /// the move triggers one, go to a Queen.
    pub fn request_move(&mut self, source: Square, destination: Square) -> bool {
        self.request_move_promoting(source, destination, None)
    }

    /// Submits a move request with an explicit promotion choice. The
    /// choice is consulted only if the move actually promotes; `None`
    /// means Queen.
    ///
    /// Returns false (leaving every observable piece of state unchanged)
    /// if the game is over, the source square is empty or holds an
    /// off-turn piece, the destination is not among the piece's legal
    /// moves, or the move would leave the mover's own king attacked.
    pub fn request_move_promoting(
        &mut self,
        source: Square,
        destination: Square,
        promotion: Option<PieceKind>,
    ) -> bool {
        if self.result.is_some() {
            debug!("move {} -> {} rejected: game is over", source, destination);
            return false;
        }

        let id = match self.board.piece_at(source) {
            Some(id) => id,
            None => {
                debug!("move {} -> {} rejected: no piece", source, destination);
                return false;
            }
        };
        let mover = match self.board.piece(id) {
            Some(state) => state.piece(),
            None => return false,
        };
        if mover.color != self.turn {
            debug!(
                "move {} -> {} rejected: it is {}'s turn",
                source, destination, self.turn
            );
            return false;
        }

        if !legal_moves(&self.board, id).test(destination) {
            debug!(
                "move {} -> {} rejected: not a legal {} move",
                source, destination, mover.kind
            );
            return false;
        }

        if !self.detector.test_move(&self.board, id, destination) {
            debug!(
                "move {} -> {} rejected: would leave {}'s king attacked",
                source, destination, mover.color
            );
            return false;
        }

        let outcome = match self.board.move_piece(id, destination, promotion) {
            Some(outcome) => outcome,
            None => return false,
        };
        if let Some(captured) = outcome.captured {
            self.players[mover.color.as_index()].captured.push(captured);
        }

        // The turn toggles before the post-move evaluation: checkmate is a
        // property of the side now to move, not the side that just moved.
        self.turn = self.turn.toggle();
        self.detector.update(&self.board);

        if self.detector.checkmated(&self.board, self.turn) {
            let result = GameResult {
                winner: self.turn.toggle(),
                reason: WinReason::Checkmate,
            };
            info!("{}", result);
            self.result = Some(result);
        } else if self.detector.check_flag(self.turn) {
            info!("{} king is in check", self.turn);
        }

        true
    }

    /// Signal from the session collaborator that a color's clock ran out.
    /// Unconditionally ends the game in favor of the other color, unless
    /// the game is already over; a finished game's result is never
    /// overwritten.
    pub fn timeout(&mut self, color: Color) {
        if self.result.is_some() {
            debug!("timeout for {} ignored: game is already over", color);
            return;
        }

        let result = GameResult {
            winner: color.toggle(),
            reason: WinReason::Timeout,
        };
        info!("{}", result);
        self.result = Some(result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Square;

    #[test]
    fn result_strings() {
        let mate = GameResult {
            winner: Color::White,
            reason: WinReason::Checkmate,
        };
        assert_eq!("White wins by checkmate", mate.to_string());

        let flag = GameResult {
            winner: Color::Black,
            reason: WinReason::Timeout,
        };
        assert_eq!("Black wins on time", flag.to_string());
    }

    #[test]
    fn captures_recorded_per_player() {
        let mut game = Game::from_fen("4k3/8/8/3p4/4P3/8/8/4K3", Color::White).unwrap();
        assert!(game.request_move(Square::E4, Square::D5));
        assert_eq!(
            &[Piece::new(PieceKind::Pawn, Color::Black)][..],
            game.player(Color::White).captured()
        );
        assert!(game.player(Color::Black).captured().is_empty());
    }
}
