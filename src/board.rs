// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The board: an 8x8 grid of squares plus two color-partitioned collections
//! of live pieces.
//!
//! Squares and pieces refer to one another through handles rather than
//! references: the square grid stores an optional `PieceId` into the piece
//! arena, and each arena entry stores the square its piece stands on. The
//! two must always agree; every mutation on this type maintains that
//! invariant, and a captured piece's arena slot is tombstoned so a stale id
//! can never resolve to a new piece.
use std::convert::TryFrom;
use std::fmt::{self, Write};

use crate::squareset::SquareSet;
use crate::types::{Color, File, Piece, PieceKind, Rank, Square, TableIndex, FILES, RANKS};

/// Possible errors that can arise when parsing a FEN piece-placement field
/// into a `Board`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FenParseError {
    UnexpectedEnd,
    UnexpectedRank,
    InvalidDigit,
    FileDoesNotSumToEight,
    UnknownPiece,
}

/// A handle to a live piece on a `Board`. Ids are only meaningful to the
/// board (or clone of it) that issued them.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct PieceId(usize);

/// A live piece's entry in the piece arena: what it is, where it stands,
/// and whether it has moved (which gates the pawn's two-square advance).
#[derive(Copy, Clone, Debug)]
pub struct PieceState {
    piece: Piece,
    square: Square,
    has_moved: bool,
}

impl PieceState {
    pub fn piece(&self) -> Piece {
        self.piece
    }

    pub fn kind(&self) -> PieceKind {
        self.piece.kind
    }

    pub fn color(&self) -> Color {
        self.piece.color
    }

    pub fn square(&self) -> Square {
        self.square
    }

    pub fn has_moved(&self) -> bool {
        self.has_moved
    }
}

/// What a committed move did, reported so callers can maintain
/// captured-piece lists and surface promotions.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MoveOutcome {
    pub captured: Option<Piece>,
    pub promoted: Option<PieceKind>,
}

#[derive(Clone, Debug)]
pub struct Board {
    squares: [Option<PieceId>; 64],
    pieces: Vec<Option<PieceState>>,
    by_color: [Vec<PieceId>; 2],
    occupancy: [SquareSet; 2],
}

impl Board {
    /// An empty board with no pieces on it.
    pub fn new() -> Board {
        Board {
            squares: [None; 64],
            pieces: Vec::new(),
            by_color: [Vec::new(), Vec::new()],
            occupancy: [SquareSet::none(); 2],
        }
    }

    /// The standard chess starting position.
    pub fn standard() -> Board {
        Board::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR").unwrap()
    }

    pub fn is_occupied(&self, square: Square) -> bool {
        self.squares[square.as_index()].is_some()
    }

    /// The id of the piece occupying the given square, if any.
    pub fn piece_at(&self, square: Square) -> Option<PieceId> {
        self.squares[square.as_index()]
    }

    /// Resolves a piece id. Returns `None` if the piece has been captured
    /// or replaced by promotion.
    pub fn piece(&self, id: PieceId) -> Option<&PieceState> {
        self.pieces.get(id.0).and_then(|slot| slot.as_ref())
    }

    /// The live pieces of one color, in no particular order.
    pub fn pieces_of(&self, color: Color) -> &[PieceId] {
        &self.by_color[color.as_index()]
    }

    /// The set of squares occupied by the given color.
    pub fn occupancy(&self, color: Color) -> SquareSet {
        self.occupancy[color.as_index()]
    }

    /// The set of squares occupied by either color.
    pub fn all_occupancy(&self) -> SquareSet {
        self.occupancy[0] | self.occupancy[1]
    }

    /// The king of the given color, if it is on the board.
    pub fn king(&self, color: Color) -> Option<PieceId> {
        self.by_color[color.as_index()]
            .iter()
            .copied()
            .find(|&id| self.piece(id).map_or(false, |st| st.kind() == PieceKind::King))
    }

    /// Places a piece on an empty square, adding it to its color's
    /// collection. Fails (returns `None`, no state change) if the square is
    /// already occupied; it is the caller's responsibility to remove the
    /// occupant first.
    pub fn place_piece(&mut self, square: Square, piece: Piece) -> Option<PieceId> {
        if self.is_occupied(square) {
            warn!("place_piece: {} is already occupied", square);
            return None;
        }

        self.place_piece_with_state(square, piece, false)
    }

    fn place_piece_with_state(
        &mut self,
        square: Square,
        piece: Piece,
        has_moved: bool,
    ) -> Option<PieceId> {
        let id = PieceId(self.pieces.len());
        self.pieces.push(Some(PieceState {
            piece,
            square,
            has_moved,
        }));
        self.squares[square.as_index()] = Some(id);
        self.by_color[piece.color.as_index()].push(id);
        self.occupancy[piece.color.as_index()].set(square);
        Some(id)
    }

    /// Removes the piece on the given square from the grid, its color
    /// collection, and the arena. Returns the removed piece, or `None` if
    /// the square was empty.
    pub fn remove_piece(&mut self, square: Square) -> Option<Piece> {
        let id = self.squares[square.as_index()].take()?;
        let state = self.pieces[id.0].take()?;
        debug_assert_eq!(square, state.square);
        self.by_color[state.color().as_index()].retain(|&other| other != id);
        self.occupancy[state.color().as_index()].unset(square);
        Some(state.piece)
    }

    /// Executes a move. The only legality check performed at this layer is
    /// that the destination is not occupied by a same-color piece; movement
    /// shape and king safety are the caller's responsibility, enforced
    /// before this is invoked.
    ///
    /// An opposite-color occupant of the destination is captured. A pawn
    /// landing on the farthest rank for its color is promoted: the pawn is
    /// discarded and a fresh piece of the chosen kind (Queen when no choice
    /// is supplied) takes its place on the destination square. The outcome
    /// reports both events.
    pub fn move_piece(
        &mut self,
        id: PieceId,
        destination: Square,
        promotion: Option<PieceKind>,
    ) -> Option<MoveOutcome> {
        let (piece, source) = match self.piece(id) {
            Some(state) => (state.piece, state.square),
            None => return None,
        };

        let captured = match self.piece_at(destination) {
            Some(occupant_id) => {
                let occupant = self.piece(occupant_id)?;
                if occupant.color() == piece.color {
                    debug!(
                        "move of {} {} to {} rejected: destination occupied by same color",
                        piece.color, piece.kind, destination
                    );
                    return None;
                }
                self.remove_piece(destination)
            }
            None => None,
        };

        // Vacate the source square.
        self.squares[source.as_index()] = None;
        self.occupancy[piece.color.as_index()].unset(source);

        let promoted = if piece.kind == PieceKind::Pawn
            && destination.rank() == piece.color.promotion_rank()
        {
            // The pawn is discarded and a fresh piece replaces it on the
            // destination square. The old id is dead from here on.
            self.pieces[id.0] = None;
            self.by_color[piece.color.as_index()].retain(|&other| other != id);

            let kind = match promotion {
                Some(PieceKind::Pawn) | Some(PieceKind::King) => {
                    warn!("invalid promotion choice; promoting to Queen instead");
                    PieceKind::Queen
                }
                Some(kind) => kind,
                None => PieceKind::Queen,
            };
            self.place_piece_with_state(destination, Piece::new(kind, piece.color), true);
            Some(kind)
        } else {
            let state = self.pieces[id.0]
                .as_mut()
                .expect("moving piece vanished from arena");
            state.square = destination;
            state.has_moved = true;
            self.squares[destination.as_index()] = Some(id);
            self.occupancy[piece.color.as_index()].set(destination);
            None
        };

        debug_assert!(self.grid_consistent());
        Some(MoveOutcome { captured, promoted })
    }

    // Invariant check used by debug assertions and tests: the square grid,
    // the piece arena, the color collections, and the occupancy sets must
    // all describe the same position.
    pub(crate) fn grid_consistent(&self) -> bool {
        for (idx, slot) in self.squares.iter().enumerate() {
            if let Some(id) = slot {
                match self.piece(*id) {
                    Some(state) if state.square.as_index() == idx => {}
                    _ => return false,
                }
            }
        }

        for color in &[Color::White, Color::Black] {
            let mut derived = SquareSet::none();
            for &id in self.pieces_of(*color) {
                let state = match self.piece(id) {
                    Some(state) => state,
                    None => return false,
                };
                if state.color() != *color || self.piece_at(state.square) != Some(id) {
                    return false;
                }
                derived.set(state.square);
            }
            if derived != self.occupancy(*color) {
                return false;
            }
        }

        true
    }
}

//
// FEN piece-placement parsing and generation. Only the placement field of a
// FEN record is understood here; whose turn it is belongs to the game, and
// the castling/en-passant/clock fields describe rules outside this engine.
//

impl Board {
    pub fn from_fen(placement: &str) -> Result<Board, FenParseError> {
        let mut board = Board::new();
        let mut ranks = placement.split('/');
        for &rank in RANKS.iter().rev() {
            let row = ranks.next().ok_or(FenParseError::UnexpectedEnd)?;
            let mut file = 0usize;
            for c in row.chars() {
                if let Some(digit) = c.to_digit(10) {
                    if digit < 1 || digit > 8 {
                        return Err(FenParseError::InvalidDigit);
                    }
                    file += digit as usize;
                    if file > 8 {
                        return Err(FenParseError::FileDoesNotSumToEight);
                    }
                    continue;
                }

                let piece = Piece::try_from(c).map_err(|_| FenParseError::UnknownPiece)?;
                if file >= 8 {
                    return Err(FenParseError::FileDoesNotSumToEight);
                }
                let square = Square::of(File::from_index(file), rank);

                // A pawn found off its home rank must have moved already,
                // so its two-square advance is spent.
                let home_rank = match piece.color {
                    Color::White => Rank::Two,
                    Color::Black => Rank::Seven,
                };
                let has_moved = piece.kind == PieceKind::Pawn && rank != home_rank;
                board.place_piece_with_state(square, piece, has_moved);
                file += 1;
            }

            if file != 8 {
                return Err(FenParseError::FileDoesNotSumToEight);
            }
        }

        if ranks.next().is_some() {
            return Err(FenParseError::UnexpectedRank);
        }

        Ok(board)
    }

    pub fn as_fen(&self) -> String {
        let mut buf = String::new();
        for &rank in RANKS.iter().rev() {
            let mut empty_squares = 0;
            for &file in &FILES {
                let square = Square::of(file, rank);
                match self.piece_at(square).and_then(|id| self.piece(id)) {
                    Some(state) => {
                        if empty_squares != 0 {
                            write!(&mut buf, "{}", empty_squares).unwrap();
                        }
                        write!(&mut buf, "{}", state.piece()).unwrap();
                        empty_squares = 0;
                    }
                    None => empty_squares += 1,
                }
            }

            if empty_squares != 0 {
                write!(&mut buf, "{}", empty_squares).unwrap();
            }

            if rank != Rank::One {
                buf.push('/');
            }
        }

        buf
    }
}

impl Default for Board {
    fn default() -> Board {
        Board::new()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for &rank in RANKS.iter().rev() {
            for &file in &FILES {
                let sq = Square::of(file, rank);
                match self.piece_at(sq).and_then(|id| self.piece(id)) {
                    Some(state) => write!(f, " {} ", state.piece())?,
                    None => write!(f, " . ")?,
                }
            }

            writeln!(f, "| {}", rank)?;
        }

        for _ in &FILES {
            write!(f, "---")?;
        }

        writeln!(f)?;
        for &file in &FILES {
            write!(f, " {} ", file)?;
        }

        writeln!(f)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Color, Piece, PieceKind, Square};

    #[test]
    fn place_and_query() {
        let mut board = Board::new();
        let id = board
            .place_piece(Square::E4, Piece::new(PieceKind::Rook, Color::White))
            .unwrap();

        assert!(board.is_occupied(Square::E4));
        assert_eq!(Some(id), board.piece_at(Square::E4));

        let state = board.piece(id).unwrap();
        assert_eq!(Square::E4, state.square());
        assert_eq!(PieceKind::Rook, state.kind());
        assert_eq!(Color::White, state.color());
        assert!(board.grid_consistent());
    }

    #[test]
    fn place_on_occupied_square_fails() {
        let mut board = Board::new();
        let id = board
            .place_piece(Square::E4, Piece::new(PieceKind::Rook, Color::White))
            .unwrap();

        assert!(board
            .place_piece(Square::E4, Piece::new(PieceKind::Knight, Color::Black))
            .is_none());

        // The original occupant is untouched.
        assert_eq!(Some(id), board.piece_at(Square::E4));
        assert_eq!(1, board.pieces_of(Color::White).len());
        assert_eq!(0, board.pieces_of(Color::Black).len());
    }

    #[test]
    fn remove_prunes_collection() {
        let mut board = Board::new();
        let id = board
            .place_piece(Square::C6, Piece::new(PieceKind::Bishop, Color::Black))
            .unwrap();

        let removed = board.remove_piece(Square::C6).unwrap();
        assert_eq!(Piece::new(PieceKind::Bishop, Color::Black), removed);
        assert!(!board.is_occupied(Square::C6));
        assert!(board.piece(id).is_none());
        assert!(board.pieces_of(Color::Black).is_empty());
        assert!(board.occupancy(Color::Black).empty());
    }

    #[test]
    fn move_to_same_color_square_fails() {
        let mut board = Board::new();
        let rook = board
            .place_piece(Square::A1, Piece::new(PieceKind::Rook, Color::White))
            .unwrap();
        board
            .place_piece(Square::A4, Piece::new(PieceKind::Pawn, Color::White))
            .unwrap();

        let before = board.as_fen();
        assert!(board.move_piece(rook, Square::A4, None).is_none());
        assert_eq!(before, board.as_fen());
        assert!(board.grid_consistent());
    }

    #[test]
    fn capture_removes_victim_everywhere() {
        let mut board = Board::new();
        let rook = board
            .place_piece(Square::A1, Piece::new(PieceKind::Rook, Color::White))
            .unwrap();
        let victim = board
            .place_piece(Square::A4, Piece::new(PieceKind::Knight, Color::Black))
            .unwrap();

        let outcome = board.move_piece(rook, Square::A4, None).unwrap();
        assert_eq!(
            Some(Piece::new(PieceKind::Knight, Color::Black)),
            outcome.captured
        );
        assert_eq!(None, outcome.promoted);

        assert!(board.piece(victim).is_none());
        assert!(board.pieces_of(Color::Black).is_empty());
        assert_eq!(Some(rook), board.piece_at(Square::A4));
        assert!(!board.is_occupied(Square::A1));
        assert!(board.grid_consistent());
    }

    #[test]
    fn move_sets_has_moved() {
        let mut board = Board::standard();
        let pawn = board.piece_at(Square::E2).unwrap();
        assert!(!board.piece(pawn).unwrap().has_moved());

        board.move_piece(pawn, Square::E4, None).unwrap();
        assert!(board.piece(pawn).unwrap().has_moved());
        assert_eq!(Square::E4, board.piece(pawn).unwrap().square());
    }

    #[test]
    fn standard_position_fen_round_trips() {
        let board = Board::standard();
        assert_eq!("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR", board.as_fen());
        assert_eq!(16, board.pieces_of(Color::White).len());
        assert_eq!(16, board.pieces_of(Color::Black).len());
        assert!(board.grid_consistent());
    }

    #[test]
    fn fen_pawn_off_home_rank_has_moved() {
        let board = Board::from_fen("8/8/8/8/4P3/8/4P3/8").unwrap();
        let advanced = board.piece_at(Square::E4).unwrap();
        let home = board.piece_at(Square::E2).unwrap();
        assert!(board.piece(advanced).unwrap().has_moved());
        assert!(!board.piece(home).unwrap().has_moved());
    }

    #[test]
    fn fen_bad_digit() {
        assert_eq!(
            Err(FenParseError::InvalidDigit),
            Board::from_fen("9/8/8/8/8/8/8/8").map(|_| ())
        );
    }

    #[test]
    fn fen_short_rank() {
        assert_eq!(
            Err(FenParseError::FileDoesNotSumToEight),
            Board::from_fen("pppp4/8/8/8/8/8/8/7").map(|_| ())
        );
    }

    #[test]
    fn fen_missing_rank() {
        assert_eq!(
            Err(FenParseError::UnexpectedEnd),
            Board::from_fen("8/8/8").map(|_| ())
        );
    }

    #[test]
    fn fen_unknown_piece() {
        assert_eq!(
            Err(FenParseError::UnknownPiece),
            Board::from_fen("z7/8/8/8/8/8/8/8").map(|_| ())
        );
    }

    mod promotion {
        use super::super::*;
        use crate::types::{Color, Piece, PieceKind, Square};

        #[test]
        fn auto_promotes_to_queen() {
            let mut board = Board::from_fen("8/4P3/8/8/8/8/8/8").unwrap();
            let pawn = board.piece_at(Square::E7).unwrap();

            let outcome = board.move_piece(pawn, Square::E8, None).unwrap();
            assert_eq!(Some(PieceKind::Queen), outcome.promoted);

            // The pawn id is dead; a fresh queen stands on the same square.
            assert!(board.piece(pawn).is_none());
            let queen = board.piece_at(Square::E8).unwrap();
            let state = board.piece(queen).unwrap();
            assert_eq!(PieceKind::Queen, state.kind());
            assert_eq!(Color::White, state.color());

            // The color collection was pruned and extended in one step.
            assert_eq!(1, board.pieces_of(Color::White).len());
            assert!(board.grid_consistent());
        }

        #[test]
        fn promotion_honors_choice() {
            let mut board = Board::from_fen("8/8/8/8/8/8/4p3/8").unwrap();
            let pawn = board.piece_at(Square::E2).unwrap();

            let outcome = board
                .move_piece(pawn, Square::E1, Some(PieceKind::Knight))
                .unwrap();
            assert_eq!(Some(PieceKind::Knight), outcome.promoted);

            let knight = board.piece_at(Square::E1).unwrap();
            assert_eq!(PieceKind::Knight, board.piece(knight).unwrap().kind());
            assert_eq!(Color::Black, board.piece(knight).unwrap().color());
        }

        #[test]
        fn promotion_capture() {
            let mut board = Board::from_fen("3r4/4P3/8/8/8/8/8/8").unwrap();
            let pawn = board.piece_at(Square::E7).unwrap();

            let outcome = board.move_piece(pawn, Square::D8, None).unwrap();
            assert_eq!(
                Some(Piece::new(PieceKind::Rook, Color::Black)),
                outcome.captured
            );
            assert_eq!(Some(PieceKind::Queen), outcome.promoted);
            assert!(board.pieces_of(Color::Black).is_empty());
            assert!(board.grid_consistent());
        }

        #[test]
        fn invalid_choice_falls_back_to_queen() {
            let mut board = Board::from_fen("8/4P3/8/8/8/8/8/8").unwrap();
            let pawn = board.piece_at(Square::E7).unwrap();

            let outcome = board
                .move_piece(pawn, Square::E8, Some(PieceKind::King))
                .unwrap();
            assert_eq!(Some(PieceKind::Queen), outcome.promoted);
        }
    }
}
