// Copyright 2026 Tobin Edwards
//
//    Licensed under the Apache License, Version 2.0 (the "License");
//    you may not use this file except in compliance with the License.
//    You may obtain a copy of the License at
//
//        http://www.apache.org/licenses/LICENSE-2.0
//
//    Unless required by applicable law or agreed to in writing, software
//    distributed under the License is distributed on an "AS IS" BASIS,
//    WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//    See the License for the specific language governing permissions and
//    limitations under the License.

use std::collections::{HashMap, HashSet};
use std::fmt;

use super::fen::FenError;
use super::material::{Color, Pair, Piece};
use super::moves::Step;
use super::square::Shape;
use super::variant::{Traits, Variant};
use super::Turn;

use Color::{Black, White};

/// Derived lookup structures over the piece arena. Rebuilt in full after
/// every mutation and read-only in between.
#[derive(Debug, Clone, Default)]
pub struct Searcher {
    filled: HashSet<u8>,
    open: HashSet<u8>,
    by_color: Pair<Vec<usize>>,
    at: HashMap<u8, usize>,
}

impl Searcher {
    fn build(pieces: &[Piece], total: u8) -> Self {
        let mut searcher = Searcher::default();
        let mut uncaptured: Vec<usize> = (0..pieces.len())
            .filter(|&i| !pieces[i].is_captured())
            .collect();
        uncaptured.sort_by_key(|&i| pieces[i].position().unwrap_or(0));

        for &index in &uncaptured {
            let piece = &pieces[index];
            let position = piece.position().expect("uncaptured piece has a position");
            searcher.filled.insert(position);
            searcher.by_color[piece.color()].push(index);
            let previous = searcher.at.insert(position, index);
            debug_assert!(previous.is_none(), "two pieces share square {position}");
        }
        searcher.open = (1..=total)
            .filter(|square| !searcher.filled.contains(square))
            .collect();
        searcher
    }

    #[inline]
    pub fn filled_positions(&self) -> &HashSet<u8> {
        &self.filled
    }
    #[inline]
    pub fn open_positions(&self) -> &HashSet<u8> {
        &self.open
    }

    /// Indices of the uncaptured pieces of one color, in square order.
    #[inline]
    pub fn pieces_of(&self, color: Color) -> &[usize] {
        &self.by_color[color]
    }

    #[inline]
    pub fn index_at(&self, square: u8) -> Option<usize> {
        self.at.get(&square).copied()
    }
}

/// The state of a draughts board: the piece arena, whose turn it is, and
/// the mid-multi-capture bookkeeping.
///
/// Squares are internal (unrotated) indices; conversion to a variant's
/// published numbering happens at the [`crate::Board`] boundary.
#[derive(Debug, Clone)]
pub struct Position {
    variant: Variant,
    shape: Shape,
    traits: Traits,
    pieces: Vec<Piece>,
    searcher: Searcher,
    turn: Color,
    chaining: Option<usize>,
    previous_was_capture: bool,
}

impl Position {
    /// The starting position of a variant.
    pub fn new(variant: Variant) -> Self {
        let shape = variant.shape();
        let (white, black): (Vec<u8>, Vec<u8>) = match variant {
            Variant::Turkish => ((41..=56).collect(), (9..=24).collect()),
            _ => {
                let count = shape.per_row() * variant.rows_with_pieces();
                (
                    (shape.total() - count + 1..=shape.total()).collect(),
                    (1..=count).collect(),
                )
            }
        };
        let mut pieces = Vec::with_capacity(white.len() + black.len());
        pieces.extend(black.into_iter().map(|square| Piece::man(Black, square)));
        pieces.extend(white.into_iter().map(|square| Piece::man(White, square)));
        Self::with_pieces(variant, pieces, White)
    }

    pub(crate) fn with_pieces(variant: Variant, pieces: Vec<Piece>, turn: Color) -> Self {
        let shape = variant.shape();
        let searcher = Searcher::build(&pieces, shape.total());
        Self {
            variant,
            shape,
            traits: variant.traits(),
            pieces,
            searcher,
            turn,
            chaining: None,
            previous_was_capture: false,
        }
    }

    /// Parse a dense FEN: a side letter followed by one cell letter
    /// (`e`, `w`, `W`, `b`, `B`) per playable square in index order.
    /// Trailing empty cells may be omitted.
    pub fn from_dense_fen(variant: Variant, fen: &str) -> Result<Self, FenError> {
        let shape = variant.shape();
        let mut chars = fen.chars();
        let turn = match chars.next() {
            Some('W') | Some('w') => White,
            Some('B') | Some('b') => Black,
            _ => {
                return Err(FenError::BadSide {
                    fen: fen.to_string(),
                })
            }
        };
        let mut pieces = Vec::new();
        for (index, cell) in chars.enumerate() {
            if index >= shape.total() as usize {
                return Err(FenError::BadLength {
                    fen: fen.to_string(),
                    expected: shape.total() as usize + 1,
                });
            }
            let square = index as u8 + 1;
            let piece = match cell {
                'e' => None,
                'w' => Some(Piece::man(White, square)),
                'W' => Some(Piece::king(White, square)),
                'b' => Some(Piece::man(Black, square)),
                'B' => Some(Piece::king(Black, square)),
                found => {
                    return Err(FenError::BadCell {
                        fen: fen.to_string(),
                        at: index + 1,
                        found,
                    })
                }
            };
            pieces.extend(piece);
        }
        Ok(Self::with_pieces(variant, pieces, turn))
    }

    /// Emit the dense FEN of the current position. This is the string the
    /// threefold detector counts.
    pub fn dense_fen(&self) -> String {
        let mut fen = String::with_capacity(self.shape.total() as usize + 1);
        fen.push(match self.turn {
            White => 'W',
            Black => 'B',
        });
        for square in self.shape.squares() {
            let cell = match self.piece_at(square) {
                None => 'e',
                Some(piece) => match (piece.color(), piece.is_king()) {
                    (White, false) => 'w',
                    (White, true) => 'W',
                    (Black, false) => 'b',
                    (Black, true) => 'B',
                },
            };
            fen.push(cell);
        }
        fen
    }

    /// Emit the sparse list FEN (internal numbering, index order).
    pub fn list_fen(&self) -> String {
        let mut white = Vec::new();
        let mut black = Vec::new();
        for square in self.shape.squares() {
            if let Some(piece) = self.piece_at(square) {
                let entry = if piece.is_king() {
                    format!("K{square}")
                } else {
                    square.to_string()
                };
                match piece.color() {
                    White => white.push(entry),
                    Black => black.push(entry),
                }
            }
        }
        let side = match self.turn {
            White => 'W',
            Black => 'B',
        };
        format!("{}:W{}:B{}", side, white.join(","), black.join(","))
    }

    #[inline]
    pub fn variant(&self) -> Variant {
        self.variant
    }
    #[inline]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }
    #[inline]
    pub fn traits(&self) -> &Traits {
        &self.traits
    }
    #[inline]
    pub fn searcher(&self) -> &Searcher {
        &self.searcher
    }
    #[inline]
    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }
    #[inline]
    pub fn piece(&self, index: usize) -> &Piece {
        &self.pieces[index]
    }

    #[inline]
    pub fn piece_at(&self, square: u8) -> Option<&Piece> {
        self.searcher.index_at(square).map(|i| &self.pieces[i])
    }

    #[inline]
    pub fn is_open(&self, square: u8) -> bool {
        self.searcher.open.contains(&square)
    }

    /// Index of the piece that must continue an unfinished multi-capture.
    #[inline]
    pub fn chaining_piece(&self) -> Option<usize> {
        self.chaining
    }

    #[inline]
    pub fn previous_move_was_capture(&self) -> bool {
        self.previous_was_capture
    }

    /// The row on which a man of `color` is crowned.
    #[inline]
    pub(crate) fn crown_row(&self, color: Color) -> i16 {
        match color {
            White => 0,
            Black => self.shape.rows() as i16 - 1,
        }
    }

    pub(crate) fn switch_turn(&mut self) {
        self.turn = !self.turn;
    }

    /// Execute one slide or one jump. Jumps flag the enemy captured, move
    /// the piece, evaluate crowning, and decide whether the chain goes on;
    /// slides just move and pass the turn. Returns the captured square.
    ///
    /// The step must come from `possible_moves(pending_captures)`; the
    /// caller validates.
    pub fn apply_step(&mut self, step: Step, ply: u32, pending_captures: &[u8]) -> Option<u8> {
        if self.capture_moves(pending_captures).contains(&step) {
            Some(self.perform_capture(step, ply, pending_captures))
        } else {
            self.perform_slide(step, ply);
            None
        }
    }

    fn perform_capture(&mut self, step: Step, ply: u32, pending_captures: &[u8]) -> u8 {
        self.previous_was_capture = true;
        let mover = self
            .searcher
            .index_at(step.from)
            .expect("capture step starts at a piece");
        let was_king = self.pieces[mover].is_king();

        let enemy = self
            .capture_target(step, pending_captures)
            .expect("capture step jumps an enemy");
        let enemy_square = self.pieces[enemy].position().unwrap();
        self.pieces[enemy].capture();
        self.move_piece(step, ply);

        let mut chain_captures = pending_captures.to_vec();
        chain_captures.push(enemy_square);

        let continuations: Vec<Step>;
        if !was_king && self.pieces[mover].is_king() && self.traits.crowning_ends_capture {
            continuations = Vec::new();
        } else if !was_king && !self.traits.crowning_continues_capture {
            // A man crowned mid-chain keeps capturing as a man; the crown
            // only sticks if the chain ends here.
            let crowned = self.pieces[mover].is_king();
            self.pieces[mover].set_king(false);
            continuations = self.continuations_from(step.to, &chain_captures);
            if continuations.is_empty() && crowned {
                self.pieces[mover].set_king(true);
            }
        } else {
            continuations = self.continuations_from(step.to, &chain_captures);
        }

        if continuations.is_empty() {
            self.chaining = None;
            self.switch_turn();
        } else {
            self.chaining = Some(mover);
        }
        enemy_square
    }

    fn continuations_from(&self, square: u8, captures: &[u8]) -> Vec<Step> {
        self.capture_moves(captures)
            .into_iter()
            .filter(|step| step.from == square)
            .collect()
    }

    fn perform_slide(&mut self, step: Step, ply: u32) {
        self.previous_was_capture = false;
        self.move_piece(step, ply);
        self.switch_turn();
    }

    fn move_piece(&mut self, step: Step, ply: u32) {
        let index = self
            .searcher
            .index_at(step.from)
            .expect("moved piece exists");
        self.pieces[index].advance(step.to);
        if self.shape.row(step.to) == self.crown_row(self.pieces[index].color()) {
            self.pieces[index].crown(ply);
        }
        self.rebuild();
    }

    pub(crate) fn rebuild(&mut self) {
        self.searcher = Searcher::build(&self.pieces, self.shape.total());
        debug_assert_eq!(
            self.searcher.filled.len() + self.searcher.open.len(),
            self.shape.total() as usize
        );
    }
}

impl Turn for Position {
    #[inline]
    fn turn(&self) -> Color {
        self.turn
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = if self.shape.alternating() {
            2 * self.shape.per_row() as i16
        } else {
            self.shape.per_row() as i16
        };
        for row in 0..self.shape.rows() as i16 {
            for vcol in 0..width {
                let cell = match self.shape.from_visual(row, vcol) {
                    None => ' ',
                    Some(square) => match self.piece_at(square) {
                        None => '.',
                        Some(piece) => match (piece.color(), piece.is_king()) {
                            (White, false) => 'w',
                            (White, true) => 'W',
                            (Black, false) => 'b',
                            (Black, true) => 'B',
                        },
                    },
                };
                write!(f, "{cell}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
