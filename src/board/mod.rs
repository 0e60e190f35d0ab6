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

//! Multi-variant draughts rule engine
//!
//! A _board_ represents the state of a draughts game and provides the
//! core mechanisms to enumerate legal continuations and advance positions
//! through moves. The following variants are supported:
//!
//! [x] International (standard) draughts on 10x10
//! [x] English/American checkers
//! [x] Italian draughts
//! [x] Russian and Brazilian draughts
//! [x] Turkish draughts (orthogonal movement, every square playable)
//! [x] Frisian and Frysk! (orthogonal captures, weighted capture values)
//! [x] Antidraughts (losing is winning)
//! [x] Breakthrough (first king wins)
//!
//! Some of the key abstractions include:
//!
//! * A [`Shape`] describes a variant's board geometry: how many squares
//!   there are, how the 1-based square indices map to rows and columns,
//!   and whether only every other cell is playable.
//!
//! * A [`Piece`] is a single man or king. Captured pieces stay in the
//!   arena as tombstones until the capturing turn completes, which is
//!   what stops a multi-capture from crossing the same square twice.
//!
//! * A [`Position`] owns the pieces plus a derived [`Searcher`] (indices
//!   by color, by square, filled and open squares). It executes single
//!   steps and tracks an unfinished multi-capture.
//!
//! * A [`Game`] composes a position with the per-variant legality
//!   filters (maximum capture, Frisian capture values, Italian king
//!   rules, the Russian completion rule), the draw and win conditions,
//!   and the history needed for undo and threefold detection. It works
//!   in internal square numbering.
//!
//! * A [`Board`] is the public face: it speaks the variant's published
//!   coordinate system (rotated or algebraic squares, English color
//!   swap) and deals in [`Move`] values that carry every supported
//!   notation at once.

use anyhow::Result;

mod fen;
mod material;
mod moves;
mod pdn;
mod play;
mod position;
mod square;
mod variant;

pub use fen::*;
pub use material::*;
pub use moves::*;
pub use pdn::*;
pub use play::*;
pub use position::*;
pub use square::*;
pub use variant::*;

pub trait Turn {
    fn turn(&self) -> Color;
}

/// A draughts game addressed in the variant's own coordinates.
///
/// The wrapped [`Game`] works on internal squares (numbered from the
/// starting player's far side); this type rotates squares, renders
/// algebraic coordinates where the variant reads that way, and swaps the
/// colors for English, whose published games start with Black.
#[derive(Debug, Clone)]
pub struct Board {
    variant: Variant,
    game: Game,
    initial_fen: String,
    move_stack: Vec<Move>,
    fens: Vec<String>,
}

impl Board {
    pub fn new(variant: Variant) -> Self {
        Self::wrap(variant, Game::new(variant))
    }

    /// Build from a list FEN in the variant's published coordinates, or
    /// `startpos`.
    pub fn from_fen(variant: Variant, fen: &str) -> Result<Self> {
        let game = if fen == "startpos" {
            Game::new(variant)
        } else {
            let internal = fen_from_variant(fen, variant)?;
            Game::from_fen(variant, &internal)?
        };
        Ok(Self::wrap(variant, game))
    }

    fn wrap(variant: Variant, game: Game) -> Self {
        let initial_fen = fen_to_variant(game.initial_list_fen(), variant)
            .expect("internal FENs convert");
        Self {
            variant,
            game,
            initial_fen: initial_fen.clone(),
            move_stack: Vec::new(),
            fens: vec![initial_fen],
        }
    }

    #[inline]
    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// The wrapped game, in internal coordinates.
    #[inline]
    pub fn game(&self) -> &Game {
        &self.game
    }

    #[inline]
    pub fn initial_fen(&self) -> &str {
        &self.initial_fen
    }

    /// The moves pushed so far, as they were pushed.
    #[inline]
    pub fn move_stack(&self) -> &[Move] {
        &self.move_stack
    }

    /// The list FEN of the current position, published coordinates.
    #[inline]
    pub fn fen(&self) -> &str {
        self.fens.last().unwrap()
    }

    #[inline]
    pub fn fens(&self) -> &[String] {
        &self.fens
    }

    fn outward(&self, color: Color) -> Color {
        if self.variant.flips_colors() {
            !color
        } else {
            color
        }
    }

    fn rotate_sequence(&self, sequence: &[Step]) -> Vec<Step> {
        sequence
            .iter()
            .map(|step| {
                Step::new(
                    rotate_square(self.variant, step.from),
                    rotate_square(self.variant, step.to),
                )
            })
            .collect()
    }

    /// The legal moves and their captures in published coordinates.
    pub fn legal_moves_board(&self) -> (Vec<Vec<Step>>, Vec<Vec<u8>>) {
        let (moves, captures) = self.game.legal_moves();
        let moves = moves
            .iter()
            .map(|sequence| self.rotate_sequence(sequence))
            .collect();
        let captures = captures
            .iter()
            .map(|captured| {
                captured
                    .iter()
                    .map(|&square| rotate_square(self.variant, square))
                    .collect()
            })
            .collect();
        (moves, captures)
    }

    /// The legal moves as fully cross-filled [`Move`] values.
    pub fn legal_moves(&self) -> Vec<Move> {
        let (moves, captures) = self.legal_moves_board();
        moves
            .iter()
            .map(|sequence| {
                Move::with_positions(
                    Some(self.variant),
                    &moves,
                    &captures,
                    MoveInput::Board(sequence.clone()),
                )
                .expect("own legal move resolves")
            })
            .collect()
    }

    /// Play a move. The move's `board_move` is in published coordinates,
    /// as produced by [`Board::legal_moves`] or [`Move::new`].
    pub fn push(&mut self, mv: &Move) -> Result<()> {
        if mv.is_null {
            self.null();
            return Ok(());
        }
        let internal = self.rotate_sequence(&mv.board_move);
        self.game.push(&internal)?;
        self.move_stack.push(mv.clone());
        self.fens
            .push(fen_to_variant(&self.game.list_fen(), self.variant)?);
        Ok(())
    }

    /// Parse a PDN move against the current position and play it.
    pub fn push_pdn(&mut self, pdn: &str) -> Result<Move> {
        let mv = Move::from_pdn(self, pdn)?;
        self.push(&mv)?;
        Ok(mv)
    }

    /// Pass the turn with the null move.
    pub fn null(&mut self) {
        self.game.null();
        self.move_stack.push(Move::null());
        self.fens.push(
            fen_to_variant(&self.game.list_fen(), self.variant).expect("internal FENs convert"),
        );
    }

    /// Undo the last pushed move.
    pub fn pop(&mut self) {
        if self.move_stack.pop().is_some() {
            self.fens.pop();
        }
        self.game.pop();
    }

    pub fn winner(&self) -> Option<Color> {
        self.game.winner().map(|color| self.outward(color))
    }

    pub fn result(&self) -> Option<crate::game::GameResult> {
        self.game.result().map(|result| match result {
            crate::game::GameResult::Win(color, reason) => {
                crate::game::GameResult::Win(self.outward(color), reason)
            }
            draw => draw,
        })
    }

    /// The PDN game-end marker for the current state, `*` while the
    /// game is still running.
    pub fn ending(&self) -> crate::game::GameEnding {
        match self.result() {
            Some(result) => crate::game::GameEnding::from_result(&result),
            None => crate::game::GameEnding::Unfinished,
        }
    }

    pub fn is_over(&self) -> bool {
        self.game.is_over()
    }

    pub fn is_draw(&self) -> bool {
        self.game.is_draw()
    }

    pub fn is_threefold(&self) -> bool {
        self.game.is_threefold()
    }

    /// A cheap copy re-derived from the current position; history and
    /// mid-chain state are lost.
    pub fn fork(&self) -> Self {
        Self::wrap(self.variant, self.game.fork())
    }
}

impl Turn for Board {
    fn turn(&self) -> Color {
        self.outward(self.game.turn())
    }
}
