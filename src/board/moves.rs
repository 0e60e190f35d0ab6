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

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use super::material::Color;
use super::position::Position;
use super::square::Direction;
use super::variant::Traits;
use super::Turn;

use Color::White;
use Direction::{Down, DownLeft, DownRight, Left, Right, Up, UpLeft, UpRight};

/// One slide or one jump. A multi-capture is a sequence of steps by the
/// same piece within one turn.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Step {
    pub from: u8,
    pub to: u8,
}

impl Step {
    /// The null-move sentinel. It collides with no real square index and
    /// is handled before any geometry math.
    pub const NULL: Step = Step { from: 0, to: 0 };

    pub const fn new(from: u8, to: u8) -> Self {
        Self { from, to }
    }

    #[inline]
    pub const fn is_null(&self) -> bool {
        self.from == 0 && self.to == 0
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.from, self.to)
    }
}

#[derive(Error, Debug)]
pub enum MoveError {
    #[error("illegal move {step} in position {fen}")]
    IllegalMove { step: Step, fen: String },
}

/// The forward vertical direction for a color. Black starts at the top of
/// the internal board and moves down.
fn vertical(color: Color, forward: bool) -> Direction {
    match (color, forward) {
        (White, true) | (Color::Black, false) => Up,
        _ => Down,
    }
}

/// The horizontal direction grouped with `forward` ray generation. It
/// mirrors between the colors so the union over both passes covers every
/// line exactly once.
fn horizontal(color: Color, forward: bool) -> Direction {
    match (color, forward) {
        (White, true) | (Color::Black, false) => Left,
        _ => Right,
    }
}

/// The two forward (or backward) diagonals for a color, left one first.
fn diagonals(color: Color, forward: bool) -> [Direction; 2] {
    match (color, forward) {
        (White, true) | (Color::Black, false) => [UpLeft, UpRight],
        _ => [DownLeft, DownRight],
    }
}

fn slide_directions(color: Color, king: bool, traits: &Traits) -> Vec<Direction> {
    if traits.orthogonal_moves {
        if king {
            vec![
                vertical(color, true),
                horizontal(color, true),
                vertical(color, false),
                horizontal(color, false),
            ]
        } else {
            vec![vertical(color, true), Left, Right]
        }
    } else if king {
        let [fl, fr] = diagonals(color, true);
        let [bl, br] = diagonals(color, false);
        vec![fl, fr, bl, br]
    } else {
        diagonals(color, true).to_vec()
    }
}

fn capture_directions(color: Color, king: bool, traits: &Traits) -> Vec<Direction> {
    if traits.orthogonal_moves {
        // Turkish: men never capture backwards, kings cover all four lines.
        if king {
            vec![
                vertical(color, true),
                horizontal(color, true),
                vertical(color, false),
                horizontal(color, false),
            ]
        } else {
            vec![vertical(color, true), Left, Right]
        }
    } else if traits.orthogonal_captures {
        // Frisian: captures run over all eight lines. Kings probe the
        // orthogonals column-first, men row-first.
        let [fl, fr] = diagonals(color, true);
        let [bl, br] = diagonals(color, false);
        let (vf, vb) = (vertical(color, true), vertical(color, false));
        let (hf, hb) = (horizontal(color, true), horizontal(color, false));
        if king {
            vec![hf, vf, fl, fr, hb, vb, bl, br]
        } else {
            vec![vf, hf, fl, fr, vb, hb, bl, br]
        }
    } else {
        let [fl, fr] = diagonals(color, true);
        if king || traits.man_captures_backwards {
            let [bl, br] = diagonals(color, false);
            vec![fl, fr, bl, br]
        } else {
            vec![fl, fr]
        }
    }
}

impl Position {
    /// All single steps currently playable: every capture jump if any
    /// exist (captures are forced), otherwise every slide. During a
    /// multi-capture only the chaining piece moves.
    pub fn possible_moves(&self, pending_captures: &[u8]) -> Vec<Step> {
        let captures = self.capture_moves(pending_captures);
        if captures.is_empty() {
            self.positional_moves()
        } else {
            captures
        }
    }

    pub fn capture_moves(&self, pending_captures: &[u8]) -> Vec<Step> {
        self.pieces_in_play()
            .into_iter()
            .flat_map(|index| self.piece_capture_steps(index, pending_captures))
            .collect()
    }

    pub fn positional_moves(&self) -> Vec<Step> {
        self.pieces_in_play()
            .into_iter()
            .flat_map(|index| self.piece_positional_steps(index))
            .collect()
    }

    /// How many pieces of `color` have at least one jump or slide.
    pub fn count_movable(&self, color: Color, pending_captures: &[u8]) -> usize {
        self.searcher()
            .pieces_of(color)
            .iter()
            .filter(|&&index| {
                !self.piece_capture_steps(index, pending_captures).is_empty()
                    || !self.piece_positional_steps(index).is_empty()
            })
            .count()
    }

    fn pieces_in_play(&self) -> Vec<usize> {
        match self.chaining_piece() {
            Some(index) => vec![index],
            None => self.searcher().pieces_of(self.turn()).to_vec(),
        }
    }

    pub(crate) fn piece_positional_steps(&self, index: usize) -> Vec<Step> {
        let piece = self.piece(index);
        let Some(from) = piece.position() else {
            return Vec::new();
        };
        let shape = *self.shape();
        let traits = *self.traits();
        let mut steps = Vec::new();

        let flying = piece.is_king() && traits.kings_fly;
        for direction in slide_directions(piece.color(), piece.is_king(), &traits) {
            let unit = direction.unit(&shape);
            let mut square = from;
            while let Some(next) = shape.offset(square, unit) {
                if !self.is_open(next) {
                    break;
                }
                steps.push(Step::new(from, next));
                if !flying {
                    break;
                }
                square = next;
            }
        }
        steps
    }

    pub(crate) fn piece_capture_steps(&self, index: usize, pending_captures: &[u8]) -> Vec<Step> {
        let piece = self.piece(index);
        let Some(from) = piece.position() else {
            return Vec::new();
        };
        let shape = *self.shape();
        let traits = *self.traits();

        // Squares captured earlier in the chain block the path. Turkish
        // kings may fly over them, but still may not reverse across the
        // most recent capture.
        let blocked: Vec<u8> = if traits.kings_hop_captured {
            pending_captures.last().copied().into_iter().collect()
        } else {
            pending_captures.to_vec()
        };

        let mut steps = Vec::new();
        for direction in capture_directions(piece.color(), piece.is_king(), &traits) {
            let unit = direction.unit(&shape);

            if !piece.is_king() || !traits.kings_fly {
                // Short jump: enemy adjacent, landing immediately behind.
                let Some(over) = shape.offset(from, unit) else {
                    continue;
                };
                let Some(enemy) = self.piece_at(over) else {
                    continue;
                };
                if enemy.color() == piece.color() {
                    continue;
                }
                if enemy.is_king() && !piece.is_king() && !traits.man_captures_kings {
                    continue;
                }
                let Some(landing) = shape.offset(over, unit) else {
                    continue;
                };
                if self.is_open(landing) && !blocked.contains(&landing) {
                    steps.push(Step::new(from, landing));
                }
            } else {
                // Flying jump: clear path to a single enemy, then every
                // open square beyond it.
                let mut square = from;
                let mut enemy = None;
                while let Some(next) = shape.offset(square, unit) {
                    if blocked.contains(&next) {
                        break;
                    }
                    match self.piece_at(next) {
                        None => square = next,
                        Some(other) if other.color() == piece.color() => break,
                        Some(_) => {
                            enemy = Some(next);
                            break;
                        }
                    }
                }
                let Some(mut landing) = enemy else {
                    continue;
                };
                while let Some(next) = shape.offset(landing, unit) {
                    if blocked.contains(&next) || !self.is_open(next) {
                        break;
                    }
                    steps.push(Step::new(from, next));
                    landing = next;
                }
            }
        }
        steps
    }

    /// The piece jumped by a capture step: the only occupied square
    /// strictly between `from` and `to` along their shared line.
    pub(crate) fn capture_target(&self, step: Step, pending_captures: &[u8]) -> Option<usize> {
        let shape = self.shape();
        let (fy, fx) = shape.to_visual(step.from);
        let (ty, tx) = shape.to_visual(step.to);
        let (dy, dx) = (ty - fy, tx - fx);
        let stride = if dy == 0 || dx == 0 {
            if shape.alternating() {
                2
            } else {
                1
            }
        } else {
            debug_assert_eq!(dy.abs(), dx.abs());
            1
        };
        let unit = (dy.signum() * stride, dx.signum() * stride);

        let (mut y, mut x) = (fy + unit.0, fx + unit.1);
        while (y, x) != (ty, tx) {
            let square = shape.from_visual(y, x)?;
            if let Some(index) = self.searcher().index_at(square) {
                debug_assert_ne!(self.piece(index).color(), self.piece_at(step.from)?.color());
                return Some(index);
            }
            debug_assert!(
                !pending_captures.contains(&square) || self.traits().kings_hop_captured
            );
            y += unit.0;
            x += unit.1;
        }
        None
    }
}
