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

use anyhow::Result;

use super::fen::{position_from_list_fen, FenError};
use super::material::Color;
use super::moves::{MoveError, Step};
use super::pdn::{sort_captures, Move};
use super::position::Position;
use super::variant::Variant;
use super::Turn;
use crate::game::{DrawReason, GameResult, WinReason};

use Color::{Black, White};
use Variant::{Antidraughts, Brazilian, Breakthrough, English, Frisian, Frysk, Italian, Russian,
    Standard, Turkish};

// Frisian capture values, scaled so chains compare exactly: a king
// outweighs an equal count of men, but never one extra man.
const MAN_VALUE: u32 = 1000;
const KING_VALUE: u32 = 1501;

/// The long diagonal of the 8x8 boards, for the Russian endgame rules.
const LONG_DIAGONAL: [u8; 8] = [4, 8, 11, 15, 18, 22, 25, 29];

#[derive(Debug, Clone)]
enum ReversibleChange {
    Appended,
    Cleared(Vec<Move>),
    Untouched,
}

/// Everything needed to rewind one completed turn.
#[derive(Debug, Clone)]
struct TurnRecord {
    chain: usize,
    moves_since_last_capture: u32,
    last_irreversible_fen: String,
    reversible: ReversibleChange,
}

#[derive(Debug, Clone, Copy, Default)]
struct Census {
    men: usize,
    kings: usize,
}

impl Census {
    fn total(&self) -> usize {
        self.men + self.kings
    }
}

/// A complete game: a [`Position`] plus per-variant legality selection,
/// termination checks and the history needed for undo and threefold
/// detection. Squares are internal; [`crate::Board`] adds the variant's
/// published coordinates on top.
#[derive(Debug, Clone)]
pub struct Game {
    variant: Variant,
    position: Position,
    initial_fen: String,
    initial_list_fen: String,
    ply_steps: Vec<Step>,
    move_stack: Vec<Move>,
    capture_stack: Vec<Vec<u8>>,
    pending_steps: Vec<Step>,
    pending_captures: Vec<u8>,
    reversible_moves: Vec<Move>,
    last_irreversible_fen: String,
    fen_history: Vec<String>,
    moves_since_last_capture: u32,
    turn_start_msc: u32,
    records: Vec<TurnRecord>,
}

impl Game {
    pub fn new(variant: Variant) -> Self {
        Self::from_position(variant, Position::new(variant))
    }

    /// Accepts `startpos`, a list FEN (internal numbering) or a dense FEN.
    pub fn from_fen(variant: Variant, fen: &str) -> Result<Self, FenError> {
        let position = if fen == "startpos" {
            Position::new(variant)
        } else if fen.contains(':') {
            position_from_list_fen(variant, fen)?
        } else {
            Position::from_dense_fen(variant, fen)?
        };
        Ok(Self::from_position(variant, position))
    }

    fn from_position(variant: Variant, position: Position) -> Self {
        let initial_fen = position.dense_fen();
        let initial_list_fen = position.list_fen();
        Self {
            variant,
            position,
            initial_fen: initial_fen.clone(),
            initial_list_fen: initial_list_fen.clone(),
            ply_steps: Vec::new(),
            move_stack: Vec::new(),
            capture_stack: Vec::new(),
            pending_steps: Vec::new(),
            pending_captures: Vec::new(),
            reversible_moves: Vec::new(),
            last_irreversible_fen: initial_list_fen,
            fen_history: vec![initial_fen],
            moves_since_last_capture: 0,
            turn_start_msc: 0,
            records: Vec::new(),
        }
    }

    #[inline]
    pub fn variant(&self) -> Variant {
        self.variant
    }
    #[inline]
    pub fn position(&self) -> &Position {
        &self.position
    }
    #[inline]
    pub fn initial_fen(&self) -> &str {
        &self.initial_fen
    }
    #[inline]
    pub fn initial_list_fen(&self) -> &str {
        &self.initial_list_fen
    }
    /// Every executed step, one entry per jump of a multi-capture.
    #[inline]
    pub fn ply_steps(&self) -> &[Step] {
        &self.ply_steps
    }
    #[inline]
    pub fn move_stack(&self) -> &[Move] {
        &self.move_stack
    }
    #[inline]
    pub fn capture_stack(&self) -> &[Vec<u8>] {
        &self.capture_stack
    }
    #[inline]
    pub fn reversible_moves(&self) -> &[Move] {
        &self.reversible_moves
    }
    #[inline]
    pub fn fen_history(&self) -> &[String] {
        &self.fen_history
    }
    #[inline]
    pub fn moves_since_last_capture(&self) -> u32 {
        self.moves_since_last_capture
    }
    #[inline]
    pub fn last_irreversible_fen(&self) -> &str {
        &self.last_irreversible_fen
    }
    #[inline]
    pub fn pending_captures(&self) -> &[u8] {
        &self.pending_captures
    }
    #[inline]
    pub fn mid_chain(&self) -> bool {
        !self.pending_steps.is_empty()
    }

    /// The dense FEN of the current position.
    pub fn fen(&self) -> String {
        self.position.dense_fen()
    }

    /// The list FEN of the current position (internal numbering).
    pub fn list_fen(&self) -> String {
        self.position.list_fen()
    }

    /// The single steps playable right now, honoring the forced-capture
    /// rule and any multi-capture in progress.
    pub fn possible_moves(&self) -> Vec<Step> {
        self.position.possible_moves(&self.pending_captures)
    }

    /// Every maximal pseudo-legal step sequence, with the squares each one
    /// captures. Maximal means the chain runs until the turn would pass;
    /// the variant's selection rules are not yet applied.
    pub fn sequences(&self) -> (Vec<Vec<Step>>, Vec<Vec<u8>>) {
        let turn = self.position.turn();
        let mut sequences = Vec::new();
        let mut captures = Vec::new();
        for step in self.possible_moves() {
            let mut probe = self.clone();
            let captured = probe
                .push_step(step)
                .expect("possible step always applies");
            if probe.position.turn() == turn {
                let (continuations, more_captures) = probe.sequences();
                for (rest, rest_captures) in continuations.into_iter().zip(more_captures) {
                    let mut sequence = vec![step];
                    sequence.extend(rest);
                    sequences.push(sequence);
                    let mut chain = vec![captured.unwrap()];
                    chain.extend(rest_captures);
                    captures.push(chain);
                }
            } else {
                sequences.push(vec![step]);
                captures.push(captured.into_iter().collect());
            }
        }
        (sequences, captures)
    }

    /// The legal move sequences after the variant's selection rules.
    pub fn legal_moves(&self) -> (Vec<Vec<Step>>, Vec<Vec<u8>>) {
        let (moves, captures) = self.sequences();
        if moves.is_empty() {
            return (moves, captures);
        }
        match self.variant {
            Frisian | Frysk => self.frisian_selection(moves, captures),
            Italian => self.italian_selection(moves, captures),
            Russian => russian_selection(moves, captures),
            English => (moves, captures),
            _ => longest_only(moves, captures),
        }
    }

    /// Execute one step. Errors if the step is not currently playable;
    /// nothing changes in that case.
    pub fn push_step(&mut self, step: Step) -> Result<Option<u8>> {
        if step.is_null() || !self.possible_moves().contains(&step) {
            return Err(MoveError::IllegalMove {
                step,
                fen: self.position.dense_fen(),
            }
            .into());
        }
        if self.pending_steps.is_empty() {
            self.turn_start_msc = self.moves_since_last_capture;
        }
        let turn = self.position.turn();
        let ply = self.move_stack.len() as u32 + 1;
        let captured = self.position.apply_step(step, ply, &self.pending_captures);
        self.ply_steps.push(step);
        self.moves_since_last_capture = if self.position.previous_move_was_capture() {
            0
        } else {
            self.moves_since_last_capture + 1
        };

        if self.position.turn() == turn {
            self.pending_steps.push(step);
            self.pending_captures
                .push(captured.expect("an open chain always captured"));
        } else {
            let mut chain = std::mem::take(&mut self.pending_steps);
            chain.push(step);
            let mut captures = std::mem::take(&mut self.pending_captures);
            captures.extend(captured);
            self.finish_turn(chain, captures);
        }
        Ok(captured)
    }

    /// Execute a full turn: one slide, a complete capture chain, or the
    /// null-move sentinel. Returns the captured squares in jump order.
    pub fn push(&mut self, steps: &[Step]) -> Result<Vec<u8>> {
        if steps.len() == 1 && steps[0].is_null() {
            self.null();
            return Ok(Vec::new());
        }
        let mut captured = Vec::new();
        for &step in steps {
            captured.extend(self.push_step(step)?);
        }
        Ok(captured)
    }

    fn finish_turn(&mut self, chain: Vec<Step>, captures: Vec<u8>) {
        let from = chain[0].from;
        let to = chain.last().unwrap().to;
        let hub = format!("{from:02}{to:02}{}", sort_captures(&captures));
        let mv = Move::pseudolegal(chain.clone(), hub, !captures.is_empty());

        let slide_by_king = captures.is_empty()
            && self
                .position
                .piece_at(to)
                .is_some_and(|piece| piece.is_king());
        let record = TurnRecord {
            chain: chain.len(),
            moves_since_last_capture: self.turn_start_msc,
            last_irreversible_fen: self.last_irreversible_fen.clone(),
            reversible: if slide_by_king {
                ReversibleChange::Appended
            } else {
                ReversibleChange::Cleared(std::mem::take(&mut self.reversible_moves))
            },
        };
        if slide_by_king {
            self.reversible_moves.push(mv.clone());
        } else {
            self.last_irreversible_fen = self.position.list_fen();
        }
        self.records.push(record);
        self.move_stack.push(mv);
        self.capture_stack.push(captures);
        self.fen_history.push(self.position.dense_fen());
    }

    /// Pass the turn without moving. Recorded as the `[[0,0]]` sentinel;
    /// no counter changes.
    pub fn null(&mut self) {
        self.position.switch_turn();
        self.ply_steps.push(Step::NULL);
        self.records.push(TurnRecord {
            chain: 1,
            moves_since_last_capture: self.moves_since_last_capture,
            last_irreversible_fen: self.last_irreversible_fen.clone(),
            reversible: ReversibleChange::Untouched,
        });
        self.move_stack.push(Move::null());
        self.capture_stack.push(Vec::new());
        self.fen_history.push(self.position.dense_fen());
    }

    /// Undo one completed turn. An unfinished multi-capture is discarded
    /// instead; with nothing to undo this is a no-op.
    pub fn pop(&mut self) {
        if !self.pending_steps.is_empty() {
            for _ in 0..self.pending_steps.len() {
                self.ply_steps.pop();
            }
            self.pending_steps.clear();
            self.pending_captures.clear();
            self.position = Position::from_dense_fen(self.variant, self.fen_history.last().unwrap())
                .expect("history FENs parse");
            self.moves_since_last_capture = self.turn_start_msc;
            return;
        }
        let Some(record) = self.records.pop() else {
            return;
        };
        self.fen_history.pop();
        self.position = Position::from_dense_fen(self.variant, self.fen_history.last().unwrap())
            .expect("history FENs parse");
        self.move_stack.pop();
        self.capture_stack.pop();
        for _ in 0..record.chain {
            self.ply_steps.pop();
        }
        self.moves_since_last_capture = record.moves_since_last_capture;
        self.last_irreversible_fen = record.last_irreversible_fen;
        match record.reversible {
            ReversibleChange::Appended => {
                self.reversible_moves.pop();
            }
            ReversibleChange::Cleared(previous) => self.reversible_moves = previous,
            ReversibleChange::Untouched => {}
        }
    }

    /// A cheap copy that re-derives from the current dense FEN. History,
    /// counters and any mid-chain buffers are lost; use `clone` to keep
    /// them.
    pub fn fork(&self) -> Self {
        Self::from_fen(self.variant, &self.position.dense_fen()).expect("own FEN parses")
    }

    // --- termination ---------------------------------------------------

    fn winner_with_reason(&self) -> Option<(Color, WinReason)> {
        let side = self.position.turn();
        if self.position.count_movable(side, &self.pending_captures) == 0 {
            // In Antidraughts running out of moves is the goal.
            let winner = if self.variant == Antidraughts {
                side
            } else {
                !side
            };
            return Some((winner, WinReason::NoMoves));
        }
        if self.variant == Breakthrough {
            for color in [White, Black] {
                let crowned = self
                    .position
                    .searcher()
                    .pieces_of(color)
                    .iter()
                    .any(|&index| self.position.piece(index).is_king());
                if crowned {
                    return Some((color, WinReason::Breakthrough));
                }
            }
        }
        None
    }

    pub fn winner(&self) -> Option<Color> {
        self.winner_with_reason().map(|(color, _)| color)
    }

    pub fn result(&self) -> Option<GameResult> {
        if let Some((color, reason)) = self.winner_with_reason() {
            return Some(GameResult::Win(color, reason));
        }
        self.draw_reason().map(GameResult::Draw)
    }

    pub fn is_over(&self) -> bool {
        self.result().is_some()
    }

    /// Whether the current position occurred at least three times, the
    /// side to move included in the comparison.
    pub fn is_threefold(&self) -> bool {
        let current = self.fen_history.last().unwrap();
        self.fen_history.iter().filter(|fen| *fen == current).count() >= 3
    }

    pub fn is_draw(&self) -> bool {
        self.draw_reason().is_some()
    }

    fn census(&self, color: Color) -> Census {
        self.position
            .searcher()
            .pieces_of(color)
            .iter()
            .fold(Census::default(), |mut census, &index| {
                if self.position.piece(index).is_king() {
                    census.kings += 1;
                } else {
                    census.men += 1;
                }
                census
            })
    }

    fn positions_of(&self, color: Color) -> Vec<u8> {
        self.position
            .searcher()
            .pieces_of(color)
            .iter()
            .filter_map(|&index| self.position.piece(index).position())
            .collect()
    }

    /// The per-variant draw table. Thresholds are in plies: one "move" of
    /// the written rules is a move by each side.
    pub fn draw_reason(&self) -> Option<DrawReason> {
        use DrawReason::{EndgameLimit, KingMoveLimit, Repetition};
        let white = self.census(White);
        let black = self.census(Black);
        let msc = self.moves_since_last_capture;
        let king_plies = self.reversible_moves.len();
        let oriented = [(White, white, black), (Black, black, white)];

        match self.variant {
            Standard => {
                if king_plies >= 50 {
                    return Some(KingMoveLimit);
                }
                for (_, lone, other) in oriented {
                    if lone.total() == 1 && lone.kings == 1 && other.kings >= 1 {
                        if other.total() == 3 && msc >= 32 {
                            return Some(EndgameLimit);
                        }
                        if other.total() <= 2 && msc >= 10 {
                            return Some(EndgameLimit);
                        }
                    }
                }
                self.is_threefold().then_some(Repetition)
            }
            Russian | Brazilian => {
                if king_plies >= 30 {
                    return Some(KingMoveLimit);
                }
                for (color, lone, other) in oriented {
                    if lone.total() != 1 || lone.kings != 1 {
                        continue;
                    }
                    if other.kings >= 3 && other.men == 0 && msc >= 30 {
                        return Some(EndgameLimit);
                    }
                    if other.total() == 2 && other.kings >= 1 && msc >= 10 {
                        return Some(EndgameLimit);
                    }
                    if other.total() == 3 && other.kings >= 1 && msc >= 10 {
                        // A lone king holding the long diagonal against
                        // three pieces that stay off it.
                        let defender = self.positions_of(color)[0];
                        let attackers = self.positions_of(!color);
                        if LONG_DIAGONAL.contains(&defender)
                            && attackers
                                .iter()
                                .all(|square| !LONG_DIAGONAL.contains(square))
                        {
                            return Some(EndgameLimit);
                        }
                    }
                }
                if white.kings == black.kings
                    && white.kings >= 1
                    && white.total() == black.total()
                {
                    if (4..=5).contains(&white.total()) && msc >= 60 {
                        return Some(EndgameLimit);
                    }
                    if (6..=7).contains(&white.total()) && msc >= 120 {
                        return Some(EndgameLimit);
                    }
                }
                self.is_threefold().then_some(Repetition)
            }
            Frisian | Frysk => {
                for (_, lone, other) in oriented {
                    if lone.total() == 1 && lone.kings == 1 {
                        if other.total() == 2 && other.kings == 2 && msc >= 14 {
                            return Some(EndgameLimit);
                        }
                        if other.total() == 1 && other.kings == 1 && msc >= 4 {
                            return Some(EndgameLimit);
                        }
                    }
                }
                None
            }
            English | Italian => {
                if king_plies >= 80 {
                    return Some(KingMoveLimit);
                }
                self.is_threefold().then_some(Repetition)
            }
            Turkish => {
                if white.total() == 1 && black.total() == 1 && msc >= 4 {
                    return Some(EndgameLimit);
                }
                self.is_threefold().then_some(Repetition)
            }
            Antidraughts => self.is_threefold().then_some(Repetition),
            Breakthrough => None,
        }
    }

    // --- legality selection --------------------------------------------

    fn is_king_mover(&self, sequence: &[Step]) -> bool {
        self.position
            .piece_at(sequence[0].from)
            .is_some_and(|piece| piece.is_king())
    }

    /// Among equal candidates, king moves take precedence over man moves
    /// when any capturing king move exists.
    fn king_precedence(
        &self,
        moves: Vec<Vec<Step>>,
        captures: Vec<Vec<u8>>,
    ) -> (Vec<Vec<Step>>, Vec<Vec<u8>>) {
        if !moves.iter().any(|sequence| self.is_king_mover(sequence)) {
            return (moves, captures);
        }
        retain(moves, captures, |sequence, captured| {
            (self.is_king_mover(sequence) && !captured.is_empty()) || captured.is_empty()
        })
    }

    fn capture_value(&self, captured: &[u8]) -> u32 {
        captured
            .iter()
            .map(|&square| {
                match self.position.piece_at(square) {
                    Some(piece) if piece.is_king() => KING_VALUE,
                    _ => MAN_VALUE,
                }
            })
            .sum()
    }

    /// Frisian selection: maximum capture value with kings worth a shade
    /// over a man and a half, king precedence on ties, and the ban on a
    /// king's fourth consecutive non-capture move while men remain.
    fn frisian_selection(
        &self,
        moves: Vec<Vec<Step>>,
        captures: Vec<Vec<u8>>,
    ) -> (Vec<Vec<Step>>, Vec<Vec<u8>>) {
        let best = captures
            .iter()
            .map(|captured| self.capture_value(captured))
            .max()
            .unwrap();
        let (moves, captures) = retain(moves, captures, |_, captured| {
            self.capture_value(captured) == best
        });
        let (moves, captures) = self.king_precedence(moves, captures);

        let Some(banned) = self.restless_king() else {
            return (moves, captures);
        };
        retain(moves, captures, |sequence, captured| {
            sequence[0].from != banned || !captured.is_empty()
        })
    }

    /// The square of a king that may not play another non-capture move:
    /// its owner still has a man and its last three completed moves were
    /// non-capture moves of that same king. Identity across moves is
    /// established by matching each destination to the next origin.
    fn restless_king(&self) -> Option<u8> {
        let side = self.position.turn();
        let has_man = self
            .position
            .searcher()
            .pieces_of(side)
            .iter()
            .any(|&index| !self.position.piece(index).is_king());
        if !has_man || self.move_stack.len() < 6 {
            return None;
        }
        let n = self.move_stack.len();
        let ones: Vec<&str> = [n - 6, n - 4, n - 2]
            .iter()
            .map(|&i| self.move_stack[i].li_one_move.as_str())
            .collect();
        if ones.iter().any(|one| one.len() < 4) {
            return None;
        }
        let tail = |one: &str| one[one.len() - 2..].to_string();
        let head = |one: &str| one[..2].to_string();
        let same_piece = tail(ones[0]) == head(ones[1]) && tail(ones[1]) == head(ones[2]);
        let any_capture = [n - 6, n - 4, n - 2]
            .iter()
            .any(|&i| !self.capture_stack[i].is_empty());
        let square: u8 = tail(ones[2]).parse().ok()?;
        let (is_king, crowned_long_ago) = match (square > 0)
            .then(|| self.position.piece_at(square))
            .flatten()
        {
            // The piece is gone when it was captured meanwhile.
            None => (false, true),
            Some(piece) => (
                piece.is_king(),
                piece
                    .crowned_ply()
                    .map_or(true, |ply| self.move_stack.len() as u32 >= ply + 6),
            ),
        };
        (is_king && same_piece && !any_capture && crowned_long_ago).then_some(square)
    }

    /// Italian selection: longest chain, king movers over man movers,
    /// most kings captured, earliest king capture in the chain.
    fn italian_selection(
        &self,
        moves: Vec<Vec<Step>>,
        captures: Vec<Vec<u8>>,
    ) -> (Vec<Vec<Step>>, Vec<Vec<u8>>) {
        let (moves, captures) = longest_only(moves, captures);
        let (moves, captures) = self.king_precedence(moves, captures);

        let captured_kings = |captured: &[u8]| {
            captured
                .iter()
                .filter(|&&square| {
                    self.position
                        .piece_at(square)
                        .is_some_and(|piece| piece.is_king())
                })
                .count()
        };
        let most_kings = captures
            .iter()
            .map(|captured| captured_kings(captured))
            .max()
            .unwrap_or(0);
        if most_kings == 0 {
            return (moves, captures);
        }
        let (moves, captures) = retain(moves, captures, |_, captured| {
            captured_kings(captured) == most_kings
        });

        let first_king = |captured: &[u8]| {
            captured.iter().position(|&square| {
                self.position
                    .piece_at(square)
                    .is_some_and(|piece| piece.is_king())
            })
        };
        let earliest = captures
            .iter()
            .filter_map(|captured| first_king(captured))
            .min();
        retain(moves, captures, |_, captured| {
            captured.is_empty() || first_king(captured) == earliest
        })
    }
}

/// Keep only the chains of maximum step count.
fn longest_only(
    moves: Vec<Vec<Step>>,
    captures: Vec<Vec<u8>>,
) -> (Vec<Vec<Step>>, Vec<Vec<u8>>) {
    let longest = moves.iter().map(Vec::len).max().unwrap();
    retain(moves, captures, |sequence, _| sequence.len() == longest)
}

/// Russian selection: a chain must be finished. Drop any chain whose full
/// capture list is a proper prefix of another chain from the same origin.
fn russian_selection(
    moves: Vec<Vec<Step>>,
    captures: Vec<Vec<u8>>,
) -> (Vec<Vec<Step>>, Vec<Vec<u8>>) {
    let extended: Vec<bool> = moves
        .iter()
        .zip(&captures)
        .map(|(sequence, captured)| {
            moves.iter().zip(&captures).any(|(other, other_captured)| {
                other[0].from == sequence[0].from
                    && other_captured.len() > captured.len()
                    && other_captured[..captured.len()] == captured[..]
            })
        })
        .collect();
    let mut kept_moves = Vec::new();
    let mut kept_captures = Vec::new();
    for ((sequence, captured), extended) in moves.into_iter().zip(captures).zip(extended) {
        if !extended {
            kept_moves.push(sequence);
            kept_captures.push(captured);
        }
    }
    (kept_moves, kept_captures)
}

fn retain(
    moves: Vec<Vec<Step>>,
    captures: Vec<Vec<u8>>,
    keep: impl Fn(&[Step], &[u8]) -> bool,
) -> (Vec<Vec<Step>>, Vec<Vec<u8>>) {
    let mut kept_moves = Vec::new();
    let mut kept_captures = Vec::new();
    for (sequence, captured) in moves.into_iter().zip(captures) {
        if keep(&sequence, &captured) {
            kept_moves.push(sequence);
            kept_captures.push(captured);
        }
    }
    (kept_moves, kept_captures)
}

impl Turn for Game {
    #[inline]
    fn turn(&self) -> Color {
        self.position.turn()
    }
}

#[cfg(test)]
impl Game {
    pub fn set_moves_since_last_capture(&mut self, plies: u32) {
        self.moves_since_last_capture = plies;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game(variant: Variant, fen: &str) -> Game {
        Game::from_fen(variant, fen).unwrap()
    }

    fn push(game: &mut Game, from: u8, to: u8) {
        game.push(&[Step::new(from, to)]).unwrap();
    }

    fn pdn_list(game: &Game) -> Vec<String> {
        let (moves, captures) = game.legal_moves();
        moves
            .iter()
            .zip(&captures)
            .map(|(sequence, captured)| {
                let separator = if captured.is_empty() { "-" } else { "x" };
                let mut squares = vec![sequence[0].from];
                squares.extend(sequence.iter().map(|step| step.to));
                squares
                    .iter()
                    .map(u8::to_string)
                    .collect::<Vec<_>>()
                    .join(separator)
            })
            .collect()
    }

    #[test]
    fn test_standard_startpos_has_nine_moves() {
        let game = Game::new(Standard);
        let (moves, captures) = game.legal_moves();
        assert_eq!(moves.len(), 9);
        assert!(captures.iter().all(Vec::is_empty));
        assert!(!game.is_over());
    }

    #[test]
    fn test_english_startpos() {
        let game = Game::new(English);
        assert!(!game.is_over());
        assert_eq!(game.possible_moves().len(), 7);
    }

    #[test]
    fn test_illegal_move_is_rejected_and_state_kept() {
        let mut game = Game::new(Standard);
        let fen = game.fen();
        assert!(game.push(&[Step::new(1, 46)]).is_err());
        assert!(game.push_step(Step::NULL).is_err());
        assert_eq!(game.fen(), fen);
        assert!(game.move_stack().is_empty());
    }

    #[test]
    fn test_flying_king_moves() {
        let game = game(Standard, "W:WK28:B19,37");
        let (moves, captures) = game.legal_moves();
        assert_eq!(
            moves,
            vec![
                vec![Step::new(28, 14)],
                vec![Step::new(28, 10)],
                vec![Step::new(28, 5)],
                vec![Step::new(28, 41)],
                vec![Step::new(28, 46)],
            ]
        );
        assert_eq!(captures, vec![vec![19], vec![19], vec![19], vec![37], vec![37]]);
    }

    #[test]
    fn test_multi_capture_counts_as_one_turn() {
        let mut game = game(Standard, "W:WK39:B23,33");
        let captured = game
            .push(&[Step::new(39, 28), Step::new(28, 19)])
            .unwrap();
        assert_eq!(captured, vec![33, 23]);
        assert_eq!(game.move_stack().len(), 1);
        assert_eq!(game.capture_stack(), &[vec![33, 23]]);
        assert_eq!(game.turn(), Black);
    }

    #[test]
    fn test_push_pop_round_trip() {
        for (variant, fen) in [
            (Standard, "startpos"),
            (English, "startpos"),
            (Turkish, "startpos"),
            (Standard, "W:WK28:B19,37"),
            (Frisian, "W:WK4,36,41,42,43,44,46,47,48,49,50:B1,2,6,12,14,17,18,23"),
        ] {
            let game = game(variant, fen);
            let before = game.fen();
            let (moves, _) = game.legal_moves();
            for sequence in moves {
                let mut probe = game.clone();
                probe.push(&sequence).unwrap();
                probe.pop();
                assert_eq!(probe.fen(), before);
                assert_eq!(probe.move_stack().len(), game.move_stack().len());
                assert_eq!(
                    probe.moves_since_last_capture(),
                    game.moves_since_last_capture()
                );
            }
        }
    }

    #[test]
    fn test_pop_discards_unfinished_chain() {
        let mut game = game(Standard, "W:WK44:B9,18,33");
        game.push_step(Step::new(44, 22)).unwrap();
        game.push_step(Step::new(22, 13)).unwrap();
        assert!(game.mid_chain());
        game.pop();
        assert!(!game.mid_chain());
        assert_eq!(
            game.fen(),
            format!(
                "W{}b{}b{}b{}W{}",
                "e".repeat(8),
                "e".repeat(8),
                "e".repeat(14),
                "e".repeat(10),
                "e".repeat(6)
            )
        );
    }

    #[test]
    fn test_pop_restores_reversible_moves() {
        let mut game = game(Standard, "W:WK43:BK9");
        push(&mut game, 43, 49);
        assert_eq!(game.reversible_moves().len(), 1);
        game.pop();
        assert!(game.reversible_moves().is_empty());
    }

    #[test]
    fn test_null_move() {
        let mut game = Game::new(Standard);
        game.null();
        assert_eq!(
            game.fen(),
            format!("B{}{}{}", "b".repeat(20), "e".repeat(10), "w".repeat(20))
        );
        assert_eq!(game.move_stack()[0].pdn_move, "0-0");
        assert_eq!(game.moves_since_last_capture(), 0);
        game.pop();
        assert_eq!(game.turn(), White);
    }

    #[test]
    fn test_breakthrough_win_by_king() {
        let game = game(
            Breakthrough,
            "B:WK4,31,35,36,38,40,43,44,45,46,47,48,49,50:B1,2,3,6,7,8,9,11,13,16",
        );
        assert!(game.is_over());
        assert_eq!(game.winner(), Some(White));
        assert_eq!(
            game.result(),
            Some(GameResult::Win(White, WinReason::Breakthrough))
        );
    }

    #[test]
    fn test_stuck_side_loses() {
        let game = game(Standard, "W:W6:B1");
        assert_eq!(game.winner(), Some(Black));
        // Antidraughts flips the verdict.
        let game = game_of(Antidraughts, "W:W6:B1");
        assert_eq!(game.winner(), Some(White));
    }

    fn game_of(variant: Variant, fen: &str) -> Game {
        Game::from_fen(variant, fen).unwrap()
    }

    #[test]
    fn test_italian_king_selection() {
        // Three captures including two kings, the king captured first.
        let game = game(Italian, "W:W31,32,K25:B12,20,21,28,5,K13,K14,K7");
        let (moves, captures) = game.legal_moves();
        assert_eq!(
            moves,
            vec![vec![Step::new(25, 18), Step::new(18, 11), Step::new(11, 4)]]
        );
        assert_eq!(captures, vec![vec![21, 14, 7]]);
    }

    #[test]
    fn test_italian_earliest_king_selection() {
        let game = game(Italian, "W:WK25,32,31:B7,K5,12,K14,13,20,21,28");
        let (moves, captures) = game.legal_moves();
        assert_eq!(
            moves,
            vec![vec![Step::new(25, 18), Step::new(18, 11), Step::new(11, 4)]]
        );
        assert_eq!(captures, vec![vec![21, 14, 7]]);
    }

    #[test]
    fn test_frisian_value_selection() {
        let game = game(
            Frisian,
            "W:WK4,36,41,42,43,44,46,47,48,49,50:B1,2,6,12,14,17,18,23",
        );
        let (moves, captures) = game.legal_moves();
        let expected_moves: Vec<Vec<Step>> = vec![
            vec![(4, 24), (24, 22), (22, 11), (11, 13), (13, 22)],
            vec![(4, 24), (24, 22), (22, 11), (11, 13), (13, 27)],
            vec![(4, 24), (24, 22), (22, 11), (11, 13), (13, 31)],
            vec![(4, 24), (24, 22), (22, 13), (13, 11), (11, 22)],
            vec![(4, 24), (24, 22), (22, 13), (13, 11), (11, 28)],
            vec![(4, 24), (24, 22), (22, 13), (13, 11), (11, 33)],
            vec![(4, 24), (24, 22), (22, 13), (13, 11), (11, 39)],
        ]
        .into_iter()
        .map(|chain| chain.into_iter().map(|(f, t)| Step::new(f, t)).collect())
        .collect();
        assert_eq!(moves, expected_moves);
        assert_eq!(
            captures,
            vec![
                vec![14, 23, 17, 12, 18],
                vec![14, 23, 17, 12, 18],
                vec![14, 23, 17, 12, 18],
                vec![14, 23, 18, 12, 17],
                vec![14, 23, 18, 12, 17],
                vec![14, 23, 18, 12, 17],
                vec![14, 23, 18, 12, 17],
            ]
        );
    }

    #[test]
    fn test_frisian_king_outvalues_one_man_never_two() {
        // Taking two men beats taking one king.
        let game1 = game(Frisian, "W:W28:BK23,22,12");
        let (_, captures) = game1.legal_moves();
        assert_eq!(captures, vec![vec![22, 12]]);
        // Taking the king beats taking a single man.
        let game2 = game(Frisian, "W:W28:BK23,22");
        let (_, captures) = game2.legal_moves();
        assert_eq!(captures, vec![vec![23]]);
    }

    #[test]
    fn test_russian_chain_must_be_finished() {
        let game = game(Russian, "W:WK26:B11,14,15,23");
        assert_eq!(
            pdn_list(&game),
            vec!["26x19x10x17", "26x19x10x21", "26x16x7x17", "26x16x7x21"]
        );
    }

    #[test]
    fn test_threefold_repetition() {
        let mut game = game(Standard, "W:WK28:BK1");
        for _ in 0..2 {
            push(&mut game, 28, 33);
            push(&mut game, 1, 7);
            push(&mut game, 33, 28);
            push(&mut game, 7, 1);
        }
        assert!(game.is_threefold());
        assert!(game.is_draw());
    }

    fn bounce(game: &mut Game, times: usize, half: bool) {
        for _ in 0..times {
            push(game, 28, 33);
            push(game, 1, 7);
            push(game, 33, 28);
            push(game, 7, 1);
        }
        if half {
            push(game, 28, 33);
            push(game, 1, 7);
        }
    }

    fn bounce_small(game: &mut Game, times: usize, half: bool) {
        for _ in 0..times {
            push(game, 32, 27);
            push(game, 1, 6);
            push(game, 27, 32);
            push(game, 6, 1);
        }
        if half {
            push(game, 32, 27);
            push(game, 1, 6);
        }
    }

    #[test]
    fn test_standard_draw_rules() {
        // 25 consecutive non-capture king moves per side.
        let mut g = game(Standard, "W:WK28:BK1");
        bounce(&mut g, 12, true);
        assert!(g.is_draw());

        // One king against three pieces holding out 16 moves.
        let mut g = game(Standard, "W:WK28:BK1,2,3");
        bounce(&mut g, 8, false);
        assert!(g.is_draw());

        // One king against two pieces holding out 5 moves.
        let mut g = game(Standard, "W:WK28:BK1,2");
        bounce(&mut g, 2, true);
        assert!(g.is_draw());
    }

    #[test]
    fn test_frisian_draw_rules() {
        let mut g = game(Frisian, "W:WK28:BK1,K2");
        bounce(&mut g, 3, true);
        assert!(g.is_draw());

        // Lone king against lone king holds for two moves only.
        let mut g = game(Frisian, "W:WK28:BK1");
        push(&mut g, 28, 33);
        push(&mut g, 1, 7);
        push(&mut g, 33, 28);
        assert!(!g.is_draw());
        push(&mut g, 7, 1);
        assert!(g.is_draw());
    }

    #[test]
    fn test_russian_draw_rules() {
        // Three kings against one, 15 moves.
        let mut g = game(Russian, "W:WK32:BK1,K2,K3");
        bounce_small(&mut g, 7, true);
        assert!(g.is_draw());

        // Equal kings and totals of four per side, 30 moves.
        let mut g = game(Russian, "W:W29-31,K32:BK1,2-4");
        g.set_moves_since_last_capture(60);
        assert!(g.is_draw());

        // Equal kings and totals of six per side, 60 moves.
        let mut g = game(Russian, "W:W25-26,29-31,K32:BK1,2-4,7-8");
        g.set_moves_since_last_capture(120);
        assert!(g.is_draw());

        // Two pieces with a king against a lone king, 5 moves.
        let mut g = game(Russian, "W:WK32:BK1,4");
        bounce_small(&mut g, 2, true);
        assert!(g.is_draw());

        // A lone king holding the long diagonal against three pieces.
        let mut g = game(Russian, "W:WK5,17,19:BK29");
        for _ in 0..2 {
            push(&mut g, 5, 9);
            push(&mut g, 29, 4);
            push(&mut g, 9, 5);
            push(&mut g, 4, 29);
        }
        push(&mut g, 5, 9);
        push(&mut g, 29, 4);
        assert!(g.is_draw());
    }

    #[test]
    fn test_english_and_turkish_draw_rules() {
        let mut g = game(English, "W:WK32:BK1");
        bounce_small(&mut g, 20, false);
        assert!(g.is_draw());

        let mut g = game(Turkish, "W:WK32:B10");
        push(&mut g, 32, 31);
        push(&mut g, 10, 9);
        push(&mut g, 31, 32);
        push(&mut g, 9, 10);
        assert!(g.is_draw());
    }

    #[test]
    fn test_breakthrough_never_draws() {
        let mut g = game(Breakthrough, "W:WK28:BK1");
        bounce(&mut g, 13, false);
        assert!(!g.is_draw());
    }

    #[test]
    fn test_frisian_restless_king_rule() {
        // White has a man, so its king may not play a fourth consecutive
        // non-capture move.
        let mut g = game(Frisian, "W:WK28,46:B2,5");
        push(&mut g, 28, 33);
        push(&mut g, 2, 8);
        push(&mut g, 33, 28);
        push(&mut g, 8, 13);
        push(&mut g, 28, 33);
        push(&mut g, 13, 19);
        let (moves, _) = g.legal_moves();
        assert!(moves
            .iter()
            .all(|sequence| sequence[0].from != 33));
        // The man is still allowed to move.
        assert!(moves.iter().any(|sequence| sequence[0].from == 46));
    }

    #[test]
    fn test_frisian_restless_king_needs_a_man() {
        // Without a man of its own color, the king roams freely.
        let mut g = game(Frisian, "W:WK28:B2,5");
        push(&mut g, 28, 33);
        push(&mut g, 2, 8);
        push(&mut g, 33, 28);
        push(&mut g, 8, 13);
        push(&mut g, 28, 33);
        push(&mut g, 13, 19);
        let (moves, _) = g.legal_moves();
        assert!(moves.iter().any(|sequence| sequence[0].from == 33));
    }

    #[test]
    fn test_fork_drops_history() {
        let mut g = Game::new(Standard);
        push(&mut g, 35, 30);
        push(&mut g, 19, 24);
        let fork = g.fork();
        assert_eq!(fork.fen(), g.fen());
        assert!(fork.move_stack().is_empty());
        assert_eq!(fork.fen_history().len(), 1);
    }

    #[test]
    fn test_turkish_startpos_not_over() {
        let game = Game::new(Turkish);
        assert!(!game.is_over());
        assert!(!game.legal_moves().0.is_empty());
    }
}
