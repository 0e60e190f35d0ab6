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

//! The polymorphic move value.
//!
//! A [`Move`] carries the same move in every coexisting representation:
//! the board-step list, the flattened square list, the Hub protocol forms,
//! the PDN forms with disambiguation, and the Lichess-style API forms.
//! Constructed against a [`Board`] it cross-fills every representation;
//! constructed detached it fills whatever can be derived without the
//! legal-move list.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::fen::move_string_to_numeric;
use super::moves::Step;
use super::variant::Variant;
use super::Board;

#[derive(Error, Debug)]
pub enum NotationError {
    #[error("unparseable move notation `{0}`")]
    Unparseable(String),
    #[error("move `{0}` does not match any legal move")]
    NoMatch(String),
    #[error("ambiguous move `{input}`, candidates: {candidates:?}")]
    Ambiguous {
        input: String,
        candidates: Vec<String>,
    },
}

/// One representation of a move, used to construct a [`Move`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveInput {
    /// `[47-33, 33-24, ...]`, one step per jump.
    Board(Vec<Step>),
    /// `[47, 33, 24, ...]`, each square reachable from its predecessor.
    Steps(Vec<u8>),
    /// `"33-29"` or `"28x17x19"` with captures after the destination.
    Hub(String),
    /// `"3329"` or `"281719"`, zero-padded, no separators.
    HubPosition(String),
    /// `"33-29"`, `"28x17"` or a disambiguated `"28x17x19"`.
    Pdn(String),
    /// The PDN form without separators.
    PdnPosition(String),
    /// `["4733", "3324"]`, one four-digit pair per step.
    LiApi(Vec<String>),
    /// `"473324"`, the concatenation of the steps.
    LiOne(String),
}

/// A move in all of its representations. String fields that cannot be
/// derived from a detached construction are left empty.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
pub struct Move {
    pub board_move: Vec<Step>,
    pub steps_move: Vec<u8>,
    pub hub_move: String,
    pub hub_position_move: String,
    pub pdn_move: String,
    pub pdn_position_move: String,
    pub li_api_move: Vec<String>,
    pub li_one_move: String,
    /// Captured squares in jump order.
    pub captures: Vec<u8>,
    pub has_captures: bool,
    /// Whether the short PDN form would be ambiguous. `None` until a
    /// construction had enough context to decide.
    pub ambiguous: Option<bool>,
    pub is_null: bool,
}

fn pad(square: u8) -> String {
    format!("{square:02}")
}

fn depad(token: &str) -> String {
    token.trim_start_matches('0').to_string()
}

/// Captured squares in canonical order: zero-padded to two digits, sorted
/// as strings, concatenated. Hub engines report captures in this order.
pub(crate) fn sort_captures(captures: &[u8]) -> String {
    let mut tokens: Vec<String> = captures.iter().map(|&square| pad(square)).collect();
    tokens.sort();
    tokens.concat()
}

fn steps_of(board_move: &[Step]) -> Vec<u8> {
    let mut steps = vec![board_move[0].from];
    steps.extend(board_move.iter().map(|step| step.to));
    steps
}

fn steps_to_board(steps: &[u8]) -> Result<Vec<Step>, NotationError> {
    if steps.len() < 2 {
        return Err(NotationError::Unparseable(format!("{steps:?}")));
    }
    Ok(steps
        .windows(2)
        .map(|pair| Step::new(pair[0], pair[1]))
        .collect())
}

/// Split a padded position string into its squares.
fn parse_position(position: &str) -> Result<Vec<u8>, NotationError> {
    let bad = || NotationError::Unparseable(position.to_string());
    if position.len() < 4 || position.len() % 2 != 0 {
        return Err(bad());
    }
    position
        .as_bytes()
        .chunks(2)
        .map(|pair| {
            std::str::from_utf8(pair)
                .ok()
                .and_then(|token| token.parse::<u8>().ok())
                .ok_or_else(bad)
        })
        .collect()
}

/// Join the squares of a position string with `x` or `-`.
fn separated(position: &str, has_captures: bool) -> String {
    let separator = if has_captures { "x" } else { "-" };
    position
        .as_bytes()
        .chunks(2)
        .map(|pair| depad(std::str::from_utf8(pair).unwrap()))
        .collect::<Vec<_>>()
        .join(separator)
}

/// Turn a separated hub or PDN move into its padded position form.
fn to_position(move_str: &str) -> Result<String, NotationError> {
    let separator = if move_str.contains('-') { '-' } else { 'x' };
    let tokens: Vec<&str> = move_str.split(separator).collect();
    if tokens.len() < 2 {
        return Err(NotationError::Unparseable(move_str.to_string()));
    }
    tokens
        .iter()
        .map(|token| {
            token
                .parse::<u8>()
                .map(pad)
                .map_err(|_| NotationError::Unparseable(move_str.to_string()))
        })
        .collect()
}

impl Move {
    /// The null move: `[[0,0]]`, `0-0`, `0000` in every form.
    pub fn null() -> Self {
        Self {
            board_move: vec![Step::NULL],
            steps_move: vec![0, 0],
            hub_move: "0-0".to_string(),
            hub_position_move: "0000".to_string(),
            pdn_move: "0-0".to_string(),
            pdn_position_move: "0000".to_string(),
            li_api_move: vec!["0000".to_string()],
            li_one_move: "0000".to_string(),
            captures: Vec::new(),
            has_captures: false,
            ambiguous: None,
            is_null: true,
        }
    }

    /// Construct against a board: resolves the input to one of the legal
    /// moves and cross-fills every representation, rewriting disambiguated
    /// PDN intermediates to the squares immediately behind the captures.
    pub fn new(board: &Board, input: MoveInput) -> Result<Self, NotationError> {
        let (possible, captures) = board.legal_moves_board();
        Self::build(Some(board.variant()), &possible, &captures, input, true)
    }

    /// Construct against an explicit legal-move table, e.g. to describe
    /// each member of the table itself. Keeps the given intermediates.
    pub fn with_positions(
        variant: Option<Variant>,
        possible_moves: &[Vec<Step>],
        possible_captures: &[Vec<u8>],
        input: MoveInput,
    ) -> Result<Self, NotationError> {
        Self::build(variant, possible_moves, possible_captures, input, false)
    }

    /// Construct without a board, filling only the representations that
    /// are derivable on their own.
    pub fn detached(input: MoveInput, variant: Option<Variant>) -> Result<Self, NotationError> {
        Self::build_detached(input, variant, None, false)
    }

    pub fn from_pdn(board: &Board, pdn: &str) -> Result<Self, NotationError> {
        Self::new(board, MoveInput::Pdn(pdn.to_string()))
    }

    pub fn from_hub(board: &Board, hub: &str) -> Result<Self, NotationError> {
        Self::new(board, MoveInput::Hub(hub.to_string()))
    }

    pub fn from_board_move(board: &Board, steps: Vec<Step>) -> Result<Self, NotationError> {
        Self::new(board, MoveInput::Board(steps))
    }

    /// The engine-bridge fallback: a move known only by its hub position
    /// form, with the PDN forms approximated from the from/to pair.
    pub fn pseudolegal(
        board_move: Vec<Step>,
        hub_position_move: String,
        has_captures: bool,
    ) -> Self {
        Self::build_detached(
            MoveInput::Board(board_move.clone()),
            None,
            Some(has_captures),
            false,
        )
        .map(|mut mv| {
            mv.hub_position_move = hub_position_move.clone();
            mv.hub_move = separated(&hub_position_move, has_captures);
            mv.pdn_position_move = hub_position_move[..4].to_string();
            mv.pdn_move = separated(&mv.pdn_position_move, has_captures);
            mv
        })
        .expect("board steps always build")
    }

    fn is_null_input(input: &MoveInput) -> bool {
        match input {
            MoveInput::Board(steps) => steps.as_slice() == [Step::NULL],
            MoveInput::Steps(steps) => steps.as_slice() == [0, 0],
            MoveInput::Hub(s) | MoveInput::Pdn(s) => s == "0-0",
            MoveInput::HubPosition(s) | MoveInput::PdnPosition(s) => s == "0000",
            MoveInput::LiApi(moves) => moves.len() == 1 && moves[0] == "0000",
            MoveInput::LiOne(s) => s == "0000",
        }
    }

    fn build(
        variant: Option<Variant>,
        possible: &[Vec<Step>],
        possible_captures: &[Vec<u8>],
        input: MoveInput,
        rewrite: bool,
    ) -> Result<Self, NotationError> {
        if Self::is_null_input(&input) {
            return Ok(Self::null());
        }

        let mut given_hub_move = None;
        let mut given_hub_position = None;
        let mut given_pdn_move = None;
        let mut given_pdn_position = None;
        let mut ambiguous = None;

        let board_move: Vec<Step> = match input {
            MoveInput::Board(steps) => steps,
            MoveInput::Steps(squares) => steps_to_board(&squares)?,
            MoveInput::LiApi(moves) => {
                let mut steps = Vec::new();
                for pair in &moves {
                    let squares = parse_position(pair)?;
                    steps.extend(steps_to_board(&squares)?);
                }
                steps
            }
            MoveInput::LiOne(s) => steps_to_board(&parse_position(&s)?)?,
            MoveInput::Hub(s) => {
                let position = to_position(&s)?;
                given_hub_move = Some(s);
                given_hub_position = Some(position.clone());
                Self::lookup_hub(possible, possible_captures, &position)?
            }
            MoveInput::HubPosition(s) => {
                given_hub_position = Some(s.clone());
                Self::lookup_hub(possible, possible_captures, &s)?
            }
            MoveInput::Pdn(s) => {
                let numeric = match variant {
                    Some(variant) => move_string_to_numeric(&s, variant)
                        .map_err(|_| NotationError::Unparseable(s.clone()))?,
                    None => s.clone(),
                };
                let position = to_position(&numeric)?;
                let (board_move, amb) = Self::lookup_pdn(possible, &position, &s)?;
                given_pdn_move = Some(numeric);
                given_pdn_position = Some(position);
                ambiguous = Some(amb);
                board_move
            }
            MoveInput::PdnPosition(s) => {
                let (board_move, amb) = Self::lookup_pdn(possible, &s, &s)?;
                given_pdn_position = Some(s);
                ambiguous = Some(amb);
                board_move
            }
        };

        let index = possible
            .iter()
            .position(|candidate| *candidate == board_move)
            .ok_or_else(|| {
                NotationError::NoMatch(
                    steps_of(&board_move)
                        .iter()
                        .map(u8::to_string)
                        .collect::<Vec<_>>()
                        .join("-"),
                )
            })?;
        let captures = possible_captures[index].clone();
        let has_captures = !captures.is_empty();
        let steps_move = steps_of(&board_move);
        let from = board_move[0].from;
        let to = board_move.last().unwrap().to;

        let hub_position_move = given_hub_position.unwrap_or_else(|| {
            let mut position = pad(from) + &pad(to);
            position.push_str(&sort_captures(&captures));
            position
        });
        let hub_move = given_hub_move.unwrap_or_else(|| separated(&hub_position_move, has_captures));

        let (pdn_position_move, ambiguous) = match given_pdn_position {
            Some(position) => (position, ambiguous),
            None => {
                let start_end = pad(from) + &pad(to);
                let same_start_end = possible
                    .iter()
                    .filter(|m| m[0].from == from && m.last().unwrap().to == to)
                    .count();
                let amb = same_start_end >= 2;
                let position = if amb {
                    let steps = if rewrite {
                        Self::canonical_steps(possible, possible_captures, &board_move, &captures)
                    } else {
                        steps_move.clone()
                    };
                    steps.iter().map(|&square| pad(square)).collect()
                } else {
                    start_end
                };
                (position, Some(amb))
            }
        };
        let pdn_move =
            given_pdn_move.unwrap_or_else(|| separated(&pdn_position_move, has_captures));

        let li_api_move = board_move
            .iter()
            .map(|step| pad(step.from) + &pad(step.to))
            .collect();
        let li_one_move = steps_move.iter().map(|&square| pad(square)).collect();

        Ok(Self {
            board_move,
            steps_move,
            hub_move,
            hub_position_move,
            pdn_move,
            pdn_position_move,
            li_api_move,
            li_one_move,
            captures,
            has_captures,
            ambiguous,
            is_null: false,
        })
    }

    fn lookup_hub(
        possible: &[Vec<Step>],
        possible_captures: &[Vec<u8>],
        position: &str,
    ) -> Result<Vec<Step>, NotationError> {
        let squares = parse_position(position)?;
        // Captures are accepted in any order; canonicalise before lookup.
        let key = pad(squares[0]) + &pad(squares[1]) + &sort_captures(&squares[2..]);
        for (candidate, captures) in possible.iter().zip(possible_captures) {
            let candidate_key = pad(candidate[0].from)
                + &pad(candidate.last().unwrap().to)
                + &sort_captures(captures);
            if candidate_key == key {
                return Ok(candidate.clone());
            }
        }
        Err(NotationError::NoMatch(position.to_string()))
    }

    fn lookup_pdn(
        possible: &[Vec<Step>],
        position: &str,
        input: &str,
    ) -> Result<(Vec<Step>, bool), NotationError> {
        let squares = parse_position(position)?;
        if squares.len() == 2 {
            let matches: Vec<&Vec<Step>> = possible
                .iter()
                .filter(|m| m[0].from == squares[0] && m.last().unwrap().to == squares[1])
                .collect();
            match matches.len() {
                0 => Err(NotationError::NoMatch(input.to_string())),
                1 => Ok((matches[0].clone(), false)),
                _ => Err(NotationError::Ambiguous {
                    input: input.to_string(),
                    candidates: matches
                        .iter()
                        .map(|m| {
                            steps_of(m)
                                .iter()
                                .map(u8::to_string)
                                .collect::<Vec<_>>()
                                .join("x")
                        })
                        .collect(),
                }),
            }
        } else {
            possible
                .iter()
                .find(|m| steps_of(m) == squares)
                .map(|m| (m.clone(), true))
                .ok_or_else(|| NotationError::NoMatch(input.to_string()))
        }
    }

    /// Rewrite the intermediates of an ambiguous capture to the canonical
    /// PDN 3.0 squares: among the legal chains with the same endpoints,
    /// length and captures, repeatedly keep those with the smallest step
    /// magnitude at each intermediate and take the first that remains.
    fn canonical_steps(
        possible: &[Vec<Step>],
        possible_captures: &[Vec<u8>],
        board_move: &[Step],
        captures: &[u8],
    ) -> Vec<u8> {
        let ours = steps_of(board_move);
        let from = board_move[0].from;
        let to = board_move.last().unwrap().to;
        let sorted = sort_captures(captures);
        let mut candidates: Vec<Vec<u8>> = possible
            .iter()
            .zip(possible_captures)
            .filter(|(m, c)| {
                m[0].from == from
                    && m.last().unwrap().to == to
                    && m.len() == board_move.len()
                    && sort_captures(c) == sorted
            })
            .map(|(m, _)| steps_of(m))
            .collect();
        if candidates.is_empty() {
            return ours;
        }
        for index in 1..ours.len() - 1 {
            let distance =
                |steps: &Vec<u8>| (steps[index - 1] as i16 - steps[index] as i16).abs();
            let best = candidates.iter().map(distance).min().unwrap();
            candidates.retain(|steps| distance(steps) == best);
        }
        candidates.swap_remove(0)
    }

    fn build_detached(
        input: MoveInput,
        variant: Option<Variant>,
        has_captures_hint: Option<bool>,
        hub_to_pdn_pseudolegal: bool,
    ) -> Result<Self, NotationError> {
        if Self::is_null_input(&input) {
            return Ok(Self::null());
        }
        let mut mv = Self::default();

        match input {
            MoveInput::Board(steps) => {
                mv.board_move = steps;
            }
            MoveInput::Steps(squares) => {
                mv.board_move = steps_to_board(&squares)?;
            }
            MoveInput::LiApi(moves) => {
                let mut steps = Vec::new();
                for pair in &moves {
                    let squares = parse_position(pair)?;
                    steps.extend(steps_to_board(&squares)?);
                }
                mv.board_move = steps;
            }
            MoveInput::LiOne(s) => {
                mv.board_move = steps_to_board(&parse_position(&s)?)?;
            }
            MoveInput::Hub(s) => {
                mv.has_captures = s.contains('x');
                mv.hub_position_move = to_position(&s)?;
                mv.hub_move = s;
            }
            MoveInput::HubPosition(s) => {
                parse_position(&s)?;
                mv.has_captures = has_captures_hint.unwrap_or(s.len() > 4);
                mv.hub_move = separated(&s, mv.has_captures);
                mv.hub_position_move = s;
            }
            MoveInput::Pdn(s) => {
                let numeric = match variant {
                    Some(variant) => move_string_to_numeric(&s, variant)
                        .map_err(|_| NotationError::Unparseable(s.clone()))?,
                    None => s.clone(),
                };
                mv.has_captures = numeric.contains('x');
                mv.pdn_position_move = to_position(&numeric)?;
                mv.ambiguous = Some(mv.pdn_position_move.len() != 4);
                mv.pdn_move = numeric;
            }
            MoveInput::PdnPosition(s) => {
                parse_position(&s)?;
                mv.has_captures = has_captures_hint.unwrap_or(s.len() > 4);
                mv.pdn_move = separated(&s, mv.has_captures);
                mv.ambiguous = Some(s.len() != 4);
                mv.pdn_position_move = s;
            }
        }

        if !mv.board_move.is_empty() {
            mv.has_captures = has_captures_hint.unwrap_or(mv.has_captures);
            mv.steps_move = steps_of(&mv.board_move);
            mv.li_api_move = mv
                .board_move
                .iter()
                .map(|step| pad(step.from) + &pad(step.to))
                .collect();
            mv.li_one_move = mv.steps_move.iter().map(|&square| pad(square)).collect();
        }

        if hub_to_pdn_pseudolegal && mv.hub_position_move.len() >= 4 {
            mv.pdn_position_move = mv.hub_position_move[..4].to_string();
            mv.pdn_move = separated(&mv.pdn_position_move, mv.has_captures);
        }

        Ok(mv)
    }
}
