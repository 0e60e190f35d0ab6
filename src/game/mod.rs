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
use std::str::FromStr;

use crate::Color;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum GameResult {
    Win(Color, WinReason),
    Draw(DrawReason),
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum WinReason {
    /// The loser has no piece left that can move. In Antidraughts the
    /// stuck side is the winner instead.
    NoMoves,
    /// Breakthrough is won by the first side to crown a king.
    Breakthrough,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum DrawReason {
    /// The same position occurred three times with the same side to move.
    Repetition,
    /// Too many consecutive non-capture king moves.
    KingMoveLimit,
    /// A drawn endgame held out for its move allowance.
    EndgameLimit,
}

/// The game-end markers PDN records carry. `Scored` is the two-point
/// tournament scale (a win counts two, a draw one each); match records
/// written by this engine use that scale, the others occur in imported
/// games.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameEnding {
    /// `1-0`
    WhiteWins,
    /// `0-1`
    BlackWins,
    /// `1/2-1/2`
    Draw,
    /// `2-0`
    WhiteWinsScored,
    /// `0-2`
    BlackWinsScored,
    /// `1-1`
    DrawScored,
    /// `0-0`
    DoubleForfeit,
    /// `*`
    Unfinished,
}

impl GameEnding {
    /// The marker for a finished game, on the two-point scale the
    /// reference match records use for every variant.
    pub fn from_result(result: &GameResult) -> Self {
        match result {
            GameResult::Win(Color::White, _) => Self::WhiteWinsScored,
            GameResult::Win(Color::Black, _) => Self::BlackWinsScored,
            GameResult::Draw(_) => Self::DrawScored,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::WhiteWins => "1-0",
            Self::BlackWins => "0-1",
            Self::Draw => "1/2-1/2",
            Self::WhiteWinsScored => "2-0",
            Self::BlackWinsScored => "0-2",
            Self::DrawScored => "1-1",
            Self::DoubleForfeit => "0-0",
            Self::Unfinished => "*",
        }
    }
}

impl fmt::Display for GameEnding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameEnding {
    type Err = ();

    fn from_str(marker: &str) -> Result<Self, Self::Err> {
        match marker {
            "1-0" => Ok(Self::WhiteWins),
            "0-1" => Ok(Self::BlackWins),
            "1/2-1/2" => Ok(Self::Draw),
            "2-0" => Ok(Self::WhiteWinsScored),
            "0-2" => Ok(Self::BlackWinsScored),
            "1-1" => Ok(Self::DrawScored),
            "0-0" => Ok(Self::DoubleForfeit),
            "*" => Ok(Self::Unfinished),
            _ => Err(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markers_round_trip() {
        let markers = ["1-0", "0-1", "1/2-1/2", "2-0", "0-2", "1-1", "0-0", "*"];
        for marker in markers {
            let ending: GameEnding = marker.parse().unwrap();
            assert_eq!(ending.to_string(), marker);
        }
        assert!("3-0".parse::<GameEnding>().is_err());
    }

    #[test]
    fn test_from_result_uses_two_point_scale() {
        let win = GameResult::Win(Color::White, WinReason::NoMoves);
        assert_eq!(GameEnding::from_result(&win).to_string(), "2-0");
        let win = GameResult::Win(Color::Black, WinReason::Breakthrough);
        assert_eq!(GameEnding::from_result(&win).to_string(), "0-2");
        let draw = GameResult::Draw(DrawReason::Repetition);
        assert_eq!(GameEnding::from_result(&draw).to_string(), "1-1");
    }
}
