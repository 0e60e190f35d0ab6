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

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;
use strum_macros::{Display, EnumIter};
use thiserror::Error;

use super::square::{Rotation, Shape};

#[derive(Error, Debug)]
pub enum VariantError {
    #[error("unrecognised variant name `{0}`")]
    Unknown(String),
}

/// The rule families supported by the engine.
#[derive(
    Debug, Serialize, Deserialize, Display, Clone, Copy, PartialEq, Eq, Hash, EnumIter,
)]
pub enum Variant {
    #[strum(serialize = "standard")]
    Standard,
    #[strum(serialize = "english")]
    English,
    #[strum(serialize = "italian")]
    Italian,
    #[strum(serialize = "russian")]
    Russian,
    #[strum(serialize = "brazilian")]
    Brazilian,
    #[strum(serialize = "turkish")]
    Turkish,
    #[strum(serialize = "frisian")]
    Frisian,
    #[strum(serialize = "frysk!")]
    Frysk,
    #[strum(serialize = "antidraughts")]
    Antidraughts,
    #[strum(serialize = "breakthrough")]
    Breakthrough,
}

use Variant::{
    Antidraughts, Brazilian, Breakthrough, English, Frisian, Frysk, Italian, Russian, Standard,
    Turkish,
};

static ALIASES: Lazy<HashMap<&'static str, Variant>> = Lazy::new(|| {
    HashMap::from([
        ("standard", Standard),
        ("international", Standard),
        ("from position", Standard),
        ("english", English),
        ("american", English),
        ("italian", Italian),
        ("russian", Russian),
        ("brazilian", Brazilian),
        ("turkish", Turkish),
        ("frisian", Frisian),
        ("frysk!", Frysk),
        ("frysk", Frysk),
        ("antidraughts", Antidraughts),
        ("breakthrough", Breakthrough),
    ])
});

impl FromStr for Variant {
    type Err = VariantError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let normalized = name.trim().to_ascii_lowercase();
        ALIASES
            .get(normalized.as_str())
            .copied()
            .ok_or_else(|| VariantError::Unknown(name.to_string()))
    }
}

/// The complete set of movement flags a [`Variant`] contributes to move
/// generation. Movement code branches on these flags only, never on the
/// variant itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Traits {
    /// Men and kings move along diagonals.
    pub diagonal_moves: bool,
    /// Men and kings move along ranks and files instead.
    pub orthogonal_moves: bool,
    /// Captures may run along ranks and files as well.
    pub orthogonal_captures: bool,
    /// Men may capture toward their own side.
    pub man_captures_backwards: bool,
    /// Men may capture kings.
    pub man_captures_kings: bool,
    /// Kings slide and capture over any distance.
    pub kings_fly: bool,
    /// Kings may pass over pieces captured earlier in the same chain.
    pub kings_hop_captured: bool,
    /// A man crowned mid-chain stops capturing immediately.
    pub crowning_ends_capture: bool,
    /// A man crowned mid-chain continues capturing as a king.
    pub crowning_continues_capture: bool,
}

impl Variant {
    pub const fn traits(self) -> Traits {
        Traits {
            diagonal_moves: !matches!(self, Turkish),
            orthogonal_moves: matches!(self, Turkish),
            orthogonal_captures: matches!(self, Frisian | Frysk | Turkish),
            man_captures_backwards: !matches!(self, English | Italian | Turkish),
            man_captures_kings: !matches!(self, Italian),
            kings_fly: !matches!(self, English | Italian),
            kings_hop_captured: matches!(self, Turkish),
            crowning_ends_capture: matches!(self, English | Italian),
            crowning_continues_capture: matches!(self, Russian),
        }
    }

    pub const fn shape(self) -> Shape {
        match self {
            English | Russian | Brazilian => Shape::SMALL,
            Italian => Shape::ITALIAN,
            Turkish => Shape::TURKISH,
            _ => Shape::INTERNATIONAL,
        }
    }

    /// Rows filled with pieces per side in the starting position.
    pub const fn rows_with_pieces(self) -> u8 {
        match self {
            Frysk => 1,
            English | Italian | Russian | Brazilian => 3,
            Turkish => 2,
            _ => 4,
        }
    }

    /// How this variant's published numbering maps onto the internal one.
    pub const fn rotation(self) -> Rotation {
        match self {
            English => Rotation::Mirror,
            Russian | Brazilian | Turkish => Rotation::ReverseRows,
            _ => Rotation::Identity,
        }
    }

    /// Whether external square addressing is algebraic rather than numeric.
    pub const fn algebraic(self) -> bool {
        matches!(self, Russian | Brazilian | Turkish)
    }

    /// English swaps the colors across the internal/external boundary:
    /// the side published as Black moves first and is White internally.
    pub const fn flips_colors(self) -> bool {
        matches!(self, English)
    }

    /// The starting position as an internal list FEN.
    pub fn initial_list_fen(self) -> String {
        let shape = self.shape();
        let (white, black): (Vec<u8>, Vec<u8>) = match self {
            Turkish => ((41..=56).collect(), (9..=24).collect()),
            _ => {
                let count = shape.per_row() * self.rows_with_pieces();
                (
                    (shape.total() - count + 1..=shape.total()).collect(),
                    (1..=count).collect(),
                )
            }
        };
        let join = |squares: Vec<u8>| {
            squares
                .iter()
                .map(|s| s.to_string())
                .collect::<Vec<_>>()
                .join(",")
        };
        format!("W:W{}:B{}", join(white), join(black))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_name_round_trip() {
        for variant in Variant::iter() {
            assert_eq!(variant.to_string().parse::<Variant>().unwrap(), variant);
        }
    }

    #[test]
    fn test_aliases() {
        assert_eq!("from position".parse::<Variant>().unwrap(), Standard);
        assert_eq!("american".parse::<Variant>().unwrap(), English);
        assert_eq!("frysk".parse::<Variant>().unwrap(), Frysk);
        assert_eq!("FRISIAN".parse::<Variant>().unwrap(), Frisian);
        assert!("croatian".parse::<Variant>().is_err());
    }

    #[test]
    fn test_shapes() {
        assert_eq!(Standard.shape().total(), 50);
        assert_eq!(Russian.shape().total(), 32);
        assert_eq!(Turkish.shape().total(), 64);
        assert!(Italian.shape().bottom_left());
        assert!(!Turkish.shape().alternating());
    }

    #[test]
    fn test_traits_table() {
        assert!(Standard.traits().kings_fly);
        assert!(!English.traits().kings_fly);
        assert!(!English.traits().man_captures_backwards);
        assert!(Standard.traits().man_captures_backwards);
        assert!(!Italian.traits().man_captures_kings);
        assert!(Turkish.traits().orthogonal_moves);
        assert!(Turkish.traits().kings_hop_captured);
        assert!(Frisian.traits().orthogonal_captures);
        assert!(!Frisian.traits().orthogonal_moves);
        assert!(Russian.traits().crowning_continues_capture);
        assert!(Italian.traits().crowning_ends_capture);
    }

    #[test]
    fn test_initial_fens() {
        assert_eq!(
            Frysk.initial_list_fen(),
            "W:W46,47,48,49,50:B1,2,3,4,5"
        );
        assert_eq!(
            Russian.initial_list_fen(),
            "W:W21,22,23,24,25,26,27,28,29,30,31,32:B1,2,3,4,5,6,7,8,9,10,11,12"
        );
        assert!(Standard.initial_list_fen().starts_with("W:W31,32"));
        assert!(Turkish.initial_list_fen().starts_with("W:W41,42"));
        assert!(Turkish.initial_list_fen().ends_with(",23,24"));
    }
}
