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

//! List-FEN parsing and the conversions between a variant's published
//! coordinates and the internal ones.
//!
//! Two FEN forms coexist. The dense form (one cell letter per playable
//! square, parsed by [`Position::from_dense_fen`]) is internal only and
//! feeds the threefold detector. The sparse list form
//! `side:Wpieces:Bpieces` travels across the API boundary and may use
//! the variant's own numbering, algebraic squares and inclusive ranges.

use thiserror::Error;

use super::material::{Color, Piece};
use super::position::Position;
use super::square::Shape;
use super::variant::Variant;

use Color::{Black, White};

#[derive(Error, Debug)]
pub enum FenError {
    #[error("malformed FEN `{fen}`: missing or invalid side to move")]
    BadSide { fen: String },
    #[error("malformed FEN `{fen}`: unexpected cell `{found}` at offset {at}")]
    BadCell { fen: String, at: usize, found: char },
    #[error("malformed FEN `{fen}`: longer than the {expected} characters the board holds")]
    BadLength { fen: String, expected: usize },
    #[error("malformed FEN `{fen}`: expected `side:W<pieces>:B<pieces>`")]
    BadSections { fen: String },
    #[error("unusable square `{token}`")]
    BadSquare { token: String },
}

/// A list FEN broken into typed parts. Squares are in whatever coordinate
/// space the string used; conversion is the caller's concern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListFen {
    pub side: Color,
    pub white: Vec<(u8, bool)>,
    pub black: Vec<(u8, bool)>,
}

/// Parse a list FEN against a board shape. Accepts numeric and algebraic
/// squares, `K` prefixes, inclusive ranges (`a-b`, `Ka-b`) and ignores
/// trailing clock sections such as `:H0:F1`.
pub fn parse_list_fen(shape: &Shape, fen: &str) -> Result<ListFen, FenError> {
    let mut sections = fen.split(':');
    let side = match sections.next() {
        Some("W") | Some("w") => White,
        Some("B") | Some("b") => Black,
        _ => {
            return Err(FenError::BadSide {
                fen: fen.to_string(),
            })
        }
    };
    let mut white = None;
    let mut black = None;
    for section in sections {
        match section.chars().next() {
            Some('W') if white.is_none() => white = Some(parse_pieces(shape, &section[1..])?),
            Some('B') if black.is_none() => black = Some(parse_pieces(shape, &section[1..])?),
            // Clock fields and the like; the engine has no use for them.
            _ => continue,
        }
    }
    match (white, black) {
        (Some(white), Some(black)) => Ok(ListFen { side, white, black }),
        _ => Err(FenError::BadSections {
            fen: fen.to_string(),
        }),
    }
}

fn parse_pieces(shape: &Shape, section: &str) -> Result<Vec<(u8, bool)>, FenError> {
    let mut pieces = Vec::new();
    for token in section.split(',') {
        if token.is_empty() {
            continue;
        }
        let (king, body) = match token.strip_prefix(['K', 'k']) {
            Some(rest) => (true, rest),
            None => (false, token),
        };
        let bad = || FenError::BadSquare {
            token: token.to_string(),
        };
        match body.split_once('-') {
            Some((start, end)) => {
                let start = shape.try_from_algebraic(start).ok_or_else(bad)?;
                let end = shape.try_from_algebraic(end).ok_or_else(bad)?;
                if start > end {
                    return Err(bad());
                }
                pieces.extend((start..=end).map(|square| (square, king)));
            }
            None => {
                let square = shape.try_from_algebraic(body).ok_or_else(bad)?;
                pieces.push((square, king));
            }
        }
    }
    Ok(pieces)
}

fn piece_token(square: u8, king: bool) -> String {
    if king {
        format!("K{square}")
    } else {
        square.to_string()
    }
}

fn join_sorted(entries: Vec<(u8, bool)>, algebraic: Option<&Shape>) -> String {
    let mut tokens: Vec<String> = entries
        .iter()
        .map(|&(square, king)| piece_token(square, king))
        .collect();
    tokens.sort();
    if let Some(shape) = algebraic {
        for token in tokens.iter_mut() {
            let (prefix, body) = match token.strip_prefix('K') {
                Some(rest) => ("K", rest),
                None => ("", token.as_str()),
            };
            let square: u8 = body.parse().expect("numeric piece token");
            *token = format!("{}{}", prefix, shape.to_algebraic(square));
        }
    }
    tokens.join(",")
}

fn render_list_fen(side: Color, white: String, black: String) -> String {
    let side = match side {
        White => 'W',
        Black => 'B',
    };
    format!("{side}:W{white}:B{black}")
}

/// Convert a variant's published list FEN to the internal list FEN:
/// squares become numeric and unrotated, English swaps the colors, and
/// piece lists come out string-sorted.
pub fn fen_from_variant(fen: &str, variant: Variant) -> Result<String, FenError> {
    let shape = variant.shape();
    let rotation = variant.rotation();
    let mut parsed = parse_list_fen(&shape, fen)?;
    for entry in parsed.white.iter_mut().chain(parsed.black.iter_mut()) {
        entry.0 = rotation.apply(&shape, entry.0);
    }
    let (side, white, black) = if variant.flips_colors() {
        (!parsed.side, parsed.black, parsed.white)
    } else {
        (parsed.side, parsed.white, parsed.black)
    };
    Ok(render_list_fen(
        side,
        join_sorted(white, None),
        join_sorted(black, None),
    ))
}

/// Convert an internal list FEN to the variant's published form. Squares
/// rotate into the variant's numbering and render algebraically where the
/// variant is addressed that way.
pub fn fen_to_variant(fen: &str, variant: Variant) -> Result<String, FenError> {
    let shape = variant.shape();
    let rotation = variant.rotation();
    let mut parsed = parse_list_fen(&shape, fen)?;
    for entry in parsed.white.iter_mut().chain(parsed.black.iter_mut()) {
        entry.0 = rotation.apply(&shape, entry.0);
    }
    let (side, white, black) = if variant.flips_colors() {
        (!parsed.side, parsed.black, parsed.white)
    } else {
        (parsed.side, parsed.white, parsed.black)
    };
    let algebraic = variant.algebraic().then_some(&shape);
    Ok(render_list_fen(
        side,
        join_sorted(white, algebraic),
        join_sorted(black, algebraic),
    ))
}

/// Map a single square across the internal/external boundary. All the
/// rotations in use are involutions, so this converts in both directions.
pub fn rotate_square(variant: Variant, square: u8) -> u8 {
    variant.rotation().apply(&variant.shape(), square)
}

/// Build a [`Position`] from an internal list FEN.
pub fn position_from_list_fen(variant: Variant, fen: &str) -> Result<Position, FenError> {
    let shape = variant.shape();
    let parsed = parse_list_fen(&shape, fen)?;
    let mut by_square: Vec<Option<Piece>> = vec![None; shape.total() as usize + 1];
    for &(square, king) in &parsed.white {
        by_square[square as usize] = Some(if king {
            Piece::king(White, square)
        } else {
            Piece::man(White, square)
        });
    }
    for &(square, king) in &parsed.black {
        by_square[square as usize] = Some(if king {
            Piece::king(Black, square)
        } else {
            Piece::man(Black, square)
        });
    }
    let pieces = by_square.into_iter().flatten().collect();
    Ok(Position::with_pieces(variant, pieces, parsed.side))
}

fn split_move_tokens(move_str: &str) -> (char, Vec<String>) {
    for separator in ['-', 'x', ':'] {
        if move_str.contains(separator) {
            return (
                if separator == ':' { ':' } else { separator },
                move_str
                    .split(separator)
                    .filter(|t| !t.is_empty())
                    .map(str::to_string)
                    .collect(),
            );
        }
    }
    // Concatenated algebraic squares, e.g. `a1a2`.
    let mut tokens = Vec::new();
    let mut current = String::new();
    for c in move_str.chars() {
        if c.is_ascii_alphabetic() && !current.is_empty() {
            tokens.push(std::mem::take(&mut current));
        }
        current.push(c);
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    ('-', tokens)
}

/// Normalise a PDN move string to numeric squares (still in the string's
/// own coordinate space). Numeric input passes through untouched.
pub fn move_string_to_numeric(move_str: &str, variant: Variant) -> Result<String, FenError> {
    if !move_str
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic())
    {
        return Ok(move_str.to_string());
    }
    let shape = variant.shape();
    let (separator, tokens) = split_move_tokens(move_str);
    let squares = tokens
        .iter()
        .map(|token| {
            shape
                .try_from_algebraic(token)
                .map(|square| square.to_string())
                .ok_or_else(|| FenError::BadSquare {
                    token: token.clone(),
                })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(squares.join(&separator.to_string()))
}

/// Convert a published PDN move string to internal numeric squares.
pub fn move_string_from_variant(move_str: &str, variant: Variant) -> Result<String, FenError> {
    let numeric = move_string_to_numeric(move_str, variant)?;
    let shape = variant.shape();
    let (separator, tokens) = split_move_tokens(&numeric);
    let squares = tokens
        .iter()
        .map(|token| {
            token
                .parse::<u8>()
                .ok()
                .filter(|&square| shape.contains(square))
                .map(|square| rotate_square(variant, square).to_string())
                .ok_or_else(|| FenError::BadSquare {
                    token: token.clone(),
                })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(squares.join(&separator.to_string()))
}

/// Convert an internal numeric PDN move string to the variant's published
/// form, algebraic where the variant reads that way.
pub fn move_string_to_variant(move_str: &str, variant: Variant) -> Result<String, FenError> {
    let shape = variant.shape();
    let (separator, tokens) = split_move_tokens(move_str);
    let squares = tokens
        .iter()
        .map(|token| {
            let square = token
                .parse::<u8>()
                .ok()
                .filter(|&square| shape.contains(square))
                .ok_or_else(|| FenError::BadSquare {
                    token: token.clone(),
                })?;
            let rotated = rotate_square(variant, square);
            Ok(if variant.algebraic() {
                shape.to_algebraic(rotated)
            } else {
                rotated.to_string()
            })
        })
        .collect::<Result<Vec<_>, FenError>>()?;
    Ok(squares.join(&separator.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Turn;

    #[test]
    fn test_english_fen_from_variant() {
        assert_eq!(
            fen_from_variant(
                "B:W19,21,22,23,25,26,27,29-31,32:B1,2,3-5,6,7,9,10,11,12",
                Variant::English
            )
            .unwrap(),
            "W:W21,22,23,24,26,27,28,29,30,31,32:B1,10,11,12,14,2,3,4,6,7,8"
        );
    }

    #[test]
    fn test_russian_fen_from_variant() {
        assert_eq!(
            fen_from_variant(
                "W:Wa3,Kc3,Ke3,g3,b2,d2,f2,h2,a1,c1,e1,g1:Bb8,d8,f8,h8,a7,c7,e7,g7,b6,Kd6,Kf6,h6",
                Variant::Russian
            )
            .unwrap(),
            "W:W21,24,25,26,27,28,29,30,31,32,K22,K23:B1,12,2,3,4,5,6,7,8,9,K10,K11"
        );
    }

    #[test]
    fn test_range_expansion() {
        assert_eq!(
            fen_from_variant("W:WK12-14:BK28-31", Variant::Standard).unwrap(),
            "W:WK12,K13,K14:BK28,K29,K30,K31"
        );
    }

    #[test]
    fn test_english_fen_to_variant() {
        assert_eq!(
            fen_to_variant(
                "W:W21,22,23,24,26,27-29,30,31,32:B1,10,11,12,14,2-4,6,7,8",
                Variant::English
            )
            .unwrap(),
            "B:W19,21,22,23,25,26,27,29,30,31,32:B1,10,11,12,2,3,4,5,6,7,9"
        );
    }

    #[test]
    fn test_russian_fen_to_variant() {
        assert_eq!(
            fen_to_variant(
                "B:W17,22,23,24,25,26,27-29,30,31,32:B1,2,3-5,6,7,8,9,10,11,12",
                Variant::Russian
            )
            .unwrap(),
            "B:Wa1,c3,e3,g3,b4,c1,e1,g1,b2,d2,f2,h2:Bb6,d6,f6,h6,a7,c7,e7,g7,b8,d8,f8,h8"
        );
        assert_eq!(
            fen_to_variant("W:WK12-14:BK28-31", Variant::Russian).unwrap(),
            "W:WKa5,Kc5,Kh6:BKa1,Kc1,Ke1,Kh2"
        );
    }

    #[test]
    fn test_clock_fields_are_ignored() {
        let parsed = parse_list_fen(&Shape::SMALL, "W:WKd2:Bf6,c5,e5,e3:H0:F1").unwrap();
        assert_eq!(parsed.side, Color::White);
        assert_eq!(parsed.white, vec![(6, true)]);
        assert_eq!(parsed.black.len(), 4);
    }

    #[test]
    fn test_position_from_list_fen() {
        let position =
            position_from_list_fen(Variant::Standard, "W:WK28:B19,37").unwrap();
        assert_eq!(position.turn(), Color::White);
        assert!(position.piece_at(28).unwrap().is_king());
        assert!(!position.piece_at(19).unwrap().is_king());
        assert_eq!(position.searcher().filled_positions().len(), 3);
    }

    #[test]
    fn test_malformed_fens() {
        assert!(parse_list_fen(&Shape::SMALL, "X:W1:B2").is_err());
        assert!(parse_list_fen(&Shape::SMALL, "W").is_err());
        assert!(parse_list_fen(&Shape::SMALL, "W:W99:B1").is_err());
        assert!(parse_list_fen(&Shape::SMALL, "W:W1x3:B2").is_err());
        assert!(parse_list_fen(&Shape::SMALL, "W:W5-2:B1").is_err());
    }

    #[test]
    fn test_move_string_conversions() {
        assert_eq!(
            move_string_from_variant("g3-h4", Variant::Russian).unwrap(),
            "24-20"
        );
        assert_eq!(
            move_string_to_variant("24-20", Variant::Russian).unwrap(),
            "g3-h4"
        );
        assert_eq!(
            move_string_to_numeric("a1a2", Variant::Turkish).unwrap(),
            "1-9"
        );
        assert_eq!(
            move_string_to_numeric("28x17", Variant::Standard).unwrap(),
            "28x17"
        );
        assert_eq!(
            move_string_from_variant("33-28", Variant::Standard).unwrap(),
            "33-28"
        );
    }

    #[test]
    fn test_fen_round_trip() {
        for variant in [
            Variant::Standard,
            Variant::English,
            Variant::Russian,
            Variant::Turkish,
        ] {
            let internal = variant.initial_list_fen();
            let external = fen_to_variant(&internal, variant).unwrap();
            let back = fen_from_variant(&external, variant).unwrap();
            let shape = variant.shape();
            let a = parse_list_fen(&shape, &back).unwrap();
            let b = parse_list_fen(&shape, &internal).unwrap();
            let sort = |mut v: Vec<(u8, bool)>| {
                v.sort_unstable();
                v
            };
            assert_eq!(a.side, b.side);
            assert_eq!(sort(a.white), sort(b.white));
            assert_eq!(sort(a.black), sort(b.black));
        }
    }
}
