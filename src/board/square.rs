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
use std::ops::Add;
use strum_macros::EnumIter;

/// The geometry of a draughts board.
///
/// Squares are 1-based integers over the playable cells only, numbered
/// row-major from the top (the side the starting player faces). On boards
/// where only every other cell is playable, each row exposes `per_row`
/// playable cells and the visual column of a cell depends on the row
/// parity. The `bottom_left` flag selects the mirrored shading used by
/// Italian boards, where square 1 sits on the left edge of its row.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape {
    total: u8,
    per_row: u8,
    rows: u8,
    alternating: bool,
    bottom_left: bool,
}

impl Shape {
    /// 10x10 international board: 50 playable squares, 5 per row.
    pub const INTERNATIONAL: Shape = Shape::new(50, 5, 10, true, false);
    /// 8x8 board with dark squares playable: 32 squares, 4 per row.
    pub const SMALL: Shape = Shape::new(32, 4, 8, true, false);
    /// 8x8 Italian board: as [`Shape::SMALL`] but with mirrored shading.
    pub const ITALIAN: Shape = Shape::new(32, 4, 8, true, true);
    /// 8x8 Turkish board: every square is playable.
    pub const TURKISH: Shape = Shape::new(64, 8, 8, false, false);

    const fn new(total: u8, per_row: u8, rows: u8, alternating: bool, bottom_left: bool) -> Self {
        Self {
            total,
            per_row,
            rows,
            alternating,
            bottom_left,
        }
    }

    #[inline]
    pub const fn total(&self) -> u8 {
        self.total
    }
    #[inline]
    pub const fn per_row(&self) -> u8 {
        self.per_row
    }
    #[inline]
    pub const fn rows(&self) -> u8 {
        self.rows
    }
    #[inline]
    pub const fn alternating(&self) -> bool {
        self.alternating
    }
    #[inline]
    pub const fn bottom_left(&self) -> bool {
        self.bottom_left
    }

    #[inline]
    pub fn contains(&self, square: u8) -> bool {
        square >= 1 && square <= self.total
    }

    pub fn squares(&self) -> impl Iterator<Item = u8> {
        1..=self.total
    }

    /// 0-based row of a square, counted from the top of the board.
    #[inline]
    pub fn row(&self, square: u8) -> i16 {
        debug_assert!(self.contains(square));
        (square as i16 - 1) / self.per_row as i16
    }

    /// 0-based playable column of a square within its row.
    #[inline]
    pub fn col(&self, square: u8) -> i16 {
        debug_assert!(self.contains(square));
        (square as i16 - 1) % self.per_row as i16
    }

    /// The square at a (row, playable column) pair, if it is on the board.
    #[inline]
    pub fn at(&self, row: i16, col: i16) -> Option<u8> {
        if row < 0 || row >= self.rows as i16 || col < 0 || col >= self.per_row as i16 {
            return None;
        }
        Some((row * self.per_row as i16 + col + 1) as u8)
    }

    #[inline]
    fn parity_offset(&self, row: i16) -> i16 {
        if self.bottom_left {
            row.rem_euclid(2)
        } else {
            1 - row.rem_euclid(2)
        }
    }

    /// Map a square to visual (row, column) coordinates. On alternating
    /// boards the visual column spreads the playable cells over the full
    /// board width, so diagonal and orthogonal rays become straight lines.
    pub fn to_visual(&self, square: u8) -> (i16, i16) {
        let row = self.row(square);
        let col = self.col(square);
        if self.alternating {
            (row, 2 * col + self.parity_offset(row))
        } else {
            (row, col)
        }
    }

    /// Map visual coordinates back to a square. Returns `None` off the
    /// board or on an unplayable cell.
    pub fn from_visual(&self, row: i16, vcol: i16) -> Option<u8> {
        if row < 0 || row >= self.rows as i16 || vcol < 0 {
            return None;
        }
        if self.alternating {
            if vcol >= 2 * self.per_row as i16 {
                return None;
            }
            let offset = self.parity_offset(row);
            if vcol.rem_euclid(2) != offset {
                return None;
            }
            self.at(row, (vcol - offset) / 2)
        } else {
            self.at(row, vcol)
        }
    }

    /// Step from a square by a visual offset.
    pub fn offset(&self, square: u8, offset: Offset) -> Option<u8> {
        let (row, vcol) = self.to_visual(square);
        self.from_visual(row + offset.y, vcol + offset.x)
    }

    /// Render a square in algebraic notation (letter column, digit rank
    /// counted from the bottom). Used for the variants addressed in
    /// algebraic coordinates; the shading convention follows their
    /// published diagrams.
    pub fn to_algebraic(&self, square: u8) -> String {
        let row = self.row(square);
        let col = self.col(square);
        let vcol = if self.alternating {
            2 * col + row.rem_euclid(2)
        } else {
            col
        };
        let file = (b'a' + vcol as u8) as char;
        format!("{}{}", file, row + 1)
    }

    /// Parse an algebraic square. Digits-only input is accepted verbatim
    /// as a numeric square.
    pub fn try_from_algebraic(&self, name: &str) -> Option<u8> {
        let mut chars = name.chars();
        let first = chars.next()?;
        if first.is_ascii_digit() {
            let square: u8 = name.parse().ok()?;
            return self.contains(square).then_some(square);
        }
        let file = first.to_ascii_lowercase();
        if !file.is_ascii_lowercase() {
            return None;
        }
        let rank: i16 = chars.as_str().parse().ok()?;
        let vcol = (file as u8 - b'a') as i16;
        let col = if self.alternating { vcol / 2 } else { vcol };
        if col >= self.per_row as i16 {
            return None;
        }
        let square = (rank - 1) * self.per_row as i16 + col + 1;
        if square < 1 || square > self.total as i16 {
            return None;
        }
        Some(square as u8)
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = if self.alternating {
            self.per_row * 2
        } else {
            self.per_row
        };
        write!(f, "{}x{} ({} squares)", width, self.rows, self.total)
    }
}

/// A visual-coordinate displacement, `x` across columns and `y` down rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Offset {
    pub x: i16,
    pub y: i16,
}

impl Offset {
    pub const fn new(x: i16, y: i16) -> Self {
        Self { x, y }
    }

    pub const fn scaled(&self, by: i16) -> Self {
        Self {
            x: self.x * by,
            y: self.y * by,
        }
    }
}

impl Add for Offset {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum Direction {
    UpLeft,
    Up,
    UpRight,
    Left,
    Right,
    DownLeft,
    Down,
    DownRight,
}

use Direction::{Down, DownLeft, DownRight, Left, Right, Up, UpLeft, UpRight};

impl Direction {
    #[inline]
    pub fn is_orthogonal(&self) -> bool {
        matches!(*self, Up | Left | Right | Down)
    }
    #[inline]
    pub fn is_diagonal(&self) -> bool {
        matches!(*self, UpLeft | UpRight | DownLeft | DownRight)
    }

    /// The smallest playable step in this direction. Diagonal steps always
    /// move one visual cell each way; orthogonal steps must skip the
    /// unplayable cell in between on alternating boards.
    pub fn unit(&self, shape: &Shape) -> Offset {
        let ortho = if shape.alternating() { 2 } else { 1 };
        match *self {
            UpLeft => Offset::new(-1, -1),
            Up => Offset::new(0, -ortho),
            UpRight => Offset::new(1, -1),
            Left => Offset::new(-ortho, 0),
            Right => Offset::new(ortho, 0),
            DownLeft => Offset::new(-1, 1),
            Down => Offset::new(0, ortho),
            DownRight => Offset::new(1, 1),
        }
    }
}

/// How a variant's published square numbering relates to the internal one
/// (which always counts from the starting player's far side).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rotation {
    Identity,
    /// Rotate the board 180 degrees.
    Mirror,
    /// Reverse the row order, keeping the order within each row.
    ReverseRows,
}

impl Rotation {
    /// Apply the rotation to a square. Every rotation used here is an
    /// involution, so the same call converts in either direction.
    pub fn apply(&self, shape: &Shape, square: u8) -> u8 {
        debug_assert!(shape.contains(square));
        match *self {
            Rotation::Identity => square,
            Rotation::Mirror => shape.total() + 1 - square,
            Rotation::ReverseRows => {
                let row = shape.rows() as i16 - 1 - shape.row(square);
                shape.at(row, shape.col(square)).unwrap()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_and_col() {
        let shape = Shape::INTERNATIONAL;
        assert_eq!(shape.row(1), 0);
        assert_eq!(shape.col(1), 0);
        assert_eq!(shape.row(28), 5);
        assert_eq!(shape.col(28), 2);
        assert_eq!(shape.row(50), 9);
        assert_eq!(shape.col(50), 4);
        assert_eq!(shape.at(5, 2), Some(28));
        assert_eq!(shape.at(10, 0), None);
        assert_eq!(shape.at(0, 5), None);
    }

    #[test]
    fn test_visual_round_trip() {
        for shape in [
            Shape::INTERNATIONAL,
            Shape::SMALL,
            Shape::ITALIAN,
            Shape::TURKISH,
        ] {
            for square in shape.squares() {
                let (row, vcol) = shape.to_visual(square);
                assert_eq!(shape.from_visual(row, vcol), Some(square));
            }
        }
    }

    #[test]
    fn test_unplayable_cells_are_not_squares() {
        let shape = Shape::INTERNATIONAL;
        let (row, vcol) = shape.to_visual(28);
        assert_eq!(shape.from_visual(row, vcol + 1), None);
        assert_eq!(shape.from_visual(row, vcol - 1), None);
    }

    #[test]
    fn test_diagonal_neighbors() {
        let shape = Shape::INTERNATIONAL;
        // 28 sits between 22/23 above and 32/33 below.
        assert_eq!(shape.offset(28, UpLeft.unit(&shape)), Some(22));
        assert_eq!(shape.offset(28, UpRight.unit(&shape)), Some(23));
        assert_eq!(shape.offset(28, DownLeft.unit(&shape)), Some(32));
        assert_eq!(shape.offset(28, DownRight.unit(&shape)), Some(33));
    }

    #[test]
    fn test_italian_shading_is_mirrored() {
        // On the Italian board 25's up-right diagonal runs 21, 18.
        let shape = Shape::ITALIAN;
        assert_eq!(shape.offset(25, UpRight.unit(&shape)), Some(21));
        assert_eq!(shape.offset(21, UpRight.unit(&shape)), Some(18));
        // On the other 8x8 boards it runs 22, 18 instead.
        let shape = Shape::SMALL;
        assert_eq!(shape.offset(25, UpRight.unit(&shape)), Some(22));
        assert_eq!(shape.offset(25, UpLeft.unit(&shape)), Some(21));
    }

    #[test]
    fn test_orthogonal_steps() {
        let shape = Shape::INTERNATIONAL;
        // Vertical neighbors are two rows apart, horizontal two cells.
        assert_eq!(shape.offset(28, Up.unit(&shape)), Some(18));
        assert_eq!(shape.offset(28, Down.unit(&shape)), Some(38));
        assert_eq!(shape.offset(28, Left.unit(&shape)), Some(27));
        assert_eq!(shape.offset(28, Right.unit(&shape)), Some(29));

        let shape = Shape::TURKISH;
        assert_eq!(shape.offset(28, Up.unit(&shape)), Some(20));
        assert_eq!(shape.offset(28, Left.unit(&shape)), Some(27));
    }

    #[test]
    fn test_rotations_are_involutions() {
        for (shape, rotation) in [
            (Shape::SMALL, Rotation::Mirror),
            (Shape::SMALL, Rotation::ReverseRows),
            (Shape::TURKISH, Rotation::ReverseRows),
            (Shape::INTERNATIONAL, Rotation::Identity),
        ] {
            for square in shape.squares() {
                let rotated = rotation.apply(&shape, square);
                assert_eq!(rotation.apply(&shape, rotated), square);
            }
        }
    }

    #[test]
    fn test_reverse_rows() {
        let shape = Shape::SMALL;
        assert_eq!(Rotation::ReverseRows.apply(&shape, 6), 26);
        assert_eq!(Rotation::ReverseRows.apply(&shape, 1), 29);
        assert_eq!(Rotation::ReverseRows.apply(&shape, 32), 4);
    }

    #[test]
    fn test_algebraic() {
        let shape = Shape::SMALL;
        assert_eq!(shape.to_algebraic(32), "h8");
        assert_eq!(shape.to_algebraic(1), "a1");
        assert_eq!(shape.try_from_algebraic("h8"), Some(32));
        assert_eq!(shape.try_from_algebraic("d2"), Some(6));
        assert_eq!(shape.try_from_algebraic("32"), Some(32));
        assert_eq!(shape.try_from_algebraic("z9"), None);

        let shape = Shape::TURKISH;
        assert_eq!(shape.try_from_algebraic("a1"), Some(1));
        assert_eq!(shape.try_from_algebraic("a2"), Some(9));
        assert_eq!(shape.to_algebraic(9), "a2");
    }
}
