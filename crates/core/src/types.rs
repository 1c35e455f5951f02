use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Pos {
    pub y: i32,
    pub x: i32,
}

impl Pos {
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self { y: self.y + dy, x: self.x + dx }
    }
}

/// Compass heading used both for neighbor lookup and for corridor growth.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    North,
    East,
    South,
    West,
}

impl Direction {
    pub const ALL: [Self; 4] = [Self::North, Self::East, Self::South, Self::West];

    pub fn delta(self) -> (i32, i32) {
        match self {
            Self::North => (0, -1),
            Self::East => (1, 0),
            Self::South => (0, 1),
            Self::West => (-1, 0),
        }
    }
}

/// Cell classification alphabet.
///
/// Outer corners sit on the external silhouette of a structure; inner corners
/// mark the concave junction where two carved rectangles meet.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Symbol {
    #[default]
    Empty,
    Floor,
    Door,
    Wall,
    WallVertical,
    WallHorizontal,
    WallCross,
    CornerUpperLeft,
    CornerUpperRight,
    CornerLowerLeft,
    CornerLowerRight,
    InnerUpperLeft,
    InnerUpperRight,
    InnerLowerLeft,
    InnerLowerRight,
}

impl Symbol {
    pub const ALL: [Self; 15] = [
        Self::Empty,
        Self::Floor,
        Self::Door,
        Self::Wall,
        Self::WallVertical,
        Self::WallHorizontal,
        Self::WallCross,
        Self::CornerUpperLeft,
        Self::CornerUpperRight,
        Self::CornerLowerLeft,
        Self::CornerLowerRight,
        Self::InnerUpperLeft,
        Self::InnerUpperRight,
        Self::InnerLowerLeft,
        Self::InnerLowerRight,
    ];

    pub fn is_wall(self) -> bool {
        match self {
            Self::Empty | Self::Floor | Self::Door => false,
            Self::Wall
            | Self::WallVertical
            | Self::WallHorizontal
            | Self::WallCross
            | Self::CornerUpperLeft
            | Self::CornerUpperRight
            | Self::CornerLowerLeft
            | Self::CornerLowerRight
            | Self::InnerUpperLeft
            | Self::InnerUpperRight
            | Self::InnerLowerLeft
            | Self::InnerLowerRight => true,
        }
    }

    pub fn is_outer_corner(self) -> bool {
        matches!(
            self,
            Self::CornerUpperLeft
                | Self::CornerUpperRight
                | Self::CornerLowerLeft
                | Self::CornerLowerRight
        )
    }

    pub fn is_inner_corner(self) -> bool {
        matches!(
            self,
            Self::InnerUpperLeft | Self::InnerUpperRight | Self::InnerLowerLeft | Self::InnerLowerRight
        )
    }

    pub fn is_corner(self) -> bool {
        self.is_outer_corner() || self.is_inner_corner()
    }

    /// Corners and crosses are the vertices of traced wall outlines.
    pub fn is_trace_target(self) -> bool {
        self.is_corner() || self == Self::WallCross
    }

    pub fn glyph(self) -> char {
        match self {
            Self::Empty => ' ',
            Self::Floor => '.',
            Self::Door => 'D',
            Self::Wall => 'W',
            Self::WallVertical => '│',
            Self::WallHorizontal => '─',
            Self::WallCross => '┼',
            Self::CornerUpperLeft => '┌',
            Self::CornerUpperRight => '┐',
            Self::CornerLowerLeft => '└',
            Self::CornerLowerRight => '┘',
            Self::InnerUpperLeft => '┏',
            Self::InnerUpperRight => '┓',
            Self::InnerLowerLeft => '┗',
            Self::InnerLowerRight => '┛',
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Self::Empty => 0,
            Self::Floor => 1,
            Self::Door => 2,
            Self::Wall => 3,
            Self::WallVertical => 4,
            Self::WallHorizontal => 5,
            Self::WallCross => 6,
            Self::CornerUpperLeft => 7,
            Self::CornerUpperRight => 8,
            Self::CornerLowerLeft => 9,
            Self::CornerLowerRight => 10,
            Self::InnerUpperLeft => 11,
            Self::InnerUpperRight => 12,
            Self::InnerLowerLeft => 13,
            Self::InnerLowerRight => 14,
        }
    }
}

/// One of the four corners of a rectangle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Corner {
    UpperLeft,
    UpperRight,
    LowerLeft,
    LowerRight,
}

impl Corner {
    pub fn outer(self) -> Symbol {
        match self {
            Self::UpperLeft => Symbol::CornerUpperLeft,
            Self::UpperRight => Symbol::CornerUpperRight,
            Self::LowerLeft => Symbol::CornerLowerLeft,
            Self::LowerRight => Symbol::CornerLowerRight,
        }
    }

    pub fn inner(self) -> Symbol {
        match self {
            Self::UpperLeft => Symbol::InnerUpperLeft,
            Self::UpperRight => Symbol::InnerUpperRight,
            Self::LowerLeft => Symbol::InnerLowerLeft,
            Self::LowerRight => Symbol::InnerLowerRight,
        }
    }
}
