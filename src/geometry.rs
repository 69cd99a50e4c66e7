// =============================================================================
// GEOMETRY.RS: Grid points and directions for the arena
//
// - `Point<T>` value type shared by logical cells (`i32`) and visual offsets (`f32`)
// - Componentwise ordering for bounds checks
// - Euclidean distance and the fixed 4-neighbour enumeration used by A*
// =============================================================================

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Offsets with both components below this magnitude snap to zero.
pub const EPSILON: f32 = 0.01;

/// Scalar component of a [`Point`].
///
/// Only `i32` and `f32` implement it, so mixing a point with anything that
/// isn't a point (or a matching scalar) is rejected at compile time.
pub trait Coord:
    Copy
    + PartialEq
    + PartialOrd
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Neg<Output = Self>
{
    const ZERO: Self;

    fn to_f32(self) -> f32;
    fn abs(self) -> Self;
}

impl Coord for i32 {
    const ZERO: Self = 0;

    #[inline]
    fn to_f32(self) -> f32 {
        self as f32
    }

    #[inline]
    fn abs(self) -> Self {
        i32::abs(self)
    }
}

impl Coord for f32 {
    const ZERO: Self = 0.0;

    #[inline]
    fn to_f32(self) -> f32 {
        self
    }

    #[inline]
    fn abs(self) -> Self {
        f32::abs(self)
    }
}

/// An (x, y) pair. Equality and hashing are purely structural.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point<T> {
    pub x: T,
    pub y: T,
}

/// A logical arena cell.
pub type GridPoint = Point<i32>;

/// A residual visual displacement, in cells.
pub type Offset = Point<f32>;

impl<T: Coord> Point<T> {
    pub const ZERO: Self = Self { x: T::ZERO, y: T::ZERO };

    pub const fn new(x: T, y: T) -> Self {
        Self { x, y }
    }

    /// Componentwise absolute value.
    pub fn abs(self) -> Self {
        Self::new(self.x.abs(), self.y.abs())
    }

    /// Straight-line distance to `other`.
    pub fn dist(self, other: Self) -> f32 {
        let dx = (self.x - other.x).to_f32();
        let dy = (self.y - other.y).to_f32();
        (dx * dx + dy * dy).sqrt()
    }

    pub fn to_f32(self) -> Offset {
        Point::new(self.x.to_f32(), self.y.to_f32())
    }

    pub fn to_vec2(self) -> Vec2 {
        Vec2::new(self.x.to_f32(), self.y.to_f32())
    }
}

impl GridPoint {
    pub const UP: Self = Self::new(0, -1);
    pub const RIGHT: Self = Self::new(1, 0);
    pub const DOWN: Self = Self::new(0, 1);
    pub const LEFT: Self = Self::new(-1, 0);

    /// The four orthogonal neighbours in up, right, down, left order.
    ///
    /// Always four points; filtering against the board is up to the caller.
    pub fn neighbors(self) -> [Self; 4] {
        [self + Self::UP, self + Self::RIGHT, self + Self::DOWN, self + Self::LEFT]
    }

    /// Taxicab distance, the optimal 4-directional step count.
    pub fn manhattan(self, other: Self) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }
}

impl Offset {
    /// Nearest integer cell.
    pub fn round(self) -> GridPoint {
        Point::new(self.x.round() as i32, self.y.round() as i32)
    }

    /// True when both components are within [`EPSILON`] of zero.
    pub fn is_negligible(self) -> bool {
        self.x.abs() < EPSILON && self.y.abs() < EPSILON
    }
}

// =============================================================================
// OPERATORS
// =============================================================================

impl<T: Coord> Add for Point<T> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl<T: Coord> AddAssign for Point<T> {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl<T: Coord> Sub for Point<T> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        self + -rhs
    }
}

impl<T: Coord> SubAssign for Point<T> {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl<T: Coord> Neg for Point<T> {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

impl<T: Coord> Mul<T> for Point<T> {
    type Output = Self;

    fn mul(self, rhs: T) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

/// Componentwise partial order: `a <= b` iff `a.x <= b.x && a.y <= b.y`.
/// Points that are larger on one axis and smaller on the other are unordered.
impl<T: Coord> PartialOrd for Point<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self == other {
            Some(Ordering::Equal)
        } else if self.x <= other.x && self.y <= other.y {
            Some(Ordering::Less)
        } else if self.x >= other.x && self.y >= other.y {
            Some(Ordering::Greater)
        } else {
            None
        }
    }
}

impl<T: fmt::Display> fmt::Display for Point<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

// =============================================================================
// DIRECTION
// =============================================================================

/// One of the four steps a player can take.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Right, Direction::Down, Direction::Left];

    /// Unit vector for this direction.
    pub fn delta(self) -> GridPoint {
        match self {
            Direction::Up => GridPoint::UP,
            Direction::Right => GridPoint::RIGHT,
            Direction::Down => GridPoint::DOWN,
            Direction::Left => GridPoint::LEFT,
        }
    }
}
