use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Integer cell on the dungeon grid. `y` grows northwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GridCell {
    pub x: i32,
    pub y: i32,
}

impl GridCell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Plain i32 arithmetic. Generation stays in range because config validation rejects
    /// any start whose reachable extent leaves the grid.
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self { x: self.x + dx, y: self.y + dy }
    }

    pub fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.offset(dx, dy)
    }

    pub fn cardinal_neighbors(self) -> [GridCell; 4] {
        Direction::CARDINAL.map(|direction| self.step(direction))
    }

    pub fn surrounding(self) -> [GridCell; 8] {
        [
            self.offset(0, 1),
            self.offset(1, 1),
            self.offset(1, 0),
            self.offset(1, -1),
            self.offset(0, -1),
            self.offset(-1, -1),
            self.offset(-1, 0),
            self.offset(-1, 1),
        ]
    }

    pub fn euclidean_distance(self, other: GridCell) -> f64 {
        let dx = f64::from(self.x) - f64::from(other.x);
        let dy = f64::from(self.y) - f64::from(other.y);
        dx.hypot(dy)
    }
}

impl fmt::Display for GridCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Walkable cells. Iteration is ascending by `(x, y)`, which is the enumeration order
/// every order-dependent rule in generation relies on.
pub type FloorSet = BTreeSet<GridCell>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    pub const CARDINAL: [Direction; 4] =
        [Direction::North, Direction::East, Direction::South, Direction::West];

    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::North => (0, 1),
            Direction::East => (1, 0),
            Direction::South => (0, -1),
            Direction::West => (-1, 0),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RoomKind {
    Spawn,
    Boss,
    Enemy,
    Treasure,
}

impl RoomKind {
    pub const ALL: [RoomKind; 4] =
        [RoomKind::Spawn, RoomKind::Boss, RoomKind::Enemy, RoomKind::Treasure];
}

impl fmt::Display for RoomKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RoomKind::Spawn => "spawn",
            RoomKind::Boss => "boss",
            RoomKind::Enemy => "enemy",
            RoomKind::Treasure => "treasure",
        };
        f.write_str(label)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SpawnKind {
    Item,
    Enemy,
}

/// Opaque handle returned by a content factory for something it created.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ContentHandle(pub u64);
