//! Generation configuration, per-kind room definitions, and up-front validation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{GridCell, RoomKind};

use super::nav::NAV_GRAPH_MARGIN;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("corridor length must not be negative (got {0})")]
    NegativeCorridorLength(i32),

    #[error("corridor count must not be negative (got {0})")]
    NegativeCorridorCount(i32),

    #[error("corridor width must be at least 1 (got {0})")]
    NonPositiveCorridorWidth(i32),

    #[error("room percent must lie in (0, 1] (got {0})")]
    RoomPercentOutOfRange(f32),

    #[error("room walk iterations must not be negative (got {0})")]
    NegativeWalkIterations(i32),

    #[error("room walk length must not be negative (got {0})")]
    NegativeWalkLength(i32),

    #[error("{0} direction weights are all zero")]
    EmptyDirectionWeights(&'static str),

    #[error("{kind} room definition has min {field} {min} above max {max}")]
    InvertedBounds { kind: RoomKind, field: &'static str, min: u32, max: u32 },

    #[error("a dungeon grown from {start} may reach {reach} cells out, past the i32 grid")]
    ExtentOverflow { start: GridCell, reach: i64 },
}

/// Relative odds of stepping in each cardinal direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectionWeights {
    pub north: u32,
    pub east: u32,
    pub south: u32,
    pub west: u32,
}

impl DirectionWeights {
    pub const UNIFORM: Self = Self { north: 1, east: 1, south: 1, west: 1 };

    /// Weights in `Direction::CARDINAL` order.
    pub fn as_array(&self) -> [u32; 4] {
        [self.north, self.east, self.south, self.west]
    }
}

impl Default for DirectionWeights {
    fn default() -> Self {
        Self::UNIFORM
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalkParameters {
    pub iterations: i32,
    pub walk_length: i32,
    pub start_randomly_each_iteration: bool,
    pub directions: DirectionWeights,
}

impl Default for WalkParameters {
    fn default() -> Self {
        Self {
            iterations: 10,
            walk_length: 10,
            start_randomly_each_iteration: true,
            directions: DirectionWeights::UNIFORM,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomDefinition {
    pub item_prefabs: Vec<String>,
    pub enemy_prefabs: Vec<String>,
    pub min_items: u32,
    pub max_items: u32,
    pub min_enemies: u32,
    pub max_enemies: u32,
    pub spawn_near_walls: bool,
    pub spawn_in_open_space: bool,
}

impl RoomDefinition {
    fn with_prefabs(items: &[&str], enemies: &[&str]) -> Self {
        Self {
            item_prefabs: items.iter().map(|name| name.to_string()).collect(),
            enemy_prefabs: enemies.iter().map(|name| name.to_string()).collect(),
            ..Self::default()
        }
    }
}

impl Default for RoomDefinition {
    fn default() -> Self {
        Self {
            item_prefabs: Vec::new(),
            enemy_prefabs: Vec::new(),
            min_items: 0,
            max_items: 3,
            min_enemies: 0,
            max_enemies: 5,
            spawn_near_walls: false,
            spawn_in_open_space: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomDefinitions {
    pub spawn: RoomDefinition,
    pub boss: RoomDefinition,
    pub enemy: RoomDefinition,
    pub treasure: RoomDefinition,
}

impl RoomDefinitions {
    pub fn for_kind(&self, kind: RoomKind) -> &RoomDefinition {
        match kind {
            RoomKind::Spawn => &self.spawn,
            RoomKind::Boss => &self.boss,
            RoomKind::Enemy => &self.enemy,
            RoomKind::Treasure => &self.treasure,
        }
    }
}

impl Default for RoomDefinitions {
    fn default() -> Self {
        Self {
            spawn: RoomDefinition::default(),
            boss: RoomDefinition {
                min_items: 1,
                max_items: 2,
                min_enemies: 1,
                max_enemies: 1,
                ..RoomDefinition::with_prefabs(&["boss_chest"], &["ant_queen"])
            },
            enemy: RoomDefinition::with_prefabs(&["coin"], &["ant", "ant_spitter"]),
            treasure: RoomDefinition {
                min_items: 2,
                max_items: 4,
                max_enemies: 1,
                spawn_near_walls: true,
                ..RoomDefinition::with_prefabs(&["coin", "gem", "health_potion"], &["ant"])
            },
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DungeonConfig {
    pub corridor_length: i32,
    pub corridor_count: i32,
    pub room_percent: f32,
    pub corridor_width: i32,
    /// Seed for the run; a fresh one is generated and reported when unset.
    pub seed: Option<u64>,
    // Tables last so the TOML form serializes.
    pub start: GridCell,
    pub corridor_directions: DirectionWeights,
    pub room_walk: WalkParameters,
    pub rooms: RoomDefinitions,
}

impl Default for DungeonConfig {
    fn default() -> Self {
        Self {
            corridor_length: 14,
            corridor_count: 5,
            room_percent: 0.8,
            corridor_width: 1,
            seed: None,
            start: GridCell::new(0, 0),
            corridor_directions: DirectionWeights::UNIFORM,
            room_walk: WalkParameters::default(),
            rooms: RoomDefinitions::default(),
        }
    }
}

/// Corridor settings after validation, in the unsigned form the builders consume.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CorridorPlan {
    pub length: usize,
    pub count: usize,
    pub width: usize,
    pub directions: DirectionWeights,
}

/// Room-walk settings after validation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoomWalkPlan {
    pub iterations: usize,
    pub walk_length: usize,
    pub start_randomly_each_iteration: bool,
    pub directions: DirectionWeights,
}

impl DungeonConfig {
    pub fn validate(&self) -> Result<(CorridorPlan, RoomWalkPlan), ConfigError> {
        let length = usize::try_from(self.corridor_length)
            .map_err(|_| ConfigError::NegativeCorridorLength(self.corridor_length))?;
        let count = usize::try_from(self.corridor_count)
            .map_err(|_| ConfigError::NegativeCorridorCount(self.corridor_count))?;
        if self.corridor_width < 1 {
            return Err(ConfigError::NonPositiveCorridorWidth(self.corridor_width));
        }
        if !(self.room_percent > 0.0 && self.room_percent <= 1.0) {
            return Err(ConfigError::RoomPercentOutOfRange(self.room_percent));
        }
        if self.corridor_directions.as_array().iter().all(|&weight| weight == 0) {
            return Err(ConfigError::EmptyDirectionWeights("corridor"));
        }

        let iterations = usize::try_from(self.room_walk.iterations)
            .map_err(|_| ConfigError::NegativeWalkIterations(self.room_walk.iterations))?;
        let walk_length = usize::try_from(self.room_walk.walk_length)
            .map_err(|_| ConfigError::NegativeWalkLength(self.room_walk.walk_length))?;
        if self.room_walk.directions.as_array().iter().all(|&weight| weight == 0) {
            return Err(ConfigError::EmptyDirectionWeights("room walk"));
        }

        for kind in RoomKind::ALL {
            let definition = self.rooms.for_kind(kind);
            check_bounds(kind, "items", definition.min_items, definition.max_items)?;
            check_bounds(kind, "enemies", definition.min_enemies, definition.max_enemies)?;
        }

        let corridors = CorridorPlan {
            length,
            count,
            width: self.corridor_width as usize,
            directions: self.corridor_directions,
        };
        let room_walk = RoomWalkPlan {
            iterations,
            walk_length,
            start_randomly_each_iteration: self.room_walk.start_randomly_each_iteration,
            directions: self.room_walk.directions,
        };
        check_extent(self.start, max_reach(&corridors, &room_walk))?;
        Ok((corridors, room_walk))
    }
}

/// Farthest any painted cell, walls included, can land from the start on one axis.
/// Corridor tails drift `count * length`, the brush adds up to `width`, and a room walk
/// adds `iterations * walk_length` twice: once for the room on a corridor tail and once
/// for a dead-end room grown off that room's edge.
fn max_reach(corridors: &CorridorPlan, room_walk: &RoomWalkPlan) -> i64 {
    let span = |steps: usize, repeats: usize| (steps as i64).saturating_mul(repeats as i64);
    let room = span(room_walk.walk_length, room_walk.iterations);
    span(corridors.length, corridors.count)
        .saturating_add(corridors.width as i64)
        .saturating_add(room.saturating_mul(2))
        .saturating_add(1)
}

/// Every cell within `reach` of `start` must fit in i32, and so must the widest nav
/// graph side built over them.
fn check_extent(start: GridCell, reach: i64) -> Result<(), ConfigError> {
    let fits = |center: i32| {
        let center = i64::from(center);
        center.saturating_sub(reach) >= i64::from(i32::MIN)
            && center.saturating_add(reach) <= i64::from(i32::MAX)
    };
    let widest = reach.saturating_mul(2).saturating_add(i64::from(NAV_GRAPH_MARGIN));
    if fits(start.x) && fits(start.y) && widest <= i64::from(i32::MAX) {
        Ok(())
    } else {
        Err(ConfigError::ExtentOverflow { start, reach })
    }
}

fn check_bounds(
    kind: RoomKind,
    field: &'static str,
    min: u32,
    max: u32,
) -> Result<(), ConfigError> {
    if min > max {
        return Err(ConfigError::InvertedBounds { kind, field, min, max });
    }
    Ok(())
}
