//! Corridor-first procedural dungeon generation split into coherent submodules.

pub mod config;
pub mod host;
pub mod model;
pub mod nav;

mod classify;
mod corridors;
mod dead_ends;
mod generator;
mod populate;
mod rng;
mod rooms;
mod walk;

pub use classify::classify_rooms;
pub use config::{
    ConfigError, CorridorPlan, DirectionWeights, DungeonConfig, RoomDefinition, RoomDefinitions,
    RoomWalkPlan, WalkParameters,
};
pub use corridors::{CorridorLayout, build_corridors};
pub use dead_ends::{augment_dead_ends, find_dead_ends, floor_neighbor_count};
pub use generator::{DungeonError, DungeonGenerator};
pub use host::{ContentFactory, FloorPainter, Headless, Host, NavGraph, PlayerAvatar, WallBuilder};
pub use model::{DungeonResult, Room, SpawnRecord};
pub use nav::{
    DEFAULT_SETTLE_DELAY, GenerationComplete, NAV_GRAPH_MARGIN, NavBounds, NavPoint,
    NavSyncScheduler, SkipReason, SyncOutcome,
};
pub use populate::{Population, center_tile, is_near_wall, pick_spawn_position, populate_rooms};
pub use rng::{DungeonRng, SeedChoice};
pub use rooms::{RoomFootprint, RoomRegistry, place_rooms, rooms_to_create};
pub use walk::{random_walk, run_random_walk, walk_path};

/// Generates with collaborators that render nothing and number spawns sequentially.
pub fn generate_dungeon(config: &DungeonConfig) -> Result<DungeonResult, DungeonError> {
    let mut painter = Headless::default();
    let mut walls = Headless::default();
    let mut content = Headless::default();
    let mut host =
        Host { painter: &mut painter, walls: &mut walls, content: &mut content, player: None };
    DungeonGenerator::new().generate(config, &mut host)
}
