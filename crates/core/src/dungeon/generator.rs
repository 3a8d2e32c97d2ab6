//! End-to-end generation: corridors, rooms, dead-end rooms, painting, classification,
//! and population, driven by one seeded stream.

use std::sync::atomic::{AtomicBool, Ordering};

use thiserror::Error;
use tracing::info;

use super::classify::classify_rooms;
use super::config::{ConfigError, DungeonConfig};
use super::corridors::build_corridors;
use super::dead_ends::augment_dead_ends;
use super::host::{Host, PlayerAvatar};
use super::model::DungeonResult;
use super::populate::populate_rooms;
use super::rng::{DungeonRng, SeedChoice};
use super::rooms::{RoomRegistry, place_rooms};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DungeonError {
    #[error("invalid dungeon config: {0}")]
    InvalidConfig(#[from] ConfigError),

    #[error("a generation is already running on this generator")]
    GenerationInProgress,
}

/// Runs generations one at a time. A call made while another is still running on the
/// same generator, for example from inside a collaborator, is refused.
#[derive(Debug, Default)]
pub struct DungeonGenerator {
    in_flight: AtomicBool,
}

struct GenerationGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> GenerationGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed).ok()?;
        Some(Self { flag })
    }
}

impl Drop for GenerationGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

impl DungeonGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_generating(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn generate(
        &self,
        config: &DungeonConfig,
        host: &mut Host<'_>,
    ) -> Result<DungeonResult, DungeonError> {
        let (corridor_plan, room_walk) = config.validate()?;
        let _guard =
            GenerationGuard::acquire(&self.in_flight).ok_or(DungeonError::GenerationInProgress)?;

        let seed = SeedChoice::resolve(config.seed);
        let mut rng = DungeonRng::from_seed(seed.value());
        let start = config.start;

        let corridors = build_corridors(&mut rng, start, &corridor_plan);
        let mut registry = RoomRegistry::new();
        let room_floor = place_rooms(
            &mut rng,
            &corridors.candidates,
            config.room_percent,
            &room_walk,
            &mut registry,
        );

        let mut floor = corridors.floor;
        floor.extend(room_floor);
        let dead_end_floor = augment_dead_ends(&mut rng, &floor, &room_walk, &mut registry);
        floor.extend(dead_end_floor);

        host.painter.paint_floor(&floor);
        host.walls.build_walls(&floor, &mut *host.painter);

        let rooms = classify_rooms(&mut rng, registry.freeze(), &floor, start, &config.rooms);
        let population = populate_rooms(
            &mut rng,
            &rooms,
            &config.rooms,
            &mut *host.content,
            host.player.as_deref_mut().map(|player| player as &mut dyn PlayerAvatar),
        );

        let result = DungeonResult {
            seed,
            start,
            player_spawn: population.player_spawn.unwrap_or(start),
            floor,
            rooms,
            spawns: population.spawns,
        };
        info!(
            seed = seed.value(),
            generated_seed = seed.is_generated(),
            floor = result.floor.len(),
            rooms = result.rooms.len(),
            spawns = result.spawns.len(),
            fingerprint = result.fingerprint(),
            "dungeon generated"
        );
        Ok(result)
    }
}
