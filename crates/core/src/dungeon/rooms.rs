//! Room footprints, the insertion-ordered registry, and seed-sampled room placement.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::{FloorSet, GridCell};

use super::config::RoomWalkPlan;
use super::rng::DungeonRng;
use super::walk::run_random_walk;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomFootprint {
    pub seed: GridCell,
    pub tiles: FloorSet,
}

/// Rooms keyed by seed, remembering the order they were registered in. The first entry
/// is the first room generated.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RoomRegistry {
    rooms: Vec<RoomFootprint>,
    index_by_seed: BTreeMap<GridCell, usize>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a room. Re-registering a seed replaces its tiles but keeps its slot.
    pub fn insert(&mut self, seed: GridCell, tiles: FloorSet) {
        if let Some(&index) = self.index_by_seed.get(&seed) {
            self.rooms[index].tiles = tiles;
            return;
        }
        self.index_by_seed.insert(seed, self.rooms.len());
        self.rooms.push(RoomFootprint { seed, tiles });
    }

    pub fn get(&self, seed: GridCell) -> Option<&RoomFootprint> {
        self.index_by_seed.get(&seed).map(|&index| &self.rooms[index])
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RoomFootprint> {
        self.rooms.iter()
    }

    pub fn covers(&self, cell: GridCell) -> bool {
        self.rooms.iter().any(|room| room.tiles.contains(&cell))
    }

    /// Ends registration. The footprints come back in insertion order.
    pub fn freeze(self) -> Vec<RoomFootprint> {
        self.rooms
    }
}

// Absorbs f32 representation error, e.g. 0.2_f32 is slightly above 0.2.
const PERCENT_TOLERANCE: f64 = 1e-6;

/// Number of rooms to grow from `candidate_count` seeds: `ceil(count * percent)`.
pub fn rooms_to_create(candidate_count: usize, room_percent: f32) -> usize {
    let exact = candidate_count as f64 * f64::from(room_percent);
    let wanted = (exact - PERCENT_TOLERANCE).ceil().max(0.0) as usize;
    wanted.min(candidate_count)
}

/// Grows rooms on a random subset of `candidates` and returns the union of their cells.
pub fn place_rooms(
    rng: &mut DungeonRng,
    candidates: &[GridCell],
    room_percent: f32,
    room_walk: &RoomWalkPlan,
    registry: &mut RoomRegistry,
) -> FloorSet {
    let mut distinct = Vec::with_capacity(candidates.len());
    for &candidate in candidates {
        if !distinct.contains(&candidate) {
            distinct.push(candidate);
        }
    }

    let room_count = rooms_to_create(distinct.len(), room_percent);
    rng.shuffle(&mut distinct);

    let mut room_floor = FloorSet::new();
    for &seed in &distinct[..room_count] {
        let tiles = run_random_walk(rng, room_walk, seed);
        room_floor.extend(tiles.iter().copied());
        registry.insert(seed, tiles);
    }
    room_floor
}
