//! Public data models for generated dungeons, classified rooms, and content spawns.

use serde::{Deserialize, Serialize};
use xxhash_rust::xxh3::xxh3_64;

use crate::types::{ContentHandle, FloorSet, GridCell, RoomKind, SpawnKind};

use super::config::RoomDefinitions;
use super::nav::{GenerationComplete, NavBounds};
use super::rng::SeedChoice;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub seed: GridCell,
    pub tiles: FloorSet,
    pub kind: RoomKind,
    pub spawn_near_walls: bool,
    pub spawn_in_open_space: bool,
}

impl Room {
    pub fn new(
        seed: GridCell,
        tiles: FloorSet,
        kind: RoomKind,
        definitions: &RoomDefinitions,
    ) -> Self {
        let definition = definitions.for_kind(kind);
        Self {
            seed,
            tiles,
            kind,
            spawn_near_walls: definition.spawn_near_walls,
            spawn_in_open_space: definition.spawn_in_open_space,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnRecord {
    pub room_seed: GridCell,
    /// Spawn and boss rooms can share a seed, so the room is identified by both.
    pub room_kind: RoomKind,
    pub kind: SpawnKind,
    pub prefab: String,
    pub position: GridCell,
    pub handle: ContentHandle,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DungeonResult {
    /// Seed the run actually used, and whether it was configured or generated.
    pub seed: SeedChoice,
    pub start: GridCell,
    pub floor: FloorSet,
    pub rooms: Vec<Room>,
    pub player_spawn: GridCell,
    pub spawns: Vec<SpawnRecord>,
}

impl DungeonResult {
    pub fn room_of_kind(&self, kind: RoomKind) -> Option<&Room> {
        self.rooms.iter().find(|room| room.kind == kind)
    }

    pub fn spawns_in<'a>(&'a self, room: &'a Room) -> impl Iterator<Item = &'a SpawnRecord> {
        self.spawns
            .iter()
            .filter(move |spawn| spawn.room_seed == room.seed && spawn.room_kind == room.kind)
    }

    pub fn completion_event(&self) -> GenerationComplete {
        GenerationComplete { seed: self.seed.value(), bounds: NavBounds::from_floor(&self.floor) }
    }

    /// Stable byte encoding of everything generation decides. Content handles are left
    /// out because the factory, not the generator, chooses them, and so is the seed's
    /// origin: a replayed generated seed encodes the same as the original run.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend(self.seed.value().to_le_bytes());
        push_cell(&mut bytes, self.start);

        bytes.extend((self.floor.len() as u32).to_le_bytes());
        for &cell in &self.floor {
            push_cell(&mut bytes, cell);
        }

        bytes.extend((self.rooms.len() as u32).to_le_bytes());
        for room in &self.rooms {
            push_cell(&mut bytes, room.seed);
            bytes.push(kind_byte(room.kind));
            bytes.extend((room.tiles.len() as u32).to_le_bytes());
            for &cell in &room.tiles {
                push_cell(&mut bytes, cell);
            }
        }

        push_cell(&mut bytes, self.player_spawn);

        bytes.extend((self.spawns.len() as u32).to_le_bytes());
        for spawn in &self.spawns {
            push_cell(&mut bytes, spawn.room_seed);
            bytes.push(kind_byte(spawn.room_kind));
            bytes.push(match spawn.kind {
                SpawnKind::Item => 0,
                SpawnKind::Enemy => 1,
            });
            bytes.extend((spawn.prefab.len() as u32).to_le_bytes());
            bytes.extend(spawn.prefab.as_bytes());
            push_cell(&mut bytes, spawn.position);
        }

        bytes
    }

    pub fn fingerprint(&self) -> u64 {
        xxh3_64(&self.canonical_bytes())
    }
}

fn kind_byte(kind: RoomKind) -> u8 {
    match kind {
        RoomKind::Spawn => 0,
        RoomKind::Boss => 1,
        RoomKind::Enemy => 2,
        RoomKind::Treasure => 3,
    }
}

fn push_cell(bytes: &mut Vec<u8>, cell: GridCell) {
    bytes.extend(cell.x.to_le_bytes());
    bytes.extend(cell.y.to_le_bytes());
}
