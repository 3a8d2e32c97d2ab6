//! Gameplay role assignment for registered rooms.

use crate::types::{FloorSet, GridCell, RoomKind};

use super::config::RoomDefinitions;
use super::model::Room;
use super::rng::DungeonRng;
use super::rooms::RoomFootprint;

/// Assigns gameplay roles to the registered footprints.
///
/// The output lists the spawn room first, then the boss room, then every remaining
/// footprint in registry order. The spawn room is the first footprint. The boss room is
/// the footprint whose seed lies farthest from `start` over all footprints, the first one
/// winning a tie; when that is the spawn footprint, the same tiles are listed twice, once
/// per role. Every other footprint is an enemy or treasure room on a coin flip. With no
/// footprints at all the whole floor becomes a single spawn room.
pub fn classify_rooms(
    rng: &mut DungeonRng,
    footprints: Vec<RoomFootprint>,
    floor: &FloorSet,
    start: GridCell,
    definitions: &RoomDefinitions,
) -> Vec<Room> {
    let Some(boss_index) = farthest_from(&footprints, start) else {
        tracing::warn!(cells = floor.len(), "no rooms registered, using the whole floor");
        return vec![Room::new(start, floor.clone(), RoomKind::Spawn, definitions)];
    };

    let mut rooms = Vec::with_capacity(footprints.len() + 1);
    let spawn = &footprints[0];
    rooms.push(Room::new(spawn.seed, spawn.tiles.clone(), RoomKind::Spawn, definitions));
    let boss = &footprints[boss_index];
    rooms.push(Room::new(boss.seed, boss.tiles.clone(), RoomKind::Boss, definitions));
    if boss_index == 0 {
        tracing::debug!(seed = %boss.seed, "spawn room is also the farthest, doubling as boss");
    }

    for (index, footprint) in footprints.into_iter().enumerate() {
        if index == 0 || index == boss_index {
            continue;
        }
        let kind = if rng.coin_flip() { RoomKind::Enemy } else { RoomKind::Treasure };
        rooms.push(Room::new(footprint.seed, footprint.tiles, kind, definitions));
    }
    rooms
}

/// Index of the footprint whose seed is farthest from `start`.
fn farthest_from(footprints: &[RoomFootprint], start: GridCell) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (index, footprint) in footprints.iter().enumerate() {
        let distance = footprint.seed.euclidean_distance(start);
        if best.is_none_or(|(_, best_distance)| distance > best_distance) {
            best = Some((index, distance));
        }
    }
    best.map(|(index, _)| index)
}
