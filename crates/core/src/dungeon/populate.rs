//! Player placement and per-room item/enemy spawning.

use tracing::{debug, warn};

use crate::types::{FloorSet, GridCell, RoomKind, SpawnKind};

use super::config::{RoomDefinition, RoomDefinitions};
use super::host::{ContentFactory, PlayerAvatar};
use super::model::{Room, SpawnRecord};
use super::rng::DungeonRng;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Population {
    pub player_spawn: Option<GridCell>,
    pub spawns: Vec<SpawnRecord>,
}

/// A tile is near a wall when any of its eight surrounding cells is outside the room.
pub fn is_near_wall(cell: GridCell, tiles: &FloorSet) -> bool {
    cell.surrounding().iter().filter(|next| tiles.contains(next)).count() < 8
}

/// The `len / 2`-th tile in enumeration order. Close to the middle for compact rooms,
/// not a centroid.
pub fn center_tile(tiles: &FloorSet) -> Option<GridCell> {
    tiles.iter().nth(tiles.len() / 2).copied()
}

/// Random tile matching the wall preference, or any tile when none match. `None` only
/// for an empty room.
pub fn pick_spawn_position(
    rng: &mut DungeonRng,
    tiles: &FloorSet,
    prefer_near_wall: bool,
) -> Option<GridCell> {
    let preferred: Vec<GridCell> = tiles
        .iter()
        .copied()
        .filter(|&cell| is_near_wall(cell, tiles) == prefer_near_wall)
        .collect();
    if preferred.is_empty() {
        let all: Vec<GridCell> = tiles.iter().copied().collect();
        return rng.choose(&all).copied();
    }
    rng.choose(&preferred).copied()
}

pub fn populate_rooms(
    rng: &mut DungeonRng,
    rooms: &[Room],
    definitions: &RoomDefinitions,
    content: &mut dyn ContentFactory,
    mut player: Option<&mut dyn PlayerAvatar>,
) -> Population {
    let mut population = Population::default();
    for room in rooms {
        debug!(kind = %room.kind, seed = %room.seed, tiles = room.tiles.len(), "populating room");
        if room.kind == RoomKind::Spawn {
            let Some(cell) = center_tile(&room.tiles) else {
                warn!(seed = %room.seed, "spawn room has no tiles");
                continue;
            };
            if let Some(avatar) = player.as_mut() {
                avatar.teleport(cell);
            }
            population.player_spawn = Some(cell);
            continue;
        }

        let definition = definitions.for_kind(room.kind);
        spawn_batch(rng, room, definition, SpawnKind::Item, content, &mut population.spawns);
        spawn_batch(rng, room, definition, SpawnKind::Enemy, content, &mut population.spawns);
    }
    population
}

fn spawn_batch(
    rng: &mut DungeonRng,
    room: &Room,
    definition: &RoomDefinition,
    kind: SpawnKind,
    content: &mut dyn ContentFactory,
    spawns: &mut Vec<SpawnRecord>,
) {
    let (prefabs, min_count, max_count, prefer_near_wall) = match kind {
        SpawnKind::Item => (
            &definition.item_prefabs,
            definition.min_items,
            definition.max_items,
            room.spawn_near_walls,
        ),
        SpawnKind::Enemy => (
            &definition.enemy_prefabs,
            definition.min_enemies,
            definition.max_enemies,
            !room.spawn_in_open_space,
        ),
    };

    if prefabs.is_empty() {
        warn!(room = %room.kind, ?kind, "no prefabs assigned, skipping");
        return;
    }

    let count = rng.range_inclusive(min_count, max_count);
    for _ in 0..count {
        let Some(position) = pick_spawn_position(rng, &room.tiles, prefer_near_wall) else {
            warn!(seed = %room.seed, "room has no tiles to spawn on");
            return;
        };
        let Some(prefab) = rng.choose(prefabs) else {
            return;
        };
        debug!(?kind, prefab = %prefab, %position, "spawning");
        let handle = content.spawn_at(kind, prefab, position);
        spawns.push(SpawnRecord {
            room_seed: room.seed,
            room_kind: room.kind,
            kind,
            prefab: prefab.clone(),
            position,
            handle,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ContentHandle;

    #[derive(Default)]
    struct RecordingFactory {
        created: Vec<(SpawnKind, String, GridCell)>,
    }

    impl ContentFactory for RecordingFactory {
        fn spawn_at(
            &mut self,
            kind: SpawnKind,
            prefab: &str,
            position: GridCell,
        ) -> ContentHandle {
            self.created.push((kind, prefab.to_string(), position));
            ContentHandle(self.created.len() as u64)
        }
    }

    #[derive(Default)]
    struct RecordingAvatar {
        teleports: Vec<GridCell>,
    }

    impl PlayerAvatar for RecordingAvatar {
        fn teleport(&mut self, position: GridCell) {
            self.teleports.push(position);
        }
    }

    fn square(size: i32) -> FloorSet {
        (0..size).flat_map(|x| (0..size).map(move |y| GridCell::new(x, y))).collect()
    }

    fn room(kind: RoomKind, tiles: FloorSet, definitions: &RoomDefinitions) -> Room {
        let seed = tiles.first().copied().unwrap_or(GridCell::new(0, 0));
        Room::new(seed, tiles, kind, definitions)
    }

    #[test]
    fn near_wall_means_a_missing_surrounding_cell() {
        let tiles = square(5);
        assert!(is_near_wall(GridCell::new(0, 0), &tiles));
        assert!(is_near_wall(GridCell::new(4, 2), &tiles));
        assert!(!is_near_wall(GridCell::new(2, 2), &tiles));
        assert!(!is_near_wall(GridCell::new(1, 1), &tiles));
    }

    #[test]
    fn center_tile_is_the_middle_of_enumeration_order() {
        let tiles: FloorSet = (0..5).map(|x| GridCell::new(x, 0)).collect();
        assert_eq!(center_tile(&tiles), Some(GridCell::new(2, 0)));
        assert_eq!(center_tile(&FloorSet::new()), None);
    }

    #[test]
    fn preference_filters_candidates() {
        let tiles = square(5);
        let mut rng = DungeonRng::from_seed(4);
        for _ in 0..100 {
            let open = pick_spawn_position(&mut rng, &tiles, false).expect("tile");
            assert!(!is_near_wall(open, &tiles));
            let edge = pick_spawn_position(&mut rng, &tiles, true).expect("tile");
            assert!(is_near_wall(edge, &tiles));
        }
    }

    #[test]
    fn preference_falls_back_to_any_tile_when_nothing_matches() {
        let corridor: FloorSet = (0..6).map(|x| GridCell::new(x, 0)).collect();
        let mut rng = DungeonRng::from_seed(8);
        let picked = pick_spawn_position(&mut rng, &corridor, false).expect("fallback tile");
        assert!(corridor.contains(&picked));
        assert_eq!(pick_spawn_position(&mut rng, &FloorSet::new(), true), None);
    }

    #[test]
    fn counts_stay_in_bounds_and_positions_stay_in_room() {
        let mut definitions = RoomDefinitions::default();
        definitions.enemy.min_items = 1;
        definitions.enemy.max_items = 3;
        definitions.enemy.min_enemies = 2;
        definitions.enemy.max_enemies = 4;

        let tiles = square(6);
        let rooms = vec![room(RoomKind::Enemy, tiles.clone(), &definitions)];
        for seed in 0..50 {
            let mut rng = DungeonRng::from_seed(seed);
            let mut factory = RecordingFactory::default();
            let population = populate_rooms(&mut rng, &rooms, &definitions, &mut factory, None);

            let items =
                population.spawns.iter().filter(|spawn| spawn.kind == SpawnKind::Item).count();
            let enemies =
                population.spawns.iter().filter(|spawn| spawn.kind == SpawnKind::Enemy).count();
            assert!((1..=3).contains(&items), "item count {items} out of bounds");
            assert!((2..=4).contains(&enemies), "enemy count {enemies} out of bounds");
            assert!(population.spawns.iter().all(|spawn| tiles.contains(&spawn.position)));
            assert_eq!(factory.created.len(), population.spawns.len());
        }
    }

    #[test]
    fn enemies_prefer_open_space_and_items_prefer_walls() {
        let mut definitions = RoomDefinitions::default();
        definitions.treasure.spawn_near_walls = true;
        definitions.treasure.spawn_in_open_space = true;
        definitions.treasure.min_items = 5;
        definitions.treasure.max_items = 5;
        definitions.treasure.min_enemies = 5;
        definitions.treasure.max_enemies = 5;

        let tiles = square(7);
        let rooms = vec![room(RoomKind::Treasure, tiles.clone(), &definitions)];
        let mut rng = DungeonRng::from_seed(12);
        let mut factory = RecordingFactory::default();
        let population = populate_rooms(&mut rng, &rooms, &definitions, &mut factory, None);

        for spawn in &population.spawns {
            match spawn.kind {
                SpawnKind::Item => assert!(is_near_wall(spawn.position, &tiles)),
                SpawnKind::Enemy => assert!(!is_near_wall(spawn.position, &tiles)),
            }
        }
    }

    #[test]
    fn empty_prefab_lists_spawn_nothing() {
        let mut definitions = RoomDefinitions::default();
        definitions.enemy.item_prefabs.clear();
        definitions.enemy.enemy_prefabs.clear();
        definitions.enemy.min_enemies = 3;
        definitions.enemy.max_enemies = 3;

        let rooms = vec![room(RoomKind::Enemy, square(4), &definitions)];
        let mut rng = DungeonRng::from_seed(1);
        let mut factory = RecordingFactory::default();
        let population = populate_rooms(&mut rng, &rooms, &definitions, &mut factory, None);
        assert!(population.spawns.is_empty());
        assert!(factory.created.is_empty());
    }

    #[test]
    fn spawn_room_teleports_the_player_and_spawns_nothing() {
        let definitions = RoomDefinitions::default();
        let tiles: FloorSet = (0..7).map(|x| GridCell::new(x, 0)).collect();
        let rooms = vec![room(RoomKind::Spawn, tiles, &definitions)];
        let mut rng = DungeonRng::from_seed(2);
        let mut factory = RecordingFactory::default();
        let mut avatar = RecordingAvatar::default();

        let population =
            populate_rooms(&mut rng, &rooms, &definitions, &mut factory, Some(&mut avatar));

        assert_eq!(population.player_spawn, Some(GridCell::new(3, 0)));
        assert_eq!(avatar.teleports, vec![GridCell::new(3, 0)]);
        assert!(population.spawns.is_empty());
    }

    #[test]
    fn prefabs_come_from_the_room_definition() {
        let definitions = RoomDefinitions::default();
        let rooms = vec![room(RoomKind::Boss, square(5), &definitions)];
        let mut rng = DungeonRng::from_seed(3);
        let mut factory = RecordingFactory::default();
        let population = populate_rooms(&mut rng, &rooms, &definitions, &mut factory, None);

        for spawn in &population.spawns {
            let allowed = match spawn.kind {
                SpawnKind::Item => &definitions.boss.item_prefabs,
                SpawnKind::Enemy => &definitions.boss.enemy_prefabs,
            };
            assert!(allowed.contains(&spawn.prefab), "{} not in {allowed:?}", spawn.prefab);
        }
        assert!(!population.spawns.is_empty(), "boss room defaults guarantee spawns");
    }

    #[test]
    fn shared_spawn_and_boss_footprint_gets_both_roles() {
        let definitions = RoomDefinitions::default();
        let rooms = vec![
            room(RoomKind::Spawn, square(5), &definitions),
            room(RoomKind::Boss, square(5), &definitions),
        ];
        let mut rng = DungeonRng::from_seed(4);
        let mut factory = RecordingFactory::default();
        let mut avatar = RecordingAvatar::default();

        let population =
            populate_rooms(&mut rng, &rooms, &definitions, &mut factory, Some(&mut avatar));

        assert_eq!(avatar.teleports.len(), 1);
        assert!(!population.spawns.is_empty());
        assert!(population.spawns.iter().all(|spawn| spawn.room_kind == RoomKind::Boss));
        assert!(population.spawns.iter().all(|spawn| spawn.room_seed == rooms[1].seed));
    }
}
