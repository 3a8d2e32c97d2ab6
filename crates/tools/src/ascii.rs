//! Terminal painter and wall builder.

use std::collections::BTreeMap;

use dungeon_core::dungeon::{DungeonResult, FloorPainter, WallBuilder};
use dungeon_core::{FloorSet, GridCell, RoomKind, SpawnKind};

const WALL: char = '#';
const FLOOR: char = '.';
const PLAYER: char = '@';
const BOSS_ENEMY: char = 'B';
const ENEMY: char = 'e';
const ITEM: char = 'i';

/// Collects painted floor and wall cells and renders them north-up.
#[derive(Debug, Default)]
pub struct AsciiCanvas {
    floor: FloorSet,
    walls: FloorSet,
}

impl AsciiCanvas {
    pub fn walls(&self) -> &FloorSet {
        &self.walls
    }

    pub fn render(&self, result: &DungeonResult) -> String {
        let Some((min_x, max_x, min_y, max_y)) = self.extent() else {
            return String::new();
        };

        let mut markers: BTreeMap<GridCell, char> = BTreeMap::new();
        for spawn in &result.spawns {
            let glyph = match spawn.kind {
                SpawnKind::Item => ITEM,
                SpawnKind::Enemy if spawn.room_kind == RoomKind::Boss => BOSS_ENEMY,
                SpawnKind::Enemy => ENEMY,
            };
            // Enemies drawn over items sharing a cell.
            markers
                .entry(spawn.position)
                .and_modify(|existing| {
                    if *existing == ITEM {
                        *existing = glyph;
                    }
                })
                .or_insert(glyph);
        }
        markers.insert(result.player_spawn, PLAYER);

        let width = (max_x - min_x + 1) as usize;
        let mut out = String::with_capacity((width + 1) * (max_y - min_y + 1) as usize);
        for y in (min_y..=max_y).rev() {
            for x in min_x..=max_x {
                let cell = GridCell::new(x, y);
                let glyph = if let Some(&marker) = markers.get(&cell) {
                    marker
                } else if self.floor.contains(&cell) {
                    FLOOR
                } else if self.walls.contains(&cell) {
                    WALL
                } else {
                    ' '
                };
                out.push(glyph);
            }
            let trimmed = out.trim_end_matches(' ').len();
            out.truncate(trimmed);
            out.push('\n');
        }
        out
    }

    fn extent(&self) -> Option<(i32, i32, i32, i32)> {
        let cells = || self.floor.iter().chain(self.walls.iter());
        let min_x = cells().map(|cell| cell.x).min()?;
        let max_x = cells().map(|cell| cell.x).max()?;
        let min_y = cells().map(|cell| cell.y).min()?;
        let max_y = cells().map(|cell| cell.y).max()?;
        Some((min_x, max_x, min_y, max_y))
    }
}

impl FloorPainter for AsciiCanvas {
    fn paint_floor(&mut self, floor: &FloorSet) {
        self.floor.extend(floor.iter().copied());
    }

    fn paint_wall(&mut self, cell: GridCell) {
        self.walls.insert(cell);
    }
}

/// Walls every empty cell touching the floor, diagonals included.
#[derive(Debug, Default, Clone, Copy)]
pub struct RingWallBuilder;

impl WallBuilder for RingWallBuilder {
    fn build_walls(&mut self, floor: &FloorSet, painter: &mut dyn FloorPainter) {
        let ring: FloorSet = floor
            .iter()
            .flat_map(|cell| cell.surrounding())
            .filter(|next| !floor.contains(next))
            .collect();
        tracing::debug!(walls = ring.len(), "building walls");
        for cell in ring {
            painter.paint_wall(cell);
        }
    }
}
