//! Seams to the systems that consume a generated dungeon: tile painting, wall
//! building, content creation, player placement, and the navigation graph.

use crate::types::{ContentHandle, FloorSet, GridCell, SpawnKind};

use super::nav::NavPoint;

pub trait FloorPainter {
    fn paint_floor(&mut self, floor: &FloorSet);

    fn paint_wall(&mut self, _cell: GridCell) {}
}

pub trait WallBuilder {
    fn build_walls(&mut self, floor: &FloorSet, painter: &mut dyn FloorPainter);
}

pub trait ContentFactory {
    fn spawn_at(&mut self, kind: SpawnKind, prefab: &str, position: GridCell) -> ContentHandle;
}

pub trait PlayerAvatar {
    fn teleport(&mut self, position: GridCell);
}

pub trait NavGraph {
    fn is_active(&self) -> bool;

    fn resize(&mut self, center: NavPoint, width: i32, height: i32);

    fn rescan(&mut self);
}

/// Collaborators one generation call talks to. The player is optional; without one the
/// spawn cell is still reported in the result.
pub struct Host<'a> {
    pub painter: &'a mut dyn FloorPainter,
    pub walls: &'a mut dyn WallBuilder,
    pub content: &'a mut dyn ContentFactory,
    pub player: Option<&'a mut dyn PlayerAvatar>,
}

/// Collaborators that render nothing. Its factory numbers spawns sequentially.
#[derive(Debug, Default)]
pub struct Headless {
    next_handle: u64,
}

impl FloorPainter for Headless {
    fn paint_floor(&mut self, _floor: &FloorSet) {}
}

impl WallBuilder for Headless {
    fn build_walls(&mut self, _floor: &FloorSet, _painter: &mut dyn FloorPainter) {}
}

impl ContentFactory for Headless {
    fn spawn_at(
        &mut self,
        _kind: SpawnKind,
        _prefab: &str,
        _position: GridCell,
    ) -> ContentHandle {
        let handle = ContentHandle(self.next_handle);
        self.next_handle += 1;
        handle
    }
}
