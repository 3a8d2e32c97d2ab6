//! Corridor skeleton: random-walk segments chained tail to head.

use crate::types::{FloorSet, GridCell};

use super::config::CorridorPlan;
use super::rng::DungeonRng;
use super::walk::walk_path;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CorridorLayout {
    pub floor: FloorSet,
    /// Start cell followed by the tail of every segment, in build order.
    pub candidates: Vec<GridCell>,
}

pub fn build_corridors(
    rng: &mut DungeonRng,
    start: GridCell,
    plan: &CorridorPlan,
) -> CorridorLayout {
    let mut floor = FloorSet::new();
    let mut candidates = Vec::with_capacity(plan.count + 1);
    candidates.push(start);

    let mut current = start;
    for _ in 0..plan.count {
        let path = walk_path(rng, current, plan.length, &plan.directions);
        for &cell in &path {
            paint_brush(&mut floor, cell, plan.width);
        }
        // The path always holds at least its start cell.
        current = path.last().copied().unwrap_or(current);
        candidates.push(current);
    }

    CorridorLayout { floor, candidates }
}

/// Stamps a `width` x `width` block roughly centred on `cell`.
fn paint_brush(floor: &mut FloorSet, cell: GridCell, width: usize) {
    let width = width as i32;
    let low = -((width - 1) / 2);
    for dx in low..low + width {
        for dy in low..low + width {
            floor.insert(cell.offset(dx, dy));
        }
    }
}
