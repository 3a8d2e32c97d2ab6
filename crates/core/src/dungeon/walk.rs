//! Bounded random walks, the primitive every corridor and room is grown from.

use crate::types::{Direction, FloorSet, GridCell};

use super::config::{DirectionWeights, RoomWalkPlan};
use super::rng::DungeonRng;

/// Ordered cells of one walk: `start` followed by one cell per step.
pub fn walk_path(
    rng: &mut DungeonRng,
    start: GridCell,
    steps: usize,
    directions: &DirectionWeights,
) -> Vec<GridCell> {
    let weights = directions.as_array();
    let mut path = Vec::with_capacity(steps + 1);
    let mut current = start;
    path.push(current);
    for _ in 0..steps {
        let direction = Direction::CARDINAL[rng.weighted_index(&weights)];
        current = current.step(direction);
        path.push(current);
    }
    path
}

/// Cells visited by a walk of `steps` steps. Always contains `start`, never more than
/// `steps + 1` cells.
pub fn random_walk(
    rng: &mut DungeonRng,
    start: GridCell,
    steps: usize,
    directions: &DirectionWeights,
) -> FloorSet {
    walk_path(rng, start, steps, directions).into_iter().collect()
}

/// Grows a blob by repeating a walk. With random restarts each iteration begins from a
/// cell already in the blob, which keeps the blob connected.
pub fn run_random_walk(rng: &mut DungeonRng, plan: &RoomWalkPlan, start: GridCell) -> FloorSet {
    let mut blob = FloorSet::from([start]);
    let mut current = start;
    for _ in 0..plan.iterations {
        blob.extend(random_walk(rng, current, plan.walk_length, &plan.directions));
        if plan.start_randomly_each_iteration {
            let pick = rng.below(blob.len());
            if let Some(&cell) = blob.iter().nth(pick) {
                current = cell;
            }
        }
    }
    blob
}
