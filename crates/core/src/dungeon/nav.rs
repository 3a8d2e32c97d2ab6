//! Navigation-graph bounds and the deferred resize/rescan after generation settles.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::types::FloorSet;

use super::host::NavGraph;

/// Cells added to each dimension of the floor's bounding box.
pub const NAV_GRAPH_MARGIN: i32 = 10;

/// Time external geometry gets to finish baking before the graph is rescanned.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(100);

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct NavPoint {
    pub x: f32,
    pub y: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct NavBounds {
    pub center: NavPoint,
    pub width: i32,
    pub height: i32,
}

impl NavBounds {
    pub fn from_floor(floor: &FloorSet) -> Option<Self> {
        // Floor order is by x, so the x extremes are the first and last cells.
        let min_x = i64::from(floor.first()?.x);
        let max_x = i64::from(floor.last()?.x);
        let min_y = i64::from(floor.iter().map(|cell| cell.y).min()?);
        let max_y = i64::from(floor.iter().map(|cell| cell.y).max()?);
        // Sides saturate; validated configs never get near the limit.
        let side = |low: i64, high: i64| {
            i32::try_from(high - low + i64::from(NAV_GRAPH_MARGIN)).unwrap_or(i32::MAX)
        };

        Some(Self {
            center: NavPoint { x: (min_x + max_x) as f32 / 2.0, y: (min_y + max_y) as f32 / 2.0 },
            width: side(min_x, max_x),
            height: side(min_y, max_y),
        })
    }
}

/// Raised once per finished generation; consumed by [`NavSyncScheduler`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GenerationComplete {
    pub seed: u64,
    pub bounds: Option<NavBounds>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SyncOutcome {
    Idle,
    Settling { remaining: Duration },
    Applied(NavBounds),
    Skipped(SkipReason),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    NoGraph,
    InactiveGraph,
    EmptyFloor,
}

#[derive(Clone, Copy, Debug)]
struct PendingSync {
    event: GenerationComplete,
    waited: Duration,
}

/// One-shot resize-and-rescan of the navigation graph, fired once the settle delay has
/// elapsed. The host drives it by calling [`NavSyncScheduler::advance`] from its frame
/// or tick loop.
#[derive(Debug)]
pub struct NavSyncScheduler {
    settle_delay: Duration,
    pending: Option<PendingSync>,
}

impl Default for NavSyncScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_SETTLE_DELAY)
    }
}

impl NavSyncScheduler {
    pub fn new(settle_delay: Duration) -> Self {
        Self { settle_delay, pending: None }
    }

    pub fn settle_delay(&self) -> Duration {
        self.settle_delay
    }

    /// Queues a sync. An earlier event that has not fired yet is superseded.
    pub fn on_generation_complete(&mut self, event: GenerationComplete) {
        if self.pending.is_some() {
            tracing::debug!(seed = event.seed, "superseding pending nav sync");
        }
        self.pending = Some(PendingSync { event, waited: Duration::ZERO });
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Adds `elapsed` to the settle timer and fires the pending sync once the delay has
    /// passed. The graph is only touched on the firing call.
    pub fn advance(
        &mut self,
        elapsed: Duration,
        graph: Option<&mut dyn NavGraph>,
    ) -> SyncOutcome {
        let Some(mut pending) = self.pending.take() else {
            return SyncOutcome::Idle;
        };

        pending.waited = pending.waited.saturating_add(elapsed);
        if pending.waited < self.settle_delay {
            let remaining = self.settle_delay - pending.waited;
            self.pending = Some(pending);
            return SyncOutcome::Settling { remaining };
        }

        let outcome = apply(pending.event, graph);
        match outcome {
            SyncOutcome::Applied(bounds) => tracing::info!(
                width = bounds.width,
                height = bounds.height,
                center_x = bounds.center.x,
                center_y = bounds.center.y,
                "resized navigation graph"
            ),
            SyncOutcome::Skipped(reason) => {
                tracing::warn!(?reason, "navigation graph sync skipped");
            }
            SyncOutcome::Idle | SyncOutcome::Settling { .. } => {}
        }
        outcome
    }
}

fn apply(event: GenerationComplete, graph: Option<&mut dyn NavGraph>) -> SyncOutcome {
    let Some(graph) = graph else {
        return SyncOutcome::Skipped(SkipReason::NoGraph);
    };
    if !graph.is_active() {
        return SyncOutcome::Skipped(SkipReason::InactiveGraph);
    }
    let Some(bounds) = event.bounds else {
        return SyncOutcome::Skipped(SkipReason::EmptyFloor);
    };
    graph.resize(bounds.center, bounds.width, bounds.height);
    graph.rescan();
    SyncOutcome::Applied(bounds)
}
