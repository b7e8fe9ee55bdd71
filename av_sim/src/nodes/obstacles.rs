//! Obstacle manager node.
//!
//! Advances every obstacle to the current virtual time and publishes the
//! refreshed collision polygons, reusing the topic's storage.

use av_world::obstacle::ObstacleSet;

use crate::blackboard::{FrameData, Message, topic};
use crate::node::{Node, NodeError, RunStatus};

/// Obstacle pose/polygon updater.
pub struct ObstacleNode {
    set: ObstacleSet,
    rate_hz: f64,
    priority: i32,
}

impl ObstacleNode {
    /// Wrap an obstacle set.
    pub fn new(set: ObstacleSet, rate_hz: f64, priority: i32) -> Self {
        Self {
            set,
            rate_hz,
            priority,
        }
    }
}

impl Node for ObstacleNode {
    fn name(&self) -> &str {
        "obstacles"
    }

    fn rate_hz(&self) -> f64 {
        self.rate_hz
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn on_init(&mut self, frame: &mut FrameData) -> Result<(), NodeError> {
        self.set.update_all(0.0);
        let mut polys = Vec::with_capacity(self.set.len());
        self.set.polygons_into(&mut polys);
        frame.insert(topic::OBSTACLES, Message::Obstacles(polys));
        Ok(())
    }

    fn on_run(&mut self, now: f64, frame: &mut FrameData) -> Result<RunStatus, NodeError> {
        self.set.update_all(now);
        let Some(Message::Obstacles(mut polys)) = frame.take(topic::OBSTACLES) else {
            return Ok(RunStatus::Failed);
        };
        self.set.polygons_into(&mut polys);
        frame.insert(topic::OBSTACLES, Message::Obstacles(polys));
        Ok(RunStatus::Ok)
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
