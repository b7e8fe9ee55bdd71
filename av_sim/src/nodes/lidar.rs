//! LiDAR sensor node.
//!
//! Reads world geometry and the ego pose from the blackboard and publishes a
//! sweep at its declared rate. The scan message is taken out of its topic,
//! updated in place by the kernel and re-inserted, so the hot path allocates
//! nothing once the episode is warm.

use av_world::lidar::LidarModel;
use av_world::world::WorldGeometry;
use std::rc::Rc;

use crate::blackboard::{FrameData, Message, topic};
use crate::node::{Node, NodeError, RunStatus};

/// Ray-casting sensor node.
pub struct LidarNode {
    model: LidarModel,
    world: Option<Rc<WorldGeometry>>,
    rate_hz: f64,
    priority: i32,
}

impl LidarNode {
    /// Wrap a LiDAR model.
    pub fn new(model: LidarModel, rate_hz: f64, priority: i32) -> Self {
        Self {
            model,
            world: None,
            rate_hz,
            priority,
        }
    }
}

impl Node for LidarNode {
    fn name(&self) -> &str {
        "lidar"
    }

    fn rate_hz(&self) -> f64 {
        self.rate_hz
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn on_init(&mut self, frame: &mut FrameData) -> Result<(), NodeError> {
        let world = frame.world().ok_or(NodeError::MissingTopic {
            node: "lidar".to_string(),
            topic: topic::WORLD,
        })?;
        self.world = Some(Rc::clone(world));
        frame.insert(topic::SCAN, Message::Scan(self.model.template_scan()));
        Ok(())
    }

    fn on_run(&mut self, now: f64, frame: &mut FrameData) -> Result<RunStatus, NodeError> {
        let Some(state) = frame.vehicle_state() else {
            return Ok(RunStatus::Skipped);
        };
        let Some(world) = self.world.as_ref() else {
            return Ok(RunStatus::Failed);
        };
        let Some(Message::Scan(mut scan)) = frame.take(topic::SCAN) else {
            return Ok(RunStatus::Failed);
        };
        // Obstacle polygons may be absent in obstacle-free scenarios.
        let empty: &[av_world::geometry::polygon::Polygon] = &[];
        let obstacles = frame.obstacles().unwrap_or(empty);
        self.model
            .scan_into(&state.pose(), &world.segments, obstacles, now, &mut scan);
        frame.insert(topic::SCAN, Message::Scan(scan));
        Ok(RunStatus::Ok)
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
