//! Per-tick blackboard: single-writer, many-reader latest-value store.
//!
//! Topics map a pre-registered key to a tagged-union [`Message`]. Writes
//! replace the stored value in place; no history is kept, and ordering
//! within a tick is defined solely by node priority. The termination cause
//! is latched: the first request wins and stays set for the episode.
//!
//! Map iteration order is never relied upon — readers access topics by name
//! only — so the store cannot perturb determinism.

use av_common::types::{ControlCommand, EpisodeMetrics, LidarScan, TerminationCause, VehicleState};
use av_world::geometry::polygon::Polygon;
use av_world::world::WorldGeometry;
use std::collections::HashMap;
use std::rc::Rc;

/// Well-known topic keys.
pub mod topic {
    /// Latest ego vehicle state, written by the dynamics node.
    pub const VEHICLE_STATE: &str = "vehicle_state";
    /// Latest control command, written by the controller node.
    pub const CONTROL: &str = "control_cmd";
    /// Latest LiDAR sweep, written by the sensor node.
    pub const SCAN: &str = "lidar_scan";
    /// Current obstacle polygons, written by the obstacle manager.
    pub const OBSTACLES: &str = "obstacle_polygons";
    /// Static world geometry, seeded before the run.
    pub const WORLD: &str = "world_geometry";
    /// Running episode metrics, written by the supervisor.
    pub const METRICS: &str = "episode_metrics";
}

/// Tagged union over all message variants a topic can hold.
///
/// Writers must publish the variant their topic declares; readers pattern
/// match through the typed accessors on [`FrameData`].
#[derive(Debug, Clone)]
pub enum Message {
    /// Ego vehicle state.
    VehicleState(VehicleState),
    /// Control command.
    Control(ControlCommand),
    /// LiDAR sweep.
    Scan(LidarScan),
    /// Obstacle collision polygons, in declaration order.
    Obstacles(Vec<Polygon>),
    /// Static world geometry (shared, written once).
    World(Rc<WorldGeometry>),
    /// Running episode metrics.
    Metrics(EpisodeMetrics),
}

/// The shared per-tick blackboard.
#[derive(Debug, Default)]
pub struct FrameData {
    topics: HashMap<&'static str, Message>,
    termination: Option<TerminationCause>,
}

impl FrameData {
    /// Empty blackboard.
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish the latest value for `key`, replacing any previous one.
    #[inline]
    pub fn insert(&mut self, key: &'static str, msg: Message) {
        self.topics.insert(key, msg);
    }

    /// Read the latest value for `key`.
    #[inline]
    pub fn get(&self, key: &str) -> Option<&Message> {
        self.topics.get(key)
    }

    /// Take the latest value out of `key`, leaving the slot empty.
    ///
    /// Writers use this to update large messages in place and re-insert
    /// them, avoiding a reallocation per tick.
    #[inline]
    pub fn take(&mut self, key: &str) -> Option<Message> {
        self.topics.remove(key)
    }

    // ── Typed accessors ──

    /// Latest ego state, if published.
    pub fn vehicle_state(&self) -> Option<VehicleState> {
        match self.get(topic::VEHICLE_STATE) {
            Some(Message::VehicleState(s)) => Some(*s),
            _ => None,
        }
    }

    /// Latest control command, if published.
    pub fn control(&self) -> Option<ControlCommand> {
        match self.get(topic::CONTROL) {
            Some(Message::Control(c)) => Some(*c),
            _ => None,
        }
    }

    /// Latest LiDAR sweep, if published.
    pub fn scan(&self) -> Option<&LidarScan> {
        match self.get(topic::SCAN) {
            Some(Message::Scan(s)) => Some(s),
            _ => None,
        }
    }

    /// Current obstacle polygons, if published.
    pub fn obstacles(&self) -> Option<&[Polygon]> {
        match self.get(topic::OBSTACLES) {
            Some(Message::Obstacles(p)) => Some(p.as_slice()),
            _ => None,
        }
    }

    /// Static world geometry, if seeded.
    pub fn world(&self) -> Option<&Rc<WorldGeometry>> {
        match self.get(topic::WORLD) {
            Some(Message::World(w)) => Some(w),
            _ => None,
        }
    }

    /// Running episode metrics, if published.
    pub fn metrics(&self) -> Option<EpisodeMetrics> {
        match self.get(topic::METRICS) {
            Some(Message::Metrics(m)) => Some(*m),
            _ => None,
        }
    }

    // ── Termination latch ──

    /// Request episode termination.
    ///
    /// Latched: the first request of an episode wins; later requests are
    /// ignored. Nodes evaluate their conditions in precedence order, so the
    /// stored cause respects `collision > off_track > goal > timeout`.
    pub fn request_termination(&mut self, cause: TerminationCause) {
        if self.termination.is_none() {
            self.termination = Some(cause);
        }
    }

    /// The latched termination cause, if any.
    #[inline]
    pub fn termination(&self) -> Option<TerminationCause> {
        self.termination
    }

    /// True once any node has requested termination.
    #[inline]
    pub fn termination_requested(&self) -> bool {
        self.termination.is_some()
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
