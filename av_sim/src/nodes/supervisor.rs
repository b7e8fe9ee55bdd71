//! Collision & termination supervisor.
//!
//! Reads the ego pose, obstacle polygons and centreline each tick and
//! evaluates the termination conditions in precedence order: collision,
//! then off-track, then goal (the timeout path belongs to the executor).
//! Also accumulates the episode metrics and republishes them every run.

use av_common::types::{EpisodeMetrics, TerminationCause};
use av_world::geometry::Vec2;
use av_world::geometry::polygon::{Polygon, polygons_overlap};
use av_world::vehicle::{VehicleParams, footprint_into};
use av_world::world::WorldGeometry;
use std::rc::Rc;
use tracing::debug;

use crate::blackboard::{FrameData, Message, topic};
use crate::node::{Node, NodeError, RunStatus};

/// Termination and metrics node.
pub struct SupervisorNode {
    vehicle: VehicleParams,
    world: Option<Rc<WorldGeometry>>,
    /// Scratch polygon for the ego footprint, rebuilt in place.
    ego_poly: Polygon,
    prev_pos: Option<Vec2>,
    next_checkpoint: usize,
    metrics: EpisodeMetrics,
    rate_hz: f64,
    priority: i32,
}

impl SupervisorNode {
    /// Build the supervisor for the given vehicle geometry.
    pub fn new(vehicle: VehicleParams, rate_hz: f64, priority: i32) -> Self {
        Self {
            vehicle,
            world: None,
            ego_poly: Polygon::new(),
            prev_pos: None,
            next_checkpoint: 0,
            metrics: EpisodeMetrics::default(),
            rate_hz,
            priority,
        }
    }
}

impl Node for SupervisorNode {
    fn name(&self) -> &str {
        "supervisor"
    }

    fn rate_hz(&self) -> f64 {
        self.rate_hz
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn on_init(&mut self, frame: &mut FrameData) -> Result<(), NodeError> {
        let world = frame.world().ok_or(NodeError::MissingTopic {
            node: "supervisor".to_string(),
            topic: topic::WORLD,
        })?;
        self.world = Some(Rc::clone(world));
        frame.insert(topic::METRICS, Message::Metrics(self.metrics));
        Ok(())
    }

    fn on_run(&mut self, now: f64, frame: &mut FrameData) -> Result<RunStatus, NodeError> {
        let Some(state) = frame.vehicle_state() else {
            return Ok(RunStatus::Skipped);
        };
        let Some(world) = self.world.as_ref() else {
            return Ok(RunStatus::Failed);
        };

        // ── Metrics ──
        let pos = Vec2::new(state.x, state.y);
        if let Some(prev) = self.prev_pos {
            self.metrics.distance_travelled += (pos - prev).norm();
        }
        self.prev_pos = Some(pos);

        let frenet = world.centreline.project(pos);
        if frenet.lateral.abs() > self.metrics.max_lateral_deviation {
            self.metrics.max_lateral_deviation = frenet.lateral.abs();
        }
        while self.next_checkpoint < world.checkpoints.len()
            && frenet.s >= world.checkpoints[self.next_checkpoint]
        {
            self.next_checkpoint += 1;
            debug!(
                checkpoint = self.next_checkpoint,
                s = frenet.s,
                "checkpoint passed"
            );
        }
        self.metrics.checkpoints_passed = self.next_checkpoint;
        self.metrics.duration_sim = now;
        frame.insert(topic::METRICS, Message::Metrics(self.metrics));

        // ── Termination, in precedence order ──
        footprint_into(&state.pose(), &self.vehicle, &mut self.ego_poly);
        let collided = frame
            .obstacles()
            .map(|polys| polys.iter().any(|p| polygons_overlap(&self.ego_poly, p)))
            .unwrap_or(false);
        if collided {
            frame.request_termination(TerminationCause::Collision);
            return Ok(RunStatus::Ok);
        }

        if frenet.lateral.abs() > world.half_width + world.off_track_margin {
            frame.request_termination(TerminationCause::OffTrack);
            return Ok(RunStatus::Ok);
        }

        if self.next_checkpoint == world.checkpoints.len() {
            frame.request_termination(TerminationCause::GoalReached);
        }
        Ok(RunStatus::Ok)
    }
}

// ─── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use av_common::config::{TrackConfig, TrackKind};
    use av_common::types::VehicleState;
    use av_world::vehicle::longitudinal::LongitudinalParams;
    use av_world::vehicle::steering::SteeringParams;

    fn vehicle() -> VehicleParams {
        VehicleParams {
            wheelbase: 2.7,
            width: 1.8,
            length: 4.4,
            rear_overhang: 0.9,
            steering: SteeringParams {
                k: 1.0,
                tau: 0.1,
                dead_time: 0.0,
                max_steer: 0.6,
            },
            longitudinal: LongitudinalParams {
                k_acc: 1.0,
                offset: 0.0,
                c_drag: 0.0,
                c_corner: 0.0,
                accel_min: -5.0,
                accel_max: 3.0,
            },
        }
    }

    fn world() -> Rc<WorldGeometry> {
        Rc::new(
            WorldGeometry::from_config(&TrackConfig {
                kind: TrackKind::Straight,
                length: 100.0,
                radius: 0.0,
                half_width: 4.0,
                sample_step: 0.5,
                checkpoints: 4,
                off_track_margin: 0.3,
            })
            .unwrap(),
        )
    }

    fn frame_with(state: VehicleState) -> FrameData {
        let mut frame = FrameData::new();
        frame.insert(topic::WORLD, Message::World(world()));
        frame.insert(topic::VEHICLE_STATE, Message::VehicleState(state));
        frame
    }

    #[test]
    fn accumulates_distance_and_lateral_deviation() {
        let mut n = SupervisorNode::new(vehicle(), 100.0, 0);
        let mut frame = frame_with(VehicleState::default());
        n.on_init(&mut frame).unwrap();
        n.on_run(0.0, &mut frame).unwrap();

        frame.insert(
            topic::VEHICLE_STATE,
            Message::VehicleState(VehicleState {
                x: 3.0,
                y: 1.5,
                ..Default::default()
            }),
        );
        n.on_run(0.01, &mut frame).unwrap();
        let m = frame.metrics().unwrap();
        assert!((m.distance_travelled - (3.0f64 * 3.0 + 1.5 * 1.5).sqrt()).abs() < 1e-9);
        assert!((m.max_lateral_deviation - 1.5).abs() < 1e-9);
        assert!(!frame.termination_requested());
    }

    #[test]
    fn off_track_fires_past_margin() {
        let mut n = SupervisorNode::new(vehicle(), 100.0, 0);
        let mut frame = frame_with(VehicleState {
            x: 10.0,
            y: 4.5, // > half_width 4.0 + margin 0.3
            ..Default::default()
        });
        n.on_init(&mut frame).unwrap();
        n.on_run(0.0, &mut frame).unwrap();
        assert_eq!(frame.termination(), Some(TerminationCause::OffTrack));
    }

    #[test]
    fn collision_beats_off_track() {
        let mut n = SupervisorNode::new(vehicle(), 100.0, 0);
        let mut frame = frame_with(VehicleState {
            x: 10.0,
            y: 4.5,
            ..Default::default()
        });
        // Obstacle right on top of the ego.
        frame.insert(
            topic::OBSTACLES,
            Message::Obstacles(vec![Polygon::rectangle(
                &av_common::types::Pose2::new(10.0, 4.5, 0.0),
                2.0,
                2.0,
                0.0,
            )]),
        );
        n.on_init(&mut frame).unwrap();
        n.on_run(0.0, &mut frame).unwrap();
        assert_eq!(frame.termination(), Some(TerminationCause::Collision));
    }

    #[test]
    fn goal_after_last_checkpoint() {
        let mut n = SupervisorNode::new(vehicle(), 100.0, 0);
        let mut frame = frame_with(VehicleState::default());
        n.on_init(&mut frame).unwrap();
        n.on_run(0.0, &mut frame).unwrap();
        // Jump past the end of the track.
        frame.insert(
            topic::VEHICLE_STATE,
            Message::VehicleState(VehicleState {
                x: 100.0,
                ..Default::default()
            }),
        );
        n.on_run(0.01, &mut frame).unwrap();
        assert_eq!(frame.termination(), Some(TerminationCause::GoalReached));
        let m = frame.metrics().unwrap();
        assert_eq!(m.checkpoints_passed, 4);
    }
}
