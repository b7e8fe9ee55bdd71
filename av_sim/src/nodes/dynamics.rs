//! Vehicle dynamics node.
//!
//! Integrates the bicycle model at its own rate with the most recent control
//! command from the blackboard. When the controller runs slower than the
//! dynamics, the last published command stays in effect.

use av_common::types::{ControlCommand, VehicleState};
use av_world::vehicle::VehicleModel;

use crate::blackboard::{FrameData, Message, topic};
use crate::node::{Node, NodeError, RunStatus};

/// Dynamics integrator node.
pub struct DynamicsNode {
    model: VehicleModel,
    last_cmd: ControlCommand,
    rate_hz: f64,
    priority: i32,
    period: f64,
}

impl DynamicsNode {
    /// Wrap a vehicle model; `rate_hz` must match the rate the model was
    /// built for.
    pub fn new(model: VehicleModel, rate_hz: f64, priority: i32) -> Self {
        Self {
            model,
            last_cmd: ControlCommand::default(),
            rate_hz,
            priority,
            period: 1.0 / rate_hz,
        }
    }
}

impl Node for DynamicsNode {
    fn name(&self) -> &str {
        "dynamics"
    }

    fn rate_hz(&self) -> f64 {
        self.rate_hz
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn on_init(&mut self, frame: &mut FrameData) -> Result<(), NodeError> {
        frame.insert(
            topic::VEHICLE_STATE,
            Message::VehicleState(*self.model.state()),
        );
        Ok(())
    }

    fn on_run(&mut self, _now: f64, frame: &mut FrameData) -> Result<RunStatus, NodeError> {
        if let Some(cmd) = frame.control() {
            self.last_cmd = cmd;
        }
        let state: VehicleState = self
            .model
            .step(&self.last_cmd, self.period)
            .map_err(|source| NodeError::World {
                node: self.name().to_string(),
                source,
            })?;
        frame.insert(topic::VEHICLE_STATE, Message::VehicleState(state));
        Ok(RunStatus::Ok)
    }
}

// ─── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use av_world::vehicle::VehicleParams;
    use av_world::vehicle::longitudinal::LongitudinalParams;
    use av_world::vehicle::steering::SteeringParams;

    fn params() -> VehicleParams {
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

    fn node() -> DynamicsNode {
        let model = VehicleModel::new(params(), VehicleState::default(), 100.0).unwrap();
        DynamicsNode::new(model, 100.0, 0)
    }

    #[test]
    fn init_publishes_initial_state() {
        let mut n = node();
        let mut frame = FrameData::new();
        n.on_init(&mut frame).unwrap();
        assert_eq!(frame.vehicle_state().unwrap(), VehicleState::default());
    }

    #[test]
    fn reuses_last_command_when_controller_is_silent() {
        let mut n = node();
        let mut frame = FrameData::new();
        n.on_init(&mut frame).unwrap();
        frame.insert(
            topic::CONTROL,
            Message::Control(ControlCommand {
                steer_cmd: 0.0,
                accel_cmd: 1.0,
                stamp: 0.0,
            }),
        );
        n.on_run(0.0, &mut frame).unwrap();
        let v1 = frame.vehicle_state().unwrap().vx;
        // Remove the topic; the node keeps accelerating on the held command.
        frame.take(topic::CONTROL);
        n.on_run(0.01, &mut frame).unwrap();
        let v2 = frame.vehicle_state().unwrap().vx;
        assert!(v2 > v1);
    }

    #[test]
    fn non_finite_command_raises_fatal() {
        let mut n = node();
        let mut frame = FrameData::new();
        n.on_init(&mut frame).unwrap();
        frame.insert(
            topic::CONTROL,
            Message::Control(ControlCommand {
                steer_cmd: f64::NAN,
                accel_cmd: 0.0,
                stamp: 0.0,
            }),
        );
        let err = n.on_run(0.0, &mut frame).unwrap_err();
        assert_eq!(err.node(), "dynamics");
    }
}
