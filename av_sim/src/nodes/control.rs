//! Scripted constant-command controller.
//!
//! Stands in for the external planner/controller collaborator: publishes the
//! configured command at its declared rate. The dynamics node keeps reusing
//! the last published command between firings.

use av_common::config::ScriptedControlConfig;
use av_common::types::ControlCommand;

use crate::blackboard::{FrameData, Message, topic};
use crate::node::{Node, NodeError, RunStatus};

/// Constant-command publisher.
pub struct ScriptedControlNode {
    cfg: ScriptedControlConfig,
    rate_hz: f64,
    priority: i32,
}

impl ScriptedControlNode {
    /// Build from the scenario `[control]` section.
    pub fn new(cfg: ScriptedControlConfig, rate_hz: f64, priority: i32) -> Self {
        Self {
            cfg,
            rate_hz,
            priority,
        }
    }
}

impl Node for ScriptedControlNode {
    fn name(&self) -> &str {
        "control"
    }

    fn rate_hz(&self) -> f64 {
        self.rate_hz
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn on_run(&mut self, now: f64, frame: &mut FrameData) -> Result<RunStatus, NodeError> {
        frame.insert(
            topic::CONTROL,
            Message::Control(ControlCommand {
                steer_cmd: self.cfg.steer_cmd,
                accel_cmd: self.cfg.accel_cmd,
                stamp: now,
            }),
        );
        Ok(RunStatus::Ok)
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
