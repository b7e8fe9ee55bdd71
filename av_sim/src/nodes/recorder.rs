//! Telemetry recorder node.
//!
//! Buffers one typed record per invocation and flushes them as JSON lines in
//! `on_shutdown`. All file I/O is confined to shutdown so the fast path never
//! blocks; a write failure is logged, not propagated, because the episode is
//! already over when it can happen.

use av_common::types::{ControlCommand, EpisodeMetrics, LidarScan, TerminationCause, VehicleState};
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;
use tracing::{debug, error};

use crate::blackboard::FrameData;
use crate::node::{Node, NodeError, RunStatus};

/// One recorded step.
#[derive(Debug, Clone, Serialize)]
pub struct StepRecord {
    /// Virtual time of the record [s].
    pub t: f64,
    /// Ego state, if published yet.
    pub vehicle: Option<VehicleState>,
    /// Last control command.
    pub control: Option<ControlCommand>,
    /// Running metrics.
    pub metrics: Option<EpisodeMetrics>,
    /// Latest sweep.
    pub scan: Option<LidarScan>,
    /// Latched termination cause, if any.
    pub termination: Option<TerminationCause>,
}

/// Buffered JSONL recorder.
pub struct RecorderNode {
    records: Vec<StepRecord>,
    out_path: Option<PathBuf>,
    rate_hz: f64,
    priority: i32,
}

impl RecorderNode {
    /// Create a recorder; `out_path = None` keeps the stream in memory only.
    pub fn new(out_path: Option<PathBuf>, rate_hz: f64, priority: i32) -> Self {
        Self {
            records: Vec::new(),
            out_path,
            rate_hz,
            priority,
        }
    }
}

impl Node for RecorderNode {
    fn name(&self) -> &str {
        "recorder"
    }

    fn rate_hz(&self) -> f64 {
        self.rate_hz
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn on_run(&mut self, now: f64, frame: &mut FrameData) -> Result<RunStatus, NodeError> {
        self.records.push(StepRecord {
            t: now,
            vehicle: frame.vehicle_state(),
            control: frame.control(),
            metrics: frame.metrics(),
            scan: frame.scan().cloned(),
            termination: frame.termination(),
        });
        Ok(RunStatus::Ok)
    }

    fn on_shutdown(&mut self, _frame: &mut FrameData) {
        debug!(records = self.records.len(), "recorder flushing");
        let Some(path) = self.out_path.as_ref() else {
            return;
        };
        let result = std::fs::File::create(path).and_then(|file| {
            let mut w = std::io::BufWriter::new(file);
            for record in &self.records {
                let line = serde_json::to_string(record)?;
                writeln!(w, "{line}")?;
            }
            w.flush()
        });
        if let Err(e) = result {
            error!(path = %path.display(), error = %e, "telemetry flush failed");
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blackboard::{Message, topic};

    #[test]
    fn buffers_records_and_flushes_jsonl() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("telemetry.jsonl");
        let mut n = RecorderNode::new(Some(path.clone()), 10.0, 0);
        let mut frame = FrameData::new();
        frame.insert(
            topic::VEHICLE_STATE,
            Message::VehicleState(VehicleState {
                x: 1.0,
                ..Default::default()
            }),
        );

        n.on_run(0.0, &mut frame).unwrap();
        n.on_run(0.1, &mut frame).unwrap();
        n.on_shutdown(&mut frame);

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["t"], 0.0);
        assert_eq!(first["vehicle"]["x"], 1.0);
        assert!(first["scan"].is_null());
    }

    #[test]
    fn no_output_path_is_a_no_op() {
        let mut n = RecorderNode::new(None, 10.0, 0);
        let mut frame = FrameData::new();
        n.on_run(0.0, &mut frame).unwrap();
        n.on_shutdown(&mut frame); // must not panic
    }
}
