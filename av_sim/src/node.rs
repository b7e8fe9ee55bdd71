//! The schedulable node contract.

use av_world::WorldError;
use thiserror::Error;

use crate::blackboard::FrameData;

/// Non-fatal outcome of one node invocation.
///
/// `Failed` and `Skipped` are recorded per node and logged, but never stop
/// the episode; anything that would corrupt state must be returned as a
/// [`NodeError`] instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// Normal completion.
    Ok,
    /// The node chose not to run (e.g. a required input is missing).
    Skipped,
    /// The node ran but could not produce its output this tick.
    Failed,
}

/// Fatal node errors. Returning one breaks the loop; the executor still runs
/// the full shutdown sweep and marks the episode as errored with the node
/// name.
#[derive(Debug, Error)]
pub enum NodeError {
    /// A world-model computation failed (non-finite state, bad geometry).
    #[error("{node}: {source}")]
    World {
        /// Offending node name.
        node: String,
        /// Underlying world-model error.
        #[source]
        source: WorldError,
    },

    /// A topic this node requires was never published.
    #[error("{node}: missing required topic '{topic}'")]
    MissingTopic {
        /// Offending node name.
        node: String,
        /// The absent topic key.
        topic: &'static str,
    },

    /// The node detected a violated contract.
    #[error("{node}: contract violation: {detail}")]
    Contract {
        /// Offending node name.
        node: String,
        /// Human-readable description.
        detail: String,
    },
}

impl NodeError {
    /// Name of the node that raised the error.
    pub fn node(&self) -> &str {
        match self {
            Self::World { node, .. } | Self::Contract { node, .. } => node,
            Self::MissingTopic { node, .. } => node,
        }
    }
}

/// A schedulable unit.
///
/// The executor provides the `should_run`/reschedule semantics; nodes only
/// declare their rate and priority and implement the three lifecycle hooks.
/// Lower `priority` runs earlier within a tick.
pub trait Node {
    /// Stable node name, used in logs and error reports.
    fn name(&self) -> &str;

    /// Declared rate [Hz].
    fn rate_hz(&self) -> f64;

    /// Scheduling priority; lower runs first, ties break by registration
    /// order.
    fn priority(&self) -> i32;

    /// One-time setup before the first tick, in priority order.
    fn on_init(&mut self, _frame: &mut FrameData) -> Result<(), NodeError> {
        Ok(())
    }

    /// One invocation at virtual time `now`.
    fn on_run(&mut self, now: f64, frame: &mut FrameData) -> Result<RunStatus, NodeError>;

    /// Teardown, called exactly once per `on_init` in reverse priority
    /// order, on every exit path.
    fn on_shutdown(&mut self, _frame: &mut FrameData) {}
}
