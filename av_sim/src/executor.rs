//! Cooperative rate scheduler driving the episode loop.
//!
//! Nodes are stored sorted by ascending priority (ties keep registration
//! order). Each node holds its own period and next-due time; eligibility is
//! `now + ε ≥ next_time` with a small epsilon for floating-point stability,
//! and rescheduling is relative to the current observed time. That choice
//! trades a bounded phase drift of up to one clock period per node for the
//! absence of drift-chasing bursts after a slow tick.
//!
//! Lifecycle: `Created → Initialized → Running → Stopped`. Whatever path
//! leaves `Running` — duration cap, stop predicate, termination signal or a
//! fatal node error — every `on_init`-ed node receives exactly one
//! `on_shutdown` call, in reverse priority order.

use av_common::consts::SCHED_EPS;
use av_common::types::TerminationCause;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::blackboard::FrameData;
use crate::clock::SimClock;
use crate::node::{Node, NodeError, RunStatus};

/// Why the loop stopped.
#[derive(Debug, Clone, PartialEq)]
pub enum ExitCause {
    /// `clock.now` reached the episode duration cap.
    DurationElapsed,
    /// The external stop predicate returned true.
    StopCondition,
    /// A node latched a termination cause on the blackboard.
    Termination(TerminationCause),
    /// A node raised a fatal error.
    NodeFatal {
        /// Offending node name.
        node: String,
        /// Rendered error message.
        message: String,
    },
}

/// Summary of one completed run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutcome {
    /// Why the loop stopped.
    pub cause: ExitCause,
    /// Virtual time at exit [s].
    pub end_time: f64,
    /// Ticks executed.
    pub ticks: u64,
}

/// Per-node invocation counters. O(1) updates, no allocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NodeStats {
    /// Invocations returning `Ok`.
    pub runs: u64,
    /// Invocations returning `Failed`.
    pub failed: u64,
    /// Invocations returning `Skipped`.
    pub skipped: u64,
}

impl NodeStats {
    /// Total invocations regardless of status.
    #[inline]
    pub fn invocations(&self) -> u64 {
        self.runs + self.failed + self.skipped
    }
}

/// Executor lifecycle states. `Stopped` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutorState {
    /// Constructed, nodes may still be added.
    Created,
    /// All nodes initialised.
    Initialized,
    /// Loop in progress.
    Running,
    /// Loop finished; shutdown sweep completed.
    Stopped,
}

/// One scheduled node with its private timing state.
struct Slot {
    node: Box<dyn Node>,
    name: String,
    priority: i32,
    period: f64,
    /// Next due time; zero so every node is eligible at t = 0.
    next_time: f64,
    stats: NodeStats,
}

/// Errors from executor misuse or registration.
#[derive(Debug, Clone, Error)]
pub enum ExecutorError {
    /// A node declared an unusable rate.
    #[error("node '{node}' declared invalid rate {rate_hz} Hz")]
    InvalidRate {
        /// Node name.
        node: String,
        /// Declared rate.
        rate_hz: f64,
    },

    /// `run` was called from the wrong lifecycle state.
    #[error("executor is not runnable: state is {0:?}")]
    NotRunnable(ExecutorState),

    /// No nodes were registered.
    #[error("cannot run an executor with no nodes")]
    NoNodes,
}

/// The cooperative rate scheduler.
pub struct Executor {
    clock: SimClock,
    frame: FrameData,
    slots: Vec<Slot>,
    state: ExecutorState,
}

impl Executor {
    /// Create an executor with a fresh clock and empty blackboard.
    pub fn new(clock_rate_hz: f64) -> Self {
        Self {
            clock: SimClock::new(clock_rate_hz),
            frame: FrameData::new(),
            slots: Vec::new(),
            state: ExecutorState::Created,
        }
    }

    /// Current lifecycle state.
    #[inline]
    pub fn state(&self) -> ExecutorState {
        self.state
    }

    /// The shared blackboard (e.g. to seed the world topic before a run).
    #[inline]
    pub fn frame(&self) -> &FrameData {
        &self.frame
    }

    /// Mutable access to the blackboard.
    #[inline]
    pub fn frame_mut(&mut self) -> &mut FrameData {
        &mut self.frame
    }

    /// Virtual clock.
    #[inline]
    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    /// Register a node. The slot table is re-sorted by priority at run time,
    /// so registration order only matters for priority ties.
    pub fn add_node(&mut self, node: Box<dyn Node>) -> Result<(), ExecutorError> {
        let rate = node.rate_hz();
        let name = node.name().to_string();
        if !(rate.is_finite() && rate > 0.0) {
            return Err(ExecutorError::InvalidRate { node: name, rate_hz: rate });
        }
        self.slots.push(Slot {
            priority: node.priority(),
            period: 1.0 / rate,
            next_time: 0.0,
            stats: NodeStats::default(),
            name,
            node,
        });
        Ok(())
    }

    /// Per-node invocation counters, in priority order.
    pub fn node_stats(&self) -> Vec<(String, NodeStats)> {
        self.slots
            .iter()
            .map(|s| (s.name.clone(), s.stats))
            .collect()
    }

    /// Drive the loop until the duration cap, the stop predicate, a latched
    /// termination cause, or a fatal node error.
    ///
    /// # Errors
    ///
    /// `ExecutorError` only for misuse (no nodes, wrong state). Fatal node
    /// errors are a normal exit path and come back in
    /// [`RunOutcome::cause`] so the guaranteed shutdown sweep has already run.
    pub fn run(
        &mut self,
        duration_sim: f64,
        mut stop_condition: Option<&mut dyn FnMut(&FrameData) -> bool>,
    ) -> Result<RunOutcome, ExecutorError> {
        if self.state != ExecutorState::Created {
            return Err(ExecutorError::NotRunnable(self.state));
        }
        if self.slots.is_empty() {
            return Err(ExecutorError::NoNodes);
        }

        // Stable sort keeps registration order within equal priorities.
        self.slots.sort_by_key(|s| s.priority);

        // ═══ INIT ═══
        let mut inited = 0usize;
        let mut fatal: Option<(String, String)> = None;
        for slot in self.slots.iter_mut() {
            match slot.node.on_init(&mut self.frame) {
                Ok(()) => inited += 1,
                Err(e) => {
                    warn!(node = %slot.name, error = %e, "init failed");
                    fatal = Some((e.node().to_string(), e.to_string()));
                    break;
                }
            }
        }
        if let Some((node, message)) = fatal {
            self.shutdown_sweep(inited);
            self.state = ExecutorState::Stopped;
            return Ok(RunOutcome {
                cause: ExitCause::NodeFatal { node, message },
                end_time: self.clock.now(),
                ticks: self.clock.ticks(),
            });
        }
        self.state = ExecutorState::Initialized;
        info!(nodes = self.slots.len(), rate_hz = self.clock.rate_hz(), "episode initialised");

        // ═══ LOOP ═══
        self.state = ExecutorState::Running;
        let progress_every = self.clock.rate_hz().max(1.0) as u64;
        let cause = loop {
            let now = self.clock.now();

            if now >= duration_sim {
                break ExitCause::DurationElapsed;
            }
            if let Some(stop) = stop_condition.as_mut() {
                if stop(&self.frame) {
                    break ExitCause::StopCondition;
                }
            }
            if let Some(cause) = self.frame.termination() {
                break ExitCause::Termination(cause);
            }

            let mut fatal: Option<(String, String)> = None;
            for slot in self.slots.iter_mut() {
                if now + SCHED_EPS < slot.next_time {
                    continue;
                }
                match slot.node.on_run(now, &mut self.frame) {
                    Ok(RunStatus::Ok) => slot.stats.runs += 1,
                    Ok(RunStatus::Skipped) => slot.stats.skipped += 1,
                    Ok(RunStatus::Failed) => {
                        slot.stats.failed += 1;
                        warn!(node = %slot.name, t = now, "node reported failure");
                    }
                    Err(e) => {
                        fatal = Some((e.node().to_string(), e.to_string()));
                        break;
                    }
                }
                // Reschedule relative to observed time, not the theoretical
                // slot, to avoid burst catch-up after a slow tick.
                slot.next_time = now + slot.period;
            }
            if let Some((node, message)) = fatal {
                warn!(node = %node, %message, t = now, "fatal node error");
                break ExitCause::NodeFatal { node, message };
            }

            self.clock.tick();
            if self.clock.ticks() % progress_every == 0 {
                debug!(t = self.clock.now(), "tick");
            }
        };

        // ═══ SHUTDOWN ═══
        // Unconditional, reverse priority order, exactly once per node.
        self.shutdown_sweep(self.slots.len());
        self.state = ExecutorState::Stopped;

        let outcome = RunOutcome {
            cause,
            end_time: self.clock.now(),
            ticks: self.clock.ticks(),
        };
        info!(cause = ?outcome.cause, t = outcome.end_time, ticks = outcome.ticks, "episode stopped");
        Ok(outcome)
    }

    /// Call `on_shutdown` on the first `count` slots, in reverse order.
    fn shutdown_sweep(&mut self, count: usize) {
        for slot in self.slots[..count].iter_mut().rev() {
            slot.node.on_shutdown(&mut self.frame);
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
