//! Episode assembly: scenario config → executor + nodes → result record.
//!
//! Node priorities encode the per-tick data flow: the sensor sweeps first
//! (observing last tick's state), the controller reacts to the scan, the
//! dynamics integrates the command, the obstacle manager advances, the
//! supervisor checks termination against the freshly integrated state, and
//! the recorder reads everything.

use av_common::config::{ConfigError, ScenarioConfig};
use av_common::types::{EpisodeResult, EpisodeStatus, VehicleState};
use av_world::WorldError;
use av_world::lidar::{LidarModel, LidarParams};
use av_world::obstacle::ObstacleSet;
use av_world::vehicle::{VehicleModel, VehicleParams};
use av_world::world::WorldGeometry;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::path::PathBuf;
use std::rc::Rc;
use thiserror::Error;
use tracing::info;

use crate::blackboard::{FrameData, Message, topic};
use crate::executor::{Executor, ExecutorError, ExitCause};
use crate::nodes::{
    DynamicsNode, LidarNode, ObstacleNode, RecorderNode, ScriptedControlNode, SupervisorNode,
};

// Priority slots follow the per-tick data flow; dynamics must stay below the
// supervisor so collision checks observe the just-integrated state.
const PRIO_LIDAR: i32 = 10;
const PRIO_CONTROL: i32 = 20;
const PRIO_DYNAMICS: i32 = 30;
const PRIO_OBSTACLES: i32 = 40;
const PRIO_SUPERVISOR: i32 = 50;
const PRIO_RECORDER: i32 = 60;

/// Errors while assembling or driving an episode.
#[derive(Debug, Error)]
pub enum EpisodeError {
    /// Scenario failed validation; nothing was initialised.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// World-model construction failed.
    #[error(transparent)]
    World(#[from] WorldError),

    /// Executor misuse or registration failure.
    #[error(transparent)]
    Executor(#[from] ExecutorError),
}

/// Run one episode described by `cfg`.
///
/// `telemetry` optionally names a JSONL file the recorder flushes at
/// shutdown. Every random draw derives from `cfg.episode.seed`, so repeated
/// calls with the same config produce identical results.
pub fn run_scenario(
    cfg: &ScenarioConfig,
    telemetry: Option<PathBuf>,
) -> Result<EpisodeResult, EpisodeError> {
    run_scenario_with(cfg, telemetry, None)
}

/// [`run_scenario`] with an optional external stop predicate.
pub fn run_scenario_with(
    cfg: &ScenarioConfig,
    telemetry: Option<PathBuf>,
    stop_condition: Option<&mut dyn FnMut(&FrameData) -> bool>,
) -> Result<EpisodeResult, EpisodeError> {
    cfg.validate()?;

    let world = Rc::new(WorldGeometry::from_config(&cfg.track)?);
    let vehicle_params = VehicleParams::from(&cfg.vehicle);

    // One episode-seeded PRNG; per-node sub-seeds are drawn in registration
    // order so a node added at the end cannot perturb earlier streams.
    let mut seed_rng = ChaCha8Rng::seed_from_u64(cfg.episode.seed);
    let lidar_seed = seed_rng.next_u64();

    // Ego starts on the centreline origin.
    let start = world.centreline.interpolate(0.0);
    let initial = VehicleState {
        x: start.x,
        y: start.y,
        yaw: start.yaw,
        ..Default::default()
    };

    let rates = &cfg.rates;
    let mut exec = Executor::new(cfg.episode.clock_rate_hz);
    exec.frame_mut()
        .insert(topic::WORLD, Message::World(Rc::clone(&world)));

    exec.add_node(Box::new(LidarNode::new(
        LidarModel::new(LidarParams::from(&cfg.lidar), lidar_seed)?,
        rates.lidar_hz,
        PRIO_LIDAR,
    )))?;
    exec.add_node(Box::new(ScriptedControlNode::new(
        cfg.control,
        rates.control_hz,
        PRIO_CONTROL,
    )))?;
    exec.add_node(Box::new(DynamicsNode::new(
        VehicleModel::new(vehicle_params, initial, rates.dynamics_hz)?,
        rates.dynamics_hz,
        PRIO_DYNAMICS,
    )))?;
    exec.add_node(Box::new(ObstacleNode::new(
        ObstacleSet::from_config(&cfg.obstacles)?,
        rates.obstacles_hz,
        PRIO_OBSTACLES,
    )))?;
    exec.add_node(Box::new(SupervisorNode::new(
        vehicle_params,
        rates.supervisor_hz,
        PRIO_SUPERVISOR,
    )))?;
    exec.add_node(Box::new(RecorderNode::new(
        telemetry,
        rates.recorder_hz,
        PRIO_RECORDER,
    )))?;

    info!(seed = cfg.episode.seed, duration_s = cfg.episode.duration_s, "episode starting");
    let outcome = exec.run(cfg.episode.duration_s, stop_condition)?;

    let mut metrics = exec.frame().metrics().unwrap_or_default();
    metrics.duration_sim = outcome.end_time;

    let status = match outcome.cause {
        ExitCause::Termination(cause) => cause.into(),
        // The stop predicate is an external cutoff; it reports like the
        // episode cap.
        ExitCause::DurationElapsed | ExitCause::StopCondition => EpisodeStatus::Timeout,
        ExitCause::NodeFatal { node, .. } => EpisodeStatus::Error { node },
    };

    Ok(EpisodeResult {
        status,
        metrics,
        config_snapshot: cfg.clone(),
    })
}
