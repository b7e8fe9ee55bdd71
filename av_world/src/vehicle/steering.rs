//! Steering actuator: first-order lag plus dead time.
//!
//! The commanded angle passes through a fixed-capacity delay line sized to
//! the dead time, then through a first-order lag toward `k · delayed`, and is
//! finally saturated at the steering lock. Zero dead time degenerates to a
//! direct feed-through into the lag.

use av_common::consts::MAX_DELAY_SAMPLES;
use heapless::Deque;

use crate::error::WorldError;

/// Steering actuator parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SteeringParams {
    /// Static gain.
    pub k: f64,
    /// Lag time constant [s], > 0.
    pub tau: f64,
    /// Dead time [s], ≥ 0.
    pub dead_time: f64,
    /// Steering lock [rad].
    pub max_steer: f64,
}

/// Actuator state: delay line plus lag output.
///
/// The delay line holds exactly `delay_samples` commands; each update pops
/// the command issued `dead_time` seconds ago and pushes the fresh one, so
/// the buffer length is invariant across ticks.
#[derive(Debug)]
pub struct SteeringActuator {
    params: SteeringParams,
    delay: Deque<f64, MAX_DELAY_SAMPLES>,
    delay_samples: usize,
    eff: f64,
}

impl SteeringActuator {
    /// Build the actuator for a dynamics update rate of `rate_hz`.
    ///
    /// # Errors
    ///
    /// Fails when the dead-time window does not fit the delay-line capacity.
    pub fn new(params: SteeringParams, rate_hz: f64) -> Result<Self, WorldError> {
        let delay_samples = (params.dead_time * rate_hz).ceil() as usize;
        if delay_samples >= MAX_DELAY_SAMPLES {
            return Err(WorldError::DelayCapacity {
                required: delay_samples + 1,
                capacity: MAX_DELAY_SAMPLES,
            });
        }
        let mut delay = Deque::new();
        for _ in 0..delay_samples {
            let _ = delay.push_back(0.0);
        }
        Ok(Self {
            params,
            delay,
            delay_samples,
            eff: 0.0,
        })
    }

    /// Current effective steering angle [rad].
    #[inline]
    pub fn effective(&self) -> f64 {
        self.eff
    }

    /// Reset the actuator to rest: zero output, zeroed delay line.
    pub fn reset(&mut self) {
        self.eff = 0.0;
        self.delay.clear();
        for _ in 0..self.delay_samples {
            let _ = self.delay.push_back(0.0);
        }
    }

    /// Advance the actuator one dynamics step.
    ///
    /// # Arguments
    /// - `cmd`: Commanded steering angle [rad].
    /// - `dt`: Step period [s].
    ///
    /// # Returns
    /// The saturated effective steering angle [rad].
    pub fn update(&mut self, cmd: f64, dt: f64) -> f64 {
        let delayed = if self.delay_samples == 0 {
            cmd
        } else {
            let oldest = self.delay.pop_front().unwrap_or(0.0);
            let _ = self.delay.push_back(cmd);
            oldest
        };

        self.eff += (dt / self.params.tau) * (self.params.k * delayed - self.eff);
        self.eff = self.eff.clamp(-self.params.max_steer, self.params.max_steer);
        self.eff
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
