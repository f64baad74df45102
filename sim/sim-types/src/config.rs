//! Configuration types for simulation.
//!
//! [`EngineConfig`] holds every process-wide parameter of the engine: gravity,
//! timestep, damping, solver settings and the behavior modes that differ
//! between ragdoll variants (impulse scaling, ground contact). It is handed to
//! the stepper at construction and never changes during a run.
//!
//! Configuration can be built in code, read from the environment with
//! [`EngineConfig::from_env`], or (with the `serde` feature) deserialized from
//! a partial document where missing fields take their defaults.

use std::str::FromStr;

use crate::SimError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Environment variable enabling the engine (`"true"` enables).
pub const ENV_ENABLED: &str = "ENABLE_RAG_PHYSICS";
/// Environment variable for gravitational acceleration (m/s²).
pub const ENV_GRAVITY: &str = "PHYSICS_GRAVITY";
/// Environment variable for the timestep (s).
pub const ENV_TIMESTEP: &str = "PHYSICS_TIMESTEP";
/// Environment variable for solver iterations per step.
pub const ENV_ITERATIONS: &str = "PHYSICS_ITERATIONS";
/// Environment variable for per-step velocity damping.
pub const ENV_DAMPING: &str = "PHYSICS_DAMPING";
/// Environment variable for the quality label.
pub const ENV_QUALITY: &str = "PHYSICS_SIMULATION_QUALITY";
/// Environment variable selecting timestep-scaled impulses.
pub const ENV_DT_SCALED_IMPULSES: &str = "PHYSICS_DT_SCALED_IMPULSES";
/// Environment variable toggling ground contact.
pub const ENV_GROUND_COLLISION: &str = "PHYSICS_GROUND_COLLISION";

/// Coarse quality setting.
///
/// Informational unless applied through [`EngineConfig::with_quality`], which
/// also picks the matching solver iteration count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum SimulationQuality {
    /// Few solver iterations.
    Low,
    /// Balanced.
    #[default]
    Medium,
    /// Many solver iterations.
    High,
}

impl SimulationQuality {
    /// Solver iterations associated with this quality level.
    #[must_use]
    pub const fn solver_iterations(self) -> usize {
        match self {
            Self::Low => 5,
            Self::Medium => 10,
            Self::High => 20,
        }
    }
}

impl FromStr for SimulationQuality {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(SimError::invalid_config(format!(
                "unknown simulation quality {other:?} (expected low, medium or high)"
            ))),
        }
    }
}

impl std::fmt::Display for SimulationQuality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
        }
    }
}

/// How an applied force turns into a velocity change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ImpulseMode {
    /// `Δv = F / m`, applied once.
    #[default]
    Instant,
    /// `Δv = F / m · dt`, as if the force acted for one timestep.
    TimestepScaled,
}

/// How joint anchors are placed in world space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum AnchorMode {
    /// `position + anchor`, ignoring the body's orientation.
    #[default]
    Translated,
    /// `position + rotation * anchor`.
    Rotated,
}

/// Response of a body touching the ground plane `y = 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GroundContact {
    /// Fraction of vertical speed kept (and reflected) on contact.
    pub restitution: f64,
    /// Factor applied to horizontal velocity on contact.
    pub friction: f64,
}

impl Default for GroundContact {
    fn default() -> Self {
        Self {
            restitution: 0.3,
            friction: 0.8,
        }
    }
}

/// Settings of the position-based joint solver.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SolverConfig {
    /// Passes over all joints per step.
    pub iterations: usize,
    /// Fraction of the separation error corrected per pass, before stiffness.
    pub correction_factor: f64,
    /// Anchor separation the solver drives every joint towards (m).
    pub target_separation: f64,
    /// Anchor placement.
    pub anchor_mode: AnchorMode,
    /// Joints whose anchors are closer than this are skipped for the pass.
    pub separation_epsilon: f64,
    /// Joints whose summed inverse mass is below this are skipped.
    pub inverse_mass_epsilon: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            iterations: 10,
            correction_factor: 0.2,
            target_separation: 0.1,
            anchor_mode: AnchorMode::Translated,
            separation_epsilon: 1e-4,
            inverse_mass_epsilon: 1e-5,
        }
    }
}

impl SolverConfig {
    /// Set the number of passes per step.
    #[must_use]
    pub fn iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Set the anchor placement mode.
    #[must_use]
    pub fn anchor_mode(mut self, mode: AnchorMode) -> Self {
        self.anchor_mode = mode;
        self
    }

    /// Validate the solver configuration.
    pub fn validate(&self) -> crate::Result<()> {
        if self.iterations == 0 {
            return Err(SimError::invalid_config("iterations must be at least 1"));
        }

        if !(self.correction_factor > 0.0 && self.correction_factor <= 1.0) {
            return Err(SimError::invalid_config(
                "correction_factor must be in (0, 1]",
            ));
        }

        if !self.target_separation.is_finite() || self.target_separation < 0.0 {
            return Err(SimError::invalid_config(
                "target_separation must be finite and non-negative",
            ));
        }

        if !(self.separation_epsilon >= 0.0 && self.inverse_mass_epsilon >= 0.0) {
            return Err(SimError::invalid_config("epsilons cannot be negative"));
        }

        Ok(())
    }
}

/// Main configuration for the engine.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineConfig {
    /// When false, `simulate` returns an inert result and `step` does nothing.
    pub enabled: bool,
    /// Gravitational acceleration along -Y (m/s²).
    pub gravity: f64,
    /// Fixed timestep (s).
    pub time_step: f64,
    /// Per-step multiplicative velocity damping, in `[0, 1)`.
    pub damping: f64,
    /// Quality label.
    pub quality: SimulationQuality,
    /// Force-to-velocity conversion.
    pub impulse_mode: ImpulseMode,
    /// Ground plane response, `None` to let bodies fall forever.
    pub ground: Option<GroundContact>,
    /// Joint solver settings.
    pub solver: SolverConfig,
    /// Rotation increments smaller than this (rad) are skipped.
    pub rotation_epsilon: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            gravity: 9.8,
            time_step: 0.01666,
            damping: 0.1,
            quality: SimulationQuality::Medium,
            impulse_mode: ImpulseMode::Instant,
            ground: Some(GroundContact::default()),
            solver: SolverConfig::default(),
            rotation_epsilon: 1e-4,
        }
    }
}

impl EngineConfig {
    /// Create a config with the given timestep.
    #[must_use]
    pub fn with_time_step(time_step: f64) -> Self {
        Self {
            time_step,
            ..Default::default()
        }
    }

    /// Create a config for a quality level.
    #[must_use]
    pub fn with_quality(quality: SimulationQuality) -> Self {
        Self {
            quality,
            solver: SolverConfig::default().iterations(quality.solver_iterations()),
            ..Default::default()
        }
    }

    /// Read the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidConfig`] if a variable is set but cannot be
    /// parsed, or if the resulting config fails validation.
    pub fn from_env() -> crate::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through an arbitrary key lookup.
    ///
    /// Unset keys keep their defaults, except the enable flag: the engine is
    /// only enabled when [`ENV_ENABLED`] is exactly `"true"`.
    ///
    /// # Errors
    ///
    /// Same as [`Self::from_env`].
    pub fn from_lookup<F>(lookup: F) -> crate::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self {
            enabled: lookup(ENV_ENABLED).is_some_and(|v| v == "true"),
            ..Self::default()
        };

        if let Some(gravity) = parse_var(&lookup, ENV_GRAVITY)? {
            config.gravity = gravity;
        }
        if let Some(time_step) = parse_var(&lookup, ENV_TIMESTEP)? {
            config.time_step = time_step;
        }
        if let Some(iterations) = parse_var(&lookup, ENV_ITERATIONS)? {
            config.solver.iterations = iterations;
        }
        if let Some(damping) = parse_var(&lookup, ENV_DAMPING)? {
            config.damping = damping;
        }
        if let Some(quality) = parse_var(&lookup, ENV_QUALITY)? {
            config.quality = quality;
        }
        if let Some(scaled) = parse_var::<bool, _>(&lookup, ENV_DT_SCALED_IMPULSES)? {
            config.impulse_mode = if scaled {
                ImpulseMode::TimestepScaled
            } else {
                ImpulseMode::Instant
            };
        }
        if let Some(ground) = parse_var::<bool, _>(&lookup, ENV_GROUND_COLLISION)? {
            config.ground = ground.then(GroundContact::default);
        }

        config.validate()?;
        Ok(config)
    }

    /// Set the gravitational acceleration.
    #[must_use]
    pub fn gravity(mut self, gravity: f64) -> Self {
        self.gravity = gravity;
        self
    }

    /// Disable gravity.
    #[must_use]
    pub fn zero_gravity(mut self) -> Self {
        self.gravity = 0.0;
        self
    }

    /// Set the per-step damping.
    #[must_use]
    pub fn damping(mut self, damping: f64) -> Self {
        self.damping = damping;
        self
    }

    /// Set the impulse mode.
    #[must_use]
    pub fn impulse_mode(mut self, mode: ImpulseMode) -> Self {
        self.impulse_mode = mode;
        self
    }

    /// Set the ground response.
    #[must_use]
    pub fn ground(mut self, ground: GroundContact) -> Self {
        self.ground = Some(ground);
        self
    }

    /// Remove the ground plane.
    #[must_use]
    pub fn without_ground(mut self) -> Self {
        self.ground = None;
        self
    }

    /// Set the solver configuration.
    #[must_use]
    pub fn solver(mut self, solver: SolverConfig) -> Self {
        self.solver = solver;
        self
    }

    /// Enable or disable the engine.
    #[must_use]
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> crate::Result<()> {
        if !self.time_step.is_finite() || self.time_step <= 0.0 {
            return Err(SimError::InvalidTimestep(self.time_step));
        }

        if self.time_step > 1.0 {
            return Err(SimError::invalid_config(
                "timestep > 1 second is likely an error",
            ));
        }

        if !self.gravity.is_finite() || self.gravity < 0.0 {
            return Err(SimError::invalid_config(
                "gravity must be finite and non-negative",
            ));
        }

        if !(0.0..1.0).contains(&self.damping) {
            return Err(SimError::invalid_config("damping must be in [0, 1)"));
        }

        if let Some(ground) = &self.ground {
            if !(0.0..=1.0).contains(&ground.restitution) {
                return Err(SimError::invalid_config(
                    "restitution must be between 0 and 1",
                ));
            }
            if !(0.0..=1.0).contains(&ground.friction) {
                return Err(SimError::invalid_config(
                    "friction must be between 0 and 1",
                ));
            }
        }

        if !self.rotation_epsilon.is_finite() || self.rotation_epsilon < 0.0 {
            return Err(SimError::invalid_config(
                "rotation_epsilon must be finite and non-negative",
            ));
        }

        self.solver.validate()
    }

    /// Number of fixed steps covering `duration` seconds (rounded up).
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidDuration`] for negative or non-finite input.
    pub fn steps_for(&self, duration: f64) -> crate::Result<usize> {
        if !duration.is_finite() || duration < 0.0 {
            return Err(SimError::InvalidDuration(duration));
        }

        let steps = (duration / self.time_step).ceil();
        if !steps.is_finite() || steps > usize::MAX as f64 {
            return Err(SimError::InvalidDuration(duration));
        }

        // Non-negative and bounded above
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        Ok(steps as usize)
    }

    /// Get the stepping frequency in Hz.
    #[must_use]
    pub fn frequency(&self) -> f64 {
        1.0 / self.time_step
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> crate::Result<Option<T>>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|raw| {
            raw.trim().parse::<T>().map_err(|_| {
                SimError::invalid_config(format!("{key}={raw:?} could not be parsed"))
            })
        })
        .transpose()
}
