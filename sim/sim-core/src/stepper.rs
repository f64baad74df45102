//! Simulation stepping and control flow.
//!
//! The [`Stepper`] owns an [`EngineConfig`] and drives [`SimulationState`]
//! values the caller owns. It holds no simulation state of its own, so one
//! stepper can run any number of independent simulations.
//!
//! # Example
//!
//! ```
//! use sim_core::Stepper;
//! use sim_types::{AppliedForce, EngineConfig, RagdollModel, RigidBody};
//! use nalgebra::{Point3, Vector3};
//!
//! let model = RagdollModel::new(
//!     "ball",
//!     vec![RigidBody::new("ball_body", Point3::new(0.0, 2.0, 0.0), 1.0)],
//!     vec![],
//! );
//!
//! let stepper = Stepper::new(EngineConfig::with_time_step(0.01)).unwrap();
//! let kick = AppliedForce::at_com("ball_body", Vector3::new(3.0, 0.0, 0.0));
//! let result = stepper.simulate(&model, 1.0, &[kick]).unwrap();
//!
//! assert_eq!(result.steps, 100);
//! assert!(result.displacement("ball_body").unwrap().x > 0.0);
//! // The caller's model is untouched
//! assert_eq!(result.initial_state.models[0], model);
//! ```

use std::ops::ControlFlow;

use nalgebra::{Point3, Vector3};
use sim_constraint::PositionSolver;
use sim_types::{
    AppliedForce, EngineConfig, RagdollModel, SimError, SimulationResult, SimulationState,
};
use tracing::{debug, info, warn};

use crate::forces;
use crate::integrators::integrate_body;

/// Fixed-timestep driver: integration, then joint solving, once per step.
#[derive(Debug, Clone)]
pub struct Stepper {
    config: EngineConfig,
    solver: PositionSolver,
}

impl Default for Stepper {
    fn default() -> Self {
        let config = EngineConfig::default();
        let solver = PositionSolver::new(config.solver.clone());
        Self { config, solver }
    }
}

impl Stepper {
    /// Create a stepper.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration fails validation.
    pub fn new(config: EngineConfig) -> sim_types::Result<Self> {
        config.validate()?;
        let solver = PositionSolver::new(config.solver.clone());
        Ok(Self { config, solver })
    }

    /// Read the configuration from the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable cannot be parsed or the resulting
    /// configuration is invalid.
    pub fn from_env() -> sim_types::Result<Self> {
        Self::new(EngineConfig::from_env()?)
    }

    /// Get the configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Apply a one-shot force to a body of `state`.
    ///
    /// Returns `false` and leaves `state` unchanged if the engine is disabled
    /// or the body is unknown or static.
    pub fn apply_force(
        &self,
        state: &mut SimulationState,
        body_id: &str,
        force: Vector3<f64>,
        point: Option<Point3<f64>>,
    ) -> bool {
        if !self.config.enabled {
            warn!(body_id, "physics engine disabled, force ignored");
            return false;
        }
        forces::apply_force(state, body_id, force, point, &self.config)
    }

    /// Apply an [`AppliedForce`] to `state`.
    pub fn apply(&self, state: &mut SimulationState, force: &AppliedForce) -> bool {
        self.apply_force(state, &force.body_id, force.force, force.point)
    }

    /// Advance `state` by one timestep.
    ///
    /// Every non-static body is integrated, the clock advances, then each
    /// model's joints are solved. Does nothing when the engine is disabled.
    pub fn step(&self, state: &mut SimulationState) {
        if !self.config.enabled {
            debug!("physics engine disabled, step skipped");
            return;
        }

        for model in &mut state.models {
            for body in &mut model.bodies {
                integrate_body(body, &self.config);
            }
        }

        state.time += self.config.time_step;

        for model in &mut state.models {
            self.solver.solve(model);
        }
    }

    /// Simulate `model` for `duration` seconds after applying `forces` once.
    ///
    /// Runs `ceil(duration / dt)` steps on a private copy of `model`. When the
    /// engine is disabled the result is inert: both states hold `model` at
    /// time zero and `steps` is zero.
    ///
    /// Forces naming unknown or static bodies are skipped with a warning.
    ///
    /// # Errors
    ///
    /// - [`SimError::InvalidDuration`] for a negative or non-finite duration
    /// - a validation error if `model` is malformed
    /// - [`SimError::Diverged`] if the final state holds `NaN` or `Inf`
    pub fn simulate(
        &self,
        model: &RagdollModel,
        duration: f64,
        forces: &[AppliedForce],
    ) -> sim_types::Result<SimulationResult> {
        self.simulate_observed(model, duration, forces, |_| ControlFlow::Continue(()))
    }

    /// Like [`Stepper::simulate`], calling `observer` after every step.
    ///
    /// The observer may end the run early by returning
    /// [`ControlFlow::Break`]; `steps` then reports the steps actually taken
    /// while `duration` keeps the requested value.
    ///
    /// # Errors
    ///
    /// Same as [`Stepper::simulate`].
    pub fn simulate_observed<F>(
        &self,
        model: &RagdollModel,
        duration: f64,
        forces: &[AppliedForce],
        mut observer: F,
    ) -> sim_types::Result<SimulationResult>
    where
        F: FnMut(&SimulationState) -> ControlFlow<()>,
    {
        if !self.config.enabled {
            warn!(model = %model.id, "physics engine disabled, returning inert result");
            return Ok(SimulationResult::inert(model));
        }

        model.validate()?;
        let planned = self.config.steps_for(duration)?;

        let initial_state = SimulationState::with_model(model.clone());
        let mut state = initial_state.clone();

        for force in forces {
            self.apply(&mut state, force);
        }

        info!(model = %model.id, duration, steps = planned, "starting simulation");

        let mut steps = 0;
        while steps < planned {
            self.step(&mut state);
            steps += 1;
            if observer(&state).is_break() {
                debug!(steps, "simulation stopped by observer");
                break;
            }
        }

        if !state.is_finite() {
            return Err(SimError::diverged(format!(
                "non-finite body state after {steps} steps"
            )));
        }

        Ok(SimulationResult {
            initial_state,
            final_state: state,
            duration,
            steps,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use sim_types::{ImpulseMode, Joint, RigidBody};

    fn ball(y: f64) -> RagdollModel {
        RagdollModel::new(
            "ball",
            vec![RigidBody::new("ball_body", Point3::new(0.0, y, 0.0), 1.0)],
            vec![],
        )
    }

    fn free_fall_config() -> EngineConfig {
        EngineConfig::with_time_step(0.01).damping(0.0).without_ground()
    }

    #[test]
    fn test_new_validates_config() {
        assert!(Stepper::new(EngineConfig::with_time_step(-1.0)).is_err());
        assert!(Stepper::new(EngineConfig::default()).is_ok());
        assert_eq!(Stepper::default().config(), &EngineConfig::default());
    }

    #[test]
    fn test_free_fall() {
        let stepper = Stepper::new(free_fall_config()).unwrap();
        let result = stepper.simulate(&ball(1000.0), 1.0, &[]).unwrap();

        assert_eq!(result.steps, 100);
        let body = result.final_state.body("ball_body").unwrap();
        assert_relative_eq!(body.velocity.y, -9.8 * 100.0 * 0.01, epsilon = 1e-9);
        assert_relative_eq!(result.final_state.time, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_step_advances_time() {
        let stepper = Stepper::default();
        let mut state = SimulationState::with_model(ball(1.0));

        stepper.step(&mut state);
        stepper.step(&mut state);

        assert_relative_eq!(state.time, 2.0 * 0.01666, epsilon = 1e-12);
        assert!(state.body("ball_body").unwrap().position.y < 1.0);
    }

    #[test]
    fn test_zero_duration_is_identity() {
        let stepper = Stepper::default();
        let result = stepper.simulate(&ball(1.0), 0.0, &[]).unwrap();

        assert_eq!(result.steps, 0);
        assert_eq!(result.initial_state, result.final_state);
    }

    #[test]
    fn test_invalid_duration() {
        let stepper = Stepper::default();
        assert_eq!(
            stepper.simulate(&ball(1.0), -1.0, &[]),
            Err(SimError::InvalidDuration(-1.0))
        );
        assert!(stepper.simulate(&ball(1.0), f64::INFINITY, &[]).is_err());
    }

    #[test]
    fn test_invalid_model_is_rejected() {
        let mut model = ball(1.0);
        model.joints.push(Joint::new(
            "ball_dangling",
            "ball_body",
            "ball_missing",
            Vector3::zeros(),
            Vector3::zeros(),
        ));
        assert!(Stepper::default().simulate(&model, 1.0, &[]).is_err());
    }

    #[test]
    fn test_forces_are_applied_once() {
        let config = free_fall_config().zero_gravity();
        let stepper = Stepper::new(config).unwrap();
        let push = AppliedForce::at_com("ball_body", Vector3::new(2.0, 0.0, 0.0));

        let result = stepper.simulate(&ball(1.0), 1.0, &[push]).unwrap();

        // Constant 2 m/s for one second, no acceleration afterwards
        let body = result.final_state.body("ball_body").unwrap();
        assert_relative_eq!(body.velocity.x, 2.0, epsilon = 1e-12);
        assert_relative_eq!(body.position.x, 2.0, epsilon = 1e-9);
        // The initial state is captured before the force
        let start = result.initial_state.body("ball_body").unwrap();
        assert_eq!(start.velocity, Vector3::zeros());
    }

    #[test]
    fn test_timestep_scaled_forces() {
        let config = free_fall_config()
            .zero_gravity()
            .impulse_mode(ImpulseMode::TimestepScaled);
        let stepper = Stepper::new(config).unwrap();
        let push = AppliedForce::at_com("ball_body", Vector3::new(200.0, 0.0, 0.0));

        let result = stepper.simulate(&ball(1.0), 0.0, &[push]).unwrap();

        let body = result.final_state.body("ball_body").unwrap();
        assert_relative_eq!(body.velocity.x, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_unknown_force_target_is_skipped() {
        let stepper = Stepper::default();
        let ghost = AppliedForce::at_com("ghost", Vector3::new(0.0, 100.0, 0.0));

        let with_ghost = stepper.simulate(&ball(1.0), 0.5, &[ghost]).unwrap();
        let without = stepper.simulate(&ball(1.0), 0.5, &[]).unwrap();

        assert_eq!(with_ghost.final_state, without.final_state);
    }

    #[test]
    fn test_disabled_engine_is_inert() {
        let stepper = Stepper::new(EngineConfig::default().enabled(false)).unwrap();
        let model = ball(1.0);
        let push = AppliedForce::at_com("ball_body", Vector3::new(0.0, 100.0, 0.0));

        let result = stepper.simulate(&model, 3.0, &[push]).unwrap();
        assert_eq!(result, SimulationResult::inert(&model));

        let mut state = SimulationState::with_model(model);
        let before = state.clone();
        assert!(!stepper.apply_force(&mut state, "ball_body", Vector3::y(), None));
        stepper.step(&mut state);
        assert_eq!(state, before);
    }

    #[test]
    fn test_observer_can_stop_early() {
        let stepper = Stepper::default();
        let mut seen = Vec::new();

        let result = stepper
            .simulate_observed(&ball(1.0), 1.0, &[], |state| {
                seen.push(state.time);
                if seen.len() == 5 {
                    ControlFlow::Break(())
                } else {
                    ControlFlow::Continue(())
                }
            })
            .unwrap();

        assert_eq!(result.steps, 5);
        assert_eq!(seen.len(), 5);
        assert!(seen.windows(2).all(|w| w[1] > w[0]));
        assert_relative_eq!(result.duration, 1.0);
    }

    #[test]
    fn test_divergence_is_reported() {
        let stepper = Stepper::default();
        let model = RagdollModel::new(
            "bad",
            vec![RigidBody::new("bad_body", Point3::new(0.0, 1.0, 0.0), 1.0)
                .with_velocity(Vector3::new(f64::NAN, 0.0, 0.0))],
            vec![],
        );

        let err = stepper.simulate(&model, 0.1, &[]).unwrap_err();
        assert!(err.is_diverged());
    }

    #[test]
    fn test_static_bodies_do_not_move() {
        let model = RagdollModel::new(
            "post",
            vec![
                RigidBody::fixed("post_base", Point3::new(0.0, 1.0, 0.0)),
                RigidBody::new("post_bob", Point3::new(0.0, 0.5, 0.0), 1.0),
            ],
            vec![Joint::new(
                "post_link",
                "post_base",
                "post_bob",
                Vector3::zeros(),
                Vector3::zeros(),
            )],
        );

        let result = Stepper::default().simulate(&model, 2.0, &[]).unwrap();
        let base = result.final_state.body("post_base").unwrap();
        assert_eq!(base.position, Point3::new(0.0, 1.0, 0.0));
    }
}
