//! Simulation state, applied forces, and run results.

use nalgebra::{Point3, Vector3};

use crate::{RagdollModel, RigidBody};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The evolving state of a simulation: a clock plus the models being stepped.
///
/// A state is an owned value. The driver clones its input model into a fresh
/// state, so nothing the caller holds is ever mutated.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SimulationState {
    /// Simulation time in seconds. Never decreases.
    pub time: f64,
    /// Models in the simulation.
    pub models: Vec<RagdollModel>,
}

impl SimulationState {
    /// Create a state at time zero.
    #[must_use]
    pub fn new(models: Vec<RagdollModel>) -> Self {
        Self { time: 0.0, models }
    }

    /// Create a state at time zero holding a single model.
    #[must_use]
    pub fn with_model(model: RagdollModel) -> Self {
        Self::new(vec![model])
    }

    /// Find a body by id across all models.
    #[must_use]
    pub fn body(&self, id: &str) -> Option<&RigidBody> {
        self.models.iter().find_map(|m| m.body(id))
    }

    /// Find a body by id across all models, mutably.
    pub fn body_mut(&mut self, id: &str) -> Option<&mut RigidBody> {
        self.models.iter_mut().find_map(|m| m.body_mut(id))
    }

    /// Find a model by id.
    #[must_use]
    pub fn model(&self, id: &str) -> Option<&RagdollModel> {
        self.models.iter().find(|m| m.id == id)
    }

    /// Number of bodies across all models.
    #[must_use]
    pub fn body_count(&self) -> usize {
        self.models.iter().map(RagdollModel::body_count).sum()
    }

    /// Check if the clock and every body are free of `NaN` or `Inf`.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.time.is_finite() && self.models.iter().all(RagdollModel::is_finite)
    }
}

/// A one-shot force applied to a body before stepping starts.
///
/// `point`, when present, is a world-space application point; the lever arm
/// from the body position produces an angular impulse.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct AppliedForce {
    /// Target body id.
    pub body_id: String,
    /// Force vector in world coordinates (N).
    pub force: Vector3<f64>,
    /// Optional application point in world coordinates.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub point: Option<Point3<f64>>,
}

impl AppliedForce {
    /// Force through the body origin (no angular effect).
    #[must_use]
    pub fn at_com(body_id: impl Into<String>, force: Vector3<f64>) -> Self {
        Self {
            body_id: body_id.into(),
            force,
            point: None,
        }
    }

    /// Force applied at a world-space point.
    #[must_use]
    pub fn at_point(body_id: impl Into<String>, force: Vector3<f64>, point: Point3<f64>) -> Self {
        Self {
            body_id: body_id.into(),
            force,
            point: Some(point),
        }
    }
}

/// Outcome of a `simulate` call. Owned by the caller; the engine keeps nothing.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct SimulationResult {
    /// Deep copy of the input, before any force was applied.
    pub initial_state: SimulationState,
    /// State after the last step.
    pub final_state: SimulationState,
    /// Requested duration in seconds.
    pub duration: f64,
    /// Number of steps executed.
    pub steps: usize,
}

impl SimulationResult {
    /// Result of a run that did nothing: both states hold `model` at time zero.
    #[must_use]
    pub fn inert(model: &RagdollModel) -> Self {
        let state = SimulationState::with_model(model.clone());
        Self {
            initial_state: state.clone(),
            final_state: state,
            duration: 0.0,
            steps: 0,
        }
    }

    /// Displacement of a body between the initial and final state.
    #[must_use]
    pub fn displacement(&self, body_id: &str) -> Option<Vector3<f64>> {
        let start = self.initial_state.body(body_id)?;
        let end = self.final_state.body(body_id)?;
        Some(end.position - start.position)
    }
}
