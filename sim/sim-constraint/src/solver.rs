//! Position-based joint solver.
//!
//! Every pass visits the joints in model order and nudges the two connected
//! bodies along the line between their world anchors:
//!
//! ```text
//! d          = anchor_b - anchor_a
//! n          = d / |d|
//! w_a, w_b   = inverse masses (0 when static)
//! correction = (|d| - target) * factor / (w_a + w_b) * stiffness
//! p_a       += n * correction * w_a
//! p_b       -= n * correction * w_b
//! ```
//!
//! Since `m_a * (correction * w_a) == m_b * (correction * w_b)`, a correction
//! moves no net mass-weighted position: the momentum of the pair is
//! unchanged.
//!
//! The solver drives every joint towards one shared target separation rather
//! than a rest length derived from the anchors, and only positions are
//! corrected. Velocities, orientations and angular limits are left alone.

use nalgebra::{Point3, Vector3};
use sim_types::{AnchorMode, Joint, RagdollModel, RigidBody, SolverConfig};
use tracing::debug;

/// Why a joint was not corrected during a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// A referenced body is not part of the model.
    MissingBody,
    /// Both bodies are static.
    BothStatic,
    /// The anchors coincide, so there is no direction to correct along.
    DegenerateSeparation,
    /// The summed inverse mass is negligible.
    NegligibleInverseMass,
}

/// Outcome of solving one joint once.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum JointCorrection {
    /// Bodies were moved; `magnitude` is the scalar correction applied.
    Applied {
        /// Scalar correction before inverse-mass weighting.
        magnitude: f64,
    },
    /// The joint was left alone.
    Skipped(SkipReason),
}

/// Counters gathered over one [`PositionSolver::solve`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SolveStats {
    /// Corrections applied.
    pub applied: usize,
    /// Joint visits that were skipped.
    pub skipped: usize,
}

/// World-space position of a joint anchor on a body.
#[must_use]
pub fn world_anchor(body: &RigidBody, anchor: &Vector3<f64>, mode: AnchorMode) -> Point3<f64> {
    match mode {
        AnchorMode::Translated => body.position + anchor,
        AnchorMode::Rotated => body.position + body.rotation * anchor,
    }
}

/// Iterative position solver for ragdoll joints.
#[derive(Debug, Clone, Default)]
pub struct PositionSolver {
    config: SolverConfig,
}

impl PositionSolver {
    /// Create a solver.
    #[must_use]
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    /// Get the solver configuration.
    #[must_use]
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Run the configured number of passes over all joints of `model`.
    pub fn solve(&self, model: &mut RagdollModel) -> SolveStats {
        // Body ids do not change while solving, resolve them once.
        let pairs: Vec<Option<(usize, usize)>> = model
            .joints
            .iter()
            .map(|joint| Some((model.body_index(&joint.body_a)?, model.body_index(&joint.body_b)?)))
            .collect();

        let mut stats = SolveStats::default();
        for _ in 0..self.config.iterations {
            for (joint, pair) in model.joints.iter().zip(&pairs) {
                let outcome = match *pair {
                    Some((a, b)) => self.solve_joint(joint, &mut model.bodies, a, b),
                    None => JointCorrection::Skipped(SkipReason::MissingBody),
                };

                match outcome {
                    JointCorrection::Applied { .. } => stats.applied += 1,
                    JointCorrection::Skipped(reason) => {
                        if reason == SkipReason::MissingBody {
                            debug!(joint = %joint.id, "joint references a missing body");
                        }
                        stats.skipped += 1;
                    }
                }
            }
        }

        stats
    }

    /// Apply one correction to the joint between `bodies[a]` and `bodies[b]`.
    ///
    /// An index outside `bodies` skips the joint as
    /// [`SkipReason::MissingBody`].
    pub fn solve_joint(
        &self,
        joint: &Joint,
        bodies: &mut [RigidBody],
        a: usize,
        b: usize,
    ) -> JointCorrection {
        let (Some(body_a), Some(body_b)) = (bodies.get(a), bodies.get(b)) else {
            return JointCorrection::Skipped(SkipReason::MissingBody);
        };

        if body_a.is_static && body_b.is_static {
            return JointCorrection::Skipped(SkipReason::BothStatic);
        }

        let anchor_a = world_anchor(body_a, &joint.anchor_a, self.config.anchor_mode);
        let anchor_b = world_anchor(body_b, &joint.anchor_b, self.config.anchor_mode);

        let delta = anchor_b - anchor_a;
        let distance = delta.norm();
        if distance < self.config.separation_epsilon {
            return JointCorrection::Skipped(SkipReason::DegenerateSeparation);
        }
        let direction = delta / distance;

        let inv_mass_a = body_a.inverse_mass();
        let inv_mass_b = body_b.inverse_mass();
        let inv_mass_sum = inv_mass_a + inv_mass_b;
        if inv_mass_sum < self.config.inverse_mass_epsilon {
            return JointCorrection::Skipped(SkipReason::NegligibleInverseMass);
        }

        let correction = (distance - self.config.target_separation)
            * self.config.correction_factor
            / inv_mass_sum
            * joint.stiffness;

        if !bodies[a].is_static {
            bodies[a].position += direction * (correction * inv_mass_a);
        }
        if !bodies[b].is_static {
            bodies[b].position -= direction * (correction * inv_mass_b);
        }

        JointCorrection::Applied {
            magnitude: correction,
        }
    }
}
