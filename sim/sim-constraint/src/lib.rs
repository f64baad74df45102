//! Joint constraints for articulated ragdoll models.
//!
//! Joints connect two bodies through local anchor offsets. After each
//! integration step the [`PositionSolver`] runs a fixed number of
//! Gauss-Seidel passes over the joints of a [`RagdollModel`], moving the
//! connected bodies along the anchor-to-anchor line in proportion to their
//! inverse masses.
//!
//! # Solver Parameters
//!
//! All tuning lives in [`SolverConfig`]:
//!
//! - `iterations`: passes per step (quality dependent, 10 at medium)
//! - `correction_factor`: fraction of the error removed per visit (0.2)
//! - `target_separation`: anchor distance every joint drives towards (0.1)
//! - `anchor_mode`: whether local anchors follow body rotation
//!
//! Each joint scales its correction by its own `stiffness`. Softer joints
//! (shoulders, hips) give way more than stiff ones (neck, knees).
//!
//! # Example
//!
//! ```
//! use sim_constraint::solve_model;
//! use sim_types::{Joint, RagdollModel, RigidBody, SolverConfig};
//! use nalgebra::{Point3, Vector3};
//!
//! let mut model = RagdollModel::new(
//!     "pair",
//!     vec![
//!         RigidBody::new("pair_a", Point3::origin(), 1.0),
//!         RigidBody::new("pair_b", Point3::new(1.0, 0.0, 0.0), 1.0),
//!     ],
//!     vec![Joint::new("pair_j", "pair_a", "pair_b", Vector3::zeros(), Vector3::zeros())],
//! );
//!
//! let stats = solve_model(&mut model, &SolverConfig::default());
//! assert_eq!(stats.applied, 10);
//!
//! // The pair was pulled together
//! let gap = (model.bodies[1].position - model.bodies[0].position).norm();
//! assert!(gap < 1.0);
//! ```

#![doc(html_root_url = "https://docs.rs/sim-constraint/0.7.0")]
#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![warn(missing_docs)]
#![allow(clippy::missing_const_for_fn)]

mod solver;

pub use solver::{world_anchor, JointCorrection, PositionSolver, SkipReason, SolveStats};

// Re-export the types the solver operates on
pub use sim_types::{AnchorMode, Joint, RagdollModel, SolverConfig};

/// Run `config.iterations` solver passes over `model`.
pub fn solve_model(model: &mut RagdollModel, config: &SolverConfig) -> SolveStats {
    PositionSolver::new(config.clone()).solve(model)
}
