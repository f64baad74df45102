//! Core types for ragdoll physics simulation.
//!
//! This crate provides the foundational types shared by every layer of the
//! simulation stack:
//!
//! - [`RigidBody`] - Position, orientation, velocity and mass of one body
//! - [`Joint`] - Anchored connection between two bodies, with declared limits
//! - [`RagdollModel`] - An articulated set of bodies and joints
//! - [`SimulationState`] - A clock plus the models being simulated
//! - [`SimulationResult`] - What a simulation run hands back to its caller
//! - [`EngineConfig`] - Gravity, timestep, damping, solver and contact settings
//!
//! # Design Philosophy
//!
//! These types are **pure data**. They have no integration and no solving.
//! Everything is an owned value: a simulation clones its input model into a
//! fresh [`SimulationState`] and returns new states, so independent runs never
//! share mutable data.
//!
//! # Coordinate System
//!
//! - X: right
//! - Y: up (gravity acts along -Y)
//! - Z: towards the viewer
//! - Right-handed
//!
//! # Example
//!
//! ```
//! use sim_types::{Joint, RagdollModel, RigidBody, SimulationState};
//! use nalgebra::{Point3, Vector3};
//!
//! let model = RagdollModel::new(
//!     "arm",
//!     vec![
//!         RigidBody::fixed("arm_shoulder", Point3::new(0.0, 1.5, 0.0)),
//!         RigidBody::new("arm_forearm", Point3::new(0.3, 1.5, 0.0), 2.0),
//!     ],
//!     vec![Joint::new(
//!         "arm_elbow",
//!         "arm_shoulder",
//!         "arm_forearm",
//!         Vector3::new(0.15, 0.0, 0.0),
//!         Vector3::new(-0.15, 0.0, 0.0),
//!     )],
//! );
//! assert!(model.validate().is_ok());
//!
//! let state = SimulationState::with_model(model);
//! assert_eq!(state.time, 0.0);
//! assert!(state.body("arm_forearm").is_some());
//! ```

#![doc(html_root_url = "https://docs.rs/sim-types/0.7.0")]
#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]
#![allow(
    clippy::missing_const_for_fn,     // Many methods can't be const due to nalgebra
    clippy::suboptimal_flops,          // mul_add style changes aren't always clearer
    clippy::missing_errors_doc,        // Error docs added where non-obvious
)]

mod body;
mod config;
mod error;
mod joint;
mod model;
mod state;

pub use body::{BodyShape, BodyVisual, RigidBody};
pub use config::{
    AnchorMode, EngineConfig, GroundContact, ImpulseMode, SimulationQuality, SolverConfig,
    ENV_DAMPING, ENV_DT_SCALED_IMPULSES, ENV_ENABLED, ENV_GRAVITY, ENV_GROUND_COLLISION,
    ENV_ITERATIONS, ENV_QUALITY, ENV_TIMESTEP,
};
pub use error::SimError;
pub use joint::{Joint, JointLimits};
pub use model::RagdollModel;
pub use state::{AppliedForce, SimulationResult, SimulationState};

// Re-export math types for convenience
pub use nalgebra::{Point3, UnitQuaternion, Vector3};

/// Result type for simulation operations.
pub type Result<T> = std::result::Result<T, SimError>;

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_state_is_independent_copy() {
        let model = RagdollModel::new(
            "m",
            vec![RigidBody::new("m_body", Point3::new(0.0, 1.0, 0.0), 1.0)],
            vec![],
        );

        let mut state = SimulationState::with_model(model.clone());
        state.body_mut("m_body").expect("present").position.y = 0.0;

        // The source model is untouched
        assert_eq!(model.bodies[0].position.y, 1.0);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_body_json_field_names() {
        let body = RigidBody::new("m_head", Point3::new(0.0, 1.0, 0.0), 5.6);
        let json = serde_json::to_string(&body).expect("serializes");
        assert!(json.contains("\"angularVelocity\""));
        assert!(json.contains("\"isStatic\""));
        assert!(!json.contains("visual"));
    }
}
