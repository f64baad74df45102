//! Unified ragdoll physics API.
//!
//! This crate re-exports the complete simulation stack:
//!
//! - [`sim_types`] - Core data types (bodies, joints, models, state, config)
//! - [`sim_ragdoll`] - Humanoid builder and keyword force planning
//! - [`sim_constraint`] - Position-based joint solver
//! - [`sim_core`] - Integrator, force application and the `Stepper` driver
//!
//! # Quick Start
//!
//! ```
//! use sim_physics::prelude::*;
//!
//! let model = create_human_ragdoll("m1", 1.8, 70.0).unwrap();
//! let stepper = Stepper::new(EngineConfig::with_time_step(0.016)).unwrap();
//!
//! let lift = AppliedForce::at_com("m1_torso", Vector3::new(0.0, 1000.0, 0.0));
//! let result = stepper.simulate(&model, 3.0, &[lift]).unwrap();
//!
//! assert_eq!(result.steps, 188);
//! println!("Torso moved {:?}", result.displacement("m1_torso"));
//! ```
//!
//! # From a Request
//!
//! ```
//! use sim_physics::prelude::*;
//!
//! let query = "show me a ragdoll getting punched";
//! assert!(needs_simulation(query));
//!
//! let mut planner = KeywordPlanner::seeded(42);
//! let scenario = Scenario::from_query(&mut planner, "req", query).unwrap();
//! assert_eq!(scenario.kind, MotionKind::Punch);
//!
//! let result = Stepper::default()
//!     .simulate(&scenario.model, 1.0, &scenario.forces)
//!     .unwrap();
//! assert!(result.final_state.is_finite());
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      sim-physics (this crate)                   │
//! │                     Unified API / re-exports                    │
//! └─────────────────────────────────────────────────────────────────┘
//!                                  │
//!          ┌───────────────────────┼───────────────────────┐
//!          │                       │                       │
//!          ▼                       ▼                       ▼
//! ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐
//! │   sim-ragdoll   │   │    sim-core     │   │  sim-constraint │
//! │ Humanoid, plans │   │ Stepper, Euler  │──▶│ Joint solver    │
//! └────────┬────────┘   └────────┬────────┘   └────────┬────────┘
//!          │                     │                     │
//!          └──────────────┬──────┴─────────────────────┘
//!                         ▼
//!               ┌─────────────────┐
//!               │   sim-types     │
//!               │  Data structs   │
//!               └─────────────────┘
//! ```
//!
//! # Serialization
//!
//! Enable the `serde` feature to (de)serialize models, states, results and
//! configuration. Field names are camelCase.

#![doc(html_root_url = "https://docs.rs/sim-physics/0.7.0")]
#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]

// Re-export sub-crates
pub use sim_constraint;
pub use sim_core;
pub use sim_ragdoll;
pub use sim_types;

// Re-export nalgebra for convenience
pub use nalgebra;

/// Prelude module for convenient imports.
///
/// Import everything you need with a single line:
///
/// ```
/// use sim_physics::prelude::*;
/// ```
pub mod prelude {
    // ========================================================================
    // Core types from sim-types
    // ========================================================================

    // Bodies, joints and models
    pub use sim_types::{BodyShape, BodyVisual, Joint, JointLimits, RagdollModel, RigidBody};

    // State and results
    pub use sim_types::{AppliedForce, SimulationResult, SimulationState};

    // Configuration
    pub use sim_types::{
        AnchorMode, EngineConfig, GroundContact, ImpulseMode, SimulationQuality, SolverConfig,
    };

    // Errors
    pub use sim_types::SimError;

    // ========================================================================
    // Humanoid and planning from sim-ragdoll
    // ========================================================================

    pub use sim_ragdoll::{
        create_human_ragdoll, needs_simulation, ForcePlanner, HumanoidBuilder, KeywordPlanner,
        MotionKind, Proportions, Scenario, Segment, DEFAULT_HEIGHT, DEFAULT_MASS,
    };

    // ========================================================================
    // Simulation engine from sim-core
    // ========================================================================

    pub use sim_core::{apply_force, Stepper};

    // ========================================================================
    // Joint solving from sim-constraint
    // ========================================================================

    pub use sim_constraint::{solve_model, PositionSolver, SolveStats};

    // ========================================================================
    // Math types from nalgebra
    // ========================================================================

    pub use nalgebra::{Point3, UnitQuaternion, Vector3};
}
