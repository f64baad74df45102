//! Core ragdoll simulation engine.
//!
//! This crate provides force application, time integration and the
//! simulation driver. It builds on [`sim_types`] for the data structures and
//! [`sim_constraint`] for joint solving.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Stepper                               │
//! │  Orchestrates: forces → (integration → joints) × steps      │
//! └─────────────────────────┬───────────────────────────────────┘
//!                           │
//!             ┌─────────────┴──────────────┐
//!             ▼                            ▼
//! ┌───────────────────────┐   ┌─────────────────────────────────┐
//! │      Integrators      │   │        PositionSolver           │
//! │  gravity, damping,    │   │  anchor separation correction   │
//! │  Euler, ground plane  │   │  (sim-constraint)               │
//! └───────────────────────┘   └─────────────────────────────────┘
//! ```
//!
//! # Ownership
//!
//! `simulate` clones its input model into a fresh [`SimulationState`] and
//! returns a [`SimulationResult`] the caller owns. The [`Stepper`] keeps only
//! its configuration, so concurrent simulations never interfere.
//!
//! # Quick Start
//!
//! ```
//! use sim_core::Stepper;
//! use sim_types::{EngineConfig, RagdollModel, RigidBody};
//! use nalgebra::Point3;
//!
//! let model = RagdollModel::new(
//!     "drop",
//!     vec![RigidBody::new("drop_body", Point3::new(0.0, 5.0, 0.0), 1.0)],
//!     vec![],
//! );
//!
//! let stepper = Stepper::new(EngineConfig::default()).unwrap();
//! let result = stepper.simulate(&model, 0.5, &[]).unwrap();
//!
//! let start = result.initial_state.body("drop_body").unwrap().position.y;
//! let end = result.final_state.body("drop_body").unwrap().position.y;
//! assert!(end < start);
//! ```
//!
//! # Modes
//!
//! Two behaviors are selected through [`EngineConfig`]:
//!
//! | Setting | Default | Alternative |
//! |---------|---------|-------------|
//! | `impulse_mode` | `Instant`: `Δv = F/m` | `TimestepScaled`: `Δv = F/m·dt` |
//! | `ground` | plane at `y = 0` (restitution 0.3, friction 0.8) | `None`: no ground |

#![doc(html_root_url = "https://docs.rs/sim-core/0.7.0")]
#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]
#![allow(
    clippy::missing_const_for_fn,     // Many methods can't be const due to nalgebra
    clippy::suboptimal_flops,          // mul_add style changes aren't always clearer
)]

pub mod forces;
pub mod integrators;
mod stepper;

pub use forces::apply_force;
pub use stepper::Stepper;

// Re-export key types from sim-types for convenience
pub use sim_types::{
    AppliedForce, EngineConfig, GroundContact, ImpulseMode, RagdollModel, RigidBody, SimError,
    SimulationResult, SimulationState,
};
