//! Humanoid ragdoll construction and force planning.
//!
//! This crate sits between free-text requests and the simulation engine:
//!
//! - [`create_human_ragdoll`] / [`HumanoidBuilder`] build the ten-body,
//!   nine-joint humanoid skeleton from a height and a total mass
//! - [`MotionKind`] and [`KeywordPlanner`] turn a request like "make it jump"
//!   into the one-shot forces that start the motion
//! - [`needs_simulation`] decides whether a request asks for a simulation at all
//!
//! The planner is behind the [`ForcePlanner`] trait so callers can substitute
//! their own mapping.
//!
//! # Example
//!
//! ```
//! use sim_ragdoll::{KeywordPlanner, Scenario};
//!
//! let mut planner = KeywordPlanner::seeded(7);
//! let scenario = Scenario::from_query(&mut planner, "m1", "show me a jump").unwrap();
//!
//! assert_eq!(scenario.model.body_count(), 10);
//! assert_eq!(scenario.forces.len(), 2);
//! assert_eq!(scenario.forces[0].body_id, "m1_left_upper_leg");
//! ```

#![doc(html_root_url = "https://docs.rs/sim-ragdoll/0.7.0")]
#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]
#![allow(clippy::missing_const_for_fn)]

mod humanoid;
mod scenario;

pub use humanoid::{
    create_human_ragdoll, HumanoidBuilder, Proportions, Segment, DEFAULT_HEIGHT, DEFAULT_MASS,
};
pub use scenario::{needs_simulation, ForcePlanner, KeywordPlanner, MotionKind, Scenario};
