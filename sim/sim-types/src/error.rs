//! Error types for simulation operations.

use thiserror::Error;

/// Errors that can occur while building, configuring, or running a simulation.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimError {
    /// A construction parameter (height, mass) is not strictly positive and finite.
    #[error("invalid {name}: {value} (must be positive and finite)")]
    InvalidDimension {
        /// Name of the parameter.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// Invalid timestep.
    #[error("invalid timestep: {0} (must be positive and finite)")]
    InvalidTimestep(f64),

    /// Invalid simulation duration.
    #[error("invalid duration: {0} (must be non-negative and finite)")]
    InvalidDuration(f64),

    /// Simulation diverged (`NaN` or `Inf` detected).
    #[error("simulation diverged: {reason}")]
    Diverged {
        /// Description of what went wrong.
        reason: String,
    },

    /// Invalid configuration.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// Description of the configuration error.
        reason: String,
    },

    /// Two bodies in one model share an id.
    #[error("duplicate body id: {id}")]
    DuplicateBody {
        /// The repeated id.
        id: String,
    },

    /// Body not found in model.
    #[error("body not found: {id}")]
    BodyNotFound {
        /// Id of the missing body.
        id: String,
    },

    /// A joint is malformed.
    #[error("invalid joint {joint}: {reason}")]
    InvalidJoint {
        /// Id of the offending joint.
        joint: String,
        /// Description of what's wrong.
        reason: String,
    },

    /// Invalid mass properties.
    #[error("invalid mass properties: {reason}")]
    InvalidMassProperties {
        /// Description of what's wrong.
        reason: String,
    },
}

impl SimError {
    /// Create a diverged error.
    #[must_use]
    pub fn diverged(reason: impl Into<String>) -> Self {
        Self::Diverged {
            reason: reason.into(),
        }
    }

    /// Create an invalid configuration error.
    #[must_use]
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }

    /// Create an invalid mass properties error.
    #[must_use]
    pub fn invalid_mass(reason: impl Into<String>) -> Self {
        Self::InvalidMassProperties {
            reason: reason.into(),
        }
    }

    /// Create an invalid joint error.
    #[must_use]
    pub fn invalid_joint(joint: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidJoint {
            joint: joint.into(),
            reason: reason.into(),
        }
    }

    /// Check if this is a divergence error.
    #[must_use]
    pub fn is_diverged(&self) -> bool {
        matches!(self, Self::Diverged { .. })
    }

    /// Check if this is a configuration error.
    #[must_use]
    pub fn is_config_error(&self) -> bool {
        matches!(self, Self::InvalidConfig { .. } | Self::InvalidTimestep(_))
    }
}
