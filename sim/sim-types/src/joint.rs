//! Joint types for articulated bodies.
//!
//! A [`Joint`] links two bodies of the same model at a pair of local anchor
//! points. The position solver keeps the world-space anchors together; the
//! angular [`JointLimits`] are part of the model description but are not
//! enforced (joints rotate freely). A joint without limits holds `None`, so
//! every stored bound is a finite number.

use nalgebra::Vector3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Per-axis angular limits of a joint, in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct JointLimits {
    /// Lower bound per axis.
    pub min: Vector3<f64>,
    /// Upper bound per axis.
    pub max: Vector3<f64>,
}

impl JointLimits {
    /// Create limits with explicit bounds.
    #[must_use]
    pub const fn new(min: Vector3<f64>, max: Vector3<f64>) -> Self {
        Self { min, max }
    }

    /// Same range on every axis, centred on zero.
    #[must_use]
    pub fn symmetric(range: f64) -> Self {
        Self {
            min: Vector3::repeat(-range),
            max: Vector3::repeat(range),
        }
    }

    /// Check that every bound is finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.min.iter().chain(self.max.iter()).all(|x| x.is_finite())
    }

    /// Check that every lower bound is not above its upper bound.
    #[must_use]
    pub fn is_ordered(&self) -> bool {
        (0..3).all(|i| self.min[i] <= self.max[i])
    }
}

/// A joint connecting two bodies.
///
/// `anchor_a` and `anchor_b` are offsets from each body's own position,
/// expressed in that body's rest frame.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Joint {
    /// Id, unique within its model.
    pub id: String,
    /// Id of the first (parent) body.
    pub body_a: String,
    /// Id of the second (child) body.
    pub body_b: String,
    /// Anchor offset on body A.
    pub anchor_a: Vector3<f64>,
    /// Anchor offset on body B.
    pub anchor_b: Vector3<f64>,
    /// Declared angular limits, `None` for a free joint. Not enforced by the
    /// solver.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub limits: Option<JointLimits>,
    /// Fraction of the positional error corrected per iteration, in `(0, 1]`.
    pub stiffness: f64,
    /// Joint damping in `[0, 1]`.
    pub damping: f64,
}

impl Joint {
    /// Create a free joint with full stiffness and no damping.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        body_a: impl Into<String>,
        body_b: impl Into<String>,
        anchor_a: Vector3<f64>,
        anchor_b: Vector3<f64>,
    ) -> Self {
        Self {
            id: id.into(),
            body_a: body_a.into(),
            body_b: body_b.into(),
            anchor_a,
            anchor_b,
            limits: None,
            stiffness: 1.0,
            damping: 0.0,
        }
    }

    /// Set the angular limits.
    #[must_use]
    pub fn with_limits(mut self, limits: JointLimits) -> Self {
        self.limits = Some(limits);
        self
    }

    /// Set stiffness and damping.
    #[must_use]
    pub fn with_response(mut self, stiffness: f64, damping: f64) -> Self {
        self.stiffness = stiffness;
        self.damping = damping;
        self
    }

    /// Check the joint's own parameters (not its body references).
    pub fn validate(&self) -> crate::Result<()> {
        if self.body_a == self.body_b {
            return Err(crate::SimError::invalid_joint(
                &self.id,
                "cannot connect a body to itself",
            ));
        }

        if !(self.stiffness > 0.0 && self.stiffness <= 1.0) {
            return Err(crate::SimError::invalid_joint(
                &self.id,
                format!("stiffness {} not in (0, 1]", self.stiffness),
            ));
        }

        if !(0.0..=1.0).contains(&self.damping) {
            return Err(crate::SimError::invalid_joint(
                &self.id,
                format!("damping {} not in [0, 1]", self.damping),
            ));
        }

        if !self.anchor_a.iter().chain(self.anchor_b.iter()).all(|x| x.is_finite()) {
            return Err(crate::SimError::invalid_joint(&self.id, "anchors must be finite"));
        }

        if let Some(limits) = &self.limits {
            if !limits.is_finite() {
                return Err(crate::SimError::invalid_joint(&self.id, "limits must be finite"));
            }
            if !limits.is_ordered() {
                return Err(crate::SimError::invalid_joint(&self.id, "limits min > max"));
            }
        }

        Ok(())
    }
}
