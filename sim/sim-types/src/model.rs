//! Articulated models: an ordered set of bodies plus the joints between them.

use std::collections::HashSet;

use nalgebra::Vector3;

use crate::{Joint, RigidBody, SimError};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An articulated collection of rigid bodies connected by joints.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RagdollModel {
    /// Model id. Body and joint ids are usually prefixed with it.
    pub id: String,
    /// Bodies, in a stable order.
    pub bodies: Vec<RigidBody>,
    /// Joints, in the order the solver visits them.
    pub joints: Vec<Joint>,
}

impl RagdollModel {
    /// Create a model from parts.
    #[must_use]
    pub fn new(id: impl Into<String>, bodies: Vec<RigidBody>, joints: Vec<Joint>) -> Self {
        Self {
            id: id.into(),
            bodies,
            joints,
        }
    }

    /// Number of bodies.
    #[must_use]
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Number of joints.
    #[must_use]
    pub fn joint_count(&self) -> usize {
        self.joints.len()
    }

    /// Look up a body by id.
    #[must_use]
    pub fn body(&self, id: &str) -> Option<&RigidBody> {
        self.bodies.iter().find(|b| b.id == id)
    }

    /// Look up a body by id, mutably.
    pub fn body_mut(&mut self, id: &str) -> Option<&mut RigidBody> {
        self.bodies.iter_mut().find(|b| b.id == id)
    }

    /// Index of a body in [`Self::bodies`].
    #[must_use]
    pub fn body_index(&self, id: &str) -> Option<usize> {
        self.bodies.iter().position(|b| b.id == id)
    }

    /// Look up a joint by id.
    #[must_use]
    pub fn joint(&self, id: &str) -> Option<&Joint> {
        self.joints.iter().find(|j| j.id == id)
    }

    /// Sum of the masses of all dynamic bodies.
    #[must_use]
    pub fn total_mass(&self) -> f64 {
        self.bodies
            .iter()
            .filter(|b| !b.is_static)
            .map(|b| b.mass)
            .sum()
    }

    /// Total linear momentum of the dynamic bodies.
    #[must_use]
    pub fn linear_momentum(&self) -> Vector3<f64> {
        self.bodies
            .iter()
            .map(RigidBody::linear_momentum)
            .fold(Vector3::zeros(), |acc, p| acc + p)
    }

    /// Check if any body carries `NaN` or `Inf`.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.bodies.iter().all(RigidBody::is_finite)
    }

    /// Validate ids, masses and joint references.
    ///
    /// # Errors
    ///
    /// Returns the first problem found: a duplicate body id, a dynamic body
    /// without positive mass, a malformed joint, or a joint naming a body
    /// that is not part of this model.
    pub fn validate(&self) -> crate::Result<()> {
        let mut seen = HashSet::with_capacity(self.bodies.len());
        for body in &self.bodies {
            if !seen.insert(body.id.as_str()) {
                return Err(SimError::DuplicateBody {
                    id: body.id.clone(),
                });
            }
            body.validate()?;
        }

        for joint in &self.joints {
            joint.validate()?;
            for id in [&joint.body_a, &joint.body_b] {
                if !seen.contains(id.as_str()) {
                    return Err(SimError::BodyNotFound { id: id.clone() });
                }
            }
        }

        Ok(())
    }
}
