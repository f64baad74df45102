//! Rigid body types.
//!
//! A [`RigidBody`] is a point-mass-like object carrying position, orientation,
//! linear velocity and angular velocity. Bodies are addressed by a string id
//! that is unique within a [`RagdollModel`](crate::RagdollModel).

use nalgebra::{Point3, UnitQuaternion, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Shape hint used by renderers. Has no effect on the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum BodyShape {
    /// Sphere with diameter `dimensions.x`.
    Sphere,
    /// Axis-aligned box with full extents `dimensions`.
    Box,
    /// Capsule of length `dimensions.x`.
    Capsule,
}

impl std::fmt::Display for BodyShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sphere => write!(f, "sphere"),
            Self::Box => write!(f, "box"),
            Self::Capsule => write!(f, "capsule"),
        }
    }
}

/// Presentation attributes attached to a body.
///
/// Carried through the simulation untouched; the integrator and solver never
/// read them.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BodyVisual {
    /// Full extents of the visual shape (m).
    pub dimensions: Vector3<f64>,
    /// Shape hint.
    pub shape: BodyShape,
    /// Display color, e.g. `"#FFD700"`.
    pub color: Option<String>,
}

impl BodyVisual {
    /// Create a visual with the given shape and extents, no color.
    #[must_use]
    pub fn new(shape: BodyShape, dimensions: Vector3<f64>) -> Self {
        Self {
            dimensions,
            shape,
            color: None,
        }
    }

    /// Set the display color.
    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}

/// A rigid body in a ragdoll model.
///
/// # Example
///
/// ```
/// use sim_types::RigidBody;
/// use nalgebra::Point3;
///
/// let body = RigidBody::new("m1_head", Point3::new(0.0, 1.665, 0.0), 5.6);
/// assert!(!body.is_static);
/// assert!((body.inverse_mass() - 1.0 / 5.6).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct RigidBody {
    /// Id, unique within its model.
    pub id: String,
    /// Position of the body origin in world coordinates (m).
    pub position: Point3<f64>,
    /// Orientation. Kept at unit norm by the integrator.
    pub rotation: UnitQuaternion<f64>,
    /// Linear velocity in world coordinates (m/s).
    pub velocity: Vector3<f64>,
    /// Angular velocity in world coordinates (rad/s).
    pub angular_velocity: Vector3<f64>,
    /// Mass in kg. Must be positive unless the body is static.
    pub mass: f64,
    /// Static bodies are never moved by integration, forces, or the solver.
    pub is_static: bool,
    /// Optional presentation attributes.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub visual: Option<BodyVisual>,
}

impl RigidBody {
    /// Create a dynamic body at rest with identity orientation.
    #[must_use]
    pub fn new(id: impl Into<String>, position: Point3<f64>, mass: f64) -> Self {
        Self {
            id: id.into(),
            position,
            rotation: UnitQuaternion::identity(),
            velocity: Vector3::zeros(),
            angular_velocity: Vector3::zeros(),
            mass,
            is_static: false,
            visual: None,
        }
    }

    /// Create a static (immovable) body.
    #[must_use]
    pub fn fixed(id: impl Into<String>, position: Point3<f64>) -> Self {
        Self {
            is_static: true,
            ..Self::new(id, position, 0.0)
        }
    }

    /// Set the orientation.
    #[must_use]
    pub fn with_rotation(mut self, rotation: UnitQuaternion<f64>) -> Self {
        self.rotation = rotation;
        self
    }

    /// Set the linear velocity.
    #[must_use]
    pub fn with_velocity(mut self, velocity: Vector3<f64>) -> Self {
        self.velocity = velocity;
        self
    }

    /// Set the angular velocity.
    #[must_use]
    pub fn with_angular_velocity(mut self, angular_velocity: Vector3<f64>) -> Self {
        self.angular_velocity = angular_velocity;
        self
    }

    /// Attach presentation attributes.
    #[must_use]
    pub fn with_visual(mut self, visual: BodyVisual) -> Self {
        self.visual = Some(visual);
        self
    }

    /// Inverse mass, 0 for static bodies.
    #[must_use]
    pub fn inverse_mass(&self) -> f64 {
        if self.is_static || self.mass <= 0.0 || !self.mass.is_finite() {
            0.0
        } else {
            1.0 / self.mass
        }
    }

    /// Linear momentum (zero for static bodies).
    #[must_use]
    pub fn linear_momentum(&self) -> Vector3<f64> {
        if self.is_static {
            Vector3::zeros()
        } else {
            self.velocity * self.mass
        }
    }

    /// Kinetic energy of the linear motion.
    #[must_use]
    pub fn kinetic_energy(&self) -> f64 {
        if self.is_static {
            0.0
        } else {
            0.5 * self.mass * self.velocity.norm_squared()
        }
    }

    /// Check that the mass is physically usable.
    pub fn validate(&self) -> crate::Result<()> {
        if self.is_static {
            return Ok(());
        }

        if !self.mass.is_finite() || self.mass <= 0.0 {
            return Err(crate::SimError::invalid_mass(format!(
                "body {} has mass {} (dynamic bodies need a positive finite mass)",
                self.id, self.mass
            )));
        }

        Ok(())
    }

    /// Check if the kinematic state contains `NaN` or `Inf` values.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.position.coords.iter().all(|x| x.is_finite())
            && self.rotation.coords.iter().all(|x| x.is_finite())
            && self.velocity.iter().all(|x| x.is_finite())
            && self.angular_velocity.iter().all(|x| x.is_finite())
    }
}
