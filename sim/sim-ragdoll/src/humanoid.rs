//! Ten-body humanoid skeleton.
//!
//! Every dimension is a fixed fraction of the standing height `h`:
//!
//! | Dimension          | Fraction |
//! |--------------------|----------|
//! | head radius        | 0.075 h  |
//! | torso height       | 0.30 h   |
//! | torso width        | 0.20 h   |
//! | torso depth        | 0.10 h   |
//! | upper / lower arm  | 0.15 h   |
//! | upper / lower leg  | 0.22 h   |
//! | limb radius        | 0.025 h  |
//!
//! The figure stands upright above the ground plane, facing +Z, arms spread
//! horizontally along X. Joint anchors are placed so that, at rest, the two
//! anchors of every joint coincide.

use nalgebra::{Point3, Vector3};
use sim_types::{BodyShape, BodyVisual, Joint, JointLimits, RagdollModel, RigidBody, SimError};

/// Standing height used when none is given (m).
pub const DEFAULT_HEIGHT: f64 = 1.8;

/// Total mass used when none is given (kg).
pub const DEFAULT_MASS: f64 = 70.0;

const HEAD_COLOR: &str = "#FFD700";
const TORSO_COLOR: &str = "#4169E1";
const ARM_COLOR: &str = "#3CB371";
const LEG_COLOR: &str = "#CD853F";

/// One body of the humanoid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Head.
    Head,
    /// Torso.
    Torso,
    /// Left upper arm.
    LeftUpperArm,
    /// Left forearm.
    LeftLowerArm,
    /// Right upper arm.
    RightUpperArm,
    /// Right forearm.
    RightLowerArm,
    /// Left thigh.
    LeftUpperLeg,
    /// Left shin.
    LeftLowerLeg,
    /// Right thigh.
    RightUpperLeg,
    /// Right shin.
    RightLowerLeg,
}

impl Segment {
    /// All segments, in model body order.
    pub const ALL: [Self; 10] = [
        Self::Head,
        Self::Torso,
        Self::LeftUpperArm,
        Self::LeftLowerArm,
        Self::RightUpperArm,
        Self::RightLowerArm,
        Self::LeftUpperLeg,
        Self::LeftLowerLeg,
        Self::RightUpperLeg,
        Self::RightLowerLeg,
    ];

    /// Suffix used in body ids.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Head => "head",
            Self::Torso => "torso",
            Self::LeftUpperArm => "left_upper_arm",
            Self::LeftLowerArm => "left_lower_arm",
            Self::RightUpperArm => "right_upper_arm",
            Self::RightLowerArm => "right_lower_arm",
            Self::LeftUpperLeg => "left_upper_leg",
            Self::LeftLowerLeg => "left_lower_leg",
            Self::RightUpperLeg => "right_upper_leg",
            Self::RightLowerLeg => "right_lower_leg",
        }
    }

    /// Share of the total mass carried by this segment.
    ///
    /// The fractions over [`Segment::ALL`] sum to one.
    #[must_use]
    pub const fn mass_fraction(self) -> f64 {
        match self {
            Self::Head => 0.08,
            Self::Torso => 0.43,
            Self::LeftUpperArm | Self::RightUpperArm => 0.05,
            Self::LeftLowerArm | Self::RightLowerArm => 0.035,
            Self::LeftUpperLeg | Self::RightUpperLeg => 0.10,
            Self::LeftLowerLeg | Self::RightLowerLeg => 0.06,
        }
    }

    /// Body id of this segment inside the model `model_id`.
    #[must_use]
    pub fn body_id(self, model_id: &str) -> String {
        format!("{model_id}_{}", self.name())
    }
}

/// Segment dimensions derived from a standing height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Proportions {
    /// Head radius.
    pub head_radius: f64,
    /// Torso height.
    pub torso_height: f64,
    /// Torso width (X).
    pub torso_width: f64,
    /// Torso depth (Z).
    pub torso_depth: f64,
    /// Upper arm length.
    pub upper_arm: f64,
    /// Forearm length.
    pub lower_arm: f64,
    /// Thigh length.
    pub upper_leg: f64,
    /// Shin length.
    pub lower_leg: f64,
    /// Base limb radius.
    pub limb_radius: f64,
}

impl Proportions {
    /// Dimensions for a figure of the given height.
    #[must_use]
    pub fn for_height(height: f64) -> Self {
        Self {
            head_radius: 0.075 * height,
            torso_height: 0.3 * height,
            torso_width: 0.2 * height,
            torso_depth: 0.1 * height,
            upper_arm: 0.15 * height,
            lower_arm: 0.15 * height,
            upper_leg: 0.22 * height,
            lower_leg: 0.22 * height,
            limb_radius: 0.025 * height,
        }
    }
}

/// Builder for a humanoid [`RagdollModel`].
///
/// # Example
///
/// ```
/// use sim_ragdoll::HumanoidBuilder;
///
/// let model = HumanoidBuilder::new("m1").height(1.6).mass(55.0).build().unwrap();
/// assert_eq!(model.body_count(), 10);
/// assert_eq!(model.joint_count(), 9);
/// assert!(model.body("m1_left_knee").is_none());
/// assert!(model.joint("m1_left_knee").is_some());
/// ```
#[derive(Debug, Clone)]
pub struct HumanoidBuilder {
    id: String,
    height: f64,
    mass: f64,
}

impl HumanoidBuilder {
    /// Start a builder with the default height and mass.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            height: DEFAULT_HEIGHT,
            mass: DEFAULT_MASS,
        }
    }

    /// Set the standing height (m).
    #[must_use]
    pub fn height(mut self, height: f64) -> Self {
        self.height = height;
        self
    }

    /// Set the total mass (kg).
    #[must_use]
    pub fn mass(mut self, mass: f64) -> Self {
        self.mass = mass;
        self
    }

    /// Build the model.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidDimension`] if the height or mass is not a
    /// finite positive number.
    pub fn build(&self) -> sim_types::Result<RagdollModel> {
        check_dimension("height", self.height)?;
        check_dimension("mass", self.mass)?;

        let dims = Proportions::for_height(self.height);
        let bodies = Segment::ALL
            .iter()
            .map(|&segment| self.body(segment, &dims))
            .collect();
        let joints = self.joints(&dims);

        Ok(RagdollModel::new(self.id.clone(), bodies, joints))
    }

    fn body(&self, segment: Segment, d: &Proportions) -> RigidBody {
        let h = self.height;
        let shoulder_y = h - 2.0 * d.head_radius - d.torso_height / 4.0;
        let hip_y = h - 2.0 * d.head_radius - d.torso_height;
        let upper_arm_x = d.torso_width / 2.0 + d.upper_arm / 2.0;
        let lower_arm_x = d.torso_width / 2.0 + d.upper_arm + d.lower_arm / 2.0;
        let leg_x = d.torso_width / 4.0;
        let upper_leg_y = hip_y - d.upper_leg / 2.0;
        let lower_leg_y = hip_y - d.upper_leg - d.lower_leg / 2.0;

        let (position, visual) = match segment {
            Segment::Head => (
                Point3::new(0.0, h - d.head_radius, 0.0),
                BodyVisual::new(BodyShape::Sphere, Vector3::repeat(2.0 * d.head_radius))
                    .with_color(HEAD_COLOR),
            ),
            Segment::Torso => (
                Point3::new(0.0, h - 2.0 * d.head_radius - d.torso_height / 2.0, 0.0),
                BodyVisual::new(
                    BodyShape::Box,
                    Vector3::new(d.torso_width, d.torso_height, d.torso_depth),
                )
                .with_color(TORSO_COLOR),
            ),
            Segment::LeftUpperArm | Segment::RightUpperArm => (
                Point3::new(side(segment) * upper_arm_x, shoulder_y, 0.0),
                capsule(d.upper_arm, 2.0 * d.limb_radius, ARM_COLOR),
            ),
            Segment::LeftLowerArm | Segment::RightLowerArm => (
                Point3::new(side(segment) * lower_arm_x, shoulder_y, 0.0),
                capsule(d.lower_arm, 1.8 * d.limb_radius, ARM_COLOR),
            ),
            Segment::LeftUpperLeg | Segment::RightUpperLeg => (
                Point3::new(side(segment) * leg_x, upper_leg_y, 0.0),
                capsule(d.upper_leg, 2.2 * d.limb_radius, LEG_COLOR),
            ),
            Segment::LeftLowerLeg | Segment::RightLowerLeg => (
                Point3::new(side(segment) * leg_x, lower_leg_y, 0.0),
                capsule(d.lower_leg, 2.0 * d.limb_radius, LEG_COLOR),
            ),
        };

        RigidBody::new(
            segment.body_id(&self.id),
            position,
            self.mass * segment.mass_fraction(),
        )
        .with_visual(visual)
    }

    fn joints(&self, d: &Proportions) -> Vec<Joint> {
        let id = |segment: Segment| segment.body_id(&self.id);
        let joint_id = |name: &str| format!("{}_{name}", self.id);

        let shoulder_limits = JointLimits::symmetric(1.0);
        let hip_limits =
            JointLimits::new(Vector3::new(-0.8, -0.3, -0.3), Vector3::new(0.8, 0.3, 0.3));
        let knee_limits =
            JointLimits::new(Vector3::new(0.0, -0.1, -0.1), Vector3::new(1.5, 0.1, 0.1));

        vec![
            Joint::new(
                joint_id("neck"),
                id(Segment::Head),
                id(Segment::Torso),
                Vector3::new(0.0, -d.head_radius, 0.0),
                Vector3::new(0.0, d.torso_height / 2.0, 0.0),
            )
            .with_limits(JointLimits::symmetric(0.5))
            .with_response(0.8, 0.5),
            Joint::new(
                joint_id("left_shoulder"),
                id(Segment::Torso),
                id(Segment::LeftUpperArm),
                Vector3::new(-d.torso_width / 2.0, d.torso_height / 4.0, 0.0),
                Vector3::new(d.upper_arm / 2.0, 0.0, 0.0),
            )
            .with_limits(shoulder_limits)
            .with_response(0.6, 0.3),
            Joint::new(
                joint_id("left_elbow"),
                id(Segment::LeftUpperArm),
                id(Segment::LeftLowerArm),
                Vector3::new(-d.upper_arm / 2.0, 0.0, 0.0),
                Vector3::new(d.lower_arm / 2.0, 0.0, 0.0),
            )
            .with_limits(JointLimits::new(
                Vector3::new(0.0, -0.1, -0.1),
                Vector3::new(2.0, 0.1, 0.1),
            ))
            .with_response(0.7, 0.4),
            Joint::new(
                joint_id("right_shoulder"),
                id(Segment::Torso),
                id(Segment::RightUpperArm),
                Vector3::new(d.torso_width / 2.0, d.torso_height / 4.0, 0.0),
                Vector3::new(-d.upper_arm / 2.0, 0.0, 0.0),
            )
            .with_limits(shoulder_limits)
            .with_response(0.6, 0.3),
            Joint::new(
                joint_id("right_elbow"),
                id(Segment::RightUpperArm),
                id(Segment::RightLowerArm),
                Vector3::new(d.upper_arm / 2.0, 0.0, 0.0),
                Vector3::new(-d.lower_arm / 2.0, 0.0, 0.0),
            )
            .with_limits(JointLimits::new(
                Vector3::new(-2.0, -0.1, -0.1),
                Vector3::new(0.0, 0.1, 0.1),
            ))
            .with_response(0.7, 0.4),
            Joint::new(
                joint_id("left_hip"),
                id(Segment::Torso),
                id(Segment::LeftUpperLeg),
                Vector3::new(-d.torso_width / 4.0, -d.torso_height / 2.0, 0.0),
                Vector3::new(0.0, d.upper_leg / 2.0, 0.0),
            )
            .with_limits(hip_limits)
            .with_response(0.7, 0.4),
            Joint::new(
                joint_id("left_knee"),
                id(Segment::LeftUpperLeg),
                id(Segment::LeftLowerLeg),
                Vector3::new(0.0, -d.upper_leg / 2.0, 0.0),
                Vector3::new(0.0, d.lower_leg / 2.0, 0.0),
            )
            .with_limits(knee_limits)
            .with_response(0.8, 0.4),
            Joint::new(
                joint_id("right_hip"),
                id(Segment::Torso),
                id(Segment::RightUpperLeg),
                Vector3::new(d.torso_width / 4.0, -d.torso_height / 2.0, 0.0),
                Vector3::new(0.0, d.upper_leg / 2.0, 0.0),
            )
            .with_limits(hip_limits)
            .with_response(0.7, 0.4),
            Joint::new(
                joint_id("right_knee"),
                id(Segment::RightUpperLeg),
                id(Segment::RightLowerLeg),
                Vector3::new(0.0, -d.upper_leg / 2.0, 0.0),
                Vector3::new(0.0, d.lower_leg / 2.0, 0.0),
            )
            .with_limits(knee_limits)
            .with_response(0.8, 0.4),
        ]
    }
}

/// Build the default humanoid skeleton.
///
/// Body ids are `{id}_{segment}` (for example `m1_head`) and joint ids are
/// `{id}_{joint}` (for example `m1_left_knee`).
///
/// # Errors
///
/// Returns [`SimError::InvalidDimension`] if `height` or `mass` is not a
/// finite positive number.
pub fn create_human_ragdoll(
    id: impl Into<String>,
    height: f64,
    mass: f64,
) -> sim_types::Result<RagdollModel> {
    HumanoidBuilder::new(id).height(height).mass(mass).build()
}

fn check_dimension(name: &'static str, value: f64) -> sim_types::Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SimError::InvalidDimension { name, value })
    }
}

/// -1 for left segments (towards -X), +1 otherwise.
fn side(segment: Segment) -> f64 {
    match segment {
        Segment::LeftUpperArm
        | Segment::LeftLowerArm
        | Segment::LeftUpperLeg
        | Segment::LeftLowerLeg => -1.0,
        _ => 1.0,
    }
}

fn capsule(length: f64, diameter: f64, color: &str) -> BodyVisual {
    BodyVisual::new(BodyShape::Capsule, Vector3::new(length, diameter, diameter)).with_color(color)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn default_model() -> RagdollModel {
        create_human_ragdoll("m1", DEFAULT_HEIGHT, DEFAULT_MASS).unwrap()
    }

    #[test]
    fn test_topology() {
        for (height, mass) in [(1.8, 70.0), (0.5, 3.0), (2.4, 140.0)] {
            let model = create_human_ragdoll("t", height, mass).unwrap();
            assert_eq!(model.body_count(), 10);
            assert_eq!(model.joint_count(), 9);
            assert!(model.validate().is_ok());
        }
    }

    #[test]
    fn test_body_and_joint_ids() {
        let model = default_model();
        let body_ids: Vec<&str> = model.bodies.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(
            body_ids,
            [
                "m1_head",
                "m1_torso",
                "m1_left_upper_arm",
                "m1_left_lower_arm",
                "m1_right_upper_arm",
                "m1_right_lower_arm",
                "m1_left_upper_leg",
                "m1_left_lower_leg",
                "m1_right_upper_leg",
                "m1_right_lower_leg",
            ]
        );

        let joint_ids: Vec<&str> = model.joints.iter().map(|j| j.id.as_str()).collect();
        assert_eq!(
            joint_ids,
            [
                "m1_neck",
                "m1_left_shoulder",
                "m1_left_elbow",
                "m1_right_shoulder",
                "m1_right_elbow",
                "m1_left_hip",
                "m1_left_knee",
                "m1_right_hip",
                "m1_right_knee",
            ]
        );

        // Same id, same model
        assert_eq!(model, default_model());
    }

    #[test]
    fn test_segment_masses() {
        let model = default_model();
        assert_relative_eq!(model.body("m1_head").unwrap().mass, 5.6, epsilon = 1e-9);
        assert_relative_eq!(model.body("m1_torso").unwrap().mass, 30.1, epsilon = 1e-9);
        assert_relative_eq!(
            model.body("m1_left_lower_arm").unwrap().mass,
            model.body("m1_right_lower_arm").unwrap().mass
        );
    }

    #[test]
    fn test_mass_is_conserved() {
        let fractions: f64 = Segment::ALL.iter().map(|s| s.mass_fraction()).sum();
        assert_relative_eq!(fractions, 1.0, epsilon = 1e-12);

        for height in [0.3, 1.0, 1.8, 2.5] {
            let model = create_human_ragdoll("m", height, 82.5).unwrap();
            assert_relative_eq!(model.total_mass(), 82.5, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_dimensions_scale_with_height() {
        let small = create_human_ragdoll("m", 0.9, 70.0).unwrap();
        let tall = create_human_ragdoll("m", 1.8, 70.0).unwrap();

        for (a, b) in small.bodies.iter().zip(&tall.bodies) {
            assert_relative_eq!(a.position * 2.0, b.position, epsilon = 1e-12);
            let (va, vb) = (a.visual.as_ref().unwrap(), b.visual.as_ref().unwrap());
            assert_relative_eq!(va.dimensions * 2.0, vb.dimensions, epsilon = 1e-12);
        }
        for (a, b) in small.joints.iter().zip(&tall.joints) {
            assert_relative_eq!(a.anchor_a * 2.0, b.anchor_a, epsilon = 1e-12);
            assert_relative_eq!(a.anchor_b * 2.0, b.anchor_b, epsilon = 1e-12);
        }

        // Masses do not depend on height
        for (a, b) in small.bodies.iter().zip(&tall.bodies) {
            assert_relative_eq!(a.mass, b.mass);
        }
    }

    #[test]
    fn test_rest_pose() {
        let model = default_model();
        let head = model.body("m1_head").unwrap();
        assert_relative_eq!(head.position.y, 1.8 - 0.135, epsilon = 1e-12);

        // Left is -X, right is +X
        assert!(model.body("m1_left_lower_arm").unwrap().position.x < 0.0);
        assert!(model.body("m1_right_lower_arm").unwrap().position.x > 0.0);

        // Segments stack to 0.89 h, so the soles hover 0.11 h above the ground
        let shin = model.body("m1_left_lower_leg").unwrap();
        assert_relative_eq!(shin.position.y - 0.22 * 1.8 / 2.0, 0.11 * 1.8, epsilon = 1e-9);

        for body in &model.bodies {
            assert!(!body.is_static);
            assert_eq!(body.velocity, Vector3::zeros());
            assert_eq!(body.angular_velocity, Vector3::zeros());
        }
    }

    #[test]
    fn test_rest_pose_anchors_coincide() {
        let model = default_model();
        for joint in &model.joints {
            let a = model.body(&joint.body_a).unwrap();
            let b = model.body(&joint.body_b).unwrap();
            assert_relative_eq!(
                a.position + joint.anchor_a,
                b.position + joint.anchor_b,
                epsilon = 1e-12
            );
        }
    }

    #[test]
    fn test_joint_response() {
        let model = default_model();
        let stiffness = |name: &str| model.joint(&format!("m1_{name}")).unwrap().stiffness;

        // Shoulders are the softest joints, hips match the elbows
        for side in ["left", "right"] {
            let joint = |name: &str| stiffness(&format!("{side}_{name}"));
            assert!(joint("shoulder") < joint("elbow"));
            assert!(joint("shoulder") < joint("hip"));
            assert_relative_eq!(joint("hip"), joint("elbow"));
            assert!(joint("hip") < joint("knee"));
            assert!(joint("elbow") < stiffness("neck"));
        }
        assert_relative_eq!(stiffness("neck"), 0.8);
        assert_relative_eq!(model.joints[0].damping, 0.5);
        assert!(model
            .joints
            .iter()
            .all(|j| j.limits.is_some_and(|l| l.is_ordered() && l.is_finite())));
    }

    #[test]
    fn test_visuals() {
        let model = default_model();
        let head = model.bodies[0].visual.as_ref().unwrap();
        assert_eq!(head.shape, BodyShape::Sphere);
        assert_eq!(head.color.as_deref(), Some(HEAD_COLOR));
        assert_eq!(model.bodies[1].visual.as_ref().unwrap().shape, BodyShape::Box);
        assert!(model.bodies[2..]
            .iter()
            .all(|b| b.visual.as_ref().unwrap().shape == BodyShape::Capsule));
    }

    #[test]
    fn test_invalid_dimensions() {
        assert_eq!(
            create_human_ragdoll("m", 0.0, 70.0),
            Err(SimError::InvalidDimension {
                name: "height",
                value: 0.0
            })
        );
        assert!(create_human_ragdoll("m", 1.8, -1.0).is_err());
        assert!(create_human_ragdoll("m", f64::NAN, 70.0).is_err());
        assert!(HumanoidBuilder::new("m").mass(f64::INFINITY).build().is_err());
    }
}
