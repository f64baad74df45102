//! Per-body time integration.
//!
//! Each non-static body advances with semi-implicit Euler:
//!
//! ```text
//! v.y  -= g * dt
//! v, ω *= (1 - damping)
//! x    += v * dt
//! q     = normalize(q * exp(ω * dt))
//! ```
//!
//! followed, when a ground plane is configured, by a clamp to `y >= 0` that
//! reflects the vertical speed and slows the horizontal speed.
//!
//! # Example
//!
//! ```
//! use sim_core::integrators::integrate_body;
//! use sim_types::{EngineConfig, RigidBody};
//! use nalgebra::Point3;
//!
//! let config = EngineConfig::default().damping(0.0);
//! let mut body = RigidBody::new("ball", Point3::new(0.0, 10.0, 0.0), 1.0);
//!
//! integrate_body(&mut body, &config);
//!
//! assert!(body.velocity.y < 0.0);
//! assert!(body.position.y < 10.0);
//! ```

use nalgebra::{UnitQuaternion, Vector3};
use sim_types::{EngineConfig, GroundContact, RigidBody};

/// Advance one non-static body by one timestep.
///
/// Static bodies are left untouched.
pub fn integrate_body(body: &mut RigidBody, config: &EngineConfig) {
    if body.is_static {
        return;
    }

    let dt = config.time_step;

    // Gravity acts along -Y
    body.velocity.y -= config.gravity * dt;

    apply_damping(body, config.damping);

    body.position += body.velocity * dt;

    if let Some(ground) = &config.ground {
        resolve_ground_contact(body, ground);
    }

    integrate_rotation(
        &mut body.rotation,
        &body.angular_velocity,
        dt,
        config.rotation_epsilon,
    );
}

/// Scale linear and angular velocity by `1 - damping`.
pub fn apply_damping(body: &mut RigidBody, damping: f64) {
    let factor = 1.0 - damping;
    body.velocity *= factor;
    body.angular_velocity *= factor;
}

/// Clamp a body to the ground plane `y = 0`.
///
/// Returns `true` if the body was below the plane.
pub fn resolve_ground_contact(body: &mut RigidBody, ground: &GroundContact) -> bool {
    if body.position.y >= 0.0 {
        return false;
    }

    body.position.y = 0.0;
    body.velocity.y = -body.velocity.y * ground.restitution;
    body.velocity.x *= ground.friction;
    body.velocity.z *= ground.friction;
    true
}

/// Rotate `rotation` by the rotation vector `omega * dt`.
///
/// Increments whose angle is at most `epsilon` are skipped. The increment is
/// composed in the body frame and the result renormalized, so the quaternion
/// keeps unit norm over any number of steps.
pub fn integrate_rotation(
    rotation: &mut UnitQuaternion<f64>,
    omega: &Vector3<f64>,
    dt: f64,
    epsilon: f64,
) {
    let rotation_vector = omega * dt;
    if rotation_vector.norm() <= epsilon {
        return;
    }

    let delta = UnitQuaternion::from_scaled_axis(rotation_vector);
    *rotation = UnitQuaternion::new_normalize(rotation.into_inner() * delta.into_inner());
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Point3;

    fn body_at(y: f64) -> RigidBody {
        RigidBody::new("b", Point3::new(0.0, y, 0.0), 2.0)
    }

    fn frictionless() -> EngineConfig {
        EngineConfig::with_time_step(0.01).damping(0.0).without_ground()
    }

    #[test]
    fn test_free_fall_velocity() {
        let config = frictionless();
        let mut body = body_at(100.0);

        let steps = 50;
        for _ in 0..steps {
            integrate_body(&mut body, &config);
        }

        assert_relative_eq!(
            body.velocity.y,
            -9.8 * f64::from(steps) * 0.01,
            epsilon = 1e-10
        );
        assert_eq!(body.velocity.x, 0.0);
    }

    #[test]
    fn test_semi_implicit_position() {
        let config = frictionless();
        let mut body = body_at(10.0);

        integrate_body(&mut body, &config);

        // Velocity is updated first, then used for the position
        assert_relative_eq!(body.position.y, 10.0 - 9.8 * 0.01 * 0.01, epsilon = 1e-12);
    }

    #[test]
    fn test_damping_scales_velocities() {
        let config = EngineConfig::with_time_step(0.01)
            .zero_gravity()
            .damping(0.1)
            .without_ground();
        let mut body = body_at(5.0)
            .with_velocity(Vector3::new(2.0, 0.0, -4.0))
            .with_angular_velocity(Vector3::new(0.0, 1.0, 0.0));

        integrate_body(&mut body, &config);

        assert_relative_eq!(body.velocity, Vector3::new(1.8, 0.0, -3.6), epsilon = 1e-12);
        assert_relative_eq!(body.angular_velocity.y, 0.9, epsilon = 1e-12);
    }

    #[test]
    fn test_static_body_is_untouched() {
        let config = EngineConfig::default();
        let mut body = RigidBody::fixed("floor", Point3::new(0.0, 1.0, 0.0))
            .with_velocity(Vector3::new(1.0, 0.0, 0.0));
        let before = body.clone();

        integrate_body(&mut body, &config);

        assert_eq!(body, before);
    }

    #[test]
    fn test_ground_bounce() {
        let ground = GroundContact::default();
        let mut body = body_at(-0.05).with_velocity(Vector3::new(1.0, -2.0, -0.5));

        assert!(resolve_ground_contact(&mut body, &ground));

        assert_eq!(body.position.y, 0.0);
        assert_relative_eq!(body.velocity.y, 0.6, epsilon = 1e-12);
        assert_relative_eq!(body.velocity.x, 0.8, epsilon = 1e-12);
        assert_relative_eq!(body.velocity.z, -0.4, epsilon = 1e-12);

        // Above the plane nothing happens
        let mut airborne = body_at(1.0).with_velocity(Vector3::new(1.0, -2.0, 0.0));
        assert!(!resolve_ground_contact(&mut airborne, &ground));
        assert_eq!(airborne.velocity, Vector3::new(1.0, -2.0, 0.0));
    }

    #[test]
    fn test_body_never_sinks_with_ground() {
        let config = EngineConfig::with_time_step(0.01).damping(0.0);
        let mut body = body_at(0.5);

        for _ in 0..500 {
            integrate_body(&mut body, &config);
            assert!(body.position.y >= 0.0);
        }
    }

    #[test]
    fn test_rotation_about_y() {
        let mut rotation = UnitQuaternion::identity();
        let omega = Vector3::new(0.0, std::f64::consts::PI, 0.0);

        // Half a second at π rad/s is a quarter turn
        for _ in 0..50 {
            integrate_rotation(&mut rotation, &omega, 0.01, 1e-4);
        }

        assert_relative_eq!(rotation.angle(), std::f64::consts::FRAC_PI_2, epsilon = 1e-9);
        let x = rotation * Vector3::x();
        assert_relative_eq!(x, -Vector3::z(), epsilon = 1e-9);
    }

    #[test]
    fn test_small_rotation_is_skipped() {
        let mut rotation = UnitQuaternion::identity();
        integrate_rotation(&mut rotation, &Vector3::new(0.005, 0.0, 0.0), 0.01, 1e-4);
        assert_eq!(rotation, UnitQuaternion::identity());
    }

    #[test]
    fn test_quaternion_stays_normalized() {
        let config = frictionless().zero_gravity();
        let mut body = body_at(1.0).with_angular_velocity(Vector3::new(3.7, -11.0, 25.3));

        for _ in 0..10_000 {
            integrate_body(&mut body, &config);
            assert!((body.rotation.quaternion().norm() - 1.0).abs() < 1e-6);
        }
    }
}
