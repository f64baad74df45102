//! One-shot force application.

use nalgebra::{Point3, Vector3};
use sim_types::{EngineConfig, ImpulseMode, RigidBody, SimulationState};
use tracing::{debug, warn};

/// Apply `force` once to the body `body_id` in `state`.
///
/// The linear velocity changes by `force / mass`, times `dt` in
/// [`ImpulseMode::TimestepScaled`]. With an application `point`, the angular
/// velocity also changes by `(point - position) × force / mass` under the
/// same scaling. Rotational inertia is not modelled.
///
/// Returns `false`, leaving `state` untouched, if the body does not exist or
/// is static.
pub fn apply_force(
    state: &mut SimulationState,
    body_id: &str,
    force: Vector3<f64>,
    point: Option<Point3<f64>>,
    config: &EngineConfig,
) -> bool {
    let Some(body) = state.body_mut(body_id) else {
        warn!(body_id, "force applied to unknown body");
        return false;
    };

    if body.is_static {
        debug!(body_id, "force on static body ignored");
        return false;
    }

    let scale = match config.impulse_mode {
        ImpulseMode::Instant => 1.0,
        ImpulseMode::TimestepScaled => config.time_step,
    };
    apply_impulse(body, &force, point.as_ref(), scale);
    true
}

/// Add the velocity change of `force` to a dynamic body.
fn apply_impulse(
    body: &mut RigidBody,
    force: &Vector3<f64>,
    point: Option<&Point3<f64>>,
    scale: f64,
) {
    let inv_mass = body.inverse_mass();
    body.velocity += force * (inv_mass * scale);

    if let Some(point) = point {
        let lever = point - body.position;
        body.angular_velocity += lever.cross(force) * (inv_mass * scale);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use sim_types::RagdollModel;

    fn state() -> SimulationState {
        SimulationState::with_model(RagdollModel::new(
            "m",
            vec![
                RigidBody::new("m_ball", Point3::new(0.0, 1.0, 0.0), 2.0),
                RigidBody::fixed("m_post", Point3::origin()),
            ],
            vec![],
        ))
    }

    #[test]
    fn test_instant_impulse() {
        let mut state = state();
        let applied = apply_force(
            &mut state,
            "m_ball",
            Vector3::new(4.0, 10.0, 0.0),
            None,
            &EngineConfig::default(),
        );

        assert!(applied);
        let ball = state.body("m_ball").unwrap();
        assert_relative_eq!(ball.velocity, Vector3::new(2.0, 5.0, 0.0), epsilon = 1e-12);
        assert_eq!(ball.angular_velocity, Vector3::zeros());
    }

    #[test]
    fn test_timestep_scaled_impulse() {
        let config = EngineConfig::with_time_step(0.01).impulse_mode(ImpulseMode::TimestepScaled);
        let mut state = state();

        let force = Vector3::new(0.0, 100.0, 0.0);
        assert!(apply_force(&mut state, "m_ball", force, None, &config));

        assert_relative_eq!(state.body("m_ball").unwrap().velocity.y, 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_lever_arm_spins_body() {
        let mut state = state();
        // Push along +Z, half a metre to the +X side of the body
        let point = Point3::new(0.5, 1.0, 0.0);
        apply_force(
            &mut state,
            "m_ball",
            Vector3::new(0.0, 0.0, 1000.0),
            Some(point),
            &EngineConfig::default(),
        );

        let ball = state.body("m_ball").unwrap();
        // (0.5, 0, 0) × (0, 0, 1000) = (0, -500, 0), over 2 kg
        assert_relative_eq!(
            ball.angular_velocity,
            Vector3::new(0.0, -250.0, 0.0),
            epsilon = 1e-9
        );
        assert_relative_eq!(ball.velocity.z, 500.0, epsilon = 1e-9);
    }

    #[test]
    fn test_unknown_body_leaves_state_unchanged() {
        let mut state = state();
        let before = state.clone();

        let applied = apply_force(
            &mut state,
            "nonexistent",
            Vector3::x(),
            None,
            &EngineConfig::default(),
        );

        assert!(!applied);
        assert_eq!(state, before);
    }

    #[test]
    fn test_static_body_rejects_force() {
        let mut state = state();
        let before = state.clone();

        assert!(!apply_force(
            &mut state,
            "m_post",
            Vector3::new(0.0, 50.0, 0.0),
            Some(Point3::new(1.0, 0.0, 0.0)),
            &EngineConfig::default(),
        ));
        assert_eq!(state, before);
    }
}
