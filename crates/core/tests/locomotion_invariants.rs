//! Surface invariants for walkers driven over many ticks
//!
//! Every walker must stay at `radius + offset` from the planet center, never
//! drop into the southern hemisphere, and keep an orthonormal frame, no matter
//! how it is driven.

use approx::assert_relative_eq;
use planet_walk_core::agent::spawn_position;
use planet_walk_core::sphere::{apply_hemisphere_constraint, build_tangent_basis, clamp_to_surface};
use planet_walk_core::{
    Agent, Facing, HemisphereBand, MovementInput, Planet, PlayerController, Pose, RetargetInterval,
    Vec3, WanderController,
};
use std::sync::Arc;

const SURFACE_TOLERANCE: f32 = 1e-3;

#[ctor::ctor]
fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn planet() -> Arc<Planet> {
    Arc::new(Planet::at_origin(10.0).unwrap())
}

fn assert_frame(pose: &Pose) {
    assert_relative_eq!(pose.up.norm(), 1.0, epsilon = 1e-4);
    assert_relative_eq!(pose.forward.norm(), 1.0, epsilon = 1e-4);
    assert!(
        pose.forward.dot(&pose.up).abs() < 1e-4,
        "forward not tangent: {:?} . {:?}",
        pose.forward,
        pose.up
    );
}

#[test]
fn test_spawn_matches_fraction_of_radius() {
    let planet = planet();
    assert_relative_eq!(spawn_position(&planet), Vec3::new(0.0, 7.5, 6.6), epsilon = 1e-5);

    let offset_planet = Planet::new(Vec3::new(5.0, -2.0, 1.0), 20.0).unwrap();
    assert_relative_eq!(
        spawn_position(&offset_planet),
        Vec3::new(5.0, 13.0, 14.2),
        epsilon = 1e-4
    );
}

#[test]
fn test_forward_walk_stays_on_surface_for_1000_ticks() {
    let planet = planet();
    let mut agent = Agent::new(
        Arc::clone(&planet),
        1.0,
        Facing::SurfaceForward,
        HemisphereBand::default(),
    );
    let mut controller = PlayerController::new(3.5);

    for tick in 0..1000 {
        controller.update(&mut agent, &MovementInput::FORWARD, 1.0);
        let distance = (agent.position() - planet.center()).norm();
        assert!(
            (distance - 11.0).abs() < SURFACE_TOLERANCE,
            "tick {tick}: distance {distance}"
        );
        assert!(agent.position().y >= planet.center().y - SURFACE_TOLERANCE);
        assert_frame(agent.pose());
    }
}

#[test]
fn test_every_input_combination_stays_on_surface() {
    let planet = planet();
    let mut agent = Agent::new(
        Arc::clone(&planet),
        1.0,
        Facing::SurfaceForward,
        HemisphereBand::default(),
    );
    let mut controller = PlayerController::new(3.5);

    // Spawn sits inside the walking sphere until the first move seats it
    controller.update(&mut agent, &MovementInput::FORWARD, 1.0 / 30.0);
    assert!(agent.surface_error().abs() < SURFACE_TOLERANCE);

    for step in 0u32..2000 {
        let bits = step / 25;
        let input = MovementInput {
            forward: bits & 1 != 0,
            back: bits & 2 != 0,
            left: bits & 4 != 0,
            right: bits & 8 != 0,
            reset: false,
        };
        controller.update(&mut agent, &input, 1.0 / 30.0);
        assert!(agent.surface_error().abs() < SURFACE_TOLERANCE, "step {step}");
        assert!(agent.position().y >= -SURFACE_TOLERANCE);
    }
}

#[test]
fn test_wanderer_stays_in_band() {
    let planet = planet();
    let mut agent = Agent::new(
        Arc::clone(&planet),
        1.0,
        Facing::Heading,
        HemisphereBand::default(),
    );
    let mut wander = WanderController::new(2.75, RetargetInterval::default(), Some(11));
    wander.begin(&mut agent);

    for _ in 0..20_000 {
        wander.update(&mut agent, 1.0 / 60.0);
        assert!(agent.surface_error().abs() < SURFACE_TOLERANCE);
        let up = agent.up();
        assert!((-1e-5..=0.98 + 1e-4).contains(&up.y), "latitude out of band: {}", up.y);
        assert_relative_eq!(wander.direction().norm(), 1.0, epsilon = 1e-4);
        assert_frame(agent.pose());
    }
    assert!(wander.retarget_count() > 1);
}

#[test]
fn test_basis_is_orthonormal_over_sampled_sphere() {
    for i in 0..40 {
        for j in 0..80 {
            let theta = std::f32::consts::PI * i as f32 / 39.0;
            let phi = 2.0 * std::f32::consts::PI * j as f32 / 80.0;
            let up = Vec3::new(theta.sin() * phi.cos(), theta.cos(), theta.sin() * phi.sin());
            let basis = build_tangent_basis(&up);
            assert_relative_eq!(basis.right.norm(), 1.0, epsilon = 1e-4);
            assert_relative_eq!(basis.forward.norm(), 1.0, epsilon = 1e-4);
            assert!(basis.right.dot(&basis.up).abs() < 1e-4);
            assert!(basis.forward.dot(&basis.up).abs() < 1e-4);
            assert!(basis.forward.dot(&basis.right).abs() < 1e-4);
        }
    }
}

#[test]
fn test_clamp_then_constrain_lands_in_band() {
    let planet = Planet::new(Vec3::new(1.0, 2.0, 3.0), 4.0).unwrap();
    let targets = [
        Vec3::new(10.0, -10.0, 0.0),
        Vec3::new(1.0, 50.0, 3.0),
        Vec3::new(-7.0, 2.0, 3.5),
    ];
    for target in targets {
        let clamped = clamp_to_surface(&target, &planet, 0.5).unwrap();
        assert_relative_eq!((clamped - planet.center()).norm(), 4.5, epsilon = 1e-4);

        let radial = planet.radial_direction(&clamped).unwrap();
        let check = apply_hemisphere_constraint(&radial, 0.0, 0.98);
        assert!((0.0..=0.98 + 1e-6).contains(&check.direction.y));
        assert_relative_eq!(check.direction.norm(), 1.0, epsilon = 1e-5);
    }
}
