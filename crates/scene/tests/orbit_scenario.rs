//! Integration tests driving the scene graph the way a render host does.

use std::f32::consts::FRAC_PI_3;

use glam::{Quat, Vec3};

use orrery_scene::solar::names;
use orrery_scene::{AngularRate, OrbitRates, SceneError, SceneGraph, SolarSystem};

const EPSILON: f32 = 1e-4;

fn approx_eq_vec3(a: Vec3, b: Vec3) -> bool {
    (a - b).abs().max_element() < EPSILON
}

#[derive(Debug, Clone, PartialEq)]
struct Mesh(&'static str);

#[test]
fn test_pivot_orbit_scenario() {
    let mut graph: SceneGraph<Mesh> = SceneGraph::new("scene");
    let pivot = graph.create_node("pivot").expect("pivot");
    let planet = graph
        .create_drawable_node("planet", Mesh("sphere"))
        .expect("planet");

    graph.attach(graph.root(), pivot).unwrap();
    graph.attach(pivot, planet).unwrap();
    graph.set_translation(planet, Vec3::new(6.0, 0.0, 0.0)).unwrap();

    graph.rotate(pivot, 0.0, FRAC_PI_3, 0.0).unwrap();

    let world = graph.world_transform(planet).unwrap();
    let expected = Vec3::new(6.0 * FRAC_PI_3.cos(), 0.0, -6.0 * FRAC_PI_3.sin());
    assert!(
        approx_eq_vec3(world.translation, expected),
        "Expected {:?}, got {:?}",
        expected,
        world.translation
    );

    // The drawable is handed back untouched.
    let drawn = graph.drawables(graph.root()).unwrap();
    assert_eq!(drawn.len(), 1);
    assert_eq!(drawn[0].1, &Mesh("sphere"));
    assert!(approx_eq_vec3(drawn[0].2.translation, expected));
}

#[test]
fn test_frames_accumulate_like_one_long_frame() {
    let mut stepped = SceneGraph::new("root");
    let mut single = SceneGraph::new("root");
    let system = SolarSystem::build(&mut stepped, OrbitRates::default(), |_| ()).unwrap();
    SolarSystem::build(&mut single, OrbitRates::default(), |_| ()).unwrap();

    for _ in 0..60 {
        system.update(&mut stepped, 1.0 / 60.0).unwrap();
    }
    system.update(&mut single, 1.0).unwrap();

    // Pure Y rotations commute, so the earth's path is step-size independent.
    let earth_a = stepped.find_by_name(stepped.root(), names::EARTH).unwrap();
    let earth_b = single.find_by_name(single.root(), names::EARTH).unwrap();
    let a = stepped.world_transform(earth_a).unwrap();
    let b = single.world_transform(earth_b).unwrap();

    assert!(approx_eq_vec3(a.translation, b.translation));
    assert!(a.rotation.abs_diff_eq(b.rotation, EPSILON));
}

#[test]
fn test_planets_keep_their_orbit_radius() {
    let mut graph = SceneGraph::new("root");
    let system = SolarSystem::build(&mut graph, OrbitRates::default(), |_| ()).unwrap();

    for _ in 0..500 {
        system.update(&mut graph, 0.05).unwrap();
    }

    for (name, radius) in [
        (names::EARTH, 6.0),
        (names::MERCURY, 2.0),
        (names::VENUS, 4.0),
    ] {
        let id = graph.find_by_name(graph.root(), name).unwrap();
        let world = graph.world_transform(id).unwrap();
        assert!(
            (world.translation.length() - radius).abs() < EPSILON,
            "{name} drifted to {}",
            world.translation.length()
        );
    }
}

#[test]
fn test_sun_stays_at_origin() {
    let mut graph = SceneGraph::new("root");
    let system = SolarSystem::build(&mut graph, OrbitRates::default(), |_| ()).unwrap();
    system.update(&mut graph, 2.5).unwrap();

    let sun = graph.find_by_name(graph.root(), names::SUN_BODY).unwrap();
    let world = graph.world_transform(sun).unwrap();
    assert!(approx_eq_vec3(world.translation, Vec3::ZERO));
    assert!(world.rotation.abs_diff_eq(Quat::from_rotation_y(2.5 / 3.0), EPSILON));
}

#[test]
fn test_host_can_skip_a_failed_frame() {
    let mut graph = SceneGraph::new("root");
    let system = SolarSystem::build(&mut graph, OrbitRates::default(), |_| ()).unwrap();
    let earth = graph.find_by_name(graph.root(), names::EARTH).unwrap();

    let detached = graph.detach(earth).unwrap();
    let err = system.update(&mut graph, 0.1).unwrap_err();
    assert_eq!(err, SceneError::NotFound(names::EARTH.to_string()));

    // Re-attaching restores the scene and the next frame succeeds.
    graph.attach(detached, earth).unwrap();
    system.update(&mut graph, 0.1).unwrap();
}

#[test]
fn test_rates_from_partial_toml() {
    let rates: OrbitRates = toml::from_str(
        r#"
        [sun_pivot]
        y = 0.5

        [venus_pivot]
        y = 0.25
        z = 0.125
        "#,
    )
    .expect("valid rates");

    assert_eq!(rates.sun_pivot, AngularRate::new(0.0, 0.5, 0.0));
    assert_eq!(rates.venus_pivot, AngularRate::new(0.0, 0.25, 0.125));
    assert_eq!(rates.earth_spin, OrbitRates::default().earth_spin);
    assert_eq!(rates.mercury_pivot, OrbitRates::default().mercury_pivot);
}
