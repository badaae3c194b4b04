use cgmath::{Deg, Euler, InnerSpace, Quaternion, Rad, Rotation3};
use scrollscape::{
    SceneError,
    data_structures::{instance::Transform, model::ModelData},
    scene::{Entity, MeshEntity, Motion, Stage, fixed_entities},
};

use crate::common::test_utils::assert_close;

mod common;

fn mesh(name: &str, motion: Motion) -> MeshEntity {
    MeshEntity::new(name, ModelData::default(), Transform::new(), motion)
}

#[test]
fn box_wobble_stays_bounded() {
    let mut cube = mesh("box", Motion::wobble());
    for _ in 0..2000 {
        cube.update(0.016).unwrap();
        let Euler { x, y, z } = cube.transform.rotation;
        assert!((-4.0..=4.0).contains(&x.0), "x = {}", x.0);
        assert!((-3.0..=3.0).contains(&y.0), "y = {}", y.0);
        assert!((-2.0..=2.0).contains(&z.0), "z = {}", z.0);
    }
}

#[test]
fn box_wobble_counts_frames_not_time() {
    let mut slow = mesh("slow", Motion::wobble());
    let mut fast = mesh("fast", Motion::wobble());
    for _ in 0..90 {
        slow.update(0.1).unwrap();
        fast.update(0.001).unwrap();
    }
    assert_eq!(slow.transform, fast.transform);

    // 90 frames = 90 degrees
    let Euler { x, y, z } = slow.transform.rotation;
    assert_close(x.0, 0.0);
    assert_close(y.0, 3.0);
    assert_close(z.0, 0.0);
}

#[test]
fn torus_roll_accumulates_elapsed_time() {
    let dts = [0.016f32, 0.033, 0.5, 0.001, 0.25, 0.016];
    let mut torus = mesh("torus", Motion::roll());
    for dt in dts {
        torus.update(dt).unwrap();
    }
    let expected = dts.iter().fold(0.0f64, |total, dt| total + f64::from(*dt));
    assert_eq!(torus.transform.rotation.x, Rad(expected as f32));
}

#[test]
fn torus_roll_stays_exact_after_hours() {
    // about 73 hours of spin
    let mut torus = mesh("torus", Motion::Roll { angle: 262_144.0 });
    for _ in 0..60 {
        torus.update(1.0 / 60.0).unwrap();
    }
    assert_close(torus.transform.rotation.x.0, 262_145.0);
}

#[test]
fn box_wobble_keeps_moving_after_many_frames() {
    let mut cube = mesh("box", Motion::Wobble { degrees: 16_777_216.0 });
    cube.update(0.016).unwrap();
    let first = cube.transform.rotation;
    cube.update(0.016).unwrap();
    assert_ne!(cube.transform.rotation, first);

    let angle = 16_777_218.0f64.to_radians();
    let Euler { x, y, z } = cube.transform.rotation;
    assert_close(x.0, (4.0 * angle.cos()) as f32);
    assert_close(y.0, (3.0 * angle.sin()) as f32);
    assert_close(z.0, (2.0 * angle.cos()) as f32);
}

#[test]
fn sway_keeps_its_yaw() {
    let yaw = Rad::from(Deg(13.0f32));
    let mut monkey = mesh("monkey", Motion::sway(yaw));
    for _ in 0..10 {
        monkey.update(0.1).unwrap();
    }
    let Euler { x, y, z } = monkey.transform.rotation;
    assert_eq!(x, Rad(0.0));
    assert_eq!(y, yaw);
    assert_close(z.0, 1.0f32.sin());
}

#[test]
fn turntable_starts_from_its_base_orientation() {
    let base = Euler::new(Rad(0.5f32), Rad(0.0), Rad(0.3));
    let mut donut = mesh("donut", Motion::turntable(base, 0.2));
    donut.update(0.0).unwrap();
    let Euler { x, y, z } = donut.transform.rotation;
    assert_close(x.0, 0.5);
    assert_close(y.0, 0.0);
    assert_close(z.0, 0.3);

    for _ in 0..100 {
        donut.update(0.5).unwrap();
        assert!(donut.transform.is_finite());
    }
}

#[test]
fn turntable_spins_about_local_y_at_its_speed() {
    let base = Euler::new(Rad(0.5f32), Rad(0.0), Rad(0.3));
    let mut donut = mesh("donut", Motion::turntable(base, 0.2));
    let mut t = 0.0f64;
    for _ in 0..400 {
        donut.update(0.05).unwrap();
        t += f64::from(0.05f32);
        let expected = Quaternion::from(base) * Quaternion::from_angle_y(Rad((0.2 * t) as f32));
        let actual = donut.transform.quaternion();
        // q and -q are the same orientation
        let alignment = actual.normalize().dot(expected.normalize()).abs();
        assert!((1.0 - alignment).abs() < 1e-5, "t = {t}: {actual:?} vs {expected:?}");
    }
}

#[test]
fn non_finite_update_is_rolled_back() {
    let mut torus = mesh("torus", Motion::roll());
    torus.update(0.5).unwrap();
    let before = torus.transform;

    let err = torus.update(f32::NAN).unwrap_err();
    assert!(matches!(err, SceneError::NonFiniteTransform { ref entity } if entity == "torus"));
    assert_eq!(torus.transform, before);

    // the motion state was rolled back too
    torus.update(0.5).unwrap();
    assert_eq!(torus.transform.rotation.x, Rad(1.0));
}

#[test]
fn one_faulty_entity_does_not_stop_the_others() {
    let mut stage = Stage::new(vec![
        Entity::StaticMesh(mesh("box", Motion::wobble())),
        Entity::StaticMesh(mesh("torus", Motion::roll())),
    ]);

    // the box is frame counted and ignores the broken frame time
    assert_eq!(stage.update(f32::INFINITY), 1);
    let cube = stage.find("box").and_then(Entity::as_mesh).unwrap();
    assert_eq!(cube.motion, Motion::Wobble { degrees: 1.0 });
    let torus = stage.find("torus").and_then(Entity::as_mesh).unwrap();
    assert_eq!(torus.transform, Transform::new());

    assert_eq!(stage.update(0.25), 0);
    let torus = stage.find("torus").and_then(Entity::as_mesh).unwrap();
    assert_eq!(torus.transform.rotation.x, Rad(0.25));
}

#[test]
fn fixed_scene_content() {
    let entities = fixed_entities();
    let names: Vec<&str> = entities.iter().map(Entity::name).collect();
    assert_eq!(
        names,
        [
            "box",
            "torus",
            "star field",
            "point light",
            "point light",
            "point light",
            "point light"
        ]
    );

    let stage = Stage::new(entities);
    let lights = stage.lights();
    assert_eq!(lights.len(), 4);
    assert!(lights.iter().all(|light| light.intensity == 10.0 && light.decay == 3.0));
    assert_eq!(
        stage.find("star field").and_then(Entity::as_star_field).map(|stars| stars.len()),
        Some(200)
    );
}
