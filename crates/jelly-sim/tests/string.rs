//! Tests for `String3D`.

use float_eq::assert_float_eq;
use jelly_sim::{Constraints, Point3D, String3D};
use rand::prelude::*;
use test_case::test_case;

mod common;

#[test]
fn rejects_bad_sizes() {
    assert!(String3D::new(0, 1.0, 1.0, 1.0).is_err());
    assert!(String3D::new(4, 0.0, 1.0, 1.0).is_err());
    assert!(String3D::new(4, f64::NAN, 1.0, 1.0).is_err());
    assert!(String3D::new(4, 1.0, -1.0, 1.0).is_err());
    assert!(String3D::new(4, 1.0, 1.0, f64::INFINITY).is_err());
}

#[test]
fn only_the_first_point_may_be_weightless() -> Result<(), String> {
    assert!(String3D::new(4, 1.0, 1.0, 0.0).is_err());
    assert!(String3D::new(4, 1.0, 0.0, 0.0).is_err());
    assert!(String3D::new(4, 1.0, 1.0, -0.5).is_err());

    let mut s = String3D::new(4, 1.0, 0.0, 1.0)?;
    for _ in 0..50 {
        s.add_force(-9.8, 0.1);
        let _ = s.update(0.01, &Constraints::free());
        s.add_force(-9.8, 0.1);
        let _ = s.update(0.01, &Constraints::pinned(Point3D::X));
    }
    assert!(s.is_finite());
    assert!(s.max_length_error() < 1e-9);
    Ok(())
}

#[test]
fn new_is_straight_from_origin() -> Result<(), String> {
    let s = String3D::new(4, 2.0, 0.5, 1.0)?;
    assert_eq!(s.num_segments(), 4);
    assert_float_eq!(s.segment_length(), 0.5, abs <= 1e-15);
    assert_eq!(s.points()[0], Point3D::ZERO);
    common::assert_close(s.end(), Point3D::new(0.0, 0.0, -2.0), 1e-12);
    assert_eq!(s.weights(), &[0.5, 1.0, 1.0, 1.0, 1.0]);
    assert!(s.directions().iter().all(|&d| d == -Point3D::Z));
    Ok(())
}

#[test]
#[expect(clippy::cast_precision_loss)]
fn unforced_string_stays_straight() -> Result<(), String> {
    let mut s = String3D::new(4, 2.0, 1.0, 1.0)?;
    for _ in 0..100 {
        s.add_force(0.0, 0.0);
        let out = s.update(0.1, &Constraints::free());
        assert!(out.first.is_none());
    }

    for (i, &p) in s.points().iter().enumerate() {
        common::assert_close(p, Point3D::new(0.0, 0.0, -0.5 * i as f64), 1e-12);
    }
    for l in common::segment_lengths(&s) {
        assert_float_eq!(l, 0.5, abs <= 1e-12);
    }
    Ok(())
}

#[test_case(0.01, 0.0; "small step, no bending")]
#[test_case(0.01, 5.0; "small step, stiff")]
#[test_case(0.02, 2.0; "large step")]
fn segment_lengths_are_preserved(dt: f64, hardness: f64) -> Result<(), String> {
    let mut rng = common::rng(42);
    let mut s = String3D::new(10, 2.0, 1.0, 1.0)?;
    for v in s.velocities_mut() {
        *v = Point3D::new(rng.random_range(-1.0..1.0), rng.random_range(-1.0..1.0), rng.random_range(-1.0..1.0));
    }

    for step in 0..500 {
        let target = common::on_circle(step % 100, 100, 0.3);
        s.add_hardness_force(hardness, 0.5);
        s.add_force(-9.8, 0.3);
        let _ = s.update(dt, &Constraints::pinned(target));

        assert!(s.is_finite(), "Non-finite state at step {step}");
        assert!(s.max_length_error() < 1e-9, "Length error {} at step {step}", s.max_length_error());
    }
    Ok(())
}

#[test]
#[expect(clippy::cast_precision_loss)]
fn bending_damping_does_not_add_energy() -> Result<(), String> {
    let mut s = String3D::new(10, 2.0, 1.0, 1.0)?;
    for (i, v) in s.velocities_mut().iter_mut().enumerate() {
        let i = i as f64;
        *v = Point3D::new(1.0 - i / 10.0, 0.5 * (i % 2.0), 0.0);
    }

    let initial = s.kinetic_energy();
    let mut previous = initial;
    for step in 0..2000 {
        s.add_hardness_force(5.0, 0.5);
        s.add_force(0.0, 0.0);
        let _ = s.update(0.01, &Constraints::free());

        let energy = s.kinetic_energy();
        assert!(
            energy <= previous * (1.0 + 1e-9) + 1e-12,
            "Energy grew from {previous} to {energy} at step {step}"
        );
        previous = energy;
    }
    assert!(previous < initial);
    assert!(s.max_length_error() < 1e-12);
    Ok(())
}

#[test]
fn pinned_point_reaches_target() -> Result<(), String> {
    let mut s = String3D::new(8, 1.6, 1.0, 1.0)?;
    let target = Point3D::new(0.3, 0.2, 0.1);
    for _ in 0..50 {
        s.add_force(-9.8, 0.5);
        let out = s.update(0.01, &Constraints::pinned(target));
        assert!(out.first.is_some_and(Point3D::is_finite));
        assert_eq!(s.points()[0], target);
    }
    Ok(())
}

#[test]
fn hanging_string_reaction_carries_its_weight() -> Result<(), String> {
    let mut s = String3D::new(10, 2.0, 1.0, 1.0)?;
    let anchor = Point3D::new(0.3, 0.0, 0.0);
    let mut reaction = Point3D::ZERO;
    for _ in 0..3000 {
        s.add_hardness_force(5.0, 0.5);
        s.add_force(-9.8, 1.0);
        reaction = s.update(0.01, &Constraints::pinned(anchor)).first.ok_or("Missing reaction")?;
    }

    // Eleven unit masses under gravity.
    common::assert_close(reaction, Point3D::new(0.0, 0.0, 11.0 * 9.8), 1e-3);
    common::assert_close(s.end(), anchor - Point3D::Z * 2.0, 1e-3);
    Ok(())
}

#[test]
fn forces_reset_after_update() -> Result<(), String> {
    let mut s = String3D::new(3, 1.0, 1.0, 1.0)?;
    s.add_point_force(2, Point3D::X);
    s.add_force(-1.0, 0.0);
    assert!(s.forces().iter().any(|f| *f != Point3D::ZERO));

    let _ = s.update(0.01, &Constraints::free());
    assert!(s.forces().iter().all(|f| *f == Point3D::ZERO));
    Ok(())
}

#[test]
fn weightless_points_ignore_gravity() -> Result<(), String> {
    let mut s = String3D::new(3, 1.0, 0.0, 1.0)?;
    s.add_force(-9.8, 1.0);
    assert_eq!(s.forces()[0], Point3D::ZERO);
    assert_float_eq!(s.forces()[1].z, -9.8, abs <= 1e-12);
    Ok(())
}

#[test]
fn place_relays_the_string() -> Result<(), String> {
    let mut s = String3D::new(4, 2.0, 1.0, 1.0)?;
    s.velocities_mut()[2] = Point3D::Y;
    s.place(Point3D::new(1.0, 1.0, 1.0), Point3D::X * 3.0)?;

    common::assert_close(s.end(), Point3D::new(3.0, 1.0, 1.0), 1e-12);
    assert!(s.directions().iter().all(|&d| d == Point3D::X));
    assert!(s.velocities().iter().all(|&v| v == Point3D::ZERO));
    assert!(s.place(Point3D::ZERO, Point3D::ZERO).is_err());
    Ok(())
}
