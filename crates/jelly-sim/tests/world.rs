//! Tests for `HitMap` and `DistanceField`.

use float_eq::assert_float_eq;
use jelly_sim::{DistanceField, HitMap, Point3D, Terrain};
use rand::prelude::*;

mod common;

#[test]
fn hit_map_clear_is_immediate() -> Result<(), String> {
    let mut map = HitMap::new(64, 4)?;
    assert!(!map.hit_test(0.0, 0.0));

    map.add_points(&[Point3D::ZERO]);
    assert!(map.hit_test(0.0, 0.0));

    map.clear();
    assert!(!map.hit_test(0.0, 0.0));
    assert_eq!(map.generation(), 2);
    Ok(())
}

#[test]
fn hit_map_marks_a_disc() -> Result<(), String> {
    let mut map = HitMap::new(64, 4)?;
    map.add_points(&[Point3D::new(0.2, 0.3, 5.0)]);

    assert!(map.hit_test(4.5, 0.0));
    assert!(map.hit_test(-3.5, 0.5));
    assert!(!map.hit_test(5.5, 0.0));
    // Three cells along both axes is outside a radius of four.
    assert!(!map.hit_test(3.5, 3.5));
    assert!(map.hit_test(2.5, 2.5));
    Ok(())
}

#[test]
fn hit_map_ignores_points_off_the_map() -> Result<(), String> {
    let mut map = HitMap::new(16, 2)?.with_cell_size(0.25)?;
    map.add_points(&[Point3D::new(100.0, 0.0, 0.0), Point3D::new(-2.1, -2.1, 0.0)]);

    assert!(!map.hit_test(100.0, 0.0));
    assert!(!map.hit_test(2.1, 2.1));
    // The corner point still marks the cells that are on the map.
    assert!(map.hit_test(-1.9, -1.9));
    Ok(())
}

#[test]
fn hit_map_skips_far_and_non_finite_points() -> Result<(), String> {
    let mut map = HitMap::new(16, 3)?;
    map.add_points(&[
        Point3D::new(1e19, 0.0, 0.0),
        Point3D::new(0.0, -1e19, 0.0),
        Point3D::new(f64::INFINITY, 0.0, 0.0),
        Point3D::new(0.0, f64::NEG_INFINITY, 0.0),
        Point3D::new(f64::NAN, f64::NAN, 0.0),
    ]);
    for x in -8..8 {
        for y in -8..8 {
            assert!(!map.hit_test(f64::from(x) + 0.5, f64::from(y) + 0.5));
        }
    }
    assert!(!map.hit_test(1e19, 0.0));
    assert!(!map.hit_test(f64::INFINITY, f64::NAN));

    // A later point on the map is still marked.
    map.add_points(&[Point3D::new(f64::NAN, 0.0, 0.0), Point3D::ZERO]);
    assert!(map.hit_test(0.5, 0.5));
    Ok(())
}

#[test]
fn hit_map_cell_size_scales_cells() -> Result<(), String> {
    let mut map = HitMap::new(64, 0)?.with_cell_size(0.25)?;
    map.add_points(&[Point3D::new(1.0, 1.0, 0.0)]);
    assert!(map.hit_test(1.1, 1.1));
    assert!(!map.hit_test(1.3, 1.0));

    assert!(HitMap::new(0, 1).is_err());
    assert!(HitMap::new(4, 1)?.with_cell_size(0.0).is_err());
    Ok(())
}

#[test]
fn round_tank_walls() -> Result<(), String> {
    let tank = DistanceField::round_tank(2.0, 64)?;

    assert!(!tank.hit_test(0.0, 0.0));
    assert!(!tank.hit_test(1.9, 0.0));
    assert!(tank.hit_test(2.1, 0.0));
    assert!(tank.hit_test(0.0, -2.2));
    // Outside the sampled square the border value is used.
    assert!(tank.hit_test(10.0, 10.0));

    let n = tank.hit_normal(2.2, 0.0).ok_or("Missing normal")?;
    common::assert_close(n, -Point3D::X, 1e-6);

    let n = tank.hit_normal(1.7, 1.7).ok_or("Missing normal")?;
    common::assert_close(n, Point3D::new(-1.0, -1.0, 0.0).normalize(), 0.05);
    Ok(())
}

#[test]
fn distance_field_interpolates_the_closure() -> Result<(), String> {
    let field = DistanceField::from_fn(2.0, 80, |x, y| 1.0 - x.hypot(y))?;
    assert_float_eq!(field.spacing(), 0.05, abs <= 1e-12);

    let mut rng = common::rng(42);
    for _ in 0..500 {
        let (x, y) = (rng.random_range(-1.9..1.9), rng.random_range(-1.9..1.9));
        let expected: f64 = 1.0 - f64::hypot(x, y);
        assert!((field.distance(x, y) - expected).abs() < 0.02, "At ({x}, {y})");
    }

    assert!(DistanceField::from_fn(1.0, 0, |_, _| 0.0).is_err());
    assert!(DistanceField::from_fn(-1.0, 4, |_, _| 0.0).is_err());
    Ok(())
}

#[test]
fn flat_field_has_no_normal() -> Result<(), String> {
    let field = DistanceField::from_fn(1.0, 4, |_, _| -1.0)?;
    assert!(field.hit_test(0.0, 0.0));
    assert!(field.hit_normal(0.0, 0.0).is_none());
    Ok(())
}
