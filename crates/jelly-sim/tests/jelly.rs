//! Tests for `Jelly`.

use float_eq::assert_float_eq;
use jelly_sim::{HardnessParam, Jelly, JellyShape, Point3D, String3D, Terrain};
use test_case::test_case;

mod common;

/// Blocks everything right of `x = 0.5`.
struct Wall;

impl Terrain for Wall {
    fn hit_test(&self, x: f64, _: f64) -> bool {
        x > 0.5
    }

    fn hit_normal(&self, _: f64, _: f64) -> Option<Point3D> {
        Some(-Point3D::X)
    }
}

/// A muscle that contracts once every two units of time.
fn muscle(step: usize) -> f64 {
    let t = f64::from(u32::try_from(step).unwrap_or(u32::MAX)) * 0.01;
    0.5 - 0.5 * (core::f64::consts::TAU * t / 2.0).cos()
}

#[test]
fn default_topology() -> Result<(), String> {
    let jelly = Jelly::new(JellyShape::default(), &HardnessParam::default())?;

    assert_eq!(jelly.points().len(), 1 + 6 + 12 + 12);
    assert_eq!(jelly.inner_points().len(), 6);
    assert_eq!(jelly.middle_points().len(), 12);
    assert_eq!(jelly.outer_points().len(), 12);
    assert_eq!(jelly.links().len(), 2 * 6 + 3 * 12);
    assert_eq!(jelly.shrink_radial_links().len(), 12);
    assert_eq!(jelly.shrink_outline_links().len(), 12);
    assert_eq!(jelly.top_point().p, Point3D::new(0.0, 0.0, 1.0));

    for p in jelly.outer_points() {
        assert_float_eq!(p.p.x.hypot(p.p.y), 1.0, abs <= 1e-12);
        assert_float_eq!(p.p.z, 0.0, abs <= 1e-12);
    }

    // The link sets are disjoint.
    let mut pairs = jelly
        .links()
        .iter()
        .chain(jelly.shrink_radial_links())
        .chain(jelly.shrink_outline_links())
        .map(|l| (l.a.min(l.b), l.a.max(l.b)))
        .collect::<Vec<_>>();
    let total = pairs.len();
    pairs.sort_unstable();
    pairs.dedup();
    assert_eq!(pairs.len(), total);
    Ok(())
}

#[test_case(JellyShape::default().with_rings(2, 12); "too few inner")]
#[test_case(JellyShape::default().with_rings(6, 0); "too few outer")]
#[test_case(JellyShape::default().with_radial_shrink(0.0); "no radial shrink")]
#[test_case(JellyShape::default().scaled(-1.0); "negative radii")]
fn rejects_bad_shapes(shape: JellyShape) {
    assert!(Jelly::new(shape, &HardnessParam::default()).is_err());
}

#[test_case(4; "four")]
#[test_case(8; "eight")]
#[test_case(16; "sixteen")]
fn rest_shape_is_a_fixed_point(n: usize) -> Result<(), String> {
    let mut jelly = Jelly::new(JellyShape::default().with_rings(n, n), &HardnessParam::default())?;
    let initial = jelly.points().to_vec();
    for _ in 0..100 {
        jelly.update(0.01, 0.0);
    }
    for (a, b) in jelly.points().iter().zip(initial.iter()) {
        assert_eq!(a.p, b.p);
        assert_eq!(a.v, Point3D::ZERO);
    }
    Ok(())
}

#[test]
fn pulsation_stays_bounded() -> Result<(), String> {
    let mut jelly = Jelly::new(JellyShape::default(), &HardnessParam::default())?;
    let start = jelly.center();

    for step in 0..10_000 {
        jelly.update(0.01, muscle(step));

        let center = jelly.center();
        for p in jelly.outer_points() {
            let r = (p.p.x - center.x).hypot(p.p.y - center.y);
            assert!((0.3..=1.5).contains(&r), "Rim radius {r} at step {step}");
        }
    }
    assert!(jelly.is_finite());
    // Links only exchange momentum, so the bell does not drift.
    common::assert_close(jelly.center(), start, 1e-9);
    Ok(())
}

#[test]
fn contraction_shrinks_the_rim() -> Result<(), String> {
    let mut jelly = Jelly::new(JellyShape::default(), &HardnessParam::default())?;
    let relaxed = jelly.rim_radius();
    for _ in 0..200 {
        jelly.update(0.01, 1.0);
    }
    assert!(jelly.rim_radius() < relaxed, "{} >= {relaxed}", jelly.rim_radius());
    Ok(())
}

#[test]
fn tentacles_follow_the_bell() -> Result<(), String> {
    let mut jelly = Jelly::new(JellyShape::default(), &HardnessParam::default())?;
    jelly.attach_tentacles(8, 1.5, 10.0)?;
    assert_eq!(jelly.point_strings().len(), 12);

    for step in 0..3000 {
        jelly.update(0.01, muscle(step));
        assert!(jelly.is_finite(), "Non-finite state at step {step}");
    }

    for ps in jelly.point_strings() {
        // The anchor is shared exactly.
        assert_eq!(ps.string.points()[0], jelly.points()[ps.point].p);
        assert_eq!(ps.string.velocities()[0], jelly.points()[ps.point].v);
        assert!(ps.string.max_length_error() < 1e-9);
        // Tentacles hang below the rim.
        assert!(ps.string.end().z < ps.string.points()[0].z);
    }
    Ok(())
}

#[test]
fn tentacle_weight_drags_the_anchors() -> Result<(), String> {
    let mut bare = Jelly::new(JellyShape::default(), &HardnessParam::default())?;
    let mut hung = bare.clone();
    hung.attach_tentacles(8, 1.5, 10.0)?;

    for _ in 0..50 {
        bare.update(0.01, 0.0);
        hung.update(0.01, 0.0);
    }

    for (b, h) in bare.outer_points().iter().zip(hung.outer_points()) {
        assert_float_eq!(b.p.z, 0.0, abs <= 1e-12);
        assert!(h.p.z < -1e-3, "Anchor at {} was not dragged down", h.p);
    }
    for ps in hung.point_strings() {
        assert_eq!(ps.string.points()[0], hung.points()[ps.point].p);
    }
    Ok(())
}

#[test]
fn parallel_update_matches_sequential() -> Result<(), String> {
    let mut a = Jelly::new(JellyShape::default(), &HardnessParam::default())?;
    a.attach_tentacles(6, 1.0, 10.0)?;
    let mut b = a.clone();

    for step in 0..200 {
        a.update(0.01, muscle(step));
        b.par_update(0.01, muscle(step));
    }
    for (pa, pb) in a.points().iter().zip(b.points()) {
        assert_eq!(pa, pb);
    }
    for (sa, sb) in a.point_strings().iter().zip(b.point_strings()) {
        assert_eq!(sa.string.points(), sb.string.points());
    }
    Ok(())
}

#[test]
fn attach_string_validates_the_anchor() -> Result<(), String> {
    let mut jelly = Jelly::new(JellyShape::default(), &HardnessParam::default())?;
    let point = jelly.outer_range().start;

    assert!(jelly.attach_string(1000, String3D::new(4, 1.0, 1.0, 1.0)?).is_err());
    jelly.attach_string(point, String3D::new(4, 1.0, 1.0, 1.0)?)?;
    assert!(jelly.attach_string(point, String3D::new(4, 1.0, 1.0, 1.0)?).is_err());

    let ps = &jelly.point_strings()[0];
    assert_eq!(ps.point, point);
    assert_eq!(ps.string.points()[0], jelly.points()[point].p);
    common::assert_close(ps.string.end(), jelly.points()[point].p - Point3D::Z, 1e-12);
    Ok(())
}

#[test]
fn collide_removes_velocity_into_walls() -> Result<(), String> {
    let mut jelly = Jelly::new(JellyShape::default(), &HardnessParam::default())?;
    jelly.attach_tentacles(4, 1.0, 10.0)?;
    jelly.add_velocity(Point3D::new(1.0, 0.5, 0.0));
    jelly.collide(&Wall);

    for p in jelly.points() {
        let expected = if p.p.x > 0.5 { 0.0 } else { 1.0 };
        assert_float_eq!(p.v.x, expected, abs <= 1e-12);
        assert_float_eq!(p.v.y, 0.5, abs <= 1e-12);
    }
    for ps in jelly.point_strings() {
        for (p, v) in ps.string.points().iter().zip(ps.string.velocities()) {
            assert_eq!(v.x > 0.0, p.x <= 0.5);
        }
    }
    Ok(())
}

#[test]
fn orientation_and_energy_at_rest() -> Result<(), String> {
    let mut jelly = Jelly::new(JellyShape::default(), &HardnessParam::default())?;
    let frame = jelly.orientation();
    for i in 0..3 {
        common::assert_close(frame.column(i), jelly_sim::Mat3::IDENTITY.column(i), 1e-12);
    }

    assert_float_eq!(jelly.kinetic_energy(), 0.0, abs <= 1e-15);
    jelly.add_velocity(Point3D::new(0.0, 0.0, 2.0));
    assert_float_eq!(jelly.kinetic_energy(), 0.5 * 31.0 * 4.0, abs <= 1e-12);
    Ok(())
}
