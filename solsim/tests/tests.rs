use solsim::{euler_integrator, verlet_integrator, AccelSet, NewtonianGravity, Parameters};
use solsim::{Body, BodyKind, NVec2, Scenario, SimError};

/// Build a simple 2-body scenario separated along the x-axis, both at rest
pub fn two_body_scenario(dist: f64, m1: f64, m2: f64) -> Scenario {
    let b1 = Body::star(m1, NVec2::new(-dist / 2.0, 0.0), NVec2::zeros(), 10.0, "yellow").unwrap();
    let b2 = Body::planet(m2, NVec2::new(dist / 2.0, 0.0), NVec2::zeros(), 5.0, "blue").unwrap();
    Scenario::new(vec![b1, b2])
}

/// Star of mass `m_star` at the origin and a light planet on a circular orbit of radius `r`
pub fn circular_orbit(g: f64, m_star: f64, r: f64) -> Scenario {
    let v = (g * m_star / r).sqrt();
    let star = Body::star(m_star, NVec2::zeros(), NVec2::zeros(), 10.0, "yellow").unwrap();
    let planet = Body::planet(1e-9, NVec2::new(r, 0.0), NVec2::new(0.0, v), 5.0, "blue").unwrap();
    Scenario::new(vec![star, planet])
}

/// Three bodies that are not collinear
pub fn three_body_scenario() -> Scenario {
    Scenario::new(vec![
        Body::star(5.0, NVec2::new(0.0, 0.0), NVec2::new(0.0, -0.1), 10.0, "yellow").unwrap(),
        Body::planet(1.0, NVec2::new(1.0, 0.0), NVec2::new(0.0, 2.0), 5.0, "blue").unwrap(),
        Body::planet(0.5, NVec2::new(-0.3, 1.7), NVec2::new(1.1, 0.2), 5.0, "green").unwrap(),
    ])
}

/// Default physics parameters for tests
pub fn test_params() -> Parameters {
    Parameters::new(0.001, 1.0, 1e-6).unwrap()
}

/// Build a gravity term + AccelSet
pub fn gravity_set(p: &Parameters) -> AccelSet {
    AccelSet::new().with(NewtonianGravity {
        G: p.G,
        epsilon: p.epsilon,
    })
}

fn distance(s: &Scenario, i: usize, j: usize) -> f64 {
    (s.bodies()[j].x - s.bodies()[i].x).norm()
}

// ==================================================================================
// Body tests
// ==================================================================================

#[test]
fn body_rejects_non_positive_mass() {
    let err = Body::new(BodyKind::Star, 0.0, NVec2::zeros(), NVec2::zeros(), 1.0, "red").unwrap_err();
    assert!(matches!(err, SimError::InvalidBody { field: "mass", .. }), "got {err:?}");

    let err = Body::new(BodyKind::Planet, -3.0, NVec2::zeros(), NVec2::zeros(), 1.0, "red").unwrap_err();
    assert!(matches!(err, SimError::InvalidBody { field: "mass", .. }), "got {err:?}");
}

#[test]
fn body_rejects_non_positive_radius() {
    let err = Body::new(BodyKind::Planet, 1.0, NVec2::zeros(), NVec2::zeros(), 0.0, "red").unwrap_err();
    assert!(matches!(err, SimError::InvalidBody { field: "radius", .. }), "got {err:?}");

    let err = Body::new(BodyKind::Planet, 1.0, NVec2::zeros(), NVec2::zeros(), f64::NAN, "red").unwrap_err();
    assert!(matches!(err, SimError::InvalidBody { field: "radius", .. }), "got {err:?}");
}

#[test]
fn body_kind_parses_any_case() {
    assert_eq!("STAR".parse::<BodyKind>().unwrap(), BodyKind::Star);
    assert_eq!("planet".parse::<BodyKind>().unwrap(), BodyKind::Planet);
    assert!(matches!("comet".parse::<BodyKind>(), Err(SimError::UnknownObjectKind(k)) if k == "comet"));
}

// ==================================================================================
// Gravity tests
// ==================================================================================

#[test]
fn gravity_newton_third_law() {
    let s = two_body_scenario(1.0, 2.0, 3.0);
    let p = test_params();
    let acc = gravity_set(&p).accels(&s);

    let net = acc[0] * s.bodies()[0].m + acc[1] * s.bodies()[1].m;

    assert!(net.norm() < 1e-12, "Net force not zero: {:?}", net);
}

#[test]
fn gravity_points_toward_other_body() {
    let s = two_body_scenario(2.0, 1.0, 1.0);
    let p = test_params();
    let acc = gravity_set(&p).accels(&s);

    let dx = s.bodies()[1].x - s.bodies()[0].x;

    assert!(acc[0].dot(&dx) > 0.0, "Acceleration is not toward second body");
    assert!(acc[1].dot(&dx) < 0.0, "Acceleration is not toward first body");
}

#[test]
fn gravity_magnitude_is_g_m_over_d_squared() {
    let s = two_body_scenario(2.0, 3.0, 7.0);
    let p = Parameters::new(0.01, 0.5, 1e-6).unwrap();
    let acc = gravity_set(&p).accels(&s);

    // body 0 feels G * m1 / d^2 = 0.5 * 7 / 4
    assert!((acc[0].norm() - 0.875).abs() < 1e-12, "got {}", acc[0].norm());
    // body 1 feels G * m0 / d^2 = 0.5 * 3 / 4
    assert!((acc[1].norm() - 0.375).abs() < 1e-12, "got {}", acc[1].norm());
}

#[test]
fn gravity_inverse_square_law() {
    let s_r = two_body_scenario(1.0, 1.0, 1.0);
    let s_2r = two_body_scenario(2.0, 1.0, 1.0);
    let forces = gravity_set(&test_params());

    let ratio = forces.accels(&s_r)[0].norm() / forces.accels(&s_2r)[0].norm();

    assert!((ratio - 4.0).abs() < 1e-12, "Expected 4x, got {}", ratio);
}

#[test]
fn gravity_coincident_bodies_contribute_nothing() {
    let p = test_params();
    let forces = gravity_set(&p);

    let same = Scenario::new(vec![
        Body::star(1.0, NVec2::new(3.0, 4.0), NVec2::zeros(), 1.0, "red").unwrap(),
        Body::planet(1.0, NVec2::new(3.0, 4.0), NVec2::zeros(), 1.0, "red").unwrap(),
    ]);
    let acc = forces.accels(&same);
    assert_eq!(acc[0], NVec2::zeros());
    assert_eq!(acc[1], NVec2::zeros());

    let nearly = Scenario::new(vec![
        Body::star(1.0, NVec2::new(3.0, 4.0), NVec2::zeros(), 1.0, "red").unwrap(),
        Body::planet(1.0, NVec2::new(3.0 + 1e-9, 4.0), NVec2::zeros(), 1.0, "red").unwrap(),
    ]);
    let acc = forces.accels(&nearly);
    assert_eq!(acc[0], NVec2::zeros());
    assert_eq!(acc[1], NVec2::zeros());
}

#[test]
fn gravity_guard_only_drops_the_coincident_pair() {
    let p = test_params();
    let forces = gravity_set(&p);

    // bodies 0 and 1 coincide, body 2 is far away and still pulls on both
    let s = Scenario::new(vec![
        Body::star(1.0, NVec2::zeros(), NVec2::zeros(), 1.0, "red").unwrap(),
        Body::planet(2.0, NVec2::zeros(), NVec2::zeros(), 1.0, "red").unwrap(),
        Body::planet(4.0, NVec2::new(2.0, 0.0), NVec2::zeros(), 1.0, "red").unwrap(),
    ]);
    let acc = forces.accels(&s);

    for a in &acc {
        assert!(a.x.is_finite() && a.y.is_finite());
    }
    // G * 4 / 2^2 toward +x for both coincident bodies
    assert!((acc[0].x - 1.0).abs() < 1e-12);
    assert!((acc[1].x - 1.0).abs() < 1e-12);
}

#[test]
fn gravity_ignores_body_kind() {
    let p = test_params();
    let forces = gravity_set(&p);

    let mut s = three_body_scenario();
    let before = forces.accels(&s);
    for b in s.bodies_mut() {
        b.kind = BodyKind::Planet;
    }
    assert_eq!(before, forces.accels(&s));
}

// ==================================================================================
// Integrator tests
// ==================================================================================

#[test]
fn euler_updates_velocity_before_position() {
    let p = test_params();
    let forces = gravity_set(&p);
    let mut s = three_body_scenario();

    let pre = s.clone();
    let a = forces.accels(&pre);
    euler_integrator(&mut s, &forces, &p).unwrap();

    for i in 0..pre.len() {
        let v_new = pre.bodies()[i].v + p.dt * a[i];
        let x_new = pre.bodies()[i].x + p.dt * v_new;
        assert!((s.bodies()[i].v - v_new).norm() < 1e-15);
        assert!((s.bodies()[i].x - x_new).norm() < 1e-15);
    }
}

#[test]
fn euler_step_does_not_depend_on_body_order() {
    let p = test_params();
    let forces = gravity_set(&p);

    let mut forward = three_body_scenario();
    let mut reversed = Scenario::new(three_body_scenario().into_bodies().into_iter().rev().collect());

    for _ in 0..50 {
        euler_integrator(&mut forward, &forces, &p).unwrap();
        euler_integrator(&mut reversed, &forces, &p).unwrap();
    }

    let n = forward.len();
    for i in 0..n {
        let a = &forward.bodies()[i];
        let b = &reversed.bodies()[n - 1 - i];
        assert!((a.x - b.x).norm() < 1e-12, "body {i} position differs");
        assert!((a.v - b.v).norm() < 1e-12, "body {i} velocity differs");
    }
}

#[test]
fn accelerations_come_from_one_snapshot() {
    let p = test_params();
    let forces = gravity_set(&p);
    let s = three_body_scenario();

    // acceleration of body 0 computed with the others listed in either order
    let rotated = Scenario::new(vec![s.bodies()[0].clone(), s.bodies()[2].clone(), s.bodies()[1].clone()]);

    let a = forces.accels(&s)[0];
    let b = forces.accels(&rotated)[0];
    assert!((a - b).norm() < 1e-15, "{a:?} vs {b:?}");
}

#[test]
fn integrators_reject_non_positive_dt() {
    let mut p = test_params();
    let forces = gravity_set(&p);
    let mut s = three_body_scenario();
    let before = s.clone();

    for dt in [0.0, -1.0, f64::NAN] {
        p.dt = dt;
        assert!(matches!(euler_integrator(&mut s, &forces, &p), Err(SimError::InvalidTimeStep(_))));
        assert!(matches!(verlet_integrator(&mut s, &forces, &p), Err(SimError::InvalidTimeStep(_))));
    }
    assert_eq!(s, before);

    assert!(matches!(Parameters::new(0.0, 1.0, 1e-6), Err(SimError::InvalidTimeStep(_))));
}

#[test]
fn empty_scenario_steps_as_no_op() {
    let p = test_params();
    let forces = gravity_set(&p);
    let mut s = Scenario::new(Vec::new());

    euler_integrator(&mut s, &forces, &p).unwrap();
    verlet_integrator(&mut s, &forces, &p).unwrap();
    assert!(s.is_empty());
}

#[test]
fn overflow_propagates_as_plain_floats() {
    let p = Parameters::new(10.0, 1.0, 1e-6).unwrap();
    let forces = gravity_set(&p);
    let mut s = Scenario::new(vec![
        Body::planet(1.0, NVec2::zeros(), NVec2::new(f64::MAX, 0.0), 1.0, "red").unwrap(),
    ]);

    euler_integrator(&mut s, &forces, &p).unwrap();
    assert!(s.bodies()[0].x.x.is_infinite());
}

#[test]
fn euler_circular_orbit_keeps_radius() {
    let p = Parameters::new(1e-3, 1.0, 1e-6).unwrap();
    let forces = gravity_set(&p);
    let mut s = circular_orbit(p.G, 1.0, 1.0);
    let r0 = distance(&s, 0, 1);

    // a bit more than 1.5 orbits (period 2*pi)
    for _ in 0..10_000 {
        euler_integrator(&mut s, &forces, &p).unwrap();
        let r = distance(&s, 0, 1);
        assert!((r - r0).abs() / r0 < 1e-2, "radius drifted to {r}");
    }
}

#[test]
fn euler_circular_orbit_energy_stays_bounded() {
    let p = Parameters::new(1e-3, 1.0, 1e-6).unwrap();
    let forces = gravity_set(&p);
    let mut s = circular_orbit(p.G, 1.0, 1.0);
    let e0 = s.total_energy(p.G);
    let l0 = s.angular_momentum();

    for _ in 0..10_000 {
        euler_integrator(&mut s, &forces, &p).unwrap();
    }

    assert!(((s.total_energy(p.G) - e0) / e0).abs() < 1e-2);
    assert!(((s.angular_momentum() - l0) / l0).abs() < 1e-2);
}

#[test]
fn verlet_circular_orbit_keeps_radius() {
    let p = Parameters::new(1e-3, 1.0, 1e-6).unwrap();
    let forces = gravity_set(&p);
    let mut s = circular_orbit(p.G, 1.0, 1.0);
    let r0 = distance(&s, 0, 1);

    for _ in 0..10_000 {
        verlet_integrator(&mut s, &forces, &p).unwrap();
    }
    let r = distance(&s, 0, 1);
    assert!((r - r0).abs() / r0 < 1e-4, "radius drifted to {r}");
}

#[test]
fn momentum_is_conserved() {
    let p = test_params();
    let forces = gravity_set(&p);
    let mut s = three_body_scenario();
    let p0 = s.total_momentum();

    for _ in 0..1000 {
        euler_integrator(&mut s, &forces, &p).unwrap();
    }
    assert!((s.total_momentum() - p0).norm() < 1e-9);
}

#[test]
fn sun_earth_default_is_roughly_circular() {
    let s = Scenario::sun_earth();
    let p = Parameters::new(1000.0, 6.67408e-11, 1e-3).unwrap();
    let forces = gravity_set(&p);
    let mut s2 = s.clone();
    let r0 = distance(&s, 0, 1);

    // about 11.5 days
    for _ in 0..1000 {
        euler_integrator(&mut s2, &forces, &p).unwrap();
    }
    let r = distance(&s2, 0, 1);
    assert!((r - r0).abs() / r0 < 1e-2);
    assert_eq!(s.max_extent(), 149.6e9);
}
