//! The ordered body collection being simulated
//!
//! A `Scenario` is built once per load (from a scenario file, from inline
//! config bodies, or from the built-in default) and is only ever replaced
//! wholesale. Bodies are never added or removed while a run is in progress,
//! so indices stay stable and can be used to name the tracked body.

use crate::configuration::config::BodyConfig;
use crate::error::SimResult;
use crate::simulation::states::{Body, BodyKind, NVec2};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scenario {
    bodies: Vec<Body>,
}

impl Scenario {
    /// Wrap an already-validated list of bodies. Zero bodies is accepted.
    pub fn new(bodies: Vec<Body>) -> Self {
        if bodies.is_empty() {
            log::warn!("scenario has no bodies; stepping it is a no-op");
        }
        Self { bodies }
    }

    /// Map `BodyConfig` -> runtime `Body`, validating each one
    pub fn build_scenario(cfg: &[BodyConfig]) -> SimResult<Self> {
        let bodies = cfg
            .iter()
            .map(|bc| {
                Body::new(
                    bc.kind,
                    bc.m,
                    NVec2::new(bc.x[0], bc.x[1]),
                    NVec2::new(bc.v[0], bc.v[1]),
                    bc.radius,
                    bc.color.clone(),
                )
            })
            .collect::<SimResult<Vec<_>>>()?;
        Ok(Self::new(bodies))
    }

    /// Sun and Earth on a circular orbit, SI units
    pub fn sun_earth() -> Self {
        const SUN_MASS: f64 = 1.98892e30;
        const EARTH_MASS: f64 = 5.9742e24;
        const EARTH_ORBIT: f64 = 149.6e9;
        const EARTH_SPEED: f64 = 29.783e3;

        let bodies = vec![
            Body {
                kind: BodyKind::Star,
                m: SUN_MASS,
                x: NVec2::zeros(),
                v: NVec2::zeros(),
                radius: 30.0,
                color: "red".to_string(),
            },
            Body {
                kind: BodyKind::Planet,
                m: EARTH_MASS,
                x: NVec2::new(EARTH_ORBIT, 0.0),
                v: NVec2::new(0.0, EARTH_SPEED),
                radius: 5.0,
                color: "blue".to_string(),
            },
        ];
        Self { bodies }
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    /// Mutable view for the integrator. The slice cannot grow or shrink.
    pub fn bodies_mut(&mut self) -> &mut [Body] {
        &mut self.bodies
    }

    pub fn get(&self, index: usize) -> Option<&Body> {
        self.bodies.get(index)
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn into_bodies(self) -> Vec<Body> {
        self.bodies
    }

    // =====================================================================================
    // Diagnostics
    // =====================================================================================

    /// Largest |x| or |y| over all bodies; the viewer derives its scale from this
    pub fn max_extent(&self) -> f64 {
        self.bodies
            .iter()
            .map(|b| b.x.x.abs().max(b.x.y.abs()))
            .fold(0.0, f64::max)
    }

    /// Kinetic plus pairwise potential energy
    #[allow(non_snake_case)]
    pub fn total_energy(&self, G: f64) -> f64 {
        let kinetic: f64 = self.bodies.iter().map(Body::kinetic_energy).sum();

        let mut potential = 0.0;
        for (i, bi) in self.bodies.iter().enumerate() {
            for bj in &self.bodies[i + 1..] {
                let d = (bj.x - bi.x).norm();
                if d > 0.0 {
                    potential -= G * bi.m * bj.m / d;
                }
            }
        }
        kinetic + potential
    }

    pub fn total_momentum(&self) -> NVec2 {
        self.bodies
            .iter()
            .fold(NVec2::zeros(), |p, b| p + b.m * b.v)
    }

    /// z component of sum(m * x cross v) about the origin
    pub fn angular_momentum(&self) -> f64 {
        self.bodies
            .iter()
            .map(|b| b.m * (b.x.x * b.v.y - b.x.y * b.v.x))
            .sum()
    }
}

impl From<Vec<Body>> for Scenario {
    fn from(bodies: Vec<Body>) -> Self {
        Self::new(bodies)
    }
}
