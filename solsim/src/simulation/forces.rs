//! Force / acceleration contributors for the engine
//!
//! Defines the acceleration trait, the set that sums contributors, and
//! direct Newtonian gravity with a coincidence guard

use crate::simulation::scenario::Scenario;
use crate::simulation::states::NVec2;

/// Collection of acceleration terms
/// Each term implements [`Acceleration`] and their contributions are summed
/// into a single acceleration vector per body
pub struct AccelSet {
    terms: Vec<Box<dyn Acceleration + Send + Sync>>,
}

impl Default for AccelSet {
    fn default() -> Self {
        Self::new()
    }
}

impl AccelSet {
    /// Create an empty acceleration set
    pub fn new() -> Self {
        Self {
            terms: Vec::new()
        }
    }

    /// Add an acceleration term
    pub fn with<T>(mut self, term: T) -> Self
    where
        T: Acceleration + Send + Sync + 'static,
    {
        self.terms.push(Box::new(term));
        self
    }

    /// Compute total accelerations for all bodies in `scenario`
    /// - `out[i]` will be set to the sum of contributions from all terms
    /// - reads `scenario` only, so every body sees the same pre-step snapshot
    pub fn accumulate_accels(&self, scenario: &Scenario, out: &mut [NVec2]) {
        // Zero buffer
        for a in out.iter_mut() {
            *a = NVec2::zeros();
        }
        for term in &self.terms {
            term.acceleration(scenario, out);
        }
    }

    /// Allocate and fill an acceleration buffer, one entry per body
    pub fn accels(&self, scenario: &Scenario) -> Vec<NVec2> {
        let mut out = vec![NVec2::zeros(); scenario.len()];
        self.accumulate_accels(scenario, &mut out);
        out
    }
}

/// Trait for acceleration sources operating on a [`Scenario`]
/// Implementations add their contribution into `out[i]` for each body
pub trait Acceleration {
    fn acceleration(&self, scenario: &Scenario, out: &mut [NVec2]);
}

/// Newtonian gravity, no softening
///
/// A pair closer than `epsilon` contributes nothing to either body. This is a
/// deliberate policy: coincident bodies would otherwise hit the singular
/// `1/d^2` term and poison the whole state with infinities.
#[allow(non_snake_case)]
pub struct NewtonianGravity {
    pub G: f64, // gravitational constant
    pub epsilon: f64, // coincidence guard distance
}

impl Acceleration for NewtonianGravity {
    fn acceleration(&self, scenario: &Scenario, out: &mut [NVec2]) {
        let bodies = scenario.bodies();
        let n = bodies.len();

        // Each unordered pair (i, j) with i < j feeds both bodies
        for i in 0..n {
            let bi = &bodies[i];

            for j in (i + 1)..n {
                let bj = &bodies[j];

                // r points from i to j: i is pulled along +r, j along -r
                let r = bj.x - bi.x;
                let d = r.norm();

                if d < self.epsilon {
                    log::trace!("bodies {i} and {j} within {} of each other, skipping pair", self.epsilon);
                    continue;
                }

                // G / d^3, so that coef * r has magnitude G / d^2
                let coef = self.G / (d * d * d);

                out[i] += coef * bj.m * r;
                out[j] -= coef * bi.m * r;
            }
        }
    }
}
