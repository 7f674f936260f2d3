//! Fixed-step time integrators
//!
//! Provides the semi-implicit Euler step (the default) and a velocity-Verlet
//! step, both driven by `AccelSet` and `Parameters`. Neither touches elapsed
//! time; the controller owns that.

use super::forces::AccelSet;
use super::params::{check_time_step, Parameters};
use super::scenario::Scenario;
use crate::configuration::config::IntegratorConfig;
use crate::error::SimResult;

/// Advance the scenario by one step with the integrator selected in `kind`
pub fn integrate(
    kind: IntegratorConfig,
    scenario: &mut Scenario,
    forces: &AccelSet,
    params: &Parameters,
) -> SimResult<()> {
    match kind {
        IntegratorConfig::SemiImplicitEuler => euler_integrator(scenario, forces, params),
        IntegratorConfig::VelocityVerlet => verlet_integrator(scenario, forces, params),
    }
}

/// Advance the scenario by one step using semi-implicit (symplectic) Euler:
///
/// v_n+1 = v_n + dt * a(x_n)
/// x_n+1 = x_n + dt * v_n+1
///
/// All accelerations are computed from the pre-step positions before any body
/// is written, so the result does not depend on body ordering.
pub fn euler_integrator(scenario: &mut Scenario, forces: &AccelSet, params: &Parameters) -> SimResult<()> {
    check_time_step(params.dt)?;
    if scenario.is_empty() {
        return Ok(());
    }
    let dt = params.dt;

    // a[i] holds a_n for body i, from one consistent snapshot
    let a = forces.accels(scenario);

    for (b, a) in scenario.bodies_mut().iter_mut().zip(a.iter()) {
        b.v += dt * *a;
        b.x += dt * b.v;
    }
    Ok(())
}

/// Advance the scenario by one step using velocity-Verlet (kick-drift-kick).
/// Two force evaluations per step.
pub fn verlet_integrator(scenario: &mut Scenario, forces: &AccelSet, params: &Parameters) -> SimResult<()> {
    check_time_step(params.dt)?;
    if scenario.is_empty() {
        return Ok(());
    }
    let dt = params.dt;
    let half_dt = 0.5 * dt;

    // Kick: v_n+1/2 = v_n + (dt/2) * a_n
    let a_old = forces.accels(scenario);
    for (b, a) in scenario.bodies_mut().iter_mut().zip(a_old.iter()) {
        b.v += half_dt * *a;
    }

    // Drift: x_n+1 = x_n + dt * v_n+1/2
    for b in scenario.bodies_mut().iter_mut() {
        b.x += dt * b.v;
    }

    // Kick: v_n+1 = v_n+1/2 + (dt/2) * a_n+1
    let a_new = forces.accels(scenario);
    for (b, a) in scenario.bodies_mut().iter_mut().zip(a_new.iter()) {
        b.v += half_dt * *a;
    }
    Ok(())
}
