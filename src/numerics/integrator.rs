//! Implicit time integration of the cell DAE.

use nalgebra::DVector;
use num_dual::DualDVec64;
use thiserror::Error;

use crate::numerics::newton::{NewtonSolver, SolverError};
use crate::numerics::DaeSystem;

/// One accepted step.
pub struct StepReport {
    pub time: f64,
    pub state: DVector<f64>,
    pub newton_iterations: u32,
}

/// Typed failure codes of the integration contract.
#[derive(Debug, Error)]
pub enum StepFailure {
    #[error("nonlinear corrector failed to converge at t = {time:.6e}")]
    ConvergenceFailure { time: f64 },
    #[error("step size underflow at t = {time:.6e} (dt = {dt:.3e})")]
    MinimumStepReached { time: f64, dt: f64 },
    #[error("residual produced non-finite values at t = {time:.6e}")]
    NonFiniteResidual { time: f64 },
}

/// Contract between [`super::SolveSession`] and whichever implicit DAE
/// integrator drives the run. `initialize` must leave the algebraic
/// unknowns consistent with the constraints at t = 0; each `advance` moves
/// time strictly forward and never past the system's end time.
pub trait DaeIntegrator {
    fn initialize(&mut self, system: &dyn DaeSystem) -> Result<(), SolverError>;
    fn advance(&mut self, system: &dyn DaeSystem) -> Result<StepReport, StepFailure>;
    fn time(&self) -> f64;
    fn state(&self) -> &DVector<f64>;
}

/// Backward-Euler integrator with a full-Newton corrector and simple
/// adaptive step control: grow on success, halve on rejection, fail when
/// the step underflows.
pub struct BdfIntegrator {
    pub dt_init: f64,
    pub dt_min: f64,
    pub dt_max: f64,
    pub growth: f64,
    pub shrink: f64,
    pub newton: NewtonSolver,
    pub logging: bool,

    t: f64,
    dt: f64,
    y: DVector<f64>,
}

impl Default for BdfIntegrator {
    fn default() -> Self {
        Self {
            dt_init: 1e-3,
            dt_min: 1e-9,
            dt_max: 60.0,
            growth: 1.5,
            shrink: 0.5,
            newton: NewtonSolver::default(),
            logging: false,
            t: 0.0,
            dt: 1e-3,
            y: DVector::zeros(0),
        }
    }
}

impl BdfIntegrator {
    /// Cap the adaptive step size.
    pub fn with_max_step(mut self, dt_max: f64) -> Self {
        self.dt_max = dt_max;
        self
    }

    /// Override the first attempted step size.
    pub fn with_initial_step(mut self, dt_init: f64) -> Self {
        self.dt_init = dt_init;
        self.dt = dt_init;
        self
    }

    /// Solve the algebraic rows for the algebraic slots at t = 0, holding
    /// the differential slots at their prescribed initial values. The
    /// algebraic rows and slots coincide in this collocated layout, so the
    /// reduced system is square.
    fn correct_initial_conditions(&mut self, system: &dyn DaeSystem) -> Result<u32, SolverError> {
        let n = system.dim();
        let mask = system.differential_mask().to_vec();
        let algebraic: Vec<usize> = (0..n).filter(|&i| !mask[i]).collect();
        if algebraic.is_empty() {
            return Ok(0);
        }

        let frozen = self.y.clone();
        let slots = algebraic.clone();
        let embed = move |z: DVector<DualDVec64>| {
            let mut full: Vec<DualDVec64> =
                frozen.iter().map(|&x| DualDVec64::from_re(x)).collect();
            for (k, &slot) in slots.iter().enumerate() {
                full[slot] = z[k].clone();
            }
            let full = DVector::from_vec(full);
            let yp = DVector::from_element(n, DualDVec64::from_re(0.0));
            let r = system.residual(0.0, &full, &yp);
            DVector::from_iterator(slots.len(), slots.iter().map(|&s| r[s].clone()))
        };

        let guess =
            DVector::from_iterator(algebraic.len(), algebraic.iter().map(|&i| self.y[i]));
        let result = self.newton.solve(embed, guess, self.logging)?;

        for (k, &slot) in algebraic.iter().enumerate() {
            self.y[slot] = result.solution[k];
        }
        Ok(result.iterations)
    }
}

impl DaeIntegrator for BdfIntegrator {
    fn initialize(&mut self, system: &dyn DaeSystem) -> Result<(), SolverError> {
        self.t = 0.0;
        self.dt = self.dt_init;
        self.newton.tolerances = system.tolerances();
        self.y = system.initial_state();

        let iterations = self.correct_initial_conditions(system)?;
        if self.logging && iterations > 0 {
            println!(
                "Initial condition correction converged in {} iterations",
                iterations
            );
        }
        Ok(())
    }

    fn advance(&mut self, system: &dyn DaeSystem) -> Result<StepReport, StepFailure> {
        let t_end = system.end_time();

        loop {
            let hit_end = self.t + self.dt >= t_end;
            let dt = if hit_end { t_end - self.t } else { self.dt };
            let t_new = if hit_end { t_end } else { self.t + dt };

            let y_prev = self.y.clone();
            let inv_dt = DualDVec64::from_re(1.0 / dt);
            let n = system.dim();
            let step_residual = |y_dual: DVector<DualDVec64>| {
                let y_prev_dual = DVector::from_iterator(
                    n,
                    y_prev.iter().map(|&x| DualDVec64::from_re(x)),
                );
                let yp = (&y_dual - y_prev_dual) * inv_dt.clone();
                system.residual(t_new, &y_dual, &yp)
            };

            match self.newton.solve(step_residual, self.y.clone(), false) {
                Ok(result) => {
                    self.t = t_new;
                    self.y = result.solution;
                    if !hit_end {
                        self.dt = (self.dt * self.growth).min(self.dt_max);
                    }
                    return Ok(StepReport {
                        time: self.t,
                        state: self.y.clone(),
                        newton_iterations: result.iterations,
                    });
                }
                Err(SolverError::NonFiniteResidual) => {
                    return Err(StepFailure::NonFiniteResidual { time: self.t });
                }
                Err(_) => {
                    // Shrink from the step actually attempted, or a clamped
                    // final step would retry itself forever.
                    self.dt = dt * self.shrink;
                    if self.logging {
                        println!(
                            "  step rejected at t = {:.4e}, retrying with dt = {:.3e}",
                            self.t, self.dt
                        );
                    }
                    if self.dt < self.dt_min {
                        return Err(StepFailure::MinimumStepReached {
                            time: self.t,
                            dt: self.dt,
                        });
                    }
                }
            }
        }
    }

    fn time(&self) -> f64 {
        self.t
    }

    fn state(&self) -> &DVector<f64> {
        &self.y
    }
}
