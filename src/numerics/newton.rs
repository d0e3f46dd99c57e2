//! Damped Newton iteration on a closure, with the Jacobian obtained by
//! forward-mode automatic differentiation.

use nalgebra::{DMatrix, DVector};
use num_dual::{jacobian, DualDVec64};
use thiserror::Error;

use crate::numerics::timing::{record_jacobian, record_linear_solve};
use crate::numerics::Tolerances;

pub struct NewtonSolver {
    pub max_iterations: u32,
    pub tolerances: Tolerances,
    /// Smallest line-search step before the iteration gives up.
    pub min_step_size: f64,
    /// Sufficient-decrease parameter of the backtracking line search.
    pub armijo_param: f64,
}

impl Default for NewtonSolver {
    fn default() -> Self {
        Self {
            max_iterations: 25,
            tolerances: Tolerances::default(),
            min_step_size: 1e-3,
            armijo_param: 1e-4,
        }
    }
}

#[derive(Debug, Error)]
pub enum SolverError {
    #[error("linear solve failed")]
    LinearSolveFailed,
    #[error("Newton's method failed to converge")]
    NonConvergence,
    #[error("residual evaluation produced non-finite values")]
    NonFiniteResidual,
}

#[derive(Debug)]
pub struct SolverResult {
    pub solution: DVector<f64>,
    pub iterations: u32,
    pub final_residual: f64,
}

impl NewtonSolver {
    /// Solve `f(u) = 0` starting from `initial_guess`.
    ///
    /// Converged when the weighted-RMS norm of the Newton update drops below
    /// one; each accepted iterate must also decrease the residual 2-norm
    /// (Armijo backtracking).
    pub fn solve<F>(
        &self,
        f: F,
        initial_guess: DVector<f64>,
        logging: bool,
    ) -> Result<SolverResult, SolverError>
    where
        F: Fn(DVector<DualDVec64>) -> DVector<DualDVec64>,
    {
        let mut u = initial_guess;
        let n = u.len();

        if logging {
            println!("Newton: {} unknowns", n);
            println!("  iter |  residual  | step");
        }

        for i in 0..self.max_iterations {
            let (residual, mut jac) =
                record_jacobian(|| jacobian(|arg: DVector<DualDVec64>| f(arg), u.clone()));

            if !residual.iter().all(|x| x.is_finite()) {
                return Err(SolverError::NonFiniteResidual);
            }
            let res_norm = residual.norm();

            // Row equilibration by the diagonal keeps the wildly different
            // equation scales from spoiling the factorization.
            let mut rhs = -residual;
            for r in 0..n {
                let diag = jac[(r, r)];
                let scale = if diag.abs() < 1e-12 { 1.0 } else { 1.0 / diag };
                for c in 0..n {
                    jac[(r, c)] *= scale;
                }
                rhs[r] *= scale;
            }

            let delta = record_linear_solve(|| {
                jac.lu().solve(&rhs).ok_or(SolverError::LinearSolveFailed)
            })?;

            // Update-based convergence: the full step moves nothing beyond
            // its tolerance-weighted resolution.
            if self.tolerances.wrms(&delta, &u) < 1.0 {
                u += delta;
                let final_residual = self.residual_only(&f, &u).norm();
                if logging {
                    println!("  {:4} | {:.4e} | converged", i + 1, final_residual);
                }
                return Ok(SolverResult {
                    solution: u,
                    iterations: i + 1,
                    final_residual,
                });
            }

            // Backtracking line search on the residual 2-norm.
            let mut alpha = 1.0;
            let mut accepted = false;
            while alpha >= self.min_step_size {
                let candidate = &u + &delta * alpha;
                let cand_norm = self.residual_only(&f, &candidate).norm();
                if cand_norm.is_finite() && cand_norm <= (1.0 - self.armijo_param * alpha) * res_norm
                {
                    if logging {
                        println!("  {:4} | {:.4e} | alpha = {:.3}", i, cand_norm, alpha);
                    }
                    u = candidate;
                    accepted = true;
                    break;
                }
                alpha *= 0.5;
            }

            if !accepted {
                return Err(SolverError::NonConvergence);
            }
        }

        Err(SolverError::NonConvergence)
    }

    /// Residual vector without derivative bookkeeping.
    pub fn residual_only<F>(&self, f: &F, u: &DVector<f64>) -> DVector<f64>
    where
        F: Fn(DVector<DualDVec64>) -> DVector<DualDVec64>,
    {
        let u_dual =
            DVector::from_iterator(u.len(), u.iter().map(|&x| DualDVec64::from_re(x)));
        let r = f(u_dual);
        DVector::from_iterator(r.len(), r.iter().map(|x| x.re))
    }
}
