use nalgebra::DVector;
use num_dual::DualDVec64;

use licell_rs::discretization::GridError;
use licell_rs::numerics::{DaeSystem, SolverProblem};
use licell_rs::parameters::{FieldId, ParameterSet, ValidatedParameters};
use licell_rs::physics::N_FIELDS;

fn default_params() -> ValidatedParameters {
    let mut set = ParameterSet::new();
    set.set(FieldId::SimulationDuration, "3600").unwrap();
    set.set(FieldId::CurrentDensity, "-10").unwrap();
    set.use_default_geometry = true;
    ValidatedParameters::from_set(&set).unwrap()
}

#[test]
fn build_is_deterministic() {
    let a = SolverProblem::build(default_params(), 31).unwrap();
    let b = SolverProblem::build(default_params(), 31).unwrap();
    assert_eq!(a.y0, b.y0);
    assert_eq!(a.layout, b.layout);
    assert_eq!(a.half_bandwidths(), b.half_bandwidths());
}

#[test]
fn bandwidths_are_independent_of_resolution() {
    let small = SolverProblem::build(default_params(), 31).unwrap();
    let large = SolverProblem::build(default_params(), 62).unwrap();
    assert_eq!(small.half_bandwidths(), (2 * N_FIELDS - 1, 2 * N_FIELDS - 1));
    assert_eq!(small.half_bandwidths(), large.half_bandwidths());
}

#[test]
fn unknown_counts_scale_with_resolution() {
    let small = SolverProblem::build(default_params(), 31).unwrap();
    let large = SolverProblem::build(default_params(), 62).unwrap();
    assert_eq!(small.dim(), 31 * N_FIELDS);
    assert_eq!(large.dim(), 62 * N_FIELDS);

    // Doubling the node count roughly doubles the differential vector; the
    // deviation comes only from the fixed boundary/interface rows.
    let ratio = large.layout.n_differential() as f64 / small.layout.n_differential() as f64;
    assert!((1.8..=2.2).contains(&ratio), "ratio = {ratio}");
}

#[test]
fn split_partitions_every_slot() {
    let problem = SolverProblem::build(default_params(), 31).unwrap();
    let (diff, alg) = problem.layout.split(&problem.y0);
    assert_eq!(diff.len(), problem.layout.n_differential());
    assert_eq!(alg.len(), problem.layout.n_algebraic());
    assert_eq!(diff.len() + alg.len(), problem.dim());
}

#[test]
fn mass_coefficients_follow_the_mask() {
    let problem = SolverProblem::build(default_params(), 31).unwrap();
    for (slot, &is_diff) in problem.differential_mask().iter().enumerate() {
        let mass = problem.mass_coefficients()[slot];
        if is_diff {
            assert!(mass > 0.0, "differential slot {slot} has no storage");
        } else {
            assert_eq!(mass, 0.0, "algebraic slot {slot} has storage");
        }
    }
}

#[test]
fn too_coarse_a_grid_is_invalid_discretization() {
    let err = SolverProblem::build(default_params(), 3).unwrap_err();
    assert!(matches!(err, GridError::InvalidDiscretization { nodes: 3 }));
}

/// The banded-Jacobian guarantee: every nonzero of dF/dy stays within the
/// advertised half-bandwidths.
#[test]
fn jacobian_nonzeros_stay_inside_the_band() {
    let problem = SolverProblem::build(default_params(), 24).unwrap();
    let n = problem.dim();
    let (lower, upper) = problem.half_bandwidths();

    let yp_zero = DVector::from_element(n, DualDVec64::from_re(0.0));
    let (_, jac) = num_dual::jacobian(
        |y: DVector<DualDVec64>| problem.residual(0.0, &y, &yp_zero),
        problem.y0.clone(),
    );

    for r in 0..n {
        for c in 0..n {
            let inside = c + lower >= r && r + upper >= c;
            if !inside {
                assert_eq!(
                    jac[(r, c)],
                    0.0,
                    "entry ({r}, {c}) lies outside the ({lower}, {upper}) band"
                );
            }
        }
    }
}
