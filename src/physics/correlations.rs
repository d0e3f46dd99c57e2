//! Empirical material correlations, evaluated on AD duals so the Jacobian
//! sees through them.

use num_dual::{DualDVec64, DualNum};

use crate::physics::BRUGGEMAN;

/// Logarithm clamped to zero below the domain, so a transient excursion to a
/// non-physical concentration degrades the residual instead of poisoning it.
pub fn safe_ln(x: &DualDVec64) -> DualDVec64 {
    if x.re <= 0.0 {
        DualDVec64::from_re(0.0)
    } else {
        x.ln()
    }
}

/// Square root with the same clamping convention as [`safe_ln`].
pub fn safe_sqrt(x: &DualDVec64) -> DualDVec64 {
    if x.re <= 0.0 {
        DualDVec64::from_re(0.0)
    } else {
        x.sqrt()
    }
}

/// Effective ionic conductivity of the electrolyte at concentration `c`
/// [mol/m^3] in a medium of porosity `eps`. [S/m]
pub fn electrolyte_conductivity(c: &DualDVec64, eps: f64) -> DualDVec64 {
    let polynomial = c.clone() * 5.007e-4 - c.powi(2) * 4.7212e-7 + c.powi(3) * 1.5094e-10
        - c.powi(4) * 1.6018e-14
        + 4.1253e-2;
    polynomial * eps.powf(BRUGGEMAN)
}

/// Open-circuit potential of the negative electrode at solid stoichiometry
/// `soc` = c_s / c_s,max. Exponential graphite correlation; monotone and
/// pole-free over the whole stoichiometry window. [V]
pub fn ocp_anode(soc: &DualDVec64) -> DualDVec64 {
    (soc.clone() * -3.0).exp() * 1.32 + (soc.clone() * -2000.0).exp() * 10.0 - 0.16
}

/// Open-circuit potential of the positive electrode at solid stoichiometry
/// `soc` = c_s / c_s,max. [V]
pub fn ocp_cathode(soc: &DualDVec64) -> DualDVec64 {
    let pow10 = |x: DualDVec64| (x * std::f64::consts::LN_10).exp();

    soc.clone() * 0.1387 + safe_sqrt(soc) * 0.029 - soc.recip() * 0.0172
        + soc.powf(-1.5) * 0.0019
        + pow10(soc.clone() * -15.0 + 0.90) * 0.2808
        - pow10(soc.clone() * 0.4465 - 0.4108) * 0.7984
        + 0.7222
}

#[cfg(test)]
mod tests {
    use super::*;

    fn re(x: f64) -> DualDVec64 {
        DualDVec64::from_re(x)
    }

    #[test]
    fn conductivity_is_positive_at_reference_concentration() {
        let kappa = electrolyte_conductivity(&re(1000.0), 0.724);
        assert!(kappa.re > 0.0, "kappa = {}", kappa.re);
        assert!(kappa.re < 1.0);
    }

    #[test]
    fn conductivity_scales_down_with_porosity() {
        let dense = electrolyte_conductivity(&re(1000.0), 0.724).re;
        let tight = electrolyte_conductivity(&re(1000.0), 0.326).re;
        assert!(tight < dense);
    }

    #[test]
    fn open_circuit_potentials_are_finite_at_initial_stoichiometry() {
        let ua = ocp_anode(&re(0.4955)).re;
        let uc = ocp_cathode(&re(0.8551)).re;
        assert!(ua.is_finite());
        assert!(uc.is_finite());
    }

    #[test]
    fn anode_ocp_is_monotone_over_the_operating_window() {
        let mut prev = ocp_anode(&re(0.05)).re;
        for i in 1..=90 {
            let s = 0.05 + i as f64 * 0.01;
            let u = ocp_anode(&re(s)).re;
            assert!(u.is_finite());
            assert!(u < prev, "ocp_anode must decrease, failed at soc = {s}");
            prev = u;
        }
    }

    #[test]
    fn guarded_functions_clamp_below_domain() {
        assert_eq!(safe_ln(&re(-1.0)).re, 0.0);
        assert_eq!(safe_sqrt(&re(-1.0)).re, 0.0);
        assert!((safe_ln(&re(std::f64::consts::E)).re - 1.0).abs() < 1e-12);
        assert!((safe_sqrt(&re(4.0)).re - 2.0).abs() < 1e-12);
    }
}
