//! Governing equations of the isothermal 1D cell, written as a DAE residual
//! `F(t, y, y') = 0` over the three-region grid.
//!
//! Five quantities are tracked at every node, interleaved node-major so that
//! nearest-neighbor coupling stays inside a fixed band:
//!
//! | var | symbol | meaning                                   |
//! |-----|--------|-------------------------------------------|
//! | 0   | c      | electrolyte concentration       [mol/m^3] |
//! | 1   | phi1   | solid-phase potential           [V]       |
//! | 2   | phi2   | electrolyte potential           [V]       |
//! | 3   | j      | pore-wall flux                  [mol/m^2 s] |
//! | 4   | c_s    | solid surface concentration     [mol/m^3] |
//!
//! `c` obeys a diffusion equation with a reaction source, `c_s` a surface
//! species balance; both are differential. `phi1`, `phi2` and `j` obey
//! instantaneous conservation/kinetics closures and are algebraic. Quantities
//! that do not exist in the separator (`phi1`, `j`, `c_s`) are pinned to zero
//! there.

use nalgebra::DVector;
use num_dual::{DualDVec64, DualNum};

use crate::discretization::CellGrid;
use crate::parameters::defaults;
use crate::parameters::ValidatedParameters;
use crate::physics::correlations::{electrolyte_conductivity, ocp_anode, ocp_cathode, safe_ln, safe_sqrt};
use crate::physics::{CELL_TEMPERATURE, FARADAY, GAS_CONSTANT, TRANSFERENCE_NUMBER};

pub const N_FIELDS: usize = 5;
pub const FIELD_NAMES: [&str; N_FIELDS] = ["c", "phi1", "phi2", "j", "c_s"];

/// Variable offsets within a node's block of the state vector.
pub mod var {
    pub const C: usize = 0;
    pub const PHI1: usize = 1;
    pub const PHI2: usize = 2;
    pub const J: usize = 3;
    pub const C_S: usize = 4;
}

/// Precomputed per-electrode coefficients, derived once from the validated
/// parameters so residual evaluation never touches the form layer.
#[derive(Debug, Clone)]
pub struct ElectrodeCoeffs {
    pub eps: f64,
    pub sigma_eff: f64,
    pub diff_eff: f64,
    pub diff_solid: f64,
    pub k: f64,
    pub radius: f64,
    pub c_s_max: f64,
    pub c_s_init: f64,
    pub interfacial_area: f64,
    /// Inverse grid spacing of the region.
    pub coeff: f64,
}

#[derive(Debug, Clone)]
pub struct SeparatorCoeffs {
    pub eps: f64,
    pub diff_eff: f64,
    pub coeff: f64,
}

fn electrode_coeffs(
    materials: &crate::parameters::validate::RegionMaterials,
    c_s_max: f64,
    stoichiometry: f64,
    dx: f64,
) -> ElectrodeCoeffs {
    let radius = defaults::PARTICLE_RADIUS;
    ElectrodeCoeffs {
        eps: materials.porosity,
        sigma_eff: materials.conductivity * (1.0 - materials.porosity),
        diff_eff: materials.diffusion_coeff * materials.porosity.powf(crate::physics::BRUGGEMAN),
        diff_solid: materials.solid_diffusion_coeff,
        k: materials.reaction_constant,
        radius,
        c_s_max,
        c_s_init: c_s_max * stoichiometry,
        interfacial_area: 3.0 * (1.0 - materials.porosity) / radius,
        coeff: 1.0 / dx,
    }
}

/// The complete residual evaluator: grid, per-region coefficients and the
/// applied current, with no reference back to the form layer.
#[derive(Debug, Clone)]
pub struct CellPhysics {
    pub grid: CellGrid,
    pub anode: ElectrodeCoeffs,
    pub separator: SeparatorCoeffs,
    pub cathode: ElectrodeCoeffs,
    /// Applied current density, signed. [A/m^2]
    pub current_density: f64,
    /// Initial electrolyte concentration. [mol/m^3]
    pub c_init: f64,
}

impl CellPhysics {
    pub fn new(params: &ValidatedParameters, grid: CellGrid) -> Self {
        let anode = electrode_coeffs(
            &params.anode,
            defaults::ANODE_MAX_SOLID_CONCENTRATION,
            defaults::ANODE_INITIAL_STOICHIOMETRY,
            grid.dx_anode,
        );
        let cathode = electrode_coeffs(
            &params.cathode,
            defaults::CATHODE_MAX_SOLID_CONCENTRATION,
            defaults::CATHODE_INITIAL_STOICHIOMETRY,
            grid.dx_cathode,
        );
        let separator = SeparatorCoeffs {
            eps: defaults::SEPARATOR_POROSITY,
            diff_eff: params.separator.diffusion_coeff
                * defaults::SEPARATOR_POROSITY.powf(crate::physics::BRUGGEMAN),
            coeff: 1.0 / grid.dx_separator,
        };
        Self {
            grid,
            anode,
            separator,
            cathode,
            current_density: params.current_density,
            c_init: defaults::INITIAL_ELECTROLYTE_CONCENTRATION,
        }
    }

    pub fn n_unknowns(&self) -> usize {
        self.grid.n_nodes * N_FIELDS
    }

    /// Equilibrium open-circuit potentials at the initial stoichiometry,
    /// used to seed the algebraic potentials.
    pub fn initial_ocps(&self) -> (f64, f64) {
        let soc_a = DualDVec64::from_re(self.anode.c_s_init / self.anode.c_s_max);
        let soc_c = DualDVec64::from_re(self.cathode.c_s_init / self.cathode.c_s_max);
        (ocp_anode(&soc_a).re, ocp_cathode(&soc_c).re)
    }

    /// Butler-Volmer pore-wall flux at one electrode node.
    fn butler_volmer(
        &self,
        el: &ElectrodeCoeffs,
        is_anode: bool,
        c: &DualDVec64,
        p1: &DualDVec64,
        p2: &DualDVec64,
        j: &DualDVec64,
        c_s: &DualDVec64,
    ) -> DualDVec64 {
        // Particle surface concentration, corrected for the flux through a
        // solid diffusion film of thickness r/5.
        let c_surf = c_s.clone() - j.clone() * (el.radius / (5.0 * el.diff_solid));
        let soc_surf = c_surf.clone() / el.c_s_max;
        let ocp = if is_anode {
            ocp_anode(&soc_surf)
        } else {
            ocp_cathode(&soc_surf)
        };
        let overpotential = p1.clone() - p2.clone() - ocp;
        let arg = overpotential * (0.5 * FARADAY / (GAS_CONSTANT * CELL_TEMPERATURE));
        safe_sqrt(c) * (2.0 * el.k) * arg.sinh() * (-c_surf + el.c_s_max)
    }

    /// Evaluate `F(t, y, y')`. Couplings reach at most one node left and
    /// right, so the Jacobian band is `2 * N_FIELDS - 1` on each side.
    pub fn residual(
        &self,
        _t: f64,
        y: &DVector<DualDVec64>,
        yp: &DVector<DualDVec64>,
    ) -> DVector<DualDVec64> {
        let n = self.grid.n_nodes;
        let sep = self.grid.sep_node;
        let cath = self.grid.cath_node;
        let last = n - 1;

        let two_rt_f =
            2.0 * GAS_CONSTANT * CELL_TEMPERATURE / FARADAY * (1.0 - TRANSFERENCE_NUMBER);
        let current = self.current_density;

        let idx = |node: usize, v: usize| node * N_FIELDS + v;
        let mut res = DVector::from_element(self.n_unknowns(), DualDVec64::from_re(0.0));

        for i in 0..n {
            let c = &y[idx(i, var::C)];
            let p1 = &y[idx(i, var::PHI1)];
            let p2 = &y[idx(i, var::PHI2)];
            let j = &y[idx(i, var::J)];
            let c_s = &y[idx(i, var::C_S)];
            let cp = &yp[idx(i, var::C)];
            let c_sp = &yp[idx(i, var::C_S)];

            // -- electrolyte concentration ------------------------------
            res[idx(i, var::C)] = if i == 0 {
                y[idx(1, var::C)].clone() - c.clone()
            } else if i < sep {
                let a = &self.anode;
                cp.clone() * a.eps
                    - (&y[idx(i + 1, var::C)] + &y[idx(i - 1, var::C)] - c.clone() * 2.0)
                        * (a.diff_eff * a.coeff * a.coeff)
                    - j.clone() * (a.interfacial_area * (1.0 - TRANSFERENCE_NUMBER))
            } else if i == sep {
                (&y[idx(i + 1, var::C)] - c) * (self.separator.diff_eff * self.separator.coeff)
                    - (c - &y[idx(i - 1, var::C)]) * (self.anode.diff_eff * self.anode.coeff)
            } else if i < cath {
                let s = &self.separator;
                cp.clone() * s.eps
                    - (&y[idx(i + 1, var::C)] + &y[idx(i - 1, var::C)] - c.clone() * 2.0)
                        * (s.diff_eff * s.coeff * s.coeff)
            } else if i == cath {
                (&y[idx(i + 1, var::C)] - c) * (self.cathode.diff_eff * self.cathode.coeff)
                    - (c - &y[idx(i - 1, var::C)]) * (self.separator.diff_eff * self.separator.coeff)
            } else if i < last {
                let ca = &self.cathode;
                cp.clone() * ca.eps
                    - (&y[idx(i + 1, var::C)] + &y[idx(i - 1, var::C)] - c.clone() * 2.0)
                        * (ca.diff_eff * ca.coeff * ca.coeff)
                    - j.clone() * (ca.interfacial_area * (1.0 - TRANSFERENCE_NUMBER))
            } else {
                c.clone() - &y[idx(i - 1, var::C)]
            };

            // -- solid-phase potential ----------------------------------
            res[idx(i, var::PHI1)] = if i == 0 {
                // Reference electrode: the anode collector is ground.
                p1.clone()
            } else if i < sep {
                let a = &self.anode;
                (&y[idx(i + 1, var::PHI1)] + &y[idx(i - 1, var::PHI1)] - p1.clone() * 2.0)
                    * (a.sigma_eff * a.coeff * a.coeff)
                    - j.clone() * (a.interfacial_area * FARADAY)
            } else if i == sep {
                p1.clone() - &y[idx(i - 1, var::PHI1)]
            } else if i < cath {
                p1.clone()
            } else if i == cath {
                y[idx(i + 1, var::PHI1)].clone() - p1.clone()
            } else if i < last {
                let ca = &self.cathode;
                (&y[idx(i + 1, var::PHI1)] + &y[idx(i - 1, var::PHI1)] - p1.clone() * 2.0)
                    * (ca.sigma_eff * ca.coeff * ca.coeff)
                    - j.clone() * (ca.interfacial_area * FARADAY)
            } else {
                // Current-carrying collector.
                (p1 - &y[idx(i - 1, var::PHI1)]) * self.cathode.coeff
                    + current / self.cathode.sigma_eff
            };

            // -- electrolyte potential ----------------------------------
            res[idx(i, var::PHI2)] = if i == 0 {
                y[idx(1, var::PHI2)].clone() - p2.clone()
            } else if i == sep {
                let kap_s = electrolyte_conductivity(c, self.separator.eps);
                let kap_a = electrolyte_conductivity(c, self.anode.eps);
                (&y[idx(i + 1, var::PHI2)] - p2) * kap_s * self.separator.coeff
                    - (p2 - &y[idx(i - 1, var::PHI2)]) * kap_a * self.anode.coeff
            } else if i == cath {
                let kap_c = electrolyte_conductivity(c, self.cathode.eps);
                let kap_s = electrolyte_conductivity(c, self.separator.eps);
                (&y[idx(i + 1, var::PHI2)] - p2) * kap_c * self.cathode.coeff
                    - (p2 - &y[idx(i - 1, var::PHI2)]) * kap_s * self.separator.coeff
            } else if i == last {
                p2.clone() - &y[idx(i - 1, var::PHI2)]
            } else {
                let (eps, coeff, area) = if i < sep {
                    (self.anode.eps, self.anode.coeff, self.anode.interfacial_area)
                } else if i < cath {
                    (self.separator.eps, self.separator.coeff, 0.0)
                } else {
                    (self.cathode.eps, self.cathode.coeff, self.cathode.interfacial_area)
                };
                let kappa = electrolyte_conductivity(c, eps);
                let lap_p2 =
                    &y[idx(i + 1, var::PHI2)] + &y[idx(i - 1, var::PHI2)] - p2.clone() * 2.0;
                let lap_ln_c = safe_ln(&y[idx(i + 1, var::C)]) + safe_ln(&y[idx(i - 1, var::C)])
                    - safe_ln(c) * 2.0;
                (lap_p2 - lap_ln_c * two_rt_f) * kappa * (coeff * coeff)
                    + j.clone() * (area * FARADAY)
            };

            // -- pore-wall flux -----------------------------------------
            res[idx(i, var::J)] = if i <= sep {
                j.clone() - self.butler_volmer(&self.anode, true, c, p1, p2, j, c_s)
            } else if i < cath {
                j.clone()
            } else {
                j.clone() - self.butler_volmer(&self.cathode, false, c, p1, p2, j, c_s)
            };

            // -- solid surface concentration ----------------------------
            res[idx(i, var::C_S)] = if i <= sep {
                c_sp.clone() + j.clone() * (3.0 / self.anode.radius)
            } else if i < cath {
                c_s.clone()
            } else {
                c_sp.clone() + j.clone() * (3.0 / self.cathode.radius)
            };
        }

        res
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discretization::CellGrid;
    use crate::parameters::{ParameterSet, ValidatedParameters};

    fn default_physics(n_nodes: usize) -> CellPhysics {
        let mut set = ParameterSet::new();
        set.use_default_geometry = true;
        set.set(crate::parameters::FieldId::SimulationDuration, "3600")
            .unwrap();
        set.set(crate::parameters::FieldId::CurrentDensity, "2.0")
            .unwrap();
        let params = ValidatedParameters::from_set(&set).unwrap();
        let grid = CellGrid::build(
            params.anode_width,
            params.separator_width,
            params.cathode_width,
            n_nodes,
        )
        .unwrap();
        CellPhysics::new(&params, grid)
    }

    /// Rest state (uniform concentrations, potentials at equilibrium, zero
    /// flux) must zero every residual row except the current-carrying
    /// collector row.
    #[test]
    fn rest_state_is_consistent_up_to_the_applied_current() {
        let phys = default_physics(31);
        let n = phys.grid.n_nodes;
        let (u_a, u_c) = phys.initial_ocps();

        let mut y0 = vec![0.0; phys.n_unknowns()];
        for i in 0..n {
            let region = phys.grid.region_of(i);
            y0[i * N_FIELDS + var::C] = phys.c_init;
            y0[i * N_FIELDS + var::PHI2] = -u_a;
            match region {
                crate::discretization::Region::Anode => {
                    y0[i * N_FIELDS + var::C_S] = phys.anode.c_s_init;
                }
                crate::discretization::Region::Separator => {}
                crate::discretization::Region::Cathode => {
                    y0[i * N_FIELDS + var::PHI1] = u_c - u_a;
                    y0[i * N_FIELDS + var::C_S] = phys.cathode.c_s_init;
                }
            }
        }
        let y = DVector::from_vec(y0.iter().map(|&x| DualDVec64::from_re(x)).collect());
        let yp = DVector::from_element(phys.n_unknowns(), DualDVec64::from_re(0.0));
        let res = phys.residual(0.0, &y, &yp);

        let collector = (n - 1) * N_FIELDS + var::PHI1;
        for (slot, r) in res.iter().enumerate() {
            if slot == collector {
                assert!(
                    (r.re - phys.current_density / phys.cathode.sigma_eff).abs() < 1e-9,
                    "collector row should carry the applied current, got {}",
                    r.re
                );
            } else {
                assert!(
                    r.re.abs() < 1e-9,
                    "row {slot} expected consistent at rest, got {}",
                    r.re
                );
            }
        }
    }

    #[test]
    fn residual_dimension_matches_layout() {
        let phys = default_physics(31);
        let y = DVector::from_element(phys.n_unknowns(), DualDVec64::from_re(1.0));
        let yp = DVector::from_element(phys.n_unknowns(), DualDVec64::from_re(0.0));
        assert_eq!(phys.residual(0.0, &y, &yp).len(), phys.n_unknowns());
    }
}
