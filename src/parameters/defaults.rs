//! Reference parameter tables and fixed cell constants.
//!
//! These are the library defaults applied when the user opts out of custom
//! geometry or materials. They describe a graphite | LiPF6 | LiCoO2 cell.

use crate::parameters::validate::{RegionMaterials, SeparatorMaterials};

/// Electrode widths, in meters.
pub const DEFAULT_ANODE_WIDTH: f64 = 80.0e-6;
pub const DEFAULT_SEPARATOR_WIDTH: f64 = 25.0e-6;
pub const DEFAULT_CATHODE_WIDTH: f64 = 88.0e-6;

pub const DEFAULT_ANODE: RegionMaterials = RegionMaterials {
    conductivity: 100.0,
    porosity: 0.385,
    diffusion_coeff: 7.5e-10,
    solid_diffusion_coeff: 1.0e-14,
    reaction_constant: 2.334e-11,
};

pub const DEFAULT_CATHODE: RegionMaterials = RegionMaterials {
    conductivity: 100.0,
    porosity: 0.326,
    diffusion_coeff: 7.5e-10,
    solid_diffusion_coeff: 3.9e-14,
    reaction_constant: 5.0307e-11,
};

pub const DEFAULT_SEPARATOR: SeparatorMaterials = SeparatorMaterials {
    diffusion_coeff: 7.5e-10,
    reaction_constant: 0.0,
};

/// Separator porosity. Not a form field; the separator matrix is fixed.
pub const SEPARATOR_POROSITY: f64 = 0.724;

/// Initial electrolyte salt concentration, uniform across the cell. [mol/m^3]
pub const INITIAL_ELECTROLYTE_CONCENTRATION: f64 = 1000.0;

/// Maximum lithium intercalation capacity of each electrode. [mol/m^3]
pub const ANODE_MAX_SOLID_CONCENTRATION: f64 = 51554.0;
pub const CATHODE_MAX_SOLID_CONCENTRATION: f64 = 30555.0;

/// Initial solid stoichiometry, as a fraction of the maximum capacity.
pub const ANODE_INITIAL_STOICHIOMETRY: f64 = 0.4955;
pub const CATHODE_INITIAL_STOICHIOMETRY: f64 = 0.8551;

/// Mean electrode particle radius. [m]
pub const PARTICLE_RADIUS: f64 = 2.0e-6;
