pub mod cell;
pub mod correlations;

pub use cell::{CellPhysics, FIELD_NAMES, N_FIELDS};

/// Faraday's constant. [C/mol]
pub const FARADAY: f64 = 96487.0;
/// Universal gas constant. [J/(mol K)]
pub const GAS_CONSTANT: f64 = 8.314;
/// Cell temperature, held constant (isothermal model). [K]
pub const CELL_TEMPERATURE: f64 = 298.15;
/// Cation transference number of the electrolyte.
pub const TRANSFERENCE_NUMBER: f64 = 0.363;
/// Bruggeman exponent relating porosity to effective transport properties.
pub const BRUGGEMAN: f64 = 4.0;
