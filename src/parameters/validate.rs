//! Completeness and exclusivity rules applied to a [`ParameterSet`] before a
//! solve may start.

use thiserror::Error;

use crate::parameters::defaults;
use crate::parameters::{FieldId, ParameterSet};

/// Which table populated the twelve material fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaterialMode {
    DefaultMaterials,
    CustomMaterials,
}

/// Material properties of one electrode region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionMaterials {
    /// Solid-phase conductivity. [S/m]
    pub conductivity: f64,
    /// Volume fraction of electrolyte. Dimensionless, in (0, 1).
    pub porosity: f64,
    /// Electrolyte-phase diffusion coefficient. [m^2/s]
    pub diffusion_coeff: f64,
    /// Solid-phase (intercalation) diffusion coefficient. [m^2/s]
    pub solid_diffusion_coeff: f64,
    /// Butler-Volmer reaction rate constant. [mol^(5/2) s^-1 m^(-13/2)]
    pub reaction_constant: f64,
}

/// Material properties of the separator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeparatorMaterials {
    pub diffusion_coeff: f64,
    pub reaction_constant: f64,
}

/// A validation rule failed; the offending [`ParameterSet`] is untouched and
/// may be corrected and revalidated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("required field `{0}` is missing")]
    MissingRequiredField(&'static str),
    #[error("custom geometry selected but `{0}` is missing")]
    IncompleteGeometry(&'static str),
    #[error("`use_custom_materials` and `use_default_materials` are mutually exclusive")]
    ConflictingMaterialMode,
    #[error("custom materials selected but `{0}` is missing")]
    IncompleteMaterialSpec(&'static str),
}

/// Fully populated, internally consistent parameter record.
///
/// Same shape as the raw set, but every field holds a value and the mode
/// flags have collapsed into [`MaterialMode`]. Consumed (moved) by the
/// state-vector mapper; it never changes after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedParameters {
    pub simulation_duration: f64,
    pub current_density: f64,
    pub anode_width: f64,
    pub separator_width: f64,
    pub cathode_width: f64,
    pub anode: RegionMaterials,
    pub cathode: RegionMaterials,
    pub separator: SeparatorMaterials,
    pub material_mode: MaterialMode,
}

impl ValidatedParameters {
    /// Apply the validation rules, in order:
    ///
    /// 1. `simulation_duration` and `current_density` must be present.
    /// 2. Unless defaulted, all three widths must be present (as a group).
    /// 3. At most one material mode flag may be set.
    /// 4. Custom materials require all twelve material fields.
    /// 5. Otherwise the reference material table applies, ignoring any stray
    ///    user input in the material fields.
    pub fn from_set(set: &ParameterSet) -> Result<Self, ValidationError> {
        let required = |field: FieldId| {
            set.get(field)
                .ok_or(ValidationError::MissingRequiredField(field.name()))
        };
        let simulation_duration = required(FieldId::SimulationDuration)?;
        let current_density = required(FieldId::CurrentDensity)?;

        let (anode_width, cathode_width, separator_width) = if set.use_default_geometry {
            (
                defaults::DEFAULT_ANODE_WIDTH,
                defaults::DEFAULT_CATHODE_WIDTH,
                defaults::DEFAULT_SEPARATOR_WIDTH,
            )
        } else {
            let width = |field: FieldId| {
                set.get(field)
                    .ok_or(ValidationError::IncompleteGeometry(field.name()))
            };
            (
                width(FieldId::AnodeWidth)?,
                width(FieldId::CathodeWidth)?,
                width(FieldId::SeparatorWidth)?,
            )
        };

        if set.use_custom_materials && set.use_default_materials {
            return Err(ValidationError::ConflictingMaterialMode);
        }

        let (material_mode, anode, cathode, separator) = if set.use_custom_materials {
            let material = |field: FieldId| {
                set.get(field)
                    .ok_or(ValidationError::IncompleteMaterialSpec(field.name()))
            };
            let anode = RegionMaterials {
                conductivity: material(FieldId::AnodeConductivity)?,
                porosity: material(FieldId::AnodePorosity)?,
                diffusion_coeff: material(FieldId::AnodeDiffusionCoeff)?,
                solid_diffusion_coeff: material(FieldId::AnodeSolidDiffusionCoeff)?,
                reaction_constant: material(FieldId::AnodeReactionConstant)?,
            };
            let cathode = RegionMaterials {
                conductivity: material(FieldId::CathodeConductivity)?,
                porosity: material(FieldId::CathodePorosity)?,
                diffusion_coeff: material(FieldId::CathodeDiffusionCoeff)?,
                solid_diffusion_coeff: material(FieldId::CathodeSolidDiffusionCoeff)?,
                reaction_constant: material(FieldId::CathodeReactionConstant)?,
            };
            let separator = SeparatorMaterials {
                diffusion_coeff: material(FieldId::SeparatorDiffusionCoeff)?,
                reaction_constant: material(FieldId::SeparatorReactionConstant)?,
            };
            (MaterialMode::CustomMaterials, anode, cathode, separator)
        } else {
            (
                MaterialMode::DefaultMaterials,
                defaults::DEFAULT_ANODE,
                defaults::DEFAULT_CATHODE,
                defaults::DEFAULT_SEPARATOR,
            )
        };

        Ok(ValidatedParameters {
            simulation_duration,
            current_density,
            anode_width,
            separator_width,
            cathode_width,
            anode,
            cathode,
            separator,
            material_mode,
        })
    }

    /// Total cell width. [m]
    pub fn total_width(&self) -> f64 {
        self.anode_width + self.separator_width + self.cathode_width
    }
}
