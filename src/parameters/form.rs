//! Raw form boundary.
//!
//! The input form hands the core nothing but text: one string per numeric
//! field plus three mode booleans. [`FormInput`] is that record, serialized
//! as TOML, e.g.:
//!
//! ```toml
//! simulation_duration = "3600"
//! current_density = "-10"
//! use_default_geometry = true
//! ```

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::parameters::{FieldId, ParameterSet, ParseError};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FormInput {
    pub simulation_duration: Option<String>,
    pub current_density: Option<String>,

    #[serde(default)]
    pub use_default_geometry: bool,
    pub anode_width: Option<String>,
    pub cathode_width: Option<String>,
    pub separator_width: Option<String>,

    #[serde(default)]
    pub use_custom_materials: bool,
    #[serde(default)]
    pub use_default_materials: bool,
    pub anode_conductivity: Option<String>,
    pub anode_porosity: Option<String>,
    pub anode_diffusion_coeff: Option<String>,
    pub anode_solid_diffusion_coeff: Option<String>,
    pub anode_reaction_constant: Option<String>,
    pub cathode_conductivity: Option<String>,
    pub cathode_porosity: Option<String>,
    pub cathode_diffusion_coeff: Option<String>,
    pub cathode_solid_diffusion_coeff: Option<String>,
    pub cathode_reaction_constant: Option<String>,
    pub separator_diffusion_coeff: Option<String>,
    pub separator_reaction_constant: Option<String>,
}

impl FormInput {
    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path.as_ref())?;
        Ok(Self::from_toml(&text)?)
    }

    fn text_of(&self, field: FieldId) -> Option<&String> {
        match field {
            FieldId::SimulationDuration => self.simulation_duration.as_ref(),
            FieldId::CurrentDensity => self.current_density.as_ref(),
            FieldId::AnodeWidth => self.anode_width.as_ref(),
            FieldId::CathodeWidth => self.cathode_width.as_ref(),
            FieldId::SeparatorWidth => self.separator_width.as_ref(),
            FieldId::AnodeConductivity => self.anode_conductivity.as_ref(),
            FieldId::AnodePorosity => self.anode_porosity.as_ref(),
            FieldId::AnodeDiffusionCoeff => self.anode_diffusion_coeff.as_ref(),
            FieldId::AnodeSolidDiffusionCoeff => self.anode_solid_diffusion_coeff.as_ref(),
            FieldId::AnodeReactionConstant => self.anode_reaction_constant.as_ref(),
            FieldId::CathodeConductivity => self.cathode_conductivity.as_ref(),
            FieldId::CathodePorosity => self.cathode_porosity.as_ref(),
            FieldId::CathodeDiffusionCoeff => self.cathode_diffusion_coeff.as_ref(),
            FieldId::CathodeSolidDiffusionCoeff => self.cathode_solid_diffusion_coeff.as_ref(),
            FieldId::CathodeReactionConstant => self.cathode_reaction_constant.as_ref(),
            FieldId::SeparatorDiffusionCoeff => self.separator_diffusion_coeff.as_ref(),
            FieldId::SeparatorReactionConstant => self.separator_reaction_constant.as_ref(),
        }
    }

    /// Parse every present field into a fresh [`ParameterSet`], stopping at
    /// the first field that fails to parse. Blank strings count as unset,
    /// matching a cleared line edit.
    pub fn into_parameter_set(&self) -> Result<ParameterSet, ParseError> {
        let mut set = ParameterSet::new();
        set.use_default_geometry = self.use_default_geometry;
        set.use_custom_materials = self.use_custom_materials;
        set.use_default_materials = self.use_default_materials;

        for field in crate::parameters::ALL_FIELDS {
            if let Some(text) = self.text_of(field) {
                if text.trim().is_empty() {
                    continue;
                }
                set.set(field, text)?;
            }
        }
        Ok(set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toml_round_trip_to_parameter_set() {
        let form = FormInput::from_toml(
            r#"
            simulation_duration = "3600"
            current_density = "-10"
            use_default_geometry = true
            "#,
        )
        .unwrap();
        let set = form.into_parameter_set().unwrap();
        assert_eq!(set.get(FieldId::SimulationDuration), Some(3600.0));
        assert_eq!(set.get(FieldId::CurrentDensity), Some(-10.0));
        assert!(set.use_default_geometry);
        assert!(!set.use_custom_materials);
    }

    #[test]
    fn blank_text_stays_unset() {
        let form = FormInput {
            simulation_duration: Some("  ".into()),
            current_density: Some("2.0".into()),
            ..FormInput::default()
        };
        let set = form.into_parameter_set().unwrap();
        assert_eq!(set.get(FieldId::SimulationDuration), None);
    }

    #[test]
    fn first_bad_field_is_reported() {
        let form = FormInput {
            simulation_duration: Some("abc".into()),
            current_density: Some("also bad".into()),
            ..FormInput::default()
        };
        let err = form.into_parameter_set().unwrap_err();
        assert_eq!(
            err,
            ParseError::NotNumeric {
                field: "simulation_duration",
                text: "abc".into()
            }
        );
    }
}
