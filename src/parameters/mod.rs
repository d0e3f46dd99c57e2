pub mod defaults;
pub mod form;
pub mod validate;

pub use form::FormInput;
pub use validate::{MaterialMode, ValidatedParameters, ValidationError};

use thiserror::Error;

/// Identifies one numeric input field of the cell form.
///
/// Every field the form can supply has exactly one variant here; the
/// variant's [`name`](FieldId::name) is the identity reported back to the
/// form layer on a parse failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldId {
    SimulationDuration,
    CurrentDensity,
    AnodeWidth,
    CathodeWidth,
    SeparatorWidth,
    AnodeConductivity,
    AnodePorosity,
    AnodeDiffusionCoeff,
    AnodeSolidDiffusionCoeff,
    AnodeReactionConstant,
    CathodeConductivity,
    CathodePorosity,
    CathodeDiffusionCoeff,
    CathodeSolidDiffusionCoeff,
    CathodeReactionConstant,
    SeparatorDiffusionCoeff,
    SeparatorReactionConstant,
}

/// All fields, in the order the form reads them.
pub const ALL_FIELDS: [FieldId; 17] = [
    FieldId::SimulationDuration,
    FieldId::CurrentDensity,
    FieldId::AnodeWidth,
    FieldId::CathodeWidth,
    FieldId::SeparatorWidth,
    FieldId::AnodeConductivity,
    FieldId::AnodePorosity,
    FieldId::AnodeDiffusionCoeff,
    FieldId::AnodeSolidDiffusionCoeff,
    FieldId::AnodeReactionConstant,
    FieldId::CathodeConductivity,
    FieldId::CathodePorosity,
    FieldId::CathodeDiffusionCoeff,
    FieldId::CathodeSolidDiffusionCoeff,
    FieldId::CathodeReactionConstant,
    FieldId::SeparatorDiffusionCoeff,
    FieldId::SeparatorReactionConstant,
];

/// Admissible range for a field value. Every class rejects non-finite input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Range {
    /// Strictly positive (widths, duration).
    Positive,
    /// Zero or positive (material magnitudes).
    NonNegative,
    /// Open interval (0, 1) (porosities).
    UnitInterval,
    /// Any finite value (current density carries the charge/discharge sign).
    AnyFinite,
}

impl Range {
    fn admits(self, v: f64) -> bool {
        if !v.is_finite() {
            return false;
        }
        match self {
            Range::Positive => v > 0.0,
            Range::NonNegative => v >= 0.0,
            Range::UnitInterval => v > 0.0 && v < 1.0,
            Range::AnyFinite => true,
        }
    }
}

impl FieldId {
    /// Stable field name, matching the form layer's identifiers.
    pub fn name(self) -> &'static str {
        match self {
            FieldId::SimulationDuration => "simulation_duration",
            FieldId::CurrentDensity => "current_density",
            FieldId::AnodeWidth => "anode_width",
            FieldId::CathodeWidth => "cathode_width",
            FieldId::SeparatorWidth => "separator_width",
            FieldId::AnodeConductivity => "anode_conductivity",
            FieldId::AnodePorosity => "anode_porosity",
            FieldId::AnodeDiffusionCoeff => "anode_diffusion_coeff",
            FieldId::AnodeSolidDiffusionCoeff => "anode_solid_diffusion_coeff",
            FieldId::AnodeReactionConstant => "anode_reaction_constant",
            FieldId::CathodeConductivity => "cathode_conductivity",
            FieldId::CathodePorosity => "cathode_porosity",
            FieldId::CathodeDiffusionCoeff => "cathode_diffusion_coeff",
            FieldId::CathodeSolidDiffusionCoeff => "cathode_solid_diffusion_coeff",
            FieldId::CathodeReactionConstant => "cathode_reaction_constant",
            FieldId::SeparatorDiffusionCoeff => "separator_diffusion_coeff",
            FieldId::SeparatorReactionConstant => "separator_reaction_constant",
        }
    }

    fn range(self) -> Range {
        match self {
            FieldId::SimulationDuration
            | FieldId::AnodeWidth
            | FieldId::CathodeWidth
            | FieldId::SeparatorWidth => Range::Positive,
            FieldId::AnodePorosity | FieldId::CathodePorosity => Range::UnitInterval,
            FieldId::CurrentDensity => Range::AnyFinite,
            _ => Range::NonNegative,
        }
    }
}

/// A single field failed to parse. Recoverable: fix the text and set again.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("field `{field}`: {text:?} is not a number")]
    NotNumeric { field: &'static str, text: String },
    #[error("field `{field}`: {value} is outside the admissible range")]
    OutOfRange { field: &'static str, value: f64 },
}

/// Raw physical inputs for one simulation run.
///
/// A pure data record: fields start unset, are populated through
/// [`set`](ParameterSet::set) (which parses and range-checks the form text)
/// and read back through [`get`](ParameterSet::get). Nothing here decides
/// which fields are required; that is [`ValidatedParameters::from_set`]'s
/// job, so a half-filled set can be corrected and revalidated freely.
#[derive(Debug, Clone, Default)]
pub struct ParameterSet {
    values: [Option<f64>; 17],
    /// Ignore the width fields and take the library's reference geometry.
    pub use_default_geometry: bool,
    /// Read all twelve material fields from user input.
    pub use_custom_materials: bool,
    /// Take the library's reference material table.
    pub use_default_materials: bool,
}

impl ParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `text` into `field`, rejecting garbage and out-of-range values.
    pub fn set(&mut self, field: FieldId, text: &str) -> Result<(), ParseError> {
        let value: f64 = text
            .trim()
            .parse()
            .map_err(|_| ParseError::NotNumeric {
                field: field.name(),
                text: text.to_owned(),
            })?;
        if !field.range().admits(value) {
            return Err(ParseError::OutOfRange {
                field: field.name(),
                value,
            });
        }
        self.values[Self::slot(field)] = Some(value);
        Ok(())
    }

    /// `None` until the field has been set (or filled in by validation).
    pub fn get(&self, field: FieldId) -> Option<f64> {
        self.values[Self::slot(field)]
    }

    /// Clear a single field, as when the user blanks a line edit.
    pub fn clear(&mut self, field: FieldId) {
        self.values[Self::slot(field)] = None;
    }

    fn slot(field: FieldId) -> usize {
        ALL_FIELDS
            .iter()
            .position(|f| *f == field)
            .expect("every FieldId appears in ALL_FIELDS")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_and_scientific_notation() {
        let mut set = ParameterSet::new();
        set.set(FieldId::SimulationDuration, "3600").unwrap();
        set.set(FieldId::AnodeDiffusionCoeff, " 7.5e-10 ").unwrap();
        assert_eq!(set.get(FieldId::SimulationDuration), Some(3600.0));
        assert_eq!(set.get(FieldId::AnodeDiffusionCoeff), Some(7.5e-10));
    }

    #[test]
    fn rejects_garbage_with_field_identity() {
        let mut set = ParameterSet::new();
        let err = set.set(FieldId::AnodeWidth, "eighty microns").unwrap_err();
        assert_eq!(
            err,
            ParseError::NotNumeric {
                field: "anode_width",
                text: "eighty microns".into()
            }
        );
        assert_eq!(set.get(FieldId::AnodeWidth), None);
    }

    #[test]
    fn rejects_out_of_range_values() {
        let mut set = ParameterSet::new();
        assert!(set.set(FieldId::SimulationDuration, "-5").is_err());
        assert!(set.set(FieldId::SimulationDuration, "0").is_err());
        assert!(set.set(FieldId::AnodePorosity, "1.2").is_err());
        assert!(set.set(FieldId::AnodeConductivity, "nan").is_err());
        assert!(set.set(FieldId::AnodeConductivity, "inf").is_err());
    }

    #[test]
    fn current_density_may_be_negative() {
        let mut set = ParameterSet::new();
        set.set(FieldId::CurrentDensity, "-10").unwrap();
        assert_eq!(set.get(FieldId::CurrentDensity), Some(-10.0));
    }

    #[test]
    fn clear_unsets_a_field() {
        let mut set = ParameterSet::new();
        set.set(FieldId::SeparatorWidth, "25e-6").unwrap();
        set.clear(FieldId::SeparatorWidth);
        assert_eq!(set.get(FieldId::SeparatorWidth), None);
    }
}
