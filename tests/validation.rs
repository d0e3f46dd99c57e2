use licell_rs::parameters::defaults;
use licell_rs::parameters::{
    FieldId, MaterialMode, ParameterSet, ValidatedParameters, ValidationError,
};

fn base_set() -> ParameterSet {
    let mut set = ParameterSet::new();
    set.set(FieldId::SimulationDuration, "3600").unwrap();
    set.set(FieldId::CurrentDensity, "-10").unwrap();
    set
}

fn set_widths(set: &mut ParameterSet) {
    set.set(FieldId::AnodeWidth, "80e-6").unwrap();
    set.set(FieldId::CathodeWidth, "88e-6").unwrap();
    set.set(FieldId::SeparatorWidth, "25e-6").unwrap();
}

#[test]
fn accepts_complete_custom_geometry() {
    let mut set = base_set();
    set_widths(&mut set);
    let params = ValidatedParameters::from_set(&set).unwrap();
    assert_eq!(params.anode_width, 80e-6);
    assert_eq!(params.cathode_width, 88e-6);
    assert_eq!(params.separator_width, 25e-6);
}

#[test]
fn any_single_missing_width_is_incomplete_geometry() {
    for missing in [
        FieldId::AnodeWidth,
        FieldId::CathodeWidth,
        FieldId::SeparatorWidth,
    ] {
        let mut set = base_set();
        set_widths(&mut set);
        set.clear(missing);
        let err = ValidatedParameters::from_set(&set).unwrap_err();
        assert_eq!(err, ValidationError::IncompleteGeometry(missing.name()));
    }
}

#[test]
fn default_geometry_flag_fills_all_three_widths() {
    let mut set = base_set();
    set.use_default_geometry = true;
    let params = ValidatedParameters::from_set(&set).unwrap();
    assert_eq!(params.anode_width, defaults::DEFAULT_ANODE_WIDTH);
    assert_eq!(params.separator_width, defaults::DEFAULT_SEPARATOR_WIDTH);
    assert_eq!(params.cathode_width, defaults::DEFAULT_CATHODE_WIDTH);
}

#[test]
fn missing_duration_is_reported_before_anything_else() {
    let mut set = ParameterSet::new();
    set.set(FieldId::CurrentDensity, "-10").unwrap();
    set.use_default_geometry = true;
    let err = ValidatedParameters::from_set(&set).unwrap_err();
    assert_eq!(
        err,
        ValidationError::MissingRequiredField("simulation_duration")
    );
}

#[test]
fn missing_current_density_is_required() {
    let mut set = ParameterSet::new();
    set.set(FieldId::SimulationDuration, "3600").unwrap();
    set.use_default_geometry = true;
    let err = ValidatedParameters::from_set(&set).unwrap_err();
    assert_eq!(err, ValidationError::MissingRequiredField("current_density"));
}

#[test]
fn both_material_flags_conflict_regardless_of_other_fields() {
    let mut set = base_set();
    set.use_default_geometry = true;
    set.use_custom_materials = true;
    set.use_default_materials = true;
    // Fully populated material fields do not rescue the conflict.
    for field in [
        FieldId::AnodeConductivity,
        FieldId::AnodePorosity,
        FieldId::AnodeDiffusionCoeff,
        FieldId::AnodeSolidDiffusionCoeff,
        FieldId::AnodeReactionConstant,
    ] {
        if field == FieldId::AnodePorosity {
            set.set(field, "0.4").unwrap();
        } else {
            set.set(field, "1.0").unwrap();
        }
    }
    let err = ValidatedParameters::from_set(&set).unwrap_err();
    assert_eq!(err, ValidationError::ConflictingMaterialMode);
}

#[test]
fn neither_flag_applies_the_default_table_over_stray_input() {
    let mut set = base_set();
    set.use_default_geometry = true;
    // Stray user text left in material fields while neither mode is active.
    set.set(FieldId::AnodeConductivity, "12345").unwrap();
    set.set(FieldId::CathodePorosity, "0.9").unwrap();
    set.set(FieldId::SeparatorDiffusionCoeff, "1.0").unwrap();

    let params = ValidatedParameters::from_set(&set).unwrap();
    assert_eq!(params.material_mode, MaterialMode::DefaultMaterials);
    assert_eq!(params.anode, defaults::DEFAULT_ANODE);
    assert_eq!(params.cathode, defaults::DEFAULT_CATHODE);
    assert_eq!(params.separator, defaults::DEFAULT_SEPARATOR);
}

#[test]
fn default_materials_flag_alone_is_valid() {
    let mut set = base_set();
    set.use_default_geometry = true;
    set.use_default_materials = true;
    let params = ValidatedParameters::from_set(&set).unwrap();
    assert_eq!(params.material_mode, MaterialMode::DefaultMaterials);
    assert_eq!(params.anode, defaults::DEFAULT_ANODE);
}

#[test]
fn custom_materials_require_all_twelve_fields() {
    let mut set = base_set();
    set.use_default_geometry = true;
    set.use_custom_materials = true;
    let err = ValidatedParameters::from_set(&set).unwrap_err();
    // The first missing field in form order is reported.
    assert_eq!(
        err,
        ValidationError::IncompleteMaterialSpec("anode_conductivity")
    );
}

#[test]
fn complete_custom_materials_are_preserved() {
    let mut set = base_set();
    set.use_default_geometry = true;
    set.use_custom_materials = true;
    let fields: [(FieldId, &str); 12] = [
        (FieldId::AnodeConductivity, "90"),
        (FieldId::AnodePorosity, "0.4"),
        (FieldId::AnodeDiffusionCoeff, "7e-10"),
        (FieldId::AnodeSolidDiffusionCoeff, "2e-14"),
        (FieldId::AnodeReactionConstant, "2e-11"),
        (FieldId::CathodeConductivity, "110"),
        (FieldId::CathodePorosity, "0.3"),
        (FieldId::CathodeDiffusionCoeff, "6e-10"),
        (FieldId::CathodeSolidDiffusionCoeff, "4e-14"),
        (FieldId::CathodeReactionConstant, "5e-11"),
        (FieldId::SeparatorDiffusionCoeff, "8e-10"),
        (FieldId::SeparatorReactionConstant, "0"),
    ];
    for (field, text) in fields {
        set.set(field, text).unwrap();
    }
    let params = ValidatedParameters::from_set(&set).unwrap();
    assert_eq!(params.material_mode, MaterialMode::CustomMaterials);
    assert_eq!(params.anode.conductivity, 90.0);
    assert_eq!(params.cathode.solid_diffusion_coeff, 4e-14);
    assert_eq!(params.separator.diffusion_coeff, 8e-10);
}

#[test]
fn rejected_set_can_be_corrected_and_revalidated() {
    let mut set = base_set();
    // First attempt: no geometry at all.
    assert!(ValidatedParameters::from_set(&set).is_err());
    // Correct it and try again.
    set_widths(&mut set);
    assert!(ValidatedParameters::from_set(&set).is_ok());
}
