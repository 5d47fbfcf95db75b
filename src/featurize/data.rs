//! Elemental and ionic property tables.
//!
//! Tables are stored as TOML. The built-in presets are embedded at compile
//! time and parsed once per process on first use; callers may also supply
//! their own table with the same schema through
//! [`PropertyTable::from_toml_str`].

use super::config::CandidateSource;
use super::error::Error;
use crate::model::species::Species;
use crate::model::types::Element;
use log::debug;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

const DEML_TOML: &str = include_str!("../../resources/deml.toml");
const PYMATGEN_TOML: &str = include_str!("../../resources/pymatgen.toml");

static DEML: OnceLock<Arc<PropertyTable>> = OnceLock::new();
static PYMATGEN: OnceLock<Arc<PropertyTable>> = OnceLock::new();

/// Names of the built-in property presets.
pub const PRESET_NAMES: &[&str] = &["deml", "pymatgen"];

/// Derived charge-dependent property: sum of the first `charge` ionization energies.
pub const TOTAL_IONIZATION: &str = "total_ioniz";

#[derive(Debug, Clone, Deserialize)]
struct RawTable {
    meta: TableMeta,
    #[serde(default)]
    elements: HashMap<String, RawElement>,
}

#[derive(Debug, Clone, Deserialize)]
struct RawElement {
    electronegativity: Option<f64>,
    electron_affinity: Option<f64>,
    #[serde(default)]
    oxidation_states: Vec<i32>,
    #[serde(default)]
    common_oxidation_states: Vec<i32>,
    #[serde(default)]
    ionization_energies: Vec<f64>,
    #[serde(default)]
    ions: HashMap<String, HashMap<String, f64>>,
}

#[derive(Debug, Clone, Deserialize)]
struct TableMeta {
    name: String,
    #[serde(default)]
    citation: Option<String>,
    /// Charge-dependent properties reported for cations, in column order.
    #[serde(default)]
    cation_properties: Vec<String>,
}

#[derive(Debug, Clone, Default)]
struct ElementRecord {
    electronegativity: Option<f64>,
    electron_affinity: Option<f64>,
    oxidation_states: Vec<i32>,
    common_oxidation_states: Vec<i32>,
    ionization_energies: Vec<f64>,
    ions: HashMap<i32, HashMap<String, f64>>,
}

/// Immutable lookup from elements and ions to scalar properties.
///
/// Lookups never fall back to a default: an element or property absent
/// from the table is reported as an error.
///
/// # Examples
///
/// ```
/// use ionfeat::{Element, PropertyTable, Species};
///
/// let table = PropertyTable::preset("deml")?;
/// assert_eq!(table.electronegativity(Element::O)?, 3.44);
/// assert_eq!(table.ion_property(Species::new(Element::Fe, 3), "total_ioniz")?, 5281400.0);
/// assert!(table.electronegativity(Element::Og).is_err());
/// # Ok::<(), ionfeat::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct PropertyTable {
    meta: TableMeta,
    elements: HashMap<Element, ElementRecord>,
}

impl PropertyTable {
    /// Parses a table from TOML.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TableParse`] for malformed TOML and
    /// [`Error::TableEntry`] for unknown element symbols or non-integer
    /// ion keys.
    pub fn from_toml_str(toml: &str) -> Result<Self, Error> {
        let raw: RawTable = toml::from_str(toml)?;

        let mut elements = HashMap::with_capacity(raw.elements.len());
        for (symbol, record) in raw.elements {
            let element = symbol
                .parse::<Element>()
                .map_err(|e| Error::table_entry(&symbol, e.to_string()))?;

            let mut ions = HashMap::with_capacity(record.ions.len());
            for (key, props) in record.ions {
                let state: i32 = key.parse().map_err(|_| {
                    Error::table_entry(
                        format!("{}.ions.{}", symbol, key),
                        "ion keys must be integer oxidation states",
                    )
                })?;
                ions.insert(state, props);
            }

            elements.insert(
                element,
                ElementRecord {
                    electronegativity: record.electronegativity,
                    electron_affinity: record.electron_affinity,
                    oxidation_states: record.oxidation_states,
                    common_oxidation_states: record.common_oxidation_states,
                    ionization_energies: record.ionization_energies,
                    ions,
                },
            );
        }

        Ok(Self {
            meta: raw.meta,
            elements,
        })
    }

    /// Returns the shared built-in table for a preset name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownPreset`] if `name` is not a built-in preset.
    pub fn preset(name: &str) -> Result<Arc<PropertyTable>, Error> {
        let (cell, source) = match name {
            "deml" => (&DEML, DEML_TOML),
            "pymatgen" => (&PYMATGEN, PYMATGEN_TOML),
            _ => return Err(Error::UnknownPreset(name.to_string())),
        };

        let table = cell.get_or_init(|| {
            debug!("loading built-in property preset '{}'", name);
            Arc::new(
                PropertyTable::from_toml_str(source)
                    .expect("Failed to parse embedded property table. This is a library bug."),
            )
        });

        Ok(Arc::clone(table))
    }

    pub fn name(&self) -> &str {
        &self.meta.name
    }

    pub fn citation(&self) -> Option<&str> {
        self.meta.citation.as_deref()
    }

    pub fn cation_properties(&self) -> &[String] {
        &self.meta.cation_properties
    }

    /// Number of elements with at least one entry.
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    pub fn contains(&self, element: Element) -> bool {
        self.elements.contains_key(&element)
    }

    fn record(&self, element: Element, property: &str) -> Result<&ElementRecord, Error> {
        self.elements
            .get(&element)
            .ok_or_else(|| Error::missing_property(element, property))
    }

    pub fn electronegativity(&self, element: Element) -> Result<f64, Error> {
        self.record(element, "electronegativity")?
            .electronegativity
            .ok_or_else(|| Error::missing_property(element, "electronegativity"))
    }

    pub fn electron_affinity(&self, element: Element) -> Result<f64, Error> {
        self.record(element, "electron_affinity")?
            .electron_affinity
            .ok_or_else(|| Error::missing_property(element, "electron_affinity"))
    }

    /// Candidate oxidation states for an element.
    ///
    /// Unlike the scalar lookups this is lenient: an element absent from
    /// the table has no candidates, which makes any composition containing
    /// it unbalanceable rather than an error.
    pub fn oxidation_states(&self, element: Element, source: CandidateSource) -> &[i32] {
        match (self.elements.get(&element), source) {
            (Some(record), CandidateSource::Common) => &record.common_oxidation_states,
            (Some(record), CandidateSource::All) => &record.oxidation_states,
            (None, _) => &[],
        }
    }

    /// A charge-dependent property of an ion.
    ///
    /// `total_ioniz` is derived from the element's successive ionization
    /// energies; every other property is read from the ion record.
    pub fn ion_property(&self, species: Species, property: &str) -> Result<f64, Error> {
        let record = self
            .elements
            .get(&species.element)
            .ok_or_else(|| Error::missing_ion_property(species, property))?;

        if property == TOTAL_IONIZATION {
            let charge = match usize::try_from(species.oxidation_state) {
                Ok(charge) => charge,
                Err(_) => {
                    return Err(Error::NegativeCharge {
                        species,
                        property: property.to_string(),
                    });
                }
            };
            return record
                .ionization_energies
                .get(..charge)
                .map(|energies| energies.iter().sum::<f64>())
                .ok_or_else(|| Error::missing_ion_property(species, property));
        }

        record
            .ions
            .get(&species.oxidation_state)
            .and_then(|props| props.get(property))
            .copied()
            .ok_or_else(|| Error::missing_ion_property(species, property))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
        (a - b).abs() <= eps
    }

    #[test]
    fn builtin_presets_load() {
        for name in PRESET_NAMES {
            let table = PropertyTable::preset(name).unwrap();
            assert_eq!(table.name(), *name);
            assert!(table.citation().is_some());
            assert!(table.contains(Element::Fe));
            assert!(table.contains(Element::O));
            assert_eq!(table.element_count(), 100);
        }
    }

    #[test]
    fn presets_are_cached() {
        let a = PropertyTable::preset("deml").unwrap();
        let b = PropertyTable::preset("deml").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn unknown_preset_is_rejected() {
        let err = PropertyTable::preset("magpie").unwrap_err();
        assert!(matches!(err, Error::UnknownPreset(ref name) if name == "magpie"));
    }

    #[test]
    fn deml_cation_columns_in_order() {
        let table = PropertyTable::preset("deml").unwrap();
        assert_eq!(
            table.cation_properties(),
            ["total_ioniz", "xtal_field_split", "magn_moment", "so_coupling", "sat_magn"]
        );
    }

    #[test]
    fn deml_reference_values() {
        let table = PropertyTable::preset("deml").unwrap();
        assert!(approx_eq(table.electronegativity(Element::Fe).unwrap(), 1.83, 1e-12));
        assert!(approx_eq(table.electron_affinity(Element::O).unwrap(), -141000.0, 1e-6));

        let fe3 = Species::new(Element::Fe, 3);
        assert!(approx_eq(table.ion_property(fe3, "total_ioniz").unwrap(), 5281400.0, 1e-6));
        assert!(approx_eq(table.ion_property(fe3, "xtal_field_split").unwrap(), 14.0, 1e-12));
        assert!(approx_eq(table.ion_property(fe3, "magn_moment").unwrap(), 5.2, 1e-12));
        assert!(approx_eq(table.ion_property(fe3, "so_coupling").unwrap(), 460.0, 1e-12));
        assert!(approx_eq(table.ion_property(fe3, "sat_magn").unwrap(), 3.0, 1e-12));
    }

    #[test]
    fn total_ionization_edge_cases() {
        let table = PropertyTable::preset("deml").unwrap();
        assert_eq!(
            table
                .ion_property(Species::new(Element::Fe, 0), TOTAL_IONIZATION)
                .unwrap(),
            0.0
        );
        assert!(matches!(
            table.ion_property(Species::new(Element::O, -2), TOTAL_IONIZATION),
            Err(Error::NegativeCharge { .. })
        ));
        assert!(matches!(
            table.ion_property(Species::new(Element::Fe, 6), TOTAL_IONIZATION),
            Err(Error::MissingIonProperty { .. })
        ));
    }

    #[test]
    fn missing_entries_fail_explicitly() {
        let table = PropertyTable::preset("deml").unwrap();
        assert!(matches!(
            table.electronegativity(Element::Og),
            Err(Error::MissingProperty { element: Element::Og, .. })
        ));
        assert!(matches!(
            table.electron_affinity(Element::Mg),
            Err(Error::MissingProperty { element: Element::Mg, .. })
        ));
        assert!(matches!(
            table.ion_property(Species::new(Element::Fe, 4), "magn_moment"),
            Err(Error::MissingIonProperty { .. })
        ));
        assert!(table.oxidation_states(Element::Og, CandidateSource::All).is_empty());
    }

    #[test]
    fn candidate_sources_differ() {
        let table = PropertyTable::preset("deml").unwrap();
        assert_eq!(table.oxidation_states(Element::Fe, CandidateSource::Common), [2, 3]);
        assert!(table.oxidation_states(Element::Fe, CandidateSource::All).len() > 2);
    }

    #[test]
    fn custom_table_parses_valid_toml() {
        let custom = r#"
            [meta]
            name = "custom"
            cation_properties = ["charge_density"]

            [elements.Na]
            electronegativity = 0.93
            common_oxidation_states = [1]

            [elements.Na.ions.1]
            charge_density = 24.0

            [elements.Cl]
            electronegativity = 3.16
            electron_affinity = -349000.0
            common_oxidation_states = [-1]
        "#;
        let table = PropertyTable::from_toml_str(custom).unwrap();
        assert_eq!(table.name(), "custom");
        assert!(table.citation().is_none());
        assert_eq!(
            table
                .ion_property(Species::new(Element::Na, 1), "charge_density")
                .unwrap(),
            24.0
        );
        assert_eq!(table.oxidation_states(Element::Cl, CandidateSource::Common), [-1]);
    }

    #[test]
    fn errors_on_invalid_custom_toml() {
        assert!(matches!(
            PropertyTable::from_toml_str("not valid [[[toml"),
            Err(Error::TableParse(_))
        ));

        let bad_symbol = "[meta]\nname = \"x\"\n[elements.Xy]\nelectronegativity = 1.0\n";
        assert!(matches!(
            PropertyTable::from_toml_str(bad_symbol),
            Err(Error::TableEntry { .. })
        ));

        let bad_ion = "[meta]\nname = \"x\"\n[elements.Fe.ions.high]\nmagn_moment = 1.0\n";
        assert!(matches!(
            PropertyTable::from_toml_str(bad_ion),
            Err(Error::TableEntry { .. })
        ));
    }
}
