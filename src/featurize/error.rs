//! Error types for ion-property featurization.
//!
//! Errors fall into three groups: configuration failures raised while a
//! featurizer is constructed (unknown presets, malformed tables), lookup
//! failures for elements or ions missing from a property table, and input
//! failures for compositions a featurizer cannot handle.

use crate::model::composition::CompositionError;
use crate::model::species::Species;
use crate::model::types::Element;
use thiserror::Error;

/// Errors that can occur while building or running a featurizer.
#[derive(Debug, Error)]
pub enum Error {
    /// The requested property preset does not exist.
    #[error("unknown property preset '{0}' (available: deml, pymatgen)")]
    UnknownPreset(String),

    /// Failed to parse a property table in TOML format.
    #[error("failed to parse property table: {0}")]
    TableParse(#[from] toml::de::Error),

    /// A property table names an element that does not exist, or an ion
    /// record whose key is not an integer oxidation state.
    #[error("invalid property table entry '{key}': {detail}")]
    TableEntry {
        /// The offending table key.
        key: String,
        /// Description of the problem.
        detail: String,
    },

    /// A required elemental property is absent from the table.
    #[error("property '{property}' is not available for element {element}")]
    MissingProperty {
        /// Element that was looked up.
        element: Element,
        /// Name of the missing property.
        property: String,
    },

    /// A required charge-dependent property is absent from the table.
    #[error("property '{property}' is not available for ion {species}")]
    MissingIonProperty {
        /// Species that was looked up.
        species: Species,
        /// Name of the missing property.
        property: String,
    },

    /// A cation-only property was requested for a non-positive charge.
    #[error("property '{property}' is undefined for {species}: charge must be non-negative")]
    NegativeCharge {
        /// Species that was looked up.
        species: Species,
        /// Name of the property.
        property: String,
    },

    /// The featurizer needs a charge-decorated composition.
    #[error("composition {0} lacks oxidation states")]
    MissingOxidationStates(String),

    /// No charge-neutral oxidation-state assignment exists.
    #[error("no charge-balanced oxidation states found for {0}")]
    NoChargeBalance(String),

    /// Building a composition failed.
    #[error(transparent)]
    Composition(#[from] CompositionError),
}

impl Error {
    /// Creates a [`MissingProperty`](Error::MissingProperty) error.
    pub fn missing_property(element: Element, property: impl Into<String>) -> Self {
        Self::MissingProperty {
            element,
            property: property.into(),
        }
    }

    /// Creates a [`MissingIonProperty`](Error::MissingIonProperty) error.
    pub fn missing_ion_property(species: Species, property: impl Into<String>) -> Self {
        Self::MissingIonProperty {
            species,
            property: property.into(),
        }
    }

    /// Creates a [`TableEntry`](Error::TableEntry) error.
    pub fn table_entry(key: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::TableEntry {
            key: key.into(),
            detail: detail.into(),
        }
    }
}
