//! Ion-based descriptors of inorganic compositions for materials machine learning.
//! It checks whether a formula admits a charge-balanced ionic assignment, quantifies
//! bond ionicity from electronegativities, and summarizes cation, anion and
//! oxidation-state properties into fixed-length, labelled feature vectors.
//!
//! # Features
//!
//! - **Oxidation-state search** — Exhaustive per-site search that finds
//!   mixed-valence assignments, or a fast per-element search
//! - **Ionic character** — Pauling-style ionic character over element pairs
//! - **Property tables** — Built-in `deml` and `pymatgen` presets embedded in
//!   the library, or custom tables in TOML
//! - **Featurizers** — Stable labels and explicit errors for every missing
//!   table entry; nothing is silently imputed
//!
//! # Quick Start
//!
//! Parse a formula, build a featurizer and compute its features:
//!
//! ```
//! use ionfeat::{Composition, Element, Featurizer, IonProperty, Species};
//! use ionfeat::{CationProperty, Error, OxidationSearch};
//!
//! // Hematite, Fe₂O₃
//! let hematite: Composition = "Fe2O3".parse()?;
//!
//! // Is a charge-balanced ionic compound possible, and how ionic are the bonds?
//! let ion = IonProperty::default();
//! let features = ion.featurize(&hematite)?;
//! assert_eq!(ion.feature_labels()[0], "compound possible");
//! assert_eq!(features[0], 1.0);
//! assert!((features[1] - 0.476922164).abs() < 1e-7);
//!
//! // Cation features need oxidation states; decorate with the best guess
//! let search = OxidationSearch::new(ion.table(), Default::default(), Default::default());
//! let decorated = search.decorate(&hematite)?;
//! assert_eq!(decorated.species(), vec![
//!     (Species::new(Element::Fe, 3), 2.0),
//!     (Species::new(Element::O, -2), 3.0),
//! ]);
//!
//! let cation = CationProperty::from_preset("deml")?;
//! let features = cation.featurize(&decorated)?;
//! assert_eq!(features.len(), cation.feature_labels().len());
//! assert_eq!(features[0], 5281400.0); // minimum total ionization energy, J/mol
//! # Ok::<(), Error>(())
//! ```
//!
//! # Module Organization
//!
//! - [`Featurizer`] — Common interface of all featurizers
//! - [`FeaturizerConfig`] — Preset or custom table, search mode, statistics
//! - [`PropertyTable`] — Elemental and ionic property lookup
//! - [`OxidationSearch`] — Charge-balanced oxidation-state enumeration
//!
//! # Data Types
//!
//! ## Chemistry
//!
//! - [`Element`] — Chemical element (H through Og)
//! - [`Species`] — Element with an integer oxidation state
//! - [`Composition`] — Bare or charge-decorated amounts, parsed from formulas
//!
//! ## Featurizers
//!
//! - [`IonProperty`] — Compound possible, maximum and average ionic character
//! - [`CationProperty`] — Statistics of charge-dependent cation properties
//! - [`ElectronAffinity`] — Total anion electron affinity
//! - [`ElectronegativityDiff`] — Statistics of cation–anion electronegativity differences
//! - [`OxidationStates`] — Statistics of the distinct oxidation states
//!
//! ## Building Blocks
//!
//! - [`Summary`] / [`Stat`] — Minimum, maximum, range, mean and standard deviation
//! - [`IonicCharacter`] — Composition-level ionic character
//! - [`Enumeration`] / [`Assignment`] — Results of an oxidation-state search
//!
//! # Logging
//!
//! The library reports through the [`log`] facade: preset loading and
//! search outcomes at `debug`, search pruning at `trace`, and compositions
//! that cannot be scaled to whole-number site counts at `warn`.

mod featurize;
mod model;

pub use model::composition::{Composition, CompositionError, Entry};
pub use model::species::{ParseSpeciesError, Species};
pub use model::types::{Element, ParseElementError};

pub use featurize::{
    Assignment, CandidateSource, CationProperty, ElectronAffinity, ElectronegativityDiff,
    Enumeration, Error, Featurizer, FeaturizerConfig, IonProperty, IonicCharacter,
    OxidationSearch, OxidationStates, PRESET_NAMES, ParseStatError, PropertyTable, SearchMode,
    Stat, Summary, TOTAL_IONIZATION, ionic_character, is_charge_balanced, is_ionic,
};
