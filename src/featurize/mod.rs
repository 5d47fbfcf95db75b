mod config;
mod data;
mod error;
mod ion;
mod ionic;
mod oxidation;
mod stats;

pub use config::{CandidateSource, FeaturizerConfig};
pub use data::{PRESET_NAMES, PropertyTable, TOTAL_IONIZATION};
pub use error::Error;
pub use ion::{
    CationProperty, ElectronAffinity, ElectronegativityDiff, Featurizer, IonProperty,
    OxidationStates,
};
pub use ionic::{IonicCharacter, ionic_character, is_ionic};
pub use oxidation::{Assignment, Enumeration, OxidationSearch, SearchMode, is_charge_balanced};
pub use stats::{ParseStatError, Stat, Summary};
