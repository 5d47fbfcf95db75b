//! Configuration types for ion-property featurizers.
//!
//! A featurizer is built from a [`FeaturizerConfig`]: the property preset
//! (or a custom table), the oxidation-state search mode, the candidate
//! state source, and the statistics to report. All table resolution
//! happens when the featurizer is constructed.

use super::data::PropertyTable;
use super::error::Error;
use super::stats::Stat;
use log::debug;
use std::sync::Arc;

/// Which per-element oxidation states the charge-balance search may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CandidateSource {
    /// The element's common oxidation states.
    #[default]
    Common,
    /// Every oxidation state the table lists for the element.
    All,
}

/// Configuration shared by all ion-property featurizers.
///
/// # Examples
///
/// ```
/// use ionfeat::{FeaturizerConfig, IonProperty};
///
/// let config = FeaturizerConfig {
///     preset: "pymatgen".to_string(),
///     fast: true,
///     ..Default::default()
/// };
/// let featurizer = IonProperty::new(&config)?;
/// assert!(featurizer.is_fast());
/// # Ok::<(), ionfeat::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct FeaturizerConfig {
    /// Name of a built-in property preset (`"deml"` or `"pymatgen"`).
    pub preset: String,

    /// Custom property table in TOML format.
    ///
    /// If `Some`, it replaces the preset table entirely.
    pub table: Option<String>,

    /// Use the per-element (fast) charge-balance search instead of the
    /// exhaustive per-site search. Only affects bare compositions.
    pub fast: bool,

    /// Candidate oxidation states for charge-balance searches.
    pub candidates: CandidateSource,

    /// Statistics reported by the summarizing featurizers, in label order.
    pub stats: Vec<Stat>,
}

impl Default for FeaturizerConfig {
    fn default() -> Self {
        Self {
            preset: "deml".to_string(),
            table: None,
            fast: false,
            candidates: CandidateSource::Common,
            stats: Stat::ALL.to_vec(),
        }
    }
}

impl FeaturizerConfig {
    /// Default configuration for a named preset.
    pub fn preset(name: impl Into<String>) -> Self {
        Self {
            preset: name.into(),
            ..Default::default()
        }
    }

    /// Resolves the property table this configuration asks for.
    ///
    /// A custom table replaces the preset; otherwise the shared built-in
    /// preset is returned.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownPreset`] for an unknown preset name and the
    /// table parsing errors of [`PropertyTable::from_toml_str`] for a
    /// malformed custom table.
    pub fn load_table(&self) -> Result<Arc<PropertyTable>, Error> {
        match &self.table {
            Some(toml) => {
                let table = PropertyTable::from_toml_str(toml)?;
                debug!("using custom property table '{}'", table.name());
                Ok(Arc::new(table))
            }
            None => PropertyTable::preset(&self.preset),
        }
    }
}
