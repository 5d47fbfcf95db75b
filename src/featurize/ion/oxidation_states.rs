use super::{Featurizer, stat_labels, table_citations};
use crate::featurize::config::{CandidateSource, FeaturizerConfig};
use crate::featurize::data::PropertyTable;
use crate::featurize::error::Error;
use crate::featurize::oxidation::{OxidationSearch, SearchMode};
use crate::featurize::stats::{Stat, Summary};
use crate::model::composition::Composition;
use std::sync::Arc;

/// Statistics of the distinct oxidation states in a composition.
///
/// Decorated compositions are used as given. Bare compositions are first
/// decorated with the best-ranked charge-balanced guess drawn from the
/// table's candidate states; a bare composition with no such guess is an
/// error.
///
/// # Examples
///
/// ```
/// use ionfeat::{Composition, Featurizer, OxidationStates};
///
/// let featurizer = OxidationStates::from_preset("deml")?;
/// let wustite: Composition = "FeO".parse()?;
/// let f = featurizer.featurize(&wustite)?;
/// assert_eq!(f[1], 2.0); // maximum
/// assert_eq!(f[2], 4.0); // range
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct OxidationStates {
    table: Arc<PropertyTable>,
    candidates: CandidateSource,
    mode: SearchMode,
    stats: Vec<Stat>,
}

impl OxidationStates {
    pub fn new(config: &FeaturizerConfig) -> Result<Self, Error> {
        Ok(Self {
            table: config.load_table()?,
            candidates: config.candidates,
            mode: if config.fast {
                SearchMode::Fast
            } else {
                SearchMode::Exhaustive
            },
            stats: config.stats.clone(),
        })
    }

    pub fn from_preset(name: &str) -> Result<Self, Error> {
        Self::new(&FeaturizerConfig::preset(name))
    }
}

impl Featurizer for OxidationStates {
    fn name(&self) -> &'static str {
        "oxidation_states"
    }

    fn feature_labels(&self) -> Vec<String> {
        stat_labels(&self.stats, "oxidation state")
    }

    fn featurize(&self, composition: &Composition) -> Result<Vec<f64>, Error> {
        let decorated = OxidationSearch::new(&self.table, self.candidates, self.mode)
            .decorate(composition)?;

        let mut states: Vec<i32> = decorated
            .species()
            .iter()
            .map(|(sp, _)| sp.oxidation_state)
            .collect();
        states.sort_unstable();
        states.dedup();

        let values: Vec<f64> = states.into_iter().map(f64::from).collect();
        Ok(Summary::of(&values).select(&self.stats))
    }

    fn citations(&self) -> Vec<String> {
        table_citations(&self.table, &[])
    }
}
