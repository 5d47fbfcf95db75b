use super::{Featurizer, require_decorated, table_citations};
use crate::featurize::config::FeaturizerConfig;
use crate::featurize::data::PropertyTable;
use crate::featurize::error::Error;
use crate::featurize::stats::{Stat, Summary};
use crate::model::composition::Composition;
use crate::model::species::Species;
use std::sync::Arc;

/// Statistics of charge-dependent cation properties.
///
/// Requires a charge-decorated composition. For each property column the
/// table declares, the value of every distinct cation species is looked
/// up and the list is reduced with the configured statistics. A
/// composition without cations yields zeros.
///
/// # Examples
///
/// ```
/// use ionfeat::{CationProperty, Featurizer};
///
/// let featurizer = CationProperty::from_preset("deml")?;
/// let labels = featurizer.feature_labels();
/// assert_eq!(labels.len(), 25);
/// assert_eq!(labels[0], "minimum total_ioniz of cations");
/// # Ok::<(), ionfeat::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct CationProperty {
    table: Arc<PropertyTable>,
    stats: Vec<Stat>,
}

impl CationProperty {
    pub fn new(config: &FeaturizerConfig) -> Result<Self, Error> {
        Ok(Self {
            table: config.load_table()?,
            stats: config.stats.clone(),
        })
    }

    pub fn from_preset(name: &str) -> Result<Self, Error> {
        Self::new(&FeaturizerConfig::preset(name))
    }

    pub fn properties(&self) -> &[String] {
        self.table.cation_properties()
    }
}

impl Featurizer for CationProperty {
    fn name(&self) -> &'static str {
        "cation_property"
    }

    fn feature_labels(&self) -> Vec<String> {
        self.properties()
            .iter()
            .flat_map(|property| {
                self.stats
                    .iter()
                    .map(move |stat| format!("{} {} of cations", stat, property))
            })
            .collect()
    }

    fn featurize(&self, composition: &Composition) -> Result<Vec<f64>, Error> {
        require_decorated(composition)?;

        let cations: Vec<Species> = composition
            .species()
            .into_iter()
            .map(|(sp, _)| sp)
            .filter(Species::is_cation)
            .collect();

        let mut features = Vec::with_capacity(self.properties().len() * self.stats.len());
        for property in self.properties() {
            let values = cations
                .iter()
                .map(|&sp| self.table.ion_property(sp, property))
                .collect::<Result<Vec<_>, _>>()?;
            features.extend(Summary::of(&values).select(&self.stats));
        }

        Ok(features)
    }

    fn citations(&self) -> Vec<String> {
        table_citations(&self.table, &[])
    }
}
