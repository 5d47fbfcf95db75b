use super::{Featurizer, require_decorated, stat_labels, table_citations};
use crate::featurize::config::FeaturizerConfig;
use crate::featurize::data::PropertyTable;
use crate::featurize::error::Error;
use crate::featurize::stats::{Stat, Summary};
use crate::model::composition::Composition;
use crate::model::species::Species;
use std::sync::Arc;

/// Statistics of the electronegativity difference across every
/// cation–anion pair of a charge-decorated composition.
///
/// Pairs are formed between distinct species, not sites, so the result
/// does not depend on stoichiometry. Without cations or anions there are
/// no pairs and every statistic is zero.
#[derive(Debug, Clone)]
pub struct ElectronegativityDiff {
    table: Arc<PropertyTable>,
    stats: Vec<Stat>,
}

impl ElectronegativityDiff {
    pub fn new(config: &FeaturizerConfig) -> Result<Self, Error> {
        Ok(Self {
            table: config.load_table()?,
            stats: config.stats.clone(),
        })
    }

    pub fn from_preset(name: &str) -> Result<Self, Error> {
        Self::new(&FeaturizerConfig::preset(name))
    }

    fn electronegativities(
        &self,
        species: &[Species],
        keep: fn(&Species) -> bool,
    ) -> Result<Vec<f64>, Error> {
        species
            .iter()
            .filter(|sp| keep(sp))
            .map(|sp| self.table.electronegativity(sp.element))
            .collect()
    }
}

impl Featurizer for ElectronegativityDiff {
    fn name(&self) -> &'static str {
        "electronegativity_diff"
    }

    fn feature_labels(&self) -> Vec<String> {
        stat_labels(&self.stats, "EN difference")
    }

    fn featurize(&self, composition: &Composition) -> Result<Vec<f64>, Error> {
        require_decorated(composition)?;

        let species: Vec<Species> = composition.species().into_iter().map(|(sp, _)| sp).collect();
        let cations = self.electronegativities(&species, Species::is_cation)?;
        let anions = self.electronegativities(&species, Species::is_anion)?;

        let differences: Vec<f64> = cations
            .iter()
            .flat_map(|c| anions.iter().map(move |a| (c - a).abs()))
            .collect();

        Ok(Summary::of(&differences).select(&self.stats))
    }

    fn citations(&self) -> Vec<String> {
        table_citations(&self.table, &[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::types::Element;

    fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
        (a - b).abs() <= eps
    }

    fn decorated(entries: &[(Element, i32, f64)]) -> Composition {
        Composition::from_species(
            entries
                .iter()
                .map(|&(el, state, amount)| (Species::new(el, state), amount)),
        )
        .unwrap()
    }

    #[test]
    fn wustite_single_pair() {
        let featurizer = ElectronegativityDiff::new(&FeaturizerConfig::default()).unwrap();
        let comp = decorated(&[(Element::Fe, 2, 1.0), (Element::O, -2, 1.0)]);
        let labels = featurizer.feature_labels();
        let f = featurizer.featurize(&comp).unwrap();

        assert_eq!(labels[0], "minimum EN difference");
        assert_eq!(labels[4], "std_dev EN difference");
        assert!(approx_eq(f[0], 1.61, 1e-9));
        assert!(approx_eq(f[1], 1.61, 1e-9));
        assert!(approx_eq(f[2], 0.0, 1e-12));
        assert!(approx_eq(f[3], 1.61, 1e-9));
        assert!(approx_eq(f[4], 0.0, 1e-12));
    }

    #[test]
    fn every_cation_anion_pair_counts() {
        let featurizer = ElectronegativityDiff::from_preset("deml").unwrap();
        // Li 0.98, Fe 1.83 against O 3.44, F 3.98
        let comp = decorated(&[
            (Element::Li, 1, 1.0),
            (Element::Fe, 3, 1.0),
            (Element::O, -2, 1.0),
            (Element::F, -1, 2.0),
        ]);
        let f = featurizer.featurize(&comp).unwrap();
        assert!(approx_eq(f[0], 1.61, 1e-9));
        assert!(approx_eq(f[1], 3.0, 1e-9));
        assert!(approx_eq(f[3], (2.46 + 3.0 + 1.61 + 2.15) / 4.0, 1e-9));
    }

    #[test]
    fn no_pairs_reduce_to_zeros() {
        let featurizer = ElectronegativityDiff::from_preset("deml").unwrap();
        let comp = decorated(&[(Element::Fe, 2, 1.0), (Element::Al, 3, 1.0)]);
        assert_eq!(featurizer.featurize(&comp).unwrap(), vec![0.0; 5]);
    }
}
