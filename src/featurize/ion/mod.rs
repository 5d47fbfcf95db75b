//! Ion-based composition featurizers.
//!
//! Every featurizer turns a [`Composition`] into a fixed-length vector of
//! numbers with stable labels. Property tables are resolved once, when the
//! featurizer is built from a
//! [`FeaturizerConfig`](super::config::FeaturizerConfig); featurizing never
//! touches configuration again.

mod cation_property;
mod electron_affinity;
mod electronegativity_diff;
mod ion_property;
mod oxidation_states;

pub use cation_property::CationProperty;
pub use electron_affinity::ElectronAffinity;
pub use electronegativity_diff::ElectronegativityDiff;
pub use ion_property::IonProperty;
pub use oxidation_states::OxidationStates;

use super::data::PropertyTable;
use super::error::Error;
use super::stats::Stat;
use crate::model::composition::Composition;

/// Ward et al., npj Computational Materials 2, 16028 (2016).
const WARD_2016: &str = "@article{ward_agrawal_choudary_wolverton_2016, \
title={A general-purpose machine learning framework for predicting properties of inorganic materials}, \
volume={2}, DOI={10.1038/npjcompumats.2017.28}, number={1}, \
journal={npj Computational Materials}, \
author={Ward, Logan and Agrawal, Ankit and Choudhary, Alok and Wolverton, Christopher}, \
year={2016}}";

/// A composition featurizer with a fixed, labelled output vector.
pub trait Featurizer: Send + Sync {
    /// Short identifier of the featurizer.
    fn name(&self) -> &'static str;

    /// Labels of the values returned by [`featurize`](Featurizer::featurize),
    /// in the same order.
    fn feature_labels(&self) -> Vec<String>;

    /// Computes the feature vector of one composition.
    fn featurize(&self, composition: &Composition) -> Result<Vec<f64>, Error>;

    /// Literature references for the features and the data behind them.
    fn citations(&self) -> Vec<String>;
}

fn require_decorated(composition: &Composition) -> Result<(), Error> {
    if composition.is_decorated() {
        Ok(())
    } else {
        Err(Error::MissingOxidationStates(composition.to_string()))
    }
}

fn stat_labels(stats: &[Stat], subject: &str) -> Vec<String> {
    stats
        .iter()
        .map(|stat| format!("{} {}", stat, subject))
        .collect()
}

fn table_citations(table: &PropertyTable, extra: &[&str]) -> Vec<String> {
    let mut citations: Vec<String> = extra.iter().map(|c| c.to_string()).collect();
    if let Some(citation) = table.citation() {
        if !citations.iter().any(|c| c == citation) {
            citations.push(citation.to_string());
        }
    }
    citations
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_composition_is_rejected_where_states_are_required() {
        let comp: Composition = "NaCl".parse().unwrap();
        assert!(matches!(
            require_decorated(&comp),
            Err(Error::MissingOxidationStates(formula)) if formula == "NaCl"
        ));
    }

    #[test]
    fn labels_follow_stat_order() {
        assert_eq!(
            stat_labels(&[Stat::Range, Stat::Mean], "oxidation state"),
            vec!["range oxidation state", "mean oxidation state"]
        );
    }

    #[test]
    fn citations_are_not_duplicated() {
        let table = PropertyTable::preset("deml").unwrap();
        let own = table.citation().unwrap();
        assert_eq!(table_citations(&table, &[own]).len(), 1);
        assert_eq!(table_citations(&table, &[WARD_2016]).len(), 2);
    }
}
