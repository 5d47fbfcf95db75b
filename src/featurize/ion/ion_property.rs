use super::{Featurizer, WARD_2016, table_citations};
use crate::featurize::config::{CandidateSource, FeaturizerConfig};
use crate::featurize::data::PropertyTable;
use crate::featurize::error::Error;
use crate::featurize::ionic::IonicCharacter;
use crate::featurize::oxidation::{OxidationSearch, SearchMode};
use crate::model::composition::Composition;
use std::sync::Arc;

/// Whether a charge-balanced ionic assignment exists, plus the maximum and
/// fraction-weighted average ionic character of the composition.
///
/// Ionic character is computed from electronegativities over element
/// pairs and does not depend on whether the compound is ionic. A
/// composition that already carries oxidation states is judged on that
/// fixed assignment, so the search mode only matters for bare formulas.
///
/// # Examples
///
/// ```
/// use ionfeat::{Composition, Featurizer, IonProperty};
///
/// let mut featurizer = IonProperty::default();
/// let magnetite: Composition = "Fe3O4".parse()?;
/// assert_eq!(featurizer.featurize(&magnetite)?[0], 1.0);
///
/// featurizer.set_fast(true);
/// assert_eq!(featurizer.featurize(&magnetite)?[0], 0.0);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct IonProperty {
    table: Arc<PropertyTable>,
    candidates: CandidateSource,
    fast: bool,
}

impl IonProperty {
    pub fn new(config: &FeaturizerConfig) -> Result<Self, Error> {
        Ok(Self {
            table: config.load_table()?,
            candidates: config.candidates,
            fast: config.fast,
        })
    }

    pub fn from_preset(name: &str) -> Result<Self, Error> {
        Self::new(&FeaturizerConfig::preset(name))
    }

    pub fn is_fast(&self) -> bool {
        self.fast
    }

    pub fn set_fast(&mut self, fast: bool) {
        self.fast = fast;
    }

    pub fn table(&self) -> &PropertyTable {
        &self.table
    }

    fn search(&self) -> OxidationSearch<'_> {
        let mode = if self.fast {
            SearchMode::Fast
        } else {
            SearchMode::Exhaustive
        };
        OxidationSearch::new(&self.table, self.candidates, mode)
    }
}

impl Default for IonProperty {
    fn default() -> Self {
        Self::from_preset("pymatgen")
            .expect("Failed to load built-in 'pymatgen' preset. This is a library bug.")
    }
}

impl Featurizer for IonProperty {
    fn name(&self) -> &'static str {
        "ion_property"
    }

    fn feature_labels(&self) -> Vec<String> {
        vec![
            "compound possible".to_string(),
            "max ionic char".to_string(),
            "avg ionic char".to_string(),
        ]
    }

    fn featurize(&self, composition: &Composition) -> Result<Vec<f64>, Error> {
        let possible = self.search().compound_possible(composition);
        let character = IonicCharacter::of(composition, &self.table)?;

        Ok(vec![
            if possible { 1.0 } else { 0.0 },
            character.max,
            character.avg,
        ])
    }

    fn citations(&self) -> Vec<String> {
        table_citations(&self.table, &[WARD_2016])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::species::Species;
    use crate::model::types::Element;

    fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
        (a - b).abs() <= eps
    }

    #[test]
    fn hematite_features() {
        let featurizer = IonProperty::default();
        let f = featurizer.featurize(&"Fe2O3".parse().unwrap()).unwrap();
        assert_eq!(f.len(), featurizer.feature_labels().len());
        assert_eq!(f[0], 1.0);
        assert!(approx_eq(f[1], 0.476922164, 1e-7));
        assert!(approx_eq(f[2], 0.114461319, 1e-7));
    }

    #[test]
    fn fast_flag_only_affects_bare_input() {
        let mut featurizer = IonProperty::default();
        featurizer.set_fast(true);
        assert!(featurizer.is_fast());

        let bare: Composition = "Fe3O4".parse().unwrap();
        assert_eq!(featurizer.featurize(&bare).unwrap()[0], 0.0);

        let decorated = Composition::from_species([
            (Species::new(Element::Fe, 2), 1.0),
            (Species::new(Element::Fe, 3), 2.0),
            (Species::new(Element::O, -2), 4.0),
        ])
        .unwrap();
        assert_eq!(featurizer.featurize(&decorated).unwrap()[0], 1.0);
    }

    #[test]
    fn unbalanced_decorated_input_is_not_possible() {
        let featurizer = IonProperty::default();
        let comp = Composition::from_species([
            (Species::new(Element::Fe, 3), 1.0),
            (Species::new(Element::O, -2), 1.0),
        ])
        .unwrap();
        let f = featurizer.featurize(&comp).unwrap();
        assert_eq!(f[0], 0.0);
        assert!(f[1] > 0.0);
    }

    #[test]
    fn single_element_yields_zeros() {
        let featurizer = IonProperty::default();
        let f = featurizer.featurize(&"Fe".parse().unwrap()).unwrap();
        assert_eq!(f, vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn config_controls_search() {
        let config = FeaturizerConfig {
            preset: "pymatgen".to_string(),
            fast: true,
            ..Default::default()
        };
        let featurizer = IonProperty::new(&config).unwrap();
        assert!(featurizer.is_fast());
        assert_eq!(featurizer.table().name(), "pymatgen");
    }

    #[test]
    fn cites_framework_and_table() {
        let featurizer = IonProperty::default();
        let citations = featurizer.citations();
        assert_eq!(citations.len(), 2);
        assert!(citations[0].contains("ward_agrawal"));
    }
}
