use super::{Featurizer, require_decorated, table_citations};
use crate::featurize::config::FeaturizerConfig;
use crate::featurize::data::PropertyTable;
use crate::featurize::error::Error;
use crate::model::composition::Composition;
use std::sync::Arc;

/// Total electron affinity of the anions in a formula unit.
///
/// Each anion contributes `amount × |oxidation state| × electron affinity`,
/// the electrons it accepts times the per-electron affinity. Affinities in
/// the built-in tables are negative energies in J/mol, so the result is
/// negative for any composition with anions and zero without.
#[derive(Debug, Clone)]
pub struct ElectronAffinity {
    table: Arc<PropertyTable>,
}

impl ElectronAffinity {
    pub fn new(config: &FeaturizerConfig) -> Result<Self, Error> {
        Ok(Self {
            table: config.load_table()?,
        })
    }

    pub fn from_preset(name: &str) -> Result<Self, Error> {
        Self::new(&FeaturizerConfig::preset(name))
    }
}

impl Featurizer for ElectronAffinity {
    fn name(&self) -> &'static str {
        "electron_affinity"
    }

    fn feature_labels(&self) -> Vec<String> {
        vec!["avg anion electron affinity".to_string()]
    }

    fn featurize(&self, composition: &Composition) -> Result<Vec<f64>, Error> {
        require_decorated(composition)?;

        let mut total = 0.0;
        for (sp, amount) in composition.species() {
            if sp.is_anion() {
                let affinity = self.table.electron_affinity(sp.element)?;
                total += amount * f64::from(sp.oxidation_state.abs()) * affinity;
            }
        }

        Ok(vec![total])
    }

    fn citations(&self) -> Vec<String> {
        table_citations(&self.table, &[])
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

    fn featurizer() -> ElectronAffinity {
        ElectronAffinity::new(&FeaturizerConfig::default()).unwrap()
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
    fn wustite() {
        let comp = decorated(&[(Element::Fe, 2, 1.0), (Element::O, -2, 1.0)]);
        let f = featurizer().featurize(&comp).unwrap();
        assert!(approx_eq(f[0], -282000.0, 1e-6));
    }

    #[test]
    fn scales_with_anion_amount() {
        let one = decorated(&[(Element::Na, 1, 1.0), (Element::Cl, -1, 1.0)]);
        let three = decorated(&[(Element::Al, 3, 1.0), (Element::Cl, -1, 3.0)]);
        let a = featurizer().featurize(&one).unwrap()[0];
        let b = featurizer().featurize(&three).unwrap()[0];
        assert!(a < 0.0);
        assert!(approx_eq(b, 3.0 * a, 1e-6));
    }

    #[test]
    fn no_anions_is_zero() {
        let comp = decorated(&[(Element::Fe, 0, 1.0), (Element::Al, 0, 1.0)]);
        assert_eq!(featurizer().featurize(&comp).unwrap(), vec![0.0]);
    }

    #[test]
    fn table_without_affinities_fails() {
        let featurizer = ElectronAffinity::from_preset("pymatgen").unwrap();
        let comp = decorated(&[(Element::Fe, 2, 1.0), (Element::O, -2, 1.0)]);
        assert!(matches!(
            featurizer.featurize(&comp),
            Err(Error::MissingProperty { element: Element::O, .. })
        ));
    }

    #[test]
    fn bare_composition_is_rejected() {
        let comp: Composition = "FeO".parse().unwrap();
        assert!(featurizer().featurize(&comp).is_err());
    }
}
