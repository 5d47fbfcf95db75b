//! Ionicity classification and electronegativity-based ionic character.

use super::data::PropertyTable;
use super::error::Error;
use crate::model::composition::Composition;

/// Returns `true` if a charge-decorated composition contains at least one
/// cation and at least one anion.
///
/// Bare compositions, all-neutral compositions and compositions whose
/// charges all share one sign are not ionic.
///
/// # Examples
///
/// ```
/// use ionfeat::{Composition, Element, Species, is_ionic};
///
/// let feo = Composition::from_species([
///     (Species::new(Element::Fe, 2), 1.0),
///     (Species::new(Element::O, -2), 1.0),
/// ])?;
/// assert!(is_ionic(&feo));
///
/// let alloy = Composition::from_species([
///     (Species::new(Element::Fe, 0), 1.0),
///     (Species::new(Element::Al, 0), 1.0),
/// ])?;
/// assert!(!is_ionic(&alloy));
/// # Ok::<(), ionfeat::CompositionError>(())
/// ```
pub fn is_ionic(composition: &Composition) -> bool {
    let species = composition.species();
    species.iter().any(|(sp, _)| sp.is_cation()) && species.iter().any(|(sp, _)| sp.is_anion())
}

/// Pauling-style ionic character of a bond between elements with
/// electronegativities `en_a` and `en_b`: `1 - exp(-(Δχ)² / 4)`.
///
/// The result lies in `[0, 1)` and is symmetric in its arguments.
#[inline]
pub fn ionic_character(en_a: f64, en_b: f64) -> f64 {
    1.0 - (-0.25 * (en_a - en_b).powi(2)).exp()
}

/// Composition-level ionic character statistics.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct IonicCharacter {
    /// Largest pairwise ionic character over all element pairs.
    pub max: f64,
    /// Sum of pairwise ionic character weighted by both element fractions.
    pub avg: f64,
}

impl IonicCharacter {
    /// Computes ionic character over every unordered pair of distinct
    /// elements, independent of any oxidation-state assignment.
    ///
    /// Species of the same element are merged first. A single-element
    /// composition has no pairs and yields zeros.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingProperty`] if an element has no
    /// electronegativity in `table`.
    pub fn of(composition: &Composition, table: &PropertyTable) -> Result<Self, Error> {
        let fractions = composition.element_fractions();
        let electronegativities = fractions
            .iter()
            .map(|&(el, _)| table.electronegativity(el))
            .collect::<Result<Vec<_>, _>>()?;

        let mut result = Self::default();
        for i in 0..fractions.len() {
            for j in (i + 1)..fractions.len() {
                let character = ionic_character(electronegativities[i], electronegativities[j]);
                result.max = result.max.max(character);
                result.avg += character * fractions[i].1 * fractions[j].1;
            }
        }

        Ok(result)
    }
}
