use super::species::{ParseSpeciesError, Species};
use super::types::{Element, ParseElementError};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const INTEGER_TOLERANCE: f64 = 1e-6;
const MAX_MULTIPLIER: u32 = 1000;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompositionError {
    #[error("composition is empty: at least one element is required")]
    Empty,

    #[error("amount of {key} must be finite and positive, got {amount}")]
    InvalidAmount { key: String, amount: f64 },

    #[error("invalid formula '{formula}': {detail}")]
    Formula { formula: String, detail: String },

    #[error(transparent)]
    Element(#[from] ParseElementError),
}

/// One composition entry: an element, optionally in a fixed oxidation state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Entry {
    pub element: Element,
    pub oxidation_state: Option<i32>,
    pub amount: f64,
}

impl Entry {
    pub fn species(&self) -> Option<Species> {
        self.oxidation_state
            .map(|state| Species::new(self.element, state))
    }

    fn key(&self) -> String {
        match self.species() {
            Some(species) => species.to_string(),
            None => self.element.to_string(),
        }
    }
}

/// An ordered mapping from elements (or species) to positive amounts.
///
/// A composition is either entirely bare ([`from_elements`](Self::from_elements),
/// formula parsing) or entirely charge-decorated ([`from_species`](Self::from_species)).
/// Entries keep first-appearance order; repeated keys are merged.
///
/// # Examples
///
/// ```
/// use ionfeat::{Composition, Element};
///
/// let comp: Composition = "Fe2O3".parse()?;
/// assert_eq!(comp.elements(), vec![Element::Fe, Element::O]);
/// assert_eq!(comp.total(), 5.0);
/// assert!(!comp.is_decorated());
/// # Ok::<(), ionfeat::CompositionError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Composition {
    entries: Vec<Entry>,
}

impl Composition {
    pub fn from_elements<I>(amounts: I) -> Result<Self, CompositionError>
    where
        I: IntoIterator<Item = (Element, f64)>,
    {
        Self::from_entries(amounts.into_iter().map(|(element, amount)| Entry {
            element,
            oxidation_state: None,
            amount,
        }))
    }

    pub fn from_species<I>(amounts: I) -> Result<Self, CompositionError>
    where
        I: IntoIterator<Item = (Species, f64)>,
    {
        Self::from_entries(amounts.into_iter().map(|(species, amount)| Entry {
            element: species.element,
            oxidation_state: Some(species.oxidation_state),
            amount,
        }))
    }

    fn from_entries(entries: impl IntoIterator<Item = Entry>) -> Result<Self, CompositionError> {
        let mut merged: Vec<Entry> = Vec::new();

        for entry in entries {
            if !entry.amount.is_finite() || entry.amount <= 0.0 {
                return Err(CompositionError::InvalidAmount {
                    key: entry.key(),
                    amount: entry.amount,
                });
            }
            match merged.iter_mut().find(|e| {
                e.element == entry.element && e.oxidation_state == entry.oxidation_state
            }) {
                Some(existing) => existing.amount += entry.amount,
                None => merged.push(entry),
            }
        }

        if merged.is_empty() {
            return Err(CompositionError::Empty);
        }

        Ok(Self { entries: merged })
    }

    #[inline]
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn is_decorated(&self) -> bool {
        self.entries
            .first()
            .is_some_and(|e| e.oxidation_state.is_some())
    }

    pub fn total(&self) -> f64 {
        self.entries.iter().map(|e| e.amount).sum()
    }

    /// Distinct elements in first-appearance order.
    pub fn elements(&self) -> Vec<Element> {
        self.element_amounts().into_iter().map(|(el, _)| el).collect()
    }

    /// Amount per element, with species of the same element merged.
    pub fn element_amounts(&self) -> Vec<(Element, f64)> {
        let mut amounts: Vec<(Element, f64)> = Vec::with_capacity(self.entries.len());
        for entry in &self.entries {
            match amounts.iter_mut().find(|(el, _)| *el == entry.element) {
                Some((_, amount)) => *amount += entry.amount,
                None => amounts.push((entry.element, entry.amount)),
            }
        }
        amounts
    }

    pub fn element_fractions(&self) -> Vec<(Element, f64)> {
        let total = self.total();
        self.element_amounts()
            .into_iter()
            .map(|(el, amount)| (el, amount / total))
            .collect()
    }

    /// Decorated entries as `(species, amount)`; empty for a bare composition.
    pub fn species(&self) -> Vec<(Species, f64)> {
        self.entries
            .iter()
            .filter_map(|e| e.species().map(|sp| (sp, e.amount)))
            .collect()
    }

    pub fn amount_of(&self, element: Element) -> f64 {
        self.entries
            .iter()
            .filter(|e| e.element == element)
            .map(|e| e.amount)
            .sum()
    }

    /// Whole-number site counts per entry for the reduced formula.
    ///
    /// Amounts are scaled by the smallest multiplier that makes each one an
    /// integer, then divided by their greatest common divisor, so `MnO3`,
    /// `Mn3O9` and `Mn0.25O0.75` all give `[1, 3]`.
    ///
    /// Returns `None` when no multiplier up to 1000 works.
    pub fn integer_counts(&self) -> Option<Vec<u32>> {
        let counts: Vec<u32> = (1..=MAX_MULTIPLIER).find_map(|k| {
            self.entries
                .iter()
                .map(|e| {
                    let scaled = e.amount * f64::from(k);
                    let rounded = scaled.round();
                    ((scaled - rounded).abs() <= INTEGER_TOLERANCE
                        && rounded >= 1.0
                        && rounded <= f64::from(u32::MAX))
                    .then_some(rounded as u32)
                })
                .collect()
        })?;

        let divisor = counts.iter().copied().fold(0, gcd).max(1);
        Some(counts.into_iter().map(|c| c / divisor).collect())
    }
}

fn gcd(a: u32, b: u32) -> u32 {
    if b == 0 { a } else { gcd(b, a % b) }
}

impl fmt::Display for Composition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, entry) in self.entries.iter().enumerate() {
            match entry.species() {
                Some(species) => {
                    if idx > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{}:{}", species, format_amount(entry.amount))?;
                }
                None => {
                    f.write_str(entry.element.symbol())?;
                    if (entry.amount - 1.0).abs() > f64::EPSILON {
                        f.write_str(&format_amount(entry.amount))?;
                    }
                }
            }
        }
        Ok(())
    }
}

fn format_amount(amount: f64) -> String {
    if (amount - amount.round()).abs() < 1e-8 {
        format!("{}", amount.round() as i64)
    } else {
        format!("{}", amount)
    }
}

impl FromStr for Composition {
    type Err = CompositionError;

    /// Parses a chemical formula such as `Fe2O3`, `Fe0.5O0.5` or `Ca3(PO4)2`,
    /// or a charge-decorated list such as `Fe2+:1 Fe3+:2 O2-:4`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.contains(['+', '-', ':']) {
            return parse_decorated(s);
        }

        let mut parser = FormulaParser {
            formula: s,
            chars: s.chars().filter(|c| !c.is_whitespace()).collect(),
            pos: 0,
        };
        let amounts = parser.parse_group(None)?;
        if parser.pos < parser.chars.len() {
            return Err(parser.error(format!(
                "unexpected '{}' at position {}",
                parser.chars[parser.pos], parser.pos
            )));
        }
        Self::from_elements(amounts)
    }
}

/// Whitespace-separated `species[:amount]` tokens; the amount defaults to 1.
fn parse_decorated(s: &str) -> Result<Composition, CompositionError> {
    let formula_error = |detail: String| CompositionError::Formula {
        formula: s.to_string(),
        detail,
    };

    let mut amounts = Vec::new();
    for token in s.split_whitespace() {
        let (species, amount) = match token.split_once(':') {
            Some((species, amount)) => (species, Some(amount)),
            None => (token, None),
        };
        let species: Species = species
            .parse()
            .map_err(|e: ParseSpeciesError| formula_error(e.to_string()))?;
        let amount = match amount {
            Some(text) => text
                .parse::<f64>()
                .map_err(|_| formula_error(format!("invalid amount '{}'", text)))?,
            None => 1.0,
        };
        amounts.push((species, amount));
    }

    Composition::from_species(amounts)
}

struct FormulaParser<'a> {
    formula: &'a str,
    chars: Vec<char>,
    pos: usize,
}

impl FormulaParser<'_> {
    fn error(&self, detail: impl Into<String>) -> CompositionError {
        CompositionError::Formula {
            formula: self.formula.to_string(),
            detail: detail.into(),
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn parse_group(&mut self, close: Option<char>) -> Result<Vec<(Element, f64)>, CompositionError> {
        let mut amounts = Vec::new();

        while let Some(c) = self.peek() {
            match c {
                '(' | '[' => {
                    self.pos += 1;
                    let closing = if c == '(' { ')' } else { ']' };
                    let inner = self.parse_group(Some(closing))?;
                    let factor = self.parse_number()?.unwrap_or(1.0);
                    amounts.extend(inner.into_iter().map(|(el, n)| (el, n * factor)));
                }
                ')' | ']' => {
                    if close != Some(c) {
                        return Err(self.error(format!("unbalanced '{}'", c)));
                    }
                    self.pos += 1;
                    return Ok(amounts);
                }
                c if c.is_ascii_uppercase() => {
                    let start = self.pos;
                    self.pos += 1;
                    while self.peek().is_some_and(|c| c.is_ascii_lowercase()) {
                        self.pos += 1;
                    }
                    let symbol: String = self.chars[start..self.pos].iter().collect();
                    let element = symbol.parse::<Element>()?;
                    let amount = self.parse_number()?.unwrap_or(1.0);
                    amounts.push((element, amount));
                }
                other => {
                    return Err(self.error(format!(
                        "unexpected '{}' at position {}",
                        other, self.pos
                    )));
                }
            }
        }

        match close {
            Some(c) => Err(self.error(format!("missing closing '{}'", c))),
            None => Ok(amounts),
        }
    }

    fn parse_number(&mut self) -> Result<Option<f64>, CompositionError> {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_digit() || c == '.')
        {
            self.pos += 1;
        }
        if start == self.pos {
            return Ok(None);
        }
        let text: String = self.chars[start..self.pos].iter().collect();
        text.parse::<f64>()
            .map(Some)
            .map_err(|_| self.error(format!("invalid amount '{}'", text)))
    }
}
