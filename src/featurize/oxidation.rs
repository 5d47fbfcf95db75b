//! Charge-balanced oxidation-state search.
//!
//! Two search modes are available:
//!
//! - [`SearchMode::Exhaustive`] scales the composition to whole-number site
//!   counts and distributes every element's sites over its candidate
//!   states, so mixed-valence assignments such as Fe²⁺Fe³⁺₂O₄ are found.
//! - [`SearchMode::Fast`] gives every site of an element the same state and
//!   stops at the first neutral combination. It is cheaper but misses
//!   mixed-valence solutions: Fe₃O₄ balances exhaustively but not in fast
//!   mode.
//!
//! Compositions that already carry oxidation states bypass both searches.

use super::config::CandidateSource;
use super::data::PropertyTable;
use super::error::Error;
use super::ionic::is_ionic;
use crate::model::composition::Composition;
use crate::model::species::Species;
use crate::model::types::Element;
use log::{debug, trace, warn};
use std::cmp::Ordering;

/// Tolerance on the net charge, relative to the composition total.
const NEUTRALITY_TOLERANCE: f64 = 1e-8;

/// How the charge-balance search explores candidate oxidation states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchMode {
    /// One state per site; finds every neutral assignment.
    #[default]
    Exhaustive,
    /// One state per element; stops at the first neutral combination.
    Fast,
}

/// A charge-neutral oxidation-state assignment, expressed in the amounts
/// of the composition it was derived from.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    species: Vec<(Species, f64)>,
}

impl Assignment {
    pub fn species(&self) -> &[(Species, f64)] {
        &self.species
    }

    /// The charge-decorated composition for this assignment.
    pub fn to_composition(&self) -> Result<Composition, Error> {
        Ok(Composition::from_species(self.species.iter().copied())?)
    }

    pub fn is_ionic(&self) -> bool {
        self.species.iter().any(|(sp, _)| sp.is_cation())
            && self.species.iter().any(|(sp, _)| sp.is_anion())
    }

    fn total_abs_charge(&self) -> f64 {
        self.species
            .iter()
            .map(|(sp, amount)| f64::from(sp.oxidation_state.abs()) * amount)
            .sum()
    }

    fn common_amount(&self, table: &PropertyTable) -> f64 {
        self.species
            .iter()
            .filter(|(sp, _)| {
                table
                    .oxidation_states(sp.element, CandidateSource::Common)
                    .contains(&sp.oxidation_state)
            })
            .map(|(_, amount)| amount)
            .sum()
    }
}

/// Outcome of an oxidation-state search.
#[derive(Debug, Clone, PartialEq)]
pub enum Enumeration {
    /// No charge-neutral assignment exists.
    NoSolution,
    /// At least one charge-neutral assignment exists.
    OneOrMore(Vec<Assignment>),
}

impl Enumeration {
    fn from_assignments(assignments: Vec<Assignment>) -> Self {
        if assignments.is_empty() {
            Enumeration::NoSolution
        } else {
            Enumeration::OneOrMore(assignments)
        }
    }

    pub fn is_possible(&self) -> bool {
        matches!(self, Enumeration::OneOrMore(_))
    }

    pub fn assignments(&self) -> &[Assignment] {
        match self {
            Enumeration::NoSolution => &[],
            Enumeration::OneOrMore(assignments) => assignments,
        }
    }
}

/// Returns `true` if the net charge of a decorated composition is zero.
pub fn is_charge_balanced(composition: &Composition) -> bool {
    let net: f64 = composition
        .species()
        .iter()
        .map(|(sp, amount)| f64::from(sp.oxidation_state) * amount)
        .sum();
    net.abs() <= NEUTRALITY_TOLERANCE * composition.total().max(1.0)
}

/// Oxidation-state search over a property table's candidate states.
///
/// # Examples
///
/// ```
/// use ionfeat::{CandidateSource, Composition, OxidationSearch, PropertyTable, SearchMode};
///
/// let table = PropertyTable::preset("pymatgen")?;
/// let magnetite: Composition = "Fe3O4".parse()?;
///
/// let exhaustive = OxidationSearch::new(&table, CandidateSource::Common, SearchMode::Exhaustive);
/// assert!(exhaustive.compound_possible(&magnetite));
///
/// let fast = OxidationSearch::new(&table, CandidateSource::Common, SearchMode::Fast);
/// assert!(!fast.compound_possible(&magnetite));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct OxidationSearch<'a> {
    table: &'a PropertyTable,
    source: CandidateSource,
    mode: SearchMode,
}

struct SiteGroup<'c> {
    element: Element,
    amount: f64,
    count: u32,
    candidates: &'c [i32],
}

impl<'a> OxidationSearch<'a> {
    pub fn new(table: &'a PropertyTable, source: CandidateSource, mode: SearchMode) -> Self {
        Self {
            table,
            source,
            mode,
        }
    }

    pub fn mode(&self) -> SearchMode {
        self.mode
    }

    /// All charge-neutral assignments the configured mode finds.
    ///
    /// Fast mode reports at most one assignment. A decorated composition
    /// yields its own assignment when it is charge balanced.
    pub fn enumerate(&self, composition: &Composition) -> Enumeration {
        self.search(composition, false)
    }

    /// Returns `true` if some charge-neutral assignment is also ionic.
    pub fn compound_possible(&self, composition: &Composition) -> bool {
        if composition.is_decorated() {
            return is_charge_balanced(composition) && is_ionic(composition);
        }
        self.search(composition, true)
            .assignments()
            .iter()
            .any(Assignment::is_ionic)
    }

    /// Neutral assignments ranked from most to least plausible.
    ///
    /// Ranking prefers assignments with more sites in a common oxidation
    /// state, then a smaller total absolute charge, then search order.
    pub fn guesses(&self, composition: &Composition) -> Vec<Assignment> {
        let mut assignments = match self.enumerate(composition) {
            Enumeration::NoSolution => return Vec::new(),
            Enumeration::OneOrMore(assignments) => assignments,
        };

        let mut scored: Vec<(f64, f64, Assignment)> = assignments
            .drain(..)
            .map(|a| (a.common_amount(self.table), a.total_abs_charge(), a))
            .collect();
        scored.sort_by(|a, b| match b.0.total_cmp(&a.0) {
            Ordering::Equal => a.1.total_cmp(&b.1),
            other => other,
        });
        scored.into_iter().map(|(_, _, a)| a).collect()
    }

    /// Decorates a bare composition with its best-ranked guess.
    ///
    /// Decorated compositions are returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoChargeBalance`] if no neutral assignment exists.
    pub fn decorate(&self, composition: &Composition) -> Result<Composition, Error> {
        if composition.is_decorated() {
            return Ok(composition.clone());
        }
        self.guesses(composition)
            .first()
            .ok_or_else(|| Error::NoChargeBalance(composition.to_string()))?
            .to_composition()
    }

    fn search(&self, composition: &Composition, ionic_only: bool) -> Enumeration {
        if composition.is_decorated() {
            let fixed = Assignment {
                species: composition.species(),
            };
            return if is_charge_balanced(composition) {
                Enumeration::OneOrMore(vec![fixed])
            } else {
                Enumeration::NoSolution
            };
        }

        let Some(groups) = self.site_groups(composition) else {
            return Enumeration::NoSolution;
        };

        let assignments = match self.mode {
            SearchMode::Exhaustive => exhaustive(&groups, ionic_only),
            SearchMode::Fast => fast(&groups, composition.total(), ionic_only)
                .into_iter()
                .collect(),
        };

        debug!(
            "{} ({:?} search): {} charge-balanced assignment(s)",
            composition,
            self.mode,
            assignments.len()
        );

        Enumeration::from_assignments(assignments)
    }

    fn site_groups(&self, composition: &Composition) -> Option<Vec<SiteGroup<'a>>> {
        let counts = match self.mode {
            SearchMode::Exhaustive => match composition.integer_counts() {
                Some(counts) => counts,
                None => {
                    warn!(
                        "{} cannot be scaled to whole-number site counts; no oxidation states assigned",
                        composition
                    );
                    return None;
                }
            },
            SearchMode::Fast => vec![1; composition.len()],
        };

        let mut groups = Vec::with_capacity(composition.len());
        for (entry, count) in composition.entries().iter().zip(counts) {
            let candidates = self.table.oxidation_states(entry.element, self.source);
            if candidates.is_empty() {
                debug!("{} has no candidate oxidation states", entry.element);
                return None;
            }
            groups.push(SiteGroup {
                element: entry.element,
                amount: entry.amount,
                count,
                candidates,
            });
        }
        Some(groups)
    }
}

/// With `first_ionic` set, the search stops at the first ionic assignment.
fn exhaustive(groups: &[SiteGroup<'_>], first_ionic: bool) -> Vec<Assignment> {
    // Reachable net charge of groups[i..], used to prune partial sums.
    let mut suffix = vec![(0i64, 0i64); groups.len() + 1];
    for (i, group) in groups.iter().enumerate().rev() {
        let (lo, hi) = state_bounds(group.candidates);
        let n = i64::from(group.count);
        suffix[i] = (suffix[i + 1].0 + n * lo, suffix[i + 1].1 + n * hi);
    }

    let mut search = Exhaustive {
        groups,
        suffix,
        current: Vec::new(),
        found: Vec::new(),
        first_ionic,
        done: false,
    };
    search.group(0, 0);
    search.found
}

struct Exhaustive<'g, 'c> {
    groups: &'g [SiteGroup<'c>],
    suffix: Vec<(i64, i64)>,
    current: Vec<(Species, f64)>,
    found: Vec<Assignment>,
    first_ionic: bool,
    done: bool,
}

impl Exhaustive<'_, '_> {
    fn group(&mut self, idx: usize, charge: i64) {
        let (lo, hi) = self.suffix[idx];
        if self.done || charge + lo > 0 || charge + hi < 0 {
            return;
        }
        if idx == self.groups.len() {
            let assignment = Assignment {
                species: self.current.clone(),
            };
            self.done = self.first_ionic && assignment.is_ionic();
            self.found.push(assignment);
            return;
        }
        let count = self.groups[idx].count;
        self.distribute(idx, 0, count, charge);
    }

    /// Places `remaining` sites of group `idx` on candidates `cand..`.
    fn distribute(&mut self, idx: usize, cand: usize, remaining: u32, charge: i64) {
        let groups = self.groups;
        let group = &groups[idx];
        let candidates = group.candidates;

        let (lo, hi) = state_bounds(&candidates[cand..]);
        let (rest_lo, rest_hi) = self.suffix[idx + 1];
        let n = i64::from(remaining);
        if charge + n * lo + rest_lo > 0 || charge + n * hi + rest_hi < 0 {
            trace!("pruned {} at candidate {}", group.element, cand);
            return;
        }

        let state = candidates[cand];
        let site_amount = group.amount / f64::from(group.count);
        let takes: Vec<u32> = if cand + 1 == candidates.len() {
            vec![remaining]
        } else {
            (0..=remaining).rev().collect()
        };

        for take in takes {
            if self.done {
                break;
            }
            let next_charge = charge + i64::from(state) * i64::from(take);
            if take > 0 {
                self.current
                    .push((Species::new(group.element, state), f64::from(take) * site_amount));
            }
            if take == remaining {
                self.group(idx + 1, next_charge);
            } else {
                self.distribute(idx, cand + 1, remaining - take, next_charge);
            }
            if take > 0 {
                self.current.pop();
            }
        }
    }
}

fn fast(groups: &[SiteGroup<'_>], total: f64, ionic_only: bool) -> Option<Assignment> {
    let mut states = vec![0i32; groups.len()];
    let tolerance = NEUTRALITY_TOLERANCE * total.max(1.0);

    fn walk(
        groups: &[SiteGroup<'_>],
        idx: usize,
        charge: f64,
        states: &mut [i32],
        tolerance: f64,
        ionic_only: bool,
    ) -> bool {
        if idx == groups.len() {
            let balanced = charge.abs() <= tolerance;
            let ionic = states.iter().any(|&s| s > 0) && states.iter().any(|&s| s < 0);
            return balanced && (ionic || !ionic_only);
        }
        for &state in groups[idx].candidates {
            states[idx] = state;
            let next = charge + f64::from(state) * groups[idx].amount;
            if walk(groups, idx + 1, next, states, tolerance, ionic_only) {
                return true;
            }
        }
        false
    }

    walk(groups, 0, 0.0, &mut states, tolerance, ionic_only).then(|| Assignment {
        species: groups
            .iter()
            .zip(&states)
            .map(|(g, &state)| (Species::new(g.element, state), g.amount))
            .collect(),
    })
}

fn state_bounds(candidates: &[i32]) -> (i64, i64) {
    let lo = candidates.iter().copied().min().unwrap_or(0);
    let hi = candidates.iter().copied().max().unwrap_or(0);
    (i64::from(lo), i64::from(hi))
}
