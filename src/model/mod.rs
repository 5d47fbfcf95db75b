//! Chemical data model shared by the featurizers.
//!
//! - [`types`] – Periodic table elements.
//! - [`species`] – An element paired with an integer oxidation state.
//! - [`composition`] – Element or species amounts, parsed from chemical formulas.
//!
//! A [`Composition`] is either bare (elements only) or charge-decorated
//! (every entry carries an oxidation state); the featurizers accept both
//! and decide per feature whether oxidation states are required.
//!
//! [`Composition`]: composition::Composition

pub mod composition;
pub mod species;
pub mod types;
