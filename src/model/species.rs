use super::types::{Element, ParseElementError};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseSpeciesError {
    #[error("species string is empty")]
    Empty,
    #[error(transparent)]
    Element(#[from] ParseElementError),
    #[error("invalid oxidation state in species '{0}'")]
    OxidationState(String),
}

/// An element in a specific integer oxidation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Species {
    pub element: Element,
    pub oxidation_state: i32,
}

impl Species {
    pub fn new(element: Element, oxidation_state: i32) -> Self {
        Self {
            element,
            oxidation_state,
        }
    }

    #[inline]
    pub fn is_cation(&self) -> bool {
        self.oxidation_state > 0
    }

    #[inline]
    pub fn is_anion(&self) -> bool {
        self.oxidation_state < 0
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.oxidation_state < 0 { '-' } else { '+' };
        write!(
            f,
            "{}{}{}",
            self.element,
            self.oxidation_state.unsigned_abs(),
            sign
        )
    }
}

impl FromStr for Species {
    type Err = ParseSpeciesError;

    /// Parses `Fe3+`, `O2-`, `Cl-`, `Na+`, `Fe0` and `Fe0+`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ParseSpeciesError::Empty);
        }

        let split = s
            .char_indices()
            .skip(1)
            .find(|(_, c)| !c.is_ascii_lowercase())
            .map(|(idx, _)| idx)
            .unwrap_or(s.len());
        let (symbol, charge) = s.split_at(split);
        let element = Element::from_str(symbol)?;

        let bad = || ParseSpeciesError::OxidationState(s.to_string());
        let oxidation_state = match charge.chars().last() {
            None => return Err(bad()),
            Some(sign @ ('+' | '-')) => {
                let magnitude = &charge[..charge.len() - 1];
                if !magnitude.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(bad());
                }
                let magnitude: i32 = if magnitude.is_empty() {
                    1
                } else {
                    magnitude.parse().map_err(|_| bad())?
                };
                if sign == '-' { -magnitude } else { magnitude }
            }
            Some(_) => match charge.parse::<i32>() {
                Ok(0) => 0,
                _ => return Err(bad()),
            },
        };

        Ok(Species::new(element, oxidation_state))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_common_forms() {
        assert_eq!("Fe3+".parse::<Species>().unwrap(), Species::new(Element::Fe, 3));
        assert_eq!("O2-".parse::<Species>().unwrap(), Species::new(Element::O, -2));
        assert_eq!("Cl-".parse::<Species>().unwrap(), Species::new(Element::Cl, -1));
        assert_eq!("Na+".parse::<Species>().unwrap(), Species::new(Element::Na, 1));
        assert_eq!("Fe0".parse::<Species>().unwrap(), Species::new(Element::Fe, 0));
        assert_eq!("Fe0+".parse::<Species>().unwrap(), Species::new(Element::Fe, 0));
    }

    #[test]
    fn parse_rejects_malformed() {
        assert_eq!("".parse::<Species>(), Err(ParseSpeciesError::Empty));
        assert!(matches!(
            "Xx2+".parse::<Species>(),
            Err(ParseSpeciesError::Element(_))
        ));
        assert!(matches!(
            "Fe".parse::<Species>(),
            Err(ParseSpeciesError::OxidationState(_))
        ));
        assert!(matches!(
            "Fe3".parse::<Species>(),
            Err(ParseSpeciesError::OxidationState(_))
        ));
        assert!(matches!(
            "Fe+2+".parse::<Species>(),
            Err(ParseSpeciesError::OxidationState(_))
        ));
    }

    #[test]
    fn display_round_trips_sign() {
        assert_eq!(Species::new(Element::Fe, 3).to_string(), "Fe3+");
        assert_eq!(Species::new(Element::O, -2).to_string(), "O2-");
        assert_eq!(Species::new(Element::Al, 0).to_string(), "Al0+");
    }

    #[test]
    fn cation_anion_classification() {
        assert!(Species::new(Element::Fe, 2).is_cation());
        assert!(Species::new(Element::O, -2).is_anion());
        let neutral = Species::new(Element::Fe, 0);
        assert!(!neutral.is_cation() && !neutral.is_anion());
    }
}
