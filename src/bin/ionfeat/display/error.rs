use std::io::{self, Write};

use anyhow::Error;

use crate::util::text::wrap;

#[rustfmt::skip]
pub fn print_error(err: &Error) {
    let mut stderr = io::stderr().lock();

    let _ = writeln!(stderr);
    let _ = writeln!(stderr, "   ╔══════════════════════════════════════════════════════════════╗");
    let _ = writeln!(stderr, "   ║  ✗ Error                                                     ║");
    let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");

    for line in wrap(&err.to_string(), 59) {
        let _ = writeln!(stderr, "   ║  {:<59} ║", line);
    }

    for cause in err.chain().skip(1) {
        let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");
        let _ = writeln!(stderr, "   ║  Caused by:                                                  ║");
        for line in wrap(&cause.to_string(), 57) {
            let _ = writeln!(stderr, "   ║    {:<57} ║", line);
        }
    }

    let hints = collect_hints(err);
    if !hints.is_empty() {
        let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");
        let _ = writeln!(stderr, "   ║  Hints:                                                      ║");
        for hint in hints {
            let wrapped = wrap(&hint, 55);
            if let Some((first, rest)) = wrapped.split_first() {
                let _ = writeln!(stderr, "   ║    • {:<55} ║", first);
                for line in rest {
                    let _ = writeln!(stderr, "   ║      {:<55} ║", line);
                }
            }
        }
    }

    let _ = writeln!(stderr, "   ╚══════════════════════════════════════════════════════════════╝");
    let _ = writeln!(stderr);
}

fn collect_hints(err: &Error) -> Vec<String> {
    let mut hints = Vec::new();

    if let Some(e) = err.downcast_ref::<ionfeat::Error>() {
        featurize_hints(e, &mut hints);
    } else if let Some(e) = err.downcast_ref::<ionfeat::CompositionError>() {
        composition_hints(e, &mut hints);
    } else if let Some(e) = err.downcast_ref::<io::Error>() {
        io_hints(e, &mut hints);
    } else if err.to_string().contains("stdin is a terminal") {
        hints.push("Pass formulas as arguments or pipe them via stdin".to_string());
    }

    hints
}

fn featurize_hints(err: &ionfeat::Error, hints: &mut Vec<String>) {
    use ionfeat::Error;

    match err {
        Error::UnknownPreset(_) => {
            hints.push("Run `ionfeat presets` to list the built-in presets".to_string());
            hints.push("Or supply your own table with --table <FILE>".to_string());
        }

        Error::TableParse(_) | Error::TableEntry { .. } => {
            hints.push("Custom tables need a [meta] section with a name".to_string());
            hints.push("Elements go under [elements.<Symbol>], ions under [elements.<Symbol>.ions.<charge>]".to_string());
        }

        Error::MissingProperty { element, property } => {
            hints.push(format!("The table has no '{}' for {}", property, element));
            hints.push("Try another --preset or add the entry to a custom table".to_string());
        }

        Error::MissingIonProperty { species, .. } => {
            hints.push(format!("Ion-specific data is only tabulated for some ions, not {}", species));
            hints.push("Check the oxidation states in the formula".to_string());
        }

        Error::NegativeCharge { .. } => {
            hints.push("Ionization energies only apply to cations".to_string());
        }

        Error::MissingOxidationStates(_) => {
            hints.push("This featurizer needs oxidation states, e.g. Fe3+:2 O2-:3".to_string());
            hints.push("Or pass --decorate to guess them from the formula".to_string());
        }

        Error::NoChargeBalance(_) => {
            hints.push("No combination of candidate states sums to zero".to_string());
            hints.push("Try --all-states to widen the candidate oxidation states".to_string());
        }

        Error::Composition(e) => composition_hints(e, hints),
    }
}

fn composition_hints(err: &ionfeat::CompositionError, hints: &mut Vec<String>) {
    use ionfeat::CompositionError;

    match err {
        CompositionError::Element(_) => {
            hints.push("Element symbols are case sensitive: write Co, not CO".to_string());
        }
        CompositionError::Formula { .. } => {
            hints.push("Formulas look like Fe2O3, Ca3(PO4)2 or Fe0.5O0.5".to_string());
            hints.push("Decorated input looks like Fe3+:2 O2-:3".to_string());
        }
        CompositionError::InvalidAmount { .. } | CompositionError::Empty => {
            hints.push("Every amount must be a positive number".to_string());
        }
    }
}

fn io_hints(err: &io::Error, hints: &mut Vec<String>) {
    use std::io::ErrorKind;

    match err.kind() {
        ErrorKind::NotFound => {
            hints.push("Check the path spelling and ensure the file exists".to_string());
        }
        ErrorKind::PermissionDenied => {
            hints.push("Check file permissions with `ls -la`".to_string());
        }
        ErrorKind::BrokenPipe => {
            hints.push("Output consumer terminated; this may happen when piping to `head`".to_string());
        }
        _ => {
            hints.push("Check file path, permissions, and disk space".to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn hints_found_through_context() {
        let err = Err::<(), _>(ionfeat::Error::UnknownPreset("magpie".to_string()))
            .context("Failed to build featurizer")
            .unwrap_err();
        let hints = collect_hints(&err);
        assert!(hints[0].contains("ionfeat presets"));
    }

    #[test]
    fn composition_errors_get_hints() {
        let parse = "Xx2".parse::<ionfeat::Composition>().unwrap_err();
        let err = Error::new(parse);
        assert!(!collect_hints(&err).is_empty());
    }

    #[test]
    fn plain_errors_have_no_hints() {
        let err = anyhow::anyhow!("something else");
        assert!(collect_hints(&err).is_empty());
    }
}
