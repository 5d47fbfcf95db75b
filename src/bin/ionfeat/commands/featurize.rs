use std::io::{self, Write};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use ionfeat::{
    CandidateSource, CationProperty, Composition, ElectronAffinity, ElectronegativityDiff,
    Featurizer, FeaturizerConfig, IonProperty, OxidationSearch, OxidationStates, PropertyTable,
    SearchMode, Stat,
};
use log::{info, warn};
use serde::Serialize;

use crate::cli::{FeaturizeArgs, FeaturizerKind, OutputFormat};
use crate::io::{create_output, read_formulas, read_text, stdin_is_tty};
use crate::util::text::format_value;

#[derive(Debug, Serialize)]
struct Row {
    formula: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    decorated: Option<String>,
    values: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Serialize)]
struct Report<'a> {
    featurizer: &'a str,
    labels: &'a [String],
    rows: &'a [Row],
    citations: Vec<String>,
}

/// Decorates bare compositions with their best oxidation-state guess.
struct Decorator {
    table: Arc<PropertyTable>,
    candidates: CandidateSource,
    mode: SearchMode,
}

impl Decorator {
    fn new(config: &FeaturizerConfig) -> Result<Self> {
        Ok(Self {
            table: config.load_table()?,
            candidates: config.candidates,
            mode: if config.fast {
                SearchMode::Fast
            } else {
                SearchMode::Exhaustive
            },
        })
    }

    fn decorate(&self, composition: &Composition) -> Result<Composition> {
        let search = OxidationSearch::new(&self.table, self.candidates, self.mode);
        Ok(search.decorate(composition)?)
    }
}

pub fn run_featurize(args: FeaturizeArgs) -> Result<()> {
    let formulas = collect_formulas(&args)?;
    let config = build_config(&args)?;

    let featurizer =
        build_featurizer(args.featurizer, &config).context("Failed to build featurizer")?;
    let decorator = if args.search.decorate {
        Some(Decorator::new(&config).context("Failed to load oxidation-state candidates")?)
    } else {
        None
    };

    info!(
        "featurizing {} formula(s) with {} (table '{}')",
        formulas.len(),
        featurizer.name(),
        config.table.as_ref().map_or(config.preset.as_str(), |_| "custom"),
    );

    if let Some(message) = bare_input_warning(args.featurizer, args.search.decorate, &formulas) {
        warn!("{}", message);
    }

    let rows = compute_rows(
        featurizer.as_ref(),
        decorator.as_ref(),
        &formulas,
        args.ignore_errors,
    )?;

    let labels = featurizer.feature_labels();
    let mut out = create_output(args.output.as_deref())?;
    match args.format {
        OutputFormat::Tsv => write_tsv(&mut out, &labels, &rows)?,
        OutputFormat::Json => {
            let report = Report {
                featurizer: featurizer.name(),
                labels: &labels,
                rows: &rows,
                citations: featurizer.citations(),
            };
            write_json(&mut out, &report)?;
        }
    }
    out.flush().context("Failed to flush output")?;

    Ok(())
}

fn collect_formulas(args: &FeaturizeArgs) -> Result<Vec<String>> {
    if !args.formulas.is_empty() {
        return Ok(args.formulas.clone());
    }

    if stdin_is_tty() {
        bail!(
            "No formulas given and stdin is a terminal.\n\nUsage: ionfeat featurize <FORMULA>... or pipe formulas via stdin."
        );
    }

    let formulas = read_formulas(io::stdin().lock())?;
    if formulas.is_empty() {
        bail!("No formulas found on stdin");
    }
    Ok(formulas)
}

/// Warns when a featurizer that needs oxidation states is given bare
/// formulas and `--decorate` is off.
fn bare_input_warning(kind: FeaturizerKind, decorate: bool, formulas: &[String]) -> Option<String> {
    if decorate || !kind.requires_states() {
        return None;
    }
    let bare = formulas
        .iter()
        .filter(|f| {
            f.parse::<Composition>()
                .is_ok_and(|composition| !composition.is_decorated())
        })
        .count();
    (bare > 0).then(|| {
        format!(
            "{} of {} formula(s) carry no oxidation states and will fail; pass --decorate to guess them",
            bare,
            formulas.len()
        )
    })
}

fn build_config(args: &FeaturizeArgs) -> Result<FeaturizerConfig> {
    let table = args
        .table
        .table
        .as_deref()
        .map(read_text)
        .transpose()?;

    Ok(FeaturizerConfig {
        preset: args
            .table
            .preset
            .clone()
            .unwrap_or_else(|| args.featurizer.default_preset().to_string()),
        table,
        fast: args.search.fast,
        candidates: if args.search.all_states {
            CandidateSource::All
        } else {
            CandidateSource::Common
        },
        stats: if args.stats.is_empty() {
            Stat::ALL.to_vec()
        } else {
            args.stats.clone()
        },
    })
}

fn build_featurizer(kind: FeaturizerKind, config: &FeaturizerConfig) -> Result<Box<dyn Featurizer>> {
    Ok(match kind {
        FeaturizerKind::IonProperty => Box::new(IonProperty::new(config)?),
        FeaturizerKind::CationProperty => Box::new(CationProperty::new(config)?),
        FeaturizerKind::ElectronAffinity => Box::new(ElectronAffinity::new(config)?),
        FeaturizerKind::EnDiff => Box::new(ElectronegativityDiff::new(config)?),
        FeaturizerKind::OxidationStates => Box::new(OxidationStates::new(config)?),
    })
}

fn compute_rows(
    featurizer: &dyn Featurizer,
    decorator: Option<&Decorator>,
    formulas: &[String],
    ignore_errors: bool,
) -> Result<Vec<Row>> {
    let mut rows = Vec::with_capacity(formulas.len());

    for formula in formulas {
        let mut decorated = None;
        let result = featurize_one(featurizer, decorator, formula, &mut decorated);

        match result {
            Ok(values) => rows.push(Row {
                formula: formula.clone(),
                decorated,
                values: Some(values),
                error: None,
            }),
            Err(e) if ignore_errors => {
                warn!("skipping '{}': {:#}", formula, e);
                rows.push(Row {
                    formula: formula.clone(),
                    decorated,
                    values: None,
                    error: Some(format!("{:#}", e)),
                });
            }
            Err(e) => return Err(e),
        }
    }

    Ok(rows)
}

fn featurize_one(
    featurizer: &dyn Featurizer,
    decorator: Option<&Decorator>,
    formula: &str,
    decorated: &mut Option<String>,
) -> Result<Vec<f64>> {
    let mut composition: Composition = formula
        .parse()
        .with_context(|| format!("Invalid formula '{}'", formula))?;

    if let Some(decorator) = decorator {
        if !composition.is_decorated() {
            composition = decorator
                .decorate(&composition)
                .with_context(|| format!("Failed to assign oxidation states to '{}'", formula))?;
            *decorated = Some(composition.to_string());
        }
    }

    featurizer
        .featurize(&composition)
        .with_context(|| format!("Failed to featurize '{}'", formula))
}

fn write_tsv(out: &mut impl Write, labels: &[String], rows: &[Row]) -> Result<()> {
    write!(out, "formula")?;
    for label in labels {
        write!(out, "\t{}", label)?;
    }
    writeln!(out)?;

    for row in rows {
        write!(out, "{}", row.formula)?;
        match &row.values {
            Some(values) => {
                for value in values {
                    write!(out, "\t{}", format_value(*value))?;
                }
            }
            None => {
                for _ in labels {
                    write!(out, "\t{}", format_value(f64::NAN))?;
                }
            }
        }
        writeln!(out)?;
    }

    Ok(())
}

fn write_json(out: &mut impl Write, report: &Report<'_>) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, report).context("Failed to serialize features")?;
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn formulas(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn tsv_has_header_and_rows() {
        let featurizer = IonProperty::default();
        let rows = compute_rows(&featurizer, None, &formulas(&["Fe2O3", "Fe"]), false).unwrap();

        let mut buf = Vec::new();
        write_tsv(&mut buf, &featurizer.feature_labels(), &rows).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "formula\tcompound possible\tmax ionic char\tavg ionic char");
        assert!(lines[1].starts_with("Fe2O3\t1\t0.47692"));
        assert_eq!(lines[2], "Fe\t0\t0\t0");
    }

    #[test]
    fn errors_abort_unless_ignored() {
        let featurizer = CationProperty::from_preset("deml").unwrap();
        let list = formulas(&["Fe2O3"]);

        let err = compute_rows(&featurizer, None, &list, false).unwrap_err();
        assert!(err.downcast_ref::<ionfeat::Error>().is_some());

        let rows = compute_rows(&featurizer, None, &list, true).unwrap();
        assert!(rows[0].values.is_none());
        assert!(rows[0].error.as_deref().unwrap().contains("lacks oxidation states"));

        let mut buf = Vec::new();
        write_tsv(&mut buf, &featurizer.feature_labels(), &rows).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let failed = text.lines().nth(1).unwrap();
        assert!(failed.starts_with("Fe2O3\tNaN\t"));
        assert_eq!(failed.split('\t').count(), 26);
    }

    #[test]
    fn decorator_supplies_oxidation_states() {
        let config = FeaturizerConfig::default();
        let featurizer = CationProperty::new(&config).unwrap();
        let decorator = Decorator::new(&config).unwrap();

        let rows =
            compute_rows(&featurizer, Some(&decorator), &formulas(&["Fe2O3"]), false).unwrap();
        assert_eq!(rows[0].decorated.as_deref(), Some("Fe3+:2 O2-:3"));
        assert_eq!(rows[0].values.as_ref().unwrap()[0], 5281400.0);
    }

    #[test]
    fn bare_formulas_warn_without_decoration() {
        let list = formulas(&["Fe2O3", "Fe2+ O2-"]);

        let message = bare_input_warning(FeaturizerKind::CationProperty, false, &list).unwrap();
        assert!(message.starts_with("1 of 2 formula(s)"));
        assert!(message.contains("--decorate"));

        assert!(bare_input_warning(FeaturizerKind::CationProperty, true, &list).is_none());
        assert!(bare_input_warning(FeaturizerKind::IonProperty, false, &list).is_none());
        assert!(
            bare_input_warning(FeaturizerKind::EnDiff, false, &formulas(&["Na+ Cl-"])).is_none()
        );
    }

    #[test]
    fn json_report_lists_labels_and_rows() {
        let featurizer = ElectronAffinity::new(&FeaturizerConfig::default()).unwrap();
        let rows = compute_rows(&featurizer, None, &formulas(&["Fe2+ O2-"]), false).unwrap();
        let labels = featurizer.feature_labels();
        let report = Report {
            featurizer: featurizer.name(),
            labels: &labels,
            rows: &rows,
            citations: featurizer.citations(),
        };

        let mut buf = Vec::new();
        write_json(&mut buf, &report).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();

        assert_eq!(value["featurizer"], "electron_affinity");
        assert_eq!(value["labels"][0], "avg anion electron affinity");
        assert_eq!(value["rows"][0]["values"][0], -282000.0);
        assert!(value["rows"][0].get("error").is_none());
    }
}
