use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use ionfeat::Stat;

#[derive(Parser)]
#[command(
    name = "ionfeat",
    about = "Ion-based features of inorganic compositions",
    version,
    propagate_version = true
)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// List the built-in property presets
    #[command(visible_alias = "p")]
    Presets,

    /// Compute features for chemical formulas
    #[command(visible_alias = "f")]
    Featurize(FeaturizeArgs),
}

/// Property table selection.
#[derive(Args)]
#[command(next_help_heading = "Property Table")]
pub struct TableOptions {
    /// Built-in property preset (default depends on the featurizer)
    #[arg(long, value_name = "NAME")]
    pub preset: Option<String>,

    /// Custom property table (TOML file), replaces the preset
    #[arg(long, value_name = "FILE", conflicts_with = "preset")]
    pub table: Option<PathBuf>,
}

/// Oxidation-state search options.
#[derive(Args)]
#[command(next_help_heading = "Oxidation States")]
pub struct SearchOptions {
    /// One oxidation state per element; misses mixed-valence compounds
    #[arg(long)]
    pub fast: bool,

    /// Search every known oxidation state, not only the common ones
    #[arg(long)]
    pub all_states: bool,

    /// Decorate bare formulas with their best oxidation-state guess
    #[arg(long)]
    pub decorate: bool,
}

#[derive(Args)]
pub struct FeaturizeArgs {
    /// Chemical formulas (read from stdin, one per line, if omitted)
    #[arg(value_name = "FORMULA")]
    pub formulas: Vec<String>,

    /// Featurizer to run
    #[arg(
        short = 'F',
        long,
        value_name = "NAME",
        default_value = "ion-property"
    )]
    pub featurizer: FeaturizerKind,

    /// Statistics to report, comma separated (default: all five)
    #[arg(long, value_name = "LIST", value_delimiter = ',')]
    pub stats: Vec<Stat>,

    /// Output format
    #[arg(short, long, value_name = "FORMAT", default_value = "tsv")]
    pub format: OutputFormat,

    /// Output file (stdout if omitted)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Keep going past failing formulas: TSV rows are filled with NaN and
    /// JSON rows carry an `error` field
    #[arg(long)]
    pub ignore_errors: bool,

    #[command(flatten)]
    pub table: TableOptions,

    #[command(flatten)]
    pub search: SearchOptions,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum FeaturizerKind {
    /// Compound possible, maximum and average ionic character
    IonProperty,
    /// Statistics of charge-dependent cation properties
    CationProperty,
    /// Total anion electron affinity
    ElectronAffinity,
    /// Statistics of cation-anion electronegativity differences
    #[value(alias = "electronegativity-diff")]
    EnDiff,
    /// Statistics of the distinct oxidation states
    OxidationStates,
}

impl FeaturizerKind {
    pub fn default_preset(self) -> &'static str {
        match self {
            FeaturizerKind::IonProperty => "pymatgen",
            _ => "deml",
        }
    }

    /// Whether the featurizer needs oxidation states on its input.
    pub fn requires_states(self) -> bool {
        matches!(
            self,
            FeaturizerKind::CationProperty
                | FeaturizerKind::ElectronAffinity
                | FeaturizerKind::EnDiff
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Tab-separated values with a header row
    #[default]
    Tsv,
    /// A single JSON document
    Json,
}

pub fn parse() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn featurize_defaults() {
        let cli = Cli::try_parse_from(["ionfeat", "featurize", "Fe2O3"]).unwrap();
        let Command::Featurize(args) = cli.command else {
            panic!("expected featurize");
        };
        assert_eq!(args.formulas, ["Fe2O3"]);
        assert_eq!(args.featurizer, FeaturizerKind::IonProperty);
        assert_eq!(args.format, OutputFormat::Tsv);
        assert!(args.stats.is_empty());
        assert!(!args.search.fast);
    }

    #[test]
    fn stats_are_comma_separated() {
        let cli = Cli::try_parse_from([
            "ionfeat", "-vv", "f", "-F", "en-diff", "--stats", "range,max", "FeO",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        let Command::Featurize(args) = cli.command else {
            panic!("expected featurize");
        };
        assert_eq!(args.featurizer, FeaturizerKind::EnDiff);
        assert_eq!(args.stats, [Stat::Range, Stat::Maximum]);
    }

    #[test]
    fn preset_and_table_conflict() {
        let result = Cli::try_parse_from([
            "ionfeat", "featurize", "--preset", "deml", "--table", "t.toml", "FeO",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn ignore_errors_help_describes_failed_rows() {
        let cmd = Cli::command();
        let featurize = cmd.find_subcommand("featurize").unwrap();
        let arg = featurize
            .get_arguments()
            .find(|a| a.get_id() == "ignore_errors")
            .unwrap();
        let help = arg.get_help().unwrap().to_string();
        assert!(help.contains("NaN"));
        assert!(help.contains("error"));
        assert!(!help.contains("empty rows"));
    }

    #[test]
    fn default_presets_per_featurizer() {
        assert_eq!(FeaturizerKind::IonProperty.default_preset(), "pymatgen");
        assert_eq!(FeaturizerKind::CationProperty.default_preset(), "deml");
        assert!(FeaturizerKind::EnDiff.requires_states());
        assert!(!FeaturizerKind::OxidationStates.requires_states());
    }
}
