mod featurize;
mod presets;

use featurize::run_featurize;
use presets::run_presets;

use anyhow::Result;

use crate::cli::Command;

pub fn dispatch(command: Command) -> Result<()> {
    match command {
        Command::Presets => run_presets(),
        Command::Featurize(args) => run_featurize(args),
    }
}
