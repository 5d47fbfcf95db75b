use std::io::{self, Write};

use anyhow::{Context, Result};
use ionfeat::{PRESET_NAMES, PropertyTable};

use crate::display::print_preset;

pub fn run_presets() -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    for name in PRESET_NAMES {
        let table = PropertyTable::preset(name)?;
        print_preset(&mut out, &table).context("Failed to write preset summary")?;
    }

    out.flush()?;
    Ok(())
}
