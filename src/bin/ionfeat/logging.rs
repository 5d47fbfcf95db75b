use env_logger::{Builder, Env};
use log::LevelFilter;

const CRATE_NAME: &str = env!("CARGO_CRATE_NAME");

fn level_for(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Installs the global logger.
///
/// `RUST_LOG` is honoured when set; otherwise only this crate logs, at
/// `warn` by default. Each `-v` raises the level by one step and takes
/// precedence over `RUST_LOG` for this crate.
pub fn init(verbosity: u8) {
    let filter = format!("{}={}", CRATE_NAME, level_for(verbosity));

    let mut builder = Builder::from_env(Env::default().default_filter_or(filter.as_str()));
    if verbosity > 0 {
        builder.parse_filters(&filter);
    }
    builder.format_timestamp(None).init();
}
