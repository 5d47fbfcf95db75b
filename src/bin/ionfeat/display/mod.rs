mod error;
mod tables;

pub use error::print_error;
pub use tables::print_preset;
