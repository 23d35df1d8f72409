//! Utility modules

mod humanize;
mod tracing_setup;

pub use humanize::humanize_bytes;
pub use tracing_setup::init_tracing;
