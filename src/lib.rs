pub mod app;
pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod shared;

use tracing_subscriber::EnvFilter;

pub use app::{bootstrap, run};
pub use domain::error::{AppError, Result};
pub use interfaces::{AppState, BulkUploadController};

/// Install the global fmt subscriber. `RUST_LOG` wins over `default_level`.
/// Safe to call more than once.
pub fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
