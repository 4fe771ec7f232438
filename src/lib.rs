pub mod annotation;
pub mod cleaner;
pub mod error;
pub mod extractor;
pub mod io;
pub mod joints;
pub mod layout;
pub mod matfile;
pub mod record;
pub mod viewer;
pub mod visualization;

pub use error::{DatasetError, Result};

/// Initializes `env_logger` at `info` unless `RUST_LOG` says otherwise.
pub fn init_logger() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();
}
