pub mod app;
#[cfg(feature = "cli")]
pub mod config;
pub mod core;
pub mod domain;
pub mod input;
pub mod output;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{cli::LocalStorage, CliConfig};

pub use app::pipelines::CodeplugPipeline;
pub use core::{engine::ConversionEngine, orderer::SortMode};
pub use domain::diagnostics::ValidationWarning;
pub use domain::model::Codeplug;
pub use output::RadioModel;
pub use utils::error::{CodeplugError, Result};
