pub mod builder;
pub mod engine;
pub mod orderer;
pub mod validator;

pub use crate::domain::model::{Codeplug, SourceFile, TransformResult};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
pub use builder::{build_codeplug, BuildOutput};
pub use engine::ConversionEngine;
pub use orderer::{order, SortMode};
pub use validator::{FrequencyBand, Validator};
