pub mod codeplug_pipeline;

pub use codeplug_pipeline::CodeplugPipeline;
