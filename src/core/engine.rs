use crate::domain::ports::Pipeline;
use crate::utils::error::Result;

/// Drives a pipeline through extract, transform and load.
pub struct ConversionEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> ConversionEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    /// Returns the directory the import files were written under.
    pub async fn run(&self) -> Result<String> {
        tracing::info!("Starting codeplug conversion");

        tracing::debug!("Reading input files");
        let sources = self.pipeline.extract().await?;
        tracing::info!("Found {} input files", sources.len());

        tracing::debug!("Building codeplug");
        let result = self.pipeline.transform(sources).await?;
        for output in &result.outputs {
            tracing::info!(
                "{}: {} zones, {} channels, {} contacts",
                output.radio_name,
                output.codeplug.zones.len(),
                output.codeplug.channel_count(),
                output.codeplug.contacts.len()
            );
        }
        if !result.warnings.is_empty() {
            tracing::warn!("{} input problems were skipped", result.warnings.len());
        }

        tracing::debug!("Writing import files");
        let output_dir = self.pipeline.load(result).await?;
        tracing::info!("Output saved to: {}", output_dir);

        Ok(output_dir)
    }
}
