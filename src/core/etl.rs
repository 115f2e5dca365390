use crate::core::{Pipeline, TransformResult};
use crate::utils::error::Result;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    /// Runs extract, transform and load once; returns the summary file path.
    pub async fn run(&self) -> Result<String> {
        let result = self.preview().await?;
        self.finish(result).await
    }

    /// Load step for a result obtained from [`EtlEngine::preview`].
    pub async fn finish(&self, result: TransformResult) -> Result<String> {
        tracing::info!("Loading summary...");
        let output_path = self.pipeline.load(result).await?;
        tracing::info!("Summary saved to: {}", output_path);

        Ok(output_path)
    }

    /// Extract and transform only; nothing is written or sent.
    pub async fn preview(&self) -> Result<TransformResult> {
        tracing::info!("Extracting records...");
        let records = self.pipeline.extract().await?;
        tracing::info!("Extracted {} records", records.len());

        tracing::info!("Aggregating...");
        let result = self.pipeline.transform(records).await?;
        tracing::info!("Built {} summary lines", result.groups.len());

        Ok(result)
    }
}
