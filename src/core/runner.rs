use crate::core::Pipeline;
use crate::utils::error::Result;

/// Drives a pipeline through extract, transform and load.
pub struct ExchangeRunner<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> ExchangeRunner<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<String> {
        tracing::info!("Starting Secret Santa draw...");

        tracing::info!("Loading roster and prior round...");
        let input = self.pipeline.extract().await?;
        tracing::info!(
            "Loaded {} participants and {} prior pairings",
            input.roster.len(),
            input.prior.len()
        );

        tracing::info!("Drawing recipients...");
        let result = self.pipeline.transform(input).await?;
        let skipped = result.draw.skipped().count();
        tracing::info!(
            "Assigned {} of {} participants (seed {})",
            result.draw.assigned_count(),
            result.draw.assignments.len(),
            result.draw.seed
        );
        if skipped > 0 {
            tracing::warn!("{} participants were left without a recipient", skipped);
        }

        tracing::info!("Writing output...");
        let output_path = self.pipeline.load(result).await?;
        tracing::info!("Output saved to: {}", output_path);

        Ok(output_path)
    }
}
