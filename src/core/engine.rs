use crate::core::Pipeline;
use crate::utils::error::Result;

#[derive(Debug, Clone, Default)]
pub struct BatchSummary {
    pub records: usize,
    pub rejected: usize,
    pub outputs: Vec<String>,
}

pub struct DatingEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> DatingEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<BatchSummary> {
        tracing::info!("Starting dating batch...");

        let inputs = self.pipeline.extract().await?;
        tracing::info!("Extracted {} records", inputs.len());

        let result = self.pipeline.transform(inputs).await?;
        let summary_records = result.outcomes.len();
        let rejected = result.rejected;
        if rejected > 0 {
            tracing::warn!("{} of {} records were rejected", rejected, summary_records);
        }
        tracing::info!("Dated {} records", summary_records - rejected);

        let outputs = self.pipeline.load(result).await?;
        for output in &outputs {
            tracing::info!("Output saved to: {}", output);
        }

        Ok(BatchSummary {
            records: summary_records,
            rejected,
            outputs,
        })
    }
}
