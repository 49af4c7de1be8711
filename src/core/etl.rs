use crate::core::Pipeline;
use crate::domain::model::{ConversionStatus, LoadOutcome};
use crate::utils::error::Result;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    /// Extract, transform and load once. A read failure aborts before any
    /// row is transformed.
    pub fn run(&self) -> Result<LoadOutcome> {
        tracing::info!("Extracting order rows...");
        let rows = self.pipeline.extract()?;
        tracing::info!("Extracted {} rows", rows.len());

        tracing::info!("Transforming rows...");
        let result = self.pipeline.transform(rows)?;
        for count in &result.stats.claim_counts {
            tracing::info!("  claim type '{}': {} rows", count.claim_type, count.rows);
        }
        tracing::info!(
            "Transformed {} rows into {} bundles",
            result.stats.transformed_rows,
            result.stats.bundle_keys
        );

        tracing::info!("Writing reshipment template...");
        let outcome = self.pipeline.load(result)?;

        if outcome.report.status == ConversionStatus::NoMatchingRows {
            tracing::warn!("No rows matched the accepted claim types");
        }
        if let Some(path) = &outcome.output_path {
            tracing::info!("Output saved to: {}", path);
        }

        Ok(outcome)
    }
}
