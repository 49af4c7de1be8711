use crate::config::toml_config::ReshipConfig;
use crate::core::bundle::BundleKeyAssigner;
use crate::core::template::TemplateWriter;
use crate::core::transform::{ClaimFilter, RowTransformer};
use crate::domain::model::{ConversionReport, InputRow, TransformResult};
use crate::utils::error::Result;
use chrono::NaiveDateTime;

/// Filter → bundle keys → remap → template, for one uploaded table.
#[derive(Debug, Clone, Default)]
pub struct Converter {
    transformer: RowTransformer,
    writer: TemplateWriter,
}

impl Converter {
    pub fn new(transformer: RowTransformer, writer: TemplateWriter) -> Self {
        Self {
            transformer,
            writer,
        }
    }

    pub fn from_config(config: &ReshipConfig) -> Self {
        let transformer = RowTransformer::new(
            ClaimFilter::new(config.filter.accepted_claim_types.iter().cloned()),
            BundleKeyAssigner::new(config.bundle.prefix.clone()),
            config.bundle.scope,
        );
        let writer = TemplateWriter::new(config.template.layout, config.template.constants.clone())
            .with_sheet_name(config.template.sheet_name.clone());
        Self::new(transformer, writer)
    }

    pub fn transform(&self, rows: &[InputRow], batch_time: NaiveDateTime) -> TransformResult {
        self.transformer.transform(rows, batch_time)
    }

    /// Writes a transform result; an empty result still yields a header-only
    /// workbook.
    pub fn render(&self, result: TransformResult) -> Result<ConversionReport> {
        let status = result.status();
        let artifact = self.writer.write(&result.rows, result.batch_time)?.into_inner();

        Ok(ConversionReport {
            artifact,
            rows: result.rows,
            stats: result.stats,
            status,
        })
    }

    pub fn convert(&self, rows: &[InputRow], batch_time: NaiveDateTime) -> Result<ConversionReport> {
        self.render(self.transform(rows, batch_time))
    }
}
