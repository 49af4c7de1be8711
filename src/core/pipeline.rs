use crate::config::toml_config::ReshipConfig;
use crate::core::converter::Converter;
use crate::core::reader::InputReader;
use crate::core::template::output_file_name;
use crate::core::{Clock, Pipeline, Storage};
use crate::domain::model::{ConversionStatus, InputRow, LoadOutcome, TransformResult};
use crate::utils::error::Result;
use std::path::{Path, PathBuf};

/// Reads one order export from storage and writes the reshipment workbook
/// back to it.
pub struct ReshipmentPipeline<S: Storage, K: Clock> {
    storage: S,
    clock: K,
    config: ReshipConfig,
    input_path: PathBuf,
    reader: InputReader,
    converter: Converter,
    dry_run: bool,
}

impl<S: Storage, K: Clock> ReshipmentPipeline<S, K> {
    pub fn new(storage: S, clock: K, config: ReshipConfig, input_path: impl Into<PathBuf>) -> Self {
        let reader = InputReader::new(config.input.columns.clone(), config.input.sheet.clone());
        let converter = Converter::from_config(&config);
        Self {
            storage,
            clock,
            config,
            input_path: input_path.into(),
            reader,
            converter,
            dry_run: false,
        }
    }

    /// Runs every phase but skips writing the workbook.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

impl<S: Storage, K: Clock> Pipeline for ReshipmentPipeline<S, K> {
    fn extract(&self) -> Result<Vec<InputRow>> {
        tracing::debug!("Reading input file: {}", self.input_path.display());
        let data = self.storage.read_file(&self.input_path)?;
        tracing::debug!("Input file is {} bytes", data.len());
        self.reader.read(&self.input_path, data)
    }

    fn transform(&self, rows: Vec<InputRow>) -> Result<TransformResult> {
        let batch_time = self.clock.now();
        Ok(self.converter.transform(&rows, batch_time))
    }

    fn load(&self, result: TransformResult) -> Result<LoadOutcome> {
        let report = self.converter.render(result)?;

        if self.dry_run {
            tracing::info!("Dry run: workbook not written");
            return Ok(LoadOutcome {
                output_path: None,
                report,
            });
        }

        if report.status == ConversionStatus::NoMatchingRows && !self.config.output.write_empty {
            tracing::debug!("No matching rows and write_empty is off; skipping output");
            return Ok(LoadOutcome {
                output_path: None,
                report,
            });
        }

        let file_name = output_file_name(&self.config.output.filename_prefix, self.clock.now());
        tracing::debug!(
            "Writing workbook ({} bytes) as {}",
            report.artifact.len(),
            file_name
        );
        self.storage
            .write_file(Path::new(&file_name), &report.artifact)?;

        Ok(LoadOutcome {
            output_path: Some(
                Path::new(&self.config.output.path)
                    .join(&file_name)
                    .display()
                    .to_string(),
            ),
            report,
        })
    }
}
