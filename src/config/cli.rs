use crate::config::toml_config::ReshipConfig;
use crate::core::bundle::BundleScope;
use crate::core::template::TemplateLayout;
use crate::utils::error::Result;
use crate::utils::validation::validate_required_field;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "reship-etl")]
#[command(about = "Converts collector order exports into the reshipment import template")]
pub struct CliConfig {
    /// Order export to convert (.xlsx, .xls, .ods, .csv, .tsv)
    #[arg(short, long)]
    pub input: Option<String>,

    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Directory the converted workbook is written to
    #[arg(long)]
    pub output_path: Option<String>,

    #[arg(long, value_enum)]
    pub layout: Option<TemplateLayout>,

    /// Rows that feed bundle-key numbering
    #[arg(long, value_enum)]
    pub bundle_scope: Option<BundleScope>,

    /// Write a header-only workbook when no row matches
    #[arg(long)]
    pub write_empty: bool,

    /// Print the first ROWS converted rows as TSV
    #[arg(long, value_name = "ROWS")]
    pub preview: Option<usize>,

    /// Print conversion statistics as JSON on stdout
    #[arg(long)]
    pub summary_json: bool,

    /// Convert and report without writing the workbook
    #[arg(long)]
    pub dry_run: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,
}

impl CliConfig {
    /// File configuration (or defaults) with command line overrides applied.
    pub fn load_config(&self) -> Result<ReshipConfig> {
        let mut config = match &self.config {
            Some(path) => ReshipConfig::from_file(path)?,
            None => ReshipConfig::default(),
        };
        self.apply_overrides(&mut config);
        Ok(config)
    }

    pub fn apply_overrides(&self, config: &mut ReshipConfig) {
        if let Some(input) = &self.input {
            config.input.path = Some(input.clone());
        }
        if let Some(output_path) = &self.output_path {
            config.output.path = output_path.clone();
        }
        if let Some(layout) = self.layout {
            config.template.layout = layout;
        }
        if let Some(scope) = self.bundle_scope {
            config.bundle.scope = scope;
        }
        if self.write_empty {
            config.output.write_empty = true;
        }
    }

    /// Input path from the command line or the configuration file.
    pub fn input_path(config: &ReshipConfig) -> Result<PathBuf> {
        let path = validate_required_field("input.path", &config.input.path)?;
        Ok(PathBuf::from(path))
    }
}
