use crate::core::bundle::{BundleScope, DEFAULT_BUNDLE_PREFIX};
use crate::core::reader::InputColumns;
use crate::core::template::{
    TemplateConstants, TemplateLayout, DEFAULT_FILENAME_PREFIX, DEFAULT_SHEET_NAME,
};
use crate::core::transform::{CLAIM_EXCHANGE, CLAIM_NONE};
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Converter settings. Every section is optional; omitted values fall back
/// to the collector export and logistics template defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReshipConfig {
    pub input: InputConfig,
    pub filter: FilterConfig,
    pub bundle: BundleConfig,
    pub template: TemplateConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub path: Option<String>,
    /// Worksheet to read; the first one when unset.
    pub sheet: Option<String>,
    pub columns: InputColumns,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    pub accepted_claim_types: Vec<String>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            accepted_claim_types: vec![CLAIM_EXCHANGE.to_string(), CLAIM_NONE.to_string()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BundleConfig {
    pub prefix: String,
    pub scope: BundleScope,
}

impl Default for BundleConfig {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_BUNDLE_PREFIX.to_string(),
            scope: BundleScope::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    pub layout: TemplateLayout,
    pub sheet_name: String,
    pub constants: TemplateConstants,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            layout: TemplateLayout::default(),
            sheet_name: DEFAULT_SHEET_NAME.to_string(),
            constants: TemplateConstants::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub path: String,
    pub filename_prefix: String,
    /// Write a header-only workbook when no row matches.
    pub write_empty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: "./output".to_string(),
            filename_prefix: DEFAULT_FILENAME_PREFIX.to_string(),
            write_empty: false,
        }
    }
}

impl ReshipConfig {
    /// Loads and parses a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EtlError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| EtlError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables stay as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| EtlError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        if let Some(path) = &self.input.path {
            validation::validate_path("input.path", path)?;
        }
        if let Some(sheet) = &self.input.sheet {
            validation::validate_non_empty_string("input.sheet", sheet)?;
        }
        validation::validate_non_empty_list(
            "filter.accepted_claim_types",
            &self.filter.accepted_claim_types,
        )?;
        validation::validate_non_empty_string("bundle.prefix", &self.bundle.prefix)?;
        validation::validate_sheet_name("template.sheet_name", &self.template.sheet_name)?;
        validation::validate_path("output.path", &self.output.path)?;
        validation::validate_non_empty_string("output.filename_prefix", &self.output.filename_prefix)?;

        Ok(())
    }
}

impl Validate for ReshipConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_file_gives_defaults() {
        let config = ReshipConfig::from_toml_str("").unwrap();

        assert_eq!(config, ReshipConfig::default());
        assert_eq!(config.filter.accepted_claim_types, vec!["교환", "해당없음"]);
        assert_eq!(config.bundle.prefix, "re");
        assert_eq!(config.bundle.scope, BundleScope::Filtered);
        assert_eq!(config.template.layout, TemplateLayout::Full);
        assert_eq!(config.template.constants.facility, "NS001");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[input]
path = "orders.xlsx"
sheet = "주문"

[input.columns]
address = "배송지"

[filter]
accepted_claim_types = ["교환"]

[bundle]
prefix = "rs"
scope = "all_rows"

[template]
layout = "compact"
sheet_name = "재발송"

[template.constants]
customer_id = "11112222"

[output]
path = "./converted"
write_empty = true
"#;

        let config = ReshipConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.input.path.as_deref(), Some("orders.xlsx"));
        assert_eq!(config.input.sheet.as_deref(), Some("주문"));
        assert_eq!(config.input.columns.address, "배송지");
        assert_eq!(config.input.columns.claim_type, "클레임유형");
        assert_eq!(config.filter.accepted_claim_types, vec!["교환"]);
        assert_eq!(config.bundle.scope, BundleScope::AllRows);
        assert_eq!(config.template.layout, TemplateLayout::Compact);
        assert_eq!(config.template.constants.customer_id, "11112222");
        assert_eq!(config.template.constants.order_time, "09:00:00");
        assert_eq!(config.output.filename_prefix, "수기_재발송양식_변환결과");
        assert!(config.output.write_empty);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("RESHIP_TEST_CUSTOMER_ID", "55556666");

        let toml_content = r#"
[template.constants]
customer_id = "${RESHIP_TEST_CUSTOMER_ID}"
warehouse = "${RESHIP_TEST_UNDEFINED_VAR}"
"#;

        let config = ReshipConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.template.constants.customer_id, "55556666");
        assert_eq!(
            config.template.constants.warehouse,
            "${RESHIP_TEST_UNDEFINED_VAR}"
        );

        std::env::remove_var("RESHIP_TEST_CUSTOMER_ID");
    }

    #[test]
    fn test_config_validation() {
        let config = ReshipConfig::from_toml_str("[filter]\naccepted_claim_types = []\n").unwrap();
        assert!(config.validate().is_err());

        let config = ReshipConfig::from_toml_str("[template]\nsheet_name = \"a:b\"\n").unwrap();
        assert!(config.validate().is_err());

        let config = ReshipConfig::from_toml_str("[bundle]\nprefix = \"\"\n").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_enum_value_is_parse_error() {
        let result = ReshipConfig::from_toml_str("[template]\nlayout = \"wide\"\n");
        assert!(matches!(
            result,
            Err(EtlError::ConfigValidationError { .. })
        ));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[output]\npath = \"./from-file\"\n")
            .unwrap();

        let config = ReshipConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.output.path, "./from-file");
    }
}
