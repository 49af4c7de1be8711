pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use crate::adapters::{
    clock::{FixedClock, SystemClock},
    storage::LocalStorage,
};
#[cfg(feature = "cli")]
pub use crate::config::CliConfig;
pub use crate::config::ReshipConfig;

pub use crate::core::{converter::Converter, etl::EtlEngine, pipeline::ReshipmentPipeline};
pub use crate::domain::model::{ConversionReport, ConversionStats, ConversionStatus, InputRow, TransformedRow};
pub use crate::utils::error::{EtlError, Result};
