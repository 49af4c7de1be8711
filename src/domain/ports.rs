use crate::domain::model::{InputRow, LoadOutcome, TransformResult};
use crate::utils::error::Result;
use chrono::NaiveDateTime;
use std::path::Path;

pub trait Storage {
    fn read_file(&self, path: &Path) -> Result<Vec<u8>>;
    fn write_file(&self, path: &Path, data: &[u8]) -> Result<()>;
}

/// Source of every time-varying input of a run.
pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

pub trait Pipeline {
    fn extract(&self) -> Result<Vec<InputRow>>;
    fn transform(&self, rows: Vec<InputRow>) -> Result<TransformResult>;
    fn load(&self, result: TransformResult) -> Result<LoadOutcome>;
}
