pub mod bundle;
pub mod converter;
pub mod etl;
pub mod pipeline;
pub mod preview;
pub mod reader;
pub mod template;
pub mod transform;

pub use crate::domain::model::{InputRow, TransformResult, TransformedRow};
pub use crate::domain::ports::{Clock, Pipeline, Storage};
pub use crate::utils::error::Result;
