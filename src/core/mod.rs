pub mod brackets;
pub mod dating;
pub mod edd;
pub mod engine;
pub mod ga;
pub mod lmp;
pub mod pipeline;
pub mod ultrasound;

pub use crate::domain::model::{DatingInput, DatingOutcome, SourceRecord, TransformResult};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
