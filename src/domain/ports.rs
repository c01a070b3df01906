use crate::domain::model::{DatingPolicy, SourceRecord, TransformResult};
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::NaiveDate;

/// Source of the current processing date.
pub trait Clock {
    fn today(&self) -> NaiveDate;
}

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidRecordAction {
    Fail,
    Report,
}

pub trait ConfigProvider: Send + Sync {
    fn input_path(&self) -> &str;
    fn output_formats(&self) -> &[String];
    fn policy(&self) -> DatingPolicy;
    fn evaluation_date(&self) -> Option<NaiveDate>;
    fn on_invalid_record(&self) -> InvalidRecordAction;
    fn output_filename(&self, format: &str) -> String {
        format!("dating_output.{}", format)
    }
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<SourceRecord>>;
    async fn transform(&self, data: Vec<SourceRecord>) -> Result<TransformResult>;
    async fn load(&self, result: TransformResult) -> Result<Vec<String>>;
}
