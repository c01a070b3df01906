use crate::core::dating::assess;
use crate::core::{
    ConfigProvider, DatingInput, DatingOutcome, Pipeline, SourceRecord, Storage, TransformResult,
};
use crate::domain::ports::InvalidRecordAction;
use crate::utils::clock::resolve_today;
use crate::utils::error::{DatingError, Result};

/// Reads dating records from CSV, dates each one, and writes CSV/JSON results.
pub struct DatingPipeline<S: Storage, C: ConfigProvider> {
    pub(crate) storage: S,
    pub(crate) config: C,
}

impl<S: Storage, C: ConfigProvider> DatingPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }

    fn to_csv(outcomes: &[DatingOutcome]) -> Result<Vec<u8>> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        for outcome in outcomes {
            writer.serialize(outcome)?;
        }
        writer.into_inner().map_err(|e| DatingError::IoError(e.into_error()))
    }

    /// Reads each CSV row on its own so one bad cell only affects its row.
    fn parse_records(data: &[u8]) -> Result<Vec<SourceRecord>> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(data);
        let headers = reader.headers()?.clone();
        let subject_column = headers.iter().position(|header| header == "subject");

        let mut records = Vec::new();
        for (index, record) in reader.records().enumerate() {
            // header is line 1
            let fallback_row = index + 2;
            let record = match record {
                Ok(record) => record,
                Err(e) => {
                    let row = e.position().map_or(fallback_row, |p| p.line() as usize);
                    records.push(SourceRecord::Malformed {
                        row,
                        subject: String::new(),
                        message: e.to_string(),
                    });
                    continue;
                }
            };

            let row = record.position().map_or(fallback_row, |p| p.line() as usize);
            match record.deserialize::<DatingInput>(Some(&headers)) {
                Ok(input) => records.push(SourceRecord::Parsed { row, input }),
                Err(e) => records.push(SourceRecord::Malformed {
                    row,
                    subject: subject_column
                        .and_then(|column| record.get(column))
                        .unwrap_or_default()
                        .to_string(),
                    message: e.to_string(),
                }),
            }
        }
        Ok(records)
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for DatingPipeline<S, C> {
    async fn extract(&self) -> Result<Vec<SourceRecord>> {
        let path = self.config.input_path();
        tracing::debug!("Reading dating records from: {}", path);
        let data = self.storage.read_file(path).await?;

        let records = Self::parse_records(&data)?;
        tracing::debug!("Parsed {} records", records.len());
        Ok(records)
    }

    async fn transform(&self, data: Vec<SourceRecord>) -> Result<TransformResult> {
        let policy = self.config.policy();
        let clock = resolve_today(self.config.evaluation_date());
        let mut result = TransformResult::default();

        for record in data {
            let row = record.row();
            let dated = match record {
                SourceRecord::Parsed { input, .. } => {
                    assess(&input, &policy, &clock).map_err(|e| (input.subject, e.to_string()))
                }
                SourceRecord::Malformed { subject, message, .. } => Err((subject, message)),
            };

            match dated {
                Ok(outcome) => result.outcomes.push(outcome),
                Err((subject, message)) => match self.config.on_invalid_record() {
                    InvalidRecordAction::Fail => {
                        return Err(DatingError::RecordError { row, message });
                    }
                    InvalidRecordAction::Report => {
                        tracing::warn!("Row {} ({}) rejected: {}", row, subject, message);
                        result.rejected += 1;
                        result.outcomes.push(DatingOutcome::rejected(subject, message));
                    }
                },
            }
        }

        Ok(result)
    }

    async fn load(&self, result: TransformResult) -> Result<Vec<String>> {
        let mut written = Vec::new();

        for format in self.config.output_formats() {
            let data = match format.as_str() {
                "csv" => Self::to_csv(&result.outcomes)?,
                "json" => serde_json::to_vec_pretty(&result.outcomes)?,
                other => {
                    return Err(DatingError::InvalidConfigValueError {
                        field: "load.output_formats".to_string(),
                        value: other.to_string(),
                        reason: "Unsupported format. Valid formats: csv, json".to_string(),
                    });
                }
            };

            let filename = self.config.output_filename(format);
            self.storage.write_file(&filename, &data).await?;
            tracing::debug!("Wrote {} bytes to {}", data.len(), filename);
            written.push(filename);
        }

        Ok(written)
    }
}
