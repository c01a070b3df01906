use crate::core::ConfigProvider;
use crate::domain::model::DatingPolicy;
use crate::domain::ports::InvalidRecordAction;
use crate::utils::error::{DatingError, Result};
use crate::utils::logger::LogFormat;
use crate::utils::validation::{self, Validate};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::Path;

const OUTPUT_FORMATS: [&str; 2] = ["csv", "json"];
const INVALID_RECORD_ACTIONS: [&str; 2] = ["fail", "report"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub batch: BatchConfig,
    pub source: SourceConfig,
    pub policy: Option<PolicyConfig>,
    pub load: LoadConfig,
    pub error_handling: Option<ErrorHandlingConfig>,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub input_path: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PolicyConfig {
    pub prefer_ultrasound: Option<bool>,
    pub cross_check_recorded_edd: Option<bool>,
    /// Fixed evaluation date; the system date is used when absent.
    pub evaluation_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    pub output_path: String,
    pub output_formats: Vec<String>,
    pub filenames: Option<FilenameConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilenameConfig {
    pub csv: Option<String>,
    pub json: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorHandlingConfig {
    pub on_invalid_record: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub log_format: Option<String>,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(DatingError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| DatingError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables are left as-is.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = regex::Regex::new(r"\$\{([^}]+)\}").map_err(|e| DatingError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_non_empty_string("batch.name", &self.batch.name)?;
        validation::validate_path("source.input_path", &self.source.input_path)?;
        validation::validate_file_extension("source.input_path", &self.source.input_path, &["csv"])?;
        validation::validate_path("load.output_path", &self.load.output_path)?;

        if self.load.output_formats.is_empty() {
            return Err(DatingError::MissingConfigError {
                field: "load.output_formats".to_string(),
            });
        }
        for format in &self.load.output_formats {
            validation::validate_one_of("load.output_formats", format, &OUTPUT_FORMATS)?;
        }

        if let Some(action) = self
            .error_handling
            .as_ref()
            .and_then(|e| e.on_invalid_record.as_deref())
        {
            validation::validate_one_of(
                "error_handling.on_invalid_record",
                action,
                &INVALID_RECORD_ACTIONS,
            )?;
        }

        self.log_format()?;

        Ok(())
    }

    pub fn output_path(&self) -> &str {
        &self.load.output_path
    }

    /// `compact` when `monitoring.log_format` is unset.
    pub fn log_format(&self) -> Result<LogFormat> {
        self.monitoring
            .as_ref()
            .and_then(|m| m.log_format.as_deref())
            .map_or(Ok(LogFormat::default()), str::parse::<LogFormat>)
    }

    fn policy_config(&self) -> PolicyConfig {
        self.policy.clone().unwrap_or_default()
    }
}

impl ConfigProvider for TomlConfig {
    fn input_path(&self) -> &str {
        &self.source.input_path
    }

    fn output_formats(&self) -> &[String] {
        &self.load.output_formats
    }

    fn policy(&self) -> DatingPolicy {
        let defaults = DatingPolicy::default();
        let policy = self.policy_config();
        DatingPolicy {
            prefer_ultrasound: policy.prefer_ultrasound.unwrap_or(defaults.prefer_ultrasound),
            cross_check_recorded_edd: policy
                .cross_check_recorded_edd
                .unwrap_or(defaults.cross_check_recorded_edd),
        }
    }

    fn evaluation_date(&self) -> Option<NaiveDate> {
        self.policy.as_ref().and_then(|p| p.evaluation_date)
    }

    fn on_invalid_record(&self) -> InvalidRecordAction {
        match self
            .error_handling
            .as_ref()
            .and_then(|e| e.on_invalid_record.as_deref())
        {
            Some("report") => InvalidRecordAction::Report,
            _ => InvalidRecordAction::Fail,
        }
    }

    fn output_filename(&self, format: &str) -> String {
        let configured = self.load.filenames.as_ref().and_then(|f| match format {
            "csv" => f.csv.clone(),
            "json" => f.json.clone(),
            _ => None,
        });
        let name = configured.unwrap_or_else(|| format!("dating_output.{}", format));
        Path::new(&self.load.output_path)
            .join(name)
            .to_string_lossy()
            .into_owned()
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
