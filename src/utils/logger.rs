use crate::utils::error::{DatingError, Result};
use std::str::FromStr;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Output style of the log lines, set by `monitoring.log_format`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Compact,
    /// One JSON object per line, for batch runs read by a log collector.
    Json,
}

impl LogFormat {
    pub const NAMES: [&'static str; 2] = ["compact", "json"];
}

impl FromStr for LogFormat {
    type Err = DatingError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "compact" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            other => Err(DatingError::InvalidConfigValueError {
                field: "monitoring.log_format".to_string(),
                value: other.to_string(),
                reason: format!("Expected one of: {}", Self::NAMES.join(", ")),
            }),
        }
    }
}

/// `RUST_LOG` wins over `verbose` when it is set.
fn filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("pregnancy_dating=debug,info")
        } else {
            EnvFilter::new("pregnancy_dating=info")
        }
    })
}

pub fn init_logger(format: LogFormat, verbose: bool) {
    let layer = fmt::layer().with_target(false);
    let layer = match format {
        LogFormat::Compact => layer.compact().boxed(),
        LogFormat::Json => layer.json().boxed(),
    };

    tracing_subscriber::registry()
        .with(filter(verbose))
        .with(layer)
        .init();
}
