pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use config::storage::LocalStorage;
pub use config::toml_config::TomlConfig;
#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use core::{
    dating::assess, edd::Edd, engine::DatingEngine, ga::Ga, lmp::LmpDating,
    pipeline::DatingPipeline, ultrasound::UltrasoundDating,
};
pub use domain::model::{
    DatingInput, DatingMethod, DatingOutcome, DatingPolicy, GestationalInterval, Reconciliation,
    SourceRecord,
};
pub use domain::ports::Clock;
pub use utils::clock::{FixedClock, SystemClock};
pub use utils::error::{DatingError, Result};
