use anyhow::Context;
use clap::Parser;
use pregnancy_dating::config::toml_config::TomlConfig;
use pregnancy_dating::core::{ConfigProvider, Pipeline};
use pregnancy_dating::utils::error::ErrorSeverity;
use pregnancy_dating::utils::{logger, validation::Validate};
use pregnancy_dating::{DatingEngine, DatingPipeline, LocalStorage};

#[derive(Parser)]
#[command(name = "batch-dating")]
#[command(about = "Date a CSV file of pregnancy records using a TOML configuration")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "dating-config.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override policy.evaluation_date (YYYY-MM-DD)
    #[arg(long)]
    today: Option<chrono::NaiveDate>,

    /// Validate the configuration and input without writing output
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = TomlConfig::from_file(&args.config)
        .with_context(|| format!("Failed to load config file '{}'", args.config))?;

    // an unknown log_format is reported by validate() below
    logger::init_logger(config.log_format().unwrap_or_default(), args.verbose);

    tracing::info!("Loaded configuration '{}' from {}", config.batch.name, args.config);

    if let Some(today) = args.today {
        config.policy.get_or_insert_with(Default::default).evaluation_date = Some(today);
        tracing::info!("Evaluation date overridden to: {}", today);
    }

    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        tracing::error!("Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    display_config_summary(&config);

    let storage = LocalStorage::new(String::new());
    let pipeline = DatingPipeline::new(storage, config);

    if args.dry_run {
        tracing::info!("DRY RUN MODE - no output will be written");
        let records = pipeline.extract().await?;
        let result = pipeline.transform(records).await?;
        println!(
            "✅ {} records checked ({} rejected)",
            result.outcomes.len(),
            result.rejected
        );
        return Ok(());
    }

    let engine = DatingEngine::new(pipeline);
    match engine.run().await {
        Ok(summary) => {
            println!(
                "✅ Dated {} records ({} rejected)",
                summary.records - summary.rejected,
                summary.rejected
            );
            for output in &summary.outputs {
                println!("📁 Output saved to: {}", output);
            }
            Ok(())
        }
        Err(e) => {
            tracing::error!(
                "Dating batch failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };
            std::process::exit(exit_code);
        }
    }
}

fn display_config_summary(config: &TomlConfig) {
    let policy = config.policy();
    tracing::info!("Batch: {}", config.batch.name);
    tracing::info!("Input: {}", config.input_path());
    tracing::info!(
        "Output: {} ({})",
        config.output_path(),
        config.output_formats().join(", ")
    );
    tracing::info!(
        "Policy: prefer_ultrasound={}, cross_check_recorded_edd={}",
        policy.prefer_ultrasound,
        policy.cross_check_recorded_edd
    );
    match config.evaluation_date() {
        Some(date) => tracing::info!("Evaluation date: {}", date),
        None => tracing::info!("Evaluation date: system date"),
    }
}
