use clap::Parser;
use pregnancy_dating::config::OutputFormat;
use pregnancy_dating::utils::clock::resolve_today;
use pregnancy_dating::utils::error::ErrorSeverity;
use pregnancy_dating::utils::logger::{self, LogFormat};
use pregnancy_dating::utils::validation::Validate;
use pregnancy_dating::{assess, CliConfig, DatingOutcome};

fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    logger::init_logger(LogFormat::Compact, config.verbose);

    tracing::debug!("CLI config: {:?}", config);

    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        tracing::error!("Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let clock = resolve_today(config.today);
    match assess(&config.to_input(), &config.policy(), &clock) {
        Ok(outcome) => {
            match config.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&outcome)?),
                OutputFormat::Text => print_text(&outcome),
            }
            Ok(())
        }
        Err(e) => {
            tracing::error!(
                "Dating failed: {} (Category: {:?}, Severity: {:?})",
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

fn print_text(outcome: &DatingOutcome) {
    let or_dash = |value: Option<String>| value.unwrap_or_else(|| "-".to_string());

    if !outcome.subject.is_empty() {
        println!("Subject:  {}", outcome.subject);
    }
    println!(
        "GA:       {} ({})",
        or_dash(
            outcome
                .ga_weeks
                .zip(outcome.ga_days)
                .map(|(weeks, days)| format!("{}w{}d", weeks, days))
        ),
        outcome.ga_method
    );
    println!(
        "EDD:      {} ({})",
        or_dash(outcome.edd.map(|d| d.to_string())),
        outcome.edd_method
    );
    println!(
        "LMP EDD:  {} ({} days away)",
        or_dash(outcome.lmp_edd.map(|d| d.to_string())),
        or_dash(outcome.lmp_days_until_edd.map(|days| days.to_string()))
    );
    println!(
        "US EDD:   {}",
        or_dash(outcome.ultrasound_edd.map(|d| d.to_string()))
    );
    if let Some(diffdays) = outcome.diffdays {
        println!("EDD diff: {} days", diffdays);
    }
}
