use anyhow::Context;
use clap::Parser;
use reship_etl::core::preview::write_preview;
use reship_etl::domain::model::{ConversionStats, ConversionStatus};
use reship_etl::utils::error::{ErrorSeverity, EtlError};
use reship_etl::utils::{logger, validation::Validate};
use reship_etl::{CliConfig, EtlEngine, LocalStorage, ReshipmentPipeline, SystemClock};

fn exit_with(e: &EtlError) -> ! {
    tracing::error!(
        "❌ Conversion failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}

fn print_summary(stats: &ConversionStats) {
    println!("Input rows: {}", stats.total_rows);
    for count in &stats.claim_counts {
        println!("  {}: {}", count.claim_type, count.rows);
    }
    println!("Converted rows: {}", stats.transformed_rows);
    println!("Recipient addresses: {}", stats.distinct_addresses);
}

fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting reship-etl");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let config = cli.load_config().unwrap_or_else(|e| exit_with(&e));
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        exit_with(&e);
    }

    let input = CliConfig::input_path(&config).unwrap_or_else(|e| exit_with(&e));
    let input = if input.is_absolute() {
        input
    } else {
        std::env::current_dir()
            .context("cannot resolve the working directory")?
            .join(input)
    };
    tracing::info!("📁 Input: {}", input.display());

    let storage = LocalStorage::new(config.output.path.clone());
    let pipeline =
        ReshipmentPipeline::new(storage, SystemClock, config, input).with_dry_run(cli.dry_run);
    let engine = EtlEngine::new(pipeline);

    let outcome = engine.run().unwrap_or_else(|e| exit_with(&e));
    let report = &outcome.report;

    if let Some(limit) = cli.preview {
        write_preview(&report.rows, limit, std::io::stdout().lock())?;
    }

    if cli.summary_json {
        println!("{}", serde_json::to_string_pretty(&report.stats)?);
    } else {
        print_summary(&report.stats);
    }

    match (report.status, &outcome.output_path) {
        (ConversionStatus::NoMatchingRows, path) => {
            eprintln!("⚠️ No rows to convert. Check that the export contains rows whose claim type is one of the accepted values.");
            if let Some(path) = path {
                println!("📁 Header-only workbook saved to: {}", path);
            }
        }
        (ConversionStatus::Converted, Some(path)) => {
            println!("✅ Converted {} rows", report.stats.transformed_rows);
            println!("📁 Output saved to: {}", path);
        }
        (ConversionStatus::Converted, None) => {
            println!(
                "✅ Converted {} rows (dry run, nothing written)",
                report.stats.transformed_rows
            );
        }
    }

    Ok(())
}
