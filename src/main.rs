use clap::Parser;
use k7abd_anytone::utils::error::ErrorSeverity;
use k7abd_anytone::utils::{logger, validation::Validate};
use k7abd_anytone::{CliConfig, CodeplugError, CodeplugPipeline, ConversionEngine, LocalStorage};

fn exit_code(e: &CodeplugError) -> i32 {
    match e.severity() {
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}

fn report(e: &CodeplugError) {
    tracing::error!(
        "Conversion failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("{}", e.user_friendly_message());
    eprintln!("Suggestion: {}", e.recovery_suggestion());
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();
    logger::init_cli_logger(cli.verbose);

    tracing::info!("Starting k7abd-anytone");

    let config = match cli.merge_config_file().and_then(|config| {
        config.validate()?;
        Ok(config)
    }) {
        Ok(config) => config,
        Err(e) => {
            report(&e);
            std::process::exit(exit_code(&e));
        }
    };
    tracing::debug!("Config: {:?}", config);

    let storage = LocalStorage::default();
    let pipeline = CodeplugPipeline::new(storage, config);
    let engine = ConversionEngine::new(pipeline);

    match engine.run().await {
        Ok(output_dir) => {
            println!("Import files written to: {}", output_dir);
            Ok(())
        }
        Err(e) => {
            report(&e);
            std::process::exit(exit_code(&e));
        }
    }
}
