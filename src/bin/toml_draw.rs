use anyhow::Context;
use clap::Parser;
use secret_santa::utils::error::ErrorSeverity;
use secret_santa::utils::{logger, validation::Validate};
use secret_santa::{ExchangeRunner, LocalStorage, SantaPipeline, TomlConfig};

#[derive(Parser)]
#[command(name = "toml-draw")]
#[command(about = "Secret Santa draw driven by a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "secret-santa.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,

    /// Override the seed from the config
    #[arg(long)]
    seed: Option<u64>,

    /// Load and check both inputs without drawing or writing anything
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // 載入 TOML 配置
    let mut config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    logger::init(args.verbose, args.json_logs, config.log_level());
    tracing::info!("📁 Loaded configuration from: {}", args.config);

    // 應用命令列覆蓋設定
    if let Some(seed) = args.seed {
        config.draw.seed = Some(seed);
        tracing::info!("🔧 Seed overridden to: {}", seed);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    display_config_summary(&config);

    let storage = LocalStorage::new(config.base_dir().to_string());
    let pipeline = SantaPipeline::new(storage, config);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - nothing will be drawn or written");
        if let Err(e) = perform_dry_run(&pipeline).await {
            eprintln!("❌ {:#}", e);
            std::process::exit(1);
        }
        return;
    }

    let runner = ExchangeRunner::new(pipeline);
    match runner.run().await {
        Ok(output_path) => {
            println!("Secret Santa assignments saved to {}.", output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Draw failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
            eprintln!("{}", e.user_friendly_message());

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
    tracing::info!("📋 Exchange: {}", config.exchange.name);
    if let Some(description) = &config.exchange.description {
        tracing::info!("   {}", description);
    }
    tracing::info!("👥 Roster: {}", config.input.roster);
    tracing::info!("🎁 Prior round: {}", config.input.prior);
    tracing::info!("📂 Base directory: {}", config.base_dir());
    tracing::info!("💾 Output formats: {}", config.output.formats.join(", "));
}

async fn perform_dry_run(pipeline: &SantaPipeline<LocalStorage, TomlConfig>) -> anyhow::Result<()> {
    let summary = pipeline
        .dry_run()
        .await
        .context("failed to load the exchange inputs")?;
    print!("{}", summary);
    Ok(())
}
