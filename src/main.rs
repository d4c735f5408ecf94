use clap::Parser;
use secret_santa::utils::error::{ErrorSeverity, SantaError};
use secret_santa::utils::{logger, validation::Validate};
use secret_santa::{CliConfig, ExchangeRunner, LocalStorage, SantaPipeline};

#[tokio::main]
async fn main() {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init(config.verbose, config.json_logs, None);

    tracing::info!("Starting secret-santa CLI");
    tracing::debug!("CLI config: {:?}", config);

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let storage = LocalStorage::new(config.workdir.clone());
    let pipeline = SantaPipeline::new(storage, config);
    let runner = ExchangeRunner::new(pipeline);

    match runner.run().await {
        Ok(output_path) => {
            println!("Secret Santa assignments saved to {}.", output_path);
        }
        Err(e) => std::process::exit(report_failure(&e)),
    }
}

fn report_failure(e: &SantaError) -> i32 {
    tracing::error!(
        "❌ Draw failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("{}", e.user_friendly_message());

    // 根據錯誤嚴重程度決定退出碼
    match e.severity() {
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}
