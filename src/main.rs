use clap::Parser;
use clause_audit::app::{batch, interactive::InteractiveSession};
use clause_audit::config::Command;
use clause_audit::utils::{logger, validation::Validate};
use clause_audit::{AuditEngine, AuditError, ChatCompletionClient, CliConfig, LocalStorage};

fn fail(e: &AuditError) -> ! {
    tracing::error!(
        "❌ Audit failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
    std::process::exit(e.exit_code());
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("🚀 Starting clause-audit");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => fail(&e),
    };

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        fail(&e);
    }
    tracing::debug!("Resolved config: {:?}", config);

    let client = match ChatCompletionClient::new(config.model_settings()) {
        Ok(client) => client,
        Err(e) => fail(&e),
    };
    let engine = AuditEngine::new(LocalStorage::default(), client, config);

    let started = chrono::Local::now();
    let outcome = match cli.command {
        Command::Batch { .. } => {
            let mut stdout = std::io::stdout().lock();
            batch::run_batch(&engine, &mut stdout).await
        }
        Command::Interactive => {
            let stdin = std::io::stdin().lock();
            let stdout = std::io::stdout().lock();
            InteractiveSession::new(stdin, stdout).run(&engine).await
        }
    };

    match outcome {
        Ok(run) => {
            let elapsed = chrono::Local::now() - started;
            tracing::info!(
                "✅ Finished {} comparisons ({} non-compliant) in {}s",
                run.results.len(),
                run.non_compliant_count(),
                elapsed.num_seconds()
            );
            Ok(())
        }
        Err(e) => fail(&e),
    }
}
