use clap::Parser;
use fn_order::utils::error::{ErrorSeverity, FnOrderError};
use fn_order::utils::{logger, validation::Validate};
use fn_order::{
    AppConfig, BitrixClient, CliArgs, EtlEngine, FnOrderPipeline, LocalStorage, TelegramNotifier,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    let log_dir = args.log_dir.clone().unwrap_or_else(logger::default_log_dir);
    let log_file = logger::init_cli_logger(args.verbose, &log_dir)?;

    tracing::info!("Starting fn-order");
    tracing::debug!("CLI args: {:?}, log file: {}", args, log_file.display());

    let mut config = match AppConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load config file '{}': {}", args.config, e);
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            std::process::exit(1);
        }
    };

    if let Some(group_by) = args.group_by {
        config.local.group_by = group_by;
        tracing::info!("Grouping overridden to {:?}", group_by);
    }

    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        tracing::error!("Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let pipeline = match build_pipeline(&args, config) {
        Ok(pipeline) => pipeline,
        Err(e) => exit_with(e),
    };
    let engine = EtlEngine::new(pipeline);

    let result = match engine.preview().await {
        Ok(result) => result,
        Err(e) => exit_with(e),
    };

    if args.print {
        println!("{}", serde_json::to_string_pretty(&result.groups)?);
    }

    if args.dry_run {
        tracing::info!("DRY RUN - nothing written or sent");
        print!("{}", result.summary_text);
        return Ok(());
    }

    match engine.finish(result).await {
        Ok(output_path) => {
            tracing::info!("Done: {}", output_path);
            println!("✅ Done: {}", output_path);
        }
        Err(e) => exit_with(e),
    }

    Ok(())
}

fn build_pipeline(
    args: &CliArgs,
    config: AppConfig,
) -> fn_order::Result<FnOrderPipeline<LocalStorage>> {
    let storage = LocalStorage::new(config.output_path().to_string());
    let telegram = config.active_telegram().cloned();
    let bitrix = config.bitrix.clone();

    let mut pipeline = FnOrderPipeline::new(storage, config);
    if let Some(date) = args.date {
        pipeline = pipeline.with_date(date);
    }

    match telegram {
        Some(telegram) if !args.no_notify => {
            let recipients = telegram.recipients();
            pipeline = pipeline.with_notifier(
                Box::new(TelegramNotifier::from_config(&telegram)),
                recipients,
            );
        }
        _ => tracing::info!("Chat notifications disabled"),
    }

    match bitrix {
        Some(bitrix) if bitrix.enabled || args.create_tasks => {
            let tracker = Box::new(BitrixClient::from_config(&bitrix));
            pipeline = pipeline.with_task_tracker(tracker, bitrix.user_id);
        }
        None if args.create_tasks => {
            return Err(FnOrderError::MissingConfigError {
                field: "bitrix".to_string(),
            });
        }
        _ => tracing::info!("Workflow tasks disabled"),
    }

    Ok(pipeline)
}

fn exit_with(e: FnOrderError) -> ! {
    tracing::error!(
        "fn-order failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("Recovery suggestion: {}", e.recovery_suggestion());

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
