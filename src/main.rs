use anyhow::Context;
use licita::{
    AnalysisPipeline, AppState, LicitaConfigManager, ModelHandles,
    api::routes::create_router,
    cli::{
        Cli, Commands, ask,
        init::{self, InitConfig, InitResult},
        output::Output,
    },
    research::prompts::EXAMPLE_QUESTIONS,
    search::build_search_provider,
    utils::toml_config::{LicitaConfig, LogFormat, ServerConfig},
};
use std::{path::Path, sync::Arc};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before anything reads the environment
    dotenvy::dotenv().ok();

    let cli = Cli::parse_args();
    let output = if cli.no_color {
        Output::no_color()
    } else {
        Output::new()
    };

    match cli.command {
        Some(Commands::Init {
            path,
            force,
            search,
            host,
            port,
        }) => {
            let config = InitConfig {
                path,
                force,
                search,
                host,
                port,
            };
            match init::run(config, &output) {
                InitResult::Success | InitResult::AlreadyExists => Ok(()),
                InitResult::Error(e) => anyhow::bail!("init failed: {}", e),
            }
        }
        Some(Commands::Examples) => {
            output.header("Perguntas de exemplo");
            for question in EXAMPLE_QUESTIONS {
                output.list_item(question);
            }
            Ok(())
        }
        Some(Commands::Config { validate }) => show_config(&cli.config, validate, &output),
        Some(Commands::Ask {
            question,
            no_thinking,
        }) => {
            // Keep the console readable: only warnings unless asked otherwise
            let manager = load_config(&cli.config)?;
            let level = if cli.verbose { "debug" } else { "warn" };
            init_tracing(&manager.config().server, Some(level));

            let pipeline = build_pipeline(Arc::clone(&manager)).await?;
            ask::run(&pipeline, question, !no_thinking, &output)
                .await
                .context("analysis failed")
        }
        Some(Commands::Serve) | None => {
            let manager = load_config(&cli.config)?;
            init_tracing(&manager.config().server, cli.verbose.then_some("debug"));
            serve(manager).await
        }
    }
}

fn load_config(path: &Path) -> anyhow::Result<Arc<LicitaConfigManager>> {
    let manager = LicitaConfigManager::new(path)
        .with_context(|| format!("failed to load configuration from {}", path.display()))?;
    Ok(Arc::new(manager))
}

/// `RUST_LOG` wins; otherwise the override, then the configured level
fn init_tracing(server: &ServerConfig, level_override: Option<&str>) {
    let fallback = level_override.unwrap_or(server.log_level.as_str());
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(fallback))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    let _ = match server.log_format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.try_init(),
    };
}

async fn build_pipeline(manager: Arc<LicitaConfigManager>) -> anyhow::Result<AnalysisPipeline> {
    let config = manager.config();

    let models = ModelHandles::from_config(&config)
        .await
        .context("failed to create LLM clients")?;
    let search =
        build_search_provider(&config.search).context("failed to create search provider")?;

    tracing::info!(
        general = models.general.model_name(),
        reasoning = models.reasoning.model_name(),
        search = search.name(),
        "Pipeline ready"
    );

    Ok(AnalysisPipeline::new(models, search, manager))
}

async fn serve(manager: Arc<LicitaConfigManager>) -> anyhow::Result<()> {
    if let Err(e) = manager.start_watching() {
        tracing::warn!("Config hot-reload disabled: {}", e);
    }

    let pipeline = build_pipeline(Arc::clone(&manager)).await?;
    let state = AppState {
        config_manager: Arc::clone(&manager),
        pipeline: Arc::new(pipeline),
    };

    let server = manager.config().server.clone();
    let addr = format!("{}:{}", server.host, server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    tracing::info!("Analisador de Licitações API listening on http://{}", addr);
    tracing::info!("OpenAPI document at http://{}/api-docs/openapi.json", addr);

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    manager.stop_watching();
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

fn show_config(path: &Path, validate: bool, output: &Output) -> anyhow::Result<()> {
    output.header("Configuration");
    output.kv("file", &path.display().to_string());

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let config: LicitaConfig =
        toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))?;

    output.subheader("Server");
    output.kv("address", &format!("{}:{}", config.server.host, config.server.port));
    output.kv("log_level", &config.server.log_level);

    output.subheader("Models");
    for role in [&config.pipeline.general_model, &config.pipeline.reasoning_model] {
        let described = config
            .get_model(role)
            .map(|m| format!("{} ({})", m.model, m.provider))
            .unwrap_or_else(|| "<missing>".to_string());
        output.kv(role, &described);
    }

    output.subheader("Search");
    output.kv("provider", &format!("{:?}", config.search.provider));
    output.kv("max_results", &config.search.max_results.to_string());
    output.kv("allowed_domains", &config.search.allowed_domains.join(", "));
    output.kv(
        "branch_timeout_secs",
        &config.pipeline.branch_timeout_secs.to_string(),
    );

    if validate {
        output.newline();
        match config.validate() {
            Ok(()) => output.success("Configuration is valid"),
            Err(e) => {
                output.error(&e.to_string());
                anyhow::bail!("invalid configuration");
            }
        }
    }

    Ok(())
}
