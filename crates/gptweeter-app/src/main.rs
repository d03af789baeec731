mod cli;
mod commands;
mod tweets;

use std::process::ExitCode;

use gptweeter_ai::{ChatEngine, ImageClient};
use gptweeter_common::GptweeterError;
use gptweeter_config::{Credentials, GptweeterConfig};
use tracing_subscriber::EnvFilter;

use cli::{Args, Command};

const DEFAULT_DIRECTIVE: &str = "gptweeter=info";

fn init_logging(level: &str) {
    let directive = if level.contains('=') {
        level.to_string()
    } else {
        format!("gptweeter={level}")
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive(
            directive.parse().unwrap_or_else(|_| {
                DEFAULT_DIRECTIVE
                    .parse()
                    .unwrap_or_else(|_| tracing_subscriber::filter::LevelFilter::INFO.into())
            }),
        ))
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let dotenv = dotenvy::dotenv();
    let args = cli::parse();

    // Logging depends on the config, so load it first and report afterwards.
    let loaded = gptweeter_config::load_config_from(args.config.as_deref());
    let level = match (&args.log_level, &loaded) {
        (Some(level), _) => level.clone(),
        (None, Ok(config)) => config.logging.level.as_filter().to_string(),
        (None, Err(_)) => "info".to_string(),
    };
    init_logging(&level);

    tracing::info!("GPTweeter v{} starting...", env!("CARGO_PKG_VERSION"));
    match dotenv {
        Ok(path) => tracing::debug!("loaded environment from {}", path.display()),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!("failed to load .env: {e}"),
    }

    let config = match loaded {
        Ok(config) => config,
        Err(e) if args.config.is_some() => {
            tracing::error!("config load failed: {e}");
            return ExitCode::FAILURE;
        }
        Err(e) => {
            tracing::warn!("config load failed, using defaults: {e}");
            GptweeterConfig::default()
        }
    };

    match run(args, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args, config: GptweeterConfig) -> Result<(), GptweeterError> {
    let credentials = Credentials::load();
    tracing::info!(
        "providers with credentials: {:?}",
        credentials
            .available()
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
    );

    match args.command {
        Command::Chat { model, system } => {
            let engine = ChatEngine::from_config(&config, &credentials)?;
            commands::chat(&engine, model.as_deref(), &system).await
        }
        Command::Tweets { topic, model } => {
            let engine = ChatEngine::from_config(&config, &credentials)?;
            commands::tweets(&engine, topic.as_deref(), &model).await
        }
        Command::Image(image_args) => {
            let client = ImageClient::from_config(&config, &credentials)?;
            commands::image(&client, &image_args).await
        }
    }
}
