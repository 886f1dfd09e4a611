use clap::Parser;
use color_eyre::eyre::{Result, bail};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use oxigallery::infrastructure::{AppConfig, CliArgs, StorageManager};
use oxigallery::presentation::App;

fn init_logging(config: &AppConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_string()));

    if let Some(log_path) = config.effective_log_path() {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .init();

        info!(path = %log_path.display(), "Logging initialized");
    } else {
        tracing_subscriber::registry().with(filter).init();
    }

    Ok(())
}

fn load_config(args: &CliArgs) -> Result<AppConfig> {
    let mut config = match &args.config {
        Some(path) => StorageManager::with_dir(
            path.parent().map(std::path::Path::to_path_buf).unwrap_or_default(),
        )
        .load_config(Some(path))?,
        None => StorageManager::new()?.load_config(None)?,
    };
    config.merge_with_args(args);
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = CliArgs::parse();
    if args.urls.is_empty() {
        bail!("no media URLs given; pass one or more URLs to show");
    }

    let config = load_config(&args)?;
    init_logging(&config)?;

    info!(version = oxigallery::VERSION, items = args.urls.len(), "Starting oxigallery");

    let app = App::new(&config, &args)?;

    let mut terminal = ratatui::init();

    let result = app.run(&mut terminal).await;

    ratatui::restore();

    result
}
