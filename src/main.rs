mod app;
mod catalog;
mod charts;
mod config;
mod dataset;
mod error;
mod map;
mod portrait;
mod survey;
mod ui;

use std::sync::Arc;

use ratatui_image::picker::Picker;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::app::App;
use crate::catalog::JikanClient;
use crate::config::Config;
use crate::error::Result;

fn setup_logging() -> Result<tracing_appender::non_blocking::WorkerGuard> {
    let data_dir = config::data_dir()?;
    std::fs::create_dir_all(&data_dir)?;

    let file_appender = tracing_appender::rolling::daily(&data_dir, "anisurvey.log");
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("anisurvey=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .init();

    Ok(guard)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Set up file-based logging (we own the terminal for TUI)
    let _log_guard = match setup_logging() {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Warning: Could not set up logging: {}", e);
            None
        }
    };

    info!("Starting anisurvey");

    let config = Config::load()?;
    info!(
        base_url = %config.fetch.base_url,
        target = config.fetch.target_count,
        "Loaded config"
    );

    let source = JikanClient::new(&config.fetch)?;

    let mut terminal = app::init_terminal()?;

    let accent = ui::widgets::parse_accent_color(&config.ui.accent_color);
    let _ = app::play_splash(&mut terminal, accent);

    // Needs raw mode, so it runs after the terminal is set up
    let picker = Picker::from_query_stdio().unwrap_or_else(|e| {
        warn!(error = ?e, "Terminal graphics query failed, using half blocks");
        Picker::from_fontsize((8, 16))
    });

    let mut app = App::new(config, Arc::new(source), picker);
    let result = app.run(&mut terminal);

    // Restore terminal on exit
    app::restore_terminal()?;

    result
}
