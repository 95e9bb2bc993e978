mod api;
mod app;
mod cli;
mod config;
mod db;
mod event;
mod geo;
mod hours;
mod logging;
mod sales;
mod session;
mod tui;
mod types;
mod ui;

use anyhow::{Context, Result};
use clap::Parser;

fn main() -> Result<()> {
    if let Err(err) = logging::init_logging() {
        logging::init_logging_stderr();
        tracing::warn!("file logging unavailable: {err:#}");
    }

    let cli_opts = cli::Cli::parse();
    let mut config = config::load_or_init().context("loading config")?;
    if let Some(url) = cli_opts.api_url {
        config.api_base_url = url;
    }
    let zone = config.reference_zone()?;

    let db_path = db::default_db_path();
    let conn = db::init(&db_path)?;
    let client = api::ApiClient::new(&config.api_base_url, config.request_timeout_secs)?;
    tracing::info!("screenboard starting against {}", client.base_url());

    if let Some(command) = cli_opts.command {
        let ctx = cli::CommandContext {
            api: &client,
            conn: &conn,
            zone,
            page_size: config.page_size,
        };
        return cli::run(command, &ctx);
    }

    let mut app = app::App::new(Box::new(client), conn, config, zone);
    let mut terminal = tui::init()?;
    let result = event::run(&mut app, &mut terminal);

    tui::restore()?;

    result
}
