mod app;
mod config;
mod paths;
mod receipt;
mod session;
mod state_machine;
mod structured_logger;
mod surface;
mod transmission;
mod tui;
mod validation;

use anyhow::{Context, Result};
use clap::Parser;

use app::cli::Cli;
use app::headless::{self, HeadlessScript};
use app::SigningSession;

const BUILD_SHA: &str = env!("SIGNDESK_GIT_SHA");

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = app::load_config(&cli)?;
    let document = app::resolve_document(&cli, &config)?;

    let session_id = uuid::Uuid::new_v4().to_string();
    let logs_dir = paths::session_logs_dir(&session_id)?;
    let mut session = SigningSession::start(&session_id, document, &config, &logs_dir)?;

    if cli.headless {
        session.logger.log_startup(BUILD_SHA, "headless");
        let script_path = cli
            .script
            .as_deref()
            .context("--headless requires --script")?;
        let script = HeadlessScript::load(script_path)?;
        let out_dir = app::export_dir(cli.out.as_deref(), &session_id)?;

        println!("[session] Signing session ID: {}", session_id);
        let report = headless::run_script(&mut session, &script, &out_dir)?;
        for line in headless::summarize(&report) {
            println!("{}", line);
        }
        println!("[session] Log: {}", session.logger.path().display());
        return Ok(());
    }

    session.logger.log_startup(BUILD_SHA, "tui");
    app::tui_runner::run_tui(session, cli.out).await
}
