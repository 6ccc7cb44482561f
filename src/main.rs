#![recursion_limit = "256"]
//! # Main Entry Point
//!
//! Bootstraps the bot:
//! - Domain: Environment and Configuration
//! - Application: Module registration, Lifecycle, Logging
//! - Infrastructure: Matrix, Signals
//! - Interface: Built-in Modules
//!

mod application;
mod domain;
mod infrastructure;
mod interface;
mod strings;

#[cfg(test)]
mod testing;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use crate::application::app::Application;
use crate::application::logging::{self, RemoteLogs};
use crate::application::modules::{BASELINE_MODULES, resolve_modules};
use crate::domain::config::AppOptions;
use crate::domain::env::{Environment, Stage};
use crate::infrastructure::direct;
use crate::infrastructure::signals::SignalHandler;

#[derive(Parser)]
#[command(name = "canni", about = "Module-based Matrix chat bot", long_about = None)]
struct Cli {
    /// Root directory holding config/, modules/ and logs/
    #[arg(long, default_value = ".")]
    root: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the bot with the resolved module list (default)
    Run,
    /// Log in with TOKEN and answer `ping` with `pong`
    Ping {
        #[arg(long, env = "HOMESERVER")]
        homeserver: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1. Stage decides whether .env is loaded; everything else is read after it
    let stage = Stage::from_process();
    if stage.is_dev() {
        dotenvy::dotenv().ok();
    }
    let env = Environment {
        stage,
        ..Environment::from_process()
    };

    // 2. Logging Setup
    let options = AppOptions::for_stage(&cli.root, &env.stage);
    let mut logging = logging::init(&options, &env)?;

    match cli.command.unwrap_or(Command::Run) {
        Command::Run => run_bot(options, &env, logging.take_remote()).await,
        Command::Ping { homeserver } => direct::run(&homeserver, env.token.as_deref()).await,
    }
}

async fn run_bot(
    options: AppOptions,
    env: &Environment,
    remote: Option<RemoteLogs>,
) -> Result<()> {
    // 3. Configure & register
    let app = Arc::new(Application::configure(options)?);

    let modules = resolve_modules(
        BASELINE_MODULES,
        env.disabled_modules.as_deref(),
        env.enabled_modules.as_deref(),
    );
    for module in &modules {
        app.register_module(module)?;
    }

    // 4. Lifecycle signals
    let signals = SignalHandler::new(app.clone());
    let _exit = signals.exit_guard();
    signals.install();

    // 5. Run until stopped
    app.run(env, remote).await?;
    app.wait().await;

    Ok(())
}
