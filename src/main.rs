use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod config;
mod credentials;
mod devmode;
mod download;
mod error;
mod exec;
mod lando;
mod prompt;
mod storage;
mod workflow;

use cli::{Command, RootArgs};
use config::Config;
use error::Outcome;
use exec::ShellRunner;
use prompt::StdinPrompter;
use storage::AwsCliStore;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    match run(RootArgs::parse()) {
        Ok(Outcome::Done(())) => {}
        Ok(Outcome::Cancelled) => {
            // A declined confirmation is a clean stop, not a failure.
            eprintln!("cancelled.");
        }
        Err(err) => {
            eprintln!("error: {err:#}");
            std::process::exit(1);
        }
    }
}

fn run(args: RootArgs) -> Result<Outcome> {
    let project_root = std::env::current_dir().context("determine working directory")?;
    let config = Config::load(&project_root.join(config::CONFIG_FILE))?;

    let store = AwsCliStore;
    let runner = ShellRunner;
    let prompter = StdinPrompter;
    let app = workflow::App {
        config: &config,
        store: &store,
        runner: &runner,
        prompter: &prompter,
        credentials_path: credentials::credentials_path()?,
        project_root,
    };

    match args.command {
        Command::DevRefresh(site) => workflow::dev_refresh(&app, &site.site),
        Command::DatabaseDownload(site) => workflow::database_download(&app, &site.site),
        Command::DatabaseRefreshLocal(site) => workflow::database_refresh_local(&app, &site.site),
        Command::DatabaseRefreshRemoteMulti => workflow::database_refresh_remote_multi(&app),
        Command::Uri(site) => workflow::uri(&app, &site.site),
        Command::FrontendDevEnable(toggle) => {
            workflow::frontend_dev_enable(&app, &toggle.site, toggle.yes)
        }
        Command::FrontendDevDisable(toggle) => {
            workflow::frontend_dev_disable(&app, &toggle.site, toggle.yes)
        }
    }
}
