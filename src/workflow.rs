//! Command workflows: the refresh pipeline and its supporting commands.
//!
//! Stages run strictly in order and the first failure aborts the rest. A
//! declined confirmation gate stops a run cleanly instead of failing it.
//! The one deliberate exception is the multi-site remote refresh, which
//! skips sites whose bucket has no dump and keeps going.

use crate::config::Config;
use crate::devmode::{self, DevModePaths};
use crate::download::download_latest;
use crate::error::{Error, Outcome};
use crate::exec::{split_command, ToolRunner};
use crate::lando::{LandoFile, LANDO_FILE};
use crate::prompt::Prompter;
use crate::storage::ObjectStore;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

// Tugboat preview environments expose MariaDB with fixed credentials.
const TUGBOAT_DB_HOST: &str = "mariadb";
const TUGBOAT_DB_USER: &str = "tugboat";
const TUGBOAT_DB_PASSWORD: &str = "tugboat";

/// Everything a workflow needs, wired once in `main`.
pub struct App<'a> {
    pub config: &'a Config,
    pub store: &'a dyn ObjectStore,
    pub runner: &'a dyn ToolRunner,
    pub prompter: &'a dyn Prompter,
    pub credentials_path: PathBuf,
    /// Project root: dumps land here and `.lando.yml` is read from here.
    pub project_root: PathBuf,
}

impl App<'_> {
    fn lando_path(&self) -> PathBuf {
        self.project_root.join(LANDO_FILE)
    }

    fn web_root(&self) -> PathBuf {
        self.project_root.join(&self.config.web_root)
    }

    fn site_dir(&self, site: &str) -> PathBuf {
        self.web_root().join("sites").join(site)
    }

    /// Run the configured lando command with extra arguments appended.
    fn lando(&self, extra: &[&str], dir: Option<&Path>) -> Result<(), Error> {
        let (program, mut args) = split_command(&self.config.commands.lando)?;
        args.extend(extra.iter().map(|arg| arg.to_string()));
        self.runner.run(&program, &args, dir)
    }
}

/// Full environment refresh for one site: install dependencies, start the
/// environment, refresh the database, build front-end assets, enable
/// front-end development mode, and hand out a login link.
pub fn dev_refresh(app: &App, site: &str) -> Result<Outcome> {
    let (composer, mut composer_args) = split_command(&app.config.commands.composer)?;
    composer_args.push("install".to_string());
    app.runner
        .run(&composer, &composer_args, None)
        .context("install dependencies")?;

    app.lando(&["start"], None).context("start environment")?;

    if database_refresh_local(app, site)?.is_cancelled() {
        return Ok(Outcome::Cancelled);
    }

    build_frontend(app).context("build front-end assets")?;

    let paths = DevModePaths::for_site(&app.web_root(), site);
    if devmode::enable(&paths, true, app.prompter)?.is_cancelled() {
        return Ok(Outcome::Cancelled);
    }

    login_link(app, site).context("create login link")?;
    Ok(Outcome::Done(()))
}

/// Download the latest dump for one site and print its local path.
pub fn database_download(app: &App, site: &str) -> Result<Outcome> {
    match download_site_dump(app, site)? {
        Outcome::Done(path) => {
            println!("{}", path.display());
            Ok(Outcome::Done(()))
        }
        Outcome::Cancelled => Ok(Outcome::Cancelled),
    }
}

/// Download, import into Lando, delete the local dump, then deploy.
pub fn database_refresh_local(app: &App, site: &str) -> Result<Outcome> {
    let dump = match download_site_dump(app, site)? {
        Outcome::Done(path) => path,
        Outcome::Cancelled => return Ok(Outcome::Cancelled),
    };

    tracing::info!(dump = %dump.display(), "importing database");
    let dump_arg = dump.display().to_string();
    app.lando(&["db-import", dump_arg.as_str()], None)
        .context("import database")?;
    remove_dump(&dump);

    deploy(app, site).context("deploy")?;
    Ok(Outcome::Done(()))
}

/// Refresh every configured site's database on a Tugboat preview host.
///
/// A site whose bucket holds no dump is skipped with a warning; any other
/// failure still aborts the whole batch.
pub fn database_refresh_remote_multi(app: &App) -> Result<Outcome> {
    for site in &app.config.sites {
        let dump = match download_site_dump(app, &site.id) {
            Ok(Outcome::Done(path)) => path,
            Ok(Outcome::Cancelled) => return Ok(Outcome::Cancelled),
            Err(Error::NotFound(message)) => {
                tracing::warn!(site = %site.id, "{message}; skipping site");
                continue;
            }
            Err(err) => return Err(err).with_context(|| format!("refresh site '{}'", site.id)),
        };

        recreate_database(app, &site.id)
            .with_context(|| format!("recreate database for site '{}'", site.id))?;
        import_dump_over_mysql(app, &site.id, &dump)
            .with_context(|| format!("import dump for site '{}'", site.id))?;
        remove_dump(&dump);
    }
    Ok(Outcome::Done(()))
}

/// Print the externally reachable URL for one site.
pub fn uri(app: &App, site: &str) -> Result<Outcome> {
    let lando_file = LandoFile::load(&app.lando_path())?;
    println!("{}", lando_file.resolve_uri(site)?);
    Ok(Outcome::Done(()))
}

pub fn frontend_dev_enable(app: &App, site: &str, yes: bool) -> Result<Outcome> {
    let paths = DevModePaths::for_site(&app.web_root(), site);
    Ok(devmode::enable(&paths, yes, app.prompter)?)
}

pub fn frontend_dev_disable(app: &App, site: &str, yes: bool) -> Result<Outcome> {
    let paths = DevModePaths::for_site(&app.web_root(), site);
    Ok(devmode::disable(&paths, yes, app.prompter)?)
}

fn download_site_dump(app: &App, site: &str) -> Result<Outcome<PathBuf>, Error> {
    download_latest(
        app.config,
        site,
        app.store,
        app.prompter,
        &app.credentials_path,
        &app.project_root,
    )
}

fn build_frontend(app: &App) -> Result<(), Error> {
    // The build runs inside the appserver: `lando npm run build` by default.
    let words = shell_words::split(&app.config.commands.frontend_build).map_err(|err| {
        Error::Config(format!(
            "cannot parse command '{}': {err}",
            app.config.commands.frontend_build
        ))
    })?;
    let extra: Vec<&str> = words.iter().map(String::as_str).collect();
    app.lando(&extra, None)
}

fn deploy(app: &App, site: &str) -> Result<(), Error> {
    let dir = app.site_dir(site);
    app.lando(&["drush", "deploy", "--yes"], Some(&dir))?;
    // The deploy may enable or disable modules; importing configuration a
    // second time reconciles their own config with the final module set.
    app.lando(&["drush", "config:import", "--yes"], Some(&dir))
}

fn login_link(app: &App, site: &str) -> Result<(), Error> {
    let lando_file = LandoFile::load(&app.lando_path())?;
    let uri = lando_file.resolve_uri(site)?;
    tracing::info!(%uri, "creating login link");
    app.lando(
        &["drush", "user:login", "--uri", &uri],
        Some(&app.site_dir(site)),
    )
}

fn recreate_database(app: &App, site: &str) -> Result<(), Error> {
    let statement = format!("drop database if exists `{site}`; create database `{site}`;");
    let password = format!("-p{TUGBOAT_DB_PASSWORD}");
    let args: Vec<String> = [
        "-h",
        TUGBOAT_DB_HOST,
        "-u",
        TUGBOAT_DB_USER,
        password.as_str(),
        "-e",
        statement.as_str(),
    ]
    .iter()
    .map(|arg| arg.to_string())
    .collect();
    app.runner.run("mysql", &args, None)
}

fn import_dump_over_mysql(app: &App, site: &str, dump: &Path) -> Result<(), Error> {
    app.runner.run_shell(&format!(
        "zcat {} | mysql -h {TUGBOAT_DB_HOST} -u {TUGBOAT_DB_USER} -p{TUGBOAT_DB_PASSWORD} {site}",
        dump.display()
    ))
}

/// Best-effort cleanup; a leftover dump only wastes disk space.
fn remove_dump(path: &Path) {
    if let Err(err) = fs::remove_file(path) {
        tracing::warn!(path = %path.display(), %err, "could not delete local dump");
    }
}
