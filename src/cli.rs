//! CLI argument parsing for the environment lifecycle commands.
//!
//! The CLI is intentionally thin: each subcommand maps straight onto one
//! workflow function, so the same core logic can be exercised without a
//! terminal.

use clap::{Parser, Subcommand};

/// Root CLI entrypoint.
#[derive(Parser, Debug)]
#[command(
    name = "siteops",
    version,
    about = "Developer environment lifecycle for multi-site Drupal projects",
    after_help = "Examples:\n  siteops dev-refresh\n  siteops dev-refresh events\n  siteops database-download events\n  siteops uri events\n  siteops frontend-dev-enable --yes\n  siteops database-refresh-remote-multi",
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct RootArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fully refresh a development environment: composer install, lando
    /// start, database refresh, front-end build, dev mode, login link
    DevRefresh(SiteArgs),
    /// Download the latest database dump and print its local path
    DatabaseDownload(SiteArgs),
    /// Download and import the latest dump, then deploy
    DatabaseRefreshLocal(SiteArgs),
    /// Refresh every configured site's database on the remote preview host
    DatabaseRefreshRemoteMulti,
    /// Print the resolved URL for a site
    Uri(SiteArgs),
    /// Enable front-end development mode (Twig debug, caches off)
    FrontendDevEnable(ToggleArgs),
    /// Disable front-end development mode
    FrontendDevDisable(ToggleArgs),
}

#[derive(Parser, Debug)]
pub struct SiteArgs {
    /// Drupal site directory name
    #[arg(default_value = "default")]
    pub site: String,
}

#[derive(Parser, Debug)]
pub struct ToggleArgs {
    /// Drupal site directory name
    #[arg(default_value = "default")]
    pub site: String,

    /// Skip the destructive-operation confirmation
    #[arg(long, short = 'y')]
    pub yes: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn site_defaults_to_default() {
        let args = RootArgs::parse_from(["siteops", "dev-refresh"]);
        match args.command {
            Command::DevRefresh(site_args) => assert_eq!(site_args.site, "default"),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn toggle_commands_accept_yes() {
        let args = RootArgs::parse_from(["siteops", "frontend-dev-enable", "events", "--yes"]);
        match args.command {
            Command::FrontendDevEnable(toggle) => {
                assert_eq!(toggle.site, "events");
                assert!(toggle.yes);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn subcommand_names_are_kebab_case() {
        use clap::CommandFactory;
        let command = RootArgs::command();
        let names: Vec<String> = command
            .get_subcommands()
            .map(|sub| sub.get_name().to_string())
            .collect();
        assert!(names.contains(&"database-refresh-remote-multi".to_string()));
        assert!(names.contains(&"frontend-dev-disable".to_string()));
    }
}
