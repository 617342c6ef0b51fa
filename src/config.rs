//! Project configuration loaded from `siteops.yml`.
//!
//! The file is read once at startup and the resulting [`Config`] is passed
//! into every workflow by reference; nothing looks configuration up
//! ambiently after that point.

use crate::error::Error;
use serde::Deserialize;
use std::fs;
use std::path::Path;

pub const CONFIG_FILE: &str = "siteops.yml";

#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Drupal docroot relative to the project root.
    #[serde(default = "default_web_root")]
    pub web_root: String,

    /// Sites in declared order; multi-site loops iterate in this order.
    pub sites: Vec<SiteConfig>,

    #[serde(default)]
    pub commands: Commands,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    /// Site directory name under `<web_root>/sites/`.
    pub id: String,

    /// Object storage bucket holding this site's database dumps.
    #[serde(default)]
    pub bucket: Option<String>,
}

/// External tool command lines, each parsed with shell-words at the call
/// boundary so a command may carry its own leading arguments.
#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct Commands {
    #[serde(default = "default_composer")]
    pub composer: String,

    #[serde(default = "default_lando")]
    pub lando: String,

    /// Front-end asset build, run inside the Lando appserver.
    #[serde(default = "default_frontend_build")]
    pub frontend_build: String,
}

impl Default for Commands {
    fn default() -> Self {
        Commands {
            composer: default_composer(),
            lando: default_lando(),
            frontend_build: default_frontend_build(),
        }
    }
}

fn default_web_root() -> String {
    "web".to_string()
}

fn default_composer() -> String {
    "composer".to_string()
}

fn default_lando() -> String {
    "lando".to_string()
}

fn default_frontend_build() -> String {
    "npm run build".to_string()
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, Error> {
        let raw = fs::read_to_string(path)
            .map_err(|err| Error::Config(format!("cannot read {}: {err}", path.display())))?;
        let config: Config = serde_yaml::from_str(&raw)
            .map_err(|err| Error::Config(format!("cannot parse {}: {err}", path.display())))?;
        if config.sites.is_empty() {
            return Err(Error::Config(format!(
                "{} declares no sites",
                path.display()
            )));
        }
        for (index, site) in config.sites.iter().enumerate() {
            if config.sites[..index].iter().any(|other| other.id == site.id) {
                return Err(Error::Config(format!(
                    "site '{}' is declared more than once in {}",
                    site.id,
                    path.display()
                )));
            }
        }
        Ok(config)
    }

    /// Look up one site; an unknown id is a configuration error naming it.
    pub fn site(&self, id: &str) -> Result<&SiteConfig, Error> {
        self.sites.iter().find(|site| site.id == id).ok_or_else(|| {
            Error::Config(format!("site '{id}' is not configured in {CONFIG_FILE}"))
        })
    }

    /// Bucket for one site; a site without a bucket is a configuration error.
    pub fn bucket(&self, id: &str) -> Result<&str, Error> {
        self.site(id)?.bucket.as_deref().ok_or_else(|| {
            Error::Config(format!(
                "site '{id}' has no bucket configured in {CONFIG_FILE}"
            ))
        })
    }
}
