//! Lando environment description parsing and site URI resolution.
//!
//! `.lando.yml` is re-read on every resolution call; a missing or malformed
//! file is a hard error rather than a silent default.

use crate::error::Error;
use serde::Deserialize;
use std::fs;
use std::path::Path;

pub const LANDO_FILE: &str = ".lando.yml";
pub const DEFAULT_SITE: &str = "default";

const LOCAL_DOMAIN_SUFFIX: &str = ".lndo.site";

/// The slice of a Lando file this tool cares about. Unknown keys (recipe,
/// tooling, events, ...) are ignored.
#[derive(Deserialize, Debug)]
pub struct LandoFile {
    name: String,
    #[serde(default)]
    proxy: Option<Proxy>,
    #[serde(default)]
    services: Option<Services>,
}

#[derive(Deserialize, Debug, Default)]
struct Proxy {
    #[serde(default)]
    appserver: Option<Vec<String>>,
}

#[derive(Deserialize, Debug, Default)]
struct Services {
    #[serde(default)]
    appserver: Option<AppserverService>,
}

#[derive(Deserialize, Debug, Default)]
struct AppserverService {
    #[serde(default)]
    overrides: Option<Overrides>,
}

#[derive(Deserialize, Debug, Default)]
struct Overrides {
    #[serde(default)]
    environment: Option<EnvironmentVars>,
}

#[derive(Deserialize, Debug, Default)]
struct EnvironmentVars {
    #[serde(rename = "DRUSH_OPTIONS_URI")]
    drush_options_uri: Option<String>,
}

impl LandoFile {
    pub fn load(path: &Path) -> Result<Self, Error> {
        let raw = fs::read_to_string(path)
            .map_err(|err| Error::Config(format!("cannot read {}: {err}", path.display())))?;
        serde_yaml::from_str(&raw)
            .map_err(|err| Error::Config(format!("cannot parse {}: {err}", path.display())))
    }

    fn proxy_domains(&self) -> Option<&[String]> {
        self.proxy.as_ref()?.appserver.as_deref()
    }

    fn uri_override(&self) -> Option<&str> {
        self.services
            .as_ref()?
            .appserver
            .as_ref()?
            .overrides
            .as_ref()?
            .environment
            .as_ref()?
            .drush_options_uri
            .as_deref()
    }

    /// Externally reachable URL for `site`.
    ///
    /// Precedence, in order:
    /// 1. a `proxy.appserver` domain list (multi-site): the single domain
    ///    containing the site id wins; zero or multiple matches fail, as does
    ///    asking for the default site at all,
    /// 2. an explicit `DRUSH_OPTIONS_URI` override, returned verbatim,
    /// 3. `http://<name>.lndo.site` derived from the environment name.
    pub fn resolve_uri(&self, site: &str) -> Result<String, Error> {
        if let Some(domains) = self.proxy_domains() {
            if site == DEFAULT_SITE {
                return Err(Error::Ambiguous(
                    "multi-site configuration detected, but no site was specified".to_string(),
                ));
            }
            let matches: Vec<&str> = domains
                .iter()
                .filter(|domain| domain.contains(site))
                .map(String::as_str)
                .collect();
            return match matches.as_slice() {
                [domain] => Ok(format!("http://{domain}")),
                [] => Err(Error::Ambiguous(format!(
                    "unable to determine a URI for site '{site}' from the proxy configuration"
                ))),
                _ => Err(Error::Ambiguous(format!(
                    "more than one possible URI found for site '{site}'"
                ))),
            };
        }
        if let Some(uri) = self.uri_override() {
            return Ok(uri.to_string());
        }
        Ok(format!("http://{}{LOCAL_DOMAIN_SUFFIX}", self.name))
    }
}
