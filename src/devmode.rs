//! Front-end development mode toggling.
//!
//! Enable copies the stock local-settings and development-services templates
//! into place, turns on Twig debugging, and uncomments the cache-bin disable
//! lines. The rewrite is a fixed rule list over files of known shape and is
//! destructive by design: prior customizations are not merged, re-running
//! always re-derives the same content from the templates.

use crate::error::{Error, Outcome};
use crate::prompt::Prompter;
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::{Path, PathBuf};

/// Literal (match, replacement) rules applied in order to settings.local.php:
/// point it at the front-end services file, then uncomment the render,
/// dynamic_page_cache, and page cache-bin lines.
const SETTINGS_REWRITES: [(&str, &str); 4] = [
    (
        "/sites/development.services.yml",
        "/sites/fe.development.services.yml",
    ),
    (
        "# $settings['cache']['bins']['render']",
        "$settings['cache']['bins']['render']",
    ),
    (
        "# $settings['cache']['bins']['dynamic_page_cache'] = ",
        "$settings['cache']['bins']['dynamic_page_cache'] = ",
    ),
    (
        "# $settings['cache']['bins']['page'] = ",
        "$settings['cache']['bins']['page'] = ",
    ),
];

/// Generated and template file locations for one site.
pub struct DevModePaths {
    pub settings: PathBuf,
    pub settings_template: PathBuf,
    pub services: PathBuf,
    pub services_template: PathBuf,
}

impl DevModePaths {
    pub fn for_site(web_root: &Path, site: &str) -> Self {
        let sites = web_root.join("sites");
        DevModePaths {
            settings: sites.join(site).join("settings.local.php"),
            settings_template: sites.join("example.settings.local.php"),
            services: sites.join("fe.development.services.yml"),
            services_template: sites.join("development.services.yml"),
        }
    }
}

fn confirmed(paths: &DevModePaths, yes: bool, prompter: &dyn Prompter) -> bool {
    if yes {
        return true;
    }
    prompter.confirm(&format!(
        "This will overwrite any customizations in {} and {}. Continue?",
        paths.settings.display(),
        paths.services.display(),
    ))
}

pub fn enable(paths: &DevModePaths, yes: bool, prompter: &dyn Prompter) -> Result<Outcome, Error> {
    if !confirmed(paths, yes, prompter) {
        return Ok(Outcome::Cancelled);
    }
    tracing::info!("enabling front-end development mode");

    fs::copy(&paths.settings_template, &paths.settings)?;
    fs::copy(&paths.services_template, &paths.services)?;
    enable_twig_debug(&paths.services)?;
    rewrite_settings(&paths.settings)?;
    Ok(Outcome::Done(()))
}

pub fn disable(paths: &DevModePaths, yes: bool, prompter: &dyn Prompter) -> Result<Outcome, Error> {
    if !confirmed(paths, yes, prompter) {
        return Ok(Outcome::Cancelled);
    }
    tracing::info!("disabling front-end development mode");

    for path in [&paths.settings, &paths.services] {
        if path.is_file() {
            fs::remove_file(path)?;
        }
    }
    Ok(Outcome::Done(()))
}

/// Set `parameters.twig.config` to debug + auto_reload in the services file.
fn enable_twig_debug(path: &Path) -> Result<(), Error> {
    let raw = fs::read_to_string(path)?;
    let mut doc: Value = serde_yaml::from_str(&raw)?;
    let root = doc.as_mapping_mut().ok_or_else(|| {
        Error::Config(format!("{} is not a YAML mapping", path.display()))
    })?;

    let parameters = root
        .entry(Value::from("parameters"))
        .or_insert_with(|| Value::Mapping(Mapping::new()));
    let parameters = parameters.as_mapping_mut().ok_or_else(|| {
        Error::Config(format!("parameters in {} is not a mapping", path.display()))
    })?;

    let mut twig = Mapping::new();
    twig.insert(Value::from("debug"), Value::from(true));
    twig.insert(Value::from("auto_reload"), Value::from(true));
    parameters.insert(Value::from("twig.config"), Value::Mapping(twig));

    fs::write(path, serde_yaml::to_string(&doc)?)?;
    Ok(())
}

fn rewrite_settings(path: &Path) -> Result<(), Error> {
    let mut content = fs::read_to_string(path)?;
    for (from, to) in SETTINGS_REWRITES {
        content = content.replace(from, to);
    }
    fs::write(path, content)?;
    Ok(())
}
