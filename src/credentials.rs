//! AWS credentials bootstrap.
//!
//! Credentials live in the standard per-user file so the `aws` CLI can pick
//! them up. This module only knows "present or absent"; when absent it
//! offers to write the file from prompted values.

use crate::error::{Error, Outcome};
use crate::prompt::Prompter;
use std::fs;
use std::path::{Path, PathBuf};

pub fn credentials_path() -> Result<PathBuf, Error> {
    let home = dirs::home_dir()
        .ok_or_else(|| Error::Config("cannot determine home directory".to_string()))?;
    Ok(home.join(".aws").join("credentials"))
}

/// Make sure a credentials file exists, offering to create one interactively.
/// Declining the offer cancels the calling operation.
pub fn ensure_credentials(path: &Path, prompter: &dyn Prompter) -> Result<Outcome, Error> {
    if path.is_file() {
        return Ok(Outcome::Done(()));
    }
    if !prompter.confirm("AWS S3 credentials not detected. Do you wish to configure them?") {
        return Ok(Outcome::Cancelled);
    }

    let key_id = prompter.ask("AWS Access Key ID:");
    let secret = prompter.ask_hidden("AWS Secret Access Key:");
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(
        path,
        format!("[default]\naws_access_key_id = {key_id}\naws_secret_access_key = {secret}\n"),
    )?;
    tracing::info!(path = %path.display(), "wrote credentials file");
    Ok(Outcome::Done(()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::testing::ScriptedPrompter;

    #[test]
    fn existing_file_short_circuits_without_prompting() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("credentials");
        fs::write(&path, "[default]\n").expect("seed file");

        let prompter = ScriptedPrompter::declining();
        let outcome = ensure_credentials(&path, &prompter).expect("no error");
        assert_eq!(outcome, Outcome::Done(()));
        assert_eq!(*prompter.confirms.borrow(), 0);
    }

    #[test]
    fn declined_setup_cancels_and_writes_nothing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(".aws").join("credentials");

        let prompter = ScriptedPrompter::declining();
        let outcome = ensure_credentials(&path, &prompter).expect("no error");
        assert!(outcome.is_cancelled());
        assert!(!path.exists());
    }

    #[test]
    fn accepted_setup_writes_the_default_profile() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(".aws").join("credentials");

        let prompter = ScriptedPrompter::accepting(&["AKID123", "s3cret"]);
        let outcome = ensure_credentials(&path, &prompter).expect("no error");
        assert_eq!(outcome, Outcome::Done(()));

        let written = fs::read_to_string(&path).expect("file written");
        assert!(written.starts_with("[default]\n"));
        assert!(written.contains("aws_access_key_id = AKID123"));
        assert!(written.contains("aws_secret_access_key = s3cret"));
    }
}
