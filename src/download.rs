//! Latest-database-dump download from remote object storage.

use crate::config::Config;
use crate::credentials::ensure_credentials;
use crate::error::{Error, Outcome};
use crate::prompt::Prompter;
use crate::storage::{select_latest, ObjectStore};
use std::path::{Path, PathBuf};

/// Ensure the latest dump for `site` exists locally and return its path.
///
/// The newest object in the site's bucket wins. If a file named by that
/// object's key is already present under `dest_dir`, the local copy is
/// trusted and no transfer happens, so repeated calls in one session are
/// cheap.
pub fn download_latest(
    config: &Config,
    site: &str,
    store: &dyn ObjectStore,
    prompter: &dyn Prompter,
    credentials_path: &Path,
    dest_dir: &Path,
) -> Result<Outcome<PathBuf>, Error> {
    if ensure_credentials(credentials_path, prompter)?.is_cancelled() {
        return Ok(Outcome::Cancelled);
    }

    let bucket = config.bucket(site)?;
    let objects = store.list(bucket)?;
    let latest = select_latest(objects).ok_or_else(|| {
        Error::NotFound(format!(
            "no database dump found in bucket {bucket} for site '{site}'"
        ))
    })?;

    let dest = dest_dir.join(&latest.key);
    if dest.is_file() {
        tracing::info!(path = %dest.display(), "local dump already present, skipping download");
        return Ok(Outcome::Done(dest));
    }
    store.fetch(bucket, &latest.key, &dest)?;
    tracing::info!(path = %dest.display(), "database dump downloaded");
    Ok(Outcome::Done(dest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::testing::ScriptedPrompter;
    use crate::storage::testing::{object, FakeStore};
    use std::fs;

    fn config_with_bucket(bucket: &str) -> Config {
        serde_yaml::from_str(&format!("sites:\n  - id: default\n    bucket: {bucket}\n"))
            .expect("config parses")
    }

    struct Fixture {
        dir: tempfile::TempDir,
        credentials: PathBuf,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = tempfile::tempdir().expect("tempdir");
            let credentials = dir.path().join("credentials");
            fs::write(&credentials, "[default]\n").expect("seed credentials");
            Fixture { dir, credentials }
        }

        fn dest_dir(&self) -> &Path {
            self.dir.path()
        }
    }

    #[test]
    fn downloads_the_newest_object() {
        let fixture = Fixture::new();
        let config = config_with_bucket("dumps");
        let store = FakeStore::default().with_bucket(
            "dumps",
            vec![object("old.sql.gz", 100), object("new.sql.gz", 200)],
        );
        let prompter = ScriptedPrompter::declining();

        let outcome = download_latest(
            &config,
            "default",
            &store,
            &prompter,
            &fixture.credentials,
            fixture.dest_dir(),
        )
        .expect("no error");

        let Outcome::Done(path) = outcome else {
            panic!("expected a downloaded path");
        };
        assert_eq!(path, fixture.dest_dir().join("new.sql.gz"));
        assert_eq!(
            *store.fetches.borrow(),
            [("dumps".to_string(), "new.sql.gz".to_string())]
        );
    }

    #[test]
    fn second_call_reuses_the_local_file() {
        let fixture = Fixture::new();
        let config = config_with_bucket("dumps");
        let store =
            FakeStore::default().with_bucket("dumps", vec![object("latest.sql.gz", 100)]);
        let prompter = ScriptedPrompter::declining();

        for _ in 0..2 {
            let outcome = download_latest(
                &config,
                "default",
                &store,
                &prompter,
                &fixture.credentials,
                fixture.dest_dir(),
            )
            .expect("no error");
            assert!(matches!(outcome, Outcome::Done(_)));
        }
        // One transfer total: the second call found the file on disk.
        assert_eq!(store.fetches.borrow().len(), 1);
    }

    #[test]
    fn empty_bucket_is_not_found() {
        let fixture = Fixture::new();
        let config = config_with_bucket("dumps");
        let store = FakeStore::default().with_bucket("dumps", Vec::new());
        let prompter = ScriptedPrompter::declining();

        let err = download_latest(
            &config,
            "default",
            &store,
            &prompter,
            &fixture.credentials,
            fixture.dest_dir(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
        assert!(err.to_string().contains("dumps"));
    }

    #[test]
    fn declined_credentials_setup_cancels_before_any_listing() {
        let fixture = Fixture::new();
        fs::remove_file(&fixture.credentials).expect("remove seeded credentials");
        let config = config_with_bucket("dumps");
        let store =
            FakeStore::default().with_bucket("dumps", vec![object("latest.sql.gz", 100)]);
        let prompter = ScriptedPrompter::declining();

        let outcome = download_latest(
            &config,
            "default",
            &store,
            &prompter,
            &fixture.credentials,
            fixture.dest_dir(),
        )
        .expect("no error");
        assert!(outcome.is_cancelled());
        assert_eq!(*store.lists.borrow(), 0);
    }

    #[test]
    fn unconfigured_bucket_is_a_configuration_error() {
        let fixture = Fixture::new();
        let config: Config =
            serde_yaml::from_str("sites:\n  - id: default\n").expect("config parses");
        let store = FakeStore::default();
        let prompter = ScriptedPrompter::declining();

        let err = download_latest(
            &config,
            "default",
            &store,
            &prompter,
            &fixture.credentials,
            fixture.dest_dir(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
