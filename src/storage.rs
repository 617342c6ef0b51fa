//! Remote object storage boundary and latest-dump selection.
//!
//! The production client shells out to the `aws` CLI, which is treated like
//! every other external collaborator in this tool; tests substitute an
//! in-memory store through the [`ObjectStore`] trait.

use crate::error::Error;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::path::Path;
use std::process::Command;

#[derive(Debug, Clone)]
pub struct RemoteObject {
    pub key: String,
    pub last_modified: DateTime<Utc>,
}

pub trait ObjectStore {
    /// Complete listing of a bucket; pagination is exhausted before returning.
    fn list(&self, bucket: &str) -> Result<Vec<RemoteObject>, Error>;

    /// Fetch one object's full content into `dest`.
    fn fetch(&self, bucket: &str, key: &str, dest: &Path) -> Result<(), Error>;
}

/// Newest object in a listing: stable ascending sort on the timestamp, last
/// element wins, so timestamp ties fall to the later entry in listing order.
pub fn select_latest(mut objects: Vec<RemoteObject>) -> Option<RemoteObject> {
    objects.sort_by_key(|object| object.last_modified);
    objects.pop()
}

/// Storage client backed by the `aws` CLI. The CLI reads the credentials
/// file that `crate::credentials` writes.
pub struct AwsCliStore;

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Listing {
    #[serde(default)]
    contents: Vec<ListingEntry>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ListingEntry {
    key: String,
    last_modified: String,
}

impl AwsCliStore {
    fn aws(args: &[&str], context: &str) -> Result<Vec<u8>, Error> {
        let output = Command::new("aws")
            .args(args)
            .output()
            .map_err(|err| Error::Transfer(format!("cannot run aws CLI: {err}")))?;
        if !output.status.success() {
            return Err(Error::Transfer(format!(
                "{context}: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        Ok(output.stdout)
    }
}

impl ObjectStore for AwsCliStore {
    fn list(&self, bucket: &str) -> Result<Vec<RemoteObject>, Error> {
        let stdout = Self::aws(
            &["s3api", "list-objects-v2", "--bucket", bucket, "--output", "json"],
            &format!("listing bucket {bucket} failed"),
        )?;
        parse_listing(&stdout)
    }

    fn fetch(&self, bucket: &str, key: &str, dest: &Path) -> Result<(), Error> {
        let dest = dest
            .to_str()
            .ok_or_else(|| Error::Transfer(format!("destination path is not UTF-8: {key}")))?;
        Self::aws(
            &["s3api", "get-object", "--bucket", bucket, "--key", key, dest],
            &format!("fetching {key} from bucket {bucket} failed"),
        )?;
        Ok(())
    }
}

fn parse_listing(bytes: &[u8]) -> Result<Vec<RemoteObject>, Error> {
    // An empty bucket omits the Contents key entirely.
    let listing: Listing = serde_json::from_slice(bytes)
        .map_err(|err| Error::Transfer(format!("unexpected listing output: {err}")))?;
    listing
        .contents
        .into_iter()
        .map(|entry| {
            let last_modified = DateTime::parse_from_rfc3339(&entry.last_modified)
                .map_err(|err| {
                    Error::Transfer(format!("bad timestamp on {}: {err}", entry.key))
                })?
                .with_timezone(&Utc);
            Ok(RemoteObject {
                key: entry.key,
                last_modified,
            })
        })
        .collect()
}


#[cfg(test)]
mod tests {
    use super::testing::object;
    use super::*;

    #[test]
    fn select_latest_picks_the_maximum_timestamp() {
        let objects = vec![
            object("monday.sql.gz", 100),
            object("wednesday.sql.gz", 300),
            object("tuesday.sql.gz", 200),
        ];
        let latest = select_latest(objects).expect("non-empty listing");
        assert_eq!(latest.key, "wednesday.sql.gz");
    }

    #[test]
    fn select_latest_breaks_ties_by_listing_order() {
        let objects = vec![object("first.sql.gz", 100), object("second.sql.gz", 100)];
        let latest = select_latest(objects).expect("non-empty listing");
        assert_eq!(latest.key, "second.sql.gz");
    }

    #[test]
    fn select_latest_of_empty_listing_is_none() {
        assert!(select_latest(Vec::new()).is_none());
    }

    #[test]
    fn parse_listing_reads_aws_cli_output() {
        let raw = br#"{
            "Contents": [
                {"Key": "a.sql.gz", "LastModified": "2024-05-01T10:00:00+00:00", "Size": 12},
                {"Key": "b.sql.gz", "LastModified": "2024-05-02T10:00:00+00:00", "Size": 34}
            ]
        }"#;
        let objects = parse_listing(raw).expect("listing parses");
        assert_eq!(objects.len(), 2);
        assert_eq!(objects[0].key, "a.sql.gz");
        assert!(objects[0].last_modified < objects[1].last_modified);
    }

    #[test]
    fn parse_listing_treats_missing_contents_as_empty() {
        let objects = parse_listing(b"{}").expect("empty listing parses");
        assert!(objects.is_empty());
    }

    #[test]
    fn parse_listing_rejects_malformed_output() {
        let err = parse_listing(b"not json").unwrap_err();
        assert!(matches!(err, Error::Transfer(_)));
    }

    #[test]
    fn parse_listing_rejects_bad_timestamps() {
        let raw = br#"{"Contents": [{"Key": "a.sql.gz", "LastModified": "yesterday"}]}"#;
        let err = parse_listing(raw).unwrap_err();
        assert!(err.to_string().contains("a.sql.gz"));
    }
}
