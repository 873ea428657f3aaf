use crate::{Error, Identifier, Result, Snapshot};
use regex::Regex;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Extension shared by every snapshot file.
const SNAPSHOT_EXTENSION: &str = "html";

/// Prefix for in-flight writes; never matches the snapshot pattern.
const TEMP_PREFIX: &str = ".snapshot-";

/// Flat directory of versioned page snapshots.
///
/// Files are named `<identifier>.v<version>.html` and hold the page body
/// exactly as fetched. There is no index or sidecar: the highest version for
/// an identifier is discovered by scanning file names.
///
/// The directory is assumed to be owned by a single run at a time. Nothing
/// here takes a lock.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    root_dir: PathBuf,
}

impl SnapshotStore {
    /// Creates a store rooted at `root_dir` without touching the file system
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
        }
    }

    /// Creates a store and makes sure its directory exists
    pub fn open(root_dir: impl Into<PathBuf>) -> Result<Self> {
        let store = Self::new(root_dir);
        store.ensure_dir()?;
        Ok(store)
    }

    /// Returns the snapshot directory
    #[must_use]
    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    /// Creates the snapshot directory (and parents) if missing
    pub fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.root_dir).map_err(|e| {
            Error::Storage(format!(
                "Failed to create snapshot directory '{}': {e}",
                self.root_dir.display()
            ))
        })
    }

    /// File name for one version of one identifier
    #[must_use]
    pub fn file_name(identifier: &Identifier, version: u64) -> String {
        format!("{identifier}.v{version}.{SNAPSHOT_EXTENSION}")
    }

    /// Full path of a snapshot file
    #[must_use]
    pub fn snapshot_path(&self, identifier: &Identifier, version: u64) -> PathBuf {
        self.root_dir.join(Self::file_name(identifier, version))
    }

    /// Returns the highest stored version for `identifier`, or 0 if none exist.
    ///
    /// Only regular files named exactly `<identifier>.v<digits>.html` count.
    /// Anything else in the directory is ignored, including versions too large
    /// to represent.
    ///
    /// # Errors
    ///
    /// Failing to list the directory is a storage error: without it the
    /// previous state cannot be known.
    pub fn latest_version(&self, identifier: &Identifier) -> Result<u64> {
        let pattern = version_pattern(identifier)?;
        let entries = fs::read_dir(&self.root_dir).map_err(|e| {
            Error::Storage(format!(
                "Failed to list snapshot directory '{}': {e}",
                self.root_dir.display()
            ))
        })?;

        let mut latest = 0;
        for entry in entries {
            let entry = entry
                .map_err(|e| Error::Storage(format!("Failed to read directory entry: {e}")))?;
            if !entry.file_type().is_ok_and(|t| t.is_file()) {
                continue;
            }
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            if let Some(version) = parse_version(&pattern, name) {
                latest = latest.max(version);
            }
        }

        debug!("Latest version for {} is {}", identifier, latest);
        Ok(latest)
    }

    /// Reads the body stored for a version.
    ///
    /// A missing file yields an empty body: that is the "no prior snapshot"
    /// case, not an error.
    pub fn read(&self, identifier: &Identifier, version: u64) -> Result<Vec<u8>> {
        let path = self.snapshot_path(identifier, version);
        match fs::read(&path) {
            Ok(body) => Ok(body),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No snapshot at {}", path.display());
                Ok(Vec::new())
            },
            Err(e) => Err(Error::Storage(format!(
                "Failed to read snapshot '{}': {e}",
                path.display()
            ))),
        }
    }

    /// Loads the newest snapshot for `identifier`, if any
    pub fn load_latest(&self, identifier: &Identifier) -> Result<Option<Snapshot>> {
        let version = self.latest_version(identifier)?;
        if version == 0 {
            return Ok(None);
        }
        let body = self.read(identifier, version)?;
        Ok(Some(Snapshot {
            identifier: identifier.clone(),
            version,
            body,
        }))
    }

    /// Persists a snapshot and returns the path it was written to.
    ///
    /// The body goes to a temporary file in the same directory first and is
    /// then linked into place, so a reader sees either nothing or the whole
    /// file. An existing version is never overwritten.
    pub fn write(&self, identifier: &Identifier, version: u64, body: &[u8]) -> Result<PathBuf> {
        if version == 0 {
            return Err(Error::Storage(
                "Snapshot versions start at 1; refusing to write version 0".into(),
            ));
        }

        self.ensure_dir()?;
        let path = self.snapshot_path(identifier, version);

        let mut tmp = tempfile::Builder::new()
            .prefix(TEMP_PREFIX)
            .suffix(".tmp")
            .tempfile_in(&self.root_dir)
            .map_err(|e| Error::Storage(format!("Failed to create temp snapshot: {e}")))?;
        tmp.write_all(body)
            .map_err(|e| Error::Storage(format!("Failed to write temp snapshot: {e}")))?;
        tmp.as_file()
            .sync_all()
            .map_err(|e| Error::Storage(format!("Failed to flush temp snapshot: {e}")))?;

        tmp.persist_noclobber(&path).map_err(|e| {
            if e.error.kind() == ErrorKind::AlreadyExists {
                Error::Storage(format!(
                    "Snapshot version {version} already exists at '{}'",
                    path.display()
                ))
            } else {
                Error::Storage(format!(
                    "Failed to commit snapshot '{}': {}",
                    path.display(),
                    e.error
                ))
            }
        })?;

        debug!("Saved {} bytes to {}", body.len(), path.display());
        Ok(path)
    }

    /// Persists `snapshot` under its own identifier and version
    pub fn save(&self, snapshot: &Snapshot) -> Result<PathBuf> {
        self.write(&snapshot.identifier, snapshot.version, &snapshot.body)
    }
}

fn version_pattern(identifier: &Identifier) -> Result<Regex> {
    let source = format!(
        r"^{}\.v(\d+)\.{SNAPSHOT_EXTENSION}$",
        regex::escape(identifier.as_str())
    );
    Regex::new(&source)
        .map_err(|e| Error::Storage(format!("Failed to build snapshot pattern: {e}")))
}

fn parse_version(pattern: &Regex, file_name: &str) -> Option<u64> {
    pattern
        .captures(file_name)
        .and_then(|caps| caps.get(1))
        .and_then(|digits| digits.as_str().parse().ok())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_store() -> (SnapshotStore, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = SnapshotStore::open(temp_dir.path()).expect("Failed to open store");
        (store, temp_dir)
    }

    fn touch(dir: &Path, name: &str, body: &str) {
        fs::write(dir.join(name), body).unwrap();
    }

    #[test]
    fn test_file_name_convention() {
        let id = Identifier::for_url("https://example.com");
        assert_eq!(SnapshotStore::file_name(&id, 7), "1874592979.v7.html");
    }

    #[test]
    fn test_latest_version_empty_directory() {
        let (store, _dir) = create_test_store();
        let id = Identifier::for_url("https://example.com");
        assert_eq!(store.latest_version(&id).unwrap(), 0);
    }

    #[test]
    fn test_latest_version_picks_highest_regardless_of_order() {
        let (store, dir) = create_test_store();
        let id = Identifier::for_url("https://example.com");

        touch(dir.path(), &format!("{id}.v1.html"), "a");
        touch(dir.path(), &format!("{id}.v3.html"), "c");
        touch(dir.path(), &format!("{id}.v2.html"), "b");
        touch(dir.path(), "notes.txt", "unrelated");
        touch(dir.path(), "42.v99.html", "other identifier");

        assert_eq!(store.latest_version(&id).unwrap(), 3);
    }

    #[test]
    fn test_latest_version_ignores_malformed_names() {
        let (store, dir) = create_test_store();
        let id = Identifier::for_url("https://example.com");

        touch(dir.path(), &format!("{id}.v2.html"), "ok");
        touch(dir.path(), &format!("{id}.v9.html.bak"), "backup");
        touch(dir.path(), &format!("{id}.vX.html"), "letters");
        touch(dir.path(), &format!("{id}.v.html"), "no digits");
        touch(dir.path(), &format!("{id}v8html"), "no dots");
        touch(dir.path(), &format!("x{id}.v10.html"), "prefixed");
        touch(
            dir.path(),
            &format!("{id}.v99999999999999999999999.html"),
            "overflow",
        );
        fs::create_dir(dir.path().join(format!("{id}.v50.html"))).unwrap();

        assert_eq!(store.latest_version(&id).unwrap(), 2);
    }

    #[test]
    fn test_latest_version_missing_directory_is_storage_error() {
        let temp_dir = TempDir::new().unwrap();
        let store = SnapshotStore::new(temp_dir.path().join("absent"));
        let id = Identifier::for_url("https://example.com");

        let err = store.latest_version(&id).unwrap_err();
        assert!(matches!(err, Error::Storage(_)), "got {err:?}");
    }

    #[test]
    fn test_write_then_read_is_byte_identical() {
        let (store, _dir) = create_test_store();
        let id = Identifier::for_url("https://example.com");
        let body = b"<html>\r\n  caf\xc3\xa9 \x00\xff</html>".to_vec();

        let path = store.write(&id, 1, &body).unwrap();
        assert!(path.ends_with(format!("{id}.v1.html")));
        assert_eq!(store.read(&id, 1).unwrap(), body);
    }

    #[test]
    fn test_read_missing_version_is_empty() {
        let (store, _dir) = create_test_store();
        let id = Identifier::for_url("https://example.com");
        assert!(store.read(&id, 4).unwrap().is_empty());
    }

    #[test]
    fn test_write_creates_directory() {
        let temp_dir = TempDir::new().unwrap();
        let store = SnapshotStore::new(temp_dir.path().join("nested/history"));
        let id = Identifier::for_url("https://example.com");

        store.write(&id, 1, b"first").unwrap();
        assert!(store.root_dir().is_dir());
        assert_eq!(store.latest_version(&id).unwrap(), 1);
    }

    #[test]
    fn test_write_refuses_existing_version() {
        let (store, _dir) = create_test_store();
        let id = Identifier::for_url("https://example.com");

        store.write(&id, 1, b"original").unwrap();
        let err = store.write(&id, 1, b"replacement").unwrap_err();

        assert!(matches!(err, Error::Storage(ref msg) if msg.contains("already exists")));
        assert_eq!(store.read(&id, 1).unwrap(), b"original");
    }

    #[test]
    fn test_write_refuses_version_zero() {
        let (store, _dir) = create_test_store();
        let id = Identifier::for_url("https://example.com");
        assert!(store.write(&id, 0, b"body").is_err());
    }

    #[test]
    fn test_write_leaves_no_temp_files() {
        let (store, dir) = create_test_store();
        let id = Identifier::for_url("https://example.com");
        store.write(&id, 1, b"body").unwrap();

        let names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec![format!("{id}.v1.html")]);
    }

    #[test]
    fn test_load_latest() {
        let (store, _dir) = create_test_store();
        let id = Identifier::for_url("https://example.com");
        assert!(store.load_latest(&id).unwrap().is_none());

        store.write(&id, 1, b"one").unwrap();
        store.write(&id, 2, b"two").unwrap();

        let latest = store.load_latest(&id).unwrap().unwrap();
        assert_eq!(latest.version, 2);
        assert_eq!(latest.body, b"two");
        assert_eq!(latest.identifier, id);
    }
}
