//! Append-only log of downloaded photo ids.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{LazyLock, Mutex, MutexGuard};

use regex::Regex;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

use crate::error::Result;

/// File name of the manifest inside the target directory.
pub const MANIFEST_FILE: &str = "stats.log";

static ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9A-Za-z@_-]+$").expect("valid id pattern"));

/// Read the set of recorded ids. A missing file is an empty manifest.
///
/// Lines that are blank, not UTF-8, or not a plausible id are skipped.
pub fn load(path: &Path) -> Result<HashSet<String>> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(HashSet::new()),
        Err(e) => return Err(e.into()),
    };

    let mut ids = HashSet::new();
    for (number, line) in bytes.split(|b| *b == b'\n').enumerate() {
        let Ok(line) = std::str::from_utf8(line) else {
            tracing::debug!("Skipping non UTF-8 manifest line {}", number + 1);
            continue;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if !ID_PATTERN.is_match(line) {
            tracing::debug!("Skipping malformed manifest line {}: {:?}", number + 1, line);
            continue;
        }
        ids.insert(line.to_string());
    }

    Ok(ids)
}

/// Append one id as a single write of one line.
pub async fn append(path: &Path, id: &str) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await?;
    file.write_all(format!("{}\n", id).as_bytes()).await?;
    file.flush().await?;
    Ok(())
}

#[derive(Debug, Default)]
struct Entries {
    recorded: HashSet<String>,
    in_flight: HashSet<String>,
}

/// Process-wide view of the manifest shared by every worker.
///
/// Dedup consults the live set: ids recorded before or during this run, plus
/// ids currently being downloaded.
#[derive(Debug)]
pub struct Manifest {
    path: PathBuf,
    entries: Mutex<Entries>,
    writer: tokio::sync::Mutex<()>,
}

impl Manifest {
    /// Open the manifest, loading its current contents.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let recorded = load(&path)?;
        tracing::debug!(
            "Loaded {} manifest entries from {}",
            recorded.len(),
            path.display()
        );

        Ok(Self {
            path,
            entries: Mutex::new(Entries {
                recorded,
                in_flight: HashSet::new(),
            }),
            writer: tokio::sync::Mutex::new(()),
        })
    }

    /// Location of the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn entries(&self) -> MutexGuard<'_, Entries> {
        // Entries stay consistent even if a holder panicked.
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Number of recorded ids.
    pub fn len(&self) -> usize {
        self.entries().recorded.len()
    }

    /// Whether no ids are recorded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the id has been recorded.
    pub fn contains(&self, id: &str) -> bool {
        self.entries().recorded.contains(id)
    }

    /// Reserve an id for download. False if it is recorded or already in flight.
    pub fn claim(&self, id: &str) -> bool {
        let mut entries = self.entries();
        if entries.recorded.contains(id) || entries.in_flight.contains(id) {
            return false;
        }
        entries.in_flight.insert(id.to_string())
    }

    /// Forget an in-flight id after a failed download.
    pub fn release(&self, id: &str) {
        self.entries().in_flight.remove(id);
    }

    /// Append the id to the log and mark it recorded.
    pub async fn record(&self, id: &str) -> Result<()> {
        {
            let _guard = self.writer.lock().await;
            append(&self.path, id).await?;
        }

        let mut entries = self.entries();
        entries.in_flight.remove(id);
        entries.recorded.insert(id.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tempfile::tempdir;

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let ids = load(&dir.path().join(MANIFEST_FILE)).unwrap();
        assert!(ids.is_empty());
    }

    #[test]
    fn test_load_skips_malformed_lines() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(MANIFEST_FILE);
        let mut content = b"42\n\n  43  \nnot an id\n".to_vec();
        content.extend_from_slice(&[0xff, 0xfe, b'\n']);
        content.extend_from_slice(b"44");
        std::fs::write(&path, content).unwrap();

        let ids = load(&path).unwrap();
        let expected: HashSet<String> = ["42", "43", "44"].iter().map(|s| s.to_string()).collect();
        assert_eq!(ids, expected);
    }

    #[tokio::test]
    async fn test_append_then_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(MANIFEST_FILE);

        append(&path, "42").await.unwrap();
        append(&path, "43").await.unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "42\n43\n");
        assert_eq!(load(&path).unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_claim_release_record() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(MANIFEST_FILE);
        std::fs::write(&path, "42\n").unwrap();

        let manifest = Manifest::open(&path).unwrap();
        assert!(manifest.contains("42"));
        assert!(!manifest.claim("42"));

        assert!(manifest.claim("43"));
        assert!(!manifest.claim("43"), "in-flight ids are not claimed twice");

        manifest.release("43");
        assert!(manifest.claim("43"), "released ids can be retried");

        manifest.record("43").await.unwrap();
        assert!(manifest.contains("43"));
        assert!(!manifest.claim("43"));
        assert_eq!(manifest.len(), 2);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "42\n43\n");
    }

    #[tokio::test]
    async fn test_concurrent_records_do_not_interleave() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(MANIFEST_FILE);
        let manifest = Arc::new(Manifest::open(&path).unwrap());

        let mut handles = Vec::new();
        for i in 0..64 {
            let manifest = Arc::clone(&manifest);
            handles.push(tokio::spawn(async move {
                let id = format!("{}", 1_000_000 + i);
                assert!(manifest.claim(&id));
                manifest.record(&id).await.unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 64);
        assert!(lines.iter().all(|l| l.len() == 7));
        assert_eq!(load(&path).unwrap().len(), 64);
    }
}
