use crate::error::{Result, SliceError};
use crate::types::ContextResult;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Persists assembled results as timestamped JSON artifacts.
pub struct SnapshotWriter {
    dir: PathBuf,
}

impl SnapshotWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write the result as pretty JSON under a fresh timestamp-derived
    /// name and return the artifact path. Directory creation and write
    /// failures surface as `SliceError::Snapshot`; the caller decides
    /// whether they are fatal.
    pub fn write(&self, result: &ContextResult) -> Result<PathBuf> {
        self.write_artifact(result)
            .map_err(|err| SliceError::Snapshot(err.to_string()))
    }

    fn write_artifact(&self, result: &ContextResult) -> io::Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;

        let stamp = unix_ms();
        let mut path = self.dir.join(format!("ast-context-{stamp}.json"));
        // Millisecond stamps can collide under rapid requests.
        let mut attempt = 1u32;
        while path.exists() {
            path = self.dir.join(format!("ast-context-{stamp}-{attempt}.json"));
            attempt += 1;
        }

        let mut body = serde_json::to_string_pretty(result)?;
        body.push('\n');
        fs::write(&path, body)?;
        Ok(path)
    }
}

fn unix_ms() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ContextMetadata;
    use serde_json::json;

    fn sample_result() -> ContextResult {
        ContextResult {
            symbols: vec!["foo".to_string()],
            matched_symbols: vec!["foo".to_string()],
            nodes: vec![json!({"id": "fn_a", "name": "foo"})],
            endpoints: None,
            relationships: None,
            metadata: ContextMetadata {
                source_files: json!([]),
                imports: json!([]),
                dependencies: json!({}),
                nodes_found: 1,
                strategy: "symbol-based".to_string(),
            },
            saved_to: None,
        }
    }

    #[test]
    fn snapshot_round_trips_through_disk() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let writer = SnapshotWriter::new(tmp.path());

        let path = writer.write(&sample_result()).expect("write snapshot");
        assert!(path.exists());
        assert!(path
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("ast-context-"));

        let body = fs::read_to_string(&path).expect("read snapshot");
        let parsed: ContextResult = serde_json::from_str(&body).expect("parse snapshot");
        assert_eq!(parsed.symbols, ["foo"]);
        assert_eq!(parsed.metadata.nodes_found, 1);
    }

    #[test]
    fn rapid_writes_do_not_clobber_each_other() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let writer = SnapshotWriter::new(tmp.path());
        let result = sample_result();

        let first = writer.write(&result).expect("first write");
        let second = writer.write(&result).expect("second write");
        let third = writer.write(&result).expect("third write");

        let paths = [&first, &second, &third];
        for path in paths {
            assert!(path.exists());
        }
        assert_ne!(first, second);
        assert_ne!(second, third);
    }

    #[test]
    fn unwritable_directory_propagates_an_error() {
        // A file where the output directory should be makes create_dir_all fail.
        let tmp = tempfile::tempdir().expect("tempdir");
        let blocker = tmp.path().join("not-a-dir");
        fs::write(&blocker, "x").expect("write blocker");

        let writer = SnapshotWriter::new(&blocker);
        let err = writer.write(&sample_result()).unwrap_err();
        assert!(matches!(err, SliceError::Snapshot(_)));
        assert!(err.to_string().starts_with("snapshot write failed"));
    }
}
