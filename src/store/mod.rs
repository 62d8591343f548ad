//! On-disk paper store for Lese.
//!
//! Paper metadata is kept in one JSON file per search topic:
//! `<root>/<sanitized topic>/papers_info.json`, mapping paper identifiers
//! to [`PaperRecord`]s. Writes merge into the existing partition and replace
//! the file atomically, so readers never observe a half-written partition.

use crate::error::{LeseError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

/// File name of a partition inside its topic directory.
pub const PARTITION_FILE: &str = "papers_info.json";

/// Metadata persisted for a single paper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperRecord {
    /// Paper title.
    pub title: String,
    /// Author names, in publication order.
    pub authors: Vec<String>,
    /// Abstract.
    pub summary: String,
    /// Link to the PDF.
    pub pdf_url: String,
    /// Publication date (`YYYY-MM-DD`).
    pub published: String,
}

/// All papers stored for one topic, keyed by paper identifier.
pub type TopicPartition = BTreeMap<String, PaperRecord>;

/// Summary of a stored topic partition.
#[derive(Debug, Clone)]
pub struct TopicSummary {
    /// Directory name of the partition (the sanitized topic).
    pub name: String,
    /// Number of papers in the partition.
    pub paper_count: usize,
    /// Path to the partition file.
    pub path: PathBuf,
}

/// Normalize a topic into its partition directory name.
///
/// Lowercases, trims, and replaces spaces and path separators with `_`.
pub fn sanitize_topic(topic: &str) -> String {
    topic
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            ' ' | '/' | '\\' => '_',
            c => c,
        })
        .collect()
}

/// Paper store rooted at a directory.
#[derive(Debug, Clone)]
pub struct PaperStore {
    root: PathBuf,
}

impl PaperStore {
    /// Create a store rooted at `root`. Nothing is created on disk until the first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory of the store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the partition file for a topic.
    pub fn partition_path(&self, topic: &str) -> Result<PathBuf> {
        let name = sanitize_topic(topic);
        if name.is_empty() || name == "." || name == ".." {
            return Err(LeseError::InvalidInput(format!(
                "'{}' is not a usable topic name",
                topic
            )));
        }
        Ok(self.root.join(name).join(PARTITION_FILE))
    }

    /// Load the partition for a topic.
    ///
    /// A missing or malformed partition is treated as empty.
    pub fn load(&self, topic: &str) -> TopicPartition {
        let path = match self.partition_path(topic) {
            Ok(path) => path,
            Err(e) => {
                warn!("{}", e);
                return TopicPartition::new();
            }
        };

        match read_partition(&path) {
            Ok(partition) => partition,
            Err(LeseError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No partition at {}", path.display());
                TopicPartition::new()
            }
            Err(e) => {
                warn!("Ignoring unreadable partition {}: {}", path.display(), e);
                TopicPartition::new()
            }
        }
    }

    /// Merge records into a topic's partition and write it back.
    ///
    /// Existing papers are kept; papers with the same identifier are
    /// overwritten. Returns the path of the partition file.
    pub fn merge_and_save<I>(&self, topic: &str, records: I) -> Result<PathBuf>
    where
        I: IntoIterator<Item = (String, PaperRecord)>,
    {
        let path = self.partition_path(topic)?;
        let dir = path
            .parent()
            .ok_or_else(|| LeseError::Persistence(format!("{} has no parent", path.display())))?;

        fs::create_dir_all(dir).map_err(|e| {
            LeseError::Persistence(format!("failed to create {}: {}", dir.display(), e))
        })?;

        let mut partition = self.load(topic);
        let before = partition.len();
        for (id, record) in records {
            partition.insert(id, record);
        }

        let json = serde_json::to_string_pretty(&partition)?;
        write_atomic(dir, &path, json.as_bytes())?;

        debug!(
            "Saved {} papers ({} new) to {}",
            partition.len(),
            partition.len() - before,
            path.display()
        );
        Ok(path)
    }

    /// Find a paper by identifier across every partition.
    ///
    /// Partitions are scanned in directory-name order and the first match wins.
    pub fn find(&self, paper_id: &str) -> Option<PaperRecord> {
        for dir in self.partition_dirs() {
            let file = dir.join(PARTITION_FILE);
            if !file.is_file() {
                continue;
            }
            match read_partition(&file) {
                Ok(mut partition) => {
                    if let Some(record) = partition.remove(paper_id) {
                        return Some(record);
                    }
                }
                Err(e) => warn!("Error reading {}: {}", file.display(), e),
            }
        }
        None
    }

    /// List stored topic partitions.
    pub fn topics(&self) -> Vec<TopicSummary> {
        self.partition_dirs()
            .into_iter()
            .filter_map(|dir| {
                let path = dir.join(PARTITION_FILE);
                if !path.is_file() {
                    return None;
                }
                let name = dir.file_name()?.to_string_lossy().to_string();
                let paper_count = read_partition(&path).map(|p| p.len()).unwrap_or(0);
                Some(TopicSummary {
                    name,
                    paper_count,
                    path,
                })
            })
            .collect()
    }

    fn partition_dirs(&self) -> Vec<PathBuf> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) => {
                debug!("Paper store {} not readable: {}", self.root.display(), e);
                return Vec::new();
            }
        };

        let mut dirs: Vec<PathBuf> = entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.is_dir())
            .collect();
        dirs.sort();
        dirs
    }
}

fn read_partition(path: &Path) -> Result<TopicPartition> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

fn write_atomic(dir: &Path, path: &Path, contents: &[u8]) -> Result<()> {
    let persistence = |e: std::io::Error| {
        LeseError::Persistence(format!("failed to write {}: {}", path.display(), e))
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(persistence)?;
    tmp.write_all(contents).map_err(persistence)?;
    tmp.write_all(b"\n").map_err(persistence)?;
    tmp.as_file().sync_all().map_err(persistence)?;
    tmp.persist(path).map_err(|e| persistence(e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(title: &str) -> PaperRecord {
        PaperRecord {
            title: title.to_string(),
            authors: vec!["Ada Lovelace".to_string(), "Alan Turing".to_string()],
            summary: format!("Summary of {}", title),
            pdf_url: "http://arxiv.org/pdf/2305.06789v1".to_string(),
            published: "2023-05-11".to_string(),
        }
    }

    #[test]
    fn test_sanitize_topic() {
        assert_eq!(sanitize_topic("  Graph Theory "), "graph_theory");
        assert_eq!(sanitize_topic("quantum/../escape"), "quantum_.._escape");
    }

    #[test]
    fn test_partition_path_rejects_unusable_names() {
        let store = PaperStore::new("/tmp/papers");
        assert!(store.partition_path("   ").is_err());
        assert!(store.partition_path("..").is_err());
        assert_eq!(
            store.partition_path("Graph Theory").unwrap(),
            PathBuf::from("/tmp/papers/graph_theory/papers_info.json")
        );
    }

    #[test]
    fn test_load_missing_partition_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = PaperStore::new(dir.path());
        assert!(store.load("nothing here").is_empty());
    }

    #[test]
    fn test_load_corrupt_partition_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = PaperStore::new(dir.path());
        let path = store.partition_path("broken").unwrap();
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{ not json").unwrap();

        assert!(store.load("broken").is_empty());
    }

    #[test]
    fn test_merge_keeps_existing_and_overwrites_matching() {
        let dir = tempfile::tempdir().unwrap();
        let store = PaperStore::new(dir.path());

        store
            .merge_and_save(
                "graph theory",
                vec![
                    ("2301.00001v1".to_string(), record("First")),
                    ("2301.00002v1".to_string(), record("Second")),
                ],
            )
            .unwrap();

        let path = store
            .merge_and_save(
                "Graph Theory",
                vec![
                    ("2301.00002v1".to_string(), record("Second, revised")),
                    ("2301.00003v1".to_string(), record("Third")),
                ],
            )
            .unwrap();

        assert!(path.ends_with("graph_theory/papers_info.json"));

        let partition = store.load("graph theory");
        assert_eq!(partition.len(), 3);
        assert_eq!(partition["2301.00001v1"].title, "First");
        assert_eq!(partition["2301.00002v1"].title, "Second, revised");
        assert_eq!(partition["2301.00003v1"].title, "Third");
    }

    #[test]
    fn test_merge_replaces_corrupt_partition() {
        let dir = tempfile::tempdir().unwrap();
        let store = PaperStore::new(dir.path());
        let path = store.partition_path("broken").unwrap();
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "[1, 2").unwrap();

        store
            .merge_and_save("broken", vec![("1234.5678v1".to_string(), record("Fixed"))])
            .unwrap();

        assert_eq!(store.load("broken").len(), 1);
    }

    #[test]
    fn test_persisted_layout_uses_plain_field_names() {
        let dir = tempfile::tempdir().unwrap();
        let store = PaperStore::new(dir.path());
        let path = store
            .merge_and_save("layout", vec![("2305.06789v1".to_string(), record("Layout"))])
            .unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        let entry = &raw["2305.06789v1"];
        assert_eq!(entry["title"], "Layout");
        assert_eq!(entry["authors"][1], "Alan Turing");
        assert_eq!(entry["pdf_url"], "http://arxiv.org/pdf/2305.06789v1");
        assert_eq!(entry["published"], "2023-05-11");
        assert!(entry["summary"].is_string());
    }

    #[test]
    fn test_find_scans_all_partitions() {
        let dir = tempfile::tempdir().unwrap();
        let store = PaperStore::new(dir.path());
        store
            .merge_and_save("alpha", vec![("a1".to_string(), record("Alpha"))])
            .unwrap();
        store
            .merge_and_save("beta", vec![("b1".to_string(), record("Beta"))])
            .unwrap();

        assert_eq!(store.find("b1"), Some(record("Beta")));
        assert_eq!(store.find("a1"), Some(record("Alpha")));
        assert_eq!(store.find("missing"), None);
    }

    #[test]
    fn test_find_skips_corrupt_partitions() {
        let dir = tempfile::tempdir().unwrap();
        let store = PaperStore::new(dir.path());
        let bad = store.partition_path("aaa").unwrap();
        fs::create_dir_all(bad.parent().unwrap()).unwrap();
        fs::write(&bad, "garbage").unwrap();
        store
            .merge_and_save("zzz", vec![("z1".to_string(), record("Zed"))])
            .unwrap();

        assert_eq!(store.find("z1").map(|r| r.title), Some("Zed".to_string()));
    }

    #[test]
    fn test_find_without_root_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = PaperStore::new(dir.path().join("does-not-exist"));
        assert!(store.find("anything").is_none());
        assert!(store.topics().is_empty());
    }

    #[test]
    fn test_topics_lists_partitions() {
        let dir = tempfile::tempdir().unwrap();
        let store = PaperStore::new(dir.path());
        store
            .merge_and_save(
                "Machine Learning",
                vec![
                    ("m1".to_string(), record("One")),
                    ("m2".to_string(), record("Two")),
                ],
            )
            .unwrap();
        fs::create_dir_all(dir.path().join("empty_dir")).unwrap();

        let topics = store.topics();
        assert_eq!(topics.len(), 1);
        assert_eq!(topics[0].name, "machine_learning");
        assert_eq!(topics[0].paper_count, 2);
    }
}
