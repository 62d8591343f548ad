//! Literature index abstraction for Lese.
//!
//! Provides a trait-based interface over the external paper index, plus the
//! normalization from raw index entries into stored [`PaperRecord`]s.

mod arxiv;

pub use arxiv::{parse_atom_feed, ArxivClient};

use crate::error::{LeseError, Result};
use crate::store::PaperRecord;
use async_trait::async_trait;
use chrono::DateTime;
use regex::Regex;
use std::sync::OnceLock;

/// A paper as returned by the index, before normalization.
///
/// Every field is optional because the index may omit any of them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexEntry {
    /// Canonical entry URL (e.g. `http://arxiv.org/abs/2301.01234v2`).
    pub id_url: Option<String>,
    pub title: Option<String>,
    pub authors: Vec<String>,
    pub summary: Option<String>,
    pub pdf_url: Option<String>,
    /// Publication timestamp (RFC 3339).
    pub published: Option<String>,
}

impl IndexEntry {
    /// Short paper identifier, e.g. `2301.01234v2`.
    pub fn short_id(&self) -> Option<String> {
        let raw = self.id_url.as_deref()?.trim();
        let id = match id_pattern().captures(raw) {
            Some(caps) => caps[1].to_string(),
            None => raw.to_string(),
        };
        (!id.is_empty()).then_some(id)
    }

    /// Convert into an identifier and a [`PaperRecord`].
    ///
    /// Fails if the identifier, title, PDF link or publication date cannot
    /// be extracted.
    pub fn normalize(self) -> Result<(String, PaperRecord)> {
        let id = self
            .short_id()
            .ok_or_else(|| LeseError::IndexResponse("entry has no identifier".to_string()))?;
        let missing = |field: &str| LeseError::IndexResponse(format!("{}: missing {}", id, field));

        let title = self
            .title
            .as_deref()
            .map(collapse_whitespace)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| missing("title"))?;
        let pdf_url = self.pdf_url.clone().ok_or_else(|| missing("pdf link"))?;
        let published = self
            .published
            .as_deref()
            .ok_or_else(|| missing("publication date"))
            .and_then(|p| {
                published_date(p)
                    .map_err(|e| LeseError::IndexResponse(format!("{}: bad date '{}': {}", id, p, e)))
            })?;

        let record = PaperRecord {
            title,
            authors: self.authors.iter().map(|a| collapse_whitespace(a)).collect(),
            summary: self.summary.as_deref().map(str::trim).unwrap_or_default().to_string(),
            pdf_url,
            published,
        };
        Ok((id, record))
    }
}

/// Trait for literature index implementations.
#[async_trait]
pub trait PaperIndex: Send + Sync {
    /// Search the index, most relevant first.
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<IndexEntry>>;
}

fn id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"arxiv\.org/abs/(\S+)$").expect("valid regex"))
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Reduce an RFC 3339 timestamp to its `YYYY-MM-DD` date.
fn published_date(timestamp: &str) -> std::result::Result<String, chrono::ParseError> {
    let parsed = DateTime::parse_from_rfc3339(timestamp.trim())?;
    Ok(parsed.date_naive().format("%Y-%m-%d").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry() -> IndexEntry {
        IndexEntry {
            id_url: Some("http://arxiv.org/abs/2305.06789v2".to_string()),
            title: Some("Spectral Methods\n  in Graph Theory".to_string()),
            authors: vec!["Fan Chung".to_string(), "Ronald  Graham".to_string()],
            summary: Some("\n  We revisit spectral bounds.\n".to_string()),
            pdf_url: Some("http://arxiv.org/pdf/2305.06789v2".to_string()),
            published: Some("2023-05-11T17:59:59Z".to_string()),
        }
    }

    #[test]
    fn test_short_id() {
        assert_eq!(entry().short_id().as_deref(), Some("2305.06789v2"));

        let old_style = IndexEntry {
            id_url: Some("http://arxiv.org/abs/math/0211159v1".to_string()),
            ..Default::default()
        };
        assert_eq!(old_style.short_id().as_deref(), Some("math/0211159v1"));

        let bare = IndexEntry {
            id_url: Some("2101.00001v1".to_string()),
            ..Default::default()
        };
        assert_eq!(bare.short_id().as_deref(), Some("2101.00001v1"));
    }

    #[test]
    fn test_normalize_entry() {
        let (id, record) = entry().normalize().unwrap();
        assert_eq!(id, "2305.06789v2");
        assert_eq!(record.title, "Spectral Methods in Graph Theory");
        assert_eq!(record.authors, vec!["Fan Chung", "Ronald Graham"]);
        assert_eq!(record.summary, "We revisit spectral bounds.");
        assert_eq!(record.published, "2023-05-11");
    }

    #[test]
    fn test_normalize_rejects_incomplete_entries() {
        let mut no_date = entry();
        no_date.published = Some("last tuesday".to_string());
        assert!(no_date.normalize().is_err());

        let mut no_pdf = entry();
        no_pdf.pdf_url = None;
        assert!(no_pdf.normalize().is_err());

        let mut no_id = entry();
        no_id.id_url = None;
        assert!(no_id.normalize().is_err());
    }
}
