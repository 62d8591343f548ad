//! arXiv Atom API client.

use super::{IndexEntry, PaperIndex};
use crate::config::SearchSettings;
use crate::error::{LeseError, Result};
use async_trait::async_trait;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use reqwest::header::ACCEPT;
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

/// Client for the arXiv query API.
#[derive(Debug, Clone)]
pub struct ArxivClient {
    http: reqwest::Client,
    base: Url,
}

impl ArxivClient {
    /// Create a client for the given query endpoint.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base = Url::parse(base_url)
            .map_err(|e| LeseError::Config(format!("invalid arXiv URL '{}': {}", base_url, e)))?;
        let http = reqwest::Client::builder()
            .user_agent(concat!("lese/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(Self { http, base })
    }

    /// Create a client from search settings.
    pub fn from_settings(settings: &SearchSettings) -> Result<Self> {
        Self::new(
            &settings.arxiv_url,
            Duration::from_secs(settings.timeout_seconds),
        )
    }

    /// Build the query request, most relevant results first.
    fn request(&self, query: &str, max_results: usize) -> Result<reqwest::Request> {
        Ok(self
            .http
            .get(self.base.clone())
            .query(&[
                ("search_query", query),
                ("sortBy", "relevance"),
                ("sortOrder", "descending"),
            ])
            .query(&[("start", 0), ("max_results", max_results)])
            .header(ACCEPT, "application/atom+xml, application/xml;q=0.9")
            .build()?)
    }
}

#[async_trait]
impl PaperIndex for ArxivClient {
    #[instrument(skip(self))]
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<IndexEntry>> {
        let request = self.request(query, max_results)?;
        let response = self.http.execute(request).await?.error_for_status()?;

        let body = response.text().await?;
        let entries = parse_atom_feed(&body)?;
        debug!("arXiv returned {} entries", entries.len());
        Ok(entries)
    }
}

#[derive(Debug, Clone, Copy)]
enum Field {
    Id,
    Title,
    Summary,
    Published,
    Author,
}

/// Parse an arXiv Atom feed into raw index entries.
pub fn parse_atom_feed(xml: &str) -> Result<Vec<IndexEntry>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut entries = Vec::new();
    let mut current: Option<IndexEntry> = None;
    let mut field: Option<Field> = None;
    let mut in_author = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                if e.local_name().as_ref() == b"entry" {
                    current = Some(IndexEntry::default());
                    field = None;
                    in_author = false;
                    continue;
                }
                let Some(entry) = current.as_mut() else {
                    continue;
                };
                field = match e.local_name().as_ref() {
                    b"id" => Some(Field::Id),
                    b"title" => Some(Field::Title),
                    b"summary" => Some(Field::Summary),
                    b"published" => Some(Field::Published),
                    b"author" => {
                        in_author = true;
                        None
                    }
                    b"name" if in_author => {
                        entry.authors.push(String::new());
                        Some(Field::Author)
                    }
                    b"link" => {
                        read_link(&e, entry)?;
                        None
                    }
                    _ => None,
                };
            }
            Ok(Event::Empty(e)) => {
                if let Some(entry) = current.as_mut() {
                    if e.local_name().as_ref() == b"link" {
                        read_link(&e, entry)?;
                    }
                }
            }
            Ok(Event::Text(t)) => {
                if let (Some(entry), Some(f)) = (current.as_mut(), field) {
                    let text = t
                        .unescape()
                        .map_err(|e| LeseError::IndexResponse(format!("bad text: {}", e)))?;
                    let target = match f {
                        Field::Id => entry.id_url.get_or_insert_with(String::new),
                        Field::Title => entry.title.get_or_insert_with(String::new),
                        Field::Summary => entry.summary.get_or_insert_with(String::new),
                        Field::Published => entry.published.get_or_insert_with(String::new),
                        Field::Author => match entry.authors.last_mut() {
                            Some(name) => name,
                            None => continue,
                        },
                    };
                    target.push_str(&text);
                }
            }
            Ok(Event::End(e)) => {
                field = None;
                match e.local_name().as_ref() {
                    b"entry" => entries.extend(current.take()),
                    b"author" => in_author = false,
                    _ => {}
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(LeseError::IndexResponse(format!(
                    "XML parse error at position {}: {}",
                    reader.buffer_position(),
                    e
                )))
            }
            _ => {}
        }
    }

    Ok(entries)
}

fn read_link(e: &BytesStart<'_>, entry: &mut IndexEntry) -> Result<()> {
    let mut href = None;
    let mut is_pdf = false;

    for attr in e.attributes().flatten() {
        let value = attr
            .unescape_value()
            .map_err(|e| LeseError::IndexResponse(format!("bad link attribute: {}", e)))?;
        match attr.key.as_ref() {
            b"href" => href = Some(value.into_owned()),
            b"title" if value.eq_ignore_ascii_case("pdf") => is_pdf = true,
            b"type" if value.contains("pdf") => is_pdf = true,
            _ => {}
        }
    }

    if is_pdf && entry.pdf_url.is_none() {
        entry.pdf_url = href;
    }
    Ok(())
}
