//! core::search
//!
//! Search results returned by collection listings.
//!
//! A listing response has the shape `{"total": n, "results": [...]}`. Each
//! hit points at the resource it describes through a self-link, which the
//! store reports under one of `self_link`, `resultId`, or `source["@id"]`
//! depending on the endpoint. Result order is preserved exactly as returned.

use serde::de::Error as _;
use serde::Deserialize;
use serde_json::{Map, Value};

/// Listing response as sent by the store.
#[derive(Debug, Deserialize)]
struct ListingResponse {
    total: u64,
    results: Vec<RawHit>,
}

/// One listing entry before its self-link is chosen.
#[derive(Debug, Deserialize)]
struct RawHit {
    self_link: Option<String>,
    #[serde(rename = "resultId")]
    result_id: Option<String>,
    source: Option<RawSource>,
}

#[derive(Debug, Deserialize)]
struct RawSource {
    #[serde(rename = "@id")]
    id: Option<String>,
    #[serde(flatten)]
    fields: Map<String, Value>,
}

impl RawHit {
    fn into_result(self) -> Option<SearchResult> {
        let RawHit {
            self_link,
            result_id,
            source,
        } = self;

        let (source_id, source) = match source {
            Some(RawSource { id, mut fields }) => {
                if let Some(id) = &id {
                    fields.insert("@id".to_string(), Value::String(id.clone()));
                }
                (id, Value::Object(fields))
            }
            None => (None, Value::Null),
        };

        let self_link = self_link.or(result_id).or(source_id)?;
        Some(SearchResult { self_link, source })
    }
}

/// One hit of a listing.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    self_link: String,
    source: Value,
}

impl SearchResult {
    /// Build a hit from its self-link, with no other payload.
    pub fn new(self_link: impl Into<String>) -> Self {
        Self {
            self_link: self_link.into(),
            source: Value::Null,
        }
    }

    /// Parse a hit from a listing entry.
    ///
    /// Returns `None` if the entry is malformed or no self-link can be found.
    pub fn from_value(value: Value) -> Option<Self> {
        serde_json::from_value::<RawHit>(value).ok()?.into_result()
    }

    /// URL of the resource this hit describes.
    pub fn self_link(&self) -> &str {
        &self.self_link
    }

    /// The hit's embedded `source` document, or `Null` when it has none.
    pub fn source(&self) -> &Value {
        &self.source
    }
}

/// A page of listing results.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SearchResultList {
    total: u64,
    results: Vec<SearchResult>,
}

impl SearchResultList {
    /// Build a list from already-parsed hits.
    pub fn new(total: u64, results: Vec<SearchResult>) -> Self {
        Self { total, results }
    }

    /// Decode a listing response body.
    ///
    /// # Errors
    ///
    /// Returns the decode error if `total` or `results` is missing or
    /// mistyped, or if any entry lacks a self-link.
    pub fn from_body(body: Value) -> Result<Self, serde_json::Error> {
        let listing: ListingResponse = serde_json::from_value(body)?;

        let results = listing
            .results
            .into_iter()
            .enumerate()
            .map(|(index, hit)| {
                hit.into_result().ok_or_else(|| {
                    serde_json::Error::custom(format!("listing result {} has no self-link", index))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            total: listing.total,
            results,
        })
    }

    /// Total number of matches reported by the store (may exceed this page).
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Hits in the order the store returned them.
    pub fn results(&self) -> &[SearchResult] {
        &self.results
    }

    /// Number of hits on this page.
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Whether this page is empty.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

impl<'a> IntoIterator for &'a SearchResultList {
    type Item = &'a SearchResult;
    type IntoIter = std::slice::Iter<'a, SearchResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.iter()
    }
}
