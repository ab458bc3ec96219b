//! core::query
//!
//! Listing query construction.
//!
//! # Query Styles
//!
//! The store's listing endpoints accept `q`, `filter`, `from`, `size` and
//! `deprecated`. Two renderings are supported:
//!
//! - [`QueryStyle::Placeholders`] (default): every parameter is always sent,
//!   unset ones as empty placeholders, e.g. `q=&filter=&from=&size=&deprecated=False`.
//!   Some deployments depend on this exact shape.
//! - [`QueryStyle::Compact`]: unset parameters are omitted; `deprecated` is
//!   always sent.
//!
//! The `deprecated` flag is rendered as `True`/`False`, which is what the
//! store parses.
//!
//! # Example
//!
//! ```
//! use nexus_repo::core::query::{ListQuery, QueryStyle};
//!
//! let query = ListQuery::new().full_text("sensor").size(20);
//! assert_eq!(
//!     query.query_string(QueryStyle::Placeholders),
//!     "q=sensor&filter=&from=&size=20&deprecated=False"
//! );
//! assert_eq!(
//!     query.query_string(QueryStyle::Compact),
//!     "q=sensor&size=20&deprecated=False"
//! );
//! assert_eq!(
//!     query.path("/schemas", QueryStyle::Compact),
//!     "/schemas/?q=sensor&size=20&deprecated=False"
//! );
//! ```

use serde::{Deserialize, Serialize};

/// How unset listing parameters are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryStyle {
    /// Send every parameter, unset ones as empty placeholders.
    #[default]
    Placeholders,
    /// Omit unset parameters.
    Compact,
}

impl QueryStyle {
    /// Parse a style name as used in configuration files.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "placeholders" => Some(QueryStyle::Placeholders),
            "compact" => Some(QueryStyle::Compact),
            _ => None,
        }
    }

    /// The configuration name of this style.
    pub fn name(&self) -> &'static str {
        match self {
            QueryStyle::Placeholders => "placeholders",
            QueryStyle::Compact => "compact",
        }
    }
}

impl std::fmt::Display for QueryStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Parameters of a collection listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    /// Path below the collection root, e.g. `/acme` to list one organization's domains.
    pub subpath: Option<String>,
    /// Full-text search expression (`q`).
    pub full_text: Option<String>,
    /// Structured filter expression (`filter`).
    pub filter: Option<String>,
    /// Offset of the first hit (`from`).
    pub from: Option<u64>,
    /// Page size (`size`).
    pub size: Option<u64>,
    /// Include deprecated resources.
    pub deprecated: bool,
}

impl ListQuery {
    /// An empty query: everything unset, deprecated resources excluded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict the listing to a path below the collection root.
    pub fn subpath(mut self, subpath: impl Into<String>) -> Self {
        self.subpath = Some(subpath.into());
        self
    }

    /// Set the full-text query.
    pub fn full_text(mut self, text: impl Into<String>) -> Self {
        self.full_text = Some(text.into());
        self
    }

    /// Set the structured filter.
    pub fn filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Set the offset of the first hit.
    pub fn from(mut self, from: u64) -> Self {
        self.from = Some(from);
        self
    }

    /// Set the page size.
    pub fn size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    /// Include or exclude deprecated resources.
    pub fn deprecated(mut self, deprecated: bool) -> Self {
        self.deprecated = deprecated;
        self
    }

    /// Render the query string (without the leading `?`).
    pub fn query_string(&self, style: QueryStyle) -> String {
        let params: [(&str, Option<String>); 4] = [
            ("q", self.full_text.as_deref().map(encode)),
            ("filter", self.filter.as_deref().map(encode)),
            ("from", self.from.map(|n| n.to_string())),
            ("size", self.size.map(|n| n.to_string())),
        ];

        let mut pairs: Vec<String> = params
            .into_iter()
            .filter_map(|(key, value)| match (value, style) {
                (Some(value), _) => Some(format!("{}={}", key, value)),
                (None, QueryStyle::Placeholders) => Some(format!("{}=", key)),
                (None, QueryStyle::Compact) => None,
            })
            .collect();

        let deprecated = if self.deprecated { "True" } else { "False" };
        pairs.push(format!("deprecated={}", deprecated));

        pairs.join("&")
    }

    /// Render the full request path below `root`: `{root}{subpath}/?{query}`.
    pub fn path(&self, root: &str, style: QueryStyle) -> String {
        let subpath = self
            .subpath
            .as_deref()
            .map(|s| s.trim_matches('/'))
            .filter(|s| !s.is_empty())
            .map(|s| format!("/{}", s))
            .unwrap_or_default();

        format!("{}{}/?{}", root, subpath, self.query_string(style))
    }
}

fn encode(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}
