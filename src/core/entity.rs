//! core::entity
//!
//! Entity kinds, typed entities, and self-link parsing.
//!
//! # Design
//!
//! Each resource collection is described by a zero-sized marker type
//! implementing [`EntityKind`]: its path root, how many identifier segments
//! a resource carries, and whether the server assigns the final segment.
//! The generic repository engine is parameterized over this trait, so the
//! CRUD protocol is written once and each kind only contributes constants
//! and identifier composition.
//!
//! | Kind             | Path root        | Identifier                           |
//! |------------------|------------------|--------------------------------------|
//! | [`Organization`] | `/organizations` | `{org}`                              |
//! | [`Domain`]       | `/domains`       | `{org}/{domain}`                     |
//! | [`Schema`]       | `/schemas`       | `{org}/{domain}/{schema}/{version}`  |
//! | [`Instance`]     | `/data`          | `{org}/{domain}/{schema}/{version}/{uuid}` |
//!
//! [`Entity`] values are only produced by the repository from server
//! responses and are never mutated in place: every write hands back a fresh
//! entity. Callers build new resources as a [`Draft`].
//!
//! # Example
//!
//! ```
//! use nexus_repo::core::entity::{extract_id_from_url, Domain, EntityKind};
//!
//! let id = Domain::create_id("acme", "lab").unwrap();
//! assert_eq!(id.as_str(), "acme/lab");
//!
//! let link = format!("https://store.example.com{}/{}", Domain::PATH, id);
//! assert_eq!(extract_id_from_url(&link, Domain::PATH).unwrap(), id);
//! ```

use std::fmt;
use std::marker::PhantomData;

use reqwest::Url;
use serde_json::Value;
use thiserror::Error;

use super::types::{Identifier, Revision, TypeError};

/// Errors from turning a self-link back into an identifier.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LinkError {
    /// The link's path does not start with the collection root.
    #[error("link '{url}' is not under collection root '{root}'")]
    ForeignLink { url: String, root: String },

    /// The remainder after the root is not a valid identifier.
    #[error("link '{url}' does not carry a valid identifier: {source}")]
    InvalidIdentifier {
        url: String,
        #[source]
        source: TypeError,
    },
}

/// Capabilities of one resource collection.
///
/// Implemented by the zero-sized markers [`Organization`], [`Domain`],
/// [`Schema`] and [`Instance`].
pub trait EntityKind: fmt::Debug + Send + Sync + 'static {
    /// Human-readable kind name used in logs and CLI output.
    const NAME: &'static str;

    /// Path root of the collection, relative to the store's base URL.
    const PATH: &'static str;

    /// Number of segments in a resource identifier.
    const ID_SEGMENTS: usize;

    /// Number of segments in a [`Draft`] identifier.
    ///
    /// Differs from [`ID_SEGMENTS`](Self::ID_SEGMENTS) only for kinds whose
    /// last segment is assigned by the server.
    const DRAFT_SEGMENTS: usize = Self::ID_SEGMENTS;

    /// Whether `create` POSTs to the collection and lets the server pick the
    /// final identifier segment, instead of PUTting to a client-chosen id.
    const SERVER_ASSIGNED_ID: bool = false;

    /// Identifier of a freshly created resource.
    ///
    /// Kinds with client-chosen ids keep the draft id. Returns `None` when
    /// the creation response does not say where the resource lives.
    fn created_id(draft_id: &Identifier, _response: &Value) -> Option<Identifier> {
        Some(draft_id.clone())
    }

    /// Check that `id` has the segment count of a resource of this kind.
    fn check_id(id: &Identifier) -> Result<(), TypeError> {
        check_segments(id, Self::ID_SEGMENTS)
    }

    /// Resource path of `id` within this collection.
    ///
    /// Each segment is percent-encoded, so segments may carry spaces,
    /// `?`, `#` or non-ASCII text.
    fn resource_path(id: &Identifier) -> String {
        let mut path = String::from(Self::PATH);
        for segment in id.segments() {
            path.push('/');
            path.push_str(&urlencoding::encode(segment));
        }
        path
    }
}

fn check_segments(id: &Identifier, expected: usize) -> Result<(), TypeError> {
    let found = id.segment_count();
    if found == expected {
        Ok(())
    } else {
        Err(TypeError::SegmentCount {
            id: id.to_string(),
            expected,
            found,
        })
    }
}

/// Organizations: the top of the hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Organization;

impl Organization {
    /// Compose `{org}`.
    pub fn create_id(organization: &str) -> Result<Identifier, TypeError> {
        Identifier::from_segments([organization])
    }
}

impl EntityKind for Organization {
    const NAME: &'static str = "organization";
    const PATH: &'static str = "/organizations";
    const ID_SEGMENTS: usize = 1;
}

/// Domains within an organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Domain;

impl Domain {
    /// Compose `{org}/{domain}`.
    pub fn create_id(organization: &str, domain: &str) -> Result<Identifier, TypeError> {
        Identifier::from_segments([organization, domain])
    }
}

impl EntityKind for Domain {
    const NAME: &'static str = "domain";
    const PATH: &'static str = "/domains";
    const ID_SEGMENTS: usize = 2;
}

/// Versioned schemas within a domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Schema;

impl Schema {
    /// Compose `{org}/{domain}/{schema}/{version}`.
    pub fn create_id(
        organization: &str,
        domain: &str,
        schema: &str,
        version: &str,
    ) -> Result<Identifier, TypeError> {
        Identifier::from_segments([organization, domain, schema, version])
    }
}

impl EntityKind for Schema {
    const NAME: &'static str = "schema";
    const PATH: &'static str = "/schemas";
    const ID_SEGMENTS: usize = 4;
}

/// Instances of a schema version; the uuid is assigned by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Instance;

impl Instance {
    /// Compose the collection id `{org}/{domain}/{schema}/{version}`.
    pub fn create_id(
        organization: &str,
        domain: &str,
        schema: &str,
        version: &str,
    ) -> Result<Identifier, TypeError> {
        Identifier::from_segments([organization, domain, schema, version])
    }

    /// Compose the full id `{org}/{domain}/{schema}/{version}/{uuid}`.
    pub fn full_id(
        organization: &str,
        domain: &str,
        schema: &str,
        version: &str,
        uuid: &str,
    ) -> Result<Identifier, TypeError> {
        Self::create_id(organization, domain, schema, version)?.child(uuid)
    }
}

impl EntityKind for Instance {
    const NAME: &'static str = "instance";
    const PATH: &'static str = "/data";
    const ID_SEGMENTS: usize = 5;
    const DRAFT_SEGMENTS: usize = 4;
    const SERVER_ASSIGNED_ID: bool = true;

    fn created_id(draft_id: &Identifier, response: &Value) -> Option<Identifier> {
        let self_id = response.get("@id")?.as_str()?;
        let uuid = decode_component(trailing_segment(self_id)?);
        draft_id.child(&uuid).ok()
    }
}

/// A resource as last confirmed by the server.
///
/// `data` is the decoded response document, including its `rev` field.
pub struct Entity<K: EntityKind> {
    id: Identifier,
    data: Value,
    path: String,
    kind: PhantomData<fn() -> K>,
}

impl<K: EntityKind> Entity<K> {
    /// Build an entity from a server response.
    pub(crate) fn from_response(id: Identifier, data: Value) -> Self {
        let path = K::resource_path(&id);
        Self {
            id,
            data,
            path,
            kind: PhantomData,
        }
    }

    /// The resource identifier.
    pub fn id(&self) -> &Identifier {
        &self.id
    }

    /// The resolved resource path (`{root}/{id}`).
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The response document.
    pub fn data(&self) -> &Value {
        &self.data
    }

    /// Consume the entity, returning its document.
    pub fn into_data(self) -> Value {
        self.data
    }

    /// Look up a top-level field of the document.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.data.get(field)
    }

    /// The revision carried by the document, if any.
    pub fn revision(&self) -> Option<Revision> {
        Revision::from_body(&self.data)
    }

    /// Whether the store reports the resource as deprecated.
    pub fn is_deprecated(&self) -> bool {
        self.data
            .get("deprecated")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// Build an updated copy of this entity for a subsequent `update`.
    ///
    /// The revision currently held is kept so the write is conditional on it.
    pub fn with_data(&self, mut data: Value) -> Self {
        if let (Some(rev), Some(map)) = (self.revision(), data.as_object_mut()) {
            map.entry("rev").or_insert_with(|| Value::from(rev.value()));
        }
        Self::from_response(self.id.clone(), data)
    }
}

impl<K: EntityKind> Clone for Entity<K> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            data: self.data.clone(),
            path: self.path.clone(),
            kind: PhantomData,
        }
    }
}

impl<K: EntityKind> PartialEq for Entity<K> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.data == other.data
    }
}

impl<K: EntityKind> fmt::Debug for Entity<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entity")
            .field("kind", &K::NAME)
            .field("id", &self.id)
            .field("path", &self.path)
            .field("data", &self.data)
            .finish()
    }
}

/// A resource the caller wants to create.
///
/// For [`Instance`] the draft id is the schema collection id; the server
/// assigns the uuid.
pub struct Draft<K: EntityKind> {
    id: Identifier,
    data: Value,
    kind: PhantomData<fn() -> K>,
}

impl<K: EntityKind> Draft<K> {
    /// Create a draft, checking the identifier shape for this kind.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::SegmentCount` if `id` does not have
    /// [`EntityKind::DRAFT_SEGMENTS`] segments.
    pub fn new(id: Identifier, data: Value) -> Result<Self, TypeError> {
        check_segments(&id, K::DRAFT_SEGMENTS)?;
        Ok(Self {
            id,
            data,
            kind: PhantomData,
        })
    }

    /// The draft identifier.
    pub fn id(&self) -> &Identifier {
        &self.id
    }

    /// The document to send.
    pub fn data(&self) -> &Value {
        &self.data
    }

    /// The path the draft is written to.
    pub fn path(&self) -> String {
        K::resource_path(&self.id)
    }
}

impl<K: EntityKind> fmt::Debug for Draft<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Draft")
            .field("kind", &K::NAME)
            .field("id", &self.id)
            .field("data", &self.data)
            .finish()
    }
}

/// Percent-decode a path or segment, keeping it verbatim if the escapes do
/// not decode to UTF-8.
fn decode_component(raw: &str) -> String {
    urlencoding::decode(raw)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| raw.to_string())
}

/// Decoded path component of an absolute URL or bare path, without query or
/// fragment.
fn link_path(url: &str) -> String {
    match Url::parse(url) {
        Ok(parsed) => decode_component(parsed.path()),
        Err(_) => decode_component(url.split(['?', '#']).next().unwrap_or_default()),
    }
}

/// Recover a resource identifier from a self-link.
///
/// `root` must be a literal prefix of the link's path component; the prefix
/// and the separating `/` are stripped and the remainder parsed as an
/// [`Identifier`]. Absolute URLs and bare paths are both accepted; query
/// strings (such as `?rev=3`) and fragments are ignored. Percent-escapes are
/// decoded, so links built by [`EntityKind::resource_path`] map back to the
/// identifier they came from.
///
/// # Errors
///
/// Returns `LinkError::ForeignLink` if the link is not under `root`, and
/// `LinkError::InvalidIdentifier` if nothing usable remains.
///
/// # Example
///
/// ```
/// use nexus_repo::core::entity::extract_id_from_url;
///
/// let id = extract_id_from_url(
///     "https://store.example.com/v0/schemas/acme/lab/sensor/v1?rev=2",
///     "/v0/schemas",
/// ).unwrap();
/// assert_eq!(id.as_str(), "acme/lab/sensor/v1");
///
/// assert!(extract_id_from_url("/domains/acme/lab", "/schemas").is_err());
/// ```
pub fn extract_id_from_url(url: &str, root: &str) -> Result<Identifier, LinkError> {
    let path = link_path(url);
    let root = decode_component(root.trim_end_matches('/'));

    let remainder = path
        .strip_prefix(root.as_str())
        .and_then(|rest| rest.strip_prefix('/'))
        .ok_or_else(|| LinkError::ForeignLink {
            url: url.to_string(),
            root: root.clone(),
        })?;

    Identifier::parse(remainder.trim_end_matches('/')).map_err(|source| {
        LinkError::InvalidIdentifier {
            url: url.to_string(),
            source,
        }
    })
}

/// Everything after the final `/` of a link's path, if non-empty.
///
/// # Example
///
/// ```
/// use nexus_repo::core::entity::trailing_segment;
///
/// assert_eq!(
///     trailing_segment("https://store.example.com/data/acme/lab/sensor/v1/abc-123"),
///     Some("abc-123"),
/// );
/// assert_eq!(trailing_segment("https://store.example.com/data/"), None);
/// ```
pub fn trailing_segment(url: &str) -> Option<&str> {
    let without_query = url.split(['?', '#']).next().unwrap_or_default();
    match without_query.rsplit('/').next() {
        Some(segment) if !segment.is_empty() => Some(segment),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    mod create_id {
        use super::*;

        #[test]
        fn organization() {
            assert_eq!(Organization::create_id("acme").unwrap().as_str(), "acme");
        }

        #[test]
        fn domain() {
            assert_eq!(
                Domain::create_id("acme", "lab").unwrap().as_str(),
                "acme/lab"
            );
        }

        #[test]
        fn schema() {
            assert_eq!(
                Schema::create_id("acme", "lab", "sensor", "v1")
                    .unwrap()
                    .as_str(),
                "acme/lab/sensor/v1"
            );
        }

        #[test]
        fn instance_collection_and_full() {
            let collection = Instance::create_id("acme", "lab", "sensor", "v1").unwrap();
            assert_eq!(collection.as_str(), "acme/lab/sensor/v1");
            let full = Instance::full_id("acme", "lab", "sensor", "v1", "abc-123").unwrap();
            assert_eq!(full.as_str(), "acme/lab/sensor/v1/abc-123");
        }

        #[test]
        fn rejects_empty_segment() {
            assert!(Domain::create_id("acme", "").is_err());
            assert!(Instance::full_id("acme", "lab", "sensor", "v1", "").is_err());
        }
    }

    mod extraction {
        use super::*;

        #[test]
        fn absolute_url() {
            let id = extract_id_from_url(
                "https://store.example.com/organizations/acme",
                "/organizations",
            )
            .unwrap();
            assert_eq!(id.as_str(), "acme");
        }

        #[test]
        fn bare_path() {
            let id = extract_id_from_url("/data/acme/lab/sensor/v1/abc", "/data").unwrap();
            assert_eq!(id.as_str(), "acme/lab/sensor/v1/abc");
        }

        #[test]
        fn ignores_query_and_trailing_slash() {
            let id = extract_id_from_url("/domains/acme/lab/?rev=4", "/domains").unwrap();
            assert_eq!(id.as_str(), "acme/lab");
        }

        #[test]
        fn root_with_deployment_prefix() {
            let id = extract_id_from_url(
                "https://store.example.com/v0/domains/acme/lab",
                "/v0/domains",
            )
            .unwrap();
            assert_eq!(id.as_str(), "acme/lab");
        }

        #[test]
        fn absolute_url_with_non_ascii_segment() {
            let expected = Organization::create_id("café").unwrap();
            let from_url = extract_id_from_url(
                "https://store.example.com/organizations/café",
                "/organizations",
            )
            .unwrap();
            let from_path = extract_id_from_url("/organizations/café", "/organizations").unwrap();
            assert_eq!(from_url, expected);
            assert_eq!(from_path, expected);
        }

        #[test]
        fn encoded_link_decodes() {
            let id = extract_id_from_url(
                "https://store.example.com/domains/acme/caf%C3%A9%20lab?rev=1",
                "/domains",
            )
            .unwrap();
            assert_eq!(id.as_str(), "acme/café lab");
        }

        #[test]
        fn resource_path_round_trips() {
            let id = Schema::create_id("acme", "my lab", "sensor?", "v#1").unwrap();
            let path = Schema::resource_path(&id);
            assert_eq!(path, "/schemas/acme/my%20lab/sensor%3F/v%231");
            assert_eq!(extract_id_from_url(&path, Schema::PATH).unwrap(), id);
            let url = format!("https://store.example.com{}", path);
            assert_eq!(extract_id_from_url(&url, Schema::PATH).unwrap(), id);
        }

        #[test]
        fn foreign_root_fails() {
            let err = extract_id_from_url("/schemas/acme/lab/s/v1", "/domains").unwrap_err();
            assert!(matches!(err, LinkError::ForeignLink { .. }));
        }

        #[test]
        fn root_must_end_at_segment_boundary() {
            let err = extract_id_from_url("/domainsX/acme", "/domains").unwrap_err();
            assert!(matches!(err, LinkError::ForeignLink { .. }));
        }

        #[test]
        fn bare_root_fails() {
            let err = extract_id_from_url("/organizations/", "/organizations").unwrap_err();
            assert!(matches!(err, LinkError::InvalidIdentifier { .. }));
        }

        #[test]
        fn trailing_segment_cases() {
            assert_eq!(trailing_segment("a/b/c"), Some("c"));
            assert_eq!(trailing_segment("c"), Some("c"));
            assert_eq!(trailing_segment("a/b/c?rev=2"), Some("c"));
            assert_eq!(trailing_segment("a/b/"), None);
        }
    }

    mod entity {
        use super::*;

        #[test]
        fn path_is_built_from_id() {
            let id = Schema::create_id("acme", "lab", "sensor", "v1").unwrap();
            let entity: Entity<Schema> = Entity::from_response(id, json!({"rev": 2}));
            assert_eq!(entity.path(), "/schemas/acme/lab/sensor/v1");
            assert_eq!(entity.revision(), Some(Revision::new(2)));
        }

        #[test]
        fn deprecated_flag() {
            let id = Organization::create_id("acme").unwrap();
            let live: Entity<Organization> =
                Entity::from_response(id.clone(), json!({"rev": 1}));
            let gone: Entity<Organization> =
                Entity::from_response(id, json!({"rev": 2, "deprecated": true}));
            assert!(!live.is_deprecated());
            assert!(gone.is_deprecated());
        }

        #[test]
        fn with_data_keeps_revision() {
            let id = Organization::create_id("acme").unwrap();
            let entity: Entity<Organization> =
                Entity::from_response(id, json!({"rev": 3, "description": "old"}));
            let edited = entity.with_data(json!({"description": "new"}));
            assert_eq!(edited.revision(), Some(Revision::new(3)));
            assert_eq!(edited.get("description"), Some(&json!("new")));
            assert_eq!(edited.id(), entity.id());
        }

        #[test]
        fn debug_names_kind() {
            let id = Domain::create_id("acme", "lab").unwrap();
            let entity: Entity<Domain> = Entity::from_response(id, json!({}));
            assert!(format!("{:?}", entity).contains("domain"));
        }
    }

    mod draft {
        use super::*;

        #[test]
        fn checks_segment_count() {
            let id = Domain::create_id("acme", "lab").unwrap();
            assert!(Draft::<Domain>::new(id.clone(), json!({})).is_ok());
            assert!(Draft::<Schema>::new(id, json!({})).is_err());
        }

        #[test]
        fn instance_draft_uses_collection_id() {
            let collection = Instance::create_id("acme", "lab", "sensor", "v1").unwrap();
            let draft = Draft::<Instance>::new(collection, json!({"x": 1})).unwrap();
            assert_eq!(draft.path(), "/data/acme/lab/sensor/v1");

            let full = Instance::full_id("acme", "lab", "sensor", "v1", "u").unwrap();
            assert!(Draft::<Instance>::new(full, json!({})).is_err());
        }

        #[test]
        fn instance_created_id_from_self_id() {
            let collection = Instance::create_id("acme", "lab", "sensor", "v1").unwrap();
            let response = json!({
                "@id": "https://store.example.com/data/acme/lab/sensor/v1/abc-123",
                "rev": 1
            });
            let id = Instance::created_id(&collection, &response).unwrap();
            assert_eq!(id.as_str(), "acme/lab/sensor/v1/abc-123");
        }

        #[test]
        fn instance_created_id_decodes_uuid() {
            let collection = Instance::create_id("acme", "lab", "sensor", "v1").unwrap();
            let response = json!({
                "@id": "https://store.example.com/data/acme/lab/sensor/v1/r%C3%A9f"
            });
            let id = Instance::created_id(&collection, &response).unwrap();
            assert_eq!(id.last_segment(), "réf");
        }

        #[test]
        fn instance_created_id_missing() {
            let collection = Instance::create_id("acme", "lab", "sensor", "v1").unwrap();
            assert!(Instance::created_id(&collection, &json!({"rev": 1})).is_none());
            assert!(Instance::created_id(&collection, &json!({"@id": "x/"})).is_none());
        }

        #[test]
        fn client_chosen_id_is_kept() {
            let id = Organization::create_id("acme").unwrap();
            assert_eq!(Organization::created_id(&id, &json!({})), Some(id));
        }
    }
}
