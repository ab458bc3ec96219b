//! repository::generic
//!
//! The CRUD and search protocol shared by every entity kind.
//!
//! # Protocol
//!
//! | Operation       | Requests                                                   |
//! |-----------------|------------------------------------------------------------|
//! | `create`        | `PUT {path}` (or `POST {collection}` for server-assigned ids) |
//! | `update`        | [`GET {path}`] `PUT {path}?rev=N`, `GET {path}?rev=M`      |
//! | `delete`        | [`GET {path}`] `DELETE {path}?rev=N`, `GET {path}?rev=M`   |
//! | `list`          | `GET {root}{subpath}/?{query}`                             |
//! | `resolve`       | `GET {path}` for the id found in the self-link             |
//!
//! Bracketed reads happen only when no revision is known. `M` is the
//! revision in the write response; the confirmatory read at `M` is what the
//! caller gets back.
//!
//! There is no atomicity across round-trips. If another writer changes the
//! resource between the revision lookup and the write, the store rejects the
//! write and the rejection is returned unchanged.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use super::error::RepositoryError;
use crate::core::entity::{extract_id_from_url, Draft, Entity, EntityKind};
use crate::core::query::{ListQuery, QueryStyle};
use crate::core::search::{SearchResult, SearchResultList};
use crate::core::types::{Identifier, Revision};
use crate::transport::Transport;

/// Repository over one resource collection.
///
/// Cheap to clone; clones share the transport.
pub struct Repository<K: EntityKind> {
    transport: Arc<dyn Transport>,
    query_style: QueryStyle,
    kind: PhantomData<fn() -> K>,
}

impl<K: EntityKind> Repository<K> {
    /// Create a repository backed by `transport`.
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            query_style: QueryStyle::default(),
            kind: PhantomData,
        }
    }

    /// Use `style` when rendering listing queries.
    pub fn with_query_style(mut self, style: QueryStyle) -> Self {
        self.query_style = style;
        self
    }

    /// The listing query style in use.
    pub fn query_style(&self) -> QueryStyle {
        self.query_style
    }

    /// The transport this repository talks through.
    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    /// Root that self-links of this collection start with.
    pub fn link_root(&self) -> String {
        format!("{}{}", self.transport.base_path(), K::PATH)
    }

    /// Create a new resource from a draft.
    ///
    /// Kinds with client-chosen ids are PUT at the draft's path. Kinds with
    /// server-assigned ids are POSTed to the collection and the full id is
    /// rebuilt from the response's `@id`.
    ///
    /// Returns `Ok(None)` if the store reports the target as not found.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::MalformedResponse` if a server-assigned id
    /// cannot be read from the response.
    pub async fn create(&self, draft: &Draft<K>) -> Result<Option<Entity<K>>, RepositoryError> {
        let path = draft.path();
        debug!(kind = K::NAME, id = %draft.id(), "creating");

        if !K::SERVER_ASSIGNED_ID {
            let response = self.transport.put(&path, draft.data()).await?;
            return Ok(response.map(|data| Entity::from_response(draft.id().clone(), data)));
        }

        let response = self.transport.post(&path, draft.data()).await?;
        let id = K::created_id(draft.id(), &response).ok_or_else(|| {
            warn!(kind = K::NAME, path = %path, "creation response has no usable @id");
            RepositoryError::MalformedResponse(format!(
                "{} created under '{}' without an '@id'",
                K::NAME,
                draft.id()
            ))
        })?;
        debug!(kind = K::NAME, id = %id, "server assigned id");
        Ok(Some(Entity::from_response(id, response)))
    }

    /// GET a resource document, optionally at a given revision.
    pub async fn fetch(
        &self,
        id: &Identifier,
        revision: Option<Revision>,
    ) -> Result<Option<Value>, RepositoryError> {
        let path = match revision {
            Some(rev) => format!("{}?rev={}", K::resource_path(id), rev),
            None => K::resource_path(id),
        };
        Ok(self.transport.get(&path).await?)
    }

    /// Read a typed entity by its full identifier.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::InvalidIdentifier` if `id` does not have
    /// the segment count of this kind.
    pub async fn read_entity(
        &self,
        id: &Identifier,
        revision: Option<Revision>,
    ) -> Result<Option<Entity<K>>, RepositoryError> {
        K::check_id(id)?;
        let data = self.fetch(id, revision).await?;
        Ok(data.map(|data| Entity::from_response(id.clone(), data)))
    }

    /// Latest revision of a resource.
    ///
    /// Missing resources and documents without `rev` report
    /// [`Revision::INITIAL`].
    pub async fn last_revision(&self, id: &Identifier) -> Result<Revision, RepositoryError> {
        let revision = match self.fetch(id, None).await? {
            Some(body) => Revision::from_body(&body).unwrap_or_else(|| {
                warn!(kind = K::NAME, id = %id, "document has no revision");
                Revision::INITIAL
            }),
            None => Revision::INITIAL,
        };
        debug!(kind = K::NAME, id = %id, rev = %revision, "resolved last revision");
        Ok(revision)
    }

    /// Replace a resource's document.
    ///
    /// The write is conditional on the entity's revision, looked up with a
    /// fresh read when the entity carries none. Returns the entity re-read at
    /// the revision the write produced, or `Ok(None)` if the store reports
    /// the resource as not found.
    pub async fn update(&self, entity: &Entity<K>) -> Result<Option<Entity<K>>, RepositoryError> {
        let revision = match entity.revision() {
            Some(rev) => rev,
            None => self.last_revision(entity.id()).await?,
        };

        let path = format!("{}?rev={}", entity.path(), revision);
        debug!(kind = K::NAME, id = %entity.id(), rev = %revision, "updating");
        let response = self.transport.put(&path, entity.data()).await?;
        self.confirm(entity.id(), response).await
    }

    /// Deprecate a resource.
    ///
    /// Without an explicit `revision` the latest one is looked up first; a
    /// concurrent write in between makes the store reject the delete.
    /// Deprecation creates a new revision, and the entity re-read at that
    /// revision is returned.
    pub async fn delete(
        &self,
        entity: &Entity<K>,
        revision: Option<Revision>,
    ) -> Result<Option<Entity<K>>, RepositoryError> {
        let revision = match revision {
            Some(rev) => rev,
            None => self.last_revision(entity.id()).await?,
        };

        let path = format!("{}?rev={}", entity.path(), revision);
        debug!(kind = K::NAME, id = %entity.id(), rev = %revision, "deprecating");
        let response = self.transport.delete(&path).await?;
        self.confirm(entity.id(), response).await
    }

    /// List the collection.
    ///
    /// Returns `Ok(None)` if the store reports the collection (or subpath)
    /// as not found.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::MalformedResponse` if the body lacks
    /// `total` or `results`.
    pub async fn list(
        &self,
        query: &ListQuery,
    ) -> Result<Option<SearchResultList>, RepositoryError> {
        let path = query.path(K::PATH, self.query_style);
        debug!(kind = K::NAME, path = %path, "listing");

        match self.transport.get(&path).await? {
            Some(body) => SearchResultList::from_body(body).map(Some).map_err(|e| {
                warn!(kind = K::NAME, error = %e, "unexpected listing shape");
                RepositoryError::MalformedResponse(e.to_string())
            }),
            None => Ok(None),
        }
    }

    /// Read the entity a search hit points at.
    ///
    /// Returns `Ok(None)` if it no longer exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Link` if the self-link is not under this
    /// collection, and `RepositoryError::InvalidIdentifier` if it names a
    /// resource of the wrong depth.
    pub async fn resolve(
        &self,
        result: &SearchResult,
    ) -> Result<Option<Entity<K>>, RepositoryError> {
        let id = extract_id_from_url(result.self_link(), &self.link_root())?;
        self.read_entity(&id, None).await
    }

    /// Resolve every hit in order.
    ///
    /// Hits whose resource no longer exists become `None` at the same
    /// position.
    pub async fn resolve_all(
        &self,
        list: &SearchResultList,
    ) -> Result<Vec<Option<Entity<K>>>, RepositoryError> {
        let mut entities = Vec::with_capacity(list.len());
        for result in list {
            entities.push(self.resolve(result).await?);
        }
        Ok(entities)
    }

    /// Re-read a resource at the revision reported by a write response.
    pub(crate) async fn confirm(
        &self,
        id: &Identifier,
        response: Option<Value>,
    ) -> Result<Option<Entity<K>>, RepositoryError> {
        let Some(body) = response else {
            return Ok(None);
        };

        let revision = Revision::from_body(&body).ok_or_else(|| {
            warn!(kind = K::NAME, id = %id, "write response has no revision");
            RepositoryError::MalformedResponse(format!(
                "write to {} '{}' returned no 'rev'",
                K::NAME,
                id
            ))
        })?;

        self.read_entity(id, Some(revision)).await
    }
}

impl<K: EntityKind> Clone for Repository<K> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            query_style: self.query_style,
            kind: PhantomData,
        }
    }
}

impl<K: EntityKind> fmt::Debug for Repository<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Repository")
            .field("kind", &K::NAME)
            .field("transport", &self.transport.name())
            .field("query_style", &self.query_style)
            .finish()
    }
}
