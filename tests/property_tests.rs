//! Property-based tests for identifiers and self-link extraction.
//!
//! These tests use proptest to verify invariants hold across
//! randomly generated inputs.

use proptest::prelude::*;

use nexus_repo::core::entity::{
    extract_id_from_url, trailing_segment, Domain, EntityKind, Instance, Organization, Schema,
};
use nexus_repo::core::query::{ListQuery, QueryStyle};
use nexus_repo::core::types::Identifier;

/// Strategy for generating identifier segments, including non-ASCII text.
fn segment() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9éüßøç中文ж][a-zA-Z0-9._:~éüßøç中文ж-]{0,15}"
}

/// Strategy for arbitrary segments: any text without `/`.
fn any_segment() -> impl Strategy<Value = String> {
    "[^/]{1,12}"
}

/// Strategy for generating valid identifiers of 1 to 5 segments.
fn identifier() -> impl Strategy<Value = Identifier> {
    prop::collection::vec(segment(), 1..=5)
        .prop_map(|segments| Identifier::from_segments(segments).unwrap())
}

/// Strategy for collection roots, with and without a deployment prefix.
fn root() -> impl Strategy<Value = String> {
    let kinds = prop_oneof![
        Just(Organization::PATH),
        Just(Domain::PATH),
        Just(Schema::PATH),
        Just(Instance::PATH),
    ];
    let prefixes = prop_oneof![Just(""), Just("/v0"), Just("/api/v1")];
    (prefixes, kinds).prop_map(|(prefix, kind)| format!("{}{}", prefix, kind))
}

proptest! {
    #[test]
    fn create_id_joins_with_single_slash(
        org in segment(),
        domain in segment(),
        schema in segment(),
        version in segment(),
    ) {
        let id = Schema::create_id(&org, &domain, &schema, &version).unwrap();
        let expected = format!("{}/{}/{}/{}", org, domain, schema, version);
        prop_assert_eq!(id.as_str(), expected.as_str());
        prop_assert!(!id.as_str().starts_with('/'));
        prop_assert!(!id.as_str().ends_with('/'));
        prop_assert!(!id.as_str().contains("//"));
        prop_assert_eq!(id.segment_count(), 4);
    }

    #[test]
    fn domain_id_keeps_segment_order(org in segment(), domain in segment()) {
        let id = Domain::create_id(&org, &domain).unwrap();
        let segments: Vec<&str> = id.segments().collect();
        prop_assert_eq!(segments, vec![org.as_str(), domain.as_str()]);
    }

    #[test]
    fn full_instance_id_extends_collection_id(
        org in segment(),
        uuid in segment(),
    ) {
        let collection = Instance::create_id(&org, "lab", "sensor", "v1").unwrap();
        let full = Instance::full_id(&org, "lab", "sensor", "v1", &uuid).unwrap();
        prop_assert_eq!(full.as_str(), format!("{}/{}", collection, uuid));
        prop_assert_eq!(full.last_segment(), uuid.as_str());
    }

    #[test]
    fn extraction_inverts_bare_path(id in identifier(), root in root()) {
        let url = format!("{}/{}", root, id);
        prop_assert_eq!(extract_id_from_url(&url, &root).unwrap(), id);
    }

    #[test]
    fn extraction_inverts_absolute_url(id in identifier(), root in root(), rev in 0u64..1000) {
        let url = format!("https://store.example.com{}/{}?rev={}", root, id, rev);
        prop_assert_eq!(extract_id_from_url(&url, &root).unwrap(), id);
    }

    #[test]
    fn extraction_inverts_resource_path(
        segments in prop::collection::vec(any_segment(), 4),
    ) {
        let id = Identifier::from_segments(&segments).unwrap();
        let path = Schema::resource_path(&id);
        prop_assert_eq!(extract_id_from_url(&path, Schema::PATH).unwrap(), id);
    }

    #[test]
    fn extraction_inverts_resource_url(
        org in segment(),
        domain in segment(),
        prefix in prop_oneof![Just(""), Just("/v0")],
    ) {
        let id = Domain::create_id(&org, &domain).unwrap();
        let url = format!("https://store.example.com{}{}", prefix, Domain::resource_path(&id));
        let root = format!("{}{}", prefix, Domain::PATH);
        prop_assert_eq!(extract_id_from_url(&url, &root).unwrap(), id);
    }

    #[test]
    fn trailing_segment_is_last_segment(id in identifier()) {
        let url = format!("https://store.example.com/data/{}", id);
        prop_assert_eq!(trailing_segment(&url), Some(id.last_segment()));
    }

    #[test]
    fn placeholder_query_always_has_every_key(
        text in proptest::option::of("[ -~]{0,20}"),
        size in proptest::option::of(0u64..500),
        deprecated in any::<bool>(),
    ) {
        let mut query = ListQuery::new().deprecated(deprecated);
        query.full_text = text;
        query.size = size;

        let rendered = query.query_string(QueryStyle::Placeholders);
        let keys: Vec<&str> = rendered
            .split('&')
            .map(|pair| pair.split('=').next().unwrap())
            .collect();
        prop_assert_eq!(keys, vec!["q", "filter", "from", "size", "deprecated"]);
    }
}
