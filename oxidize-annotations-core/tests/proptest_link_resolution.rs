//! Property-based tests for custom-protocol link resolution
//!
//! Classification must ignore extension case, unknown extensions must fall
//! back to a generic link, and relative paths must stay under the storage
//! root.

use oxidize_annotations::{
    DefaultLinkResolver, FileTypeTable, LinkResolver, Location, MediaType, ProtocolConfig,
    ResolveContext,
};
use proptest::prelude::*;
use std::path::Path;

fn media_strategy() -> impl Strategy<Value = MediaType> {
    prop_oneof![
        Just(MediaType::Video),
        Just(MediaType::Audio),
        Just(MediaType::Image),
    ]
}

// Extensions mixing upper and lower case
fn extension_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z][a-zA-Z0-9]{1,5}"
}

fn segment_strategy() -> impl Strategy<Value = String> {
    "[a-z0-9_-]{1,12}"
}

proptest! {
    #[test]
    fn test_extension_lookup_ignores_case(
        ext in extension_strategy(),
        media in media_strategy(),
        dir in segment_strategy(),
        stem in segment_strategy(),
    ) {
        let table = FileTypeTable::empty().with(&ext.to_lowercase(), media);
        let context = ResolveContext {
            storage_root: Path::new("/library/doc"),
            file_types: &table,
        };

        let upper = format!("{dir}/{stem}.{}", ext.to_uppercase());
        let lower = format!("{dir}/{stem}.{}", ext.to_lowercase());
        let resolver = DefaultLinkResolver;

        prop_assert_eq!(resolver.resolve(&upper, &context, 0).media, media);
        prop_assert_eq!(resolver.resolve(&lower, &context, 0).media, media);
        prop_assert_eq!(resolver.resolve(&format!("{dir}/{stem}.{ext}"), &context, 0).media, media);
    }

    #[test]
    fn test_unmapped_extension_is_generic_link(
        ext in extension_strategy(),
        stem in segment_strategy(),
    ) {
        let table = FileTypeTable::empty();
        let context = ResolveContext {
            storage_root: Path::new("/library/doc"),
            file_types: &table,
        };

        let resolved = DefaultLinkResolver.resolve(&format!("{stem}.{ext}"), &context, 3);
        prop_assert_eq!(resolved.media, MediaType::Link);
    }

    #[test]
    fn test_relative_paths_stay_under_root(
        segments in prop::collection::vec(segment_strategy(), 1..4),
        query in prop::option::of("[a-z=&]{1,10}"),
    ) {
        prop_assume!(segments.len() == 1 || segments[0] != "localhost");
        let table = FileTypeTable::default();
        let root = Path::new("/library/doc");
        let context = ResolveContext {
            storage_root: root,
            file_types: &table,
        };

        let relative = format!("{}.mp4", segments.join("/"));
        let link = match &query {
            Some(query) => format!("{relative}?{query}"),
            None => relative.clone(),
        };

        let resolved = DefaultLinkResolver.resolve(&link, &context, 0);
        prop_assert_eq!(resolved.media, MediaType::Video);
        prop_assert_eq!(resolved.location, Location::File(root.join(&relative)));
    }

    #[test]
    fn test_protocol_strip_ignores_scheme_case(
        scheme in "[a-z]{2,8}",
        rest in "[a-z0-9/._-]{0,20}",
    ) {
        let protocol = ProtocolConfig::new(&scheme);
        let link = format!("{}://{rest}", scheme.to_uppercase());
        prop_assert_eq!(protocol.strip(&link), Some(rest.as_str()));
    }
}
