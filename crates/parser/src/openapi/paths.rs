//! Internal path derivation

use indexmap::IndexMap;
use registry_openapi_common::{RegistryError, Result};
use regex::Regex;
use std::sync::LazyLock;

static PATH_PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{([^}]+)\}").expect("placeholder pattern is valid")
});

/// Convert an OpenAPI path to the registry's internal form
///
/// Path parameter braces are removed, keeping the parameter name:
/// `/twitter/{id}` becomes `/twitter/id`.
pub fn to_internal_path(path: &str) -> String {
    PATH_PLACEHOLDER.replace_all(path, "$1").into_owned()
}

/// Ordered fragment replacements applied to internal paths
///
/// e.g. `{"desearch/ai/search": "search"}` turns `/desearch/ai/search/links`
/// into `/search/links`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathMap(IndexMap<String, String>);

impl PathMap {
    /// Parse a JSON object of `fragment: replacement` pairs, keeping order
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map(Self)
            .map_err(|e| RegistryError::Parse(format!("Invalid path map JSON: {}", e)))
    }

    /// Replace every mapped fragment present in `path`, in map order
    pub fn apply(&self, path: &str) -> String {
        let mut mapped = path.to_string();
        for (fragment, replacement) in &self.0 {
            if mapped.contains(fragment.as_str()) {
                mapped = mapped.replace(fragment.as_str(), replacement);
            }
        }
        mapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_internal_path() {
        assert_eq!(to_internal_path("/twitter/{id}"), "/twitter/id");
        assert_eq!(
            to_internal_path("/users/{user_id}/posts/{post_id}"),
            "/users/user_id/posts/post_id"
        );
        assert_eq!(to_internal_path("/search"), "/search");
    }

    #[test]
    fn test_path_map_keeps_json_order() {
        let forward = PathMap::from_json(r#"{"a/b": "x", "x/c": "y"}"#).unwrap();
        assert_eq!(forward.apply("/a/b/c"), "/y");

        let reversed = PathMap::from_json(r#"{"x/c": "y", "a/b": "x"}"#).unwrap();
        assert_eq!(reversed.apply("/a/b/c"), "/x/c");
    }

    #[test]
    fn test_path_map_applies_in_order() {
        let map = PathMap::from_json(r#"{"desearch/ai/search": "search", "search/links": "links"}"#)
            .unwrap();
        assert_eq!(map.apply("/desearch/ai/search/links/web"), "/links/web");
        assert_eq!(map.apply("/twitter"), "/twitter");
    }

    #[test]
    fn test_path_map_rejects_invalid_json() {
        assert!(PathMap::from_json("{not json").is_err());
        assert!(PathMap::from_json(r#"{"a": 1}"#).is_err());
    }

    #[test]
    fn test_empty_path_map_is_identity() {
        let map = PathMap::default();
        assert_eq!(map.apply("/x/y"), "/x/y");
    }
}
