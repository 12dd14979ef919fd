//! Integration tests for registry collection and example lookup

use registry_openapi_collector::{DirectoryExampleSource, ProviderCollector};
use registry_openapi_common::{ExampleKind, ExampleSource, ProviderId};
use serde_json::json;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn registry() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();

    write(
        root,
        "10/api.yml",
        "baseUrl: https://ten.example.com\nendpoints:\n  - path: /ten\n    method: GET\n",
    );
    write(
        root,
        "2/api.yaml",
        "baseUrl: https://two.example.com\nname: Two\ndescription: Second subnet\nendpoints:\n  - path: /two\n    method: post\n",
    );
    write(root, "3/api.yml", "baseUrl: https://three.example.com\n");
    write(root, "4/api.yml", "endpoints: [unclosed\n");
    write(root, "docs/api.yml", "endpoints: []\n");
    write(root, "2/notes.txt", "not a provider file");
    temp_dir
}

#[test]
fn test_collect_numeric_directories_only() {
    let temp_dir = registry();
    let collection = ProviderCollector::new(temp_dir.path()).collect().unwrap();

    let mut ids: Vec<ProviderId> = collection.providers.iter().map(|p| p.id).collect();
    ids.sort();
    assert_eq!(ids, vec![ProviderId(2), ProviderId(10)]);

    let two = collection
        .providers
        .iter()
        .find(|p| p.id == ProviderId(2))
        .unwrap();
    assert_eq!(two.base_url, "https://two.example.com");
    assert_eq!(two.name.as_deref(), Some("Two"));
    assert_eq!(two.description.as_deref(), Some("Second subnet"));
    assert_eq!(two.endpoints, vec![json!({"path": "/two", "method": "post"})]);
}

#[test]
fn test_malformed_files_are_skipped() {
    let temp_dir = registry();
    let collection = ProviderCollector::new(temp_dir.path()).collect().unwrap();

    let mut skipped: Vec<String> = collection
        .skipped
        .iter()
        .map(|s| {
            s.path
                .parent()
                .unwrap()
                .file_name()
                .unwrap()
                .to_string_lossy()
                .into_owned()
        })
        .collect();
    skipped.sort();
    assert_eq!(skipped, vec!["3", "4"]);

    let missing = collection
        .skipped
        .iter()
        .find(|s| s.path.ends_with("3/api.yml"))
        .unwrap();
    assert!(missing.reason.contains("endpoints"));
}

#[test]
fn test_example_lookup_naming_conventions() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(root, "22/examples/twitter_user/request.json", r#"{"user": "elonmusk"}"#);
    write(root, "22/examples/twitter-user/response.json", r#"{"followers": 1}"#);
    write(root, "34/examples/detect_image/request.json", r#"{"image": "x"}"#);

    let examples = DirectoryExampleSource::new(root);

    assert_eq!(
        examples.load_example(ProviderId(22), "/twitter/user", ExampleKind::Request),
        Some(json!({"user": "elonmusk"}))
    );
    assert_eq!(
        examples.load_example(ProviderId(22), "/twitter/user", ExampleKind::Response),
        Some(json!({"followers": 1}))
    );
    assert_eq!(
        examples.load_example(ProviderId(34), "/detect-image", ExampleKind::Request),
        Some(json!({"image": "x"}))
    );
    assert_eq!(
        examples.load_example(ProviderId(34), "/detect-image", ExampleKind::Response),
        None
    );
    assert_eq!(
        examples.load_example(ProviderId(99), "/twitter/user", ExampleKind::Request),
        None
    );
}

#[test]
fn test_invalid_example_falls_through_to_next_convention() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(root, "5/examples/ai/search/request.json", "{not json");
    write(root, "5/examples/ai_search/request.json", r#"{"prompt": "hi"}"#);

    let examples = DirectoryExampleSource::new(root);
    assert_eq!(
        examples.load_example(ProviderId(5), "/ai/search", ExampleKind::Request),
        Some(json!({"prompt": "hi"}))
    );
}
