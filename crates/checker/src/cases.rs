//! Test case discovery from curated examples

use registry_openapi_common::{
    EndpointDescriptor, ExampleKind, ExampleSource, ProviderEntry, ProviderId,
};
use serde_json::Value;
use tracing::{debug, warn};

/// One request to send and the reply it should resemble
#[derive(Debug, Clone, PartialEq)]
pub struct TestCase {
    pub provider: ProviderId,
    pub endpoint: EndpointDescriptor,
    pub request: Value,

    /// Curated response, if the endpoint has one
    pub expected_response: Option<Value>,
}

/// Build a test case for every endpoint that has a curated request example
///
/// Providers are visited in numeric order. With `only`, other providers are
/// ignored; an ID with no provider yields nothing. Endpoints that do not parse
/// are skipped with a warning.
pub fn generate_test_cases(
    providers: &[ProviderEntry],
    examples: &dyn ExampleSource,
    only: Option<ProviderId>,
) -> Vec<TestCase> {
    let mut selected: Vec<&ProviderEntry> = providers
        .iter()
        .filter(|provider| only.map_or(true, |id| provider.id == id))
        .collect();
    selected.sort_by_key(|provider| provider.id);

    if let (Some(id), true) = (only, selected.is_empty()) {
        warn!(provider = %id, "Provider not found or has no API definition");
        return Vec::new();
    }

    let mut cases = Vec::new();
    for provider in selected {
        for raw in &provider.endpoints {
            let endpoint: EndpointDescriptor = match serde_json::from_value(raw.clone()) {
                Ok(endpoint) => endpoint,
                Err(e) => {
                    warn!(provider = %provider.id, error = %e, "Skipping malformed endpoint");
                    continue;
                }
            };

            let Some(request) =
                examples.load_example(provider.id, &endpoint.path, ExampleKind::Request)
            else {
                debug!(provider = %provider.id, path = %endpoint.path, "No request example");
                continue;
            };
            let expected_response =
                examples.load_example(provider.id, &endpoint.path, ExampleKind::Response);

            cases.push(TestCase {
                provider: provider.id,
                endpoint,
                request,
                expected_response,
            });
        }
    }

    debug!(count = cases.len(), "Generated test cases");
    cases
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// Request examples for every path except `/silent`; responses only for `/ask`
    struct Curated;

    impl ExampleSource for Curated {
        fn load_example(&self, _: ProviderId, path: &str, kind: ExampleKind) -> Option<Value> {
            match (path, kind) {
                ("/silent", _) => None,
                ("/ask", ExampleKind::Response) => Some(json!({"answer": "42"})),
                (_, ExampleKind::Response) => None,
                (_, ExampleKind::Request) => Some(json!({"path": path})),
            }
        }
    }

    fn provider(id: u32, paths: &[&str]) -> ProviderEntry {
        ProviderEntry {
            id: ProviderId(id),
            base_url: String::new(),
            name: None,
            description: None,
            endpoints: paths
                .iter()
                .map(|path| json!({"path": path, "method": "POST"}))
                .collect(),
        }
    }

    #[test]
    fn test_cases_need_a_request_example() {
        let cases = generate_test_cases(
            &[provider(22, &["/ask", "/silent", "/search"])],
            &Curated,
            None,
        );

        let paths: Vec<&str> = cases.iter().map(|c| c.endpoint.path.as_str()).collect();
        assert_eq!(paths, vec!["/ask", "/search"]);
        assert_eq!(cases[0].request, json!({"path": "/ask"}));
        assert_eq!(cases[0].expected_response, Some(json!({"answer": "42"})));
        assert_eq!(cases[1].expected_response, None);
    }

    #[test]
    fn test_providers_in_numeric_order() {
        let cases = generate_test_cases(
            &[provider(10, &["/a"]), provider(2, &["/b"])],
            &Curated,
            None,
        );
        let ids: Vec<ProviderId> = cases.iter().map(|c| c.provider).collect();
        assert_eq!(ids, vec![ProviderId(2), ProviderId(10)]);
    }

    #[test]
    fn test_only_selects_one_provider() {
        let providers = [provider(2, &["/b"]), provider(10, &["/a"])];

        let cases = generate_test_cases(&providers, &Curated, Some(ProviderId(10)));
        assert_eq!(cases.len(), 1);
        assert_eq!(cases[0].provider, ProviderId(10));

        assert!(generate_test_cases(&providers, &Curated, Some(ProviderId(99))).is_empty());
    }

    #[test]
    fn test_malformed_endpoint_skipped() {
        let mut entry = provider(5, &["/ok"]);
        entry.endpoints.push(json!({"path": "/bad", "method": "TRACE"}));

        let cases = generate_test_cases(&[entry], &Curated, None);
        assert_eq!(cases.len(), 1);
        assert_eq!(cases[0].endpoint.path, "/ok");
    }
}
