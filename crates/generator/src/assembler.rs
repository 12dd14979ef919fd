//! Forward assembly: provider documents to one OpenAPI document

use crate::config::DocsConfig;
use indexmap::IndexMap;
use registry_openapi_common::model::DEFAULT_CONTENT_TYPE;
use registry_openapi_common::openapi::{
    Components, MediaType, Operation, ParameterObject, RequestBody, Response, Tag,
};
use registry_openapi_common::schema::normalize;
use registry_openapi_common::{
    EndpointDescriptor, ExampleKind, ExampleSource, HttpMethod, OpenApiDocument, ParamLocation,
    Parameter, ProviderEntry,
};
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// Builds the aggregated OpenAPI document
///
/// Paths are keyed `/{providerId}{path}` and ordered by ascending numeric
/// provider ID, whatever order the providers arrive in.
pub struct DocumentGenerator {
    config: DocsConfig,
}

impl DocumentGenerator {
    /// Create a generator with the given document header
    pub fn new(config: DocsConfig) -> Self {
        Self { config }
    }

    /// Assemble the document
    ///
    /// Endpoints that fail to parse or validate are skipped with a warning, as
    /// is any later endpoint whose `(path, method)` was already emitted.
    pub fn generate(
        &self,
        providers: &[ProviderEntry],
        examples: &dyn ExampleSource,
    ) -> OpenApiDocument {
        let mut document = OpenApiDocument::new(self.config.info());
        document.servers = self.config.server_list();
        document.components = Some(Components {
            schemas: IndexMap::new(),
            security_schemes: [(
                self.config.security_scheme_name.clone(),
                self.config.security_scheme.clone(),
            )]
            .into_iter()
            .collect(),
        });
        document.security = self.config.security_requirement();

        let mut ordered: Vec<&ProviderEntry> = providers.iter().collect();
        ordered.sort_by_key(|provider| provider.id);

        for provider in ordered {
            self.add_provider(&mut document, provider, examples);
        }

        document
    }

    fn add_provider(
        &self,
        document: &mut OpenApiDocument,
        provider: &ProviderEntry,
        examples: &dyn ExampleSource,
    ) {
        let tag = provider.tag_name();
        if let Some(name) = &tag {
            // Several files under one provider directory share a tag
            match document.tags.iter_mut().find(|existing| &existing.name == name) {
                Some(existing) => {
                    if existing.description.is_none() {
                        existing.description = provider.description.clone();
                    }
                }
                None => document.tags.push(Tag {
                    name: name.clone(),
                    description: provider.description.clone(),
                }),
            }
        }

        for (index, raw) in provider.endpoints.iter().enumerate() {
            let endpoint: EndpointDescriptor = match serde_json::from_value(raw.clone()) {
                Ok(endpoint) => endpoint,
                Err(e) => {
                    warn!(provider = %provider.id, index, error = %e, "Skipping malformed endpoint");
                    continue;
                }
            };
            if let Err(e) = endpoint.validate() {
                warn!(provider = %provider.id, error = %e, "Skipping invalid endpoint");
                continue;
            }

            let full_path = format!("/{}{}", provider.id, endpoint.path);
            let path_item = document.paths.entry(full_path.clone()).or_default();
            let slot = path_item.operation_slot(endpoint.method);
            if slot.is_some() {
                warn!(
                    path = %full_path,
                    method = %endpoint.method,
                    "Skipping duplicate endpoint"
                );
                continue;
            }

            *slot = Some(build_operation(
                provider,
                tag.as_deref(),
                &endpoint,
                &full_path,
                examples,
            ));
            debug!(path = %full_path, method = %endpoint.method, "Added operation");
        }
    }
}

fn build_operation(
    provider: &ProviderEntry,
    tag: Option<&str>,
    endpoint: &EndpointDescriptor,
    full_path: &str,
    examples: &dyn ExampleSource,
) -> Operation {
    let request_example = examples.load_example(provider.id, &endpoint.path, ExampleKind::Request);
    let response_example =
        examples.load_example(provider.id, &endpoint.path, ExampleKind::Response);

    let mut parameters: Vec<ParameterObject> = endpoint
        .query_params
        .iter()
        .map(|param| {
            let mut object = parameter_object(param, ParamLocation::Query);
            if object.example.is_none() && endpoint.method == HttpMethod::Get {
                object.example = request_example
                    .as_ref()
                    .and_then(|example| example.get(&param.name))
                    .cloned();
            }
            object
        })
        .collect();
    parameters.extend(
        endpoint
            .path_params
            .iter()
            .map(|param| parameter_object(param, ParamLocation::Path)),
    );

    let request_body = match (&endpoint.request_schema, endpoint.method) {
        (Some(schema), method) if method != HttpMethod::Get => Some(RequestBody {
            description: None,
            required: true,
            content: [(
                endpoint.content_type().to_string(),
                MediaType {
                    schema: Some(normalized(schema)),
                    example: request_example,
                },
            )]
            .into_iter()
            .collect(),
        }),
        _ => None,
    };

    let mut success = Response {
        description: "Successful response".to_string(),
        content: IndexMap::new(),
    };
    let response_schema = endpoint.response_schema.as_ref().map(normalized);
    if response_example.is_some() || response_schema.is_some() {
        success.content.insert(
            DEFAULT_CONTENT_TYPE.to_string(),
            MediaType {
                schema: response_schema,
                example: response_example,
            },
        );
    }

    Operation {
        tags: tag.map(|name| vec![name.to_string()]).unwrap_or_default(),
        summary: Some(
            endpoint
                .summary
                .clone()
                .unwrap_or_else(|| format!("{} {}", endpoint.method, full_path)),
        ),
        description: endpoint.description.clone(),
        operation_id: None,
        parameters,
        request_body,
        responses: [("200".to_string(), success)].into_iter().collect(),
    }
}

fn normalized(schema: &Value) -> Value {
    let mut schema = schema.clone();
    normalize(&mut schema);
    schema
}

/// Render a parameter with its constraints nested under `schema`
fn parameter_object(param: &Parameter, location: ParamLocation) -> ParameterObject {
    let mut schema = Map::new();
    schema.insert("type".to_string(), Value::from(param.param_type.as_str()));
    if let Some(default) = param.effective_default() {
        schema.insert("default".to_string(), default.clone());
    }
    if !param.enum_values.is_empty() {
        schema.insert("enum".to_string(), Value::Array(param.enum_values.clone()));
    }
    if let Some(minimum) = &param.minimum {
        schema.insert("minimum".to_string(), Value::Number(minimum.clone()));
    }
    if let Some(maximum) = &param.maximum {
        schema.insert("maximum".to_string(), Value::Number(maximum.clone()));
    }
    if let Some(items) = &param.items {
        schema.insert("items".to_string(), items.clone());
    }

    ParameterObject {
        name: param.name.clone(),
        location: location.as_str().to_string(),
        description: param.description.clone(),
        // OpenAPI requires path parameters to be required
        required: location == ParamLocation::Path || param.is_required(location),
        schema: Some(Value::Object(schema)),
        example: param.example.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use registry_openapi_common::{ParamType, ProviderId};
    use serde_json::json;

    struct NoExamples;

    impl ExampleSource for NoExamples {
        fn load_example(&self, _: ProviderId, _: &str, _: ExampleKind) -> Option<Value> {
            None
        }
    }

    fn provider(id: u32, endpoints: Vec<Value>) -> ProviderEntry {
        ProviderEntry {
            id: ProviderId(id),
            base_url: "https://example.com".to_string(),
            name: None,
            description: None,
            endpoints,
        }
    }

    #[test]
    fn test_parameter_object_schema() {
        let mut param = Parameter::new("sort", ParamType::String);
        param.enum_values = vec![json!("Top"), json!("Latest")];
        param.description = Some("Sort order".to_string());

        let object = parameter_object(&param, ParamLocation::Query);
        assert_eq!(object.location, "query");
        assert!(!object.required);
        assert_eq!(
            object.schema,
            Some(json!({"type": "string", "default": "Top", "enum": ["Top", "Latest"]}))
        );
    }

    #[test]
    fn test_path_parameter_always_required() {
        let mut param = Parameter::new("id", ParamType::Integer);
        param.required = Some(false);
        param.minimum = Some(1.into());

        let object = parameter_object(&param, ParamLocation::Path);
        assert!(object.required);
        assert_eq!(object.schema, Some(json!({"type": "integer", "minimum": 1})));
    }

    #[test]
    fn test_get_never_has_request_body() {
        let generator = DocumentGenerator::new(DocsConfig::default());
        let document = generator.generate(
            &[provider(
                3,
                vec![json!({
                    "path": "/items",
                    "method": "GET",
                    "requestSchema": {"type": "object"}
                })],
            )],
            &NoExamples,
        );

        let operation = document.paths.get("/3/items").unwrap().get.as_ref().unwrap();
        assert!(operation.request_body.is_none());
        assert_eq!(operation.summary.as_deref(), Some("GET /3/items"));
        let success = operation.responses.get("200").unwrap();
        assert_eq!(success.description, "Successful response");
        assert!(success.content.is_empty());
    }

    #[test]
    fn test_malformed_and_duplicate_endpoints_skipped() {
        let generator = DocumentGenerator::new(DocsConfig::default());
        let document = generator.generate(
            &[provider(
                5,
                vec![
                    json!({"path": "/a", "method": "POST", "summary": "first"}),
                    json!({"path": "/a", "method": "post", "summary": "second"}),
                    json!({"path": "/b", "method": "TRACE"}),
                    json!({"method": "GET"}),
                    json!({"path": "/c", "method": "GET", "queryParams": [
                        {"name": "q", "type": "string"},
                        {"name": "q", "type": "string"}
                    ]}),
                ],
            )],
            &NoExamples,
        );

        let paths: Vec<&str> = document.paths.keys().map(String::as_str).collect();
        assert_eq!(paths, vec!["/5/a"]);
        let operation = document.paths.get("/5/a").unwrap().post.as_ref().unwrap();
        assert_eq!(operation.summary.as_deref(), Some("first"));
    }

    #[test]
    fn test_tags_deduplicated_by_name() {
        let generator = DocumentGenerator::new(DocsConfig::default());
        let mut first = provider(8, vec![json!({"path": "/a", "method": "GET"})]);
        first.name = Some("Oracle".to_string());
        let mut second = provider(8, vec![json!({"path": "/b", "method": "GET"})]);
        second.name = Some("Oracle".to_string());
        second.description = Some("Price oracle".to_string());
        let mut other = provider(9, vec![json!({"path": "/c", "method": "GET"})]);
        other.description = Some("Ninth".to_string());

        let document = generator.generate(&[first, second, other], &NoExamples);

        assert_eq!(
            document.tags,
            vec![
                Tag {
                    name: "Oracle".to_string(),
                    description: Some("Price oracle".to_string()),
                },
                Tag {
                    name: "Subnet 9".to_string(),
                    description: Some("Ninth".to_string()),
                },
            ]
        );
        let operation = document.paths.get("/8/b").unwrap().get.as_ref().unwrap();
        assert_eq!(operation.tags, vec!["Oracle"]);
    }

    #[test]
    fn test_relative_path_cannot_merge_into_other_provider() {
        let generator = DocumentGenerator::new(DocsConfig::default());
        let document = generator.generate(
            &[
                provider(1, vec![json!({"path": "0/x", "method": "GET", "summary": "one"})]),
                provider(10, vec![json!({"path": "/x", "method": "GET", "summary": "ten"})]),
            ],
            &NoExamples,
        );

        let paths: Vec<&str> = document.paths.keys().map(String::as_str).collect();
        assert_eq!(paths, vec!["/10/x"]);
        let operation = document.paths.get("/10/x").unwrap().get.as_ref().unwrap();
        assert_eq!(operation.summary.as_deref(), Some("ten"));
    }

    #[test]
    fn test_request_body_uses_content_type_header() {
        let generator = DocumentGenerator::new(DocsConfig::default());
        let document = generator.generate(
            &[provider(
                34,
                vec![json!({
                    "path": "/detect-image",
                    "method": "POST",
                    "headers": {"Content-Type": "multipart/form-data"},
                    "requestSchema": {
                        "type": "object",
                        "properties": {"image": {"type": "file"}}
                    }
                })],
            )],
            &NoExamples,
        );

        let operation = document
            .paths
            .get("/34/detect-image")
            .unwrap()
            .post
            .as_ref()
            .unwrap();
        let body = operation.request_body.as_ref().unwrap();
        assert!(body.required);
        let media = body.content.get("multipart/form-data").unwrap();
        assert_eq!(
            media.schema,
            Some(json!({
                "type": "object",
                "properties": {"image": {"type": "string", "format": "binary", "default": ""}}
            }))
        );
    }
}
