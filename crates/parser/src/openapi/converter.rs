//! Converts an OpenAPI document to a registry provider description

use super::auth::infer_auth;
use super::paths::{to_internal_path, PathMap};
use registry_openapi_common::model::{DEFAULT_CONTENT_TYPE, ROOT_EXAMPLE_DIR};
use registry_openapi_common::openapi::{
    MediaType, Operation, ParameterObject, PathItem, Response,
};
use indexmap::IndexMap;
use registry_openapi_common::schema::{clean, normalize, resolve, ExampleSynthesizer};
use registry_openapi_common::{
    AuthDescriptor, EndpointDescriptor, HttpMethod, OpenApiDocument, ParamType, Parameter,
    ProviderDocument,
};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use tracing::debug;

/// Result of importing an OpenAPI document
#[derive(Debug, Clone, PartialEq)]
pub struct ImportedProvider {
    /// The provider's `api.yml` contents
    pub document: ProviderDocument,

    /// One request/response example pair per endpoint, in endpoint order
    pub fixtures: Vec<EndpointFixture>,
}

/// Synthesized example payloads for one endpoint
#[derive(Debug, Clone, PartialEq)]
pub struct EndpointFixture {
    /// Example directory name, relative to the provider's `examples/`
    pub directory: String,
    pub request: Value,
    pub response: Value,
}

/// Convert an OpenAPI document into a provider document plus example fixtures
///
/// Auth is inferred once for the whole document and each endpoint receives
/// its own copy.
pub fn convert_openapi_to_provider(
    document: &OpenApiDocument,
    path_map: &PathMap,
    synthesizer: &ExampleSynthesizer,
) -> ImportedProvider {
    let auth = document
        .security_schemes()
        .map(infer_auth)
        .unwrap_or_default();

    let mut endpoints = Vec::new();
    let mut fixtures = Vec::new();

    for (external_path, path_item) in document.paths.iter() {
        let internal_path = path_map.apply(&to_internal_path(external_path));

        for (method, operation) in path_item.operations() {
            let mut endpoint = convert_operation(
                document,
                &internal_path,
                external_path,
                method,
                path_item,
                operation,
                &auth,
            );
            debug!(
                path = %endpoint.path,
                method = %endpoint.method,
                "Imported endpoint"
            );

            fixtures.push(build_fixture(&endpoint, synthesizer));
            inject_defaults(&mut endpoint);
            endpoints.push(endpoint);
        }
    }

    ImportedProvider {
        document: ProviderDocument {
            base_url: document.base_url().to_string(),
            name: None,
            description: None,
            endpoints,
        },
        fixtures,
    }
}

fn convert_operation(
    document: &OpenApiDocument,
    internal_path: &str,
    external_path: &str,
    method: HttpMethod,
    path_item: &PathItem,
    operation: &Operation,
    auth: &AuthDescriptor,
) -> EndpointDescriptor {
    let mut endpoint = EndpointDescriptor::new(internal_path, method);
    endpoint.external_path = external_path.to_string();
    endpoint.summary = operation.summary.clone();
    endpoint.description = operation.description.clone();
    endpoint.auth = Some(auth.clone());

    let mut content_type = DEFAULT_CONTENT_TYPE.to_string();
    if method != HttpMethod::Get {
        if let Some((media_type, media)) = operation
            .request_body
            .as_ref()
            .and_then(|body| pick_media_type(&body.content))
        {
            content_type = media_type.to_string();
            endpoint.request_schema = media
                .schema
                .as_ref()
                .map(|schema| resolved_schema(Some(schema), document));
        }
    }
    endpoint.headers = BTreeMap::from([("Content-Type".to_string(), content_type)]);

    endpoint.response_schema = success_schema(&operation.responses)
        .map(|schema| resolved_schema(Some(schema), document));

    for param in merged_parameters(path_item, operation) {
        match param.location.as_str() {
            "query" if method == HttpMethod::Get => {
                let mut converted = convert_parameter(param, document);
                converted.required = Some(param.required);
                endpoint.query_params.push(converted);
            }
            "path" => {
                let mut converted = convert_parameter(param, document);
                if !param.required {
                    converted.required = Some(false);
                }
                endpoint.path_params.push(converted);
            }
            _ => {}
        }
    }

    endpoint
}

/// Resolve references and clean the copy; defaults come after fixtures
fn resolved_schema(schema: Option<&Value>, document: &OpenApiDocument) -> Value {
    let mut resolved = resolve(schema, document);
    clean(&mut resolved);
    resolved
}

/// Zero-value defaults for the stored schemas
fn inject_defaults(endpoint: &mut EndpointDescriptor) {
    for schema in [&mut endpoint.request_schema, &mut endpoint.response_schema]
        .into_iter()
        .flatten()
    {
        normalize(schema);
    }
}

/// `application/json` if offered, else the first declared content type
fn pick_media_type(content: &IndexMap<String, MediaType>) -> Option<(&str, &MediaType)> {
    content
        .get(DEFAULT_CONTENT_TYPE)
        .map(|media| (DEFAULT_CONTENT_TYPE, media))
        .or_else(|| content.first().map(|(name, media)| (name.as_str(), media)))
}

/// JSON schema of the first 2xx response that has one
fn success_schema(responses: &IndexMap<String, Response>) -> Option<&Value> {
    responses
        .iter()
        .filter(|(status, _)| status.starts_with('2'))
        .find_map(|(_, response)| response.content.get(DEFAULT_CONTENT_TYPE))
        .and_then(|media| media.schema.as_ref())
}

/// Path-level parameters overlaid by operation-level ones on `(name, in)`
fn merged_parameters<'a>(
    path_item: &'a PathItem,
    operation: &'a Operation,
) -> Vec<&'a ParameterObject> {
    let mut merged: Vec<&ParameterObject> = path_item
        .parameters
        .iter()
        .filter(|shared| {
            !operation
                .parameters
                .iter()
                .any(|own| own.name == shared.name && own.location == shared.location)
        })
        .collect();
    merged.extend(operation.parameters.iter());
    merged
}

fn convert_parameter(param: &ParameterObject, document: &OpenApiDocument) -> Parameter {
    let schema = resolve(param.schema.as_ref(), document);
    let field = |key: &str| schema.get(key).cloned();

    let mut converted = Parameter::new(
        param.name.clone(),
        ParamType::from_schema_type(schema.get("type").and_then(Value::as_str)),
    );
    converted.description = param.description.clone();
    converted.default = field("default");
    converted.enum_values = schema
        .get("enum")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    converted.minimum = schema.get("minimum").and_then(number);
    converted.maximum = schema.get("maximum").and_then(number);
    if converted.param_type == ParamType::Array {
        converted.items = field("items");
    }
    converted.example = param.example.clone().or_else(|| field("example"));
    converted
}

fn number(value: &Value) -> Option<serde_json::Number> {
    match value {
        Value::Number(n) => Some(n.clone()),
        _ => None,
    }
}

/// Example directory for an internal path: `/ai/search` becomes `ai-search`
fn fixture_directory(path: &str) -> String {
    let trimmed = path.trim_start_matches('/');
    if trimmed.is_empty() {
        ROOT_EXAMPLE_DIR.to_string()
    } else {
        trimmed.replace('/', "-")
    }
}

fn build_fixture(
    endpoint: &EndpointDescriptor,
    synthesizer: &ExampleSynthesizer,
) -> EndpointFixture {
    let request = if endpoint.method == HttpMethod::Get {
        synthesizer.synthesize_query(&endpoint.query_params)
    } else {
        match &endpoint.request_schema {
            Some(schema) => synthesizer.synthesize(schema, None),
            None => json!({}),
        }
    };

    let response = match &endpoint.response_schema {
        Some(schema) => synthesizer.synthesize(schema, None),
        None => json!({"success": true}),
    };

    EndpointFixture {
        directory: fixture_directory(&endpoint.path),
        request,
        response,
    }
}
