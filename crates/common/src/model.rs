//! Provider description model
//!
//! These types mirror the per-subnet `api.yml` format: a provider document
//! holds a base URL and an ordered list of endpoint descriptors.

use crate::{RegistryError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;

/// Placeholder substituted with the caller's API key
pub const API_KEY_PLACEHOLDER: &str = "{{api-key}}";

/// Default content type when an endpoint declares none
pub const DEFAULT_CONTENT_TYPE: &str = "application/json";

/// Example directory name for the provider's root path `/`
pub const ROOT_EXAMPLE_DIR: &str = "root";

/// Numeric provider (subnet) identifier
///
/// Ordering is numeric, so `2` sorts before `10`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProviderId(pub u32);

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ProviderId {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self> {
        if s.is_empty() || !s.chars().all(|c| c.is_ascii_digit()) {
            return Err(RegistryError::Parse(format!(
                "Provider id must be numeric, got '{}'",
                s
            )));
        }
        s.parse::<u32>()
            .map(ProviderId)
            .map_err(|e| RegistryError::Parse(format!("Invalid provider id '{}': {}", s, e)))
    }
}

/// HTTP method of an endpoint, parsed case-insensitively and stored uppercase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE", try_from = "String")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl HttpMethod {
    /// All supported methods, in the order OpenAPI path items list them
    pub const ALL: [HttpMethod; 5] = [
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Patch,
        HttpMethod::Delete,
    ];

    /// Uppercase name, as stored in provider documents
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "DELETE" => Ok(HttpMethod::Delete),
            "PATCH" => Ok(HttpMethod::Patch),
            other => Err(RegistryError::Parse(format!(
                "Unsupported HTTP method: {}",
                other
            ))),
        }
    }
}

impl TryFrom<String> for HttpMethod {
    type Error = RegistryError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

/// Scalar type of a query or path parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    #[default]
    String,
    Integer,
    Number,
    Boolean,
    Array,
}

impl ParamType {
    /// Map a JSON-Schema `type` to a parameter type, falling back to string
    pub fn from_schema_type(schema_type: Option<&str>) -> Self {
        match schema_type {
            Some("integer") => ParamType::Integer,
            Some("number") => ParamType::Number,
            Some("boolean") => ParamType::Boolean,
            Some("array") => ParamType::Array,
            _ => ParamType::String,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ParamType::String => "string",
            ParamType::Integer => "integer",
            ParamType::Number => "number",
            ParamType::Boolean => "boolean",
            ParamType::Array => "array",
        }
    }
}

/// Where a parameter is carried
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamLocation {
    Query,
    Path,
}

impl ParamLocation {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParamLocation::Query => "query",
            ParamLocation::Path => "path",
        }
    }

    /// Whether a parameter here is required when the document does not say
    pub fn required_by_default(&self) -> bool {
        matches!(self, ParamLocation::Path)
    }
}

/// Query or path parameter of an endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,

    #[serde(rename = "type", default)]
    pub param_type: ParamType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Explicit required flag; see [`Parameter::is_required`] for the default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,

    #[serde(rename = "enum", default, skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<Number>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum: Option<Number>,

    /// Element type descriptor, only meaningful for `type: array`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<Value>,
}

impl Parameter {
    /// Create a bare parameter of the given type
    pub fn new(name: impl Into<String>, param_type: ParamType) -> Self {
        Self {
            name: name.into(),
            param_type,
            description: None,
            required: None,
            default: None,
            enum_values: Vec::new(),
            minimum: None,
            maximum: None,
            items: None,
            example: None,
        }
    }

    /// Required flag, defaulting to false for query and true for path parameters
    pub fn is_required(&self, location: ParamLocation) -> bool {
        self.required
            .unwrap_or_else(|| location.required_by_default())
    }

    /// Explicit default, else the first enum value
    pub fn effective_default(&self) -> Option<&Value> {
        self.default.as_ref().or_else(|| self.enum_values.first())
    }
}

/// How API credentials are transmitted to a provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AuthDescriptor {
    /// Credential in a request header
    Header { key: String, value: String },

    /// Credential in a query parameter
    Query { key: String, value: String },

    /// Credential in a cookie
    Cookie { key: String, value: String },

    /// Credential in the JSON request body
    Body { key: String, value: String },

    /// HTTP basic authentication
    Basic { username: String, password: String },
}

impl AuthDescriptor {
    /// `Authorization: {{api-key}}`
    pub fn api_key_header() -> Self {
        Self::header("Authorization", API_KEY_PLACEHOLDER)
    }

    /// `Authorization: Bearer {{api-key}}`
    pub fn bearer() -> Self {
        Self::header("Authorization", format!("Bearer {}", API_KEY_PLACEHOLDER))
    }

    pub fn header(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Header {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn query(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Query {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn cookie(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Cookie {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Basic auth with `{{username}}` / `{{password}}` templates
    pub fn basic() -> Self {
        Self::Basic {
            username: "{{username}}".to_string(),
            password: "{{password}}".to_string(),
        }
    }
}

impl Default for AuthDescriptor {
    fn default() -> Self {
        Self::api_key_header()
    }
}

/// One HTTP operation exposed by a provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointDescriptor {
    /// Provider-relative path used by the registry
    pub path: String,

    /// The provider's real path, possibly with `{param}` placeholders
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub external_path: String,

    pub method: HttpMethod,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<AuthDescriptor>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_schema: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<Value>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub query_params: Vec<Parameter>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub path_params: Vec<Parameter>,
}

impl EndpointDescriptor {
    /// Create an endpoint with no schemas, parameters, or headers
    pub fn new(path: impl Into<String>, method: HttpMethod) -> Self {
        Self {
            path: path.into(),
            external_path: String::new(),
            method,
            summary: None,
            description: None,
            auth: None,
            headers: BTreeMap::new(),
            request_schema: None,
            response_schema: None,
            query_params: Vec::new(),
            path_params: Vec::new(),
        }
    }

    /// Content type from the `Content-Type` header (any case), else JSON
    pub fn content_type(&self) -> &str {
        self.headers
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case("content-type"))
            .map(|(_, value)| value.as_str())
            .unwrap_or(DEFAULT_CONTENT_TYPE)
    }

    /// Check the path is absolute and parameter names are non-empty and
    /// unique within each list
    pub fn validate(&self) -> Result<()> {
        if !self.path.starts_with('/') {
            return Err(RegistryError::Parse(format!(
                "{} '{}': path must start with '/'",
                self.method, self.path
            )));
        }

        for (location, params) in [
            (ParamLocation::Query, &self.query_params),
            (ParamLocation::Path, &self.path_params),
        ] {
            let mut seen = HashSet::new();
            for param in params {
                if param.name.is_empty() {
                    return Err(RegistryError::Parse(format!(
                        "{} {}: {} parameter with empty name",
                        self.method,
                        self.path,
                        location.as_str()
                    )));
                }
                if !seen.insert(param.name.as_str()) {
                    return Err(RegistryError::Parse(format!(
                        "{} {}: duplicate {} parameter '{}'",
                        self.method,
                        self.path,
                        location.as_str(),
                        param.name
                    )));
                }
            }
        }
        Ok(())
    }
}

/// A provider's `api.yml`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderDocument {
    #[serde(default)]
    pub base_url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub endpoints: Vec<EndpointDescriptor>,
}

/// A provider document as loaded from disk, keyed by its provider ID
///
/// Endpoints stay raw until assembly so one malformed entry can be skipped
/// without losing the rest of the provider.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderEntry {
    pub id: ProviderId,
    pub base_url: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub endpoints: Vec<Value>,
}

impl ProviderEntry {
    /// Tag name for this provider's operations, if the document names one
    ///
    /// A description without a name falls back to `Subnet <id>`.
    pub fn tag_name(&self) -> Option<String> {
        match (&self.name, &self.description) {
            (Some(name), _) => Some(name.clone()),
            (None, Some(_)) => Some(format!("Subnet {}", self.id)),
            (None, None) => None,
        }
    }
}

/// Which half of an example pair to load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExampleKind {
    Request,
    Response,
}

impl ExampleKind {
    /// File name of this example inside an endpoint's example directory
    pub fn file_name(&self) -> &'static str {
        match self {
            ExampleKind::Request => "request.json",
            ExampleKind::Response => "response.json",
        }
    }
}

/// Lookup of human-curated example payloads
pub trait ExampleSource {
    /// Load the example for a provider endpoint, if one exists
    fn load_example(
        &self,
        provider: ProviderId,
        endpoint_path: &str,
        kind: ExampleKind,
    ) -> Option<Value>;
}
