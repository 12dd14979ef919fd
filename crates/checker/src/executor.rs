//! Sending test cases through the aggregated API

use crate::cases::TestCase;
use crate::validator::validate_response;
use crate::{CheckError, Result};
use chrono::{DateTime, Utc};
use registry_openapi_common::{HttpMethod, ProviderId};
use reqwest::blocking::Client;
use reqwest::Method;
use serde_json::Value;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Per-request timeout when none is configured
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Attempts per test case when none is configured
pub const DEFAULT_RETRY_COUNT: u32 = 3;

/// Where and how to send checks
#[derive(Debug, Clone, PartialEq)]
pub struct CheckConfig {
    /// Aggregated API root; requests go to `<base_url>/<id><path>`
    pub base_url: String,

    /// Sent as `Authorization: Bearer <token>`
    pub api_token: String,

    pub timeout_ms: u64,

    /// Attempts per case; only 5xx replies are retried
    pub retry_count: u32,

    pub retry_delay: Duration,
}

impl CheckConfig {
    pub fn new(base_url: impl Into<String>, api_token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_token: api_token.into(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            retry_count: DEFAULT_RETRY_COUNT,
            retry_delay: Duration::from_secs(1),
        }
    }

    fn url_for(&self, provider: ProviderId, path: &str) -> String {
        format!("{}/{}{}", self.base_url.trim_end_matches('/'), provider, path)
    }
}

/// A request ready to send
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub bearer_token: String,

    /// Query string pairs, for GET
    pub query: Vec<(String, String)>,

    /// JSON body, for everything but GET
    pub body: Option<Value>,
}

/// A reply of any status
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,

    /// Parsed JSON, the raw text as a string when it is not JSON, or null
    /// when empty
    pub body: Value,
}

/// Sends one request; only transport failures are errors, any status is a
/// response
pub trait Transport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse>;
}

/// Blocking reqwest client
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(config: &CheckConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .user_agent(concat!("registry-openapi/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| CheckError::Client(e.to_string()))?;
        Ok(Self { client })
    }
}

impl Transport for ReqwestTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse> {
        let method = Method::from_bytes(request.method.as_str().as_bytes())
            .map_err(|e| CheckError::Transport(e.to_string()))?;

        let mut builder = self
            .client
            .request(method, &request.url)
            .bearer_auth(&request.bearer_token);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .map_err(|e| CheckError::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        let text = response
            .text()
            .map_err(|e| CheckError::Transport(e.to_string()))?;

        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(Value::String(text))
        };
        Ok(HttpResponse { status, body })
    }
}

/// How a single check ended
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Passed,
    Failed(String),

    /// Not sent, e.g. multipart uploads
    Skipped(String),
}

/// Result of running one test case
#[derive(Debug, Clone, PartialEq)]
pub struct TestResult {
    pub provider: ProviderId,
    pub method: HttpMethod,
    pub path: String,
    pub outcome: Outcome,
    pub status: Option<u16>,
    pub response: Option<Value>,
    pub elapsed: Duration,
    pub timestamp: DateTime<Utc>,
}

impl TestResult {
    pub fn passed(&self) -> bool {
        self.outcome == Outcome::Passed
    }

    pub fn failed(&self) -> bool {
        matches!(self.outcome, Outcome::Failed(_))
    }
}

/// Runs test cases one after another through a [`Transport`]
pub struct TestRunner<T: Transport> {
    transport: T,
    config: CheckConfig,
}

impl<T: Transport> TestRunner<T> {
    pub fn new(transport: T, config: CheckConfig) -> Self {
        Self { transport, config }
    }

    pub fn run(&self, cases: &[TestCase]) -> Vec<TestResult> {
        info!(count = cases.len(), "Running checks");
        cases.iter().map(|case| self.run_case(case)).collect()
    }

    /// Send one case, retrying 5xx replies, and validate the final reply
    pub fn run_case(&self, case: &TestCase) -> TestResult {
        let started = Instant::now();
        let mut result = TestResult {
            provider: case.provider,
            method: case.endpoint.method,
            path: case.endpoint.path.clone(),
            outcome: Outcome::Passed,
            status: None,
            response: None,
            elapsed: Duration::ZERO,
            timestamp: Utc::now(),
        };

        if case.request.get("formData").is_some() {
            warn!(provider = %case.provider, path = %case.endpoint.path, "Skipping multipart check");
            result.outcome = Outcome::Skipped("multipart uploads are not sent".to_string());
            return result;
        }

        let request = self.prepare(case);
        let attempts = self.config.retry_count.max(1);
        let mut outcome = None;

        for attempt in 1..=attempts {
            let response = match self.transport.send(&request) {
                Ok(response) => response,
                Err(e) => {
                    outcome = Some(Outcome::Failed(e.to_string()));
                    break;
                }
            };
            result.status = Some(response.status);

            if response.status >= 500 && attempt < attempts {
                debug!(
                    provider = %case.provider,
                    path = %case.endpoint.path,
                    status = response.status,
                    attempt,
                    "Retrying after server error"
                );
                thread::sleep(self.config.retry_delay);
                continue;
            }

            if !(200..300).contains(&response.status) {
                outcome = Some(Outcome::Failed(error_message(&response)));
                result.response = Some(response.body);
                break;
            }

            let validation = validate_response(&response.body, case.expected_response.as_ref());
            outcome = Some(if validation.is_valid() {
                Outcome::Passed
            } else {
                Outcome::Failed(validation.errors.join(", "))
            });
            result.response = Some(response.body);
            break;
        }

        result.outcome = outcome.unwrap_or_else(|| Outcome::Failed("no attempt made".to_string()));
        result.elapsed = started.elapsed();
        result
    }

    fn prepare(&self, case: &TestCase) -> HttpRequest {
        let (query, body) = if case.endpoint.method == HttpMethod::Get {
            (query_pairs(&case.request), None)
        } else {
            (Vec::new(), Some(case.request.clone()))
        };

        HttpRequest {
            method: case.endpoint.method,
            url: self.config.url_for(case.provider, &case.endpoint.path),
            bearer_token: self.config.api_token.clone(),
            query,
            body,
        }
    }
}

/// Flatten a request example into query pairs; arrays repeat their key
fn query_pairs(request: &Value) -> Vec<(String, String)> {
    let Value::Object(fields) = request else {
        return Vec::new();
    };

    let mut pairs = Vec::new();
    for (key, value) in fields {
        match value {
            Value::Array(items) => {
                pairs.extend(items.iter().map(|item| (key.clone(), query_value(item))))
            }
            other => pairs.push((key.clone(), query_value(other))),
        }
    }
    pairs
}

fn query_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// `error`, then `message` from the body, else the bare status
fn error_message(response: &HttpResponse) -> String {
    ["error", "message"]
        .iter()
        .find_map(|key| response.body.get(key))
        .map(query_value)
        .unwrap_or_else(|| format!("HTTP {}", response.status))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_url_joins_provider_and_path() {
        let config = CheckConfig::new("https://api.example.com/", "t");
        assert_eq!(
            config.url_for(ProviderId(34), "/detect-image"),
            "https://api.example.com/34/detect-image"
        );
    }

    #[test]
    fn test_query_pairs() {
        let pairs = query_pairs(&json!({
            "query": "bittensor",
            "count": 10,
            "urls": ["https://a", "https://b"],
            "verbose": true
        }));
        assert_eq!(
            pairs,
            vec![
                ("query".to_string(), "bittensor".to_string()),
                ("count".to_string(), "10".to_string()),
                ("urls".to_string(), "https://a".to_string()),
                ("urls".to_string(), "https://b".to_string()),
                ("verbose".to_string(), "true".to_string()),
            ]
        );
        assert!(query_pairs(&json!("not an object")).is_empty());
    }

    #[test]
    fn test_error_message_precedence() {
        let response = |body: Value| HttpResponse { status: 422, body };
        assert_eq!(
            error_message(&response(json!({"error": "bad prompt", "message": "m"}))),
            "bad prompt"
        );
        assert_eq!(error_message(&response(json!({"message": "m"}))), "m");
        assert_eq!(error_message(&response(Value::Null)), "HTTP 422");
    }
}
