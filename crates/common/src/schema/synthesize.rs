//! Example payload synthesis from schema shape

use super::schema_type;
use crate::model::{ParamLocation, ParamType, Parameter};
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{json, Map, Value};

/// Optional object properties worth showing in generated examples
pub const COMMON_PROPERTIES: [&str; 8] = [
    "prompt", "query", "tools", "model", "post_id", "user", "id", "count",
];

/// Example value for a well-known parameter name of the given type
pub fn parameter_hint(name: &str, param_type: ParamType) -> Option<Value> {
    let hint = match (param_type, name) {
        (ParamType::String, "post_id") => json!("1234567890"),
        (ParamType::String, "user") => json!("elonmusk"),
        (ParamType::Integer | ParamType::Number, "count") => json!(10),
        (ParamType::Array, "urls") => {
            json!(["https://x.com/RacingTriple/status/1892527552029499853"])
        }
        _ => return None,
    };
    Some(hint)
}

/// Optional query parameters included in generated requests anyway, with the
/// value used when the parameter carries no example, default, or enum
pub fn featured_parameter(name: &str) -> Option<Value> {
    match name {
        "count" => Some(json!(10)),
        "query" => Some(json!("latest news on AI")),
        _ => None,
    }
}

/// Builds representative example values
///
/// Holds the clock used for `date-time` and `date` strings.
#[derive(Debug, Clone)]
pub struct ExampleSynthesizer {
    now: DateTime<Utc>,
}

impl Default for ExampleSynthesizer {
    fn default() -> Self {
        Self::new()
    }
}

impl ExampleSynthesizer {
    /// Synthesizer using the current time
    pub fn new() -> Self {
        Self::at(Utc::now())
    }

    /// Synthesizer with a fixed clock
    pub fn at(now: DateTime<Utc>) -> Self {
        Self { now }
    }

    /// Example value for `schema`
    ///
    /// Precedence: `external`, then `schema.example`, then `schema.default`,
    /// then a value derived from the schema's type.
    pub fn synthesize(&self, schema: &Value, external: Option<&Value>) -> Value {
        match external {
            Some(example) => example.clone(),
            None => self.from_schema(schema),
        }
    }

    fn from_schema(&self, schema: &Value) -> Value {
        let Value::Object(map) = schema else {
            return Value::Null;
        };
        if map.is_empty() {
            return Value::Object(Map::new());
        }
        if let Some(example) = map.get("example") {
            return example.clone();
        }
        if let Some(default) = map.get("default") {
            return default.clone();
        }

        match schema_type(map) {
            Some("object") => self.object(map),
            Some("array") => self.array(map),
            Some("string") => self.string(map),
            Some("integer" | "number") => first_enum(map).unwrap_or_else(|| json!(0)),
            Some("boolean") => Value::Bool(false),
            _ => Value::Null,
        }
    }

    fn object(&self, map: &Map<String, Value>) -> Value {
        let mut result = Map::new();
        let Some(Value::Object(properties)) = map.get("properties") else {
            return Value::Object(result);
        };

        let required: Vec<&str> = map
            .get("required")
            .and_then(Value::as_array)
            .map(|names| names.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default();

        for (name, property) in properties {
            let include = property.get("example").is_some()
                || required.contains(&name.as_str())
                || COMMON_PROPERTIES.contains(&name.as_str());
            if include {
                result.insert(name.clone(), self.from_schema(property));
            }
        }
        Value::Object(result)
    }

    fn array(&self, map: &Map<String, Value>) -> Value {
        match map.get("items") {
            Some(items) => {
                let element = items
                    .get("example")
                    .cloned()
                    .unwrap_or_else(|| self.from_schema(items));
                Value::Array(vec![element])
            }
            None => Value::Array(Vec::new()),
        }
    }

    fn string(&self, map: &Map<String, Value>) -> Value {
        if let Some(first) = first_enum(map) {
            return first;
        }
        match map.get("format").and_then(Value::as_str) {
            Some("date-time") => json!(self.now.to_rfc3339_opts(SecondsFormat::Secs, true)),
            Some("date") => json!(self.now.date_naive().format("%Y-%m-%d").to_string()),
            Some("email") => json!("user@example.com"),
            Some("uri") => json!("https://example.com"),
            _ => json!("example"),
        }
    }

    /// Example query object for a GET request
    ///
    /// Required parameters always appear; optional ones only when listed by
    /// [`featured_parameter`].
    pub fn synthesize_query(&self, params: &[Parameter]) -> Value {
        let mut example = Map::new();
        for param in params {
            let declared = param
                .example
                .clone()
                .or_else(|| param.default.clone())
                .or_else(|| param.enum_values.first().cloned());

            let value = if param.is_required(ParamLocation::Query) {
                declared.unwrap_or_else(|| placeholder_for(param))
            } else if let Some(featured) = featured_parameter(&param.name) {
                declared.unwrap_or(featured)
            } else {
                continue;
            };
            example.insert(param.name.clone(), value);
        }
        Value::Object(example)
    }
}

fn first_enum(map: &Map<String, Value>) -> Option<Value> {
    map.get("enum")
        .and_then(Value::as_array)
        .and_then(|values| values.first())
        .cloned()
}

/// Type- and name-driven value for a parameter with nothing declared
fn placeholder_for(param: &Parameter) -> Value {
    if let Some(hint) = parameter_hint(&param.name, param.param_type) {
        return hint;
    }
    match param.param_type {
        ParamType::String => json!(format!("example-{}", param.name)),
        ParamType::Integer | ParamType::Number => json!(1),
        ParamType::Boolean => json!(true),
        ParamType::Array => json!(["example-item"]),
    }
}

/// Example value for `schema` using the current time
pub fn synthesize(schema: &Value, external: Option<&Value>) -> Value {
    ExampleSynthesizer::new().synthesize(schema, external)
}

/// Example query object for `params` using the current time
pub fn synthesize_query(params: &[Parameter]) -> Value {
    ExampleSynthesizer::new().synthesize_query(params)
}
