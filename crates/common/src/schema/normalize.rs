//! In-place schema cleanup
//!
//! Children are normalized before their parent. Each node then goes through:
//!
//! 1. `type: file` becomes `type: string, format: binary`
//! 2. `examples` collapses into a single `example` (first entry wins)
//! 3. numeric `exclusiveMinimum`/`exclusiveMaximum` become the boolean-flag
//!    form alongside `minimum`/`maximum`
//! 4. scalar nodes without `default`, `example`, or `enum` get a zero-value
//!    `default`
//!
//! Leftover `$ref` keys are dropped first, since by this point they could not
//! be resolved. Running the pass twice changes nothing the second time.
//!
//! [`clean`] runs steps 1-3 only. Example synthesis reads `default` before
//! falling back to type-driven values, so fixtures are built from a cleaned
//! schema and the injected zeros stay in the stored description.

use super::{for_each_subschema, schema_type};
use serde_json::{json, Map, Value};
use tracing::warn;

/// Problems found while normalizing; none of them stop the pass
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaWarning {
    /// A `$ref` survived resolution and was removed
    UnresolvedReference { reference: Value },

    /// A numeric exclusive bound was dropped because the inclusive bound was
    /// already set
    ConflictingBound {
        keyword: &'static str,
        bound: Value,
        exclusive: Value,
    },

    /// An exclusive bound was neither a number nor a boolean
    MalformedBound { keyword: &'static str, value: Value },
}

/// Normalize `schema` in place and return what had to be patched around
pub fn normalize(schema: &mut Value) -> Vec<SchemaWarning> {
    let mut warnings = Vec::new();
    normalize_node(schema, true, &mut warnings);
    warnings
}

/// Reconcile dialect quirks in place without injecting zero-value defaults
pub fn clean(schema: &mut Value) -> Vec<SchemaWarning> {
    let mut warnings = Vec::new();
    normalize_node(schema, false, &mut warnings);
    warnings
}

fn normalize_node(node: &mut Value, with_defaults: bool, warnings: &mut Vec<SchemaWarning>) {
    let Value::Object(map) = node else {
        return;
    };

    for_each_subschema(map, |child| normalize_node(child, with_defaults, warnings));

    if let Some(reference) = map.remove("$ref") {
        warn!(reference = %reference, "Dropping unresolved $ref during normalization");
        warnings.push(SchemaWarning::UnresolvedReference { reference });
    }

    rewrite_file_type(map);
    collapse_examples(map);
    normalize_bound(map, "exclusiveMinimum", "minimum", warnings);
    normalize_bound(map, "exclusiveMaximum", "maximum", warnings);
    if with_defaults {
        inject_default(map);
    }
}

fn rewrite_file_type(map: &mut Map<String, Value>) {
    if schema_type(map) == Some("file") {
        map.insert("type".to_string(), json!("string"));
        map.insert("format".to_string(), json!("binary"));
    }
}

fn collapse_examples(map: &mut Map<String, Value>) {
    let Some(examples) = map.remove("examples") else {
        return;
    };
    if map.contains_key("example") {
        return;
    }
    if let Some(first) = first_example(examples) {
        map.insert("example".to_string(), first);
    }
}

/// First entry of a JSON-Schema `examples` list, or the first `value` of an
/// OpenAPI-style map of example objects
fn first_example(examples: Value) -> Option<Value> {
    match examples {
        Value::Array(items) => items.into_iter().next(),
        Value::Object(named) => named.into_iter().next().map(|(_, entry)| match entry {
            Value::Object(mut object) if object.contains_key("value") => {
                object.remove("value").unwrap_or(Value::Null)
            }
            other => other,
        }),
        _ => None,
    }
}

fn normalize_bound(
    map: &mut Map<String, Value>,
    exclusive_key: &'static str,
    bound_key: &'static str,
    warnings: &mut Vec<SchemaWarning>,
) {
    match map.get(exclusive_key) {
        None | Some(Value::Bool(_)) => {}
        Some(Value::Number(value)) => {
            let exclusive = Value::Number(value.clone());
            if let Some(bound) = map.get(bound_key) {
                warn!(
                    keyword = exclusive_key,
                    bound = %bound,
                    exclusive = %exclusive,
                    "Dropping numeric exclusive bound, inclusive bound already set"
                );
                warnings.push(SchemaWarning::ConflictingBound {
                    keyword: exclusive_key,
                    bound: bound.clone(),
                    exclusive,
                });
                map.remove(exclusive_key);
            } else {
                map.insert(bound_key.to_string(), exclusive);
                map.insert(exclusive_key.to_string(), Value::Bool(true));
            }
        }
        Some(other) => {
            warn!(keyword = exclusive_key, value = %other, "Exclusive bound is neither number nor boolean");
            warnings.push(SchemaWarning::MalformedBound {
                keyword: exclusive_key,
                value: other.clone(),
            });
        }
    }
}

fn inject_default(map: &mut Map<String, Value>) {
    if map.contains_key("default") || map.contains_key("example") || map.contains_key("enum") {
        return;
    }

    let zero = match schema_type(map) {
        Some("string") => json!(""),
        Some("integer") => json!(0),
        Some("number") => json!(0.0),
        Some("boolean") => json!(false),
        _ => return,
    };
    map.insert("default".to_string(), zero);
}
