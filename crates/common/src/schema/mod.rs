//! Schema engine shared by both conversion directions
//!
//! Schema trees are JSON-Schema-shaped `serde_json::Value` objects. The
//! engine has three passes:
//!
//! - [`resolve`]: expand `#/components/schemas/*` references into
//!   independent copies
//! - [`normalize`]: reconcile dialect quirks and inject zero-value defaults,
//!   in place; [`clean`] does the same without the defaults
//! - [`ExampleSynthesizer`]: build a representative instance from a schema
//!
//! A typical import pipeline runs them in that order:
//!
//! ```rust
//! use registry_openapi_common::schema::{normalize, resolve, synthesize};
//! use registry_openapi_common::OpenApiDocument;
//! use serde_json::json;
//!
//! let doc: OpenApiDocument = serde_json::from_value(json!({
//!     "openapi": "3.0.0",
//!     "info": {"title": "t", "version": "1"},
//!     "paths": {},
//!     "components": {"schemas": {"Ask": {
//!         "type": "object",
//!         "required": ["prompt"],
//!         "properties": {"prompt": {"type": "string", "examples": ["hi"]}}
//!     }}}
//! }))
//! .unwrap();
//!
//! let mut schema = resolve(Some(&json!({"$ref": "#/components/schemas/Ask"})), &doc);
//! normalize(&mut schema);
//! assert_eq!(synthesize(&schema, None), json!({"prompt": "hi"}));
//! ```

mod normalize;
mod resolve;
mod synthesize;

pub use normalize::{clean, normalize, SchemaWarning};
pub use resolve::resolve;
pub use synthesize::{
    featured_parameter, parameter_hint, synthesize, synthesize_query, ExampleSynthesizer,
    COMMON_PROPERTIES,
};

use serde_json::{Map, Value};

/// Keywords holding ordered lists of alternative or combined schemas
const COMBINATORS: [&str; 3] = ["oneOf", "anyOf", "allOf"];

/// An empty object schema, standing in for "no schema information"
pub fn empty_schema() -> Value {
    Value::Object(Map::new())
}

/// Visit the direct sub-schemas of a node: `properties.*`, `items`, and
/// `oneOf`/`anyOf`/`allOf` members
fn for_each_subschema(node: &mut Map<String, Value>, mut visit: impl FnMut(&mut Value)) {
    if let Some(Value::Object(properties)) = node.get_mut("properties") {
        for property in properties.values_mut() {
            visit(property);
        }
    }

    match node.get_mut("items") {
        Some(items @ Value::Object(_)) => visit(items),
        Some(Value::Array(tuple)) => tuple.iter_mut().for_each(&mut visit),
        _ => {}
    }

    for keyword in COMBINATORS {
        if let Some(Value::Array(members)) = node.get_mut(keyword) {
            members.iter_mut().for_each(&mut visit);
        }
    }
}

/// The node's `type` when it is a single string
fn schema_type(node: &Map<String, Value>) -> Option<&str> {
    node.get("type").and_then(Value::as_str)
}
