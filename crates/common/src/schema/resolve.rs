//! `$ref` expansion against a document's component schemas

use super::{empty_schema, for_each_subschema};
use crate::openapi::{OpenApiDocument, COMPONENT_SCHEMA_PREFIX};
use serde_json::{Map, Value};
use tracing::warn;

/// Expand every `$ref` in `node` into a deep copy of its component schema
///
/// Returns an empty object schema when `node` is absent or empty. The
/// returned tree shares nothing with `document`, so callers may mutate it
/// freely.
///
/// A reference whose target is missing is dropped and the node's other fields
/// are kept. A reference back to a component that is already being expanded
/// higher up the same branch is dropped the same way, which cuts cycles while
/// still expanding a component that appears twice side by side.
pub fn resolve(node: Option<&Value>, document: &OpenApiDocument) -> Value {
    match node {
        Some(node) if !is_empty(node) => Resolver::new(document).resolve_node(node.clone()),
        _ => empty_schema(),
    }
}

fn is_empty(node: &Value) -> bool {
    match node {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

struct Resolver<'a> {
    document: &'a OpenApiDocument,
    /// Component names currently being expanded, outermost first
    expanding: Vec<String>,
}

impl<'a> Resolver<'a> {
    fn new(document: &'a OpenApiDocument) -> Self {
        Self {
            document,
            expanding: Vec::new(),
        }
    }

    fn resolve_node(&mut self, node: Value) -> Value {
        let Value::Object(mut map) = node else {
            return node;
        };

        if let Some(reference) = map.remove("$ref") {
            if let Some(expanded) = self.expand(&reference) {
                return expanded;
            }
        }

        self.resolve_children(&mut map);
        Value::Object(map)
    }

    fn resolve_children(&mut self, map: &mut Map<String, Value>) {
        for_each_subschema(map, |child| {
            *child = self.resolve_node(child.take());
        });
    }

    /// Resolved copy of the referenced component, or `None` if it cannot be
    /// expanded here
    fn expand(&mut self, reference: &Value) -> Option<Value> {
        let Some(reference) = reference.as_str() else {
            warn!(reference = %reference, "Ignoring non-string $ref");
            return None;
        };

        let Some(name) = reference.strip_prefix(COMPONENT_SCHEMA_PREFIX) else {
            warn!(reference, "Unsupported $ref, only local component schemas resolve");
            return None;
        };

        if self.expanding.iter().any(|n| n == name) {
            warn!(
                reference,
                chain = %self.expanding.join(" -> "),
                "Cyclic $ref, leaving it unexpanded"
            );
            return None;
        }

        let Some(target) = self.document.resolve_schema_ref(reference) else {
            warn!(reference, "Unresolvable $ref, no schema information available");
            return None;
        };

        self.expanding.push(name.to_string());
        let expanded = self.resolve_node(target.clone());
        self.expanding.pop();
        Some(expanded)
    }
}
