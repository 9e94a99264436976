//! Expression lowering: graph node → type expression text.
use crate::emit::Emitter;
use crate::error::{LowerError, Result};
use crate::flatten::collect_members;
use crate::graph::{Node, PrimitiveKind, Property};

pub const STRING_SCALAR: &str = "String";
pub const FLOAT_SCALAR: &str = "Float";
pub const BOOLEAN_SCALAR: &str = "Boolean";

/// Output scalar for a primitive kind.
///
/// Numbers are always `Float` and strings always `String`; only the
/// identifier doc tag yields `ID`.
/// TODO: lower integer-valued numbers to `Int` once the graph carries the distinction.
pub fn primitive_scalar(kind: PrimitiveKind) -> Result<&'static str> {
    match kind {
        PrimitiveKind::String => Ok(STRING_SCALAR),
        PrimitiveKind::Number => Ok(FLOAT_SCALAR),
        PrimitiveKind::Boolean => Ok(BOOLEAN_SCALAR),
        PrimitiveKind::Any => Err(LowerError::unsupported("primitive `any`", "as a type expression")),
    }
}

impl<'g> Emitter<'g> {
    /// Graph node behind a symbol, looking through collapsed aliases first.
    pub(crate) fn resolve(&self, target: &str) -> Result<&'g Node> {
        let graph: &'g _ = self.graph;
        graph
            .get(self.state.canonical(target))
            .or_else(|| graph.get(target))
            .ok_or_else(|| LowerError::UnresolvedReference { target: target.to_string() })
    }

    pub fn lower_expr(&self, node: &Node) -> Result<String> {
        match node {
            Node::Primitive { kind } => primitive_scalar(*kind).map(str::to_string),
            Node::Reference { target } => {
                self.resolve(target)?;
                Ok(self.state.name(target))
            }
            Node::Array { elements } => {
                if elements.is_empty() {
                    return Err(LowerError::unsupported("array", "without an element type"));
                }
                let arms = elements
                    .iter()
                    .map(|e| self.lower_expr(e))
                    .collect::<Result<Vec<_>>>()?;
                Ok(format!("[{}]", arms.join("|")))
            }
            Node::LiteralObject { .. } | Node::Interface { .. } => self.inline_fields("(inline)", node),
            other => Err(LowerError::unsupported(other.kind_name(), "as a type expression")),
        }
    }

    /// `a: T!, b: U` from a literal object or interface chain.
    pub(crate) fn inline_fields(&self, name: &str, node: &Node) -> Result<String> {
        let fields = collect_members(self.graph, name, node)?
            .iter()
            .map(|p| self.lower_field(p))
            .collect::<Result<Vec<_>>>()?;
        Ok(fields.join(", "))
    }

    fn lower_field(&self, property: &Property) -> Result<String> {
        let bang = if property.optional { "" } else { "!" };
        Ok(format!("{}: {}{bang}", property.name, self.lower_expr(&property.signature)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::TypeGraph;
    use serde_json::json;

    fn graph(value: serde_json::Value) -> TypeGraph {
        serde_json::from_value(value).unwrap()
    }

    fn node(value: serde_json::Value) -> Node {
        serde_json::from_value(value).unwrap()
    }

    fn sample() -> TypeGraph {
        graph(json!({
            "User": { "kind": "interface", "members": [
                { "kind": "property", "name": "name", "signature": { "kind": "primitive", "type": "string" } },
                { "kind": "property", "name": "age", "optional": true, "signature": { "kind": "primitive", "type": "number" } }
            ]},
            "Tag": { "kind": "interface", "members": [] },
            "Handle": { "kind": "alias", "target": { "kind": "reference", "target": "Slug" } },
            "Slug": { "kind": "alias", "target": { "kind": "primitive", "type": "string" } },
        }))
    }

    #[test]
    fn primitives_lower_to_scalars() {
        let g = sample();
        let emitter = Emitter::new(&g);
        assert_eq!(emitter.lower_expr(&Node::primitive(PrimitiveKind::String)).unwrap(), "String");
        assert_eq!(emitter.lower_expr(&Node::primitive(PrimitiveKind::Number)).unwrap(), "Float");
        assert_eq!(emitter.lower_expr(&Node::primitive(PrimitiveKind::Boolean)).unwrap(), "Boolean");
        assert!(emitter.lower_expr(&Node::primitive(PrimitiveKind::Any)).is_err());
    }

    #[test]
    fn references_use_renamed_names() {
        let g = sample();
        let emitter = Emitter::new(&g);
        assert_eq!(emitter.lower_expr(&Node::reference("Handle")).unwrap(), "Slug");
        assert_eq!(emitter.lower_expr(&Node::reference("User")).unwrap(), "User");
        let err = emitter.lower_expr(&Node::reference("Missing")).unwrap_err();
        assert!(matches!(err, LowerError::UnresolvedReference { .. }));
    }

    #[test]
    fn arrays_lower_to_union_typed_lists() {
        let g = sample();
        let emitter = Emitter::new(&g);
        let list = node(json!({ "kind": "array", "elements": [{ "kind": "reference", "target": "User" }] }));
        assert_eq!(emitter.lower_expr(&list).unwrap(), "[User]");
        let mixed = node(json!({ "kind": "array", "elements": [
            { "kind": "reference", "target": "User" },
            { "kind": "reference", "target": "Tag" }
        ]}));
        assert_eq!(emitter.lower_expr(&mixed).unwrap(), "[User|Tag]");
    }

    #[test]
    fn object_like_nodes_lower_inline() {
        let g = sample();
        let emitter = Emitter::new(&g);
        assert_eq!(emitter.inline_fields("User", &g["User"]).unwrap(), "name: String!, age: Float");
        let literal = node(json!({ "kind": "literal_object", "members": [] }));
        assert_eq!(emitter.lower_expr(&literal).unwrap(), "_empty: Boolean");
    }

    #[test]
    fn non_expressions_are_rejected() {
        let g = sample();
        let emitter = Emitter::new(&g);
        for bad in [
            json!({ "kind": "enum", "values": ["A"] }),
            json!({ "kind": "union", "types": [] }),
            json!({ "kind": "string_literal", "value": "A" }),
            json!({ "kind": "alias", "target": { "kind": "primitive", "type": "string" } }),
        ] {
            let err = emitter.lower_expr(&node(bad)).unwrap_err();
            assert!(matches!(err, LowerError::UnsupportedNodeKind { .. }));
        }
    }
}
