//! Unions: string-literal and enum unions collapse into enums; interface
//! unions become schema unions. Anything mixed aborts the pass.
use indexmap::IndexSet;

use crate::error::{LowerError, Result};
use crate::graph::Node;

use super::{block, Emitter};

impl<'g> Emitter<'g> {
    pub(crate) fn emit_union(&mut self, name: &str, types: &[Node]) -> Result<String> {
        let type_name = self.state.name(name);
        let Some(first) = types.first() else {
            return Err(LowerError::union(name, "it has no members"));
        };

        if let Node::StringLiteral { .. } = first {
            let mut values = IndexSet::new();
            for member in types {
                match member {
                    Node::StringLiteral { value } => {
                        values.insert(value.clone());
                    }
                    other => {
                        return Err(LowerError::union(name, format!("string literals mixed with a {}", other.kind_name())));
                    }
                }
            }
            self.state.register_enum(name);
            return Ok(block(&format!("enum {type_name}"), values.into_iter().collect()));
        }

        let targets = types
            .iter()
            .map(|member| match member {
                Node::Reference { target } => Ok(target.as_str()),
                other => Err(LowerError::union(name, format!("expected a reference, found a {}", other.kind_name()))),
            })
            .collect::<Result<Vec<_>>>()?;

        let first = self.resolve(targets[0])?;
        if matches!(first, Node::Enum { .. }) || self.state.is_enum(self.state.canonical(targets[0])) {
            let mut values = IndexSet::new();
            for target in &targets {
                self.collect_enum_values(name, target, 0, &mut values)?;
            }
            self.state.register_enum(name);
            return Ok(block(&format!("enum {type_name}"), values.into_iter().collect()));
        }

        match first {
            Node::Interface { .. } => {
                let mut names = Vec::with_capacity(targets.len());
                for target in &targets {
                    match self.resolve(target)? {
                        Node::Interface { .. } => names.push(self.state.name(target)),
                        other => {
                            return Err(LowerError::union(name, format!("interfaces mixed with {} `{target}`", other.kind_name())));
                        }
                    }
                }
                Ok(format!("union {type_name} = {}", names.join(" | ")))
            }
            other => Err(LowerError::union(
                name,
                format!("first member `{}` is a {}", targets[0], other.kind_name()),
            )),
        }
    }

    /// Values of an enum member: an enum node, or a union of string literals
    /// and further enum members, looked through aliases.
    fn collect_enum_values(
        &self,
        union: &str,
        target: &str,
        depth: usize,
        values: &mut IndexSet<String>,
    ) -> Result<()> {
        let node = self.resolve(target)?;
        let types = match node {
            Node::Enum { values: member_values } => {
                values.extend(member_values.iter().cloned());
                return Ok(());
            }
            Node::Union { types } => types,
            Node::Alias { target: aliased, .. } => match aliased.as_ref() {
                Node::Union { types } => types,
                Node::Reference { target: next } if depth < self.graph.len() => {
                    return self.collect_enum_values(union, next, depth + 1, values);
                }
                _ => {
                    return Err(LowerError::union(union, format!("enums mixed with alias `{target}`")));
                }
            },
            other => {
                return Err(LowerError::union(union, format!("enums mixed with {} `{target}`", other.kind_name())));
            }
        };
        for member in types {
            match member {
                Node::StringLiteral { value } => {
                    values.insert(value.clone());
                }
                Node::Reference { target: next } if depth < self.graph.len() => {
                    self.collect_enum_values(union, next, depth + 1, values)?;
                }
                other => {
                    return Err(LowerError::union(union, format!("enums mixed with a {}", other.kind_name())));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::emit::emit_to_string;
    use crate::error::LowerError;
    use crate::graph::TypeGraph;
    use serde_json::json;

    fn graph(value: serde_json::Value) -> TypeGraph {
        serde_json::from_value(value).unwrap()
    }

    fn literal(value: &str) -> serde_json::Value {
        json!({ "kind": "string_literal", "value": value })
    }

    fn reference(target: &str) -> serde_json::Value {
        json!({ "kind": "reference", "target": target })
    }

    fn union_alias(types: Vec<serde_json::Value>) -> serde_json::Value {
        json!({ "kind": "alias", "target": { "kind": "union", "types": types } })
    }

    #[test]
    fn string_literals_collapse_to_a_deduplicated_enum() {
        let g = graph(json!({ "Grade": union_alias(vec![literal("A"), literal("B"), literal("A")]) }));
        assert_eq!(emit_to_string(&g).unwrap(), "enum Grade {\n  A\n  B\n}\n");
    }

    #[test]
    fn enum_unions_merge_member_values() {
        let g = graph(json!({
            "Warm": { "kind": "enum", "values": ["RED", "ORANGE"] },
            "Cool": { "kind": "enum", "values": ["BLUE", "RED"] },
            "Color": union_alias(vec![reference("Warm"), reference("Cool")]),
            "Palette": { "kind": "interface", "concrete": true, "members": [
                { "kind": "property", "name": "color", "signature": reference("Color") }
            ]},
        }));
        let out = emit_to_string(&g).unwrap();
        assert!(out.contains("enum Color {\n  RED\n  ORANGE\n  BLUE\n}"));
        // the collapsed union filters like an enum
        assert!(out.contains("  color_not_in: [Color!]\n"));
        assert!(!out.contains("color_contains"));
    }

    #[test]
    fn literal_union_members_merge_into_enum_unions() {
        let g = graph(json!({
            "Palette": { "kind": "interface", "concrete": true, "members": [
                { "kind": "property", "name": "color", "signature": reference("Color") }
            ]},
            "Color": union_alias(vec![reference("Warm"), reference("Cool")]),
            "Warm": union_alias(vec![literal("RED"), literal("ORANGE")]),
            "Cool": { "kind": "union", "types": [literal("BLUE"), literal("RED")] },
        }));
        let out = emit_to_string(&g).unwrap();
        assert!(out.contains("enum Color {\n  RED\n  ORANGE\n  BLUE\n}"));
        assert!(out.contains("enum Warm {\n  RED\n  ORANGE\n}"));
        assert!(out.contains("input PaletteCreateInput {\n  color: Color!\n}"));
    }

    #[test]
    fn interface_unions_become_schema_unions() {
        let g = graph(json!({
            "Photo": { "kind": "interface", "members": [] },
            "Video": { "kind": "interface", "members": [] },
            "Media": union_alias(vec![reference("Photo"), reference("Video")]),
        }));
        let out = emit_to_string(&g).unwrap();
        assert!(out.ends_with("\n\nunion Media = Photo | Video\n"));
    }

    #[test]
    fn mixed_unions_abort_the_pass() {
        let cases = [
            union_alias(vec![literal("A"), reference("Photo")]),
            union_alias(vec![reference("Photo"), reference("Role")]),
            union_alias(vec![reference("Role"), reference("Photo")]),
            union_alias(vec![reference("Photo"), literal("A")]),
            union_alias(vec![json!({ "kind": "primitive", "type": "string" })]),
            union_alias(vec![reference("Cursor")]),
            union_alias(vec![]),
        ];
        for case in cases {
            let g = graph(json!({
                "Photo": { "kind": "interface", "members": [] },
                "Role": { "kind": "enum", "values": ["A"] },
                "Cursor": { "kind": "alias", "target": { "kind": "primitive", "type": "string" } },
                "Bad": case,
            }));
            let err = emit_to_string(&g).unwrap_err();
            assert!(matches!(err, LowerError::InvalidUnionComposition { .. }), "{err}");
        }
    }
}
