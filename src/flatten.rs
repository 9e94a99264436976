//! Inheritance flattening.
//!
//! Two traversal rules live here and must not be confused:
//! - [`collect_members`] keeps declaration order (child first) and only
//!   accepts properties; it feeds inline field lists.
//! - [`flattened_members`] accepts methods too, dedups by name and sorts
//!   alphabetically; it feeds every denormalized declaration.

use indexmap::IndexSet;

use crate::error::{LowerError, Result};
use crate::graph::{Member, Node, PrimitiveKind, Property, TypeGraph};

/// Field injected into declarations that would otherwise be empty.
pub const PLACEHOLDER_FIELD: &str = "_empty";

pub fn placeholder() -> Property {
    Property::new(PLACEHOLDER_FIELD, Node::primitive(PrimitiveKind::Boolean), true)
}

/// `node` followed by its supertypes, nearest first, each exactly once.
pub fn transitive_interfaces<'g>(
    graph: &'g TypeGraph,
    name: &'g str,
    node: &'g Node,
) -> Result<Vec<(&'g str, &'g Node)>> {
    let mut chain = Vec::new();
    let mut visited = IndexSet::new();
    let (mut current_name, mut current) = (name, node);
    loop {
        visited.insert(current_name);
        chain.push((current_name, current));
        let Node::Interface { inherits, .. } = current else { break };
        let parent = match inherits.as_slice() {
            [] => break,
            [parent] => parent.as_str(),
            many => {
                return Err(LowerError::MultipleInheritanceUnsupported {
                    name: current_name.to_string(),
                    count: many.len(),
                });
            }
        };
        if visited.contains(parent) {
            return Err(LowerError::CyclicInheritance {
                name: current_name.to_string(),
                supertype: parent.to_string(),
            });
        }
        let parent_node = graph
            .get(parent)
            .ok_or_else(|| LowerError::UnresolvedReference { target: parent.to_string() })?;
        if !matches!(parent_node, Node::Interface { .. }) {
            return Err(LowerError::InvalidSupertype {
                name: current_name.to_string(),
                supertype: parent.to_string(),
            });
        }
        current_name = parent;
        current = parent_node;
    }
    Ok(chain)
}

/// Properties of a literal object or interface chain in declaration order;
/// on a name collision the first (most derived) occurrence wins.
pub fn collect_members(graph: &TypeGraph, name: &str, node: &Node) -> Result<Vec<Property>> {
    let mut out: Vec<Property> = match node {
        Node::LiteralObject { members } => members.clone(),
        Node::Interface { .. } => {
            let mut seen = IndexSet::new();
            let mut out = Vec::new();
            for (owner, iface) in transitive_interfaces(graph, name, node)? {
                let Node::Interface { members, .. } = iface else { continue };
                for member in members {
                    match member {
                        Member::Property(p) => {
                            if seen.insert(p.name.as_str()) {
                                out.push(p.clone());
                            }
                        }
                        Member::Method(m) => {
                            return Err(LowerError::unsupported(
                                "method",
                                format!("`{}` of `{owner}` where only properties are allowed", m.name),
                            ));
                        }
                    }
                }
            }
            out
        }
        other => {
            return Err(LowerError::unsupported(other.kind_name(), format!("`{name}` as a field list")));
        }
    };
    if out.is_empty() {
        out.push(placeholder());
    }
    Ok(out)
}

/// Denormalized member list: every member along the chain, deduplicated by
/// name (first occurrence wins), sorted by name, never empty.
pub fn flattened_members(graph: &TypeGraph, name: &str, node: &Node) -> Result<Vec<Member>> {
    let mut seen = IndexSet::new();
    let mut out = Vec::new();
    for (_, iface) in transitive_interfaces(graph, name, node)? {
        let Node::Interface { members, .. } = iface else { continue };
        for member in members {
            if seen.insert(member.name()) {
                out.push(member.clone());
            }
        }
    }
    out.sort_by(|a, b| a.name().cmp(b.name()));
    if out.is_empty() {
        out.push(Member::Property(placeholder()));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn graph(value: serde_json::Value) -> TypeGraph {
        serde_json::from_value(value).unwrap()
    }

    fn prop(name: &str, ty: &str) -> serde_json::Value {
        json!({ "kind": "property", "name": name, "signature": { "kind": "primitive", "type": ty } })
    }

    fn names<'a>(members: impl IntoIterator<Item = &'a str>) -> Vec<&'a str> {
        members.into_iter().collect()
    }

    fn sample() -> TypeGraph {
        graph(json!({
            "Node": { "kind": "interface", "members": [prop("id", "string"), prop("zeta", "number")] },
            "Named": { "kind": "interface", "inherits": ["Node"], "members": [prop("name", "string"), prop("id", "number")] },
            "User": { "kind": "interface", "inherits": ["Named"], "concrete": true, "members": [prop("email", "string"), prop("name", "boolean")] },
        }))
    }

    #[test]
    fn chain_is_self_then_ancestors() {
        let g = sample();
        let chain = transitive_interfaces(&g, "User", &g["User"]).unwrap();
        assert_eq!(chain.iter().map(|(n, _)| *n).collect::<Vec<_>>(), ["User", "Named", "Node"]);
    }

    #[test]
    fn collect_members_keeps_declaration_order_child_first() {
        let g = sample();
        let members = collect_members(&g, "User", &g["User"]).unwrap();
        assert_eq!(names(members.iter().map(|p| p.name.as_str())), ["email", "name", "id", "zeta"]);
        // child's `name: boolean` overrides parent's `name: string`
        assert_eq!(members[1].signature, Node::primitive(PrimitiveKind::Boolean));
        // Named's `id: number` overrides Node's `id: string`
        assert_eq!(members[2].signature, Node::primitive(PrimitiveKind::Number));
    }

    #[test]
    fn flattened_members_are_sorted_and_deduplicated() {
        let g = sample();
        let members = flattened_members(&g, "User", &g["User"]).unwrap();
        assert_eq!(names(members.iter().map(Member::name)), ["email", "id", "name", "zeta"]);
        let Member::Property(name) = &members[2] else { panic!() };
        assert_eq!(name.signature, Node::primitive(PrimitiveKind::Boolean));
    }

    #[test]
    fn empty_declarations_get_a_placeholder() {
        let g = graph(json!({
            "Empty": { "kind": "interface", "members": [] },
            "Blank": { "kind": "literal_object", "members": [] },
        }));
        let flattened = flattened_members(&g, "Empty", &g["Empty"]).unwrap();
        assert_eq!(flattened, [Member::Property(placeholder())]);
        let collected = collect_members(&g, "Blank", &g["Blank"]).unwrap();
        assert_eq!(collected, [placeholder()]);
    }

    #[test]
    fn methods_are_rejected_where_only_properties_are_allowed() {
        let g = graph(json!({
            "Api": { "kind": "interface", "members": [
                { "kind": "method", "name": "ping", "returns": { "kind": "primitive", "type": "boolean" } }
            ]},
        }));
        let err = collect_members(&g, "Api", &g["Api"]).unwrap_err();
        assert!(matches!(err, LowerError::UnsupportedNodeKind { .. }));
        // the denormalized list accepts it
        assert_eq!(flattened_members(&g, "Api", &g["Api"]).unwrap().len(), 1);
    }

    #[test]
    fn multiple_inheritance_is_rejected() {
        let g = graph(json!({
            "A": { "kind": "interface", "members": [] },
            "B": { "kind": "interface", "members": [] },
            "C": { "kind": "interface", "inherits": ["A", "B"], "members": [] },
        }));
        let err = flattened_members(&g, "C", &g["C"]).unwrap_err();
        assert!(matches!(err, LowerError::MultipleInheritanceUnsupported { count: 2, .. }));
    }

    #[test]
    fn non_interface_supertype_is_rejected() {
        let g = graph(json!({
            "Role": { "kind": "enum", "values": ["A"] },
            "User": { "kind": "interface", "inherits": ["Role"], "members": [] },
        }));
        let err = collect_members(&g, "User", &g["User"]).unwrap_err();
        assert!(matches!(err, LowerError::InvalidSupertype { ref supertype, .. } if supertype == "Role"));
    }

    #[test]
    fn inheritance_cycles_fail_instead_of_looping() {
        let g = graph(json!({
            "A": { "kind": "interface", "inherits": ["B"], "members": [] },
            "B": { "kind": "interface", "inherits": ["A"], "members": [] },
        }));
        let err = transitive_interfaces(&g, "A", &g["A"]).unwrap_err();
        assert!(matches!(err, LowerError::CyclicInheritance { ref supertype, .. } if supertype == "A"));
    }
}
