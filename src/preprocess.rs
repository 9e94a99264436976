//! Whole-graph preprocessing.
//!
//! Runs in two phases so later lookups never depend on declaration order:
//! 1. classify every top-level scalar and enum name (and identifier aliases),
//! 2. collapse trivial aliases (references to a scalar, an enum or another
//!    collapsed alias) into rename-table entries until nothing changes.

use indexmap::{IndexMap, IndexSet};

use crate::annotations::AnnotationKind;
use crate::graph::{Node, TypeGraph};

/// Scalar used for identifier-typed fields.
pub const ID_SCALAR: &str = "ID";

/// Bookkeeping for exactly one pass over one graph.
#[derive(Debug, Clone, Default)]
pub struct PassState {
    pub(crate) renames: IndexMap<String, String>,
    pub(crate) scalars: IndexSet<String>,
    pub(crate) enums: IndexSet<String>,
}

impl PassState {
    /// Build the pass state and the list of symbols left for top-level emission.
    pub fn prepare(graph: &TypeGraph) -> (Self, Vec<String>) {
        let mut state = Self::default();

        for (name, node) in graph {
            match node {
                Node::Alias { documentation, .. } if documentation.has(AnnotationKind::IdentifierAlias) => {
                    tracing::trace!(alias = %name, "identifier alias");
                    state.renames.insert(name.clone(), ID_SCALAR.to_string());
                }
                Node::Alias { target, .. } => match target.as_ref() {
                    Node::Primitive { .. } => {
                        state.scalars.insert(name.clone());
                    }
                    Node::Union { types } if is_enum_union(graph, types) => {
                        state.enums.insert(name.clone());
                    }
                    _ => {}
                },
                Node::Union { types } if is_enum_union(graph, types) => {
                    state.enums.insert(name.clone());
                }
                Node::Enum { .. } => {
                    state.enums.insert(name.clone());
                }
                _ => {}
            }
        }

        loop {
            let mut changed = false;
            for (name, node) in graph {
                let Node::Alias { target, .. } = node else { continue };
                let Node::Reference { target } = target.as_ref() else { continue };
                if state.renames.contains_key(name) {
                    continue;
                }
                if state.is_trivial_target(graph, target) {
                    tracing::trace!(alias = %name, target = %target, "collapsing alias");
                    state.renames.insert(name.clone(), target.clone());
                    changed = true;
                }
            }
            if !changed {
                break;
            }
        }

        let order = graph
            .keys()
            .filter(|name| !state.renames.contains_key(*name))
            .cloned()
            .collect();
        (state, order)
    }

    fn is_trivial_target(&self, graph: &TypeGraph, target: &str) -> bool {
        self.scalars.contains(target)
            || self.enums.contains(target)
            || self.renames.contains_key(target)
            || matches!(graph.get(target), Some(Node::Enum { .. }))
    }

    pub fn is_scalar(&self, name: &str) -> bool {
        self.scalars.contains(name)
    }

    pub fn is_enum(&self, name: &str) -> bool {
        self.enums.contains(name)
    }

    pub(crate) fn register_scalar(&mut self, name: &str) {
        self.scalars.insert(name.to_string());
    }

    pub(crate) fn register_enum(&mut self, name: &str) {
        self.enums.insert(name.to_string());
    }
}

/// Unions the union emitter will collapse into an enum.
pub(crate) fn is_enum_union(graph: &TypeGraph, types: &[Node]) -> bool {
    enum_union_at(graph, types, 0)
}

fn enum_union_at(graph: &TypeGraph, types: &[Node], depth: usize) -> bool {
    match types.first() {
        None => false,
        Some(Node::StringLiteral { .. }) => types.iter().all(|t| matches!(t, Node::StringLiteral { .. })),
        Some(Node::Reference { target }) => is_enum_symbol(graph, target, depth + 1),
        Some(_) => false,
    }
}

/// An enum node, or a (possibly aliased) union that lowers to one.
fn is_enum_symbol(graph: &TypeGraph, name: &str, depth: usize) -> bool {
    // chains longer than the graph are loops
    if depth > graph.len() {
        return false;
    }
    match graph.get(name) {
        Some(Node::Enum { .. }) => true,
        Some(Node::Union { types }) => enum_union_at(graph, types, depth),
        Some(Node::Alias { target, .. }) => match target.as_ref() {
            Node::Union { types } => enum_union_at(graph, types, depth),
            Node::Reference { target } => is_enum_symbol(graph, target, depth + 1),
            _ => false,
        },
        _ => false,
    }
}
