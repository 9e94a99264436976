//! Input type graph: the declared shapes the front end hands us.
//!
//! Keys are symbol names; iteration order of the map is the output order.

use indexmap::{IndexMap, IndexSet};
use serde::Deserialize;

use crate::annotations::Annotations;

pub type TypeGraph = IndexMap<String, Node>;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Node {
    Alias {
        target: Box<Node>,
        #[serde(default)]
        documentation: Annotations,
    },
    Interface {
        #[serde(default)]
        members: Vec<Member>,
        #[serde(default)]
        inherits: Vec<String>, // at most one supertype is supported
        #[serde(default)]
        concrete: bool,
        #[serde(default)]
        documentation: Annotations,
    },
    Enum {
        values: IndexSet<String>,
    },
    Union {
        types: Vec<Node>,
    },
    LiteralObject {
        #[serde(default)]
        members: Vec<Property>,
    },
    Reference {
        target: String,
    },
    Array {
        elements: Vec<Node>,
    },
    Primitive {
        #[serde(rename = "type")]
        kind: PrimitiveKind,
    },
    StringLiteral {
        value: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimitiveKind {
    String,
    Number,
    Boolean,
    Any,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Member {
    Property(Property),
    Method(Method),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Property {
    pub name: String,
    pub signature: Node,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub documentation: Annotations,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Method {
    pub name: String,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    pub returns: Node,
    #[serde(default)]
    pub documentation: Annotations,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub signature: Node,
}

impl Node {
    /// Short lowercase label used in fault messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Node::Alias { .. } => "alias",
            Node::Interface { .. } => "interface",
            Node::Enum { .. } => "enum",
            Node::Union { .. } => "union",
            Node::LiteralObject { .. } => "literal object",
            Node::Reference { .. } => "reference",
            Node::Array { .. } => "array",
            Node::Primitive { .. } => "primitive",
            Node::StringLiteral { .. } => "string literal",
        }
    }

    pub fn primitive(kind: PrimitiveKind) -> Self { Node::Primitive { kind } }

    pub fn reference(target: impl Into<String>) -> Self {
        Node::Reference { target: target.into() }
    }
}

impl Member {
    pub fn name(&self) -> &str {
        match self {
            Member::Property(p) => &p.name,
            Member::Method(m) => &m.name,
        }
    }

    pub fn documentation(&self) -> &Annotations {
        match self {
            Member::Property(p) => &p.documentation,
            Member::Method(m) => &m.documentation,
        }
    }
}

impl Property {
    pub fn new(name: impl Into<String>, signature: Node, optional: bool) -> Self {
        Self { name: name.into(), signature, optional, documentation: Annotations::default() }
    }
}
