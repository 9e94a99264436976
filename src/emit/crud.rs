//! CRUD artifacts derived from one concrete type.
//!
//! Every artifact is built from the same denormalized member list as the
//! primary declaration. Per-field behavior is chosen by [`FieldShape`], the
//! member's type after looking through references and aliases.

use crate::error::Result;
use crate::graph::{Member, Node, PrimitiveKind};
use crate::lower::{primitive_scalar, BOOLEAN_SCALAR, FLOAT_SCALAR, STRING_SCALAR};
use crate::names::{lower_first, upper_first};
use crate::preprocess::ID_SCALAR;

use super::{block, Emitter};

const BATCH_COUNT_SCALAR: &str = "Long";
const PAGE_COUNT_SCALAR: &str = "Int";
const DATE_LIKE_SCALARS: [&str; 2] = ["Date", "DateTime"];

const EQUALITY_SUFFIXES: [&str; 4] = ["", "_not", "_in", "_not_in"];
const ORDERING_SUFFIXES: [&str; 4] = ["_lt", "_lte", "_gt", "_gte"];
const SUBSTRING_SUFFIXES: [&str; 6] = [
    "_contains",
    "_not_contains",
    "_starts_with",
    "_not_starts_with",
    "_ends_with",
    "_not_ends_with",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum FieldShape {
    Identifier,
    Primitive(PrimitiveKind),
    Scalar(String),
    Enum(String),
    /// Reference to another object type.
    Relation(String),
    /// List of references to another object type.
    RelationList(String),
    /// Any other list, lowered as-is.
    List(String),
    /// Inline field list, lowered as-is.
    Inline(String),
    Unsupported,
}

/// A member a clause can be derived from: a property, or a method without
/// parameters (read as a required property of its return type).
struct Field<'m> {
    name: &'m str,
    signature: &'m Node,
    optional: bool,
}

fn eligible_fields(members: &[Member]) -> impl Iterator<Item = Field<'_>> {
    members.iter().filter_map(|member| match member {
        Member::Property(p) => Some(Field { name: &p.name, signature: &p.signature, optional: p.optional }),
        Member::Method(m) if m.parameters.is_empty() => {
            Some(Field { name: &m.name, signature: &m.returns, optional: false })
        }
        Member::Method(_) => None,
    })
}

fn non_null(optional: bool) -> &'static str {
    if optional { "" } else { "!" }
}

fn is_date_like(scalar: &str) -> bool {
    DATE_LIKE_SCALARS.contains(&scalar)
}

impl<'g> Emitter<'g> {
    /// The thirteen artifacts, in output order.
    pub(crate) fn crud_artifacts(&self, type_name: &str, members: &[Member]) -> Result<Vec<String>> {
        let shapes = eligible_fields(members)
            .map(|field| -> Result<_> { Ok((field.name, field.optional, self.field_shape(field.signature)?)) })
            .collect::<Result<Vec<_>>>()?;

        Ok(vec![
            self.batch_payload(type_name),
            self.create_input(type_name, &shapes),
            connect_input(type_name, "CreateMany", true),
            connect_input(type_name, "CreateOne", false),
            order_by_input(type_name, &shapes),
            self.update_input(type_name, &shapes),
            connect_input(type_name, "UpdateMany", true),
            self.update_many_mutation_input(type_name, &shapes),
            connect_input(type_name, "UpdateOne", false),
            where_input(type_name, &shapes),
            block(&format!("input {type_name}WhereUniqueInput"), vec![format!("id: {ID_SCALAR}!")]),
            query_extension(type_name),
            mutation_extension(type_name),
        ])
    }

    pub(crate) fn field_shape(&self, signature: &Node) -> Result<FieldShape> {
        self.field_shape_at(signature, 0)
    }

    fn field_shape_at(&self, signature: &Node, depth: usize) -> Result<FieldShape> {
        Ok(match signature {
            Node::Primitive { kind: PrimitiveKind::Any } => FieldShape::Unsupported,
            Node::Primitive { kind } => FieldShape::Primitive(*kind),
            Node::Reference { target } => self.reference_shape(target, depth)?,
            Node::Array { elements } => match elements.as_slice() {
                [Node::Reference { target }] => match self.reference_shape(target, depth)? {
                    FieldShape::Relation(element) => FieldShape::RelationList(element),
                    _ => FieldShape::List(self.lower_expr(signature)?),
                },
                _ => FieldShape::List(self.lower_expr(signature)?),
            },
            Node::LiteralObject { .. } | Node::Interface { .. } => FieldShape::Inline(self.lower_expr(signature)?),
            _ => FieldShape::Unsupported,
        })
    }

    fn reference_shape(&self, target: &str, depth: usize) -> Result<FieldShape> {
        let canonical = self.state.canonical(target);
        let name = self.state.name(target);
        if canonical == ID_SCALAR {
            return Ok(FieldShape::Identifier);
        }
        if self.state.is_enum(canonical) {
            return Ok(FieldShape::Enum(name));
        }
        if self.state.is_scalar(canonical) {
            return Ok(FieldShape::Scalar(name));
        }
        match self.resolve(target)? {
            Node::Interface { .. } => Ok(FieldShape::Relation(name)),
            Node::Enum { .. } => Ok(FieldShape::Enum(name)),
            // alias chains are bounded by the graph; anything longer is a loop
            Node::Alias { target, .. } if depth < self.graph.len() => self.field_shape_at(target, depth + 1),
            _ => Ok(FieldShape::Unsupported),
        }
    }

    fn batch_payload(&self, type_name: &str) -> String {
        block(&format!("type {type_name}BatchPayload"), vec![format!("count: {BATCH_COUNT_SCALAR}!")])
    }

    fn create_input(&self, type_name: &str, shapes: &[(&str, bool, FieldShape)]) -> String {
        let lines = shapes
            .iter()
            .filter_map(|(name, optional, shape)| {
                let bang = non_null(*optional);
                Some(match shape {
                    FieldShape::Identifier => format!("{name}: {ID_SCALAR}"),
                    FieldShape::RelationList(element) => format!("{name}: {element}CreateManyInput{bang}"),
                    FieldShape::Relation(target) => format!("{name}: {target}CreateOneInput{bang}"),
                    FieldShape::Enum(ty) | FieldShape::Scalar(ty) => format!("{name}: {ty}{bang}"),
                    FieldShape::Primitive(kind) => format!("{name}: {}{bang}", primitive_scalar(*kind).ok()?),
                    FieldShape::List(expr) | FieldShape::Inline(expr) => format!("{name}: {expr}{bang}"),
                    FieldShape::Unsupported => return None,
                })
            })
            .collect();
        block(&format!("input {type_name}CreateInput"), lines)
    }

    fn update_input(&self, type_name: &str, shapes: &[(&str, bool, FieldShape)]) -> String {
        let lines = shapes
            .iter()
            .filter_map(|(name, _, shape)| {
                Some(match shape {
                    FieldShape::Identifier | FieldShape::Unsupported => return None,
                    FieldShape::RelationList(element) => format!("{name}: {element}UpdateManyInput"),
                    FieldShape::Relation(target) => format!("{name}: {target}UpdateOneInput"),
                    FieldShape::Enum(ty) | FieldShape::Scalar(ty) => format!("{name}: {ty}"),
                    FieldShape::Primitive(kind) => format!("{name}: {}", primitive_scalar(*kind).ok()?),
                    FieldShape::List(expr) | FieldShape::Inline(expr) => format!("{name}: {expr}"),
                })
            })
            .collect();
        block(&format!("input {type_name}UpdateInput"), lines)
    }

    fn update_many_mutation_input(&self, type_name: &str, shapes: &[(&str, bool, FieldShape)]) -> String {
        let lines = shapes
            .iter()
            .filter_map(|(name, _, shape)| match shape {
                FieldShape::Enum(ty) | FieldShape::Scalar(ty) => Some(format!("{name}: {ty}")),
                FieldShape::Primitive(kind) => primitive_scalar(*kind).ok().map(|ty| format!("{name}: {ty}")),
                _ => None,
            })
            .collect();
        block(&format!("input {type_name}UpdateManyMutationInput"), lines)
    }
}

fn connect_input(type_name: &str, role: &str, many: bool) -> String {
    let connect = if many {
        format!("connect: [{type_name}WhereUniqueInput!]")
    } else {
        format!("connect: {type_name}WhereUniqueInput")
    };
    block(&format!("input {type_name}{role}Input"), vec![connect])
}

fn order_by_input(type_name: &str, shapes: &[(&str, bool, FieldShape)]) -> String {
    let values = shapes
        .iter()
        .flat_map(|(name, _, _)| [format!("{name}_ASC"), format!("{name}_DESC")])
        .collect();
    block(&format!("enum {type_name}OrderByInput"), values)
}

fn where_input(type_name: &str, shapes: &[(&str, bool, FieldShape)]) -> String {
    let where_type = format!("{type_name}WhereInput");
    let mut lines = Vec::new();
    for (name, _, shape) in shapes {
        lines.extend(where_clauses(name, shape));
    }
    for combinator in ["AND", "OR", "NOT"] {
        lines.push(format!("{combinator}: [{where_type}!]"));
    }
    block(&format!("input {where_type}"), lines)
}

/// Filter clauses for one field; unsupported shapes contribute nothing.
pub(crate) fn where_clauses(name: &str, shape: &FieldShape) -> Vec<String> {
    const STRING_FAMILY: &[&[&str]] = &[&EQUALITY_SUFFIXES, &ORDERING_SUFFIXES, &SUBSTRING_SUFFIXES];
    const ORDERED_FAMILY: &[&[&str]] = &[&EQUALITY_SUFFIXES, &ORDERING_SUFFIXES];
    const EQUALITY_FAMILY: &[&[&str]] = &[&EQUALITY_SUFFIXES];

    match shape {
        FieldShape::Identifier => operators(name, ID_SCALAR, STRING_FAMILY),
        FieldShape::Primitive(PrimitiveKind::String) => operators(name, STRING_SCALAR, STRING_FAMILY),
        FieldShape::Primitive(PrimitiveKind::Number) => operators(name, FLOAT_SCALAR, ORDERED_FAMILY),
        FieldShape::Primitive(PrimitiveKind::Boolean) => operators(name, BOOLEAN_SCALAR, EQUALITY_FAMILY),
        FieldShape::Scalar(ty) if is_date_like(ty) => operators(name, ty, ORDERED_FAMILY),
        FieldShape::Scalar(ty) => operators(name, ty, STRING_FAMILY),
        FieldShape::Enum(ty) => operators(name, ty, EQUALITY_FAMILY),
        FieldShape::RelationList(element) => ["every", "some", "none"]
            .iter()
            .map(|quantifier| format!("{name}_{quantifier}: {element}WhereInput"))
            .collect(),
        FieldShape::Relation(target) => vec![format!("{name}: {target}WhereInput")],
        FieldShape::Primitive(PrimitiveKind::Any)
        | FieldShape::List(_)
        | FieldShape::Inline(_)
        | FieldShape::Unsupported => Vec::new(),
    }
}

fn operators(name: &str, ty: &str, families: &[&[&str]]) -> Vec<String> {
    families
        .iter()
        .flat_map(|suffixes| suffixes.iter())
        .map(|suffix| match *suffix {
            "_in" | "_not_in" => format!("{name}{suffix}: [{ty}!]"),
            _ => format!("{name}{suffix}: {ty}"),
        })
        .collect()
}

fn query_extension(type_name: &str) -> String {
    let single = lower_first(type_name);
    block("extend type Query", vec![
        format!("{single}(where: {type_name}WhereUniqueInput!): {type_name}"),
        format!(
            "{single}s(where: {type_name}WhereInput, orderBy: {type_name}OrderByInput, skip: {PAGE_COUNT_SCALAR}, \
             after: {STRING_SCALAR}, before: {STRING_SCALAR}, first: {PAGE_COUNT_SCALAR}, last: {PAGE_COUNT_SCALAR}): [{type_name}]!"
        ),
    ])
}

fn mutation_extension(type_name: &str) -> String {
    let ty = upper_first(type_name);
    block("extend type Mutation", vec![
        format!("create{ty}(data: {type_name}CreateInput!): {type_name}!"),
        format!("delete{ty}(where: {type_name}WhereUniqueInput!): {type_name}"),
        format!("deleteMany{ty}s(where: {type_name}WhereInput): {type_name}BatchPayload!"),
        format!("update{ty}(data: {type_name}UpdateInput!, where: {type_name}WhereUniqueInput!): {type_name}"),
        format!(
            "updateMany{ty}s(data: {type_name}UpdateManyMutationInput!, where: {type_name}WhereInput): {type_name}BatchPayload!"
        ),
        format!(
            "upsert{ty}(where: {type_name}WhereUniqueInput!, create: {type_name}CreateInput!, update: {type_name}UpdateInput!): {type_name}!"
        ),
    ])
}
