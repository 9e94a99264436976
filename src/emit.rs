//! Top-level emission: one text block per remaining graph entry.
//!
//! An [`Emitter`] owns the bookkeeping of a single pass. It is consumed by
//! [`Emitter::emit_all`]; a second pass needs a fresh instance.
pub mod crud;
pub mod union;

use std::io::Write;

use crate::annotations::{Annotation, AnnotationKind};
use crate::error::{LowerError, Result};
use crate::flatten::{flattened_members, PLACEHOLDER_FIELD};
use crate::graph::{Member, Method, Node, TypeGraph};
use crate::preprocess::PassState;

const RESERVED_ROOTS: [&str; 2] = ["query", "mutation"];
const RESERVED_PREFIX: char = '_';

pub struct Emitter<'g> {
    pub(crate) graph: &'g TypeGraph,
    pub(crate) state: PassState,
    order: Vec<String>,
}

impl<'g> Emitter<'g> {
    pub fn new(graph: &'g TypeGraph) -> Self {
        let (state, order) = PassState::prepare(graph);
        tracing::debug!(entries = order.len(), collapsed = state.renames.len(), "preprocessed type graph");
        Self { graph, state, order }
    }

    /// Symbols that will be emitted, in output order.
    pub fn entries(&self) -> &[String] {
        &self.order
    }

    /// Write the directive blocks, then every entry, blank-line separated.
    pub fn emit_all<W: Write + ?Sized>(mut self, directives: &[String], sink: &mut W) -> Result<()> {
        let mut first = true;
        let mut write_block = |sink: &mut W, block: &str| -> Result<()> {
            if !first {
                sink.write_all(b"\n")?;
            }
            first = false;
            sink.write_all(block.as_bytes())?;
            sink.write_all(b"\n")?;
            Ok(())
        };
        for directive in directives {
            write_block(sink, directive)?;
        }
        for name in std::mem::take(&mut self.order) {
            let block = self.emit_entry(&name)?;
            tracing::debug!(symbol = %name, bytes = block.len(), "emitted declaration");
            write_block(sink, &block)?;
        }
        sink.flush()?;
        Ok(())
    }

    /// Lower one top-level entry to its text block(s).
    pub fn emit_entry(&mut self, name: &str) -> Result<String> {
        let graph: &'g TypeGraph = self.graph;
        let node = graph
            .get(name)
            .ok_or_else(|| LowerError::UnresolvedReference { target: name.to_string() })?;
        match node {
            Node::Alias { target, .. } => self.emit_alias(name, target),
            Node::Interface { .. } => self.emit_interface(name, node),
            Node::Enum { values } => {
                self.state.register_enum(name);
                Ok(block(&format!("enum {}", self.state.name(name)), values.iter().cloned().collect()))
            }
            Node::Union { types } => self.emit_union(name, types),
            other => Err(LowerError::unsupported(
                other.kind_name(),
                format!("`{name}` as a top-level declaration"),
            )),
        }
    }

    fn emit_alias(&mut self, name: &str, target: &Node) -> Result<String> {
        match target {
            Node::Primitive { .. } => {
                self.state.register_scalar(name);
                Ok(format!("scalar {}", self.state.name(name)))
            }
            Node::Reference { target } => {
                let aliased = self.lower_expr(&Node::reference(target.as_str()))?;
                Ok(format!("union {} = {aliased}", self.state.name(name)))
            }
            Node::Union { types } => self.emit_union(name, types),
            other => Err(LowerError::unsupported(
                other.kind_name(),
                format!("as the target of alias `{name}`"),
            )),
        }
    }

    fn emit_interface(&mut self, name: &str, node: &Node) -> Result<String> {
        let Node::Interface { concrete, documentation, .. } = node else {
            return Err(LowerError::unsupported(node.kind_name(), format!("`{name}` as an interface")));
        };
        let members = flattened_members(self.graph, name, node)?;
        let type_name = self.state.name(name);

        if documentation.has(AnnotationKind::SchemaRoot) {
            let lines = self.render_members(&members, false)?;
            return Ok(block("schema", lines));
        }
        let lines = self.render_members(&members, true)?;
        if documentation.has(AnnotationKind::InputRole) {
            return Ok(block(&format!("input {type_name}"), lines));
        }

        if *concrete {
            let mut header = format!("type {type_name}");
            for key in documentation.all(AnnotationKind::FederationKey) {
                if let Annotation::FederationKey(fields) = key {
                    header.push_str(&format!(" @key(fields: \"{fields}\")"));
                }
            }
            header.push_str(&documentation.render_suffix());
            let mut blocks = vec![block(&header, lines)];
            if !is_reserved(&type_name) {
                blocks.extend(self.crud_artifacts(&type_name, &members)?);
            }
            return Ok(blocks.join("\n\n"));
        }

        let mut out = block(&format!("interface {type_name}"), lines);
        if let Some(Annotation::Fragment(fragment)) = documentation.first(AnnotationKind::Fragment) {
            let fragment_name = fragment.clone().unwrap_or_else(|| format!("{type_name}Fragment"));
            let fields = members.iter().map(|m| m.name().to_string()).collect();
            out.push_str("\n\n");
            out.push_str(&block(&format!("fragment {fragment_name} on {type_name}"), fields));
        }
        Ok(out)
    }

    fn render_members(&self, members: &[Member], non_null: bool) -> Result<Vec<String>> {
        members.iter().map(|m| self.render_member(m, non_null)).collect()
    }

    fn render_member(&self, member: &Member, non_null: bool) -> Result<String> {
        let suffix = member.documentation().render_suffix();
        match member {
            Member::Property(p) => {
                let bang = if non_null && !p.optional { "!" } else { "" };
                Ok(format!("{}: {}{bang}{suffix}", p.name, self.lower_expr(&p.signature)?))
            }
            Member::Method(m) => {
                let bang = if non_null { "!" } else { "" };
                let returns = self.lower_expr(&m.returns)?;
                match self.render_arguments(m)? {
                    Some(args) => Ok(format!("{}({args}): {returns}{bang}{suffix}", m.name)),
                    None => Ok(format!("{}: {returns}{bang}{suffix}", m.name)),
                }
            }
        }
    }

    fn render_arguments(&self, method: &Method) -> Result<Option<String>> {
        let parameter = match method.parameters.as_slice() {
            [] => return Ok(None),
            [parameter] => parameter,
            many => {
                return Err(LowerError::TooManyParameters {
                    method: method.name.clone(),
                    count: many.len(),
                });
            }
        };
        let (label, resolved) = match &parameter.signature {
            Node::Reference { target } => (target.as_str(), self.resolve(target)?),
            other => (parameter.name.as_str(), other),
        };
        match resolved {
            Node::Interface { .. } | Node::LiteralObject { .. } => self.inline_fields(label, resolved).map(Some),
            _ => Ok(Some(format!("{}: {}!", parameter.name, self.lower_expr(&parameter.signature)?))),
        }
    }
}

/// `header {` + indented lines + `}`; an empty body gets the placeholder field.
pub(crate) fn block(header: &str, mut lines: Vec<String>) -> String {
    if lines.is_empty() {
        lines.push(format!("{PLACEHOLDER_FIELD}: Boolean"));
    }
    let mut out = format!("{header} {{\n");
    for line in &lines {
        out.push_str("  ");
        out.push_str(line);
        out.push('\n');
    }
    out.push('}');
    out
}

pub fn is_reserved(type_name: &str) -> bool {
    type_name.starts_with(RESERVED_PREFIX)
        || RESERVED_ROOTS.iter().any(|root| type_name.eq_ignore_ascii_case(root))
}

/// Run a full pass over `graph`, writing to `sink`.
pub fn emit_schema<W: Write + ?Sized>(graph: &TypeGraph, directives: &[String], sink: &mut W) -> Result<()> {
    Emitter::new(graph).emit_all(directives, sink)
}

pub fn emit_to_string(graph: &TypeGraph) -> Result<String> {
    let mut out = Vec::new();
    emit_schema(graph, &[], &mut out)?;
    Ok(String::from_utf8_lossy(&out).into_owned())
}
