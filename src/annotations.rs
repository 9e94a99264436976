//! Doc-tag directives.
//!
//! Raw tags arrive as `{title, description}` pairs. Tags titled `graphql` are
//! prefix-matched once, when the graph is loaded, into structured
//! [`Annotation`]s; everything else is dropped.

use serde::Deserialize;

/// Title marking a doc tag as a schema directive.
pub const DIRECTIVE_TAG_TITLE: &str = "graphql";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DocTag {
    pub title: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnotationKind {
    Cost,
    Directive,
    SchemaRoot,
    InputRole,
    FederationKey,
    Fragment,
    IdentifierAlias,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Annotation {
    Cost(String),
    Directive(String),
    SchemaRoot,
    InputRole,
    FederationKey(String),
    Fragment(Option<String>),
    IdentifierAlias,
}

// Prefix vocabulary, matched in this order against the tag description.
const VOCABULARY: [(&str, AnnotationKind); 7] = [
    ("cost", AnnotationKind::Cost),
    ("directive", AnnotationKind::Directive),
    ("schema", AnnotationKind::SchemaRoot),
    ("input", AnnotationKind::InputRole),
    ("key", AnnotationKind::FederationKey),
    ("fragment", AnnotationKind::Fragment),
    ("ID", AnnotationKind::IdentifierAlias),
];

impl Annotation {
    pub fn kind(&self) -> AnnotationKind {
        match self {
            Annotation::Cost(_) => AnnotationKind::Cost,
            Annotation::Directive(_) => AnnotationKind::Directive,
            Annotation::SchemaRoot => AnnotationKind::SchemaRoot,
            Annotation::InputRole => AnnotationKind::InputRole,
            Annotation::FederationKey(_) => AnnotationKind::FederationKey,
            Annotation::Fragment(_) => AnnotationKind::Fragment,
            Annotation::IdentifierAlias => AnnotationKind::IdentifierAlias,
        }
    }

    /// Returns `None` for tags that are not schema directives or whose
    /// description matches no known prefix.
    pub fn from_tag(tag: &DocTag) -> Option<Self> {
        if tag.title != DIRECTIVE_TAG_TITLE {
            return None;
        }
        let description = tag.description.trim();
        let (prefix, kind) = VOCABULARY.iter().find(|(prefix, _)| description.starts_with(prefix))?;
        let payload = description[prefix.len()..].trim().to_string();
        Some(match kind {
            AnnotationKind::Cost => Annotation::Cost(payload),
            AnnotationKind::Directive => Annotation::Directive(payload),
            AnnotationKind::SchemaRoot => Annotation::SchemaRoot,
            AnnotationKind::InputRole => Annotation::InputRole,
            AnnotationKind::FederationKey => Annotation::FederationKey(payload),
            AnnotationKind::Fragment => Annotation::Fragment(Some(payload).filter(|p| !p.is_empty())),
            AnnotationKind::IdentifierAlias => Annotation::IdentifierAlias,
        })
    }
}

/// Resolved directives of one node, in tag order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "Vec<DocTag>")]
pub struct Annotations(Vec<Annotation>);

impl From<Vec<DocTag>> for Annotations {
    fn from(tags: Vec<DocTag>) -> Self {
        Self(tags.iter().filter_map(Annotation::from_tag).collect())
    }
}

impl Annotations {
    pub fn first(&self, kind: AnnotationKind) -> Option<&Annotation> {
        self.0.iter().find(|a| a.kind() == kind)
    }

    pub fn all(&self, kind: AnnotationKind) -> Vec<&Annotation> {
        self.0.iter().filter(|a| a.kind() == kind).collect()
    }

    pub fn has(&self, kind: AnnotationKind) -> bool {
        self.first(kind).is_some()
    }

    /// Field/type level directive suffix: ` @cost(..)` then custom directives.
    pub fn render_suffix(&self) -> String {
        let mut out = String::new();
        for annotation in &self.0 {
            match annotation {
                Annotation::Cost(args) => out.push_str(&format!(" @cost({args})")),
                Annotation::Directive(text) if !text.is_empty() => {
                    out.push(' ');
                    out.push_str(text);
                }
                _ => {}
            }
        }
        out
    }
}
