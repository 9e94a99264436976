use thiserror::Error;

/// Pass-aborting lowering faults. The first one raised ends the pass.
#[derive(Debug, Error)]
pub enum LowerError {
    #[error("cannot lower {kind} {context}")]
    UnsupportedNodeKind { kind: String, context: String },

    #[error("interface `{name}` declares {count} supertypes; only single inheritance is supported")]
    MultipleInheritanceUnsupported { name: String, count: usize },

    #[error("interface `{name}` inherits from `{supertype}`, which is not an interface")]
    InvalidSupertype { name: String, supertype: String },

    #[error("interface `{name}` has a cyclic inheritance chain through `{supertype}`")]
    CyclicInheritance { name: String, supertype: String },

    #[error("method `{method}` declares {count} parameters; at most one is supported")]
    TooManyParameters { method: String, count: usize },

    #[error("union `{name}` is not uniform: {reason}")]
    InvalidUnionComposition { name: String, reason: String },

    #[error("reference to unknown symbol `{target}`")]
    UnresolvedReference { target: String },

    #[error("failed to write schema output")]
    Sink(#[from] std::io::Error),
}

impl LowerError {
    pub(crate) fn unsupported(kind: &str, context: impl Into<String>) -> Self {
        Self::UnsupportedNodeKind { kind: kind.to_string(), context: context.into() }
    }

    pub(crate) fn union(name: &str, reason: impl Into<String>) -> Self {
        Self::InvalidUnionComposition { name: name.to_string(), reason: reason.into() }
    }
}

pub type Result<T, E = LowerError> = std::result::Result<T, E>;
