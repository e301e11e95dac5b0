//! Error types for fragment construction and expression translation.

/// A fragment template that does not line up with its arguments.
///
/// These are programmer errors: the template and argument list are written
/// side by side in code, so a mismatch is never a runtime condition worth
/// recovering from.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FragmentError {
    /// A `{` or `}` that is neither a placeholder nor an escaped brace.
    #[error("unbalanced brace at byte {position}")]
    UnbalancedBrace {
        /// Byte offset in the template.
        position: usize,
    },

    /// A `{...}` whose content is not a decimal index.
    #[error("invalid placeholder `{{{text}}}` at byte {position}")]
    InvalidPlaceholder {
        /// Byte offset in the template.
        position: usize,
        /// The text between the braces.
        text: String,
    },

    /// Placeholders must appear as `{0}`, `{1}`, ... in that order.
    #[error("placeholder {{{found}}} out of order, expected {{{expected}}}")]
    OutOfOrder {
        /// The index that should have come next.
        expected: usize,
        /// The index actually found.
        found: usize,
    },

    /// Placeholder count differs from argument count.
    #[error("template has {placeholders} placeholder(s) but {arguments} argument(s) were given")]
    ArgumentCountMismatch {
        /// Number of placeholders in the template.
        placeholders: usize,
        /// Number of arguments supplied.
        arguments: usize,
    },
}

/// Failure to translate an expression into SQL.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TranslateError {
    /// The node is outside the translatable grammar.
    #[error("unsupported expression node: {kind}")]
    Unsupported {
        /// Textual node kind, e.g. `AndAlso` or `Call`.
        kind: String,
    },

    /// A captured closure value has no field with the requested name.
    #[error("captured value `{capture}` has no member `{member}`")]
    UnknownCapture {
        /// Name of the captured value.
        capture: String,
        /// The member that was accessed.
        member: String,
    },

    /// A parameter reference that is not bound by the enclosing lambda.
    #[error("parameter `{parameter}` is not bound, expected `{expected}`")]
    UnboundParameter {
        /// The referenced parameter name.
        parameter: String,
        /// The parameter the enclosing lambda binds.
        expected: String,
    },
}

impl TranslateError {
    pub(crate) fn unsupported(kind: impl Into<String>) -> Self {
        Self::Unsupported { kind: kind.into() }
    }
}
