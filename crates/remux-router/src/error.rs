//! Error types for routing.

use thiserror::Error;

/// Errors raised while registering a route pattern.
///
/// These are configuration errors: they surface at startup, never while
/// serving requests.
#[derive(Debug, Error)]
pub enum PatternError {
    /// The pattern is not valid regular expression syntax.
    #[error("invalid pattern syntax: {0}")]
    Syntax(#[from] regex_syntax::ast::Error),

    /// The pattern uses a construct routes cannot be built from.
    #[error("unsupported {construct} in pattern at offset {offset}")]
    Unsupported {
        construct: &'static str,
        offset: usize,
    },

    /// A capturing group has no name.
    #[error("top-level groupings must be named (offset {offset})")]
    UnnamedGroup { offset: usize },

    /// A capturing group has an empty name.
    #[error("capture group name must not be empty (offset {offset})")]
    EmptyName { offset: usize },

    /// The anchored matcher could not be compiled.
    #[error("failed to compile pattern: {0}")]
    Compile(#[from] regex::Error),
}

/// Errors raised while generating a path from a named route.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReverseError {
    /// No route carries the requested name.
    #[error("route not found: {0}")]
    RouteNotFound(String),

    /// A named capture has no value in the parameter mapping.
    #[error("missing parameter {0}")]
    MissingParameter(String),
}

/// Result type alias for route registration.
pub type Result<T> = std::result::Result<T, PatternError>;
