//! Route patterns.
//!
//! A pattern is a restricted regular expression: literal characters and
//! named capturing groups, concatenated. The body of a named group is an
//! ordinary regular expression constraining the parameter value, so
//! `/users/(?P<id>[0-9]+)` is a valid pattern while `/users/[0-9]+` is not.
//!
//! The same source text produces both the retained [`PatternNode`] tree used
//! for reverse generation and the anchored matcher used for dispatch.

use std::collections::HashMap;
use std::fmt;

use regex::Regex;
use regex_syntax::ast::{self, Ast, GroupKind};

use crate::error::{PatternError, Result, ReverseError};
use crate::request::PathParams;

/// A node of a validated pattern tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternNode {
    /// Literal text, emitted verbatim when reversing.
    Literal(String),
    /// Children in order.
    Concat(Vec<PatternNode>),
    /// A named parameter.
    Capture(String),
}

/// Checks that a parsed pattern only uses literals, named capturing groups
/// and concatenations of these.
///
/// The contents of a named group are not inspected: they only constrain what
/// the parameter may match.
///
/// # Errors
///
/// Returns [`PatternError::UnnamedGroup`] for a plain `( ... )` group,
/// [`PatternError::EmptyName`] for a group with an empty name and
/// [`PatternError::Unsupported`] for every other construct.
pub fn validate(ast: &Ast) -> Result<()> {
    lower(ast).map(|_| ())
}

fn unsupported(construct: &'static str, ast: &Ast) -> PatternError {
    PatternError::Unsupported {
        construct,
        offset: ast.span().start.offset,
    }
}

/// Validates `ast` and converts it into the retained tree. Adjacent literals
/// are merged.
fn lower(ast: &Ast) -> Result<PatternNode> {
    match ast {
        Ast::Empty(_) => Ok(PatternNode::Literal(String::new())),
        Ast::Literal(literal) => Ok(PatternNode::Literal(literal.c.to_string())),
        Ast::Concat(concat) => {
            let mut children: Vec<PatternNode> = Vec::with_capacity(concat.asts.len());
            for child in &concat.asts {
                let node = lower(child)?;
                if let (PatternNode::Literal(text), Some(PatternNode::Literal(prev))) =
                    (&node, children.last_mut())
                {
                    prev.push_str(text);
                    continue;
                }
                children.push(node);
            }
            Ok(PatternNode::Concat(children))
        }
        Ast::Group(group) => match &group.kind {
            GroupKind::CaptureName { name, .. } if name.name.is_empty() => {
                Err(PatternError::EmptyName {
                    offset: group.span.start.offset,
                })
            }
            GroupKind::CaptureName { name, .. } => Ok(PatternNode::Capture(name.name.clone())),
            GroupKind::CaptureIndex(_) => Err(PatternError::UnnamedGroup {
                offset: group.span.start.offset,
            }),
            GroupKind::NonCapturing(_) => Err(unsupported("non-capturing group", ast)),
        },
        Ast::Alternation(_) => Err(unsupported("alternation", ast)),
        Ast::Repetition(_) => Err(unsupported("repetition", ast)),
        Ast::ClassUnicode(_) | Ast::ClassPerl(_) | Ast::ClassBracketed(_) => {
            Err(unsupported("character class", ast))
        }
        Ast::Dot(_) => Err(unsupported("wildcard `.`", ast)),
        Ast::Assertion(_) => Err(unsupported("anchor", ast)),
        Ast::Flags(_) => Err(unsupported("flag group", ast)),
    }
}

/// A validated, compiled route pattern.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    tree: PatternNode,
    regex: Regex,
}

impl Pattern {
    /// Parses, validates and compiles a pattern.
    ///
    /// The matcher is anchored at both ends: only full paths match.
    ///
    /// # Example
    ///
    /// ```
    /// use remux_router::Pattern;
    ///
    /// let pattern = Pattern::parse("/posts/(?P<id>[0-9]+)/comments/(?P<cid>[0-9]+)").unwrap();
    /// let params = pattern.match_path("/posts/123/comments/456").unwrap();
    /// assert_eq!(params.get("id"), Some("123"));
    /// assert_eq!(params.get("cid"), Some("456"));
    /// ```
    ///
    /// # Errors
    ///
    /// Fails on invalid syntax, on any construct rejected by [`validate`],
    /// and when the matcher cannot be compiled.
    pub fn parse(source: &str) -> Result<Self> {
        let ast = ast::parse::Parser::new().parse(source)?;
        let tree = lower(&ast)?;
        let regex = Regex::new(&format!("^{source}$"))?;

        Ok(Self {
            source: source.to_string(),
            tree,
            regex,
        })
    }

    /// Returns the original pattern string.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Returns the retained pattern tree.
    pub fn tree(&self) -> &PatternNode {
        &self.tree
    }

    /// Returns the names of every named group, nested ones included.
    pub fn param_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.regex.capture_names().flatten()
    }

    /// Returns whether the whole path matches.
    pub fn matches(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }

    /// Matches the whole path and extracts its parameters.
    ///
    /// Every named group gets an entry; a group that did not participate in
    /// the match maps to an empty string. Unnamed groups are ignored.
    pub fn match_path(&self, path: &str) -> Option<PathParams> {
        let caps = self.regex.captures(path)?;

        let mut params = PathParams::new();
        for (i, name) in self.regex.capture_names().enumerate() {
            let Some(name) = name else { continue };
            let value = caps.get(i).map_or("", |m| m.as_str());
            params.insert(name, value);
        }

        Some(params)
    }

    /// Generates a path by substituting `params` for the named groups.
    ///
    /// Values are inserted verbatim. They are not checked against the
    /// group's constraint, so the result may not match this pattern.
    ///
    /// # Example
    ///
    /// ```
    /// use std::collections::HashMap;
    /// use remux_router::Pattern;
    ///
    /// let pattern = Pattern::parse("/posts/(?P<id>[0-9]+)").unwrap();
    /// let params: HashMap<String, String> =
    ///     [("id".to_string(), "123".to_string())]
    ///     .into_iter()
    ///     .collect();
    /// assert_eq!(pattern.expand(&params).unwrap(), "/posts/123");
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`ReverseError::MissingParameter`] naming the first group
    /// without a value.
    pub fn expand(
        &self,
        params: &HashMap<String, String>,
    ) -> std::result::Result<String, ReverseError> {
        let mut path = String::with_capacity(self.source.len());
        expand_node(&self.tree, params, &mut path)?;
        Ok(path)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

fn expand_node(
    node: &PatternNode,
    params: &HashMap<String, String>,
    out: &mut String,
) -> std::result::Result<(), ReverseError> {
    match node {
        PatternNode::Literal(text) => out.push_str(text),
        PatternNode::Capture(name) => {
            let value = params
                .get(name)
                .ok_or_else(|| ReverseError::MissingParameter(name.clone()))?;
            out.push_str(value);
        }
        PatternNode::Concat(children) => {
            for child in children {
                expand_node(child, params, out)?;
            }
        }
    }
    Ok(())
}
