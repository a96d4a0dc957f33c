//! Parsed statement templates.
//!
//! A `Statement` is built once by [`parse`](crate::query::parse::parse) and
//! never mutated afterwards. It can be shared between threads and bound any
//! number of times.

use crate::error::ParseError;
use std::fmt;
use std::str::FromStr;

/// One piece of a parsed template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatementNode {
    /// Literal SQL copied verbatim into the output
    Text(String),
    /// A `?` (no name) or `@name` marker
    Placeholder {
        /// 1-based position among all placeholders, named or not
        ordinal: usize,
        name: Option<String>,
    },
}

impl StatementNode {
    /// Placeholder name, if this is a named placeholder.
    pub fn placeholder_name(&self) -> Option<&str> {
        match self {
            StatementNode::Placeholder { name, .. } => name.as_deref(),
            StatementNode::Text(_) => None,
        }
    }

    /// Check if this is a `?` placeholder.
    pub fn is_positional(&self) -> bool {
        matches!(self, StatementNode::Placeholder { name: None, .. })
    }
}

impl fmt::Display for StatementNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatementNode::Text(text) => write!(f, "text({})", text),
            StatementNode::Placeholder { ordinal, name } => {
                write!(f, "placeholder({},{})", ordinal, name.as_deref().unwrap_or(""))
            }
        }
    }
}

/// Immutable parsed form of a SQL template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    nodes: Vec<StatementNode>,
    positional_count: usize,
    /// One entry per occurrence, in template order
    named_placeholders: Vec<String>,
}

impl Statement {
    /// Build a statement from nodes whose ordinals are already assigned.
    pub(crate) fn from_nodes(nodes: Vec<StatementNode>) -> Self {
        let positional_count = nodes.iter().filter(|node| node.is_positional()).count();
        let named_placeholders = nodes
            .iter()
            .filter_map(StatementNode::placeholder_name)
            .map(str::to_string)
            .collect();

        Self {
            nodes,
            positional_count,
            named_placeholders,
        }
    }

    /// Get the parsed nodes in template order.
    pub fn nodes(&self) -> &[StatementNode] {
        &self.nodes
    }

    /// Number of `?` placeholders.
    pub fn positional_count(&self) -> usize {
        self.positional_count
    }

    /// Names of `@name` placeholders, one entry per occurrence.
    pub fn named_placeholders(&self) -> &[String] {
        &self.named_placeholders
    }

    /// Total number of placeholders.
    pub fn placeholder_count(&self) -> usize {
        self.positional_count + self.named_placeholders.len()
    }

    pub fn has_named_placeholders(&self) -> bool {
        !self.named_placeholders.is_empty()
    }

    /// Rebuild the template text this statement was parsed from.
    pub fn template(&self) -> String {
        let mut out = String::new();
        for node in &self.nodes {
            match node {
                StatementNode::Text(text) => out.push_str(text),
                StatementNode::Placeholder { name: None, .. } => out.push('?'),
                StatementNode::Placeholder {
                    name: Some(name), ..
                } => {
                    out.push('@');
                    out.push_str(name);
                }
            }
        }
        out
    }

    /// Concatenated text nodes with every placeholder removed.
    pub fn skeleton(&self) -> String {
        self.nodes
            .iter()
            .filter_map(|node| match node {
                StatementNode::Text(text) => Some(text.as_str()),
                StatementNode::Placeholder { .. } => None,
            })
            .collect()
    }
}

impl FromStr for Statement {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::query::parse::parse(s)
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;

        if self.positional_count > 0 {
            write!(f, "\n  ?={}", self.positional_count)?;
        }

        if !self.named_placeholders.is_empty() {
            write!(f, "\n  @=[{}]", self.named_placeholders.join(" "))?;
        }

        for node in &self.nodes {
            write!(f, "\n  {}", node)?;
        }

        write!(f, "\n)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> StatementNode {
        StatementNode::Text(s.to_string())
    }

    fn placeholder(ordinal: usize, name: Option<&str>) -> StatementNode {
        StatementNode::Placeholder {
            ordinal,
            name: name.map(str::to_string),
        }
    }

    #[test]
    fn test_derived_counts() {
        let stmt = Statement::from_nodes(vec![
            text("a = "),
            placeholder(1, Some("n1")),
            text(" and b = "),
            placeholder(2, None),
            text(" and c = "),
            placeholder(3, Some("n1")),
        ]);

        assert_eq!(stmt.positional_count(), 1);
        assert_eq!(stmt.named_placeholders(), &["n1", "n1"]);
        assert_eq!(stmt.placeholder_count(), 3);
        assert!(stmt.has_named_placeholders());
    }

    #[test]
    fn test_template_and_skeleton() {
        let stmt = Statement::from_nodes(vec![
            text("select "),
            placeholder(1, None),
            text(", "),
            placeholder(2, Some("x")),
        ]);

        assert_eq!(stmt.template(), "select ?, @x");
        assert_eq!(stmt.skeleton(), "select , ");
    }

    #[test]
    fn test_display() {
        let stmt = Statement::from_nodes(vec![
            text("a = "),
            placeholder(1, None),
            text(" b = "),
            placeholder(2, Some("b")),
        ]);

        assert_eq!(
            stmt.to_string(),
            "(\n  ?=1\n  @=[b]\n  text(a = )\n  placeholder(1,)\n  text( b = )\n  placeholder(2,b)\n)"
        );
    }

    #[test]
    fn test_node_helpers() {
        assert!(placeholder(1, None).is_positional());
        assert!(!placeholder(1, Some("a")).is_positional());
        assert!(!text("x").is_positional());
        assert_eq!(placeholder(1, Some("a")).placeholder_name(), Some("a"));
        assert_eq!(text("a").placeholder_name(), None);
    }

    #[test]
    fn test_statement_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Statement>();
    }
}
