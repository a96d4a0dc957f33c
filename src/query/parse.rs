//! Template tokenizer.
//!
//! Splits a SQL template into text runs and placeholders. `?` is a
//! positional placeholder and `@name` a named one, unless they appear inside
//! a `'...'` string constant or a `"..."` quoted identifier. Both quoting
//! styles escape their delimiter by doubling it.

use crate::error::ParseError;
use crate::query::statement::{Statement, StatementNode};

/// Scanner state between two characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Text,
    StringConstant,
    /// A `'` was seen inside a string constant: either an escape or the end
    StringConstantQuoteSeen,
    QuotedIdentifier,
    /// A `"` was seen inside a quoted identifier: either an escape or the end
    QuotedIdentifierQuoteSeen,
    NamedPlaceholder,
}

/// Accumulates nodes while the template is scanned.
struct Scanner<'a> {
    template: &'a str,
    /// Byte offset where the pending text run or placeholder name starts
    start: usize,
    next_ordinal: usize,
    nodes: Vec<StatementNode>,
}

/// Parse a SQL template into a [`Statement`].
///
/// # Errors
///
/// - `EmptyNamedPlaceholder` if `@` is not followed by a name character
/// - `UnterminatedStringConstant` / `UnterminatedQuotedIdentifier` if the
///   template ends inside a quoted region
///
/// # Example
///
/// ```
/// use frontbase_rs::query::parse;
///
/// let stmt = parse("select * from t where a = @a and b = ?").unwrap();
/// assert_eq!(stmt.positional_count(), 1);
/// assert_eq!(stmt.named_placeholders(), &["a"]);
/// ```
pub fn parse(template: &str) -> Result<Statement, ParseError> {
    let mut scanner = Scanner::new(template);
    let mut state = ScanState::Text;

    for (pos, ch) in template.char_indices() {
        state = scanner.step(state, pos, ch)?;
    }

    let nodes = scanner.finish(state)?;
    tracing::trace!(nodes = nodes.len(), "parsed statement template");

    Ok(Statement::from_nodes(nodes))
}

/// Characters allowed in a placeholder name.
fn is_name_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric()
}

impl<'a> Scanner<'a> {
    fn new(template: &'a str) -> Self {
        Self {
            template,
            start: 0,
            next_ordinal: 1,
            nodes: Vec::new(),
        }
    }

    /// Consume one character and return the next state.
    fn step(&mut self, state: ScanState, pos: usize, ch: char) -> Result<ScanState, ParseError> {
        let next = match state {
            ScanState::Text => self.text(pos, ch),

            ScanState::NamedPlaceholder => {
                if is_name_char(ch) {
                    ScanState::NamedPlaceholder
                } else {
                    self.close_named(pos)?;
                    self.text(pos, ch)
                }
            }

            ScanState::StringConstant => match ch {
                '\'' => ScanState::StringConstantQuoteSeen,
                _ => ScanState::StringConstant,
            },

            ScanState::StringConstantQuoteSeen => match ch {
                '\'' => ScanState::StringConstant,
                _ => self.text(pos, ch),
            },

            ScanState::QuotedIdentifier => match ch {
                '"' => ScanState::QuotedIdentifierQuoteSeen,
                _ => ScanState::QuotedIdentifier,
            },

            ScanState::QuotedIdentifierQuoteSeen => match ch {
                '"' => ScanState::QuotedIdentifier,
                _ => self.text(pos, ch),
            },
        };

        Ok(next)
    }

    /// Handle a character seen in plain text.
    fn text(&mut self, pos: usize, ch: char) -> ScanState {
        match ch {
            '\'' => ScanState::StringConstant,
            '"' => ScanState::QuotedIdentifier,
            '@' => {
                self.flush_text(pos);
                self.start = pos + 1;
                ScanState::NamedPlaceholder
            }
            '?' => {
                self.flush_text(pos);
                self.push_placeholder(None);
                self.start = pos + 1;
                ScanState::Text
            }
            _ => ScanState::Text,
        }
    }

    /// Emit the pending text run ending at `end`, if it is non-empty.
    fn flush_text(&mut self, end: usize) {
        if end > self.start {
            self.nodes
                .push(StatementNode::Text(self.template[self.start..end].to_string()));
        }
    }

    /// Emit the named placeholder whose name ends at `end`.
    fn close_named(&mut self, end: usize) -> Result<(), ParseError> {
        if end == self.start {
            return Err(ParseError::EmptyNamedPlaceholder {
                position: self.start - 1,
            });
        }

        let name = self.template[self.start..end].to_string();
        self.push_placeholder(Some(name));
        self.start = end;
        Ok(())
    }

    fn push_placeholder(&mut self, name: Option<String>) {
        self.nodes.push(StatementNode::Placeholder {
            ordinal: self.next_ordinal,
            name,
        });
        self.next_ordinal += 1;
    }

    /// Close whatever run is pending at end of input.
    fn finish(mut self, state: ScanState) -> Result<Vec<StatementNode>, ParseError> {
        let end = self.template.len();

        match state {
            ScanState::Text
            | ScanState::StringConstantQuoteSeen
            | ScanState::QuotedIdentifierQuoteSeen => self.flush_text(end),
            ScanState::NamedPlaceholder => self.close_named(end)?,
            ScanState::StringConstant => return Err(ParseError::UnterminatedStringConstant),
            ScanState::QuotedIdentifier => return Err(ParseError::UnterminatedQuotedIdentifier),
        }

        Ok(self.nodes)
    }
}
