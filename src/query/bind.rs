//! Binding values to a parsed statement.
//!
//! Binding never touches the database: it produces the final SQL text with
//! every placeholder replaced by the literal encoding of its value.

use crate::error::BindError;
use crate::query::statement::{Statement, StatementNode};
use crate::types::Value;
use std::collections::HashMap;

/// A value supplied for binding, optionally addressed by name.
///
/// A missing or empty name means the value is bound positionally.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedValue {
    pub name: Option<String>,
    pub value: Value,
}

impl NamedValue {
    /// A value for the `@name` placeholders called `name`.
    pub fn named(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: Some(name.into()),
            value: value.into(),
        }
    }

    /// A value for the next `?` placeholder.
    pub fn positional(value: impl Into<Value>) -> Self {
        Self {
            name: None,
            value: value.into(),
        }
    }

    /// The name, if non-empty.
    fn bound_name(&self) -> Option<&str> {
        self.name.as_deref().filter(|name| !name.is_empty())
    }
}

impl Statement {
    /// Bind values to `?` placeholders in order.
    ///
    /// # Errors
    ///
    /// - `PositionalArgCountMismatch` unless exactly one value is supplied per
    ///   `?` placeholder
    /// - `MissingNamedArg` if the template also has `@name` placeholders,
    ///   which positional binding cannot satisfy
    ///
    /// # Example
    ///
    /// ```
    /// use frontbase_rs::query::parse;
    /// use frontbase_rs::Value;
    ///
    /// let stmt = parse("select * from t where c1 = ? and c2 = ?;").unwrap();
    /// let sql = stmt.bind(&[Value::from(42), Value::from("fourty-two")]).unwrap();
    /// assert_eq!(sql, "select * from t where c1 = 42 and c2 = 'fourty-two';");
    /// ```
    pub fn bind(&self, values: &[Value]) -> Result<String, BindError> {
        if values.len() != self.positional_count() {
            return Err(BindError::PositionalArgCountMismatch {
                expected: self.positional_count(),
                got: values.len(),
            });
        }

        let mut positional = values.iter();
        let mut sql = String::with_capacity(self.estimated_len());

        for node in self.nodes() {
            match node {
                StatementNode::Text(text) => sql.push_str(text),
                StatementNode::Placeholder { name: Some(name), .. } => {
                    return Err(BindError::MissingNamedArg { name: name.clone() });
                }
                StatementNode::Placeholder { name: None, .. } => {
                    // Count checked above.
                    if let Some(value) = positional.next() {
                        value.write_sql_literal(&mut sql);
                    }
                }
            }
        }

        Ok(sql)
    }

    /// Bind a mix of named and positional values.
    ///
    /// Named values are matched to `@name` placeholders by name; a name may
    /// be used by several placeholders. Values without a name fill `?`
    /// placeholders in order. If a name is supplied twice, the last value
    /// wins.
    ///
    /// # Errors
    ///
    /// - `NoNamedPlaceholdersInStatement` for the first named value when the
    ///   template has no `@name` placeholders
    /// - `NoPositionalPlaceholdersInStatement` when a positional value is
    ///   supplied but the template has no `?` placeholders
    /// - `PositionalArgCountMismatch` unless the positional values match the
    ///   `?` placeholders one to one
    /// - `MissingNamedArg` for the first placeholder name with no value
    /// - `UnusedNamedArg` for the first supplied name, in input order, that no
    ///   placeholder uses
    pub fn bind_named(&self, values: &[NamedValue]) -> Result<String, BindError> {
        let mut named: HashMap<&str, &Value> = HashMap::with_capacity(values.len());
        let mut positional: Vec<&Value> = Vec::new();

        for arg in values {
            match arg.bound_name() {
                Some(name) => {
                    if !self.has_named_placeholders() {
                        return Err(BindError::NoNamedPlaceholdersInStatement {
                            name: name.to_string(),
                        });
                    }
                    named.insert(name, &arg.value);
                }
                None => {
                    if self.positional_count() == 0 {
                        return Err(BindError::NoPositionalPlaceholdersInStatement);
                    }
                    positional.push(&arg.value);
                }
            }
        }

        if positional.len() != self.positional_count() {
            return Err(BindError::PositionalArgCountMismatch {
                expected: self.positional_count(),
                got: positional.len(),
            });
        }

        let mut positional = positional.into_iter();
        let mut sql = String::with_capacity(self.estimated_len());

        for node in self.nodes() {
            match node {
                StatementNode::Text(text) => sql.push_str(text),
                StatementNode::Placeholder { name: Some(name), .. } => {
                    let value = named
                        .get(name.as_str())
                        .ok_or_else(|| BindError::MissingNamedArg { name: name.clone() })?;
                    value.write_sql_literal(&mut sql);
                }
                StatementNode::Placeholder { name: None, .. } => {
                    if let Some(value) = positional.next() {
                        value.write_sql_literal(&mut sql);
                    }
                }
            }
        }

        let unused = values
            .iter()
            .filter_map(NamedValue::bound_name)
            .find(|name| !self.named_placeholders().iter().any(|used| used == name));

        if let Some(name) = unused {
            return Err(BindError::UnusedNamedArg {
                name: name.to_string(),
            });
        }

        Ok(sql)
    }

    /// Rough output size: template text plus a few bytes per placeholder.
    fn estimated_len(&self) -> usize {
        self.nodes()
            .iter()
            .map(|node| match node {
                StatementNode::Text(text) => text.len(),
                StatementNode::Placeholder { .. } => 8,
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::parse::parse;

    struct Case {
        name: &'static str,
        sql: &'static str,
        values: Vec<NamedValue>,
        expected: Result<&'static str, BindError>,
    }

    fn named(name: &str, value: impl Into<Value>) -> NamedValue {
        NamedValue::named(name, value)
    }

    fn positional(value: impl Into<Value>) -> NamedValue {
        NamedValue::positional(value)
    }

    #[test]
    fn test_bind_named_cases() {
        let cases = vec![
            Case {
                name: "one named value",
                sql: "select * from t where a = @n1;",
                values: vec![named("n1", 42i64)],
                expected: Ok("select * from t where a = 42;"),
            },
            Case {
                name: "two named values",
                sql: "select * from t where a = @n1 and b = @n2;",
                values: vec![named("n1", 42i64), named("n2", "fourty-two")],
                expected: Ok("select * from t where a = 42 and b = 'fourty-two';"),
            },
            Case {
                name: "repeated named values",
                sql: "select * from t where a = @n1 and b = @n1;",
                values: vec![named("n1", 42i64)],
                expected: Ok("select * from t where a = 42 and b = 42;"),
            },
            Case {
                name: "repeated named values, another in-between",
                sql: "select * from t where a = @n1 and b = @n2 and c = @n1;",
                values: vec![named("n1", 42i64), named("n2", "fourty-two")],
                expected: Ok("select * from t where a = 42 and b = 'fourty-two' and c = 42;"),
            },
            Case {
                name: "missing named value",
                sql: "select * from t where a = @n1 and b = @n2;",
                values: vec![named("n1", 42i64)],
                expected: Err(BindError::MissingNamedArg {
                    name: "n2".to_string(),
                }),
            },
            Case {
                name: "named value args but no placeholder",
                sql: "select * from t where a = ?;",
                values: vec![named("n1", 42i64)],
                expected: Err(BindError::NoNamedPlaceholdersInStatement {
                    name: "n1".to_string(),
                }),
            },
            Case {
                name: "too many named value args",
                sql: "select * from t where a = @n1;",
                values: vec![named("n1", 42i64), named("n2", "fourty-two")],
                expected: Err(BindError::UnusedNamedArg {
                    name: "n2".to_string(),
                }),
            },
            Case {
                name: "mixed named and ordinal values",
                sql: "select * from t where a = @n1 and b = ?;",
                values: vec![named("n1", 42i64), positional("fourty-two")],
                expected: Ok("select * from t where a = 42 and b = 'fourty-two';"),
            },
            Case {
                name: "mixed named and ordinal values, reverse order of args",
                sql: "select * from t where a = @n1 and b = ?;",
                values: vec![positional("fourty-two"), named("n1", 42i64)],
                expected: Ok("select * from t where a = 42 and b = 'fourty-two';"),
            },
            Case {
                name: "mixed ordinal and named values",
                sql: "select * from t where a = ? and b = @n1;",
                values: vec![named("n1", 42i64), positional("fourty-two")],
                expected: Ok("select * from t where a = 'fourty-two' and b = 42;"),
            },
            Case {
                name: "one ordinal value",
                sql: "select * from t where a = ?;",
                values: vec![positional("fourty-two")],
                expected: Ok("select * from t where a = 'fourty-two';"),
            },
            Case {
                name: "two ordinal values",
                sql: "select * from t where a = ? and b = ?;",
                values: vec![positional("fourty-two"), positional(42i64)],
                expected: Ok("select * from t where a = 'fourty-two' and b = 42;"),
            },
            Case {
                name: "missing ordinal value",
                sql: "select * from t where a = ? and b = ?;",
                values: vec![positional("fourty-two")],
                expected: Err(BindError::PositionalArgCountMismatch {
                    expected: 2,
                    got: 1,
                }),
            },
            Case {
                name: "ordinal value but no ordinal placeholder",
                sql: "select * from t where a = @n1;",
                values: vec![named("n1", 1), positional(2)],
                expected: Err(BindError::NoPositionalPlaceholdersInStatement),
            },
            Case {
                name: "empty name counts as ordinal",
                sql: "select ?;",
                values: vec![named("", 7)],
                expected: Ok("select 7;"),
            },
            Case {
                name: "last duplicate name wins",
                sql: "select @a;",
                values: vec![named("a", 1), named("a", 2)],
                expected: Ok("select 2;"),
            },
            Case {
                name: "placeholders inside quotes are not bound",
                sql: "select '@a', \"?\" from t where x = @a",
                values: vec![named("a", "v")],
                expected: Ok("select '@a', \"?\" from t where x = 'v'"),
            },
            Case {
                name: "no values for a plain statement",
                sql: "select 1;",
                values: vec![],
                expected: Ok("select 1;"),
            },
        ];

        let mut failures = Vec::new();

        for case in &cases {
            let stmt = parse(case.sql).unwrap();
            let actual = stmt.bind_named(&case.values);
            let expected = case.expected.clone().map(str::to_string);
            if actual != expected {
                failures.push(format!(
                    "case '{}' expected {:?} but got {:?}",
                    case.name, expected, actual
                ));
            }
        }

        assert!(
            failures.is_empty(),
            "{} of {} cases failed:\n{}",
            failures.len(),
            cases.len(),
            failures.join("\n")
        );
    }

    #[test]
    fn test_bind_positional() {
        let stmt = parse("select * from t where c1 = ? and c2 = ?;").unwrap();
        let sql = stmt
            .bind(&[Value::from(42i64), Value::from("fourty-two")])
            .unwrap();
        assert_eq!(sql, "select * from t where c1 = 42 and c2 = 'fourty-two';");
    }

    #[test]
    fn test_bind_positional_count_mismatch() {
        let stmt = parse("select ?, ?").unwrap();

        assert_eq!(
            stmt.bind(&[Value::from(1)]).unwrap_err(),
            BindError::PositionalArgCountMismatch {
                expected: 2,
                got: 1
            }
        );
        assert_eq!(
            stmt.bind(&[Value::from(1), Value::from(2), Value::from(3)])
                .unwrap_err(),
            BindError::PositionalArgCountMismatch {
                expected: 2,
                got: 3
            }
        );
        assert!(stmt.bind(&[Value::from(1), Value::from(2)]).is_ok());
    }

    #[test]
    fn test_bind_positional_with_named_placeholder() {
        let stmt = parse("select ?, @a").unwrap();
        assert_eq!(
            stmt.bind(&[Value::from(1)]).unwrap_err(),
            BindError::MissingNamedArg {
                name: "a".to_string()
            }
        );
    }

    #[test]
    fn test_bind_all_value_kinds() {
        let stmt = parse("values (?, ?, ?, ?, ?, ?)").unwrap();
        let sql = stmt
            .bind(&[
                Value::Null,
                Value::from(true),
                Value::from(-1.5f64),
                Value::from(vec![0xABu8]),
                Value::from("a'b"),
                Value::from(7u16),
            ])
            .unwrap();
        assert_eq!(sql, "values (NULL, true, -1.5, x'ab', 'a''b', 7)");
    }

    #[test]
    fn test_bound_text_is_not_rescanned() {
        let stmt = parse("select ?, ?").unwrap();
        let sql = stmt.bind(&[Value::from("?"), Value::from("@x")]).unwrap();
        assert_eq!(sql, "select '?', '@x'");
    }

    #[test]
    fn test_first_unused_name_in_input_order() {
        let stmt = parse("select @a").unwrap();
        let err = stmt
            .bind_named(&[named("z", 1), named("a", 2), named("b", 3)])
            .unwrap_err();
        assert_eq!(
            err,
            BindError::UnusedNamedArg {
                name: "z".to_string()
            }
        );
    }

    #[test]
    fn test_missing_reported_before_unused() {
        let stmt = parse("select @a, @b").unwrap();
        let err = stmt.bind_named(&[named("a", 1), named("c", 3)]).unwrap_err();
        assert_eq!(
            err,
            BindError::MissingNamedArg {
                name: "b".to_string()
            }
        );
    }

    #[test]
    fn test_statement_reused_across_bindings() {
        let stmt = parse("select @n").unwrap();
        assert_eq!(stmt.bind_named(&[named("n", 1)]).unwrap(), "select 1");
        assert_eq!(stmt.bind_named(&[named("n", "x")]).unwrap(), "select 'x'");
    }

    #[test]
    fn test_concurrent_binding() {
        let stmt = std::sync::Arc::new(parse("select ?").unwrap());
        let handles: Vec<_> = (0..8i64)
            .map(|i| {
                let stmt = std::sync::Arc::clone(&stmt);
                std::thread::spawn(move || stmt.bind(&[Value::from(i)]).unwrap())
            })
            .collect();

        for (i, handle) in handles.into_iter().enumerate() {
            assert_eq!(handle.join().unwrap(), format!("select {}", i));
        }
    }
}
