//! SQL extraction and rewriting for query pushdown.
//!
//! A [`SqlStatement`] session owns one source string and one immutable error
//! log. Construction runs the quote-aware upper-caser as a pre-pass and
//! parses the normalized text; the normalizer is byte-length preserving, so
//! every span reported by the parse indexes identically into the original
//! string. Extraction reads structure from the normalized tree and splices
//! verbatim text (case, whitespace, comments intact) from the original.

mod rewrite;

use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;

use crate::errors::{Result, SpliceError, SyntaxError};
use crate::normalize::upper_case_sql;
use rewrite::RewriteCursor;

#[derive(Parser)]
#[grammar = "sql/grammar.pest"]
struct GenericSqlParser;

/// One parsing session over a single SQL statement.
pub struct SqlStatement {
    sql: String,
    normalized: Option<String>,
    errors: Vec<SyntaxError>,
}

impl SqlStatement {
    pub fn new(sql: impl Into<String>) -> Self {
        let sql = sql.into();
        let mut errors = Vec::new();
        let normalized = match upper_case_sql(&sql) {
            Ok(normalized) => Some(normalized),
            Err(SpliceError::UnterminatedString { line, column }) => {
                errors.push(SyntaxError {
                    message: "unterminated string literal".into(),
                    line,
                    column,
                });
                None
            }
            Err(error) => {
                errors.push(SyntaxError {
                    message: error.to_string(),
                    line: 1,
                    column: 1,
                });
                None
            }
        };
        if let Some(normalized) = &normalized {
            if let Err(error) = GenericSqlParser::parse(Rule::statement, normalized) {
                errors.push(SyntaxError::from_pest(&error));
            }
        }
        Self {
            sql,
            normalized,
            errors,
        }
    }

    /// True iff the session's error log is empty.
    pub fn can_parse(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn syntax_errors(&self) -> &[SyntaxError] {
        &self.errors
    }

    /// Fails with one aggregated error listing every collected syntax error,
    /// one `line:column message` per line; no-op when the log is empty.
    pub fn check_errors(&self) -> Result<()> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(SpliceError::Syntax(self.errors.clone()))
        }
    }

    /// True iff the statement is a plain `SELECT * FROM ...` whose select
    /// list is exactly the asterisk. Deliberately lenient: a failed parse
    /// answers false rather than raising, since this is an optimization hint
    /// that is safe to under-report.
    pub fn is_simple_asterisk_query(&self) -> bool {
        if !self.can_parse() {
            return false;
        }
        let Some(query) = self.normalized.as_deref().and_then(query_pair) else {
            return false;
        };
        query
            .into_inner()
            .find(|part| part.as_rule() == Rule::select_fields)
            .map(|fields| fields.as_str().trim() == "*")
            .unwrap_or(false)
    }

    /// Source text of the FROM clause's base table identifier path, or None
    /// when no query is present.
    pub fn extract_table_from(&self) -> Result<Option<String>> {
        self.check_errors()?;
        let Some(query) = self.normalized.as_deref().and_then(query_pair) else {
            return Ok(None);
        };
        let id_path = descendant(query, Rule::alias_field)
            .and_then(|alias_field| alias_field.into_inner().find(|p| p.as_rule() == Rule::id_path));
        Ok(id_path.map(|path| self.original_text(&path).to_string()))
    }

    /// The WHERE-clause source text, with identifier paths rooted at the
    /// FROM-clause alias rewritten to `replacement_alias` and bare columns
    /// qualified with it. Everything outside rewritten paths is
    /// byte-identical to the input. A statement without a WHERE clause
    /// yields an empty string.
    pub fn extract_where_conditions(&self, replacement_alias: &str) -> Result<String> {
        self.check_errors()?;
        let Some(query) = self.normalized.as_deref().and_then(query_pair) else {
            return Ok(String::new());
        };

        let mut original_alias = None;
        let mut conditions = None;
        for part in query.into_inner() {
            match part.as_rule() {
                Rule::from_tables => {
                    original_alias = descendant(part, Rule::alias_field).and_then(trailing_alias);
                }
                Rule::where_clause => {
                    conditions = part.into_inner().find(|p| p.as_rule() == Rule::bool_exp);
                }
                _ => {}
            }
        }
        let Some(conditions) = conditions else {
            return Ok(String::new());
        };
        let Some(original_alias) = original_alias else {
            // No resolvable FROM alias; hand back the clause untouched.
            return Ok(self.original_text(&conditions).to_string());
        };

        let span = conditions.as_span();
        let mut cursor = RewriteCursor::new(&self.sql, span.start(), span.end());
        for path in id_paths(conditions) {
            let segments: Vec<Pair<Rule>> = path.clone().into_inner().collect();
            let path_span = path.as_span();
            cursor.copy_to(path_span.start());

            let head = segments.first().map(|s| s.as_str()).unwrap_or_default();
            if head == original_alias {
                // Drop the matched alias, keep the remaining segments.
                let mut rewritten = replacement_alias.to_string();
                for segment in &segments[1..] {
                    rewritten.push('.');
                    rewritten.push_str(self.original_text(segment));
                }
                cursor.replace_to(path_span.end(), &rewritten);
            } else if segments.len() == 1 {
                // Qualify a bare column with the new alias.
                let rewritten =
                    format!("{}.{}", replacement_alias, self.original_text(&segments[0]));
                cursor.replace_to(path_span.end(), &rewritten);
            } else {
                // Qualified by some other alias; keep verbatim.
                cursor.copy_to(path_span.end());
            }
        }
        Ok(cursor.finish())
    }

    /// Slice of the original (un-normalized) source covered by a pair parsed
    /// from the normalized text. Valid because normalization preserves byte
    /// offsets.
    fn original_text(&self, pair: &Pair<Rule>) -> &str {
        let span = pair.as_span();
        &self.sql[span.start()..span.end()]
    }
}

/// Re-parse the normalized text and locate the query node. Sessions re-parse
/// per operation instead of storing the tree, which would borrow from the
/// session's own string.
fn query_pair(normalized: &str) -> Option<Pair<'_, Rule>> {
    let statement = GenericSqlParser::parse(Rule::statement, normalized)
        .ok()?
        .next()?;
    statement
        .into_inner()
        .find(|part| part.as_rule() == Rule::query)
}

fn descendant(pair: Pair<'_, Rule>, rule: Rule) -> Option<Pair<'_, Rule>> {
    if pair.as_rule() == rule {
        return Some(pair);
    }
    pair.into_inner().find_map(|inner| descendant(inner, rule))
}

/// The trailing identifier of a FROM-clause alias field: the explicit alias
/// when present, else the last segment of the base identifier path. Returned
/// as normalized text so alias matching is case-insensitive.
fn trailing_alias(alias_field: Pair<'_, Rule>) -> Option<String> {
    let mut id_path = None;
    let mut explicit = None;
    for part in alias_field.into_inner() {
        match part.as_rule() {
            Rule::id_path => id_path = Some(part),
            Rule::identifier => explicit = Some(part),
            _ => {}
        }
    }
    if let Some(alias) = explicit {
        return Some(alias.as_str().to_string());
    }
    id_path?
        .into_inner()
        .filter(|part| part.as_rule() == Rule::identifier)
        .last()
        .map(|segment| segment.as_str().to_string())
}

/// Every identifier path inside the subtree, in document order.
fn id_paths(pair: Pair<'_, Rule>) -> Vec<Pair<'_, Rule>> {
    let mut found = Vec::new();
    collect_id_paths(pair, &mut found);
    found
}

fn collect_id_paths<'a>(pair: Pair<'a, Rule>, found: &mut Vec<Pair<'a, Rule>>) {
    if pair.as_rule() == Rule::id_path {
        found.push(pair);
        return;
    }
    for inner in pair.into_inner() {
        collect_id_paths(inner, found);
    }
}
