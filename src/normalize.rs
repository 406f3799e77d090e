//! Quote-aware SQL case normalizer.
//!
//! Upper-cases SQL source outside of quoted spans so the grammar can match
//! keywords case-insensitively, while string and quoted-identifier contents
//! stay byte-identical. Only ASCII letters are folded, which keeps every
//! byte offset stable between the original and normalized text; the
//! extraction passes rely on that to splice verbatim text from the original.

use crate::errors::{line_col, Result, SpliceError};

/// Upper-case `sql` outside quoted spans.
///
/// A span opens at `'`, `"` or `` ` `` and closes at the next occurrence of
/// the same character. Inside a single-quoted span a doubled `''` is an
/// escaped quote: both characters are copied through and the span stays
/// open. An unclosed quote at end of input is an error.
pub fn upper_case_sql(sql: &str) -> Result<String> {
    let mut output = String::with_capacity(sql.len());
    let mut chars = sql.char_indices().peekable();
    let mut open_quote: Option<(char, usize)> = None;

    while let Some((at, c)) = chars.next() {
        match open_quote {
            Some((quote, _)) => {
                output.push(c);
                if c == quote {
                    if quote == '\'' && chars.peek().map(|&(_, next)| next) == Some('\'') {
                        chars.next();
                        output.push('\'');
                    } else {
                        open_quote = None;
                    }
                }
            }
            None => {
                if c == '\'' || c == '"' || c == '`' {
                    open_quote = Some((c, at));
                    output.push(c);
                } else {
                    output.push(c.to_ascii_uppercase());
                }
            }
        }
    }

    if let Some((_, at)) = open_quote {
        let (line, column) = line_col(sql, at);
        return Err(SpliceError::UnterminatedString { line, column });
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folds_keywords_and_keeps_quoted_content() {
        assert_eq!(
            upper_case_sql("select 'aB' from \"Tbl\"").unwrap(),
            "SELECT 'aB' FROM \"Tbl\""
        );
    }

    #[test]
    fn doubled_quote_escape_round_trips() {
        assert_eq!(upper_case_sql("select 'it''s'").unwrap(), "SELECT 'it''s'");
    }

    #[test]
    fn backtick_spans_are_untouched() {
        assert_eq!(
            upper_case_sql("select `col a` from t").unwrap(),
            "SELECT `col a` FROM T"
        );
    }

    #[test]
    fn preserves_byte_length() {
        let sql = "select x from t where y = 'Ünïcode'";
        assert_eq!(upper_case_sql(sql).unwrap().len(), sql.len());
    }

    #[test]
    fn unterminated_quote_is_an_error() {
        let err = upper_case_sql("select 'oops from t").unwrap_err();
        assert!(matches!(
            err,
            SpliceError::UnterminatedString { line: 1, column: 8 }
        ));
    }

    #[test]
    fn trailing_escaped_quote_does_not_close() {
        assert!(upper_case_sql("select 'a''").is_err());
    }
}
