// tests/sql_tests.rs

use querysplice::{SpliceError, SqlStatement};

#[test]
fn detects_simple_asterisk_query() {
    assert!(SqlStatement::new("SELECT * FROM orders").is_simple_asterisk_query());
    assert!(!SqlStatement::new("SELECT id FROM orders").is_simple_asterisk_query());
}

#[test]
fn asterisk_detection_is_lenient_on_bad_input() {
    // An optimization hint: a failed parse answers false, never raises.
    assert!(!SqlStatement::new("not sql at all").is_simple_asterisk_query());
    assert!(!SqlStatement::new("SELECT 'broken FROM t").is_simple_asterisk_query());
}

#[test]
fn keywords_need_a_token_boundary() {
    // A keyword followed by an identifier character is an identifier, and
    // whitespace after a keyword must not defeat the boundary check.
    assert!(SqlStatement::new("SELECT X FROM ORDERS").can_parse());
    assert!(!SqlStatement::new("SELECTX FROM ORDERS").can_parse());
}

#[test]
fn extracts_from_table_path() {
    let session = SqlStatement::new("SELECT * FROM orders");
    assert_eq!(session.extract_table_from().unwrap().as_deref(), Some("orders"));
}

#[test]
fn extracts_multi_segment_table_path_with_original_case() {
    let session = SqlStatement::new("select * from Analytics.Orders o");
    assert_eq!(
        session.extract_table_from().unwrap().as_deref(),
        Some("Analytics.Orders")
    );
}

#[test]
fn extracts_quoted_table_identifier() {
    let session = SqlStatement::new("SELECT * FROM \"Order Items\"");
    assert_eq!(
        session.extract_table_from().unwrap().as_deref(),
        Some("\"Order Items\"")
    );
}

#[test]
fn rewrites_alias_and_qualifies_bare_columns() {
    let session = SqlStatement::new("SELECT * FROM orders o WHERE o.status = 'A' AND total > 10");
    assert_eq!(
        session.extract_where_conditions("x").unwrap(),
        "x.status = 'A' AND x.total > 10"
    );
}

#[test]
fn rewrites_multi_segment_alias_path() {
    let session = SqlStatement::new("SELECT * FROM orders o WHERE o.customer.id = 5");
    assert_eq!(
        session.extract_where_conditions("c").unwrap(),
        "c.customer.id = 5"
    );
}

#[test]
fn leaves_other_aliases_untouched() {
    let session = SqlStatement::new("SELECT * FROM orders o WHERE o.a = 1 AND q.b = 2");
    assert_eq!(
        session.extract_where_conditions("x").unwrap(),
        "x.a = 1 AND q.b = 2"
    );
}

#[test]
fn same_alias_rewrite_is_byte_identical() {
    let session = SqlStatement::new("SELECT * FROM orders t WHERE t.a = 1 AND t.b = 2");
    assert_eq!(
        session.extract_where_conditions("t").unwrap(),
        "t.a = 1 AND t.b = 2"
    );
}

#[test]
fn rewriting_twice_is_a_fixpoint() {
    let first = SqlStatement::new("SELECT * FROM orders o WHERE o.status = 'A' AND total > 10")
        .extract_where_conditions("x")
        .unwrap();
    let again = SqlStatement::new(&format!("SELECT * FROM orders x WHERE {first}"))
        .extract_where_conditions("x")
        .unwrap();
    assert_eq!(first, again);
}

#[test]
fn table_without_alias_uses_last_path_segment() {
    let session = SqlStatement::new("SELECT * FROM orders WHERE orders.id = 1 AND id = 2");
    assert_eq!(
        session.extract_where_conditions("x").unwrap(),
        "x.id = 1 AND x.id = 2"
    );
}

#[test]
fn alias_matching_is_case_insensitive() {
    let session = SqlStatement::new("SELECT * FROM orders O WHERE o.id = 1");
    assert_eq!(session.extract_where_conditions("x").unwrap(), "x.id = 1");
}

#[test]
fn preserves_whitespace_literals_and_operators_verbatim() {
    let session =
        SqlStatement::new("SELECT * FROM orders o WHERE  o.a   =  'A B'  AND  ( b < 2 )");
    assert_eq!(
        session.extract_where_conditions("x").unwrap(),
        "x.a   =  'A B'  AND  ( x.b < 2 )"
    );
}

#[test]
fn function_names_are_not_rewritten() {
    let session = SqlStatement::new("SELECT * FROM orders o WHERE LOWER(status) = 'a'");
    assert_eq!(
        session.extract_where_conditions("x").unwrap(),
        "LOWER(x.status) = 'a'"
    );
}

#[test]
fn missing_where_clause_yields_empty_conditions() {
    let session = SqlStatement::new("SELECT * FROM orders o");
    assert_eq!(session.extract_where_conditions("x").unwrap(), "");
}

#[test]
fn extraction_raises_aggregated_error_on_bad_parse() {
    let session = SqlStatement::new("SELECT FROM WHERE");
    let error = session.extract_where_conditions("x").unwrap_err();
    let SpliceError::Syntax(errors) = &error else {
        panic!("expected aggregated syntax error, got {error:?}");
    };
    assert!(!errors.is_empty());
    // One `line:column message` pair per collected error.
    assert_eq!(error.to_string().lines().count(), errors.len());
    assert!(session.extract_table_from().is_err());
}

#[test]
fn where_clause_with_comment_keeps_it_verbatim() {
    let session =
        SqlStatement::new("SELECT * FROM orders o WHERE o.a = 1 /* keep Me */ AND b = 2");
    assert_eq!(
        session.extract_where_conditions("x").unwrap(),
        "x.a = 1 /* keep Me */ AND x.b = 2"
    );
}

#[test]
fn handles_cast_and_is_null_shapes() {
    let session = SqlStatement::new(
        "SELECT * FROM orders o WHERE CAST(o.total AS int) > 1 AND note IS NOT NULL",
    );
    assert_eq!(
        session.extract_where_conditions("x").unwrap(),
        "CAST(x.total AS int) > 1 AND x.note IS NOT NULL"
    );
}
