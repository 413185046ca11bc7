use super::*;

#[test]
fn test_clickhouse_parse() {
    let dialect = ClickHouseDialect::new();
    let stmts = dialect
        .parse("SELECT * FROM t1 INNER JOIN t2 USING (id)")
        .unwrap();
    assert_eq!(stmts.len(), 1);
}

#[test]
fn test_generic_parse() {
    let dialect = GenericDialect::new();
    let stmts = dialect.parse("SELECT * FROM users").unwrap();
    assert_eq!(stmts.len(), 1);
}

#[test]
fn test_snowflake_parse() {
    let dialect = SnowflakeDialect::new();
    let stmts = dialect.parse("SELECT * FROM users").unwrap();
    assert_eq!(stmts.len(), 1);
}

#[test]
fn test_quote_ident() {
    let dialect = GenericDialect::new();
    assert_eq!(dialect.quote_ident("user"), "\"user\"");
    assert_eq!(dialect.quote_ident("user\"name"), "\"user\"\"name\"");

    let dialect = ClickHouseDialect::new();
    assert_eq!(dialect.quote_ident("user"), "`user`");
}

#[test]
fn test_parse_error_location() {
    let dialect = GenericDialect::new();
    let result = dialect.parse("SELECT *\nFROM users WHERE )");
    assert!(result.is_err());
    if let Err(crate::error::SqlError::ParseError { line, message, .. }) = result {
        assert_eq!(
            line, 2,
            "Expected line 2, got line {} (message: {})",
            line, message
        );
    }
}

#[test]
fn test_parse_location_extraction() {
    let (line, col) =
        super::parse_location_from_error("Expected: something at Line: 5, Column: 10");
    assert_eq!(line, 5);
    assert_eq!(col, 10);

    let (line, col) = super::parse_location_from_error("Some error without location");
    assert_eq!(line, 0);
    assert_eq!(col, 0);
}
