use super::*;

#[test]
fn test_parse_select() {
    let parser = SqlParser::clickhouse();
    let stmts = parser
        .parse("SELECT id FROM t1 LEFT JOIN t2 ON t1.id = t2.id")
        .unwrap();
    assert_eq!(stmts.len(), 1);
}

#[test]
fn test_parse_multiple_statements() {
    let parser = SqlParser::generic();
    let stmts = parser.parse("SELECT 1; SELECT 2;").unwrap();
    assert_eq!(stmts.len(), 2);
}

#[test]
fn test_parse_empty() {
    let parser = SqlParser::clickhouse();
    let result = parser.parse("   ");
    assert!(matches!(result, Err(SqlError::EmptySql)));
}

#[test]
fn test_parse_error() {
    let parser = SqlParser::clickhouse();
    let result = parser.parse("SELECT FROM");
    assert!(result.is_err());
}

#[test]
fn test_parse_expr() {
    let parser = SqlParser::clickhouse();
    let expr = parser.parse_expr("t1.id = t2.id").unwrap();
    assert!(matches!(expr, Expr::BinaryOp { .. }));

    assert!(matches!(parser.parse_expr(""), Err(SqlError::EmptySql)));
}

#[test]
fn test_from_dialect_name() {
    let parser = SqlParser::from_dialect_name("ClickHouse").unwrap();
    assert_eq!(parser.dialect_name(), "clickhouse");

    let parser = SqlParser::from_dialect_name("snowflake").unwrap();
    assert_eq!(parser.dialect_name(), "snowflake");

    let result = SqlParser::from_dialect_name("unknown");
    assert!(matches!(result, Err(SqlError::UnknownDialect(_))));
}
