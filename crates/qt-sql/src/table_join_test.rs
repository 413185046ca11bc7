use super::*;
use crate::parser::SqlParser;
use sqlparser::ast::{SetExpr, Statement};

fn first_join(parser: &SqlParser, sql: &str) -> Join {
    let stmt = parser.parse_single(sql).unwrap();
    let Statement::Query(query) = stmt else {
        panic!("Expected query");
    };
    let SetExpr::Select(select) = *query.body else {
        panic!("Expected SELECT");
    };
    select.from[0].joins[0].clone()
}

fn table_join(sql: &str) -> TableJoin {
    TableJoin::from_sql_join(&first_join(&SqlParser::clickhouse(), sql)).unwrap()
}

#[test]
fn test_inner_join_using() {
    let join = table_join("SELECT * FROM t1 INNER JOIN t2 USING (id)");
    assert_eq!(join.kind, JoinKind::Inner);
    assert_eq!(join.strictness, JoinStrictness::Unspecified);
    assert_eq!(join.locality, JoinLocality::Unspecified);
    assert!(join.on_expression.is_none());
    let using = join.using_expression_list.unwrap();
    assert_eq!(using.len(), 1);
    assert_eq!(using[0].value, "id");
}

#[test]
fn test_left_join_on() {
    let join = table_join("SELECT * FROM t1 LEFT JOIN t2 ON t1.id = t2.id");
    assert_eq!(join.kind, JoinKind::Left);
    assert!(join.using_expression_list.is_none());
    assert_eq!(join.on_expression.unwrap().to_string(), "t1.id = t2.id");
}

#[test]
fn test_outer_kinds() {
    assert_eq!(
        table_join("SELECT * FROM t1 RIGHT OUTER JOIN t2 ON t1.a = t2.a").kind,
        JoinKind::Right
    );
    assert_eq!(
        table_join("SELECT * FROM t1 FULL OUTER JOIN t2 ON t1.a = t2.a").kind,
        JoinKind::Full
    );
    assert_eq!(
        table_join("SELECT * FROM t1 CROSS JOIN t2").kind,
        JoinKind::Cross
    );
}

#[test]
fn test_global_join() {
    let join = table_join("SELECT * FROM t1 AS a GLOBAL LEFT JOIN t2 AS b ON a.id = b.id");
    assert_eq!(join.locality, JoinLocality::Global);
    assert_eq!(join.kind, JoinKind::Left);
}

#[test]
fn test_semi_and_anti_joins() {
    let join = table_join("SELECT * FROM t1 LEFT SEMI JOIN t2 ON t1.id = t2.id");
    assert_eq!(join.kind, JoinKind::Left);
    assert_eq!(join.strictness, JoinStrictness::Semi);

    let join = table_join("SELECT * FROM t1 RIGHT ANTI JOIN t2 ON t1.id = t2.id");
    assert_eq!(join.kind, JoinKind::Right);
    assert_eq!(join.strictness, JoinStrictness::Anti);
}

#[test]
fn test_natural_join_rejected() {
    let join = first_join(&SqlParser::clickhouse(), "SELECT * FROM t1 NATURAL JOIN t2");
    let result = TableJoin::from_sql_join(&join);
    assert!(matches!(result, Err(SqlError::UnsupportedJoin(_))));
}

#[test]
fn test_keywords_rendering() {
    let join = TableJoin::new(JoinLocality::Global, JoinStrictness::Any, JoinKind::Left);
    assert_eq!(join.keywords(), "GLOBAL ANY LEFT JOIN");

    let join = TableJoin::new(JoinLocality::Unspecified, JoinStrictness::Semi, JoinKind::Right);
    assert_eq!(join.keywords(), "RIGHT SEMI JOIN");

    let join = TableJoin::new(JoinLocality::Local, JoinStrictness::All, JoinKind::Inner);
    assert_eq!(join.keywords(), "LOCAL ALL INNER JOIN");

    let join = TableJoin::new(JoinLocality::Unspecified, JoinStrictness::Asof, JoinKind::Inner);
    assert_eq!(join.keywords(), "ASOF JOIN");

    let join = TableJoin::new(JoinLocality::Unspecified, JoinStrictness::Unspecified, JoinKind::Full);
    assert_eq!(join.keywords(), "FULL OUTER JOIN");

    let join = TableJoin::new(JoinLocality::Unspecified, JoinStrictness::Unspecified, JoinKind::Paste);
    assert_eq!(join.keywords(), "PASTE JOIN");

    assert_eq!(TableJoin::comma().keywords(), ",");
}

#[test]
fn test_constraint_rendering() {
    let join = TableJoin::new(JoinLocality::Unspecified, JoinStrictness::Unspecified, JoinKind::Inner)
        .with_using(vec![Ident::new("id"), Ident::new("ts")]);
    assert_eq!(join.constraint(), " USING (id, ts)");
    assert_eq!(join.to_string(), "INNER JOIN USING (id, ts)");

    let on = SqlParser::clickhouse().parse_expr("a.id = b.id").unwrap();
    let join = TableJoin::new(JoinLocality::Unspecified, JoinStrictness::Unspecified, JoinKind::Left)
        .with_on(on);
    assert_eq!(join.constraint(), " ON a.id = b.id");
    assert!(join.has_constraint());
    assert!(!TableJoin::comma().has_constraint());
}

#[test]
fn test_asof_constraint_rendering() {
    let parser = SqlParser::clickhouse();
    let on = parser.parse_expr("t1.id = t2.id AND t1.ts >= t2.ts").unwrap();

    let join = TableJoin::new(JoinLocality::Unspecified, JoinStrictness::Asof, JoinKind::Inner)
        .with_on(on.clone());
    assert_eq!(
        join.to_string(),
        "ASOF JOIN MATCH_CONDITION (t1.ts >= t2.ts) ON t1.id = t2.id"
    );

    let join = TableJoin::new(JoinLocality::Unspecified, JoinStrictness::Asof, JoinKind::Left)
        .with_on(on);
    assert_eq!(
        join.to_string(),
        "ASOF LEFT JOIN ON t1.id = t2.id AND t1.ts >= t2.ts"
    );

    let single = parser.parse_expr("t1.ts >= t2.ts").unwrap();
    let join = TableJoin::new(JoinLocality::Unspecified, JoinStrictness::Asof, JoinKind::Inner)
        .with_on(single);
    assert_eq!(join.constraint(), " MATCH_CONDITION (t1.ts >= t2.ts)");
}

#[test]
fn test_snowflake_asof_clause_reparses() {
    let parser = SqlParser::snowflake();
    let sql = "SELECT * FROM t1 ASOF JOIN t2 MATCH_CONDITION (t1.ts >= t2.ts) ON t1.id = t2.id";
    let join = TableJoin::from_sql_join(&first_join(&parser, sql)).unwrap();
    assert_eq!(join.strictness, JoinStrictness::Asof);
    assert_eq!(join.kind, JoinKind::Inner);

    let rendered = format!("SELECT * FROM t1 {} t2{}", join.keywords(), join.constraint());
    assert_eq!(rendered, sql);
    let reparsed = TableJoin::from_sql_join(&first_join(&parser, &rendered)).unwrap();
    assert_eq!(reparsed, join);
}

#[test]
fn test_clickhouse_keywords_reparse() {
    let parser = SqlParser::clickhouse();
    let cases = [
        TableJoin::new(JoinLocality::Unspecified, JoinStrictness::Any, JoinKind::Left)
            .with_using(vec![Ident::new("id")]),
        TableJoin::new(JoinLocality::Local, JoinStrictness::All, JoinKind::Inner)
            .with_using(vec![Ident::new("id")]),
        TableJoin::new(JoinLocality::Global, JoinStrictness::Any, JoinKind::Right)
            .with_using(vec![Ident::new("id")]),
        TableJoin::new(JoinLocality::Unspecified, JoinStrictness::Unspecified, JoinKind::Paste),
        TableJoin::new(JoinLocality::Local, JoinStrictness::Asof, JoinKind::Left)
            .with_using(vec![Ident::new("id"), Ident::new("ts")]),
    ];

    for join in cases {
        let rendered = format!("SELECT * FROM t1 {} t2{}", join.keywords(), join.constraint());
        let (statement, keywords) = parser.parse_single_with_join_keywords(&rendered).unwrap();
        let Statement::Query(query) = statement else {
            panic!("Expected query");
        };
        let SetExpr::Select(select) = *query.body else {
            panic!("Expected SELECT");
        };
        assert_eq!(select.from[0].relation.to_string(), "t1", "alias picked up in: {rendered}");
        let reparsed =
            TableJoin::from_sql_join_with_keywords(&select.from[0].joins[0], &keywords).unwrap();
        assert_eq!(reparsed, join, "clause changed for: {rendered}");
    }
}
