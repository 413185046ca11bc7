use super::*;
use crate::test_utils::{equals, func, ident, int, table};
use crate::tree::{ConstantValue, QueryTreeNodeType};
use qt_sql::{JoinKind, JoinLocality, JoinStrictness};

fn build(sql: &str) -> QueryTreeNode {
    QueryTreeBuilder::default().build_from_sql(sql).unwrap()
}

fn build_err(sql: &str) -> AnalysisError {
    QueryTreeBuilder::default().build_from_sql(sql).unwrap_err()
}

fn expression(sql: &str) -> QueryTreeNode {
    QueryTreeBuilder::default()
        .build_expression_from_sql(sql)
        .unwrap()
}

#[test]
fn test_single_table() {
    let tree = build("SELECT * FROM db.events AS e");
    let table = tree.as_table().unwrap();
    assert_eq!(table.name(), "db.events");
    assert_eq!(table.alias(), Some("e"));
    assert_eq!(table.label(), "e");
}

#[test]
fn test_using_join() {
    let tree = build("SELECT * FROM t1 JOIN t2 USING (id)");
    let join = tree.as_join().unwrap();
    assert_eq!(join.kind(), JoinKind::Inner);
    assert_eq!(join.strictness(), JoinStrictness::Unspecified);
    assert_eq!(join.locality(), JoinLocality::Unspecified);
    assert!(join.is_using_join_expression());
    assert_eq!(join.left_table_expression(), &table("t1"));
    assert_eq!(join.right_table_expression(), &table("t2"));

    let list = join.join_expression().unwrap().as_list().unwrap();
    assert_eq!(list.nodes(), &[ident("id")]);
}

#[test]
fn test_on_join() {
    let tree = build("SELECT * FROM t1 AS a LEFT JOIN t2 AS b ON a.id = b.id");
    let join = tree.as_join().unwrap();
    assert_eq!(join.kind(), JoinKind::Left);
    assert!(join.is_on_join_expression());
    assert_eq!(join.join_expression().unwrap(), &equals("a.id", "b.id"));
    assert_eq!(join.left_table_expression().as_table().unwrap().label(), "a");
}

#[test]
fn test_global_semi_join() {
    let tree = build("SELECT * FROM t1 AS a GLOBAL LEFT SEMI JOIN t2 AS b ON a.id = b.id");
    let join = tree.as_join().unwrap();
    assert_eq!(join.locality(), JoinLocality::Global);
    assert_eq!(join.strictness(), JoinStrictness::Semi);
    assert_eq!(join.kind(), JoinKind::Left);
}

#[test]
fn test_clickhouse_join_keywords() {
    let tree = build("SELECT * FROM t1 AS a ANY LEFT JOIN t2 AS b USING (id)");
    let join = tree.as_join().unwrap();
    assert_eq!(join.strictness(), JoinStrictness::Any);
    assert_eq!(join.kind(), JoinKind::Left);
    assert_eq!(join.left_table_expression().as_table().unwrap().alias(), Some("a"));

    let tree = build("SELECT * FROM t1 LOCAL PASTE JOIN t2");
    let join = tree.as_join().unwrap();
    assert_eq!(join.locality(), JoinLocality::Local);
    assert_eq!(join.kind(), JoinKind::Paste);
    assert!(join.join_expression().is_none());

    let err = build_err("SELECT * FROM t1 ANY LEFT SEMI JOIN t2 USING (id)");
    assert!(matches!(err, AnalysisError::Sql(_)));
}

#[test]
fn test_comma_join() {
    let tree = build("SELECT * FROM a, b");
    let join = tree.as_join().unwrap();
    assert_eq!(join.kind(), JoinKind::Comma);
    assert!(join.join_expression().is_none());
    assert_eq!(tree.to_string(), "a, b");
}

#[test]
fn test_joins_fold_left_deep() {
    let tree = build("SELECT * FROM t1 JOIN t2 USING (id) LEFT JOIN t3 USING (id)");
    let outer = tree.as_join().unwrap();
    assert_eq!(outer.kind(), JoinKind::Left);
    let inner = outer.left_table_expression().as_join().unwrap();
    assert_eq!(inner.kind(), JoinKind::Inner);
    assert_eq!(outer.right_table_expression(), &table("t3"));
}

#[test]
fn test_nested_join() {
    let tree = build("SELECT * FROM t1 JOIN (t2 JOIN t3 ON t2.x = t3.x) ON t1.x = t2.x");
    let outer = tree.as_join().unwrap();
    assert_eq!(outer.left_table_expression(), &table("t1"));
    assert_eq!(
        outer.right_table_expression().node_type(),
        QueryTreeNodeType::Join
    );
    assert_eq!(
        tree.to_string(),
        "t1 INNER JOIN (t2 INNER JOIN t3 ON t2.x = t3.x) ON t1.x = t2.x"
    );
}

#[test]
fn test_join_without_condition_rejected() {
    assert!(matches!(
        build_err("SELECT * FROM t1 JOIN t2"),
        AnalysisError::StructuralValidation { .. }
    ));
}

#[test]
fn test_on_and_using_together_rejected() {
    let builder = QueryTreeBuilder::default();
    let on = builder.parser.parse_expr("a.x = 1").unwrap();
    let clause = TableJoin::new(
        JoinLocality::Unspecified,
        JoinStrictness::Unspecified,
        JoinKind::Inner,
    )
    .with_on(on)
    .with_using(vec![sqlparser::ast::Ident::new("id")]);

    let result = builder.build_join(table("t1"), table("t2"), &clause);
    assert!(matches!(
        result,
        Err(AnalysisError::StructuralValidation { .. })
    ));
}

#[test]
fn test_non_select_rejected() {
    assert!(matches!(
        build_err("INSERT INTO t VALUES (1)"),
        AnalysisError::StructuralValidation { .. }
    ));
    assert!(matches!(
        build_err("SELECT 1"),
        AnalysisError::StructuralValidation { .. }
    ));
}

#[test]
fn test_unsupported_table_expressions() {
    assert!(matches!(
        build_err("SELECT * FROM (SELECT 1) AS s"),
        AnalysisError::UnsupportedConstruct { .. }
    ));
    assert!(matches!(
        build_err("SELECT * FROM t1 NATURAL JOIN t2"),
        AnalysisError::Sql(qt_sql::SqlError::UnsupportedJoin(_))
    ));
}

#[test]
fn test_parse_error_propagates() {
    assert!(matches!(
        build_err("SELECT * FROM"),
        AnalysisError::Sql(qt_sql::SqlError::ParseError { .. })
    ));
}

#[test]
fn test_operators_become_functions() {
    assert_eq!(
        expression("(a + b) * c"),
        func(
            "multiply",
            vec![func("plus", vec![ident("a"), ident("b")]), ident("c")]
        )
    );
    assert_eq!(
        expression("NOT x"),
        func("not", vec![ident("x")])
    );
    assert_eq!(
        expression("a IS NOT NULL"),
        func("isNotNull", vec![ident("a")])
    );
}

#[test]
fn test_between() {
    assert_eq!(
        expression("x BETWEEN 1 AND 10"),
        func(
            "and",
            vec![
                func("greaterOrEquals", vec![ident("x"), int(1)]),
                func("lessOrEquals", vec![ident("x"), int(10)]),
            ]
        )
    );
    assert_eq!(
        expression("x NOT BETWEEN 1 AND 10"),
        func(
            "or",
            vec![
                func("less", vec![ident("x"), int(1)]),
                func("greater", vec![ident("x"), int(10)]),
            ]
        )
    );
}

#[test]
fn test_literals() {
    assert_eq!(expression("-5"), int(-5));
    let float = expression("2.5");
    assert_eq!(
        float.as_constant().unwrap().value(),
        &ConstantValue::Float(2.5)
    );
    let string = expression("'abc'");
    assert_eq!(
        string.as_constant().unwrap().value(),
        &ConstantValue::String("abc".to_string())
    );
    assert_eq!(
        expression("-x"),
        func("negate", vec![ident("x")])
    );
}

#[test]
fn test_function_call() {
    assert_eq!(
        expression("intDiv(1, x) > 0"),
        func(
            "greater",
            vec![func("intDiv", vec![int(1), ident("x")]), int(0)]
        )
    );
}

#[test]
fn test_unsupported_expressions() {
    let builder = QueryTreeBuilder::default();
    assert!(matches!(
        builder.build_expression_from_sql("CASE WHEN a THEN 1 END"),
        Err(AnalysisError::UnsupportedConstruct { .. })
    ));
    assert!(matches!(
        builder.build_expression_from_sql("count(DISTINCT a)"),
        Err(AnalysisError::UnsupportedConstruct { .. })
    ));
}
