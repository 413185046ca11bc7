//! End-to-end join tree scenarios: build, compare, clone, render, resolve

use qt_analyzer::test_utils::{catalog, equals, ident, on_join, table, using_join};
use qt_analyzer::{
    AnalysisError, JoinNode, JoinTreeResolver, QueryTreeBuilder, QueryTreeNode,
    QueryTreeNodeType, RuntimeFilterNode,
};
use qt_sql::{JoinKind, JoinLocality, JoinStrictness, SqlParser, TableJoin};
use std::collections::HashMap;

fn build(sql: &str) -> QueryTreeNode {
    QueryTreeBuilder::default().build_from_sql(sql).unwrap()
}

#[test]
fn inner_join_using_builds_using_list() {
    let tree = build("SELECT * FROM t1 INNER JOIN t2 USING (id)");
    let join = tree.as_join().unwrap();

    assert!(join.is_using_join_expression());
    let list = join.join_expression().unwrap().as_list().unwrap();
    assert_eq!(list.len(), 1);
    let identifier = list.nodes()[0].as_identifier().unwrap();
    assert_eq!(identifier.full_name(), "id");
}

#[test]
fn left_join_on_builds_on_expression() {
    let tree = build("SELECT * FROM t1 LEFT JOIN t2 ON t1.id = t2.id");
    let join = tree.as_join().unwrap();

    assert!(join.is_on_join_expression());
    assert_eq!(join.kind(), JoinKind::Left);
    assert_eq!(
        join.join_expression().unwrap().node_type(),
        QueryTreeNodeType::Function
    );
}

#[test]
fn clone_rewrite_leaves_original_untouched() {
    let original: QueryTreeNode =
        on_join(table("t1"), table("t2"), equals("t1.id", "t2.id"), JoinKind::Inner).into();
    let mut rewritten = original.clone();

    let join = rewritten.as_join_mut().unwrap();
    *join.join_expression_mut().unwrap() = equals("t1.x", "t2.x");

    assert_eq!(
        original.as_join().unwrap().join_expression().unwrap(),
        &equals("t1.id", "t2.id")
    );
    assert_ne!(original, rewritten);
}

#[test]
fn independently_built_joins_are_equal_until_kind_changes() {
    let a: QueryTreeNode = using_join(table("t1"), table("t2"), &["id"], JoinKind::Inner).into();
    let mut b: QueryTreeNode =
        using_join(table("t1"), table("t2"), &["id"], JoinKind::Inner).into();

    assert_eq!(a, b);
    assert_eq!(a.tree_hash(), b.tree_hash());

    let mut cache: HashMap<QueryTreeNode, &str> = HashMap::new();
    cache.insert(a.clone(), "plan");
    assert_eq!(cache.get(&b), Some(&"plan"));

    b.as_join_mut().unwrap().set_kind(JoinKind::Left);
    assert_ne!(a, b);
    assert_ne!(a.tree_hash(), b.tree_hash());
    assert_eq!(cache.get(&b), None);
}

#[test]
fn on_and_using_together_is_structural_error() {
    let builder = QueryTreeBuilder::default();
    let on = SqlParser::clickhouse().parse_expr("a.x = 1").unwrap();
    let clause = TableJoin::new(
        JoinLocality::Unspecified,
        JoinStrictness::Unspecified,
        JoinKind::Inner,
    )
    .with_on(on)
    .with_using(vec![sqlparser::ast::Ident::new("id")]);

    let err = builder
        .build_join(table("t1"), table("t2"), &clause)
        .unwrap_err();
    assert!(err.to_string().starts_with("[AE001]"));
}

#[test]
fn using_unknown_column_is_unresolved() {
    let catalog = catalog(&[("t1", &["id"]), ("t2", &["id"])]);
    let mut tree = build("SELECT * FROM t1 JOIN t2 USING (missing)");
    let err = JoinTreeResolver::new(&catalog)
        .resolve(&mut tree)
        .unwrap_err();
    assert!(matches!(err, AnalysisError::UnresolvedReference { .. }));
    assert!(err.to_string().contains("missing"));
}

#[test]
fn runtime_filter_has_no_syntax() {
    let filter: QueryTreeNode = RuntimeFilterNode::new(3, ident("id")).into();
    assert!(matches!(
        filter.to_syntax(),
        Err(AnalysisError::UnsupportedConstruct { .. })
    ));

    let join: QueryTreeNode = JoinNode::new(
        table("t1"),
        table("t2"),
        Some(filter),
        JoinLocality::Unspecified,
        JoinStrictness::Unspecified,
        JoinKind::Inner,
    )
    .into();
    assert!(matches!(
        join.to_syntax(),
        Err(AnalysisError::UnsupportedConstruct { .. })
    ));
}

#[test]
fn dump_matches_snapshot() {
    let tree = build("SELECT * FROM t1 AS a GLOBAL LEFT JOIN t2 ON a.id = t2.id");
    let expected = "\
JOIN id: 0, locality: GLOBAL, strictness: UNSPECIFIED, kind: LEFT
  LEFT TABLE EXPRESSION
    TABLE id: 1, table_name: t1, alias: a
  RIGHT TABLE EXPRESSION
    TABLE id: 2, table_name: t2
  JOIN EXPRESSION
    FUNCTION id: 3, function_name: equals
      ARGUMENTS
        LIST id: 4, nodes: 2
          IDENTIFIER id: 5, identifier: a.id
          IDENTIFIER id: 6, identifier: t2.id";
    assert_eq!(tree.dump_tree_to_string(), expected);
    assert_eq!(tree.clone().dump_tree_to_string(), expected);
}

#[test]
fn comma_join_renders_back() {
    let tree = build("SELECT * FROM a, b");
    let join = tree.as_join().unwrap();
    assert_eq!(join.kind(), JoinKind::Comma);
    assert!(join.join_expression().is_none());
    assert_eq!(tree.to_string(), "a, b");
}

#[test]
fn rendered_joins_reparse_to_equal_trees() {
    let cases = [
        "SELECT * FROM t1 INNER JOIN t2 USING (id)",
        "SELECT * FROM t1 AS a LEFT JOIN t2 AS b ON a.id = b.id AND a.x > -1",
        "SELECT * FROM t1 RIGHT OUTER JOIN t2 USING (id, ts)",
        "SELECT * FROM t1 FULL OUTER JOIN t2 ON t1.id = t2.id OR t1.x IS NULL",
        "SELECT * FROM t1 CROSS JOIN t2",
        "SELECT * FROM t1 AS a GLOBAL LEFT JOIN t2 AS b ON a.id = b.id",
        "SELECT * FROM t1 LEFT SEMI JOIN t2 ON t1.id = t2.id",
        "SELECT * FROM t1 RIGHT ANTI JOIN t2 USING (id)",
        "SELECT * FROM t1 JOIN t2 USING (id) JOIN t3 ON t3.id = t2.id * 2",
        "SELECT * FROM t1 JOIN (t2 JOIN t3 USING (k)) ON t1.x = t2.x",
        "SELECT * FROM a, b",
        "SELECT * FROM t1 JOIN t2 ON t1.x = -(-t2.y)",
        "SELECT * FROM t1 JOIN t2 ON t1.x = -(-5) AND t1.y = -t2.y",
        "SELECT * FROM t1 ANY LEFT JOIN t2 USING (id)",
        "SELECT * FROM t1 GLOBAL ALL INNER JOIN t2 ON t1.id = t2.id",
        "SELECT * FROM t1 LOCAL ANY RIGHT JOIN t2 USING (id)",
        "SELECT * FROM t1 PASTE JOIN t2",
        "SELECT * FROM t1 ASOF LEFT JOIN t2 ON t1.id = t2.id AND t1.ts >= t2.ts",
        "SELECT * FROM t1 ASOF JOIN t2 ON t1.id = t2.id AND t1.ts >= t2.ts",
        "SELECT * FROM t1 ASOF JOIN t2 USING (id, ts)",
        "SELECT * FROM t1 ALL LEFT JOIN (t2 ANY INNER JOIN t3 USING (k)) ON t1.x = t2.x",
    ];

    for sql in cases {
        let tree = build(sql);
        let rendered = format!("SELECT * FROM {}", tree.to_syntax().unwrap());
        let reparsed = build(&rendered);
        assert_eq!(tree, reparsed, "round trip changed the tree for: {sql} -> {rendered}");
        assert_eq!(tree.tree_hash(), reparsed.tree_hash());
    }
}

#[test]
fn changed_strictness_survives_rendering() {
    let mut tree = build("SELECT * FROM t1 LEFT JOIN t2 USING (id)");
    tree.as_join_mut().unwrap().set_strictness(JoinStrictness::Any);

    let rendered = format!("SELECT * FROM {tree}");
    assert_eq!(rendered, "SELECT * FROM t1 ANY LEFT JOIN t2 USING (id)");
    let reparsed = build(&rendered);
    assert_eq!(reparsed, tree);
    let left = reparsed.as_join().unwrap().left_table_expression();
    assert_eq!(left.as_table().unwrap().alias(), None);
}

#[test]
fn snowflake_asof_join_renders_match_condition() {
    let builder = QueryTreeBuilder::new(SqlParser::snowflake());
    let sql = "SELECT * FROM t1 ASOF JOIN t2 MATCH_CONDITION (t1.ts >= t2.ts) ON t1.id = t2.id";
    let tree = builder.build_from_sql(sql).unwrap();
    let join = tree.as_join().unwrap();
    assert_eq!(join.strictness(), JoinStrictness::Asof);
    assert_eq!(join.kind(), JoinKind::Inner);

    let rendered = format!("SELECT * FROM {}", tree.to_syntax().unwrap());
    assert_eq!(rendered, sql);
    assert_eq!(builder.build_from_sql(&rendered).unwrap(), tree);
}

#[test]
fn comma_join_under_keyword_join_does_not_reparse_silently() {
    let comma = build("SELECT * FROM a, b");
    let tree: QueryTreeNode =
        on_join(comma, table("c"), equals("b.id", "c.id"), JoinKind::Inner).into();
    let rendered = format!("SELECT * FROM {tree}");
    assert_eq!(rendered, "SELECT * FROM (a, b) INNER JOIN c ON b.id = c.id");
    assert!(QueryTreeBuilder::default().build_from_sql(&rendered).is_err());
}

#[test]
fn table_join_clause_matches_expression_form() {
    let using = build("SELECT * FROM t1 JOIN t2 USING (id)");
    let clause = using.as_join().unwrap().to_ast_table_join().unwrap();
    assert_eq!(clause.to_string(), "INNER JOIN USING (id)");

    let on = build("SELECT * FROM t1 JOIN t2 ON t1.id = t2.id");
    let clause = on.as_join().unwrap().to_ast_table_join().unwrap();
    assert_eq!(clause.to_string(), "INNER JOIN ON t1.id = t2.id");
}
