//! Rendering properties of composed fragments across dialects.

mod common;

use common::{pg, pg_sql, render_with, text};
use sqlweave_core::{
    sql, Argument, GenericDialect, Identifier, Literal, PositionalDialect, PostgresDialect,
    SqlFragment, SqlServerDialect, SqlValue, SqliteDialect,
};

// =============================================================================
// Parameter-free fragments
// =============================================================================

#[test]
fn no_scalars_means_no_params() {
    let f = sql!(
        "CREATE INDEX {0} ON {1} ({2})",
        SqlFragment::identifier("ix_users_name"),
        SqlFragment::qualified("public", "users"),
        SqlFragment::identifier_list(["last", "first"])
    );
    let (sql, params) = pg(&f);
    assert_eq!(
        sql,
        r#"CREATE INDEX "ix_users_name" ON "public"."users" ("last", "first")"#
    );
    assert!(params.is_empty());
}

#[test]
fn rendering_is_idempotent() {
    let f = sql!(
        "{0} = {1} AND {2} = {3}",
        SqlFragment::identifier("a"),
        1,
        SqlFragment::identifier("b"),
        sql!("lower({0})", "X")
    );
    assert_eq!(pg(&f), pg(&f));
    assert_eq!(f.render(&SqliteDialect), f.render(&SqliteDialect));
}

// =============================================================================
// Identifier escaping
// =============================================================================

#[test]
fn identifier_quote_is_doubled() {
    let f = SqlFragment::identifier("a\"b");
    assert_eq!(pg_sql(&f), "\"a\"\"b\"");
    assert_eq!(render_with(&f, &SqlServerDialect).0, "[a\"b]");
}

#[test]
fn wildcard_is_unquoted() {
    assert_eq!(pg_sql(&SqlFragment::identifier("*")), "*");
}

#[test]
fn literal_quote_is_doubled() {
    let f = SqlFragment::literal("O'Brien");
    assert_eq!(pg_sql(&f), "'O''Brien'");
}

// =============================================================================
// Nesting and joining
// =============================================================================

#[test]
fn join_identifier_and_scalar() {
    let f = SqlFragment::join(", ", [SqlFragment::identifier("a"), SqlFragment::scalar(1)]);
    let (sql, params) = pg(&f);
    assert_eq!(sql, r#""a", $1"#);
    assert_eq!(params, vec![SqlValue::Int(1)]);

    let (sql, _) = render_with(&f, &PositionalDialect);
    assert_eq!(sql, r#""a", {0}"#);
}

#[test]
fn nested_scalars_share_parameter_list() {
    let condition = sql!("{0} BETWEEN {1} AND {2}", SqlFragment::identifier("age"), 18, 65);
    let f = sql!(
        "SELECT * FROM {0} WHERE {1} = {2} AND {3}",
        SqlFragment::identifier("users"),
        SqlFragment::identifier("name"),
        "bob",
        condition
    );
    let (sql, params) = pg(&f);
    assert_eq!(
        sql,
        r#"SELECT * FROM "users" WHERE "name" = $1 AND "age" BETWEEN $2 AND $3"#
    );
    assert_eq!(params, vec![text("bob"), SqlValue::Int(18), SqlValue::Int(65)]);
}

#[test]
fn deeply_nested_order_is_depth_first() {
    let innermost = sql!("{0}", 3);
    let inner = sql!("{0} {1} {2}", 2, innermost, 4);
    let outer = sql!("{0} {1} {2}", 1, inner, 5);
    let (sql, params) = render_with(&outer, &SqlServerDialect);
    assert_eq!(sql, "@p0 @p1 @p2 @p3 @p4");
    assert_eq!(params, (1..=5).map(SqlValue::Int).collect::<Vec<_>>());
}

#[test]
fn generic_dialect_uses_question_marks() {
    let f = sql!("{0}, {1}", 1, None::<String>);
    let (sql, params) = render_with(&f, &GenericDialect);
    assert_eq!(sql, "?, ?");
    assert_eq!(params, vec![SqlValue::Int(1), SqlValue::Null]);
}

// =============================================================================
// Construction
// =============================================================================

#[test]
fn typed_arguments_mix() {
    let f = SqlFragment::try_new(
        "COMMENT ON TABLE {0} IS {1}",
        [
            Argument::from(Identifier::qualified("app", "users")),
            Argument::from(Literal::new("people")),
        ],
    )
    .unwrap();
    assert_eq!(pg_sql(&f), r#"COMMENT ON TABLE "app"."users" IS 'people'"#);
}

#[test]
fn preview_is_unparameterized() {
    let f = sql!(
        "SELECT * FROM {0} WHERE {1} = {2}",
        SqlFragment::identifier("users"),
        SqlFragment::identifier("name"),
        "it's"
    );
    assert_eq!(f.preview(), "SELECT * FROM users WHERE name = 'it''s'");
    assert_eq!(f.to_string(), f.preview());
}

#[test]
fn format_reconstructs_template() {
    let f = SqlFragment::join(
        " AND ",
        [
            sql!("{0} = {1}", SqlFragment::identifier("a"), 1),
            SqlFragment::raw("{x}"),
        ],
    );
    assert_eq!(f.format(), "{0} = {1} AND {{x}}");
    assert_eq!(pg_sql(&f), r#""a" = $1 AND {x}"#);
    assert_eq!(
        SqlFragment::try_new(&f.format(), f.arguments().to_vec()).unwrap(),
        f
    );
}

#[test]
fn postgres_dialect_is_usable_as_trait_object() {
    let dialects: Vec<Box<dyn sqlweave_core::Dialect>> =
        vec![Box::new(PostgresDialect), Box::new(SqliteDialect)];
    let f = SqlFragment::scalar(1);
    let rendered: Vec<String> = dialects
        .iter()
        .map(|d| f.render(d.as_ref()).sql)
        .collect();
    assert_eq!(rendered, vec!["$1", "?"]);
}
