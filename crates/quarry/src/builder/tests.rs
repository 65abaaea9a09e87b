use super::*;
use crate::changes::Changes;
use crate::filter::FilterQuery;
use crate::query::{JoinQuery, Query};

fn mysql() -> Config {
    Config::mysql()
}

fn postgres() -> Config {
    Config::postgres()
}

fn assert_aligned(stmt: &Statement, config: &Config) {
    assert_eq!(
        stmt.placeholder_count(config),
        stmt.args.len(),
        "placeholders and arguments diverge in {}",
        stmt.sql
    );
}

// ==================== Placeholders ====================

#[test]
fn fixed_placeholder_repeats_token() {
    let config = mysql();
    let mut builder = Builder::new(&config);
    assert_eq!(builder.next_placeholder(), "?");
    assert_eq!(builder.next_placeholder(), "?");
}

#[test]
fn ordinal_placeholder_counts_from_one() {
    let config = postgres();
    let mut builder = Builder::new(&config);
    assert_eq!(builder.next_placeholder(), "$1");
    assert_eq!(builder.next_placeholder(), "$2");
    assert_eq!(builder.next_placeholder(), "$3");
}

#[test]
fn each_builder_starts_its_own_count() {
    let config = postgres();
    let filter = FilterQuery::eq("id", 1);

    let first = Builder::new(&config).delete("users", &filter);
    let second = Builder::new(&config).delete("users", &filter);
    assert_eq!(first.sql, second.sql);
    assert_eq!(second.sql, r#"DELETE FROM "users" WHERE "id"=$1;"#);
}

// ==================== Filters ====================

#[test]
fn empty_filter_compiles_to_nothing() {
    let stmt = Builder::new(&mysql()).compile_filter(&FilterQuery::none());
    assert_eq!(stmt.sql, "");
    assert!(stmt.args.is_empty());
}

#[test]
fn single_child_group_has_no_parentheses() {
    let filter = FilterQuery::and_all([FilterQuery::eq("id", 1)]);
    let stmt = Builder::new(&mysql()).compile_filter(&filter);
    assert_eq!(stmt.sql, "`id`=?");
    assert_eq!(stmt.args, vec![Value::Int(1)]);
}

#[test]
fn nested_groups_are_parenthesized() {
    let filter = FilterQuery::and_all([
        FilterQuery::eq("a", 1),
        FilterQuery::or_all([FilterQuery::ne("b", 2), FilterQuery::lt("c", 3)]),
    ]);
    let stmt = Builder::new(&mysql()).compile_filter(&filter);
    assert_eq!(stmt.sql, "(`a`=? AND (`b`<>? OR `c`<?))");
    assert_eq!(stmt.args, vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
}

#[test]
fn not_renders_and_of_children() {
    let filter = FilterQuery::Not(vec![FilterQuery::gte("a", 1), FilterQuery::lte("b", 2)]);
    let stmt = Builder::new(&mysql()).compile_filter(&filter);
    assert_eq!(stmt.sql, "NOT (`a`>=? AND `b`<=?)");

    let single = FilterQuery::not(FilterQuery::gt("a", 1));
    let stmt = Builder::new(&mysql()).compile_filter(&single);
    assert_eq!(stmt.sql, "NOT `a`>?");
}

#[test]
fn nil_checks_take_no_arguments() {
    let filter = FilterQuery::nil("deleted_at").and(FilterQuery::not_nil("users.email"));
    let stmt = Builder::new(&mysql()).compile_filter(&filter);
    assert_eq!(stmt.sql, "(`deleted_at` IS NULL AND `users`.`email` IS NOT NULL)");
    assert!(stmt.args.is_empty());
}

#[test]
fn in_renders_one_placeholder_per_value() {
    let filter = FilterQuery::in_list("id", [1, 2, 3]);
    let stmt = Builder::new(&postgres()).compile_filter(&filter);
    assert_eq!(stmt.sql, r#""id" IN ($1,$2,$3)"#);
    assert_eq!(stmt.args.len(), 3);

    let filter = FilterQuery::not_in("id", ["a"]);
    let stmt = Builder::new(&mysql()).compile_filter(&filter);
    assert_eq!(stmt.sql, "`id` NOT IN (?)");
}

#[test]
fn empty_in_keeps_alignment() {
    let filter = FilterQuery::in_list("id", Vec::<i64>::new());
    let stmt = Builder::new(&mysql()).compile_filter(&filter);
    assert_eq!(stmt.sql, "`id` IN ()");
    assert!(stmt.args.is_empty());
}

#[test]
fn like_and_not_like() {
    let filter = FilterQuery::like("name", "%al%").or(FilterQuery::not_like("name", "b%"));
    let stmt = Builder::new(&mysql()).compile_filter(&filter);
    assert_eq!(stmt.sql, "(`name` LIKE ? OR `name` NOT LIKE ?)");
    assert_eq!(
        stmt.args,
        vec![Value::from("%al%"), Value::from("b%")]
    );
}

#[test]
fn fragment_is_verbatim() {
    let filter = FilterQuery::fragment("age > ? AND age < ?", vec![18.into(), 65.into()]);
    let stmt = Builder::new(&mysql()).compile_filter(&filter);
    assert_eq!(stmt.sql, "age > ? AND age < ?");
    assert_eq!(stmt.args, vec![Value::Int(18), Value::Int(65)]);
}

// ==================== Select ====================

#[test]
fn find_all() {
    let stmt = Builder::new(&mysql()).find(&Query::new("users"));
    assert_eq!(stmt.sql, "SELECT * FROM `users`;");
    assert!(stmt.args.is_empty());
}

#[test]
fn find_distinct_fields() {
    let query = Query::new("users").select(["id", "users.name"]).distinct();
    let stmt = Builder::new(&mysql()).find(&query);
    assert_eq!(stmt.sql, "SELECT DISTINCT `id`,`users`.`name` FROM `users`;");

    let stmt = Builder::new(&mysql()).find(&Query::new("users").distinct());
    assert_eq!(stmt.sql, "SELECT DISTINCT * FROM `users`;");
}

#[test]
fn find_with_every_clause() {
    let query = Query::new("users")
        .select(["id"])
        .join_on("addresses", "addresses.user_id", "users.id")
        .filter(FilterQuery::eq("users.status", "active"))
        .filter(FilterQuery::gt("age", 18))
        .group(["id"])
        .having(FilterQuery::gt("COUNT(id)", 1))
        .sort_asc("name")
        .sort_desc("id")
        .limit(10)
        .offset(20)
        .lock("FOR UPDATE");

    let stmt = Builder::new(&mysql()).find(&query);
    assert_eq!(
        stmt.sql,
        "SELECT `id` FROM `users` JOIN `addresses` ON `addresses`.`user_id`=`users`.`id` \
         WHERE (`users`.`status`=? AND `age`>?) GROUP BY `id` HAVING COUNT(`id`)>? \
         ORDER BY `name` ASC, `id` DESC LIMIT 10 OFFSET 20 FOR UPDATE;"
    );
    assert_eq!(
        stmt.args,
        vec![Value::from("active"), Value::Int(18), Value::Int(1)]
    );
}

#[test]
fn offset_needs_limit() {
    let stmt = Builder::new(&mysql()).find(&Query::new("users").offset(5));
    assert_eq!(stmt.sql, "SELECT * FROM `users`;");

    let stmt = Builder::new(&mysql()).find(&Query::new("users").limit(5));
    assert_eq!(stmt.sql, "SELECT * FROM `users` LIMIT 5;");
}

#[test]
fn join_arguments_precede_filter_arguments() {
    let query = Query::new("users")
        .join(
            JoinQuery::new("orders", "orders.user_id", "users.id")
                .mode("LEFT JOIN")
                .arguments(vec![Value::from("paid")]),
        )
        .filter(FilterQuery::eq("users.id", 7));

    let stmt = Builder::new(&mysql()).find(&query);
    assert_eq!(
        stmt.sql,
        "SELECT * FROM `users` LEFT JOIN `orders` ON `orders`.`user_id`=`users`.`id` \
         WHERE `users`.`id`=?;"
    );
    assert_eq!(stmt.args, vec![Value::from("paid"), Value::Int(7)]);
}

#[test]
fn find_postgres_numbers_where_then_having() {
    let query = Query::new("orders")
        .filter(FilterQuery::eq("status", "paid"))
        .group(["user_id"])
        .having(FilterQuery::gt("SUM(total)", 100));

    let stmt = Builder::new(&postgres()).find(&query);
    assert_eq!(
        stmt.sql,
        r#"SELECT * FROM "orders" WHERE "status"=$1 GROUP BY "user_id" HAVING SUM("total")>$2;"#
    );
    assert_aligned(&stmt, &postgres());
}

#[test]
fn aggregate_count() {
    let stmt = Builder::new(&mysql()).aggregate(&Query::new("users"), "COUNT", "id");
    assert_eq!(stmt.sql, "SELECT COUNT(`id`) AS COUNT FROM `users`;");
}

#[test]
fn aggregate_keeps_group_fields_and_ignores_distinct() {
    let query = Query::new("orders")
        .select(["ignored"])
        .distinct()
        .group(["user_id"])
        .filter(FilterQuery::eq("status", "paid"));

    let stmt = Builder::new(&mysql()).aggregate(&query, "SUM", "total");
    assert_eq!(
        stmt.sql,
        "SELECT `user_id`,SUM(`total`) AS SUM FROM `orders` WHERE `status`=? GROUP BY `user_id`;"
    );
}

// ==================== Insert ====================

#[test]
fn insert_set_columns() {
    let changes = Changes::new().set("name", "alice").set("age", 30);
    let stmt = Builder::new(&mysql()).insert("users", &changes);
    assert_eq!(stmt.sql, "INSERT INTO `users` (`name`,`age`) VALUES (?,?);");
    assert_eq!(stmt.args, vec![Value::from("alice"), Value::Int(30)]);
}

#[test]
fn insert_skips_increment_and_decrement() {
    let changes = Changes::new()
        .increment("score", 1)
        .set("name", "alice")
        .decrement("credits", 2);
    let stmt = Builder::new(&mysql()).insert("users", &changes);
    assert_eq!(stmt.sql, "INSERT INTO `users` (`name`) VALUES (?);");
    assert_eq!(stmt.args, vec![Value::from("alice")]);
}

#[test]
fn insert_fragment_splices_arguments() {
    let changes = Changes::new()
        .set("name", "alice")
        .fragment("`a`,`b`", vec![1.into(), 2.into()]);
    let stmt = Builder::new(&postgres()).insert("users", &changes);
    assert_eq!(
        stmt.sql,
        r#"INSERT INTO "users" ("name",`a`,`b`) VALUES ($1,$2,$3);"#
    );
    assert_eq!(stmt.args.len(), 3);
}

#[test]
fn insert_without_columns() {
    let stmt = Builder::new(&postgres()).insert("users", &Changes::new());
    assert_eq!(stmt.sql, r#"INSERT INTO "users" DEFAULT VALUES;"#);

    let stmt = Builder::new(&mysql()).insert("users", &Changes::new());
    assert_eq!(stmt.sql, "INSERT INTO `users` () VALUES ();");
    assert!(stmt.args.is_empty());
}

#[test]
fn insert_with_only_counters() {
    let changes = Changes::new().increment("score", 1).decrement("credits", 2);

    let stmt = Builder::new(&postgres()).insert("users", &changes);
    assert_eq!(stmt.sql, r#"INSERT INTO "users" DEFAULT VALUES;"#);
    assert!(stmt.args.is_empty());

    let stmt = Builder::new(&mysql()).insert("users", &changes);
    assert_eq!(stmt.sql, "INSERT INTO `users` () VALUES ();");
    assert!(stmt.args.is_empty());
}

#[test]
fn insert_returning() {
    let changes = Changes::new().set("name", "alice");
    let stmt = Builder::new(&postgres())
        .returning("id")
        .insert("users", &changes);
    assert_eq!(
        stmt.sql,
        r#"INSERT INTO "users" ("name") VALUES ($1) RETURNING "id";"#
    );

    let stmt = Builder::new(&postgres())
        .returning("id")
        .insert("users", &Changes::new());
    assert_eq!(stmt.sql, r#"INSERT INTO "users" DEFAULT VALUES RETURNING "id";"#);
}

#[test]
fn insert_all_fills_defaults() {
    let rows = vec![
        Changes::new().set("name", "alice"),
        Changes::new().set("name", "bob").set("age", 30),
    ];
    let stmt = Builder::new(&mysql()).insert_all("users", &["name", "age"], &rows);
    assert_eq!(
        stmt.sql,
        "INSERT INTO `users` (`name`,`age`) VALUES (?,DEFAULT),(?,?);"
    );
    assert_eq!(
        stmt.args,
        vec![Value::from("alice"), Value::from("bob"), Value::Int(30)]
    );
}

#[test]
fn insert_all_only_binds_set_changes() {
    let rows = vec![Changes::new().increment("age", 1).set("name", "carol")];
    let stmt = Builder::new(&postgres())
        .returning("id")
        .insert_all("users", &["name", "age"], &rows);
    assert_eq!(
        stmt.sql,
        r#"INSERT INTO "users" ("name","age") VALUES ($1,DEFAULT) RETURNING "id";"#
    );
    assert_aligned(&stmt, &postgres());
}

// ==================== Update / Delete ====================

#[test]
fn update_with_every_change_kind() {
    let changes = Changes::new()
        .set("name", "alice")
        .increment("score", 5)
        .decrement("credits", 1)
        .fragment("`touched`=?", vec![true.into()]);
    let stmt = Builder::new(&mysql()).update("users", &changes, &FilterQuery::eq("id", 10));

    assert_eq!(
        stmt.sql,
        "UPDATE `users` SET `name`=?,`score`=`score`+?,`credits`=`credits`-?,`touched`=? \
         WHERE `id`=?;"
    );
    assert_eq!(
        stmt.args,
        vec![
            Value::from("alice"),
            Value::Int(5),
            Value::Int(1),
            Value::Bool(true),
            Value::Int(10),
        ]
    );
}

#[test]
fn update_where_continues_set_numbering() {
    let changes = Changes::new().set("name", "alice").set("age", 30);
    let filter = FilterQuery::eq("id", 10).and(FilterQuery::nil("deleted_at"));
    let stmt = Builder::new(&postgres()).update("users", &changes, &filter);

    assert_eq!(
        stmt.sql,
        r#"UPDATE "users" SET "name"=$1,"age"=$2 WHERE ("id"=$3 AND "deleted_at" IS NULL);"#
    );
    assert_aligned(&stmt, &postgres());
}

#[test]
fn update_without_filter_has_no_where() {
    let changes = Changes::new().set("active", false);
    let stmt = Builder::new(&mysql()).update("users", &changes, &FilterQuery::none());
    assert_eq!(stmt.sql, "UPDATE `users` SET `active`=?;");
}

#[test]
fn delete_all_and_filtered() {
    let stmt = Builder::new(&mysql()).delete("users", &FilterQuery::none());
    assert_eq!(stmt.sql, "DELETE FROM `users`;");
    assert!(stmt.args.is_empty());

    let filter = FilterQuery::in_list("id", [1, 2]);
    let stmt = Builder::new(&postgres()).delete("users", &filter);
    assert_eq!(stmt.sql, r#"DELETE FROM "users" WHERE "id" IN ($1,$2);"#);
}

#[test]
fn empty_escape_char_leaves_names_bare() {
    let config = Config::mysql().escape_char("");
    let stmt = Builder::new(&config).find(&Query::new("users").filter(FilterQuery::eq("t.id", 1)));
    assert_eq!(stmt.sql, "SELECT * FROM users WHERE t.id=?;");
}

// ==================== Statement ====================

#[test]
fn placeholder_count_ignores_dollar_without_digits() {
    let stmt = Statement {
        sql: r#"SELECT '$' FROM "t" WHERE "a"=$1 AND "b"=$2;"#.to_string(),
        args: vec![Value::Int(1), Value::Int(2)],
    };
    assert_eq!(stmt.placeholder_count(&postgres()), 2);
}
