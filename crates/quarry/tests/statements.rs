use quarry::{Builder, Changes, Config, FilterQuery, JoinQuery, Query, Statement, Value};

fn presets() -> Vec<Config> {
    vec![Config::mysql(), Config::postgres(), Config::sqlite()]
}

fn assert_aligned(stmt: &Statement, config: &Config) {
    assert_eq!(
        stmt.placeholder_count(config),
        stmt.args.len(),
        "{}",
        stmt.sql
    );
    assert!(stmt.sql.ends_with(';'), "{}", stmt.sql);
}

fn busy_filter() -> FilterQuery {
    FilterQuery::and_all([
        FilterQuery::eq("status", "active"),
        FilterQuery::or_all([
            FilterQuery::in_list("role", ["admin", "owner"]),
            FilterQuery::not(FilterQuery::like("email", "%@example.com")),
        ]),
        FilterQuery::not_nil("verified_at"),
        FilterQuery::gte("age", 18),
    ])
}

#[test]
fn select_arguments_align_in_every_dialect() {
    for config in presets() {
        let query = Query::new("users")
            .join(
                JoinQuery::new("teams", "teams.id", "users.team_id")
                    .mode("LEFT JOIN"),
            )
            .filter(busy_filter())
            .group(["team_id"])
            .having(FilterQuery::gt("COUNT(id)", 2))
            .sort_asc("team_id")
            .limit(50)
            .offset(100);

        let stmt = Builder::new(&config).find(&query);
        assert_aligned(&stmt, &config);
        assert_eq!(stmt.args.len(), 6);
    }
}

#[test]
fn write_statements_align_in_every_dialect() {
    let changes = Changes::new()
        .set("name", "alice")
        .increment("logins", 1)
        .decrement("credits", 5)
        .set("age", 30);

    for config in presets() {
        let insert = Builder::new(&config).returning("id").insert("users", &changes);
        assert_aligned(&insert, &config);
        assert_eq!(insert.args, vec![Value::from("alice"), Value::Int(30)]);

        let update = Builder::new(&config).update("users", &changes, &busy_filter());
        assert_aligned(&update, &config);
        assert_eq!(update.args.len(), 4 + 5);

        let delete = Builder::new(&config).delete("users", &busy_filter());
        assert_aligned(&delete, &config);
    }
}

#[test]
fn postgres_numbers_are_sequential() {
    let config = Config::postgres();
    let stmt = Builder::new(&config).update(
        "users",
        &Changes::new().set("a", 1).set("b", 2),
        &FilterQuery::in_list("id", [3, 4, 5]),
    );

    let numbers: Vec<usize> = stmt
        .sql
        .split('$')
        .skip(1)
        .map(|rest| {
            rest.chars()
                .take_while(char::is_ascii_digit)
                .collect::<String>()
                .parse()
                .unwrap()
        })
        .collect();
    assert_eq!(numbers, vec![1, 2, 3, 4, 5]);
}

#[test]
fn config_deserializes_with_defaults() {
    let config: Config = serde_json::from_str(r#"{"escape_char":"\"","placeholder":"$","ordinal":true}"#)
        .unwrap();
    assert!(!config.insert_default_values);

    let stmt = Builder::new(&config).find(&Query::new("users").filter(FilterQuery::eq("id", 1)));
    assert_eq!(stmt.sql, r#"SELECT * FROM "users" WHERE "id"=$1;"#);
}

#[test]
fn insert_all_with_sqlite_preset() {
    let config = Config::sqlite();
    let rows = vec![
        Changes::new().set("name", "a"),
        Changes::new().set("age", 2),
    ];
    let stmt = Builder::new(&config).insert_all("users", &["name", "age"], &rows);
    assert_eq!(
        stmt.sql,
        r#"INSERT INTO "users" ("name","age") VALUES (?,DEFAULT),(DEFAULT,?);"#
    );
    assert_aligned(&stmt, &config);
}
