use mysql2drizzle::ast::{ColumnType, DefaultValue};
use mysql2drizzle::emit::{DrizzleEmitter, Emitter, PostgresEmitter};
use mysql2drizzle::sql::{parse_table, split_items, SqlParseError};
use mysql2drizzle::{convert, Target};

const USERS: &str = r#"
-- MySQL dump
CREATE TABLE IF NOT EXISTS `users` (
  `id` INT NOT NULL AUTO_INCREMENT,
  `email` VARCHAR(255) NOT NULL,
  `display_name` VARCHAR(50) DEFAULT 'anonymous',
  `balance` DECIMAL(10,2) NOT NULL DEFAULT 0.00,
  `is_active` TINYINT(1) NOT NULL DEFAULT 1,
  `status` ENUM('active','inactive','banned') NOT NULL DEFAULT 'active',
  `team_id` INT,
  `created_at` DATETIME NOT NULL,
  `updated_at` TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP ON UPDATE CURRENT_TIMESTAMP,
  `deleted_at` DATETIME NULL,
  PRIMARY KEY (`id`),
  UNIQUE KEY `uk_email` (`email`),
  KEY `idx_team` (`team_id`),
  CONSTRAINT `fk_team` FOREIGN KEY (`team_id`) REFERENCES `teams` (`id`) ON DELETE SET NULL
) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4 COLLATE=utf8mb4_unicode_ci;
"#;

#[test]
fn test_splitter_keeps_parenthesized_commas() {
    let items = split_items("price DECIMAL(10,2), kind ENUM('a','b'), note TEXT");
    assert_eq!(
        items,
        vec!["price DECIMAL(10,2)", "kind ENUM('a','b')", "note TEXT"]
    );
}

#[test]
fn test_identity_column_is_integer_primary() {
    let table = parse_table("CREATE TABLE t (id VARCHAR(10) AUTO_INCREMENT PRIMARY KEY)")
        .unwrap()
        .table;
    let id = table.column("id").unwrap();
    assert_eq!(id.typ, ColumnType::Integer);
    assert!(id.identity);
    assert!(id.primary);
}

#[test]
fn test_varchar_not_null() {
    let table = parse_table("CREATE TABLE t (name VARCHAR(50) NOT NULL)").unwrap().table;
    let name = table.column("name").unwrap();
    assert_eq!(name.typ, ColumnType::Varchar { length: 50 });
    assert!(name.not_null);
}

#[test]
fn test_untyped_primary_key_asymmetry() {
    let column_level = parse_table("CREATE TABLE t (code PRIMARY KEY)").unwrap().table;
    assert_eq!(column_level.column("code").unwrap().typ, ColumnType::Integer);

    let table_level = parse_table("CREATE TABLE t (code, PRIMARY KEY (code))").unwrap().table;
    assert_eq!(
        table_level.column("code").unwrap().typ,
        ColumnType::Varchar { length: 200 }
    );
    assert!(table_level.column("code").unwrap().primary);
}

#[test]
fn test_composite_primary_key() {
    let table = parse_table("CREATE TABLE t (a INT, b INT, PRIMARY KEY (a, b))")
        .unwrap()
        .table;
    assert_eq!(table.primary_key.as_ref().unwrap().columns, vec!["a", "b"]);
    assert!(table.columns.iter().all(|c| !c.primary));

    let drizzle = DrizzleEmitter::default().emit(&table);
    let postgres = PostgresEmitter::default().emit(&table);
    assert_eq!(drizzle.matches("primaryKey({").count(), 1);
    assert_eq!(postgres.matches("PRIMARY KEY (").count(), 1);
}

#[test]
fn test_enum_registered_once_before_table() {
    let table = parse_table("CREATE TABLE t (status ENUM('active','inactive'))")
        .unwrap()
        .table;
    assert_eq!(table.enums.len(), 1);
    assert_eq!(table.enums[0].values, vec!["active", "inactive"]);
    assert_eq!(
        table.column("status").unwrap().typ,
        ColumnType::Enum {
            name: table.enums[0].name.clone()
        }
    );

    let drizzle = DrizzleEmitter::default().emit(&table);
    assert_eq!(drizzle.matches("pgEnum(\"status_enum\"").count(), 1);
    assert!(drizzle.find("pgEnum(\"status_enum\"").unwrap() < drizzle.find("pgTable(\"t\"").unwrap());

    let postgres = PostgresEmitter::default().emit(&table);
    assert_eq!(postgres.matches("CREATE TYPE").count(), 1);
    assert!(postgres.find("CREATE TYPE").unwrap() < postgres.find("CREATE TABLE").unwrap());
}

#[test]
fn test_update_trigger_rendered_once() {
    let conversion = convert(
        "CREATE TABLE posts (id INT, updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP ON UPDATE CURRENT_TIMESTAMP)",
    );
    assert_eq!(conversion.postgres.matches("CREATE OR REPLACE FUNCTION").count(), 1);
    assert_eq!(conversion.postgres.matches("CREATE TRIGGER").count(), 1);
    assert!(conversion.postgres.contains("BEFORE UPDATE ON \"posts\""));
    assert!(!conversion.drizzle.contains("TRIGGER"));
}

#[test]
fn test_missing_column_block_is_placeholder() {
    assert_eq!(
        parse_table("CREATE TABLE orphan").unwrap_err(),
        SqlParseError::MissingColumnBlock {
            table: "orphan".to_string()
        }
    );
    let conversion = convert("CREATE TABLE orphan");
    assert!(conversion.drizzle.starts_with("// Failed to parse table definition for orphan"));
    assert!(conversion.postgres.starts_with("-- Failed to parse table definition for orphan"));

    let conversion = convert("CREATE TABLE t (id INT, name VARCHAR(10)");
    assert!(conversion.postgres.starts_with("-- Failed to parse columns for t"));
}

#[test]
fn test_renderers_agree_on_nullability_and_defaults() {
    let table = parse_table(
        "CREATE TABLE t (a INT NOT NULL DEFAULT 7, b VARCHAR(20) DEFAULT 'x', c TEXT NOT NULL, d BOOLEAN DEFAULT 0, e INT)",
    )
    .unwrap()
    .table;
    let drizzle = DrizzleEmitter::default().emit(&table);
    let postgres = PostgresEmitter::default().emit(&table);

    for column in &table.columns {
        let orm_line = drizzle
            .lines()
            .find(|l| l.trim_start().starts_with(&format!("{}:", column.name)))
            .unwrap();
        let ddl_line = postgres
            .lines()
            .find(|l| l.trim_start().starts_with(&format!("\"{}\"", column.name)))
            .unwrap();
        assert_eq!(
            orm_line.contains(".notNull()"),
            ddl_line.contains("NOT NULL"),
            "not-null mismatch for {}",
            column.name
        );
        assert_eq!(
            orm_line.contains(".default"),
            ddl_line.contains("DEFAULT"),
            "default mismatch for {}",
            column.name
        );
    }
    assert_eq!(table.column("d").unwrap().default, Some(DefaultValue::Bool(false)));
}

#[test]
fn test_full_mysql_dump_table() {
    let conversion = convert(USERS);
    assert_eq!(conversion.table, "users");
    assert!(conversion.diagnostics.is_empty(), "{:?}", conversion.diagnostics);

    let drizzle = &conversion.drizzle;
    assert!(drizzle.contains("export const statusEnum = pgEnum(\"status_enum\", [\"active\", \"inactive\", \"banned\"]);"));
    assert!(drizzle.contains("export const users = pgTable(\"users\", {"));
    assert!(drizzle.contains("  id: integer(\"id\").notNull().primaryKey().generatedAlwaysAsIdentity(),"));
    assert!(drizzle.contains("  display_name: varchar(\"display_name\", { length: 50 }).default(\"anonymous\"),"));
    assert!(drizzle.contains("  balance: numeric(\"balance\", { precision: 10, scale: 2 }).default(0.00).notNull(),"));
    assert!(drizzle.contains("  is_active: boolean(\"is_active\").default(true).notNull(),"));
    assert!(drizzle.contains("  team_id: integer(\"team_id\").references(() => teams.id, { onDelete: \"set null\" }),"));
    assert!(drizzle.contains("  created_at: timestamp(\"created_at\").defaultNow(),"));
    assert!(drizzle.contains("  deleted_at: timestamp(\"deleted_at\"),"));
    assert!(!drizzle.contains("uk_email"));

    let postgres = &conversion.postgres;
    assert!(postgres.contains("CREATE TYPE \"status_enum\" AS ENUM ('active', 'inactive', 'banned');"));
    assert!(postgres.contains("\t\"team_id\" INTEGER REFERENCES \"teams\"(\"id\") ON DELETE SET NULL"));
    assert!(postgres.contains("\t\"updated_at\" TIMESTAMP DEFAULT now() NOT NULL"));
    assert!(!postgres.contains("ENGINE"));
    assert!(!postgres.contains("utf8mb4"));
    assert_eq!(postgres.matches("CREATE TRIGGER").count(), 1);
}

#[test]
fn test_unrecognized_item_is_reported() {
    let conversion = convert("CREATE TABLE t (id INT, 42 nonsense)");
    assert_eq!(conversion.diagnostics.len(), 1);
    assert!(conversion.diagnostics[0].contains("42 nonsense"));
    assert!(conversion.postgres.contains("\"id\" INTEGER"));
}

#[test]
fn test_render_both_targets() {
    let conversion = convert("CREATE TABLE t (id INT)");
    let both = conversion.render(Target::Both);
    assert!(both.contains(&conversion.drizzle));
    assert!(both.contains(&conversion.postgres));
}

#[test]
fn test_charset_named_columns_and_literals_survive() {
    let conversion = convert(
        "CREATE TABLE langs (id INT, charset VARCHAR(20) NOT NULL, collate VARCHAR(20), note VARCHAR(40) DEFAULT 'please collate items' COLLATE utf8_bin)",
    );
    assert!(conversion.diagnostics.is_empty(), "{:?}", conversion.diagnostics);
    assert!(conversion.drizzle.contains("  charset: varchar(\"charset\", { length: 20 }).notNull(),"));
    assert!(conversion.drizzle.contains("  collate: varchar(\"collate\", { length: 20 }),"));
    assert!(conversion.drizzle.contains(".default(\"please collate items\")"));
    assert!(conversion.postgres.contains("DEFAULT 'please collate items'"));
}

#[test]
fn test_keyword_named_columns_are_kept() {
    let conversion = convert("CREATE TABLE t (id INT, key ENUM('a','b'), check JSON, KEY idx_id (id))");
    assert!(conversion.diagnostics.is_empty(), "{:?}", conversion.diagnostics);
    assert!(conversion.drizzle.contains("  key: keyEnum(\"key\"),"));
    assert!(conversion.drizzle.contains("  check: text(\"check\"),"));
    assert!(!conversion.drizzle.contains("idx_id"));
}

#[test]
fn test_default_word_inside_comment_is_not_a_default() {
    let table = parse_table("CREATE TABLE t (note TEXT COMMENT 'DEFAULT 5')").unwrap().table;
    assert_eq!(table.column("note").unwrap().default, None);
    let conversion = convert("CREATE TABLE t (note TEXT COMMENT 'DEFAULT 5')");
    assert!(!conversion.drizzle.contains(".default("));
    assert!(!conversion.postgres.contains("DEFAULT"));
}

#[test]
fn test_identity_inside_composite_key_declares_one_primary_key() {
    let conversion = convert(
        "CREATE TABLE events (id INT NOT NULL AUTO_INCREMENT, day DATE NOT NULL, PRIMARY KEY (id, day))",
    );
    let postgres = &conversion.postgres;
    assert!(postgres.contains("\t\"id\" INTEGER NOT NULL GENERATED ALWAYS AS IDENTITY,"));
    assert!(postgres.contains("\tPRIMARY KEY (\"id\", \"day\")"));
    assert_eq!(postgres.matches("PRIMARY KEY").count(), 1);

    let drizzle = &conversion.drizzle;
    assert!(drizzle.contains("  id: integer(\"id\").notNull().generatedAlwaysAsIdentity(),"));
    assert!(!drizzle.contains(".primaryKey()"));
    assert_eq!(drizzle.matches("pk: primaryKey({").count(), 1);
}

#[test]
fn test_foreign_key_on_unknown_column_is_not_rendered() {
    let conversion = convert("CREATE TABLE t (a INT, FOREIGN KEY (ghost) REFERENCES o(id))");
    assert!(!conversion.drizzle.contains("ghost"));
    assert!(!conversion.postgres.contains("ghost"));
    assert!(!conversion.postgres.contains("FOREIGN KEY"));
    assert_eq!(conversion.diagnostics.len(), 1);
    assert!(conversion.diagnostics[0].contains("ghost"));
}

#[test]
fn test_double_quoted_table_name() {
    let conversion = convert(r#"CREATE TABLE "users" ("id" INT)"#);
    assert_eq!(conversion.table, "users");
    assert!(conversion.diagnostics.is_empty());
    assert!(conversion.postgres.starts_with("CREATE TABLE \"users\" ("));
}
