//! Item classification and column field extraction.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use super::default::parse_default;
use super::enums::split_enum_values;
use super::normalize::normalize;
use super::resolve::TableBuilder;
use super::scan::{extract_header, mask_literals, paren_group, split_items};
use super::types::{find_base_type, leading_base_type, BaseType};
use crate::ast::{DefaultValue, ForeignKey, Reference, ReferentialAction, Table};
use crate::config::ConvertOptions;

/// Structural failure: no table model can be built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SqlParseError {
    #[error("Failed to parse table definition for {table}")]
    MissingColumnBlock { table: String },
    #[error("Failed to parse columns for {table}")]
    UnbalancedColumnBlock { table: String },
}

/// Non-fatal findings; the conversion still completes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Diagnostic {
    #[error("no CREATE TABLE header found, using table name `unknown`")]
    MissingTableName,
    #[error("dropped unrecognized item: {0}")]
    UnrecognizedItem(String),
    #[error("key names unknown column `{0}`")]
    UnknownKeyColumn(String),
    #[error("column `{0}` declared more than once, keeping the last definition")]
    DuplicateColumn(String),
}

/// Resolved table plus the diagnostics gathered while building it.
#[derive(Debug, Clone, PartialEq)]
pub struct Parsed {
    pub table: Table,
    pub diagnostics: Vec<Diagnostic>,
}

/// One top-level entry of the column/constraint block.
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    PrimaryKey(Vec<String>),
    ForeignKey(ForeignKey),
    Column(ColumnDef),
    /// Secondary indexes and checks, which have no mapping.
    Ignored(String),
    Unrecognized(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDef {
    pub name: String,
    pub fields: ColumnFields,
}

/// Everything the field extractors found in a column remainder.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ColumnFields {
    pub enum_values: Option<Vec<String>>,
    pub reference: Option<Reference>,
    pub default: Option<DefaultValue>,
    pub not_null: bool,
    pub primary: bool,
    pub identity: bool,
    pub base_type: Option<BaseType>,
    pub on_update_now: bool,
}

impl ColumnFields {
    /// Run every extractor over the same remainder. Each looks for its own
    /// marker anywhere, so clause order in the source does not matter.
    pub fn extract(remainder: &str) -> Self {
        let masked = mask_literals(remainder);
        Self {
            enum_values: extract_enum(remainder, &masked),
            reference: extract_reference(&masked),
            default: parse_default(remainder),
            not_null: NOT_NULL.is_match(&masked),
            primary: PRIMARY_KEY.is_match(&masked),
            identity: IDENTITY.is_match(&masked),
            base_type: find_base_type(&masked),
            on_update_now: ON_UPDATE_NOW.is_match(&masked),
        }
    }
}

static TABLE_PRIMARY_KEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:CONSTRAINT\s+\w+\s+)?PRIMARY\s+KEY\s*(?:USING\s+\w+\s*)?\(")
        .expect("primary key pattern")
});
static TABLE_FOREIGN_KEY_START: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:CONSTRAINT\s+\w+\s+)?FOREIGN\s+KEY\b").expect("foreign key pattern")
});
static TABLE_FOREIGN_KEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)FOREIGN\s+KEY\s*(?:\w+\s*)?\(([^)]*)\)\s*REFERENCES\s+(?:\w+\s*\.\s*)?(\w+)\s*\(([^)]*)\)(.*)$",
    )
    .expect("foreign key pattern")
});
static INDEX_KEYWORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(CONSTRAINT|UNIQUE|KEY|INDEX|FULLTEXT|SPATIAL|CHECK)\b\s*(.*)$")
        .expect("index keyword pattern")
});
/// `(cols)`, `KEY ...` or `INDEX ...` after the keyword.
static INDEX_BODY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(?:\(|(?:KEY|INDEX)\b)").expect("index body pattern"));
/// `name (cols)` or `name USING BTREE (cols)` after the keyword.
static NAMED_INDEX_BODY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^([A-Za-z_]\w*)\s*(?:USING\s+\w+\s*)?\(").expect("index body pattern")
});
/// `CONSTRAINT name UNIQUE ...` / `CONSTRAINT name CHECK ...`
static NAMED_CONSTRAINT_BODY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[A-Za-z_]\w*\s+(?:UNIQUE|CHECK)\b").expect("constraint body pattern")
});
static COLUMN_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^"?([A-Za-z_][\w$]*)"?$"#).expect("column name pattern"));

static ENUM_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bENUM\s*\(").expect("enum pattern"));
static REFERENCES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bREFERENCES\s+(?:\w+\s*\.\s*)?(\w+)\s*(?:\(\s*(\w+)[^)]*\))?")
        .expect("references pattern")
});
static ON_DELETE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bON\s+DELETE\s+(CASCADE|SET\s+NULL|RESTRICT|NO\s+ACTION)\b")
        .expect("on delete pattern")
});
static ON_UPDATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bON\s+UPDATE\s+(CASCADE|SET\s+NULL|RESTRICT|NO\s+ACTION)\b")
        .expect("on update pattern")
});
static ON_UPDATE_NOW: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bON\s+UPDATE\s+(?:CURRENT_TIMESTAMP|LOCALTIMESTAMP|NOW)\b")
        .expect("on update now pattern")
});
static NOT_NULL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bNOT\s+NULL\b").expect("not null pattern"));
static PRIMARY_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bPRIMARY\s+KEY\b").expect("primary key pattern"));
static IDENTITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\bAUTO_INCREMENT\b|\bGENERATED\s+(?:ALWAYS|BY\s+DEFAULT)\s+AS\s+IDENTITY\b|\b(?:SMALL|BIG)?SERIAL\b",
    )
    .expect("identity pattern")
});

/// Parse one `CREATE TABLE` statement into a resolved table.
pub fn parse_table(sql: &str) -> Result<Parsed, SqlParseError> {
    parse_table_with(sql, &ConvertOptions::default())
}

pub fn parse_table_with(sql: &str, options: &ConvertOptions) -> Result<Parsed, SqlParseError> {
    let normalized = normalize(sql);
    let header = extract_header(&normalized)?;

    let mut builder = TableBuilder::new(header.table.clone(), options);
    if !header.named {
        builder.diagnose(Diagnostic::MissingTableName);
    }

    for raw in split_items(header.block) {
        match parse_item(raw) {
            Item::Column(def) => {
                tracing::debug!(column = %def.name, "column definition");
                builder.add_column(def);
            }
            Item::PrimaryKey(columns) => {
                tracing::debug!(?columns, "table-level primary key");
                builder.set_primary_key(columns);
            }
            Item::ForeignKey(fk) => {
                tracing::debug!(columns = ?fk.columns, target = %fk.target, "table-level foreign key");
                builder.add_foreign_key(fk);
            }
            Item::Ignored(text) => {
                tracing::debug!(item = %text, "skipping index or check");
            }
            Item::Unrecognized(text) => {
                builder.diagnose(Diagnostic::UnrecognizedItem(text));
            }
        }
    }

    Ok(builder.finish())
}

/// Classify a single top-level item.
pub fn parse_item(item: &str) -> Item {
    let item = item.trim();

    if TABLE_PRIMARY_KEY.is_match(item) {
        let columns = paren_group(item, 0)
            .map(|(start, end)| split_names(&item[start..end]))
            .unwrap_or_default();
        return if columns.is_empty() {
            Item::Unrecognized(item.to_string())
        } else {
            Item::PrimaryKey(columns)
        };
    }

    if TABLE_FOREIGN_KEY_START.is_match(item) {
        return match parse_foreign_key(item) {
            Some(fk) => Item::ForeignKey(fk),
            None => Item::Unrecognized(item.to_string()),
        };
    }

    let (name, remainder) = match item.split_once(' ') {
        Some((name, rest)) => (name, rest.trim()),
        None => (item, ""),
    };

    if is_index_item(item) {
        return Item::Ignored(item.to_string());
    }
    match COLUMN_NAME.captures(name) {
        Some(caps) => Item::Column(ColumnDef {
            name: caps[1].to_string(),
            fields: ColumnFields::extract(remainder),
        }),
        None => Item::Unrecognized(item.to_string()),
    }
}

/// MySQL types with an argument list that the type mapping leaves to the
/// text fallback.
const UNMAPPED_TYPE_WORDS: [&str; 6] = ["enum", "set", "binary", "varbinary", "bit", "time"];

/// Secondary index or check. Columns named `key`, `index`, `check` and the
/// like lost their backticks during normalization, so the keyword alone is
/// not enough: the rest must read as an index body.
fn is_index_item(item: &str) -> bool {
    let Some(caps) = INDEX_KEYWORD.captures(item) else {
        return false;
    };
    let body = caps.get(2).map_or("", |m| m.as_str());
    if caps[1].eq_ignore_ascii_case("constraint") {
        return NAMED_CONSTRAINT_BODY.is_match(body);
    }
    if INDEX_BODY.is_match(body) {
        return true;
    }
    match NAMED_INDEX_BODY.captures(body) {
        Some(named) => {
            let word = named[1].to_lowercase();
            !UNMAPPED_TYPE_WORDS.contains(&word.as_str()) && leading_base_type(body).is_none()
        }
        None => false,
    }
}

fn parse_foreign_key(item: &str) -> Option<ForeignKey> {
    let caps = TABLE_FOREIGN_KEY.captures(item)?;
    let columns = split_names(&caps[1]);
    let target_columns = split_names(&caps[3]);
    if columns.is_empty() || target_columns.is_empty() {
        return None;
    }
    let tail = caps.get(4).map_or("", |m| m.as_str());
    let (on_delete, on_update) = parse_actions(tail);
    Some(ForeignKey {
        columns,
        target: caps[2].to_string(),
        target_columns,
        on_delete,
        on_update,
    })
}

/// `ON DELETE` / `ON UPDATE` referential actions in a clause tail.
pub fn parse_actions(tail: &str) -> (Option<ReferentialAction>, Option<ReferentialAction>) {
    let on_delete = ON_DELETE
        .captures(tail)
        .and_then(|caps| ReferentialAction::parse(&caps[1]));
    let on_update = ON_UPDATE
        .captures(tail)
        .and_then(|caps| ReferentialAction::parse(&caps[1]));
    (on_delete, on_update)
}

fn split_names(list: &str) -> Vec<String> {
    list.split(',')
        .map(|name| name.trim().trim_matches('"').trim())
        // MySQL prefix lengths: `name(10)`
        .map(|name| name.split('(').next().unwrap_or(name).trim())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

fn extract_enum(remainder: &str, masked: &str) -> Option<Vec<String>> {
    let open = ENUM_OPEN.find(masked)?;
    let (start, end) = paren_group(remainder, open.end() - 1)?;
    Some(split_enum_values(&remainder[start..end]))
}

fn extract_reference(masked: &str) -> Option<Reference> {
    let caps = REFERENCES.captures(masked)?;
    let whole = caps.get(0)?;
    let (on_delete, on_update) = parse_actions(&masked[whole.end()..]);
    Some(Reference {
        table: caps[1].to_string(),
        column: caps
            .get(2)
            .map_or_else(|| "id".to_string(), |m| m.as_str().to_string()),
        on_delete,
        on_update,
    })
}
