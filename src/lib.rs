pub mod ast;
pub mod config;
pub mod emit;
pub mod sql;

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use wasm_bindgen::prelude::*;

use config::ConvertOptions;
use emit::{DrizzleEmitter, Emitter, PostgresEmitter};
use sql::SqlParseError;

/// Both renderings of one `CREATE TABLE` statement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Conversion {
    pub table: String,
    pub drizzle: String,
    pub postgres: String,
    pub diagnostics: Vec<String>,
}

/// Which rendering a caller wants printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Target {
    #[default]
    Both,
    Drizzle,
    Postgres,
}

impl FromStr for Target {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "both" | "all" => Ok(Self::Both),
            "drizzle" | "orm" => Ok(Self::Drizzle),
            "postgres" | "postgresql" | "pg" | "sql" => Ok(Self::Postgres),
            other => Err(format!(
                "unknown target `{}` (expected both, drizzle or postgres)",
                other
            )),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Both => "both",
            Self::Drizzle => "drizzle",
            Self::Postgres => "postgres",
        })
    }
}

impl Conversion {
    /// Text for one target; `Both` puts the schema first and the DDL after it.
    pub fn render(&self, target: Target) -> String {
        match target {
            Target::Drizzle => self.drizzle.clone(),
            Target::Postgres => self.postgres.clone(),
            Target::Both => format!("{}\n{}", self.drizzle, self.postgres),
        }
    }
}

/// Convert one MySQL `CREATE TABLE` statement with default options.
pub fn convert(sql: &str) -> Conversion {
    convert_with(sql, &ConvertOptions::default())
}

/// Never fails: a statement without a usable column block yields comment
/// placeholders carrying the error message.
pub fn convert_with(sql: &str, options: &ConvertOptions) -> Conversion {
    match try_convert_with(sql, options) {
        Ok(conversion) => conversion,
        Err(err) => {
            let table = match &err {
                SqlParseError::MissingColumnBlock { table }
                | SqlParseError::UnbalancedColumnBlock { table } => table.clone(),
            };
            Conversion {
                table,
                drizzle: format!("// {}\n", err),
                postgres: format!("-- {}\n", err),
                diagnostics: vec![err.to_string()],
            }
        }
    }
}

/// Like [`convert_with`], but hands structural failures back to the caller.
pub fn try_convert_with(sql: &str, options: &ConvertOptions) -> Result<Conversion, SqlParseError> {
    let parsed = sql::parse_table_with(sql, options)?;
    let table = &parsed.table;
    Ok(Conversion {
        table: table.name.clone(),
        drizzle: DrizzleEmitter::from_options(options).emit(table),
        postgres: PostgresEmitter::from_options(options).emit(table),
        diagnostics: parsed.diagnostics.iter().map(ToString::to_string).collect(),
    })
}

/// Initialize panic hook for better error messages in WASM
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();
}

/// Convert MySQL DDL to a Drizzle pg-core schema
#[wasm_bindgen(js_name = "sqlToDrizzle")]
pub fn sql_to_drizzle(sql: &str) -> String {
    convert(sql).drizzle
}

/// Convert MySQL DDL to PostgreSQL DDL
#[wasm_bindgen(js_name = "sqlToPostgres")]
pub fn sql_to_postgres(sql: &str) -> String {
    convert(sql).postgres
}

/// Convert MySQL DDL and return `{ table, drizzle, postgres, diagnostics }`
#[wasm_bindgen(js_name = "convertSql")]
pub fn convert_sql(sql: &str) -> Result<js_sys::Object, JsValue> {
    let conversion = convert(sql);
    let object = js_sys::Object::new();
    let diagnostics = js_sys::Array::new();
    for diagnostic in &conversion.diagnostics {
        diagnostics.push(&JsValue::from_str(diagnostic));
    }
    js_sys::Reflect::set(&object, &"table".into(), &conversion.table.into())?;
    js_sys::Reflect::set(&object, &"drizzle".into(), &conversion.drizzle.into())?;
    js_sys::Reflect::set(&object, &"postgres".into(), &conversion.postgres.into())?;
    js_sys::Reflect::set(&object, &"diagnostics".into(), &diagnostics.into())?;
    Ok(object)
}
