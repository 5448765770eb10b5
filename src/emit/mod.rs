//! Renderers for a resolved [`Table`].
//!
//! Both targets walk the table through [`Emitter::emit`], so enum order,
//! column order and the clause sequence from [`Column::clauses`] are the same
//! for each of them. A renderer only decides how each piece is spelled and how
//! the pieces are laid out.

mod drizzle;
mod postgres;

pub use drizzle::DrizzleEmitter;
pub use postgres::PostgresEmitter;

use crate::ast::{Column, CompositeKey, Enum, ForeignKey, Table};

/// Rendered pieces in traversal order, handed to [`Emitter::assemble`].
#[derive(Debug, Default)]
pub struct Parts {
    pub enums: Vec<String>,
    pub columns: Vec<String>,
    pub constraints: Vec<String>,
}

pub trait Emitter {
    fn enum_decl(&self, e: &Enum) -> String;

    fn column(&self, table: &Table, column: &Column) -> String;

    fn composite_key(&self, table: &Table, key: &CompositeKey) -> String;

    fn foreign_key(&self, table: &Table, fk: &ForeignKey) -> String;

    fn assemble(&self, table: &Table, parts: Parts) -> String;

    fn emit(&self, table: &Table) -> String {
        let mut parts = Parts::default();
        for e in &table.enums {
            parts.enums.push(self.enum_decl(e));
        }
        for column in &table.columns {
            parts.columns.push(self.column(table, column));
        }
        if let Some(key) = &table.primary_key {
            parts.constraints.push(self.composite_key(table, key));
        }
        for fk in &table.foreign_keys {
            parts.constraints.push(self.foreign_key(table, fk));
        }
        self.assemble(table, parts)
    }
}

/// SQL identifier in double quotes.
pub(crate) fn quote_ident(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

/// SQL string literal in single quotes.
pub(crate) fn quote_literal(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

/// JavaScript string literal in double quotes.
pub(crate) fn js_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}
