//! PostgreSQL DDL: enum types, `CREATE TABLE`, and the update-stamp trigger.

use super::{quote_ident, quote_literal, Emitter, Parts};
use crate::ast::{
    Column, ColumnClause, ColumnType, CompositeKey, DefaultValue, Enum, ForeignKey, Reference,
    ReferentialAction, Table,
};
use crate::config::ConvertOptions;

#[derive(Debug, Clone)]
pub struct PostgresEmitter {
    pub numeric_precision: u32,
    pub numeric_scale: u32,
}

impl Default for PostgresEmitter {
    fn default() -> Self {
        Self::from_options(&ConvertOptions::default())
    }
}

impl PostgresEmitter {
    pub fn from_options(options: &ConvertOptions) -> Self {
        Self {
            numeric_precision: options.numeric_precision,
            numeric_scale: options.numeric_scale,
        }
    }

    fn sql_type(&self, table: &Table, column: &Column) -> String {
        match &column.typ {
            ColumnType::Integer => "INTEGER".to_string(),
            ColumnType::Varchar { length } => format!("VARCHAR({})", length),
            ColumnType::Text => "TEXT".to_string(),
            ColumnType::Numeric => format!("NUMERIC({}, {})", self.numeric_precision, self.numeric_scale),
            ColumnType::Boolean => "BOOLEAN".to_string(),
            ColumnType::Timestamp => "TIMESTAMP".to_string(),
            ColumnType::Enum { name } => {
                let type_name = table
                    .enum_named(name)
                    .map_or(name.as_str(), |e| e.type_name.as_str());
                quote_ident(type_name)
            }
        }
    }

    fn trigger(&self, table: &Table, column: &Column) -> String {
        let function = quote_ident(&format!("{}_set_{}", table.name, column.name));
        let trigger = quote_ident(&format!("{}_{}_trigger", table.name, column.name));
        format!(
            "CREATE OR REPLACE FUNCTION {function}()\n\
             RETURNS TRIGGER AS $$\n\
             BEGIN\n\
             \tNEW.{col} = now();\n\
             \tRETURN NEW;\n\
             END;\n\
             $$ LANGUAGE plpgsql;\n\
             \n\
             CREATE TRIGGER {trigger}\n\
             BEFORE UPDATE ON {table}\n\
             FOR EACH ROW\n\
             EXECUTE FUNCTION {function}();\n",
            function = function,
            col = quote_ident(&column.name),
            trigger = trigger,
            table = quote_ident(&table.name),
        )
    }
}

impl Emitter for PostgresEmitter {
    fn enum_decl(&self, e: &Enum) -> String {
        let values = e
            .values
            .iter()
            .map(|v| quote_literal(v))
            .collect::<Vec<_>>()
            .join(", ");
        format!("CREATE TYPE {} AS ENUM ({});", quote_ident(&e.type_name), values)
    }

    fn column(&self, table: &Table, column: &Column) -> String {
        let mut line = format!("\t{} {}", quote_ident(&column.name), self.sql_type(table, column));
        for clause in column.clauses() {
            match clause {
                ColumnClause::Default(value) => {
                    line.push_str(" DEFAULT ");
                    line.push_str(&default_expr(value));
                }
                ColumnClause::NotNull => line.push_str(" NOT NULL"),
                ColumnClause::PrimaryKey => line.push_str(" PRIMARY KEY"),
                ColumnClause::Identity => line.push_str(" GENERATED ALWAYS AS IDENTITY"),
                ColumnClause::References(reference) => line.push_str(&references_clause(reference)),
            }
        }
        line
    }

    fn composite_key(&self, _table: &Table, key: &CompositeKey) -> String {
        format!("\tPRIMARY KEY ({})", ident_list(&key.columns))
    }

    fn foreign_key(&self, _table: &Table, fk: &ForeignKey) -> String {
        let mut line = format!(
            "\tCONSTRAINT {} FOREIGN KEY ({}) REFERENCES {}({})",
            quote_ident(&fk.name()),
            ident_list(&fk.columns),
            quote_ident(&fk.target),
            ident_list(&fk.target_columns)
        );
        line.push_str(&actions(fk.on_delete, fk.on_update));
        line
    }

    fn assemble(&self, table: &Table, parts: Parts) -> String {
        let mut output = String::new();

        for e in &parts.enums {
            output.push_str(e);
            output.push('\n');
        }
        if !parts.enums.is_empty() {
            output.push('\n');
        }

        output.push_str(&format!("CREATE TABLE {} (\n", quote_ident(&table.name)));
        let body: Vec<String> = parts.columns.into_iter().chain(parts.constraints).collect();
        output.push_str(&body.join(",\n"));
        output.push_str("\n);\n");

        if let Some(column) = table.update_stamp_column() {
            output.push('\n');
            output.push_str(&self.trigger(table, column));
        }

        output
    }
}

fn default_expr(value: &DefaultValue) -> String {
    match value {
        DefaultValue::Text(s) => quote_literal(s),
        DefaultValue::Number(n) => n.clone(),
        DefaultValue::Bool(b) => b.to_string(),
        DefaultValue::Raw(raw) => raw.clone(),
        DefaultValue::Now => "now()".to_string(),
    }
}

fn references_clause(reference: &Reference) -> String {
    format!(
        " REFERENCES {}({}){}",
        quote_ident(&reference.table),
        quote_ident(&reference.column),
        actions(reference.on_delete, reference.on_update)
    )
}

fn actions(on_delete: Option<ReferentialAction>, on_update: Option<ReferentialAction>) -> String {
    let mut out = String::new();
    if let Some(action) = on_delete {
        out.push_str(" ON DELETE ");
        out.push_str(action.to_postgres());
    }
    if let Some(action) = on_update {
        out.push_str(" ON UPDATE ");
        out.push_str(action.to_postgres());
    }
    out
}

fn ident_list(columns: &[String]) -> String {
    columns
        .iter()
        .map(|c| quote_ident(c))
        .collect::<Vec<_>>()
        .join(", ")
}
