//! Drizzle ORM (`drizzle-orm/pg-core`) schema source.

use std::collections::BTreeSet;

use super::{js_string, Emitter, Parts};
use crate::ast::{
    Column, ColumnClause, ColumnType, CompositeKey, DefaultValue, Enum, ForeignKey, Reference,
    ReferentialAction, Table,
};
use crate::config::ConvertOptions;

#[derive(Debug, Clone)]
pub struct DrizzleEmitter {
    pub numeric_precision: u32,
    pub numeric_scale: u32,
    /// Emit `import` lines ahead of the declarations.
    pub imports: bool,
}

impl Default for DrizzleEmitter {
    fn default() -> Self {
        Self::from_options(&ConvertOptions::default())
    }
}

impl DrizzleEmitter {
    pub fn from_options(options: &ConvertOptions) -> Self {
        Self {
            numeric_precision: options.numeric_precision,
            numeric_scale: options.numeric_scale,
            imports: true,
        }
    }

    fn type_builder(&self, column: &Column) -> String {
        let name = js_string(&column.name);
        match &column.typ {
            ColumnType::Integer => format!("integer({})", name),
            ColumnType::Varchar { length } => format!("varchar({}, {{ length: {} }})", name, length),
            ColumnType::Text => format!("text({})", name),
            ColumnType::Numeric => format!(
                "numeric({}, {{ precision: {}, scale: {} }})",
                name, self.numeric_precision, self.numeric_scale
            ),
            ColumnType::Boolean => format!("boolean({})", name),
            ColumnType::Timestamp => format!("timestamp({})", name),
            ColumnType::Enum { name: enum_name } => format!("{}({})", enum_name, name),
        }
    }

    fn import_lines(&self, table: &Table) -> String {
        let mut core: BTreeSet<&'static str> = BTreeSet::new();
        core.insert("pgTable");
        if !table.enums.is_empty() {
            core.insert("pgEnum");
        }
        let mut needs_sql = false;
        for column in &table.columns {
            match column.typ {
                ColumnType::Integer => core.insert("integer"),
                ColumnType::Varchar { .. } => core.insert("varchar"),
                ColumnType::Text => core.insert("text"),
                ColumnType::Numeric => core.insert("numeric"),
                ColumnType::Boolean => core.insert("boolean"),
                ColumnType::Timestamp => core.insert("timestamp"),
                ColumnType::Enum { .. } => false,
            };
            needs_sql |= matches!(column.default, Some(DefaultValue::Raw(_)));
        }
        if table.primary_key.is_some() {
            core.insert("primaryKey");
        }
        if !table.foreign_keys.is_empty() {
            core.insert("foreignKey");
        }

        let mut out = String::new();
        if needs_sql {
            out.push_str("import { sql } from \"drizzle-orm\";\n");
        }
        out.push_str(&format!(
            "import {{ {} }} from \"drizzle-orm/pg-core\";\n",
            core.into_iter().collect::<Vec<_>>().join(", ")
        ));
        out
    }
}

impl Emitter for DrizzleEmitter {
    fn enum_decl(&self, e: &Enum) -> String {
        let values = e
            .values
            .iter()
            .map(|v| js_string(v))
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "export const {} = pgEnum({}, [{}]);",
            e.name,
            js_string(&e.type_name),
            values
        )
    }

    fn column(&self, _table: &Table, column: &Column) -> String {
        let mut line = format!("  {}: {}", column.name, self.type_builder(column));
        for clause in column.clauses() {
            match clause {
                ColumnClause::Default(value) => line.push_str(&default_call(value)),
                ColumnClause::NotNull => line.push_str(".notNull()"),
                ColumnClause::PrimaryKey => line.push_str(".primaryKey()"),
                ColumnClause::Identity => line.push_str(".generatedAlwaysAsIdentity()"),
                ColumnClause::References(reference) => line.push_str(&references_call(reference)),
            }
        }
        line.push(',');
        line
    }

    fn composite_key(&self, _table: &Table, key: &CompositeKey) -> String {
        format!("  pk: primaryKey({{ columns: [{}] }}),", table_refs(&key.columns))
    }

    fn foreign_key(&self, _table: &Table, fk: &ForeignKey) -> String {
        let foreign = fk
            .target_columns
            .iter()
            .map(|c| format!("{}.{}", fk.target, c))
            .collect::<Vec<_>>()
            .join(", ");
        let mut entry = format!(
            "  {}: foreignKey({{ columns: [{}], foreignColumns: [{}] }})",
            fk.name(),
            table_refs(&fk.columns),
            foreign
        );
        if let Some(action) = fk.on_delete {
            entry.push_str(&format!(".onDelete({})", js_string(orm_action(action))));
        }
        if let Some(action) = fk.on_update {
            entry.push_str(&format!(".onUpdate({})", js_string(orm_action(action))));
        }
        entry.push(',');
        entry
    }

    fn assemble(&self, table: &Table, parts: Parts) -> String {
        let mut output = String::new();

        if self.imports {
            output.push_str(&self.import_lines(table));
            output.push('\n');
        }

        for e in &parts.enums {
            output.push_str(e);
            output.push('\n');
        }
        if !parts.enums.is_empty() {
            output.push('\n');
        }

        output.push_str(&format!(
            "export const {} = pgTable({}, {{\n",
            table.name,
            js_string(&table.name)
        ));
        for line in &parts.columns {
            output.push_str(line);
            output.push('\n');
        }

        if !table.has_table_constraints() {
            output.push_str("});\n");
        } else {
            output.push_str("}, (table) => ({\n");
            for line in &parts.constraints {
                output.push_str(line);
                output.push('\n');
            }
            output.push_str("}));\n");
        }

        output
    }
}

fn default_call(value: &DefaultValue) -> String {
    match value {
        DefaultValue::Text(s) => format!(".default({})", js_string(s)),
        DefaultValue::Number(_) | DefaultValue::Bool(_) => format!(".default({})", value),
        DefaultValue::Raw(raw) => format!(".default(sql`{}`)", raw.replace('`', "\\`")),
        DefaultValue::Now => ".defaultNow()".to_string(),
    }
}

fn references_call(reference: &Reference) -> String {
    let mut options = Vec::new();
    if let Some(action) = reference.on_delete {
        options.push(format!("onDelete: {}", js_string(orm_action(action))));
    }
    if let Some(action) = reference.on_update {
        options.push(format!("onUpdate: {}", js_string(orm_action(action))));
    }
    let options = if options.is_empty() {
        String::new()
    } else {
        format!(", {{ {} }}", options.join(", "))
    };
    format!(
        ".references(() => {}.{}{})",
        reference.table, reference.column, options
    )
}

/// Drizzle spells `SET NULL` with a space.
fn orm_action(action: ReferentialAction) -> &'static str {
    match action {
        ReferentialAction::SetNull => "set null",
        other => other.as_str(),
    }
}

fn table_refs(columns: &[String]) -> String {
    columns
        .iter()
        .map(|c| format!("table.{}", c))
        .collect::<Vec<_>>()
        .join(", ")
}
