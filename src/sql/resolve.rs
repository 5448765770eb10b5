//! Table assembly: table-level keys folded into columns or kept standalone.

use super::enums::EnumRegistry;
use super::infer::{infer_column, resolve_default, PendingColumn};
use super::parser::{ColumnDef, Diagnostic, Parsed};
use crate::ast::{Column, ColumnType, CompositeKey, ForeignKey, Reference, Table};
use crate::config::ConvertOptions;

/// Per-call accumulator; [`TableBuilder::finish`] turns it into a [`Table`].
pub struct TableBuilder<'o> {
    name: String,
    options: &'o ConvertOptions,
    columns: Vec<PendingColumn>,
    enums: EnumRegistry,
    primary_key: Option<Vec<String>>,
    foreign_keys: Vec<ForeignKey>,
    diagnostics: Vec<Diagnostic>,
}

impl<'o> TableBuilder<'o> {
    pub fn new(name: String, options: &'o ConvertOptions) -> Self {
        Self {
            name,
            options,
            columns: Vec::new(),
            enums: EnumRegistry::new(options.enum_suffix.clone()),
            primary_key: None,
            foreign_keys: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    pub fn diagnose(&mut self, diagnostic: Diagnostic) {
        tracing::warn!(table = %self.name, "{}", diagnostic);
        self.diagnostics.push(diagnostic);
    }

    pub fn add_column(&mut self, def: ColumnDef) {
        let pending = infer_column(def, &mut self.enums, self.options);
        // MySQL column names are case-insensitive
        match self.position(&pending.name) {
            Some(index) => {
                self.diagnose(Diagnostic::DuplicateColumn(pending.name.clone()));
                self.columns[index] = pending;
            }
            None => self.columns.push(pending),
        }
    }

    /// A later table-level primary key replaces an earlier one.
    pub fn set_primary_key(&mut self, columns: Vec<String>) {
        self.primary_key = Some(columns);
    }

    pub fn add_foreign_key(&mut self, fk: ForeignKey) {
        self.foreign_keys.push(fk);
    }

    pub fn finish(mut self) -> Parsed {
        let composite = match self.primary_key.take() {
            Some(columns) => self.resolve_primary_key(columns),
            None => None,
        };
        let standalone = self.resolve_foreign_keys();
        let needs_update_trigger = self.columns.iter().any(PendingColumn::wants_update_trigger);

        let columns: Vec<Column> = self.columns.into_iter().map(finalize).collect();
        let mut enums = self.enums.into_enums();
        // Only enums some column still points at survive
        enums.retain(|e| {
            columns
                .iter()
                .any(|c| matches!(&c.typ, ColumnType::Enum { name } if *name == e.name))
        });

        Parsed {
            table: Table {
                name: self.name,
                columns,
                enums,
                primary_key: composite,
                foreign_keys: standalone,
                needs_update_trigger,
            },
            diagnostics: self.diagnostics,
        }
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// A table-level primary key is the table's only primary key: column-level
    /// flags, including the one implied by identity, are cleared first.
    fn resolve_primary_key(&mut self, declared: Vec<String>) -> Option<CompositeKey> {
        let mut existing = Vec::with_capacity(declared.len());
        for name in declared {
            match self.position(&name) {
                Some(index) => existing.push(index),
                None => self.diagnose(Diagnostic::UnknownKeyColumn(name)),
            }
        }
        if existing.is_empty() {
            return None;
        }

        for col in &mut self.columns {
            col.primary = false;
        }
        let table_pk_length = self.options.table_pk_varchar_length;
        for &index in &existing {
            let col = &mut self.columns[index];
            // Untyped table-level key columns become VARCHAR(200), unlike
            // the INTEGER given to an untyped column-level PRIMARY KEY.
            if col.typ.is_none() {
                col.typ = Some(ColumnType::Varchar {
                    length: table_pk_length,
                });
            }
        }

        if let [single] = existing.as_slice() {
            self.columns[*single].primary = true;
            return None;
        }
        Some(CompositeKey {
            columns: existing
                .iter()
                .map(|&index| self.columns[index].name.clone())
                .collect(),
        })
    }

    /// Keys naming a column that does not exist are reported and dropped.
    fn resolve_foreign_keys(&mut self) -> Vec<ForeignKey> {
        let mut standalone = Vec::new();
        for mut fk in std::mem::take(&mut self.foreign_keys) {
            let mut positions = Vec::with_capacity(fk.columns.len());
            for name in &fk.columns {
                match self.position(name) {
                    Some(index) => positions.push(index),
                    None => self.diagnose(Diagnostic::UnknownKeyColumn(name.clone())),
                }
            }
            if positions.len() != fk.columns.len() {
                continue;
            }
            fk.columns = positions
                .iter()
                .map(|&index| self.columns[index].name.clone())
                .collect();

            let target = match positions.as_slice() {
                [single] if self.columns[*single].fields.reference.is_none() => {
                    Some(&mut self.columns[*single])
                }
                _ => None,
            };
            match (target, fk.target_columns.first().cloned()) {
                (Some(col), Some(target_column)) => {
                    col.fields.reference = Some(Reference {
                        table: fk.target,
                        column: target_column,
                        on_delete: fk.on_delete,
                        on_update: fk.on_update,
                    });
                }
                _ => standalone.push(fk),
            }
        }
        standalone
    }
}

fn finalize(pending: PendingColumn) -> Column {
    let PendingColumn {
        name,
        typ,
        fields,
        primary,
    } = pending;
    let typ = typ.unwrap_or(ColumnType::Text);
    let (default, forced_default) = resolve_default(&name, &typ, fields.default);

    Column {
        name,
        typ,
        not_null: fields.not_null,
        default,
        primary,
        identity: fields.identity,
        reference: fields.reference,
        forced_default,
    }
}
