//! Column type and identity inference.
//!
//! Rules run in a fixed order and the first one that applies wins:
//!
//! 1. identity marker: integer primary key
//! 2. audit column name (`created_at`, `updated_at`, `deleted_at`): timestamp
//! 3. `ENUM(...)`: a registered enum
//! 4. declared base type: its mapping
//! 5. column-level `PRIMARY KEY` without a type: integer
//!
//! Table-level primary key inference and the text fallback happen later in
//! the resolver, once every item has been seen.

use super::enums::EnumRegistry;
use super::parser::{ColumnDef, ColumnFields};
use crate::ast::{ColumnType, DefaultValue};
use crate::config::ConvertOptions;

pub const AUDIT_COLUMNS: [&str; 3] = ["created_at", "updated_at", "deleted_at"];

/// Audit columns that receive `now()` when declared without a default.
const STAMPED_AUDIT_COLUMNS: [&str; 2] = ["created_at", "updated_at"];

/// A column whose type may still be open.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingColumn {
    pub name: String,
    pub typ: Option<ColumnType>,
    pub fields: ColumnFields,
    pub primary: bool,
}

impl PendingColumn {
    /// `updated_at ... ON UPDATE CURRENT_TIMESTAMP`
    pub fn wants_update_trigger(&self) -> bool {
        self.fields.on_update_now && self.name.eq_ignore_ascii_case("updated_at")
    }
}

pub fn is_audit_name(name: &str) -> bool {
    let lower = name.to_lowercase();
    AUDIT_COLUMNS.contains(&lower.as_str())
}

/// Apply the column-local inference rules.
pub fn infer_column(
    def: ColumnDef,
    enums: &mut EnumRegistry,
    options: &ConvertOptions,
) -> PendingColumn {
    let ColumnDef { name, fields } = def;
    let mut primary = fields.primary;

    let typ = if fields.identity {
        primary = true;
        Some(ColumnType::Integer)
    } else if is_audit_name(&name) {
        Some(ColumnType::Timestamp)
    } else if let Some(values) = &fields.enum_values {
        let enum_name = enums.register(&name, values.clone());
        Some(ColumnType::Enum { name: enum_name })
    } else if let Some(base) = fields.base_type {
        Some(base.into_column_type(options.varchar_default_length))
    } else if fields.primary {
        Some(ColumnType::Integer)
    } else {
        None
    };

    tracing::debug!(column = %name, ?typ, primary, identity = fields.identity, "inferred column");

    PendingColumn {
        name,
        typ,
        fields,
        primary,
    }
}

/// Default after type-aware fixes: numeric `0`/`1` on a boolean column become
/// `false`/`true`, and stamped audit columns get `now()` when none was given.
/// The flag reports whether the default was forced.
pub fn resolve_default(
    name: &str,
    typ: &ColumnType,
    declared: Option<DefaultValue>,
) -> (Option<DefaultValue>, bool) {
    match declared {
        Some(DefaultValue::Number(n)) if *typ == ColumnType::Boolean && (n == "0" || n == "1") => {
            (Some(DefaultValue::Bool(n == "1")), false)
        }
        Some(value) => (Some(value), false),
        None if STAMPED_AUDIT_COLUMNS.contains(&name.to_lowercase().as_str()) => {
            (Some(DefaultValue::Now), true)
        }
        None => (None, false),
    }
}
