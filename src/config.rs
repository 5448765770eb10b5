//! Conversion options.

/// Knobs for inference defaults and rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Appended to the column name to form the ORM enum identifier.
    pub enum_suffix: String,
    /// Precision every numeric column is rendered with.
    pub numeric_precision: u32,
    pub numeric_scale: u32,
    /// Length for `VARCHAR`/`CHAR` declared without one.
    pub varchar_default_length: u32,
    /// Length for untyped columns named by a table-level primary key.
    pub table_pk_varchar_length: u32,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            enum_suffix: "Enum".to_string(),
            numeric_precision: 10,
            numeric_scale: 2,
            varchar_default_length: 255,
            table_pk_varchar_length: 200,
        }
    }
}
