//! MySQL `CREATE TABLE` front end: text in, resolved [`Table`](crate::ast::Table) out.

mod default;
mod enums;
mod infer;
mod normalize;
mod parser;
mod resolve;
mod scan;
mod types;

pub use default::parse_default;
pub use enums::{split_enum_values, EnumRegistry};
pub use infer::{is_audit_name, AUDIT_COLUMNS};
pub use normalize::normalize;
pub use parser::{
    parse_actions, parse_item, parse_table, parse_table_with, ColumnDef, ColumnFields, Diagnostic,
    Item, Parsed, SqlParseError,
};
pub use scan::{extract_header, matching_paren, split_items, Header, UNKNOWN_TABLE};
pub use types::{map_type, BaseType};
