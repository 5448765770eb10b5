//! Resolved table model shared by both renderers.

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub name: String,
    /// Emission order is declaration order.
    pub columns: Vec<Column>,
    pub enums: Vec<Enum>,
    pub primary_key: Option<CompositeKey>,
    pub foreign_keys: Vec<ForeignKey>,
    pub needs_update_trigger: bool,
}

impl Table {
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn enum_named(&self, name: &str) -> Option<&Enum> {
        self.enums.iter().find(|e| e.name == name)
    }

    /// Column the update trigger stamps, if the table needs one.
    pub fn update_stamp_column(&self) -> Option<&Column> {
        if !self.needs_update_trigger {
            return None;
        }
        self.columns
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case("updated_at"))
    }

    pub fn has_table_constraints(&self) -> bool {
        self.primary_key.is_some() || !self.foreign_keys.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub typ: ColumnType,
    pub not_null: bool,
    pub default: Option<DefaultValue>,
    pub primary: bool,
    pub identity: bool,
    pub reference: Option<Reference>,
    /// Default was supplied by the audit-column convention, not the source.
    pub forced_default: bool,
}

impl Column {
    pub fn new(name: impl Into<String>, typ: ColumnType) -> Self {
        Self {
            name: name.into(),
            typ,
            not_null: false,
            default: None,
            primary: false,
            identity: false,
            reference: None,
            forced_default: false,
        }
    }

    /// Column clauses in rendering order: default, not-null, primary key,
    /// identity, reference.
    pub fn clauses(&self) -> Vec<ColumnClause<'_>> {
        let mut clauses = Vec::with_capacity(5);
        if let Some(default) = &self.default {
            clauses.push(ColumnClause::Default(default));
        }
        if self.not_null && !self.forced_default {
            clauses.push(ColumnClause::NotNull);
        }
        if self.primary {
            clauses.push(ColumnClause::PrimaryKey);
        }
        if self.identity {
            clauses.push(ColumnClause::Identity);
        }
        if let Some(reference) = &self.reference {
            clauses.push(ColumnClause::References(reference));
        }
        clauses
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColumnClause<'a> {
    Default(&'a DefaultValue),
    NotNull,
    PrimaryKey,
    Identity,
    References(&'a Reference),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnType {
    Integer,
    Varchar { length: u32 },
    Text,
    Numeric,
    Boolean,
    Timestamp,
    Enum { name: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefaultValue {
    /// String literal, stored without its quotes.
    Text(String),
    /// Numeric literal, stored verbatim.
    Number(String),
    Bool(bool),
    /// Function-call form such as `uuid()`, kept verbatim.
    Raw(String),
    /// Current time (`CURRENT_TIMESTAMP`, `NOW`, audit columns).
    Now,
}

impl fmt::Display for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => write!(f, "\"{}\"", s),
            Self::Number(n) => f.write_str(n),
            Self::Bool(b) => write!(f, "{}", b),
            Self::Raw(r) => f.write_str(r),
            Self::Now => f.write_str("now()"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub table: String,
    pub column: String,
    pub on_delete: Option<ReferentialAction>,
    pub on_update: Option<ReferentialAction>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferentialAction {
    Cascade,
    SetNull,
    Restrict,
    NoAction,
}

impl ReferentialAction {
    /// Normalize action text such as `SET  NULL` or `no action`.
    pub fn parse(text: &str) -> Option<Self> {
        let squashed: String = text
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_lowercase();
        match squashed.as_str() {
            "cascade" => Some(Self::Cascade),
            "setnull" => Some(Self::SetNull),
            "restrict" => Some(Self::Restrict),
            "noaction" => Some(Self::NoAction),
            _ => None,
        }
    }

    /// Normalized token.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cascade => "cascade",
            Self::SetNull => "setnull",
            Self::Restrict => "restrict",
            Self::NoAction => "no action",
        }
    }

    pub fn to_postgres(&self) -> &'static str {
        match self {
            Self::Cascade => "CASCADE",
            Self::SetNull => "SET NULL",
            Self::Restrict => "RESTRICT",
            Self::NoAction => "NO ACTION",
        }
    }
}

impl fmt::Display for ReferentialAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enum {
    /// ORM identifier, e.g. `statusEnum`.
    pub name: String,
    /// SQL type name, e.g. `status_enum`.
    pub type_name: String,
    pub values: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositeKey {
    pub columns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKey {
    pub columns: Vec<String>,
    pub target: String,
    pub target_columns: Vec<String>,
    pub on_delete: Option<ReferentialAction>,
    pub on_update: Option<ReferentialAction>,
}

impl ForeignKey {
    /// Entry name shared by both renderers, e.g. `fk_org_id_user_id_members`.
    pub fn name(&self) -> String {
        format!("fk_{}_{}", self.columns.join("_"), self.target)
    }
}
