//! MySQL type token to semantic type mapping.

use std::sync::LazyLock;

use regex::Regex;

use crate::ast::ColumnType;

/// A word optionally followed by a parenthesized argument list, e.g. `VARCHAR(50)`.
static TYPE_WORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([A-Za-z_][A-Za-z0-9_]*)(?:\s*\(\s*([^()]*?)\s*\))?").expect("type word pattern")
});

/// Declared base type, before defaults are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseType {
    Integer,
    Varchar(Option<u32>),
    Text,
    Numeric,
    Boolean,
    Timestamp,
}

impl BaseType {
    pub fn into_column_type(self, default_varchar_length: u32) -> ColumnType {
        match self {
            Self::Integer => ColumnType::Integer,
            Self::Varchar(length) => ColumnType::Varchar {
                length: length.unwrap_or(default_varchar_length),
            },
            Self::Text => ColumnType::Text,
            Self::Numeric => ColumnType::Numeric,
            Self::Boolean => ColumnType::Boolean,
            Self::Timestamp => ColumnType::Timestamp,
        }
    }
}

/// Map one type word and its argument text (`50` in `VARCHAR(50)`).
pub fn map_type(word: &str, args: Option<&str>) -> Option<BaseType> {
    let lower = word.to_lowercase();
    let first_arg = args
        .and_then(|a| a.split(',').next())
        .and_then(|a| a.trim().parse::<u32>().ok());

    let base = match lower.as_str() {
        "int" | "integer" | "bigint" | "smallint" | "mediumint" => BaseType::Integer,
        // TINYINT(1) is the MySQL boolean idiom
        "tinyint" if first_arg == Some(1) => BaseType::Boolean,
        "tinyint" => BaseType::Integer,

        "varchar" | "char" => BaseType::Varchar(first_arg),

        "text" | "longtext" | "mediumtext" | "tinytext" => BaseType::Text,

        "double" | "float" | "decimal" | "numeric" | "real" => BaseType::Numeric,

        "boolean" | "bool" => BaseType::Boolean,

        "datetime" | "timestamp" | "date" => BaseType::Timestamp,

        _ => return None,
    };
    Some(base)
}

/// First recognized type word in a column remainder. Quoted literals must
/// already be masked out by the caller.
pub fn find_base_type(remainder: &str) -> Option<BaseType> {
    TYPE_WORD.captures_iter(remainder).find_map(|caps| {
        let word = caps.get(1)?.as_str();
        map_type(word, caps.get(2).map(|m| m.as_str()))
    })
}

/// Type word at the very start of a remainder, if recognized.
pub fn leading_base_type(remainder: &str) -> Option<BaseType> {
    let caps = TYPE_WORD.captures(remainder)?;
    let whole = caps.get(0)?;
    if whole.start() != 0 {
        return None;
    }
    map_type(&caps[1], caps.get(2).map(|m| m.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mysql_types() {
        assert_eq!(map_type("INT", None), Some(BaseType::Integer));
        assert_eq!(map_type("BIGINT", Some("20")), Some(BaseType::Integer));
        assert_eq!(map_type("TINYINT", Some("1")), Some(BaseType::Boolean));
        assert_eq!(map_type("TINYINT", Some("4")), Some(BaseType::Integer));
        assert_eq!(map_type("VARCHAR", Some("50")), Some(BaseType::Varchar(Some(50))));
        assert_eq!(map_type("CHAR", None), Some(BaseType::Varchar(None)));
        assert_eq!(map_type("LONGTEXT", None), Some(BaseType::Text));
        assert_eq!(map_type("DECIMAL", Some("10,2")), Some(BaseType::Numeric));
        assert_eq!(map_type("DATETIME", None), Some(BaseType::Timestamp));
        assert_eq!(map_type("JSON", None), None);
    }

    #[test]
    fn test_find_base_type_skips_keywords() {
        assert_eq!(
            find_base_type("NOT NULL VARCHAR(32)"),
            Some(BaseType::Varchar(Some(32)))
        );
        assert_eq!(find_base_type("DECIMAL(10, 2) NOT NULL"), Some(BaseType::Numeric));
        assert_eq!(find_base_type("PRIMARY KEY"), None);
        // CURRENT_TIMESTAMP is one word, not TIMESTAMP
        assert_eq!(find_base_type("DEFAULT CURRENT_TIMESTAMP"), None);
    }

    #[test]
    fn test_leading_base_type() {
        assert_eq!(leading_base_type("VARCHAR(10) NOT NULL"), Some(BaseType::Varchar(Some(10))));
        assert_eq!(leading_base_type("idx_name (name)"), None);
        assert_eq!(leading_base_type("(a, b)"), None);
    }

    #[test]
    fn test_varchar_default_length() {
        assert_eq!(
            BaseType::Varchar(None).into_column_type(255),
            ColumnType::Varchar { length: 255 }
        );
        assert_eq!(
            BaseType::Varchar(Some(50)).into_column_type(255),
            ColumnType::Varchar { length: 50 }
        );
    }
}
