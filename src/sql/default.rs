//! `DEFAULT` literal parsing.

use std::sync::LazyLock;

use regex::Regex;

use super::scan::mask_literals;
use crate::ast::DefaultValue;

static DEFAULT_KEYWORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bDEFAULT\b").expect("default pattern"));

static SINGLE_QUOTED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^'((?:[^']|'')*)'").expect("default pattern"));
static DOUBLE_QUOTED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^"([^"]*)""#).expect("default pattern"));
static NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([+-]?\d+(?:\.\d+)?)(?:[^\w.]|$)").expect("default pattern"));
static BOOLEAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(true|false|0|1)\b").expect("default pattern"));
static FUNCTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z_]\w*\s*\([^)]*\))").expect("default pattern"));
static CURRENT_TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:CURRENT_TIMESTAMP|LOCALTIMESTAMP|NOW)\b").expect("default pattern")
});

/// Parse the `DEFAULT` value of a column remainder.
///
/// Only a `DEFAULT` keyword outside quoted literals counts. The value right
/// after it is tried in order: single-quoted string, double-quoted string,
/// number, boolean keyword or bare `0`/`1`, function call, current-time
/// keyword. The first match wins.
pub fn parse_default(segment: &str) -> Option<DefaultValue> {
    let masked = mask_literals(segment);
    DEFAULT_KEYWORD
        .find_iter(&masked)
        .find_map(|keyword| parse_value(segment[keyword.end()..].trim_start()))
}

fn parse_value(value: &str) -> Option<DefaultValue> {
    if let Some(caps) = SINGLE_QUOTED.captures(value) {
        return Some(DefaultValue::Text(caps[1].replace("''", "'")));
    }
    if let Some(caps) = DOUBLE_QUOTED.captures(value) {
        return Some(DefaultValue::Text(caps[1].to_string()));
    }
    if let Some(caps) = NUMBER.captures(value) {
        return Some(DefaultValue::Number(caps[1].to_string()));
    }
    if let Some(caps) = BOOLEAN.captures(value) {
        let value = matches!(caps[1].to_lowercase().as_str(), "true" | "1");
        return Some(DefaultValue::Bool(value));
    }
    if let Some(caps) = FUNCTION.captures(value) {
        return Some(DefaultValue::Raw(caps[1].to_string()));
    }
    if CURRENT_TIME.is_match(value) {
        return Some(DefaultValue::Now);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_defaults() {
        assert_eq!(
            parse_default("VARCHAR(10) DEFAULT 'guest' NOT NULL"),
            Some(DefaultValue::Text("guest".to_string()))
        );
        assert_eq!(
            parse_default(r#"TEXT DEFAULT "x y""#),
            Some(DefaultValue::Text("x y".to_string()))
        );
        assert_eq!(
            parse_default("TEXT DEFAULT 'it''s'"),
            Some(DefaultValue::Text("it's".to_string()))
        );
        assert_eq!(parse_default("TEXT DEFAULT ''"), Some(DefaultValue::Text(String::new())));
    }

    #[test]
    fn test_numeric_defaults() {
        assert_eq!(
            parse_default("INT DEFAULT -5"),
            Some(DefaultValue::Number("-5".to_string()))
        );
        assert_eq!(
            parse_default("DECIMAL(10,2) DEFAULT 0.50 NOT NULL"),
            Some(DefaultValue::Number("0.50".to_string()))
        );
        // Bare 0/1 is tried as a number first
        assert_eq!(
            parse_default("TINYINT(1) DEFAULT 1"),
            Some(DefaultValue::Number("1".to_string()))
        );
    }

    #[test]
    fn test_boolean_defaults() {
        assert_eq!(parse_default("BOOLEAN DEFAULT TRUE"), Some(DefaultValue::Bool(true)));
        assert_eq!(parse_default("BOOLEAN DEFAULT false"), Some(DefaultValue::Bool(false)));
    }

    #[test]
    fn test_function_defaults() {
        assert_eq!(
            parse_default("CHAR(36) DEFAULT uuid()"),
            Some(DefaultValue::Raw("uuid()".to_string()))
        );
        assert_eq!(
            parse_default("TIMESTAMP DEFAULT CURRENT_TIMESTAMP(3)"),
            Some(DefaultValue::Raw("CURRENT_TIMESTAMP(3)".to_string()))
        );
    }

    #[test]
    fn test_current_time_keyword() {
        assert_eq!(
            parse_default("DATETIME DEFAULT CURRENT_TIMESTAMP ON UPDATE CURRENT_TIMESTAMP"),
            Some(DefaultValue::Now)
        );
    }

    #[test]
    fn test_no_default() {
        assert_eq!(parse_default("INT NOT NULL"), None);
        assert_eq!(parse_default("INT GENERATED BY DEFAULT AS IDENTITY"), None);
        assert_eq!(parse_default("INT DEFAULT NULL"), None);
    }

    #[test]
    fn test_default_inside_literal_is_not_a_default() {
        assert_eq!(parse_default("TEXT COMMENT 'DEFAULT 5'"), None);
        assert_eq!(
            parse_default("INT DEFAULT 7 COMMENT 'DEFAULT 5'"),
            Some(DefaultValue::Number("7".to_string()))
        );
        assert_eq!(
            parse_default("CHAR(36) DEFAULT uuid() COMMENT 'was DEFAULT 0'"),
            Some(DefaultValue::Raw("uuid()".to_string()))
        );
    }
}
