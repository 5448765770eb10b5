//! Header extraction and top-level clause splitting.
//!
//! The only structural parsing the converter does: a depth counter over
//! parentheses that ignores anything inside quoted strings.

use std::sync::LazyLock;

use regex::Regex;

use super::parser::SqlParseError;

/// Table name used when no `CREATE TABLE` header is found.
pub const UNKNOWN_TABLE: &str = "unknown";

static CREATE_TABLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)CREATE\s+TABLE\s+(?:IF\s+NOT\s+EXISTS\s+)?(?:"?[A-Za-z_]\w*"?\s*\.\s*)?"?([A-Za-z_]\w*)"?"#,
    )
    .expect("create table pattern")
});

/// Table name plus the text between the outer parentheses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header<'a> {
    pub table: String,
    /// False when the name fell back to [`UNKNOWN_TABLE`].
    pub named: bool,
    pub block: &'a str,
}

/// Locate the table name and the balanced column/constraint block.
pub fn extract_header(sql: &str) -> Result<Header<'_>, SqlParseError> {
    let (table, named, search_from) = match CREATE_TABLE.captures(sql) {
        Some(caps) => {
            let whole = caps.get(0).map_or(0, |m| m.end());
            let name = caps.get(1).map_or(UNKNOWN_TABLE, |m| m.as_str());
            (name.to_string(), true, whole)
        }
        None => (UNKNOWN_TABLE.to_string(), false, 0),
    };

    let Some(open) = sql[search_from..].find('(').map(|i| i + search_from) else {
        return Err(SqlParseError::MissingColumnBlock { table });
    };

    let Some(close) = matching_paren(sql, open) else {
        return Err(SqlParseError::UnbalancedColumnBlock { table });
    };

    tracing::trace!(table = %table, open, close, "column block located");

    Ok(Header {
        table,
        named,
        block: sql[open + 1..close].trim(),
    })
}

/// Index of the `)` closing the `(` at `open`, if the text balances.
pub fn matching_paren(s: &str, open: usize) -> Option<usize> {
    let mut scanner = DepthScanner::default();
    for (i, c) in s[open..].char_indices() {
        scanner.feed(c);
        if c == ')' && scanner.depth == 0 && !scanner.in_quote() {
            return Some(open + i);
        }
    }
    None
}

/// Split on commas at depth zero, dropping empty items.
pub fn split_items(block: &str) -> Vec<&str> {
    let mut items = Vec::new();
    let mut scanner = DepthScanner::default();
    let mut start = 0;

    for (i, c) in block.char_indices() {
        let top_level = scanner.depth == 0 && !scanner.in_quote();
        if c == ',' && top_level {
            items.push(&block[start..i]);
            start = i + c.len_utf8();
            continue;
        }
        scanner.feed(c);
    }
    items.push(&block[start..]);

    items
        .into_iter()
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .collect()
}

/// Balanced span following the first `(` at or after `from`, exclusive of the
/// parentheses themselves.
pub fn paren_group(s: &str, from: usize) -> Option<(usize, usize)> {
    let open = s[from..].find('(')? + from;
    let close = matching_paren(s, open)?;
    Some((open + 1, close))
}

/// Blank out the contents of quoted literals, keeping byte offsets, so that
/// keyword extractors cannot match inside strings.
pub fn mask_literals(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut scanner = DepthScanner::default();
    for c in s.chars() {
        let was_quoted = scanner.in_quote();
        scanner.feed(c);
        if was_quoted && scanner.in_quote() {
            out.extend(std::iter::repeat_n(' ', c.len_utf8()));
        } else {
            out.push(c);
        }
    }
    out
}

#[derive(Debug, Default)]
struct DepthScanner {
    depth: usize,
    quote: Option<char>,
    escaped: bool,
}

impl DepthScanner {
    fn in_quote(&self) -> bool {
        self.quote.is_some()
    }

    fn feed(&mut self, c: char) {
        if let Some(q) = self.quote {
            if self.escaped {
                self.escaped = false;
            } else if c == '\\' {
                self.escaped = true;
            } else if c == q {
                // A doubled quote closes and immediately reopens, so depth is unaffected
                self.quote = None;
            }
            return;
        }
        match c {
            '\'' | '"' => self.quote = Some(c),
            '(' => self.depth += 1,
            ')' => self.depth = self.depth.saturating_sub(1),
            _ => {}
        }
    }
}
