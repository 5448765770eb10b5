//! Per-table registry of enumerations found in `ENUM(...)` columns.

use crate::ast::Enum;

#[derive(Debug, Default)]
pub struct EnumRegistry {
    suffix: String,
    entries: Vec<Enum>,
}

impl EnumRegistry {
    pub fn new(suffix: impl Into<String>) -> Self {
        Self {
            suffix: suffix.into(),
            entries: Vec::new(),
        }
    }

    /// Register the enum owned by `column` and return its ORM name.
    ///
    /// Re-registering the same column keeps the first position and takes the
    /// newer values.
    pub fn register(&mut self, column: &str, values: Vec<String>) -> String {
        let name = format!("{}{}", column, self.suffix);
        match self.entries.iter_mut().find(|e| e.name == name) {
            Some(existing) => existing.values = values,
            None => self.entries.push(Enum {
                name: name.clone(),
                type_name: format!("{}_enum", column.to_lowercase()),
                values,
            }),
        }
        name
    }

    pub fn into_enums(self) -> Vec<Enum> {
        self.entries
    }
}

/// Split an `ENUM(...)` argument list into unquoted values, keeping order and
/// duplicates.
pub fn split_enum_values(list: &str) -> Vec<String> {
    let mut values = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut quoted = false;
    let mut chars = list.chars().peekable();

    while let Some(c) = chars.next() {
        match quote {
            Some(q) if c == q => {
                if chars.peek() == Some(&q) {
                    current.push(q);
                    chars.next();
                } else {
                    quote = None;
                }
            }
            Some(_) => current.push(c),
            None => match c {
                '\'' | '"' => {
                    quote = Some(c);
                    quoted = true;
                }
                ',' => {
                    if quoted || !current.is_empty() {
                        values.push(std::mem::take(&mut current));
                    }
                    quoted = false;
                }
                c if c.is_whitespace() => {}
                _ => current.push(c),
            },
        }
    }
    if quoted || !current.is_empty() {
        values.push(current);
    }
    values
}
