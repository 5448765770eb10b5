//! Text normalization ahead of header extraction.

use std::iter::Peekable;
use std::str::Chars;
use std::sync::LazyLock;

use regex::Regex;

/// `CHARACTER SET x [COLLATE y]`, `CHARSET x`, and bare `COLLATE y` fragments.
/// Matched only in unquoted text, and kept when they start an item, where
/// they are a column name.
static CHARSET_NOISE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:(?:CHARACTER\s+SET|CHARSET)\s*=?\s*\w+(?:\s+COLLATE\s*=?\s*\w+)?|COLLATE\s*=?\s*\w+)",
    )
    .expect("charset pattern")
});

/// Normalize raw `CREATE TABLE` text.
///
/// Drops backtick quoting and comments, removes charset/collation noise,
/// collapses whitespace runs to one space and trims. Quoted strings are copied
/// through untouched apart from whitespace collapsing.
pub fn normalize(input: &str) -> String {
    collapse_whitespace(&Normalizer::new(input).run())
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

struct Normalizer<'a> {
    chars: Peekable<Chars<'a>>,
    current_char: Option<char>,
    out: String,
    /// Start of the unquoted run not yet checked for charset noise.
    plain_start: usize,
}

impl<'a> Normalizer<'a> {
    fn new(input: &'a str) -> Self {
        let mut chars = input.chars().peekable();
        let current_char = chars.next();
        Self {
            chars,
            current_char,
            out: String::with_capacity(input.len()),
            plain_start: 0,
        }
    }

    fn advance(&mut self) {
        self.current_char = self.chars.next();
    }

    fn peek(&mut self) -> Option<&char> {
        self.chars.peek()
    }

    fn skip_line_comment(&mut self) {
        while let Some(c) = self.current_char {
            if c == '\n' {
                break;
            }
            self.advance();
        }
        self.out.push(' ');
    }

    fn skip_block_comment(&mut self) {
        self.advance(); // skip /
        self.advance(); // skip *
        while let Some(c) = self.current_char {
            if c == '*' && self.peek() == Some(&'/') {
                self.advance();
                self.advance();
                break;
            }
            self.advance();
        }
        self.out.push(' ');
    }

    /// Strip charset noise from the unquoted run ending at the current output.
    fn flush_plain(&mut self) {
        let run = self.out.split_off(self.plain_start);
        let mut kept = String::with_capacity(run.len());
        let mut last = 0;
        for m in CHARSET_NOISE.find_iter(&run) {
            kept.push_str(&run[last..m.start()]);
            let previous = kept
                .trim_end()
                .chars()
                .last()
                .or_else(|| self.out.trim_end().chars().last());
            if matches!(previous, None | Some(',') | Some('(')) {
                kept.push_str(m.as_str());
            } else {
                kept.push(' ');
            }
            last = m.end();
        }
        kept.push_str(&run[last..]);
        self.out.push_str(&kept);
        self.plain_start = self.out.len();
    }

    fn copy_string(&mut self, quote: char) {
        self.flush_plain();
        self.out.push(quote);
        self.advance();
        while let Some(c) = self.current_char {
            self.out.push(c);
            self.advance();
            if c == '\\' {
                if let Some(escaped) = self.current_char {
                    self.out.push(escaped);
                    self.advance();
                }
            } else if c == quote {
                // Doubled quote is an escape, keep scanning
                if self.current_char == Some(quote) {
                    self.out.push(quote);
                    self.advance();
                } else {
                    break;
                }
            }
        }
        self.plain_start = self.out.len();
    }

    fn run(mut self) -> String {
        while let Some(c) = self.current_char {
            match c {
                '`' => self.advance(),
                '\'' | '"' => self.copy_string(c),
                '-' if self.peek() == Some(&'-') => self.skip_line_comment(),
                '#' => self.skip_line_comment(),
                '/' if self.peek() == Some(&'*') => self.skip_block_comment(),
                _ => {
                    self.out.push(c);
                    self.advance();
                }
            }
        }
        self.flush_plain();
        self.out
    }
}
