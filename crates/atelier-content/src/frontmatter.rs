//! Frontmatter extraction from markdown documents.
//!
//! Only flat `key: value` pairs inside a leading `---` ... `---` block are
//! recognised; this is deliberately not a YAML parser. Parsing never fails:
//! anything unrecognisable yields an empty record or a skipped line.
//!
//! # Example
//!
//! ```
//! use atelier_content::{parse_frontmatter, FrontmatterValue};
//!
//! let record = parse_frontmatter("---\ntitle: 'Enscape'\nid: 1\nfeatured: true\n---\nBody");
//! assert_eq!(record.get("title"), Some(&FrontmatterValue::String("Enscape".into())));
//! assert_eq!(record.get("id"), Some(&FrontmatterValue::Integer(1)));
//! assert_eq!(record.get("featured"), Some(&FrontmatterValue::Bool(true)));
//! ```

use crate::value::{FrontmatterRecord, FrontmatterValue};

const DELIMITER: &str = "---";

/// Parse the frontmatter block of a markdown document.
pub fn parse_frontmatter(text: &str) -> FrontmatterRecord {
    split_frontmatter(text).0
}

/// Split a markdown document into its frontmatter record and body.
///
/// When no complete block is present the record is empty and the body is
/// the whole document (minus a leading byte-order mark).
pub fn split_frontmatter(text: &str) -> (FrontmatterRecord, &str) {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut lines = text.split_inclusive('\n');

    let Some(first) = lines.next() else {
        return (FrontmatterRecord::new(), text);
    };
    if !is_delimiter(first) {
        return (FrontmatterRecord::new(), text);
    }

    let mut offset = first.len();
    let mut record = FrontmatterRecord::new();
    for line in lines {
        offset += line.len();
        if is_delimiter(line) {
            return (record, &text[offset..]);
        }
        if let Some((key, value)) = parse_line(line) {
            record.insert(key, value);
        }
    }

    // Unterminated block: nothing in it is trusted.
    (FrontmatterRecord::new(), text)
}

fn is_delimiter(line: &str) -> bool {
    line.trim_end() == DELIMITER
}

fn parse_line(line: &str) -> Option<(&str, FrontmatterValue)> {
    let (key, raw) = line.split_once(':')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    Some((key, coerce(strip_quotes(raw.trim()))))
}

/// Remove one matching pair of surrounding single or double quotes.
fn strip_quotes(raw: &str) -> &str {
    for quote in ['"', '\''] {
        if raw.len() >= 2 && raw.starts_with(quote) && raw.ends_with(quote) {
            return &raw[1..raw.len() - 1];
        }
    }
    raw
}

/// Coerce a raw scalar into a typed value.
///
/// Numbers are only recognised when printing the parsed number reproduces
/// the input exactly, so `007`, `1e3` and `+5` stay strings.
fn coerce(raw: &str) -> FrontmatterValue {
    match raw {
        "true" => return FrontmatterValue::Bool(true),
        "false" => return FrontmatterValue::Bool(false),
        _ => {}
    }

    if let Ok(int) = raw.parse::<i64>() {
        if int.to_string() == raw {
            return FrontmatterValue::Integer(int);
        }
    }

    if let Ok(float) = raw.parse::<f64>() {
        if float.is_finite() && float.to_string() == raw {
            return FrontmatterValue::Float(float);
        }
    }

    FrontmatterValue::String(raw.to_string())
}
