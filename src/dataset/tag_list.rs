//! Tag-list literals as stored in the dream table.
//!
//! List columns are serialized as bracketed literals of quoted strings, e.g.
//! `['fear', 'happy']`. Both quote styles are accepted, along with the usual
//! backslash escapes. An empty cell is read as an empty list.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TagListError {
    #[error("expected '[' at start of list literal")]
    MissingOpen,

    #[error("expected ']' at end of list literal")]
    MissingClose,

    #[error("unterminated string starting at offset {0}")]
    Unterminated(usize),

    #[error("unexpected character {ch:?} at offset {offset}")]
    Unexpected { ch: char, offset: usize },
}

/// Parse a list literal into its string elements.
pub fn parse_tag_list(raw: &str) -> Result<Vec<String>, TagListError> {
    let text = raw.trim();
    if text.is_empty() {
        return Ok(Vec::new());
    }
    let inner = text.strip_prefix('[').ok_or(TagListError::MissingOpen)?;
    let inner = inner.strip_suffix(']').ok_or(TagListError::MissingClose)?;
    // Offsets reported relative to the trimmed literal.
    let base = 1;

    let mut tags = Vec::new();
    let mut chars = inner.char_indices().peekable();
    let mut expect_item = true;

    while let Some(&(offset, ch)) = chars.peek() {
        match ch {
            c if c.is_whitespace() => {
                chars.next();
            }
            ',' if !expect_item => {
                expect_item = true;
                chars.next();
            }
            '\'' | '"' if expect_item => {
                let quote = ch;
                chars.next();
                let mut value = String::new();
                let mut closed = false;
                while let Some((_, c)) = chars.next() {
                    match c {
                        '\\' => match chars.next() {
                            Some((_, 'n')) => value.push('\n'),
                            Some((_, 't')) => value.push('\t'),
                            Some((_, 'r')) => value.push('\r'),
                            Some((_, other)) => value.push(other),
                            None => break,
                        },
                        c if c == quote => {
                            closed = true;
                            break;
                        }
                        c => value.push(c),
                    }
                }
                if !closed {
                    return Err(TagListError::Unterminated(base + offset));
                }
                tags.push(value);
                expect_item = false;
            }
            _ => {
                return Err(TagListError::Unexpected {
                    ch,
                    offset: base + offset,
                })
            }
        }
    }

    Ok(tags)
}

/// Format tags as a list literal readable by [`parse_tag_list`].
///
/// Single quotes are used unless a tag contains a single quote and no double
/// quote, matching the usual repr of string lists.
pub fn format_tag_list(tags: &[String]) -> String {
    let items: Vec<String> = tags.iter().map(|t| quote_tag(t)).collect();
    format!("[{}]", items.join(", "))
}

fn quote_tag(tag: &str) -> String {
    let quote = if tag.contains('\'') && !tag.contains('"') { '"' } else { '\'' };
    let mut out = String::with_capacity(tag.len() + 2);
    out.push(quote);
    for c in tag.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}
