use std::borrow::Cow;

mod scanner;

use scanner::{Scanner, Token};

/// Native placeholder style of a driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaceholderStyle {
    /// Bare `?` markers bound in order (SQLite).
    #[default]
    Positional,
    /// Numbered `$1`, `$2`, … markers (PostgreSQL).
    Numbered,
}

/// Rewrite bare `?` markers into the target driver's placeholder style.
///
/// With [`PlaceholderStyle::Numbered`], the n-th bare `?` becomes `$n`, an explicit `?N` becomes
/// `$N`, and `??` becomes a literal `?` (so Postgres JSON operators stay writable). Markers
/// inside quoted strings, quoted identifiers, comments, and dollar-quoted bodies are left alone.
/// [`PlaceholderStyle::Positional`] drivers take `?` natively, so the SQL is returned as is.
///
/// ```rust
/// use sql_template::{PlaceholderStyle, translate_placeholders};
///
/// let sql = "SELECT * FROM t WHERE a = ? AND b = '?' AND c = ?";
/// assert_eq!(
///     translate_placeholders(sql, PlaceholderStyle::Numbered),
///     "SELECT * FROM t WHERE a = $1 AND b = '?' AND c = $2"
/// );
/// ```
/// Returns a borrowed `Cow` when no changes are needed.
#[must_use]
pub fn translate_placeholders(sql: &str, target: PlaceholderStyle) -> Cow<'_, str> {
    if target == PlaceholderStyle::Positional || !sql.contains('?') {
        return Cow::Borrowed(sql);
    }

    let mut out = String::with_capacity(sql.len() + 8);
    let mut next_ordinal = 1usize;
    let mut changed = false;
    for token in Scanner::new(sql) {
        match token {
            Token::Text(text) => out.push_str(text),
            Token::Marker => {
                out.push('$');
                out.push_str(&next_ordinal.to_string());
                next_ordinal += 1;
                changed = true;
            }
            Token::NumberedMarker(digits) => {
                out.push('$');
                out.push_str(digits);
                changed = true;
            }
            Token::EscapedMarker => {
                out.push('?');
                changed = true;
            }
        }
    }

    if changed {
        Cow::Owned(out)
    } else {
        Cow::Borrowed(sql)
    }
}

/// Count the bare and numbered markers in `sql` that a driver would bind.
///
/// For numbered markers the highest ordinal wins, matching how drivers size their parameter
/// list.
#[must_use]
pub fn count_placeholders(sql: &str) -> usize {
    let mut bare = 0usize;
    let mut highest = 0usize;
    for token in Scanner::new(sql) {
        match token {
            Token::Marker => bare += 1,
            Token::NumberedMarker(digits) => {
                highest = highest.max(digits.parse().unwrap_or(0));
            }
            Token::Text(_) | Token::EscapedMarker => {}
        }
    }
    bare.max(highest)
}
