//! Backend dialects and placeholder translation.

use std::borrow::Cow;

use quarry_schema::PLACEHOLDER;

/// SQL dialect of a backend, as far as parameter markers are concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// MySQL binds positional `?` markers.
    MySql,
    /// SQLite binds numbered `?1`, `?2`, ... markers.
    Sqlite,
}

impl Dialect {
    /// Get the parameter placeholder for a 1-based parameter index.
    pub fn placeholder(&self, index: usize) -> Cow<'static, str> {
        match self {
            Self::MySql => Cow::Borrowed("?"),
            Self::Sqlite => Cow::Owned(format!("?{}", index)),
        }
    }

    /// Whether the native marker is the portable `?` itself.
    pub fn uses_portable_placeholder(&self) -> bool {
        matches!(self, Self::MySql)
    }

    /// Backend name used in logs and errors.
    pub fn name(&self) -> &'static str {
        match self {
            Self::MySql => "mysql",
            Self::Sqlite => "sqlite",
        }
    }
}

/// Lexical context of the translation scanner.
#[derive(Clone, Copy)]
enum Scan {
    Code,
    Quoted(char),
    LineComment,
    BlockComment,
}

/// Rewrite every portable `?` placeholder into the dialect's native marker.
///
/// Question marks inside quoted strings, quoted identifiers and `--` or
/// `/* */` comments are left alone.
pub fn translate_placeholders(sql: &str, dialect: Dialect) -> Cow<'_, str> {
    if dialect.uses_portable_placeholder() || !sql.contains(PLACEHOLDER) {
        return Cow::Borrowed(sql);
    }

    let mut out = String::with_capacity(sql.len() + 8);
    let mut state = Scan::Code;
    let mut index = 0;
    let mut chars = sql.chars().peekable();

    while let Some(c) = chars.next() {
        match state {
            Scan::Quoted(q) if c == q => state = Scan::Code,
            Scan::LineComment if c == '\n' => state = Scan::Code,
            Scan::BlockComment if c == '*' && chars.peek() == Some(&'/') => {
                out.push(c);
                push_next(&mut chars, &mut out);
                state = Scan::Code;
                continue;
            }
            Scan::Code if c == '\'' || c == '"' || c == '`' => state = Scan::Quoted(c),
            Scan::Code if c == '-' && chars.peek() == Some(&'-') => state = Scan::LineComment,
            Scan::Code if c == '/' && chars.peek() == Some(&'*') => {
                out.push(c);
                push_next(&mut chars, &mut out);
                state = Scan::BlockComment;
                continue;
            }
            Scan::Code if c == PLACEHOLDER => {
                index += 1;
                out.push_str(&dialect.placeholder(index));
                continue;
            }
            _ => {}
        }
        out.push(c);
    }

    Cow::Owned(out)
}

/// Copy the second character of a two-character comment delimiter.
fn push_next(chars: &mut std::iter::Peekable<std::str::Chars<'_>>, out: &mut String) {
    if let Some(c) = chars.next() {
        out.push(c);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_dialect_placeholder() {
        assert_eq!(Dialect::MySql.placeholder(1), "?");
        assert_eq!(Dialect::MySql.placeholder(3), "?");
        assert_eq!(Dialect::Sqlite.placeholder(1), "?1");
        assert_eq!(Dialect::Sqlite.placeholder(12), "?12");
    }

    #[test]
    fn test_mysql_translation_is_identity() {
        let sql = "select `id` from `users` where `id`=?";
        assert!(matches!(
            translate_placeholders(sql, Dialect::MySql),
            Cow::Borrowed(_)
        ));
    }

    #[test]
    fn test_sqlite_translation_numbers_markers() {
        let sql = "update `users` set `name`=?, `email`=? where `id`=?";
        assert_eq!(
            translate_placeholders(sql, Dialect::Sqlite),
            "update `users` set `name`=?1, `email`=?2 where `id`=?3"
        );
    }

    #[test]
    fn test_translation_skips_quoted_text() {
        let sql = "select `what?` from `t` where `a`=? and `b`='why?' and `c`=?";
        assert_eq!(
            translate_placeholders(sql, Dialect::Sqlite),
            "select `what?` from `t` where `a`=?1 and `b`='why?' and `c`=?2"
        );
    }

    #[test]
    fn test_translation_handles_escaped_quotes() {
        let sql = "select * from `t` where `a`='it''s?' and `b`=?";
        assert_eq!(
            translate_placeholders(sql, Dialect::Sqlite),
            "select * from `t` where `a`='it''s?' and `b`=?1"
        );
    }

    #[test]
    fn test_translation_skips_comments() {
        let sql = "select * from `t` where `a`=? -- why?\nand `b`=? /* or? */ and `c`=?";
        assert_eq!(
            translate_placeholders(sql, Dialect::Sqlite),
            "select * from `t` where `a`=?1 -- why?\nand `b`=?2 /* or? */ and `c`=?3"
        );
    }

    #[test]
    fn test_translation_keeps_arithmetic_operators() {
        let sql = "select `a`-? / ?, `b`*? from `t`";
        assert_eq!(
            translate_placeholders(sql, Dialect::Sqlite),
            "select `a`-?1 / ?2, `b`*?3 from `t`"
        );
    }
}
