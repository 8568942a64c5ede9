//! Dialect-aware SQL tokenizer
//!
//! A single-pass lexer that is deliberately not a SQL parser: it only
//! recognizes the lexical shapes the injection analysis cares about (string
//! literals with their escape conventions, comments, keywords, operators)
//! and leaves grammar to the database. Spans are byte offsets into the
//! original text so they can be compared against substring occurrence spans.

use std::fmt;

use super::dialect::{Dialect, SQL_KEYWORDS, SQL_OPERATORS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TokenKind {
    /// Quoted string literal, including dollar-quoted bodies on Postgres.
    StringLiteral,
    Number,
    /// Bare or quoted identifier.
    Identifier,
    Keyword,
    Operator,
    Punctuation,
    Comment,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Token {
    pub kind: TokenKind,
    /// Byte span of the whole token, delimiters included.
    pub start: usize,
    pub end: usize,
    /// For string literals, the byte span of the contents between the
    /// delimiters.
    pub content: Option<(usize, usize)>,
}

/// Lexical failure: an unterminated string literal. The byte position points
/// at the opening delimiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenizeError {
    pub position: usize,
}

impl fmt::Display for TokenizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unterminated string literal at byte {}",
            self.position
        )
    }
}

impl std::error::Error for TokenizeError {}

pub(crate) fn tokenize(sql: &str, dialect: Dialect) -> Result<Vec<Token>, TokenizeError> {
    let bytes = sql.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];

        if b.is_ascii_whitespace() {
            i += 1;
            continue;
        }

        // Single-line comments run to the newline, exclusive.
        if b == b'#' || (b == b'-' && bytes.get(i + 1) == Some(&b'-')) {
            let start = i;
            while i < bytes.len() && bytes[i] != b'\n' {
                i += 1;
            }
            tokens.push(Token {
                kind: TokenKind::Comment,
                start,
                end: i,
                content: None,
            });
            continue;
        }

        // Multi-line comments; an unclosed one runs to end of input, which
        // is how the engines themselves treat it.
        if b == b'/' && bytes.get(i + 1) == Some(&b'*') {
            let start = i;
            i += 2;
            while i < bytes.len() {
                if bytes[i] == b'*' && bytes.get(i + 1) == Some(&b'/') {
                    i += 2;
                    break;
                }
                i += 1;
            }
            tokens.push(Token {
                kind: TokenKind::Comment,
                start,
                end: i.min(bytes.len()),
                content: None,
            });
            continue;
        }

        let c = b as char;

        if b.is_ascii() && dialect.string_quotes().contains(&c) {
            let (token, next) = scan_quoted(bytes, i, b, dialect, TokenKind::StringLiteral)?;
            tokens.push(token);
            i = next;
            continue;
        }

        if b.is_ascii() && dialect.identifier_quotes().contains(&c) {
            let (token, next) = scan_quoted(bytes, i, b, dialect, TokenKind::Identifier)?;
            tokens.push(token);
            i = next;
            continue;
        }

        if b == b'$' && dialect.dollar_quoting() {
            if let Some((token, next)) = scan_dollar_quoted(bytes, i)? {
                tokens.push(token);
                i = next;
                continue;
            }
            tokens.push(Token {
                kind: TokenKind::Punctuation,
                start: i,
                end: i + 1,
                content: None,
            });
            i += 1;
            continue;
        }

        // System-variable references like @@GLOBAL.
        if b == b'@' && bytes.get(i + 1) == Some(&b'@') {
            let start = i;
            i += 2;
            while i < bytes.len() && is_word_byte(bytes[i]) {
                i += 1;
            }
            let word = sql[start..i].to_ascii_uppercase();
            let kind = if dialect.keywords().contains(&word.as_str()) {
                TokenKind::Keyword
            } else {
                TokenKind::Identifier
            };
            tokens.push(Token {
                kind,
                start,
                end: i,
                content: None,
            });
            continue;
        }

        if b.is_ascii_digit() {
            let start = i;
            if b == b'0' && matches!(bytes.get(i + 1), Some(b'x') | Some(b'X')) {
                i += 2;
                while i < bytes.len() && bytes[i].is_ascii_hexdigit() {
                    i += 1;
                }
            } else {
                while i < bytes.len() && (bytes[i].is_ascii_digit() || bytes[i] == b'.') {
                    i += 1;
                }
            }
            tokens.push(Token {
                kind: TokenKind::Number,
                start,
                end: i,
                content: None,
            });
            continue;
        }

        if b.is_ascii_alphabetic() || b == b'_' {
            let start = i;
            while i < bytes.len() && is_word_byte(bytes[i]) {
                i += 1;
            }
            let word = sql[start..i].to_ascii_uppercase();
            let kind = if SQL_KEYWORDS.contains(&word.as_str())
                || dialect.keywords().contains(&word.as_str())
            {
                TokenKind::Keyword
            } else {
                TokenKind::Identifier
            };
            tokens.push(Token {
                kind,
                start,
                end: i,
                content: None,
            });
            continue;
        }

        if b.is_ascii() && SQL_OPERATORS.contains(&c) {
            tokens.push(Token {
                kind: TokenKind::Operator,
                start: i,
                end: i + 1,
                content: None,
            });
            i += 1;
            continue;
        }

        // Everything else, including multi-byte characters, is punctuation.
        let width = utf8_width(b);
        tokens.push(Token {
            kind: TokenKind::Punctuation,
            start: i,
            end: i + width,
            content: None,
        });
        i += width;
    }

    Ok(tokens)
}

/// Scan a quoted region opened by `quote` at `start`. Honors doubled-quote
/// escapes and, where the dialect allows, backslash escapes.
fn scan_quoted(
    bytes: &[u8],
    start: usize,
    quote: u8,
    dialect: Dialect,
    kind: TokenKind,
) -> Result<(Token, usize), TokenizeError> {
    let mut i = start + 1;
    while i < bytes.len() {
        if bytes[i] == b'\\' && dialect.backslash_escapes() {
            i += 2;
            continue;
        }
        if bytes[i] == quote {
            if bytes.get(i + 1) == Some(&quote) {
                i += 2;
                continue;
            }
            let token = Token {
                kind,
                start,
                end: i + 1,
                content: Some((start + 1, i)),
            };
            return Ok((token, i + 1));
        }
        i += 1;
    }
    Err(TokenizeError { position: start })
}

/// Scan a Postgres dollar-quoted literal `$tag$ ... $tag$` starting at the
/// opening `$`. Returns None when the `$` does not open a valid delimiter.
fn scan_dollar_quoted(
    bytes: &[u8],
    start: usize,
) -> Result<Option<(Token, usize)>, TokenizeError> {
    let mut tag_end = start + 1;
    while tag_end < bytes.len() && is_word_byte(bytes[tag_end]) {
        tag_end += 1;
    }
    if bytes.get(tag_end) != Some(&b'$') {
        return Ok(None);
    }
    let delimiter = &bytes[start..=tag_end];
    let content_start = tag_end + 1;

    let mut i = content_start;
    while i + delimiter.len() <= bytes.len() {
        if &bytes[i..i + delimiter.len()] == delimiter {
            let token = Token {
                kind: TokenKind::StringLiteral,
                start,
                end: i + delimiter.len(),
                content: Some((content_start, i)),
            };
            return Ok(Some((token, i + delimiter.len())));
        }
        i += 1;
    }
    Err(TokenizeError { position: start })
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

fn utf8_width(b: u8) -> usize {
    match b {
        0x00..=0x7f => 1,
        0xc0..=0xdf => 2,
        0xe0..=0xef => 3,
        _ => 4,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(sql: &str, dialect: Dialect) -> Vec<TokenKind> {
        tokenize(sql, dialect)
            .expect("should tokenize")
            .iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_basic_query() {
        let kinds = kinds("SELECT id FROM users WHERE id = 1", Dialect::MySql);
        assert_eq!(
            kinds,
            vec![
                TokenKind::Keyword,    // SELECT
                TokenKind::Identifier, // id
                TokenKind::Keyword,    // FROM
                TokenKind::Identifier, // users
                TokenKind::Keyword,    // WHERE
                TokenKind::Identifier, // id
                TokenKind::Operator,   // =
                TokenKind::Number,     // 1
            ]
        );
    }

    #[test]
    fn test_string_literal_content_span() {
        let sql = "SELECT * FROM users WHERE name = 'John Doe'";
        let tokens = tokenize(sql, Dialect::MySql).expect("should tokenize");
        let literal = tokens
            .iter()
            .find(|t| t.kind == TokenKind::StringLiteral)
            .expect("literal token");
        let (start, end) = literal.content.expect("content span");
        assert_eq!(&sql[start..end], "John Doe");
    }

    #[test]
    fn test_doubled_quote_escape() {
        let sql = "'O''Brien'";
        let tokens = tokenize(sql, Dialect::Postgres).expect("should tokenize");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::StringLiteral);
        assert_eq!(tokens[0].content, Some((1, 9)));
    }

    #[test]
    fn test_backslash_escape_is_dialect_specific() {
        // MySQL honors the backslash, so the literal runs to the last quote.
        let tokens = tokenize(r"'a\'b'", Dialect::MySql).expect("should tokenize");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].end, 6);
        // SQLite treats the backslash as a plain character, so the literal
        // closes early and the trailing quote is left unterminated.
        assert!(tokenize(r"'a\'b'", Dialect::Sqlite).is_err());
    }

    #[test]
    fn test_unterminated_literal_is_error() {
        let err = tokenize("SELECT 'abc", Dialect::MySql).expect_err("should fail");
        assert_eq!(err.position, 7);
    }

    #[test]
    fn test_comments() {
        assert_eq!(
            kinds("-- drop it\n1", Dialect::MySql),
            vec![TokenKind::Comment, TokenKind::Number]
        );
        assert_eq!(kinds("/* x */ 1", Dialect::MySql), vec![
            TokenKind::Comment,
            TokenKind::Number
        ]);
        assert_eq!(kinds("# note", Dialect::MySql), vec![TokenKind::Comment]);
        // Unclosed block comment swallows the rest of the input.
        assert_eq!(kinds("/* open 1", Dialect::MySql), vec![TokenKind::Comment]);
    }

    #[test]
    fn test_dollar_quoting() {
        let sql = "SELECT $$ DROP TABLE users $$";
        let tokens = tokenize(sql, Dialect::Postgres).expect("should tokenize");
        let literal = tokens
            .iter()
            .find(|t| t.kind == TokenKind::StringLiteral)
            .expect("literal token");
        let (start, end) = literal.content.expect("content span");
        assert_eq!(&sql[start..end], " DROP TABLE users ");

        let tagged = "SELECT $fn$ body $fn$";
        let tokens = tokenize(tagged, Dialect::Postgres).expect("should tokenize");
        let literal = tokens
            .iter()
            .find(|t| t.kind == TokenKind::StringLiteral)
            .expect("literal token");
        let (start, end) = literal.content.expect("content span");
        assert_eq!(&tagged[start..end], " body ");
    }

    #[test]
    fn test_unterminated_dollar_quote_is_error() {
        assert!(tokenize("SELECT $$ oops", Dialect::Postgres).is_err());
        // A lone dollar sign is just punctuation.
        assert!(tokenize("SELECT 1 $ 2", Dialect::Postgres).is_ok());
    }

    #[test]
    fn test_system_variables() {
        let tokens = tokenize("@@GLOBAL.sql_mode", Dialect::MySql).expect("should tokenize");
        assert_eq!(tokens[0].kind, TokenKind::Keyword);
        let generic = tokenize("@@GLOBAL", Dialect::Generic).expect("should tokenize");
        assert_eq!(generic[0].kind, TokenKind::Identifier);
    }

    #[test]
    fn test_keywords_need_word_boundaries() {
        // "androgynous" must not produce an AND keyword.
        assert_eq!(kinds("androgynous", Dialect::MySql), vec![TokenKind::Identifier]);
    }
}
