//! SQL injection detection
//!
//! Decides whether a specific piece of user input changed the meaning of a
//! SQL statement it ended up in. The analysis is deliberately not a SQL
//! parser; it asks three cheaper questions in order:
//!
//! 1. Can this input carry SQL syntax at all? (early exits for tiny,
//!    alphanumeric, or purely numeric input)
//! 2. Does every occurrence of the input sit entirely inside one string
//!    literal, with no way to break out of it? (safe encapsulation)
//! 3. Does the input itself lex into keywords, operators, comments, or
//!    literal delimiters? (the input carries syntax of its own)
//!
//! Tokenization failures on the statement are surfaced as errors so the
//! engine can count them; the public entry point swallows them and returns
//! "not injection" because unparseable input is far more often a driver
//! quirk than an attack.

mod dialect;
mod tokenizer;

pub use dialect::Dialect;
pub use tokenizer::TokenizeError;

use dialect::{COMMON_SQL_KEYWORDS, SQL_DANGEROUS_IN_INPUT};
use tokenizer::{tokenize, TokenKind};

use crate::helpers::occurrences_ci;

/// Inputs longer than this skip analysis entirely (and are not flagged);
/// the cost of scanning them is not worth it on a hot path.
const MAX_ANALYZED_INPUT_LEN: usize = 10_000;

/// Returns true when `user_input` alters the token structure of `query`.
///
/// Never panics and never propagates lexer errors; a statement the
/// tokenizer cannot handle is treated as "not injection".
pub fn detect_sql_injection(query: &str, user_input: &str, dialect: Dialect) -> bool {
    analyze(query, user_input, dialect).unwrap_or(false)
}

/// Full analysis with lexer errors surfaced, so the engine can keep a
/// tokenization-failure counter.
pub(crate) fn analyze(
    query: &str,
    user_input: &str,
    dialect: Dialect,
) -> Result<bool, TokenizeError> {
    if should_return_early(query, user_input) {
        return Ok(false);
    }
    if occurrences_safely_encapsulated(query, user_input, dialect)? {
        return Ok(false);
    }
    input_carries_sql_syntax(user_input, dialect)
}

/// Cheap screens that rule out injection without tokenizing anything.
fn should_return_early(query: &str, user_input: &str) -> bool {
    // Single characters can at worst break the statement, not redirect it.
    if user_input.len() <= 1 {
        return true;
    }
    if query.len() < user_input.len() {
        return true;
    }
    if user_input.len() > MAX_ANALYZED_INPUT_LEN {
        return true;
    }
    if occurrences_ci(query, user_input).is_empty() {
        return true;
    }
    // Pure alphanumeric/underscore input cannot carry SQL syntax.
    if user_input
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return true;
    }
    is_numeric_list(user_input)
}

/// A comma-separated list of decimal numbers (`1, 2, 3`, `123.45.56`)
/// cannot inject. Spaces and commas are stripped; what remains must be
/// digits with single dots between digit runs.
fn is_numeric_list(user_input: &str) -> bool {
    let cleaned: String = user_input
        .chars()
        .filter(|c| *c != ' ' && *c != ',')
        .collect();
    if cleaned.is_empty() {
        return false;
    }
    cleaned
        .split('.')
        .all(|part| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit()))
}

/// Returns true when every occurrence of the input lies entirely inside a
/// single string literal of the statement and the input has no character
/// that could terminate or escape that literal.
fn occurrences_safely_encapsulated(
    query: &str,
    user_input: &str,
    dialect: Dialect,
) -> Result<bool, TokenizeError> {
    // A literal delimiter, an escape character, or a dialect marker string
    // in the input means it could break out of the enclosing literal.
    let breaks_out = user_input
        .chars()
        .any(|c| dialect.string_quotes().contains(&c))
        || (dialect.backslash_escapes() && user_input.contains('\\'))
        || dialect
            .dangerous_strings()
            .iter()
            .any(|s| user_input.contains(s));
    if breaks_out {
        return Ok(false);
    }

    let tokens = tokenize(query, dialect)?;
    let literal_spans: Vec<(usize, usize)> = tokens
        .iter()
        .filter(|t| t.kind == TokenKind::StringLiteral)
        .filter_map(|t| t.content)
        .collect();

    Ok(occurrences_ci(query, user_input)
        .iter()
        .all(|(start, end)| {
            literal_spans
                .iter()
                .any(|(cs, ce)| cs <= start && end <= ce)
        }))
}

/// Lex the input on its own and look for tokens that would reshape a
/// statement: keywords, operators, comments, or an identifier used as a
/// function call.
fn input_carries_sql_syntax(user_input: &str, dialect: Dialect) -> Result<bool, TokenizeError> {
    // Inputs that are exactly one everyday SQL keyword show up constantly
    // in sort/pagination parameters and are never flagged on their own.
    if COMMON_SQL_KEYWORDS.contains(&user_input.to_ascii_uppercase().as_str()) {
        return Ok(false);
    }

    if SQL_DANGEROUS_IN_INPUT
        .iter()
        .chain(dialect.dangerous_strings())
        .any(|s| user_input.contains(s))
    {
        return Ok(true);
    }

    // Quote characters were screened above, so this cannot hit an
    // unterminated-literal error; propagate anyway rather than assert.
    let tokens = tokenize(user_input, dialect)?;
    for (i, token) in tokens.iter().enumerate() {
        match token.kind {
            TokenKind::Keyword | TokenKind::Operator | TokenKind::Comment => return Ok(true),
            TokenKind::Identifier => {
                if let Some(next) = tokens.get(i + 1) {
                    if next.kind == TokenKind::Punctuation
                        && &user_input[next.start..next.end] == "("
                    {
                        return Ok(true);
                    }
                }
            }
            _ => {}
        }
    }
    Ok(false)
}
