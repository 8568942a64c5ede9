//! SQL dialect lexical rules
//!
//! A dialect is a closed variant with static tables: which characters open
//! string literals and quoted identifiers, which escape conventions apply
//! inside literals, and which keywords and marker strings are dangerous on
//! top of the shared core. Adding a dialect means adding a variant and its
//! tables, not a trait object.

/// SQL dialect selector, chosen per call site by the instrumentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    MySql,
    Postgres,
    Sqlite,
    /// Fallback ruleset for drivers without a dedicated dialect.
    Generic,
}

/// Keywords that can start or reshape a statement in any dialect.
pub(crate) const SQL_KEYWORDS: &[&str] = &[
    "INSERT",
    "SELECT",
    "CREATE",
    "DROP",
    "DATABASE",
    "UPDATE",
    "DELETE",
    "ALTER",
    "GRANT",
    "SAVEPOINT",
    "COMMIT",
    "ROLLBACK",
    "TRUNCATE",
    "OR",
    "AND",
    "UNION",
    "AS",
    "WHERE",
    "DISTINCT",
    "FROM",
    "INTO",
    "TOP",
    "BETWEEN",
    "LIKE",
    "IN",
    "NULL",
    "NOT",
    "TABLE",
    "INDEX",
    "VIEW",
    "COUNT",
    "SUM",
    "AVG",
    "MIN",
    "MAX",
    "GROUP",
    "BY",
    "HAVING",
    "DESC",
    "ASC",
    "OFFSET",
    "FETCH",
    "LEFT",
    "RIGHT",
    "INNER",
    "OUTER",
    "JOIN",
    "EXISTS",
    "REVOKE",
    "ALL",
    "LIMIT",
    "ORDER",
    "ADD",
    "CONSTRAINT",
    "COLUMN",
    "ANY",
    "BACKUP",
    "CASE",
    "CHECK",
    "REPLACE",
    "DEFAULT",
    "EXEC",
    "FOREIGN",
    "KEY",
    "FULL",
    "PROCEDURE",
    "ROWNUM",
    "SET",
    "SESSION",
    "GLOBAL",
    "UNIQUE",
    "VALUES",
    "COLLATE",
    "IS",
];

/// Keywords and phrases so common in ordinary request parameters (sort
/// fields, pagination controls) that an input consisting of exactly one of
/// them is never flagged on its own.
pub(crate) const COMMON_SQL_KEYWORDS: &[&str] = &[
    "SELECT",
    "INSERT",
    "FUNCTION",
    "WHERE",
    "FROM",
    "DISTINCT",
    "GROUP BY",
    "ORDER BY",
    "HAVING",
    "LIMIT",
    "OFFSET",
    "UNION",
    "UNION ALL",
    "JOIN",
    "INNER JOIN",
    "LEFT JOIN",
    "RIGHT JOIN",
    "FULL JOIN",
    "NOT NULL",
    "IS NULL",
    "IS NOT NULL",
    "AND",
    "OR",
    "NOT",
    "LIKE",
    "IN",
    "IS",
    "NULL",
    "ASC",
    "DESC",
    "BETWEEN",
    "EXISTS",
    "ALL",
    "ANY",
    "CASE",
    "WHEN",
    "THEN",
    "ELSE",
    "END",
    "AS",
    "ON",
];

/// Single-character operators that can rewrite statement logic.
pub(crate) const SQL_OPERATORS: &[char] = &[
    '=', '!', ';', '+', '-', '*', '/', '%', '&', '|', '^', '>', '<',
];

/// Strings that are dangerous inside user input in every dialect: literal
/// delimiters, the escape character, and comment openers.
pub(crate) const SQL_DANGEROUS_IN_INPUT: &[&str] = &["'", "\"", "`", "\\", "/*", "--", "#"];

impl Dialect {
    /// Characters that open a string literal.
    pub(crate) fn string_quotes(self) -> &'static [char] {
        match self {
            Dialect::MySql | Dialect::Generic => &['\'', '"'],
            Dialect::Postgres | Dialect::Sqlite => &['\''],
        }
    }

    /// Characters that open a quoted identifier.
    pub(crate) fn identifier_quotes(self) -> &'static [char] {
        match self {
            Dialect::MySql | Dialect::Generic => &['`'],
            Dialect::Postgres => &['"'],
            Dialect::Sqlite => &['"', '`'],
        }
    }

    /// Whether a backslash inside a literal escapes the next character.
    pub(crate) fn backslash_escapes(self) -> bool {
        matches!(self, Dialect::MySql | Dialect::Generic)
    }

    /// Whether `$tag$ ... $tag$` dollar-quoted literals are recognized.
    pub(crate) fn dollar_quoting(self) -> bool {
        matches!(self, Dialect::Postgres)
    }

    /// Dialect-specific keywords flagged on top of the shared core. Entries
    /// starting with `@@` match system-variable references rather than
    /// bare words.
    pub(crate) fn keywords(self) -> &'static [&'static str] {
        match self {
            Dialect::MySql => &[
                "GLOBAL",
                "SESSION",
                "PERSIST",
                "PERSIST_ONLY",
                "@@GLOBAL",
                "@@SESSION",
            ],
            Dialect::Postgres => &["CLIENT_ENCODING"],
            Dialect::Sqlite => &["VACUUM", "ATTACH", "DETACH"],
            Dialect::Generic => &[],
        }
    }

    /// Marker strings that are dangerous in user input for this dialect
    /// beyond the shared set. Postgres flags `$` because a dollar sign can
    /// participate in a dollar-quote delimiter.
    pub(crate) fn dangerous_strings(self) -> &'static [&'static str] {
        match self {
            Dialect::Postgres => &["$"],
            _ => &[],
        }
    }
}
