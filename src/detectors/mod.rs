//! Attack detectors
//!
//! Pure, synchronous analyzers over (operation, user input) pairs. Each
//! detector answers one question: did this specific piece of user input
//! change the meaning of the operation it ended up in? All detectors are
//! stateless and safe to call concurrently; none perform I/O or suspend.

pub mod js;
pub mod path_traversal;
pub mod shell;
pub mod sql;
pub mod ssrf;

pub use js::{detect_js_injection, detect_nosql_js_injection};
pub use path_traversal::detect_path_traversal;
pub use shell::{contains_shell_syntax, detect_shell_injection, is_unsupported_shell};
pub use sql::{detect_sql_injection, Dialect};
pub use ssrf::{detect_ssrf, should_ignore_for_ssrf, TaintSource};
