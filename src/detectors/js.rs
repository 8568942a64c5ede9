//! NoSQL / server-side JavaScript injection detection
//!
//! MongoDB evaluates JavaScript handed to it through `$where`, `$function`
//! and `$accumulator`. Strings in JS are always quoted, so any user input
//! that appears in such code without being fully enclosed in one kind of
//! quote has become code rather than data.

use serde_json::Value;

use crate::helpers::segment_pairs;

/// Filter operators whose values are server-evaluated JavaScript.
const SERVER_SIDE_JS_OPERATORS: &[&str] = &["$where", "$accumulator", "$function"];

/// Quote characters that can enclose a JS string.
const JS_QUOTES: &[char] = &['"', '\'', '`'];

/// Returns true when `user_input` appears unencapsulated inside `code`.
pub fn detect_js_injection(code: &str, user_input: &str) -> bool {
    if user_input.len() <= 1 {
        return false;
    }
    if user_input.len() > code.len() {
        return false;
    }
    if !code.contains(user_input) {
        return false;
    }
    !all_occurrences_quoted(code, user_input)
}

/// Every occurrence of the input must be bounded by the same quote character
/// on both sides, and the input must not contain that character itself.
fn all_occurrences_quoted(code: &str, user_input: &str) -> bool {
    segment_pairs(code, user_input).iter().all(|(current, next)| {
        let Some(before) = current.chars().last() else {
            return false;
        };
        let Some(after) = next.chars().next() else {
            return false;
        };
        if !JS_QUOTES.contains(&before) {
            return false;
        }
        if before != after {
            return false;
        }
        !user_input.contains(before)
    })
}

/// Inspect one MongoDB filter fragment for server-side JS carrying user
/// input. Only the JS-evaluating operators are checked; everything else in
/// the fragment, including non-string operator values, is ignored.
pub fn detect_nosql_js_injection(user_input: &str, filter_fragment: &Value) -> bool {
    let Value::Object(map) = filter_fragment else {
        return false;
    };
    for (key, value) in map {
        if !SERVER_SIDE_JS_OPERATORS.contains(&key.as_str()) {
            continue;
        }
        if let Some(code) = extract_code(key, value) {
            if !code.is_empty() && detect_js_injection(&code, user_input) {
                return true;
            }
        }
    }
    false
}

/// Pull the JS code string out of a `$where`, `$function` or `$accumulator`
/// value. Function arguments are ignored: Mongo passes them as string
/// values, and a quoted JS string cannot be broken out of by its contents.
fn extract_code(key: &str, value: &Value) -> Option<String> {
    if let Value::String(code) = value {
        return Some(code.clone());
    }
    let Value::Object(map) = value else {
        return None;
    };
    if key != "$function" && key != "$accumulator" {
        return None;
    }
    // An explicit non-JS language opts the body out of analysis.
    if let Some(Value::String(lang)) = map.get("lang") {
        if lang != "js" {
            return None;
        }
    }
    if key == "$function" {
        return match map.get("body") {
            Some(Value::String(body)) => Some(body.clone()),
            _ => None,
        };
    }
    // $accumulator: all code-bearing fields, concatenated.
    let mut code = String::new();
    for field in ["init", "accumulate", "merge", "finalize"] {
        if let Some(Value::String(part)) = map.get(field) {
            code.push_str(part);
        }
    }
    Some(code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_where_string_injection() {
        let filter = json!({ "$where": "this.name === 'admin'" });
        assert!(detect_nosql_js_injection("this.name === 'admin'", &filter));
    }

    #[test]
    fn test_quoted_input_is_safe() {
        let filter = json!({ "$where": "this.name === 'John Doe'" });
        assert!(!detect_nosql_js_injection("John Doe", &filter));
    }

    #[test]
    fn test_mismatched_quotes_are_not_safe() {
        assert!(detect_js_injection("this.name === 'admin\"", "admin"));
    }

    #[test]
    fn test_quote_char_inside_input_is_not_safe() {
        assert!(detect_js_injection(
            "this.name === 'a' || 'b'=='b'",
            "a' || 'b'=='b"
        ));
    }

    #[test]
    fn test_short_or_absent_input() {
        assert!(!detect_js_injection("this.x === 'y'", "y"));
        assert!(!detect_js_injection("this.x", "not in the code"));
        assert!(!detect_js_injection("x", "longer than code"));
    }

    #[test]
    fn test_function_body() {
        let filter = json!({
            "$function": {
                "body": "function(a) { return a === 1 || true; }",
                "args": ["$amount"],
                "lang": "js",
            }
        });
        assert!(detect_nosql_js_injection("1 || true", &filter));
    }

    #[test]
    fn test_non_js_lang_is_ignored() {
        let filter = json!({
            "$function": {
                "body": "function(a) { return a === 1 || true; }",
                "lang": "python",
            }
        });
        assert!(!detect_nosql_js_injection("1 || true", &filter));
    }

    #[test]
    fn test_accumulator_fields() {
        let filter = json!({
            "$accumulator": {
                "init": "function() { return 0; }",
                "accumulate": "function(s, x) { return s + x; sleep(1000)}",
                "lang": "js",
            }
        });
        assert!(detect_nosql_js_injection("s + x; sleep(1000)", &filter));
    }

    #[test]
    fn test_non_js_operators_are_ignored() {
        let filter = json!({ "$gt": "1 || true", "title": "1 || true" });
        assert!(!detect_nosql_js_injection("1 || true", &filter));
        let filter = json!({ "$where": 42 });
        assert!(!detect_nosql_js_injection("42", &filter));
    }
}
