//! Shell injection detection
//!
//! Heuristic analysis of a command line and the user input that flowed into
//! it. The core signal is a fixed set of shell metacharacters plus a curated
//! list of dangerous standalone commands matched as whole tokens. There is
//! no shell grammar here on purpose: the detector mirrors what `/bin/sh`
//! treats as structure, and anything fancier belongs to the shell itself.

use std::sync::OnceLock;

use regex::Regex;

use crate::helpers::segment_pairs;

/// Characters that always introduce shell structure when they appear in
/// user input inside a command line.
const DANGEROUS_CHARS: &[char] = &[
    '#', '!', '"', '$', '&', '\'', '(', ')', '*', ';', '<', '=', '>', '?', '[', '\\', ']', '^',
    '`', '{', '|', '}', ' ', '\n', '\t', '~', '\r', '\x0c',
];

/// Metacharacters checked by the standalone [`contains_shell_syntax`]
/// primitive. Spaces and tabs are excluded there because that primitive is
/// applied to whole command strings, where ordinary arguments are separated
/// by spaces.
const DANGEROUS_CHARS_STANDALONE: &[char] = &[
    '#', '!', '"', '$', '&', '\'', '(', ')', '*', ';', '<', '=', '>', '?', '[', '\\', ']', '^',
    '`', '{', '|', '}', '\n', '~', '\r', '\x0c',
];

/// Commands dangerous enough to flag when they appear as a whole token.
const COMMANDS: &[&str] = &[
    "sleep",
    "shutdown",
    "reboot",
    "poweroff",
    "halt",
    "ifconfig",
    "chmod",
    "chown",
    "ping",
    "ssh",
    "scp",
    "curl",
    "wget",
    "telnet",
    "kill",
    "killall",
    "rm",
    "mv",
    "cp",
    "touch",
    "echo",
    "cat",
    "head",
    "tail",
    "grep",
    "find",
    "awk",
    "sed",
    "sort",
    "uniq",
    "wc",
    "ls",
    "env",
    "ps",
    "who",
    "whoami",
    "id",
    "w",
    "df",
    "du",
    "pwd",
    "uname",
    "hostname",
    "netstat",
    "passwd",
    "arch",
    "printenv",
    "logname",
    "pstree",
    "hostnamectl",
    "set",
    "lsattr",
    "killall5",
    "dmesg",
    "history",
    "free",
    "uptime",
    "finger",
    "top",
    "shopt",
    // The null command; shows up in URLs passed as arguments, so it only
    // counts when bounded by separators.
    ":",
];

/// Common binary locations a command may be prefixed with.
const PATH_PREFIXES: &[&str] = &[
    "/bin/",
    "/sbin/",
    "/usr/bin/",
    "/usr/sbin/",
    "/usr/local/bin/",
    "/usr/local/sbin/",
];

/// Characters that separate commands and arguments.
const SEPARATORS: &[char] = &[
    ' ', '\t', '\n', ';', '&', '|', '(', ')', '<', '>', '\r', '\x0c',
];

/// Shells whose syntax this detector understands. The literal `true` is
/// what some callers pass to mean "the platform default shell", and an
/// empty string means no shell was configured at all.
const SUPPORTED_SHELLS: &[&str] = &["", "true", "sh", "/bin/sh"];

fn commands_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        let prefixes: Vec<String> = PATH_PREFIXES.iter().map(|p| regex::escape(p)).collect();
        // Longer names first so "killall" wins over "kill".
        let mut commands: Vec<String> = COMMANDS.iter().map(|c| regex::escape(c)).collect();
        commands.sort_by_key(|c| std::cmp::Reverse(c.len()));
        let pattern = format!(
            "(?i)([/.]*(?:{})?(?:{}))",
            prefixes.join("|"),
            commands.join("|")
        );
        // Assembled from static escaped tables, always valid syntax.
        Regex::new(&pattern).expect("static shell command pattern compiles")
    })
}

/// Returns true when a whole command string carries shell syntax of its
/// own: metacharacters beyond ordinary argument separators, or a command
/// line that consists of exactly one dangerous command.
pub fn contains_shell_syntax(input: &str) -> bool {
    if input.chars().all(char::is_whitespace) {
        return false;
    }
    if input.chars().any(|c| DANGEROUS_CHARS_STANDALONE.contains(&c)) {
        return true;
    }
    match commands_regex().find(input) {
        Some(m) => m.start() == 0 && m.end() == input.len(),
        None => false,
    }
}

/// Returns true when `user_input` introduces shell syntax into `command`.
pub fn detect_shell_injection(command: &str, user_input: &str) -> bool {
    // Single characters can break the command but not redirect it.
    if user_input.len() <= 1 {
        return false;
    }
    if user_input.len() > command.len() {
        return false;
    }
    if !command.contains(user_input) {
        return false;
    }
    if is_safely_encapsulated(command, user_input) {
        return false;
    }
    input_introduces_syntax(command, user_input)
}

/// Every occurrence of the input must sit between matching single or double
/// quotes, with nothing in the input able to terminate or escape them.
fn is_safely_encapsulated(command: &str, user_input: &str) -> bool {
    let pairs = segment_pairs(command, user_input);
    if pairs.is_empty() {
        return false;
    }
    pairs.iter().all(|(current, next)| {
        let Some(before) = current.chars().last() else {
            return false;
        };
        let Some(after) = next.chars().next() else {
            return false;
        };
        if before != '"' && before != '\'' {
            return false;
        }
        if before != after {
            return false;
        }
        if user_input.contains(before) {
            return false;
        }
        // Double quotes still interpolate these.
        if before == '"' && user_input.contains(&['$', '`', '\\', '!'][..]) {
            return false;
        }
        true
    })
}

fn input_introduces_syntax(command: &str, user_input: &str) -> bool {
    if user_input.chars().all(char::is_whitespace) {
        return false;
    }
    if user_input.chars().any(|c| DANGEROUS_CHARS.contains(&c)) {
        return true;
    }

    // Rare case: the user input is the entire command. Flag only if the
    // whole thing is one dangerous command; `shutdown -h now` is caught
    // above through its spaces.
    if command == user_input {
        return match commands_regex().find(command) {
            Some(m) => m.start() == 0 && m.end() == command.len(),
            None => false,
        };
    }

    // Otherwise flag when the input equals a dangerous command that sits
    // between separators (or string edges) in the command line.
    for m in commands_regex().find_iter(command) {
        if m.as_str() != user_input {
            continue;
        }
        let before_ok = match command[..m.start()].chars().last() {
            Some(c) => SEPARATORS.contains(&c),
            None => true,
        };
        let after_ok = match command[m.end()..].chars().next() {
            Some(c) => SEPARATORS.contains(&c),
            None => true,
        };
        if before_ok && after_ok {
            return true;
        }
    }
    false
}

/// Returns true when the configured shell is not one this detector's
/// tokenizing rules cover. Callers must not treat commands run under an
/// unsupported shell (`bash`, `zsh`, `fish`, ...) as analyzed-and-safe.
pub fn is_unsupported_shell(shell: &str) -> bool {
    !SUPPORTED_SHELLS.contains(&shell)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_commands_have_no_syntax() {
        assert!(!contains_shell_syntax("ls -l"));
        assert!(!contains_shell_syntax("echo safe command"));
        assert!(!contains_shell_syntax(""));
        assert!(!contains_shell_syntax("   "));
    }

    #[test]
    fn test_metacharacters_are_syntax() {
        assert!(contains_shell_syntax("ls && rm -rf /"));
        assert!(contains_shell_syntax("cat /etc/passwd; whoami"));
        assert!(contains_shell_syntax("echo `id`"));
        assert!(contains_shell_syntax("echo $(id)"));
    }

    #[test]
    fn test_lone_dangerous_command_is_syntax() {
        assert!(contains_shell_syntax("rm"));
        assert!(contains_shell_syntax("/sbin/shutdown"));
        assert!(!contains_shell_syntax("remove"));
    }

    #[test]
    fn test_detect_ignores_short_or_absent_input() {
        assert!(!detect_shell_injection("ls -l", ";"));
        assert!(!detect_shell_injection("ls", "ls -la"));
        assert!(!detect_shell_injection("ls -l /tmp", "/etc"));
    }

    #[test]
    fn test_detect_flags_metacharacters() {
        assert!(detect_shell_injection(
            "binary --domain www.example`whoami`.com",
            "www.example`whoami`.com"
        ));
        assert!(detect_shell_injection("ls; rm -rf /", "; rm -rf /"));
        assert!(detect_shell_injection("echo hello; whoami", "hello; whoami"));
    }

    #[test]
    fn test_single_quotes_encapsulate() {
        assert!(!detect_shell_injection(
            "binary --domain 'www.example.com'",
            "www.example.com"
        ));
        // A quote inside the input defeats the quoting.
        assert!(detect_shell_injection(
            "binary --domain 'www.example'whoami'.com'",
            "www.example'whoami'.com"
        ));
    }

    #[test]
    fn test_double_quotes_still_interpolate() {
        assert!(!detect_shell_injection(
            "binary --domain \"www.example.com\"",
            "www.example.com"
        ));
        assert!(detect_shell_injection(
            "binary --domain \"www.example.com$(whoami)\"",
            "www.example.com$(whoami)"
        ));
        assert!(detect_shell_injection(
            "binary --domain \"`whoami`.example.com\"",
            "`whoami`.example.com"
        ));
    }

    #[test]
    fn test_newline_inside_quotes_is_safe() {
        assert!(!detect_shell_injection("echo 'a\nb'", "a\nb"));
        assert!(detect_shell_injection("echo a\nwhoami", "a\nwhoami"));
    }

    #[test]
    fn test_mismatched_quotes_are_unsafe() {
        // $ is harmless inside single quotes.
        assert!(!detect_shell_injection("binary --domain '$USER'", "$USER"));
        // With a different quote on each side there is no encapsulation.
        assert!(detect_shell_injection("binary --domain '$USER\"", "$USER"));
    }

    #[test]
    fn test_command_token_bounded_by_separators() {
        assert!(detect_shell_injection("ls\nwhoami", "whoami"));
        assert!(detect_shell_injection("echo hello|wc", "wc"));
        // Part of a longer word is not a command token.
        assert!(!detect_shell_injection("binary --arg format", "format"));
    }

    #[test]
    fn test_colon_only_counts_between_separators() {
        assert!(detect_shell_injection("binary ; : ; ls", ": "));
        assert!(!detect_shell_injection("binary http://example.com", "http://example.com"));
    }

    #[test]
    fn test_unsupported_shells() {
        assert!(!is_unsupported_shell("/bin/sh"));
        assert!(!is_unsupported_shell("sh"));
        assert!(!is_unsupported_shell("true"));
        assert!(!is_unsupported_shell(""));
        assert!(is_unsupported_shell("bash"));
        assert!(is_unsupported_shell("/bin/bash"));
        assert!(is_unsupported_shell("zsh"));
    }
}
