//! Path traversal detection
//!
//! Flags filesystem operations where user input contributed either a `../`
//! style traversal sequence or an absolute path into a sensitive root.
//!
//! Known limitation: callers should pass the pre-normalization path. If the
//! filesystem layer already collapsed `..` segments, the user input may no
//! longer appear verbatim in the resolved path and the substring check
//! below will miss it.

/// Traversal sequences, covering both path separator conventions.
const UNSAFE_PATH_PARTS: &[&str] = &["../", "..\\"];

/// Absolute path roots that user input should never supply directly.
const LINUX_ROOT_FOLDERS: &[&str] = &[
    "/bin/", "/boot/", "/dev/", "/etc/", "/home/", "/init/", "/lib/", "/media/", "/mnt/",
    "/opt/", "/proc/", "/root/", "/run/", "/sbin/", "/srv/", "/sys/", "/tmp/", "/usr/", "/var/",
];

/// Returns true when `user_input` introduced a traversal sequence or an
/// absolute sensitive path into `resolved_path`.
pub fn detect_path_traversal(resolved_path: &str, user_input: &str) -> bool {
    // A single character cannot encode "..".
    if user_input.len() <= 1 {
        return false;
    }
    if user_input.len() > resolved_path.len() {
        return false;
    }
    if !resolved_path.contains(user_input) {
        return false;
    }
    // Both sides must carry the sequence: the path alone containing ".."
    // placed there by the application is not an attack.
    if contains_unsafe_path_parts(resolved_path) && contains_unsafe_path_parts(user_input) {
        return true;
    }
    starts_with_unsafe_path(resolved_path, user_input)
}

fn contains_unsafe_path_parts(path: &str) -> bool {
    // A trailing ".." has no separator after it but still walks up.
    UNSAFE_PATH_PARTS.iter().any(|part| path.contains(part)) || path.ends_with("..")
}

/// The user input is an absolute path into a sensitive root and the
/// resolved path starts with it.
fn starts_with_unsafe_path(resolved_path: &str, user_input: &str) -> bool {
    let path = resolved_path.to_ascii_lowercase();
    let input = user_input.to_ascii_lowercase();
    if !path.starts_with(&input) {
        return false;
    }
    LINUX_ROOT_FOLDERS
        .iter()
        .any(|root| input.starts_with(root))
        || input.starts_with("c:/")
        || input.starts_with("c:\\")
}
