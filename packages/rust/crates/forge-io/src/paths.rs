//! Project-relative path helpers.
//!
//! Every overlay key is a normalized, `/`-separated path relative to the
//! project root: no leading `./`, no trailing `/`, no `.` segments and
//! `..` resolved where possible.

/// Normalize a path string into overlay key form.
#[must_use]
pub fn normalize(path: &str) -> String {
    let unified = path.replace('\\', "/");
    let absolute = unified.starts_with('/');
    let mut parts: Vec<&str> = Vec::new();
    for segment in unified.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if matches!(parts.last(), Some(last) if *last != "..") {
                    parts.pop();
                } else if !absolute {
                    parts.push("..");
                }
            }
            other => parts.push(other),
        }
    }
    let joined = parts.join("/");
    if absolute { format!("/{joined}") } else { joined }
}

/// Join path segments and normalize the result.
#[must_use]
pub fn join(base: &str, rest: &str) -> String {
    if base.is_empty() {
        return normalize(rest);
    }
    normalize(&format!("{base}/{rest}"))
}

/// Whether `path` equals `dir` or lies below it.
///
/// The comparison is segment-aware: `src/ab` is not under `src/a`.
#[must_use]
pub fn is_under(path: &str, dir: &str) -> bool {
    if dir.is_empty() {
        return true;
    }
    path == dir
        || (path.len() > dir.len() && path.starts_with(dir) && path.as_bytes()[dir.len()] == b'/')
}

/// Replace the `old` directory prefix of `path` with `new`.
///
/// Returns `None` when `path` is not under `old`.
#[must_use]
pub fn replace_prefix(path: &str, old: &str, new: &str) -> Option<String> {
    if !is_under(path, old) {
        return None;
    }
    let rest = &path[old.len()..];
    Some(normalize(&format!("{new}{rest}")))
}

/// Parent directory of a key (`""` for top-level entries).
#[must_use]
pub fn parent(path: &str) -> &str {
    path.rfind('/').map_or("", |i| &path[..i])
}

/// Last segment of a key.
#[must_use]
pub fn file_name(path: &str) -> &str {
    path.rfind('/').map_or(path, |i| &path[i + 1..])
}

/// Module source used to import `to` from `from` (both file keys).
///
/// The extension of `to` is dropped and a `./` prefix is added when the
/// result does not already start with a dot, e.g.
/// `relative_module_source("src/a/A.js", "src/b/B.js") == "../b/B"`.
#[must_use]
pub fn relative_module_source(from: &str, to: &str) -> String {
    let from_dir: Vec<&str> = parent(from).split('/').filter(|s| !s.is_empty()).collect();
    let to_dir: Vec<&str> = parent(to).split('/').filter(|s| !s.is_empty()).collect();

    let common = from_dir
        .iter()
        .zip(to_dir.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut segments: Vec<&str> = vec![".."; from_dir.len() - common];
    segments.extend(&to_dir[common..]);

    let name = file_name(to);
    let stem = match name.rfind('.') {
        Some(i) if i > 0 => &name[..i],
        _ => name,
    };
    segments.push(stem);

    let joined = segments.join("/");
    if joined.starts_with('.') {
        joined
    } else {
        format!("./{joined}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("./src//a/../b/"), "src/b");
        assert_eq!(normalize("src\\features\\home"), "src/features/home");
        assert_eq!(normalize("../x"), "../x");
        assert_eq!(normalize("/abs/./p"), "/abs/p");
    }

    #[test]
    fn test_is_under_is_segment_aware() {
        assert!(is_under("src/a/x.js", "src/a"));
        assert!(is_under("src/a", "src/a"));
        assert!(!is_under("src/ab/x.js", "src/a"));
    }

    #[test]
    fn test_replace_prefix() {
        assert_eq!(
            replace_prefix("src/a/x.js", "src/a", "src/b").as_deref(),
            Some("src/b/x.js")
        );
        assert_eq!(replace_prefix("src/ab/x.js", "src/a", "src/b"), None);
    }

    #[test]
    fn test_relative_module_source() {
        assert_eq!(
            relative_module_source("src/features/home/A.js", "src/features/home/B.js"),
            "./B"
        );
        assert_eq!(
            relative_module_source("src/features/home/A.js", "src/common/routeConfig.js"),
            "../../common/routeConfig"
        );
        assert_eq!(
            relative_module_source("src/index.js", "src/features/home/index.js"),
            "./features/home/index"
        );
    }
}
