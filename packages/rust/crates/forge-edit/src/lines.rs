//! Text-level helpers for files edited line by line.
//!
//! Entry files (`index.js`, `style.less`) are often updated by inserting or
//! dropping whole `import` / `export ... from` / `@import` lines without a
//! parse. Lines come from [`forge_io::Workspace::lines`], so joining them
//! with `\n` restores the file.

use once_cell::sync::Lazy;
use regex::Regex;

#[allow(clippy::expect_used)]
static IMPORT_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^import ").expect("Failed to compile import line regex"));

#[allow(clippy::expect_used)]
static EXPORT_FROM_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^export .* from ").expect("Failed to compile export line regex"));

/// How a line is matched.
#[derive(Debug, Clone, Copy)]
pub enum LineMatch<'a> {
    /// The line contains the text.
    Contains(&'a str),
    /// The regex matches somewhere in the line.
    Pattern(&'a Regex),
}

impl LineMatch<'_> {
    /// Whether `line` matches.
    #[must_use]
    pub fn is_match(&self, line: &str) -> bool {
        match self {
            Self::Contains(text) => line.contains(text),
            Self::Pattern(re) => re.is_match(line),
        }
    }
}

impl<'a> From<&'a str> for LineMatch<'a> {
    fn from(text: &'a str) -> Self {
        Self::Contains(text)
    }
}

impl<'a> From<&'a Regex> for LineMatch<'a> {
    fn from(re: &'a Regex) -> Self {
        Self::Pattern(re)
    }
}

/// Index of the first line at or after `from` that matches.
#[must_use]
pub fn line_index<'a>(lines: &[String], pat: impl Into<LineMatch<'a>>, from: usize) -> Option<usize> {
    let pat = pat.into();
    lines
        .iter()
        .enumerate()
        .skip(from)
        .find(|(_, l)| pat.is_match(l))
        .map(|(i, _)| i)
}

/// Index of the last line that matches.
#[must_use]
pub fn last_line_index<'a>(lines: &[String], pat: impl Into<LineMatch<'a>>) -> Option<usize> {
    let pat = pat.into();
    lines.iter().rposition(|l| pat.is_match(l))
}

/// Drop every matching line. Returns how many went.
pub fn remove_lines<'a>(lines: &mut Vec<String>, pat: impl Into<LineMatch<'a>>) -> usize {
    let pat = pat.into();
    let before = lines.len();
    lines.retain(|l| !pat.is_match(l));
    before - lines.len()
}

/// Matches `<keyword> ... from '<source>'` with either quote style.
fn from_source_regex(keyword: &str, source: &str) -> Option<Regex> {
    let pattern = format!(r#"{keyword} +.* +from +['"]{}['"]"#, regex::escape(source));
    match Regex::new(&pattern) {
        Ok(re) => Some(re),
        Err(e) => {
            tracing::warn!(source = %source, error = %e, "invalid module source pattern");
            None
        }
    }
}

fn style_import_regex(source: &str) -> Option<Regex> {
    Regex::new(&format!(r#"@import +['"]{}['"]"#, regex::escape(source))).ok()
}

/// Insert `line` after the last `import` line (at the top when there is
/// none).
pub fn add_import_line(lines: &mut Vec<String>, line: &str) {
    let at = last_line_index(lines, &*IMPORT_LINE).map_or(0, |i| i + 1);
    lines.insert(at, line.to_string());
}

/// Drop `import ... from '<source>'` lines.
pub fn remove_import_line(lines: &mut Vec<String>, source: &str) -> usize {
    from_source_regex("import", source).map_or(0, |re| remove_lines(lines, &re))
}

/// Insert `line` after the last `export ... from` line (at the top when
/// there is none).
pub fn add_export_from_line(lines: &mut Vec<String>, line: &str) {
    let at = last_line_index(lines, &*EXPORT_FROM_LINE).map_or(0, |i| i + 1);
    lines.insert(at, line.to_string());
}

/// Drop `export ... from '<source>'` lines.
pub fn remove_export_from_line(lines: &mut Vec<String>, source: &str) -> usize {
    from_source_regex("export", source).map_or(0, |re| remove_lines(lines, &re))
}

/// Add `@import '<source>';` after the last style import.
pub fn add_style_import(lines: &mut Vec<String>, source: &str) {
    let at = last_line_index(lines, "@import ").map_or(0, |i| i + 1);
    lines.insert(at, format!("@import '{source}';"));
}

/// Drop `@import '<source>'` lines.
pub fn remove_style_import(lines: &mut Vec<String>, source: &str) -> usize {
    style_import_regex(source).map_or(0, |re| remove_lines(lines, &re))
}

/// Point the first `@import '<old>'` line at `new`. Returns whether a line
/// was found.
pub fn rename_style_import(lines: &mut [String], old: &str, new: &str) -> bool {
    let Some(re) = style_import_regex(old) else {
        return false;
    };
    match line_index(lines, &re, 0) {
        Some(i) => {
            lines[i] = format!("@import '{new}';");
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(text: &str) -> Vec<String> {
        text.split('\n').map(str::to_string).collect()
    }

    #[test]
    fn test_line_index_from() {
        let l = lines("a\nb\na\n");
        assert_eq!(line_index(&l, "a", 0), Some(0));
        assert_eq!(line_index(&l, "a", 1), Some(2));
        assert_eq!(last_line_index(&l, "b"), Some(1));
        assert_eq!(line_index(&l, "z", 0), None);
    }

    #[test]
    fn test_import_lines() {
        let mut l = lines("import a from './a';\nimport b from \"./b\";\n\nconst x = 1;\n");
        add_import_line(&mut l, "import c from './c';");
        assert_eq!(l[2], "import c from './c';");
        assert_eq!(remove_import_line(&mut l, "./b"), 1);
        assert_eq!(
            l.join("\n"),
            "import a from './a';\nimport c from './c';\n\nconst x = 1;\n"
        );
    }

    #[test]
    fn test_export_lines_without_anchor() {
        let mut l = lines("const x = 1;\n");
        add_export_from_line(&mut l, "export { default as A } from './A';");
        assert_eq!(l[0], "export { default as A } from './A';");
        assert_eq!(remove_export_from_line(&mut l, "./A"), 1);
        assert_eq!(l.join("\n"), "const x = 1;\n");
    }

    #[test]
    fn test_style_imports() {
        let mut l = lines("@import '../styles/mixins';\n@import './Hello';\n");
        add_style_import(&mut l, "./World");
        assert_eq!(l[2], "@import './World';");
        assert!(rename_style_import(&mut l, "./Hello", "./Hi"));
        assert_eq!(l[1], "@import './Hi';");
        assert_eq!(remove_style_import(&mut l, "./World"), 1);
        assert!(!rename_style_import(&mut l, "./missing", "./x"));
    }

    #[test]
    fn test_source_is_escaped() {
        let mut l = lines("import a from './a.b';\nimport c from './aXb';\n");
        assert_eq!(remove_import_line(&mut l, "./a.b"), 1);
        assert_eq!(l[0], "import c from './aXb';");
    }
}
