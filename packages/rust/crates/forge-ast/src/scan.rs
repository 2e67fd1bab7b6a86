//! Pattern utilities for structural matching.
//!
//! Thin wrappers over ast-grep: compile a pattern for a [`Lang`], scan a
//! text and collect every match with its meta-variable captures.

use anyhow::{Context, Result};

use crate::item::Match;
use crate::lang::Lang;
use crate::re_exports::{LanguageExt, MatcherExt, MetaVariable, Pattern, SupportLang};
use crate::tree::Span;

/// Create a search pattern for a language
pub fn pattern(pattern: &str, lang: Lang) -> Result<Pattern> {
    Pattern::try_new(pattern, lang.support_lang())
        .with_context(|| format!("Failed to parse pattern: {pattern}"))
}

/// Scan content and find all matches for a pattern
pub fn scan(content: &str, pat: &str, lang: Lang) -> Result<Vec<Match>> {
    scan_with_lang(content, pat, lang.support_lang())
}

/// Whether the pattern matches anywhere in the content
pub fn contains(content: &str, pat: &str, lang: Lang) -> Result<bool> {
    Ok(!scan(content, pat, lang)?.is_empty())
}

/// Extract a single capture value from pattern matches
pub fn extract(content: &str, pattern: &str, var: &str, lang: Lang) -> Option<String> {
    let matches = scan(content, pattern, lang).ok()?;
    matches
        .into_iter()
        .find_map(|m| m.capture(var).map(str::to_string))
}

/// Scan with SupportLang directly
pub fn scan_with_lang(content: &str, pat: &str, support_lang: SupportLang) -> Result<Vec<Match>> {
    let grep_result = support_lang.ast_grep(content);
    let root_node = grep_result.root();

    let search_pattern = Pattern::try_new(pat, support_lang)
        .with_context(|| format!("Failed to parse pattern: {pat}"))?;

    let mut matches = Vec::new();

    for node in root_node.dfs() {
        if let Some(m) = search_pattern.match_node(node.clone()) {
            let env = m.get_env();

            let mut captures = Vec::new();
            for mv in env.get_matched_variables() {
                let name = match &mv {
                    MetaVariable::Capture(name, _) | MetaVariable::MultiCapture(name) => {
                        name.as_str()
                    }
                    _ => continue,
                };
                if let Some(captured) = env.get_match(name) {
                    captures.push((name.to_string(), captured.text().to_string()));
                }
            }

            let range = m.range();
            let line = content
                .get(..range.start)
                .map_or(0, |before| before.bytes().filter(|b| *b == b'\n').count());
            matches.push(Match {
                text: m.text().to_string(),
                span: Span::new(range.start, range.end),
                line,
                captures,
            });
        }
    }

    Ok(matches)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_calls() {
        let content = "import { connect } from 'react-redux';\nexport default connect(mapState)(Hello);\n";
        let calls = scan(content, "connect($ARG)", Lang::JavaScript).unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].capture("ARG"), Some("mapState"));
        assert_eq!(calls[0].line, 1);
    }

    #[test]
    fn test_extract() {
        let content = "export function reducer(state, action) { return state; }";
        let name = extract(content, "function $NAME($$$ARGS) { $$$BODY }", "NAME", Lang::JavaScript);
        assert_eq!(name, Some("reducer".to_string()));
    }

    #[test]
    fn test_contains_typescript() {
        let content = "const n: number = parseInt(s, 10);";
        assert!(contains(content, "parseInt($$$)", Lang::TypeScript).unwrap());
        assert!(!contains(content, "parseFloat($$$)", Lang::TypeScript).unwrap());
    }
}
