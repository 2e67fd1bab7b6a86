//! Language support for module parsing.
//!
//! Provides the `Lang` enum for the module dialects the transforms
//! understand, with detection from file extensions and conversion to the
//! tree-sitter grammar and the ast-grep language.

use std::path::Path;

use crate::error::AstError;
use crate::re_exports::SupportLang;

/// Supported module dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lang {
    /// JavaScript, including JSX
    JavaScript,
    /// TypeScript
    TypeScript,
    /// TypeScript with JSX
    Tsx,
}

impl Lang {
    /// Get the ast-grep language string
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::JavaScript => "js",
            Self::TypeScript => "ts",
            Self::Tsx => "tsx",
        }
    }

    /// Try to detect language from file extension
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        Self::from_extension(&ext)
    }

    /// Try to detect language from extension string
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "js" | "jsx" | "mjs" | "cjs" => Some(Self::JavaScript),
            "ts" | "mts" | "cts" => Some(Self::TypeScript),
            "tsx" => Some(Self::Tsx),
            _ => None,
        }
    }

    /// Get file extensions for this language
    #[must_use]
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Self::JavaScript => &["js", "jsx", "mjs", "cjs"],
            Self::TypeScript => &["ts", "mts", "cts"],
            Self::Tsx => &["tsx"],
        }
    }

    /// Tree-sitter grammar of the dialect.
    #[must_use]
    pub fn grammar(&self) -> tree_sitter::Language {
        match self {
            Self::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
            Self::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Self::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
        }
    }

    /// ast-grep language of the dialect.
    #[must_use]
    pub fn support_lang(&self) -> SupportLang {
        match self {
            Self::JavaScript => SupportLang::JavaScript,
            Self::TypeScript => SupportLang::TypeScript,
            Self::Tsx => SupportLang::Tsx,
        }
    }
}

impl TryFrom<&str> for Lang {
    type Error = AstError;

    fn try_from(s: &str) -> Result<Self, AstError> {
        match s.to_lowercase().as_str() {
            "js" | "jsx" | "javascript" => Ok(Self::JavaScript),
            "ts" | "typescript" => Ok(Self::TypeScript),
            "tsx" => Ok(Self::Tsx),
            _ => Err(AstError::UnsupportedLanguage(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_path() {
        assert_eq!(
            Lang::from_path(Path::new("src/features/home/Hello.jsx")),
            Some(Lang::JavaScript)
        );
        assert_eq!(Lang::from_path(Path::new("a.TSX")), Some(Lang::Tsx));
        assert_eq!(Lang::from_path(Path::new("style.less")), None);
    }

    #[test]
    fn test_try_from() {
        assert_eq!(Lang::try_from("TypeScript").unwrap(), Lang::TypeScript);
        assert!(matches!(
            Lang::try_from("python"),
            Err(AstError::UnsupportedLanguage(_))
        ));
    }
}
