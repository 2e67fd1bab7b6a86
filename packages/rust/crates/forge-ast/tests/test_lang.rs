//! Tests for lang module - dialect detection.

use std::path::Path;

use forge_ast::{AstError, Lang};

#[test]
fn test_from_extension() {
    assert_eq!(Lang::from_extension("js"), Some(Lang::JavaScript));
    assert_eq!(Lang::from_extension("jsx"), Some(Lang::JavaScript));
    assert_eq!(Lang::from_extension("ts"), Some(Lang::TypeScript));
    assert_eq!(Lang::from_extension("tsx"), Some(Lang::Tsx));
    assert_eq!(Lang::from_extension("less"), None);
}

#[test]
fn test_from_path() {
    assert_eq!(Lang::from_path(Path::new("src/App.JSX")), Some(Lang::JavaScript));
    assert_eq!(Lang::from_path(Path::new("src/style.less")), None);
    assert_eq!(Lang::from_path(Path::new("Makefile")), None);
}

#[test]
fn test_try_from() {
    let lang: Lang = "typescript".try_into().unwrap();
    assert_eq!(lang, Lang::TypeScript);
    assert_eq!(lang.as_str(), "ts");
    let err = Lang::try_from("python").unwrap_err();
    assert!(matches!(err, AstError::UnsupportedLanguage(_)));
}

#[test]
fn test_extensions() {
    assert!(Lang::JavaScript.extensions().contains(&"mjs"));
    assert_eq!(Lang::Tsx.extensions(), &["tsx"]);
}
