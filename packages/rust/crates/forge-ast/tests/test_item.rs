//! Tests for item module - structural matches.

use forge_ast::{Lang, scan};

#[test]
fn test_match_captures() {
    let code = "import a from './a';\nimport b from './b';\n";
    let matches = scan(code, "import $NAME from $SRC", Lang::JavaScript).unwrap();
    assert_eq!(matches.len(), 2);
    assert_eq!(matches[1].line, 1);
    assert_eq!(matches[1].capture("NAME"), Some("b"));
    assert_eq!(matches[1].capture("SRC"), Some("'./b'"));
    assert_eq!(matches[1].capture("UNKNOWN"), None);
    assert_eq!(&code[matches[0].span.start..matches[0].span.end], matches[0].text);
}

#[test]
fn test_no_match() {
    let matches = scan("const x = 1;", "import $NAME from $SRC", Lang::JavaScript).unwrap();
    assert!(matches.is_empty());
}
