//! Tests for module discovery over the overlay.

use std::fs;

use tempfile::TempDir;

use forge_ast::{AstCache, ModuleProps, discover_dir};
use forge_io::Workspace;

#[test]
fn test_discover_dir_sees_staged_files() {
    let dir = TempDir::new().unwrap();
    let home = dir.path().join("src/features/home");
    fs::create_dir_all(&home).unwrap();
    fs::write(
        home.join("Plain.js"),
        "import React from 'react';\nexport class Plain extends React.Component {\n  render() { return null; }\n}\n",
    )
    .unwrap();
    fs::write(home.join("style.less"), ".home {}\n").unwrap();

    let mut ws = Workspace::open(dir.path()).unwrap();
    ws.save(
        "src/features/home/helpers.js",
        "export const sum = (a, b) => a + b;\n",
    );
    ws.delete("src/features/home/Plain.js");
    ws.save(
        "src/features/home/Page.js",
        "import React, { Component } from 'react';\nexport class Page extends Component {\n  render() { return null; }\n}\n",
    );

    let mut cache = AstCache::new();
    let modules = discover_dir(&mut ws, &mut cache, "src/features/home");
    let found: Vec<_> = modules
        .iter()
        .map(|m| (m.name.as_str(), m.props))
        .collect();
    assert_eq!(
        found,
        vec![
            ("Page", ModuleProps::Component { connected: false }),
            ("helpers", ModuleProps::Misc),
        ]
    );
}

#[test]
fn test_props_serialize_with_type_tag() {
    let json = serde_json::to_value(ModuleProps::Action { is_async: true }).unwrap();
    assert_eq!(json["type"], "action");
    assert_eq!(json["isAsync"], true);
}
