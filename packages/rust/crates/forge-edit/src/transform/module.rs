//! Import and export statements.
//!
//! New specifiers follow the layout of the list they join. New statements
//! copy the quote and semicolon style of the existing ones.

use forge_ast::{Node, SyntaxTree};

use super::{
    ListLayout, child_of_kind, children_of_kind, insert_line_after, module_source,
    remove_list_items,
};
use crate::edit::Edit;
use crate::rename::rename_identifier;

/// The parts of an `import ... from` clause.
struct ImportParts<'t> {
    stmt: Node<'t>,
    clause: Node<'t>,
    default: Option<Node<'t>>,
    namespace: Option<Node<'t>>,
    named: Option<Node<'t>>,
    specifiers: Vec<Node<'t>>,
}

impl<'t> ImportParts<'t> {
    fn of(stmt: Node<'t>) -> Option<Self> {
        let clause = child_of_kind(stmt, "import_clause")?;
        let named = child_of_kind(clause, "named_imports");
        Some(Self {
            stmt,
            clause,
            default: child_of_kind(clause, "identifier"),
            namespace: child_of_kind(clause, "namespace_import"),
            named,
            specifiers: named.map_or_else(Vec::new, |n| children_of_kind(n, &["import_specifier"])),
        })
    }

    /// Identifier bound by `* as name`.
    fn namespace_local(&self) -> Option<Node<'t>> {
        self.namespace.and_then(|ns| child_of_kind(ns, "identifier"))
    }

    /// Every local name bound by the statement.
    fn locals<'s>(&self, tree: &'s SyntaxTree) -> Vec<&'s str> {
        self.default
            .into_iter()
            .chain(self.namespace_local())
            .chain(self.specifiers.iter().filter_map(|s| specifier_local(*s)))
            .map(|n| tree.text(n))
            .collect()
    }
}

/// Local binding of an import specifier: the alias, else the name.
fn specifier_local(spec: Node<'_>) -> Option<Node<'_>> {
    spec.child_by_field_name("alias")
        .or_else(|| spec.child_by_field_name("name"))
}

/// Name an export specifier is visible under outside the module.
fn exported_name<'s>(tree: &'s SyntaxTree, spec: Node<'_>) -> &'s str {
    spec.child_by_field_name("alias")
        .or_else(|| spec.child_by_field_name("name"))
        .map_or("", |n| tree.text(n))
}

fn top_level<'t>(tree: &'t SyntaxTree, kind: &'t str) -> impl Iterator<Item = Node<'t>> + 't {
    let root = tree.root();
    let mut cursor = root.walk();
    root.named_children(&mut cursor)
        .filter(move |n| n.kind() == kind)
        .collect::<Vec<_>>()
        .into_iter()
}

fn reexports(tree: &SyntaxTree) -> impl Iterator<Item = Node<'_>> {
    top_level(tree, "export_statement").filter(|s| s.child_by_field_name("source").is_some())
}

/// Module sources of every import and re-export, in file order.
pub(crate) fn module_sources(tree: &SyntaxTree) -> Vec<&str> {
    let mut out: Vec<&str> = Vec::new();
    for source in top_level(tree, "import_statement")
        .chain(reexports(tree))
        .filter_map(|s| module_source(tree, s))
    {
        if !out.contains(&source) {
            out.push(source);
        }
    }
    out
}

/// Quote used by existing module sources, `'` when there are none.
fn quote_style(tree: &SyntaxTree) -> char {
    top_level(tree, "import_statement")
        .chain(reexports(tree))
        .find_map(|s| s.child_by_field_name("source"))
        .and_then(|s| tree.text(s).chars().next())
        .unwrap_or('\'')
}

/// Statement terminator used by the first of `statements`.
fn semicolon_style<'t>(tree: &SyntaxTree, mut statements: impl Iterator<Item = Node<'t>>) -> &'static str {
    match statements.next() {
        Some(stmt) if !tree.text(stmt).trim_end().ends_with(';') => "",
        _ => ";",
    }
}

fn non_empty(name: Option<&str>) -> Option<&str> {
    name.filter(|n| !n.is_empty())
}

fn unique<'a>(names: &[&'a str]) -> Vec<&'a str> {
    let mut out: Vec<&str> = Vec::with_capacity(names.len());
    for name in names {
        if !name.is_empty() && !out.contains(name) {
            out.push(name);
        }
    }
    out
}

fn owned(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| (*n).to_string()).collect()
}

/// Insert `lines` after the last of `anchors`, else at the start of the file.
fn insert_statements(tree: &SyntaxTree, anchor: Option<Node<'_>>, lines: &[String]) -> Option<Edit> {
    if lines.is_empty() {
        return None;
    }
    let text = lines.join("\n");
    Some(match anchor {
        Some(last) => insert_line_after(tree.source(), last.end_byte(), &text),
        None => Edit::insert(0, format!("{text}\n")),
    })
}

fn import_lines(
    tree: &SyntaxTree,
    source: &str,
    default: Option<&str>,
    namespace: Option<&str>,
    named: &[&str],
) -> Vec<String> {
    let quote = quote_style(tree);
    let semi = semicolon_style(tree, top_level(tree, "import_statement"));
    let line = |clause: &str| {
        if clause.is_empty() {
            format!("import {quote}{source}{quote}{semi}")
        } else {
            format!("import {clause} from {quote}{source}{quote}{semi}")
        }
    };
    let named_clause = (!named.is_empty()).then(|| format!("{{ {} }}", named.join(", ")));

    if namespace.is_some() && named_clause.is_some() {
        let head: Vec<String> = default
            .into_iter()
            .map(str::to_string)
            .chain(namespace.map(|ns| format!("* as {ns}")))
            .collect();
        return vec![
            line(&head.join(", ")),
            line(named_clause.as_deref().unwrap_or_default()),
        ];
    }
    let clause: Vec<String> = default
        .into_iter()
        .map(str::to_string)
        .chain(namespace.map(|ns| format!("* as {ns}")))
        .chain(named_clause)
        .collect();
    vec![line(&clause.join(", "))]
}

/// Add a default, named and/or namespace import of `source`.
///
/// Names already bound by an import of `source` are skipped. Without such
/// an import a new statement goes after the last import.
#[must_use]
pub fn add_import_from(
    tree: &SyntaxTree,
    source: &str,
    default: Option<&str>,
    named: &[&str],
    namespace: Option<&str>,
) -> Vec<Edit> {
    let default = non_empty(default);
    let namespace = non_empty(namespace);
    let named = unique(named);
    let last_import = top_level(tree, "import_statement").last();

    let existing = top_level(tree, "import_statement")
        .filter(|s| module_source(tree, *s) == Some(source))
        .find_map(ImportParts::of);
    let Some(parts) = existing else {
        return insert_statements(tree, last_import, &import_lines(tree, source, default, namespace, &named))
            .into_iter()
            .collect();
    };

    let locals = parts.locals(tree);
    let new_default = default.filter(|d| parts.default.is_none() && !locals.contains(d));
    let new_namespace = namespace.filter(|n| parts.namespace.is_none() && !locals.contains(n));
    let new_named: Vec<&str> = named.into_iter().filter(|n| !locals.contains(n)).collect();

    let mut edits = Vec::new();
    if let Some(d) = new_default {
        edits.push(Edit::insert(parts.clause.start_byte(), format!("{d}, ")));
    }

    let mut separate_namespace = None;
    let mut separate_named: Vec<&str> = Vec::new();
    match (parts.named, parts.namespace, parts.default) {
        (Some(list), _, _) => {
            if parts.specifiers.is_empty() {
                if !new_named.is_empty() {
                    edits.push(Edit::replace_node(list, format!("{{ {} }}", new_named.join(", "))));
                }
            } else {
                let layout = ListLayout::of(tree, list, &parts.specifiers);
                edits.extend(layout.append(&parts.specifiers, &owned(&new_named)));
            }
            separate_namespace = new_namespace;
        }
        (None, Some(_), _) => separate_named = new_named,
        (None, None, Some(default_node)) => {
            if let Some(ns) = new_namespace {
                edits.push(Edit::insert(default_node.end_byte(), format!(", * as {ns}")));
                separate_named = new_named;
            } else if !new_named.is_empty() {
                edits.push(Edit::insert(
                    default_node.end_byte(),
                    format!(", {{ {} }}", new_named.join(", ")),
                ));
            }
        }
        (None, None, None) => {}
    }

    if separate_namespace.is_some() || !separate_named.is_empty() {
        let lines = import_lines(tree, source, None, separate_namespace, &separate_named);
        edits.extend(insert_statements(tree, last_import, &lines));
    }
    edits
}

/// Add a default and/or named re-export of `source`.
///
/// The default is written `default as Name` at the head of the list. Without
/// a re-export of `source` a new statement goes after the last re-export,
/// else after the last export statement.
#[must_use]
pub fn add_export_from(tree: &SyntaxTree, source: &str, default: Option<&str>, named: &[&str]) -> Vec<Edit> {
    let default = non_empty(default);
    let named = unique(named);

    let existing = reexports(tree)
        .filter(|s| module_source(tree, *s) == Some(source))
        .find_map(|s| child_of_kind(s, "export_clause"));
    let Some(clause) = existing else {
        let mut entries: Vec<String> = default.map(|d| format!("default as {d}")).into_iter().collect();
        entries.extend(owned(&named));
        if entries.is_empty() {
            return Vec::new();
        }
        let quote = quote_style(tree);
        let semi = semicolon_style(tree, reexports(tree).chain(top_level(tree, "import_statement")));
        let line = format!(
            "export {{ {} }} from {quote}{source}{quote}{semi}",
            entries.join(", ")
        );
        let anchor = reexports(tree)
            .last()
            .or_else(|| top_level(tree, "export_statement").last());
        return insert_statements(tree, anchor, &[line]).into_iter().collect();
    };

    let specs = children_of_kind(clause, &["export_specifier"]);
    let exported: Vec<&str> = specs.iter().map(|s| exported_name(tree, *s)).collect();
    let has_default = specs.iter().any(|s| {
        s.child_by_field_name("name")
            .is_some_and(|n| tree.text(n) == "default")
    });
    let new_default = default.filter(|d| !has_default && !exported.contains(d));
    let new_named: Vec<String> = named
        .into_iter()
        .filter(|n| !exported.contains(n))
        .map(str::to_string)
        .collect();

    if specs.is_empty() {
        let mut entries: Vec<String> = new_default.map(|d| format!("default as {d}")).into_iter().collect();
        entries.extend(new_named);
        if entries.is_empty() {
            return Vec::new();
        }
        return vec![Edit::replace_node(clause, format!("{{ {} }}", entries.join(", ")))];
    }

    let layout = ListLayout::of(tree, clause, &specs);
    let mut edits = Vec::new();
    if let Some(d) = new_default {
        edits.extend(layout.prepend(&specs, &format!("default as {d}")));
    }
    edits.extend(layout.append(&specs, &new_named));
    edits
}

/// Remove import specifiers by local name. An import left without any
/// specifier is removed whole.
#[must_use]
pub fn remove_import_specifier(tree: &SyntaxTree, names: &[&str]) -> Vec<Edit> {
    let mut edits = Vec::new();
    for parts in tree.nodes_of_kind("import_statement").filter_map(ImportParts::of) {
        let gone = |node: Option<Node<'_>>| node.is_some_and(|n| names.contains(&tree.text(n)));
        let default_gone = gone(parts.default);
        let namespace_gone = gone(parts.namespace_local());
        let remove: Vec<bool> = parts
            .specifiers
            .iter()
            .map(|s| gone(specifier_local(*s)))
            .collect();
        if !default_gone && !namespace_gone && !remove.contains(&true) {
            continue;
        }

        let default_left = parts.default.filter(|_| !default_gone);
        let namespace_left = parts.namespace.is_some() && !namespace_gone;
        let named_left = remove.contains(&false);
        if default_left.is_none() && !namespace_left && !named_left {
            edits.push(Edit::delete_node(parts.stmt));
            continue;
        }

        if default_gone
            && let Some(default) = parts.default
            && let Some(next) = parts.namespace.or(parts.named)
        {
            edits.push(Edit::delete(default.start_byte(), next.start_byte()));
        }
        if namespace_gone
            && let (Some(default), Some(ns)) = (default_left, parts.namespace)
        {
            edits.push(Edit::delete(default.end_byte(), ns.end_byte()));
        }
        if remove.contains(&true) {
            if named_left {
                edits.extend(remove_list_items(&parts.specifiers, &remove));
            } else if let (Some(default), Some(list)) = (default_left, parts.named) {
                edits.push(Edit::delete(default.end_byte(), list.end_byte()));
            }
        }
    }
    edits
}

/// Remove export specifiers whose local or exported name is in `names`,
/// optionally only from re-exports of `source`. An export list left empty
/// is removed whole.
#[must_use]
pub fn remove_export_specifier(tree: &SyntaxTree, names: &[&str], source: Option<&str>) -> Vec<Edit> {
    let mut edits = Vec::new();
    for stmt in tree.nodes_of_kind("export_statement") {
        if source.is_some_and(|s| module_source(tree, stmt) != Some(s)) {
            continue;
        }
        let Some(clause) = child_of_kind(stmt, "export_clause") else {
            continue;
        };
        let specs = children_of_kind(clause, &["export_specifier"]);
        let remove: Vec<bool> = specs
            .iter()
            .map(|s| {
                let local = s.child_by_field_name("name").map_or("", |n| tree.text(n));
                names.contains(&local) || names.contains(&exported_name(tree, *s))
            })
            .collect();
        if !remove.contains(&true) {
            continue;
        }
        if remove.contains(&false) {
            edits.extend(remove_list_items(&specs, &remove));
        } else {
            edits.push(Edit::delete_node(stmt));
        }
    }
    edits
}

/// Remove every `import ... from` and `export ... from` statement of
/// `source`.
#[must_use]
pub fn remove_import_by_source(tree: &SyntaxTree, source: &str) -> Vec<Edit> {
    top_level(tree, "import_statement")
        .chain(reexports(tree))
        .filter(|s| module_source(tree, *s) == Some(source))
        .map(Edit::delete_node)
        .collect()
}

/// Rename an imported name.
///
/// Default, namespace and un-aliased named imports rename the local binding
/// and its references. An aliased named import only renames the imported
/// name: `import { A as A1 }` becomes `import { B as A1 }`.
#[must_use]
pub fn rename_import_specifier(tree: &SyntaxTree, old: &str, new: &str, source: Option<&str>) -> Vec<Edit> {
    let mut decls = Vec::new();
    let mut edits = Vec::new();
    for stmt in top_level(tree, "import_statement") {
        if source.is_some_and(|s| module_source(tree, stmt) != Some(s)) {
            continue;
        }
        let Some(parts) = ImportParts::of(stmt) else {
            continue;
        };
        decls.extend(
            parts
                .default
                .into_iter()
                .chain(parts.namespace_local())
                .filter(|n| tree.text(*n) == old),
        );
        for spec in &parts.specifiers {
            let Some(name) = spec.child_by_field_name("name").filter(|n| tree.text(*n) == old) else {
                continue;
            };
            match spec.child_by_field_name("alias") {
                Some(alias) if tree.text(alias) != old => edits.push(Edit::replace_node(name, new)),
                Some(alias) => decls.push(alias),
                None => decls.push(name),
            }
        }
    }
    for decl in decls {
        edits.extend(rename_identifier(tree, old, new, decl));
    }
    edits
}

/// Rename the local alias of `import { a as old }` and its references.
#[must_use]
pub fn rename_import_alias(tree: &SyntaxTree, old: &str, new: &str) -> Vec<Edit> {
    tree.nodes_of_kind("import_specifier")
        .filter_map(|spec| spec.child_by_field_name("alias"))
        .filter(|alias| tree.text(*alias) == old)
        .flat_map(|alias| rename_identifier(tree, old, new, alias))
        .collect()
}

/// Rename the local name, else the exported name, of export specifiers.
/// References are not touched.
#[must_use]
pub fn rename_export_specifier(tree: &SyntaxTree, old: &str, new: &str, source: Option<&str>) -> Vec<Edit> {
    let mut edits = Vec::new();
    for stmt in tree.nodes_of_kind("export_statement") {
        if source.is_some_and(|s| module_source(tree, stmt) != Some(s)) {
            continue;
        }
        let Some(clause) = child_of_kind(stmt, "export_clause") else {
            continue;
        };
        for spec in children_of_kind(clause, &["export_specifier"]) {
            let name = spec.child_by_field_name("name").filter(|n| tree.text(*n) == old);
            let alias = spec.child_by_field_name("alias").filter(|n| tree.text(*n) == old);
            if let Some(token) = name.or(alias) {
                edits.push(Edit::replace_node(token, new));
            }
        }
    }
    edits
}

/// Rewrite the module source of imports and re-exports of `old`.
#[must_use]
pub fn rename_module_source(tree: &SyntaxTree, old: &str, new: &str) -> Vec<Edit> {
    top_level(tree, "import_statement")
        .chain(reexports(tree))
        .filter(|s| module_source(tree, *s) == Some(old))
        .filter_map(|s| s.child_by_field_name("source"))
        .filter_map(|s| tree.string_content(s))
        .map(|span| Edit::replace(span, new))
        .collect()
}

#[cfg(test)]
mod tests {
    use forge_ast::Lang;

    use super::*;
    use crate::merge::apply_edits;

    fn run(code: &str, f: impl Fn(&SyntaxTree) -> Vec<Edit>) -> String {
        let tree = SyntaxTree::parse(code, Lang::JavaScript).unwrap();
        apply_edits(code, &f(&tree))
    }

    #[test]
    fn test_add_named_to_single_line_list() {
        let code = "// Test\nimport { /*abc */DefaultPage } from './'; // abc\n";
        assert_eq!(
            run(code, |t| add_import_from(t, "./", None, &["ModuleName"], None)),
            "// Test\nimport { /*abc */DefaultPage, ModuleName } from './'; // abc\n"
        );
    }

    #[test]
    fn test_add_default_and_named_to_existing() {
        let code = "import { C, D, Z } from './D';\n";
        assert_eq!(
            run(code, |t| add_import_from(t, "./D", Some("W"), &["Y", "C"], None)),
            "import W, { C, D, Z, Y } from './D';\n"
        );
    }

    #[test]
    fn test_add_named_after_default_only() {
        let code = "import A from './A';\n";
        assert_eq!(
            run(code, |t| add_import_from(t, "./A", Some("AA"), &["A1"], None)),
            "import A, { A1 } from './A';\n"
        );
    }

    #[test]
    fn test_add_namespace_after_default() {
        let code = "import A from './A';\n";
        assert_eq!(
            run(code, |t| add_import_from(t, "./A", None, &[], Some("all"))),
            "import A, * as all from './A';\n"
        );
    }

    #[test]
    fn test_add_into_empty_list() {
        let code = "import {\n} from './';\n\nexport default {};\n";
        assert_eq!(
            run(code, |t| add_import_from(t, "./", None, &["A"], None)),
            "import { A } from './';\n\nexport default {};\n"
        );
    }

    #[test]
    fn test_new_statement_after_last_import() {
        let code = "import A from \"./A\"\nimport B from \"./B\"\n\nconst x = 1\n";
        assert_eq!(
            run(code, |t| add_import_from(t, "./N", Some("N"), &["N1", "N2"], None)),
            "import A from \"./A\"\nimport B from \"./B\"\nimport N, { N1, N2 } from \"./N\"\n\nconst x = 1\n"
        );
    }

    #[test]
    fn test_namespace_and_named_split() {
        let code = "const x = 1;\n";
        assert_eq!(
            run(code, |t| add_import_from(t, "./X", Some("X"), &["a"], Some("all"))),
            "import X, * as all from './X';\nimport { a } from './X';\nconst x = 1;\n"
        );
    }

    #[test]
    fn test_existing_names_are_noop() {
        let code = "import A, { B } from './A';\n";
        let tree = SyntaxTree::parse(code, Lang::JavaScript).unwrap();
        assert!(add_import_from(&tree, "./A", Some("A"), &["B"], None).is_empty());
    }

    #[test]
    fn test_add_export_from() {
        let code = "export { default as A } from './A';\nexport { C, D, Z } from './D';\n\nconst otherCode = 1;\n";
        assert_eq!(
            run(code, |t| add_export_from(t, "./D", Some("W"), &["Y"])),
            "export { default as A } from './A';\nexport { default as W, C, D, Z, Y } from './D';\n\nconst otherCode = 1;\n"
        );
        assert_eq!(
            run(code, |t| add_export_from(t, "./K", Some("K"), &[])),
            "export { default as A } from './A';\nexport { C, D, Z } from './D';\nexport { default as K } from './K';\n\nconst otherCode = 1;\n"
        );
    }

    #[test]
    fn test_add_export_from_after_last_export() {
        let code = "import React from 'react';\n\nexport const a = 1;\n";
        assert_eq!(
            run(code, |t| add_export_from(t, "./B", Some("B"), &[])),
            "import React from 'react';\n\nexport const a = 1;\nexport { default as B } from './B';\n"
        );
        let code = "import React from 'react'\n\nexport function f() {}\n";
        assert_eq!(
            run(code, |t| add_export_from(t, "./B", None, &["C"])),
            "import React from 'react'\n\nexport function f() {}\nexport { C } from './B'\n"
        );
    }

    #[test]
    fn test_remove_import_specifier() {
        let code = "import A, { B, C } from './A';\nimport { D } from './D';\nimport E, { F } from './E';\n";
        assert_eq!(
            run(code, |t| remove_import_specifier(t, &["B", "D", "F"])),
            "import A, { C } from './A';\nimport E from './E';\n"
        );
    }

    #[test]
    fn test_remove_default_keeps_named() {
        let code = "import A, { B } from './A';\n";
        assert_eq!(
            run(code, |t| remove_import_specifier(t, &["A"])),
            "import { B } from './A';\n"
        );
    }

    #[test]
    fn test_remove_export_specifier() {
        let code = "export { default as A, B } from './A';\nexport { C } from './C';\n";
        assert_eq!(
            run(code, |t| remove_export_specifier(t, &["A", "C"], None)),
            "export { B } from './A';\n"
        );
    }

    #[test]
    fn test_remove_import_by_source() {
        let code = "import A from './A';\nexport { B } from './A';\nimport C from './C';\n";
        assert_eq!(
            run(code, |t| remove_import_by_source(t, "./A")),
            "import C from './C';\n"
        );
    }

    #[test]
    fn test_rename_import_specifier() {
        let code = "import { A as A1, B } from './A';\nuse(A1, B);\n";
        assert_eq!(
            run(code, |t| rename_import_specifier(t, "A", "X", None)),
            "import { X as A1, B } from './A';\nuse(A1, B);\n"
        );
        assert_eq!(
            run(code, |t| rename_import_specifier(t, "B", "Y", Some("./A"))),
            "import { A as A1, Y } from './A';\nuse(A1, Y);\n"
        );
    }

    #[test]
    fn test_rename_import_alias() {
        let code = "import { A as A1 } from './A';\nuse(A1);\n";
        assert_eq!(
            run(code, |t| rename_import_alias(t, "A1", "A2")),
            "import { A as A2 } from './A';\nuse(A2);\n"
        );
    }

    #[test]
    fn test_rename_export_specifier_and_source() {
        let code = "export { default as Hello } from './Hello';\n";
        assert_eq!(
            run(code, |t| rename_export_specifier(t, "Hello", "World", Some("./Hello"))),
            "export { default as World } from './Hello';\n"
        );
        assert_eq!(
            run(code, |t| rename_module_source(t, "./Hello", "./World")),
            "export { default as Hello } from './World';\n"
        );
    }
}
