//! Module classification.
//!
//! Best-effort detection of what a module of a feature-based app is:
//! a component (imports `react` and declares a class with a `render`
//! method), an action (imports `./constants` and exports a `reducer`
//! function) or anything else.

use std::path::Path;

use anyhow::Result;
use forge_io::Workspace;
use serde::Serialize;

use crate::cache::AstCache;
use crate::lang::Lang;
use crate::scan;
use crate::tree::SyntaxTree;

/// An `import` of `./constants` with more specifiers than this marks an
/// async action (request, success, failure, dismiss error).
const ASYNC_CONSTANT_COUNT: usize = 3;

/// Classification of a module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ModuleProps {
    /// A UI component.
    Component {
        /// Whether the component is wrapped with `connect(...)`.
        connected: bool,
    },
    /// A state action.
    Action {
        /// Whether the action imports more than three constants.
        #[serde(rename = "isAsync")]
        is_async: bool,
    },
    /// Anything else.
    Misc,
}

/// A classified module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiscoveredModule {
    /// Module path as given.
    pub path: String,
    /// File stem.
    pub name: String,
    /// Classification.
    #[serde(flatten)]
    pub props: ModuleProps,
}

#[derive(Default)]
struct Features {
    import_react: bool,
    import_constants: bool,
    many_constants: bool,
    class_with_render: bool,
    connect_call: bool,
    export_reducer: bool,
}

/// Classify a parsed module.
///
/// # Errors
/// Fails when an ast-grep pattern cannot be compiled for the dialect.
pub fn module_props(tree: &SyntaxTree) -> Result<ModuleProps> {
    let mut ff = Features::default();

    for import in tree.nodes_of_kind("import_statement") {
        let Some(source) = import
            .child_by_field_name("source")
            .and_then(|s| tree.string_value(s))
        else {
            continue;
        };
        match source {
            "react" => ff.import_react = true,
            "./constants" => {
                ff.import_constants = true;
                let specifiers = tree
                    .nodes()
                    .filter(|n| {
                        n.kind() == "import_specifier"
                            && n.start_byte() >= import.start_byte()
                            && n.end_byte() <= import.end_byte()
                    })
                    .count();
                ff.many_constants = specifiers > ASYNC_CONSTANT_COUNT;
            }
            _ => {}
        }
    }

    for class in tree
        .nodes()
        .filter(|n| matches!(n.kind(), "class_declaration" | "class"))
    {
        let extends = class
            .named_children(&mut class.walk())
            .any(|c| c.kind() == "class_heritage");
        let has_render = class.child_by_field_name("body").is_some_and(|body| {
            body.named_children(&mut body.walk()).any(|member| {
                member.kind() == "method_definition"
                    && member
                        .child_by_field_name("name")
                        .is_some_and(|name| tree.text(name) == "render")
            })
        });
        if extends && has_render {
            ff.class_with_render = true;
        }
    }

    let source = tree.source();
    let lang = tree.lang();
    ff.connect_call = scan::contains(source, "connect($$$ARGS)", lang)?;
    ff.export_reducer =
        scan::contains(source, "export function reducer($$$ARGS) { $$$BODY }", lang)?;

    let props = if ff.import_react && ff.class_with_render {
        ModuleProps::Component {
            connected: ff.connect_call,
        }
    } else if ff.export_reducer && ff.import_constants {
        ModuleProps::Action {
            is_async: ff.many_constants,
        }
    } else {
        ModuleProps::Misc
    };
    Ok(props)
}

/// Classify many modules. Files that fail to parse or scan are logged and
/// skipped; [`AstCache::failed_to_parse`] lists the parse failures.
pub fn discover<'a, I>(cache: &mut AstCache, files: I) -> Vec<DiscoveredModule>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut modules = Vec::new();
    for (path, text) in files {
        let tree = match cache.get_or_parse(path, text) {
            Ok(tree) => tree,
            Err(error) => {
                tracing::warn!(path = %path, error = %error, "skipping module that failed to parse");
                continue;
            }
        };
        let props = match module_props(&tree) {
            Ok(props) => props,
            Err(error) => {
                tracing::warn!(path = %path, error = %error, "skipping module that failed to scan");
                continue;
            }
        };
        let name = Path::new(path)
            .file_stem()
            .map_or_else(String::new, |s| s.to_string_lossy().into_owned());
        modules.push(DiscoveredModule {
            path: path.to_string(),
            name,
            props,
        });
    }
    modules.sort_by(|a, b| a.name.cmp(&b.name));
    modules
}

/// Classify the modules directly inside `dir`, as the overlay sees them.
/// Unreadable files are logged and skipped.
pub fn discover_dir(ws: &mut Workspace, cache: &mut AstCache, dir: &str) -> Vec<DiscoveredModule> {
    let mut files = Vec::new();
    for path in ws.list(dir) {
        if Lang::from_path(Path::new(&path)).is_none() || !ws.exists(&path) {
            continue;
        }
        match ws.content(&path) {
            Ok(text) => files.push((path, text)),
            Err(error) => {
                tracing::warn!(path = %path, error = %error, "skipping unreadable module");
            }
        }
    }
    discover(
        cache,
        files.iter().map(|(path, text)| (path.as_str(), text.as_str())),
    )
}
