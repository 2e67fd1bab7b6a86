//! Lexical scopes of a module.
//!
//! The scope tree is built once per parse. Every identifier-shaped node is
//! assigned the scope it is looked up from; declarations register a
//! [`Binding`] in the scope they belong to (`var` and function parameters
//! hoist to the enclosing function). Resolution walks outward from the
//! node's scope, so a reference that appears before its declaration still
//! resolves.

use std::collections::HashMap;

use tree_sitter::Node;

use crate::tree::Span;

/// Index of a scope inside a [`ScopeTree`].
pub type ScopeId = usize;

/// What introduced a scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    /// Module top level.
    Program,
    /// Function, arrow function or method.
    Function,
    /// Class body.
    Class,
    /// `{ ... }` block.
    Block,
    /// `for` head and body.
    For,
    /// `catch` clause.
    Catch,
}

/// How a name was declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingKind {
    /// `var`
    Var,
    /// `let`
    Let,
    /// `const`
    Const,
    /// Function declaration or named function expression.
    Function,
    /// Class declaration or named class expression.
    Class,
    /// Function parameter.
    Param,
    /// Import specifier, default or namespace import.
    Import,
    /// `catch (e)` parameter.
    CatchParam,
    /// Interface, type alias or enum.
    Type,
}

/// A declared name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    /// Declared name.
    pub name: String,
    /// Id of the declaring identifier node.
    pub node_id: usize,
    /// Span of the declaring identifier node.
    pub span: Span,
    /// Declaration form.
    pub kind: BindingKind,
}

/// One lexical scope.
#[derive(Debug, Clone)]
pub struct Scope {
    /// Enclosing scope (`None` for the program scope).
    pub parent: Option<ScopeId>,
    /// What introduced the scope.
    pub kind: ScopeKind,
    /// Span of the introducing node.
    pub span: Span,
    /// Names declared directly in this scope.
    pub bindings: HashMap<String, Binding>,
}

/// All scopes of a module plus the scope of every identifier node.
#[derive(Debug, Clone, Default)]
pub struct ScopeTree {
    scopes: Vec<Scope>,
    node_scope: HashMap<usize, ScopeId>,
}

/// Whether nodes of `kind` name a variable, type or markup component.
#[must_use]
pub fn is_identifier_kind(kind: &str) -> bool {
    matches!(
        kind,
        "identifier"
            | "shorthand_property_identifier"
            | "shorthand_property_identifier_pattern"
            | "type_identifier"
    )
}

impl ScopeTree {
    /// Build the scope tree of a parsed module.
    #[must_use]
    pub fn build(root: Node<'_>, source: &str) -> Self {
        let mut builder = Builder {
            source,
            tree: Self::default(),
        };
        let program = builder.push_scope(ScopeKind::Program, root, None);
        builder.visit_children(root, program);
        builder.tree
    }

    /// Scope by id.
    #[must_use]
    pub fn scope(&self, id: ScopeId) -> Option<&Scope> {
        self.scopes.get(id)
    }

    /// All scopes; index 0 is the program scope.
    #[must_use]
    pub fn scopes(&self) -> &[Scope] {
        &self.scopes
    }

    /// Scope an identifier node is looked up from.
    #[must_use]
    pub fn scope_of(&self, node: Node<'_>) -> Option<ScopeId> {
        self.node_scope.get(&node.id()).copied()
    }

    /// Find `name` starting at `scope` and walking outward.
    #[must_use]
    pub fn lookup(&self, scope: ScopeId, name: &str) -> Option<&Binding> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let s = self.scopes.get(id)?;
            if let Some(binding) = s.bindings.get(name) {
                return Some(binding);
            }
            current = s.parent;
        }
        None
    }

    /// Binding an identifier node refers to, `None` when unbound or when
    /// the node is not a recorded identifier.
    #[must_use]
    pub fn resolve(&self, node: Node<'_>, source: &str) -> Option<&Binding> {
        let scope = self.scope_of(node)?;
        let name = source.get(node.byte_range())?;
        self.lookup(scope, name)
    }
}

struct Builder<'s> {
    source: &'s str,
    tree: ScopeTree,
}

impl Builder<'_> {
    fn push_scope(&mut self, kind: ScopeKind, node: Node<'_>, parent: Option<ScopeId>) -> ScopeId {
        self.tree.scopes.push(Scope {
            parent,
            kind,
            span: Span::of(node),
            bindings: HashMap::new(),
        });
        self.tree.scopes.len() - 1
    }

    fn text(&self, node: Node<'_>) -> &str {
        self.source.get(node.byte_range()).unwrap_or("")
    }

    /// Nearest function or program scope, the target of `var` hoisting.
    fn function_scope(&self, mut scope: ScopeId) -> ScopeId {
        while let Some(s) = self.tree.scopes.get(scope) {
            match (s.kind, s.parent) {
                (ScopeKind::Function | ScopeKind::Program, _) | (_, None) => break,
                (_, Some(parent)) => scope = parent,
            }
        }
        scope
    }

    fn declare(&mut self, node: Node<'_>, scope: ScopeId, kind: BindingKind) {
        if !is_identifier_kind(node.kind()) {
            return;
        }
        let name = self.text(node).to_string();
        self.tree.node_scope.insert(node.id(), scope);
        if let Some(s) = self.tree.scopes.get_mut(scope) {
            s.bindings.entry(name.clone()).or_insert(Binding {
                name,
                node_id: node.id(),
                span: Span::of(node),
                kind,
            });
        }
    }

    fn declare_pattern(&mut self, node: Node<'_>, scope: ScopeId, kind: BindingKind) {
        match node.kind() {
            "identifier" | "shorthand_property_identifier_pattern" => {
                self.declare(node, scope, kind);
            }
            "object_pattern" | "array_pattern" | "formal_parameters" => {
                let mut cursor = node.walk();
                for child in node.named_children(&mut cursor) {
                    self.declare_pattern(child, scope, kind);
                }
            }
            "pair_pattern" => {
                if let Some(value) = node.child_by_field_name("value") {
                    self.declare_pattern(value, scope, kind);
                }
            }
            "assignment_pattern" | "object_assignment_pattern" => {
                if let Some(left) = node.child_by_field_name("left") {
                    self.declare_pattern(left, scope, kind);
                }
            }
            "rest_pattern" => {
                if let Some(inner) = node.named_child(0) {
                    self.declare_pattern(inner, scope, kind);
                }
            }
            "required_parameter" | "optional_parameter" => {
                if let Some(pattern) = node.child_by_field_name("pattern") {
                    self.declare_pattern(pattern, scope, kind);
                }
            }
            _ => {}
        }
    }

    fn declare_params(&mut self, node: Node<'_>, scope: ScopeId) {
        if let Some(params) = node.child_by_field_name("parameters") {
            self.declare_pattern(params, scope, BindingKind::Param);
        }
        if let Some(param) = node.child_by_field_name("parameter") {
            self.declare_pattern(param, scope, BindingKind::Param);
        }
    }

    fn declare_declarators(&mut self, node: Node<'_>, scope: ScopeId, kind: BindingKind) {
        let mut cursor = node.walk();
        for declarator in node.named_children(&mut cursor) {
            if declarator.kind() == "variable_declarator"
                && let Some(name) = declarator.child_by_field_name("name")
            {
                self.declare_pattern(name, scope, kind);
            }
        }
    }

    fn declare_imports(&mut self, node: Node<'_>, scope: ScopeId) {
        for child in crate::tree::Preorder::new(node) {
            match child.kind() {
                "import_clause" => {
                    if let Some(default) = child.named_child(0)
                        && default.kind() == "identifier"
                    {
                        self.declare(default, scope, BindingKind::Import);
                    }
                }
                "namespace_import" => {
                    if let Some(name) = child.named_child(0) {
                        self.declare(name, scope, BindingKind::Import);
                    }
                }
                "import_specifier" => {
                    let local = child
                        .child_by_field_name("alias")
                        .or_else(|| child.child_by_field_name("name"));
                    if let Some(local) = local {
                        self.declare(local, scope, BindingKind::Import);
                    }
                }
                _ => {}
            }
        }
    }

    fn visit_children(&mut self, node: Node<'_>, scope: ScopeId) {
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            self.visit(child, scope);
        }
    }

    fn visit(&mut self, node: Node<'_>, scope: ScopeId) {
        match node.kind() {
            "function_declaration" | "generator_function_declaration" => {
                if let Some(name) = node.child_by_field_name("name") {
                    self.declare(name, scope, BindingKind::Function);
                }
                let inner = self.push_scope(ScopeKind::Function, node, Some(scope));
                self.declare_params(node, inner);
                self.visit_children(node, inner);
            }
            "function_expression" | "function" | "generator_function" => {
                let inner = self.push_scope(ScopeKind::Function, node, Some(scope));
                if let Some(name) = node.child_by_field_name("name") {
                    self.declare(name, inner, BindingKind::Function);
                }
                self.declare_params(node, inner);
                self.visit_children(node, inner);
            }
            "arrow_function" | "method_definition" => {
                let inner = self.push_scope(ScopeKind::Function, node, Some(scope));
                self.declare_params(node, inner);
                self.visit_children(node, inner);
            }
            "class_declaration" | "abstract_class_declaration" => {
                if let Some(name) = node.child_by_field_name("name") {
                    self.declare(name, scope, BindingKind::Class);
                }
                let inner = self.push_scope(ScopeKind::Class, node, Some(scope));
                self.visit_children(node, inner);
            }
            "class" => {
                let inner = self.push_scope(ScopeKind::Class, node, Some(scope));
                if let Some(name) = node.child_by_field_name("name") {
                    self.declare(name, inner, BindingKind::Class);
                }
                self.visit_children(node, inner);
            }
            "lexical_declaration" => {
                let kind = match node.child_by_field_name("kind").map(|k| self.text(k)) {
                    Some("const") => BindingKind::Const,
                    _ => BindingKind::Let,
                };
                self.declare_declarators(node, scope, kind);
                self.visit_children(node, scope);
            }
            "variable_declaration" => {
                let target = self.function_scope(scope);
                self.declare_declarators(node, target, BindingKind::Var);
                self.visit_children(node, scope);
            }
            "statement_block" | "class_body" | "switch_body" => {
                let kind = if node.kind() == "class_body" {
                    ScopeKind::Class
                } else {
                    ScopeKind::Block
                };
                let inner = self.push_scope(kind, node, Some(scope));
                self.visit_children(node, inner);
            }
            "for_statement" | "for_in_statement" => {
                let inner = self.push_scope(ScopeKind::For, node, Some(scope));
                if let Some(kind) = node.child_by_field_name("kind")
                    && let Some(left) = node.child_by_field_name("left")
                {
                    let (target, binding) = match self.text(kind) {
                        "var" => (self.function_scope(scope), BindingKind::Var),
                        "const" => (inner, BindingKind::Const),
                        _ => (inner, BindingKind::Let),
                    };
                    self.declare_pattern(left, target, binding);
                }
                self.visit_children(node, inner);
            }
            "catch_clause" => {
                let inner = self.push_scope(ScopeKind::Catch, node, Some(scope));
                if let Some(param) = node.child_by_field_name("parameter") {
                    self.declare_pattern(param, inner, BindingKind::CatchParam);
                }
                self.visit_children(node, inner);
            }
            "import_statement" => {
                // Only local bindings are recorded; imported names of
                // aliased specifiers belong to the other module.
                self.declare_imports(node, scope);
            }
            "export_statement" => {
                // Re-exports name bindings of another module.
                if node.child_by_field_name("source").is_none() {
                    self.visit_children(node, scope);
                }
            }
            "export_specifier" => {
                if let Some(name) = node.child_by_field_name("name") {
                    self.visit(name, scope);
                }
            }
            "interface_declaration" | "type_alias_declaration" | "enum_declaration" => {
                if let Some(name) = node.child_by_field_name("name") {
                    self.declare(name, scope, BindingKind::Type);
                }
                self.visit_children(node, scope);
            }
            kind if is_identifier_kind(kind) => {
                self.tree.node_scope.entry(node.id()).or_insert(scope);
            }
            _ => self.visit_children(node, scope),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{Lang, SyntaxTree};

    fn resolved_lines(tree: &SyntaxTree, name: &str) -> Vec<(usize, Option<usize>)> {
        tree.nodes()
            .filter(|n| n.kind() == "identifier" && tree.text(*n) == name)
            .map(|n| {
                let binding = tree.scopes().resolve(n, tree.source());
                (
                    n.start_position().row,
                    binding.map(|b| tree.line_of(b.span.start)),
                )
            })
            .collect()
    }

    #[test]
    fn test_shadowing() {
        let code = "const a = 1;\nfunction f() {\n  const a = 2;\n  return a;\n}\nconsole.log(a);\n";
        let tree = SyntaxTree::parse(code, Lang::JavaScript).unwrap();
        assert_eq!(
            resolved_lines(&tree, "a"),
            vec![(0, Some(0)), (2, Some(2)), (3, Some(2)), (5, Some(0))]
        );
    }

    #[test]
    fn test_var_hoists_out_of_blocks() {
        let code = "function f() {\n  if (x) {\n    var v = 1;\n  }\n  return v;\n}\n";
        let tree = SyntaxTree::parse(code, Lang::JavaScript).unwrap();
        assert_eq!(resolved_lines(&tree, "v"), vec![(2, Some(2)), (4, Some(2))]);
    }

    #[test]
    fn test_let_stays_in_block() {
        let code = "{\n  let v = 1;\n}\nv;\n";
        let tree = SyntaxTree::parse(code, Lang::JavaScript).unwrap();
        assert_eq!(resolved_lines(&tree, "v"), vec![(1, Some(1)), (3, None)]);
    }

    #[test]
    fn test_reference_before_declaration() {
        let code = "hello();\nfunction hello() {}\n";
        let tree = SyntaxTree::parse(code, Lang::JavaScript).unwrap();
        assert_eq!(resolved_lines(&tree, "hello"), vec![(0, Some(1)), (1, Some(1))]);
    }

    #[test]
    fn test_params_and_destructuring() {
        let code = "const f = ({ a, b: [c] }, ...rest) => a + c + rest.length;\n";
        let tree = SyntaxTree::parse(code, Lang::JavaScript).unwrap();
        let scopes = tree.scopes();
        let arrow = scopes
            .scopes()
            .iter()
            .find(|s| s.kind == super::ScopeKind::Function)
            .unwrap();
        let mut names: Vec<_> = arrow.bindings.keys().cloned().collect();
        names.sort();
        assert_eq!(names, vec!["a", "c", "rest"]);
    }

    #[test]
    fn test_aliased_import_name_is_not_recorded() {
        let code = "import { a as b } from './m';\nb();\n";
        let tree = SyntaxTree::parse(code, Lang::JavaScript).unwrap();
        assert_eq!(resolved_lines(&tree, "a"), vec![(0, None)]);
        assert_eq!(resolved_lines(&tree, "b"), vec![(0, Some(0)), (1, Some(0))]);
    }

    #[test]
    fn test_catch_param() {
        let code = "try {} catch (err) { log(err); }\n";
        let tree = SyntaxTree::parse(code, Lang::JavaScript).unwrap();
        assert_eq!(resolved_lines(&tree, "err"), vec![(0, Some(0)), (0, Some(0))]);
    }
}
