//! Structural extraction from a parsed source unit.
//!
//! One pass over the tree produces the import, function, class, and
//! global lists plus docstrings. The model is deliberately one level
//! deep: functions nested inside other functions are not reported
//! separately (they only contribute decision points to their enclosing
//! function), and classes nested inside classes are not reported.

use std::collections::HashSet;

use tree_sitter::Node;

use crate::analysis::complexity;
use crate::analysis::model::{ClassInfo, FunctionInfo, GlobalInfo, ImportRecord, ParamInfo};
use crate::analysis::parser::{ParsedSource, SyntaxKind};

/// The structural lists extracted from one source unit.
#[derive(Debug, Default)]
pub struct ModuleStructure {
    pub imports: Vec<ImportRecord>,
    pub functions: Vec<FunctionInfo>,
    pub classes: Vec<ClassInfo>,
    pub globals: Vec<GlobalInfo>,
    pub docstring: Option<String>,
}

/// Extract the structural model from a parsed source unit.
///
/// A file with no imports, functions, or classes yields empty lists, not
/// an error.
pub fn extract(parsed: &ParsedSource) -> ModuleStructure {
    let mut extractor = Extractor {
        parsed,
        out: ModuleStructure::default(),
        seen_imports: HashSet::new(),
        seen_globals: HashSet::new(),
    };

    let root = parsed.root();
    extractor.out.docstring = extractor.docstring_of(root);
    extractor.collect_imports(root);

    let mut cursor = root.walk();
    for stmt in root.named_children(&mut cursor) {
        extractor.visit_statement(stmt, true);
    }

    extractor.out
}

struct Extractor<'a> {
    parsed: &'a ParsedSource,
    out: ModuleStructure,
    seen_imports: HashSet<String>,
    seen_globals: HashSet<String>,
}

impl<'a> Extractor<'a> {
    fn text(&self, node: Node) -> &'a str {
        self.parsed.node_text(node)
    }

    fn line(node: Node) -> usize {
        node.start_position().row + 1
    }

    /// Walk one module-level statement. `top_level` is true only for
    /// direct children of the module; definitions below that (inside a
    /// module-level `if`, `try`, loop) stay out of the structural model,
    /// while assignments there still count as globals because they sit
    /// outside every function and class body.
    fn visit_statement(&mut self, node: Node<'a>, top_level: bool) {
        match SyntaxKind::of(&node) {
            SyntaxKind::FunctionDef => {
                if top_level {
                    let func = self.read_function(node, Vec::new());
                    self.out.functions.push(func);
                }
            }
            SyntaxKind::ClassDef => {
                if top_level {
                    let class = self.read_class(node);
                    self.out.classes.push(class);
                }
            }
            SyntaxKind::DecoratedDef => {
                if top_level {
                    let (decorators, definition) = self.split_decorated(node);
                    match definition {
                        Some(def) if SyntaxKind::of(&def) == SyntaxKind::FunctionDef => {
                            let func = self.read_function(def, decorators);
                            self.out.functions.push(func);
                        }
                        Some(def) if SyntaxKind::of(&def) == SyntaxKind::ClassDef => {
                            let class = self.read_class(def);
                            self.out.classes.push(class);
                        }
                        _ => {}
                    }
                }
            }
            SyntaxKind::ExpressionStatement => self.record_globals(node),
            // Imports are collected in a dedicated document-order walk.
            SyntaxKind::Import | SyntaxKind::ImportFrom | SyntaxKind::FutureImport => {}
            SyntaxKind::If
            | SyntaxKind::Elif
            | SyntaxKind::Else
            | SyntaxKind::For
            | SyntaxKind::While
            | SyntaxKind::Try
            | SyntaxKind::Except
            | SyntaxKind::Finally
            | SyntaxKind::Match
            | SyntaxKind::Case
            | SyntaxKind::Block => {
                let mut cursor = node.walk();
                for child in node.named_children(&mut cursor) {
                    self.visit_statement(child, false);
                }
            }
            _ => {}
        }
    }

    // ------------------------------------------------------------------
    // Imports
    // ------------------------------------------------------------------

    /// Record every import-like statement in document order, anywhere in
    /// the tree (conditional and function-local imports included).
    fn collect_imports(&mut self, node: Node) {
        match SyntaxKind::of(&node) {
            SyntaxKind::Import => self.record_plain_import(node),
            SyntaxKind::ImportFrom => self.record_from_import(node, None),
            SyntaxKind::FutureImport => self.record_from_import(node, Some("__future__")),
            _ => {
                let mut cursor = node.walk();
                for child in node.named_children(&mut cursor) {
                    self.collect_imports(child);
                }
            }
        }
    }

    fn record_plain_import(&mut self, node: Node) {
        let line = Self::line(node);
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            match child.kind() {
                "dotted_name" => self.push_import(self.text(child).to_string(), line),
                // `import numpy as np` resolves to the original path.
                "aliased_import" => {
                    if let Some(name) = child.child_by_field_name("name") {
                        self.push_import(self.text(name).to_string(), line);
                    }
                }
                _ => {}
            }
        }
    }

    fn record_from_import(&mut self, node: Node, fixed_module: Option<&str>) {
        let line = Self::line(node);
        let module_node = node.child_by_field_name("module_name");
        let module = match fixed_module {
            Some(m) => m.to_string(),
            None => module_node.map(|n| self.text(n).to_string()).unwrap_or_default(),
        };

        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            if module_node.map(|m| m.id()) == Some(child.id()) {
                continue;
            }
            match child.kind() {
                "dotted_name" => {
                    let path = join_import(&module, self.text(child));
                    self.push_import(path, line);
                }
                "aliased_import" => {
                    if let Some(name) = child.child_by_field_name("name") {
                        let path = join_import(&module, self.text(name));
                        self.push_import(path, line);
                    }
                }
                "wildcard_import" => {
                    self.push_import(join_import(&module, "*"), line);
                }
                _ => {}
            }
        }
    }

    fn push_import(&mut self, path: String, line: usize) {
        if !path.is_empty() && self.seen_imports.insert(path.clone()) {
            self.out.imports.push(ImportRecord { path, line });
        }
    }

    // ------------------------------------------------------------------
    // Functions
    // ------------------------------------------------------------------

    fn read_function(&self, node: Node, decorators: Vec<String>) -> FunctionInfo {
        let name = node
            .child_by_field_name("name")
            .map(|n| self.text(n).to_string())
            .unwrap_or_default();
        let is_async = node.child(0).map(|n| n.kind() == "async").unwrap_or(false);
        let params = node
            .child_by_field_name("parameters")
            .map(|p| self.read_params(p))
            .unwrap_or_default();
        let returns = node
            .child_by_field_name("return_type")
            .map(|n| self.text(n).to_string());

        let (docstring, complexity) = match node.child_by_field_name("body") {
            Some(body) => (
                self.docstring_of(body),
                complexity::function_complexity(body),
            ),
            None => (None, 1),
        };

        FunctionInfo {
            name,
            params,
            decorators,
            returns,
            docstring,
            line: Self::line(node),
            is_async,
            complexity,
        }
    }

    fn read_params(&self, params: Node) -> Vec<ParamInfo> {
        let mut out = Vec::new();
        let mut cursor = params.walk();
        for child in params.named_children(&mut cursor) {
            let param = match child.kind() {
                "identifier" => Some(ParamInfo {
                    name: self.text(child).to_string(),
                    annotation: None,
                    has_default: false,
                }),
                "typed_parameter" => Some(ParamInfo {
                    name: child
                        .named_child(0)
                        .map(|n| self.pattern_name(n))
                        .unwrap_or_default(),
                    annotation: child
                        .child_by_field_name("type")
                        .map(|n| self.text(n).to_string()),
                    has_default: false,
                }),
                "default_parameter" => Some(ParamInfo {
                    name: child
                        .child_by_field_name("name")
                        .map(|n| self.pattern_name(n))
                        .unwrap_or_default(),
                    annotation: None,
                    has_default: true,
                }),
                "typed_default_parameter" => Some(ParamInfo {
                    name: child
                        .child_by_field_name("name")
                        .map(|n| self.pattern_name(n))
                        .unwrap_or_default(),
                    annotation: child
                        .child_by_field_name("type")
                        .map(|n| self.text(n).to_string()),
                    has_default: true,
                }),
                "list_splat_pattern" | "dictionary_splat_pattern" => Some(ParamInfo {
                    name: self.pattern_name(child),
                    annotation: None,
                    has_default: false,
                }),
                // Bare `*` and `/` markers carry no name.
                _ => None,
            };
            if let Some(param) = param {
                if !param.name.is_empty() {
                    out.push(param);
                }
            }
        }
        out
    }

    /// Name of a parameter pattern with `*`/`**` sigils stripped.
    fn pattern_name(&self, node: Node) -> String {
        match node.kind() {
            "list_splat_pattern" | "dictionary_splat_pattern" => node
                .named_child(0)
                .map(|n| self.text(n).to_string())
                .unwrap_or_default(),
            _ => self.text(node).to_string(),
        }
    }

    fn split_decorated(&self, node: Node<'a>) -> (Vec<String>, Option<Node<'a>>) {
        let mut decorators = Vec::new();
        let mut definition = None;
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            match SyntaxKind::of(&child) {
                SyntaxKind::Decorator => decorators.push(self.decorator_name(child)),
                SyntaxKind::FunctionDef | SyntaxKind::ClassDef => definition = Some(child),
                _ => {}
            }
        }
        (decorators, definition)
    }

    /// Decorator names are metadata: a bare name or dotted path verbatim,
    /// and the callee for call decorators like `@app.route("/")`.
    fn decorator_name(&self, node: Node) -> String {
        let Some(expr) = node.named_child(0) else {
            return String::new();
        };
        let target = if expr.kind() == "call" {
            expr.child_by_field_name("function").unwrap_or(expr)
        } else {
            expr
        };
        self.text(target).to_string()
    }

    // ------------------------------------------------------------------
    // Classes
    // ------------------------------------------------------------------

    fn read_class(&self, node: Node<'a>) -> ClassInfo {
        let name = node
            .child_by_field_name("name")
            .map(|n| self.text(n).to_string())
            .unwrap_or_default();

        let mut bases = Vec::new();
        if let Some(args) = node.child_by_field_name("superclasses") {
            let mut cursor = args.walk();
            for child in args.named_children(&mut cursor) {
                // Base names verbatim; `metaclass=...` keywords are not bases.
                match child.kind() {
                    "keyword_argument" | "comment" => {}
                    _ => bases.push(self.text(child).to_string()),
                }
            }
        }

        let mut methods = Vec::new();
        let mut docstring = None;
        let mut attributes = Vec::new();
        if let Some(body) = node.child_by_field_name("body") {
            docstring = self.docstring_of(body);
            let mut cursor = body.walk();
            for stmt in body.named_children(&mut cursor) {
                match SyntaxKind::of(&stmt) {
                    SyntaxKind::FunctionDef => {
                        methods.push(self.read_function(stmt, Vec::new()))
                    }
                    SyntaxKind::DecoratedDef => {
                        let (decorators, definition) = self.split_decorated(stmt);
                        if let Some(def) = definition {
                            if SyntaxKind::of(&def) == SyntaxKind::FunctionDef {
                                methods.push(self.read_function(def, decorators));
                            }
                        }
                    }
                    _ => {}
                }
            }

            let mut seen = HashSet::new();
            self.collect_self_attributes(body, &mut attributes, &mut seen);
        }

        ClassInfo {
            name,
            bases,
            methods,
            attributes,
            docstring,
            line: Self::line(node),
        }
    }

    /// Attributes assigned through `self.<name>` anywhere in the class
    /// body, in first-assignment order. Nested classes keep their own.
    fn collect_self_attributes(
        &self,
        node: Node,
        out: &mut Vec<String>,
        seen: &mut HashSet<String>,
    ) {
        if SyntaxKind::of(&node) == SyntaxKind::Assignment {
            if let Some(left) = node.child_by_field_name("left") {
                self.collect_self_targets(left, out, seen);
            }
        }
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            if SyntaxKind::of(&child) == SyntaxKind::ClassDef {
                continue;
            }
            self.collect_self_attributes(child, out, seen);
        }
    }

    fn collect_self_targets(
        &self,
        target: Node,
        out: &mut Vec<String>,
        seen: &mut HashSet<String>,
    ) {
        match target.kind() {
            "attribute" => {
                let on_self = target
                    .child_by_field_name("object")
                    .map(|o| o.kind() == "identifier" && self.text(o) == "self")
                    .unwrap_or(false);
                if on_self {
                    if let Some(attr) = target.child_by_field_name("attribute") {
                        let name = self.text(attr).to_string();
                        if seen.insert(name.clone()) {
                            out.push(name);
                        }
                    }
                }
            }
            "pattern_list" | "tuple_pattern" => {
                let mut cursor = target.walk();
                for child in target.named_children(&mut cursor) {
                    self.collect_self_targets(child, out, seen);
                }
            }
            _ => {}
        }
    }

    // ------------------------------------------------------------------
    // Globals
    // ------------------------------------------------------------------

    fn record_globals(&mut self, stmt: Node) {
        let Some(expr) = stmt.named_child(0) else {
            return;
        };
        if SyntaxKind::of(&expr) == SyntaxKind::Assignment {
            self.record_assignment_names(expr);
        }
    }

    fn record_assignment_names(&mut self, assign: Node) {
        // A bare annotation (`x: int`) declares nothing.
        let Some(right) = assign.child_by_field_name("right") else {
            return;
        };
        if let Some(left) = assign.child_by_field_name("left") {
            self.record_name_targets(left);
        }
        // Chained targets: `a = b = value`.
        if SyntaxKind::of(&right) == SyntaxKind::Assignment {
            self.record_assignment_names(right);
        }
    }

    fn record_name_targets(&mut self, target: Node) {
        match target.kind() {
            "identifier" => {
                let name = self.text(target).to_string();
                if !name.is_empty() && self.seen_globals.insert(name.clone()) {
                    self.out.globals.push(GlobalInfo {
                        name,
                        line: Self::line(target),
                    });
                }
            }
            "pattern_list" | "tuple_pattern" | "list_pattern" => {
                let mut cursor = target.walk();
                for child in target.named_children(&mut cursor) {
                    self.record_name_targets(child);
                }
            }
            // Attribute and subscript targets do not introduce module names.
            _ => {}
        }
    }

    // ------------------------------------------------------------------
    // Docstrings
    // ------------------------------------------------------------------

    /// The docstring of a module or block: its first statement, and only
    /// if that statement is a standalone string literal expression.
    fn docstring_of(&self, body: Node) -> Option<String> {
        let mut cursor = body.walk();
        let first = body
            .named_children(&mut cursor)
            .find(|n| SyntaxKind::of(n) != SyntaxKind::Comment)?;
        if SyntaxKind::of(&first) != SyntaxKind::ExpressionStatement {
            return None;
        }
        let expr = first.named_child(0)?;
        if SyntaxKind::of(&expr) != SyntaxKind::Str {
            return None;
        }
        let mut value = String::new();
        self.collect_string_content(expr, &mut value);
        Some(value)
    }

    fn collect_string_content(&self, node: Node, out: &mut String) {
        if node.kind() == "string_content" {
            out.push_str(self.text(node));
            return;
        }
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            self.collect_string_content(child, out);
        }
    }
}

fn join_import(module: &str, name: &str) -> String {
    if module.is_empty() {
        name.to_string()
    } else if module.ends_with('.') {
        format!("{module}{name}")
    } else {
        format!("{module}.{name}")
    }
}
