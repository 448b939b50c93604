//! # pagecraft HTML compiler
//!
//! Turns a [`PageDocument`] into one standalone HTML string: inline styles,
//! inline scripts, and `%%=...=%%` merge placeholders for the marketing
//! platform that serves the page.
//!
//! ## Pipeline
//! 1. structural validation (non-fatal, reported as diagnostics)
//! 2. tree composition from the flat parent-pointer list ([`compositor`])
//! 3. per-node rendering through the renderer registry, with A/B expansion
//! 4. assembly of head, body, shared runtime and overlays ([`assembler`])
//!
//! Compiling never fails for a decoded document. Problems degrade to warning
//! blocks and come back as [`Diagnostic`]s.
//!
//! ## Example
//! ```ignore
//! use pagecraft_html::{compile_json, CompileOptions};
//!
//! let out = compile_json(json, &CompileOptions::publish().with_brand("acme"))?;
//! for d in &out.diagnostics {
//!     eprintln!("{}", d);
//! }
//! std::fs::write("page.html", out.html)?;
//! ```

pub mod assembler;
pub mod binding;
pub mod compositor;
pub mod conditional;
pub mod context;
mod datetime;
pub mod diagnostics;
pub mod escape;
pub mod layout;
pub mod options;
pub mod registry;
pub mod renderers;
pub mod scripts;

pub use context::{Children, NodeContext, PageContext, Variant};
pub use diagnostics::{Diagnostic, DiagnosticKind, Severity};
pub use options::CompileOptions;
pub use renderers::{ComponentRenderer, Fragment, Placement};
pub use scripts::SharedScript;

use assembler::Body;
use compositor::Node;
use context::RenderedChild;
use pagecraft_model::{validate_document, ComponentProps, ModelError, PageDocument};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompileError {
    #[error("Could not decode page document: {0}")]
    Decode(#[from] ModelError),
}

/// Compiled page plus everything worth telling the editor about it
#[derive(Debug, Clone, PartialEq)]
pub struct CompileOutput {
    pub html: String,
    pub diagnostics: Vec<Diagnostic>,
}

impl CompileOutput {
    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
    }
}

/// Compile a decoded document
pub fn compile(doc: &PageDocument, options: &CompileOptions) -> CompileOutput {
    let span = tracing::debug_span!("compile", page = %doc.meta.title, components = doc.components.len());
    let _guard = span.enter();

    let page = PageContext::new(doc, options);
    let mut diagnostics: Vec<Diagnostic> = validate_document(doc)
        .into_iter()
        .filter_map(diagnostics::from_model_issue)
        .collect();

    let composition = compositor::compose(&doc.components);
    diagnostics.extend(composition.diagnostics.iter().cloned());

    let mut walk = TreeWalk {
        page: &page,
        body: Body::default(),
        diagnostics,
    };
    for root in &composition.roots {
        if let Some(html) = walk.render_node(root) {
            walk.body.flow.push_str(&html);
        }
    }

    let TreeWalk { body, diagnostics, .. } = walk;
    let html = assembler::assemble(&page, body);
    for diagnostic in &diagnostics {
        diagnostic.log();
    }
    tracing::debug!(bytes = html.len(), diagnostics = diagnostics.len(), "page compiled");
    CompileOutput { html, diagnostics }
}

/// Compile and keep only the markup
pub fn compile_to_string(doc: &PageDocument, options: &CompileOptions) -> String {
    compile(doc, options).html
}

/// Decode a JSON document and compile it
pub fn compile_json(json: &str, options: &CompileOptions) -> Result<CompileOutput, CompileError> {
    let doc = PageDocument::from_json(json)?;
    Ok(compile(&doc, options))
}

/// Decode a YAML document and compile it
pub fn compile_yaml(yaml: &str, options: &CompileOptions) -> Result<CompileOutput, CompileError> {
    let doc = PageDocument::from_yaml(yaml)?;
    Ok(compile(&doc, options))
}

struct TreeWalk<'p, 'a> {
    page: &'p PageContext<'a>,
    body: Body,
    diagnostics: Vec<Diagnostic>,
}

impl TreeWalk<'_, '_> {
    /// Render a subtree. Returns flow markup; overlays are collected on the side.
    fn render_node(&mut self, node: &Node) -> Option<String> {
        let mut rendered = Vec::with_capacity(node.children.len());
        for child in &node.children {
            if let Some(html) = self.render_node(child) {
                rendered.push(RenderedChild {
                    column: child.component.column,
                    html,
                });
            }
        }
        let children = Children::new(rendered);

        let cx = NodeContext::new(node.component, node.dom_id.clone());
        let mut fragment = self.render_component(&cx, &children);
        self.body.scripts.extend(fragment.requires.iter().copied());
        self.diagnostics.append(&mut fragment.diagnostics);

        match fragment.placement {
            Placement::Flow => Some(fragment.html),
            Placement::Overlay => {
                self.body.overlays.push(fragment.html);
                None
            }
        }
    }

    fn render_component(&mut self, cx: &NodeContext, children: &Children) -> Fragment {
        let component = cx.component;
        let props = match component.typed_props() {
            Ok(props) => props,
            Err(ModelError::UnknownComponentType { component_type }) => {
                let fragment = Fragment::warning(
                    cx,
                    self.page,
                    DiagnosticKind::UnknownType,
                    format!("unknown component type '{}'", component_type),
                );
                return append_children(fragment, children);
            }
            Err(err) => {
                let fragment = Fragment::warning(cx, self.page, DiagnosticKind::InvalidProps, err.to_string());
                return append_children(fragment, children);
            }
        };

        let renderer = registry::renderer_for(&props);
        if !props.is_container() && !children.is_empty() {
            tracing::debug!(component = %component.id, "children of a leaf component rendered after it");
        }

        if !component.ab_test_enabled {
            return leaf_children(renderer.render(cx, children, self.page), &props, children);
        }

        let Some(variant_props) = ab_test::variant_b_props(component) else {
            self.diagnostics.push(Diagnostic::warning(
                DiagnosticKind::AbTestSkipped,
                &component.id,
                "A/B test is enabled but has no variant; rendered once",
            ));
            return leaf_children(renderer.render(cx, children, self.page), &props, children);
        };
        if props.is_container() && !children.is_empty() {
            self.diagnostics.push(Diagnostic::info(
                DiagnosticKind::AbTestSkipped,
                &component.id,
                "A/B test skipped: containers with children render once",
            ));
            return renderer.render(cx, children, self.page);
        }
        let variant = match component.typed_with(&variant_props) {
            Ok(variant) => variant,
            Err(err) => {
                self.diagnostics.push(Diagnostic::warning(
                    DiagnosticKind::InvalidProps,
                    &component.id,
                    format!("variant B ignored: {}", err),
                ));
                return leaf_children(renderer.render(cx, children, self.page), &props, children);
            }
        };

        let empty = Children::default();
        let a = renderer.render(&cx.for_variant(Variant::A), &empty, self.page);
        let b = registry::renderer_for(&variant).render(&cx.for_variant(Variant::B), &empty, self.page);
        let weight = component.ab_weight(self.page.options.default_ab_weight);
        let html = ab_test::wrap_variants(&cx.dom_id, &component.id, self.page.page_id(), weight, &a.html, &b.html);

        let mut merged = Fragment {
            html,
            placement: a.placement,
            ..Fragment::default()
        };
        for script in a.requires.into_iter().chain(b.requires) {
            merged = merged.require(script);
        }
        let merged = merged
            .with_diagnostics(a.diagnostics)
            .with_diagnostics(b.diagnostics);
        leaf_children(merged, &props, children)
    }
}

/// Leaf components do not place their children; the children follow them
fn leaf_children(fragment: Fragment, props: &ComponentProps, children: &Children) -> Fragment {
    if props.is_container() {
        fragment
    } else {
        append_children(fragment, children)
    }
}

/// Children of an overlay move with it
fn append_children(mut fragment: Fragment, children: &Children) -> Fragment {
    fragment.html.push_str(&children.html());
    fragment
}
