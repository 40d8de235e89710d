// src/render/mod.rs

//! Layout and paint: per-tag handlers plus the stateless dispatcher.

pub mod callout;
pub mod context;
pub mod definition;
pub mod handlers;
pub mod inline;
pub mod table;
pub mod text;

pub use context::{BodyChrome, Frame, LinkRegion, RenderContext, RenderResult};

use crate::dom::{Document, Node};
use std::collections::HashMap;
use std::sync::Arc;

/// One handler per element class. Handlers are stateless and shared by
/// reference from the registry; everything mutable arrives through the
/// [`Frame`].
pub trait RenderHandler: Send + Sync {
    fn can_render(&self, node: &Node) -> bool;
    fn render(&self, node: &Node, ctx: RenderContext, frame: &mut Frame<'_>) -> RenderResult;
}

/// Maps tag names to handlers and walks the document.
pub struct Renderer {
    handlers: HashMap<String, Arc<dyn RenderHandler>>,
}

impl Renderer {
    pub fn new() -> Self {
        let mut renderer = Renderer {
            handlers: HashMap::new(),
        };

        renderer.register("text", Arc::new(handlers::TextHandler));
        renderer.register("span", Arc::new(handlers::SpanHandler));
        renderer.register("a", Arc::new(handlers::LinkHandler));
        for tag in ["h1", "h2", "h3", "h4", "h5", "h6"] {
            renderer.register(tag, Arc::new(handlers::HeadingHandler));
        }
        renderer.register("p", Arc::new(handlers::ParagraphHandler));
        renderer.register("ul", Arc::new(handlers::ListHandler));
        renderer.register("ol", Arc::new(handlers::ListHandler));
        renderer.register("hr", Arc::new(handlers::HrHandler));
        renderer.register("br", Arc::new(handlers::BreakHandler));
        renderer.register("pre", Arc::new(handlers::PreHandler));
        renderer.register("code", Arc::new(handlers::CodeHandler));
        renderer.register("dl", Arc::new(definition::DefinitionListHandler));
        renderer.register("dt", Arc::new(definition::DefinitionListHandler));
        renderer.register("dd", Arc::new(definition::DefinitionListHandler));
        renderer.register("div", Arc::new(callout::CalloutHandler));
        for tag in ["table", "thead", "tbody", "tr", "th", "td"] {
            renderer.register(tag, Arc::new(table::TableHandler));
        }

        renderer
    }

    /// Registers or replaces the handler for a tag. Exposed through the
    /// widget as the extension point for custom element types.
    pub fn register(&mut self, tag: &str, handler: Arc<dyn RenderHandler>) {
        self.handlers.insert(tag.to_string(), handler);
    }

    /// Dispatches one node. Text nodes and anything without a willing
    /// handler fall back to the Text handler.
    pub fn render_node(
        &self,
        node: &Node,
        ctx: RenderContext,
        frame: &mut Frame<'_>,
    ) -> RenderResult {
        if !node.is_text() {
            if let Some(handler) = self.handlers.get(&node.tag) {
                if handler.can_render(node) {
                    let handler = handler.clone();
                    return handler.render(node, ctx, frame);
                }
            }
        }

        match self.handlers.get("text") {
            Some(text_handler) => {
                let text_handler = text_handler.clone();
                text_handler.render(node, ctx, frame)
            }
            None => RenderResult::at(ctx.y),
        }
    }

    /// Walks the root's children top to bottom, advancing the Y cursor and
    /// accumulating link rectangles.
    pub fn render_document(
        &self,
        document: &Document,
        mut ctx: RenderContext,
        frame: &mut Frame<'_>,
    ) -> RenderResult {
        let mut result = RenderResult::at(ctx.y);
        let start_y = ctx.y;

        for child in &document.root.children {
            let child_result = self.render_node(child, ctx, frame);
            ctx.y = child_result.next_y;
            result.next_y = child_result.next_y;
            result.links.extend(child_result.links);
        }

        result.height = result.next_y - start_y;
        result
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}
