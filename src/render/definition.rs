// src/render/definition.rs

//! Definition lists (`dl`/`dt`/`dd`) for glossaries and API docs: bold
//! dark-blue terms with indented, paragraph-wrapped descriptions.

use crate::dom::Node;
use crate::geometry::Color;
use crate::render::context::{Frame, RenderContext, RenderResult};
use crate::render::inline::{build_segments, wrap_segments, SegmentPalette, WrapMode};
use crate::render::text::draw_text_unicode;
use crate::render::RenderHandler;

const DESCRIPTION_INDENT: f32 = 30.0;

pub struct DefinitionListHandler;

impl RenderHandler for DefinitionListHandler {
    fn can_render(&self, node: &Node) -> bool {
        matches!(node.tag.as_str(), "dl" | "dt" | "dd")
    }

    fn render(&self, node: &Node, ctx: RenderContext, frame: &mut Frame<'_>) -> RenderResult {
        match node.tag.as_str() {
            "dl" => self.render_list(node, ctx, frame),
            "dt" => self.render_term(node, ctx, frame),
            "dd" => self.render_description(node, ctx, frame),
            _ => RenderResult::at(ctx.y),
        }
    }
}

impl DefinitionListHandler {
    fn render_list(&self, node: &Node, ctx: RenderContext, frame: &mut Frame<'_>) -> RenderResult {
        let mut result = RenderResult::at(ctx.y + 10.0);
        let mut current_y = result.next_y;

        let renderer = frame.renderer;
        for child in &node.children {
            if child.tag != "dt" && child.tag != "dd" {
                continue;
            }
            let mut child_ctx = ctx;
            child_ctx.y = current_y;

            let child_result = renderer.render_node(child, child_ctx, frame);
            current_y = child_result.next_y;
            result.next_y = child_result.next_y;
            result.links.extend(child_result.links);
        }

        result.next_y += 10.0;
        result.height = result.next_y - ctx.y;
        result
    }

    fn render_term(&self, node: &Node, ctx: RenderContext, frame: &mut Frame<'_>) -> RenderResult {
        let content = node.text_content();
        if content.is_empty() {
            return RenderResult::at(ctx.y);
        }

        let font = frame.fonts.bold;
        let font_size = font.size_or(18.0);

        draw_text_unicode(frame, &content, ctx.x, ctx.y, font, Color::DARK_BLUE);
        let text_size = frame.measure(font, font_size, &content);

        RenderResult {
            next_y: ctx.y + text_size.height + 5.0,
            height: text_size.height + 5.0,
            ..Default::default()
        }
    }

    fn render_description(
        &self,
        node: &Node,
        ctx: RenderContext,
        frame: &mut Frame<'_>,
    ) -> RenderResult {
        let mut indented = ctx;
        indented.x = ctx.x + DESCRIPTION_INDENT;
        indented.width = ctx.width - DESCRIPTION_INDENT;
        indented.current_x = indented.x;
        if indented.font.base_size <= 0.0 {
            indented.font = frame.fonts.regular;
        }

        let segments = build_segments(
            node,
            indented.font,
            indented.color,
            SegmentPalette::paragraph(),
            frame,
        );
        let mut result = wrap_segments(&segments, indented, frame, WrapMode::Paint);

        result.next_y += 8.0;
        result.height += 8.0;
        result
    }
}
