// src/render/handlers.rs

//! The default render handler set: text, inline spans, links, headings,
//! paragraphs, lists, rules, breaks and code.

use crate::dom::{Node, NodeContext};
use crate::fonts::FontHandle;
use crate::geometry::{Color, Point, Rect};
use crate::render::context::{Frame, LinkRegion, RenderContext, RenderResult};
use crate::render::inline::{build_segments, wrap_segments, SegmentPalette, WrapMode};
use crate::render::text::{draw_text_unicode, draw_wrapped_text};
use crate::render::RenderHandler;

/// Fallback handler: draws text nodes with the inherited font and color and
/// renders unrecognized elements as their flattened text in gray.
pub struct TextHandler;

impl RenderHandler for TextHandler {
    fn can_render(&self, node: &Node) -> bool {
        node.is_text() || node.tag == "text"
    }

    fn render(&self, node: &Node, ctx: RenderContext, frame: &mut Frame<'_>) -> RenderResult {
        let (content, color) = if node.is_text() {
            (node.content.clone(), ctx.color)
        } else {
            (node.deep_text(), Color::GRAY)
        };
        if content.is_empty() {
            return RenderResult::at(ctx.y);
        }

        let next_y = draw_wrapped_text(frame, &content, ctx.x, ctx.y, ctx.width, ctx.font, color);
        RenderResult {
            next_y,
            height: next_y - ctx.y,
            ..Default::default()
        }
    }
}

/// Normalized formatting spans. Inline spans draw their text at the running
/// X cursor; block spans re-dispatch their children with the resolved font
/// and color.
pub struct SpanHandler;

impl SpanHandler {
    fn resolve_style(node: &Node, ctx: &RenderContext, frame: &Frame<'_>) -> (FontHandle, Color) {
        let mut font = ctx.font;
        let mut color = ctx.color;
        if let Some(style) = node.attr("style") {
            if style.contains("font-weight: bold") {
                font = frame.fonts.bold;
                color = Color::DARK_BLUE;
            }
            if style.contains("font-style: italic") {
                font = frame.fonts.italic;
                color = Color::DARK_GREEN;
            }
        }
        (font, color)
    }
}

impl RenderHandler for SpanHandler {
    fn can_render(&self, node: &Node) -> bool {
        node.tag == "span"
    }

    fn render(&self, node: &Node, ctx: RenderContext, frame: &mut Frame<'_>) -> RenderResult {
        let (font, color) = Self::resolve_style(node, &ctx, frame);

        if node.context == NodeContext::Inline {
            let content = node.text_content();
            if content.is_empty() {
                return RenderResult {
                    next_y: ctx.y,
                    next_x: ctx.current_x,
                    ..Default::default()
                };
            }

            let font_size = font.size_or(16.0);
            draw_text_unicode(frame, &content, ctx.current_x, ctx.y, font, color);
            let text_width = frame.measure_width(font, font_size, &content);

            return RenderResult {
                next_y: ctx.y,
                next_x: ctx.current_x + text_width,
                height: font_size,
                line_height: font_size,
                ..Default::default()
            };
        }

        // Block context: recurse with the resolved style inherited.
        let mut child_ctx = ctx;
        child_ctx.font = font;
        child_ctx.color = color;

        let renderer = frame.renderer;
        let mut result = RenderResult::at(ctx.y);
        for child in &node.children {
            let child_result = renderer.render_node(child, child_ctx, frame);
            child_ctx.y = child_result.next_y;
            result.next_y = child_result.next_y;
            result.links.extend(child_result.links);
        }
        result.height = result.next_y - ctx.y;
        result
    }
}

/// Hyperlinks: blue underlined text plus a hit rectangle. Hovered links
/// (from the previous frame's hit test) darken.
pub struct LinkHandler;

impl RenderHandler for LinkHandler {
    fn can_render(&self, node: &Node) -> bool {
        node.tag == "a"
    }

    fn render(&self, node: &Node, ctx: RenderContext, frame: &mut Frame<'_>) -> RenderResult {
        let href = node.attr("href").unwrap_or("").to_string();

        let content = node.text_content();
        if content.is_empty() {
            return RenderResult {
                next_y: ctx.y,
                next_x: ctx.current_x,
                ..Default::default()
            };
        }

        let font = ctx.font;
        let font_size = font.size_or(16.0);
        let text_size = frame.measure(font, font_size, &content);

        let color = if frame.hovered.contains(&href) {
            Color::DARK_BLUE
        } else {
            Color::BLUE
        };

        if node.context == NodeContext::Inline {
            draw_text_unicode(frame, &content, ctx.current_x, ctx.y, font, color);
            frame.painter.line(
                Point::new(ctx.current_x, ctx.y + text_size.height),
                Point::new(ctx.current_x + text_size.width, ctx.y + text_size.height),
                1.0,
                color,
            );

            RenderResult {
                next_y: ctx.y,
                next_x: ctx.current_x + text_size.width,
                height: text_size.height,
                line_height: text_size.height,
                links: vec![LinkRegion {
                    bounds: Rect::new(ctx.current_x, ctx.y, text_size.width, text_size.height),
                    url: href,
                    hover: false,
                }],
            }
        } else {
            draw_text_unicode(frame, &content, ctx.x, ctx.y, font, color);
            frame.painter.line(
                Point::new(ctx.x, ctx.y + text_size.height),
                Point::new(ctx.x + text_size.width, ctx.y + text_size.height),
                1.0,
                color,
            );

            RenderResult {
                next_y: ctx.y + text_size.height + 5.0,
                height: text_size.height + 5.0,
                links: vec![LinkRegion {
                    bounds: Rect::new(ctx.x, ctx.y, text_size.width, text_size.height),
                    url: href,
                    hover: false,
                }],
                ..Default::default()
            }
        }
    }
}

const HEADING_SPACING_BEFORE: [f32; 6] = [25.0, 20.0, 18.0, 15.0, 12.0, 10.0];
const HEADING_SPACING_AFTER: [f32; 6] = [15.0, 12.0, 10.0, 8.0, 6.0, 5.0];
const HEADING_FONT_SIZES: [f32; 6] = [32.0, 28.0, 24.0, 20.0, 18.0, 16.0];

pub struct HeadingHandler;

impl HeadingHandler {
    fn level(node: &Node) -> Option<usize> {
        let rest = node.tag.strip_prefix('h')?;
        match rest.parse::<usize>() {
            Ok(level @ 1..=6) => Some(level),
            _ => None,
        }
    }
}

impl RenderHandler for HeadingHandler {
    fn can_render(&self, node: &Node) -> bool {
        Self::level(node).is_some()
    }

    fn render(&self, node: &Node, ctx: RenderContext, frame: &mut Frame<'_>) -> RenderResult {
        let Some(level) = Self::level(node) else {
            return RenderResult::at(ctx.y);
        };

        let font = frame.fonts.heading(level as u8);
        let spacing_before = HEADING_SPACING_BEFORE[level - 1];
        let spacing_after = HEADING_SPACING_AFTER[level - 1];
        let y = ctx.y + spacing_before;

        let content = node.text_content();
        let font_size = font.size_or(HEADING_FONT_SIZES[level - 1]);

        draw_text_unicode(frame, &content, ctx.x, y, font, Color::DARK_BLUE);

        RenderResult {
            next_y: y + font_size + spacing_after,
            height: font_size + spacing_before + spacing_after,
            ..Default::default()
        }
    }
}

/// Paragraphs flatten their inline subtree into segments and word-wrap them.
pub struct ParagraphHandler;

impl RenderHandler for ParagraphHandler {
    fn can_render(&self, node: &Node) -> bool {
        node.tag == "p"
    }

    fn render(&self, node: &Node, mut ctx: RenderContext, frame: &mut Frame<'_>) -> RenderResult {
        if ctx.font.base_size <= 0.0 {
            ctx.font = frame.fonts.regular;
        }

        let segments = build_segments(node, ctx.font, ctx.color, SegmentPalette::paragraph(), frame);
        wrap_segments(&segments, ctx, frame, WrapMode::Paint)
    }
}

const LIST_BASE_INDENT: f32 = 25.0;
const LIST_NESTED_INDENT: f32 = 20.0;

/// Bullet and ordinal lists. The container threads the list type and item
/// index to each `li`, so `li` is not registered at the top level.
pub struct ListHandler;

impl ListHandler {
    fn render_item(
        node: &Node,
        ctx: RenderContext,
        list_tag: &str,
        index: usize,
        frame: &mut Frame<'_>,
    ) -> RenderResult {
        let marker_font = frame.fonts.regular;
        if list_tag == "ol" {
            let marker = format!("{}.", index + 1);
            frame.painter.draw_text(
                marker_font,
                &marker,
                Point::new(ctx.x - 20.0, ctx.y),
                16.0,
                1.0,
                Color::BLACK,
            );
        } else {
            frame.painter.draw_text(
                marker_font,
                "\u{2022}",
                Point::new(ctx.x - 15.0, ctx.y),
                18.0,
                1.0,
                Color::BLACK,
            );
        }

        let mut content_ctx = ctx;
        content_ctx.current_x = ctx.x;
        if content_ctx.font.base_size <= 0.0 {
            content_ctx.font = frame.fonts.regular;
        }

        let segments = build_segments(
            node,
            content_ctx.font,
            content_ctx.color,
            SegmentPalette::paragraph(),
            frame,
        );
        wrap_segments(&segments, content_ctx, frame, WrapMode::Paint)
    }
}

impl RenderHandler for ListHandler {
    fn can_render(&self, node: &Node) -> bool {
        matches!(node.tag.as_str(), "ul" | "ol" | "li")
    }

    fn render(&self, node: &Node, ctx: RenderContext, frame: &mut Frame<'_>) -> RenderResult {
        if node.tag == "li" {
            // Orphan list item: treat it as an unordered entry.
            return Self::render_item(node, ctx, "ul", 0, frame);
        }

        let mut result = RenderResult::at(ctx.y + 10.0);
        let mut current_y = result.next_y;

        for (index, child) in node.children.iter().enumerate() {
            if child.tag != "li" {
                continue;
            }

            let base = LIST_BASE_INDENT;
            let nested = ctx.indent as f32 * LIST_NESTED_INDENT;
            let mut child_ctx = ctx;
            child_ctx.x = ctx.x + base + nested;
            child_ctx.y = current_y;
            child_ctx.width = ctx.width - base - nested - frame.chrome.margin;
            child_ctx.indent = ctx.indent + 1;

            let item_result = Self::render_item(child, child_ctx, &node.tag, index, frame);
            current_y = item_result.next_y;
            result.next_y = item_result.next_y;
            result.links.extend(item_result.links);
        }

        result.height = result.next_y - ctx.y;
        result
    }
}

pub struct HrHandler;

impl RenderHandler for HrHandler {
    fn can_render(&self, node: &Node) -> bool {
        node.tag == "hr"
    }

    fn render(&self, _node: &Node, ctx: RenderContext, frame: &mut Frame<'_>) -> RenderResult {
        let y = ctx.y + 10.0;
        let line_width = ctx.width - frame.chrome.right_margin();

        frame.painter.line(
            Point::new(ctx.x, y),
            Point::new(ctx.x + line_width, y),
            2.0,
            Color::GRAY,
        );

        RenderResult {
            next_y: y + 15.0,
            height: 25.0,
            ..Default::default()
        }
    }
}

pub struct BreakHandler;

impl RenderHandler for BreakHandler {
    fn can_render(&self, node: &Node) -> bool {
        node.tag == "br"
    }

    fn render(&self, _node: &Node, ctx: RenderContext, _frame: &mut Frame<'_>) -> RenderResult {
        RenderResult {
            next_y: ctx.y + 20.0,
            height: 20.0,
            ..Default::default()
        }
    }
}

const CODE_LINE_HEIGHT: f32 = 18.0;
const CODE_BLOCK_PADDING: f32 = 12.0;

/// Filled code box shared by `pre` and block-context `code`. Whitespace is
/// preserved exactly; each line is drawn in the large monospace font.
fn render_code_block(content: &str, ctx: RenderContext, frame: &mut Frame<'_>) -> RenderResult {
    let y = ctx.y + 10.0;
    let lines: Vec<&str> = content.split('\n').collect();
    let block_height = lines.len() as f32 * CODE_LINE_HEIGHT + 2.0 * CODE_BLOCK_PADDING;
    let block_width = ctx.width - frame.chrome.right_margin();

    let background = Rect::new(ctx.x, y, block_width, block_height);
    frame.painter.fill_rect(background, Color::CODE_BACKGROUND);
    frame.painter.stroke_rect(background, 1.0, Color::CODE_BORDER);

    let font = frame.fonts.monospace_large;
    let mut current_y = y + CODE_BLOCK_PADDING;
    for line in lines {
        draw_text_unicode(
            frame,
            line,
            ctx.x + CODE_BLOCK_PADDING,
            current_y,
            font,
            Color::CODE_TEXT,
        );
        current_y += CODE_LINE_HEIGHT;
    }

    RenderResult {
        next_y: y + block_height + 10.0,
        height: block_height + 20.0,
        ..Default::default()
    }
}

pub struct PreHandler;

impl RenderHandler for PreHandler {
    fn can_render(&self, node: &Node) -> bool {
        node.tag == "pre"
    }

    fn render(&self, node: &Node, ctx: RenderContext, frame: &mut Frame<'_>) -> RenderResult {
        let content = node.text_content();
        if content.is_empty() {
            return RenderResult::at(ctx.y);
        }
        render_code_block(&content, ctx, frame)
    }
}

/// `code` is a box like `pre` in block context and a subtle padded run that
/// advances the inline cursor otherwise.
pub struct CodeHandler;

impl RenderHandler for CodeHandler {
    fn can_render(&self, node: &Node) -> bool {
        node.tag == "code"
    }

    fn render(&self, node: &Node, ctx: RenderContext, frame: &mut Frame<'_>) -> RenderResult {
        let content = node.text_content();
        if content.is_empty() {
            return RenderResult::at(ctx.y);
        }

        if node.context == NodeContext::Block {
            return render_code_block(&content, ctx, frame);
        }

        let font = frame.fonts.monospace;
        let font_size = font.size_or(14.0);
        let text_size = frame.measure(font, font_size, &content);
        let padding = 4.0;

        let render_x = if ctx.current_x > 0.0 { ctx.current_x } else { ctx.x };

        let background = Rect::new(
            render_x - padding,
            ctx.y - 2.0,
            text_size.width + 2.0 * padding,
            text_size.height + 4.0,
        );
        frame
            .painter
            .fill_rect(background, Color::INLINE_CODE_BACKGROUND);
        frame.painter.stroke_rect(background, 1.0, Color::CODE_BORDER);

        draw_text_unicode(frame, &content, render_x, ctx.y, font, Color::CODE_TEXT);

        if ctx.current_x > 0.0 {
            RenderResult {
                next_y: ctx.y,
                next_x: render_x + text_size.width + 2.0 * padding,
                height: text_size.height + 5.0,
                line_height: text_size.height,
                ..Default::default()
            }
        } else {
            RenderResult {
                next_y: ctx.y + text_size.height + 5.0,
                height: text_size.height + 5.0,
                ..Default::default()
            }
        }
    }
}
