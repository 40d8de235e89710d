// src/render/callout.rs

//! Callout boxes: `div` elements whose class names one of the documentation
//! admonition kinds. The body is measured first so the box can be painted
//! behind it, then laid out again for real; link rectangles are recorded
//! only during the paint pass.

use crate::dom::Node;
use crate::geometry::{Color, Point, Rect};
use crate::render::context::{Frame, RenderContext, RenderResult};
use crate::render::inline::{build_segments, wrap_segments, SegmentPalette, WrapMode};
use crate::render::RenderHandler;

const CONTENT_INDENT: f32 = 50.0;
const CONTENT_RIGHT_INSET: f32 = 70.0;
const BOX_PADDING: f32 = 15.0;
const ACCENT_WIDTH: f32 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CalloutKind {
    Note,
    Warning,
    Tip,
    Info,
    Danger,
    Success,
}

struct CalloutStyle {
    background: Color,
    accent: Color,
    text: Color,
    icon: &'static str,
}

impl CalloutKind {
    /// Most specific keyword wins when a class lists several.
    fn from_class(class: &str) -> Option<Self> {
        const ORDER: [(&str, CalloutKind); 6] = [
            ("warning", CalloutKind::Warning),
            ("danger", CalloutKind::Danger),
            ("success", CalloutKind::Success),
            ("info", CalloutKind::Info),
            ("tip", CalloutKind::Tip),
            ("note", CalloutKind::Note),
        ];
        ORDER
            .iter()
            .find(|(keyword, _)| class.contains(keyword))
            .map(|(_, kind)| *kind)
    }

    fn style(self) -> CalloutStyle {
        match self {
            CalloutKind::Warning => CalloutStyle {
                background: Color::rgb(255, 248, 220),
                accent: Color::rgb(255, 193, 7),
                text: Color::rgb(133, 77, 14),
                icon: "\u{26A0}",
            },
            CalloutKind::Danger => CalloutStyle {
                background: Color::rgb(253, 237, 237),
                accent: Color::rgb(220, 38, 127),
                text: Color::rgb(114, 28, 36),
                icon: "\u{1F6AB}",
            },
            CalloutKind::Success => CalloutStyle {
                background: Color::rgb(230, 245, 233),
                accent: Color::rgb(40, 167, 69),
                text: Color::rgb(21, 87, 36),
                icon: "\u{2705}",
            },
            CalloutKind::Info => CalloutStyle {
                background: Color::rgb(217, 237, 247),
                accent: Color::rgb(52, 144, 220),
                text: Color::rgb(12, 84, 96),
                icon: "\u{2139}",
            },
            CalloutKind::Tip => CalloutStyle {
                background: Color::rgb(230, 245, 233),
                accent: Color::rgb(40, 167, 69),
                text: Color::rgb(21, 87, 36),
                icon: "\u{1F4A1}",
            },
            CalloutKind::Note => CalloutStyle {
                background: Color::rgb(248, 249, 250),
                accent: Color::rgb(108, 117, 125),
                text: Color::rgb(33, 37, 41),
                icon: "\u{1F4DD}",
            },
        }
    }
}

pub struct CalloutHandler;

impl RenderHandler for CalloutHandler {
    fn can_render(&self, node: &Node) -> bool {
        node.tag == "div"
            && node
                .attr("class")
                .and_then(CalloutKind::from_class)
                .is_some()
    }

    fn render(&self, node: &Node, ctx: RenderContext, frame: &mut Frame<'_>) -> RenderResult {
        let kind = node
            .attr("class")
            .and_then(CalloutKind::from_class)
            .unwrap_or(CalloutKind::Note);
        let style = kind.style();

        let mut content_ctx = ctx;
        content_ctx.x = ctx.x + CONTENT_INDENT;
        content_ctx.y = ctx.y + BOX_PADDING;
        content_ctx.width = ctx.width - CONTENT_RIGHT_INSET;
        content_ctx.current_x = content_ctx.x;
        content_ctx.font = frame.fonts.regular;
        content_ctx.color = style.text;

        let segments = build_segments(
            node,
            content_ctx.font,
            content_ctx.color,
            SegmentPalette::callout(),
            frame,
        );

        // Measure first so the box paints behind the content.
        let measured = wrap_segments(&segments, content_ctx, frame, WrapMode::Measure);
        let box_height = measured.height + 2.0 * BOX_PADDING;
        let box_width = ctx.width - frame.chrome.margin - frame.chrome.padding;

        let box_rect = Rect::new(ctx.x, ctx.y, box_width, box_height);
        frame.painter.fill_rect(box_rect, style.background);
        frame
            .painter
            .fill_rect(Rect::new(ctx.x, ctx.y, ACCENT_WIDTH, box_height), style.accent);
        frame
            .painter
            .stroke_rect(box_rect, 1.0, Color::rgba(200, 200, 200, 100));

        frame.painter.draw_text(
            frame.fonts.regular,
            style.icon,
            Point::new(ctx.x + 12.0, ctx.y + BOX_PADDING),
            18.0,
            1.0,
            style.accent,
        );

        let painted = wrap_segments(&segments, content_ctx, frame, WrapMode::Paint);

        RenderResult {
            next_y: ctx.y + box_height + 15.0,
            height: box_height + 15.0,
            links: painted.links,
            ..Default::default()
        }
    }
}
