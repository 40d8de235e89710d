// src/render/inline.rs

//! Inline segment flow: flattening styled subtrees into (text, font, color,
//! href) runs and word-wrapping them into lines.
//!
//! Paragraphs, list items, definition descriptions and callout bodies all
//! share this machinery; they differ only in where the flow starts and in
//! the palette applied to bold/italic spans.

use crate::dom::{Node, NodeContext};
use crate::fonts::FontHandle;
use crate::geometry::{Color, Point, Rect};
use crate::render::context::{Frame, LinkRegion, RenderContext, RenderResult};
use crate::render::text::{draw_text_unicode, BODY_LINE_HEIGHT};

const URL_TOKEN_LEN: usize = 40;
const LONG_TOKEN_LEN: usize = 30;
const HARD_BREAK_LEN: usize = 25;
const URL_BREAK_POINTS: [char; 6] = ['/', '?', '&', '=', '.', '-'];

/// A run of uniformly styled text inside an inline flow.
#[derive(Debug, Clone)]
pub struct InlineSegment {
    pub text: String,
    pub font: FontHandle,
    pub color: Color,
    pub href: Option<String>,
}

/// How bold/italic spans recolor inside a flow. Paragraph-like flows tint
/// them; callouts keep the box's text color and only switch the font.
#[derive(Debug, Clone, Copy)]
pub struct SegmentPalette {
    pub bold_color: Option<Color>,
    pub italic_color: Option<Color>,
    pub link_color: Color,
}

impl SegmentPalette {
    pub fn paragraph() -> Self {
        SegmentPalette {
            bold_color: Some(Color::DARK_BLUE),
            italic_color: Some(Color::DARK_GREEN),
            link_color: Color::BLUE,
        }
    }

    pub fn callout() -> Self {
        SegmentPalette {
            bold_color: None,
            italic_color: None,
            link_color: Color::BLUE,
        }
    }
}

/// Whether a wrapping pass paints and records links or only measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WrapMode {
    Measure,
    Paint,
}

/// Flattens the children of `node` into segments, inheriting `font`/`color`
/// and resolving inline element styling along the way.
pub fn build_segments(
    node: &Node,
    font: FontHandle,
    color: Color,
    palette: SegmentPalette,
    frame: &Frame<'_>,
) -> Vec<InlineSegment> {
    let mut segments = Vec::with_capacity(node.children.len());
    for child in &node.children {
        if child.is_text() {
            segments.push(InlineSegment {
                text: child.content.clone(),
                font,
                color,
                href: None,
            });
        } else if child.is_element() && child.context == NodeContext::Inline {
            collect_element_segments(child, font, color, None, palette, frame, &mut segments);
        }
    }
    segments
}

fn collect_element_segments(
    node: &Node,
    inherited_font: FontHandle,
    inherited_color: Color,
    inherited_href: Option<&str>,
    palette: SegmentPalette,
    frame: &Frame<'_>,
    out: &mut Vec<InlineSegment>,
) {
    let mut font = inherited_font;
    let mut color = inherited_color;

    if node.tag == "span" {
        if let Some(style) = node.attr("style") {
            if style.contains("font-weight: bold") {
                font = frame.fonts.bold;
                if let Some(tint) = palette.bold_color {
                    color = tint;
                }
            }
            if style.contains("font-style: italic") {
                font = frame.fonts.italic;
                if let Some(tint) = palette.italic_color {
                    color = tint;
                }
            }
        }
    } else if node.tag == "a" {
        color = palette.link_color;
    }

    let href = node.attr("href").or(inherited_href);

    for child in &node.children {
        if child.is_text() {
            out.push(InlineSegment {
                text: child.content.clone(),
                font,
                color,
                href: href.map(str::to_string),
            });
        } else if child.is_element() && child.context == NodeContext::Inline {
            collect_element_segments(child, font, color, href, palette, frame, out);
        }
    }
}

/// Whitespace splitting that additionally breaks overlong tokens so
/// wrapping always terminates.
///
/// URL-looking tokens longer than 40 code points split at their structural
/// punctuation, each separator kept at the start of its fragment; other
/// tokens longer than 30 code points are hard-broken every 25.
pub fn split_words(text: &str) -> Vec<String> {
    let mut words = Vec::new();

    for token in text.split_whitespace() {
        let len = token.chars().count();
        if len > URL_TOKEN_LEN && looks_like_url(token) {
            words.extend(split_at_break_points(token));
        } else if len > LONG_TOKEN_LEN {
            let chars: Vec<char> = token.chars().collect();
            for chunk in chars.chunks(HARD_BREAK_LEN) {
                words.push(chunk.iter().collect());
            }
        } else {
            words.push(token.to_string());
        }
    }

    words
}

fn looks_like_url(token: &str) -> bool {
    token.contains("://") || token.contains(".com") || token.contains(".org") || token.contains('/')
}

fn split_at_break_points(token: &str) -> Vec<String> {
    let mut fragments = vec![token.to_string()];

    for bp in URL_BREAK_POINTS {
        let mut next = Vec::with_capacity(fragments.len());
        for fragment in fragments {
            if fragment.chars().count() > LONG_TOKEN_LEN && fragment.contains(bp) {
                for (i, part) in fragment.split(bp).enumerate() {
                    if i == 0 {
                        if !part.is_empty() {
                            next.push(part.to_string());
                        }
                    } else {
                        next.push(format!("{bp}{part}"));
                    }
                }
            } else {
                next.push(fragment);
            }
        }
        fragments = next;
    }

    fragments.retain(|f| !f.is_empty());
    fragments
}

/// Word-wraps `segments` into lines starting at `(ctx.x, ctx.y)` within
/// `ctx.width`. In [`WrapMode::Paint`] each committed line is drawn and link
/// rectangles are recorded; in [`WrapMode::Measure`] only the geometry is
/// computed.
pub fn wrap_segments(
    segments: &[InlineSegment],
    ctx: RenderContext,
    frame: &mut Frame<'_>,
    mode: WrapMode,
) -> RenderResult {
    let mut result = RenderResult::at(ctx.y);

    let mut current_y = ctx.y;
    let mut line: Vec<InlineSegment> = Vec::new();
    let mut line_width = 0.0f32;
    let available = ctx.width - frame.chrome.right_margin();

    for segment in segments {
        for word in split_words(&segment.text) {
            let font_size = segment.font.size_or(16.0);
            let word_width = frame.measure_width(segment.font, font_size, &word);

            if line_width + word_width > available && !line.is_empty() {
                if mode == WrapMode::Paint {
                    draw_line(&line, ctx.x, current_y, frame, &mut result);
                }
                current_y += BODY_LINE_HEIGHT;
                line.clear();
                line_width = word_width;
                line.push(InlineSegment {
                    text: word,
                    font: segment.font,
                    color: segment.color,
                    href: segment.href.clone(),
                });
            } else {
                if !line.is_empty() {
                    let space_width = frame.measure_width(segment.font, font_size, " ");
                    line.push(InlineSegment {
                        text: " ".to_string(),
                        font: segment.font,
                        color: segment.color,
                        href: None,
                    });
                    line_width += space_width;
                }
                line.push(InlineSegment {
                    text: word,
                    font: segment.font,
                    color: segment.color,
                    href: segment.href.clone(),
                });
                line_width += word_width;
            }
        }
    }

    if !line.is_empty() {
        if mode == WrapMode::Paint {
            draw_line(&line, ctx.x, current_y, frame, &mut result);
        }
        current_y += BODY_LINE_HEIGHT;
    }

    result.next_y = current_y + 5.0;
    result.height = result.next_y - ctx.y;
    result
}

/// Draws one committed line, advancing X per segment and underlining and
/// recording any hyperlink runs.
fn draw_line(
    line: &[InlineSegment],
    x: f32,
    y: f32,
    frame: &mut Frame<'_>,
    result: &mut RenderResult,
) {
    let mut current_x = x;

    for segment in line {
        // Links hovered on the previous frame draw darker.
        let color = match &segment.href {
            Some(url) if frame.hovered.contains(url) => Color::DARK_BLUE,
            _ => segment.color,
        };
        draw_text_unicode(frame, &segment.text, current_x, y, segment.font, color);

        let font_size = segment.font.size_or(16.0);
        let segment_width = frame.measure_width(segment.font, font_size, &segment.text);

        if let Some(url) = &segment.href {
            result.links.push(LinkRegion {
                bounds: Rect::new(current_x, y, segment_width, font_size),
                url: url.clone(),
                hover: false,
            });
            frame.painter.line(
                Point::new(current_x, y + font_size),
                Point::new(current_x + segment_width, y + font_size),
                1.0,
                color,
            );
        }

        current_x += segment_width;
    }
}
