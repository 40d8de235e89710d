// src/widget.rs

//! The widget facade: one parsed document, one renderer, one viewport.
//!
//! A widget is constructed once from a content string and then driven by
//! the host loop: `update` consumes the frame's input (scrolling, hover,
//! clicks) and `render` draws the document against the current scroll
//! offset. Both are infallible; a frame is an atomic render of the
//! immutable tree against the current viewport state.

use crate::dom::{Document, Node};
use crate::fonts::{self, FontSet, TextMeasureCache};
use crate::geometry::{Color, Rect};
use crate::host::{CursorIcon, FontLoader, FrameInput, Painter};
use crate::parser::StateMachineParser;
use crate::render::{BodyChrome, Frame, LinkRegion, RenderContext, RenderHandler, Renderer};
use log::{error, info};
use std::collections::HashSet;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

const WHEEL_SCROLL_STEP: f32 = 20.0;
const SCROLLBAR_WIDTH: f32 = 10.0;

pub type LinkCallback = Box<dyn FnMut(&str)>;

pub struct HtmlWidget {
    document: Document,
    renderer: Renderer,
    fonts: FontSet,
    loader: Arc<dyn FontLoader>,
    cache: TextMeasureCache,

    link_regions: Vec<LinkRegion>,

    /// Current scroll offset, exposed so hosts can restore positions.
    pub scroll_y: f32,
    /// Reserved for scroll smoothing.
    pub target_scroll_y: f32,
    total_height: f32,
    widget_height: f32,
    /// Scrollbar fade factor; the thumb alpha scales with it.
    pub scrollbar_alpha: f32,

    pub body_margin: f32,
    pub body_border: f32,
    pub body_padding: f32,

    pub on_link_click: Option<LinkCallback>,
}

impl HtmlWidget {
    /// Parses `content` once and acquires the shared fonts. The tree lives
    /// for the widget's lifetime and is never mutated.
    pub fn new(content: &str, loader: Arc<dyn FontLoader>) -> Self {
        let document = StateMachineParser::new().parse(content);
        let fonts = FontSet::acquire(loader.as_ref());

        HtmlWidget {
            document,
            renderer: Renderer::new(),
            fonts,
            loader,
            cache: TextMeasureCache::default(),
            link_regions: Vec::new(),
            scroll_y: 0.0,
            target_scroll_y: 0.0,
            total_height: 0.0,
            widget_height: 0.0,
            scrollbar_alpha: 1.0,
            body_margin: 10.0,
            body_border: 1.0,
            body_padding: 15.0,
            on_link_click: None,
        }
    }

    /// Advances input state for this frame: scrolling, link hover and
    /// clicks. Strictly serialized with `render`; call it first.
    pub fn update(&mut self, input: &FrameInput, painter: &mut dyn Painter) {
        painter.set_cursor(CursorIcon::Default);

        self.scroll_y -= input.wheel * WHEEL_SCROLL_STEP;
        let max_scroll = (self.total_height - self.widget_height).max(0.0);
        self.scroll_y = self.scroll_y.clamp(0.0, max_scroll);

        let mut any_hover = false;
        for region in &mut self.link_regions {
            let mut screen_bounds = region.bounds;
            screen_bounds.y -= self.scroll_y;
            region.hover = screen_bounds.contains(input.mouse);
            any_hover |= region.hover;
        }

        if any_hover {
            painter.set_cursor(CursorIcon::PointingHand);
        }

        if input.left_pressed {
            let clicked: Vec<String> = self
                .link_regions
                .iter()
                .filter(|r| r.hover)
                .map(|r| r.url.clone())
                .collect();
            for url in clicked {
                self.fire_link_callback(&url);
            }
        }
    }

    /// A faulting callback is logged and never disables future frames.
    fn fire_link_callback(&mut self, url: &str) {
        match self.on_link_click.as_mut() {
            Some(callback) => {
                let outcome = catch_unwind(AssertUnwindSafe(|| callback(url)));
                if outcome.is_err() {
                    error!("link callback panicked for {url}");
                }
            }
            None => info!("clicked link: {url}"),
        }
    }

    /// Draws one frame into the viewport rectangle.
    pub fn render(&mut self, painter: &mut dyn Painter, x: f32, y: f32, width: f32, height: f32) {
        // Hover state feeds link styling; capture it before rebuilding.
        let hovered: HashSet<String> = self
            .link_regions
            .iter()
            .filter(|r| r.hover)
            .map(|r| r.url.clone())
            .collect();
        self.link_regions.clear();
        self.widget_height = height;

        let widget_rect = Rect::new(x, y, width, height);
        painter.fill_rect(widget_rect, Color::WHITE);
        if self.body_border > 0.0 {
            painter.stroke_rect(widget_rect, self.body_border, Color::BORDER_LIGHT);
        }

        let chrome = BodyChrome {
            margin: self.body_margin,
            border: self.body_border,
            padding: self.body_padding,
        };
        let content_x = x + chrome.content_inset();
        let content_y = y + chrome.content_inset() - self.scroll_y;
        let content_width = width - 2.0 * chrome.content_inset();

        painter.begin_clip(widget_rect);

        let ctx = RenderContext {
            x: content_x,
            y: content_y,
            width: content_width,
            current_x: 0.0,
            font: self.fonts.regular,
            color: Color::BLACK,
            indent: 0,
        };

        let result = {
            let mut frame = Frame {
                painter: &mut *painter,
                cache: &mut self.cache,
                fonts: &self.fonts,
                chrome,
                renderer: &self.renderer,
                hovered: &hovered,
            };
            self.renderer.render_document(&self.document, ctx, &mut frame)
        };

        // Recomputed every frame so viewport resizes and document swaps
        // stay correct. Measured against the unscrolled content origin so
        // the value is identical whatever the current offset.
        self.total_height = result.next_y + self.scroll_y - (y + chrome.content_inset())
            + 2.0 * chrome.content_inset();

        // Handlers emit screen-space rectangles; store them in document
        // space so the next hit test can subtract the live scroll offset.
        for mut region in result.links {
            region.bounds.y += self.scroll_y;
            self.link_regions.push(region);
        }

        painter.end_clip();

        if self.total_height > height {
            self.draw_scrollbar(painter, x, y, width, height);
        }
    }

    fn draw_scrollbar(&self, painter: &mut dyn Painter, x: f32, y: f32, width: f32, height: f32) {
        if self.total_height <= height || self.scrollbar_alpha <= 0.01 {
            return;
        }

        let scrollbar_x = x + width - SCROLLBAR_WIDTH;
        let content_area = height - 2.0 * self.body_margin;

        let thumb_height = (content_area * 0.2).max(40.0).min(content_area * 0.8);

        let max_scroll = self.total_height - height;
        if max_scroll <= 0.0 {
            return;
        }
        let progress = (self.scroll_y / max_scroll).clamp(0.0, 1.0);

        let track_height = content_area - thumb_height;
        let thumb_y = y + self.body_margin + progress * track_height;

        let thumb_color = Color::rgba(60, 60, 60, (self.scrollbar_alpha * 120.0) as u8);
        painter.fill_rect(
            Rect::new(scrollbar_x, thumb_y, SCROLLBAR_WIDTH, thumb_height),
            thumb_color,
        );
    }

    /// Releases font references and drops cached measurements. The widget
    /// must not be rendered again afterwards.
    pub fn unload(&mut self) {
        self.fonts.release(self.loader.as_ref());
        self.cache.clear();
    }

    /// Extension point: adds or replaces the handler for a tag.
    pub fn register_handler(&mut self, tag: &str, handler: Arc<dyn RenderHandler>) {
        self.renderer.register(tag, handler);
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Link rectangles from the latest render pass, in document space.
    pub fn link_regions(&self) -> &[LinkRegion] {
        &self.link_regions
    }

    pub fn total_height(&self) -> f32 {
        self.total_height
    }

    /// Indented dump of the parsed tree for diagnostics.
    pub fn debug_document(&self) -> String {
        let mut out = String::new();
        fn dump(node: &Node, depth: usize, out: &mut String) {
            let pad = "  ".repeat(depth);
            if node.is_text() {
                out.push_str(&format!("{pad}text {:?}\n", node.content));
            } else {
                let tag = if node.tag.is_empty() { "#root" } else { &node.tag };
                out.push_str(&format!("{pad}<{tag}> {:?}\n", node.context));
                for child in &node.children {
                    dump(child, depth + 1, out);
                }
            }
        }
        dump(&self.document.root, 0, &mut out);
        out
    }

    /// Load status of every font slot the widget acquired.
    pub fn debug_fonts(&self) -> String {
        let store = fonts::store();
        let mut out = String::new();
        for (label, name, size) in [
            ("regular", "arial", 16),
            ("bold", "arial-bold", 16),
            ("italic", "arial-italic", 16),
            ("h1", "arial", 32),
            ("h2", "arial", 28),
            ("h3", "arial", 24),
            ("h4", "arial", 20),
            ("h5", "arial", 18),
            ("h6", "arial", 16),
        ] {
            let status = if store.status(name, size) { "loaded" } else { "fallback" };
            out.push_str(&format!("{label} ({name}:{size}): {status}\n"));
        }
        for (label, size) in [("monospace", 14), ("monospace-large", 16)] {
            let status = if store.monospace_status(size) { "loaded" } else { "fallback" };
            out.push_str(&format!("{label} (monospace:{size}): {status}\n"));
        }
        out
    }
}
