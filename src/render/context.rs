// src/render/context.rs

//! Shared state threaded through render handlers.
//!
//! [`RenderContext`] is the small copyable cursor a parent hands each child:
//! geometry, inherited font and color, list indent. [`Frame`] bundles the
//! per-frame mutable resources (painter, measurement cache, fonts, widget
//! chrome) plus the dispatcher for recursive descent.

use crate::fonts::{FontHandle, FontSet, TextMeasureCache};
use crate::geometry::{Color, Rect, Size};
use crate::host::Painter;
use crate::render::Renderer;
use std::collections::HashSet;

/// A clickable hyperlink rectangle.
///
/// The widget stores these in document space (unaffected by scrolling);
/// handlers emit them in screen space and the widget converts after each
/// render pass.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkRegion {
    pub bounds: Rect,
    pub url: String,
    pub hover: bool,
}

/// Widget chrome dimensions, shared with handlers for width budgeting.
#[derive(Debug, Clone, Copy)]
pub struct BodyChrome {
    pub margin: f32,
    pub border: f32,
    pub padding: f32,
}

impl BodyChrome {
    /// Horizontal space handlers keep clear at the right edge.
    pub fn right_margin(&self) -> f32 {
        self.margin + self.padding
    }

    /// Inset from the widget edge to the content origin.
    pub fn content_inset(&self) -> f32 {
        self.margin + self.padding
    }
}

/// Cursor state passed top-down while walking the tree.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    /// Running X cursor for inline flows; zero outside of one.
    pub current_x: f32,
    pub font: FontHandle,
    pub color: Color,
    /// List nesting depth.
    pub indent: u32,
}

/// What a handler reports back: the advanced cursors, consumed height and
/// any link rectangles found in the subtree.
#[derive(Debug, Default, Clone)]
pub struct RenderResult {
    pub next_y: f32,
    pub next_x: f32,
    pub line_height: f32,
    pub height: f32,
    pub links: Vec<LinkRegion>,
}

impl RenderResult {
    /// A no-op result that leaves the Y cursor where it was.
    pub fn at(y: f32) -> Self {
        RenderResult {
            next_y: y,
            ..Default::default()
        }
    }
}

/// Per-frame mutable resources handed to every handler.
pub struct Frame<'a> {
    pub painter: &'a mut dyn Painter,
    pub cache: &'a mut TextMeasureCache,
    pub fonts: &'a FontSet,
    pub chrome: BodyChrome,
    pub renderer: &'a Renderer,
    /// URLs hovered during the previous update, for hover styling.
    pub hovered: &'a HashSet<String>,
}

impl Frame<'_> {
    pub fn measure(&mut self, font: FontHandle, size: f32, text: &str) -> Size {
        self.cache.size_of(&mut *self.painter, font, size, text)
    }

    pub fn measure_width(&mut self, font: FontHandle, size: f32, text: &str) -> f32 {
        self.cache.width_of(&mut *self.painter, font, size, text)
    }
}
