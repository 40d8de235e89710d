// src/host.rs

//! Abstract host collaborators.
//!
//! The engine never talks to a concrete windowing or raster library. The
//! host supplies a [`Painter`] for drawing and measurement, a [`FontLoader`]
//! for turning font files into opaque handles, and a [`FrameInput`] snapshot
//! per frame. Tests drive the engine with recording implementations of the
//! same traits.

use crate::error::FontError;
use crate::fonts::FontHandle;
use crate::geometry::{Color, Point, Rect, Size};
use std::fmt::Debug;
use std::path::Path;

/// Mouse cursor shapes the engine may request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorIcon {
    #[default]
    Default,
    PointingHand,
}

/// Opaque platform font payload returned by a [`FontLoader`].
///
/// A load is considered real when `base_size > 0` and `texture_id > 0`;
/// anything else is treated as the platform fallback.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawFont {
    pub texture_id: u32,
    pub base_size: f32,
    pub atlas_width: u32,
    pub atlas_height: u32,
}

impl RawFont {
    pub fn is_loaded(&self) -> bool {
        self.base_size > 0.0 && self.texture_id > 0
    }
}

/// Raster and measurement primitives supplied by the host.
pub trait Painter {
    fn fill_rect(&mut self, rect: Rect, color: Color);
    fn stroke_rect(&mut self, rect: Rect, thickness: f32, color: Color);
    fn line(&mut self, from: Point, to: Point, thickness: f32, color: Color);

    /// Bulk text draw. `tracking` is the extra advance between glyphs.
    fn draw_text(
        &mut self,
        font: FontHandle,
        text: &str,
        origin: Point,
        size: f32,
        tracking: f32,
        color: Color,
    );

    /// Single-codepoint draw, used on the non-ASCII path.
    fn draw_codepoint(&mut self, font: FontHandle, codepoint: char, origin: Point, size: f32, color: Color);

    /// Measure `text` at `size`. Invalid results are sanitized by the
    /// measurement cache; implementations should not panic.
    fn measure_text(&mut self, font: FontHandle, text: &str, size: f32) -> Size;

    fn set_cursor(&mut self, cursor: CursorIcon);

    fn begin_clip(&mut self, rect: Rect);
    fn end_clip(&mut self);
}

/// Font file loading supplied by the host.
pub trait FontLoader: Send + Sync + Debug {
    /// Load a font file at `size`, prerasterizing `codepoints`.
    fn load(&self, path: &Path, size: f32, codepoints: &[char]) -> Result<RawFont, FontError>;

    /// Release a previously loaded font.
    fn unload(&self, font: RawFont);

    /// The process-wide default font. Never unloaded.
    fn fallback(&self) -> RawFont;
}

/// Input snapshot for one frame, filled in by the host event loop.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameInput {
    pub mouse: Point,
    /// Wheel movement since the last frame, positive away from the user.
    pub wheel: f32,
    /// True only on the frame the left button went down.
    pub left_pressed: bool,
}
