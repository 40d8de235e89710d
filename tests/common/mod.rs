//! Shared fixtures: a painter that records every primitive and answers
//! deterministic measurements, and a font loader with scriptable failures.

// Each integration binary includes this module and uses a different subset.
#![allow(dead_code)]

use placard::{Color, CursorIcon, FontError, FontHandle, FontLoader, Painter, Point, RawFont, Rect, Size};
use std::path::Path;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

/// Every glyph is half an em wide, so expected geometry is trivial to
/// compute in tests: width = chars * size * 0.5, height = size.
pub const CHAR_WIDTH_FACTOR: f32 = 0.5;

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    FillRect {
        rect: Rect,
        color: Color,
    },
    StrokeRect {
        rect: Rect,
        thickness: f32,
        color: Color,
    },
    Line {
        from: Point,
        to: Point,
        thickness: f32,
        color: Color,
    },
    Text {
        font: FontHandle,
        text: String,
        origin: Point,
        size: f32,
        color: Color,
    },
    Codepoint {
        font: FontHandle,
        codepoint: char,
        origin: Point,
        size: f32,
        color: Color,
    },
    Cursor(CursorIcon),
    BeginClip(Rect),
    EndClip,
}

#[derive(Default)]
pub struct RecordingPainter {
    pub calls: Vec<DrawCall>,
}

impl RecordingPainter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }

    /// All bulk text draws, in order.
    pub fn texts(&self) -> Vec<(&str, Point, FontHandle, Color)> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DrawCall::Text {
                    text,
                    origin,
                    font,
                    color,
                    ..
                } => Some((text.as_str(), *origin, *font, *color)),
                _ => None,
            })
            .collect()
    }

    pub fn texts_containing(&self, needle: &str) -> Vec<(&str, Point, FontHandle, Color)> {
        self.texts()
            .into_iter()
            .filter(|(text, ..)| text.contains(needle))
            .collect()
    }

    pub fn fill_rects(&self) -> Vec<(Rect, Color)> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DrawCall::FillRect { rect, color } => Some((*rect, *color)),
                _ => None,
            })
            .collect()
    }

    pub fn last_cursor(&self) -> Option<CursorIcon> {
        self.calls.iter().rev().find_map(|c| match c {
            DrawCall::Cursor(icon) => Some(*icon),
            _ => None,
        })
    }
}

impl Painter for RecordingPainter {
    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.calls.push(DrawCall::FillRect { rect, color });
    }

    fn stroke_rect(&mut self, rect: Rect, thickness: f32, color: Color) {
        self.calls.push(DrawCall::StrokeRect {
            rect,
            thickness,
            color,
        });
    }

    fn line(&mut self, from: Point, to: Point, thickness: f32, color: Color) {
        self.calls.push(DrawCall::Line {
            from,
            to,
            thickness,
            color,
        });
    }

    fn draw_text(
        &mut self,
        font: FontHandle,
        text: &str,
        origin: Point,
        size: f32,
        _tracking: f32,
        color: Color,
    ) {
        self.calls.push(DrawCall::Text {
            font,
            text: text.to_string(),
            origin,
            size,
            color,
        });
    }

    fn draw_codepoint(
        &mut self,
        font: FontHandle,
        codepoint: char,
        origin: Point,
        size: f32,
        color: Color,
    ) {
        self.calls.push(DrawCall::Codepoint {
            font,
            codepoint,
            origin,
            size,
            color,
        });
    }

    fn measure_text(&mut self, _font: FontHandle, text: &str, size: f32) -> Size {
        Size::new(text.chars().count() as f32 * size * CHAR_WIDTH_FACTOR, size)
    }

    fn set_cursor(&mut self, cursor: CursorIcon) {
        self.calls.push(DrawCall::Cursor(cursor));
    }

    fn begin_clip(&mut self, rect: Rect) {
        self.calls.push(DrawCall::BeginClip(rect));
    }

    fn end_clip(&mut self) {
        self.calls.push(DrawCall::EndClip);
    }
}

/// Loader with monotonically increasing texture ids and scriptable
/// per-path failures. Unloads are recorded for leak assertions.
#[derive(Debug)]
pub struct StubFontLoader {
    next_id: AtomicU32,
    fail_substrings: Mutex<Vec<String>>,
    pub unloaded: Mutex<Vec<u32>>,
}

impl StubFontLoader {
    pub fn new() -> Self {
        StubFontLoader {
            next_id: AtomicU32::new(100),
            fail_substrings: Mutex::new(Vec::new()),
            unloaded: Mutex::new(Vec::new()),
        }
    }

    /// Any load whose path contains `fragment` will fail.
    pub fn fail_paths_containing(&self, fragment: &str) {
        self.fail_substrings
            .lock()
            .unwrap()
            .push(fragment.to_string());
    }
}

impl Default for StubFontLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl FontLoader for StubFontLoader {
    fn load(&self, path: &Path, size: f32, _codepoints: &[char]) -> Result<RawFont, FontError> {
        let path_str = path.to_string_lossy();
        let failing = self
            .fail_substrings
            .lock()
            .unwrap()
            .iter()
            .any(|fragment| path_str.contains(fragment.as_str()));
        if failing {
            return Err(FontError::LoadFailed {
                path: path_str.into_owned(),
                message: "stubbed failure".to_string(),
            });
        }

        Ok(RawFont {
            texture_id: self.next_id.fetch_add(1, Ordering::SeqCst),
            base_size: size,
            atlas_width: 512,
            atlas_height: 512,
        })
    }

    fn unload(&self, font: RawFont) {
        self.unloaded.lock().unwrap().push(font.texture_id);
    }

    fn fallback(&self) -> RawFont {
        RawFont {
            texture_id: 1,
            base_size: 10.0,
            atlas_width: 128,
            atlas_height: 128,
        }
    }
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
