// src/render/text.rs

//! Text drawing with the dual Unicode path, plus plain wrapped text.
//!
//! The bulk draw primitive mis-kerns non-ASCII glyphs on some hosts, so any
//! string containing a codepoint >= 128 is drawn character by character:
//! ASCII through the bulk primitive at measured advances, everything else
//! through the codepoint primitive at an estimated per-category advance.

use crate::fonts::FontHandle;
use crate::geometry::{Color, Point};
use crate::render::context::Frame;
use crate::render::inline::split_words;

pub const BODY_LINE_HEIGHT: f32 = 20.0;

/// Estimated advance for a non-ASCII codepoint, as a fraction of the em.
pub fn unicode_char_width(c: char, font_size: f32) -> f32 {
    let factor = match c {
        '\u{C0}'..='\u{FF}' => 0.55,
        '\u{100}'..='\u{17F}' => 0.58,
        '\u{2013}' | '\u{2014}' => 0.5,
        '\u{2018}' | '\u{2019}' | '\u{201C}' | '\u{201D}' => 0.3,
        '\u{2026}' => 0.8,
        '\u{AB}' | '\u{BB}' => 0.45,
        '\u{2022}' | '\u{25CF}' => 0.4,
        _ => 0.6,
    };
    font_size * factor
}

/// Draws `text` at `(x, y)` handling non-ASCII content.
pub fn draw_text_unicode(
    frame: &mut Frame<'_>,
    text: &str,
    x: f32,
    y: f32,
    font: FontHandle,
    color: Color,
) {
    let font_size = font.size_or(16.0);

    if text.is_ascii() {
        frame
            .painter
            .draw_text(font, text, Point::new(x, y), font_size, 1.0, color);
        return;
    }

    let mut current_x = x;
    let mut ascii_buf = [0u8; 4];
    for c in text.chars() {
        if (c as u32) < 128 {
            let glyph = c.encode_utf8(&mut ascii_buf);
            let char_width = frame.measure_width(font, font_size, glyph);
            frame.painter.draw_text(
                font,
                glyph,
                Point::new(current_x, y),
                font_size,
                1.0,
                color,
            );
            current_x += char_width;
        } else {
            let char_width = unicode_char_width(c, font_size);
            frame
                .painter
                .draw_codepoint(font, c, Point::new(current_x, y), font_size, color);
            current_x += char_width;
        }
    }
}

/// Word-wraps and draws plain text with a single font and color, advancing
/// 20 units per line plus a 5-unit trailing gap. Returns the next Y cursor.
pub fn draw_wrapped_text(
    frame: &mut Frame<'_>,
    text: &str,
    x: f32,
    y: f32,
    width: f32,
    font: FontHandle,
    color: Color,
) -> f32 {
    if text.is_empty() {
        return y;
    }

    let font_size = font.size_or(16.0);
    let available = width - frame.chrome.right_margin();
    let mut current_line = String::new();
    let mut current_y = y;

    for word in split_words(text) {
        let mut test_line = current_line.clone();
        if !test_line.is_empty() {
            test_line.push(' ');
        }
        test_line.push_str(&word);

        let line_width = frame.measure_width(font, font_size, &test_line);
        if line_width > available && !current_line.is_empty() {
            draw_text_unicode(frame, &current_line, x, current_y, font, color);
            current_y += BODY_LINE_HEIGHT;
            current_line = word;
        } else {
            current_line = test_line;
        }
    }

    if !current_line.is_empty() {
        draw_text_unicode(frame, &current_line, x, current_y, font, color);
        current_y += BODY_LINE_HEIGHT;
    }

    current_y + 5.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unicode_width_categories() {
        let em = 16.0;
        assert_eq!(unicode_char_width('\u{E9}', em), em * 0.55); // é
        assert_eq!(unicode_char_width('\u{153}', em), em * 0.58); // œ
        assert_eq!(unicode_char_width('\u{2014}', em), em * 0.5); // em dash
        assert_eq!(unicode_char_width('\u{201C}', em), em * 0.3);
        assert_eq!(unicode_char_width('\u{2026}', em), em * 0.8);
        assert_eq!(unicode_char_width('\u{AB}', em), em * 0.45);
        assert_eq!(unicode_char_width('\u{2022}', em), em * 0.4);
        assert_eq!(unicode_char_width('\u{4E2D}', em), em * 0.6);
    }
}
