//! Handler-level layout assertions driven through the widget facade with a
//! recording painter.

mod common;

use common::{init_logging, DrawCall, RecordingPainter, StubFontLoader};
use placard::{Color, HtmlWidget};
use std::sync::Arc;

fn widget(content: &str) -> HtmlWidget {
    HtmlWidget::new(content, Arc::new(StubFontLoader::new()))
}

// Widget defaults put the content origin at margin + padding = 25 from the
// widget corner; handlers keep another 25 clear on the right.
const CONTENT_INSET: f32 = 25.0;

#[test]
fn test_heading_font_size_and_spacing() {
    init_logging();
    let mut w = widget("<h1>Title</h1>");
    let mut painter = RecordingPainter::new();
    w.render(&mut painter, 0.0, 0.0, 800.0, 600.0);

    let texts = painter.texts_containing("Title");
    assert_eq!(texts.len(), 1);
    let (_, origin, font, color) = texts[0];
    assert_eq!(font.base_size, 32.0, "h1 must use the 32pt font");
    assert_eq!(color, Color::DARK_BLUE);
    // content origin (25) + h1 spacing-before (25)
    assert_eq!(origin.y, 50.0);
    assert_eq!(origin.x, CONTENT_INSET);
}

#[test]
fn test_heading_levels_scale_down() {
    init_logging();
    let mut w = widget("<h2>Two</h2><h6>Six</h6>");
    let mut painter = RecordingPainter::new();
    w.render(&mut painter, 0.0, 0.0, 800.0, 600.0);

    let two = painter.texts_containing("Two")[0];
    let six = painter.texts_containing("Six")[0];
    assert_eq!(two.2.base_size, 28.0);
    assert_eq!(six.2.base_size, 16.0);
    assert!(six.1.y > two.1.y);
}

#[test]
fn test_list_draws_bullets_and_bold_item_font() {
    init_logging();
    let mut w = widget("<ul><li>First item</li><li>Second with <b>bold</b></li></ul>");
    let mut painter = RecordingPainter::new();
    w.render(&mut painter, 0.0, 0.0, 800.0, 600.0);

    let bullets = painter.texts_containing("\u{2022}");
    assert_eq!(bullets.len(), 2, "one bullet per list item");
    // Items indent 25 from the content origin; bullets sit 15 left of that.
    assert_eq!(bullets[0].1.x, CONTENT_INSET + 25.0 - 15.0);
    assert!(bullets[1].1.y > bullets[0].1.y);

    let regular_font = painter.texts_containing("Second")[0].2;
    let bold = painter.texts_containing("bold")[0];
    assert_ne!(
        bold.2.id, regular_font.id,
        "bold run must use a different font handle"
    );
    assert_eq!(bold.3, Color::DARK_BLUE);
}

#[test]
fn test_ordered_list_numbers_items() {
    init_logging();
    let mut w = widget("<ol><li>alpha</li><li>beta</li><li>gamma</li></ol>");
    let mut painter = RecordingPainter::new();
    w.render(&mut painter, 0.0, 0.0, 800.0, 600.0);

    assert_eq!(painter.texts_containing("1.").len(), 1);
    assert_eq!(painter.texts_containing("2.").len(), 1);
    assert_eq!(painter.texts_containing("3.").len(), 1);
    // Ordinal markers sit 20 left of the item content.
    assert_eq!(
        painter.texts_containing("1.")[0].1.x,
        CONTENT_INSET + 25.0 - 20.0
    );
}

#[test]
fn test_list_nested_inside_item_flows_inline() {
    init_logging();
    let mut w = widget("<ul><li>outer</li><li><ul><li>inner</li></ul></li></ul>");
    let mut painter = RecordingPainter::new();
    w.render(&mut painter, 0.0, 0.0, 800.0, 600.0);

    // A list inside a list item is inline context all the way down, so its
    // text joins the item's flow instead of vanishing.
    let outer = painter.texts_containing("outer")[0];
    let inner = painter.texts_containing("inner")[0];
    assert!(inner.1.y > outer.1.y);
}

#[test]
fn test_hr_draws_gray_rule_with_gaps() {
    init_logging();
    let mut w = widget("<hr/>");
    let mut painter = RecordingPainter::new();
    w.render(&mut painter, 0.0, 0.0, 800.0, 600.0);

    let rule = painter
        .calls
        .iter()
        .find_map(|c| match c {
            DrawCall::Line {
                from,
                to,
                thickness,
                color,
            } => Some((*from, *to, *thickness, *color)),
            _ => None,
        })
        .expect("hr must draw a line");

    assert_eq!(rule.2, 2.0);
    assert_eq!(rule.3, Color::GRAY);
    // 10 above the cursor; spans the content width minus the right margin.
    assert_eq!(rule.0.y, CONTENT_INSET + 10.0);
    assert_eq!(rule.1.x - rule.0.x, 750.0 - 25.0);
}

#[test]
fn test_br_advances_twenty_units() {
    init_logging();
    let mut w = widget("<p>a</p><br/><p>b</p>");
    let mut painter = RecordingPainter::new();
    w.render(&mut painter, 0.0, 0.0, 800.0, 600.0);

    let a = painter.texts_containing("a")[0];
    let b = painter.texts_containing("b")[0];
    // paragraph: one line (20) + gap (5); br adds 20 more.
    assert_eq!(b.1.y - a.1.y, 45.0);
}

#[test]
fn test_pre_block_geometry_and_monospace() {
    init_logging();
    let mut w = widget("<pre>line one\n  line two</pre>");
    let mut painter = RecordingPainter::new();
    w.render(&mut painter, 0.0, 0.0, 800.0, 600.0);

    let background = painter
        .fill_rects()
        .into_iter()
        .find(|(_, color)| *color == Color::CODE_BACKGROUND)
        .expect("pre must fill a background box");
    // Two lines at 18 plus 12 padding either side.
    assert_eq!(background.0.height, 2.0 * 18.0 + 24.0);
    assert_eq!(background.0.y, CONTENT_INSET + 10.0);

    let first = painter.texts_containing("line one")[0];
    let second = painter.texts_containing("  line two")[0];
    assert_eq!(first.1.x, CONTENT_INSET + 12.0, "12-unit inner padding");
    assert_eq!(second.1.y - first.1.y, 18.0, "mono line height");
    assert_eq!(second.2.id, first.2.id, "both lines share the mono font");
    assert_eq!(first.3, Color::CODE_TEXT);
}

#[test]
fn test_plain_div_falls_back_to_gray_text() {
    init_logging();
    let mut w = widget("<div>content</div>");
    let mut painter = RecordingPainter::new();
    w.render(&mut painter, 0.0, 0.0, 800.0, 600.0);

    let text = painter.texts_containing("content")[0];
    assert_eq!(text.3, Color::GRAY);
}

#[test]
fn test_callout_paints_box_accent_icon_and_body_once() {
    init_logging();
    let mut w = widget("<div class=\"warning\">Watch out</div>");
    let mut painter = RecordingPainter::new();
    w.render(&mut painter, 0.0, 0.0, 800.0, 600.0);

    let fills = painter.fill_rects();
    let background = fills
        .iter()
        .find(|(_, color)| *color == Color::rgb(255, 248, 220))
        .expect("warning background");
    let accent = fills
        .iter()
        .find(|(rect, color)| *color == Color::rgb(255, 193, 7) && rect.width == 4.0)
        .expect("left accent bar");
    assert_eq!(background.0.x, accent.0.x);
    assert_eq!(background.0.height, accent.0.height);
    // One wrapped line (25) plus 15 padding either side.
    assert_eq!(background.0.height, 55.0);

    let icon = painter.texts_containing("\u{26A0}");
    assert_eq!(icon.len(), 1);
    assert_eq!(icon[0].1.x, CONTENT_INSET + 12.0);

    // The measurement pass must not paint: the body appears exactly once.
    assert_eq!(painter.texts_containing("Watch").len(), 1);
    // Body text picks up the callout palette, indented 50 into the box.
    let body = painter.texts_containing("Watch")[0];
    assert_eq!(body.3, Color::rgb(133, 77, 14));
    assert_eq!(body.1.x, CONTENT_INSET + 50.0);
}

#[test]
fn test_callout_kinds_resolve_distinct_palettes() {
    init_logging();
    let mut w = widget(
        "<div class=\"tip\">t</div><div class=\"danger\">d</div><div class=\"info\">i</div>",
    );
    let mut painter = RecordingPainter::new();
    w.render(&mut painter, 0.0, 0.0, 800.0, 600.0);

    let fills = painter.fill_rects();
    assert!(fills.iter().any(|(_, c)| *c == Color::rgb(230, 245, 233))); // tip
    assert!(fills.iter().any(|(_, c)| *c == Color::rgb(253, 237, 237))); // danger
    assert!(fills.iter().any(|(_, c)| *c == Color::rgb(217, 237, 247))); // info
}

#[test]
fn test_definition_list_layout() {
    init_logging();
    let mut w = widget("<dl><dt>Term</dt><dd>Meaning of the term</dd></dl>");
    let mut painter = RecordingPainter::new();
    w.render(&mut painter, 0.0, 0.0, 800.0, 600.0);

    let term = painter.texts_containing("Term")[0];
    assert_eq!(term.3, Color::DARK_BLUE);
    // dl adds a 10-unit top margin.
    assert_eq!(term.1.y, CONTENT_INSET + 10.0);

    let description = painter.texts_containing("Meaning")[0];
    assert_eq!(description.1.x, CONTENT_INSET + 30.0, "dd indents by 30");
    assert!(description.1.y > term.1.y);
}

#[test]
fn test_table_two_pass_sizing_and_header_tint() {
    init_logging();
    let mut w = widget(
        "<table><thead><tr><th>Head</th><th>Col</th></tr></thead>\
         <tbody><tr><td>a</td><td>b</td></tr></tbody></table>",
    );
    let mut painter = RecordingPainter::new();
    w.render(&mut painter, 0.0, 0.0, 800.0, 600.0);

    let fills = painter.fill_rects();
    let header_tints: Vec<_> = fills
        .iter()
        .filter(|(_, c)| *c == Color::TABLE_HEADER_BACKGROUND)
        .collect();
    assert_eq!(header_tints.len(), 2, "both header cells get the tint");

    // The first white fill is the widget background; the table draws its
    // own at available width (750 - 25) plus the three column borders.
    let outer = fills
        .iter()
        .filter(|(_, c)| *c == Color::WHITE)
        .nth(1)
        .expect("outer table fill");
    assert_eq!(outer.0.width, 722.0 + 3.0);

    let head = painter.texts_containing("Head")[0];
    assert_eq!(head.3, Color::TABLE_HEADER_TEXT);
    let body = painter
        .texts()
        .into_iter()
        .find(|(text, ..)| *text == "a")
        .expect("body cell text");
    assert_eq!(body.3, Color::BLACK);
    // Cell text is inset by the 12-unit padding plus the leading border.
    assert_eq!(head.1.x, CONTENT_INSET + 1.0 + 12.0);
}

#[test]
fn test_table_direct_tr_children_count() {
    init_logging();
    let mut w = widget("<table><tr><td>x</td></tr><tr><td>y</td></tr></table>");
    let mut painter = RecordingPainter::new();
    w.render(&mut painter, 0.0, 0.0, 800.0, 600.0);

    let x = painter.texts_containing("x")[0];
    let y = painter.texts_containing("y")[0];
    assert!(y.1.y > x.1.y, "rows stack vertically");
}

#[test]
fn test_word_wrap_hard_breaks_long_token() {
    init_logging();
    let token = "a".repeat(200);
    let mut w = widget(&format!("<p>{token}</p>"));
    let mut painter = RecordingPainter::new();
    w.render(&mut painter, 0.0, 0.0, 400.0, 600.0);

    // content width 350, available 325; each 25-char piece measures 200,
    // so every piece lands on its own line: ceil(200 / 25) = 8 lines.
    let pieces: Vec<_> = painter
        .texts()
        .into_iter()
        .filter(|(text, ..)| text.starts_with('a'))
        .collect();
    assert_eq!(pieces.len(), 8);
    for (text, origin, font, _) in &pieces {
        assert!(text.chars().count() <= 25);
        let width = text.chars().count() as f32 * font.base_size * common::CHAR_WIDTH_FACTOR;
        assert!(
            origin.x + width <= CONTENT_INSET + 350.0,
            "no line may exceed the content width"
        );
    }
    // Consecutive lines advance by exactly one line height.
    for pair in pieces.windows(2) {
        assert_eq!(pair[1].1.y - pair[0].1.y, 20.0);
    }
}

#[test]
fn test_paragraph_single_line_when_it_fits() {
    init_logging();
    let mut w = widget("<p>Hello <b>bold</b> and <i>italic</i> world</p>");
    let mut painter = RecordingPainter::new();
    w.render(&mut painter, 0.0, 0.0, 400.0, 600.0);

    let texts = painter.texts();
    assert!(!texts.is_empty());
    let first_y = texts[0].1.y;
    assert!(
        texts.iter().all(|(_, origin, ..)| origin.y == first_y),
        "all runs must share one baseline"
    );

    let italic = painter.texts_containing("italic")[0];
    assert_eq!(italic.3, Color::DARK_GREEN);
    assert_eq!(w.link_regions().len(), 0);
}

#[test]
fn test_block_context_code_renders_as_box() {
    init_logging();
    let mut w = widget("<code>fn main() {}</code>");
    let mut painter = RecordingPainter::new();
    w.render(&mut painter, 0.0, 0.0, 800.0, 600.0);

    // Top-level code has block context and paints the same box as pre.
    assert!(painter
        .fill_rects()
        .iter()
        .any(|(_, c)| *c == Color::CODE_BACKGROUND));
    assert_eq!(painter.texts_containing("fn main() {}").len(), 1);
}

#[test]
fn test_code_inside_paragraph_joins_the_inline_flow() {
    init_logging();
    let mut w = widget("<p>call <code>f()</code> now</p>");
    let mut painter = RecordingPainter::new();
    w.render(&mut painter, 0.0, 0.0, 800.0, 600.0);

    // Paragraph flattening carries inline code text through the segment
    // flow with the inherited font; everything stays on one line.
    let call = painter.texts_containing("call")[0];
    let code = painter.texts_containing("f()")[0];
    assert_eq!(call.1.y, code.1.y);
    assert_eq!(call.2.id, code.2.id);
}

#[test]
fn test_unicode_text_takes_codepoint_path() {
    init_logging();
    let mut w = widget("<p>caf\u{E9} \u{2014} ok</p>");
    let mut painter = RecordingPainter::new();
    w.render(&mut painter, 0.0, 0.0, 800.0, 600.0);

    let codepoints: Vec<char> = painter
        .calls
        .iter()
        .filter_map(|c| match c {
            DrawCall::Codepoint { codepoint, .. } => Some(*codepoint),
            _ => None,
        })
        .collect();
    assert!(codepoints.contains(&'\u{E9}'));
    assert!(codepoints.contains(&'\u{2014}'));

    // ASCII glyphs of the same run arrive as single-char bulk draws.
    assert!(painter
        .texts()
        .iter()
        .any(|(text, ..)| *text == "c" || *text == "f"));
}
