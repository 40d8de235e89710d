// src/render/table.rs

//! Table layout in three phases: structure parsing, two-pass column sizing
//! and painting. Rows come from `thead`/`tbody` sections or direct `tr`
//! children; section elements never render on their own.

use crate::dom::Node;
use crate::fonts::FontHandle;
use crate::geometry::{Color, Rect};
use crate::render::context::{Frame, RenderContext, RenderResult};
use crate::render::text::draw_text_unicode;
use crate::render::RenderHandler;

const CELL_PADDING: f32 = 12.0;
const MIN_CELL_WIDTH: f32 = 50.0;
const PREF_CELL_WIDTH: f32 = 100.0;
const MIN_CELL_HEIGHT: f32 = 30.0;
const BORDER_WIDTH: f32 = 1.0;

struct CellData<'a> {
    node: &'a Node,
    is_header: bool,
    min_width: f32,
    pref_width: f32,
    width: f32,
}

struct RowData<'a> {
    cells: Vec<CellData<'a>>,
}

struct TableLayout<'a> {
    rows: Vec<RowData<'a>>,
    column_count: usize,
    column_widths: Vec<f32>,
    row_heights: Vec<f32>,
    total_width: f32,
    total_height: f32,
}

pub struct TableHandler;

impl RenderHandler for TableHandler {
    fn can_render(&self, node: &Node) -> bool {
        matches!(
            node.tag.as_str(),
            "table" | "thead" | "tbody" | "tr" | "th" | "td"
        )
    }

    fn render(&self, node: &Node, ctx: RenderContext, frame: &mut Frame<'_>) -> RenderResult {
        // Sections and cells are consumed by the table pass; on their own
        // they occupy no space.
        if node.tag != "table" {
            return RenderResult::at(ctx.y);
        }

        let mut table = parse_structure(node);
        if table.rows.is_empty() {
            return RenderResult::at(ctx.y);
        }

        measure_cells(&mut table, frame);
        size_columns(&mut table, ctx, frame);
        size_rows(&mut table, frame);
        paint(&table, ctx, frame)
    }
}

// Phase 1: structure.

fn parse_structure(node: &Node) -> TableLayout<'_> {
    let mut rows = Vec::new();

    for child in &node.children {
        match child.tag.as_str() {
            "thead" => collect_section_rows(child, true, &mut rows),
            "tbody" => collect_section_rows(child, false, &mut rows),
            "tr" => rows.push(parse_row(child, false)),
            _ => {}
        }
    }

    let column_count = rows.iter().map(|r| r.cells.len()).max().unwrap_or(0);
    let row_count = rows.len();

    TableLayout {
        rows,
        column_count,
        column_widths: vec![0.0; column_count],
        row_heights: vec![0.0; row_count],
        total_width: 0.0,
        total_height: 0.0,
    }
}

fn collect_section_rows<'a>(section: &'a Node, is_header: bool, rows: &mut Vec<RowData<'a>>) {
    for child in &section.children {
        if child.tag == "tr" {
            rows.push(parse_row(child, is_header));
        }
    }
}

fn parse_row(tr: &Node, section_is_header: bool) -> RowData<'_> {
    let mut cells = Vec::new();
    for child in &tr.children {
        if child.tag == "th" || child.tag == "td" {
            // colspan/rowspan attributes are read as 1.
            cells.push(CellData {
                node: child,
                is_header: child.tag == "th" || section_is_header,
                min_width: 0.0,
                pref_width: 0.0,
                width: 0.0,
            });
        }
    }
    RowData { cells }
}

// Phase 2: sizing.

fn cell_font(cell: &CellData<'_>, frame: &Frame<'_>) -> FontHandle {
    if cell.is_header {
        frame.fonts.bold
    } else {
        frame.fonts.regular
    }
}

fn measure_cells(table: &mut TableLayout<'_>, frame: &mut Frame<'_>) {
    for row in &mut table.rows {
        for cell in &mut row.cells {
            let text = cell.node.deep_text();
            if text.is_empty() {
                cell.min_width = MIN_CELL_WIDTH;
                cell.pref_width = PREF_CELL_WIDTH;
                continue;
            }

            let font = if cell.is_header {
                frame.fonts.bold
            } else {
                frame.fonts.regular
            };
            let font_size = font.size_or(16.0);
            let text_size = frame.measure(font, font_size, &text);

            cell.min_width = text_size.width + 2.0 * CELL_PADDING;
            cell.pref_width = cell.min_width;

            // Long content prefers wrapping to roughly three words per line.
            if text.chars().count() > 20 {
                let word_count = text.split_whitespace().count();
                if word_count > 3 {
                    let avg_word_width = text_size.width / word_count as f32;
                    cell.pref_width =
                        (avg_word_width * 3.0 + 2.0 * CELL_PADDING).max(cell.min_width);
                }
            }
        }
    }
}

fn size_columns(table: &mut TableLayout<'_>, ctx: RenderContext, frame: &Frame<'_>) {
    if table.column_count == 0 {
        return;
    }

    let total_border = (table.column_count + 1) as f32 * BORDER_WIDTH;
    let available = ctx.width - frame.chrome.right_margin() - total_border;

    let mut min_widths = vec![0.0f32; table.column_count];
    let mut pref_widths = vec![0.0f32; table.column_count];
    for row in &table.rows {
        for (i, cell) in row.cells.iter().enumerate().take(table.column_count) {
            min_widths[i] = min_widths[i].max(cell.min_width);
            pref_widths[i] = pref_widths[i].max(cell.pref_width);
        }
    }

    let total_min: f32 = min_widths.iter().sum();
    let total_pref: f32 = pref_widths.iter().sum();

    if total_pref <= available {
        table.column_widths.copy_from_slice(&pref_widths);
        let extra = available - total_pref;
        if extra > 0.0 && total_pref > 0.0 {
            for (width, pref) in table.column_widths.iter_mut().zip(&pref_widths) {
                *width += extra * (pref / total_pref);
            }
        }
    } else if total_min <= available {
        let extra = available - total_min;
        for i in 0..table.column_count {
            table.column_widths[i] = min_widths[i];
            if total_pref > total_min {
                let share = (pref_widths[i] - min_widths[i]) / (total_pref - total_min);
                table.column_widths[i] += extra * share;
            }
        }
    } else {
        let equal = available / table.column_count as f32;
        table.column_widths.fill(equal);
    }

    table.total_width = available + total_border;
}

fn size_rows(table: &mut TableLayout<'_>, frame: &mut Frame<'_>) {
    table.total_height = 0.0;
    for (row_idx, row) in table.rows.iter_mut().enumerate() {
        let mut max_height = 0.0f32;

        for (i, cell) in row.cells.iter_mut().enumerate().take(table.column_widths.len()) {
            cell.width = table.column_widths[i];
            let height = cell_height(cell, frame);
            max_height = max_height.max(height);
        }

        table.row_heights[row_idx] = max_height;
        table.total_height += max_height;
    }

    table.total_height += (table.rows.len() + 1) as f32 * BORDER_WIDTH;
}

fn cell_height(cell: &CellData<'_>, frame: &mut Frame<'_>) -> f32 {
    let text = cell.node.deep_text();
    if text.is_empty() {
        return MIN_CELL_HEIGHT;
    }

    let font = cell_font(cell, frame);
    let font_size = font.size_or(16.0);
    let line_height = font_size * 1.2;

    let mut content_width = cell.width - 2.0 * CELL_PADDING;
    if content_width <= 0.0 {
        content_width = PREF_CELL_WIDTH;
    }

    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() {
        return line_height + 2.0 * CELL_PADDING;
    }

    let mut line_width = 0.0f32;
    let mut line_count = 1;
    for word in words {
        let word_width = frame.measure_width(font, font_size, &format!("{word} "));
        if line_width + word_width > content_width && line_width > 0.0 {
            line_count += 1;
            line_width = word_width;
        } else {
            line_width += word_width;
        }
    }

    line_count as f32 * line_height + 2.0 * CELL_PADDING
}

// Phase 3: paint.

fn paint(table: &TableLayout<'_>, ctx: RenderContext, frame: &mut Frame<'_>) -> RenderResult {
    let mut current_y = ctx.y + 10.0;

    let table_rect = Rect::new(ctx.x, current_y, table.total_width, table.total_height);
    frame.painter.fill_rect(table_rect, Color::WHITE);
    frame.painter.stroke_rect(table_rect, 1.0, Color::BORDER_LIGHT);

    for (row_idx, row) in table.rows.iter().enumerate() {
        paint_row(table, row, row_idx, ctx.x, current_y, frame);
        current_y += table.row_heights[row_idx] + BORDER_WIDTH;
    }

    let next_y = current_y + 10.0;
    RenderResult {
        next_y,
        height: next_y - ctx.y,
        ..Default::default()
    }
}

fn paint_row(
    table: &TableLayout<'_>,
    row: &RowData<'_>,
    row_idx: usize,
    start_x: f32,
    start_y: f32,
    frame: &mut Frame<'_>,
) {
    let mut current_x = start_x + BORDER_WIDTH;
    let row_height = table.row_heights[row_idx];

    for (i, cell) in row.cells.iter().enumerate().take(table.column_count) {
        let cell_width = table.column_widths[i];
        let cell_rect = Rect::new(current_x, start_y + BORDER_WIDTH, cell_width, row_height);

        if cell.is_header {
            frame
                .painter
                .fill_rect(cell_rect, Color::TABLE_HEADER_BACKGROUND);
        }
        frame.painter.stroke_rect(cell_rect, 1.0, Color::CODE_BORDER);

        paint_cell_text(cell, current_x, start_y + BORDER_WIDTH, frame);

        current_x += cell_width + BORDER_WIDTH;
    }
}

fn paint_cell_text(cell: &CellData<'_>, x: f32, y: f32, frame: &mut Frame<'_>) {
    let text = cell.node.deep_text();
    if text.is_empty() {
        return;
    }

    let font = cell_font(cell, frame);
    let color = if cell.is_header {
        Color::TABLE_HEADER_TEXT
    } else {
        Color::BLACK
    };
    let font_size = font.size_or(16.0);
    let line_height = font_size * 1.2;

    let content_x = x + CELL_PADDING;
    let content_width = cell.width - 2.0 * CELL_PADDING;
    let mut current_y = y + CELL_PADDING;

    let mut current_line = String::new();
    for word in text.split_whitespace() {
        let mut test_line = current_line.clone();
        if !test_line.is_empty() {
            test_line.push(' ');
        }
        test_line.push_str(word);

        let line_width = frame.measure_width(font, font_size, &test_line);
        if line_width > content_width && !current_line.is_empty() {
            draw_text_unicode(frame, &current_line, content_x, current_y, font, color);
            current_y += line_height;
            current_line = word.to_string();
        } else {
            current_line = test_line;
        }
    }

    if !current_line.is_empty() {
        draw_text_unicode(frame, &current_line, content_x, current_y, font, color);
    }
}
