use std::path::Path;

use anyhow::{Context, Result};
use printpdf::path::{PaintMode, WindingOrder};
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Point, Polygon, Rgb,
};

use crate::models::DatasetScore;

const PAGE_W: f32 = 210.0;
const PAGE_H: f32 = 297.0;
const MARGIN: f32 = 18.0;
const T_END: f32 = PAGE_W - MARGIN;
const COVER_HDR_H: f32 = 72.0;

type Rgb3 = (f32, f32, f32);

// ── Palette ───────────────────────────────────────────────────────────────────
const BG:           Rgb3 = (1.00, 1.00, 1.00);
const PANEL_ALT:    Rgb3 = (0.95, 0.96, 0.99);
const PANEL_BORDER: Rgb3 = (0.85, 0.87, 0.92);
const ACCENT_TEAL:  Rgb3 = (0.05, 0.55, 0.55);
const ACCENT_GOLD:  Rgb3 = (0.93, 0.66, 0.05);
const TEXT_PRI:     Rgb3 = (0.07, 0.08, 0.14);
const TEXT_SEC:     Rgb3 = (0.36, 0.40, 0.52);
const TEXT_MUT:     Rgb3 = (0.58, 0.63, 0.72);
const WHITE:        Rgb3 = (1.00, 1.00, 1.00);
const WHITE_DIM:    Rgb3 = (0.86, 0.95, 0.95);
const STAR_ON:      Rgb3 = (0.96, 0.71, 0.00);
const STAR_OFF:     Rgb3 = (0.85, 0.87, 0.92);
const CLOSED_FG:    Rgb3 = (0.76, 0.09, 0.13);
const OPEN_FG:      Rgb3 = (0.07, 0.52, 0.22);

const R_BADGE: f32 = 1.5;

/// What each rung of the scale means, highest first.
const SCALE: [(u8, &str); 6] = [
    (5, "Linked data: formats such as RDF or Turtle that link to other data."),
    (4, "Data that uses URIs to denote things, so others can point at it."),
    (3, "Machine-readable data in an open, non-proprietary format."),
    (2, "Machine-readable data, but in a proprietary format."),
    (1, "Openly licensed, but no resource is in a recognised data format."),
    (0, "The license is not in the list of open licenses."),
];

// ── Public entry point ────────────────────────────────────────────────────────

/// Render a PDF report: cover page → star distribution → full dataset table.
pub fn render(scores: &[DatasetScore], source: &str, output_path: &Path) -> Result<()> {
    let doc = PdfDocument::empty("Dataset Openness Report");

    add_cover_page(&doc, scores, source)?;
    add_distribution_page(&doc, scores)?;
    add_table_pages(&doc, scores)?;

    let bytes = doc.save_to_bytes()?;
    std::fs::write(output_path, &bytes)
        .with_context(|| format!("Failed to write PDF to {}", output_path.display()))?;

    println!("PDF report written to: {}", output_path.display());
    Ok(())
}

// ── Cover page ────────────────────────────────────────────────────────────────

fn add_cover_page(doc: &PdfDocumentReference, scores: &[DatasetScore], source: &str) -> Result<()> {
    let (page_idx, layer_idx) = doc.add_page(Mm(PAGE_W), Mm(PAGE_H), "Cover");
    let layer = doc.get_page(page_idx).get_layer(layer_idx);

    let font_b = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;
    let font_r = doc.add_builtin_font(BuiltinFont::Helvetica)?;

    let counts = super::count_by_score(scores);
    let closed = counts[0];
    let open = scores.len() - closed;

    fill_rect(&layer, 0.0, 0.0, PAGE_W, PAGE_H, BG);
    let hdr_bot = PAGE_H - COVER_HDR_H;
    fill_gradient_h(&layer, 0.0, hdr_bot, PAGE_W, COVER_HDR_H, ACCENT_TEAL, ACCENT_GOLD, 28);

    set_color(&layer, WHITE_DIM);
    layer.use_text(
        format!("openness-stars v{}", env!("CARGO_PKG_VERSION")),
        7.5, Mm(PAGE_W - MARGIN - 44.0), Mm(PAGE_H - 10.5), &font_r,
    );
    set_color(&layer, WHITE);
    layer.use_text("Dataset Openness", 28.0, Mm(MARGIN), Mm(PAGE_H - 26.0), &font_b);
    set_color(&layer, WHITE_DIM);
    layer.use_text("Report", 28.0, Mm(MARGIN), Mm(PAGE_H - 41.0), &font_b);

    // Source chip
    let chip_y = hdr_bot - 18.0;
    let chip_h = 12.0f32;
    let chip_w = 120.0f32;
    fill_rounded_rect(&layer, MARGIN, chip_y, chip_w, chip_h, R_BADGE, BG);
    stroke_rounded_rect(&layer, MARGIN, chip_y, chip_w, chip_h, R_BADGE, PANEL_BORDER);
    fill_rect(&layer, MARGIN, chip_y, 2.5, chip_h, ACCENT_TEAL);
    set_color(&layer, TEXT_MUT);
    layer.use_text("SOURCE", 6.0, Mm(MARGIN + 5.0), Mm(chip_y + chip_h - 3.8), &font_b);
    set_color(&layer, TEXT_PRI);
    layer.use_text(truncate(source, 44), 9.5, Mm(MARGIN + 5.0), Mm(chip_y + 2.8), &font_b);

    set_color(&layer, TEXT_SEC);
    layer.use_text(format!("Scored  {}", today()), 9.0, Mm(MARGIN), Mm(chip_y - 8.0), &font_r);

    let rule_y = chip_y - 16.5;
    draw_hline(&layer, MARGIN, T_END, rule_y, PANEL_BORDER);
    set_color(&layer, TEXT_MUT);
    layer.use_text("OVERVIEW", 6.5, Mm(MARGIN), Mm(rule_y - 7.0), &font_b);

    let card_y = rule_y - 42.0;
    let card_h = 26.0f32;
    let gap = 4.0f32;
    let card_w = (T_END - MARGIN - gap * 3.0) / 4.0;
    let cards: [(&str, String, Rgb3); 4] = [
        ("DATASETS", scores.len().to_string(), ACCENT_TEAL),
        ("OPEN", open.to_string(), OPEN_FG),
        ("CLOSED", closed.to_string(), CLOSED_FG),
        ("AVERAGE STARS", format!("{:.1}", super::average_score(scores)), ACCENT_GOLD),
    ];
    for (i, (label, value, accent)) in cards.iter().enumerate() {
        let cx = MARGIN + (card_w + gap) * i as f32;
        draw_stat_card(&layer, cx, card_y, card_w, card_h, label, value, *accent, &font_r, &font_b);
    }

    let section_y = card_y - 13.0;
    draw_hline(&layer, MARGIN, T_END, section_y, PANEL_BORDER);
    set_color(&layer, TEXT_MUT);
    layer.use_text("WHAT'S IN THIS REPORT", 6.5, Mm(MARGIN), Mm(section_y - 7.5), &font_b);
    let items = [
        ("Star Distribution", "Datasets grouped by openness score, 5 stars down to 0"),
        ("All Datasets", "License, resource formats and score for every dataset"),
    ];
    for (j, (title, desc)) in items.iter().enumerate() {
        let iy = section_y - 15.0 - j as f32 * 10.0;
        fill_rounded_rect(&layer, MARGIN, iy + 2.0, 2.0, 2.0, 1.0, ACCENT_TEAL);
        set_color(&layer, TEXT_PRI);
        layer.use_text(*title, 8.5, Mm(MARGIN + 5.0), Mm(iy + 2.0), &font_b);
        set_color(&layer, TEXT_SEC);
        layer.use_text(*desc, 8.0, Mm(MARGIN + 5.0), Mm(iy - 3.5), &font_r);
    }

    draw_footer(&layer, &font_r);
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn draw_stat_card(
    layer: &PdfLayerReference,
    x: f32, y: f32, w: f32, h: f32,
    label: &str,
    value: &str,
    accent: Rgb3,
    font_r: &IndirectFontRef,
    font_b: &IndirectFontRef,
) {
    fill_rounded_rect(layer, x, y, w, h, R_BADGE, BG);
    stroke_rounded_rect(layer, x, y, w, h, R_BADGE, PANEL_BORDER);
    fill_rect(layer, x, y + h - 2.0, w, 2.0, accent);

    set_color(layer, accent);
    layer.use_text(value, 20.0, Mm(x + 5.0), Mm(y + h * 0.38), font_b);
    set_color(layer, TEXT_MUT);
    layer.use_text(label, 6.5, Mm(x + 5.0), Mm(y + 3.5), font_r);
}

// ── Star distribution page ────────────────────────────────────────────────────

fn add_distribution_page(doc: &PdfDocumentReference, scores: &[DatasetScore]) -> Result<()> {
    const TABLE_TOP: f32 = 258.0;
    const ROW_H: f32 = 30.0;
    const BAR_X: f32 = MARGIN + 4.0;
    const BAR_MAX_W: f32 = 60.0;
    const DESC_X: f32 = MARGIN + 74.0;
    const NAMES_WRAP: usize = 48;

    let (page_idx, layer_idx) = doc.add_page(Mm(PAGE_W), Mm(PAGE_H), "Distribution");
    let layer = doc.get_page(page_idx).get_layer(layer_idx);

    let font_b = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;
    let font_r = doc.add_builtin_font(BuiltinFont::Helvetica)?;

    fill_rect(&layer, 0.0, 0.0, PAGE_W, PAGE_H, BG);
    fill_gradient_h(&layer, 0.0, PAGE_H - 2.5, PAGE_W, 2.5, ACCENT_TEAL, ACCENT_GOLD, 21);

    set_color(&layer, TEXT_PRI);
    layer.use_text("Star Distribution", 20.0, Mm(MARGIN), Mm(278.5), &font_b);
    set_color(&layer, TEXT_SEC);
    layer.use_text("Datasets grouped by openness score", 9.0, Mm(MARGIN), Mm(271.5), &font_r);
    draw_hline(&layer, MARGIN, T_END, 267.5, PANEL_BORDER);

    let counts = super::count_by_score(scores);
    let max_count = counts.iter().copied().max().unwrap_or(0).max(1);

    for (i, (score, meaning)) in SCALE.iter().enumerate() {
        let y_top = TABLE_TOP - i as f32 * ROW_H;
        let y_bot = y_top - ROW_H;
        if i % 2 == 1 {
            fill_rect(&layer, MARGIN, y_bot, T_END - MARGIN, ROW_H, PANEL_ALT);
        }

        draw_stars(&layer, BAR_X, y_top - 8.0, *score);

        let count = counts[usize::from(*score)];
        let bar_w = BAR_MAX_W * count as f32 / max_count as f32;
        fill_rounded_rect(&layer, BAR_X, y_top - 17.0, BAR_MAX_W, 5.0, R_BADGE, STAR_OFF);
        if count > 0 {
            fill_rounded_rect(&layer, BAR_X, y_top - 17.0, bar_w.max(2.0), 5.0, R_BADGE, ACCENT_TEAL);
        }
        set_color(&layer, TEXT_PRI);
        layer.use_text(
            format!("{} dataset{}", count, if count == 1 { "" } else { "s" }),
            8.0, Mm(BAR_X), Mm(y_top - 24.0), &font_b,
        );

        set_color(&layer, TEXT_SEC);
        layer.use_text(*meaning, 8.0, Mm(DESC_X), Mm(y_top - 7.0), &font_r);

        let names: Vec<String> = scores
            .iter()
            .filter(|s| s.openness.score == *score)
            .map(|s| s.name.clone())
            .collect();
        set_color(&layer, TEXT_MUT);
        for (j, line) in format_name_list(&names, NAMES_WRAP).iter().take(3).enumerate() {
            let ly = y_top - 13.0 - j as f32 * 4.5;
            layer.use_text(line.as_str(), 7.0, Mm(DESC_X), Mm(ly), &font_r);
        }

        draw_hline(&layer, MARGIN, T_END, y_bot, PANEL_BORDER);
    }

    draw_footer(&layer, &font_r);
    Ok(())
}

// ── Full dataset table pages ──────────────────────────────────────────────────

fn add_table_pages(doc: &PdfDocumentReference, scores: &[DatasetScore]) -> Result<()> {
    const BASE_ROW_H: f32 = 7.0;
    const EXTRA_LINE_H: f32 = 3.5;
    const HDR_Y: f32 = 268.5;
    const FIRST_Y: f32 = 259.5;
    const BOT_MARGIN: f32 = 25.0;
    const FORMATS_WRAP: usize = 30;

    let font_b = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;
    let font_r = doc.add_builtin_font(BuiltinFont::Helvetica)?;

    //  DATASET    LICENSE    FORMATS    STARS
    //  18…80      80…110     110…162    162…192  (mm)
    let col_x = [MARGIN, MARGIN + 62.0, MARGIN + 92.0, MARGIN + 144.0];
    let headers = ["DATASET", "LICENSE", "FORMATS", "STARS"];

    let mut cur_y = FIRST_Y;
    let mut layer: Option<PdfLayerReference> = None;
    let mut page_num: u32 = 0;

    for (row_idx, score) in scores.iter().enumerate() {
        let format_lines = wrap_text(&score.formats.join(", "), FORMATS_WRAP);
        let row_h = BASE_ROW_H + format_lines.len().saturating_sub(1) as f32 * EXTRA_LINE_H;

        let current = match layer.take() {
            Some(l) if cur_y - row_h >= BOT_MARGIN => l,
            _ => {
                page_num += 1;
                let (pi, li) = doc.add_page(Mm(PAGE_W), Mm(PAGE_H), "Datasets");
                let l = doc.get_page(pi).get_layer(li);

                fill_rect(&l, 0.0, 0.0, PAGE_W, PAGE_H, BG);
                fill_gradient_h(&l, 0.0, PAGE_H - 2.5, PAGE_W, 2.5, ACCENT_TEAL, ACCENT_GOLD, 21);
                set_color(&l, TEXT_PRI);
                l.use_text("All Datasets", 14.0, Mm(MARGIN), Mm(282.5), &font_b);
                set_color(&l, TEXT_MUT);
                l.use_text(format!("Page {}", page_num), 8.0, Mm(T_END - 14.0), Mm(283.0), &font_r);
                draw_hline(&l, MARGIN, T_END, 277.5, PANEL_BORDER);

                fill_rounded_rect(&l, MARGIN, HDR_Y - 7.5, T_END - MARGIN, 9.5, R_BADGE, BG);
                stroke_rounded_rect(&l, MARGIN, HDR_Y - 7.5, T_END - MARGIN, 9.5, R_BADGE, PANEL_BORDER);
                set_color(&l, TEXT_MUT);
                for (i, h) in headers.iter().enumerate() {
                    l.use_text(*h, 7.0, Mm(col_x[i] + 1.5), Mm(HDR_Y - 4.0), &font_b);
                }

                draw_footer(&l, &font_r);
                cur_y = FIRST_Y;
                l
            }
        };

        if row_idx % 2 == 0 {
            fill_rect(&current, MARGIN, cur_y - row_h + 1.5, T_END - MARGIN, row_h, PANEL_ALT);
        }

        let text_y = cur_y - 4.0;
        set_color(&current, TEXT_PRI);
        current.use_text(truncate(&score.name, 36), 8.0, Mm(col_x[0] + 1.5), Mm(text_y), &font_r);
        set_color(&current, TEXT_SEC);
        current.use_text(truncate(score.license_label(), 16), 8.0, Mm(col_x[1] + 1.5), Mm(text_y), &font_r);
        for (j, line) in format_lines.iter().enumerate() {
            let line_y = text_y - j as f32 * EXTRA_LINE_H;
            current.use_text(line.as_str(), 8.0, Mm(col_x[2] + 1.5), Mm(line_y), &font_r);
        }
        draw_stars(&current, col_x[3] + 1.5, text_y - 0.5, score.openness.score);

        draw_hline(&current, MARGIN, T_END, cur_y - row_h + 1.5, PANEL_BORDER);
        cur_y -= row_h;
        layer = Some(current);
    }

    Ok(())
}

// ── Drawing helpers ───────────────────────────────────────────────────────────

fn rgb((r, g, b): Rgb3) -> Color {
    Color::Rgb(Rgb { r, g, b, icc_profile: None })
}

fn set_color(layer: &PdfLayerReference, color: Rgb3) {
    layer.set_fill_color(rgb(color));
}

fn draw_footer(layer: &PdfLayerReference, font_r: &IndirectFontRef) {
    draw_hline(layer, MARGIN, T_END, 22.0, PANEL_BORDER);
    set_color(layer, TEXT_MUT);
    layer.use_text(
        format!("Generated by openness-stars v{}", env!("CARGO_PKG_VERSION")),
        7.5, Mm(MARGIN), Mm(15.0), font_r,
    );
    layer.use_text(today(), 7.5, Mm(T_END - 22.0), Mm(15.0), font_r);
}

/// Five small squares, the first `score` of them filled.
fn draw_stars(layer: &PdfLayerReference, x: f32, y: f32, score: u8) {
    const SIZE: f32 = 3.2;
    const GAP: f32 = 1.2;
    for i in 0..5u8 {
        let color = if i < score { STAR_ON } else { STAR_OFF };
        let sx = x + f32::from(i) * (SIZE + GAP);
        fill_rounded_rect(layer, sx, y, SIZE, SIZE, 0.8, color);
    }
}

fn fill_polygon(layer: &PdfLayerReference, ring: Vec<(Point, bool)>, color: Rgb3, mode: PaintMode) {
    match mode {
        PaintMode::Stroke => {
            layer.set_outline_color(rgb(color));
            layer.set_outline_thickness(0.4);
        }
        _ => layer.set_fill_color(rgb(color)),
    }
    layer.add_polygon(Polygon {
        rings: vec![ring],
        mode,
        winding_order: WindingOrder::NonZero,
    });
    layer.set_fill_color(rgb((0.0, 0.0, 0.0)));
    layer.set_outline_color(rgb((0.0, 0.0, 0.0)));
    layer.set_outline_thickness(1.0);
}

fn fill_rect(layer: &PdfLayerReference, x: f32, y: f32, w: f32, h: f32, color: Rgb3) {
    let ring = vec![
        (Point::new(Mm(x), Mm(y)), false),
        (Point::new(Mm(x + w), Mm(y)), false),
        (Point::new(Mm(x + w), Mm(y + h)), false),
        (Point::new(Mm(x), Mm(y + h)), false),
    ];
    fill_polygon(layer, ring, color, PaintMode::Fill);
}

/// Clockwise ring approximating a rounded rectangle, 8 segments per corner.
fn rounded_rect_ring(x: f32, y: f32, w: f32, h: f32, r: f32) -> Vec<(Point, bool)> {
    const SEGS: usize = 8;
    let r = r.min(w / 2.0).min(h / 2.0);
    let corners = [
        (x + w - r, y + r, 270.0f32, 360.0f32),
        (x + w - r, y + h - r, 0.0, 90.0),
        (x + r, y + h - r, 90.0, 180.0),
        (x + r, y + r, 180.0, 270.0),
    ];

    let mut pts = Vec::with_capacity(4 * (SEGS + 1));
    for (cx, cy, start, end) in corners {
        for i in 0..=SEGS {
            let angle = (start + (end - start) * i as f32 / SEGS as f32).to_radians();
            pts.push((Point::new(Mm(cx + r * angle.cos()), Mm(cy + r * angle.sin())), false));
        }
    }
    pts
}

fn fill_rounded_rect(layer: &PdfLayerReference, x: f32, y: f32, w: f32, h: f32, r: f32, color: Rgb3) {
    fill_polygon(layer, rounded_rect_ring(x, y, w, h, r), color, PaintMode::Fill);
}

fn stroke_rounded_rect(layer: &PdfLayerReference, x: f32, y: f32, w: f32, h: f32, r: f32, color: Rgb3) {
    fill_polygon(layer, rounded_rect_ring(x, y, w, h, r), color, PaintMode::Stroke);
}

fn draw_hline(layer: &PdfLayerReference, x1: f32, x2: f32, y: f32, color: Rgb3) {
    layer.set_outline_color(rgb(color));
    layer.set_outline_thickness(0.3);
    layer.add_line(Line {
        points: vec![
            (Point::new(Mm(x1), Mm(y)), false),
            (Point::new(Mm(x2), Mm(y)), false),
        ],
        is_closed: false,
    });
    layer.set_outline_color(rgb((0.0, 0.0, 0.0)));
    layer.set_outline_thickness(1.0);
}

/// Left-to-right gradient made of `steps` vertical strips.
#[allow(clippy::too_many_arguments)]
fn fill_gradient_h(
    layer: &PdfLayerReference,
    x: f32, y: f32, w: f32, h: f32,
    from: Rgb3,
    to: Rgb3,
    steps: usize,
) {
    let step_w = w / steps as f32;
    for i in 0..steps {
        let t = i as f32 / (steps - 1).max(1) as f32;
        let color = (
            from.0 + (to.0 - from.0) * t,
            from.1 + (to.1 - from.1) * t,
            from.2 + (to.2 - from.2) * t,
        );
        // Strips overlap slightly so rounding leaves no gaps.
        fill_rect(layer, x + i as f32 * step_w, y, step_w + 0.6, h, color);
    }
}

// ── Text helpers ──────────────────────────────────────────────────────────────

fn truncate(s: &str, max: usize) -> String {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() > max {
        format!("{}…", chars[..max - 1].iter().collect::<String>())
    } else {
        s.to_string()
    }
}

fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if !current.is_empty() && current.len() + 1 + word.len() > max_chars {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

/// Comma-separated names wrapped to `max_chars`, or a dash when empty.
fn format_name_list(names: &[String], max_chars: usize) -> Vec<String> {
    if names.is_empty() {
        return vec!["—".to_string()];
    }
    wrap_text(&names.join(", "), max_chars)
}

// ── Date helper ───────────────────────────────────────────────────────────────

fn today() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}
