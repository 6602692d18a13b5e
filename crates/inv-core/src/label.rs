//! Printable QR labels rendered as SVG.
//!
//! A single label is the code with its `ИНН:` caption underneath. A sheet
//! lays labels out on A4 pages in a 3 x 4 grid, captioned with the item name
//! and inventory number.

use std::fmt::Write as _;

use qrcode::{Color, QrCode};

use crate::errors::CoreError;
use crate::qr::INN_LABEL;
use crate::responses::EquipmentLabel;

/// Modules of blank margin around the code.
const QUIET_ZONE: usize = 4;
/// Pixels per module for standalone labels.
const MODULE_PX: usize = 4;
/// Caption band under a standalone label, in modules.
const CAPTION_MODULES: usize = 6;

const PAGE_W_MM: f64 = 210.0;
const PAGE_H_MM: f64 = 297.0;
const COLUMNS: usize = 3;
const ROWS: usize = 4;
/// Labels per sheet page.
pub const LABELS_PER_PAGE: usize = COLUMNS * ROWS;
const MARGIN_MM: f64 = 15.0;
const CODE_MM: f64 = 50.0;
const NAME_MAX_CHARS: usize = 28;

/// Dark modules of an encoded payload as one SVG path, in module units with
/// the quiet zone included.
struct Symbol {
    side: usize,
    path: String,
}

fn encode(payload: &str) -> Result<Symbol, CoreError> {
    let code = QrCode::new(payload.as_bytes())
        .map_err(|e| CoreError::Validation(format!("cannot encode QR payload: {e}")))?;
    let width = code.width();
    let mut path = String::new();
    for (i, color) in code.to_colors().into_iter().enumerate() {
        if color == Color::Dark {
            let x = i % width + QUIET_ZONE;
            let y = i / width + QUIET_ZONE;
            let _ = write!(path, "M{x} {y}h1v1h-1z");
        }
    }
    Ok(Symbol {
        side: width + 2 * QUIET_ZONE,
        path,
    })
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

fn shorten(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

/// Render one label: the code for `payload` with `ИНН: {inn}` centred
/// beneath it.
///
/// # Errors
///
/// Returns `CoreError::Validation` if the payload does not fit in a QR code.
pub fn label_svg(payload: &str, inn: i64) -> Result<String, CoreError> {
    let symbol = encode(payload)?;
    let side = symbol.side;
    let height = side + CAPTION_MODULES;
    Ok(format!(
        concat!(
            r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {side} {height}" "##,
            r##"width="{wpx}" height="{hpx}" shape-rendering="crispEdges">"##,
            r##"<rect width="{side}" height="{height}" fill="#fff"/>"##,
            r##"<path d="{path}" fill="#000"/>"##,
            r##"<text x="{cx}" y="{ty}" font-family="DejaVu Sans, sans-serif" font-size="3" "##,
            r##"text-anchor="middle">{label} {inn}</text></svg>"##,
        ),
        side = side,
        height = height,
        wpx = side * MODULE_PX,
        hpx = height * MODULE_PX,
        path = symbol.path,
        cx = side / 2,
        ty = side + 2,
        label = INN_LABEL,
        inn = inn,
    ))
}

/// Render labels onto A4 sheet pages, [`LABELS_PER_PAGE`] per page, in the
/// given order. An empty slice yields no pages.
///
/// # Errors
///
/// Returns `CoreError::Validation` if a payload does not fit in a QR code.
#[allow(clippy::cast_precision_loss)]
pub fn sheet_svgs(labels: &[EquipmentLabel]) -> Result<Vec<String>, CoreError> {
    let cell_w = (PAGE_W_MM - 2.0 * MARGIN_MM) / COLUMNS as f64;
    let cell_h = (PAGE_H_MM - 2.0 * MARGIN_MM) / ROWS as f64;

    labels
        .chunks(LABELS_PER_PAGE)
        .map(|page| {
            let mut body = String::new();
            for (slot, label) in page.iter().enumerate() {
                let symbol = encode(&label.payload)?;
                let x = MARGIN_MM + (slot % COLUMNS) as f64 * cell_w + (cell_w - CODE_MM) / 2.0;
                let y = MARGIN_MM + (slot / COLUMNS) as f64 * cell_h;
                let scale = CODE_MM / symbol.side as f64;
                let cx = x + CODE_MM / 2.0;
                let _ = write!(
                    body,
                    concat!(
                        r##"<g transform="translate({x:.2} {y:.2}) scale({scale:.4})">"##,
                        r##"<path d="{path}" fill="#000"/></g>"##,
                        r##"<text x="{cx:.2}" y="{name_y:.2}" font-size="3.5" text-anchor="middle">{name}</text>"##,
                        r##"<text x="{cx:.2}" y="{inn_y:.2}" font-size="3.5" text-anchor="middle">{inn_label} {inn}</text>"##,
                    ),
                    x = x,
                    y = y,
                    scale = scale,
                    path = symbol.path,
                    cx = cx,
                    name_y = y + CODE_MM + 5.0,
                    name = escape_xml(&shorten(&label.name, NAME_MAX_CHARS)),
                    inn_y = y + CODE_MM + 10.0,
                    inn_label = INN_LABEL,
                    inn = label.inn,
                );
            }
            Ok(format!(
                concat!(
                    r##"<svg xmlns="http://www.w3.org/2000/svg" width="{w}mm" height="{h}mm" "##,
                    r##"viewBox="0 0 {w} {h}" font-family="DejaVu Sans, sans-serif" shape-rendering="crispEdges">"##,
                    r##"<rect width="{w}" height="{h}" fill="#fff"/>{body}</svg>"##,
                ),
                w = PAGE_W_MM,
                h = PAGE_H_MM,
                body = body,
            ))
        })
        .collect()
}
