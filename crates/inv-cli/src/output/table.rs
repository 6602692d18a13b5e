//! Plain-text table layout for `--format table`.
//!
//! Widths are measured in characters, not bytes, so Cyrillic room and
//! equipment names line up with ASCII columns.

/// Narrowest a column is shrunk to when fitting the terminal.
const MIN_COLUMN: usize = 4;
const SEPARATOR: &str = "  ";

#[derive(Clone, Copy, Debug)]
pub struct TableOptions {
    pub max_width: Option<usize>,
    pub color: bool,
}

/// Render an aligned table. Missing cells print as `-`.
#[must_use]
pub fn render_entity_table(
    headers: &[&str],
    rows: &[Vec<String>],
    options: TableOptions,
) -> String {
    let mut widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(index, header)| {
            rows.iter()
                .filter_map(|row| row.get(index))
                .map(|cell| display_width(cell))
                .fold(display_width(header), usize::max)
        })
        .collect();

    if let Some(max_width) = options.max_width {
        shrink_to_fit(&mut widths, headers, max_width);
    }

    let mut lines = Vec::with_capacity(rows.len() + 2);
    let header_line = join_cells(headers.iter().zip(&widths).map(|(header, width)| {
        pad(&truncate_text(header, *width), *width, Align::Left)
    }));
    let divider = "-".repeat(display_width(&header_line));
    lines.push(header_line);
    lines.push(divider);

    for row in rows {
        lines.push(join_cells(widths.iter().enumerate().map(|(index, width)| {
            let raw = row.get(index).map_or("-", String::as_str);
            let text = truncate_text(raw, *width);
            let align = if looks_numeric(&text) {
                Align::Right
            } else {
                Align::Left
            };
            let padded = pad(&text, *width, align);
            if options.color {
                colorize_status(&padded, &text)
            } else {
                padded
            }
        })));
    }

    lines.join("\n")
}

#[derive(Clone, Copy)]
enum Align {
    Left,
    Right,
}

fn join_cells(cells: impl Iterator<Item = String>) -> String {
    cells.collect::<Vec<_>>().join(SEPARATOR)
}

fn display_width(value: &str) -> usize {
    value.chars().count()
}

/// Take one character at a time from the widest shrinkable column until the
/// row fits or nothing can shrink further.
fn shrink_to_fit(widths: &mut [usize], headers: &[&str], max_width: usize) {
    let separators = widths.len().saturating_sub(1) * SEPARATOR.len();
    while widths.iter().sum::<usize>() + separators > max_width {
        let widest = widths
            .iter()
            .enumerate()
            .filter(|(index, width)| **width > floor_width(headers[*index]))
            .max_by_key(|(_, width)| **width)
            .map(|(index, _)| index);
        match widest {
            Some(index) => widths[index] -= 1,
            None => break,
        }
    }
}

fn floor_width(header: &str) -> usize {
    display_width(header).clamp(MIN_COLUMN, MIN_COLUMN * 3)
}

fn truncate_text(value: &str, width: usize) -> String {
    if display_width(value) <= width {
        return value.to_string();
    }
    if width <= 1 {
        return "…".to_string();
    }
    let mut out: String = value.chars().take(width - 1).collect();
    out.push('…');
    out
}

/// Inventory numbers, floor numbers and counts right-align.
fn looks_numeric(value: &str) -> bool {
    let trimmed = value.trim();
    let digits = trimmed.strip_prefix('-').unwrap_or(trimmed);
    !digits.is_empty() && digits.chars().all(|ch| ch.is_ascii_digit() || ch == '.')
}

fn pad(value: &str, width: usize, align: Align) -> String {
    let fill = " ".repeat(width.saturating_sub(display_width(value)));
    match align {
        Align::Left => format!("{value}{fill}"),
        Align::Right => format!("{fill}{value}"),
    }
}

/// Color a padded cell by its lifecycle or boolean value. Padding stays
/// outside the escape codes so alignment is unaffected.
fn colorize_status(padded: &str, value: &str) -> String {
    let code = match value.to_ascii_lowercase().as_str() {
        "working" | "completed" | "resolved" | "true" => "32",
        "new" | "in_progress" | "needs_repair" | "pending" => "33",
        "disposed" | "failed" | "false" => "31",
        _ => return padded.to_string(),
    };
    padded.replacen(value, &format!("\u{1b}[{code}m{value}\u{1b}[0m"), 1)
}
