//! Fixed-width table rendering for terminal output.

use std::fmt::Write as _;

/// Cells wider than this are clipped so one long value cannot wreck the
/// layout.
const MAX_CELL_WIDTH: usize = 40;

/// Render a header and rows as an aligned text table.
pub fn render_table(headers: &[String], rows: &[Vec<String>]) -> String {
    let column_count = headers.len();
    let mut widths: Vec<usize> = headers.iter().map(|h| clip(h).chars().count()).collect();

    for row in rows {
        for (idx, cell) in row.iter().enumerate().take(column_count) {
            widths[idx] = widths[idx].max(clip(cell).chars().count());
        }
    }

    for width in &mut widths {
        *width = (*width).max(1);
    }

    let mut output = String::new();

    let header_cells: Vec<String> = headers.iter().map(|h| clip(h)).collect();
    let _ = writeln!(output, "{}", format_row(&header_cells, &widths));

    let separator: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let _ = writeln!(output, "{}", format_row(&separator, &widths));

    for row in rows {
        let cells: Vec<String> = row.iter().take(column_count).map(|c| clip(c)).collect();
        let _ = writeln!(output, "{}", format_row(&cells, &widths));
    }

    output
}

/// Render and print to stdout.
pub fn print_table(headers: &[String], rows: &[Vec<String>]) {
    print!("{}", render_table(headers, rows));
}

fn format_row(cells: &[String], widths: &[usize]) -> String {
    let mut line = String::new();
    for (idx, cell) in cells.iter().enumerate() {
        if idx > 0 {
            line.push_str("  ");
        }
        line.push_str(cell);
        let padding = widths
            .get(idx)
            .copied()
            .unwrap_or_default()
            .saturating_sub(cell.chars().count());
        line.push_str(&" ".repeat(padding));
    }
    line.trim_end().to_string()
}

/// Replace control characters and clip over-long cells.
fn clip(value: &str) -> String {
    let sanitized: String = value
        .chars()
        .map(|ch| match ch {
            '\n' | '\r' | '\t' => ' ',
            other => other,
        })
        .collect();

    if sanitized.chars().count() <= MAX_CELL_WIDTH {
        sanitized
    } else {
        let clipped: String = sanitized.chars().take(MAX_CELL_WIDTH - 1).collect();
        format!("{clipped}…")
    }
}
