//! Tables and key/value listings.

use super::colors::*;

/// Render rows as left-aligned columns with a header and separator.
///
/// Column widths are measured in characters; rows shorter than the header
/// are padded with empty cells.
pub fn format_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate().take(widths.len()) {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let render = |cells: Vec<&str>| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| {
                let pad = width.saturating_sub(cell.chars().count());
                format!("{}{}", cell, " ".repeat(pad))
            })
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = String::new();
    out.push_str(&render(headers.to_vec()));
    out.push('\n');
    out.push_str(
        &widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("  "),
    );
    out.push('\n');
    for row in rows {
        let cells: Vec<&str> = (0..widths.len())
            .map(|i| row.get(i).map(String::as_str).unwrap_or(""))
            .collect();
        out.push_str(&render(cells));
        out.push('\n');
    }
    out
}

/// Print a table, or a dimmed placeholder when there are no rows.
pub fn print_table(headers: &[&str], rows: &[Vec<String>], empty_message: &str) {
    if rows.is_empty() {
        println!("{GRAY}{}{RESET}", empty_message);
        return;
    }
    let table = format_table(headers, rows);
    let mut lines = table.lines();
    if let Some(header) = lines.next() {
        println!("{BOLD}{}{RESET}", header);
    }
    for line in lines {
        println!("{}", line);
    }
}

/// Print aligned `key: value` lines.
pub fn print_key_values(entries: &[(&str, String)]) {
    let width = entries.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
    for (key, value) in entries {
        println!("{BLUE}{:<width$}{RESET}  {}", key, value, width = width);
    }
}
