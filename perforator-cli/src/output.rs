//! Console rendering helpers shared by the metric commands

use serde::Serialize;

/// Print `value` as pretty JSON
pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print rows as a left-aligned text table with a header underline
pub fn print_table(headers: &[&str], rows: &[Vec<String>]) {
    for line in render_table(headers, rows) {
        println!("{}", line);
    }
}

fn render_table(headers: &[&str], rows: &[Vec<String>]) -> Vec<String> {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(i) {
                *width = (*width).max(cell.chars().count());
            }
        }
    }

    let format_row = |cells: Vec<&str>| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = width))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(format_row(headers.to_vec()));
    lines.push(
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("  "),
    );
    for row in rows {
        lines.push(format_row(row.iter().map(String::as_str).collect()));
    }
    lines
}

/// Render a number of seconds as a short human duration (`2d 3h`, `45m`, `12s`)
pub fn format_duration(secs: i64) -> String {
    let secs = secs.max(0);
    let days = secs / 86_400;
    let hours = (secs % 86_400) / 3_600;
    let minutes = (secs % 3_600) / 60;

    if days > 0 {
        format!("{}d {}h", days, hours)
    } else if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else if minutes > 0 {
        format!("{}m", minutes)
    } else {
        format!("{}s", secs)
    }
}

/// Render a ratio in `[0, 1]` as a percentage with one decimal
pub fn format_percent(ratio: f64) -> String {
    format!("{:.1}%", ratio * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0), "0s");
        assert_eq!(format_duration(59), "59s");
        assert_eq!(format_duration(60 * 45), "45m");
        assert_eq!(format_duration(3_600 * 5 + 60 * 7), "5h 7m");
        assert_eq!(format_duration(86_400 * 2 + 3_600 * 3), "2d 3h");
        assert_eq!(format_duration(-10), "0s");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(0.25), "25.0%");
        assert_eq!(format_percent(1.0 / 3.0), "33.3%");
    }

    #[test]
    fn test_render_table_aligns_columns() {
        let rows = vec![
            vec!["octocat".to_string(), "3".to_string()],
            vec!["me".to_string(), "12".to_string()],
        ];
        let lines = render_table(&["Author", "Issues"], &rows);

        assert_eq!(lines[0], "Author   Issues");
        assert_eq!(lines[1], "-------  ------");
        assert_eq!(lines[2], "octocat  3");
        assert_eq!(lines[3], "me       12");
    }
}
