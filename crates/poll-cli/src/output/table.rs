use poll_core::responses::PollResultsResponse;

#[derive(Clone, Copy, Debug)]
pub struct TableOptions {
    pub max_width: Option<usize>,
    pub color: bool,
}

/// Widest bar drawn for a 100% option.
const BAR_WIDTH: usize = 30;

/// Render a simple aligned table for string rows.
#[must_use]
pub fn render_entity_table(headers: &[&str], rows: &[Vec<String>], options: TableOptions) -> String {
    let mut widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(index, header)| {
            rows.iter()
                .filter_map(|row| row.get(index))
                .map(|cell| cell.chars().count())
                .max()
                .unwrap_or(0)
                .max(header.chars().count())
        })
        .collect();
    fit_widths(&mut widths, headers, options.max_width);

    let header_line = join_cells(headers.iter().map(ToString::to_string), &widths, |_| false);
    let divider = "-".repeat(header_line.chars().count());

    let mut lines = vec![header_line, divider];
    for row in rows {
        let cells = widths.iter().enumerate().map(|(index, width)| {
            let value = row.get(index).map_or("-", String::as_str);
            let truncated = truncate_text(value, *width);
            if options.color {
                colorize_state(&truncated)
            } else {
                truncated
            }
        });
        lines.push(join_cells(cells, &widths, |cell| looks_numeric(&strip_ansi(cell))));
    }
    lines.join("\n")
}

/// Poll header plus one row per option with a proportional bar.
#[must_use]
pub fn render_results(results: &PollResultsResponse, options: TableOptions) -> String {
    let poll = &results.poll;
    let state = if poll.is_active { "active" } else { "closed" };
    let state = if options.color { colorize_state(state) } else { state.to_string() };
    let heading = format!(
        "{} [{}]  {}  time left {}  total votes {}",
        poll.question, poll.id, state, results.time_left, results.tally.total_votes
    );

    let rows = results
        .chart
        .iter()
        .map(|slice| {
            let bar = bar(slice.percent);
            let bar = if options.color {
                format!("{}{bar}\u{1b}[0m", ansi_for_hex(&slice.color))
            } else {
                bar
            };
            vec![
                slice.label.clone(),
                slice.value.to_string(),
                format!("{}%", slice.percent),
                bar,
            ]
        })
        .collect::<Vec<_>>();

    let table = render_entity_table(
        &["option", "votes", "percent", "chart"],
        &rows,
        TableOptions {
            // Bars are sized already; only color matters.
            max_width: None,
            color: false,
        },
    );
    format!("{heading}\n\n{table}")
}

fn bar(percent: u32) -> String {
    let filled = (percent.min(100) as usize * BAR_WIDTH + 50) / 100;
    "█".repeat(filled)
}

/// Nearest basic terminal color for a chart palette entry.
fn ansi_for_hex(hex: &str) -> &'static str {
    match hex {
        "#4ade80" => "\u{1b}[32m",
        "#facc15" => "\u{1b}[33m",
        "#f87171" => "\u{1b}[31m",
        "#a78bfa" => "\u{1b}[35m",
        "#38bdf8" => "\u{1b}[36m",
        "#f472b6" => "\u{1b}[95m",
        _ => "\u{1b}[0m",
    }
}

fn join_cells<I>(cells: I, widths: &[usize], right_align: impl Fn(&str) -> bool) -> String
where
    I: IntoIterator<Item = String>,
{
    cells
        .into_iter()
        .zip(widths)
        .map(|(cell, width)| {
            let pad = width.saturating_sub(strip_ansi(&cell).chars().count());
            if right_align(&cell) {
                format!("{}{cell}", " ".repeat(pad))
            } else {
                format!("{cell}{}", " ".repeat(pad))
            }
        })
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

fn fit_widths(widths: &mut [usize], headers: &[&str], max_width: Option<usize>) {
    let Some(max_width) = max_width else {
        return;
    };
    let separators = widths.len().saturating_sub(1) * 2;
    while widths.iter().sum::<usize>() + separators > max_width {
        let widest = widths
            .iter()
            .enumerate()
            .filter(|(index, width)| **width > headers[*index].len().max(6))
            .max_by_key(|(_, width)| **width)
            .map(|(index, _)| index);
        let Some(index) = widest else {
            break;
        };
        widths[index] -= 1;
    }
}

fn truncate_text(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    if width <= 1 {
        return "…".to_string();
    }
    let mut out: String = value.chars().take(width - 1).collect();
    out.push('…');
    out
}

fn looks_numeric(value: &str) -> bool {
    let trimmed = value.trim().trim_end_matches('%');
    !trimmed.is_empty() && trimmed.chars().all(|ch| ch.is_ascii_digit() || ch == '.')
}

fn colorize_state(value: &str) -> String {
    let code = match value.to_ascii_lowercase().as_str() {
        "active" | "true" => Some("32"),
        "closed" | "false" | "already_closed" => Some("31"),
        _ => None,
    };
    match code {
        Some(code) => format!("\u{1b}[{code}m{value}\u{1b}[0m"),
        None => value.to_string(),
    }
}

fn strip_ansi(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '\u{1b}' && chars.peek() == Some(&'[') {
            for next in chars.by_ref() {
                if next == 'm' {
                    break;
                }
            }
            continue;
        }
        out.push(ch);
    }
    out
}
