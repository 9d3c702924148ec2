use std::io::Write;

use super::{stringify, OutputFormat, RenderResult};
use crate::store::RowCursor;

const EMPTY: &str = "(empty)";

/// Box-drawn grid.
///
/// ```text
/// ╔════╤═══════════╗
/// ║ ID │ HOST      ║
/// ╠════╪═══════════╣
/// ║ 1  │ host1.com ║
/// ╟────┼───────────╢
/// ║ 2  │ host2.com ║
/// ╚════╧═══════════╝
/// ```
///
/// Cells containing newlines span several text lines. A result without rows
/// prints a single `(empty)` body row; a statement without result columns
/// prints nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct GridFormat;

/// Border characters of one horizontal rule: left, fill, junction, right.
struct Rule(char, char, char, char);

const TOP: Rule = Rule('╔', '═', '╤', '╗');
const HEADER: Rule = Rule('╠', '═', '╪', '╣');
const ROW: Rule = Rule('╟', '─', '┼', '╢');
const BOTTOM: Rule = Rule('╚', '═', '╧', '╝');
const HEADER_EMPTY: Rule = Rule('╠', '═', '╧', '╣');
const BOTTOM_EMPTY: Rule = Rule('╚', '═', '═', '╝');

fn text_width(s: &str) -> usize {
    s.chars().count()
}

/// ` data ` left-aligned in a field of `width` characters.
fn pad(width: usize, data: &str) -> String {
    let fill = width.saturating_sub(text_width(data));
    format!(" {}{} ", data, " ".repeat(fill))
}

struct Grid {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    widths: Vec<usize>,
    empty_width: usize,
}

impl Grid {
    fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let mut widths = vec![0; headers.len()];
        for cells in std::iter::once(&headers).chain(rows.iter()) {
            for (width, cell) in widths.iter_mut().zip(cells) {
                for line in cell.split('\n') {
                    *width = (*width).max(text_width(line));
                }
            }
        }

        let mut empty_width = widths.iter().sum::<usize>() + 3 * widths.len().saturating_sub(1);
        if rows.is_empty() && empty_width < EMPTY.len() {
            if let Some(last) = widths.last_mut() {
                *last += EMPTY.len() - empty_width;
                empty_width = EMPTY.len();
            }
        }

        Self {
            headers,
            rows,
            widths,
            empty_width,
        }
    }

    fn write_rule(&self, out: &mut String, rule: &Rule) {
        for (idx, width) in self.widths.iter().enumerate() {
            out.push(if idx == 0 { rule.0 } else { rule.2 });
            out.extend(std::iter::repeat(rule.1).take(width + 2));
        }
        out.push(rule.3);
        out.push('\n');
    }

    fn write_cells(&self, out: &mut String, cells: &[String]) {
        let split: Vec<Vec<&str>> = cells.iter().map(|c| c.split('\n').collect()).collect();
        let lines = split.iter().map(Vec::len).max().unwrap_or(1).max(1);
        for line in 0..lines {
            for (idx, width) in self.widths.iter().enumerate() {
                out.push(if idx == 0 { '║' } else { '│' });
                let text = split
                    .get(idx)
                    .and_then(|cell| cell.get(line))
                    .copied()
                    .unwrap_or("");
                out.push_str(&pad(*width, text));
            }
            out.push_str("║\n");
        }
    }

    fn render(&self) -> String {
        let mut out = String::new();
        if self.widths.is_empty() {
            return out;
        }
        self.write_rule(&mut out, &TOP);
        self.write_cells(&mut out, &self.headers);
        if self.rows.is_empty() {
            self.write_rule(&mut out, &HEADER_EMPTY);
            out.push('║');
            out.push_str(&pad(self.empty_width, EMPTY));
            out.push_str("║\n");
            self.write_rule(&mut out, &BOTTOM_EMPTY);
        } else {
            for (idx, row) in self.rows.iter().enumerate() {
                self.write_rule(&mut out, if idx == 0 { &HEADER } else { &ROW });
                self.write_cells(&mut out, row);
            }
            self.write_rule(&mut out, &BOTTOM);
        }
        out
    }
}

impl OutputFormat for GridFormat {
    fn render(&self, rows: &mut dyn RowCursor, out: &mut dyn Write) -> RenderResult<()> {
        let headers: Vec<String> = rows.columns().iter().map(|c| c.name.clone()).collect();
        let mut cells = Vec::new();
        while let Some(row) = rows.next_row()? {
            cells.push(row.iter().map(stringify).collect());
        }

        out.write_all(Grid::new(headers, cells).render().as_bytes())?;
        Ok(())
    }
}
