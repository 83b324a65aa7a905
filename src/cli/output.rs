//! Table, CSV and number formatting for report output

/// How a report is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Csv,
    Json,
}

impl OutputFormat {
    /// `None` when both `--json` and `--csv` are set
    pub fn from_flags(json: bool, csv: bool) -> Option<Self> {
        match (json, csv) {
            (true, true) => None,
            (true, false) => Some(OutputFormat::Json),
            (false, true) => Some(OutputFormat::Csv),
            (false, false) => Some(OutputFormat::Table),
        }
    }
}

/// Format a token count with thousand separators (e.g., 1234567 -> "1,234,567")
pub fn format_tokens(n: u64) -> String {
    let s = n.to_string();
    let len = s.len();
    let mut result = String::with_capacity(len + len / 3);

    for (i, ch) in s.bytes().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            result.push(',');
        }
        result.push(ch as char);
    }

    result
}

/// Dollar amount with four decimals
pub fn format_cost(cost: f64) -> String {
    format!("${:.4}", cost)
}

pub fn format_duration(minutes: f64) -> String {
    format!("{}min", minutes)
}

/// Round to one decimal place
pub fn round_minutes(minutes: f64) -> f64 {
    (minutes * 10.0).round() / 10.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

/// Column-aligned plain text table with an optional footer row
#[derive(Debug, Clone)]
pub struct Table {
    headers: Vec<String>,
    aligns: Vec<Align>,
    rows: Vec<Vec<String>>,
    footer: Option<Vec<String>>,
}

impl Table {
    pub fn new(columns: &[(&str, Align)]) -> Self {
        Self {
            headers: columns.iter().map(|(h, _)| h.to_string()).collect(),
            aligns: columns.iter().map(|(_, a)| *a).collect(),
            rows: Vec::new(),
            footer: None,
        }
    }

    pub fn push(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    /// Footer printed below a separator line
    pub fn footer(&mut self, row: Vec<String>) {
        self.footer = Some(row);
    }

    fn widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in self.rows.iter().chain(self.footer.iter()) {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }
        widths
    }

    fn render_row(&self, cells: &[String], widths: &[usize]) -> String {
        let line = cells
            .iter()
            .zip(widths)
            .zip(&self.aligns)
            .map(|((cell, &width), align)| match align {
                Align::Left => format!("{:<width$}", cell),
                Align::Right => format!("{:>width$}", cell),
            })
            .collect::<Vec<_>>()
            .join("  ");
        line.trim_end().to_string()
    }

    pub fn render(&self) -> String {
        let widths = self.widths();
        let mut lines = Vec::with_capacity(self.rows.len() + 3);

        lines.push(self.render_row(&self.headers, &widths));
        for row in &self.rows {
            lines.push(self.render_row(row, &widths));
        }
        if let Some(footer) = &self.footer {
            let total_width = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);
            lines.push("-".repeat(total_width));
            lines.push(self.render_row(footer, &widths));
        }

        lines.join("\n")
    }
}

fn needs_csv_quoting(value: &str) -> bool {
    value.contains(',') || value.contains('"') || value.contains('\n')
}

/// Quote a CSV cell when it contains a comma, quote or newline
pub fn escape_csv(value: &str) -> String {
    if needs_csv_quoting(value) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Header line plus one line per row; empty when both are empty
pub fn format_csv(headers: &[&str], rows: &[Vec<String>]) -> String {
    if headers.is_empty() && rows.is_empty() {
        return String::new();
    }

    let mut lines = Vec::with_capacity(rows.len() + 1);
    if !headers.is_empty() {
        lines.push(headers.join(","));
    }
    for row in rows {
        lines.push(
            row.iter()
                .map(|cell| escape_csv(cell))
                .collect::<Vec<_>>()
                .join(","),
        );
    }
    lines.join("\n")
}
