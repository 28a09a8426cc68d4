//! kubectl-style borderless tables.

use prettytable::format::{Alignment, FormatBuilder, TableFormat};
use prettytable::{Cell, Row, Table};

/// A header row plus data rows, rendered with three-space column gaps.
#[derive(Debug, Clone, Default)]
pub struct TableData {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TableData {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    /// Insert a column at `index` in the header and every row.
    pub fn insert_column(&mut self, index: usize, header: &str, values: Vec<String>) {
        self.headers.insert(index, header.to_string());
        for (row, value) in self.rows.iter_mut().zip(values) {
            row.insert(index, value);
        }
    }

    pub fn push_column(&mut self, header: &str, values: Vec<String>) {
        let index = self.headers.len();
        self.insert_column(index, header, values);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn render(&self, no_headers: bool) -> String {
        render(&self.headers, &self.rows, no_headers)
    }
}

fn kubectl_format() -> TableFormat {
    FormatBuilder::new()
        .column_separator(' ')
        .padding(0, 2)
        .build()
}

/// Render rows as an aligned table. Trailing padding is stripped from every line.
pub fn render(headers: &[String], rows: &[Vec<String>], no_headers: bool) -> String {
    let mut table = Table::new();
    table.set_format(kubectl_format());

    if !no_headers {
        table.add_row(Row::new(
            headers
                .iter()
                .map(|h| Cell::new_align(h, Alignment::LEFT))
                .collect(),
        ));
    }
    for row in rows {
        table.add_row(Row::new(
            row.iter()
                .map(|c| Cell::new_align(c, Alignment::LEFT))
                .collect(),
        ));
    }

    let mut out = String::new();
    for line in table.to_string().lines() {
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}
