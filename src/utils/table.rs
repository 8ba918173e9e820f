//! Table rendering utilities for CLI outputs.

use regex::Regex;
use std::sync::OnceLock;

/// Remove ANSI color sequences, so widths are computed on visible text.
pub fn strip_ansi(s: &str) -> String {
    static ANSI: OnceLock<Option<Regex>> = OnceLock::new();
    match ANSI.get_or_init(|| Regex::new(r"\x1B\[[0-9;]*[mK]").ok()) {
        Some(re) => re.replace_all(s, "").into_owned(),
        None => s.to_string(),
    }
}

fn visible_len(s: &str) -> usize {
    strip_ansi(s).chars().count()
}

pub struct Column {
    pub header: String,
    pub width: usize,
}

impl Column {
    pub fn new(header: &str) -> Self {
        Self {
            header: header.to_string(),
            width: header.chars().count(),
        }
    }
}

pub struct Table {
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn with_headers(headers: &[&str]) -> Self {
        Self::new(headers.iter().map(|h| Column::new(h)).collect())
    }

    /// Add a row, widening columns to fit. Missing cells render empty.
    pub fn add_row(&mut self, row: Vec<String>) {
        for (col, cell) in self.columns.iter_mut().zip(row.iter()) {
            col.width = col.width.max(visible_len(cell));
        }
        self.rows.push(row);
    }

    pub fn render(&self) -> String {
        let mut out = String::new();

        // Header
        for col in &self.columns {
            out.push_str(&format!("{:<width$} ", col.header, width = col.width));
        }
        out.push('\n');

        for col in &self.columns {
            out.push_str(&"-".repeat(col.width));
            out.push(' ');
        }
        out.push('\n');

        // Rows
        for row in &self.rows {
            for (i, col) in self.columns.iter().enumerate() {
                let cell = row.get(i).map(String::as_str).unwrap_or("");
                let pad = col.width.saturating_sub(visible_len(cell));
                out.push_str(cell);
                out.push_str(&" ".repeat(pad + 1));
            }
            out.push('\n');
        }

        out
    }
}
