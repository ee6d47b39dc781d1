//! Table shaping — the rectangular view of a page result.
//!
//! Both the request path (a fresh `PageResult`) and the live mirror
//! (re-parsed artifact text) funnel through `Table::shape`, so padding and
//! header behavior are identical at the two call sites.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::page::PageResult;

/// Shaping was asked to turn zero rows into a table — the column maximum is
/// undefined there.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("page contains no lines to shape into a table")]
pub struct EmptyPageError;

/// Rectangular grid of string cells with ordinal column headers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Shape ragged rows into a rectangular table.
    ///
    /// Column count is the widest input row; shorter rows are right-padded
    /// with empty cells. Headers are generated ordinals, never content.
    pub fn shape(rows: Vec<Vec<String>>) -> Result<Self, EmptyPageError> {
        let columns = rows.iter().map(|row| row.len()).max().ok_or(EmptyPageError)?;

        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(columns, String::new());
                row
            })
            .collect();

        let headers = (1..=columns).map(|i| format!("Column {i}")).collect();
        Ok(Self { headers, rows })
    }

    /// Table view of a freshly recognized page: one row per line, one cell
    /// per word.
    pub fn from_page(page: &PageResult) -> Result<Self, EmptyPageError> {
        let rows = page
            .lines()
            .iter()
            .map(|line| line.words.iter().map(|w| w.text.clone()).collect())
            .collect();
        Self::shape(rows)
    }

    /// Table view of artifact text: one row per line, whitespace-split
    /// tokens, possibly ragged.
    ///
    /// This drops the word/box association on purpose — the mirror is a
    /// text-only display.
    pub fn from_artifact_text(text: &str) -> Result<Self, EmptyPageError> {
        let rows = text
            .lines()
            .map(|line| line.split_whitespace().map(str::to_string).collect())
            .collect();
        Self::shape(rows)
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut widths: Vec<usize> = self.headers.iter().map(String::len).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                if cell.len() > widths[i] {
                    widths[i] = cell.len();
                }
            }
        }

        let pad = |cells: &[String]| -> String {
            cells
                .iter()
                .zip(&widths)
                .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
                .collect::<Vec<_>>()
                .join("  ")
        };

        writeln!(f, "{}", pad(&self.headers).trim_end())?;
        for row in &self.rows {
            writeln!(f, "{}", pad(row).trim_end())?;
        }
        Ok(())
    }
}
