//! HTML tables as headers plus rows of cell text.

use anyhow::Result;
use scraper::{ElementRef, Html};
use serde::Serialize;
use std::collections::BTreeMap;

use super::{css, element_text};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Table {
    /// 1-based position of the table in the document.
    pub number: usize,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// One map per row keyed by header; cells beyond the last header are keyed
    /// `Column_<n>`. Empty when the table has no headers or no rows.
    pub fn records(&self) -> Vec<BTreeMap<String, String>> {
        if self.headers.is_empty() || self.rows.is_empty() {
            return Vec::new();
        }

        self.rows
            .iter()
            .map(|row| {
                row.iter()
                    .enumerate()
                    .map(|(i, value)| {
                        let key = self
                            .headers
                            .get(i)
                            .cloned()
                            .unwrap_or_else(|| format!("Column_{}", i + 1));
                        (key, value.clone())
                    })
                    .collect()
            })
            .collect()
    }
}

/// Every `<table>` in document order.
pub fn extract_tables(document: &Html) -> Result<Vec<Table>> {
    let table_sel = css("table")?;
    document
        .select(&table_sel)
        .enumerate()
        .map(|(i, table)| extract_table(&table, i + 1))
        .collect()
}

fn extract_table(table: &ElementRef<'_>, number: usize) -> Result<Table> {
    let header_cells = css("thead th")?;
    let body_rows = css("tbody > tr, tfoot > tr")?;
    let th = css("th")?;
    let cells = css("td, th")?;

    let mut rows: Vec<ElementRef<'_>> = table.select(&body_rows).collect();

    // The HTML parser wraps bare <tr>s in an implicit <tbody>, so without a
    // <thead> the header row is the first body row.
    let headers: Vec<String> = if table.select(&css("thead")?).next().is_some() {
        table.select(&header_cells).map(|c| element_text(&c)).collect()
    } else {
        let first_row_headers: Vec<String> = rows
            .first()
            .map(|row| row.select(&th).map(|c| element_text(&c)).collect())
            .unwrap_or_default();
        if !first_row_headers.is_empty() {
            rows.remove(0);
        }
        first_row_headers
    };

    let rows = rows
        .iter()
        .map(|row| row.select(&cells).map(|c| element_text(&c)).collect::<Vec<_>>())
        .filter(|row| !row.is_empty())
        .collect();

    Ok(Table {
        number,
        headers,
        rows,
    })
}
