use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::BTreeMap;

use super::config::Config;
use super::source::PageSource;
use crate::{
    extract::{Table, extract_tables},
    runtime::Runtime,
};

#[derive(Serialize)]
struct TableRecords<'a> {
    number: usize,
    headers: &'a [String],
    records: Vec<BTreeMap<String, String>>,
}

/// Print every table on a page, as text or as JSON records.
#[tracing::instrument(skip(config))]
pub async fn tables<R: Runtime>(
    config: &mut Config<R>,
    source: &PageSource,
    json: bool,
) -> Result<()> {
    let page = config.load_page(source).await?;
    let tables = extract_tables(&page.document())?;

    if json {
        println!("{}", tables_to_json(&tables)?);
        return Ok(());
    }

    println!("Total Tables Found: {}", tables.len());
    for table in &tables {
        print_table(table);
    }

    Ok(())
}

pub(crate) fn tables_to_json(tables: &[Table]) -> Result<String> {
    let output: Vec<TableRecords<'_>> = tables
        .iter()
        .map(|table| TableRecords {
            number: table.number,
            headers: &table.headers,
            records: table.records(),
        })
        .collect();
    serde_json::to_string_pretty(&output).context("Failed to serialize tables")
}

pub(crate) fn print_table(table: &Table) {
    println!();
    println!("--- Table {} ---", table.number);

    if !table.headers.is_empty() {
        println!("Headers: {}", table.headers.join(" | "));
        println!("{}", "-".repeat(60));
    }

    if table.rows.is_empty() {
        println!("No rows found in this table");
    }
    for (i, row) in table.rows.iter().enumerate() {
        println!("Row {}: {}", i + 1, row.join(" | "));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_to_json() {
        let tables = vec![Table {
            number: 1,
            headers: vec!["Crate".to_string(), "Role".to_string()],
            rows: vec![vec!["url".to_string(), "parsing".to_string()]],
        }];

        let json: serde_json::Value =
            serde_json::from_str(&tables_to_json(&tables).unwrap()).unwrap();
        assert_eq!(json[0]["number"], 1);
        assert_eq!(json[0]["headers"][1], "Role");
        assert_eq!(json[0]["records"][0]["Crate"], "url");
        assert_eq!(json[0]["records"][0]["Role"], "parsing");
    }

    #[test]
    fn test_tables_to_json_empty() {
        assert_eq!(tables_to_json(&[]).unwrap(), "[]");
    }
}
