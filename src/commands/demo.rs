//! Offline walkthrough of every extractor over a bundled sample page.

use anyhow::Result;
use url::Url;

use super::links::{print_images, print_links};
use super::tables::print_table;
use crate::extract::{
    categorize_links, extract_headings, extract_images, extract_links, extract_metadata,
    extract_paragraphs, extract_tables, extract_title, parse_document, select_text,
};

/// Address the sample page pretends to live at.
pub const SAMPLE_BASE_URL: &str = "https://tutorial.example/guide/";

pub const SAMPLE_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="description" content="A practice page for trying out HTML extraction">
    <meta name="keywords" content="scraping, rust, selectors">
    <meta name="author" content="Tutorial Team">
    <title>Scraping Practice Page</title>
</head>
<body>
    <header>
        <h1>Learning to Scrape</h1>
        <nav>
            <a href="/">Home</a>
            <a href="/about">About</a>
            <a href="contact.html">Contact</a>
            <a href="https://github.com" class="external">GitHub</a>
        </nav>
    </header>
    <main>
        <section id="intro">
            <h2>What is scraping?</h2>
            <p>Scraping pulls structured data out of pages written for people.</p>
            <p>This page has a little of everything to practise on.</p>
        </section>
        <section id="tools">
            <h2>Tools</h2>
            <ul>
                <li class="tool">reqwest</li>
                <li class="tool">scraper</li>
                <li class="tool">url</li>
            </ul>
        </section>
        <section id="data">
            <h2>Crates</h2>
            <table>
                <thead>
                    <tr><th>Crate</th><th>Purpose</th><th>Version</th></tr>
                </thead>
                <tbody>
                    <tr><td>reqwest</td><td>HTTP client</td><td>0.12</td></tr>
                    <tr><td>scraper</td><td>HTML parsing</td><td>0.20</td></tr>
                    <tr><td>url</td><td>URL handling</td><td>2.5</td></tr>
                </tbody>
            </table>
        </section>
        <section id="images">
            <h2>Images</h2>
            <img src="/images/flow.png" alt="Request flow" title="How a fetch works">
            <img src="diagram.svg" alt="Selector diagram">
        </section>
        <section id="articles">
            <h2>Articles</h2>
            <article>
                <h3>Selecting elements</h3>
                <p class="date">Posted on: 2024-03-02</p>
                <a href="/articles/selecting">Read more</a>
            </article>
            <article>
                <h3>Being polite</h3>
                <p class="date">Posted on: 2024-03-09</p>
                <a href="/articles/polite">Read more</a>
            </article>
        </section>
    </main>
    <footer>
        <p>Practice material, free to reuse.</p>
    </footer>
</body>
</html>
"#;

fn heading(title: &str) {
    println!();
    println!("{}", "=".repeat(60));
    println!("{}", title);
    println!("{}", "=".repeat(60));
}

/// Run every extractor over [`SAMPLE_PAGE`] and print the results.
pub fn demo() -> Result<()> {
    let document = parse_document(SAMPLE_PAGE.as_bytes());
    let base = Url::parse(SAMPLE_BASE_URL)?;

    heading("1. BASIC PARSING");
    println!(
        "Title: {}",
        extract_title(&document)?.as_deref().unwrap_or("(none)")
    );
    for (level, texts) in extract_headings(&document)? {
        println!("  {}: {}", level, texts.join(" | "));
    }
    for paragraph in extract_paragraphs(&document)? {
        println!("  - {}", paragraph);
    }

    heading("2. CSS SELECTORS");
    for (label, selector) in [
        ("By class '.tool'", ".tool"),
        ("By id '#intro h2'", "#intro h2"),
        ("Attribute 'a[class=\"external\"]'", r#"a[class="external"]"#),
        ("Descendant 'article h3'", "article h3"),
        ("Child 'article > p.date'", "article > p.date"),
    ] {
        let matches = select_text(&document, selector)?;
        println!("{}: {}", label, matches.join(", "));
    }

    heading("3. LINKS AND IMAGES");
    let links = extract_links(&document, &base)?;
    print_links(&links);
    let categories = categorize_links(&links, &base);
    println!("Internal Links: {}", categories.internal.len());
    println!("External Links: {}", categories.external.len());
    print_images(&extract_images(&document, &base)?);

    heading("4. TABLES");
    for table in extract_tables(&document)? {
        print_table(&table);
        if let Some(first) = table.records().first() {
            println!("First row as record: {}", serde_json::to_string(first)?);
        }
    }

    heading("5. METADATA");
    for (label, value) in extract_metadata(&document)?.fields() {
        println!("  {}: {}", label, value);
    }

    Ok(())
}
