//! Command implementations behind the `polite-scrape` binary.
//!
//! Every command that reads a page goes through [`Config::load_page`], so
//! fetched pages share one session and its pacing floor.

mod basic;
pub mod config;
mod crawl;
mod demo;
mod fetch;
mod links;
mod meta;
mod select;
mod source;
mod tables;

pub use basic::basic;
pub use config::{Config, FetchOptions, parse_header, parse_seconds};
pub use crawl::crawl;
pub use demo::{SAMPLE_BASE_URL, SAMPLE_PAGE, demo};
pub use fetch::fetch;
pub use links::links;
pub use meta::meta;
pub use select::select;
pub use source::{Page, PageSource};
pub use tables::tables;
