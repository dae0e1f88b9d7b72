//! Faculty Scraper Library
//!
//! Extracts faculty records (name, titles, profile link, email, phone) from
//! university directory pages using a chain of structural strategies.

pub mod arbiter;
pub mod confidence;
pub mod config;
pub mod dedup;
pub mod dom;
pub mod fields;
pub mod filter;
pub mod links;
pub mod pagination;
pub mod pipeline;
pub mod quality;
pub mod sink;
pub mod strategies;
pub mod types;

pub use pipeline::{extract_html, extract_page, PageExtraction};
pub use types::*;
