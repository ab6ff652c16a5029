//! Listing page scraping.
//!
//! Parsing is split into three layers so each can be tested against fixed
//! markup:
//!
//! | Layer | Module | Input | Output |
//! |-------|--------|-------|--------|
//! | Records | [`records`] | listing document | `<article>` handles in page order |
//! | Fields | [`fields`] | one record handle | one typed field |
//! | Category | [`category`] | feed configuration | today's entries for all groups |
//!
//! # Listing URLs
//!
//! Each category parser requests `{base}/flows/{group}/{category}` once per
//! group, e.g. `https://habr.com/ru/flows/develop/articles`. Only the first
//! listing page is read.

pub mod category;
pub mod fields;
pub mod records;
