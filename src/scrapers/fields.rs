//! Single-field extractors over one listing record.
//!
//! Every field has its own function so a markup change on the site breaks
//! only the field it touches. The functions are pure: they read the record
//! handle and, for links, resolve hrefs against the feed's base URL.
//!
//! Which extractors a category uses is decided by [`FieldSet`]:
//! - [`FieldSet::Common`]: date, tags, author, description
//! - [`FieldSet::CommonWithHeading`]: the common fields plus title, link
//!   and reading time

use chrono::NaiveDate;
use itertools::Itertools;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Selector};
use url::Url;

use crate::error::ExtractError;
use crate::models::{Category, Heading};
use crate::scrapers::records::find_next;

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("valid selector")
}

static POST_META: Lazy<Selector> = Lazy::new(|| selector("div.tm-post-snippet__meta"));
static ARTICLE_META: Lazy<Selector> = Lazy::new(|| selector("div.tm-article-snippet__meta"));
static PUBLISHED_LINK: Lazy<Selector> =
    Lazy::new(|| selector("a.tm-article-datetime-published_link"));
static USERPIC: Lazy<Selector> = Lazy::new(|| selector("a.tm-user-info__userpic"));
static USERNAME: Lazy<Selector> = Lazy::new(|| selector("a.tm-user-info__username"));
static HUBS: Lazy<Selector> = Lazy::new(|| selector("div.tm-publication-hubs"));
static HUB_CONTAINER: Lazy<Selector> =
    Lazy::new(|| selector("span.tm-publication-hub__link-container"));
static SPAN: Lazy<Selector> = Lazy::new(|| selector("span"));
static BODY: Lazy<Selector> = Lazy::new(|| selector("div.article-formatted-body"));
static H2: Lazy<Selector> = Lazy::new(|| selector("h2"));
static STATS: Lazy<Selector> = Lazy::new(|| selector("div.tm-article-snippet__stats"));
static READING_TIME: Lazy<Selector> =
    Lazy::new(|| selector("span.tm-article-reading-time__label"));

/// Extractors a category parser applies after the date filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldSet {
    Common,
    CommonWithHeading,
}

impl FieldSet {
    pub fn for_category(category: Category) -> Self {
        match category {
            Category::Posts => FieldSet::Common,
            Category::Articles | Category::News => FieldSet::CommonWithHeading,
        }
    }

    /// Heading fields when this set includes them.
    pub fn heading(
        self,
        record: ElementRef<'_>,
        base: &Url,
    ) -> Result<Option<Heading>, ExtractError> {
        match self {
            FieldSet::Common => Ok(None),
            FieldSet::CommonWithHeading => Ok(Some(Heading {
                title: get_title(record)?,
                link: get_link(record, base)?,
                reading_time: get_reading_time(record)?,
            })),
        }
    }
}

fn text_of(el: ElementRef<'_>) -> String {
    el.text().collect()
}

/// Snippet metadata block; news snippets share the article layout.
fn meta_block(record: ElementRef<'_>, category: Category) -> Result<ElementRef<'_>, ExtractError> {
    let sel: &Selector = match category {
        Category::Posts => &*POST_META,
        Category::Articles | Category::News => &*ARTICLE_META,
    };
    record
        .select(sel)
        .next()
        .ok_or(ExtractError::missing("snippet meta"))
}

fn absolutize(base: &Url, href: &str) -> String {
    base.join(href)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| href.to_string())
}

/// Publication date from the datetime anchor's `title` attribute.
///
/// The label looks like `2024-06-01, 10:15`; only the first ten characters
/// are parsed.
pub fn get_date(record: ElementRef<'_>, category: Category) -> Result<NaiveDate, ExtractError> {
    let anchor = meta_block(record, category)?
        .select(&PUBLISHED_LINK)
        .next()
        .ok_or(ExtractError::missing("published link"))?;
    let stamp = find_next(anchor, |_| true).ok_or(ExtractError::missing("published stamp"))?;
    let raw = stamp
        .value()
        .attr("title")
        .ok_or(ExtractError::missing("published title"))?;

    let day = raw.get(..10).ok_or_else(|| ExtractError::DateParse {
        raw: raw.to_string(),
        reason: "shorter than YYYY-MM-DD".to_string(),
    })?;
    NaiveDate::parse_from_str(day, "%Y-%m-%d").map_err(|e| ExtractError::DateParse {
        raw: raw.to_string(),
        reason: e.to_string(),
    })
}

/// Hub labels joined with `"* "`; empty when the record has no hubs.
pub fn get_tags(record: ElementRef<'_>) -> String {
    let Some(hubs) = record.select(&HUBS).next() else {
        return String::new();
    };
    hubs.select(&HUB_CONTAINER)
        .filter_map(|container| container.select(&SPAN).next())
        .map(|label| text_of(label).trim().to_string())
        .join("* ")
}

/// `(name, link)` of the author from the snippet metadata block.
pub fn get_author_info(
    record: ElementRef<'_>,
    category: Category,
    base: &Url,
) -> Result<(String, String), ExtractError> {
    let meta = meta_block(record, category)?;
    let href = meta
        .select(&USERPIC)
        .next()
        .and_then(|a| a.value().attr("href"))
        .ok_or(ExtractError::missing("author link"))?;
    let name = meta
        .select(&USERNAME)
        .next()
        .ok_or(ExtractError::missing("author name"))?;
    Ok((text_of(name).trim().to_string(), absolutize(base, href)))
}

/// Plain text of the first formatted body container.
pub fn get_description(record: ElementRef<'_>) -> Result<String, ExtractError> {
    record
        .select(&BODY)
        .next()
        .map(text_of)
        .ok_or(ExtractError::missing("description"))
}

fn heading(record: ElementRef<'_>) -> Result<ElementRef<'_>, ExtractError> {
    record
        .select(&H2)
        .next()
        .ok_or(ExtractError::missing("heading"))
}

/// Absolute URL of the first anchor after the heading.
pub fn get_link(record: ElementRef<'_>, base: &Url) -> Result<String, ExtractError> {
    let anchor = find_next(heading(record)?, |el| el.value().name() == "a")
        .ok_or(ExtractError::missing("heading link"))?;
    let href = anchor
        .value()
        .attr("href")
        .ok_or(ExtractError::missing("heading href"))?;
    Ok(absolutize(base, href))
}

/// Text of the first label after the heading.
pub fn get_title(record: ElementRef<'_>) -> Result<String, ExtractError> {
    find_next(heading(record)?, |el| el.value().name() == "span")
        .map(text_of)
        .ok_or(ExtractError::missing("title"))
}

/// Reading-time label from the snippet statistics block.
///
/// # Arguments
/// * `record` - an article or news record
///
/// # Returns
/// The label as shown on the page (for example `"5 min"`), or
/// [`ExtractError::FieldNotFound`] when the statistics block or its label is
/// absent.
pub fn get_reading_time(record: ElementRef<'_>) -> Result<String, ExtractError> {
    record
        .select(&STATS)
        .next()
        .and_then(|stats| stats.select(&READING_TIME).next())
        .map(text_of)
        .ok_or(ExtractError::missing("reading time"))
}
