//! Per-category listing parser.
//!
//! A [`CategoryParser`] walks `base/flows/{group}/{category}` for every
//! configured group, keeps the records published on the run day and turns
//! them into [`Entry`] values.
//!
//! # Record Handling
//!
//! The date is always extracted first. Records from other days are dropped
//! before any other field is read, so stale records with broken markup never
//! raise. A record dated today that fails extraction is handled according to
//! [`RecordPolicy`]. A fetch failure always ends the run.

use chrono::NaiveDate;
use scraper::{ElementRef, Html};
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::error::{ExtractError, PipelineError};
use crate::fetch::Fetch;
use crate::models::{Category, Entry, EntryKind};
use crate::scrapers::fields::{
    FieldSet, get_author_info, get_date, get_description, get_tags,
};
use crate::scrapers::records::extract_records;
use crate::utils::{millis, truncate_for_log};

/// What to do with a record dated today that cannot be extracted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecordPolicy {
    /// Log the failure and continue with the next record.
    #[default]
    Skip,
    /// Fail the group, which ends the run.
    Abort,
}

/// Configuration shared by every category parser in a run.
#[derive(Clone)]
pub struct FeedSource {
    /// Locale root of the feed, e.g. `https://habr.com/ru`.
    pub base_url: Url,
    /// Groups queried for every category, in order.
    pub groups: Vec<String>,
    pub fetcher: Arc<dyn Fetch>,
    pub on_record_error: RecordPolicy,
}

impl FeedSource {
    pub fn listing_url(&self, group: &str, category: Category) -> String {
        format!(
            "{}/flows/{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            group,
            category
        )
    }
}

/// Entries one parser produced, tagged with its category.
#[derive(Debug)]
pub struct CategoryBatch {
    pub category: Category,
    pub entries: Vec<Entry>,
}

/// Walks one category's listing across every configured group.
///
/// Parsers share their [`FeedSource`]; the extractors applied to each record
/// are fixed at construction by [`FieldSet::for_category`].
pub struct CategoryParser {
    category: Category,
    fields: FieldSet,
    source: Arc<FeedSource>,
}

impl CategoryParser {
    /// Build a parser for `category` over the shared feed configuration.
    ///
    /// # Arguments
    /// * `category` - listing to walk; also selects the field set
    /// * `source` - base URL, groups, fetcher and record policy
    pub fn new(category: Category, source: Arc<FeedSource>) -> Self {
        Self {
            category,
            fields: FieldSet::for_category(category),
            source,
        }
    }

    pub fn category(&self) -> Category {
        self.category
    }

    /// Fetch and parse every group, returning today's entries in group order
    /// and page order.
    #[instrument(level = "info", skip_all, fields(category = %self.category))]
    pub async fn run(
        &self,
        today: NaiveDate,
        cancel: &CancellationToken,
    ) -> Result<CategoryBatch, PipelineError> {
        let mut entries = Vec::new();

        for group in &self.source.groups {
            if cancel.is_cancelled() {
                warn!(%group, "Cancelled before fetching group");
                return Err(PipelineError::Cancelled);
            }

            let t0 = Instant::now();
            let url = self.source.listing_url(group, self.category);
            let body = self.source.fetcher.fetch(&url).await?;
            let parsed = self.parse_listing(&body, group, today)?;

            info!(
                %group,
                category = %self.category,
                count = parsed.len(),
                elapsed_ms = millis(t0.elapsed()),
                "{group}/{} - {}",
                self.category,
                parsed.len()
            );
            entries.extend(parsed);
        }

        Ok(CategoryBatch {
            category: self.category,
            entries,
        })
    }

    /// Today's entries from one listing document.
    pub fn parse_listing(
        &self,
        body: &str,
        group: &str,
        today: NaiveDate,
    ) -> Result<Vec<Entry>, PipelineError> {
        let document = Html::parse_document(body);
        let records = extract_records(&document);
        debug!(%group, records = records.len(), "Located records");

        let mut entries = Vec::new();
        for (index, record) in records.into_iter().enumerate() {
            match self.parse_record(record, today) {
                Ok(Some(entry)) => entries.push(entry),
                Ok(None) => {}
                Err(source) => match self.source.on_record_error {
                    RecordPolicy::Skip => {
                        let text: String = record.text().collect();
                        warn!(
                            %group,
                            category = %self.category,
                            index,
                            error = %source,
                            record = %truncate_for_log(text.trim(), 200),
                            "Skipping malformed record"
                        );
                    }
                    RecordPolicy::Abort => {
                        return Err(PipelineError::Record {
                            group: group.to_string(),
                            category: self.category.as_str(),
                            index,
                            source,
                        });
                    }
                },
            }
        }
        Ok(entries)
    }

    /// `Ok(None)` when the record was not published on `today`.
    fn parse_record(
        &self,
        record: ElementRef<'_>,
        today: NaiveDate,
    ) -> Result<Option<Entry>, ExtractError> {
        let date = get_date(record, self.category)?;
        if date != today {
            return Ok(None);
        }

        let base = &self.source.base_url;
        let tags = get_tags(record);
        let (author_name, author_link) = get_author_info(record, self.category, base)?;
        let description = get_description(record)?;
        let heading = self.fields.heading(record, base)?;

        let kind = match (self.category, heading) {
            (Category::Posts, _) => EntryKind::Post,
            (Category::Articles, Some(h)) => EntryKind::Article(h),
            (Category::News, Some(h)) => EntryKind::News(h),
            (_, None) => return Err(ExtractError::missing("heading")),
        };

        Ok(Some(Entry {
            id: None,
            date,
            author_link,
            author_name,
            tags,
            description,
            kind,
        }))
    }
}
