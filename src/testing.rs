//! Test fixtures and fakes.
//!
//! - Listing markup builders ([`PostFixture`], [`ArticleFixture`], [`listing`])
//!   shaped like the live flow pages
//! - [`FakeFetcher`]: serves fixture pages by URL and records every call
//! - [`RecordingSink`] and [`FailingSink`] for fan-out assertions

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use url::Url;

use crate::error::{FetchError, SinkWriteError};
use crate::fetch::Fetch;
use crate::models::{Entry, EntryKind};
use crate::outputs::Sink;
use crate::scrapers::category::{FeedSource, RecordPolicy};

pub fn base_url() -> Url {
    Url::parse("https://feed.test/ru").unwrap()
}

/// Shared configuration over `fetcher` with the default two groups.
pub fn feed_source(fetcher: FakeFetcher, policy: RecordPolicy) -> Arc<FeedSource> {
    Arc::new(FeedSource {
        base_url: base_url(),
        groups: vec!["admin".to_string(), "develop".to_string()],
        fetcher: Arc::new(fetcher),
        on_record_error: policy,
    })
}

/// The entry most sink tests write.
pub fn sample_entry(kind: EntryKind) -> Entry {
    Entry {
        id: None,
        date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        author_link: "https://x/u1".to_string(),
        author_name: "alice".to_string(),
        tags: "Go".to_string(),
        description: "body text".to_string(),
        kind,
    }
}

/// Wrap records in a flow page.
pub fn listing(records: &[String]) -> String {
    format!(
        r#"<!DOCTYPE html><html><body><div class="tm-articles-list">{}</div></body></html>"#,
        records.concat()
    )
}

fn meta(scope: &str, date_label: &str, author: &str, author_href: &str) -> String {
    format!(
        r#"<div class="tm-{scope}-snippet__meta">
            <span class="tm-user-info">
                <a class="tm-user-info__userpic" href="{author_href}"><img src="/a.png"></a>
                <span class="tm-user-info__user">
                    <a class="tm-user-info__username" href="{author_href}">{author}</a>
                </span>
            </span>
            <span class="tm-article-datetime-published">
                <a class="tm-article-datetime-published_link" href="/p/1/">
                    <time datetime="2024-06-01T10:15:00.000Z" title="{date_label}">today</time>
                </a>
            </span>
        </div>"#
    )
}

fn hubs(tags: &[String]) -> String {
    let spans: String = tags
        .iter()
        .map(|t| {
            format!(
                r#"<span class="tm-publication-hub__link-container"><a href="/hub/"><span>{t}</span></a></span>"#
            )
        })
        .collect();
    format!(r#"<div class="tm-publication-hubs">{spans}</div>"#)
}

/// A post snippet.
#[derive(Debug, Clone)]
pub struct PostFixture {
    date_label: String,
    author: String,
    author_href: String,
    tags: Vec<String>,
    description: String,
}

impl PostFixture {
    pub fn new(date_label: &str) -> Self {
        Self {
            date_label: date_label.to_string(),
            author: "alice".to_string(),
            author_href: "/ru/users/alice/".to_string(),
            tags: vec!["Go".to_string(), "Python".to_string()],
            description: "<p>Post body</p>".to_string(),
        }
    }

    pub fn author(mut self, name: &str, href: &str) -> Self {
        self.author = name.to_string();
        self.author_href = href.to_string();
        self
    }

    pub fn tags(mut self, tags: &[&str]) -> Self {
        self.tags = tags.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn description(mut self, html: &str) -> Self {
        self.description = html.to_string();
        self
    }

    pub fn html(&self) -> String {
        format!(
            r#"<article class="tm-articles-list__item">
                <div class="tm-post-snippet">
                    {}
                    {}
                    <div class="article-formatted-body">{}</div>
                </div>
            </article>"#,
            meta("post", &self.date_label, &self.author, &self.author_href),
            hubs(&self.tags),
            self.description
        )
    }
}

/// An article or news snippet.
#[derive(Debug, Clone)]
pub struct ArticleFixture {
    post: PostFixture,
    title: String,
    link: String,
    reading_time: String,
}

impl ArticleFixture {
    pub fn new(date_label: &str) -> Self {
        Self {
            post: PostFixture::new(date_label),
            title: "An article".to_string(),
            link: "/ru/articles/1/".to_string(),
            reading_time: "3 min".to_string(),
        }
    }

    pub fn author(mut self, name: &str, href: &str) -> Self {
        self.post = self.post.author(name, href);
        self
    }

    pub fn title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    pub fn link(mut self, link: &str) -> Self {
        self.link = link.to_string();
        self
    }

    pub fn reading_time(mut self, label: &str) -> Self {
        self.reading_time = label.to_string();
        self
    }

    pub fn html(&self) -> String {
        let post = &self.post;
        format!(
            r#"<article class="tm-articles-list__item">
                <div class="tm-article-snippet">
                    {}
                    <h2 class="tm-title"><a class="tm-title__link" href="{}"><span>{}</span></a></h2>
                    {}
                    <div class="article-formatted-body">{}</div>
                </div>
                <div class="tm-article-snippet__stats">
                    <span class="tm-article-reading-time"><span class="tm-article-reading-time__label">{}</span></span>
                </div>
            </article>"#,
            meta("article", &post.date_label, &post.author, &post.author_href),
            self.link,
            self.title,
            hubs(&post.tags),
            post.description,
            self.reading_time
        )
    }
}

/// Serves fixture pages by exact URL; unknown URLs answer 404.
#[derive(Clone, Default)]
pub struct FakeFetcher {
    pages: Arc<HashMap<String, Result<String, u16>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl FakeFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: &str, body: String) -> Self {
        Arc::make_mut(&mut self.pages).insert(url.to_string(), Ok(body));
        self
    }

    pub fn with_failure(mut self, url: &str, status: u16) -> Self {
        Arc::make_mut(&mut self.pages).insert(url.to_string(), Err(status));
        self
    }

    /// URLs requested so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Fetch for FakeFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        self.calls.lock().unwrap().push(url.to_string());
        match self.pages.get(url) {
            Some(Ok(body)) => Ok(body.clone()),
            Some(Err(status)) => Err(FetchError::Status {
                url: url.to_string(),
                status: *status,
            }),
            None => Err(FetchError::Status {
                url: url.to_string(),
                status: 404,
            }),
        }
    }
}

/// Keeps every entry it receives.
#[derive(Clone, Default)]
pub struct RecordingSink {
    entries: Arc<Mutex<Vec<Entry>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<Entry> {
        self.entries.lock().unwrap().clone()
    }
}

#[async_trait]
impl Sink for RecordingSink {
    fn name(&self) -> &'static str {
        "recording"
    }

    async fn add(&self, entry: &Entry) -> Result<(), SinkWriteError> {
        self.entries.lock().unwrap().push(entry.clone());
        Ok(())
    }
}

/// Rejects every entry.
pub struct FailingSink;

#[async_trait]
impl Sink for FailingSink {
    fn name(&self) -> &'static str {
        "failing"
    }

    async fn add(&self, _entry: &Entry) -> Result<(), SinkWriteError> {
        Err(SinkWriteError::Io {
            path: "unwritable.csv".into(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
        })
    }
}
