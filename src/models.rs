//! Data model for snapshot entries.
//!
//! Every feed item becomes one [`Entry`]. The fields shared by all
//! categories live on the entry itself; the category-specific part is
//! carried by [`EntryKind`], which also names the storage target.
//!
//! - [`Category`]: which listing a parser walks (`posts`, `articles`, `news`)
//! - [`Entry`]: one immutable record built from one listing element
//! - [`EntryKind`]: `Post`, or `Article`/`News` with their [`Heading`]

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The three feed categories, each handled by its own parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Posts,
    Articles,
    News,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Posts, Category::Articles, Category::News];

    /// Path segment used in listing URLs and in the run summary.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Posts => "posts",
            Category::Articles => "articles",
            Category::News => "news",
        }
    }

    /// Name of the entry type this category produces.
    pub fn type_name(self) -> &'static str {
        match self {
            Category::Posts => "Post",
            Category::Articles => "Article",
            Category::News => "News",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Heading fields that only articles and news carry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    pub title: String,
    /// Absolute URL of the full item.
    pub link: String,
    /// Free-text label such as `"5 min"`.
    pub reading_time: String,
}

/// Concrete entry type. The variant name is the storage target name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum EntryKind {
    Post,
    Article(Heading),
    News(Heading),
}

impl EntryKind {
    /// Category whose parser produces this kind.
    pub fn category(&self) -> Category {
        match self {
            EntryKind::Post => Category::Posts,
            EntryKind::Article(_) => Category::Articles,
            EntryKind::News(_) => Category::News,
        }
    }

    /// Table and flat-file type name.
    pub fn type_name(&self) -> &'static str {
        self.category().type_name()
    }

    pub fn heading(&self) -> Option<&Heading> {
        match self {
            EntryKind::Post => None,
            EntryKind::Article(h) | EntryKind::News(h) => Some(h),
        }
    }
}

/// One feed item published on the run day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Assigned by relational storage on insert; `None` until read back.
    pub id: Option<i64>,
    pub date: NaiveDate,
    pub author_link: String,
    pub author_name: String,
    /// Tag labels joined with `"* "`. Empty when the record has none.
    pub tags: String,
    pub description: String,
    #[serde(flatten)]
    pub kind: EntryKind,
}

impl Entry {
    pub fn type_name(&self) -> &'static str {
        self.kind.type_name()
    }
}
