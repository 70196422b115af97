//! Book model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};

/// Book record as stored and returned in full views
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: String,
    pub name: String,
    /// Stored as received
    #[schema(value_type = Option<Object>)]
    pub year: Option<Value>,
    #[schema(value_type = Option<Object>)]
    pub author: Option<Value>,
    #[schema(value_type = Option<Object>)]
    pub summary: Option<Value>,
    #[schema(value_type = Option<Object>)]
    pub publisher: Option<Value>,
    /// Total number of pages
    pub page_count: u32,
    /// Pages read so far, never above `page_count`
    pub read_page: u32,
    /// `read_page == page_count` as of the last write
    pub finished: bool,
    pub reading: bool,
    pub inserted_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Book {
    /// Build a new record from an already validated payload
    pub fn new(id: String, payload: BookPayload, now: DateTime<Utc>) -> Self {
        let mut book = Self {
            id,
            name: String::new(),
            year: None,
            author: None,
            summary: None,
            publisher: None,
            page_count: 0,
            read_page: 0,
            finished: false,
            reading: false,
            inserted_at: now,
            updated_at: now,
        };
        book.apply(payload, now);
        book
    }

    /// Replace every field except `id` and `inserted_at`
    pub fn apply(&mut self, payload: BookPayload, now: DateTime<Utc>) {
        self.name = payload.name.unwrap_or_default();
        self.year = payload.year;
        self.author = payload.author;
        self.summary = payload.summary;
        self.publisher = payload.publisher;
        self.page_count = payload.page_count;
        self.read_page = payload.read_page;
        self.finished = payload.read_page == payload.page_count;
        self.reading = payload.reading;
        self.updated_at = now;
    }

    pub fn summary(&self) -> BookSummary {
        BookSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            publisher: self.publisher.clone(),
        }
    }

    pub fn matches(&self, filter: &BookFilter) -> bool {
        match filter {
            BookFilter::Name(name) => self.name.to_lowercase() == name.to_lowercase(),
            BookFilter::Reading(reading) => self.reading == *reading,
            BookFilter::Finished(finished) => self.finished == *finished,
        }
    }
}

/// Short book representation for unfiltered listings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BookSummary {
    pub id: String,
    pub name: String,
    #[schema(value_type = Option<Object>)]
    pub publisher: Option<Value>,
}

/// Create / update book request
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookPayload {
    /// Required, must not be empty
    pub name: Option<String>,
    /// Stored as received
    #[schema(value_type = Option<Object>)]
    pub year: Option<Value>,
    #[schema(value_type = Option<Object>)]
    pub author: Option<Value>,
    #[schema(value_type = Option<Object>)]
    pub summary: Option<Value>,
    #[schema(value_type = Option<Object>)]
    pub publisher: Option<Value>,
    #[serde(default)]
    pub page_count: u32,
    #[serde(default)]
    pub read_page: u32,
    #[serde(default)]
    pub reading: bool,
}

impl BookPayload {
    pub fn has_name(&self) -> bool {
        self.name.as_deref().is_some_and(|name| !name.is_empty())
    }

    pub fn read_page_exceeds_page_count(&self) -> bool {
        self.read_page > self.page_count
    }
}

/// Book listing query parameters
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BookQuery {
    /// Case-insensitive exact name match
    pub name: Option<String>,
    /// `1` for books being read, anything else for the rest
    pub reading: Option<String>,
    /// `1` for finished books, anything else for the rest
    pub finished: Option<String>,
}

/// Filter resolved from a [`BookQuery`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookFilter {
    Name(String),
    Reading(bool),
    Finished(bool),
}

impl BookQuery {
    /// Build from raw query pairs, keeping the first non-empty value of each
    /// known key. Unknown keys are ignored.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut query = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "name" => &mut query.name,
                "reading" => &mut query.reading,
                "finished" => &mut query.finished,
                _ => continue,
            };
            if slot.is_none() && !value.is_empty() {
                *slot = Some(value);
            }
        }
        query
    }

    /// Resolve the single filter to apply: name, then reading, then finished.
    /// Empty parameters count as absent.
    pub fn filter(&self) -> Option<BookFilter> {
        fn present(value: &Option<String>) -> Option<&str> {
            value.as_deref().filter(|v| !v.is_empty())
        }

        if let Some(name) = present(&self.name) {
            Some(BookFilter::Name(name.to_string()))
        } else if let Some(reading) = present(&self.reading) {
            Some(BookFilter::Reading(flag(reading)))
        } else {
            present(&self.finished).map(|finished| BookFilter::Finished(flag(finished)))
        }
    }
}

/// Query flag coercion: only `"1"` is true
fn flag(value: &str) -> bool {
    value == "1"
}

/// Result of a listing: full records when filtered, summaries otherwise
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum BookList {
    Full(Vec<Book>),
    Summary(Vec<BookSummary>),
}

impl BookList {
    pub fn len(&self) -> usize {
        match self {
            BookList::Full(books) => books.len(),
            BookList::Summary(books) => books.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
