use serde::{Deserialize, Deserializer};

pub mod fetcher;
pub mod jikan;
pub mod projection;
pub mod upload;

pub use fetcher::{FetchOutcome, fetch_bounded};
pub use jikan::JikanClient;
pub use projection::{AnimeStats, Cell, ProjectedRow, project};

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Genre {
    pub name: String,
}

/// One anime entry as the listing API returns it
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AnimeRecord {
    pub title: String,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub episodes: Option<u32>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<Vec<Genre>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Genre>>::deserialize(deserializer)?.unwrap_or_default())
}

impl AnimeRecord {
    #[cfg(test)]
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            score: None,
            genres: Vec::new(),
            year: None,
            episodes: None,
            kind: None,
            status: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Page {
    pub records: Vec<AnimeRecord>,
    /// `Some(false)` when the source says there is nothing after this page
    pub has_next_page: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    RateLimited,
    Client,
    Server,
    /// No response at all (timeout, connection refused, ...)
    Transport,
}

impl StatusClass {
    pub fn from_status(status: Option<u16>) -> Self {
        match status {
            Some(429) => StatusClass::RateLimited,
            Some(s) if (400..500).contains(&s) => StatusClass::Client,
            Some(_) => StatusClass::Server,
            None => StatusClass::Transport,
        }
    }

    pub fn as_display(&self) -> &'static str {
        match self {
            StatusClass::RateLimited => "rate limited",
            StatusClass::Client => "request rejected",
            StatusClass::Server => "server error",
            StatusClass::Transport => "connection failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FetchError {
    #[error("Fetching page {} failed ({}): {}", .page, .class.as_display(), .reason)]
    FetchFailed {
        page: u32,
        status: Option<u16>,
        class: StatusClass,
        reason: String,
    },

    #[error("No anime data on page {page}")]
    NoData { page: u32 },
}

impl FetchError {
    pub fn failed(page: u32, status: Option<u16>, reason: impl Into<String>) -> Self {
        FetchError::FetchFailed {
            page,
            status,
            class: StatusClass::from_status(status),
            reason: reason.into(),
        }
    }

    pub fn page(&self) -> u32 {
        match self {
            FetchError::FetchFailed { page, .. } | FetchError::NoData { page } => *page,
        }
    }
}

/// A paginated listing endpoint, pages are numbered from 1
#[async_trait::async_trait]
pub trait PageSource {
    async fn fetch_page(&self, page: u32) -> std::result::Result<Page, FetchError>;
}
