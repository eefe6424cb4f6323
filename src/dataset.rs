//! Rows shown in the data view and where they came from.
//!
//! Fetched rows and uploaded rows are kept apart so a bad upload never touches network data,
//! and a failed fetch never blocks the next one.

use std::path::Path;

use tracing::{info, warn};

use crate::catalog::{AnimeStats, FetchError, FetchOutcome, ProjectedRow, project, upload};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowSource {
    Api,
    Upload,
}

impl RowSource {
    pub fn as_display(&self) -> &'static str {
        match self {
            RowSource::Api => "API",
            RowSource::Upload => "CSV upload",
        }
    }
}

#[derive(Debug, Default)]
pub struct AnimeDataset {
    pub fetched: Vec<ProjectedRow>,
    pub fetch_error: Option<FetchError>,
    pub loading: bool,
    pub pages_fetched: u32,
    pub uploaded: Option<Vec<ProjectedRow>>,
    pub upload_error: Option<String>,
    pub show_upload: bool,
}

impl AnimeDataset {
    /// Mark a fetch as started. Returns false if one is already running.
    pub fn begin_fetch(&mut self) -> bool {
        if self.loading {
            return false;
        }
        self.loading = true;
        true
    }

    /// Replace the fetched rows with a fresh outcome, partial or not
    pub fn finish_fetch(&mut self, outcome: FetchOutcome) {
        self.loading = false;
        if let Some(err) = &outcome.error {
            warn!(page = err.page(), kept = outcome.records.len(), "Showing partial fetch");
        }
        self.fetched = project(&outcome.records);
        self.pages_fetched = outcome.pages_fetched;
        self.fetch_error = outcome.error;
        info!(
            rows = self.fetched.len(),
            failed = self.fetch_error.is_some(),
            "Data view updated"
        );
    }

    pub fn load_upload(&mut self, path: &Path) {
        match upload::load_csv(path) {
            Ok(rows) => {
                self.uploaded = Some(rows);
                self.upload_error = None;
                self.show_upload = true;
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Upload rejected");
                self.upload_error = Some(e.to_string());
            }
        }
    }

    /// Flip between API rows and uploaded rows; no-op until something was uploaded
    pub fn toggle_source(&mut self) {
        if self.uploaded.is_some() {
            self.show_upload = !self.show_upload;
        }
    }

    pub fn source(&self) -> RowSource {
        if self.show_upload && self.uploaded.is_some() {
            RowSource::Upload
        } else {
            RowSource::Api
        }
    }

    pub fn rows(&self) -> &[ProjectedRow] {
        match (self.source(), &self.uploaded) {
            (RowSource::Upload, Some(rows)) => rows,
            _ => &self.fetched,
        }
    }

    pub fn stats(&self) -> AnimeStats {
        AnimeStats::from_rows(self.rows())
    }
}
