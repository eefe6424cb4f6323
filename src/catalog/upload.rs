//! CSV files as an alternative record source for the data view.

use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::{info, warn};

use crate::error::{Error, Result};

use super::Cell;
use super::projection::{
    EPISODES_PLACEHOLDER, ProjectedRow, SCORE_PLACEHOLDER, TEXT_PLACEHOLDER, YEAR_PLACEHOLDER,
};

/// Column positions found in the header row
struct Columns {
    title: usize,
    score: Option<usize>,
    genres: Option<usize>,
    year: Option<usize>,
    episodes: Option<usize>,
    kind: Option<usize>,
    status: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let find = |name: &str| headers.iter().position(|h| h.eq_ignore_ascii_case(name));

        let title = find("title")
            .ok_or_else(|| Error::MalformedUpload("missing 'Title' column".to_string()))?;

        Ok(Self {
            title,
            score: find("score"),
            genres: find("genres"),
            year: find("year"),
            episodes: find("episodes"),
            kind: find("type"),
            status: find("status"),
        })
    }
}

pub fn load_csv(path: &Path) -> Result<Vec<ProjectedRow>> {
    let file = std::fs::File::open(path).map_err(|e| {
        warn!(path = %path.display(), error = %e, "Could not open upload");
        Error::MalformedUpload(format!("cannot open {}: {}", path.display(), e))
    })?;

    let rows = parse_csv(file)?;
    info!(path = %path.display(), rows = rows.len(), "Loaded CSV upload");
    Ok(rows)
}

pub fn parse_csv<R: Read>(reader: R) -> Result<Vec<ProjectedRow>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| Error::MalformedUpload(e.to_string()))?
        .clone();
    let columns = Columns::from_headers(&headers)?;

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| Error::MalformedUpload(e.to_string()))?;
        rows.push(row_from_record(&record, &columns));
    }

    Ok(rows)
}

fn row_from_record(record: &StringRecord, columns: &Columns) -> ProjectedRow {
    let field = |idx: Option<usize>| {
        idx.and_then(|i| record.get(i))
            .filter(|s| !s.is_empty())
    };

    ProjectedRow {
        title: record.get(columns.title).unwrap_or_default().to_string(),
        score: Cell::from_option(
            field(columns.score).and_then(|s| s.parse::<f64>().ok()).filter(|v| v.is_finite()),
            SCORE_PLACEHOLDER,
        ),
        genres: field(columns.genres).unwrap_or_default().to_string(),
        year: Cell::from_option(field(columns.year).and_then(parse_whole), YEAR_PLACEHOLDER),
        episodes: Cell::from_option(
            field(columns.episodes).and_then(parse_whole),
            EPISODES_PLACEHOLDER,
        ),
        kind: field(columns.kind).unwrap_or(TEXT_PLACEHOLDER).to_string(),
        status: field(columns.status).unwrap_or(TEXT_PLACEHOLDER).to_string(),
    }
}

/// Integers, including the "1998.0" form spreadsheet exports produce
fn parse_whole<T: TryFrom<i64>>(s: &str) -> Option<T> {
    let n = match s.parse::<i64>() {
        Ok(n) => n,
        Err(_) => {
            let f = s.parse::<f64>().ok()?;
            if !f.is_finite() || f.fract() != 0.0 {
                return None;
            }
            f as i64
        }
    };
    T::try_from(n).ok()
}
