use std::fmt;

use super::AnimeRecord;

pub const SCORE_PLACEHOLDER: &str = "N/A";
pub const YEAR_PLACEHOLDER: &str = "Unknown";
pub const EPISODES_PLACEHOLDER: &str = "N/A";
pub const TEXT_PLACEHOLDER: &str = "N/A";

/// A table cell that is either a real value or a display-only placeholder.
/// Placeholders never take part in aggregates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cell<T> {
    Value(T),
    Placeholder(&'static str),
}

impl<T> Cell<T> {
    pub fn from_option(value: Option<T>, placeholder: &'static str) -> Self {
        match value {
            Some(v) => Cell::Value(v),
            None => Cell::Placeholder(placeholder),
        }
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Cell::Value(v) => Some(v),
            Cell::Placeholder(_) => None,
        }
    }
}

impl<T: fmt::Display> fmt::Display for Cell<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Value(v) => v.fmt(f),
            Cell::Placeholder(p) => f.write_str(p),
        }
    }
}

/// Display-ready form of an [`AnimeRecord`]
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedRow {
    pub title: String,
    pub score: Cell<f64>,
    pub genres: String,
    pub year: Cell<i32>,
    pub episodes: Cell<u32>,
    pub kind: String,
    pub status: String,
}

impl ProjectedRow {
    pub fn from_record(record: &AnimeRecord) -> Self {
        Self {
            title: record.title.clone(),
            score: Cell::from_option(record.score, SCORE_PLACEHOLDER),
            genres: record
                .genres
                .iter()
                .map(|g| g.name.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            year: Cell::from_option(record.year, YEAR_PLACEHOLDER),
            episodes: Cell::from_option(record.episodes, EPISODES_PLACEHOLDER),
            kind: text_or_placeholder(record.kind.as_deref()),
            status: text_or_placeholder(record.status.as_deref()),
        }
    }
}

fn text_or_placeholder(value: Option<&str>) -> String {
    value.unwrap_or(TEXT_PLACEHOLDER).to_string()
}

/// Project records into table rows, one row per record, same order
pub fn project(records: &[AnimeRecord]) -> Vec<ProjectedRow> {
    records.iter().map(ProjectedRow::from_record).collect()
}

/// Summary metrics over the genuine (non-placeholder) values of a table
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AnimeStats {
    pub mean_score: Option<f64>,
    pub oldest_year: Option<i32>,
    pub mean_episodes: Option<f64>,
}

impl AnimeStats {
    pub fn from_rows(rows: &[ProjectedRow]) -> Self {
        Self {
            mean_score: mean(rows.iter().filter_map(|r| r.score.value().copied())),
            oldest_year: rows.iter().filter_map(|r| r.year.value().copied()).min(),
            mean_episodes: mean(
                rows.iter()
                    .filter_map(|r| r.episodes.value().map(|e| f64::from(*e))),
            ),
        }
    }
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Genre;

    fn record(title: &str, score: Option<f64>, year: Option<i32>, episodes: Option<u32>) -> AnimeRecord {
        AnimeRecord {
            score,
            year,
            episodes,
            ..AnimeRecord::titled(title)
        }
    }

    #[test]
    fn test_placeholders_for_missing_fields() {
        let row = ProjectedRow::from_record(&AnimeRecord::titled("Bare"));
        assert_eq!(row.score.to_string(), "N/A");
        assert_eq!(row.year.to_string(), "Unknown");
        assert_eq!(row.episodes.to_string(), "N/A");
        assert_eq!(row.kind, "N/A");
        assert_eq!(row.status, "N/A");
        assert_eq!(row.genres, "");
    }

    #[test]
    fn test_present_values_pass_through() {
        let rec = AnimeRecord {
            genres: vec![
                Genre { name: "Action".into() },
                Genre { name: "Award Winning".into() },
                Genre { name: "Sci-Fi".into() },
            ],
            kind: Some("TV".into()),
            status: Some("Finished Airing".into()),
            ..record("Cowboy Bebop", Some(8.751), Some(1998), Some(26))
        };
        let row = ProjectedRow::from_record(&rec);
        assert_eq!(row.score, Cell::Value(8.751));
        assert_eq!(row.year, Cell::Value(1998));
        assert_eq!(row.episodes, Cell::Value(26));
        assert_eq!(row.genres, "Action, Award Winning, Sci-Fi");
        assert_eq!(row.kind, "TV");
        assert_eq!(row.status, "Finished Airing");
    }

    #[test]
    fn test_project_preserves_order_and_input() {
        let records = vec![
            record("First", Some(7.0), None, None),
            record("Second", None, Some(2001), None),
            record("Third", None, None, Some(12)),
        ];
        let snapshot = records.clone();

        let once = project(&records);
        let twice = project(&records);

        assert_eq!(once, twice);
        assert_eq!(records, snapshot);
        let titles: Vec<_> = once.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["First", "Second", "Third"]);
    }

    #[test]
    fn test_mean_score_ignores_missing_scores() {
        let rows = project(&[
            record("a", Some(8.0), None, None),
            record("b", None, None, None),
            record("c", Some(6.0), None, None),
            record("d", None, None, None),
            record("e", Some(7.0), None, None),
        ]);
        let stats = AnimeStats::from_rows(&rows);
        assert_eq!(stats.mean_score, Some(7.0));
    }

    #[test]
    fn test_oldest_year_and_mean_episodes() {
        let rows = project(&[
            record("a", None, Some(2010), Some(12)),
            record("b", None, Some(1998), None),
            record("c", None, None, Some(25)),
        ]);
        let stats = AnimeStats::from_rows(&rows);
        assert_eq!(stats.oldest_year, Some(1998));
        assert_eq!(stats.mean_episodes, Some(18.5));
    }

    #[test]
    fn test_stats_empty_when_nothing_genuine() {
        let rows = project(&[AnimeRecord::titled("x"), AnimeRecord::titled("y")]);
        assert_eq!(AnimeStats::from_rows(&rows), AnimeStats::default());
        assert_eq!(AnimeStats::from_rows(&[]), AnimeStats::default());
    }
}
