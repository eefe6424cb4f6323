//! Bounded pagination: pull pages from a [`PageSource`] until enough records are in hand.
//!
//! Fail-fast. The first failing page ends the fetch and whatever came before it is kept.
//! Nothing is retried.

use tracing::{debug, info, warn};

use super::{AnimeRecord, FetchError, PageSource};

#[derive(Debug, Clone, Default)]
pub struct FetchOutcome {
    /// Records in page order, never more than the requested target
    pub records: Vec<AnimeRecord>,
    /// Set only when the fetch stopped on a failing page
    pub error: Option<FetchError>,
    pub pages_fetched: u32,
}

impl FetchOutcome {
    pub fn is_complete(&self) -> bool {
        self.error.is_none()
    }
}

/// Fetch pages 1, 2, ... from `source` until `target_count` records are collected,
/// the source runs out, or a page fails.
///
/// Whole pages are appended before the threshold check, so the last page may overshoot;
/// the overshoot is truncated away at the end. A page with no records ends the fetch as
/// [`FetchError::NoData`], whatever the source says about later pages.
pub async fn fetch_bounded<S>(source: &S, target_count: usize) -> FetchOutcome
where
    S: PageSource + ?Sized,
{
    let mut accumulated: Vec<AnimeRecord> = Vec::new();
    let mut page: u32 = 1;
    let mut pages_fetched = 0;
    let mut error = None;

    while accumulated.len() < target_count {
        debug!(page, have = accumulated.len(), target = target_count, "Requesting page");

        match source.fetch_page(page).await {
            Ok(batch) if batch.records.is_empty() => {
                warn!(page, kept = accumulated.len(), "Page came back without records");
                error = Some(FetchError::NoData { page });
                break;
            }
            Ok(batch) => {
                pages_fetched += 1;
                let exhausted = batch.has_next_page == Some(false);
                accumulated.extend(batch.records);

                if accumulated.len() >= target_count {
                    break;
                }
                if exhausted {
                    info!(page, count = accumulated.len(), "Source exhausted before target");
                    break;
                }
                page += 1;
            }
            Err(e) => {
                warn!(page, error = %e, kept = accumulated.len(), "Fetch stopped early");
                error = Some(e);
                break;
            }
        }
    }

    accumulated.truncate(target_count);
    info!(
        count = accumulated.len(),
        pages = pages_fetched,
        failed = error.is_some(),
        "Fetch finished"
    );

    FetchOutcome {
        records: accumulated,
        error,
        pages_fetched,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::catalog::Page;

    enum Scripted {
        Records(usize),
        Last(usize),
        Fail(u16),
        Empty,
        /// A successful response that carries no records
        NoRecords,
    }

    /// Serves pages from a script and remembers which pages were asked for
    struct ScriptedSource {
        script: Vec<Scripted>,
        requested: Mutex<Vec<u32>>,
    }

    impl ScriptedSource {
        fn new(script: Vec<Scripted>) -> Self {
            Self {
                script,
                requested: Mutex::new(Vec::new()),
            }
        }

        fn requested(&self) -> Vec<u32> {
            self.requested.lock().unwrap().clone()
        }
    }

    fn records_for(page: u32, count: usize) -> Vec<AnimeRecord> {
        (0..count)
            .map(|i| AnimeRecord::titled(format!("p{}-{}", page, i)))
            .collect()
    }

    #[async_trait::async_trait]
    impl PageSource for ScriptedSource {
        async fn fetch_page(&self, page: u32) -> Result<Page, FetchError> {
            self.requested.lock().unwrap().push(page);
            match self.script.get(page as usize - 1) {
                Some(Scripted::Records(n)) => Ok(Page {
                    records: records_for(page, *n),
                    has_next_page: Some(true),
                }),
                Some(Scripted::Last(n)) => Ok(Page {
                    records: records_for(page, *n),
                    has_next_page: Some(false),
                }),
                Some(Scripted::NoRecords) => Ok(Page {
                    records: Vec::new(),
                    has_next_page: Some(true),
                }),
                Some(Scripted::Fail(status)) => {
                    Err(FetchError::failed(page, Some(*status), format!("HTTP {}", status)))
                }
                Some(Scripted::Empty) | None => Err(FetchError::NoData { page }),
            }
        }
    }

    fn titles(outcome: &FetchOutcome) -> Vec<String> {
        outcome.records.iter().map(|r| r.title.clone()).collect()
    }

    #[tokio::test]
    async fn test_overshoot_is_truncated_to_target() {
        let source = ScriptedSource::new(vec![
            Scripted::Records(50),
            Scripted::Records(50),
            Scripted::Records(50),
        ]);
        // 120 needs three pages of 50; page 3 overshoots to 150
        let outcome = fetch_bounded(&source, 120).await;

        assert!(outcome.is_complete());
        assert_eq!(outcome.records.len(), 120);
        assert_eq!(outcome.pages_fetched, 3);
        assert_eq!(source.requested(), vec![1, 2, 3]);
        assert_eq!(outcome.records[119].title, "p3-19");
    }

    #[tokio::test]
    async fn test_exact_threshold_stops_without_extra_request() {
        let source = ScriptedSource::new(vec![
            Scripted::Records(50),
            Scripted::Records(50),
            Scripted::Records(50),
        ]);
        let outcome = fetch_bounded(&source, 100).await;

        assert!(outcome.error.is_none());
        assert_eq!(outcome.records.len(), 100);
        assert_eq!(source.requested(), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_records_keep_page_order() {
        let source = ScriptedSource::new(vec![
            Scripted::Records(2),
            Scripted::Records(3),
            Scripted::Records(2),
        ]);
        let outcome = fetch_bounded(&source, 6).await;

        assert_eq!(
            titles(&outcome),
            vec!["p1-0", "p1-1", "p2-0", "p2-1", "p2-2", "p3-0"]
        );
    }

    #[tokio::test]
    async fn test_server_error_keeps_earlier_pages() {
        let source = ScriptedSource::new(vec![Scripted::Records(50), Scripted::Fail(500)]);
        let outcome = fetch_bounded(&source, 100).await;

        assert_eq!(outcome.records.len(), 50);
        assert!(titles(&outcome).iter().all(|t| t.starts_with("p1-")));
        assert!(matches!(
            outcome.error,
            Some(FetchError::FetchFailed { page: 2, status: Some(500), .. })
        ));
    }

    #[tokio::test]
    async fn test_failure_stops_further_requests() {
        let source = ScriptedSource::new(vec![
            Scripted::Records(10),
            Scripted::Fail(429),
            Scripted::Records(10),
            Scripted::Records(10),
        ]);
        let outcome = fetch_bounded(&source, 100).await;

        assert_eq!(source.requested(), vec![1, 2]);
        assert_eq!(outcome.records.len(), 10);
        assert_eq!(outcome.pages_fetched, 1);
    }

    #[tokio::test]
    async fn test_missing_data_on_first_page() {
        let source = ScriptedSource::new(vec![Scripted::Empty]);
        let outcome = fetch_bounded(&source, 100).await;

        assert!(outcome.records.is_empty());
        assert_eq!(outcome.error, Some(FetchError::NoData { page: 1 }));
        assert_eq!(source.requested(), vec![1]);
    }

    #[tokio::test]
    async fn test_missing_data_mid_fetch_keeps_partial() {
        let source = ScriptedSource::new(vec![
            Scripted::Records(25),
            Scripted::Records(25),
            Scripted::Empty,
        ]);
        let outcome = fetch_bounded(&source, 100).await;

        assert_eq!(outcome.records.len(), 50);
        assert_eq!(outcome.error, Some(FetchError::NoData { page: 3 }));
    }

    #[tokio::test]
    async fn test_empty_successful_page_is_no_data() {
        let source = ScriptedSource::new(vec![
            Scripted::Records(5),
            Scripted::NoRecords,
            Scripted::Records(5),
        ]);
        let outcome = tokio::time::timeout(
            std::time::Duration::from_secs(2),
            fetch_bounded(&source, 100),
        )
        .await
        .expect("fetch should stop on an empty page");

        assert_eq!(outcome.records.len(), 5);
        assert_eq!(outcome.error, Some(FetchError::NoData { page: 2 }));
        assert_eq!(outcome.pages_fetched, 1);
        assert_eq!(source.requested(), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_exhausted_source_is_not_an_error() {
        let source = ScriptedSource::new(vec![Scripted::Records(30), Scripted::Last(12)]);
        let outcome = fetch_bounded(&source, 100).await;

        assert!(outcome.is_complete());
        assert_eq!(outcome.records.len(), 42);
        assert_eq!(source.requested(), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_never_more_than_target_for_any_page_sizes() {
        for sizes in [vec![7, 7, 7], vec![1, 99, 3], vec![100], vec![33, 33, 33, 33]] {
            for target in [1, 5, 50, 99, 100, 150] {
                let script = sizes.iter().map(|n| Scripted::Records(*n)).collect();
                let source = ScriptedSource::new(script);
                let outcome = fetch_bounded(&source, target).await;

                let available: usize = sizes.iter().sum();
                assert_eq!(outcome.records.len(), target.min(available));
            }
        }
    }

    #[tokio::test]
    async fn test_zero_target_makes_no_requests() {
        let source = ScriptedSource::new(vec![Scripted::Records(10)]);
        let outcome = fetch_bounded(&source, 0).await;

        assert!(outcome.records.is_empty());
        assert!(outcome.error.is_none());
        assert!(source.requested().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_can_run_again_after_failure() {
        let failing = ScriptedSource::new(vec![Scripted::Fail(503)]);
        let first = fetch_bounded(&failing, 10).await;
        assert!(first.error.is_some());

        let healthy = ScriptedSource::new(vec![Scripted::Records(10)]);
        let second = fetch_bounded(&healthy, 10).await;
        assert!(second.is_complete());
        assert_eq!(second.records.len(), 10);
    }
}
