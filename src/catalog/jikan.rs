use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::config::FetchConfig;
use crate::error::Result;

use super::{AnimeRecord, FetchError, Page, PageSource};

/// Client for a Jikan-style listing endpoint (`GET {base_url}?page={n}`)
pub struct JikanClient {
    client: Client,
    base_url: String,
    page_delay: Duration,
}

#[derive(Deserialize)]
struct JikanListing {
    data: Option<Vec<AnimeRecord>>,
    pagination: Option<JikanPagination>,
}

#[derive(Deserialize)]
struct JikanPagination {
    #[serde(default)]
    has_next_page: Option<bool>,
}

impl JikanClient {
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            page_delay: Duration::from_millis(config.page_delay_ms),
        })
    }

    fn parse_listing(page: u32, body: &str) -> std::result::Result<Page, FetchError> {
        let listing: JikanListing = match serde_json::from_str(body) {
            Ok(listing) => listing,
            Err(e) => {
                debug!(page, error = %e, "Listing body did not parse");
                return Err(FetchError::NoData { page });
            }
        };

        match listing.data {
            Some(records) if !records.is_empty() => Ok(Page {
                records,
                has_next_page: listing.pagination.and_then(|p| p.has_next_page),
            }),
            _ => Err(FetchError::NoData { page }),
        }
    }
}

#[async_trait::async_trait]
impl PageSource for JikanClient {
    async fn fetch_page(&self, page: u32) -> std::result::Result<Page, FetchError> {
        if page > 1 && !self.page_delay.is_zero() {
            tokio::time::sleep(self.page_delay).await;
        }

        debug!(url = %self.base_url, page, "Fetching listing page");

        let response = self
            .client
            .get(&self.base_url)
            .query(&[("page", page)])
            .send()
            .await
            .map_err(|e| FetchError::failed(page, None, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::failed(
                page,
                Some(status.as_u16()),
                format!("HTTP error: {}", status),
            ));
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::failed(page, Some(status.as_u16()), e.to_string()))?;

        Self::parse_listing(page, &body)
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::catalog::{StatusClass, fetch_bounded};

    fn listing(titles: &[&str], has_next: bool) -> serde_json::Value {
        let data: Vec<_> = titles
            .iter()
            .map(|t| serde_json::json!({ "title": t, "score": 7.5, "genres": [{ "name": "Drama" }] }))
            .collect();
        serde_json::json!({
            "pagination": { "last_visible_page": 3, "has_next_page": has_next },
            "data": data
        })
    }

    fn client_for(server: &MockServer) -> JikanClient {
        let config = FetchConfig {
            base_url: format!("{}/v4/anime", server.uri()),
            page_delay_ms: 0,
            request_timeout_secs: 2,
            ..FetchConfig::default()
        };
        JikanClient::new(&config).unwrap()
    }

    async fn mount_page(server: &MockServer, page: &str, template: ResponseTemplate) {
        Mock::given(method("GET"))
            .and(path("/v4/anime"))
            .and(query_param("page", page))
            .respond_with(template)
            .mount(server)
            .await;
    }

    #[test]
    fn test_parse_listing_without_data_field() {
        let err = JikanClient::parse_listing(1, r#"{"pagination": {}}"#).unwrap_err();
        assert_eq!(err, FetchError::NoData { page: 1 });
    }

    #[test]
    fn test_parse_listing_with_empty_data() {
        let err = JikanClient::parse_listing(4, r#"{"data": []}"#).unwrap_err();
        assert_eq!(err, FetchError::NoData { page: 4 });
    }

    #[test]
    fn test_parse_listing_not_json() {
        let err = JikanClient::parse_listing(2, "<html>maintenance</html>").unwrap_err();
        assert_eq!(err, FetchError::NoData { page: 2 });
    }

    #[test]
    fn test_parse_listing_reads_pagination() {
        let body = listing(&["A", "B"], false).to_string();
        let page = JikanClient::parse_listing(1, &body).unwrap();
        assert_eq!(page.records.len(), 2);
        assert_eq!(page.has_next_page, Some(false));
    }

    #[tokio::test]
    async fn test_requests_page_query_parameter() {
        let server = MockServer::start().await;
        mount_page(
            &server,
            "1",
            ResponseTemplate::new(200).set_body_json(listing(&["Monster"], true)),
        )
        .await;

        let page = client_for(&server).fetch_page(1).await.unwrap();
        assert_eq!(page.records[0].title, "Monster");
        assert_eq!(page.records[0].genres[0].name, "Drama");
    }

    #[tokio::test]
    async fn test_non_success_status_is_fetch_failed() {
        let server = MockServer::start().await;
        mount_page(&server, "1", ResponseTemplate::new(429)).await;

        let err = client_for(&server).fetch_page(1).await.unwrap_err();
        match err {
            FetchError::FetchFailed { page, status, class, .. } => {
                assert_eq!(page, 1);
                assert_eq!(status, Some(429));
                assert_eq!(class, StatusClass::RateLimited);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unreachable_server_is_transport_failure() {
        let config = FetchConfig {
            base_url: "http://127.0.0.1:9/v4/anime".to_string(),
            page_delay_ms: 0,
            request_timeout_secs: 2,
            ..FetchConfig::default()
        };
        let client = JikanClient::new(&config).unwrap();

        let err = client.fetch_page(1).await.unwrap_err();
        assert!(matches!(
            err,
            FetchError::FetchFailed { status: None, class: StatusClass::Transport, .. }
        ));
    }

    #[tokio::test]
    async fn test_bounded_fetch_against_http_server() {
        let server = MockServer::start().await;
        mount_page(
            &server,
            "1",
            ResponseTemplate::new(200).set_body_json(listing(&["A", "B", "C"], true)),
        )
        .await;
        mount_page(
            &server,
            "2",
            ResponseTemplate::new(200).set_body_json(listing(&["D", "E", "F"], true)),
        )
        .await;
        mount_page(&server, "3", ResponseTemplate::new(500)).await;

        let client = client_for(&server);
        let outcome = fetch_bounded(&client, 5).await;
        let titles: Vec<_> = outcome.records.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "B", "C", "D", "E"]);
        assert!(outcome.error.is_none());

        let outcome = fetch_bounded(&client, 10).await;
        assert_eq!(outcome.records.len(), 6);
        assert!(matches!(
            outcome.error,
            Some(FetchError::FetchFailed { page: 3, status: Some(500), .. })
        ));
    }
}
