//! Zotero web API client.
//!
//! Pages through `/users/{id}/publications/items` 100 items at a time,
//! using the `Total-Results` response header to know when to stop.
//!
//! API Details:
//! - Auth: `Zotero-API-Key` header
//! - Paging: `start` offset and `limit` (max 100)
//! - Total count: `Total-Results` header on every page

use crate::config::ZoteroConfig;
use crate::error::{Result, ZoterError};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info};

/// Maximum items per page (Zotero limit)
pub const PAGE_LIMIT: usize = 100;

/// Header reporting the total number of items for the query
const TOTAL_RESULTS_HEADER: &str = "Total-Results";

/// Item type tag for journal articles
pub const JOURNAL_ARTICLE: &str = "journalArticle";

/// A single Zotero item as returned by the API.
///
/// Only the fields the report needs are typed; everything else is kept in
/// `extra` so the cache file holds the record exactly as fetched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Publication {
    pub data: PublicationData,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The `data` object of a Zotero item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicationData {
    #[serde(rename = "itemType", default)]
    pub item_type: String,
    /// Free-text date ("2020-05-01", "May 2020", "")
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub creators: Vec<Creator>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A contributor on a Zotero item
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Creator {
    #[serde(rename = "creatorType", default, skip_serializing_if = "Option::is_none")]
    pub creator_type: Option<String>,
    #[serde(rename = "firstName", default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(rename = "lastName", default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// Single-field name, used by Zotero for institutions and mononyms
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Publication {
    pub fn is_journal_article(&self) -> bool {
        self.data.item_type == JOURNAL_ARTICLE
    }
}

impl Creator {
    /// Raw `(last, first)` pair; a single-field `name` becomes the last name.
    pub fn name_parts(&self) -> (&str, &str) {
        match (&self.last_name, &self.name) {
            (Some(last), _) => (last.as_str(), self.first_name.as_deref().unwrap_or("")),
            (None, Some(name)) => (name.as_str(), ""),
            (None, None) => ("", self.first_name.as_deref().unwrap_or("")),
        }
    }
}

/// Authenticated session against the Zotero API.
///
/// The underlying connection pool lives as long as the client and is
/// released when it is dropped.
pub struct ZoteroClient {
    client: Client,
    config: ZoteroConfig,
}

impl ZoteroClient {
    /// Create a new ZoteroClient
    pub fn new(config: ZoteroConfig) -> Result<Self> {
        if config.user_id.trim().is_empty() || config.api_key.trim().is_empty() {
            return Err(ZoterError::Config(
                "Zotero user id and API key are required".to_string(),
            ));
        }

        let mut headers = reqwest::header::HeaderMap::new();
        let key = reqwest::header::HeaderValue::from_str(&config.api_key)
            .map_err(|e| ZoterError::Config(format!("Invalid API key: {}", e)))?;
        headers.insert("Zotero-API-Key", key);
        headers.insert(
            "Zotero-API-Version",
            reqwest::header::HeaderValue::from_static("3"),
        );

        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| ZoterError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    fn publications_url(&self) -> String {
        format!(
            "{}/users/{}/publications/items",
            self.config.base_url, self.config.user_id
        )
    }

    /// Fetch every item in the user's "My Publications" list, in API order.
    ///
    /// Fails on the first transport or status error; no partial result is
    /// returned.
    pub async fn fetch_all_publications(&self) -> Result<Vec<Publication>> {
        let url = self.publications_url();
        let mut items: Vec<Publication> = Vec::new();
        let mut total: Option<usize> = None;

        while total.map_or(true, |t| items.len() < t) {
            let start = items.len();
            let (page, page_total) = self.fetch_page(&url, start).await?;

            if page.is_empty() && start < page_total {
                return Err(ZoterError::Pagination(format!(
                    "empty page at start = {} with {} = {}",
                    start, TOTAL_RESULTS_HEADER, page_total
                )));
            }

            items.extend(page);
            total = Some(page_total);
            debug!(start = items.len(), total = page_total, "Fetched Zotero page");
        }

        info!(items = items.len(), "Zotero fetch complete");
        Ok(items)
    }

    /// Fetch one page, returning its items and the reported total.
    async fn fetch_page(&self, url: &str, start: usize) -> Result<(Vec<Publication>, usize)> {
        let response = self
            .client
            .get(url)
            .query(&[("start", start), ("limit", PAGE_LIMIT)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ZoterError::Api {
                code: status.as_u16(),
                message: format!("Zotero API error: {}", status),
            });
        }

        let total = parse_total(response.headers())?;
        let page: Vec<Publication> = response.json().await?;
        Ok((page, total))
    }
}

/// Read the `Total-Results` header as a non-negative count.
fn parse_total(headers: &reqwest::header::HeaderMap) -> Result<usize> {
    let raw = headers
        .get(TOTAL_RESULTS_HEADER)
        .ok_or_else(|| ZoterError::Pagination(format!("missing {} header", TOTAL_RESULTS_HEADER)))?;

    raw.to_str()
        .ok()
        .and_then(|s| s.trim().parse::<usize>().ok())
        .ok_or_else(|| {
            ZoterError::Pagination(format!("invalid {} header: {:?}", TOTAL_RESULTS_HEADER, raw))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use serde_json::json;

    fn item(n: usize) -> Value {
        json!({
            "key": format!("K{:04}", n),
            "version": 1,
            "data": {
                "itemType": "journalArticle",
                "title": format!("Paper {}", n),
                "date": "2021-03-01",
                "creators": [{"creatorType": "author", "firstName": "Ada", "lastName": "Lovelace"}]
            }
        })
    }

    fn page_body(range: std::ops::Range<usize>) -> String {
        Value::Array(range.map(item).collect()).to_string()
    }

    fn client_for(server: &Server) -> ZoteroClient {
        let config = ZoteroConfig::new("42", "secret").with_base_url(server.url());
        ZoteroClient::new(config).expect("client")
    }

    #[tokio::test]
    async fn test_paginates_until_total() {
        let mut server = Server::new_async().await;
        let mut mocks = Vec::new();
        for (start, end) in [(0, 100), (100, 200), (200, 250)] {
            let mock = server
                .mock("GET", "/users/42/publications/items")
                .match_header("zotero-api-key", "secret")
                .match_query(Matcher::AllOf(vec![
                    Matcher::UrlEncoded("start".into(), start.to_string()),
                    Matcher::UrlEncoded("limit".into(), "100".into()),
                ]))
                .with_status(200)
                .with_header("content-type", "application/json")
                .with_header("Total-Results", "250")
                .with_body(page_body(start..end))
                .expect(1)
                .create_async()
                .await;
            mocks.push(mock);
        }

        let items = client_for(&server).fetch_all_publications().await.expect("fetch");

        assert_eq!(items.len(), 250);
        assert_eq!(items[0].extra["key"], "K0000");
        assert_eq!(items[249].extra["key"], "K0249");
        for mock in &mocks {
            mock.assert_async().await;
        }
    }

    #[tokio::test]
    async fn test_zero_total_makes_single_request() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/users/42/publications/items")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("Total-Results", "0")
            .with_body("[]")
            .expect(1)
            .create_async()
            .await;

        let items = client_for(&server).fetch_all_publications().await.expect("fetch");
        assert!(items.is_empty());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_empty_page_before_total_fails() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/users/42/publications/items")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("Total-Results", "10")
            .with_body("[]")
            .expect(1)
            .create_async()
            .await;

        let err = client_for(&server).fetch_all_publications().await.unwrap_err();
        assert!(matches!(err, ZoterError::Pagination(_)));
    }

    #[tokio::test]
    async fn test_missing_total_header_fails() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/users/42/publications/items")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(page_body(0..3))
            .create_async()
            .await;

        let err = client_for(&server).fetch_all_publications().await.unwrap_err();
        assert!(matches!(err, ZoterError::Pagination(msg) if msg.contains("missing")));
    }

    #[tokio::test]
    async fn test_forbidden_surfaces_as_api_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/users/42/publications/items")
            .match_query(Matcher::Any)
            .with_status(403)
            .with_body("Forbidden")
            .create_async()
            .await;

        let err = client_for(&server).fetch_all_publications().await.unwrap_err();
        assert!(matches!(err, ZoterError::Api { code: 403, .. }));
    }

    #[tokio::test]
    async fn test_failure_mid_pagination_returns_no_items() {
        let mut server = Server::new_async().await;
        let _first = server
            .mock("GET", "/users/42/publications/items")
            .match_query(Matcher::UrlEncoded("start".into(), "0".into()))
            .with_status(200)
            .with_header("Total-Results", "150")
            .with_body(page_body(0..100))
            .create_async()
            .await;
        let _second = server
            .mock("GET", "/users/42/publications/items")
            .match_query(Matcher::UrlEncoded("start".into(), "100".into()))
            .with_status(500)
            .create_async()
            .await;

        let result = client_for(&server).fetch_all_publications().await;
        assert!(matches!(result, Err(ZoterError::Api { code: 500, .. })));
    }

    #[test]
    fn test_missing_credentials_rejected() {
        let err = ZoteroClient::new(ZoteroConfig::new("", "key")).err();
        assert!(matches!(err, Some(ZoterError::Config(_))));
    }

    #[test]
    fn test_creator_name_parts() {
        let person = Creator {
            first_name: Some("Ada".into()),
            last_name: Some("Lovelace".into()),
            ..Default::default()
        };
        assert_eq!(person.name_parts(), ("Lovelace", "Ada"));

        let single = Creator {
            name: Some("CERN".into()),
            ..Default::default()
        };
        assert_eq!(single.name_parts(), ("CERN", ""));
    }

    #[test]
    fn test_publication_keeps_unknown_fields() {
        let raw = item(7);
        let publication: Publication = serde_json::from_value(raw.clone()).expect("parse");
        assert!(publication.is_journal_article());
        assert_eq!(publication.data.extra["title"], "Paper 7");
        assert_eq!(serde_json::to_value(&publication).expect("serialize"), raw);
    }
}
