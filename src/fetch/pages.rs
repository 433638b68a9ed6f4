//! Paginated record fetching.
//!
//! Pages are requested in order until the source signals the end: an empty
//! page, a page shorter than the requested size, or any transport-level
//! failure. Records accumulated before a failure are kept; the failing page
//! is discarded and nothing is retried.

use reqwest::header::{ACCEPT, HeaderValue};
use reqwest::{Method, Request, Url};
use serde_json::Value;
use tracing::{debug, warn};

use crate::fetch::client::HttpClient;

/// Query shape for one line of pagination.
#[derive(Debug, Clone)]
pub struct PageQuery {
    /// Filter predicate, passed through as the `q` parameter.
    pub filter: Option<String>,
    /// Comma-separated field projection.
    pub projection: Option<String>,
    pub page_size: usize,
}

/// Fetches every page of `endpoint`, returning the accumulated records.
pub async fn fetch_all_pages<C: HttpClient>(
    client: &C,
    endpoint: &Url,
    query: &PageQuery,
) -> Vec<Value> {
    let mut records = Vec::new();

    for page in 1u32.. {
        let mut url = endpoint.clone();
        {
            let mut pairs = url.query_pairs_mut();
            if let Some(filter) = &query.filter {
                pairs.append_pair("q", filter);
            }
            if let Some(projection) = &query.projection {
                pairs.append_pair("projection", projection);
            }
            pairs.append_pair("page", &page.to_string());
            pairs.append_pair("pagesize", &query.page_size.to_string());
        }

        let mut req = Request::new(Method::GET, url);
        req.headers_mut()
            .insert(ACCEPT, HeaderValue::from_static("application/json"));

        let resp = match client.execute(req).await {
            Ok(resp) => resp,
            Err(e) => {
                warn!(page, error = %e, "page request failed, keeping records fetched so far");
                break;
            }
        };

        if !resp.status().is_success() {
            warn!(page, status = %resp.status(), "page request rejected, keeping records fetched so far");
            break;
        }

        let body: Value = match resp.json().await {
            Ok(body) => body,
            Err(e) => {
                warn!(page, error = %e, "page body was not valid JSON, keeping records fetched so far");
                break;
            }
        };

        let page_records = records_from_body(body);
        debug!(page, count = page_records.len(), "page received");

        if page_records.is_empty() {
            break;
        }

        let last_page = page_records.len() < query.page_size;
        records.extend(page_records);
        if last_page {
            break;
        }
    }

    records
}

/// Extracts the record list from a page body.
///
/// Sources disagree on the envelope, so the checks run in a fixed order: a
/// top-level array, then the `record`, `data`, and `items` keys, then the
/// first key holding an array.
pub fn records_from_body(body: Value) -> Vec<Value> {
    match body {
        Value::Array(records) => records,
        Value::Object(mut map) => {
            for key in ["record", "data", "items"] {
                if matches!(map.get(key), Some(Value::Array(_))) {
                    if let Some(Value::Array(records)) = map.remove(key) {
                        return records;
                    }
                }
            }
            map.into_iter()
                .find_map(|(_, value)| match value {
                    Value::Array(records) => Some(records),
                    _ => None,
                })
                .unwrap_or_default()
        }
        _ => Vec::new(),
    }
}
