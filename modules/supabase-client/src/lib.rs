//! Thin client for the hosted backend: PostgREST table queries plus the
//! GoTrue identity endpoints.
//!
//! Only the contract the ingredient layer needs is covered: select, equality
//! and null-check predicates, case-insensitive substring (`ilike`) combinable
//! with OR, order-by with nulls-last, offset+limit ranges, and exact counts.

pub mod auth;
pub mod error;
pub mod types;

pub use auth::{AuthClient, OAuthProvider};
pub use error::{Result, StoreError};
pub use types::{AuthUser, Direction, Rows, Session};

use serde::de::DeserializeOwned;
use url::Url;

use types::ApiErrorBody;

const REST_PATH: &str = "rest/v1";

/// Client handle. Cheap to clone; the underlying HTTP client is pooled.
#[derive(Debug, Clone)]
pub struct SupabaseClient {
    http: reqwest::Client,
    base_url: Url,
    api_key: String,
}

impl SupabaseClient {
    pub fn new(base_url: &str, api_key: impl Into<String>) -> Result<Self> {
        Ok(Self {
            http: reqwest::Client::new(),
            base_url: Url::parse(base_url)?,
            api_key: api_key.into(),
        })
    }

    /// Start a query against `table`.
    pub fn from(&self, table: &str) -> TableQuery {
        TableQuery {
            http: self.http.clone(),
            base_url: self.base_url.clone(),
            api_key: self.api_key.clone(),
            table: table.to_string(),
            params: vec![("select".to_string(), "*".to_string())],
            range: None,
            count_exact: false,
        }
    }

    /// Identity endpoints (sign-in/sign-up/sign-out/current user).
    pub fn auth(&self) -> AuthClient {
        AuthClient::new(self.http.clone(), self.base_url.clone(), self.api_key.clone())
    }
}

/// Builder for one PostgREST table query.
#[derive(Debug, Clone)]
pub struct TableQuery {
    http: reqwest::Client,
    base_url: Url,
    api_key: String,
    table: String,
    params: Vec<(String, String)>,
    range: Option<(usize, usize)>,
    count_exact: bool,
}

impl TableQuery {
    /// Restrict returned columns (defaults to all).
    pub fn select(mut self, columns: &str) -> Self {
        self.params
            .retain(|(key, _)| key != "select");
        self.params
            .insert(0, ("select".to_string(), columns.to_string()));
        self
    }

    /// Equality predicate.
    pub fn eq(mut self, column: &str, value: &str) -> Self {
        self.params
            .push((column.to_string(), format!("eq.{value}")));
        self
    }

    /// Keep rows where `column` is not null.
    pub fn not_null(mut self, column: &str) -> Self {
        self.params
            .push((column.to_string(), "not.is.null".to_string()));
        self
    }

    /// Case-insensitive substring predicate.
    pub fn ilike(mut self, column: &str, term: &str) -> Self {
        self.params
            .push((column.to_string(), format!("ilike.*{term}*")));
        self
    }

    /// OR-combined case-insensitive substring match over several columns.
    pub fn ilike_any(mut self, columns: &[&str], term: &str) -> Self {
        let clauses: Vec<String> = columns
            .iter()
            .map(|column| format!("{column}.ilike.*{term}*"))
            .collect();
        self.params
            .push(("or".to_string(), format!("({})", clauses.join(","))));
        self
    }

    /// Order by a column. `nulls_last` maps to PostgREST's `nullslast`.
    /// Repeated calls build one comma-joined clause; PostgREST only honors a
    /// single `order` parameter, later columns break ties among earlier ones.
    pub fn order(mut self, column: &str, direction: Direction, nulls_last: bool) -> Self {
        let mut clause = format!("{column}.{}", direction.as_str());
        if nulls_last {
            clause.push_str(".nullslast");
        }
        match self.params.iter_mut().find(|(key, _)| key == "order") {
            Some((_, existing)) => {
                existing.push(',');
                existing.push_str(&clause);
            }
            None => self.params.push(("order".to_string(), clause)),
        }
        self
    }

    /// Offset+limit slice, sent as a `Range` header.
    pub fn range(mut self, offset: usize, limit: usize) -> Self {
        self.range = Some((offset, limit));
        self
    }

    /// Ask the store for an exact total alongside the rows.
    pub fn count_exact(mut self) -> Self {
        self.count_exact = true;
        self
    }

    /// Execute and decode the rows.
    pub async fn fetch<T: DeserializeOwned>(self) -> Result<Rows<T>> {
        let url = self.build_url()?;
        let mut request = self
            .http
            .get(url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key);

        if let Some((offset, limit)) = self.range {
            let end = offset + limit.saturating_sub(1);
            request = request.header("Range", format!("{offset}-{end}"));
        }
        if self.count_exact {
            request = request.header("Prefer", "count=exact");
        }

        let resp = request.send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(api_error(status.as_u16(), body));
        }

        let total = resp
            .headers()
            .get("content-range")
            .and_then(|v| v.to_str().ok())
            .and_then(parse_content_range_total);

        let rows: Vec<T> = resp.json().await?;
        tracing::debug!(table = %self.table, count = rows.len(), "Fetched rows");
        Ok(Rows { rows, total })
    }

    /// Execute in count-only mode: no rows transferred, exact total returned.
    pub async fn count(self) -> Result<u64> {
        let url = self.build_url()?;
        let resp = self
            .http
            .head(url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header("Prefer", "count=exact")
            .header("Range", "0-0")
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(api_error(status.as_u16(), body));
        }

        resp.headers()
            .get("content-range")
            .and_then(|v| v.to_str().ok())
            .and_then(parse_content_range_total)
            .ok_or_else(|| {
                StoreError::Decode("count response missing Content-Range total".to_string())
            })
    }

    fn build_url(&self) -> Result<Url> {
        let mut url = self
            .base_url
            .join(&format!("{REST_PATH}/{}", self.table))?;
        for (key, value) in &self.params {
            url.query_pairs_mut().append_pair(key, value);
        }
        Ok(url)
    }

    #[cfg(test)]
    fn params(&self) -> &[(String, String)] {
        &self.params
    }
}

/// Parse the total out of a `Content-Range` header ("0-24/3573" or "*/3573").
fn parse_content_range_total(header: &str) -> Option<u64> {
    header.rsplit('/').next()?.parse().ok()
}

pub(crate) fn api_error(status: u16, body: String) -> StoreError {
    // PostgREST/GoTrue put a human-readable message in the JSON body; fall
    // back to the raw text when it is not JSON.
    let message = serde_json::from_str::<ApiErrorBody>(&body)
        .ok()
        .and_then(|parsed| parsed.message)
        .unwrap_or(body);
    StoreError::Api { status, message }
}
