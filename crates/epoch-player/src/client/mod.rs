//! HTTP client for the Epoch API.

mod http;

use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use epoch_config::ClientConfig;
use epoch_core::entities::{Commentary, Company, CompanyDetail, Snapshot, Source};
use epoch_core::pagination::SnapshotPage;
use epoch_core::requests::{CommentaryPatch, CompanyPatch, NewCommentary, NewCompany, NewSnapshot, NewSource};
use epoch_core::responses::HealthResponse;
use epoch_core::timeline::TimelineData;
use serde::Serialize;
use serde::de::DeserializeOwned;

pub use self::http::check_response;
use crate::error::ClientError;

/// Optional filters for `GET /api/timeline/{id}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimelineParams {
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub limit: Option<u32>,
}

/// Optional filters for `GET /api/timeline/{id}/snapshots`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SnapshotPageParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub major_changes_only: bool,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

#[derive(Default)]
struct QueryString(Vec<String>);

impl QueryString {
    fn push(&mut self, key: &str, value: impl ToString) {
        self.0
            .push(format!("{key}={}", urlencoding::encode(&value.to_string())));
    }

    fn push_opt(&mut self, key: &str, value: Option<impl ToString>) {
        if let Some(value) = value {
            self.push(key, value);
        }
    }

    fn push_date(&mut self, key: &str, value: Option<DateTime<Utc>>) {
        self.push_opt(key, value.map(|d| d.to_rfc3339_opts(SecondsFormat::Millis, true)));
    }

    fn finish(self) -> String {
        if self.0.is_empty() {
            String::new()
        } else {
            format!("?{}", self.0.join("&"))
        }
    }
}

impl TimelineParams {
    fn query_string(&self) -> String {
        let mut q = QueryString::default();
        q.push_date("startDate", self.start_date);
        q.push_date("endDate", self.end_date);
        q.push_opt("limit", self.limit);
        q.finish()
    }
}

impl SnapshotPageParams {
    fn query_string(&self) -> String {
        let mut q = QueryString::default();
        q.push_opt("page", self.page);
        q.push_opt("limit", self.limit);
        if self.major_changes_only {
            q.push("majorChangesOnly", "true");
        }
        q.push_date("startDate", self.start_date);
        q.push_date("endDate", self.end_date);
        q.finish()
    }
}

/// Typed access to every Epoch endpoint.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    /// Server root, without a trailing slash.
    base_url: String,
}

impl ApiClient {
    /// Build a client for the server at `config.api_url`.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::InvalidUrl` for a URL that is not `http(s)://`,
    /// or `ClientError::Http` if the TLS backend cannot be initialised.
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let base_url = config.api_url.trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ClientError::InvalidUrl {
                url: config.api_url.clone(),
                reason: "expected an http:// or https:// URL".to_string(),
            });
        }
        let http = reqwest::Client::builder()
            .user_agent(concat!("epoch/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { http, base_url })
    }

    /// The underlying HTTP client, sharing this client's timeout.
    #[must_use]
    pub fn http_client(&self) -> reqwest::Client {
        self.http.clone()
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn api(&self, path: &str) -> String {
        format!("{}/api{path}", self.base_url)
    }

    async fn get<T: DeserializeOwned>(&self, url: String) -> Result<T, ClientError> {
        tracing::debug!(%url, "GET");
        let resp = check_response(self.http.get(&url).send().await?).await?;
        Ok(resp.json().await?)
    }

    async fn post<B: Serialize + Sync, T: DeserializeOwned>(&self, url: String, body: &B) -> Result<T, ClientError> {
        tracing::debug!(%url, "POST");
        let resp = check_response(self.http.post(&url).json(body).send().await?).await?;
        Ok(resp.json().await?)
    }

    async fn put<B: Serialize + Sync, T: DeserializeOwned>(&self, url: String, body: &B) -> Result<T, ClientError> {
        tracing::debug!(%url, "PUT");
        let resp = check_response(self.http.put(&url).json(body).send().await?).await?;
        Ok(resp.json().await?)
    }

    // ── Health ─────────────────────────────────────────────────────────

    /// # Errors
    ///
    /// Returns [`ClientError`] if the server is unreachable or unhealthy.
    pub async fn health(&self) -> Result<HealthResponse, ClientError> {
        self.get(format!("{}/health", self.base_url)).await
    }

    // ── Companies ──────────────────────────────────────────────────────

    /// # Errors
    ///
    /// Returns [`ClientError`] on transport failure or a non-success status.
    pub async fn list_companies(&self) -> Result<Vec<Company>, ClientError> {
        self.get(self.api("/companies")).await
    }

    /// # Errors
    ///
    /// Returns `ClientError::Status` with status 404 for an unknown id.
    pub async fn get_company(&self, id: &str) -> Result<CompanyDetail, ClientError> {
        self.get(self.api(&format!("/companies/{}", urlencoding::encode(id))))
            .await
    }

    /// # Errors
    ///
    /// Returns `ClientError::Status` with status 400 for a blank name or domain.
    pub async fn create_company(&self, input: &NewCompany) -> Result<Company, ClientError> {
        self.post(self.api("/companies"), input).await
    }

    /// # Errors
    ///
    /// Returns `ClientError::Status` with status 404 for an unknown id.
    pub async fn update_company(&self, id: &str, patch: &CompanyPatch) -> Result<Company, ClientError> {
        self.put(self.api(&format!("/companies/{}", urlencoding::encode(id))), patch)
            .await
    }

    // ── Timeline ───────────────────────────────────────────────────────

    /// # Errors
    ///
    /// Returns `ClientError::Status` with status 400 for rejected parameters.
    pub async fn get_timeline(
        &self,
        company_id: &str,
        params: &TimelineParams,
    ) -> Result<TimelineData, ClientError> {
        self.get(self.api(&format!(
            "/timeline/{}{}",
            urlencoding::encode(company_id),
            params.query_string()
        )))
        .await
    }

    /// # Errors
    ///
    /// Returns `ClientError::Status` with status 400 for rejected parameters.
    pub async fn list_snapshots(
        &self,
        company_id: &str,
        params: &SnapshotPageParams,
    ) -> Result<SnapshotPage, ClientError> {
        self.get(self.api(&format!(
            "/timeline/{}/snapshots{}",
            urlencoding::encode(company_id),
            params.query_string()
        )))
        .await
    }

    // ── Snapshots ──────────────────────────────────────────────────────

    /// # Errors
    ///
    /// Returns `ClientError::Status` with status 404 for an unknown id.
    pub async fn get_snapshot(&self, id: &str) -> Result<Snapshot, ClientError> {
        self.get(self.api(&format!("/snapshots/{}", urlencoding::encode(id))))
            .await
    }

    /// # Errors
    ///
    /// Returns `ClientError::Status` with status 404 for an unknown company.
    pub async fn create_snapshot(&self, input: &NewSnapshot) -> Result<Snapshot, ClientError> {
        self.post(self.api("/snapshots"), input).await
    }

    /// # Errors
    ///
    /// Returns `ClientError::Status` with status 404 for an unknown snapshot.
    pub async fn create_source(&self, snapshot_id: &str, input: &NewSource) -> Result<Source, ClientError> {
        self.post(
            self.api(&format!("/snapshots/{}/sources", urlencoding::encode(snapshot_id))),
            input,
        )
        .await
    }

    /// # Errors
    ///
    /// Returns `ClientError::Status` with status 404 for an unknown snapshot.
    pub async fn create_commentary(
        &self,
        snapshot_id: &str,
        input: &NewCommentary,
    ) -> Result<Commentary, ClientError> {
        self.post(
            self.api(&format!("/snapshots/{}/commentary", urlencoding::encode(snapshot_id))),
            input,
        )
        .await
    }

    /// # Errors
    ///
    /// Returns `ClientError::Status` with status 404 when the commentary is
    /// not on that snapshot.
    pub async fn update_commentary(
        &self,
        snapshot_id: &str,
        commentary_id: &str,
        patch: &CommentaryPatch,
    ) -> Result<Commentary, ClientError> {
        self.put(
            self.api(&format!(
                "/snapshots/{}/commentary/{}",
                urlencoding::encode(snapshot_id),
                urlencoding::encode(commentary_id)
            )),
            patch,
        )
        .await
    }
}
