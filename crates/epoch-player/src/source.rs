//! Where the viewer gets its companies and timelines from.

use std::future::Future;
use std::sync::Arc;

use epoch_core::entities::Company;
use epoch_core::query::TimelineQuery;
use epoch_core::timeline::TimelineData;
use epoch_db::service::EpochService;

use crate::client::{ApiClient, TimelineParams};
use crate::error::ClientError;

/// Loads data for the viewer. Implemented over HTTP and over a local store.
pub trait TimelineSource: Send + Sync {
    fn list_companies(&self) -> impl Future<Output = Result<Vec<Company>, ClientError>> + Send;

    fn fetch_timeline(
        &self,
        company_id: &str,
    ) -> impl Future<Output = Result<TimelineData, ClientError>> + Send;
}

impl TimelineSource for ApiClient {
    async fn list_companies(&self) -> Result<Vec<Company>, ClientError> {
        Self::list_companies(self).await
    }

    async fn fetch_timeline(&self, company_id: &str) -> Result<TimelineData, ClientError> {
        self.get_timeline(company_id, &TimelineParams::default()).await
    }
}

/// Reads straight from an [`EpochService`], bypassing HTTP.
#[derive(Clone)]
pub struct StoreSource {
    service: Arc<EpochService>,
    query: TimelineQuery,
}

impl StoreSource {
    #[must_use]
    pub const fn new(service: Arc<EpochService>, query: TimelineQuery) -> Self {
        Self { service, query }
    }
}

impl TimelineSource for StoreSource {
    async fn list_companies(&self) -> Result<Vec<Company>, ClientError> {
        Ok(self.service.list_companies().await?)
    }

    async fn fetch_timeline(&self, company_id: &str) -> Result<TimelineData, ClientError> {
        Ok(self.service.get_timeline(company_id, &self.query).await?)
    }
}

/// An [`ApiClient`] with fixed timeline filters.
#[derive(Clone)]
pub struct RemoteSource {
    client: ApiClient,
    params: TimelineParams,
}

impl RemoteSource {
    #[must_use]
    pub const fn new(client: ApiClient, params: TimelineParams) -> Self {
        Self { client, params }
    }
}

impl TimelineSource for RemoteSource {
    async fn list_companies(&self) -> Result<Vec<Company>, ClientError> {
        self.client.list_companies().await
    }

    async fn fetch_timeline(&self, company_id: &str) -> Result<TimelineData, ClientError> {
        self.client.get_timeline(company_id, &self.params).await
    }
}
