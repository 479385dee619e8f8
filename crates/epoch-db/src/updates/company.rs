//! Company update builder.

use chrono::{DateTime, Utc};
use epoch_core::requests::CompanyPatch;
use serde::Serialize;

#[derive(Debug, Clone, Default, Serialize)]
pub struct CompanyUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub founded_date: Option<Option<DateTime<Utc>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry: Option<Option<String>>,
}

impl CompanyUpdate {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.domain.is_none()
            && self.founded_date.is_none()
            && self.industry.is_none()
    }
}

/// A patch only ever sets values; it cannot clear optional fields.
impl From<CompanyPatch> for CompanyUpdate {
    fn from(patch: CompanyPatch) -> Self {
        Self {
            name: patch.name,
            domain: patch.domain,
            founded_date: patch.founded_date.map(Some),
            industry: patch.industry.map(Some),
        }
    }
}

pub struct CompanyUpdateBuilder(CompanyUpdate);

impl CompanyUpdateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self(CompanyUpdate::default())
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.0.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.0.domain = Some(domain.into());
        self
    }

    #[must_use]
    pub fn founded_date(mut self, founded_date: Option<DateTime<Utc>>) -> Self {
        self.0.founded_date = Some(founded_date);
        self
    }

    #[must_use]
    pub fn industry(mut self, industry: Option<String>) -> Self {
        self.0.industry = Some(industry);
        self
    }

    #[must_use]
    pub fn build(self) -> CompanyUpdate {
        self.0
    }
}

impl Default for CompanyUpdateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
