//! Request bodies for create and update operations.
//!
//! Shared by the HTTP server (deserialize), the API client (serialize) and the
//! store (typed inputs). Dates accept `YYYY-MM-DD` or RFC 3339.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::dates::flexible;
use crate::entities::MetricValue;
use crate::enums::{MilestoneType, SourceType};
use crate::errors::CoreError;

fn require(field: &str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::Validation(format!("{field} is required")));
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewCompany {
    pub name: String,
    pub domain: String,
    #[serde(default, deserialize_with = "flexible::option::deserialize")]
    pub founded_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub industry: Option<String>,
}

impl NewCompany {
    /// # Errors
    ///
    /// Returns `CoreError::Validation` when `name` or `domain` is blank.
    pub fn validate(&self) -> Result<(), CoreError> {
        require("name", &self.name)?;
        require("domain", &self.domain)
    }
}

/// Partial company update; absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CompanyPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "flexible::option::deserialize"
    )]
    pub founded_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
}

impl CompanyPatch {
    /// # Errors
    ///
    /// Returns `CoreError::Validation` when a provided `name` or `domain` is blank.
    pub fn validate(&self) -> Result<(), CoreError> {
        if let Some(name) = &self.name {
            require("name", name)?;
        }
        if let Some(domain) = &self.domain {
            require("domain", domain)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewSnapshot {
    pub company_id: String,
    #[serde(deserialize_with = "flexible::deserialize")]
    pub snapshot_date: DateTime<Utc>,
    #[serde(default)]
    pub wayback_url: Option<String>,
    #[serde(default)]
    pub screenshot_url: Option<String>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub is_major_change: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewMilestone {
    pub company_id: String,
    #[serde(deserialize_with = "flexible::deserialize")]
    pub milestone_date: DateTime<Utc>,
    #[serde(rename = "type")]
    pub milestone_type: MilestoneType,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub metrics: Option<BTreeMap<String, MetricValue>>,
}

impl NewMilestone {
    /// # Errors
    ///
    /// Returns `CoreError::Validation` when `title` is blank.
    pub fn validate(&self) -> Result<(), CoreError> {
        require("title", &self.title)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewSource {
    #[serde(rename = "type")]
    pub source_type: SourceType,
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub publisher: Option<String>,
    #[serde(default, deserialize_with = "flexible::option::deserialize")]
    pub publish_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub excerpt: Option<String>,
}

impl NewSource {
    /// # Errors
    ///
    /// Returns `CoreError::Validation` when `title` or `url` is blank.
    pub fn validate(&self) -> Result<(), CoreError> {
        require("title", &self.title)?;
        require("url", &self.url)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewCommentary {
    #[serde(default)]
    pub commentary_text: Option<String>,
    #[serde(default)]
    pub design_notes: Option<String>,
    #[serde(default)]
    pub business_context: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Partial commentary update; absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CommentaryPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commentary_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub design_notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_context: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewDesignAnalysis {
    #[serde(default)]
    pub primary_colors: Vec<String>,
    #[serde(default)]
    pub fonts: Vec<String>,
    #[serde(default)]
    pub layout_type: Option<String>,
    #[serde(default)]
    pub has_mobile_version: Option<bool>,
    #[serde(default)]
    pub page_weight_kb: Option<i64>,
}
