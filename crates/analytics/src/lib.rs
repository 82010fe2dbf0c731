//! DevFolio Analytics client for Rust
//!
//! Aggregated view counts for the signed-in user's portfolio and projects,
//! and the anonymous tracking calls made when a public page is opened.

use chrono::NaiveDate;
use devfolio_auth::{ApiClient, ApiRequest, MessageResponse};
use log::debug;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub use devfolio_auth::{ApiError, Result};

/// Window used when none is given
pub const DEFAULT_DAYS: u32 = 30;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DayCount {
    pub date: NaiveDate,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReferrerCount {
    pub referrer: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DeviceCount {
    pub device_type: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BrowserCount {
    pub browser: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CountryCount {
    pub country: String,
    pub count: u64,
}

/// Portfolio traffic over the requested window
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct Overview {
    #[serde(default)]
    pub total_views: u64,
    #[serde(default)]
    pub unique_visitors: u64,
    #[serde(default)]
    pub views_by_day: Vec<DayCount>,
    #[serde(default)]
    pub top_referrers: Vec<ReferrerCount>,
    #[serde(default)]
    pub device_breakdown: Vec<DeviceCount>,
    #[serde(default)]
    pub browser_breakdown: Vec<BrowserCount>,
    #[serde(default)]
    pub country_breakdown: Vec<CountryCount>,
}

/// Views of one project, most viewed first.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProjectStat {
    pub project_id: i64,
    pub project_title: String,
    pub project_slug: String,
    pub views: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PortfolioVisit {
    pub username: String,
    pub page_url: String,
    pub referrer: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectVisit {
    pub project_slug: String,
    pub referrer: String,
}

/// Analytics client
#[derive(Debug, Clone)]
pub struct AnalyticsClient {
    api: Arc<ApiClient>,
}

impl AnalyticsClient {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    /// Portfolio traffic for the last `days` days. 404 when the user has no
    /// portfolio yet.
    pub async fn overview(&self, days: u32) -> Result<Overview> {
        let request = ApiRequest::get("/analytics/overview/").query("days", days);
        self.api.execute(request).await
    }

    pub async fn projects(&self, days: u32) -> Result<Vec<ProjectStat>> {
        let request = ApiRequest::get("/analytics/projects/").query("days", days);
        self.api.execute_list(request).await
    }

    /// Record a visit of a public portfolio page.
    pub async fn track_portfolio(&self, visit: &PortfolioVisit) -> Result<String> {
        debug!("Tracking portfolio view of {}", visit.username);
        let request = ApiRequest::post("/analytics/track/portfolio/")
            .anonymous()
            .json(visit)?;
        let response: MessageResponse = self.api.execute(request).await?;
        Ok(response.message)
    }

    pub async fn track_project(&self, visit: &ProjectVisit) -> Result<String> {
        debug!("Tracking project view of {}", visit.project_slug);
        let request = ApiRequest::post("/analytics/track/project/")
            .anonymous()
            .json(visit)?;
        let response: MessageResponse = self.api.execute(request).await?;
        Ok(response.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overview_decodes_server_payload() {
        let overview: Overview = serde_json::from_str(
            r#"{
                "total_views": 12,
                "unique_visitors": 5,
                "views_by_day": [{"date": "2024-03-01", "count": 7}],
                "top_referrers": [{"referrer": "https://news.ycombinator.com", "count": 3}],
                "device_breakdown": [{"device_type": "desktop", "count": 10}],
                "browser_breakdown": [{"browser": "Firefox", "count": 9}],
                "country_breakdown": []
            }"#,
        )
        .unwrap();
        assert_eq!(overview.total_views, 12);
        assert_eq!(
            overview.views_by_day[0].date,
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
        );
        assert_eq!(overview.device_breakdown[0].device_type, "desktop");
    }
}
