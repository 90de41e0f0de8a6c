//! Azure DevOps REST client
//!
//! Thin reqwest wrapper over the test plan and work item endpoints.
//! Every request carries the Basic-auth header built from the PAT.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

use super::credential::Credential;
use super::response::{Collection, SuiteEntry};
use super::{ApiError, TestPlanApi};
use crate::model::{PlanId, SuiteId, TestCaseReference, WorkItemId, WorkItemRecord};
use crate::utils::config::Config;

/// Timeout of the token check request
const PROJECT_CHECK_TIMEOUT: Duration = Duration::from_secs(10);

/// Project info returned by the projects endpoint
#[derive(Debug, Deserialize)]
pub struct ProjectInfo {
    #[serde(default)]
    pub name: Option<String>,
}

pub struct AzureDevOpsClient {
    /// Organization root, e.g. "https://dev.azure.com/my-org"
    org_url: String,
    project: String,
    api_version: String,
    client: reqwest::Client,
}

impl AzureDevOpsClient {
    pub fn new(config: &Config, credential: &Credential) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&credential.basic_auth_header())
            .context("Credential contains characters not allowed in a header")?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            org_url: format!(
                "{}/{}",
                config.base_url.trim_end_matches('/'),
                config.organization
            ),
            project: config.project.clone(),
            api_version: config.api_version.clone(),
            client,
        })
    }

    fn suite_test_cases_url(&self, plan_id: PlanId, suite_id: SuiteId) -> String {
        format!(
            "{}/{}/_apis/testplan/Plans/{}/Suites/{}/TestCase?api-version={}",
            self.org_url, self.project, plan_id, suite_id, self.api_version
        )
    }

    fn work_items_url(&self, ids: &[WorkItemId]) -> String {
        let ids = ids
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(",");
        format!(
            "{}/_apis/wit/workitems?ids={}&$expand=all&api-version={}",
            self.org_url, ids, self.api_version
        )
    }

    fn project_url(&self) -> String {
        format!("{}/_apis/projects/{}", self.org_url, self.project)
    }

    /// GET `url` and decode a list body in either accepted shape
    async fn get_collection<T: DeserializeOwned>(
        &self,
        url: &str,
        what: String,
    ) -> Result<Vec<T>, ApiError> {
        log::debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| ApiError::from_reqwest(e, url))?;

        let body = response
            .bytes()
            .await
            .map_err(|e| ApiError::from_reqwest(e, url))?;
        log::debug!("{} bytes from {}", body.len(), url);

        Collection::<T>::from_slice(&body)?
            .into_items()
            .ok_or(ApiError::UnexpectedFormat { what })
    }

    /// Look up the configured project; used to verify the token works
    pub async fn project_info(&self) -> Result<ProjectInfo, ApiError> {
        let url = self.project_url();
        log::debug!("GET {}", url);
        let response = self
            .client
            .get(&url)
            .timeout(PROJECT_CHECK_TIMEOUT)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| ApiError::from_reqwest(e, &url))?;

        let body = response
            .bytes()
            .await
            .map_err(|e| ApiError::from_reqwest(e, &url))?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl TestPlanApi for AzureDevOpsClient {
    async fn suite_test_cases(
        &self,
        plan_id: PlanId,
        suite_id: SuiteId,
    ) -> Result<Vec<TestCaseReference>, ApiError> {
        let url = self.suite_test_cases_url(plan_id, suite_id);
        let entries: Vec<SuiteEntry> = self
            .get_collection(&url, format!("suite {}", suite_id))
            .await?;
        Ok(entries.iter().filter_map(SuiteEntry::reference).collect())
    }

    async fn work_items(&self, ids: &[WorkItemId]) -> Result<Vec<WorkItemRecord>, ApiError> {
        let url = self.work_items_url(ids);
        self.get_collection(&url, format!("work items {:?}", ids))
            .await
    }
}
