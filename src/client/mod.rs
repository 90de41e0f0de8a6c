//! Remote test plan API access
//!
//! The extraction pipeline only talks to the remote service through
//! [`TestPlanApi`], which returns canonical sequences. Response-shape
//! leniency lives in [`response::Collection`], authentication in
//! [`credential::Credential`].

pub mod azure;
pub mod credential;
pub mod response;

#[cfg(test)]
pub mod mock;

use crate::model::{PlanId, SuiteId, TestCaseReference, WorkItemId, WorkItemRecord};
use async_trait::async_trait;
use thiserror::Error;

pub use azure::AzureDevOpsClient;
pub use credential::{Credential, CredentialError};

/// Failure of a single remote call
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request timed out: {url}")]
    Timeout { url: String },

    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("unexpected response format for {what}")]
    UnexpectedFormat { what: String },

    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, ApiError::Timeout { .. })
    }

    /// Classify a reqwest failure, keeping timeouts distinct from other transport errors
    pub fn from_reqwest(err: reqwest::Error, url: &str) -> Self {
        if err.is_timeout() {
            ApiError::Timeout {
                url: url.to_string(),
            }
        } else if let Some(status) = err.status() {
            ApiError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            }
        } else {
            ApiError::Transport(err)
        }
    }
}

/// The two lookups a suite extraction needs
#[async_trait]
pub trait TestPlanApi: Send + Sync {
    /// List the test case references of a suite
    async fn suite_test_cases(
        &self,
        plan_id: PlanId,
        suite_id: SuiteId,
    ) -> Result<Vec<TestCaseReference>, ApiError>;

    /// Batch-fetch full work item records, all fields expanded
    async fn work_items(&self, ids: &[WorkItemId]) -> Result<Vec<WorkItemRecord>, ApiError>;
}
