use std::ops::RangeInclusive;
use std::path::PathBuf;
use std::time::Duration;

use crate::model::{PlanId, SuiteId};

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Service root (e.g. "https://dev.azure.com")
    pub base_url: String,

    /// Azure DevOps organization
    pub organization: String,

    /// Project holding the test plan
    pub project: String,

    /// Parent test plan of every extracted suite
    pub plan_id: PlanId,

    /// Test plan display name written into JSON documents
    pub plan_name: String,

    /// REST API version sent with every request
    pub api_version: String,

    /// Per-request timeout
    pub request_timeout: Duration,

    /// Pause before retrying a timed out suite
    pub retry_delay: Duration,

    /// Pause between suites, keeps us under the service rate limits
    pub suite_delay: Duration,

    /// Suites extracted when none are selected on the command line
    pub default_suites: RangeInclusive<SuiteId>,

    /// Output directory for JSON files
    pub json_dir: PathBuf,

    /// Output directory for Excel files
    pub excel_dir: PathBuf,

    /// Environment variable holding the personal access token
    pub credential_var: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "https://dev.azure.com".to_string(),
            organization: "tr-corp-tax".to_string(),
            project: "OnesourceGCR".to_string(),
            plan_id: 1410043,
            plan_name: "Corporate Tax Test Plan".to_string(),
            api_version: "7.1".to_string(),
            request_timeout: Duration::from_secs(30),
            retry_delay: Duration::from_secs(2),
            suite_delay: Duration::from_millis(100),
            default_suites: 1410044..=1410100,
            json_dir: PathBuf::from("json_output"),
            excel_dir: PathBuf::from("excel_output"),
            credential_var: "AZURE_DEVOPS_PAT".to_string(),
        }
    }
}
