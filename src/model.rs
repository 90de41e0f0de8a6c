use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Suite identifier within the configured test plan
pub type SuiteId = u64;

/// Test plan identifier (fixed per run)
pub type PlanId = u64;

/// Work item identifier
pub type WorkItemId = i64;

/// Reference to a test case work item, as listed by a suite
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TestCaseReference {
    pub work_item_id: WorkItemId,
}

/// Raw work item record as returned by the work item endpoint.
///
/// Every field is optional so that any JSON object decodes, `"id": null`
/// included; records without `fields` are dropped during normalization.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorkItemRecord {
    #[serde(default)]
    pub id: Option<WorkItemId>,
    #[serde(default)]
    pub fields: Option<Map<String, Value>>,
}

impl WorkItemRecord {
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.as_ref().and_then(|f| f.get(name))
    }
}

/// Fixed four-field view of a test case work item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedTestCase {
    /// `null` in JSON when the record carried no id
    pub test_case_id: Option<WorkItemId>,
    pub test_case_name: String,
    pub number_of_steps: usize,
    pub assigned_to: String,
}

/// Normalized contents of one suite
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuiteResult {
    pub suite_id: SuiteId,
    pub suite_name: String,
    pub test_cases: Vec<NormalizedTestCase>,
}

impl SuiteResult {
    /// Suites carry no name in the listing response, so one is derived from the id.
    pub fn default_name(suite_id: SuiteId) -> String {
        format!("Suite_{}", suite_id)
    }
}
