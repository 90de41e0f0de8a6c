use serde::{Deserialize, Serialize};

use crate::model::{PlanId, SuiteId, SuiteResult};

/// Test plan descriptor written at the top of each suite document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestPlanInfo {
    pub id: PlanId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuiteSummary {
    pub total_test_cases: usize,
    pub suite_id: SuiteId,
    pub generated_at: String,
    /// Always false: fetch failures are not tracked per suite.
    pub has_errors: bool,
}

/// JSON document written per suite
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuiteDocument {
    pub test_plan: TestPlanInfo,
    pub project: String,
    pub suite: SuiteResult,
    pub summary: SuiteSummary,
}

impl SuiteDocument {
    pub fn new(plan: TestPlanInfo, project: &str, suite: SuiteResult, generated_at: String) -> Self {
        let summary = SuiteSummary {
            total_test_cases: suite.test_cases.len(),
            suite_id: suite.suite_id,
            generated_at,
            has_errors: false,
        };
        Self {
            test_plan: plan,
            project: project.to_string(),
            suite,
            summary,
        }
    }
}
