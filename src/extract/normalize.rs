use serde_json::Value;

use super::steps::count_steps;
use crate::model::{NormalizedTestCase, SuiteId, SuiteResult, WorkItemRecord};

pub const TITLE_FIELD: &str = "System.Title";
pub const STEPS_FIELD: &str = "Microsoft.VSTS.TCM.Steps";
pub const ASSIGNED_TO_FIELD: &str = "System.AssignedTo";

/// Normalize one work item. Records without a `fields` map yield `None`.
pub fn normalize_work_item(record: &WorkItemRecord) -> Option<NormalizedTestCase> {
    let fields = record.fields.as_ref()?;

    let test_case_name = fields
        .get(TITLE_FIELD)
        .map(value_to_string)
        .unwrap_or_default();
    let steps = fields.get(STEPS_FIELD).and_then(Value::as_str);

    Some(NormalizedTestCase {
        test_case_id: record.id,
        test_case_name,
        number_of_steps: count_steps(steps),
        assigned_to: assignee_name(fields.get(ASSIGNED_TO_FIELD)),
    })
}

/// Normalize all records, keeping input order and dropping those without fields
pub fn normalize_work_items(records: &[WorkItemRecord]) -> Vec<NormalizedTestCase> {
    records.iter().filter_map(normalize_work_item).collect()
}

pub fn build_suite_result(suite_id: SuiteId, records: &[WorkItemRecord]) -> SuiteResult {
    SuiteResult {
        suite_id,
        suite_name: SuiteResult::default_name(suite_id),
        test_cases: normalize_work_items(records),
    }
}

/// Display name of the assignee.
///
/// The field is an identity object (`displayName`), a plain string, or
/// absent. "Jane Doe <jane@x.com>" is cut down to "Jane Doe".
pub fn assignee_name(value: Option<&Value>) -> String {
    let name = match value {
        Some(Value::Object(identity)) => identity
            .get("displayName")
            .map(value_to_string)
            .unwrap_or_default(),
        Some(Value::Null) | None => String::new(),
        Some(other) => value_to_string(other),
    };

    match name.split_once('<') {
        Some((display, _)) => display.trim().to_string(),
        None => name,
    }
}

fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
