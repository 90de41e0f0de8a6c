use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::model::{TestCaseReference, WorkItemId};

/// List-shaped response body.
///
/// The service usually wraps lists as `{"count": n, "value": [...]}` but some
/// endpoints answer with a bare array. Anything else is kept as `Unexpected`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Collection<T> {
    Wrapped { value: Vec<T> },
    Bare(Vec<T>),
    Unexpected(Value),
}

impl<T: DeserializeOwned> Collection<T> {
    pub fn from_slice(body: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(body)
    }

    /// The items, or `None` when the body had neither accepted shape
    pub fn into_items(self) -> Option<Vec<T>> {
        match self {
            Collection::Wrapped { value } => Some(value),
            Collection::Bare(items) => Some(items),
            Collection::Unexpected(_) => None,
        }
    }
}

/// Entry of the suite test case listing. Only the work item id is used.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuiteEntry {
    #[serde(default)]
    pub work_item: Option<WorkItemLink>,
}

#[derive(Debug, Deserialize)]
pub struct WorkItemLink {
    #[serde(default)]
    pub id: Option<WorkItemId>,
}

impl SuiteEntry {
    pub fn reference(&self) -> Option<TestCaseReference> {
        self.work_item
            .as_ref()
            .and_then(|w| w.id)
            .map(|work_item_id| TestCaseReference { work_item_id })
    }
}
