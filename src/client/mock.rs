//! Scripted in-memory [`TestPlanApi`] for tests

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use super::{ApiError, TestPlanApi};
use crate::model::{PlanId, SuiteId, TestCaseReference, WorkItemId, WorkItemRecord};

/// Answers calls from queued results in order; an empty queue answers with an empty list.
#[derive(Default)]
pub struct ScriptedApi {
    listings: Mutex<VecDeque<Result<Vec<TestCaseReference>, ApiError>>>,
    work_items: Mutex<VecDeque<Result<Vec<WorkItemRecord>, ApiError>>>,
    listing_calls: AtomicUsize,
    work_item_calls: AtomicUsize,
    requested_ids: Mutex<Vec<Vec<WorkItemId>>>,
}

impl ScriptedApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn listing(self, result: Result<Vec<TestCaseReference>, ApiError>) -> Self {
        self.listings.lock().unwrap().push_back(result);
        self
    }

    pub fn listing_ids(self, ids: &[WorkItemId]) -> Self {
        let refs = ids
            .iter()
            .map(|&work_item_id| TestCaseReference { work_item_id })
            .collect();
        self.listing(Ok(refs))
    }

    pub fn work_items(self, result: Result<Vec<WorkItemRecord>, ApiError>) -> Self {
        self.work_items.lock().unwrap().push_back(result);
        self
    }

    pub fn listing_calls(&self) -> usize {
        self.listing_calls.load(Ordering::SeqCst)
    }

    pub fn work_item_calls(&self) -> usize {
        self.work_item_calls.load(Ordering::SeqCst)
    }

    pub fn requested_ids(&self) -> Vec<Vec<WorkItemId>> {
        self.requested_ids.lock().unwrap().clone()
    }
}

pub fn timeout() -> ApiError {
    ApiError::Timeout {
        url: "mock://timeout".to_string(),
    }
}

#[async_trait]
impl TestPlanApi for ScriptedApi {
    async fn suite_test_cases(
        &self,
        _plan_id: PlanId,
        _suite_id: SuiteId,
    ) -> Result<Vec<TestCaseReference>, ApiError> {
        self.listing_calls.fetch_add(1, Ordering::SeqCst);
        let next = self.listings.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn work_items(&self, ids: &[WorkItemId]) -> Result<Vec<WorkItemRecord>, ApiError> {
        self.work_item_calls.fetch_add(1, Ordering::SeqCst);
        self.requested_ids.lock().unwrap().push(ids.to_vec());
        let next = self.work_items.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Ok(Vec::new()))
    }
}
