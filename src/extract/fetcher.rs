//! Two-stage suite lookup: suite listing, then batched work item details.
//!
//! Every failure degrades to an empty result so one bad suite never stops
//! a run. Timeouts get exactly one retry of the whole lookup.

use colored::Colorize;
use std::time::Duration;

use crate::client::{ApiError, TestPlanApi};
use crate::model::{PlanId, SuiteId, WorkItemId, WorkItemRecord};

/// First try plus one retry after a timeout
pub const MAX_ATTEMPTS: u32 = 2;

pub struct SuiteFetcher<'a, A: TestPlanApi + ?Sized> {
    api: &'a A,
    retry_delay: Duration,
}

impl<'a, A: TestPlanApi + ?Sized> SuiteFetcher<'a, A> {
    pub fn new(api: &'a A, retry_delay: Duration) -> Self {
        Self { api, retry_delay }
    }

    /// Fetch the work items of every test case in a suite. Never fails.
    pub async fn fetch_suite(&self, plan_id: PlanId, suite_id: SuiteId) -> Vec<WorkItemRecord> {
        for attempt in 1..=MAX_ATTEMPTS {
            log::debug!("suite {}: attempt {}/{}", suite_id, attempt, MAX_ATTEMPTS);

            let err = match self.try_fetch(plan_id, suite_id).await {
                Ok(items) => return items,
                Err(err) => err,
            };

            if attempt > 1 {
                println!(
                    "{} Retry failed for suite {}: {}",
                    "❌".red(),
                    suite_id,
                    err
                );
                return Vec::new();
            }

            match err {
                ApiError::Timeout { .. } => {
                    println!(
                        "{} Timeout for suite {} - retrying...",
                        "⏱️ ".yellow(),
                        suite_id
                    );
                    tokio::time::sleep(self.retry_delay).await;
                }
                ApiError::UnexpectedFormat { .. } => {
                    println!(
                        "{} Unexpected response format for suite {}",
                        "⚠️ ".yellow(),
                        suite_id
                    );
                    log::warn!("suite {}: {}", suite_id, err);
                    return Vec::new();
                }
                ApiError::Status { .. } | ApiError::Transport(_) => {
                    println!("{} API Error for suite {}: {}", "❌".red(), suite_id, err);
                    return Vec::new();
                }
                ApiError::Decode(_) => {
                    println!(
                        "{} Unexpected error for suite {}: {}",
                        "❌".red(),
                        suite_id,
                        err
                    );
                    return Vec::new();
                }
            }
        }

        Vec::new()
    }

    async fn try_fetch(
        &self,
        plan_id: PlanId,
        suite_id: SuiteId,
    ) -> Result<Vec<WorkItemRecord>, ApiError> {
        let references = self.api.suite_test_cases(plan_id, suite_id).await?;
        let ids: Vec<WorkItemId> = references.iter().map(|r| r.work_item_id).collect();

        if ids.is_empty() {
            log::debug!("suite {}: no test case references", suite_id);
            return Ok(Vec::new());
        }

        log::debug!("suite {}: fetching {} work items", suite_id, ids.len());
        self.api.work_items(&ids).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::mock::{timeout, ScriptedApi};
    use crate::model::WorkItemRecord;

    fn items(ids: &[WorkItemId]) -> Vec<WorkItemRecord> {
        ids.iter()
            .map(|&id| WorkItemRecord {
                id: Some(id),
                fields: Some(Default::default()),
            })
            .collect()
    }

    fn fetcher(api: &ScriptedApi) -> SuiteFetcher<'_, ScriptedApi> {
        SuiteFetcher::new(api, Duration::ZERO)
    }

    #[tokio::test]
    async fn test_fetches_listed_work_items() {
        let api = ScriptedApi::new()
            .listing_ids(&[11, 12])
            .work_items(Ok(items(&[11, 12])));

        let result = fetcher(&api).fetch_suite(1, 100).await;

        assert_eq!(result.len(), 2);
        assert_eq!(api.requested_ids(), vec![vec![11, 12]]);
    }

    #[tokio::test]
    async fn test_empty_suite_skips_work_item_call() {
        let api = ScriptedApi::new().listing_ids(&[]);

        let result = fetcher(&api).fetch_suite(1, 100).await;

        assert!(result.is_empty());
        assert_eq!(api.listing_calls(), 1);
        assert_eq!(api.work_item_calls(), 0);
    }

    #[tokio::test]
    async fn test_single_timeout_then_success() {
        let api = ScriptedApi::new()
            .listing(Err(timeout()))
            .listing_ids(&[7])
            .work_items(Ok(items(&[7])));

        let result = fetcher(&api).fetch_suite(1, 100).await;

        assert_eq!(result.len(), 1);
        assert_eq!(api.listing_calls(), 2);
        assert_eq!(api.work_item_calls(), 1);
    }

    #[tokio::test]
    async fn test_timeout_on_work_items_retries_whole_lookup() {
        let api = ScriptedApi::new()
            .listing_ids(&[7])
            .work_items(Err(timeout()))
            .listing_ids(&[7])
            .work_items(Ok(items(&[7])));

        let result = fetcher(&api).fetch_suite(1, 100).await;

        assert_eq!(result.len(), 1);
        assert_eq!(api.listing_calls(), 2);
        assert_eq!(api.work_item_calls(), 2);
    }

    #[tokio::test]
    async fn test_two_timeouts_give_empty_result() {
        let api = ScriptedApi::new()
            .listing(Err(timeout()))
            .listing(Err(timeout()))
            .listing_ids(&[7]);

        let result = fetcher(&api).fetch_suite(1, 100).await;

        assert!(result.is_empty());
        assert_eq!(api.listing_calls(), MAX_ATTEMPTS as usize);
        assert_eq!(api.work_item_calls(), 0);
    }

    #[tokio::test]
    async fn test_status_error_after_timeout_gives_empty_result() {
        let api = ScriptedApi::new()
            .listing(Err(timeout()))
            .listing(Err(ApiError::Status {
                status: 503,
                url: "mock://suite".to_string(),
            }))
            .listing_ids(&[7]);

        let result = fetcher(&api).fetch_suite(1, 100).await;

        assert!(result.is_empty());
        assert_eq!(api.listing_calls(), 2);
        assert_eq!(api.work_item_calls(), 0);
    }

    #[tokio::test]
    async fn test_http_error_is_not_retried() {
        let api = ScriptedApi::new().listing(Err(ApiError::Status {
            status: 401,
            url: "mock://suite".to_string(),
        }));

        let result = fetcher(&api).fetch_suite(1, 100).await;

        assert!(result.is_empty());
        assert_eq!(api.listing_calls(), 1);
    }

    #[tokio::test]
    async fn test_unexpected_format_is_empty() {
        let api = ScriptedApi::new().listing_ids(&[3]).work_items(Err(
            ApiError::UnexpectedFormat {
                what: "work items".to_string(),
            },
        ));

        let result = fetcher(&api).fetch_suite(1, 100).await;

        assert!(result.is_empty());
        assert_eq!(api.work_item_calls(), 1);
        assert_eq!(api.listing_calls(), 1);
    }
}
