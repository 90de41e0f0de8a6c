pub mod selection;

use anyhow::Result;
use colored::Colorize;
use std::time::Duration;

use crate::client::TestPlanApi;
use crate::export::SuiteExporter;
use crate::extract::{build_suite_result, SuiteFetcher};
use crate::model::{PlanId, SuiteId};
use crate::utils::config::Config;

pub use selection::{describe_suites, SuiteSelection};

/// Counters accumulated over one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub processed_count: usize,
    pub error_count: usize,
    pub total_test_cases: usize,
}

/// Timing and plan settings for a run
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub plan_id: PlanId,
    pub retry_delay: Duration,
    pub suite_delay: Duration,
}

impl From<&Config> for RunOptions {
    fn from(config: &Config) -> Self {
        Self {
            plan_id: config.plan_id,
            retry_delay: config.retry_delay,
            suite_delay: config.suite_delay,
        }
    }
}

/// Fetch, normalize and export every suite in order.
///
/// A failing suite is counted and skipped; the run always reaches the end.
pub async fn run_extraction<A: TestPlanApi + ?Sized>(
    api: &A,
    exporter: &SuiteExporter,
    options: &RunOptions,
    suite_ids: &[SuiteId],
) -> RunSummary {
    let fetcher = SuiteFetcher::new(api, options.retry_delay);
    let mut summary = RunSummary::default();

    for &suite_id in suite_ids {
        println!("Processing suite {}...", suite_id);

        match process_suite(&fetcher, exporter, options.plan_id, suite_id).await {
            Ok(test_cases) => {
                summary.processed_count += 1;
                summary.total_test_cases += test_cases;
                tokio::time::sleep(options.suite_delay).await;
            }
            Err(e) => {
                println!(
                    "  {} Error processing suite {}: {:#}",
                    "❌".red(),
                    suite_id,
                    e
                );
                summary.error_count += 1;
            }
        }
    }

    summary
}

/// Returns the number of test cases exported
async fn process_suite<A: TestPlanApi + ?Sized>(
    fetcher: &SuiteFetcher<'_, A>,
    exporter: &SuiteExporter,
    plan_id: PlanId,
    suite_id: SuiteId,
) -> Result<usize> {
    let work_items = fetcher.fetch_suite(plan_id, suite_id).await;

    if work_items.is_empty() {
        println!(
            "  {} No test cases found for suite {}",
            "⚠️ ".yellow(),
            suite_id
        );
    } else {
        println!(
            "  {} Retrieved {} work items from API",
            "✓".green(),
            work_items.len()
        );
    }

    let suite = build_suite_result(suite_id, &work_items);
    if suite.test_cases.len() < work_items.len() {
        log::debug!(
            "suite {}: {} work items without fields skipped",
            suite_id,
            work_items.len() - suite.test_cases.len()
        );
    }

    exporter.export_json(&suite)?;
    exporter.export_spreadsheet(&suite);

    Ok(suite.test_cases.len())
}

pub fn print_summary(summary: &RunSummary, exporter: &SuiteExporter) {
    let rule = "=".repeat(50);
    println!("\n{}", rule);
    println!("{}", "EXTRACTION SUMMARY:".bold());
    println!("Total Suites Processed: {}", summary.processed_count);
    println!("Total Errors: {}", summary.error_count);
    println!("Total Test Cases Extracted: {}", summary.total_test_cases);
    println!(
        "JSON Output Directory: {}",
        exporter.config().json_dir.display()
    );
    if exporter.spreadsheets_enabled() {
        println!(
            "Excel Output Directory: {}",
            exporter.config().excel_dir.display()
        );
    }
    println!("{}", rule);

    if summary.total_test_cases > 0 {
        println!(
            "{} SUCCESS: test case data extracted to JSON{}",
            "🎉".green(),
            if exporter.spreadsheets_enabled() {
                " and Excel"
            } else {
                ""
            }
        );
    } else {
        println!(
            "{} No test cases found - check permissions and suite IDs",
            "⚠️ ".yellow()
        );
    }
}
