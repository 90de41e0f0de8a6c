pub mod json;
pub mod types;
#[cfg(feature = "xlsx")]
pub mod xlsx;

use anyhow::Result;
use chrono::Local;
use colored::Colorize;
use std::path::PathBuf;

use crate::model::SuiteResult;
use crate::utils::config::Config;
use types::{SuiteDocument, TestPlanInfo};

/// Whether this build can write Excel workbooks
pub fn spreadsheet_supported() -> bool {
    cfg!(feature = "xlsx")
}

/// Output settings, fixed for the whole run
#[derive(Debug, Clone)]
pub struct ExportConfig {
    pub json_dir: PathBuf,
    pub excel_dir: PathBuf,
    /// Write a workbook next to every JSON file
    pub spreadsheets: bool,
    pub plan: TestPlanInfo,
    pub project: String,
}

impl ExportConfig {
    pub fn from_config(config: &Config, spreadsheets: bool) -> Self {
        Self {
            json_dir: config.json_dir.clone(),
            excel_dir: config.excel_dir.clone(),
            spreadsheets: spreadsheets && spreadsheet_supported(),
            plan: TestPlanInfo {
                id: config.plan_id,
                name: config.plan_name.clone(),
            },
            project: config.project.clone(),
        }
    }
}

/// Persists normalized suites as JSON and, if enabled, as workbooks
pub struct SuiteExporter {
    config: ExportConfig,
}

impl SuiteExporter {
    pub fn new(config: ExportConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    pub fn spreadsheets_enabled(&self) -> bool {
        self.config.spreadsheets
    }

    /// Write `Suite_<id>_TestCases.json`
    pub fn export_json(&self, suite: &SuiteResult) -> Result<PathBuf> {
        let generated_at = Local::now().format("%Y-%m-%dT%H:%M:%S%.6f").to_string();
        let document = SuiteDocument::new(
            self.config.plan.clone(),
            &self.config.project,
            suite.clone(),
            generated_at,
        );

        let path = json::write_suite_document(&document, &self.config.json_dir)?;
        println!(
            "{} Created JSON: {} with {} test cases",
            "✓".green(),
            json::file_name(suite.suite_id),
            suite.test_cases.len()
        );
        Ok(path)
    }

    /// Write the suite workbook. Failures are reported and swallowed.
    pub fn export_spreadsheet(&self, suite: &SuiteResult) -> Option<PathBuf> {
        if !self.config.spreadsheets {
            return None;
        }

        match self.write_spreadsheet(suite) {
            Ok(Some(path)) => {
                println!(
                    "{} Created Excel: {} with {} test cases",
                    "✓".green(),
                    path.file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_default(),
                    suite.test_cases.len()
                );
                Some(path)
            }
            Ok(None) => None,
            Err(e) => {
                println!(
                    "{} Error creating Excel file for suite {}: {:#}",
                    "❌".red(),
                    suite.suite_id,
                    e
                );
                None
            }
        }
    }

    #[cfg(feature = "xlsx")]
    fn write_spreadsheet(&self, suite: &SuiteResult) -> Result<Option<PathBuf>> {
        let generated_at = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        xlsx::write_suite_workbook(suite, &self.config.excel_dir, &generated_at).map(Some)
    }

    #[cfg(not(feature = "xlsx"))]
    fn write_spreadsheet(&self, _suite: &SuiteResult) -> Result<Option<PathBuf>> {
        Ok(None)
    }
}
