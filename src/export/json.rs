use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use super::types::SuiteDocument;
use crate::model::SuiteId;

pub fn file_name(suite_id: SuiteId) -> String {
    format!("Suite_{}_TestCases.json", suite_id)
}

/// Write the suite document as pretty JSON into `dir`, creating it if needed
pub fn write_suite_document(document: &SuiteDocument, dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create JSON directory {}", dir.display()))?;

    let path = dir.join(file_name(document.suite.suite_id));
    let json = serde_json::to_string_pretty(document)?;
    std::fs::write(&path, json)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::types::TestPlanInfo;
    use crate::model::{NormalizedTestCase, SuiteResult};

    fn document() -> SuiteDocument {
        SuiteDocument::new(
            TestPlanInfo {
                id: 1410043,
                name: "Corporate Tax Test Plan".to_string(),
            },
            "OnesourceGCR",
            SuiteResult {
                suite_id: 1410044,
                suite_name: "Suite_1410044".to_string(),
                test_cases: vec![NormalizedTestCase {
                    test_case_id: Some(1),
                    test_case_name: "Tính thuế".to_string(),
                    number_of_steps: 4,
                    assigned_to: "Jane Doe".to_string(),
                }],
            },
            "2026-01-01T10:00:00".to_string(),
        )
    }

    #[test]
    fn test_document_layout() {
        let value = serde_json::to_value(document()).unwrap();

        assert_eq!(value["testPlan"]["id"], 1410043);
        assert_eq!(value["project"], "OnesourceGCR");
        assert_eq!(value["suite"]["suiteId"], 1410044);
        assert_eq!(value["suite"]["testCases"][0]["numberOfSteps"], 4);
        assert_eq!(value["suite"]["testCases"][0]["assignedTo"], "Jane Doe");
        assert_eq!(value["summary"]["totalTestCases"], 1);
        assert_eq!(value["summary"]["hasErrors"], false);
    }

    #[test]
    fn test_write_creates_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("nested").join("json");

        let path = write_suite_document(&document(), &dir).unwrap();

        assert_eq!(path, dir.join("Suite_1410044_TestCases.json"));
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("Tính thuế"));
        let back: SuiteDocument = serde_json::from_str(&content).unwrap();
        assert_eq!(back.suite.test_cases.len(), 1);
    }
}
