use colored::Colorize;
use std::ops::RangeInclusive;

use crate::model::SuiteId;

/// Which suites a run extracts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuiteSelection {
    /// Ids given one by one, processed in the given order
    Explicit(Vec<SuiteId>),
    /// Inclusive range
    Range { start: SuiteId, end: SuiteId },
    /// The configured default range
    Default,
}

impl SuiteSelection {
    pub fn resolve(&self, default: &RangeInclusive<SuiteId>) -> Vec<SuiteId> {
        match self {
            SuiteSelection::Explicit(ids) => ids.clone(),
            SuiteSelection::Range { start, end } => {
                if start > end {
                    println!(
                        "{} ERROR: Start suite ID ({}) must be less than or equal to end suite ID ({})",
                        "❌".red(),
                        start,
                        end
                    );
                    return Vec::new();
                }
                (*start..=*end).collect()
            }
            SuiteSelection::Default => default.clone().collect(),
        }
    }
}

/// Short description of the suites about to be processed
pub fn describe_suites(ids: &[SuiteId]) -> String {
    match ids {
        [] => "no suites".to_string(),
        [first, .., last] if ids.len() > 10 => {
            format!("{} suites: {} to {}", ids.len(), first, last)
        }
        _ => format!(
            "suites: [{}]",
            ids.iter()
                .map(|id| id.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        ),
    }
}
