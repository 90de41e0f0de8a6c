use regex::Regex;
use std::sync::OnceLock;

/// Marker opening each manual step in the steps field markup
pub const STEP_MARKER: &str = "<step id=";

fn step_regex() -> &'static Regex {
    static STEP_RE: OnceLock<Regex> = OnceLock::new();
    STEP_RE.get_or_init(|| Regex::new(&regex::escape(STEP_MARKER)).expect("valid step marker"))
}

/// Count test steps in the steps field markup.
///
/// The markup is not validated; every literal marker counts.
pub fn count_steps(steps_xml: Option<&str>) -> usize {
    match steps_xml {
        Some(xml) if !xml.is_empty() => step_regex().find_iter(xml).count(),
        _ => 0,
    }
}
