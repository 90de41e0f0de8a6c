pub mod fetcher;
pub mod normalize;
pub mod steps;

pub use fetcher::SuiteFetcher;
pub use normalize::{build_suite_result, normalize_work_items};
pub use steps::count_steps;
