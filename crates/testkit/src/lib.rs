mod yaml_runner;

pub use yaml_runner::{
    TestCase, TestResult, TestkitError, load_test_cases_from_path, load_test_cases_from_str,
    matches_platform, run_limit_test,
};
