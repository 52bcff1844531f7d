use std::path::PathBuf;

use dblib_dialect_mssql::MssqlPlatform;
use dblib_testkit::{TestResult, load_test_cases_from_path, run_limit_test};

#[test]
fn mssql_yaml_limit_cases_pass() {
    let platform = MssqlPlatform::default();

    run_case_file(&platform, "0001-basic-window.yml");
    run_case_file(&platform, "0002-order-by.yml");
}

fn run_case_file(platform: &MssqlPlatform, file_name: &str) {
    let path = limit_cases_root().join(file_name);
    let cases = load_test_cases_from_path(&path)
        .unwrap_or_else(|error| panic!("failed to load case file '{}': {error}", path.display()));

    assert!(
        !cases.is_empty(),
        "case file '{}' must define at least one testcase",
        path.display()
    );

    for (case_name, case) in cases {
        match run_limit_test(platform, &case) {
            TestResult::Passed => {}
            TestResult::Skipped(reason) => {
                panic!("testcase '{case_name}' unexpectedly skipped: {reason}")
            }
            TestResult::Failed(reason) => panic!("testcase '{case_name}' failed: {reason}"),
        }
    }
}

fn limit_cases_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../tests/mssql/limit")
}
