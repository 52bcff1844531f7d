use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
};

use dblib_core::Platform;
use serde::Deserialize;
use thiserror::Error;

const TESTCASE_SOURCE_LABEL: &str = "yaml testcase";
const MAX_EXCERPT_CHARS: usize = 256;

/// One pagination case. `expected` and `error` are mutually exclusive.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TestCase {
    pub query: String,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub expected: Option<String>,
    pub error: Option<String>,
    /// `mssql` runs only on that platform, `!mssql` everywhere else.
    pub platform: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestResult {
    Passed,
    Skipped(String),
    Failed(String),
}

#[derive(Debug, Error)]
pub enum TestkitError {
    #[error("failed to read testcase file `{}`", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid {label} at {location}: {source}\n{excerpt}", label = TESTCASE_SOURCE_LABEL)]
    Yaml {
        location: String,
        excerpt: String,
        #[source]
        source: serde_yaml::Error,
    },
}

pub fn load_test_cases_from_str(yaml: &str) -> Result<BTreeMap<String, TestCase>, TestkitError> {
    serde_yaml::from_str(yaml).map_err(|source| parse_yaml_error(yaml, source))
}

pub fn load_test_cases_from_path(
    path: &Path,
) -> Result<BTreeMap<String, TestCase>, TestkitError> {
    let yaml = fs::read_to_string(path).map_err(|source| TestkitError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    load_test_cases_from_str(&yaml)
}

pub fn matches_platform(requirement: Option<&str>, current_platform: &str) -> bool {
    let Some(requirement) = requirement.map(str::trim).filter(|value| !value.is_empty()) else {
        return true;
    };

    if let Some(excluded_platform) = requirement.strip_prefix('!') {
        return excluded_platform != current_platform;
    }

    requirement == current_platform
}

pub fn run_limit_test(platform: &dyn Platform, test: &TestCase) -> TestResult {
    if !matches_platform(test.platform.as_deref(), platform.name()) {
        return TestResult::Skipped(format!(
            "requires platform '{}', running on '{}'",
            test.platform.as_deref().unwrap_or_default(),
            platform.name()
        ));
    }

    match run_limit_test_flow(platform, test) {
        Ok(()) => TestResult::Passed,
        Err(reason) => TestResult::Failed(reason),
    }
}

fn run_limit_test_flow(platform: &dyn Platform, test: &TestCase) -> Result<(), String> {
    validate_expectations(test)?;

    let outcome = platform.modify_limit_query(&test.query, test.limit, test.offset);
    match (outcome, test.expected.as_deref(), test.error.as_deref()) {
        (Ok(actual), Some(expected), _) => assert_expected_sql(expected, &actual),
        (Ok(actual), None, Some(expected_error)) => Err(format!(
            "expected error: {expected_error}, but got SQL:\n{}",
            actual.trim()
        )),
        (Err(actual_error), _, Some(expected_error)) => {
            let actual_error = actual_error.to_string();
            if actual_error.contains(expected_error) {
                Ok(())
            } else {
                Err(format!(
                    "expected error: {expected_error}, but got: {actual_error}"
                ))
            }
        }
        (Err(actual_error), _, None) => Err(format!("unexpected error: {actual_error}")),
        (Ok(_), None, None) => Err("testcase defines no expectation".to_string()),
    }
}

fn validate_expectations(test: &TestCase) -> Result<(), String> {
    match (&test.expected, &test.error) {
        (Some(_), None) | (None, Some(_)) => Ok(()),
        (Some(_), Some(_)) => Err("`expected` and `error` cannot both be set".to_string()),
        (None, None) => Err("one of `expected` or `error` must be set".to_string()),
    }
}

fn assert_expected_sql(expected: &str, actual: &str) -> Result<(), String> {
    if normalize_sql(expected) == normalize_sql(actual) {
        return Ok(());
    }

    Err(format!(
        "SQL mismatch; expected:\n{}\nactual:\n{}",
        expected.trim(),
        actual.trim()
    ))
}

fn normalize_sql(sql: &str) -> &str {
    sql.trim()
}

fn parse_yaml_error(yaml: &str, source: serde_yaml::Error) -> TestkitError {
    let location = source.location().map_or_else(
        || "unknown location".to_string(),
        |location| format!("line {}, column {}", location.line(), location.column()),
    );

    TestkitError::Yaml {
        location,
        excerpt: source_excerpt(yaml),
        source,
    }
}

fn source_excerpt(yaml: &str) -> String {
    let trimmed = yaml.trim();
    if trimmed.is_empty() {
        return TESTCASE_SOURCE_LABEL.to_string();
    }

    if trimmed.chars().count() <= MAX_EXCERPT_CHARS {
        return trimmed.to_string();
    }

    let mut excerpt: String = trimmed.chars().take(MAX_EXCERPT_CHARS).collect();
    excerpt.push_str("...");
    excerpt
}
