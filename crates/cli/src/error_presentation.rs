use std::{io, path::PathBuf};

use anyhow::Context;
use miette::Report;

const PLATFORM_CONTEXT: &str = "while rendering mssql SQL";
const FILE_READ_CONTEXT: &str = "while reading query file";
const STDIN_READ_CONTEXT: &str = "while reading query from stdin";

pub(crate) type CliResult<T> = std::result::Result<T, CliError>;

#[derive(Debug)]
pub(crate) enum CliError {
    MissingTableName { catalog: &'static str },
    ReadFile { path: PathBuf, source: io::Error },
    ReadStdin(io::Error),
    Core(dblib_core::Error),
}

impl CliError {
    pub(crate) fn is_usage(&self) -> bool {
        matches!(self, Self::MissingTableName { .. })
    }
}

impl From<dblib_core::Error> for CliError {
    fn from(value: dblib_core::Error) -> Self {
        Self::Core(value)
    }
}

pub(crate) fn render_runtime_error(error: CliError) -> String {
    match error {
        CliError::MissingTableName { catalog } => {
            format!("[usage] catalog `{catalog}` requires a TABLE argument")
        }
        CliError::ReadFile { path, source } => {
            let context = format!("{FILE_READ_CONTEXT} `{}`", path.display());
            let report = report_with_context(source, context);
            format!("[io] {report}")
        }
        CliError::ReadStdin(source) => {
            let report = report_with_context(source, STDIN_READ_CONTEXT);
            format!("[io] {report}")
        }
        CliError::Core(source) => {
            let category = core_category(&source);
            let report = report_with_context(source, PLATFORM_CONTEXT);
            format!("[{category}] {report}")
        }
    }
}

fn report_with_context<E, C>(source: E, context: C) -> Report
where
    E: std::error::Error + Send + Sync + 'static,
    C: Into<String>,
{
    let context = context.into();
    let anyhow_error = anyhow::Error::new(source).context(context);
    miette::miette!("{anyhow_error:#}")
}

fn core_category(error: &dblib_core::Error) -> &'static str {
    match error {
        dblib_core::Error::InvalidOffset { .. } => "limit",
        dblib_core::Error::Config(_) => "config",
    }
}
