mod error_presentation;

use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
    process::ExitCode,
};

use clap::{Parser, Subcommand, ValueEnum};
use dblib_core::{ColumnDef, DeclaredType, Platform, PlatformConfig};
use dblib_dialect_mssql::MssqlPlatform;
use error_presentation::{CliError, CliResult, render_runtime_error};
use tracing::{Level, debug};
use tracing_subscriber::FmtSubscriber;

/// Render SQL Server (dblib) dialect SQL.
#[derive(Debug, Parser)]
#[command(name = "dblib", version, about, long_about = None)]
struct Cli {
    /// Platform option override, e.g. `mssql.varchar_max_length=8000`.
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_key_value, global = true)]
    overrides: Vec<(String, String)>,

    /// Enable debug logging on stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Apply a row window to a SELECT read from a file or stdin.
    Limit {
        #[arg(long, allow_negative_numbers = true)]
        limit: i64,

        #[arg(long, allow_negative_numbers = true)]
        offset: Option<i64>,

        /// Query file; stdin when omitted.
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Print the column type declaration for an abstract type.
    Declare {
        #[arg(value_name = "TYPE")]
        declared: DeclaredType,

        #[arg(long)]
        length: Option<u32>,

        #[arg(long)]
        fixed: bool,

        /// The column carries a default value.
        #[arg(long)]
        default: bool,

        #[arg(long)]
        autoincrement: bool,

        #[arg(long)]
        unsigned: bool,
    },

    /// Print a catalog introspection query.
    Catalog {
        #[arg(value_enum)]
        kind: CatalogKind,

        table: Option<String>,
    },

    /// Print the framework type a native column type maps to.
    MapType { native: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum CatalogKind {
    Databases,
    Tables,
    Views,
    Triggers,
    Columns,
    Indexes,
    ForeignKeys,
    TableTriggers,
}

impl CatalogKind {
    fn name(self) -> &'static str {
        match self {
            Self::Databases => "databases",
            Self::Tables => "tables",
            Self::Views => "views",
            Self::Triggers => "triggers",
            Self::Columns => "columns",
            Self::Indexes => "indexes",
            Self::ForeignKeys => "foreign-keys",
            Self::TableTriggers => "table-triggers",
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .with_writer(io::stderr)
        .finish();
    if let Err(error) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("[logging] {error}");
    }

    match run(cli) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(error) => {
            let code = if error.is_usage() { 2 } else { 1 };
            eprintln!("{}", render_runtime_error(error));
            ExitCode::from(code)
        }
    }
}

fn run(cli: Cli) -> CliResult<String> {
    let overrides = cli.overrides.into_iter().collect::<BTreeMap<_, _>>();
    let platform = MssqlPlatform::new(PlatformConfig::from_extra(&overrides)?);
    debug!(config = ?platform.config(), "platform configured");

    match cli.command {
        Command::Limit {
            limit,
            offset,
            file,
        } => {
            let query = read_query(file.as_deref())?;
            Ok(platform.modify_limit_query(&query, Some(limit), offset)?)
        }
        Command::Declare {
            declared,
            length,
            fixed,
            default,
            autoincrement,
            unsigned,
        } => {
            let column = ColumnDef {
                length,
                fixed,
                has_default: default,
                autoincrement,
                unsigned,
                ..ColumnDef::default()
            };
            Ok(platform.type_declaration(declared, &column))
        }
        Command::Catalog { kind, table } => catalog_sql(&platform, kind, table.as_deref()),
        Command::MapType { native } => Ok(platform
            .map_native_type(&native)
            .map_or_else(|| "unmapped".to_string(), |mapped| format!("{mapped:?}"))),
    }
}

fn catalog_sql(
    platform: &dyn Platform,
    kind: CatalogKind,
    table: Option<&str>,
) -> CliResult<String> {
    let require_table = || {
        table.ok_or(CliError::MissingTableName {
            catalog: kind.name(),
        })
    };

    Ok(match kind {
        CatalogKind::Databases => platform.show_databases_sql(),
        CatalogKind::Tables => platform.list_tables_sql(),
        CatalogKind::Views => platform.list_views_sql(),
        CatalogKind::Triggers => platform.list_triggers_sql(),
        CatalogKind::Columns => platform.list_table_columns_sql(require_table()?),
        CatalogKind::Indexes => platform.list_table_indexes_sql(require_table()?),
        CatalogKind::ForeignKeys => platform.list_table_foreign_keys_sql(require_table()?),
        CatalogKind::TableTriggers => platform.list_table_triggers_sql(require_table()?),
    })
}

fn read_query(file: Option<&Path>) -> CliResult<String> {
    let query = match file {
        Some(path) => fs::read_to_string(path).map_err(|source| CliError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?,
        None => io::read_to_string(io::stdin()).map_err(CliError::ReadStdin)?,
    };
    Ok(query.trim_end().to_string())
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got `{raw}`"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("expected KEY=VALUE, got `{raw}`"));
    }
    Ok((key.to_string(), value.trim().to_string()))
}
