use dblib_core::{ColumnDef, DeclaredType, MappedType, PlatformConfig};

const DATETIME_PATTERN: &str = "YYYY-MM-DD HH:MM:SS";
const DATE_PATTERN: &str = "YYYY-MM-DD";
const TIME_PATTERN: &str = "HH:MM:SS";
const DEFAULT_FIXED_LENGTH: u32 = 255;

pub(crate) fn type_declaration(
    config: &PlatformConfig,
    declared: DeclaredType,
    column: &ColumnDef,
) -> String {
    match declared {
        DeclaredType::Integer => format!("INT{}", common_integer_suffix(column)),
        DeclaredType::BigInt => format!("BIGINT{}", common_integer_suffix(column)),
        DeclaredType::SmallInt => format!("SMALLINT{}", common_integer_suffix(column)),
        DeclaredType::Varchar => varchar_declaration(config, column),
        DeclaredType::Clob => "TEXT".to_string(),
        // Temporal values are stored as fixed-width text.
        DeclaredType::DateTime => fixed_char(DATETIME_PATTERN),
        DeclaredType::Date => fixed_char(DATE_PATTERN),
        DeclaredType::Time => fixed_char(TIME_PATTERN),
        DeclaredType::Boolean => "BIT".to_string(),
    }
}

fn common_integer_suffix(column: &ColumnDef) -> String {
    let mut suffix = String::new();
    if column.unsigned {
        suffix.push_str(" UNSIGNED");
    }
    if column.autoincrement {
        suffix.push_str(" AUTO_INCREMENT");
    }
    suffix
}

fn varchar_declaration(config: &PlatformConfig, column: &ColumnDef) -> String {
    let requested = match column.length {
        Some(length) => Some(length),
        None if column.has_default => Some(config.varchar_max_length),
        None => None,
    };
    let length = requested.filter(|length| *length > 0 && *length <= config.varchar_max_length);

    match (column.fixed, length) {
        (true, Some(length)) => format!("CHAR({length})"),
        (true, None) => format!("CHAR({DEFAULT_FIXED_LENGTH})"),
        (false, Some(length)) => format!("VARCHAR({length})"),
        (false, None) => "TEXT".to_string(),
    }
}

fn fixed_char(pattern: &str) -> String {
    format!("CHAR({})", pattern.len())
}

pub(crate) fn map_native_type(native: &str) -> Option<MappedType> {
    let normalized = native.split_whitespace().collect::<Vec<_>>().join(" ");
    let mapped = match normalized.to_ascii_lowercase().as_str() {
        "bigint" => MappedType::BigInt,
        "numeric" | "decimal" => MappedType::Decimal,
        "bit" => MappedType::Boolean,
        "smallint" | "tinyint" => MappedType::SmallInt,
        "int" | "smallmoney" | "money" => MappedType::Integer,
        "float" | "real" | "double" | "double precision" => MappedType::Float,
        "date" => MappedType::Date,
        "datetimeoffset" => MappedType::DateTimeTz,
        "datetime" | "datetime2" => MappedType::DateTime,
        "time" => MappedType::Time,
        "char" | "varchar" | "nchar" | "nvarchar" => MappedType::String,
        "text" | "ntext" | "binary" | "varbinary" | "image" => MappedType::Text,
        "uniqueidentifier" => MappedType::Guid,
        _ => return None,
    };
    Some(mapped)
}
