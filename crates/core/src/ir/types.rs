use std::{fmt, str::FromStr};

/// Framework-level type a native column type is read back as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MappedType {
    BigInt,
    Decimal,
    Boolean,
    SmallInt,
    Integer,
    Float,
    Date,
    DateTimeTz,
    DateTime,
    Time,
    String,
    Text,
    Guid,
}

/// Abstract column types a platform must be able to declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclaredType {
    Integer,
    BigInt,
    SmallInt,
    Varchar,
    Clob,
    DateTime,
    Date,
    Time,
    Boolean,
}

impl DeclaredType {
    pub const ALL: [Self; 9] = [
        Self::Integer,
        Self::BigInt,
        Self::SmallInt,
        Self::Varchar,
        Self::Clob,
        Self::DateTime,
        Self::Date,
        Self::Time,
        Self::Boolean,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::BigInt => "bigint",
            Self::SmallInt => "smallint",
            Self::Varchar => "varchar",
            Self::Clob => "clob",
            Self::DateTime => "datetime",
            Self::Date => "date",
            Self::Time => "time",
            Self::Boolean => "boolean",
        }
    }
}

impl fmt::Display for DeclaredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DeclaredType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|declared| declared.name() == normalized)
            .ok_or_else(|| format!("unknown column type `{}`", value.trim()))
    }
}
