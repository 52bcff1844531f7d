mod config;
mod error;
mod ir;
mod platform;

pub use config::{DEFAULT_VARCHAR_MAX_LENGTH, PlatformConfig, VARCHAR_MAX_LENGTH_KEY};
pub use error::{ConfigError, Error, Result};
pub use ir::{ColumnDef, DeclaredType, LockMode, MappedType, TransactionIsolation};
pub use platform::{NowKind, Platform};
