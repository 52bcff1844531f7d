mod column;
mod lock;
mod types;

pub use column::ColumnDef;
pub use lock::{LockMode, TransactionIsolation};
pub use types::{DeclaredType, MappedType};
