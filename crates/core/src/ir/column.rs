/// Field declaration handed to a platform when it renders a column type.
///
/// Only the attributes a type declaration can depend on are carried here;
/// names, nullability and defaults are rendered by the framework.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnDef {
    pub length: Option<u32>,
    pub fixed: bool,
    pub has_default: bool,
    pub autoincrement: bool,
    pub unsigned: bool,
    pub precision: Option<u32>,
    pub scale: Option<u32>,
}

impl ColumnDef {
    pub fn with_length(length: u32) -> Self {
        Self {
            length: Some(length),
            ..Self::default()
        }
    }

    pub fn fixed(mut self) -> Self {
        self.fixed = true;
        self
    }

    pub fn with_default(mut self) -> Self {
        self.has_default = true;
        self
    }

    pub fn autoincrement(mut self) -> Self {
        self.autoincrement = true;
        self
    }

    pub fn unsigned(mut self) -> Self {
        self.unsigned = true;
        self
    }
}
