//! Schema-related data models.
//!
//! These mirror the rows the catalog queries return and are rendered by the
//! `describe_schema` and `list_tables` tools.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableInfo {
    pub name: String,
    /// Catalog type as reported by the server (`BASE TABLE`, `VIEW`, ...)
    pub table_type: String,
    /// MySQL only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engine: Option<String>,
    /// Approximate; InnoDB statistics are estimates
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_count: Option<u64>,
    /// Bytes (excluding indexes)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_size: Option<u64>,
}

impl TableInfo {
    pub fn new(name: impl Into<String>, table_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            table_type: table_type.into(),
            engine: None,
            row_count: None,
            data_size: None,
        }
    }

    pub fn with_engine(mut self, engine: impl Into<String>) -> Self {
        self.engine = Some(engine.into());
        self
    }

    pub fn with_row_count(mut self, row_count: u64) -> Self {
        self.row_count = Some(row_count);
        self
    }

    pub fn with_data_size(mut self, data_size: u64) -> Self {
        self.data_size = Some(data_size);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDefinition {
    /// Owning table; set when columns of several tables are listed together
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
    pub name: String,
    /// Full type (e.g., `varchar(30)`, `bigint unsigned`)
    pub column_type: String,
    pub nullable: bool,
    /// `None` when the column has no default (rendered as NULL)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    /// Key role: `PRI`, `UNI`, `MUL` or empty
    pub key: String,
    /// e.g. `auto_increment`
    pub extra: String,
}

impl ColumnDefinition {
    pub fn new(name: impl Into<String>, column_type: impl Into<String>, nullable: bool) -> Self {
        Self {
            table: None,
            name: name.into(),
            column_type: column_type.into(),
            nullable,
            default: None,
            key: String::new(),
            extra: String::new(),
        }
    }

    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    pub fn with_default(mut self, default: Option<String>) -> Self {
        self.default = default;
        self
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    pub fn with_extra(mut self, extra: impl Into<String>) -> Self {
        self.extra = extra.into();
        self
    }
}

/// One column of one index, in index-then-sequence order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexColumn {
    pub index_name: String,
    pub column_name: String,
    pub unique: bool,
}

impl IndexColumn {
    pub fn new(index_name: impl Into<String>, column_name: impl Into<String>, unique: bool) -> Self {
        Self {
            index_name: index_name.into(),
            column_name: column_name.into(),
            unique,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_info_builder() {
        let table = TableInfo::new("orders", "BASE TABLE")
            .with_engine("InnoDB")
            .with_row_count(42)
            .with_data_size(16384);
        assert_eq!(table.engine.as_deref(), Some("InnoDB"));
        assert_eq!(table.row_count, Some(42));
        assert_eq!(table.data_size, Some(16384));
    }

    #[test]
    fn test_column_definition_defaults() {
        let col = ColumnDefinition::new("id", "int", false);
        assert!(col.table.is_none());
        assert!(col.default.is_none());
        assert!(col.key.is_empty());
    }

    #[test]
    fn test_column_definition_serialization_skips_absent_fields() {
        let col = ColumnDefinition::new("id", "int", false).with_key("PRI");
        let json = serde_json::to_value(&col).unwrap();
        assert!(json.get("table").is_none());
        assert!(json.get("default").is_none());
        assert_eq!(json["key"], "PRI");
    }
}
