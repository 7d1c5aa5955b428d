//! Schema types and the SQLite column affinity rule

use serde::{Deserialize, Serialize};

/// Storage class a declared column type maps to
///
/// Mirrors SQLite's column affinity rule (datatype3.html, section 3.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Affinity {
    Text,
    Numeric,
    Integer,
    Real,
    Blob,
}

impl Affinity {
    /// Resolve the affinity of a declared column type
    ///
    /// Case-insensitive substring match, first match wins:
    /// `INT` -> INTEGER; `CHAR`/`CLOB`/`TEXT` -> TEXT; `BLOB` or an empty
    /// declared type -> BLOB; `REAL`/`FLOA`/`DOUB` -> REAL; else NUMERIC.
    pub fn resolve(declared_type: &str) -> Self {
        let declared = declared_type.to_ascii_uppercase();

        if declared.contains("INT") {
            Self::Integer
        } else if declared.contains("CHAR") || declared.contains("CLOB") || declared.contains("TEXT") {
            Self::Text
        } else if declared.contains("BLOB") || declared.trim().is_empty() {
            Self::Blob
        } else if declared.contains("REAL") || declared.contains("FLOA") || declared.contains("DOUB") {
            Self::Real
        } else {
            Self::Numeric
        }
    }

    /// Stable upper-case name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "TEXT",
            Self::Numeric => "NUMERIC",
            Self::Integer => "INTEGER",
            Self::Real => "REAL",
            Self::Blob => "BLOB",
        }
    }
}

impl std::fmt::Display for Affinity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One row of `PRAGMA table_info`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    /// Column name
    pub name: String,

    /// Declared type exactly as written in the DDL (may be empty)
    pub declared_type: String,

    /// NOT NULL constraint present
    pub not_null: bool,

    /// Default value expression, if any
    pub default_value: Option<String>,

    /// Part of the primary key
    pub is_primary_key: bool,
}

impl ColumnDescriptor {
    /// Create a nullable, non-key column without a default
    pub fn new(name: impl Into<String>, declared_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            declared_type: declared_type.into(),
            not_null: false,
            default_value: None,
            is_primary_key: false,
        }
    }

    /// Set the NOT NULL flag
    pub fn with_not_null(mut self, not_null: bool) -> Self {
        self.not_null = not_null;
        self
    }

    /// Set the default value expression
    pub fn with_default(mut self, default_value: impl Into<String>) -> Self {
        self.default_value = Some(default_value.into());
        self
    }

    /// Mark as primary key
    pub fn with_primary_key(mut self, is_primary_key: bool) -> Self {
        self.is_primary_key = is_primary_key;
        self
    }

    /// Affinity of the declared type
    pub fn affinity(&self) -> Affinity {
        Affinity::resolve(&self.declared_type)
    }
}

/// Ordered column metadata of one table
///
/// An empty schema means the table does not exist; a real table always has
/// at least one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    /// Table name
    pub table: String,

    /// Columns in the container's native order
    pub columns: Vec<ColumnDescriptor>,
}

impl TableSchema {
    /// Create a schema from columns
    pub fn new(table: impl Into<String>, columns: Vec<ColumnDescriptor>) -> Self {
        Self {
            table: table.into(),
            columns,
        }
    }

    /// Schema of a table that was not found
    pub fn absent(table: impl Into<String>) -> Self {
        Self::new(table, Vec::new())
    }

    /// True when no columns were reported (table absent)
    pub fn is_absent(&self) -> bool {
        self.columns.is_empty()
    }

    /// Find a column by name
    pub fn find_column(&self, name: &str) -> Option<&ColumnDescriptor> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Columns flagged as part of the primary key
    pub fn primary_key_columns(&self) -> Vec<&ColumnDescriptor> {
        self.columns.iter().filter(|c| c.is_primary_key).collect()
    }

    /// Get column names
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }
}

/// A row of the `gpkgext_relations` catalog, reduced to what the rules read
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RelationEntry {
    /// `relation_name` column
    pub relation_name: String,

    /// `related_table_name` column
    pub related_table_name: String,
}

impl RelationEntry {
    pub fn new(relation_name: impl Into<String>, related_table_name: impl Into<String>) -> Self {
        Self {
            relation_name: relation_name.into(),
            related_table_name: related_table_name.into(),
        }
    }
}

/// A row of `gpkg_geometry_columns` for one feature table
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GeometryColumn {
    /// Feature table name
    pub table_name: String,

    /// Geometry column name
    pub column_name: String,

    /// Registered geometry type (e.g. `POINT`, `GEOMETRY`)
    pub geometry_type_name: String,
}

impl GeometryColumn {
    pub fn new(
        table_name: impl Into<String>,
        column_name: impl Into<String>,
        geometry_type_name: impl Into<String>,
    ) -> Self {
        Self {
            table_name: table_name.into(),
            column_name: column_name.into(),
            geometry_type_name: geometry_type_name.into(),
        }
    }
}
