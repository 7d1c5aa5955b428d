//! Primary key detection

use relcheck_core::{ConformanceError, TableSchema};

/// Name of the single primary key column of a table
///
/// Fails with `NoPrimaryKey` when no column is flagged, and with
/// `AmbiguousPrimaryKey` for composite keys rather than picking one.
pub fn primary_key_column(schema: &TableSchema) -> Result<&str, ConformanceError> {
    let mut keys = schema.columns.iter().filter(|c| c.is_primary_key);

    match (keys.next(), keys.next()) {
        (None, _) => Err(ConformanceError::NoPrimaryKey {
            table: schema.table.clone(),
        }),
        (Some(pk), None) => Ok(pk.name.as_str()),
        _ => Err(ConformanceError::AmbiguousPrimaryKey {
            table: schema.table.clone(),
            columns: schema.primary_key_columns().iter().map(|c| c.name.clone()).collect(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relcheck_core::ColumnDescriptor;

    #[test]
    fn single_key() {
        let schema = TableSchema::new(
            "info",
            vec![
                ColumnDescriptor::new("label", "TEXT"),
                ColumnDescriptor::new("id", "INTEGER").with_primary_key(true),
            ],
        );
        assert_eq!(primary_key_column(&schema), Ok("id"));
    }

    #[test]
    fn no_key() {
        let schema = TableSchema::new("info", vec![ColumnDescriptor::new("label", "TEXT")]);
        assert_eq!(
            primary_key_column(&schema),
            Err(ConformanceError::NoPrimaryKey { table: "info".to_string() })
        );
    }

    #[test]
    fn composite_key_is_not_resolved() {
        let schema = TableSchema::new(
            "pairs",
            vec![
                ColumnDescriptor::new("a", "INTEGER").with_primary_key(true),
                ColumnDescriptor::new("b", "INTEGER").with_primary_key(true),
            ],
        );
        assert_eq!(
            primary_key_column(&schema),
            Err(ConformanceError::AmbiguousPrimaryKey {
                table: "pairs".to_string(),
                columns: vec!["a".to_string(), "b".to_string()],
            })
        );
    }
}
