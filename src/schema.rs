use std::collections::BTreeMap;

use crate::Error;

/// Answers existence questions about the live database schema.
///
/// Generation only ever asks whether a table or column is already there,
/// so discovery can run up front and hand the generator a
/// [`SchemaSnapshot`], while embedders with other needs can implement
/// live lookups instead.
pub trait SchemaInspector {
    fn has_table(&self, table: &str) -> Result<bool, Error>;

    fn has_column(&self, table: &str, column: &str) -> Result<bool, Error>;
}

/// Tables and their column names captured from a database at one point
/// in time. An empty snapshot stands in for a fresh database.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SchemaSnapshot {
    tables: BTreeMap<String, Vec<String>>,
}

impl SchemaSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_table<T, I, C>(&mut self, table: T, columns: I)
    where
        T: Into<String>,
        I: IntoIterator<Item = C>,
        C: Into<String>,
    {
        self.tables.insert(
            table.into(),
            columns.into_iter().map(Into::into).collect(),
        );
    }

    pub fn tables(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }
}

impl SchemaInspector for SchemaSnapshot {
    fn has_table(&self, table: &str) -> Result<bool, Error> {
        Ok(self.tables.contains_key(table))
    }

    fn has_column(&self, table: &str, column: &str) -> Result<bool, Error> {
        Ok(self
            .tables
            .get(table)
            .is_some_and(|columns| columns.iter().any(|name| name == column)))
    }
}
