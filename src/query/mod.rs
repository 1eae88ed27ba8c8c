//! Parameterized SQL statements compiled from client lookups and filters.
//!
//! Every statement built here selects a single text column, `payload`, holding
//! one JSON object per row. User supplied values never reach the SQL text;
//! they are pushed as [`BindValue`]s behind `?` placeholders.

pub mod clients;
pub mod filter;
pub mod hierarchy;

/// A value bound to one `?` placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindValue {
    Integer(i32),
    Text(String),
}

impl From<i32> for BindValue {
    fn from(value: i32) -> Self {
        BindValue::Integer(value)
    }
}

impl From<String> for BindValue {
    fn from(value: String) -> Self {
        BindValue::Text(value)
    }
}

impl From<&str> for BindValue {
    fn from(value: &str) -> Self {
        BindValue::Text(value.to_string())
    }
}

/// SQL text plus the values bound to its placeholders, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SqlStatement {
    pub sql: String,
    pub binds: Vec<BindValue>,
}

impl SqlStatement {
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            binds: Vec::new(),
        }
    }

    /// Appends crate-owned SQL text.
    pub fn push_sql(&mut self, sql: &str) -> &mut Self {
        self.sql.push_str(sql);
        self
    }

    /// Appends a single placeholder bound to `value`.
    pub fn push_bind(&mut self, value: impl Into<BindValue>) -> &mut Self {
        self.sql.push('?');
        self.binds.push(value.into());
        self
    }

    /// Appends a comma separated placeholder list, one per value.
    pub fn push_bind_list<I, V>(&mut self, values: I) -> &mut Self
    where
        I: IntoIterator<Item = V>,
        V: Into<BindValue>,
    {
        for (i, value) in values.into_iter().enumerate() {
            if i > 0 {
                self.sql.push_str(", ");
            }
            self.push_bind(value);
        }
        self
    }

    /// Appends another statement, keeping its binds after the current ones.
    pub fn append(&mut self, other: SqlStatement) -> &mut Self {
        self.sql.push_str(&other.sql);
        self.binds.extend(other.binds);
        self
    }

    /// Number of `?` placeholders currently in the text.
    #[cfg(test)]
    pub fn placeholder_count(&self) -> usize {
        self.sql.matches('?').count()
    }
}
