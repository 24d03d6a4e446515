//! Optional filters rendered into SQL predicates with positional parameters.

use duckdb::types::Value;

/// Conjunction of predicates over a single table.
///
/// Absent filters add nothing, so one query text covers every combination
/// of present and absent filters.
#[derive(Debug, Default)]
pub(crate) struct Predicates {
    clauses: Vec<String>,
    values: Vec<Value>,
}

impl Predicates {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn year(self, year: Option<i32>) -> Self {
        match year {
            Some(year) => self.bind("year = ?", Value::Int(year)),
            None => self,
        }
    }

    pub(crate) fn region(self, region: Option<&str>) -> Self {
        match region {
            Some(region) => self.bind("region = ?", Value::Text(region.to_string())),
            None => self,
        }
    }

    pub(crate) fn sport(self, sport: Option<&str>) -> Self {
        match sport {
            Some(sport) => self.bind("sport = ?", Value::Text(sport.to_string())),
            None => self,
        }
    }

    pub(crate) fn not_null(mut self, column: &'static str) -> Self {
        self.clauses.push(format!("{column} IS NOT NULL"));
        self
    }

    fn bind(mut self, clause: &'static str, value: Value) -> Self {
        self.clauses.push(clause.to_string());
        self.values.push(value);
        self
    }

    /// `WHERE ...` clause, or an empty string when nothing is filtered.
    pub(crate) fn where_clause(&self) -> String {
        if self.clauses.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", self.clauses.join(" AND "))
        }
    }

    /// Bound values in placeholder order.
    pub(crate) fn into_values(self) -> Vec<Value> {
        self.values
    }
}
