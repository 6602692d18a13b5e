//! Update builder types for entity mutations.
//!
//! Each builder produces an update struct with `Option` fields. Only `Some` fields
//! generate SET clauses in the dynamic UPDATE SQL. `Option<Option<T>>` fields
//! distinguish "leave unchanged" (`None`) from "clear" (`Some(None)`).

pub mod contract;
pub mod equipment;
pub mod organization;
pub mod room;
pub mod specification;
pub mod user;

/// Accumulates `column = ?n` fragments and their parameters for a dynamic
/// UPDATE statement.
#[derive(Debug, Default)]
pub(crate) struct SetClause {
    sets: Vec<String>,
    params: Vec<libsql::Value>,
}

impl SetClause {
    pub(crate) fn push(&mut self, column: &str, value: impl Into<libsql::Value>) {
        self.params.push(value.into());
        self.sets.push(format!("{column} = ?{}", self.params.len()));
    }

    pub(crate) fn push_opt<V: Into<libsql::Value>>(&mut self, column: &str, value: Option<V>) {
        match value {
            Some(v) => self.push(column, v),
            None => self.push(column, libsql::Value::Null),
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Finish into `UPDATE {table} SET ... WHERE id = ?n` and its parameters.
    pub(crate) fn into_sql(mut self, table: &str, id: &str) -> (String, Vec<libsql::Value>) {
        self.params.push(id.into());
        let sql = format!(
            "UPDATE {table} SET {} WHERE id = ?{}",
            self.sets.join(", "),
            self.params.len()
        );
        (sql, self.params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_clause_numbers_params_in_order() {
        let mut set = SetClause::default();
        assert!(set.is_empty());
        set.push("name", "Lab");
        set.push_opt::<String>("address", None);
        let (sql, params) = set.into_sql("buildings", "bld-1");
        assert_eq!(sql, "UPDATE buildings SET name = ?1, address = ?2 WHERE id = ?3");
        assert_eq!(params.len(), 3);
        assert!(matches!(params[1], libsql::Value::Null));
    }
}
