//! Helpers for classifying database errors.

/// Primary key constraint of the `short_urls` table.
pub const SHORT_ID_CONSTRAINT: &str = "short_urls_pkey";

/// Returns true if `e` is a unique violation on the short identifier column.
pub fn is_unique_violation_on_short_id(e: &sqlx::Error) -> bool {
    let Some(db_err) = e.as_database_error() else {
        return false;
    };

    if !db_err.is_unique_violation() {
        return false;
    }

    matches!(db_err.constraint(), Some(SHORT_ID_CONSTRAINT))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_database_errors_are_not_violations() {
        assert!(!is_unique_violation_on_short_id(&sqlx::Error::RowNotFound));
        assert!(!is_unique_violation_on_short_id(&sqlx::Error::PoolTimedOut));
    }
}
