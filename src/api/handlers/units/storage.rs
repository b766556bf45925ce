//! SQL storage for institution units.
//!
//! Constraint failures are classified into [`StoreError`] here so handlers
//! map outcomes to HTTP without ever seeing vendor error codes.

use std::collections::HashSet;

use sqlx::{postgres::PgRow, PgPool, Row};

use super::types::UnitRef;

const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// Storage outcome, classified away from SQLSTATE.
#[derive(Debug)]
pub(super) enum StoreError {
    /// Unique constraint violation (duplicate `unit_code`).
    Unique,
    /// Foreign-key constraint violation (missing parent or dependent rows).
    ForeignKey,
    /// The target row does not exist.
    NotFound,
    /// Any other database failure.
    Other(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if matches!(err, sqlx::Error::RowNotFound) {
            return Self::NotFound;
        }
        let code = match &err {
            sqlx::Error::Database(db_err) => db_err.code().map(|code| code.to_string()),
            _ => None,
        };
        match code.as_deref() {
            Some(UNIQUE_VIOLATION) => Self::Unique,
            Some(FOREIGN_KEY_VIOLATION) => Self::ForeignKey,
            _ => Self::Other(err),
        }
    }
}

/// A unit row as stored.
#[derive(Debug)]
pub(super) struct UnitRow {
    pub unit_id: i32,
    pub unit_code: String,
    pub unit_name: String,
    pub unit_type: String,
    pub parent_unit_id: Option<i32>,
    pub created_at: String,
}

impl UnitRow {
    pub(super) fn to_ref(&self) -> UnitRef {
        UnitRef {
            unit_id: self.unit_id,
            unit_name: self.unit_name.clone(),
            unit_code: self.unit_code.clone(),
        }
    }
}

fn unit_from_row(row: &PgRow) -> UnitRow {
    UnitRow {
        unit_id: row.get("unit_id"),
        unit_code: row.get("unit_code"),
        unit_name: row.get("unit_name"),
        unit_type: row.get("unit_type"),
        parent_unit_id: row.get("parent_unit_id"),
        created_at: row.get("created_at"),
    }
}

/// Fetches every unit ordered by id ascending.
pub(super) async fn fetch_all_units(pool: &PgPool) -> Result<Vec<UnitRow>, StoreError> {
    let rows = sqlx::query(
        r#"
        SELECT unit_id, unit_code, unit_name, unit_type, parent_unit_id,
            to_char(created_at AT TIME ZONE 'utc', 'YYYY-MM-DD"T"HH24:MI:SS"Z"') AS created_at
        FROM institution_units
        ORDER BY unit_id ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(unit_from_row).collect())
}

/// Fetches a single unit by id, or `None` when it does not exist.
pub(super) async fn fetch_unit(
    pool: &PgPool,
    unit_id: i32,
) -> Result<Option<UnitRow>, StoreError> {
    let row = sqlx::query(
        r#"
        SELECT unit_id, unit_code, unit_name, unit_type, parent_unit_id,
            to_char(created_at AT TIME ZONE 'utc', 'YYYY-MM-DD"T"HH24:MI:SS"Z"') AS created_at
        FROM institution_units
        WHERE unit_id = $1
        "#,
    )
    .bind(unit_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.as_ref().map(unit_from_row))
}

/// Fetches the shallow reference for a unit, used for parent projection.
pub(super) async fn fetch_unit_ref(
    pool: &PgPool,
    unit_id: i32,
) -> Result<Option<UnitRef>, StoreError> {
    let row = sqlx::query(
        "SELECT unit_id, unit_name, unit_code FROM institution_units WHERE unit_id = $1",
    )
    .bind(unit_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|row| UnitRef {
        unit_id: row.get("unit_id"),
        unit_name: row.get("unit_name"),
        unit_code: row.get("unit_code"),
    }))
}

/// Fetches shallow references for the direct children of a unit.
pub(super) async fn fetch_children(
    pool: &PgPool,
    unit_id: i32,
) -> Result<Vec<UnitRef>, StoreError> {
    let rows = sqlx::query(
        r"
        SELECT unit_id, unit_name, unit_code
        FROM institution_units
        WHERE parent_unit_id = $1
        ORDER BY unit_id ASC
        ",
    )
    .bind(unit_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| UnitRef {
            unit_id: row.get("unit_id"),
            unit_name: row.get("unit_name"),
            unit_code: row.get("unit_code"),
        })
        .collect())
}

/// Inserts a new unit and returns the stored row.
pub(super) async fn insert_unit(
    pool: &PgPool,
    unit_code: &str,
    unit_name: &str,
    unit_type: &str,
    parent_unit_id: Option<i32>,
) -> Result<UnitRow, StoreError> {
    let row = sqlx::query(
        r#"
        INSERT INTO institution_units (unit_code, unit_name, unit_type, parent_unit_id)
        VALUES ($1, $2, $3, $4)
        RETURNING unit_id, unit_code, unit_name, unit_type, parent_unit_id,
            to_char(created_at AT TIME ZONE 'utc', 'YYYY-MM-DD"T"HH24:MI:SS"Z"') AS created_at
        "#,
    )
    .bind(unit_code)
    .bind(unit_name)
    .bind(unit_type)
    .bind(parent_unit_id)
    .fetch_one(pool)
    .await?;

    Ok(unit_from_row(&row))
}

/// Applies a partial update and returns the updated row.
///
/// `parent_unit_id` is tri-state: `None` keeps the current parent,
/// `Some(None)` detaches, `Some(Some(id))` reparents.
pub(super) async fn update_unit(
    pool: &PgPool,
    unit_id: i32,
    unit_code: Option<&str>,
    unit_name: Option<&str>,
    unit_type: Option<&str>,
    parent_unit_id: Option<Option<i32>>,
) -> Result<UnitRow, StoreError> {
    let row = sqlx::query(
        r#"
        UPDATE institution_units
        SET
            unit_code = COALESCE($2, unit_code),
            unit_name = COALESCE($3, unit_name),
            unit_type = COALESCE($4, unit_type),
            parent_unit_id = CASE WHEN $5 THEN $6 ELSE parent_unit_id END
        WHERE unit_id = $1
        RETURNING unit_id, unit_code, unit_name, unit_type, parent_unit_id,
            to_char(created_at AT TIME ZONE 'utc', 'YYYY-MM-DD"T"HH24:MI:SS"Z"') AS created_at
        "#,
    )
    .bind(unit_id)
    .bind(unit_code)
    .bind(unit_name)
    .bind(unit_type)
    .bind(parent_unit_id.is_some())
    .bind(parent_unit_id.flatten())
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(unit_from_row).ok_or(StoreError::NotFound)
}

/// Deletes a unit by id.
pub(super) async fn delete_unit(pool: &PgPool, unit_id: i32) -> Result<(), StoreError> {
    let result = sqlx::query("DELETE FROM institution_units WHERE unit_id = $1")
        .bind(unit_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(StoreError::NotFound);
    }

    Ok(())
}

/// Returns `true` when attaching `unit_id` under `new_parent_id` would close
/// a cycle, i.e. the unit appears among the proposed parent's ancestors.
///
/// The walk tolerates pre-existing cycles that do not involve `unit_id` by
/// stopping at the first repeated ancestor.
pub(super) async fn would_create_cycle(
    pool: &PgPool,
    unit_id: i32,
    new_parent_id: i32,
) -> Result<bool, StoreError> {
    let mut seen = HashSet::new();
    let mut current = Some(new_parent_id);

    while let Some(ancestor) = current {
        if ancestor == unit_id {
            return Ok(true);
        }
        if !seen.insert(ancestor) {
            break;
        }
        current = sqlx::query("SELECT parent_unit_id FROM institution_units WHERE unit_id = $1")
            .bind(ancestor)
            .fetch_optional(pool)
            .await?
            .and_then(|row| row.get::<Option<i32>, _>("parent_unit_id"));
    }

    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::error::{DatabaseError, ErrorKind};
    use std::borrow::Cow;
    use std::error::Error as StdError;
    use std::fmt;

    #[derive(Debug)]
    struct TestDbError {
        code: Option<&'static str>,
    }

    impl fmt::Display for TestDbError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "test database error")
        }
    }

    impl StdError for TestDbError {}

    impl DatabaseError for TestDbError {
        fn message(&self) -> &'static str {
            "test database error"
        }

        fn code(&self) -> Option<Cow<'_, str>> {
            self.code.map(Cow::Borrowed)
        }

        fn as_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn StdError + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn StdError + Send + Sync + 'static> {
            self
        }

        fn kind(&self) -> ErrorKind {
            ErrorKind::Other
        }
    }

    fn db_error(code: &'static str) -> sqlx::Error {
        sqlx::Error::Database(Box::new(TestDbError { code: Some(code) }))
    }

    #[test]
    fn unique_violation_classified() {
        assert!(matches!(StoreError::from(db_error("23505")), StoreError::Unique));
    }

    #[test]
    fn foreign_key_violation_classified() {
        assert!(matches!(
            StoreError::from(db_error("23503")),
            StoreError::ForeignKey
        ));
    }

    #[test]
    fn row_not_found_classified() {
        assert!(matches!(
            StoreError::from(sqlx::Error::RowNotFound),
            StoreError::NotFound
        ));
    }

    #[test]
    fn unknown_codes_stay_unclassified() {
        assert!(matches!(
            StoreError::from(db_error("99999")),
            StoreError::Other(_)
        ));

        let err = sqlx::Error::Database(Box::new(TestDbError { code: None }));
        assert!(matches!(StoreError::from(err), StoreError::Other(_)));
    }
}
