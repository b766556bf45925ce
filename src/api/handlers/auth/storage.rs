//! SQL storage helpers for administrator accounts.
//!
//! Constraint failures are classified here so handlers never inspect
//! vendor error codes.

use sqlx::{PgPool, Row};

use super::types::UserResponse;

const UNIQUE_VIOLATION: &str = "23505";

/// Storage failure, classified away from SQLSTATE.
#[derive(Debug)]
pub(super) enum StoreError {
    /// The username or email unique constraint fired.
    Duplicate,
    /// Any other database failure.
    Other(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        let unique = match &err {
            sqlx::Error::Database(db_err) => {
                db_err.code().is_some_and(|code| code.as_ref() == UNIQUE_VIOLATION)
            }
            _ => false,
        };
        if unique {
            Self::Duplicate
        } else {
            Self::Other(err)
        }
    }
}

/// An administrator row as stored, including the password hash.
///
/// Only `to_public` leaves this module; the hash never reaches a response.
#[derive(Debug)]
pub(super) struct UserRecord {
    pub user_id: i32,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub password_hash: String,
    pub created_at: String,
}

impl UserRecord {
    pub(super) fn to_public(&self) -> UserResponse {
        UserResponse {
            user_id: self.user_id,
            username: self.username.clone(),
            email: self.email.clone(),
            full_name: self.full_name.clone(),
            created_at: self.created_at.clone(),
        }
    }
}

fn record_from_row(row: &sqlx::postgres::PgRow) -> UserRecord {
    UserRecord {
        user_id: row.get("user_id"),
        username: row.get("username"),
        email: row.get("email"),
        full_name: row.get("full_name"),
        password_hash: row.get("password_hash"),
        created_at: row.get("created_at"),
    }
}

/// Returns `true` when an account with the same username or email exists.
/// Comparison is case-sensitive, matching the unique constraints.
pub(super) async fn user_exists(
    pool: &PgPool,
    username: &str,
    email: &str,
) -> Result<bool, sqlx::Error> {
    let row = sqlx::query(
        "SELECT EXISTS(SELECT 1 FROM system_users WHERE username = $1 OR email = $2) AS exists",
    )
    .bind(username)
    .bind(email)
    .fetch_one(pool)
    .await?;

    Ok(row.get("exists"))
}

/// Inserts a new administrator and returns the stored row.
///
/// A concurrent register can trip the unique constraints after an existence
/// check passed; that case surfaces as [`StoreError::Duplicate`].
pub(super) async fn insert_user(
    pool: &PgPool,
    username: &str,
    email: &str,
    full_name: &str,
    password_hash: &str,
) -> Result<UserRecord, StoreError> {
    let row = sqlx::query(
        r#"
        INSERT INTO system_users (username, email, full_name, password_hash)
        VALUES ($1, $2, $3, $4)
        RETURNING user_id, username, email, full_name, password_hash,
            to_char(created_at AT TIME ZONE 'utc', 'YYYY-MM-DD"T"HH24:MI:SS"Z"') AS created_at
        "#,
    )
    .bind(username)
    .bind(email)
    .bind(full_name)
    .bind(password_hash)
    .fetch_one(pool)
    .await?;

    Ok(record_from_row(&row))
}

/// Looks up an administrator by email for login.
pub(super) async fn find_user_by_email(
    pool: &PgPool,
    email: &str,
) -> Result<Option<UserRecord>, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT user_id, username, email, full_name, password_hash,
            to_char(created_at AT TIME ZONE 'utc', 'YYYY-MM-DD"T"HH24:MI:SS"Z"') AS created_at
        FROM system_users
        WHERE email = $1
        "#,
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;

    Ok(row.as_ref().map(record_from_row))
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
            ErrorKind::UniqueViolation
        }
    }

    #[test]
    fn duplicate_classified_from_sqlstate() {
        let err = sqlx::Error::Database(Box::new(TestDbError {
            code: Some("23505"),
        }));
        assert!(matches!(StoreError::from(err), StoreError::Duplicate));
    }

    #[test]
    fn other_codes_stay_unclassified() {
        let err = sqlx::Error::Database(Box::new(TestDbError {
            code: Some("99999"),
        }));
        assert!(matches!(StoreError::from(err), StoreError::Other(_)));

        assert!(matches!(
            StoreError::from(sqlx::Error::RowNotFound),
            StoreError::Other(_)
        ));
    }
}
