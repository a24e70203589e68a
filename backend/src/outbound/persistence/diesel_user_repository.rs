//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.
//!
//! Loads user accounts together with their department name via a left join
//! and rebuilds them through the validated domain constructors.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{DepartmentName, DisplayName, EmailAddress, Role, User, UserId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::UserRow;
use super::pool::{DbPool, PoolError};
use super::schema::{departments, users};

/// Diesel-backed implementation of the user repository port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Fetch a user together with their password hash for authentication.
    ///
    /// Not part of the repository port; only the login adapter needs the
    /// credential column.
    pub(crate) async fn find_with_password_by_email(
        &self,
        email: &str,
    ) -> Result<Option<(User, String)>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = users::table
            .left_join(departments::table)
            .filter(users::email.eq(email))
            .select((UserRow::as_select(), departments::name.nullable()))
            .first::<(UserRow, Option<String>)>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(|(row, department)| {
            let password_hash = row.password_hash.clone();
            row_to_user(row, department).map(|user| (user, password_hash))
        })
        .transpose()
    }
}

/// Map pool errors to domain persistence errors.
fn map_pool_error(error: PoolError) -> UserPersistenceError {
    map_basic_pool_error(error, UserPersistenceError::connection)
}

/// Map Diesel errors to domain persistence errors.
fn map_diesel_error(error: diesel::result::Error) -> UserPersistenceError {
    map_basic_diesel_error(
        error,
        UserPersistenceError::query,
        UserPersistenceError::connection,
    )
}

/// Convert a database row into a validated domain user.
pub(crate) fn row_to_user(
    row: UserRow,
    department: Option<String>,
) -> Result<User, UserPersistenceError> {
    let build = || -> Result<User, String> {
        let role = Role::parse(&row.role).map_err(|err| err.to_string())?;
        let department = department
            .map(DepartmentName::new)
            .transpose()
            .map_err(|err| err.to_string())?;
        Ok(User::new(
            UserId::from_uuid(row.id),
            DisplayName::new(&row.display_name).map_err(|err| err.to_string())?,
            EmailAddress::new(&row.email).map_err(|err| err.to_string())?,
            role,
            department,
            row.approved,
        ))
    };
    build().map_err(|err| UserPersistenceError::query(format!("invalid user row: {err}")))
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = users::table
            .left_join(departments::table)
            .filter(users::id.eq(id.as_uuid()))
            .select((UserRow::as_select(), departments::name.nullable()))
            .first::<(UserRow, Option<String>)>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(|(row, department)| row_to_user(row, department))
            .transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserPersistenceError> {
        Ok(self
            .find_with_password_by_email(email)
            .await?
            .map(|(user, _)| user))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for error mapping and row conversion edge cases.

    use chrono::Utc;
    use rstest::{fixture, rstest};
    use uuid::Uuid;

    use super::*;

    #[fixture]
    fn valid_row() -> UserRow {
        let now = Utc::now();
        UserRow {
            id: Uuid::new_v4(),
            display_name: "demo_staff".to_owned(),
            email: "staff@demo.local".to_owned(),
            password_hash: "$argon2id$stub".to_owned(),
            role: "STAFF".to_owned(),
            department_id: None,
            approved: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[rstest]
    fn pool_error_maps_to_connection_error() {
        let err = map_pool_error(PoolError::checkout("connection refused"));
        assert!(matches!(err, UserPersistenceError::Connection { .. }));
        assert!(err.to_string().contains("connection refused"));
    }

    #[rstest]
    fn diesel_error_maps_to_query_error() {
        let err = map_diesel_error(diesel::result::Error::NotFound);
        assert!(matches!(err, UserPersistenceError::Query { .. }));
        assert!(err.to_string().contains("record not found"));
    }

    #[rstest]
    fn row_conversion_builds_a_user_with_department(valid_row: UserRow) {
        let user = row_to_user(valid_row, Some("Computer Science".to_owned()))
            .expect("valid row converts");
        assert_eq!(user.role(), Role::Staff);
        assert_eq!(
            user.department().map(|name| name.as_ref()),
            Some("Computer Science")
        );
        assert!(user.approved());
    }

    #[rstest]
    fn row_conversion_rejects_an_unknown_role(mut valid_row: UserRow) {
        valid_row.role = "SUPERUSER".to_owned();
        let error = row_to_user(valid_row, None).expect_err("unknown role should fail");
        assert!(matches!(error, UserPersistenceError::Query { .. }));
        assert!(error.to_string().contains("invalid user row"));
    }
}
