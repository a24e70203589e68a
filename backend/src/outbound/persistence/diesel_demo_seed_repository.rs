//! PostgreSQL-backed demo account seeding adapter.
//!
//! Applies the demo department and accounts within a single transaction so
//! a partial seed never leaves an account without its department. Accounts
//! are upserted by email: re-running the seed on an existing database is a
//! no-op reported through the created count.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{DemoSeedRepository, DemoSeedRepositoryError, DemoSeedRequest};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{NewDepartmentRow, NewUserRow};
use super::pool::{DbPool, PoolError};
use super::schema::{departments, users};

/// Diesel-backed implementation of the demo seed repository port.
#[derive(Clone)]
pub struct DieselDemoSeedRepository {
    pool: DbPool,
}

impl DieselDemoSeedRepository {
    /// Create a new seeding repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map pool errors to domain persistence errors.
fn map_pool_error(error: PoolError) -> DemoSeedRepositoryError {
    map_basic_pool_error(error, DemoSeedRepositoryError::connection)
}

/// Map Diesel errors to domain persistence errors.
fn map_diesel_error(error: diesel::result::Error) -> DemoSeedRepositoryError {
    map_basic_diesel_error(
        error,
        DemoSeedRepositoryError::query,
        DemoSeedRepositoryError::connection,
    )
}

#[async_trait]
impl DemoSeedRepository for DieselDemoSeedRepository {
    async fn seed_accounts(
        &self,
        request: DemoSeedRequest,
    ) -> Result<usize, DemoSeedRepositoryError> {
        let DemoSeedRequest {
            department,
            accounts,
        } = request;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let created = conn
            .transaction(|conn| {
                async move {
                    let new_department = NewDepartmentRow {
                        id: Uuid::new_v4(),
                        name: department.as_ref(),
                    };
                    diesel::insert_into(departments::table)
                        .values(&new_department)
                        .on_conflict(departments::name)
                        .do_nothing()
                        .execute(conn)
                        .await?;

                    let department_id = departments::table
                        .filter(departments::name.eq(department.as_ref()))
                        .select(departments::id)
                        .first::<Uuid>(conn)
                        .await?;

                    let user_rows: Vec<NewUserRow<'_>> = accounts
                        .iter()
                        .map(|account| NewUserRow {
                            id: Uuid::new_v4(),
                            display_name: account.display_name.as_ref(),
                            email: account.email.as_ref(),
                            password_hash: &account.password_hash,
                            role: account.role.as_str(),
                            department_id: Some(department_id),
                            approved: true,
                        })
                        .collect();

                    if user_rows.is_empty() {
                        return Ok(0);
                    }

                    diesel::insert_into(users::table)
                        .values(&user_rows)
                        .on_conflict(users::email)
                        .do_nothing()
                        .execute(conn)
                        .await
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        Ok(created)
    }
}
