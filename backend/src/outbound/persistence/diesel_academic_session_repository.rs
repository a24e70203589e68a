//! PostgreSQL-backed `AcademicSessionRepository` implementation.
//!
//! Sessions are created on demand. The insert races benignly with
//! concurrent uploads for the same name: `ON CONFLICT DO NOTHING` on the
//! unique name column means whichever insert wins, the follow-up select
//! returns the surviving row.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::course_result::{AcademicSession, SessionName};
use crate::domain::ports::{AcademicSessionRepository, AcademicSessionStoreError};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{AcademicSessionRow, NewAcademicSessionRow};
use super::pool::{DbPool, PoolError};
use super::schema::academic_sessions;

/// Diesel-backed implementation of the academic session repository port.
#[derive(Clone)]
pub struct DieselAcademicSessionRepository {
    pool: DbPool,
}

impl DieselAcademicSessionRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map pool errors to domain repository errors.
fn map_pool_error(error: PoolError) -> AcademicSessionStoreError {
    map_basic_pool_error(error, AcademicSessionStoreError::connection)
}

/// Map Diesel errors to domain repository errors.
fn map_diesel_error(error: diesel::result::Error) -> AcademicSessionStoreError {
    map_basic_diesel_error(
        error,
        AcademicSessionStoreError::query,
        AcademicSessionStoreError::connection,
    )
}

/// Convert a database row into a validated domain session.
fn row_to_session(row: AcademicSessionRow) -> Result<AcademicSession, AcademicSessionStoreError> {
    let name = SessionName::new(&row.name).map_err(|err| {
        AcademicSessionStoreError::query(format!("invalid session row: {err}"))
    })?;
    Ok(AcademicSession::new(row.id, name))
}

#[async_trait]
impl AcademicSessionRepository for DieselAcademicSessionRepository {
    async fn get_or_create(
        &self,
        name: &SessionName,
    ) -> Result<AcademicSession, AcademicSessionStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewAcademicSessionRow {
            id: Uuid::new_v4(),
            name: name.as_str(),
        };
        diesel::insert_into(academic_sessions::table)
            .values(&new_row)
            .on_conflict(academic_sessions::name)
            .do_nothing()
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let row = academic_sessions::table
            .filter(academic_sessions::name.eq(name.as_str()))
            .select(AcademicSessionRow::as_select())
            .first::<AcademicSessionRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        row_to_session(row)
    }
}
