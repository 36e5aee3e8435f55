//! PostgreSQL-backed `MemberRepository` implementation using Diesel ORM.
//!
//! Writes run in a single statement or a single transaction; the
//! `members_email_key` and `members_phone_key` unique constraints are the
//! authoritative uniqueness check.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use tracing::warn;

use crate::domain::ports::{MemberPersistenceError, MemberRepository};
use crate::domain::{Member, MemberChanges, MemberId, NewMember};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{MemberChangeset, MemberRow, NewMemberRow};
use super::pool::DbPool;
use super::schema::members;

/// Diesel-backed implementation of the [`MemberRepository`] port.
#[derive(Clone)]
pub struct DieselMemberRepository {
    pool: DbPool,
}

impl DieselMemberRepository {
    /// Adapter drawing connections from `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_member(row: MemberRow) -> Result<Member, MemberPersistenceError> {
    let id = row.id;
    Member::try_from(row).map_err(|err| {
        warn!(member_id = id, error = %err, "stored member row failed validation");
        MemberPersistenceError::query(format!("stored member {id} is invalid"))
    })
}

fn to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

#[async_trait]
impl MemberRepository for DieselMemberRepository {
    async fn find_by_id(&self, id: MemberId) -> Result<Option<Member>, MemberPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<MemberRow> = members::table
            .find(id.get())
            .select(MemberRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_member).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Member>, MemberPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<MemberRow> = members::table
            .filter(members::email.eq(email))
            .select(MemberRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_member).transpose()
    }

    async fn find_by_phone(&self, phone: &str) -> Result<Option<Member>, MemberPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<MemberRow> = members::table
            .filter(members::phone.eq(phone))
            .select(MemberRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_member).transpose()
    }

    async fn list(&self, skip: u64, limit: u64) -> Result<Vec<Member>, MemberPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<MemberRow> = members::table
            .order(members::id.asc())
            .offset(to_i64(skip))
            .limit(to_i64(limit))
            .select(MemberRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_member).collect()
    }

    async fn insert(&self, member: &NewMember) -> Result<Member, MemberPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        // A single INSERT runs in its own implicit transaction.
        let new_row = NewMemberRow::from(member);
        let row: MemberRow = diesel::insert_into(members::table)
            .values(&new_row)
            .returning(MemberRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        row_to_member(row)
    }

    async fn update(
        &self,
        id: MemberId,
        changes: &MemberChanges,
    ) -> Result<Option<Member>, MemberPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changeset = MemberChangeset::from(changes);
        let key = id.get();

        let row = conn
            .transaction::<_, diesel::result::Error, _>(|conn| {
                async move {
                    let locked: Option<MemberRow> = members::table
                        .find(key)
                        .select(MemberRow::as_select())
                        .for_update()
                        .first(conn)
                        .await
                        .optional()?;

                    if locked.is_none() || changeset.is_empty() {
                        return Ok(locked);
                    }

                    diesel::update(members::table.find(key))
                        .set(&changeset)
                        .returning(MemberRow::as_returning())
                        .get_result(conn)
                        .await
                        .map(Some)
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        row.map(row_to_member).transpose()
    }

    async fn delete(&self, id: MemberId) -> Result<bool, MemberPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let deleted = diesel::delete(members::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(deleted > 0)
    }
}
