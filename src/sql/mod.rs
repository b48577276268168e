//! PostgreSQL database operations for companies.
//!
//! This module provides functions for interacting with the PostgreSQL database and
//! [`PgCompanyStore`], the [`CompanyStore`] implementation built on them. Each store
//! method runs in its own transaction; an uncommitted transaction is rolled back when
//! dropped, so a cancelled call never leaves a partial write behind.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::{Company, CompanyEdit, CompanyId, CompanyStore, DataStoreError};

/// Company operations against the `companies` table.
pub mod company;

/// Applies every migration embedded from `migrations/` that has not run yet.
pub async fn migrate(pool: &PgPool) -> Result<(), DataStoreError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

/// A [`CompanyStore`] backed by a PostgreSQL connection pool.
#[derive(Debug, Clone)]
pub struct PgCompanyStore {
    pool: PgPool,
}

impl PgCompanyStore {
    /// Creates a store over an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects to `database_url`.
    pub async fn connect(database_url: &str) -> Result<Self, DataStoreError> {
        let pool = PgPool::connect(database_url).await?;
        Ok(Self::new(pool))
    }

    /// The underlying pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl CompanyStore for PgCompanyStore {
    async fn list(&self) -> Result<Vec<Company>, DataStoreError> {
        let mut tx = self.pool.begin().await?;
        let companies = company::list(&mut tx).await?;
        tx.commit().await?;
        Ok(companies)
    }

    async fn get(&self, id: CompanyId) -> Result<Option<Company>, DataStoreError> {
        let mut tx = self.pool.begin().await?;
        let found = company::get(&mut tx, id).await?;
        tx.commit().await?;
        Ok(found)
    }

    async fn insert(&self, record: &Company) -> Result<CompanyId, DataStoreError> {
        let mut tx = self.pool.begin().await?;
        let id = company::create(&mut tx, record).await?;
        tx.commit().await?;
        Ok(id)
    }

    async fn delete(&self, id: CompanyId) -> Result<bool, DataStoreError> {
        let mut tx = self.pool.begin().await?;
        let deleted = company::delete(&mut tx, id).await?;
        if deleted {
            tx.commit().await?;
        } else {
            tx.rollback().await?;
        }
        Ok(deleted)
    }

    async fn modify(
        &self,
        id: CompanyId,
        edit: CompanyEdit<'_>,
    ) -> Result<Option<Company>, DataStoreError> {
        let mut tx = self.pool.begin().await?;
        let Some(existing) = company::get_for_update(&mut tx, id).await? else {
            tx.rollback().await?;
            return Ok(None);
        };
        let edited = Company {
            id,
            ..edit(existing)
        };
        if !company::update(&mut tx, &edited).await? {
            return Err(DataStoreError::Internal(format!(
                "company {} vanished while locked",
                id
            )));
        }
        tx.commit().await?;
        Ok(Some(edited))
    }

    async fn count(&self) -> Result<u64, DataStoreError> {
        let mut tx = self.pool.begin().await?;
        let count = company::count(&mut tx).await?;
        tx.commit().await?;
        Ok(count)
    }
}
