//! Company operations for PostgreSQL database.
//!
//! This module provides functions for managing rows of the `companies` table. Every
//! function runs inside a caller-supplied transaction so that a lookup and the write
//! that follows it commit together.

use sqlx::{FromRow, Postgres, Transaction};

use crate::{Company, CompanyId, DataStoreError};

/// Result type for database operations.
pub type SqlResult<T> = Result<T, DataStoreError>;

#[derive(Debug, FromRow)]
struct CompanyRow {
    id: i32,
    name: String,
    city: String,
    street: String,
    pib: String,
    maticni_broj: String,
    is_active: bool,
}

impl From<CompanyRow> for Company {
    fn from(row: CompanyRow) -> Self {
        Company {
            id: CompanyId::new(row.id),
            name: row.name,
            city: row.city,
            street: row.street,
            pib: row.pib,
            maticni_broj: row.maticni_broj,
            is_active: row.is_active,
        }
    }
}

/// Inserts a company and returns the identifier assigned by the `SERIAL` column.
///
/// The identifier carried by `company` is ignored.
///
/// # Examples
/// ```no_run
/// # use companies::{Company, sql};
/// # use sqlx::PgPool;
/// # async fn example(pool: PgPool) -> Result<(), Box<dyn std::error::Error>> {
/// let mut tx = pool.begin().await?;
/// let id = sql::company::create(&mut tx, &Company::default()).await?;
/// tx.commit().await?;
/// println!("created {}", id);
/// # Ok(())
/// # }
/// ```
pub async fn create(tx: &mut Transaction<'_, Postgres>, company: &Company) -> SqlResult<CompanyId> {
    let result = sqlx::query_scalar::<_, i32>(
        r#"
        INSERT INTO companies (name, city, street, pib, maticni_broj, is_active)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id
        "#,
    )
    .bind(&company.name)
    .bind(&company.city)
    .bind(&company.street)
    .bind(&company.pib)
    .bind(&company.maticni_broj)
    .bind(company.is_active)
    .fetch_one(&mut **tx)
    .await;

    match result {
        Ok(id) => Ok(CompanyId::new(id)),
        Err(e) => {
            tracing::error!(error = %e, "database error creating company");
            Err(DataStoreError::Internal(e.to_string()))
        }
    }
}

/// Retrieves a company.
///
/// # Returns
/// * `Ok(Some(Company))` - Company found
/// * `Ok(None)` - Company not found
/// * `Err(DataStoreError::Internal)` - Database error
pub async fn get(tx: &mut Transaction<'_, Postgres>, id: CompanyId) -> SqlResult<Option<Company>> {
    let result = sqlx::query_as::<_, CompanyRow>(
        r#"
        SELECT id, name, city, street, pib, maticni_broj, is_active
        FROM companies
        WHERE id = $1
        "#,
    )
    .bind(id.as_i32())
    .fetch_optional(&mut **tx)
    .await;

    match result {
        Ok(row) => Ok(row.map(Company::from)),
        Err(e) => {
            tracing::error!(error = %e, company_id = %id, "database error getting company");
            Err(DataStoreError::Internal(e.to_string()))
        }
    }
}

/// Retrieves a company and locks its row until the transaction ends.
///
/// # Returns
/// * `Ok(Some(Company))` - Company found and locked
/// * `Ok(None)` - Company not found
/// * `Err(DataStoreError::Internal)` - Database error
pub async fn get_for_update(
    tx: &mut Transaction<'_, Postgres>,
    id: CompanyId,
) -> SqlResult<Option<Company>> {
    let result = sqlx::query_as::<_, CompanyRow>(
        r#"
        SELECT id, name, city, street, pib, maticni_broj, is_active
        FROM companies
        WHERE id = $1
        FOR UPDATE
        "#,
    )
    .bind(id.as_i32())
    .fetch_optional(&mut **tx)
    .await;

    match result {
        Ok(row) => Ok(row.map(Company::from)),
        Err(e) => {
            tracing::error!(error = %e, company_id = %id, "database error locking company");
            Err(DataStoreError::Internal(e.to_string()))
        }
    }
}

/// Overwrites every column of an existing company except its identifier.
///
/// # Returns
/// * `Ok(true)` - Company existed and was updated
/// * `Ok(false)` - Company did not exist
/// * `Err(DataStoreError::Internal)` - Database error
pub async fn update(tx: &mut Transaction<'_, Postgres>, company: &Company) -> SqlResult<bool> {
    let result = sqlx::query(
        r#"
        UPDATE companies
        SET name = $2, city = $3, street = $4, pib = $5, maticni_broj = $6, is_active = $7
        WHERE id = $1
        "#,
    )
    .bind(company.id.as_i32())
    .bind(&company.name)
    .bind(&company.city)
    .bind(&company.street)
    .bind(&company.pib)
    .bind(&company.maticni_broj)
    .bind(company.is_active)
    .execute(&mut **tx)
    .await;

    match result {
        Ok(result) => Ok(result.rows_affected() > 0),
        Err(e) => {
            tracing::error!(error = %e, company_id = %company.id, "database error updating company");
            Err(DataStoreError::Internal(e.to_string()))
        }
    }
}

/// Deletes a company.
///
/// # Returns
/// * `Ok(true)` - Company existed and was deleted
/// * `Ok(false)` - Company did not exist
/// * `Err(DataStoreError::Internal)` - Database error
pub async fn delete(tx: &mut Transaction<'_, Postgres>, id: CompanyId) -> SqlResult<bool> {
    let result = sqlx::query(
        r#"
        DELETE FROM companies
        WHERE id = $1
        "#,
    )
    .bind(id.as_i32())
    .execute(&mut **tx)
    .await;

    match result {
        Ok(result) => Ok(result.rows_affected() > 0),
        Err(e) => {
            tracing::error!(error = %e, company_id = %id, "database error deleting company");
            Err(DataStoreError::Internal(e.to_string()))
        }
    }
}

/// Lists all companies in insertion order.
pub async fn list(tx: &mut Transaction<'_, Postgres>) -> SqlResult<Vec<Company>> {
    let result = sqlx::query_as::<_, CompanyRow>(
        r#"
        SELECT id, name, city, street, pib, maticni_broj, is_active
        FROM companies
        ORDER BY id ASC
        "#,
    )
    .fetch_all(&mut **tx)
    .await;

    match result {
        Ok(rows) => Ok(rows.into_iter().map(Company::from).collect()),
        Err(e) => {
            tracing::error!(error = %e, "database error listing companies");
            Err(DataStoreError::Internal(e.to_string()))
        }
    }
}

/// Counts the rows of the `companies` table.
pub async fn count(tx: &mut Transaction<'_, Postgres>) -> SqlResult<u64> {
    let result = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM companies")
        .fetch_one(&mut **tx)
        .await;

    match result {
        Ok(count) => Ok(count.max(0) as u64),
        Err(e) => {
            tracing::error!(error = %e, "database error counting companies");
            Err(DataStoreError::Internal(e.to_string()))
        }
    }
}
