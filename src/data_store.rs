//! # Data Storage Abstraction
//!
//! This module defines the [`CompanyStore`] trait, the persistence boundary for
//! company rows, and [`InMemoryCompanyStore`], a mutex-guarded implementation used by
//! tests and by the daemon when no database is configured. The PostgreSQL
//! implementation lives in [`crate::sql`].
//!
//! ## Atomicity
//!
//! Every method is a single unit of work. [`CompanyStore::modify`] performs the
//! lookup, the caller's edit and the write together: either the edited row is
//! persisted in full or nothing is written. Dropping the returned future before it
//! completes is the cancellation signal, and a cancelled call writes nothing.
//!
//! ## Usage Examples
//!
//! ```rust
//! use companies::{Company, CompanyStore, InMemoryCompanyStore};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let store = InMemoryCompanyStore::new();
//! let id = store
//!     .insert(&Company {
//!         name: "Company A".to_string(),
//!         ..Company::default()
//!     })
//!     .await
//!     .unwrap();
//!
//! let found = store.get(id).await.unwrap().unwrap();
//! assert_eq!(found.id, id);
//! assert_eq!(found.name, "Company A");
//! # }
//! ```

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::{Company, CompanyId, DataStoreError};

/// An edit applied to a stored company inside [`CompanyStore::modify`].
pub type CompanyEdit<'a> = Box<dyn FnOnce(Company) -> Company + Send + 'a>;

/// Trait defining the persistence interface for company rows.
///
/// Implementors must be safe to share across tasks; the trait requires
/// `Send + Sync` so a store can sit behind an `Arc<dyn CompanyStore>`.
///
/// # Error Handling
///
/// A missing row is reported through `Ok(None)` / `Ok(false)`, never as an error.
/// `Err(DataStoreError)` is reserved for storage faults.
#[async_trait]
pub trait CompanyStore: Send + Sync {
    /// Lists all companies in insertion order.
    async fn list(&self) -> Result<Vec<Company>, DataStoreError>;

    /// Retrieves a company by identifier.
    ///
    /// # Returns
    /// * `Ok(Some(Company))` - Company found
    /// * `Ok(None)` - No such company
    async fn get(&self, id: CompanyId) -> Result<Option<Company>, DataStoreError>;

    /// Inserts a company and returns its store-assigned identifier.
    ///
    /// The identifier carried by `company` is ignored.
    async fn insert(&self, company: &Company) -> Result<CompanyId, DataStoreError>;

    /// Deletes a company.
    ///
    /// # Returns
    /// * `Ok(true)` - Company existed and was deleted
    /// * `Ok(false)` - No such company; nothing changed
    async fn delete(&self, id: CompanyId) -> Result<bool, DataStoreError>;

    /// Looks up a company, applies `edit` and persists the result atomically.
    ///
    /// The stored identifier is kept regardless of what `edit` returns.
    ///
    /// # Returns
    /// * `Ok(Some(Company))` - The company as persisted after the edit
    /// * `Ok(None)` - No such company; `edit` was not called
    async fn modify(
        &self,
        id: CompanyId,
        edit: CompanyEdit<'_>,
    ) -> Result<Option<Company>, DataStoreError>;

    /// Number of stored companies.
    async fn count(&self) -> Result<u64, DataStoreError>;
}

#[derive(Debug)]
struct InMemoryState {
    next_id: i32,
    companies: BTreeMap<CompanyId, Company>,
}

/// Thread-safe in-memory company store.
///
/// Identifiers are assigned from a counter starting at 1 and are never reused, even
/// after a delete, matching a database sequence.
#[derive(Debug)]
pub struct InMemoryCompanyStore {
    state: Mutex<InMemoryState>,
}

impl InMemoryCompanyStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(InMemoryState {
                next_id: 1,
                companies: BTreeMap::new(),
            }),
        }
    }

    /// Creates a store holding `companies` with their identifiers as given.
    ///
    /// Later inserts are numbered after the largest seeded identifier.
    pub fn seeded(companies: impl IntoIterator<Item = Company>) -> Self {
        let store = Self::new();
        {
            let mut state = store.state.lock().unwrap();
            for company in companies {
                state.next_id = state.next_id.max(company.id.as_i32().saturating_add(1));
                state.companies.insert(company.id, company);
            }
        }
        store
    }
}

impl Default for InMemoryCompanyStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CompanyStore for InMemoryCompanyStore {
    async fn list(&self) -> Result<Vec<Company>, DataStoreError> {
        let state = self.state.lock().unwrap();
        Ok(state.companies.values().cloned().collect())
    }

    async fn get(&self, id: CompanyId) -> Result<Option<Company>, DataStoreError> {
        let state = self.state.lock().unwrap();
        Ok(state.companies.get(&id).cloned())
    }

    async fn insert(&self, company: &Company) -> Result<CompanyId, DataStoreError> {
        let mut state = self.state.lock().unwrap();
        if state.next_id == i32::MAX {
            return Err(DataStoreError::Internal(
                "company identifier space exhausted".to_string(),
            ));
        }
        let id = CompanyId::new(state.next_id);
        state.next_id += 1;
        let stored = Company {
            id,
            ..company.clone()
        };
        state.companies.insert(id, stored);
        Ok(id)
    }

    async fn delete(&self, id: CompanyId) -> Result<bool, DataStoreError> {
        let mut state = self.state.lock().unwrap();
        Ok(state.companies.remove(&id).is_some())
    }

    async fn modify(
        &self,
        id: CompanyId,
        edit: CompanyEdit<'_>,
    ) -> Result<Option<Company>, DataStoreError> {
        let mut state = self.state.lock().unwrap();
        let Some(slot) = state.companies.get_mut(&id) else {
            return Ok(None);
        };
        let edited = Company {
            id,
            ..edit(slot.clone())
        };
        *slot = edited.clone();
        Ok(Some(edited))
    }

    async fn count(&self) -> Result<u64, DataStoreError> {
        let state = self.state.lock().unwrap();
        Ok(state.companies.len() as u64)
    }
}
