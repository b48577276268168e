//! # Company Service
//!
//! [`CompanyService`] is the business layer between the HTTP handlers and a
//! [`CompanyStore`]. It owns the store and the two [`Merger`] strategies, reports a
//! missing company as [`CompanyError::NotFound`], and lets storage faults propagate
//! unchanged as [`CompanyError::Storage`].
//!
//! Every operation is one store call. Partial and full updates go through
//! [`CompanyStore::modify`], so the lookup and the write happen as one unit.
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use companies::{CompanyPatch, CompanyService, InMemoryCompanyStore, MergeStrategy};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), companies::CompanyError> {
//! let service = CompanyService::new(Arc::new(InMemoryCompanyStore::new()));
//! assert!(service.list_companies().await?.is_none());
//!
//! let id = service.create_company(&Default::default()).await?;
//! let patch = CompanyPatch {
//!     city: Some("Kragujevac".to_string()),
//!     ..CompanyPatch::default()
//! };
//! service
//!     .update_company_by_merge(id, &patch, MergeStrategy::Mapping)
//!     .await?;
//! assert_eq!(service.get_company(id).await?.city, "Kragujevac");
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use crate::{
    Company, CompanyError, CompanyId, CompanyPatch, CompanyStore, FieldWalkMerger, MappingMerger,
    MergeStrategy, Merger,
};

/// Business operations over stored companies.
pub struct CompanyService {
    store: Arc<dyn CompanyStore>,
    field_walk: Arc<dyn Merger>,
    mapping: Arc<dyn Merger>,
}

impl CompanyService {
    /// Creates a service over `store` with the built-in mergers.
    pub fn new(store: Arc<dyn CompanyStore>) -> Self {
        Self::with_mergers(store, Arc::new(FieldWalkMerger), Arc::new(MappingMerger))
    }

    /// Creates a service with caller-supplied mergers for each strategy.
    pub fn with_mergers(
        store: Arc<dyn CompanyStore>,
        field_walk: Arc<dyn Merger>,
        mapping: Arc<dyn Merger>,
    ) -> Self {
        Self {
            store,
            field_walk,
            mapping,
        }
    }

    fn merger(&self, strategy: MergeStrategy) -> &dyn Merger {
        match strategy {
            MergeStrategy::FieldWalk => self.field_walk.as_ref(),
            MergeStrategy::Mapping => self.mapping.as_ref(),
        }
    }

    /// Lists every company in insertion order.
    ///
    /// Returns `Ok(None)` when the store is empty.
    pub async fn list_companies(&self) -> Result<Option<Vec<Company>>, CompanyError> {
        let companies = self.store.list().await?;
        tracing::debug!(count = companies.len(), "listed companies");
        if companies.is_empty() {
            Ok(None)
        } else {
            Ok(Some(companies))
        }
    }

    /// Retrieves one company.
    pub async fn get_company(&self, id: CompanyId) -> Result<Company, CompanyError> {
        self.store
            .get(id)
            .await?
            .ok_or(CompanyError::NotFound(id))
    }

    /// Stores a new company and returns its assigned identifier.
    ///
    /// The identifier carried by `company` is ignored.
    pub async fn create_company(&self, company: &Company) -> Result<CompanyId, CompanyError> {
        let id = self.store.insert(company).await?;
        tracing::info!(company_id = %id, "created company");
        Ok(id)
    }

    /// Deletes a company.
    pub async fn delete_company(&self, id: CompanyId) -> Result<(), CompanyError> {
        if !self.store.delete(id).await? {
            tracing::debug!(company_id = %id, "delete of missing company");
            return Err(CompanyError::NotFound(id));
        }
        tracing::info!(company_id = %id, "deleted company");
        Ok(())
    }

    /// Applies the meaningful fields of `patch` to a stored company.
    ///
    /// Absent, empty and whitespace-only patch values leave the stored field as it is.
    pub async fn update_company_by_merge(
        &self,
        id: CompanyId,
        patch: &CompanyPatch,
        strategy: MergeStrategy,
    ) -> Result<(), CompanyError> {
        let merger = self.merger(strategy);
        let updated = self
            .store
            .modify(id, Box::new(|existing| merger.merge(existing, patch)))
            .await?;
        match updated {
            Some(_) => {
                tracing::info!(company_id = %id, %strategy, "merged company update");
                Ok(())
            }
            None => Err(CompanyError::NotFound(id)),
        }
    }

    /// Overwrites every field of a stored company except its identifier.
    pub async fn replace_company(
        &self,
        id: CompanyId,
        company: &Company,
    ) -> Result<(), CompanyError> {
        let replaced = self
            .store
            .modify(id, Box::new(|_| company.clone()))
            .await?;
        match replaced {
            Some(_) => {
                tracing::info!(company_id = %id, "replaced company");
                Ok(())
            }
            None => Err(CompanyError::NotFound(id)),
        }
    }
}
