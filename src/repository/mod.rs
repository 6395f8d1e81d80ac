//! Record repository capability consumed by the coordinator.
//!
//! Records cross this boundary in server convention, as raw JSON objects.

mod http;
mod memory;

pub use http::*;
pub use memory::*;

use std::sync::Arc;

use async_trait::async_trait;

use crate::casing::RawRecord;
use crate::errors::RepositoryError;
use crate::models::EmployeeId;

/// Page size requested by the listing; only the first page is ever fetched.
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// List, create and update employees. Implementations never retry.
#[async_trait]
pub trait EmployeeRepository: Send + Sync {
    /// Bulk fetch, in the order the repository returns them.
    async fn list(&self) -> Result<Vec<RawRecord>, RepositoryError>;

    /// Persist a new record. The repository assigns the id.
    async fn create(&self, record: RawRecord) -> Result<RawRecord, RepositoryError>;

    /// Replace the fields of the record stored under `id`.
    async fn update(&self, id: EmployeeId, record: RawRecord)
        -> Result<RawRecord, RepositoryError>;
}

#[async_trait]
impl<R: EmployeeRepository + ?Sized> EmployeeRepository for Arc<R> {
    async fn list(&self) -> Result<Vec<RawRecord>, RepositoryError> {
        (**self).list().await
    }

    async fn create(&self, record: RawRecord) -> Result<RawRecord, RepositoryError> {
        (**self).create(record).await
    }

    async fn update(
        &self,
        id: EmployeeId,
        record: RawRecord,
    ) -> Result<RawRecord, RepositoryError> {
        (**self).update(id, record).await
    }
}
