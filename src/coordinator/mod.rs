//! Submission routing and list reconciliation.
//!
//! After every successful write the list is fetched again from the repository; responses are
//! never spliced into the cached list.

use crate::casing::{self, RawRecord};
use crate::errors::{RepositoryError, RepositoryOperation, SubmissionError};
use crate::models::{normalize_for_submission, EmployeeId, EmployeeRecord};
use crate::repository::EmployeeRepository;
use crate::selection::SelectionState;

/// Which write a submission turned into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitAction {
    Created,
    Updated,
}

/// Result of a successful write and the re-list that follows it.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionOutcome {
    pub action: SubmitAction,
    /// The record as the repository returned it.
    pub saved: EmployeeRecord,
    /// Fresh listing, in repository order.
    pub employees: Vec<EmployeeRecord>,
}

/// Routes form submissions to the repository.
///
/// Makes exactly one write per call and never retries. Callers must not overlap
/// submissions for the same record.
#[derive(Debug, Clone)]
pub struct SubmissionCoordinator<R> {
    repo: R,
}

impl<R: EmployeeRepository> SubmissionCoordinator<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Fetch and adapt the listing.
    pub async fn load(&self) -> Result<Vec<EmployeeRecord>, SubmissionError> {
        self.fetch_employees()
            .await
            .map_err(|e| repository_failure(e, RepositoryOperation::List))
    }

    /// Create or update `form` depending on `selection`.
    ///
    /// On a failed write `selection` is left as it was. Once the write succeeds the
    /// selection is cleared, even if the following re-list fails.
    pub async fn submit(
        &self,
        form: &EmployeeRecord,
        selection: &mut SelectionState,
    ) -> Result<SubmissionOutcome, SubmissionError> {
        let normalized = normalize_for_submission(form)?;
        let payload = normalized
            .to_payload()
            .map_err(|e| SubmissionError::Validation(e.to_string()))?;

        let (action, written) = match selection.editing_id() {
            Some(id) => {
                tracing::debug!("Routing submission to update of employee {}", id);
                let written = self
                    .repo
                    .update(id, payload)
                    .await
                    .map_err(|e| repository_failure(e, RepositoryOperation::Update))?;
                (SubmitAction::Updated, written)
            }
            None => {
                tracing::debug!("Routing submission to create");
                let written = self
                    .repo
                    .create(payload)
                    .await
                    .map_err(|e| repository_failure(e, RepositoryOperation::Create))?;
                (SubmitAction::Created, written)
            }
        };

        let written_id = selection.editing_id();
        selection.submit_succeeded();
        self.reconcile(action, written, written_id, normalized.employee_number).await
    }

    /// Duplicate a table row into a new record.
    ///
    /// Rejects a missing row or one that already exists, without touching the repository.
    pub async fn quick_add(
        &self,
        record: Option<&EmployeeRecord>,
    ) -> Result<SubmissionOutcome, SubmissionError> {
        let record = record.ok_or_else(|| {
            SubmissionError::Selection("Select an employee to add first".to_string())
        })?;

        if record.is_persisted() {
            return Err(SubmissionError::Selection(format!(
                "Employee {} already exists",
                record.employee_number
            )));
        }

        let normalized = normalize_for_submission(record)?;
        let payload = normalized
            .to_payload()
            .map_err(|e| SubmissionError::Validation(e.to_string()))?;

        let written = self
            .repo
            .create(payload)
            .await
            .map_err(|e| repository_failure(e, RepositoryOperation::Create))?;

        self.reconcile(SubmitAction::Created, written, None, normalized.employee_number)
            .await
    }

    /// Re-list after a write, then pick the saved record.
    ///
    /// The re-list happens before the write response is decoded. An unreadable response
    /// falls back to the listed record with the written id, or with the employee number
    /// for a create.
    async fn reconcile(
        &self,
        action: SubmitAction,
        written: RawRecord,
        written_id: Option<EmployeeId>,
        employee_number: i64,
    ) -> Result<SubmissionOutcome, SubmissionError> {
        let employees = self.fetch_employees().await.map_err(|e| {
            tracing::warn!("Re-list after save failed: {}", e);
            SubmissionError::Repository(format!(
                "Employee saved but the list could not be refreshed: {}",
                e.user_message(RepositoryOperation::List)
            ))
        })?;

        let saved = match EmployeeRecord::from_server(written) {
            Ok(saved) => saved,
            Err(e) => {
                tracing::warn!("Unreadable write response, using listed record: {}", e);
                let number = employee_number.to_string();
                employees
                    .iter()
                    .find(|listed| match written_id {
                        Some(id) => listed.id == Some(id),
                        None => listed.employee_number.trim() == number,
                    })
                    .cloned()
                    .ok_or_else(|| {
                        SubmissionError::Repository(format!(
                            "Employee saved but response was invalid: {}",
                            e
                        ))
                    })?
            }
        };

        tracing::info!(
            "{} employee {} ({})",
            match action {
                SubmitAction::Created => "Created",
                SubmitAction::Updated => "Updated",
            },
            saved.employee_number,
            saved.display_full_name()
        );

        Ok(SubmissionOutcome {
            action,
            saved,
            employees,
        })
    }

    async fn fetch_employees(&self) -> Result<Vec<EmployeeRecord>, RepositoryError> {
        let raw = self.repo.list().await?;
        let employees = casing::list_to_internal(raw)
            .into_iter()
            .map(EmployeeRecord::from_internal)
            .collect::<Result<Vec<_>, _>>()?;
        tracing::info!("Loaded {} employees", employees.len());
        Ok(employees)
    }
}

fn repository_failure(err: RepositoryError, operation: RepositoryOperation) -> SubmissionError {
    tracing::warn!("Employee {:?} failed: {}", operation, err);
    SubmissionError::Repository(err.user_message(operation))
}
