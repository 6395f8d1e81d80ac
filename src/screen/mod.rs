//! Presentation-facing model of the employee screen: the table and the edit form.

use crate::coordinator::{SubmissionCoordinator, SubmissionOutcome};
use crate::errors::SubmissionError;
use crate::models::EmployeeRecord;
use crate::repository::EmployeeRepository;
use crate::selection::SelectionState;

/// One table row, with the columns the table shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow<'a> {
    pub employee_number: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub salutation: &'a str,
    pub profile_color: &'a str,
}

impl<'a> From<&'a EmployeeRecord> for TableRow<'a> {
    fn from(record: &'a EmployeeRecord) -> Self {
        Self {
            employee_number: &record.employee_number,
            first_name: &record.first_name,
            last_name: &record.last_name,
            salutation: &record.salutation,
            profile_color: &record.profile_color,
        }
    }
}

/// What the form renders: the record to pre-fill and whether it is an update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormView {
    pub record: EmployeeRecord,
    pub is_update: bool,
}

/// Owns the listing and the selection for one screen instance.
pub struct EmployeeScreen<R> {
    coordinator: SubmissionCoordinator<R>,
    employees: Vec<EmployeeRecord>,
    selection: SelectionState,
    loaded: bool,
}

impl<R: EmployeeRepository> EmployeeScreen<R> {
    pub fn new(repo: R) -> Self {
        Self {
            coordinator: SubmissionCoordinator::new(repo),
            employees: Vec::new(),
            selection: SelectionState::Empty,
            loaded: false,
        }
    }

    /// Fetch the listing once per activation.
    pub async fn activate(&mut self) -> Result<(), SubmissionError> {
        if self.loaded {
            return Ok(());
        }
        self.refresh().await
    }

    /// Re-list on demand.
    pub async fn refresh(&mut self) -> Result<(), SubmissionError> {
        self.employees = self.coordinator.load().await?;
        self.loaded = true;
        Ok(())
    }

    /// Called when the screen is left; the next activation fetches again.
    pub fn deactivate(&mut self) {
        self.loaded = false;
        self.selection.reset();
    }

    pub fn employees(&self) -> &[EmployeeRecord] {
        &self.employees
    }

    pub fn table(&self) -> Vec<TableRow<'_>> {
        self.employees.iter().map(TableRow::from).collect()
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    /// Row click.
    pub fn select_row(&mut self, index: usize) -> Result<(), SubmissionError> {
        let record = self
            .employees
            .get(index)
            .cloned()
            .ok_or_else(|| SubmissionError::Selection(format!("No employee at row {}", index)))?;
        self.selection.select_record(record);
        Ok(())
    }

    /// "Add employee": start a blank draft.
    pub fn add(&mut self) {
        self.selection.reset();
    }

    pub fn cancel(&mut self) {
        self.selection.cancel();
    }

    pub fn form(&self) -> FormView {
        FormView {
            record: self.selection.form_record(),
            is_update: self.selection.is_update(),
        }
    }

    /// Submit the form; on success the listing is replaced by the refetched one.
    pub async fn submit(
        &mut self,
        form: &EmployeeRecord,
    ) -> Result<EmployeeRecord, SubmissionError> {
        let outcome = self.coordinator.submit(form, &mut self.selection).await?;
        Ok(self.apply(outcome))
    }

    /// Duplicate a row as a new employee. `None` means no row was chosen.
    pub async fn quick_add(
        &mut self,
        record: Option<&EmployeeRecord>,
    ) -> Result<EmployeeRecord, SubmissionError> {
        let outcome = self.coordinator.quick_add(record).await?;
        Ok(self.apply(outcome))
    }

    fn apply(&mut self, outcome: SubmissionOutcome) -> EmployeeRecord {
        self.employees = outcome.employees;
        self.loaded = true;
        outcome.saved
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::models::EmployeeId;
    use crate::repository::InMemoryEmployeeRepository;

    fn screen() -> (
        EmployeeScreen<Arc<InMemoryEmployeeRepository>>,
        Arc<InMemoryEmployeeRepository>,
    ) {
        let repo = Arc::new(InMemoryEmployeeRepository::with_sample_data());
        (EmployeeScreen::new(repo.clone()), repo)
    }

    #[tokio::test]
    async fn test_activate_fetches_once() {
        let (mut screen, repo) = screen();

        screen.activate().await.unwrap();
        screen.activate().await.unwrap();
        assert_eq!(repo.calls().list, 1);

        screen.refresh().await.unwrap();
        assert_eq!(repo.calls().list, 2);

        screen.deactivate();
        screen.activate().await.unwrap();
        assert_eq!(repo.calls().list, 3);
    }

    #[tokio::test]
    async fn test_table_columns_follow_repository_order() {
        let (mut screen, _) = screen();
        screen.activate().await.unwrap();

        let table = screen.table();
        assert_eq!(table.len(), 2);
        assert_eq!(
            table[0],
            TableRow {
                employee_number: "1001",
                first_name: "Alice",
                last_name: "Anderson",
                salutation: "Ms.",
                profile_color: "Blue",
            }
        );
        assert_eq!(table[1].first_name, "Bob");
    }

    #[tokio::test]
    async fn test_select_add_cancel() {
        let (mut screen, _) = screen();
        screen.activate().await.unwrap();

        assert!(!screen.form().is_update);

        screen.select_row(1).unwrap();
        let form = screen.form();
        assert!(form.is_update);
        assert_eq!(form.record.first_name, "Bob");

        screen.add();
        assert_eq!(screen.form().record, EmployeeRecord::default());

        screen.select_row(0).unwrap();
        screen.cancel();
        assert_eq!(screen.selection(), &SelectionState::Empty);

        let err = screen.select_row(5).unwrap_err();
        assert!(matches!(err, SubmissionError::Selection(_)));
    }

    #[tokio::test]
    async fn test_submit_update_replaces_listing() {
        let (mut screen, repo) = screen();
        screen.activate().await.unwrap();
        screen.select_row(0).unwrap();

        let mut edited = screen.form().record;
        edited.last_name = "Archer".to_string();
        edited.gross_salary = "55 000".to_string();

        let saved = screen.submit(&edited).await.unwrap();

        assert_eq!(saved.id, Some(EmployeeId(1)));
        assert_eq!(screen.employees()[0].last_name, "Archer");
        assert_eq!(screen.employees()[0].gross_salary, "55000");
        assert!(!screen.form().is_update);
        assert_eq!(repo.calls().update, 1);
        assert_eq!(repo.calls().list, 2);
    }

    #[tokio::test]
    async fn test_failed_submit_keeps_form_and_listing() {
        let (mut screen, repo) = screen();
        screen.activate().await.unwrap();
        screen.select_row(1).unwrap();

        let mut edited = screen.form().record;
        edited.employee_number = "1001".to_string();

        let err = screen.submit(&edited).await.unwrap_err();
        assert_eq!(err.message(), "Employee number 1001 already exists");
        assert!(screen.form().is_update);
        assert_eq!(screen.form().record.first_name, "Bob");
        assert_eq!(screen.employees()[1].employee_number, "1002");
        assert_eq!(repo.calls().list, 1);
    }

    #[tokio::test]
    async fn test_quick_add_duplicates_row_as_draft() {
        let (mut screen, repo) = screen();
        screen.activate().await.unwrap();

        let existing = screen.employees()[0].clone();
        let err = screen.quick_add(Some(&existing)).await.unwrap_err();
        assert!(matches!(err, SubmissionError::Selection(_)));

        let mut draft = existing.as_draft();
        draft.employee_number = "2001".to_string();
        let saved = screen.quick_add(Some(&draft)).await.unwrap();

        assert_eq!(saved.id, Some(EmployeeId(3)));
        assert_eq!(screen.employees().len(), 3);
        assert_eq!(repo.calls().create, 1);
    }
}
