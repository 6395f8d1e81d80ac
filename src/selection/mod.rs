//! Which record, if any, is loaded into the edit form.

use crate::models::{EmployeeId, EmployeeRecord};

/// Form selection. Owned by the presentation layer and passed into the coordinator.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SelectionState {
    /// Nothing loaded; the form shows the blank record.
    #[default]
    Empty,
    /// A table row is loaded into the form.
    Editing(EmployeeRecord),
}

impl SelectionState {
    pub fn select_record(&mut self, record: EmployeeRecord) {
        *self = SelectionState::Editing(record);
    }

    pub fn cancel(&mut self) {
        *self = SelectionState::Empty;
    }

    pub fn reset(&mut self) {
        *self = SelectionState::Empty;
    }

    /// Always clears, after either a create or an update.
    pub fn submit_succeeded(&mut self) {
        *self = SelectionState::Empty;
    }

    pub fn selected(&self) -> Option<&EmployeeRecord> {
        match self {
            SelectionState::Empty => None,
            SelectionState::Editing(record) => Some(record),
        }
    }

    /// Id of the loaded record when it is persisted.
    pub fn editing_id(&self) -> Option<EmployeeId> {
        self.selected().and_then(|record| record.id)
    }

    /// Derived on every call: an update iff a persisted record is loaded.
    pub fn is_update(&self) -> bool {
        self.editing_id().is_some()
    }

    /// Record to pre-fill the form with.
    pub fn form_record(&self) -> EmployeeRecord {
        self.selected().cloned().unwrap_or_default()
    }
}
