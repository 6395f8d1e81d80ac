//! In-process repository: the local-only variant of the screen, the mock API's store,
//! and the test double for the coordinator.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::RwLock;

use super::{EmployeeRepository, DEFAULT_PAGE_SIZE};
use crate::casing::RawRecord;
use crate::errors::RepositoryError;
use crate::models::EmployeeId;

/// Number of calls made to each repository operation.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RepositoryCalls {
    pub list: usize,
    pub create: usize,
    pub update: usize,
}

#[derive(Debug, Default)]
struct CallCounter {
    list: AtomicUsize,
    create: AtomicUsize,
    update: AtomicUsize,
}

#[derive(Debug)]
struct Store {
    records: Vec<RawRecord>,
    next_id: i64,
}

/// Employees kept in memory, in server convention, in insertion order.
#[derive(Debug)]
pub struct InMemoryEmployeeRepository {
    store: RwLock<Store>,
    calls: CallCounter,
    /// Rejection returned by the next write call.
    fail_next: Mutex<Option<(u16, Option<String>)>>,
}

impl Default for InMemoryEmployeeRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryEmployeeRepository {
    pub fn new() -> Self {
        Self::from_records(Vec::new())
    }

    /// Seed with records in server convention. Records without an id get one.
    pub fn from_records(records: Vec<RawRecord>) -> Self {
        let mut next_id = records
            .iter()
            .filter_map(record_id)
            .map(|id| id.0)
            .max()
            .unwrap_or(0)
            + 1;

        let records: Vec<RawRecord> = records
            .into_iter()
            .map(|mut record| {
                if record_id(&record).is_none() {
                    record.insert("id".to_string(), json!(next_id));
                    next_id += 1;
                }
                record
            })
            .collect();

        Self {
            store: RwLock::new(Store { records, next_id }),
            calls: CallCounter::default(),
            fail_next: Mutex::new(None),
        }
    }

    /// The two employees the screen starts with.
    pub fn with_sample_data() -> Self {
        Self::from_records(sample_employees())
    }

    /// Calls made so far.
    pub fn calls(&self) -> RepositoryCalls {
        RepositoryCalls {
            list: self.calls.list.load(Ordering::SeqCst),
            create: self.calls.create.load(Ordering::SeqCst),
            update: self.calls.update.load(Ordering::SeqCst),
        }
    }

    /// Make the next create or update fail with `status` and an optional detail.
    pub fn fail_next_write(&self, status: u16, detail: Option<&str>) {
        if let Ok(mut guard) = self.fail_next.lock() {
            *guard = Some((status, detail.map(str::to_string)));
        }
    }

    pub async fn len(&self) -> usize {
        self.store.read().await.records.len()
    }

    /// One page of the listing, 1-based. Counts as a list call.
    pub async fn list_page(&self, page: usize, size: usize) -> Vec<RawRecord> {
        self.calls.list.fetch_add(1, Ordering::SeqCst);
        let store = self.store.read().await;
        store
            .records
            .iter()
            .skip(page.saturating_sub(1).saturating_mul(size))
            .take(size)
            .cloned()
            .collect()
    }

    fn take_injected_failure(&self) -> Option<RepositoryError> {
        let injected = self.fail_next.lock().ok()?.take()?;
        let (status, detail) = injected;
        Some(RepositoryError::Rejected { status, detail })
    }
}

#[async_trait]
impl EmployeeRepository for InMemoryEmployeeRepository {
    async fn list(&self) -> Result<Vec<RawRecord>, RepositoryError> {
        Ok(self.list_page(1, DEFAULT_PAGE_SIZE).await)
    }

    async fn create(&self, mut record: RawRecord) -> Result<RawRecord, RepositoryError> {
        self.calls.create.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.take_injected_failure() {
            return Err(err);
        }

        let number = require_employee_number(&record)?;
        let mut store = self.store.write().await;
        ensure_unique(&store.records, &number, None)?;

        let id = store.next_id;
        store.next_id += 1;
        record.insert("id".to_string(), json!(id));
        store.records.push(record.clone());

        tracing::info!("Created employee {} (number {})", id, number);
        Ok(record)
    }

    async fn update(
        &self,
        id: EmployeeId,
        mut record: RawRecord,
    ) -> Result<RawRecord, RepositoryError> {
        self.calls.update.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.take_injected_failure() {
            return Err(err);
        }

        let number = require_employee_number(&record)?;
        let mut store = self.store.write().await;
        let index = store
            .records
            .iter()
            .position(|existing| record_id(existing) == Some(id))
            .ok_or_else(|| RepositoryError::rejected(404, format!("Employee {} not found", id)))?;
        ensure_unique(&store.records, &number, Some(id))?;

        record.insert("id".to_string(), json!(id.0));
        store.records[index] = record.clone();

        tracing::info!("Updated employee {} (number {})", id, number);
        Ok(record)
    }
}

fn record_id(record: &RawRecord) -> Option<EmployeeId> {
    record.get("id").and_then(Value::as_i64).map(EmployeeId)
}

/// Employee number as text, whether stored as a number or a string.
fn employee_number(record: &RawRecord) -> Option<String> {
    match record.get("employee_number")? {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    }
}

fn require_employee_number(record: &RawRecord) -> Result<String, RepositoryError> {
    employee_number(record)
        .ok_or_else(|| RepositoryError::rejected(422, "employee_number is required"))
}

fn ensure_unique(
    records: &[RawRecord],
    number: &str,
    except: Option<EmployeeId>,
) -> Result<(), RepositoryError> {
    let taken = records.iter().any(|existing| {
        record_id(existing) != except && employee_number(existing).as_deref() == Some(number)
    });

    if taken {
        return Err(RepositoryError::rejected(
            409,
            format!("Employee number {} already exists", number),
        ));
    }
    Ok(())
}

fn sample_employees() -> Vec<RawRecord> {
    let samples = [
        json!({
            "employee_number": 1001,
            "first_name": "Alice",
            "last_name": "Anderson",
            "full_name": "Alice Anderson",
            "salutation": "Ms.",
            "gender": "Female",
            "gross_salary": "50000",
            "profile_color": "Blue"
        }),
        json!({
            "employee_number": 1002,
            "first_name": "Bob",
            "last_name": "Brown",
            "full_name": "Bob Brown",
            "salutation": "Mr.",
            "gender": "Male",
            "gross_salary": "60000",
            "profile_color": "Green"
        }),
    ];

    samples
        .into_iter()
        .filter_map(|value| match value {
            Value::Object(map) => Some(map),
            _ => None,
        })
        .collect()
}
