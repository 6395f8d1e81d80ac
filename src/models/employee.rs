//! Employee record as the screen edits it, and its submission-ready form.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::casing::{self, RawRecord};
use crate::errors::SubmissionError;

/// Gender shown when none was chosen.
pub const DEFAULT_GENDER: &str = "Unspecified";
/// Profile colour shown when none was chosen.
pub const DEFAULT_PROFILE_COLOR: &str = "Default";

/// Server-assigned identifier of a persisted employee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmployeeId(pub i64);

impl std::fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One employee in client convention. Every editable field is text, as typed in the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmployeeRecord {
    /// Present only once the server has persisted the record.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<EmployeeId>,
    #[serde(deserialize_with = "lenient_string")]
    pub employee_number: String,
    #[serde(deserialize_with = "lenient_string")]
    pub first_name: String,
    #[serde(deserialize_with = "lenient_string")]
    pub last_name: String,
    #[serde(deserialize_with = "lenient_string")]
    pub full_name: String,
    #[serde(deserialize_with = "lenient_string")]
    pub salutation: String,
    #[serde(deserialize_with = "lenient_string")]
    pub gender: String,
    /// May contain spaces as thousands separators, e.g. `"50 000"`.
    #[serde(deserialize_with = "lenient_string")]
    pub gross_salary: String,
    #[serde(deserialize_with = "lenient_string")]
    pub profile_color: String,
}

impl Default for EmployeeRecord {
    fn default() -> Self {
        Self {
            id: None,
            employee_number: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            full_name: String::new(),
            salutation: String::new(),
            gender: DEFAULT_GENDER.to_string(),
            gross_salary: String::new(),
            profile_color: DEFAULT_PROFILE_COLOR.to_string(),
        }
    }
}

impl EmployeeRecord {
    /// True once the server has assigned an id. This alone decides create vs. update.
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    /// `fullName` if set, otherwise first and last name joined.
    pub fn display_full_name(&self) -> String {
        if !self.full_name.trim().is_empty() {
            return self.full_name.clone();
        }
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }

    /// Build from a record already in client convention.
    pub fn from_internal(record: RawRecord) -> Result<Self, serde_json::Error> {
        serde_json::from_value(Value::Object(record))
    }

    /// Build from a record as the server sent it.
    pub fn from_server(record: RawRecord) -> Result<Self, serde_json::Error> {
        Self::from_internal(casing::to_internal(record))
    }

    /// Copy of this record without its id, for duplicating a row into a draft.
    pub fn as_draft(&self) -> Self {
        Self {
            id: None,
            ..self.clone()
        }
    }
}

/// Accept a string, a number or null where the screen keeps text.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(String::new()),
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected text or number, got {}",
            other
        ))),
    }
}

/// Submission-ready employee: numeric employee number, plain salary, no id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedEmployee {
    pub employee_number: i64,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub salutation: String,
    pub gender: String,
    pub gross_salary: String,
    pub profile_color: String,
}

impl NormalizedEmployee {
    /// Request body in server convention.
    pub fn to_payload(&self) -> Result<RawRecord, serde_json::Error> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(casing::to_external(map)),
            other => Err(serde::de::Error::custom(format!(
                "employee serialized to non-object {}",
                other
            ))),
        }
    }
}

/// Validate and normalize a form record. Used for both creates and updates.
pub fn normalize_for_submission(
    record: &EmployeeRecord,
) -> Result<NormalizedEmployee, SubmissionError> {
    let number = record.employee_number.trim();
    if number.is_empty() {
        return Err(SubmissionError::Validation(
            "Employee number is required".to_string(),
        ));
    }
    let employee_number = number.parse::<i64>().map_err(|_| {
        SubmissionError::Validation(format!("Employee number '{}' is not numeric", number))
    })?;

    let gross_salary: String = record
        .gross_salary
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    if !is_plain_decimal(&gross_salary) {
        return Err(SubmissionError::Validation(format!(
            "Gross salary '{}' is not a valid amount",
            record.gross_salary
        )));
    }

    Ok(NormalizedEmployee {
        employee_number,
        first_name: record.first_name.clone(),
        last_name: record.last_name.clone(),
        full_name: record.display_full_name(),
        salutation: record.salutation.clone(),
        gender: record.gender.clone(),
        gross_salary,
        profile_color: record.profile_color.clone(),
    })
}

/// Optional leading `-`, digits, at most one `.` with digits on at least one side.
fn is_plain_decimal(s: &str) -> bool {
    let digits = s.strip_prefix('-').unwrap_or(s);
    let mut parts = digits.splitn(2, '.');
    let whole = parts.next().unwrap_or("");
    let frac = parts.next().unwrap_or("");

    (!whole.is_empty() || !frac.is_empty())
        && whole.chars().all(|c| c.is_ascii_digit())
        && frac.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn alice() -> EmployeeRecord {
        EmployeeRecord {
            employee_number: "1001".to_string(),
            first_name: "Alice".to_string(),
            last_name: "Anderson".to_string(),
            full_name: "Alice Anderson".to_string(),
            salutation: "Ms.".to_string(),
            gender: "Female".to_string(),
            gross_salary: "50 000".to_string(),
            profile_color: "Blue".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_default_uses_sentinels() {
        let blank = EmployeeRecord::default();
        assert_eq!(blank.gender, "Unspecified");
        assert_eq!(blank.profile_color, "Default");
        assert!(blank.employee_number.is_empty());
        assert!(!blank.is_persisted());
    }

    #[test]
    fn test_normalize_coerces_number_and_strips_salary() {
        let normalized = normalize_for_submission(&alice()).unwrap();
        assert_eq!(normalized.employee_number, 1001);
        assert_eq!(normalized.gross_salary, "50000");
    }

    #[test]
    fn test_normalize_strips_all_whitespace_kinds() {
        let mut record = alice();
        record.gross_salary = " 1\u{a0}250 000.50\t".to_string();
        let normalized = normalize_for_submission(&record).unwrap();
        assert_eq!(normalized.gross_salary, "1250000.50");
    }

    #[test]
    fn test_normalize_rejects_non_numeric_number() {
        let mut record = alice();
        record.employee_number = "abc".to_string();
        let err = normalize_for_submission(&record).unwrap_err();
        assert!(matches!(err, SubmissionError::Validation(_)));
    }

    #[test]
    fn test_normalize_rejects_blank_number() {
        let mut record = alice();
        record.employee_number = "   ".to_string();
        assert!(matches!(
            normalize_for_submission(&record),
            Err(SubmissionError::Validation(_))
        ));
    }

    #[test]
    fn test_normalize_rejects_malformed_salary() {
        for salary in ["", "50k", "1.2.3", "-", ".", "1e5"] {
            let mut record = alice();
            record.gross_salary = salary.to_string();
            assert!(
                matches!(
                    normalize_for_submission(&record),
                    Err(SubmissionError::Validation(_))
                ),
                "salary {:?} should be rejected",
                salary
            );
        }
    }

    #[test]
    fn test_normalize_fills_blank_full_name() {
        let mut record = alice();
        record.full_name = String::new();
        let normalized = normalize_for_submission(&record).unwrap();
        assert_eq!(normalized.full_name, "Alice Anderson");
    }

    #[test]
    fn test_payload_is_server_convention_without_id() {
        let mut record = alice();
        record.id = Some(EmployeeId(7));
        let payload = normalize_for_submission(&record)
            .unwrap()
            .to_payload()
            .unwrap();

        assert_eq!(payload["employee_number"], json!(1001));
        assert_eq!(payload["gross_salary"], json!("50000"));
        assert_eq!(payload["profile_color"], json!("Blue"));
        assert!(!payload.contains_key("id"));
        assert!(!payload.contains_key("employeeNumber"));
    }

    #[test]
    fn test_from_server_accepts_numbers_and_nulls() {
        let raw = match json!({
            "id": 7,
            "employee_number": 1001,
            "first_name": "Alice",
            "last_name": "Anderson",
            "salutation": null,
            "gross_salary": 50000,
            "department": "Finance"
        }) {
            Value::Object(map) => map,
            _ => unreachable!(),
        };

        let record = EmployeeRecord::from_server(raw).unwrap();
        assert_eq!(record.id, Some(EmployeeId(7)));
        assert_eq!(record.employee_number, "1001");
        assert_eq!(record.gross_salary, "50000");
        assert_eq!(record.salutation, "");
        // Missing fields fall back to the blank form.
        assert_eq!(record.gender, "Unspecified");
        assert_eq!(record.profile_color, "Default");
    }

    #[test]
    fn test_as_draft_drops_id() {
        let mut record = alice();
        record.id = Some(EmployeeId(3));
        let draft = record.as_draft();
        assert!(!draft.is_persisted());
        assert_eq!(draft.employee_number, "1001");
    }
}
