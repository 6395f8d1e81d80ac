//! REST-backed repository.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde_json::Value;

use super::EmployeeRepository;
use crate::casing::RawRecord;
use crate::config::Config;
use crate::errors::RepositoryError;
use crate::models::EmployeeId;

/// Employee repository talking to `{base_url}/employees`.
#[derive(Debug, Clone)]
pub struct HttpEmployeeRepository {
    client: Client,
    base_url: String,
    page_size: usize,
}

impl HttpEmployeeRepository {
    pub fn new(
        base_url: &str,
        page_size: usize,
        timeout: Duration,
    ) -> Result<Self, RepositoryError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            page_size,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, RepositoryError> {
        Self::new(&config.api_url, config.page_size, config.request_timeout)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl EmployeeRepository for HttpEmployeeRepository {
    async fn list(&self) -> Result<Vec<RawRecord>, RepositoryError> {
        let resp = self
            .client
            .get(self.url("/employees"))
            .query(&[("page", 1usize), ("size", self.page_size)])
            .send()
            .await?;

        let body = read_json(resp).await?;
        let items = match body {
            Value::Array(items) => items,
            Value::Object(mut map) => match map.remove("items") {
                Some(Value::Array(items)) => items,
                _ => {
                    return Err(RepositoryError::Decode(
                        "listing has no items array".to_string(),
                    ))
                }
            },
            other => {
                return Err(RepositoryError::Decode(format!(
                    "unexpected listing body: {}",
                    other
                )))
            }
        };

        let records = items
            .into_iter()
            .map(into_record)
            .collect::<Result<Vec<_>, _>>()?;
        tracing::debug!("Listed {} employees from {}", records.len(), self.base_url);
        Ok(records)
    }

    async fn create(&self, record: RawRecord) -> Result<RawRecord, RepositoryError> {
        let resp = self
            .client
            .post(self.url("/employees"))
            .json(&record)
            .send()
            .await?;
        into_record(read_json(resp).await?)
    }

    async fn update(
        &self,
        id: EmployeeId,
        record: RawRecord,
    ) -> Result<RawRecord, RepositoryError> {
        let resp = self
            .client
            .put(self.url(&format!("/employees/{}", id)))
            .json(&record)
            .send()
            .await?;
        into_record(read_json(resp).await?)
    }
}

/// Body of a 2xx response as JSON, or a rejection carrying the server's detail.
async fn read_json(resp: Response) -> Result<Value, RepositoryError> {
    let status = resp.status();
    let bytes = resp.bytes().await?;

    if !status.is_success() {
        let detail = extract_detail(&bytes);
        tracing::warn!("Employee API returned {}: {:?}", status, detail);
        return Err(RepositoryError::Rejected {
            status: status.as_u16(),
            detail,
        });
    }

    Ok(serde_json::from_slice(&bytes)?)
}

fn into_record(value: Value) -> Result<RawRecord, RepositoryError> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(RepositoryError::Decode(format!(
            "expected employee object, got {}",
            other
        ))),
    }
}

/// `detail` as text, or the joined `msg` entries of a validation list.
fn extract_detail(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    match value.get("detail")? {
        Value::String(detail) => Some(detail.clone()),
        Value::Array(entries) => {
            let messages: Vec<&str> = entries
                .iter()
                .filter_map(|entry| entry.get("msg").and_then(Value::as_str))
                .collect();
            if messages.is_empty() {
                None
            } else {
                Some(messages.join("; "))
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_detail_string() {
        let body = br#"{"detail": "Employee number 1001 already exists"}"#;
        assert_eq!(
            extract_detail(body).as_deref(),
            Some("Employee number 1001 already exists")
        );
    }

    #[test]
    fn test_extract_detail_validation_list() {
        let body = br#"{"detail": [{"loc": ["body", "employee_number"], "msg": "field required"}, {"msg": "value is not a valid integer"}]}"#;
        assert_eq!(
            extract_detail(body).as_deref(),
            Some("field required; value is not a valid integer")
        );
    }

    #[test]
    fn test_extract_detail_absent() {
        assert_eq!(extract_detail(br#"{"error": "boom"}"#), None);
        assert_eq!(extract_detail(b"<html>Bad Gateway</html>"), None);
        assert_eq!(extract_detail(br#"{"detail": 42}"#), None);
    }

    #[test]
    fn test_base_url_is_trimmed() {
        let repo =
            HttpEmployeeRepository::new("http://localhost:8080/api/", 100, Duration::from_secs(5))
                .unwrap();
        assert_eq!(repo.base_url(), "http://localhost:8080/api");
        assert_eq!(repo.url("/employees"), "http://localhost:8080/api/employees");
    }
}
