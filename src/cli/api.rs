//! HTTP client for the remote expense collection.
//!
//! Every response is wrapped in an envelope `{ success, data, message }`.
//! The envelope's own `success` flag is honored: a 2xx response carrying
//! `success: false` is surfaced as a rejection with the envelope message.

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use super::state::{Expense, ExpenseDraft};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";

#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never completed or the payload could not be read.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// Non-2xx status with no usable message in the body.
    #[error("{context} (HTTP {status})")]
    Status {
        status: StatusCode,
        context: &'static str,
    },
    /// The server rejected the request and said why.
    #[error("{message}")]
    Rejected { message: String },
}

// No `#[serde(default)]` here: serde already fills missing `Option` fields
// with `None`, and a field-level default would put a `T: Default` bound on
// the derived impl.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
}

impl<T> Envelope<T> {
    fn into_data(self, status: StatusCode, context: &'static str) -> Result<T, ApiError> {
        if !self.success {
            return Err(match self.message {
                Some(message) => ApiError::Rejected { message },
                None => ApiError::Status { status, context },
            });
        }
        self.data.ok_or(ApiError::Status { status, context })
    }
}

/// Seam between the controller and the wire; the in-memory fake used by the
/// controller tests implements this too.
#[async_trait]
pub trait ExpenseApi {
    async fn list_expenses(&self) -> Result<Vec<Expense>, ApiError>;
    async fn get_expense(&self, id: i64) -> Result<Expense, ApiError>;
    async fn create_expense(&self, draft: &ExpenseDraft) -> Result<Expense, ApiError>;
    async fn update_expense(&self, id: i64, draft: &ExpenseDraft) -> Result<Expense, ApiError>;
    async fn delete_expense(&self, id: i64) -> Result<(), ApiError>;
}

#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    base_url: String,
}

impl Client {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    /// Base URL from `EXPENSE_API_URL`, falling back to localhost.
    pub fn from_env() -> Self {
        let base = std::env::var("EXPENSE_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into());
        Self::new(base)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Unwrap an envelope without reading error bodies; list/get/delete have no
/// structured detail on failure.
async fn unwrap_envelope<T: DeserializeOwned>(
    resp: Response,
    context: &'static str,
) -> Result<T, ApiError> {
    let status = resp.status();
    if !status.is_success() {
        return Err(ApiError::Status { status, context });
    }
    let envelope: Envelope<T> = resp.json().await?;
    envelope.into_data(status, context)
}

/// Like [`unwrap_envelope`], but on failure tries to pull a structured
/// `message` out of the error body first (create/update only).
async fn unwrap_envelope_detailed<T: DeserializeOwned>(
    resp: Response,
    context: &'static str,
) -> Result<T, ApiError> {
    let status = resp.status();
    if !status.is_success() {
        let message = resp
            .json::<Envelope<serde_json::Value>>()
            .await
            .ok()
            .and_then(|e| e.message);
        return Err(match message {
            Some(message) => ApiError::Rejected { message },
            None => ApiError::Status { status, context },
        });
    }
    let envelope: Envelope<T> = resp.json().await?;
    envelope.into_data(status, context)
}

#[async_trait]
impl ExpenseApi for Client {
    async fn list_expenses(&self) -> Result<Vec<Expense>, ApiError> {
        debug!("GET /expenses");
        let resp = self
            .http
            .get(self.url("/expenses"))
            .header(ACCEPT, "application/json")
            .send()
            .await?;
        unwrap_envelope(resp, "Failed to fetch expenses").await
    }

    async fn get_expense(&self, id: i64) -> Result<Expense, ApiError> {
        debug!(id, "GET /expenses/{{id}}");
        let resp = self
            .http
            .get(self.url(&format!("/expenses/{id}")))
            .header(ACCEPT, "application/json")
            .send()
            .await?;
        unwrap_envelope(resp, "Failed to fetch expense").await
    }

    async fn create_expense(&self, draft: &ExpenseDraft) -> Result<Expense, ApiError> {
        debug!(title = %draft.title, "POST /expenses");
        let resp = self
            .http
            .post(self.url("/expenses"))
            .header(ACCEPT, "application/json")
            .json(draft)
            .send()
            .await?;
        unwrap_envelope_detailed(resp, "Failed to create expense").await
    }

    async fn update_expense(&self, id: i64, draft: &ExpenseDraft) -> Result<Expense, ApiError> {
        debug!(id, "PUT /expenses/{{id}}");
        let resp = self
            .http
            .put(self.url(&format!("/expenses/{id}")))
            .header(ACCEPT, "application/json")
            .json(draft)
            .send()
            .await?;
        unwrap_envelope_detailed(resp, "Failed to update expense").await
    }

    async fn delete_expense(&self, id: i64) -> Result<(), ApiError> {
        debug!(id, "DELETE /expenses/{{id}}");
        let resp = self
            .http
            .delete(self.url(&format!("/expenses/{id}")))
            .header(ACCEPT, "application/json")
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                status,
                context: "Failed to delete expense",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn envelope_unwraps_payload() {
        let env: Envelope<Vec<Expense>> = serde_json::from_str(
            r#"{
                "success": true,
                "data": [{
                    "id": 3,
                    "title": "Groceries",
                    "amount": 42.75,
                    "category": "Food",
                    "expense_date": "2024-01-15",
                    "created_at": "2024-01-15T10:00:00Z"
                }]
            }"#,
        )
        .unwrap();
        let list = env.into_data(StatusCode::OK, "Failed to fetch expenses").unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].id, 3);
        assert_eq!(list[0].amount, Decimal::from_str_exact("42.75").unwrap());
        assert_eq!(list[0].category.as_deref(), Some("Food"));
        assert_eq!(list[0].updated_at, None);
    }

    #[test]
    fn envelope_tolerates_null_category() {
        let env: Envelope<Expense> = serde_json::from_str(
            r#"{
                "success": true,
                "data": {
                    "id": 1,
                    "title": "Bus",
                    "amount": 2.5,
                    "category": null,
                    "expense_date": "2024-02-01"
                }
            }"#,
        )
        .unwrap();
        let expense = env.into_data(StatusCode::OK, "Failed to fetch expense").unwrap();
        assert_eq!(expense.category, None);
    }

    #[test]
    fn success_false_surfaces_envelope_message() {
        let env: Envelope<Expense> =
            serde_json::from_str(r#"{"success": false, "message": "Title is required"}"#).unwrap();
        let err = env
            .into_data(StatusCode::OK, "Failed to create expense")
            .unwrap_err();
        assert_eq!(err.to_string(), "Title is required");
    }

    #[test]
    fn success_false_without_message_falls_back() {
        let env: Envelope<Expense> = serde_json::from_str(r#"{"success": false}"#).unwrap();
        let err = env
            .into_data(StatusCode::OK, "Failed to create expense")
            .unwrap_err();
        assert_eq!(err.to_string(), "Failed to create expense (HTTP 200 OK)");
    }

    // `Expense` has no `Default`; this must decode through a bound no wider
    // than the one `unwrap_envelope` uses.
    fn decode<T: DeserializeOwned>(raw: &str) -> Envelope<T> {
        serde_json::from_str(raw).unwrap()
    }

    #[test]
    fn envelope_decodes_with_deserialize_only_payloads() {
        let env: Envelope<Expense> = decode(r#"{"success": false}"#);
        assert!(env.data.is_none());
        assert!(env.message.is_none());

        let env: Envelope<Vec<Expense>> = decode(r#"{"success": true, "data": []}"#);
        assert_eq!(env.data.unwrap().len(), 0);
    }

    #[test]
    fn missing_data_on_success_is_an_error() {
        let env: Envelope<Expense> = serde_json::from_str(r#"{"success": true}"#).unwrap();
        assert!(env
            .into_data(StatusCode::OK, "Failed to fetch expense")
            .is_err());
    }

    #[test]
    fn draft_wire_format() {
        let draft = ExpenseDraft {
            title: "Lunch".into(),
            amount: Decimal::from_str_exact("12.5").unwrap(),
            category: None,
            expense_date: chrono::NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
        };
        let v: serde_json::Value = serde_json::to_value(&draft).unwrap();
        assert_eq!(v["title"], "Lunch");
        assert_eq!(v["amount"], serde_json::json!(12.5));
        assert_eq!(v["category"], serde_json::Value::Null);
        assert_eq!(v["expense_date"], "2024-01-15");
    }
}
