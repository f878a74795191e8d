use crate::models::{ClassRequest, TutorCandidate};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when talking to the user directory
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: invalid API key")]
    Unauthorized,

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// User directory API client
///
/// Read-only access to the records this service matches on:
/// - Class requests
/// - The tutor roster
///
/// List endpoints answer `{"documents": [...], "total": n}`; each document
/// may carry its payload directly or under a `data` key.
pub struct DirectoryClient {
    base_url: String,
    api_key: String,
    client: Client,
}

impl DirectoryClient {
    /// Create a new directory client
    pub fn new(base_url: String, api_key: String, timeout_secs: u64) -> Result<Self, DirectoryError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            base_url,
            api_key,
            client,
        })
    }

    /// Fetch every class request, whatever its status
    pub async fn list_class_requests(&self) -> Result<Vec<ClassRequest>, DirectoryError> {
        let json = self.get_json("classes", "class requests").await?;
        let classes = parse_documents::<ClassRequest>(&json, "class request")?;

        tracing::debug!("Fetched {} class requests from directory", classes.len());
        Ok(classes)
    }

    /// Fetch a single class request by id
    pub async fn get_class_request(&self, class_id: &str) -> Result<ClassRequest, DirectoryError> {
        let path = format!("classes/{}", urlencoding::encode(class_id));
        let json = self.get_json(&path, &format!("class request {}", class_id)).await?;

        parse_document(&json)
            .map_err(|e| DirectoryError::InvalidResponse(format!("Failed to parse class request: {}", e)))
    }

    /// Fetch the full tutor roster
    pub async fn list_tutors(&self) -> Result<Vec<TutorCandidate>, DirectoryError> {
        let json = self.get_json("tutors", "tutors").await?;
        let tutors = parse_documents::<TutorCandidate>(&json, "tutor")?;

        tracing::debug!("Fetched {} tutors from directory", tutors.len());
        Ok(tutors)
    }

    /// Fetch a single tutor by id
    pub async fn get_tutor(&self, tutor_id: &str) -> Result<TutorCandidate, DirectoryError> {
        let path = format!("tutors/{}", urlencoding::encode(tutor_id));
        let json = self.get_json(&path, &format!("tutor {}", tutor_id)).await?;

        parse_document(&json)
            .map_err(|e| DirectoryError::InvalidResponse(format!("Failed to parse tutor: {}", e)))
    }

    async fn get_json(&self, path: &str, what: &str) -> Result<Value, DirectoryError> {
        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), path);

        tracing::debug!("Fetching {} from: {}", what, url);

        let response = self
            .client
            .get(&url)
            .header("X-Api-Key", &self.api_key)
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => Ok(response.json().await?),
            StatusCode::NOT_FOUND => Err(DirectoryError::NotFound(what.to_string())),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(DirectoryError::Unauthorized),
            status => {
                let body = response.text().await.unwrap_or_else(|_| "Unable to read body".to_string());
                tracing::error!("Failed to fetch {}: {} - {}", what, status, body);
                Err(DirectoryError::ApiError(format!("Failed to fetch {}: {}", what, status)))
            }
        }
    }
}

/// Parse a single document, unwrapping a `data` envelope if present
fn parse_document<T: DeserializeOwned>(doc: &Value) -> Result<T, serde_json::Error> {
    let data = doc.get("data").unwrap_or(doc);
    serde_json::from_value(data.clone())
}

/// Parse a document list, skipping entries that don't deserialize
fn parse_documents<T: DeserializeOwned>(json: &Value, kind: &str) -> Result<Vec<T>, DirectoryError> {
    let documents = json
        .get("documents")
        .and_then(|d| d.as_array())
        .ok_or_else(|| DirectoryError::InvalidResponse("Missing documents array".into()))?;

    let parsed = documents
        .iter()
        .filter_map(|doc| match parse_document(doc) {
            Ok(item) => Some(item),
            Err(e) => {
                tracing::warn!("Skipping malformed {} document: {}", kind, e);
                None
            }
        })
        .collect();

    Ok(parsed)
}
