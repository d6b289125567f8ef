/// Backend HTTP client
///
/// The kiosk and the admin viewer talk to the check-in backend over a
/// small JSON surface: POST /submit registers a visitor, GET
/// /api/visitors lists them (behind the admin session), GET /logout
/// ends that session, and the photo/badge links returned inside
/// records are plain file downloads. Requests carry no timeout and
/// are never retried automatically; the user repeats the action.
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Where the backend lives. The kiosk and the admin panel are served
/// by the same development host as the original deployment.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// What can go wrong talking to the backend.
///
/// Variants carry rendered strings so results can travel through UI
/// messages, which must be cloneable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The request never produced a response
    #[error("request failed: {0}")]
    Transport(String),
    /// The server answered with a non-success status
    #[error("server returned status {0}")]
    Status(u16),
    /// The response body was not the JSON we expected
    #[error("could not decode server response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}

/// The /submit request body. Field names follow the wire contract.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub purpose: String,
    pub finding: String,
    /// data:image/png;base64,... as captured by the camera step
    pub photo: String,
    pub agreed: bool,
}

/// The /submit response body.
///
/// Error responses omit `success`, so it defaults to false and the
/// caller can branch on it alone.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub pdf_download_link: Option<String>,
    #[serde(default)]
    pub photo_download_link: Option<String>,
}

/// One registered visitor as served by /api/visitors.
///
/// A read-only snapshot; `created_at` arrives as an ISO timestamp
/// without an offset and is kept naive.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct VisitorRecord {
    pub full_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    pub purpose: String,
    pub finding: String,
    pub created_at: NaiveDateTime,
    /// Link to the visitor photo, when one was stored
    #[serde(default)]
    pub photo_download: Option<String>,
    /// Link to the printable badge PDF, when one was generated
    #[serde(default)]
    pub pdf_download: Option<String>,
}

/// A handle on the backend, cheap to clone into async tasks.
#[derive(Debug, Clone)]
pub struct BackendClient {
    base_url: String,
    http: reqwest::Client,
}

impl Default for BackendClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl BackendClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        BackendClient {
            base_url,
            http: reqwest::Client::new(),
        }
    }

    /// Resolve a link from a record or response against the backend.
    /// The backend hands out absolute paths like /photos/visitor.png.
    pub fn absolute_url(&self, link: &str) -> String {
        if link.starts_with("http://") || link.starts_with("https://") {
            link.to_string()
        } else {
            format!("{}{}", self.base_url, link)
        }
    }

    /// Register a visitor.
    ///
    /// The backend reports business failures as JSON bodies on error
    /// statuses too, so the body is decoded regardless of status and
    /// the `success` flag decides the outcome.
    pub async fn submit_visitor(&self, request: SubmitRequest) -> Result<SubmitResponse, ApiError> {
        let url = format!("{}/submit", self.base_url);
        let response = self.http.post(&url).json(&request).send().await?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Fetch the visitor collection.
    ///
    /// A non-success status is how the backend signals a missing admin
    /// session, so it is surfaced as `ApiError::Status` for the
    /// "are you logged in?" path.
    pub async fn fetch_visitors(&self) -> Result<Vec<VisitorRecord>, ApiError> {
        let url = format!("{}/api/visitors", self.base_url);
        let response = self.http.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status(status.as_u16()));
        }
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Download a photo thumbnail or badge PDF by its record link.
    pub async fn fetch_bytes(&self, link: &str) -> Result<Vec<u8>, ApiError> {
        let url = self.absolute_url(link);
        let response = self.http.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status(status.as_u16()));
        }
        Ok(response.bytes().await?.to_vec())
    }

    /// End the admin session.
    pub async fn logout(&self) -> Result<(), ApiError> {
        let url = format!("{}/logout", self.base_url);
        self.http.get(&url).send().await?;
        Ok(())
    }
}
