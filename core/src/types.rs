//! Shared request and response shapes for the client core.
//!
//! # Design
//! Domain objects (users, posts, comments) stay opaque `serde_json::Value`s —
//! the backend owns those schemas and this layer just moves them. The only
//! payload worth typing is the login response, because the session needs two
//! fields out of it.

use serde::Deserialize;
use serde_json::Value;

/// Successful login payload. The backend speaks the OAuth2 password-grant
/// dialect, hence `token_type` next to the token itself.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: String,
    pub user_id: String,
}

/// Pagination window for list endpoints.
///
/// The defaults are part of the wire contract: post lists page with
/// `skip=0&limit=26`, comment lists with `skip=0&limit=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub skip: u64,
    pub limit: u64,
}

impl Pagination {
    /// Default window for post lists.
    pub const POSTS: Pagination = Pagination { skip: 0, limit: 26 };
    /// Default window for comment lists.
    pub const COMMENTS: Pagination = Pagination { skip: 0, limit: 100 };

    pub fn new(skip: u64, limit: u64) -> Self {
        Self { skip, limit }
    }

    /// Render as the query-string fragment the backend expects.
    pub(crate) fn query(&self) -> String {
        format!("skip={}&limit={}", self.skip, self.limit)
    }
}

/// Request body accepted by the dispatcher. The variant picks the
/// `Content-Type` and the wire encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestBody {
    /// Structured payload, serialized as `application/json`.
    Json(Value),
    /// Key/value pairs serialized as `application/x-www-form-urlencoded`.
    Form(Vec<(String, String)>),
    /// Single-file `multipart/form-data` upload under the `file` field.
    Multipart(FileUpload),
}

/// A file destined for the upload endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Parsed response body returned by `BoardClient::interpret`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiData {
    /// JSON-typed body.
    Json(Value),
    /// Anything the server did not label as JSON.
    Text(String),
    /// 204 — the operation succeeded and there is no body to parse.
    NoContent,
}

impl ApiData {
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            ApiData::Json(value) => Some(value),
            _ => None,
        }
    }

    pub fn into_json(self) -> Option<Value> {
        match self {
            ApiData::Json(value) => Some(value),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_response_parses_backend_shape() {
        let login: LoginResponse = serde_json::from_str(
            r#"{"access_token":"tok-1","token_type":"bearer","user_id":"42"}"#,
        )
        .unwrap();
        assert_eq!(login.access_token, "tok-1");
        assert_eq!(login.token_type, "bearer");
        assert_eq!(login.user_id, "42");
    }

    #[test]
    fn login_response_tolerates_missing_token_type() {
        let login: LoginResponse =
            serde_json::from_str(r#"{"access_token":"tok-1","user_id":"42"}"#).unwrap();
        assert_eq!(login.token_type, "");
    }

    #[test]
    fn pagination_defaults_match_the_contract() {
        assert_eq!(Pagination::POSTS.query(), "skip=0&limit=26");
        assert_eq!(Pagination::COMMENTS.query(), "skip=0&limit=100");
        assert_eq!(Pagination::new(52, 26).query(), "skip=52&limit=26");
    }

    #[test]
    fn api_data_json_accessors() {
        let data = ApiData::Json(serde_json::json!({"id": 1}));
        assert!(data.as_json().is_some());
        assert_eq!(data.into_json().unwrap()["id"], 1);
        assert!(ApiData::NoContent.as_json().is_none());
        assert!(ApiData::Text("ok".to_string()).into_json().is_none());
    }
}
