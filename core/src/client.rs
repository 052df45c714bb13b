//! Request construction and response interpretation for the board API.
//!
//! # Design
//! `BoardClient` holds only a `base_url` and carries no mutable state between
//! calls. Endpoint methods produce `HttpRequest` values through one shared
//! builder ([`BoardClient::build_request`]) that injects the bearer token and
//! serializes the body; the host executes the round-trip and feeds the
//! `HttpResponse` back through [`BoardClient::interpret`] together with the
//! `Session`, which absorbs the side effect a 401 demands (credential
//! wipe). Follow-up navigation stays with the host — see
//! [`crate::session::redirect_target`].
//!
//! Every failure is logged through `tracing` before it is returned.

use serde_json::{json, Value};

use crate::error::{ApiError, DEFAULT_AUTH_MESSAGE};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::session::Session;
use crate::types::{ApiData, FileUpload, Pagination, RequestBody};

/// Boundary for multipart uploads. Fixed so built requests are deterministic.
const MULTIPART_BOUNDARY: &str = "----board-core-file-upload";

/// Stateless builder/interpreter for board API calls.
#[derive(Debug, Clone)]
pub struct BoardClient {
    base_url: String,
}

impl BoardClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Build a request against an API path: serialize the body, set the
    /// matching `Content-Type`, and attach `Authorization: Bearer <token>`
    /// when the session holds a token.
    pub fn build_request(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<RequestBody>,
        session: &Session,
    ) -> Result<HttpRequest, ApiError> {
        let mut headers = Vec::new();
        let body = match body {
            None => None,
            Some(RequestBody::Json(value)) => {
                headers.push(("content-type".to_string(), "application/json".to_string()));
                let bytes = serde_json::to_vec(&value).map_err(|e| {
                    tracing::error!("request body did not serialize: {e}");
                    ApiError::Serialization(e.to_string())
                })?;
                Some(bytes)
            }
            Some(RequestBody::Form(fields)) => {
                headers.push((
                    "content-type".to_string(),
                    "application/x-www-form-urlencoded".to_string(),
                ));
                Some(encode_form(&fields).into_bytes())
            }
            Some(RequestBody::Multipart(file)) => {
                headers.push((
                    "content-type".to_string(),
                    format!("multipart/form-data; boundary={MULTIPART_BOUNDARY}"),
                ));
                Some(encode_multipart(&file))
            }
        };
        if let Some(token) = session.token() {
            headers.push(("authorization".to_string(), format!("Bearer {token}")));
        }
        Ok(HttpRequest {
            method,
            path: format!("{}{}", self.base_url, path),
            headers,
            body,
        })
    }

    /// Classify a response and produce either parsed data or a normalized
    /// error.
    ///
    /// A 204 short-circuits to the [`ApiData::NoContent`] marker. Otherwise
    /// the body is parsed as JSON when the server labels it so, and kept as
    /// raw text when it does not. A 401 wipes the session credentials before
    /// the `Auth` error is returned; any other non-2xx becomes a `Request`
    /// error with the message extracted from the error envelope.
    pub fn interpret(
        &self,
        response: HttpResponse,
        session: &mut Session,
    ) -> Result<ApiData, ApiError> {
        let status = response.status;
        if status == 204 {
            return Ok(ApiData::NoContent);
        }

        let success = response.is_success();
        let json_typed = response
            .content_type()
            .is_some_and(|ct| ct.contains("application/json"));
        let data = if json_typed {
            match serde_json::from_str::<Value>(&response.body) {
                Ok(value) => ApiData::Json(value),
                Err(e) => {
                    tracing::error!(status, "JSON-typed response did not parse: {e}");
                    return Err(ApiError::Deserialization(e.to_string()));
                }
            }
        } else {
            ApiData::Text(response.body)
        };

        if success {
            return Ok(data);
        }

        if status == 401 {
            session.clear();
            let message = auth_message(&data);
            tracing::warn!("authentication rejected: {message}");
            return Err(ApiError::Auth(message));
        }

        let message = error_message(&data, status);
        tracing::error!(status, "request failed: {message}");
        Err(ApiError::Request { status, message })
    }

    // --- auth ---

    /// POST form-encoded credentials to the login endpoint. The backend
    /// speaks the OAuth2 password-grant dialect, so the email travels in the
    /// `username` field.
    pub fn build_login(
        &self,
        email: &str,
        password: &str,
        session: &Session,
    ) -> Result<HttpRequest, ApiError> {
        let fields = vec![
            ("username".to_string(), email.to_string()),
            ("password".to_string(), password.to_string()),
        ];
        self.build_request(
            HttpMethod::Post,
            "/api/auth/login",
            Some(RequestBody::Form(fields)),
            session,
        )
    }

    /// Log out: drop the stored credentials. No network call is involved;
    /// the host decides where to navigate next.
    pub fn logout(&self, session: &mut Session) {
        session.clear();
    }

    // --- users ---

    pub fn build_create_user(
        &self,
        data: Value,
        session: &Session,
    ) -> Result<HttpRequest, ApiError> {
        self.build_request(
            HttpMethod::Post,
            "/api/users",
            Some(RequestBody::Json(data)),
            session,
        )
    }

    pub fn build_get_user(&self, user_id: &str, session: &Session) -> Result<HttpRequest, ApiError> {
        self.build_request(
            HttpMethod::Get,
            &format!("/api/users/{user_id}"),
            None,
            session,
        )
    }

    pub fn build_update_user(
        &self,
        user_id: &str,
        data: Value,
        session: &Session,
    ) -> Result<HttpRequest, ApiError> {
        self.build_request(
            HttpMethod::Put,
            &format!("/api/users/{user_id}"),
            Some(RequestBody::Json(data)),
            session,
        )
    }

    pub fn build_update_password(
        &self,
        user_id: &str,
        password: &str,
        session: &Session,
    ) -> Result<HttpRequest, ApiError> {
        self.build_request(
            HttpMethod::Patch,
            &format!("/api/users/{user_id}/password"),
            Some(RequestBody::Json(json!({ "password": password }))),
            session,
        )
    }

    pub fn build_delete_user(
        &self,
        user_id: &str,
        session: &Session,
    ) -> Result<HttpRequest, ApiError> {
        self.build_request(
            HttpMethod::Delete,
            &format!("/api/users/{user_id}"),
            None,
            session,
        )
    }

    // --- posts ---

    pub fn build_list_posts(
        &self,
        page: Pagination,
        session: &Session,
    ) -> Result<HttpRequest, ApiError> {
        self.build_request(
            HttpMethod::Get,
            &format!("/api/posts?{}", page.query()),
            None,
            session,
        )
    }

    pub fn build_get_post(&self, post_id: &str, session: &Session) -> Result<HttpRequest, ApiError> {
        self.build_request(
            HttpMethod::Get,
            &format!("/api/posts/{post_id}"),
            None,
            session,
        )
    }

    pub fn build_create_post(
        &self,
        data: Value,
        session: &Session,
    ) -> Result<HttpRequest, ApiError> {
        self.build_request(
            HttpMethod::Post,
            "/api/posts",
            Some(RequestBody::Json(data)),
            session,
        )
    }

    pub fn build_update_post(
        &self,
        post_id: &str,
        data: Value,
        session: &Session,
    ) -> Result<HttpRequest, ApiError> {
        self.build_request(
            HttpMethod::Put,
            &format!("/api/posts/{post_id}"),
            Some(RequestBody::Json(data)),
            session,
        )
    }

    pub fn build_delete_post(
        &self,
        post_id: &str,
        session: &Session,
    ) -> Result<HttpRequest, ApiError> {
        self.build_request(
            HttpMethod::Delete,
            &format!("/api/posts/{post_id}"),
            None,
            session,
        )
    }

    // --- comments ---

    pub fn build_list_comments(
        &self,
        post_id: &str,
        page: Pagination,
        session: &Session,
    ) -> Result<HttpRequest, ApiError> {
        self.build_request(
            HttpMethod::Get,
            &format!("/api/posts/{post_id}/comments?{}", page.query()),
            None,
            session,
        )
    }

    pub fn build_create_comment(
        &self,
        post_id: &str,
        content: &str,
        session: &Session,
    ) -> Result<HttpRequest, ApiError> {
        self.build_request(
            HttpMethod::Post,
            &format!("/api/posts/{post_id}/comments"),
            Some(RequestBody::Json(json!({ "content": content }))),
            session,
        )
    }

    pub fn build_update_comment(
        &self,
        comment_id: &str,
        content: &str,
        session: &Session,
    ) -> Result<HttpRequest, ApiError> {
        self.build_request(
            HttpMethod::Put,
            &format!("/api/comments/{comment_id}"),
            Some(RequestBody::Json(json!({ "content": content }))),
            session,
        )
    }

    pub fn build_delete_comment(
        &self,
        comment_id: &str,
        session: &Session,
    ) -> Result<HttpRequest, ApiError> {
        self.build_request(
            HttpMethod::Delete,
            &format!("/api/comments/{comment_id}"),
            None,
            session,
        )
    }

    // --- files ---

    /// Multipart upload with the file under the single `file` field.
    pub fn build_upload_file(
        &self,
        file: FileUpload,
        session: &Session,
    ) -> Result<HttpRequest, ApiError> {
        self.build_request(
            HttpMethod::Post,
            "/api/files/upload",
            Some(RequestBody::Multipart(file)),
            session,
        )
    }

    // --- likes ---

    pub fn build_toggle_like(
        &self,
        post_id: &str,
        session: &Session,
    ) -> Result<HttpRequest, ApiError> {
        self.build_request(
            HttpMethod::Post,
            &format!("/api/posts/{post_id}/like"),
            None,
            session,
        )
    }

    pub fn build_like_status(
        &self,
        post_id: &str,
        session: &Session,
    ) -> Result<HttpRequest, ApiError> {
        self.build_request(
            HttpMethod::Get,
            &format!("/api/posts/{post_id}/like"),
            None,
            session,
        )
    }
}

/// Extract the profile-image URL from a fetched user payload, if any.
///
/// Hosts call this after `build_get_user` to decorate their avatar widget; a
/// missing or empty field means "keep the default icon". Fetch failures are
/// best-effort for the host: log and move on.
pub fn profile_image_url(user: &Value) -> Option<&str> {
    user.get("profile_image")
        .and_then(Value::as_str)
        .filter(|url| !url.is_empty())
}

/// 401 message: string `detail`, else string `message`, else the default.
fn auth_message(data: &ApiData) -> String {
    if let ApiData::Json(value) = data {
        if let Some(detail) = value.get("detail").and_then(Value::as_str) {
            return detail.to_string();
        }
        if let Some(message) = value.get("message").and_then(Value::as_str) {
            return message.to_string();
        }
    }
    DEFAULT_AUTH_MESSAGE.to_string()
}

/// Message precedence for non-401 failures: raw text body as-is, string
/// `detail`, validation-array `detail` joined on `msg`, `message`, `error`,
/// then the generic fallback.
fn error_message(data: &ApiData, status: u16) -> String {
    let value = match data {
        ApiData::Text(text) => return text.clone(),
        ApiData::Json(value) => value,
        ApiData::NoContent => return fallback_message(status),
    };
    match value.get("detail") {
        Some(Value::String(detail)) => return detail.clone(),
        Some(Value::Array(items)) => {
            return items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .collect::<Vec<_>>()
                .join(", ");
        }
        _ => {}
    }
    if let Some(message) = value.get("message").and_then(Value::as_str) {
        return message.to_string();
    }
    if let Some(error) = value.get("error").and_then(Value::as_str) {
        return error.to_string();
    }
    fallback_message(status)
}

fn fallback_message(status: u16) -> String {
    format!("HTTP error! status: {status}")
}

fn encode_form(fields: &[(String, String)]) -> String {
    fields
        .iter()
        .map(|(key, value)| {
            format!("{}={}", urlencoding::encode(key), urlencoding::encode(value))
        })
        .collect::<Vec<_>>()
        .join("&")
}

fn encode_multipart(file: &FileUpload) -> Vec<u8> {
    let head = format!(
        "--{MULTIPART_BOUNDARY}\r\n\
         Content-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\n\
         Content-Type: {}\r\n\r\n",
        file.file_name, file.content_type
    );
    let tail = format!("\r\n--{MULTIPART_BOUNDARY}--\r\n");
    let mut body = Vec::with_capacity(head.len() + file.bytes.len() + tail.len());
    body.extend_from_slice(head.as_bytes());
    body.extend_from_slice(&file.bytes);
    body.extend_from_slice(tail.as_bytes());
    body
}
