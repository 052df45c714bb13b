//! Error types for the board API client.
//!
//! # Design
//! `Auth` gets a dedicated variant because callers branch on it: a 401 wipes
//! the stored credentials and usually sends the user back to the landing
//! page, while every other non-success status lands in `Request` with the
//! normalized message and the raw status code for debugging.

use thiserror::Error;

/// Message used when a 401 body carries no usable `detail` or `message`.
pub const DEFAULT_AUTH_MESSAGE: &str = "Authentication required";

/// Errors returned by `BoardClient`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The server returned 401 — the stored credentials are missing, expired,
    /// or otherwise no longer valid.
    #[error("{0}")]
    Auth(String),

    /// The server returned a non-2xx status other than 401. The message is
    /// extracted from the error envelope (see `BoardClient::interpret`).
    #[error("{message}")]
    Request { status: u16, message: String },

    /// The request payload could not be serialized to its wire form.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// A response that claimed to be JSON could not be parsed.
    #[error("deserialization failed: {0}")]
    Deserialization(String),
}
