//! Synchronous client core for the board API.
//!
//! # Overview
//! Builds `HttpRequest` values and interprets `HttpResponse` values without
//! touching the network (host-does-IO pattern). The embedding shell executes
//! the actual round-trips, keeping the core deterministic and testable.
//!
//! # Design
//! - `BoardClient` holds only `base_url`; per-call state lives in the
//!   [`session::Session`] the host owns and passes in.
//! - Domain payloads stay opaque `serde_json::Value`s — the backend owns
//!   those schemas and this layer just moves them.
//! - Error classification is separated from navigation: a 401 produces
//!   [`error::ApiError::Auth`] and wipes the session, while the redirect
//!   decision is a pure function ([`session::redirect_target`]) the host
//!   consults.
//! - The presentation helpers (validation, formatting, toast bookkeeping)
//!   are side-effect free so any shell can reuse them unchanged.

pub mod client;
pub mod error;
pub mod format;
pub mod http;
pub mod session;
pub mod toast;
pub mod types;
pub mod validate;

pub use client::{profile_image_url, BoardClient};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use session::{redirect_target, Session};
pub use toast::{Toast, ToastConfig, ToastKind, ToastQueue};
pub use types::{ApiData, FileUpload, LoginResponse, Pagination, RequestBody};
