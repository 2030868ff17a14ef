//! Request extractors that authenticate and authorize callers.
//!
//! - [`auth::AuthUser`] -- JWT Bearer token bound to a live session.
//! - [`rbac::RequireAdmin`] -- authenticated user whose stored profile role is `admin`.
//! - [`webhook::WebhookSecret`] -- shared-secret header on webhook calls.

pub mod auth;
pub mod rbac;
pub mod webhook;
