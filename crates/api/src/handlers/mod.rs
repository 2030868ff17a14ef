//! Request handlers, one submodule per resource.
//!
//! Handlers delegate to the repositories in `vline_db` and the try-on
//! services in `vline_tryon`, mapping failures via [`AppError`](crate::error::AppError).

pub mod auth;
pub mod catalog;
pub mod form;
pub mod media;
pub mod models;
pub mod processed_images;
pub mod products;
pub mod stats;
pub mod tryon;
pub mod webhooks;
