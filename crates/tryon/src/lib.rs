//! Virtual try-on generation.
//!
//! - [`client`]: the [`TryOnProvider`] seam and its Gradio HTTP implementation.
//! - [`accounts`]: round-robin rotation over inference account tokens.
//! - [`invoker`]: one (product, model) pair end to end, from source images
//!   to a stored result row.
//! - [`fanout`]: sequential best-effort batches over a model selection, with
//!   progress published to a [`ProgressTracker`].

pub mod accounts;
pub mod client;
pub mod config;
pub mod fanout;
pub mod invoker;
pub mod progress;
pub mod sse;

pub use accounts::AccountPool;
pub use client::{GradioTryOnClient, ImageInput, ProviderError, TryOnProvider};
pub use config::TryOnConfig;
pub use fanout::{run_fan_out, spawn_fan_out, FanOutReport, PairOutcome};
pub use invoker::{TryOnError, TryOnInvoker, TryOnRequest};
pub use progress::{FanOutProgress, ProgressTracker};
