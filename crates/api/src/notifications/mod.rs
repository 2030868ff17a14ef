//! Outbound notifications to the partner site.

pub mod partner;

pub use partner::{PartnerDelivery, PartnerNotifier, PartnerWebhookError};
