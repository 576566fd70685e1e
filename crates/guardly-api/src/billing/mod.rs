// Billing sidecar API client (unauthenticated, LAN-only service).

pub mod client;
pub mod types;

pub use client::BillingClient;
pub use types::{BillingSubscription, Payment, PaymentQuery, ServerReboot, SubscriptionUrl, Tariff};
