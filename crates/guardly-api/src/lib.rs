// guardly-api: Async Rust client for PasarGuard-style VPN panel backends.
//
// Two API surfaces: the bearer-authenticated panel API (users, nodes,
// inbounds, system metrics) and the unauthenticated billing sidecar
// (payments, tariffs, subscriptions, server reboot). Panel deployments
// disagree about response shapes and field names, so the interesting
// machinery lives in `normalize` (shape reconciliation), `resolve`
// (aliased-field resolution), and `fallback` (endpoint fallback chains).

pub mod billing;
pub mod error;
pub mod fallback;
pub mod normalize;
pub mod panel;
pub mod resolve;
pub mod transport;

pub use billing::BillingClient;
pub use error::Error;
pub use fallback::{Candidate, Verb};
pub use panel::PanelClient;
pub use resolve::Quantity;
pub use transport::TransportConfig;
