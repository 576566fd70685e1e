// guardly-core: domain layer over the raw panel and billing clients.
//
// `guardly-api` hands back whatever the backend sent; this crate turns
// that into canonical types (`model`), classifies failures into a
// taxonomy a person can act on (`error`), and assembles the dashboard
// overview (`overview`). `Panel` is the one handle consumers hold.

pub mod config;
pub mod convert;
pub mod error;
pub mod model;
pub mod overview;
pub mod panel;

pub use config::PanelConfig;
pub use error::CoreError;
pub use model::{Inbound, Node, User, UserStatus};
pub use overview::Overview;
pub use panel::Panel;
