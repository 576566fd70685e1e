// Panel API client (bearer-token authenticated).
//
// Endpoint groups are implemented as inherent methods on `PanelClient`
// via separate files to keep the client module focused on transport
// mechanics.

pub mod client;
pub mod models;
mod nodes;
mod system;
mod users;

pub use client::PanelClient;
pub use models::{
    CreateUserRequest, InboundRecord, NodeRecord, PanelStats, SystemMetrics, UpdateUserRequest,
    UserRecord, UserStatsRecord,
};
