// Node and inbound endpoints.

use crate::error::Error;
use crate::normalize::normalize_records;
use crate::panel::client::PanelClient;
use crate::panel::models::{InboundRecord, NodeRecord};

impl PanelClient {
    /// List backend nodes.
    pub async fn list_nodes(&self) -> Result<Vec<NodeRecord>, Error> {
        let value = self.get_value("nodes").await?;
        Ok(normalize_records(&value, "nodes"))
    }

    /// Fetch a single node by id.
    pub async fn get_node(&self, id: i64) -> Result<NodeRecord, Error> {
        self.get_json(&format!("nodes/{id}")).await
    }

    /// List inbound listeners.
    pub async fn list_inbounds(&self) -> Result<Vec<InboundRecord>, Error> {
        let value = self.get_value("inbounds").await?;
        Ok(normalize_records(&value, "inbounds"))
    }

    /// Fetch a single inbound by id.
    pub async fn get_inbound(&self, id: i64) -> Result<InboundRecord, Error> {
        self.get_json(&format!("inbounds/{id}")).await
    }
}
