// User endpoints.
//
// The mutating operations run through fallback chains: older panel
// builds expose singular paths (`user/{id}`) and some refuse DELETE
// entirely, accepting only a status flip to `disabled`.

use std::collections::HashMap;

use serde_json::{Map, Value, json};
use tracing::debug;

use crate::error::Error;
use crate::fallback::{Candidate, Verb};
use crate::normalize::normalize_records;
use crate::panel::client::PanelClient;
use crate::panel::models::{CreateUserRequest, UpdateUserRequest, UserRecord, UserStatsRecord};

impl PanelClient {
    /// List all users, normalizing whatever envelope the panel wraps
    /// the list in. Returns an empty list on unrecognized shapes.
    pub async fn list_users(&self) -> Result<Vec<UserRecord>, Error> {
        let value = self.get_value("users").await?;
        Ok(normalize_records(&value, "users"))
    }

    /// Fetch a single user by id.
    pub async fn get_user(&self, id: i64) -> Result<UserRecord, Error> {
        self.get_json(&format!("users/{id}")).await
    }

    /// Create a user.
    ///
    /// Chain: `POST users` → `POST user`.
    pub async fn create_user(&self, request: &CreateUserRequest) -> Result<UserRecord, Error> {
        let body = serde_json::to_value(request).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body: String::new(),
        })?;
        let candidates = [
            Candidate::with_body(Verb::Post, "users", body.clone()),
            Candidate::with_body(Verb::Post, "user", body),
        ];
        let value = self.run_chain("create user", &candidates).await?;
        serde_json::from_value(value.clone()).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body: value.to_string(),
        })
    }

    /// Update a user in place.
    pub async fn update_user(
        &self,
        id: i64,
        request: &UpdateUserRequest,
    ) -> Result<UserRecord, Error> {
        self.put_json(&format!("users/{id}"), request).await
    }

    /// Remove a user, degrading to deactivation when the panel refuses
    /// hard deletes.
    ///
    /// Chain: `DELETE users/{id}` → `DELETE user/{id}` →
    /// `PUT users/{id}` (status=disabled) → `PUT user/{id}` →
    /// `PATCH users/{id}`.
    pub async fn delete_user(&self, id: i64) -> Result<(), Error> {
        let disable = json!({"status": "disabled"});
        let candidates = [
            Candidate::new(Verb::Delete, format!("users/{id}")),
            Candidate::new(Verb::Delete, format!("user/{id}")),
            Candidate::with_body(Verb::Put, format!("users/{id}"), disable.clone()),
            Candidate::with_body(Verb::Put, format!("user/{id}"), disable.clone()),
            Candidate::with_body(Verb::Patch, format!("users/{id}"), disable),
        ];
        self.run_chain("delete user", &candidates).await?;
        Ok(())
    }

    /// Fetch per-protocol subscription links for a user.
    ///
    /// Chain: `GET users/{id}/subscription` → `GET user/{id}/subscription`.
    pub async fn user_subscription(&self, id: i64) -> Result<HashMap<String, String>, Error> {
        let candidates = [
            Candidate::new(Verb::Get, format!("users/{id}/subscription")),
            Candidate::new(Verb::Get, format!("user/{id}/subscription")),
        ];
        let value = self.run_chain("user subscription", &candidates).await?;

        // Keep only string-valued entries; some panels mix metadata in.
        let Value::Object(map) = value else {
            debug!("subscription response was not an object");
            return Ok(HashMap::new());
        };
        Ok(map
            .into_iter()
            .filter_map(|(k, v)| match v {
                Value::String(s) => Some((k, s)),
                _ => None,
            })
            .collect())
    }

    /// Fetch the raw client configuration for a user.
    ///
    /// Chain: `GET users/{id}/config` → `GET user/{id}/config`.
    pub async fn user_config(&self, id: i64) -> Result<Map<String, Value>, Error> {
        let candidates = [
            Candidate::new(Verb::Get, format!("users/{id}/config")),
            Candidate::new(Verb::Get, format!("user/{id}/config")),
        ];
        let value = self.run_chain("user config", &candidates).await?;
        match value {
            Value::Object(map) => Ok(map),
            _ => {
                debug!("config response was not an object");
                Ok(Map::new())
            }
        }
    }

    /// Fetch usage stats for a single user.
    pub async fn user_stats(&self, id: i64) -> Result<UserStatsRecord, Error> {
        self.get_json(&format!("users/{id}/stats")).await
    }
}
