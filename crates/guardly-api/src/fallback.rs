// Endpoint fallback executor.
//
// Several mutating panel operations have no stable endpoint shape
// across deployments (plural vs. singular paths, DELETE vs. PUT/PATCH
// deactivation). Instead of nested try/catch per call site, each
// logical operation declares an ordered list of `(verb, path, payload)`
// candidates, consumed by one generic executor.
//
// Classification: 2xx terminates with success; 404/405 means "this
// endpoint variant doesn't exist here" and advances the chain; anything
// else (validation rejection, auth failure, transport error) is
// terminal — a reachable-but-rejecting backend must not be retried
// against the remaining candidates, so at most one side effect occurs.

use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::transport::ensure_success;

/// HTTP verb for a fallback candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Verb {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

/// One endpoint variant in a fallback chain.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub verb: Verb,
    /// Path relative to the API base (no leading slash), e.g. `users/5`.
    pub path: String,
    /// JSON body sent with the request, if any.
    pub body: Option<Value>,
}

impl Candidate {
    pub fn new(verb: Verb, path: impl Into<String>) -> Self {
        Self {
            verb,
            path: path.into(),
            body: None,
        }
    }

    pub fn with_body(verb: Verb, path: impl Into<String>, body: Value) -> Self {
        Self {
            verb,
            path: path.into(),
            body: Some(body),
        }
    }
}

/// Try each candidate in order; first 2xx wins.
///
/// `base` must end with a trailing slash so relative joins work.
/// Returns the decoded response body (`Value::Null` for empty bodies),
/// or `Error::Unsupported` when every candidate answered 404/405.
pub async fn run_chain(
    http: &reqwest::Client,
    base: &Url,
    operation: &str,
    candidates: &[Candidate],
) -> Result<Value, Error> {
    for candidate in candidates {
        let url = base.join(&candidate.path)?;
        debug!(operation, verb = candidate.verb.as_str(), %url, "fallback attempt");

        let mut request = match candidate.verb {
            Verb::Get => http.get(url.clone()),
            Verb::Post => http.post(url.clone()),
            Verb::Put => http.put(url.clone()),
            Verb::Patch => http.patch(url.clone()),
            Verb::Delete => http.delete(url.clone()),
        };
        if let Some(ref body) = candidate.body {
            request = request.json(body);
        }

        // Network-level failures are terminal for the whole chain.
        let response = request.send().await.map_err(Error::Transport)?;

        // 404/405 advance the chain; any other failure is terminal,
        // classified the same way as the plain request path.
        let response = match ensure_success(response).await {
            Ok(response) => response,
            Err(e) if e.is_skippable() => {
                debug!(operation, %url, "endpoint variant absent, trying next");
                continue;
            }
            Err(e) => return Err(e),
        };

        let text = response.text().await.map_err(Error::Transport)?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        return Ok(serde_json::from_str(&text).unwrap_or(Value::Null));
    }

    Err(Error::Unsupported {
        operation: operation.to_owned(),
    })
}
