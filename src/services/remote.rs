//! Remote lint/execute service client
//!
//! The service exposes four JSON endpoints under a common prefix:
//! `startup`, `lint`, `execute` and `stop`. All of them take a `POST` with a
//! small JSON body. Calls here are blocking; the async bridge runs them on
//! background threads.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::config::ServiceConfig;

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("request to {endpoint} failed: {message}")]
    Transport { endpoint: String, message: String },

    #[error("{endpoint} returned HTTP {code}: {body}")]
    Status {
        endpoint: String,
        code: u16,
        body: String,
    },

    #[error("could not decode {endpoint} response: {message}")]
    Decode { endpoint: String, message: String },
}

/// Body sent to the lint and execute endpoints
#[derive(Debug, Clone, Serialize)]
pub struct SourcePayload<'a> {
    pub code: &'a str,
    pub filename: &'a str,
}

/// Lint endpoint reply.
///
/// A clean file comes back without `error`; otherwise `error` holds the raw
/// multi-line linter output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LintReply {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl LintReply {
    /// Raw linter text, empty when there is nothing to report
    pub fn output(&self) -> &str {
        self.error.as_deref().unwrap_or("")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ExecuteReply {
    #[serde(default)]
    pub output_html: String,
    #[serde(default)]
    pub output_non_html: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl ExecuteReply {
    /// Error text to render verbatim, if the run failed
    pub fn error_text(&self) -> Option<String> {
        if self.status.as_deref() == Some("success") {
            return None;
        }
        self.message
            .as_deref()
            .or(self.error.as_deref())
            .filter(|text| !text.is_empty())
            .map(str::to_string)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct StartupReply {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl StartupReply {
    /// Status string shown to the user; not interpreted further
    pub fn status_text(&self) -> String {
        self.status
            .clone()
            .or_else(|| self.message.clone())
            .unwrap_or_else(|| "ok".to_string())
    }
}

/// The remote service boundary.
pub trait RemoteService: Send + Sync {
    fn startup(&self) -> Result<StartupReply, RemoteError>;
    fn lint(&self, name: &str, code: &str) -> Result<LintReply, RemoteError>;
    fn execute(&self, name: &str, code: &str) -> Result<ExecuteReply, RemoteError>;
    fn stop(&self) -> Result<(), RemoteError>;
}

/// HTTP implementation of [`RemoteService`]
pub struct HttpRemote {
    agent: ureq::Agent,
    base: String,
}

impl HttpRemote {
    pub fn new(config: &ServiceConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build();
        Self {
            agent,
            base: endpoint_base(&config.base_url, &config.api_prefix),
        }
    }

    pub fn endpoint(&self, name: &str) -> String {
        format!("{}/{}", self.base, name)
    }

    fn post_json<T>(&self, name: &str, body: &impl Serialize) -> Result<T, RemoteError>
    where
        T: for<'de> Deserialize<'de>,
    {
        let url = self.endpoint(name);
        tracing::debug!("POST {}", url);

        let response = match self.agent.post(&url).send_json(body) {
            Ok(response) => response,
            Err(ureq::Error::Status(code, response)) => {
                let body = response.into_string().unwrap_or_default();
                // Failed runs still carry a JSON body worth showing
                if let Ok(parsed) = serde_json::from_str::<T>(&body) {
                    tracing::debug!("{} returned HTTP {} with a readable body", name, code);
                    return Ok(parsed);
                }
                return Err(RemoteError::Status {
                    endpoint: name.to_string(),
                    code,
                    body,
                });
            }
            Err(e) => {
                return Err(RemoteError::Transport {
                    endpoint: name.to_string(),
                    message: e.to_string(),
                })
            }
        };

        response.into_json::<T>().map_err(|e| RemoteError::Decode {
            endpoint: name.to_string(),
            message: e.to_string(),
        })
    }
}

/// Join base URL and API prefix without doubling or dropping slashes
pub fn endpoint_base(base_url: &str, api_prefix: &str) -> String {
    let base = base_url.trim_end_matches('/');
    let prefix = api_prefix.trim_matches('/');
    if prefix.is_empty() {
        base.to_string()
    } else {
        format!("{base}/{prefix}")
    }
}

impl RemoteService for HttpRemote {
    fn startup(&self) -> Result<StartupReply, RemoteError> {
        self.post_json("startup", &serde_json::json!({}))
    }

    fn lint(&self, name: &str, code: &str) -> Result<LintReply, RemoteError> {
        self.post_json(
            "lint",
            &SourcePayload {
                code,
                filename: name,
            },
        )
    }

    fn execute(&self, name: &str, code: &str) -> Result<ExecuteReply, RemoteError> {
        self.post_json(
            "execute",
            &SourcePayload {
                code,
                filename: name,
            },
        )
    }

    fn stop(&self) -> Result<(), RemoteError> {
        self.post_json::<serde_json::Value>("stop", &serde_json::json!({}))
            .map(|_| ())
    }
}
