//! Connection details for a single printer server.

use crate::Dialect;

/// Where and how to reach a printer server.
///
/// Treated as a value: to point a [crate::Monitor] somewhere else, build a
/// new endpoint and hand it over whole.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PrinterEndpoint {
    /// Hostname or IP address of the server.
    pub host: String,

    /// TCP port of the server.
    pub port: u16,

    /// Value sent in the `X-Api-Key` header.
    pub api_key: String,

    /// Basic auth user. Empty disables basic auth.
    pub username: String,

    /// Basic auth password.
    pub password: String,

    /// REST dialect spoken by the server.
    pub dialect: Dialect,
}

impl PrinterEndpoint {
    /// Full URL for `path` on this server.
    pub fn url(&self, path: &str) -> String {
        format!("http://{}:{}{}", self.host, self.port, path)
    }

    /// Basic auth credentials, if a username is configured.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        if self.username.is_empty() {
            None
        } else {
            Some((&self.username, &self.password))
        }
    }
}
