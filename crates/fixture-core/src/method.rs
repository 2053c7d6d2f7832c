//! HTTP method model for mock declarations.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The request methods the test suite declares mocks for.
///
/// Deliberately narrower than the full HTTP method set: the mobile
/// application's mocked traffic is GET/POST/PUT/DELETE. Anything else an
/// intercepted request arrives with is unmatched traffic by definition and
/// falls to the configured no-match policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    /// Canonical uppercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }

    /// Whether a request of this method carries a body the matcher may
    /// compare against. Body matchers are only constructible for these.
    pub fn has_request_body(&self) -> bool {
        matches!(self, Self::Post | Self::Put | Self::Delete)
    }

    /// Default response status for a mock of this method when the
    /// declaration does not override it: 201 for POST, 200 otherwise.
    pub fn default_response_status(&self) -> u16 {
        match self {
            Self::Post => 201,
            _ => 200,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A method name outside the mockable set.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unsupported HTTP method: {0}")]
pub struct MethodParseError(pub String);

impl FromStr for HttpMethod {
    type Err = MethodParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "DELETE" => Ok(Self::Delete),
            other => Err(MethodParseError(other.to_string())),
        }
    }
}
