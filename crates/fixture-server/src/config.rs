//! Harness configuration.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;

use fixture_core::constants::{DEFAULT_MOCK_SERVER_PORT, DEFAULT_STATE_SERVER_PORT, SERVER_HOST};
use thiserror::Error;

/// What the mock server does with a request no registered mock answers.
///
/// Deliberately a required choice with no `Default`: the right answer
/// differs per suite, so every harness caller states its policy
/// explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoMatchPolicy {
    /// Answer with a fixed, distinguishable error status
    /// ([`NO_MATCH_STATUS`](crate::mock_server::NO_MATCH_STATUS)) so
    /// unexpected traffic is visible and fails fast.
    ErrorStatus,
    /// Forward the request to its real destination and relay the response.
    PassThrough,
}

/// Unrecognized policy name.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown no-match policy {0:?} (expected \"error\" or \"passthrough\")")]
pub struct PolicyParseError(pub String);

impl FromStr for NoMatchPolicy {
    type Err = PolicyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "error" => Ok(Self::ErrorStatus),
            "passthrough" | "pass-through" => Ok(Self::PassThrough),
            other => Err(PolicyParseError(other.to_string())),
        }
    }
}

/// Startup configuration for the lifecycle harness.
///
/// Ports default to the well-known constants the application under test is
/// built against; overriding one only makes sense together with a matching
/// app-side override argument.
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// Listen host for both servers. Defaults to `0.0.0.0` so devices,
    /// emulators, and tunnels outside the local loop can reach them.
    pub host: IpAddr,
    pub state_port: u16,
    pub mock_port: u16,
    pub no_match_policy: NoMatchPolicy,
}

impl HarnessConfig {
    pub fn new(no_match_policy: NoMatchPolicy) -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::from(SERVER_HOST)),
            state_port: DEFAULT_STATE_SERVER_PORT,
            mock_port: DEFAULT_MOCK_SERVER_PORT,
            no_match_policy,
        }
    }

    pub fn state_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.state_port)
    }

    pub fn mock_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.mock_port)
    }
}
