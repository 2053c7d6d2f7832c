//! Harness error types.
//!
//! Configuration errors are fatal and abort test setup; they never degrade
//! into a silently different configuration (a stale port is an error, not a
//! cue to pick another one). Per-request match failures are not errors at
//! this level — they are answered over HTTP by the no-match policy — and
//! teardown failures are logged, not raised.

use std::net::SocketAddr;

use fixture_match::MockDeclarationError;
use thiserror::Error;

/// Fatal setup errors from the lifecycle harness.
#[derive(Error, Debug)]
pub enum HarnessError {
    /// The well-known port is already bound — usually a stale server from a
    /// previous run. The application under test is compiled to query this
    /// exact port, so falling back to another one would break it silently.
    #[error("{server} server port {port} is already in use (stale server from a previous run?)")]
    PortInUse {
        server: &'static str,
        port: u16,
        #[source]
        source: std::io::Error,
    },

    /// Listener setup failed for a reason other than port reuse.
    #[error("failed to bind {server} server listener on {addr}")]
    Bind {
        server: &'static str,
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    /// `start` was invoked while the harness was not stopped.
    #[error("harness is already running")]
    AlreadyRunning,

    /// The supplied mock bundle was invalid.
    #[error(transparent)]
    Declaration(#[from] MockDeclarationError),
}
