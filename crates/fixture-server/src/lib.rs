//! # fixture-server — State Injection and Network Interception Servers
//!
//! Runs the two servers an end-to-end mobile test drives the application
//! with, plus the lifecycle harness that owns them for the duration of one
//! test:
//!
//! - **State server** — publishes the current [`StateStore`] document pair
//!   at `GET /state.json` with permissive CORS. The application fetches it
//!   once at launch to bootstrap its persisted stores.
//! - **Mock server** — a catch-all interception point that answers every
//!   outbound call the application makes from the registered mock set, or
//!   applies the configured no-match policy (fixed error status, or
//!   pass-through to the real network).
//! - **[`Harness`]** — `STOPPED → STARTING → RUNNING → STOPPING → STOPPED`
//!   lifecycle controller: allocates the well-known ports, loads the
//!   fixture and mock set, and guarantees teardown leaves nothing behind
//!   for the next test.
//!
//! Both servers bind `0.0.0.0` on fixed, well-known ports the application
//! under test is compiled to query; a port already held by a stale process
//! fails startup fast with [`HarnessError::PortInUse`].
//!
//! The standalone `fixture-server` binary (`src/main.rs`) runs the harness
//! with an empty fixture for interactive development against a device or
//! tunnel.

pub mod config;
pub mod error;
pub mod harness;
pub mod mock_server;
pub mod state_server;
pub mod state_store;

pub use config::{HarnessConfig, NoMatchPolicy};
pub use error::HarnessError;
pub use harness::{Harness, Phase};
pub use state_store::StateStore;
