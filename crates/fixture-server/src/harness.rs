//! Per-test lifecycle controller for both servers.

use std::net::SocketAddr;
use std::sync::Arc;

use fixture_core::StateFixture;
use fixture_match::{MockBundle, MockRegistry, RequestJournal, RequestMatcher};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::config::HarnessConfig;
use crate::error::HarnessError;
use crate::mock_server::{self, MockServerContext};
use crate::state_server;
use crate::state_store::StateStore;

/// Harness lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Stopped,
    Starting,
    Running,
    Stopping,
}

struct RunningServers {
    state_task: JoinHandle<()>,
    mock_task: JoinHandle<()>,
    state_addr: SocketAddr,
    mock_addr: SocketAddr,
}

/// Owns the state server and mock server for one test at a time.
///
/// `start` brings both servers up against a fresh fixture, mock set, and
/// journal; `stop` force-closes everything and is safe to call from any
/// cleanup path, including after a partially failed `start`. Between tests
/// that reuse one harness, [`load_state`](Harness::load_state) and
/// [`register_mocks`](Harness::register_mocks) explicitly replace the
/// previous test's values — nothing is ever assumed to carry over.
pub struct Harness {
    phase: Phase,
    store: Arc<StateStore>,
    registry: Arc<MockRegistry>,
    journal: Arc<RequestJournal>,
    servers: Option<RunningServers>,
}

impl Harness {
    pub fn new() -> Self {
        Self {
            phase: Phase::Stopped,
            store: Arc::new(StateStore::new()),
            registry: Arc::new(MockRegistry::new()),
            journal: Arc::new(RequestJournal::new()),
            servers: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Start both servers with the given mock set and initial state.
    ///
    /// Rejected with [`HarnessError::AlreadyRunning`] unless the harness is
    /// stopped. On any failure the harness rolls back to `Stopped` before
    /// the error is returned, so a cleanup-path `stop()` stays a no-op.
    pub async fn start(
        &mut self,
        config: HarnessConfig,
        mocks: MockBundle,
        initial_state: StateFixture,
    ) -> Result<(), HarnessError> {
        if self.phase != Phase::Stopped {
            return Err(HarnessError::AlreadyRunning);
        }
        self.phase = Phase::Starting;

        match self.bring_up(config, mocks, initial_state).await {
            Ok(servers) => {
                tracing::info!(
                    state_addr = %servers.state_addr,
                    mock_addr = %servers.mock_addr,
                    "fixture harness running"
                );
                self.servers = Some(servers);
                self.phase = Phase::Running;
                Ok(())
            }
            Err(err) => {
                self.phase = Phase::Stopped;
                Err(err)
            }
        }
    }

    async fn bring_up(
        &mut self,
        config: HarnessConfig,
        mocks: MockBundle,
        initial_state: StateFixture,
    ) -> Result<RunningServers, HarnessError> {
        // Fresh per-test state before anything listens.
        self.registry.register(mocks)?;
        self.store.load(initial_state);
        self.journal.clear();

        let state_listener = bind("state", config.state_addr()).await?;
        let mock_listener = bind("mock", config.mock_addr()).await?;
        let state_addr = local_addr("state", &state_listener)?;
        let mock_addr = local_addr("mock", &mock_listener)?;

        let state_app = state_server::router(Arc::clone(&self.store));
        let mock_app = mock_server::router(MockServerContext::new(
            RequestMatcher::new(Arc::clone(&self.registry)),
            Arc::clone(&self.journal),
            config.no_match_policy,
        ));

        Ok(RunningServers {
            state_task: tokio::spawn(serve("state", state_listener, state_app)),
            mock_task: tokio::spawn(serve("mock", mock_listener, mock_app)),
            state_addr,
            mock_addr,
        })
    }

    /// Tear both servers down and release their ports.
    ///
    /// Idempotent: a no-op when already stopped, so failure-cleanup paths
    /// can always call it. Open connections are aborted rather than drained
    /// — a torn-down emulator may never close its side. Teardown problems
    /// are logged and swallowed; the test verdict is already determined by
    /// the time teardown runs.
    pub async fn stop(&mut self) {
        if self.phase == Phase::Stopped {
            return;
        }
        self.phase = Phase::Stopping;

        if let Some(servers) = self.servers.take() {
            for (name, task) in [
                ("state", servers.state_task),
                ("mock", servers.mock_task),
            ] {
                task.abort();
                if let Err(err) = task.await {
                    if !err.is_cancelled() {
                        tracing::warn!(server = name, error = %err, "server task failed during teardown");
                    }
                }
            }
        }

        // No stale declarations may survive into the next test.
        self.registry.clear();
        self.phase = Phase::Stopped;
        tracing::info!("fixture harness stopped");
    }

    /// Replace the CURRENT state document pair while running.
    pub fn load_state(&self, fixture: StateFixture) {
        self.store.load(fixture);
    }

    /// Restore the CURRENT pair from the immutable default.
    pub fn reset_state(&self) {
        self.store.reset_to_default();
    }

    /// Replace the active mock set (and wipe the journal) for the next
    /// test without restarting the listeners.
    pub fn register_mocks(&self, mocks: MockBundle) -> Result<(), HarnessError> {
        self.registry.register(mocks)?;
        self.journal.clear();
        Ok(())
    }

    pub fn store(&self) -> Arc<StateStore> {
        Arc::clone(&self.store)
    }

    pub fn journal(&self) -> Arc<RequestJournal> {
        Arc::clone(&self.journal)
    }

    /// Bound state server address while running.
    pub fn state_addr(&self) -> Option<SocketAddr> {
        self.servers.as_ref().map(|s| s.state_addr)
    }

    /// Bound mock server address while running.
    pub fn mock_addr(&self) -> Option<SocketAddr> {
        self.servers.as_ref().map(|s| s.mock_addr)
    }
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Harness {
    fn drop(&mut self) {
        if let Some(servers) = self.servers.take() {
            servers.state_task.abort();
            servers.mock_task.abort();
        }
    }
}

async fn bind(server: &'static str, addr: SocketAddr) -> Result<TcpListener, HarnessError> {
    TcpListener::bind(addr).await.map_err(|source| {
        if source.kind() == std::io::ErrorKind::AddrInUse {
            HarnessError::PortInUse {
                server,
                port: addr.port(),
                source,
            }
        } else {
            HarnessError::Bind {
                server,
                addr,
                source,
            }
        }
    })
}

fn local_addr(server: &'static str, listener: &TcpListener) -> Result<SocketAddr, HarnessError> {
    listener.local_addr().map_err(|source| HarnessError::Bind {
        server,
        addr: SocketAddr::from(([0, 0, 0, 0], 0)),
        source,
    })
}

async fn serve(server: &'static str, listener: TcpListener, app: axum::Router) {
    if let Err(err) = axum::serve(listener, app.into_make_service()).await {
        tracing::warn!(server = server, error = %err, "server exited with error");
    }
}
