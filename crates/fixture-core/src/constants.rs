//! Well-known server constants.
//!
//! The application under test is built with these values baked in, so tests
//! cannot negotiate them at runtime. Overriding a port means relaunching the
//! app with a matching override argument.

/// Default port the fixture state server listens on.
pub const DEFAULT_STATE_SERVER_PORT: u16 = 12345;

/// Default port the mock interception server listens on.
pub const DEFAULT_MOCK_SERVER_PORT: u16 = 8000;

/// Path of the single state resource served to the application.
pub const STATE_RESOURCE_PATH: &str = "/state.json";

/// Listen host for both servers.
///
/// Tests may run the application on a separate device, emulator, or tunnel,
/// so the servers must be reachable from outside the local loop. Never bind
/// loopback-only.
pub const SERVER_HOST: [u8; 4] = [0, 0, 0, 0];
